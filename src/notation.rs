// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compact wire codecs.
//!
//! Moves travel as `"8,7>8,8Q"`: start coordinates, `>`, end coordinates,
//! optional promotion abbreviation. Only start, end, and promotion are
//! representable; en passant and castle flags are re-derived by matching the
//! end square against the piece's legal special destinations.
//!
//! Positions travel as `"K5,1+|P4,2|q-3,9"`: one entry per piece, sorted by
//! coordinate, with a trailing `+` on squares that retain their special
//! (castle/double-push) rights.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    core::{Coord, CoordParseError, PieceType, TypeParseError},
    moves::MoveDraft,
    position::Position,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("expected '>' between start and end coordinates: {0}")]
    MissingSeparator(String),
    #[error(transparent)]
    BadCoords(#[from] CoordParseError),
    #[error(transparent)]
    BadPiece(#[from] TypeParseError),
    #[error("empty position entry")]
    EmptyEntry,
}

/// Encodes a draft in most compact notation. Lossy by design: en passant
/// and castle markers are dropped.
pub fn encode_compact_move(draft: &MoveDraft) -> String {
    let mut out = format!("{}>{}", draft.start_coords, draft.end_coords);
    if let Some(promotion) = draft.promotion {
        out.push_str(&promotion.to_string());
    }
    out
}

/// Decodes most compact notation into a draft with start, end, and
/// promotion populated.
pub fn decode_compact_move(s: &str) -> Result<MoveDraft, NotationError> {
    let (start, rest) = s
        .split_once('>')
        .ok_or_else(|| NotationError::MissingSeparator(s.to_string()))?;

    // The end coordinates run until the first character that cannot be part
    // of an integer pair; whatever follows is the promotion abbreviation.
    let coord_len = rest
        .find(|c: char| !c.is_ascii_digit() && c != '-' && c != ',')
        .unwrap_or(rest.len());
    let (end, promotion) = rest.split_at(coord_len);

    let mut draft = MoveDraft::new(start.parse()?, end.parse()?);
    if !promotion.is_empty() {
        draft.promotion = Some(promotion.parse()?);
    }
    Ok(draft)
}

/// Encodes a position and its rights into the compact position form.
pub fn encode_position(position: &Position, special_rights: &HashSet<Coord>) -> String {
    let mut entries: Vec<(Coord, PieceType)> = position.iter().collect();
    entries.sort_by_key(|&(coords, _)| coords);
    entries
        .iter()
        .map(|(coords, kind)| {
            let right = if special_rights.contains(coords) { "+" } else { "" };
            format!("{}{}{}", kind, coords, right)
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Decodes the compact position form. The empty string is the empty board.
pub fn decode_position(s: &str) -> Result<(Position, HashSet<Coord>), NotationError> {
    let mut position = Position::new();
    let mut rights = HashSet::new();
    if s.is_empty() {
        return Ok((position, rights));
    }

    for entry in s.split('|') {
        if entry.is_empty() {
            return Err(NotationError::EmptyEntry);
        }
        let (entry, has_right) = match entry.strip_suffix('+') {
            Some(stripped) => (stripped, true),
            None => (entry, false),
        };

        // The abbreviation is the leading letters plus an optional "(n)"
        // seat marker; the coordinates are everything after.
        let mut coord_start = entry
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .unwrap_or(entry.len());
        if let Some(open) = entry.find('(') {
            if open < coord_start {
                let close = entry[open..]
                    .find(')')
                    .map(|i| open + i + 1)
                    .unwrap_or(entry.len());
                coord_start = close;
            }
        }
        let (abbrev, coords) = entry.split_at(coord_start);

        let kind: PieceType = abbrev.parse()?;
        let coords: Coord = coords.parse()?;
        if has_right {
            rights.insert(coords);
        }
        // A doubled coordinate keeps the first piece; the position map
        // guarantees key uniqueness.
        let _ = position.add_piece(coords, kind);
    }
    Ok((position, rights))
}
