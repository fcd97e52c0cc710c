// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use bitflags::bitflags;

use crate::{
    core::{Coord, PieceType},
    changes::Change,
    state::MoveState,
};

bitflags! {
    /// Flags cached on a move after the fact: whether it delivered check,
    /// and whether it delivered mate. Set once by downstream check and
    /// game-over logic; everything else on a `Move` is immutable after
    /// construction.
    pub struct MoveFlags: u8 {
        const CHECK = 0b0000_0001;
        const MATE  = 0b0000_0010;
    }
}

/// Which partner a royal castles with, and in which direction along the
/// rank: `dir` is 1 for rightward, -1 for leftward.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CastleDraft {
    pub coord: Coord,
    pub dir: i8,
}

/// Minimal move intent, before the engine expands it into a full `Move`.
///
/// `en_passant` is the rank offset from the end square to the captured
/// piece: 1 when the victim stands one square above, -1 when below.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveDraft {
    pub start_coords: Coord,
    pub end_coords: Coord,
    pub en_passant: Option<i8>,
    pub promotion: Option<PieceType>,
    pub castle: Option<CastleDraft>,
}

impl MoveDraft {
    pub fn new(start_coords: Coord, end_coords: Coord) -> MoveDraft {
        MoveDraft {
            start_coords,
            end_coords,
            ..MoveDraft::default()
        }
    }
}

/// A fully-specified, reversible move: the draft fields plus everything the
/// engine derived while expanding it. Owned exclusively by the game's move
/// list once appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    pub start_coords: Coord,
    pub end_coords: Coord,
    pub en_passant: Option<i8>,
    pub promotion: Option<PieceType>,
    pub castle: Option<CastleDraft>,
    /// The type of the piece that moved.
    pub kind: PieceType,
    /// The ordered board edits this move makes.
    pub changes: Vec<Change>,
    /// The reversible gamefile property records this move makes.
    pub state: MoveState,
    /// The move-list index this move was generated for; `apply` checks it
    /// against the live cursor to catch desynchronized history navigation.
    pub generate_index: isize,
    /// The move in most compact notation: `8,7>8,8Q`.
    pub compact: String,
    flags: MoveFlags,
}

impl Move {
    pub(crate) fn from_draft(draft: MoveDraft, kind: PieceType, generate_index: isize, compact: String) -> Move {
        Move {
            start_coords: draft.start_coords,
            end_coords: draft.end_coords,
            en_passant: draft.en_passant,
            promotion: draft.promotion,
            castle: draft.castle,
            kind,
            changes: Vec::new(),
            state: MoveState::default(),
            generate_index,
            compact,
            flags: MoveFlags::empty(),
        }
    }

    /// Whether the move delivered check.
    pub fn check(&self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    /// Whether the move delivered mate (or the killing move).
    pub fn mate(&self) -> bool {
        self.flags.contains(MoveFlags::MATE)
    }

    pub(crate) fn set_check(&mut self) {
        self.flags |= MoveFlags::CHECK;
    }

    pub(crate) fn set_mate(&mut self) {
        self.flags |= MoveFlags::MATE;
    }
}
