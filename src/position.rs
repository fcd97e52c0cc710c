// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::{Coord, PieceType, Player};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("square {0} is already occupied")]
    Occupied(Coord),
    #[error("no piece at square {0}")]
    Vacant(Coord),
}

/// A piece standing on a square.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceType,
    pub coords: Coord,
}

impl Piece {
    pub const fn new(kind: PieceType, coords: Coord) -> Piece {
        Piece { kind, coords }
    }
}

/// The live piece placement of a game: a sparse mapping from square to piece
/// identifier. The board is unbounded, so there is no backing grid.
///
/// During play the position is mutated exclusively through a move's change
/// log (`changes::apply_changes`); the mutators here are the primitive edits
/// that log replays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Position {
    pieces: HashMap<Coord, PieceType>,
}

impl Position {
    pub fn new() -> Position {
        Position::default()
    }

    pub fn piece_at(&self, coords: Coord) -> Option<PieceType> {
        self.pieces.get(&coords).copied()
    }

    /// Like `piece_at`, but returns a placed `Piece` carrying its square.
    pub fn piece_on(&self, coords: Coord) -> Option<Piece> {
        self.piece_at(coords).map(|kind| Piece::new(kind, coords))
    }

    pub fn is_occupied(&self, coords: Coord) -> bool {
        self.pieces.contains_key(&coords)
    }

    pub fn add_piece(&mut self, coords: Coord, kind: PieceType) -> Result<(), PositionError> {
        if self.is_occupied(coords) {
            return Err(PositionError::Occupied(coords));
        }
        self.pieces.insert(coords, kind);
        Ok(())
    }

    pub fn remove_piece(&mut self, coords: Coord) -> Result<PieceType, PositionError> {
        self.pieces
            .remove(&coords)
            .ok_or(PositionError::Vacant(coords))
    }

    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Result<(), PositionError> {
        if self.is_occupied(to) {
            return Err(PositionError::Occupied(to));
        }
        let kind = self.remove_piece(from)?;
        self.pieces.insert(to, kind);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, PieceType)> + '_ {
        self.pieces.iter().map(|(&coords, &kind)| (coords, kind))
    }

    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = Piece> + '_ {
        self.iter()
            .filter(move |&(_, kind)| kind.player == player)
            .map(|(coords, kind)| Piece::new(kind, coords))
    }

    /// Coordinates of every royal piece belonging to `player`, in a
    /// deterministic order.
    pub fn royals_of(&self, player: Player) -> Vec<Coord> {
        let mut royals: Vec<Coord> = self
            .iter()
            .filter(|&(_, kind)| kind.player == player && kind.raw.is_royal())
            .map(|(coords, _)| coords)
            .collect();
        royals.sort();
        royals
    }

    /// The smallest box containing every piece, as (min, max) corners.
    pub fn bounding_box(&self) -> Option<(Coord, Coord)> {
        let mut iter = self.pieces.keys();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for &coords in iter {
            min.x = min.x.min(coords.x);
            min.y = min.y.min(coords.y);
            max.x = max.x.max(coords.x);
            max.y = max.y.max(coords.y);
        }
        Some((min, max))
    }
}
