// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board-change log: every move carries an ordered list of primitive
//! board edits, and forwarding or rewinding a move is nothing but replaying
//! that list. Rewinding replays the edits inverted, in exact reverse order,
//! which is what makes arbitrary move sequences bit-for-bit reversible.

use crate::{
    core::Coord,
    position::{Piece, Position, PositionError},
};

/// A primitive, reversible board edit. `Capture` keeps the captured piece's
/// identity and square so the reverse replay can restore it exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Add(Piece),
    Remove(Piece),
    Move { piece: Piece, dest: Coord },
    Capture { piece: Piece, dest: Coord, captured: Piece },
}

pub fn queue_add_piece(changes: &mut Vec<Change>, piece: Piece) {
    changes.push(Change::Add(piece));
}

pub fn queue_delete_piece(changes: &mut Vec<Change>, piece: Piece) {
    changes.push(Change::Remove(piece));
}

pub fn queue_move_piece(changes: &mut Vec<Change>, piece: Piece, dest: Coord) {
    changes.push(Change::Move { piece, dest });
}

pub fn queue_capture(changes: &mut Vec<Change>, piece: Piece, dest: Coord, captured: Piece) {
    changes.push(Change::Capture {
        piece,
        dest,
        captured,
    });
}

/// Whether any queued change captures a piece. Used by the move-rule and by
/// notation/animation consumers.
pub fn was_a_capture(changes: &[Change]) -> bool {
    changes
        .iter()
        .any(|change| matches!(change, Change::Capture { .. }))
}

/// Replays a move's changes against the live position: in order going
/// forward, inverted and in reverse order going backward.
pub fn apply_changes(
    position: &mut Position,
    changes: &[Change],
    forward: bool,
) -> Result<(), PositionError> {
    if forward {
        for change in changes {
            apply_change(position, change)?;
        }
    } else {
        for change in changes.iter().rev() {
            revert_change(position, change)?;
        }
    }
    Ok(())
}

fn apply_change(position: &mut Position, change: &Change) -> Result<(), PositionError> {
    match *change {
        Change::Add(piece) => position.add_piece(piece.coords, piece.kind),
        Change::Remove(piece) => position.remove_piece(piece.coords).map(drop),
        Change::Move { piece, dest } => position.move_piece(piece.coords, dest),
        Change::Capture {
            piece,
            dest,
            captured,
        } => {
            position.remove_piece(captured.coords)?;
            position.move_piece(piece.coords, dest)
        }
    }
}

fn revert_change(position: &mut Position, change: &Change) -> Result<(), PositionError> {
    match *change {
        Change::Add(piece) => position.remove_piece(piece.coords).map(drop),
        Change::Remove(piece) => position.add_piece(piece.coords, piece.kind),
        Change::Move { piece, dest } => position.move_piece(dest, piece.coords),
        Change::Capture {
            piece,
            dest,
            captured,
        } => {
            position.move_piece(dest, piece.coords)?;
            position.add_piece(captured.coords, captured.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceType, RawType, BLACK, WHITE};

    fn piece(raw: RawType, player: crate::core::Player, x: i64, y: i64) -> Piece {
        Piece::new(PieceType::new(raw, player), Coord::new(x, y))
    }

    #[test]
    fn move_round_trip() {
        let mut pos = Position::new();
        let knight = piece(RawType::Knight, WHITE, 2, 1);
        pos.add_piece(knight.coords, knight.kind).unwrap();

        let mut changes = Vec::new();
        queue_move_piece(&mut changes, knight, Coord::new(3, 3));

        apply_changes(&mut pos, &changes, true).unwrap();
        assert_eq!(Some(knight.kind), pos.piece_at(Coord::new(3, 3)));
        assert!(!pos.is_occupied(Coord::new(2, 1)));

        apply_changes(&mut pos, &changes, false).unwrap();
        assert_eq!(Some(knight.kind), pos.piece_at(Coord::new(2, 1)));
        assert!(!pos.is_occupied(Coord::new(3, 3)));
    }

    #[test]
    fn capture_restores_the_victim() {
        let mut pos = Position::new();
        let rook = piece(RawType::Rook, WHITE, 0, 0);
        let queen = piece(RawType::Queen, BLACK, 0, 9);
        pos.add_piece(rook.coords, rook.kind).unwrap();
        pos.add_piece(queen.coords, queen.kind).unwrap();

        let mut changes = Vec::new();
        queue_capture(&mut changes, rook, queen.coords, queen);
        assert!(was_a_capture(&changes));

        apply_changes(&mut pos, &changes, true).unwrap();
        assert_eq!(Some(rook.kind), pos.piece_at(Coord::new(0, 9)));
        assert_eq!(1, pos.len());

        apply_changes(&mut pos, &changes, false).unwrap();
        assert_eq!(Some(rook.kind), pos.piece_at(Coord::new(0, 0)));
        assert_eq!(Some(queen.kind), pos.piece_at(Coord::new(0, 9)));
    }

    #[test]
    fn promotion_sequence_reverses_in_order() {
        // move to the last rank, delete the pawn, add the queen; the reverse
        // replay must undo those in the opposite order.
        let mut pos = Position::new();
        let pawn = piece(RawType::Pawn, WHITE, 2, 7);
        let promoted = PieceType::new(RawType::Queen, WHITE);
        pos.add_piece(pawn.coords, pawn.kind).unwrap();

        let mut changes = Vec::new();
        queue_move_piece(&mut changes, pawn, Coord::new(2, 8));
        queue_delete_piece(&mut changes, Piece::new(pawn.kind, Coord::new(2, 8)));
        queue_add_piece(&mut changes, Piece::new(promoted, Coord::new(2, 8)));
        assert!(!was_a_capture(&changes));

        apply_changes(&mut pos, &changes, true).unwrap();
        assert_eq!(Some(promoted), pos.piece_at(Coord::new(2, 8)));
        assert_eq!(1, pos.len());

        apply_changes(&mut pos, &changes, false).unwrap();
        assert_eq!(Some(pawn.kind), pos.piece_at(Coord::new(2, 7)));
        assert_eq!(1, pos.len());
    }

    #[test]
    fn desynced_replay_reports_the_square() {
        let mut pos = Position::new();
        let mut changes = Vec::new();
        queue_move_piece(&mut changes, piece(RawType::Rook, WHITE, 4, 4), Coord::new(4, 8));
        let err = apply_changes(&mut pos, &changes, true).unwrap_err();
        assert_eq!(PositionError::Vacant(Coord::new(4, 4)), err);
    }
}
