// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Special-move resolution. Each variant installs a registry mapping a raw
//! piece type to a handler; during move generation the mover's handler gets
//! the first chance to populate the move's change and state logs. A handler
//! that declines (returns `false`) falls the move through to the default
//! move/capture path.

use std::{collections::HashMap, fmt};

use crate::{
    changes,
    core::{Coord, RawType},
    game::GameState,
    moves::Move,
    position::Piece,
    state::StateChange,
};

/// A special-move resolver for one piece type. `attempt` inspects the move
/// and, when it recognizes a special form (a flag on the draft, or a shape
/// like the double push), queues every board change and state record the
/// move needs and reports the move consumed.
pub trait SpecialHandler {
    fn attempt(&self, game: &GameState, piece: Piece, mv: &mut Move) -> bool;
}

/// Raw type → handler, populated once at variant-initialization time.
#[derive(Default)]
pub struct SpecialRegistry {
    handlers: HashMap<RawType, Box<dyn SpecialHandler + Send + Sync>>,
}

impl SpecialRegistry {
    pub fn insert(
        &mut self,
        raw: RawType,
        handler: Box<dyn SpecialHandler + Send + Sync>,
    ) {
        self.handlers.insert(raw, handler);
    }

    pub fn get(&self, raw: RawType) -> Option<&(dyn SpecialHandler + Send + Sync)> {
        self.handlers.get(&raw).map(|handler| handler.as_ref())
    }
}

impl fmt::Debug for SpecialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<RawType> = self.handlers.keys().copied().collect();
        types.sort();
        f.debug_tuple("SpecialRegistry").field(&types).finish()
    }
}

/// The registry for a game containing the given raw types: pawns get the
/// pawn handler, castling royals the castle handler.
pub fn registry_for(existing_raw: &[RawType]) -> SpecialRegistry {
    let mut registry = SpecialRegistry::default();
    if existing_raw.contains(&RawType::Pawn) {
        registry.insert(RawType::Pawn, Box::new(PawnHandler));
    }
    for &raw in existing_raw {
        if raw.is_royal() {
            registry.insert(raw, Box::new(CastleHandler));
        }
    }
    registry
}

/// Handles the three special pawn forms: promotion, en-passant capture, and
/// the double push (which reinstates the en-passant target the engine's
/// blanket deletion just cleared). Plain pushes and captures fall through.
struct PawnHandler;

impl SpecialHandler for PawnHandler {
    fn attempt(&self, game: &GameState, piece: Piece, mv: &mut Move) -> bool {
        if let Some(promotion) = mv.promotion {
            match game.position().piece_on(mv.end_coords) {
                Some(captured) => {
                    changes::queue_capture(&mut mv.changes, piece, mv.end_coords, captured)
                }
                None => changes::queue_move_piece(&mut mv.changes, piece, mv.end_coords),
            }
            changes::queue_delete_piece(&mut mv.changes, Piece::new(piece.kind, mv.end_coords));
            changes::queue_add_piece(&mut mv.changes, Piece::new(promotion, mv.end_coords));
            return true;
        }

        if let Some(dir) = mv.en_passant {
            let victim_coords = Coord::new(mv.end_coords.x, mv.end_coords.y + dir as i64);
            let victim = game
                .position()
                .piece_on(victim_coords)
                .expect("en-passant move with no victim behind the target square");
            changes::queue_capture(&mut mv.changes, piece, mv.end_coords, victim);
            return true;
        }

        if (mv.end_coords.y - mv.start_coords.y).abs() == 2 {
            changes::queue_move_piece(&mut mv.changes, piece, mv.end_coords);
            let skipped = Coord::new(
                mv.start_coords.x,
                (mv.start_coords.y + mv.end_coords.y) / 2,
            );
            mv.state.queue(StateChange::EnPassant {
                before: game.en_passant(),
                after: Some(skipped),
            });
            return true;
        }

        false
    }
}

/// Handles castling: moves royal and partner in one transaction and strips
/// the partner's special right (the royal's own squares were already
/// stripped by the engine).
struct CastleHandler;

impl SpecialHandler for CastleHandler {
    fn attempt(&self, game: &GameState, piece: Piece, mv: &mut Move) -> bool {
        let Some(castle) = mv.castle else {
            return false;
        };

        let partner = game
            .position()
            .piece_on(castle.coord)
            .expect("castle move with no partner on the named square");

        changes::queue_move_piece(&mut mv.changes, piece, mv.end_coords);
        let partner_dest = Coord::new(mv.end_coords.x - castle.dir as i64, mv.end_coords.y);
        changes::queue_move_piece(&mut mv.changes, partner, partner_dest);

        mv.state.queue(StateChange::SpecialRight {
            coords: castle.coord,
            before: game.special_rights().contains(&castle.coord),
            after: false,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        changes::Change,
        core::{PieceType, BLACK, WHITE},
        moves::{CastleDraft, MoveDraft},
        variant::tests_support::game_from_position,
    };

    fn shell(game: &GameState, draft: MoveDraft) -> (Piece, Move) {
        let piece = game.position().piece_on(draft.start_coords).unwrap();
        let compact = crate::notation::encode_compact_move(&draft);
        let mv = Move::from_draft(draft, piece.kind, game.move_index() + 1, compact);
        (piece, mv)
    }

    #[test]
    fn registry_dispatch() {
        let registry = registry_for(&[RawType::Pawn, RawType::King, RawType::Knight]);
        assert!(registry.get(RawType::Pawn).is_some());
        assert!(registry.get(RawType::King).is_some());
        assert!(registry.get(RawType::Knight).is_none());
        assert!(registry.get(RawType::RoyalQueen).is_none());
    }

    #[test]
    fn plain_pawn_push_falls_through() {
        let game = game_from_position("P2,2+");
        let (piece, mut mv) = shell(&game, MoveDraft::new(Coord::new(2, 2), Coord::new(2, 3)));
        let handler = PawnHandler;
        assert!(!handler.attempt(&game, piece, &mut mv));
        assert!(mv.changes.is_empty());
    }

    #[test]
    fn double_push_reinstates_en_passant() {
        let game = game_from_position("P2,2+");
        let (piece, mut mv) = shell(&game, MoveDraft::new(Coord::new(2, 2), Coord::new(2, 4)));
        assert!(PawnHandler.attempt(&game, piece, &mut mv));
        assert_eq!(
            vec![StateChange::EnPassant {
                before: None,
                after: Some(Coord::new(2, 3)),
            }],
            mv.state.local
        );
        assert_eq!(1, mv.changes.len());
    }

    #[test]
    fn en_passant_capture_takes_the_adjacent_pawn() {
        let mut game = game_from_position("P4,5+|p5,5");
        game.en_passant = Some(Coord::new(5, 6));
        let mut draft = MoveDraft::new(Coord::new(4, 5), Coord::new(5, 6));
        draft.en_passant = Some(-1);
        let (piece, mut mv) = shell(&game, draft);
        assert!(PawnHandler.attempt(&game, piece, &mut mv));
        match &mv.changes[0] {
            Change::Capture { captured, .. } => {
                assert_eq!(Coord::new(5, 5), captured.coords);
                assert_eq!(PieceType::new(RawType::Pawn, BLACK), captured.kind);
            }
            other => panic!("expected a capture change, got {:?}", other),
        }
    }

    #[test]
    fn promotion_swaps_the_piece() {
        let game = game_from_position("P2,7+|n3,8");
        let mut draft = MoveDraft::new(Coord::new(2, 7), Coord::new(3, 8));
        draft.promotion = Some(PieceType::new(RawType::Queen, WHITE));
        let (piece, mut mv) = shell(&game, draft);
        assert!(PawnHandler.attempt(&game, piece, &mut mv));
        assert_eq!(3, mv.changes.len());
        assert!(matches!(mv.changes[0], Change::Capture { .. }));
        assert!(matches!(
            mv.changes[2],
            Change::Add(Piece {
                kind: PieceType {
                    raw: RawType::Queen,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn castle_moves_both_pieces_and_strips_the_partner() {
        let game = game_from_position("K5,1+|R8,1+");
        let mut draft = MoveDraft::new(Coord::new(5, 1), Coord::new(7, 1));
        draft.castle = Some(CastleDraft {
            coord: Coord::new(8, 1),
            dir: 1,
        });
        let (piece, mut mv) = shell(&game, draft);
        assert!(CastleHandler.attempt(&game, piece, &mut mv));
        assert_eq!(
            vec![
                Change::Move {
                    piece,
                    dest: Coord::new(7, 1)
                },
                Change::Move {
                    piece: game.position().piece_on(Coord::new(8, 1)).unwrap(),
                    dest: Coord::new(6, 1)
                },
            ],
            mv.changes
        );
        assert_eq!(
            vec![StateChange::SpecialRight {
                coords: Coord::new(8, 1),
                before: true,
                after: false,
            }],
            mv.state.local
        );
    }

    #[test]
    fn non_castle_royal_move_falls_through() {
        let game = game_from_position("K5,1+");
        let (piece, mut mv) = shell(&game, MoveDraft::new(Coord::new(5, 1), Coord::new(5, 2)));
        assert!(!CastleHandler.attempt(&game, piece, &mut mv));
        assert!(mv.changes.is_empty());
    }
}
