// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The gamefile: one live game as an exclusively-owned value. Every engine
//! operation takes `&mut GameState`; independent games are independent
//! values with nothing shared between them.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::{
    check::Attacker,
    core::{Coord, PieceType, Player, RawType},
    events::GameEvents,
    moves::Move,
    movesets::{self, Moveset, Vicinity},
    position::Position,
    rules::GameRules,
    specials::{self, SpecialRegistry},
    variant::{self, Metadata, StartSnapshot, VariantError, VariantOptions},
};

/// The complete state of one game: the live position, the move list and
/// cursor, the per-move bookkeeping properties, the derived check caches,
/// and the immutable variant configuration.
#[derive(Debug)]
pub struct GameState {
    pub(crate) position: Position,
    pub(crate) moves: Vec<Move>,
    /// Index of the most recently applied move; -1 before any move.
    pub(crate) move_index: isize,
    pub(crate) whos_turn: Player,
    /// The square a pawn just passed over, if the last move was a double
    /// push.
    pub(crate) en_passant: Option<Coord>,
    /// Squares whose piece retains its special (castle/double-push) right.
    pub(crate) special_rights: HashSet<Coord>,
    /// Move-rule counter; present exactly when the rule is active.
    pub(crate) move_rule_state: Option<u32>,
    /// Royals of the side to move currently in check, if any.
    pub(crate) in_check: Option<Vec<Coord>>,
    /// The pieces delivering that check, when attacker tracking is on.
    pub(crate) attackers: Vec<Attacker>,
    pub(crate) start: StartSnapshot,
    pub(crate) rules: GameRules,
    pub(crate) movesets: HashMap<RawType, Moveset>,
    pub(crate) specials: SpecialRegistry,
    pub(crate) vicinity: Vicinity,
    pub(crate) special_vicinity: Vicinity,
    pub(crate) events: GameEvents,
    pub(crate) editor: bool,
}

impl GameState {
    /// Sets up a new game from variant metadata (Path A) or explicit
    /// options (Path B).
    pub fn new(
        metadata: &Metadata,
        options: Option<VariantOptions>,
    ) -> Result<GameState, VariantError> {
        GameState::with_mode(metadata, options, false)
    }

    /// Editor-mode setup: `existing_types` covers everything placeable and
    /// no moveset is pruned.
    pub fn new_editor(
        metadata: &Metadata,
        options: Option<VariantOptions>,
    ) -> Result<GameState, VariantError> {
        GameState::with_mode(metadata, options, true)
    }

    fn with_mode(
        metadata: &Metadata,
        options: Option<VariantOptions>,
        editor: bool,
    ) -> Result<GameState, VariantError> {
        let (start, rules) = variant::setup(metadata, options, editor)?;

        let mut movesets = movesets::movesets();
        if !editor {
            // movesets for types that cannot appear are dead weight
            movesets.retain(|raw, _| start.existing_raw_types.contains(raw));
        }
        let vicinity = movesets::gen_vicinity(&start.existing_raw_types, &movesets);
        let special_vicinity = movesets::gen_special_vicinity(&start.existing_raw_types);
        let specials = specials::registry_for(&start.existing_raw_types);

        let whos_turn = rules.turn_order[0];
        Ok(GameState {
            position: start.position.clone(),
            moves: Vec::new(),
            move_index: -1,
            whos_turn,
            en_passant: start.en_passant,
            special_rights: start.special_rights.clone(),
            move_rule_state: start.move_rule_state,
            in_check: None,
            attackers: Vec::new(),
            start,
            rules,
            movesets,
            specials,
            vicinity,
            special_vicinity,
            events: GameEvents::default(),
            editor,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn move_index(&self) -> isize {
        self.move_index
    }

    pub fn whos_turn(&self) -> Player {
        self.whos_turn
    }

    pub fn en_passant(&self) -> Option<Coord> {
        self.en_passant
    }

    pub fn special_rights(&self) -> &HashSet<Coord> {
        &self.special_rights
    }

    pub fn move_rule_state(&self) -> Option<u32> {
        self.move_rule_state
    }

    pub fn in_check(&self) -> Option<&[Coord]> {
        self.in_check.as_deref()
    }

    pub fn attackers(&self) -> &[Attacker] {
        &self.attackers
    }

    pub fn start(&self) -> &StartSnapshot {
        &self.start
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn movesets(&self) -> &HashMap<RawType, Moveset> {
        &self.movesets
    }

    pub fn vicinity(&self) -> &Vicinity {
        &self.vicinity
    }

    pub fn special_vicinity(&self) -> &Vicinity {
        &self.special_vicinity
    }

    pub fn events_mut(&mut self) -> &mut GameEvents {
        &mut self.events
    }

    pub fn editor(&self) -> bool {
        self.editor
    }

    /// The seat to move after the move at `index` (the seat owning move
    /// `index + 1` of the game).
    pub fn turn_at_move_index(&self, index: isize) -> Player {
        let order = &self.rules.turn_order;
        let slot = (index + 1).rem_euclid(order.len() as isize) as usize;
        order[slot]
    }

    /// Whether the cursor stands on the most recently played move.
    pub fn viewing_latest_move(&self) -> bool {
        self.move_index == self.moves.len() as isize - 1
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Stamps the mate flag on the final move; called by game-over logic
    /// once a decisive conclusion is known.
    pub fn flag_last_move_as_mate(&mut self) {
        if let Some(mv) = self.moves.last_mut() {
            mv.set_mate();
        }
    }
}

impl fmt::Display for GameState {
    /// A grid over the bounding box for small boards, a coordinate list
    /// otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const GRID_LIMIT: i64 = 32;
        let Some((min, max)) = self.position.bounding_box() else {
            return writeln!(f, "(empty board)");
        };

        if max.x - min.x >= GRID_LIMIT || max.y - min.y >= GRID_LIMIT {
            let mut entries: Vec<(Coord, PieceType)> = self.position.iter().collect();
            entries.sort_by_key(|&(coords, _)| coords);
            for (coords, kind) in entries {
                writeln!(f, "{} @ {}", kind, coords)?;
            }
            return Ok(());
        }

        for y in (min.y..=max.y).rev() {
            for x in min.x..=max.x {
                match self.position.piece_at(Coord::new(x, y)) {
                    // pad to the widest abbreviation
                    Some(kind) => write!(f, "{:>5} ", kind.to_string())?,
                    None => write!(f, "{:>5} ", ".")?,
                }
            }
            writeln!(f, "| {}", y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BLACK, WHITE};
    use crate::variant::tests_support::game_from_position;

    #[test]
    fn fresh_game_state() {
        let game = GameState::new(
            &Metadata {
                variant: Some("Classical".to_string()),
                date: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(-1, game.move_index());
        assert_eq!(WHITE, game.whos_turn());
        assert!(game.viewing_latest_move());
        assert_eq!(None, game.in_check());
        assert_eq!(Some(0), game.move_rule_state());
        assert_eq!(32, game.position().len());
    }

    #[test]
    fn turn_order_wraps() {
        let game = game_from_position("K5,1+|k5,8+");
        assert_eq!(WHITE, game.turn_at_move_index(-1));
        assert_eq!(BLACK, game.turn_at_move_index(0));
        assert_eq!(WHITE, game.turn_at_move_index(1));
    }

    #[test]
    fn unused_movesets_are_pruned() {
        let game = game_from_position("K5,1+|R8,1+");
        assert!(game.movesets().contains_key(&RawType::Rook));
        assert!(!game.movesets().contains_key(&RawType::Zebra));
        // promotion targets stay reachable
        assert!(game.movesets().contains_key(&RawType::Knight));
    }

    #[test]
    fn editor_keeps_every_moveset() {
        let options = VariantOptions {
            position_string: Some("K5,1+".to_string()),
            en_passant: None,
            move_rule: None,
            full_move: None,
            game_rules: GameRules::standard(),
        };
        let game = GameState::new_editor(&Metadata::default(), Some(options)).unwrap();
        assert!(game.editor());
        assert!(game.movesets().contains_key(&RawType::Zebra));
    }

    #[test]
    fn display_small_board() {
        let game = game_from_position("K5,1+|k5,3+");
        let text = game.to_string();
        assert!(text.contains('K'));
        assert!(text.contains('k'));
        assert!(text.contains("| 1"));
    }

    #[test]
    fn display_huge_board_lists_pieces() {
        let game = game_from_position("K5,1+|k5,1000+");
        let text = game.to_string();
        assert!(text.contains("K @ 5,1"));
        assert!(text.contains("k @ 5,1000"));
    }
}
