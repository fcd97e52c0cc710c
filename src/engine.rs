// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The move engine: expanding a draft into a fully-specified reversible
//! move, applying and rewinding moves against the live game, walking the
//! history cursor, and simulating speculative moves that are guaranteed to
//! be perfectly undone.
//!
//! Every operation here runs to completion synchronously. Desynchronized
//! history navigation (applying a move at the wrong cursor position) is a
//! programmer error and fatal; malformed input surfaces as typed errors.

use thiserror::Error;

use crate::{
    changes, check,
    core::{Coord, Player, RawType},
    game::GameState,
    movegen::{self, CalcOptions},
    moves::{Move, MoveDraft},
    notation,
    position::Piece,
    rules::WinCondition,
    state::{self, StateChange},
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cannot make a move: no piece exists at coords {0}")]
    NoPieceAtCoords(Coord),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("target index {0} is outside of the move list")]
    TargetOutsideMoveList(isize),
    #[error("cannot bulk-load moves into a game with {0} moves already played")]
    MovesAlreadyPlayed(usize),
    #[error("move {index} is in an invalid format: {text}")]
    InvalidMove { index: usize, text: String },
}

/// Steps `current` toward `target` by at most `delta`.
fn move_towards(current: isize, target: isize, delta: isize) -> isize {
    current + (target - current).clamp(-delta, delta)
}

impl GameState {
    /// Expands a draft into a full `Move`: resolves the mover, records the
    /// unconditional en-passant/special-rights deletions, gives the mover's
    /// special handler first refusal, falls back to a plain move or
    /// capture, and finally records the move-rule counter update.
    ///
    /// Nothing is applied to the live state; the returned move is a pure
    /// description until `make_move` runs it.
    pub fn generate_move(&self, draft: &MoveDraft) -> Result<Move, MoveError> {
        let mut draft = draft.clone();
        for &hook in self.events.draft_moves.listeners() {
            if hook(self, &mut draft) {
                break;
            }
        }

        let piece = self
            .position
            .piece_on(draft.start_coords)
            .ok_or(MoveError::NoPieceAtCoords(draft.start_coords))?;

        let compact = notation::encode_compact_move(&draft);
        let mut mv = Move::from_draft(draft, piece.kind, self.move_index + 1, compact);

        // Record these before resolving movement, so a double push can
        // reinstate en passant after the blanket deletion.
        self.delete_enpassant_and_special_rights(&mut mv);

        let consumed = self
            .specials
            .get(piece.kind.raw)
            .map_or(false, |handler| handler.attempt(self, piece, &mut mv));
        if !consumed {
            self.move_piece_no_special(piece, &mut mv);
        }

        let was_capture = changes::was_a_capture(&mv.changes);
        self.increment_move_rule(&mut mv, was_capture);
        Ok(mv)
    }

    /// Records deletion of the en-passant target and of the special rights
    /// keyed at the start and end squares. Capturing a rights-bearing piece
    /// must strip its right too, which is why the end square is always
    /// included.
    fn delete_enpassant_and_special_rights(&self, mv: &mut Move) {
        mv.state.queue(StateChange::EnPassant {
            before: self.en_passant,
            after: None,
        });
        for key in [mv.start_coords, mv.end_coords] {
            mv.state.queue(StateChange::SpecialRight {
                coords: key,
                before: self.special_rights.contains(&key),
                after: false,
            });
        }
    }

    /// The default resolution when no special handler consumed the move:
    /// capture whatever stands on the destination, else a plain move.
    fn move_piece_no_special(&self, piece: Piece, mv: &mut Move) {
        match self.position.piece_on(mv.end_coords) {
            Some(captured) => {
                changes::queue_capture(&mut mv.changes, piece, mv.end_coords, captured)
            }
            None => changes::queue_move_piece(&mut mv.changes, piece, mv.end_coords),
        }
    }

    /// Records the move-rule counter update: reset on a capture or pawn
    /// move, otherwise one more than the current counter.
    fn increment_move_rule(&self, mv: &mut Move, was_capture: bool) {
        let Some(current) = self.move_rule_state else {
            return;
        };
        let after = if was_capture || mv.kind.raw == RawType::Pawn {
            0
        } else {
            current + 1
        };
        mv.state.queue(StateChange::MoveRule {
            before: current,
            after,
        });
    }

    /// Replays a move's board changes and state records against the live
    /// game. The generation-index guard catches desynchronized history
    /// navigation before it can corrupt the position; a mismatch is fatal.
    pub fn apply_move(&mut self, mv: &Move, forward: bool, global: bool) {
        let at = self.move_index + if forward { 0 } else { 1 };
        if at != mv.generate_index {
            panic!(
                "move was generated for index {} but applied at {} (forward: {})",
                mv.generate_index, at, forward
            );
        }

        changes::apply_changes(&mut self.position, &mv.changes, forward)
            .expect("invalid move: board changes desynced from the position");
        state::apply_move_state(self, &mv.state, forward, global);
    }

    /// The sole forward-authoritative entry point: advances the cursor,
    /// appends the move, recomputes the turn, applies globally, and
    /// recomputes the check state for the side now to move.
    pub fn make_move(&mut self, mv: Move) {
        self.move_index += 1;
        self.update_turn();
        self.apply_move(&mv, true, true);
        self.moves.push(mv);

        self.create_check_state();
        if self.in_check.is_some() {
            self.moves
                .last_mut()
                .expect("move was just pushed")
                .set_check();
        }
    }

    /// The sole entry point for undoing the most recently applied move.
    /// Panics when no move has been played; that is caller misuse.
    pub fn rewind_move(&mut self) {
        let mv = self
            .moves
            .pop()
            .expect("cannot rewind a game with no moves played");
        self.move_index -= 1;
        self.apply_move(&mv, false, true);
        self.update_turn();
    }

    fn update_turn(&mut self) {
        self.whos_turn = self.turn_at_move_index(self.move_index);
    }

    /// Computes the check state for the side now to move, records it as
    /// global state on the just-pushed move, and caches it on the game.
    /// Attackers are enumerated only when an opponent of that side can win
    /// by checkmate; other win conditions never need the attacker list.
    fn create_check_state(&mut self) {
        let (check, attackers) = self.compute_check_state();
        let check_record = StateChange::Check {
            before: self.in_check.clone(),
            after: check.clone(),
        };
        let attackers_record = StateChange::Attackers {
            before: self.attackers.clone(),
            after: attackers.clone(),
        };
        self.in_check = check;
        self.attackers = attackers;

        let mv = self
            .moves
            .last_mut()
            .expect("check state is created for the latest move");
        mv.state.queue(check_record);
        mv.state.queue(attackers_record);
    }

    /// Recomputes and caches the check state for the current position
    /// without touching the move list.
    pub fn update_in_check(&mut self) {
        let (check, attackers) = self.compute_check_state();
        self.in_check = check;
        self.attackers = attackers;
    }

    fn compute_check_state(&self) -> (Option<Vec<Coord>>, Vec<check::Attacker>) {
        let side = self.turn_at_move_index(self.move_index);
        let track = self
            .rules
            .opponents_use_win_condition(side, WinCondition::Checkmate);
        let mut attackers = Vec::new();
        let check = check::detect_check(
            self,
            side,
            if track { Some(&mut attackers) } else { None },
        );
        (check, attackers)
    }

    /// Walks the cursor's value (not the cursor itself) one step at a time
    /// toward `target`, handing each visited move to the callback. The
    /// callback must not mutate the board.
    pub fn for_each_move(
        &self,
        target: isize,
        mut callback: impl FnMut(&Move),
    ) -> Result<(), HistoryError> {
        if target == self.move_index {
            return Ok(());
        }

        let forwards = target >= self.move_index;
        let offset: isize = if forwards { 0 } else { 1 };
        if self.moves.len() as isize <= target + offset || target + offset < 0 {
            return Err(HistoryError::TargetOutsideMoveList(target));
        }

        let mut i = self.move_index;
        while i != target {
            i = move_towards(i, target, 1);
            callback(&self.moves[(i + offset) as usize]);
        }
        Ok(())
    }

    /// Walks the live cursor one step at a time toward `target`, updating
    /// `move_index` before each callback so the callback (which is
    /// responsible for the actual board mutation, typically `apply_move`)
    /// observes a consistent cursor. Fails before any mutation when the
    /// target is outside the move list.
    pub fn goto_move(
        &mut self,
        target: isize,
        mut callback: impl FnMut(&mut GameState, &Move),
    ) -> Result<(), HistoryError> {
        if target == self.move_index {
            return Ok(());
        }

        let forwards = target >= self.move_index;
        let offset: isize = if forwards { 0 } else { 1 };
        if self.moves.len() as isize <= target + offset || target + offset < 0 {
            return Err(HistoryError::TargetOutsideMoveList(target));
        }

        let mut i = self.move_index;
        while i != target {
            i = move_towards(i, target, 1);
            let mv = self.moves[(i + offset) as usize].clone();
            self.move_index = i;
            callback(self, &mv);
        }
        Ok(())
    }

    /// Reconstructs and plays an entire game from compact move strings.
    /// Requires an empty move list; the first malformed entry aborts the
    /// whole load and the game must be treated as invalid by the caller.
    pub fn make_all_moves_in_game(&mut self, moves: &[String]) -> Result<(), HistoryError> {
        if !self.moves.is_empty() {
            return Err(HistoryError::MovesAlreadyPlayed(self.moves.len()));
        }

        for (index, shortmove) in moves.iter().enumerate() {
            let mv = self.calculate_move_from_compact(shortmove).ok_or_else(|| {
                HistoryError::InvalidMove {
                    index,
                    text: shortmove.clone(),
                }
            })?;
            self.make_move(mv);
        }
        tracing::debug!(moves = moves.len(), "loaded game from compact move list");
        Ok(())
    }

    /// Builds a move from compact notation: decodes start/end/promotion,
    /// then re-derives the en-passant and castle flags by matching the end
    /// square against the piece's legal special destinations. Reports
    /// failure as absence after logging; no legality check is performed.
    pub fn calculate_move_from_compact(&self, shortmove: &str) -> Option<Move> {
        if !self.viewing_latest_move() {
            tracing::error!("cannot calculate a move while viewing a past position");
            return None;
        }

        let mut draft = match notation::decode_compact_move(shortmove) {
            Ok(draft) => draft,
            Err(err) => {
                tracing::error!(%err, shortmove, "failed to decode compact move");
                return None;
            }
        };

        let piece = self.position.piece_on(draft.start_coords)?;
        let specials = movegen::calculate(
            self,
            piece,
            CalcOptions {
                only_calc_specials: true,
            },
        )
        .specials;
        for dest in &specials {
            if dest.coords == draft.end_coords {
                movegen::transfer_special_flags(dest, &mut draft);
                break;
            }
        }

        match self.generate_move(&draft) {
            Ok(mv) => Some(mv),
            Err(err) => {
                tracing::error!(%err, shortmove, "failed to expand compact move");
                None
            }
        }
    }

    /// Generates and plays a move, runs the callback against the mutated
    /// game, and rewinds before returning — on every exit path, panics
    /// included — leaving the game byte-for-bit identical. Nesting is
    /// supported; the generation-index guard catches misordered nesting.
    pub fn simulate_move_wrapper<R>(
        &mut self,
        draft: &MoveDraft,
        callback: impl FnOnce(&mut GameState) -> R,
    ) -> Result<R, MoveError> {
        let mv = self.generate_move(draft)?;
        self.make_move(mv);

        let guard = RewindOnExit { game: self };
        let info = callback(&mut *guard.game);
        Ok(info)
    }

    /// Whether `player` would stand in check after playing `draft`.
    pub fn get_simulated_check(
        &mut self,
        draft: &MoveDraft,
        player: Player,
    ) -> Result<bool, MoveError> {
        self.simulate_move_wrapper(draft, |game| {
            check::detect_check(game, player, None).is_some()
        })
    }
}

/// Scoped-acquisition rewind: dropping the guard rewinds the simulated
/// move, so every exit path out of the callback — return, early `?`, or
/// unwind — restores the game.
struct RewindOnExit<'a> {
    game: &'a mut GameState,
}

impl Drop for RewindOnExit<'_> {
    fn drop(&mut self) {
        self.game.rewind_move();
    }
}
