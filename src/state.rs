// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The state log: reversible records of every non-board gamefile property a
//! move touches. Local records (en passant, special rights, the move-rule
//! counter) replay on every forward/rewind; global records (the cached check
//! result and attacker list) replay only on authoritative transitions.

use crate::{check::Attacker, core::Coord, game::GameState};

/// A single reversible property mutation, carrying both the value before and
/// the value after. `SpecialRight` is the keyed-by-coordinate variant; the
/// rest are scalar gamefile properties.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    EnPassant {
        before: Option<Coord>,
        after: Option<Coord>,
    },
    SpecialRight {
        coords: Coord,
        before: bool,
        after: bool,
    },
    MoveRule {
        before: u32,
        after: u32,
    },
    Check {
        before: Option<Vec<Coord>>,
        after: Option<Vec<Coord>>,
    },
    Attackers {
        before: Vec<Attacker>,
        after: Vec<Attacker>,
    },
}

impl StateChange {
    /// Global records hold derived/cached state and are skipped on
    /// non-authoritative replays.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            StateChange::Check { .. } | StateChange::Attackers { .. }
        )
    }
}

/// The state records attached to one move, split into the always-replayed
/// local sub-list and the authoritative-only global sub-list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveState {
    pub local: Vec<StateChange>,
    pub global: Vec<StateChange>,
}

impl MoveState {
    /// Files a record under the correct sub-list. Multiple records for the
    /// same property are allowed; replay order makes the last one win going
    /// forward and the first one win going backward.
    pub fn queue(&mut self, change: StateChange) {
        if change.is_global() {
            self.global.push(change);
        } else {
            self.local.push(change);
        }
    }
}

/// Replays one record against the live gamefile properties.
pub fn apply_state(game: &mut GameState, change: &StateChange, forward: bool) {
    match change {
        StateChange::EnPassant { before, after } => {
            game.en_passant = if forward { *after } else { *before };
        }
        StateChange::SpecialRight {
            coords,
            before,
            after,
        } => {
            let value = if forward { *after } else { *before };
            if value {
                game.special_rights.insert(*coords);
            } else {
                game.special_rights.remove(coords);
            }
        }
        StateChange::MoveRule { before, after } => {
            game.move_rule_state = Some(if forward { *after } else { *before });
        }
        StateChange::Check { before, after } => {
            game.in_check = if forward { after.clone() } else { before.clone() };
        }
        StateChange::Attackers { before, after } => {
            game.attackers = if forward { after.clone() } else { before.clone() };
        }
    }
}

/// Replays a move's state records: local always, global only when the caller
/// declares the transition authoritative. Backward replay walks each list in
/// reverse order.
pub fn apply_move_state(game: &mut GameState, state: &MoveState, forward: bool, global: bool) {
    if forward {
        for change in &state.local {
            apply_state(game, change, true);
        }
        if global {
            for change in &state.global {
                apply_state(game, change, true);
            }
        }
    } else {
        if global {
            for change in state.global.iter().rev() {
                apply_state(game, change, false);
            }
        }
        for change in state.local.iter().rev() {
            apply_state(game, change, false);
        }
    }
}
