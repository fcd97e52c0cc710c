// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Variant initialization: resolving a variant name (and optional version
//! date) or an explicit options object into the immutable start snapshot
//! and game rules a new game is built from.

use std::collections::{BTreeSet, HashMap, HashSet};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::{raw_types, Coord, PieceType, Player, RawType, NEUTRAL},
    notation::{self, NotationError},
    position::Position,
    rules::{GameRules, Promotions, WinCondition, WinConditionParseError},
};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum VariantError {
    #[error("unknown variant: {0}")]
    UnknownVariant(String),
    #[error("variant {0} has no version in effect at {1}")]
    UnknownVersion(String, String),
    #[error("neither a variant name nor a starting position was provided")]
    NoPosition,
    #[error("malformed move-rule pair (expected \"state/max\"): {0}")]
    BadMoveRule(String),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    WinCondition(#[from] WinConditionParseError),
}

/// Game metadata, as carried by saved games: the variant name and an
/// optional `YYYY.MM.DD` date selecting the variant version in effect then.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Explicit setup options, used when reconstructing a pasted or loaded
/// position instead of looking a variant up. The caller's `GameRules` are
/// taken wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantOptions {
    /// Compact position string, rights markers included. When absent the
    /// variant named in the metadata supplies the position.
    #[serde(default)]
    pub position_string: Option<String>,
    #[serde(default)]
    pub en_passant: Option<Coord>,
    /// Current move-rule state as a `"state/max"` pair; `max` is injected
    /// into the game rules.
    #[serde(default)]
    pub move_rule: Option<String>,
    #[serde(default)]
    pub full_move: Option<u32>,
    pub game_rules: GameRules,
}

/// A saved game document: how games travel between sessions. The move list
/// is positional and consumed strictly front-to-back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub options: Option<VariantOptions>,
    #[serde(default)]
    pub moves: Vec<String>,
}

/// Immutable snapshot of the starting state of a game, taken before any
/// move is forwarded.
#[derive(Clone, Debug, PartialEq)]
pub struct StartSnapshot {
    pub position: Position,
    pub position_string: String,
    pub special_rights: HashSet<Coord>,
    pub en_passant: Option<Coord>,
    pub full_move: u32,
    /// Initial move-rule counter; present exactly when the rule is active.
    pub move_rule_state: Option<u32>,
    /// Distinct players in the turn order; repeats count once.
    pub player_count: usize,
    /// Every piece identifier that can ever appear in this game, promotion
    /// and neutral-conversion targets included.
    pub existing_types: Vec<PieceType>,
    pub existing_raw_types: Vec<RawType>,
}

struct VariantVersion {
    /// First date this version was in effect, `YYYY.MM.DD` (lexical order
    /// is chronological order).
    date: &'static str,
    position: &'static str,
    rules: fn() -> GameRules,
}

const CLASSICAL_POSITION: &str = "R1,1+|N2,1|B3,1|Q4,1|K5,1+|B6,1|N7,1|R8,1+\
|P1,2+|P2,2+|P3,2+|P4,2+|P5,2+|P6,2+|P7,2+|P8,2+\
|p1,7+|p2,7+|p3,7+|p4,7+|p5,7+|p6,7+|p7,7+|p8,7+\
|r1,8+|n2,8|b3,8|q4,8|k5,8+|b6,8|n7,8|r8,8+";

const CLASSICAL_PLUS_POSITION: &str = "CH1,1+|N2,1|B3,1|Q4,1|K5,1+|B6,1|N7,1|CH8,1+\
|P1,2+|P2,2+|P3,2+|P4,2+|P5,2+|P6,2+|P7,2+|P8,2+\
|p1,7+|p2,7+|p3,7+|p4,7+|p5,7+|p6,7+|p7,7+|p8,7+\
|ch1,8+|n2,8|b3,8|q4,8|k5,8+|b6,8|n7,8|ch8,8+";

const CLASSICAL_PLUS_POSITION_V2: &str = "CH1,1+|N2,1|B3,1|AM4,1|K5,1+|B6,1|N7,1|CH8,1+\
|P1,2+|P2,2+|P3,2+|P4,2+|P5,2+|P6,2+|P7,2+|P8,2+\
|p1,7+|p2,7+|p3,7+|p4,7+|p5,7+|p6,7+|p7,7+|p8,7+\
|ch1,8+|n2,8|b3,8|am4,8|k5,8+|b6,8|n7,8|ch8,8+";

fn classical_plus_rules() -> GameRules {
    let mut rules = GameRules::standard();
    if let Some(promotions) = rules.promotions.as_mut() {
        for allowed in promotions.allowed.values_mut() {
            allowed.push(RawType::Chancellor);
        }
    }
    rules
}

lazy_static! {
    static ref VARIANTS: HashMap<&'static str, Vec<VariantVersion>> = {
        let mut variants = HashMap::new();
        variants.insert(
            "Classical",
            vec![VariantVersion {
                date: "2023.01.01",
                position: CLASSICAL_POSITION,
                rules: GameRules::standard,
            }],
        );
        variants.insert(
            "Classical_Plus",
            vec![
                VariantVersion {
                    date: "2024.03.01",
                    position: CLASSICAL_PLUS_POSITION,
                    rules: classical_plus_rules,
                },
                VariantVersion {
                    date: "2025.01.15",
                    position: CLASSICAL_PLUS_POSITION_V2,
                    rules: classical_plus_rules,
                },
            ],
        );
        variants
    };
}

fn lookup(name: &str, date: Option<&str>) -> Result<&'static VariantVersion, VariantError> {
    let versions = VARIANTS
        .get(name)
        .ok_or_else(|| VariantError::UnknownVariant(name.to_string()))?;
    match date {
        // Latest version when no date is requested.
        None => Ok(versions.last().expect("registry entries are non-empty")),
        Some(date) => versions
            .iter()
            .rev()
            .find(|version| version.date <= date)
            .ok_or_else(|| VariantError::UnknownVersion(name.to_string(), date.to_string())),
    }
}

/// Resolves the start snapshot and game rules for a new game.
///
/// Path A resolves the variant named in the metadata against the registry.
/// Path B (`options` present) takes the caller's position and rules
/// wholesale, falling back to the registry only for a missing position.
/// Editor mode widens `existing_types` to everything placeable.
pub fn setup(
    metadata: &Metadata,
    options: Option<VariantOptions>,
    editor: bool,
) -> Result<(StartSnapshot, GameRules), VariantError> {
    let (position, special_rights, en_passant, full_move, move_rule_state, rules) = match options
    {
        None => {
            let name = metadata.variant.as_deref().ok_or(VariantError::NoPosition)?;
            let version = lookup(name, metadata.date.as_deref())?;
            let (position, special_rights) = notation::decode_position(version.position)?;
            let rules = (version.rules)();
            // Every variant starts at full move 1 with a zeroed move-rule
            // counter.
            let move_rule_state = rules.move_rule.map(|_| 0);
            (position, special_rights, None, 1, move_rule_state, rules)
        }
        Some(options) => {
            let mut rules = options.game_rules;
            let (position, special_rights) = match options.position_string.as_deref() {
                Some(position_string) => notation::decode_position(position_string)?,
                None => {
                    let name =
                        metadata.variant.as_deref().ok_or(VariantError::NoPosition)?;
                    let version = lookup(name, metadata.date.as_deref())?;
                    notation::decode_position(version.position)?
                }
            };
            let move_rule_state = match options.move_rule.as_deref() {
                Some(pair) => {
                    let (state, max) = pair
                        .split_once('/')
                        .ok_or_else(|| VariantError::BadMoveRule(pair.to_string()))?;
                    let state: u32 = state
                        .parse()
                        .map_err(|_| VariantError::BadMoveRule(pair.to_string()))?;
                    let max: u32 = max
                        .parse()
                        .map_err(|_| VariantError::BadMoveRule(pair.to_string()))?;
                    rules.move_rule = Some(max);
                    Some(state)
                }
                None => rules.move_rule.map(|_| 0),
            };
            (
                position,
                special_rights,
                options.en_passant,
                options.full_move.unwrap_or(1),
                move_rule_state,
                rules,
            )
        }
    };

    let player_count = rules.turn_order.iter().collect::<HashSet<_>>().len();
    let (existing_types, existing_raw_types) = existing_types(&position, &rules, editor);

    tracing::debug!(
        pieces = position.len(),
        player_count,
        types = existing_types.len(),
        "variant initialized"
    );

    let position_string = notation::encode_position(&position, &special_rights);
    let snapshot = StartSnapshot {
        position,
        position_string,
        special_rights,
        en_passant,
        full_move,
        move_rule_state,
        player_count,
        existing_types,
        existing_raw_types,
    };
    Ok((snapshot, rules))
}

/// Computes the closure of piece identifiers this game can ever contain:
/// the starting position, every promotion target, and — when any seat
/// numbered 3 or higher is in the turn order — the neutral variant of every
/// raw type present, since gargoyles may appear when such a player dies.
/// Editor mode instead includes every raw type for every seat.
fn existing_types(
    position: &Position,
    rules: &GameRules,
    editor: bool,
) -> (Vec<PieceType>, Vec<RawType>) {
    let mut types: BTreeSet<PieceType> = BTreeSet::new();

    if editor {
        let mut seats: BTreeSet<Player> = rules.turn_order.iter().copied().collect();
        seats.insert(NEUTRAL);
        for raw in raw_types() {
            for &seat in &seats {
                types.insert(PieceType::new(raw, seat));
            }
        }
    } else {
        for (_, kind) in position.iter() {
            types.insert(kind);
        }
        if let Some(Promotions { allowed, .. }) = rules.promotions.as_ref() {
            for (&player, raws) in allowed {
                for &raw in raws {
                    types.insert(PieceType::new(raw, player));
                }
            }
        }
        if rules.turn_order.iter().any(|player| player.0 >= 3) {
            let present: Vec<RawType> = types.iter().map(|kind| kind.raw).collect();
            for raw in present {
                types.insert(PieceType::neutral(raw));
            }
        }
    }

    let existing_raw: BTreeSet<RawType> = types.iter().map(|kind| kind.raw).collect();
    (
        types.into_iter().collect(),
        existing_raw.into_iter().collect(),
    )
}

/// Win conditions referenced by name, e.g. from documents; unknown names
/// are a configuration error.
pub fn parse_win_conditions(names: &[&str]) -> Result<Vec<WinCondition>, VariantError> {
    names
        .iter()
        .map(|name| name.parse().map_err(VariantError::from))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::game::GameState;

    /// A game over an empty board with standard two-player rules.
    pub(crate) fn blank_two_player_game() -> GameState {
        let options = VariantOptions {
            position_string: Some(String::new()),
            en_passant: None,
            move_rule: None,
            full_move: None,
            game_rules: GameRules::standard(),
        };
        GameState::new(&Metadata::default(), Some(options)).unwrap()
    }

    /// A game whose position is given in compact form, with standard rules.
    pub(crate) fn game_from_position(position_string: &str) -> GameState {
        let options = VariantOptions {
            position_string: Some(position_string.to_string()),
            en_passant: None,
            move_rule: None,
            full_move: None,
            game_rules: GameRules::standard(),
        };
        GameState::new(&Metadata::default(), Some(options)).unwrap()
    }
}
