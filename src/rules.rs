// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Player, RawType, BLACK, WHITE};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown win condition: {0}")]
pub struct WinConditionParseError(pub String);

/// The ways a seat can win. Configured per player; a seat without
/// `Checkmate` never needs attacker enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinCondition {
    Checkmate,
    RoyalCapture,
    AllRoyalsCaptured,
    AllPiecesCaptured,
    Koth,
}

impl FromStr for WinCondition {
    type Err = WinConditionParseError;

    fn from_str(s: &str) -> Result<WinCondition, WinConditionParseError> {
        match s {
            "checkmate" => Ok(WinCondition::Checkmate),
            "royalcapture" => Ok(WinCondition::RoyalCapture),
            "allroyalscaptured" => Ok(WinCondition::AllRoyalsCaptured),
            "allpiecescaptured" => Ok(WinCondition::AllPiecesCaptured),
            "koth" => Ok(WinCondition::Koth),
            other => Err(WinConditionParseError(other.to_string())),
        }
    }
}

/// Promotion configuration: the rank each seat promotes on, and the raw
/// types it may promote to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Promotions {
    pub ranks: HashMap<Player, i64>,
    pub allowed: HashMap<Player, Vec<RawType>>,
}

/// Immutable variant configuration, owned by the game and read-only to the
/// move engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// The seat sequence. Longer than the player count when a seat moves
    /// twice per round.
    pub turn_order: Vec<Player>,
    #[serde(default)]
    pub promotions: Option<Promotions>,
    pub win_conditions: HashMap<Player, Vec<WinCondition>>,
    /// The move-rule maximum (in halfmoves), if the rule is in use.
    #[serde(default)]
    pub move_rule: Option<u32>,
}

impl GameRules {
    /// Standard two-player rules: checkmate both sides, 100-halfmove rule,
    /// promotion on ranks 8/1 to the classical set.
    pub fn standard() -> GameRules {
        let allowed = vec![
            RawType::Queen,
            RawType::Rook,
            RawType::Bishop,
            RawType::Knight,
        ];
        GameRules {
            turn_order: vec![WHITE, BLACK],
            promotions: Some(Promotions {
                ranks: HashMap::from([(WHITE, 8), (BLACK, 1)]),
                allowed: HashMap::from([(WHITE, allowed.clone()), (BLACK, allowed)]),
            }),
            win_conditions: HashMap::from([
                (WHITE, vec![WinCondition::Checkmate]),
                (BLACK, vec![WinCondition::Checkmate]),
            ]),
            move_rule: Some(100),
        }
    }

    pub fn player_has_win_condition(&self, player: Player, condition: WinCondition) -> bool {
        self.win_conditions
            .get(&player)
            .map_or(false, |conditions| conditions.contains(&condition))
    }

    /// Whether any seat other than `player` can win by `condition`.
    pub fn opponents_use_win_condition(&self, player: Player, condition: WinCondition) -> bool {
        self.turn_order
            .iter()
            .filter(|&&seat| seat != player)
            .any(|&seat| self.player_has_win_condition(seat, condition))
    }

    /// The promotion rank for `player`, if promotions are configured.
    pub fn promotion_rank(&self, player: Player) -> Option<i64> {
        self.promotions
            .as_ref()
            .and_then(|promotions| promotions.ranks.get(&player).copied())
    }
}
