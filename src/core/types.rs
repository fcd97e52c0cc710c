// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unknown piece abbreviation: {0}")]
    UnknownAbbreviation(String),
    #[error("mixed-case piece abbreviation: {0}")]
    MixedCase(String),
    #[error("invalid player number: {0}")]
    InvalidPlayer(String),
    #[error("empty piece abbreviation")]
    Empty,
}

/// A seat at the board. Games may have more than two players, and neutral
/// pieces (obstacles, converted gargoyles) belong to no seat at all.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Player(pub u8);

pub const NEUTRAL: Player = Player(0);
pub const WHITE: Player = Player(1);
pub const BLACK: Player = Player(2);

impl Player {
    pub fn is_neutral(self) -> bool {
        self == NEUTRAL
    }

    /// The rank direction this seat's pawns advance in.
    pub fn pawn_direction(self) -> i64 {
        if self == BLACK {
            -1
        } else {
            1
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every piece kind the engine can express, color-stripped. Variants choose
/// a subset; the moveset table in `movesets` gives each its movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Guard,
    Chancellor,
    Archbishop,
    Amazon,
    Camel,
    Zebra,
    Knightrider,
    Centaur,
    RoyalCentaur,
    RoyalQueen,
    Hawk,
    Obstacle,
    Void,
}

impl RawType {
    /// The notation abbreviation, as used by the compact move and position
    /// codecs. Casing is applied by the owning `PieceType`.
    pub const fn abbrev(self) -> &'static str {
        match self {
            RawType::Pawn => "P",
            RawType::Knight => "N",
            RawType::Bishop => "B",
            RawType::Rook => "R",
            RawType::Queen => "Q",
            RawType::King => "K",
            RawType::Guard => "GU",
            RawType::Chancellor => "CH",
            RawType::Archbishop => "AR",
            RawType::Amazon => "AM",
            RawType::Camel => "CA",
            RawType::Zebra => "ZE",
            RawType::Knightrider => "NR",
            RawType::Centaur => "CE",
            RawType::RoyalCentaur => "RC",
            RawType::RoyalQueen => "RQ",
            RawType::Hawk => "HA",
            RawType::Obstacle => "OB",
            RawType::Void => "VO",
        }
    }

    pub fn from_abbrev(s: &str) -> Option<RawType> {
        let upper = s.to_ascii_uppercase();
        raw_types().find(|raw| raw.abbrev() == upper)
    }

    /// Royal pieces are the ones check detection protects.
    pub const fn is_royal(self) -> bool {
        matches!(
            self,
            RawType::King | RawType::RoyalCentaur | RawType::RoyalQueen
        )
    }

    /// Neutral obstructions never move, and the void cannot even be captured.
    pub const fn is_immovable(self) -> bool {
        matches!(self, RawType::Obstacle | RawType::Void)
    }
}

pub fn raw_types() -> ::std::vec::IntoIter<RawType> {
    vec![
        RawType::Pawn,
        RawType::Knight,
        RawType::Bishop,
        RawType::Rook,
        RawType::Queen,
        RawType::King,
        RawType::Guard,
        RawType::Chancellor,
        RawType::Archbishop,
        RawType::Amazon,
        RawType::Camel,
        RawType::Zebra,
        RawType::Knightrider,
        RawType::Centaur,
        RawType::RoyalCentaur,
        RawType::RoyalQueen,
        RawType::Hawk,
        RawType::Obstacle,
        RawType::Void,
    ]
    .into_iter()
}

/// A colored piece identifier: the raw kind plus the owning seat.
///
/// The display form is the abbreviation cased by owner — uppercase for
/// player 1, lowercase for player 2 — with every other seat (neutral
/// included) spelled `ABBREV(n)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceType {
    pub raw: RawType,
    pub player: Player,
}

impl PieceType {
    pub const fn new(raw: RawType, player: Player) -> PieceType {
        PieceType { raw, player }
    }

    pub const fn neutral(raw: RawType) -> PieceType {
        PieceType::new(raw, NEUTRAL)
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrev = self.raw.abbrev();
        match self.player {
            WHITE => write!(f, "{}", abbrev),
            BLACK => write!(f, "{}", abbrev.to_ascii_lowercase()),
            other => write!(f, "{}({})", abbrev, other.0),
        }
    }
}

impl FromStr for PieceType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<PieceType, TypeParseError> {
        if s.is_empty() {
            return Err(TypeParseError::Empty);
        }

        let (letters, player) = match s.split_once('(') {
            Some((letters, rest)) => {
                let digits = rest
                    .strip_suffix(')')
                    .ok_or_else(|| TypeParseError::InvalidPlayer(rest.to_string()))?;
                let seat = digits
                    .parse::<u8>()
                    .map_err(|_| TypeParseError::InvalidPlayer(digits.to_string()))?;
                (letters, Player(seat))
            }
            None => {
                let player = if s.chars().all(|c| c.is_ascii_uppercase()) {
                    WHITE
                } else if s.chars().all(|c| c.is_ascii_lowercase()) {
                    BLACK
                } else {
                    return Err(TypeParseError::MixedCase(s.to_string()));
                };
                (s, player)
            }
        };

        let raw = RawType::from_abbrev(letters)
            .ok_or_else(|| TypeParseError::UnknownAbbreviation(letters.to_string()))?;
        Ok(PieceType::new(raw, player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbrev_round_trip() {
        for raw in raw_types() {
            assert_eq!(Some(raw), RawType::from_abbrev(raw.abbrev()));
        }
    }

    #[test]
    fn display_casing() {
        assert_eq!("Q", PieceType::new(RawType::Queen, WHITE).to_string());
        assert_eq!("q", PieceType::new(RawType::Queen, BLACK).to_string());
        assert_eq!("ch", PieceType::new(RawType::Chancellor, BLACK).to_string());
        assert_eq!("OB(0)", PieceType::neutral(RawType::Obstacle).to_string());
        assert_eq!("Q(3)", PieceType::new(RawType::Queen, Player(3)).to_string());
    }

    #[test]
    fn parse_round_trip() {
        for piece in [
            PieceType::new(RawType::Knightrider, WHITE),
            PieceType::new(RawType::Pawn, BLACK),
            PieceType::new(RawType::Guard, Player(4)),
            PieceType::neutral(RawType::Void),
        ] {
            assert_eq!(piece, piece.to_string().parse().unwrap());
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            TypeParseError::UnknownAbbreviation("ZZ".to_string()),
            "ZZ".parse::<PieceType>().unwrap_err()
        );
        assert_eq!(
            TypeParseError::MixedCase("Ch".to_string()),
            "Ch".parse::<PieceType>().unwrap_err()
        );
        assert_eq!(
            TypeParseError::InvalidPlayer("x".to_string()),
            "Q(x)".parse::<PieceType>().unwrap_err()
        );
        assert_eq!(TypeParseError::Empty, "".parse::<PieceType>().unwrap_err());
    }

    #[test]
    fn royalty() {
        assert!(RawType::King.is_royal());
        assert!(RawType::RoyalQueen.is_royal());
        assert!(!RawType::Queen.is_royal());
    }

    #[test]
    fn pawn_directions() {
        assert_eq!(1, WHITE.pawn_direction());
        assert_eq!(-1, BLACK.pawn_direction());
        assert_eq!(1, Player(3).pawn_direction());
    }
}
