// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordParseError {
    #[error("expected two comma-separated integers: {0}")]
    MissingComponent(String),
    #[error("invalid integer: {0}")]
    InvalidInteger(String),
}

/// A square on the board.
///
/// Boards are unbounded in every direction, so coordinates are signed and
/// arbitrarily large within machine limits. `Coord` is the canonical key for
/// everything keyed by square: the piece map, the special-rights set, and the
/// vicinity tables all hash it directly.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const fn new(x: i64, y: i64) -> Coord {
        Coord { x, y }
    }

    /// Chebyshev distance to another square.
    pub fn dist(self, other: Coord) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl Mul<i64> for Coord {
    type Output = Coord;

    fn mul(self, rhs: i64) -> Coord {
        Coord::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Coord, CoordParseError> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| CoordParseError::MissingComponent(s.to_string()))?;
        let x = x
            .parse()
            .map_err(|_| CoordParseError::InvalidInteger(x.to_string()))?;
        let y = y
            .parse()
            .map_err(|_| CoordParseError::InvalidInteger(y.to_string()))?;
        Ok(Coord::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trip() {
        let coord = Coord::new(-3, 141);
        assert_eq!("-3,141", coord.to_string());
        assert_eq!(coord, coord.to_string().parse().unwrap());
    }

    #[test]
    fn missing_comma() {
        let err = "42".parse::<Coord>().unwrap_err();
        assert_eq!(CoordParseError::MissingComponent("42".to_string()), err);
    }

    #[test]
    fn bad_integer() {
        let err = "4,two".parse::<Coord>().unwrap_err();
        assert_eq!(CoordParseError::InvalidInteger("two".to_string()), err);
    }

    #[test]
    fn offset_math() {
        let a = Coord::new(8, 7);
        assert_eq!(Coord::new(8, 8), a + Coord::new(0, 1));
        assert_eq!(Coord::new(0, -1), Coord::new(8, 6) - a);
        assert_eq!(Coord::new(-8, -7), -a);
        assert_eq!(Coord::new(16, 14), a * 2);
        assert_eq!(3, a.dist(Coord::new(5, 8)));
    }
}
