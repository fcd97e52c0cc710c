// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece movement tables and the derived "vicinity" lookups.
//!
//! A moveset is a list of fixed jumps plus a list of slide direction
//! vectors; oblique directions express riders like the knightrider. The
//! vicinity inverts the jump table over the types that exist in a game, so
//! check detection can ask "which kinds of piece could attack this square
//! from that offset" without touching the movesets again.

use std::collections::HashMap;

use crate::core::{Coord, RawType};

/// The movement capabilities of one raw piece type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Moveset {
    /// Fixed jumps, as offsets from the piece. Symmetric for every jumper
    /// in the built-in table.
    pub individual: Vec<Coord>,
    /// Slide direction vectors; each covers both signs of travel.
    pub sliding: Vec<Coord>,
}

/// Offset → raw types able to jump that offset.
pub type Vicinity = HashMap<Coord, Vec<RawType>>;

fn jumps(offsets: &[(i64, i64)]) -> Vec<Coord> {
    offsets.iter().map(|&(x, y)| Coord::new(x, y)).collect()
}

/// Jumps at every signed permutation of (a, b).
fn leaps(a: i64, b: i64) -> Vec<Coord> {
    let mut out = Vec::new();
    for &(x, y) in &[(a, b), (b, a)] {
        for sx in [1, -1] {
            for sy in [1, -1] {
                let jump = Coord::new(x * sx, y * sy);
                if !out.contains(&jump) {
                    out.push(jump);
                }
            }
        }
    }
    out
}

fn king_ring() -> Vec<Coord> {
    jumps(&[
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ])
}

fn orthogonals() -> Vec<Coord> {
    jumps(&[(1, 0), (0, 1)])
}

fn diagonals() -> Vec<Coord> {
    jumps(&[(1, 1), (1, -1)])
}

fn royal_compound() -> Vec<Coord> {
    let mut dirs = orthogonals();
    dirs.extend(diagonals());
    dirs
}

/// The full built-in moveset table. Pawns have no table entry movement:
/// their pushes and captures are generated by the special-move machinery.
pub fn movesets() -> HashMap<RawType, Moveset> {
    let mut table = HashMap::new();
    let mut insert = |raw: RawType, individual: Vec<Coord>, sliding: Vec<Coord>| {
        table.insert(
            raw,
            Moveset {
                individual,
                sliding,
            },
        );
    };

    insert(RawType::Pawn, Vec::new(), Vec::new());
    insert(RawType::Knight, leaps(1, 2), Vec::new());
    insert(RawType::Bishop, Vec::new(), diagonals());
    insert(RawType::Rook, Vec::new(), orthogonals());
    insert(RawType::Queen, Vec::new(), royal_compound());
    insert(RawType::King, king_ring(), Vec::new());
    insert(RawType::Guard, king_ring(), Vec::new());
    insert(RawType::Chancellor, leaps(1, 2), orthogonals());
    insert(RawType::Archbishop, leaps(1, 2), diagonals());
    insert(RawType::Amazon, leaps(1, 2), royal_compound());
    insert(RawType::Camel, leaps(1, 3), Vec::new());
    insert(RawType::Zebra, leaps(2, 3), Vec::new());
    // Slide vectors are bidirectional, so keep one canonical half of the
    // knight star.
    let oblique: Vec<Coord> = leaps(1, 2).into_iter().filter(|d| d.x > 0).collect();
    insert(RawType::Knightrider, Vec::new(), oblique);
    insert(RawType::Centaur, [king_ring(), leaps(1, 2)].concat(), Vec::new());
    insert(
        RawType::RoyalCentaur,
        [king_ring(), leaps(1, 2)].concat(),
        Vec::new(),
    );
    insert(RawType::RoyalQueen, Vec::new(), royal_compound());
    insert(RawType::Hawk, [leaps(2, 0), leaps(2, 2), leaps(3, 0), leaps(3, 3)].concat(), Vec::new());
    insert(RawType::Obstacle, Vec::new(), Vec::new());
    insert(RawType::Void, Vec::new(), Vec::new());

    table
}

/// Inverts the jump tables of the game's existing types: a piece of type `t`
/// standing at `square + offset` attacks `square` exactly when
/// `vicinity[offset]` contains `t`.
pub fn gen_vicinity(
    existing_raw: &[RawType],
    movesets: &HashMap<RawType, Moveset>,
) -> Vicinity {
    let mut vicinity: Vicinity = HashMap::new();
    for &raw in existing_raw {
        let Some(moveset) = movesets.get(&raw) else {
            continue;
        };
        for &jump in &moveset.individual {
            vicinity.entry(-jump).or_default().push(raw);
        }
    }
    vicinity
}

/// Vicinity restricted to special-move captures: the squares a pawn could
/// capture (or en-passant capture) across. Both rank directions are listed;
/// attack checks verify the owner's actual direction.
pub fn gen_special_vicinity(existing_raw: &[RawType]) -> Vicinity {
    let mut vicinity: Vicinity = HashMap::new();
    if existing_raw.contains(&RawType::Pawn) {
        for offset in jumps(&[(1, 1), (-1, 1), (1, -1), (-1, -1)]) {
            vicinity.insert(offset, vec![RawType::Pawn]);
        }
    }
    vicinity
}
