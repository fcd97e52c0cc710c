// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check and attack detection over the sparse board.
//!
//! Jump attacks resolve through the precomputed vicinity tables; pawn-style
//! capture attacks through the special vicinity; slide attacks by direction
//! alignment plus a blocker scan over the pieces standing between.

use crate::{
    core::{Coord, PieceType, Player},
    game::GameState,
    position::Position,
};

/// A piece currently attacking a royal. `sliding` distinguishes attacks
/// that arrive along a slide (and can be blocked) from jump attacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attacker {
    pub coords: Coord,
    pub sliding: bool,
}

/// Returns the coordinates of every royal of `player` currently in check,
/// or `None` when the player is safe. When `attackers` is supplied it is
/// filled with the checking pieces, deduplicated across royals.
pub fn detect_check(
    game: &GameState,
    player: Player,
    mut attackers: Option<&mut Vec<Attacker>>,
) -> Option<Vec<Coord>> {
    let mut royals_in_check = Vec::new();
    for royal in game.position().royals_of(player) {
        let mut found = Vec::new();
        if collect_attackers(game, player, royal, &mut found) {
            royals_in_check.push(royal);
            if let Some(out) = attackers.as_mut() {
                for attacker in found {
                    if !out.contains(&attacker) {
                        out.push(attacker);
                    }
                }
            }
        }
    }

    if royals_in_check.is_empty() {
        None
    } else {
        Some(royals_in_check)
    }
}

/// Whether any hostile piece attacks `square`. Used for castle-path
/// legality.
pub fn is_square_attacked(game: &GameState, defender: Player, square: Coord) -> bool {
    let mut found = Vec::new();
    collect_attackers(game, defender, square, &mut found)
}

fn hostile(kind: PieceType, defender: Player) -> bool {
    kind.player != defender && !kind.player.is_neutral() && !kind.raw.is_immovable()
}

fn collect_attackers(
    game: &GameState,
    defender: Player,
    target: Coord,
    out: &mut Vec<Attacker>,
) -> bool {
    // Jumpers, via the vicinity table.
    for (&offset, types) in game.vicinity() {
        let from = target + offset;
        if let Some(piece) = game.position().piece_on(from) {
            if hostile(piece.kind, defender) && types.contains(&piece.kind.raw) {
                out.push(Attacker {
                    coords: from,
                    sliding: false,
                });
            }
        }
    }

    // Pawn-style capture attacks, via the special vicinity. The table lists
    // both rank directions; the owner's actual direction decides.
    for (&offset, types) in game.special_vicinity() {
        let from = target + offset;
        if let Some(piece) = game.position().piece_on(from) {
            let forward = piece.kind.player.pawn_direction();
            if hostile(piece.kind, defender)
                && types.contains(&piece.kind.raw)
                && from.y + forward == target.y
            {
                out.push(Attacker {
                    coords: from,
                    sliding: false,
                });
            }
        }
    }

    // Sliders: alignment plus a clear path.
    for (coords, kind) in game.position().iter() {
        if coords == target || !hostile(kind, defender) {
            continue;
        }
        let Some(moveset) = game.movesets().get(&kind.raw) else {
            continue;
        };
        for &dir in &moveset.sliding {
            if slides_to(game.position(), coords, dir, target) {
                out.push(Attacker {
                    coords,
                    sliding: true,
                });
                break;
            }
        }
    }

    !out.is_empty()
}

/// How many steps of `dir` reach from zero to `delta`, if a whole number of
/// them does. Negative step counts walk the opposite sign of `dir`.
fn steps_along(delta: Coord, dir: Coord) -> Option<i64> {
    if dir.x != 0 {
        if delta.x % dir.x != 0 {
            return None;
        }
        let steps = delta.x / dir.x;
        (delta.y == steps * dir.y).then_some(steps)
    } else {
        if delta.x != 0 || dir.y == 0 || delta.y % dir.y != 0 {
            return None;
        }
        Some(delta.y / dir.y)
    }
}

fn slides_to(position: &Position, from: Coord, dir: Coord, target: Coord) -> bool {
    let Some(steps) = steps_along(target - from, dir) else {
        return false;
    };
    if steps == 0 {
        return false;
    }

    // Any piece a whole number of steps along the same line, strictly
    // between the slider and the target, blocks the attack.
    for (coords, _) in position.iter() {
        if coords == from || coords == target {
            continue;
        }
        if let Some(between) = steps_along(coords - from, dir) {
            let blocked = if steps > 0 {
                between > 0 && between < steps
            } else {
                between < 0 && between > steps
            };
            if blocked {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BLACK, WHITE};
    use crate::variant::tests_support::game_from_position;

    #[test]
    fn rook_checks_along_a_file() {
        let game = game_from_position("K5,1+|r5,100");
        let check = detect_check(&game, WHITE, None).unwrap();
        assert_eq!(vec![Coord::new(5, 1)], check);
        assert_eq!(None, detect_check(&game, BLACK, None));
    }

    #[test]
    fn slide_is_blocked_by_any_piece() {
        let game = game_from_position("K5,1+|N5,4|r5,100");
        assert_eq!(None, detect_check(&game, WHITE, None));
        // hostile blockers block too
        let game = game_from_position("K5,1+|n5,4|r5,100");
        // the knight itself does not attack 5,1 from 5,4
        assert_eq!(None, detect_check(&game, WHITE, None));
    }

    #[test]
    fn knight_checks_by_jump() {
        let game = game_from_position("K5,1+|n6,3");
        let mut attackers = Vec::new();
        let check = detect_check(&game, WHITE, Some(&mut attackers));
        assert_eq!(Some(vec![Coord::new(5, 1)]), check);
        assert_eq!(
            vec![Attacker {
                coords: Coord::new(6, 3),
                sliding: false
            }],
            attackers
        );
    }

    #[test]
    fn pawn_attacks_follow_owner_direction() {
        // a black pawn attacks downward; the white king below is in check
        let game = game_from_position("K5,1+|p6,2");
        assert!(detect_check(&game, WHITE, None).is_some());
        // a white pawn directly below another white royal never checks it,
        // and a black pawn below a black king attacks away from it
        let game = game_from_position("k5,5+|p6,4");
        assert_eq!(None, detect_check(&game, BLACK, None));
    }

    #[test]
    fn sliding_attackers_are_flagged() {
        let game = game_from_position("K5,1+|b8,4");
        let mut attackers = Vec::new();
        detect_check(&game, WHITE, Some(&mut attackers)).unwrap();
        assert_eq!(
            vec![Attacker {
                coords: Coord::new(8, 4),
                sliding: true
            }],
            attackers
        );
    }

    #[test]
    fn double_check_reports_both_attackers() {
        let game = game_from_position("K5,1+|r5,40|n6,3");
        let mut attackers = Vec::new();
        let check = detect_check(&game, WHITE, Some(&mut attackers)).unwrap();
        assert_eq!(vec![Coord::new(5, 1)], check);
        assert_eq!(2, attackers.len());
    }

    #[test]
    fn multiple_royals_each_report() {
        let game = game_from_position("K1,1+|RQ9,1|r1,50|r9,50");
        let check = detect_check(&game, WHITE, None).unwrap();
        assert_eq!(vec![Coord::new(1, 1), Coord::new(9, 1)], check);
    }

    #[test]
    fn square_attack_for_castle_paths() {
        let game = game_from_position("K5,1+|R8,1+|r6,50");
        assert!(is_square_attacked(&game, WHITE, Coord::new(6, 1)));
        assert!(!is_square_attacked(&game, WHITE, Coord::new(7, 1)));
    }

    #[test]
    fn obstacles_never_attack_and_do_block() {
        let game = game_from_position("K5,1+|OB(0)5,4|r5,100");
        assert_eq!(None, detect_check(&game, WHITE, None));
    }

    #[test]
    fn knightrider_slides_through_knight_moves() {
        // knightrider at (1,9) slides (1,-2): (2,7), (3,5), (4,3), (5,1)
        let game = game_from_position("K5,1+|nr1,9");
        assert!(detect_check(&game, WHITE, None).is_some());
        // blocked at an intermediate knight-step
        let game = game_from_position("K5,1+|P3,5|nr1,9");
        assert_eq!(None, detect_check(&game, WHITE, None));
    }
}
