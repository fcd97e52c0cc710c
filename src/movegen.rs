// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legal-move calculation for a single piece: fixed jumps, blocker-clamped
//! slide runs, and the special-move destinations (en passant, castling)
//! that carry flags the compact notation cannot express. Reconstructing a
//! move from notation matches its end square against these destinations and
//! transfers the flags onto the draft.

use crate::{
    check,
    core::{Coord, Player, RawType},
    game::GameState,
    moves::{CastleDraft, MoveDraft},
    position::Piece,
};

#[derive(Copy, Clone, Debug, Default)]
pub struct CalcOptions {
    /// Restrict output to special-move destinations only.
    pub only_calc_specials: bool,
}

/// A special-move flag attached to a destination square.
#[derive(Clone, Debug, PartialEq)]
pub enum SpecialTag {
    /// Rank offset from the end square to the captured piece.
    EnPassant(i8),
    Castle(CastleDraft),
}

/// A destination square requiring variant-specific handling.
#[derive(Clone, Debug, PartialEq)]
pub struct SpecialDest {
    pub coords: Coord,
    pub tag: SpecialTag,
}

/// A slide along one direction vector, clamped by the first blocker on each
/// side. Limits are step counts; `None` means unbounded (open board).
#[derive(Clone, Debug, PartialEq)]
pub struct SlideRun {
    pub dir: Coord,
    pub pos: Option<i64>,
    pub neg: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegalMoves {
    /// Reachable fixed destinations, pawn pushes and captures included.
    pub individual: Vec<Coord>,
    pub sliding: Vec<SlideRun>,
    pub specials: Vec<SpecialDest>,
}

/// Whether `piece` may land on (or capture at) `dest`. The void is
/// impassable; everything else hostile or empty is fair game.
fn can_land(game: &GameState, player: Player, dest: Coord) -> bool {
    match game.position().piece_at(dest) {
        None => true,
        Some(kind) => kind.player != player && kind.raw != RawType::Void,
    }
}

/// Calculates the legal destinations of one piece under the game's moveset
/// table. Legality here is movement legality; self-check is the caller's
/// concern (typically via simulation).
pub fn calculate(game: &GameState, piece: Piece, options: CalcOptions) -> LegalMoves {
    let mut legal = LegalMoves {
        specials: special_dests(game, piece),
        ..LegalMoves::default()
    };
    if options.only_calc_specials {
        return legal;
    }

    if piece.kind.raw == RawType::Pawn {
        pawn_dests(game, piece, &mut legal.individual);
        return legal;
    }

    if let Some(moveset) = game.movesets().get(&piece.kind.raw) {
        for &jump in &moveset.individual {
            let dest = piece.coords + jump;
            if can_land(game, piece.kind.player, dest) {
                legal.individual.push(dest);
            }
        }
        for &dir in &moveset.sliding {
            legal.sliding.push(slide_run(game, piece, dir));
        }
    }
    legal
}

/// Copies a matched special destination's flags onto a draft.
pub fn transfer_special_flags(dest: &SpecialDest, draft: &mut MoveDraft) {
    match dest.tag {
        SpecialTag::EnPassant(dir) => draft.en_passant = Some(dir),
        SpecialTag::Castle(castle) => draft.castle = Some(castle),
    }
}

fn pawn_dests(game: &GameState, piece: Piece, out: &mut Vec<Coord>) {
    let player = piece.kind.player;
    let forward = Coord::new(0, player.pawn_direction());

    let one_up = piece.coords + forward;
    if !game.position().is_occupied(one_up) {
        out.push(one_up);
        // the double push needs the pawn's special right and two clear
        // squares
        let two_up = one_up + forward;
        if game.special_rights().contains(&piece.coords)
            && !game.position().is_occupied(two_up)
        {
            out.push(two_up);
        }
    }

    for dx in [-1, 1] {
        let dest = one_up + Coord::new(dx, 0);
        if let Some(kind) = game.position().piece_at(dest) {
            if kind.player != player && kind.raw != RawType::Void {
                out.push(dest);
            }
        }
    }
}

fn slide_run(game: &GameState, piece: Piece, dir: Coord) -> SlideRun {
    let (mut pos_block, mut neg_block): (Option<(i64, bool)>, Option<(i64, bool)>) = (None, None);
    for (coords, kind) in game.position().iter() {
        if coords == piece.coords {
            continue;
        }
        let Some(steps) = steps_between(coords - piece.coords, dir) else {
            continue;
        };
        let landable = kind.player != piece.kind.player && kind.raw != RawType::Void;
        if steps > 0 {
            if pos_block.map_or(true, |(k, _)| steps < k) {
                pos_block = Some((steps, landable));
            }
        } else if neg_block.map_or(true, |(k, _)| steps > k) {
            neg_block = Some((steps, landable));
        }
    }

    let clamp_pos = pos_block.map(|(k, landable)| if landable { k } else { k - 1 });
    let clamp_neg = neg_block.map(|(k, landable)| if landable { -k } else { -k - 1 });
    SlideRun {
        dir,
        pos: clamp_pos,
        neg: clamp_neg,
    }
}

fn steps_between(delta: Coord, dir: Coord) -> Option<i64> {
    if dir.x != 0 {
        if delta.x % dir.x != 0 {
            return None;
        }
        let steps = delta.x / dir.x;
        (delta.y == steps * dir.y && steps != 0).then_some(steps)
    } else {
        if delta.x != 0 || dir.y == 0 || delta.y % dir.y != 0 {
            return None;
        }
        let steps = delta.y / dir.y;
        (steps != 0).then_some(steps)
    }
}

fn special_dests(game: &GameState, piece: Piece) -> Vec<SpecialDest> {
    let mut specials = Vec::new();
    match piece.kind.raw {
        RawType::Pawn => {
            if let Some(ep) = game.en_passant() {
                let forward = piece.kind.player.pawn_direction();
                let diagonal = ep.y == piece.coords.y + forward
                    && (ep.x - piece.coords.x).abs() == 1;
                // the captured pawn stands behind the en-passant square
                let victim = game
                    .position()
                    .piece_at(Coord::new(ep.x, ep.y - forward));
                let hostile = victim.map_or(false, |kind| kind.player != piece.kind.player);
                if diagonal && hostile {
                    specials.push(SpecialDest {
                        coords: ep,
                        tag: SpecialTag::EnPassant(-forward as i8),
                    });
                }
            }
        }
        raw if raw.is_royal() => {
            if game.special_rights().contains(&piece.coords) {
                specials.extend(castle_dests(game, piece));
            }
        }
        _ => {}
    }
    specials
}

fn castle_dests(game: &GameState, piece: Piece) -> Vec<SpecialDest> {
    let mut dests = Vec::new();
    if check::is_square_attacked(game, piece.kind.player, piece.coords) {
        return dests;
    }

    for dir in [-1i8, 1] {
        let step = dir as i64;
        // the castle partner is the first piece toward `dir` on the rank
        let mut partner: Option<Piece> = None;
        for (coords, kind) in game.position().iter() {
            if coords.y != piece.coords.y || (coords.x - piece.coords.x) * step <= 0 {
                continue;
            }
            if partner.map_or(true, |p| {
                (coords.x - piece.coords.x).abs() < (p.coords.x - piece.coords.x).abs()
            }) {
                partner = Some(Piece::new(kind, coords));
            }
        }

        let Some(partner) = partner else { continue };
        if partner.kind.player != piece.kind.player
            || !game.special_rights().contains(&partner.coords)
            || (partner.coords.x - piece.coords.x).abs() < 3
        {
            continue;
        }

        // the two squares the royal crosses must be safe
        let path_safe = (1..=2).all(|i| {
            !check::is_square_attacked(
                game,
                piece.kind.player,
                piece.coords + Coord::new(step * i, 0),
            )
        });
        if !path_safe {
            continue;
        }

        dests.push(SpecialDest {
            coords: piece.coords + Coord::new(step * 2, 0),
            tag: SpecialTag::Castle(CastleDraft {
                coord: partner.coords,
                dir,
            }),
        });
    }
    dests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::tests_support::game_from_position;

    fn piece_at(game: &GameState, x: i64, y: i64) -> Piece {
        game.position().piece_on(Coord::new(x, y)).unwrap()
    }

    #[test]
    fn knight_jumps_skip_friendlies() {
        let game = game_from_position("N4,4|P5,6|p3,6");
        let legal = calculate(&game, piece_at(&game, 4, 4), CalcOptions::default());
        assert!(!legal.individual.contains(&Coord::new(5, 6)));
        assert!(legal.individual.contains(&Coord::new(3, 6)));
        assert_eq!(7, legal.individual.len());
    }

    #[test]
    fn rook_run_clamps_at_blockers() {
        let game = game_from_position("R4,4|P4,9|p1,4");
        let legal = calculate(&game, piece_at(&game, 4, 4), CalcOptions::default());
        let vertical = legal
            .sliding
            .iter()
            .find(|run| run.dir == Coord::new(0, 1))
            .unwrap();
        // friendly pawn five up: stop one short; open board downward
        assert_eq!(Some(4), vertical.pos);
        assert_eq!(None, vertical.neg);

        let horizontal = legal
            .sliding
            .iter()
            .find(|run| run.dir == Coord::new(1, 0))
            .unwrap();
        // hostile pawn three left: its square is reachable
        assert_eq!(Some(3), horizontal.neg);
        assert_eq!(None, horizontal.pos);
    }

    #[test]
    fn pawn_double_push_needs_the_right() {
        let game = game_from_position("P2,2+|P7,2");
        let with_right = calculate(&game, piece_at(&game, 2, 2), CalcOptions::default());
        assert!(with_right.individual.contains(&Coord::new(2, 3)));
        assert!(with_right.individual.contains(&Coord::new(2, 4)));

        let without = calculate(&game, piece_at(&game, 7, 2), CalcOptions::default());
        assert!(without.individual.contains(&Coord::new(7, 3)));
        assert!(!without.individual.contains(&Coord::new(7, 4)));
    }

    #[test]
    fn pawn_captures_diagonally() {
        let game = game_from_position("P4,4|p5,5|P3,5|p4,5");
        let legal = calculate(&game, piece_at(&game, 4, 4), CalcOptions::default());
        // forward blocked by the hostile pawn; captures only to the right
        assert_eq!(vec![Coord::new(5, 5)], legal.individual);
    }

    #[test]
    fn en_passant_dest_is_tagged() {
        let mut game = game_from_position("P4,5+|p5,5");
        game.en_passant = Some(Coord::new(5, 6));
        let legal = calculate(
            &game,
            piece_at(&game, 4, 5),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert_eq!(
            vec![SpecialDest {
                coords: Coord::new(5, 6),
                tag: SpecialTag::EnPassant(-1),
            }],
            legal.specials
        );
    }

    #[test]
    fn castle_dest_carries_the_partner() {
        let game = game_from_position("K5,1+|R8,1+|R1,1+");
        let legal = calculate(
            &game,
            piece_at(&game, 5, 1),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert_eq!(2, legal.specials.len());
        let kingside = legal
            .specials
            .iter()
            .find(|dest| dest.coords == Coord::new(7, 1))
            .unwrap();
        assert_eq!(
            SpecialTag::Castle(CastleDraft {
                coord: Coord::new(8, 1),
                dir: 1,
            }),
            kingside.tag
        );
    }

    #[test]
    fn castle_requires_rights_on_both_pieces() {
        let game = game_from_position("K5,1+|R8,1");
        let legal = calculate(
            &game,
            piece_at(&game, 5, 1),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert!(legal.specials.is_empty());

        let game = game_from_position("K5,1|R8,1+");
        let legal = calculate(
            &game,
            piece_at(&game, 5, 1),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert!(legal.specials.is_empty());
    }

    #[test]
    fn castle_blocked_by_attacked_path() {
        // black rook eyes the square the king crosses
        let game = game_from_position("K5,1+|R8,1+|r6,50");
        let legal = calculate(
            &game,
            piece_at(&game, 5, 1),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert!(legal.specials.is_empty());
    }

    #[test]
    fn castle_partner_must_be_at_distance() {
        let game = game_from_position("K5,1+|R7,1+");
        let legal = calculate(
            &game,
            piece_at(&game, 5, 1),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert!(legal.specials.is_empty());
    }

    #[test]
    fn transfer_flags_onto_a_draft() {
        let mut draft = MoveDraft::new(Coord::new(5, 1), Coord::new(7, 1));
        let dest = SpecialDest {
            coords: Coord::new(7, 1),
            tag: SpecialTag::Castle(CastleDraft {
                coord: Coord::new(8, 1),
                dir: 1,
            }),
        };
        transfer_special_flags(&dest, &mut draft);
        assert_eq!(
            Some(CastleDraft {
                coord: Coord::new(8, 1),
                dir: 1
            }),
            draft.castle
        );
        assert_eq!(None, draft.en_passant);
    }

    #[test]
    fn only_calc_specials_suppresses_movement() {
        let game = game_from_position("N4,4");
        let legal = calculate(
            &game,
            piece_at(&game, 4, 4),
            CalcOptions {
                only_calc_specials: true,
            },
        );
        assert!(legal.individual.is_empty());
        assert!(legal.sliding.is_empty());
    }
}
