/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! The `attacked()` predicate shared by `Position::is_legal`, check
//! detection, and the move generator's castling/king-step legality tests.

use crate::defs::{is_rook_direction, opponent, Directions, Side, Square, FLAG, NUM_SQUARES};
use crate::piece::{Kind, Piece};
use crate::tables::Tables;

/// Is `target` attacked by any piece of `attacker` on `squares`?
///
/// `transparent`, if not `FLAG`, names a square to treat as empty while
/// walking ray attacks — used so a king stepping off a square does not
/// block an attack along the same ray it just vacated.
pub fn is_attacked(
    squares: &[Piece; NUM_SQUARES],
    tables: &Tables,
    attacker: Side,
    target: Square,
    transparent: Square,
) -> bool {
    // Pawns: a pawn on `src` attacks the squares in its capture slots, so
    // walk the relation backwards from `target`.
    let fwd: i8 = if attacker == crate::defs::Sides::WHITE { 1 } else { -1 };
    let file = crate::defs::file_of(target) as i8;
    let rank = crate::defs::rank_of(target) as i8;
    for df in [-1i8, 1i8] {
        let sf = file + df;
        let sr = rank - fwd;
        if (0..8).contains(&sf) && (0..8).contains(&sr) {
            let src = crate::defs::square_of(sf as u8, sr as u8);
            if src != transparent {
                let p = squares[src as usize];
                if p.kind == Kind::Pawn && p.side == attacker {
                    return true;
                }
            }
        }
    }

    for &src in tables.knight_moves[target as usize][0].iter() {
        if src != transparent {
            let p = squares[src as usize];
            if p.kind == Kind::Knight && p.side == attacker {
                return true;
            }
        }
    }

    for &src in tables.king_moves[target as usize][0].iter() {
        if src != transparent {
            let p = squares[src as usize];
            if p.kind == Kind::King && p.side == attacker {
                return true;
            }
        }
    }

    for d in 0..Directions::NUM_DIRS {
        for &sq in tables.rays[target as usize][d].iter() {
            if sq == transparent {
                continue;
            }
            let p = squares[sq as usize];
            if p.is_empty() {
                continue;
            }
            if p.side == attacker {
                let slider_matches = match p.kind {
                    Kind::Queen => true,
                    Kind::Rook => is_rook_direction(d as u8),
                    Kind::Bishop => !is_rook_direction(d as u8),
                    _ => false,
                };
                if slider_matches {
                    return true;
                }
            }
            break;
        }
    }

    false
}

/// Convenience: is `target` attacked by the opponent of `target`'s own
/// side, with no square treated as transparent.
pub fn is_attacked_by_opponent_of(
    squares: &[Piece; NUM_SQUARES],
    tables: &Tables,
    defender: Side,
    target: Square,
) -> bool {
    is_attacked(squares, tables, opponent(defender), target, FLAG)
}

/// Every square directly attacking `target` by `attacker` (capped at two,
/// since double check is the most the checking-coord field can encode).
/// Used to compute the checking-coord after a move and to find the
/// checker(s) a check-evasion search must capture or block.
pub fn attackers_of(
    squares: &[Piece; NUM_SQUARES],
    tables: &Tables,
    attacker: Side,
    target: Square,
) -> Vec<Square> {
    let mut found = Vec::with_capacity(2);

    let fwd: i8 = if attacker == crate::defs::Sides::WHITE { 1 } else { -1 };
    let file = crate::defs::file_of(target) as i8;
    let rank = crate::defs::rank_of(target) as i8;
    for df in [-1i8, 1i8] {
        let sf = file + df;
        let sr = rank - fwd;
        if (0..8).contains(&sf) && (0..8).contains(&sr) {
            let src = crate::defs::square_of(sf as u8, sr as u8);
            let p = squares[src as usize];
            if p.kind == Kind::Pawn && p.side == attacker {
                found.push(src);
            }
        }
    }

    for &src in tables.knight_moves[target as usize][0].iter() {
        let p = squares[src as usize];
        if p.kind == Kind::Knight && p.side == attacker {
            found.push(src);
        }
    }

    for &src in tables.king_moves[target as usize][0].iter() {
        let p = squares[src as usize];
        if p.kind == Kind::King && p.side == attacker {
            found.push(src);
        }
    }

    for d in 0..Directions::NUM_DIRS {
        for &sq in tables.rays[target as usize][d].iter() {
            let p = squares[sq as usize];
            if p.is_empty() {
                continue;
            }
            if p.side == attacker {
                let slider_matches = match p.kind {
                    Kind::Queen => true,
                    Kind::Rook => is_rook_direction(d as u8),
                    Kind::Bishop => !is_rook_direction(d as u8),
                    _ => false,
                };
                if slider_matches {
                    found.push(sq);
                }
            }
            break;
        }
    }

    found
}

/// Compute the checking-coord field: `FLAG` if `defender`'s
/// king is not attacked, `DOUBLE_CHECK` if attacked twice or more, else
/// the unique checker's square.
pub fn checking_coord(
    squares: &[Piece; NUM_SQUARES],
    tables: &Tables,
    defender: Side,
    king_sq: Square,
) -> u8 {
    let checkers = attackers_of(squares, tables, opponent(defender), king_sq);
    match checkers.len() {
        0 => FLAG,
        1 => checkers[0],
        _ => crate::defs::DOUBLE_CHECK,
    }
}
