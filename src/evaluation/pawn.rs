/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Pawn-structure evaluation. A piece-list board has no file-fill
//! bitboards to compute doubled/isolated/backward pawns from; this module
//! walks `Board::squares_of(Pawn, side)` and an 8-entry-per-file pawn
//! count instead.

use crate::board::Board;
use crate::defs::{file_of, rank_of, Sides, Square};
use crate::piece::Kind;

pub const DOUBLED_PAWN_PENALTY: i16 = -30;
pub const ISOLATED_PAWN_PENALTY: i16 = -35;
pub const BACKWARD_PAWN_PENALTY: i16 = -22;

pub const PASSED_PAWN_BONUS: [i16; 8] = [0, 20, 30, 55, 95, 160, 240, 0];

pub const CONNECTED_PAWN_BONUS: i16 = 10;
pub const PAWN_CHAIN_BONUS: i16 = 6;

pub const CENTRAL_PAWN_BONUS: i16 = 6;
pub const ROOK_FILE_PAWN_PENALTY: i16 = -10;

/// Per-file pawn counts and a per-file-per-rank occupancy bitset, built
/// once per side and shared by every helper below instead of re-scanning
/// the piece-square list for each check.
struct FileMap {
    /// `count[file]`, friendly pawns standing on that file.
    count: [u8; 8],
    /// `ranks[file]`: bit `r` set iff a friendly pawn stands on `(file, r)`.
    ranks: [u8; 8],
}

impl FileMap {
    fn build(squares: &[Square]) -> Self {
        let mut count = [0u8; 8];
        let mut ranks = [0u8; 8];
        for &sq in squares {
            let f = file_of(sq) as usize;
            count[f] += 1;
            ranks[f] |= 1 << rank_of(sq);
        }
        FileMap { count, ranks }
    }
}

pub fn evaluate_pawn_structure(board: &Board) -> i16 {
    evaluate_side_pawns(board, Sides::WHITE) - evaluate_side_pawns(board, Sides::BLACK)
}

fn evaluate_side_pawns(board: &Board, side: usize) -> i16 {
    let own_squares = board.squares_of(Kind::Pawn, side);
    let enemy_squares = board.squares_of(Kind::Pawn, side ^ 1);
    let own = FileMap::build(own_squares);
    let enemy = FileMap::build(enemy_squares);
    let forward: i8 = if side == Sides::WHITE { 1 } else { -1 };

    let mut score = 0i16;

    for file in 0..8usize {
        if own.count[file] > 1 {
            score += (own.count[file] as i16 - 1) * DOUBLED_PAWN_PENALTY;
        }
        if own.count[file] > 0 {
            let left_present = file > 0 && own.count[file - 1] > 0;
            let right_present = file < 7 && own.count[file + 1] > 0;
            if !left_present && !right_present {
                score += ISOLATED_PAWN_PENALTY;
            }
            if file == 3 || file == 4 {
                score += CENTRAL_PAWN_BONUS * own.count[file] as i16;
            }
            if file == 0 || file == 7 {
                score += ROOK_FILE_PAWN_PENALTY * own.count[file] as i16;
            }
        }
    }

    for &sq in own_squares {
        let file = file_of(sq) as usize;
        let rank = rank_of(sq) as i8;

        if is_passed(file, rank, forward, &enemy) {
            let effective_rank = if side == Sides::WHITE { rank } else { 7 - rank };
            score += PASSED_PAWN_BONUS[effective_rank as usize];
        }

        let behind_rank = rank - forward;
        if (0..8).contains(&behind_rank) {
            let supported = (file > 0 && own.ranks[file - 1] & (1 << behind_rank) != 0)
                || (file < 7 && own.ranks[file + 1] & (1 << behind_rank) != 0);
            if supported {
                score += CONNECTED_PAWN_BONUS;
            }
        }
        let ahead_rank = rank + forward;
        if (0..8).contains(&ahead_rank) {
            let chained = (file > 0 && own.ranks[file - 1] & (1 << ahead_rank) != 0)
                || (file < 7 && own.ranks[file + 1] & (1 << ahead_rank) != 0);
            if chained {
                score += PAWN_CHAIN_BONUS;
            }
        }

        if is_backward(file, rank, forward, &own, &enemy) {
            score += BACKWARD_PAWN_PENALTY;
        }
    }

    score
}

/// No enemy pawn on this file or an adjacent file at or ahead of `rank`
/// (in the direction of travel `forward`).
fn is_passed(file: usize, rank: i8, forward: i8, enemy: &FileMap) -> bool {
    for f in file.saturating_sub(1)..=(file + 1).min(7) {
        for r in 0..8i8 {
            if enemy.ranks[f] & (1 << r) == 0 {
                continue;
            }
            let ahead = if forward > 0 { r > rank } else { r < rank };
            if ahead {
                return false;
            }
        }
    }
    true
}

/// No friendly pawn able to support this pawn from behind on an adjacent
/// file, and the square ahead is more strongly held by the enemy.
fn is_backward(file: usize, rank: i8, forward: i8, own: &FileMap, enemy: &FileMap) -> bool {
    let behind = |r: i8| if forward > 0 { (0..r).rev().collect::<Vec<_>>() } else { (r + 1..8).collect::<Vec<_>>() };
    let supported = [file.checked_sub(1), Some(file + 1).filter(|&f| f < 8)]
        .into_iter()
        .flatten()
        .any(|f| behind(rank).iter().any(|&r| own.ranks[f] & (1 << r) != 0));
    if supported {
        return false;
    }
    let stop_rank = rank + forward;
    if !(0..8).contains(&stop_rank) {
        return false;
    }
    [file.checked_sub(1), Some(file + 1).filter(|&f| f < 8)]
        .into_iter()
        .flatten()
        .any(|f| enemy.ranks[f] & (1 << stop_rank) != 0)
}
