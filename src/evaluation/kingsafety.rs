/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! King safety evaluation. Pawn-shield, open-file, and attacker-count
//! checks are done by walking file arrays and piece-square lists rather
//! than masking bitboards.

use crate::board::attacks::is_attacked;
use crate::board::Board;
use crate::defs::{file_of, opponent, rank_of, Sides, FLAG};
use crate::piece::Kind;

const MISSING_PAWN_PENALTY: [i16; 4] = [0, 15, 25, 35];
const OPEN_FILE_PENALTY: i16 = 20;
const HALF_OPEN_FILE_PENALTY: i16 = 10;
const PAWN_STORM_PENALTY: i16 = 8;
const WEAK_SQUARES_PENALTY: i16 = 12;

const ATTACK_UNIT_WEIGHTS: [i16; 6] = [0, 0, 30, 50, 70, 85];
const SAFE_CHECK_BONUS: i16 = 40;
const UNSAFE_CHECK_BONUS: i16 = 20;

const KNIGHT_ATTACK_VALUE: i16 = 15;
const BISHOP_ATTACK_VALUE: i16 = 15;
const ROOK_ATTACK_VALUE: i16 = 25;
const QUEEN_ATTACK_VALUE: i16 = 40;

pub fn evaluate_king_safety(board: &Board) -> i16 {
    let raw = calculate_king_safety(board, Sides::WHITE) - calculate_king_safety(board, Sides::BLACK);
    let phase = game_phase_factor(board);
    (raw * phase) / 100
}

fn game_phase_factor(board: &Board) -> i16 {
    let mut pieces = 0u32;
    for side in [Sides::WHITE, Sides::BLACK] {
        pieces += board.squares_of(Kind::Queen, side).len() as u32;
        pieces += board.squares_of(Kind::Rook, side).len() as u32;
        pieces += board.squares_of(Kind::Bishop, side).len() as u32;
        pieces += board.squares_of(Kind::Knight, side).len() as u32;
    }
    // 14 non-pawn non-king pieces on the board is full middlegame (100);
    // scales linearly down to 50 as material is traded off.
    (50 + (pieces.min(14) as i16 * 50) / 14).clamp(50, 100)
}

fn calculate_king_safety(board: &Board, side: usize) -> i16 {
    let king_sq = board.king_square(side);
    let king_file = file_of(king_sq) as i32;
    let king_rank = rank_of(king_sq) as i32;
    let enemy = opponent(side);

    let mut score = 0i16;
    score += pawn_shield_penalty(board, side, king_file, king_rank);
    score += open_file_penalty(board, king_file);
    score += pawn_storm_penalty(board, side, king_file, king_rank);
    score += weak_squares_penalty(board, side, king_sq);
    score += attacker_pressure(board, side, enemy, king_sq);
    score
}

fn pawn_shield_penalty(board: &Board, side: usize, king_file: i32, king_rank: i32) -> i16 {
    let forward = if side == Sides::WHITE { 1 } else { -1 };
    let shield_rank = king_rank + forward;
    if !(0..8).contains(&shield_rank) {
        return 0;
    }
    let own_pawns = board.squares_of(Kind::Pawn, side);
    let mut missing = 0;
    for df in -1..=1i32 {
        let f = king_file + df;
        if !(0..8).contains(&f) {
            continue;
        }
        let has_shield_pawn = own_pawns
            .iter()
            .any(|&p| file_of(p) as i32 == f && rank_of(p) as i32 == shield_rank);
        if !has_shield_pawn {
            missing += 1;
        }
    }
    -MISSING_PAWN_PENALTY[missing.min(3)]
}

fn open_file_penalty(board: &Board, king_file: i32) -> i16 {
    let mut penalty = 0i16;
    for df in -1..=1i32 {
        let f = king_file + df;
        if !(0..8).contains(&f) {
            continue;
        }
        let white_pawn = board.squares_of(Kind::Pawn, Sides::WHITE).iter().any(|&p| file_of(p) as i32 == f);
        let black_pawn = board.squares_of(Kind::Pawn, Sides::BLACK).iter().any(|&p| file_of(p) as i32 == f);
        match (white_pawn, black_pawn) {
            (false, false) => penalty -= OPEN_FILE_PENALTY,
            (false, true) | (true, false) => penalty -= HALF_OPEN_FILE_PENALTY,
            (true, true) => {}
        }
    }
    penalty
}

fn pawn_storm_penalty(board: &Board, side: usize, king_file: i32, king_rank: i32) -> i16 {
    let enemy_pawns = board.squares_of(Kind::Pawn, opponent(side));
    let mut penalty = 0i16;
    for &p in enemy_pawns {
        let f = file_of(p) as i32;
        if (f - king_file).abs() > 1 {
            continue;
        }
        let advanced = if side == Sides::WHITE {
            rank_of(p) as i32 <= king_rank + 3
        } else {
            rank_of(p) as i32 >= king_rank - 3
        };
        if advanced {
            penalty -= PAWN_STORM_PENALTY;
        }
    }
    penalty
}

fn weak_squares_penalty(board: &Board, side: usize, king_sq: u8) -> i16 {
    let mut weak = 0i16;
    for &dst in &board.tables.king_moves[king_sq as usize][side] {
        if is_attacked(&board.position.squares, &board.tables, opponent(side), dst, FLAG) {
            weak -= WEAK_SQUARES_PENALTY;
        }
    }
    weak
}

/// Sum of enemy attackers near the king zone, weighted, plus a bonus for
/// any enemy piece that could deliver check. A check is "safe" if the
/// checking square is not itself defended by the king's side.
fn attacker_pressure(board: &Board, side: usize, enemy: usize, king_sq: u8) -> i16 {
    let mut attackers = 0usize;
    let mut weighted = 0i16;

    for &sq in board.squares_of(Kind::Knight, enemy) {
        if board.tables.distance[sq as usize][king_sq as usize] <= 2 {
            attackers += 1;
            weighted += KNIGHT_ATTACK_VALUE;
        }
    }
    for &sq in board.squares_of(Kind::Bishop, enemy) {
        if board.tables.distance[sq as usize][king_sq as usize] <= 3 {
            attackers += 1;
            weighted += BISHOP_ATTACK_VALUE;
        }
    }
    for &sq in board.squares_of(Kind::Rook, enemy) {
        if board.tables.distance[sq as usize][king_sq as usize] <= 3 {
            attackers += 1;
            weighted += ROOK_ATTACK_VALUE;
        }
    }
    for &sq in board.squares_of(Kind::Queen, enemy) {
        if board.tables.distance[sq as usize][king_sq as usize] <= 4 {
            attackers += 1;
            weighted += QUEEN_ATTACK_VALUE;
        }
    }

    let mut score = -(ATTACK_UNIT_WEIGHTS[attackers.min(5)] + weighted / 4);

    for &dst in &board.tables.king_moves[king_sq as usize][side] {
        if board.piece_at(dst).side == side && !board.piece_at(dst).is_empty() {
            continue;
        }
        if is_attacked(&board.position.squares, &board.tables, enemy, dst, FLAG) {
            let defended_by_us = is_attacked(&board.position.squares, &board.tables, side, dst, king_sq);
            score -= if defended_by_us { UNSAFE_CHECK_BONUS } else { SAFE_CHECK_BONUS };
        }
    }

    score
}
