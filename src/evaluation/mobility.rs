/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Piece mobility evaluation. Pseudo-legal reach is counted by walking
//! `Tables::rays` to the first blocker, since the piece-list board has no
//! occupancy bitboard to mask against.

use crate::board::Board;
use crate::defs::{file_of, Directions, Sides};
use crate::piece::Kind;

const KNIGHT_MOBILITY: [i16; 9] = [-25, -11, -3, 3, 8, 12, 15, 17, 18];
const BISHOP_MOBILITY: [i16; 14] = [-25, -11, -3, 3, 8, 12, 15, 17, 18, 20, 22, 23, 24, 25];
const ROOK_MOBILITY: [i16; 15] = [-25, -11, -3, 3, 8, 12, 15, 17, 18, 20, 22, 23, 24, 25, 26];
const QUEEN_MOBILITY: [i16; 28] = [
    -25, -11, -3, 3, 8, 12, 15, 17, 18, 20, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34,
    35, 36, 37, 38, 39,
];

const ROOK_OPEN_FILE_BONUS: i16 = 30;
const ROOK_HALF_OPEN_FILE_BONUS: i16 = 15;
const BISHOP_LONG_DIAGONAL_BONUS: i16 = 10;

const BISHOP_DIRS: [u8; 4] = [Directions::NW, Directions::NE, Directions::SE, Directions::SW];
const ROOK_DIRS: [u8; 4] = [Directions::N, Directions::E, Directions::S, Directions::W];

pub fn evaluate_mobility(board: &Board) -> i16 {
    let [w, b] = evaluate_mobility_per_side(board);
    w - b
}

pub fn evaluate_mobility_per_side(board: &Board) -> [i16; 2] {
    [side_mobility(board, Sides::WHITE), side_mobility(board, Sides::BLACK)]
}

fn slider_reach(board: &Board, sq: u8, dirs: &[u8], side: usize) -> usize {
    let mut reach = 0usize;
    for &d in dirs {
        for &step in &board.tables.rays[sq as usize][d as usize] {
            let occupant = board.piece_at(step);
            if occupant.is_empty() {
                reach += 1;
                continue;
            }
            if occupant.side != side {
                reach += 1;
            }
            break;
        }
    }
    reach
}

fn side_mobility(board: &Board, side: usize) -> i16 {
    let mut score = 0i16;

    for &sq in board.squares_of(Kind::Knight, side) {
        let mut count = 0usize;
        for &dst in &board.tables.knight_moves[sq as usize][side] {
            if board.piece_at(dst).side != side || board.piece_at(dst).is_empty() {
                count += 1;
            }
        }
        score += KNIGHT_MOBILITY[count.min(KNIGHT_MOBILITY.len() - 1)];
    }

    for &sq in board.squares_of(Kind::Bishop, side) {
        let reach = slider_reach(board, sq, &BISHOP_DIRS, side);
        score += BISHOP_MOBILITY[reach.min(BISHOP_MOBILITY.len() - 1)];
        if reach >= 10 {
            score += BISHOP_LONG_DIAGONAL_BONUS;
        }
    }

    for &sq in board.squares_of(Kind::Rook, side) {
        let reach = slider_reach(board, sq, &ROOK_DIRS, side);
        score += ROOK_MOBILITY[reach.min(ROOK_MOBILITY.len() - 1)];
        score += rook_file_bonus(board, sq, side);
    }

    for &sq in board.squares_of(Kind::Queen, side) {
        let reach = slider_reach(board, sq, &BISHOP_DIRS, side) + slider_reach(board, sq, &ROOK_DIRS, side);
        score += QUEEN_MOBILITY[reach.min(QUEEN_MOBILITY.len() - 1)];
    }

    score
}

fn rook_file_bonus(board: &Board, sq: u8, side: usize) -> i16 {
    let file = file_of(sq);
    let own_pawn_on_file = board.squares_of(Kind::Pawn, side).iter().any(|&p| file_of(p) == file);
    if own_pawn_on_file {
        return 0;
    }
    let enemy_pawn_on_file = board.squares_of(Kind::Pawn, side ^ 1).iter().any(|&p| file_of(p) == file);
    if enemy_pawn_on_file {
        ROOK_HALF_OPEN_FILE_BONUS
    } else {
        ROOK_OPEN_FILE_BONUS
    }
}
