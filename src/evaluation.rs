/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! The heuristic evaluation stack that feeds `search`'s material-strength
//! term and the standing-pat/leaf value in quiescence. Pure material is
//! `Board::material`, tracked incrementally by `Board` itself; this module
//! adds the positional terms on top: piece-square tables, pawn structure,
//! mobility, and king safety, each built against piece-square lists
//! instead of bitboards.

pub mod kingsafety;
pub mod mobility;
pub mod pawn;
pub mod psqt;

use crate::board::Board;
use crate::defs::Sides;
use crate::piece::Kind;

const EVALUATED_KINDS: [Kind; 6] =
    [Kind::Pawn, Kind::Knight, Kind::Bishop, Kind::Rook, Kind::Queen, Kind::King];

fn psqt_score(board: &Board, side: usize) -> i16 {
    let mut score = 0i16;
    for &kind in &EVALUATED_KINDS {
        for &sq in board.squares_of(kind, side) {
            score += psqt::value(kind, side, sq);
        }
    }
    score
}

/// Full positional evaluation from White's perspective: material plus
/// piece-square placement, pawn structure, mobility, and king safety.
/// This is the heuristic a driver would report as a centipawn score; the
/// search itself only ever consumes the side-relative `matStrgh` via
/// [`material_strength`] and [`leaf_value`].
pub fn evaluate_position(board: &Board) -> i32 {
    let material = board.material[Sides::WHITE] - board.material[Sides::BLACK];
    let psqt = (psqt_score(board, Sides::WHITE) - psqt_score(board, Sides::BLACK)) as i32;
    let pawns = pawn::evaluate_pawn_structure(board) as i32;
    let mobility = mobility::evaluate_mobility(board) as i32;
    let king_safety = kingsafety::evaluate_king_safety(board) as i32;
    material + psqt + pawns + mobility + king_safety
}

/// `matStrgh`: the side-to-move's material imbalance
/// (friendly minus enemy), the quantity `minimax` threads through the
/// recursion and uses for futility/standing-pat decisions.
pub fn material_strength(board: &Board) -> i32 {
    let side = board.turn();
    board.material[side] - board.material[side ^ 1]
}

/// Full positional evaluation from the side-to-move's perspective,
/// matching `evaluate_position`'s sign convention flipped for Black.
pub fn leaf_value(board: &Board) -> i32 {
    let white = evaluate_position(board);
    if board.turn() == Sides::WHITE {
        white
    } else {
        -white
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        let tables = std::sync::Arc::new(crate::tables::Tables::new());
        let board = Board::starting(tables);
        assert_eq!(material_strength(&board), 0);
        assert_eq!(evaluate_position(&board), 0);
    }
}
