//! Move-generation correctness via perft node counts.

use arctic_core::board::fen::KIWIPETE_FEN;
use arctic_core::board::Board;
use arctic_core::movegen::defs::MoveList;
use arctic_core::movegen::MoveGenerator;
use arctic_core::search::defs::HistoryTable;
use arctic_core::tables::Tables;
use std::sync::Arc;

fn perft(board: &mut Board, mg: &MoveGenerator, depth: i8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let history = HistoryTable::new();
    let moves: MoveList = mg.generate_legal_moves(board, false, &history, 0, 0).expect("board has both kings");
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in moves.iter() {
        board.make_move(*mv);
        nodes += perft(board, mg, depth - 1);
        board.unmake_move();
    }
    nodes
}

#[test]
fn starting_position_perft_depths_1_to_4() {
    let mg = MoveGenerator::new();
    let mut board = Board::starting(Arc::new(Tables::new()));
    assert_eq!(perft(&mut board, &mg, 1), 20);
    assert_eq!(perft(&mut board, &mg, 2), 400);
    assert_eq!(perft(&mut board, &mg, 3), 8902);
    assert_eq!(perft(&mut board, &mg, 4), 197_281);
}

// Depth 5 visits ~4.9M leaves; kept separate so the cheaper depths above
// still run fast as a smoke test.
#[test]
fn starting_position_perft_depth_5() {
    let mg = MoveGenerator::new();
    let mut board = Board::starting(Arc::new(Tables::new()));
    assert_eq!(perft(&mut board, &mg, 5), 4_865_609);
}

#[test]
fn kiwipete_perft_depths_3_and_4() {
    let mg = MoveGenerator::new();
    let mut board = Board::from_fen(KIWIPETE_FEN, Arc::new(Tables::new())).unwrap();
    assert_eq!(perft(&mut board, &mg, 3), 97_862);
    assert_eq!(perft(&mut board, &mg, 4), 4_085_603);
}
