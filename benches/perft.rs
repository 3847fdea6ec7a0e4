use arctic_core::board::fen::{KIWIPETE_FEN, START_POSITION_FEN};
use arctic_core::board::Board;
use arctic_core::movegen::MoveGenerator;
use arctic_core::search::defs::HistoryTable;
use arctic_core::tables::Tables;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn perft(board: &mut Board, mg: &MoveGenerator, depth: i8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let history = HistoryTable::new();
    let moves = match mg.generate_legal_moves(board, false, &history, 0, 0) {
        Ok(m) => m,
        Err(_) => return 0,
    };
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

fn bench_perft(c: &mut Criterion) {
    let mg = MoveGenerator::new();
    let mut group = c.benchmark_group("perft");

    for (name, fen, depth) in [("start", START_POSITION_FEN, 4), ("kiwipete", KIWIPETE_FEN, 3)] {
        let tables = Arc::new(Tables::new());
        let mut board = Board::from_fen(fen, tables).expect("benchmark FEN is valid");
        group.bench_with_input(BenchmarkId::new("perft", name), &depth, |b, &depth| {
            b.iter(|| black_box(perft(&mut board, &mg, depth)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft);
criterion_main!(benches);
