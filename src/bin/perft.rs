/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! `arctic-perft`: a perft/self-test binary,
//! not a playing driver. It sets up a position from `--fen`/`--kiwipete`
//! and counts leaf nodes to `--perft` plies, which is the standard way an
//! engine's legal-move generation is validated.
//! `--threads` and `--hash` are accepted so the same flags serve a future
//! `think`-mode addition, but this binary only drives perft today.

use arctic_core::board::Board;
use arctic_core::misc::cmdline::CmdLine;
use arctic_core::movegen::defs::MoveList;
use arctic_core::movegen::MoveGenerator;
use arctic_core::search::defs::HistoryTable;
use arctic_core::tables::Tables;
use std::sync::Arc;
use std::time::Instant;

fn perft(board: &mut Board, mg: &MoveGenerator, depth: i8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let history = HistoryTable::new();
    let moves: MoveList = match mg.generate_legal_moves(board, false, &history, 0, 0) {
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

fn main() {
    env_logger::init();
    let cmdline = CmdLine::new();

    let tables = Arc::new(Tables::new());
    let fen = if cmdline.has_kiwipete() { arctic_core::board::fen::KIWIPETE_FEN.to_string() } else { cmdline.fen() };
    let mut board = match Board::from_fen(&fen, tables) {
        Ok(b) => b,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let depth = cmdline.perft();
    if depth <= 0 {
        log::warn!("--perft depth must be >= 1, nothing to do");
        return;
    }

    let mg = MoveGenerator::new();
    let started = Instant::now();
    let nodes = perft(&mut board, &mg, depth);
    let elapsed = started.elapsed();

    if !cmdline.has_quiet() {
        let nps = if elapsed.as_secs_f64() > 0.0 { nodes as f64 / elapsed.as_secs_f64() } else { 0.0 };
        println!("perft({depth}) = {nodes} nodes in {elapsed:.3?} ({nps:.0} nps)");
    } else {
        println!("{nodes}");
    }
}
