/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! `SearchCoordinator`: owns a master thread and a fixed pool of worker
//! threads, each with its own `Board` clone, and fans the root moves of
//! each iterative-deepening pass out across them. Commands arrive on a
//! `crossbeam_channel`; responses are `engine::defs::Response` values
//! delivered the same way.

use crate::board::Board;
use crate::engine::defs::Response;
use crate::evaluation::material_strength;
use crate::movegen::defs::Move;
use crate::movegen::MoveGenerator;
use crate::search::alpha_beta::{minimax, Control, SearchContext};
use crate::search::defs::{HistoryTable, Pv, SearchLimits, Stats};
use crate::search::eval::{Eval, LOSS, WIN};
use crate::search::tt::TranspositionTable;
use crossbeam_channel::{bounded, Receiver, Sender};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Commands the driver sends the coordinator, restricted to the subset
/// that is the coordinator's own responsibility; `new-game`/`set-position`/
/// `config` are handled by the engine command loop directly against the
/// coordinator's shared state.
pub enum SearchCommand {
    Think { board: Board, limits: SearchLimits },
    Ponder { board: Board, limits: SearchLimits },
    MoveNow,
    Bail,
    Shutdown,
}

/// One idle worker's private state: its own board, its own history table,
/// and the channel pair used to hand it one root move at a time.
struct Worker {
    /// `None` once the worker has been told to shut down; dropping the
    /// sender is what lets its `recv()` loop observe the channel close.
    job_tx: Option<Sender<WorkerJob>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn dispatch(&self, job: WorkerJob) {
        if let Some(tx) = &self.job_tx {
            let _ = tx.send(job);
        }
    }

    fn shutdown(&mut self) {
        self.job_tx.take();
    }
}

struct WorkerJob {
    board: Board,
    mv: Move,
    alpha: i32,
    beta: i32,
    mat_strgh: i32,
    base_ply: u32,
    limits: SearchLimits,
}

struct WorkerResult {
    worker_id: usize,
    mv: Move,
    eval: Eval,
    pv: Pv,
    stats: Stats,
}

fn worker_loop(
    worker_id: usize,
    job_rx: Receiver<WorkerJob>,
    result_tx: Sender<WorkerResult>,
    mg: Arc<MoveGenerator>,
    tt: Arc<TranspositionTable>,
    control: Arc<Control>,
) {
    let mut history = HistoryTable::new();
    while let Ok(job) = job_rx.recv() {
        let mut board = job.board;
        board.make_move(job.mv);
        let ctx = SearchContext {
            mg: &mg,
            tt: &tt,
            control: &control,
            limits: &job.limits,
            started_at: Instant::now(),
            base_ply: job.base_ply,
        };
        let mut stats = Stats::new();
        let mut pv = Vec::new();
        let child = minimax(
            &mut board,
            &ctx,
            &mut history,
            -job.beta,
            -job.alpha,
            -job.mat_strgh,
            Move::NONE,
            &mut stats,
            &mut pv,
        );
        board.unmake_move();
        let mut eval = child.inverted();
        eval.decay_to(crate::search::eval::WIN_THRESHOLD);
        let mut full_pv = vec![job.mv];
        full_pv.extend(pv);
        let _ = result_tx.send(WorkerResult { worker_id, mv: job.mv, eval, pv: full_pv, stats });
    }
}

/// Master/worker fan-out at root. Owned by the
/// engine's command loop; `run` never returns until a `Shutdown` command
/// arrives, so it is meant to be spawned as the dedicated master thread.
pub struct SearchCoordinator {
    mg: Arc<MoveGenerator>,
    tt: Arc<TranspositionTable>,
    control: Arc<Control>,
    workers: Vec<Worker>,
    /// Every worker's results funnel into this single receiver, so the
    /// master blocks on "whichever worker finishes first" with one `recv`
    /// instead of polling N receivers.
    result_rx: Receiver<WorkerResult>,
    history: HistoryTable,
}

impl SearchCoordinator {
    pub fn new(tt: Arc<TranspositionTable>, worker_count: usize) -> Self {
        let mg = Arc::new(MoveGenerator::new());
        let control = Arc::new(Control::new());
        let (result_tx, result_rx) = bounded::<WorkerResult>(256);
        let workers = (0..worker_count.max(1).saturating_sub(1))
            .map(|id| spawn_worker(id, Arc::clone(&mg), Arc::clone(&tt), Arc::clone(&control), result_tx.clone()))
            .collect();
        drop(result_tx);
        SearchCoordinator { mg, tt, control, workers, result_rx, history: HistoryTable::new() }
    }

    /// Runs the command loop on the calling thread: receives commands and
    /// produces responses until told to shut down. Intended to be run
    /// inside its own `thread::spawn` by the engine.
    pub fn run(&mut self, commands: Receiver<SearchCommand>, responses: Sender<Response>) {
        while let Ok(cmd) = commands.recv() {
            match cmd {
                SearchCommand::Think { board, limits } => {
                    self.control.reset();
                    self.iterative_deepen(board, limits, &commands, &responses);
                }
                SearchCommand::Ponder { board, limits } => {
                    self.control.reset();
                    self.iterative_deepen(board, limits, &commands, &responses);
                }
                SearchCommand::MoveNow => {
                    self.control.request_stop();
                }
                SearchCommand::Bail => {
                    self.control.request_stop();
                }
                SearchCommand::Shutdown => break,
            }
        }
        for worker in &mut self.workers {
            worker.shutdown();
        }
    }

    /// Iterative deepening at the master: run a full search at
    /// each depth, publishing a `Response::Pv` whenever the root line
    /// changes, until mate/forced-loss is found, the normal starting
    /// position stops early, a concurrently-arriving command preempts the
    /// loop, or `limits` is exhausted.
    fn iterative_deepen(
        &mut self,
        root: Board,
        limits: SearchLimits,
        commands: &Receiver<SearchCommand>,
        responses: &Sender<Response>,
    ) {
        self.history.clear();
        let mut root_hint = Move::NONE;
        let started_at = Instant::now();
        let base_ply = root.position.ply;
        let mut total_stats = Stats::new();

        let max_depth = limits.max_depth;
        for depth in 1..=max_depth {
            if self.control.should_stop() {
                break;
            }
            let mut depth_limits = limits;
            depth_limits.max_depth = depth;

            let (eval, pv, stats, fail_high_mv) =
                self.search_root(&root, &depth_limits, root_hint, base_ply as u32, started_at);
            total_stats.merge(&stats);

            if self.control.should_stop() && pv.is_empty() {
                break;
            }

            if let Some(mv) = fail_high_mv {
                root_hint = mv;
            } else if let Some(&mv) = pv.first() {
                root_hint = mv;
            }

            let _ = responses.send(Response::Stats(total_stats));
            if !pv.is_empty() {
                let _ =
                    responses.send(Response::Pv { depth, eval: eval.low(), moves: pv.clone() });
            }

            if eval.detected_loss() {
                if limits.can_resign {
                    let _ = responses.send(Response::Resign);
                    return;
                }
                break;
            }
            if eval.detected_win() {
                break;
            }
            if root.position.is_standard_starting_position() {
                // Special-case optimization: the first move of a normal
                // game is not worth thinking about any further.
                break;
            }
            if depth_limits.exceeded(depth, &total_stats, started_at) {
                break;
            }
            // preempt between iterations if the driver already wants out
            if let Ok(next) = commands.try_recv() {
                match next {
                    SearchCommand::MoveNow | SearchCommand::Bail => {
                        self.control.request_stop();
                    }
                    SearchCommand::Shutdown => {
                        self.control.request_stop();
                        self.finish(root, root_hint, responses);
                        return;
                    }
                    _ => {}
                }
            }
        }

        self.finish(root, root_hint, responses);
    }

    /// One full-width root search: the master plays the first root move
    /// itself (so the PV is always grounded in the strongest line so far),
    /// then dispatches each subsequent root move to an idle worker,
    /// blocking on worker completion once the pool is saturated.
    fn search_root(
        &mut self,
        root: &Board,
        limits: &SearchLimits,
        root_hint: Move,
        base_ply: u32,
        started_at: Instant,
    ) -> (Eval, Pv, Stats, Option<Move>) {
        let moves = match self.mg.generate_legal_moves(
            root,
            false,
            &self.history,
            root.position.ply,
            limits.history_window_plies,
        ) {
            Ok(m) => m,
            Err(_) => return (Eval::DRAW, Vec::new(), Stats::new(), None),
        };
        if moves.is_empty() {
            let in_check = root.checking_coord != crate::defs::FLAG;
            let eval = if in_check { Eval::new(LOSS, LOSS) } else { Eval::DRAW };
            return (eval, Vec::new(), Stats::new(), None);
        }

        let mut ordered: Vec<Move> = moves.iter().copied().collect();
        if limits.random_moves {
            let mut rng = SmallRng::from_entropy();
            ordered.shuffle(&mut rng);
        }
        if !root_hint.is_none() {
            if let Some(pos) = ordered.iter().position(|m| *m == root_hint) {
                ordered.swap(0, pos);
            }
        }

        let mat_strgh = material_strength(root);
        let mut alpha = LOSS;
        let beta = WIN;
        let mut best: Option<(Move, Eval, Pv)> = None;
        let mut stats = Stats::new();
        let mut fail_high: Option<Move> = None;

        // The master always searches the first move itself.
        let first = ordered[0];
        {
            let mut board = root.clone();
            board.make_move(first);
            let ctx = SearchContext {
                mg: &self.mg,
                tt: &self.tt,
                control: &self.control,
                limits,
                started_at,
                base_ply,
            };
            let mut child_stats = Stats::new();
            let mut child_pv = Vec::new();
            let child = minimax(
                &mut board,
                &ctx,
                &mut self.history,
                -beta,
                -alpha,
                -mat_strgh,
                Move::NONE,
                &mut child_stats,
                &mut child_pv,
            );
            board.unmake_move();
            stats.merge(&child_stats);
            let mut eval = child.inverted();
            eval.decay_to(crate::search::eval::WIN_THRESHOLD);
            if eval.low() > alpha {
                alpha = eval.low();
            }
            let mut full_pv = vec![first];
            full_pv.extend(child_pv);
            if eval.low() >= beta {
                fail_high = Some(first);
            }
            best = Some((first, eval, full_pv));
        }

        if fail_high.is_none() && !self.workers.is_empty() {
            let mut idle: Vec<usize> = (0..self.workers.len()).collect();
            let mut in_flight = 0usize;
            let mut idx = 1usize;

            while idx < ordered.len() || in_flight > 0 {
                if self.control.should_stop() {
                    break;
                }
                while idx < ordered.len() {
                    let worker_id = match idle.pop() {
                        Some(id) => id,
                        None => break,
                    };
                    let mv = ordered[idx];
                    self.workers[worker_id].dispatch(WorkerJob {
                        board: root.clone(),
                        mv,
                        alpha,
                        beta,
                        mat_strgh,
                        base_ply,
                        limits: *limits,
                    });
                    idx += 1;
                    in_flight += 1;
                }

                if in_flight == 0 {
                    break;
                }

                let result = match self.result_rx.recv() {
                    Ok(r) => r,
                    Err(_) => break,
                };
                in_flight -= 1;
                idle.push(result.worker_id);
                stats.merge(&result.stats);
                if result.eval.low() > alpha {
                    alpha = result.eval.low();
                    best = Some((result.mv, result.eval, result.pv));
                }
                if result.eval.low() >= beta {
                    fail_high = Some(result.mv);
                    self.control.request_stop();
                }
            }

            // Drain any outstanding worker responses before the next pass.
            if fail_high.is_some() {
                while in_flight > 0 {
                    if self.result_rx.recv().is_ok() {
                        in_flight -= 1;
                    } else {
                        break;
                    }
                }
            }
        } else if fail_high.is_none() {
            // No workers configured (single-thread mode): run the
            // remaining moves on the master itself.
            let mut idx = 1usize;
            while idx < ordered.len() {
                let mv = ordered[idx];
                idx += 1;
                let mut board = root.clone();
                board.make_move(mv);
                let ctx =
                    SearchContext { mg: &self.mg, tt: &self.tt, control: &self.control, limits, started_at, base_ply };
                let mut child_stats = Stats::new();
                let mut child_pv = Vec::new();
                let child = minimax(
                    &mut board,
                    &ctx,
                    &mut self.history,
                    -beta,
                    -alpha,
                    -mat_strgh,
                    Move::NONE,
                    &mut child_stats,
                    &mut child_pv,
                );
                board.unmake_move();
                stats.merge(&child_stats);
                let mut eval = child.inverted();
                eval.decay_to(crate::search::eval::WIN_THRESHOLD);
                if eval.low() > alpha {
                    alpha = eval.low();
                    let mut full_pv = vec![mv];
                    full_pv.extend(child_pv);
                    best = Some((mv, eval, full_pv));
                }
                if eval.low() >= beta {
                    fail_high = Some(mv);
                    break;
                }
                if self.control.should_stop() {
                    break;
                }
            }
        }

        let (_, eval, pv) = best.unwrap_or((Move::NONE, Eval::DRAW, Vec::new()));
        (eval, pv, stats, fail_high)
    }

    /// Plays the chosen move on a private copy and checks draw claims
    /// before emitting the final response.
    fn finish(&self, root: Board, best_move: Move, responses: &Sender<Response>) {
        if best_move.is_none() {
            let in_check = root.checking_coord != crate::defs::FLAG;
            if in_check {
                let _ = responses.send(Response::Move(Move::NONE));
            } else {
                let _ = responses.send(Response::Draw(None));
            }
            return;
        }

        let mut after = root.clone();
        after.make_move(best_move);
        if after.is_fifty_move_draw() || after.is_draw_threefold_repetition() {
            let _ = responses.send(Response::Draw(Some(best_move)));
        } else {
            let _ = responses.send(Response::Move(best_move));
        }
    }
}

fn spawn_worker(
    id: usize,
    mg: Arc<MoveGenerator>,
    tt: Arc<TranspositionTable>,
    control: Arc<Control>,
    result_tx: Sender<WorkerResult>,
) -> Worker {
    let (job_tx, job_rx) = bounded::<WorkerJob>(1);
    let handle = thread::spawn(move || worker_loop(id, job_rx, result_tx, mg, tt, control));
    Worker { job_tx: Some(job_tx), handle: Some(handle) }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.shutdown();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

/// Convenience used by callers that only want a blocking one-shot search
/// (e.g. the perft/self-test binary's eval mode, and unit tests) without
/// standing up the full command-channel plumbing.
pub fn think_once(board: &Board, limits: SearchLimits, tt: &TranspositionTable) -> (Eval, Pv, Stats) {
    let mg = MoveGenerator::new();
    let control = Control::new();
    let mut history = HistoryTable::new();
    let base_ply = board.position.ply as u32;
    let started_at = Instant::now();
    let mut stats = Stats::new();
    let mut root_hint = Move::NONE;
    let mut eval = Eval::DRAW;
    let mut pv = Vec::new();

    for depth in 1..=limits.max_depth {
        let mut depth_limits = limits;
        depth_limits.max_depth = depth;
        let ctx = SearchContext { mg: &mg, tt, control: &control, limits: &depth_limits, started_at, base_ply };
        let mut board = board.clone();
        let mat_strgh = material_strength(&board);
        let mut this_pv = Vec::new();
        let mut this_stats = Stats::new();
        eval = minimax(
            &mut board,
            &ctx,
            &mut history,
            LOSS,
            WIN,
            mat_strgh,
            root_hint,
            &mut this_stats,
            &mut this_pv,
        );
        stats.merge(&this_stats);
        if !this_pv.is_empty() {
            root_hint = this_pv[0];
            pv = this_pv;
        }
        if eval.detected_win() || eval.detected_loss() {
            break;
        }
        if depth_limits.exceeded(depth, &stats, started_at) {
            break;
        }
    }

    (eval, pv, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Tables;
    use std::sync::Arc as StdArc;

    #[test]
    fn think_once_finds_mate_in_one() {
        let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", StdArc::new(Tables::new())).unwrap();
        let tt = TranspositionTable::with_size_mb(1);
        let (eval, pv, _stats) = think_once(&board, SearchLimits::depth(3), &tt);
        assert!(eval.detected_win());
        assert!(!pv.is_empty());
    }

    #[test]
    fn coordinator_think_emits_a_final_move() {
        let tt = Arc::new(TranspositionTable::with_size_mb(1));
        let mut coordinator = SearchCoordinator::new(tt, 1);
        let (cmd_tx, cmd_rx) = bounded::<SearchCommand>(4);
        let (resp_tx, resp_rx) = bounded::<Response>(64);

        let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", Arc::new(Tables::new())).unwrap();
        cmd_tx.send(SearchCommand::Think { board, limits: SearchLimits::depth(3) }).unwrap();
        cmd_tx.send(SearchCommand::Shutdown).unwrap();

        coordinator.run(cmd_rx, resp_tx);

        let mut saw_move = false;
        while let Ok(resp) = resp_rx.try_recv() {
            if let Response::Move(mv) = resp {
                assert!(!mv.is_none());
                saw_move = true;
            }
        }
        assert!(saw_move);
    }

    #[test]
    fn coordinator_with_random_moves_still_emits_a_legal_move() {
        let tt = Arc::new(TranspositionTable::with_size_mb(1));
        let mut coordinator = SearchCoordinator::new(tt, 1);
        let (cmd_tx, cmd_rx) = bounded::<SearchCommand>(4);
        let (resp_tx, resp_rx) = bounded::<Response>(64);

        let board = Board::starting(Arc::new(Tables::new()));
        let mut limits = SearchLimits::depth(2);
        limits.random_moves = true;
        cmd_tx.send(SearchCommand::Think { board, limits }).unwrap();
        cmd_tx.send(SearchCommand::Shutdown).unwrap();

        coordinator.run(cmd_rx, resp_tx);

        let mut saw_move = false;
        while let Ok(resp) = resp_rx.try_recv() {
            if let Response::Move(mv) = resp {
                assert!(!mv.is_none());
                saw_move = true;
            }
        }
        assert!(saw_move);
    }

    #[test]
    fn coordinator_resigns_a_detected_loss() {
        let tt = Arc::new(TranspositionTable::with_size_mb(1));
        let mut coordinator = SearchCoordinator::new(tt, 1);
        let (cmd_tx, cmd_rx) = bounded::<SearchCommand>(4);
        let (resp_tx, resp_rx) = bounded::<Response>(64);

        // Fool's mate: white to move, already checkmated.
        let board = Board::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            Arc::new(Tables::new()),
        )
        .unwrap();
        cmd_tx.send(SearchCommand::Think { board, limits: SearchLimits::depth(3) }).unwrap();
        cmd_tx.send(SearchCommand::Shutdown).unwrap();

        coordinator.run(cmd_rx, resp_tx);

        let mut saw_resign = false;
        while let Ok(resp) = resp_rx.try_recv() {
            if let Response::Resign = resp {
                saw_resign = true;
            }
        }
        assert!(saw_resign);
    }
}
