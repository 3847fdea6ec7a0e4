/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! The single-ply `minimax` function: one recursive routine whose
//! behavior switches from ordinary search to quiescence once the current
//! ply passes the configured search depth.
//!
//! `SearchContext` bundles the read-only handles every call needs (move
//! generator, transposition table, cancellation flag, limits) rather than
//! passing each collaborator as its own argument.

use crate::board::Board;
use crate::movegen::defs::{Move, MoveList};
use crate::movegen::MoveGenerator;
use crate::piece::Kind;
use crate::search::defs::{HistoryTable, Pv, SearchLimits, Stats, MAX_PLY};
use crate::search::eval::{self, Eval, WIN, WIN_THRESHOLD};
use crate::search::tt::TranspositionTable;
use std::time::Instant;

pub use crate::search::defs::Control;

/// Read-only collaborators shared by every node of one search (one
/// `think`/`ponder` invocation on the master, or one root-move dispatch on
/// a worker): the move generator, the shared transposition table, the
/// cooperative cancellation flag, the depth/node/time limits, and the
/// wall-clock start used to evaluate them.
pub struct SearchContext<'a> {
    pub mg: &'a MoveGenerator,
    pub tt: &'a TranspositionTable,
    pub control: &'a Control,
    pub limits: &'a SearchLimits,
    pub started_at: Instant,
    /// The ply the current search/iteration started from, used by the
    /// transposition table's generation-replacement policy: an entry
    /// stored at an older base-ply than the current search's is stale.
    pub base_ply: u32,
}

fn promo_worth(kind: Kind) -> i32 {
    match kind {
        Kind::Queen => eval::QUEEN,
        Kind::Rook => eval::ROOK,
        Kind::Bishop => eval::BISHOP,
        Kind::Knight => eval::KNIGHT,
        _ => 0,
    }
}

/// Piece-worth of the captured piece (0 for castling), plus a
/// promotion's net material swing.
fn cap_worth(board: &Board, mv: &Move) -> i32 {
    if mv.is_castle() {
        return 0;
    }
    let mut worth = if mv.is_en_passant() {
        eval::PAWN
    } else {
        board.piece_at(mv.dst).worth() as i32
    };
    if mv.is_promotion() {
        worth += promo_worth(mv.promotion) - eval::PAWN;
    }
    worth
}

fn is_capture(board: &Board, mv: &Move) -> bool {
    mv.is_en_passant() || !board.piece_at(mv.dst).is_empty()
}

/// Rewards driving a bare king into the corner, plus the mating side's own
/// king proximity, capped at 84 + 14 ticks. Used for the quiescence
/// "zero material and no pawns left" case. `mating_side` is the side with
/// material; the bare king belongs to its opponent.
fn end_game_eval(board: &Board, mating_side: crate::defs::Side) -> i32 {
    let bare_king = board.king_square(crate::defs::opponent(mating_side));
    let mating_king = board.king_square(mating_side);
    let corner_push = board.tables.center_distance[bare_king as usize] as i32 * 14;
    let distance = board.tables.distance[mating_king as usize][bare_king as usize] as i32;
    let proximity = (14 - 2 * distance).max(0);
    corner_push + proximity
}

/// True once a side is down to a bare king: no pawns, and no material at
/// all.
fn is_bare_king(board: &Board, side: crate::defs::Side) -> bool {
    board.material[side] == 0 && board.squares_of(Kind::Pawn, side).is_empty()
}

/// Draw short-circuit shared by every node ( "at entry, quickly
/// handle draws"): insufficient material, the fifty-move rule, and
/// three-fold repetition. A drawish position with the side to move no
/// worse off materially scores as a deliberate nudge away from repeating
/// (`-1`) rather than a flat zero, so the search prefers playing on.
fn detect_draw(board: &Board, mat_strgh: i32) -> Option<Eval> {
    if board.is_insufficient_material() || board.is_fifty_move_draw() || board.is_draw_threefold_repetition() {
        return Some(if mat_strgh >= 0 { Eval::exact(-1) } else { Eval::exact(0) });
    }
    None
}

/// `minimax`. `alpha`/`beta` bound the value this
/// call may return; `mat_strgh` is the side-to-move's material imbalance
/// (friendly minus enemy), threaded through as both the quiescence
/// standing-pat value and the futility-pruning yardstick. `root_hint`, when
/// not `Move::NONE`, is brought to the front of the root move list (the
/// best move recorded by the previous iterative-deepening pass).
#[allow(clippy::too_many_arguments)]
pub fn minimax(
    board: &mut Board,
    ctx: &SearchContext,
    history: &mut HistoryTable,
    alpha: i32,
    beta: i32,
    mat_strgh: i32,
    root_hint: Move,
    stats: &mut Stats,
    out_pv: &mut Pv,
) -> Eval {
    out_pv.clear();

    if ctx.control.should_stop() {
        return Eval::new(alpha, WIN);
    }

    stats.nodes += 1;

    if let Some(drawn) = detect_draw(board, mat_strgh) {
        return drawn;
    }

    let depth_searched = board.ply_depth_searched() as i8;
    if depth_searched >= MAX_PLY as i8 {
        return Eval::exact(crate::evaluation::leaf_value(board));
    }

    let depth_remaining = ctx.limits.max_depth - depth_searched;
    let in_quiescence = depth_remaining <= 0;
    let turn = board.turn();
    let in_check = board.checking_coord != crate::defs::FLAG;

    let mut alpha = alpha;
    let mut best: Eval;

    if in_quiescence {
        if !in_check {
            if is_bare_king(board, turn) {
                return Eval::exact(-end_game_eval(board, crate::defs::opponent(turn)));
            }
            if is_bare_king(board, crate::defs::opponent(turn)) {
                return Eval::exact(end_game_eval(board, turn));
            }
        }
        if mat_strgh >= beta {
            return Eval::new(mat_strgh, WIN);
        }
        alpha = alpha.max(mat_strgh);
        best = Eval::exact(mat_strgh);
    } else {
        stats.non_q_nodes += 1;
        best = Eval::new(eval::LOSS, eval::LOSS);
    }

    let skip_probe =
        board.position.ncp_plies > 0 && board.repetition_possible_within(depth_remaining.max(0) as u32);
    if !skip_probe {
        let remaining_for_tt = depth_remaining.max(0);
        if let Some(hit) = ctx.tt.probe(board.zobrist, remaining_for_tt, in_quiescence, alpha, beta, ctx.base_ply) {
            stats.hash_hit_good += 1;
            if !hit.best_move.is_none() {
                out_pv.push(hit.best_move);
            }
            return hit.eval;
        }
    }

    stats.move_gen_nodes += 1;
    let captures_only = in_quiescence && !in_check;
    let mut moves: MoveList = match ctx.mg.generate_legal_moves(
        board,
        captures_only,
        history,
        board.position.ply,
        ctx.limits.history_window_plies,
    ) {
        Ok(m) => m,
        Err(_) => return Eval::exact(crate::evaluation::leaf_value(board)),
    };

    if moves.is_empty() {
        return if in_check {
            Eval::new(eval::LOSS, eval::LOSS)
        } else if !in_quiescence {
            Eval::DRAW
        } else {
            Eval::exact(mat_strgh)
        };
    }

    if depth_searched == 0 && !root_hint.is_none() {
        moves.bring_to_front(root_hint);
    }

    let futility_active = !in_check && (in_quiescence || depth_remaining <= 1);
    let mut best_move = Move::NONE;
    let mut best_pv: Pv = Vec::new();

    for (idx, &mv) in moves.iter().enumerate() {
        let worth = cap_worth(board, &mv);

        if futility_active && worth + mat_strgh <= alpha && !mv.gives_check() {
            best.bump_high_bound_to(worth + mat_strgh);
            if idx < moves.preferred_prefix_len() {
                break;
            }
            continue;
        }

        ctx.tt.prefetch(board.predict_zobrist_after(&mv));

        let make_ply = board.position.ply;
        let quiet = !is_capture(board, &mv) && !mv.is_promotion();

        board.make_move(mv);
        let mut child_pv: Pv = Vec::new();
        let child = minimax(
            board,
            ctx,
            history,
            -beta,
            -alpha,
            -(mat_strgh + worth),
            Move::NONE,
            stats,
            &mut child_pv,
        );
        board.unmake_move();

        if ctx.control.should_stop() {
            best.bump_high_bound_to_win();
            break;
        }

        let mut value = child.inverted();
        value.decay_to(WIN_THRESHOLD);
        best.bump_to(value);

        if best.low() > alpha {
            alpha = best.low();
            best_move = mv;
            best_pv = child_pv;
            if quiet {
                history.record(turn, mv.src, mv.dst, make_ply);
            }
        }

        if alpha >= beta {
            break;
        }
    }

    if !best_move.is_none() {
        out_pv.push(best_move);
        out_pv.extend(best_pv);
    }

    let depth_for_tt = depth_remaining.max(0);
    ctx.tt.conditional_update(board.zobrist, best, best_move, depth_for_tt, ctx.base_ply);

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::MoveGenerator;
    use crate::search::defs::{HistoryTable, SearchLimits};
    use crate::tables::Tables;
    use std::sync::Arc;

    fn context<'a>(
        mg: &'a MoveGenerator,
        tt: &'a TranspositionTable,
        control: &'a Control,
        limits: &'a SearchLimits,
    ) -> SearchContext<'a> {
        SearchContext { mg, tt, control, limits, started_at: Instant::now(), base_ply: 0 }
    }

    #[test]
    fn finds_mate_in_one() {
        let mut board =
            Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", Arc::new(Tables::new())).unwrap();
        let mg = MoveGenerator::new();
        let tt = TranspositionTable::with_size_mb(1);
        let control = Control::new();
        let limits = SearchLimits::depth(4);
        let ctx = context(&mg, &tt, &control, &limits);
        let mut history = HistoryTable::new();
        let mut stats = Stats::new();
        let mut pv = Vec::new();

        let mat_strgh = crate::evaluation::material_strength(&board);
        let result =
            minimax(&mut board, &ctx, &mut history, eval::LOSS, eval::WIN, mat_strgh, Move::NONE, &mut stats, &mut pv);

        assert!(result.detected_win());
        assert!(!pv.is_empty());
    }

    #[test]
    fn detects_stalemate_as_a_draw() {
        let mut board = Board::from_fen("8/8/8/8/8/kq6/8/K7 w - - 0 1", Arc::new(Tables::new())).unwrap();
        let mg = MoveGenerator::new();
        let tt = TranspositionTable::with_size_mb(1);
        let control = Control::new();
        let limits = SearchLimits::depth(2);
        let ctx = context(&mg, &tt, &control, &limits);
        let mut history = HistoryTable::new();
        let mut stats = Stats::new();
        let mut pv = Vec::new();

        let mat_strgh = crate::evaluation::material_strength(&board);
        let result =
            minimax(&mut board, &ctx, &mut history, eval::LOSS, eval::WIN, mat_strgh, Move::NONE, &mut stats, &mut pv);
        assert_eq!(result, Eval::DRAW);
    }

    #[test]
    fn cancellation_returns_a_conservative_bound() {
        let mut board = Board::starting(Arc::new(Tables::new()));
        let mg = MoveGenerator::new();
        let tt = TranspositionTable::with_size_mb(1);
        let control = Control::new();
        control.request_stop();
        let limits = SearchLimits::depth(4);
        let ctx = context(&mg, &tt, &control, &limits);
        let mut history = HistoryTable::new();
        let mut stats = Stats::new();
        let mut pv = Vec::new();

        let result = minimax(&mut board, &ctx, &mut history, -500, 500, 0, Move::NONE, &mut stats, &mut pv);
        assert_eq!(result.high(), WIN);
    }
}
