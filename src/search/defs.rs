/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Shared search types: the principal-variation buffer, the node/hash
//! counters reported to the driver, the history heuristic table, the
//! cooperative cancellation flag `minimax` polls, and the mechanical
//! depth/node/time limits the coordinator honors (: no
//! phase-aware time-budget heuristic lives here, only the inert limits).

use crate::defs::{NUM_SIDES, NUM_SQUARES};
use crate::movegen::defs::Move;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Deepest ply `minimax`/quiescence will recurse to before forcing a leaf
/// evaluation, bounding the history table and PV buffer sizes.
pub const MAX_PLY: usize = 128;

/// A line of moves from some node to the end of the principal variation,
/// written bottom-up by each returning `minimax` call.
pub type Pv = Vec<Move>;

/// Running counters for one search, reported to the driver as
/// `stats(nodes, nonQNodes, moveGenNodes, hashHitGood, hashFullPerMille)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub nodes: u64,
    pub non_q_nodes: u64,
    pub move_gen_nodes: u64,
    pub hash_hit_good: u64,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn merge(&mut self, other: &Stats) {
        self.nodes += other.nodes;
        self.non_q_nodes += other.non_q_nodes;
        self.move_gen_nodes += other.move_gen_nodes;
        self.hash_hit_good += other.hash_hit_good;
    }
}

/// `hist[side][src][dst] -> ply`: the ply at which a quiet move last
/// caused a best-move update, used to prefer recently-useful quiet moves
/// in move ordering.
pub struct HistoryTable {
    table: [[[u32; NUM_SQUARES]; NUM_SQUARES]; NUM_SIDES],
}

impl HistoryTable {
    pub fn new() -> Self {
        HistoryTable { table: [[[0; NUM_SQUARES]; NUM_SQUARES]; NUM_SIDES] }
    }

    pub fn record(&mut self, side: crate::defs::Side, src: crate::defs::Square, dst: crate::defs::Square, ply: u32) {
        self.table[side][src as usize][dst as usize] = ply;
    }

    /// Is `(src, dst)` "hot": recorded within `window` plies of `current_ply`?
    pub fn is_hot(&self, side: crate::defs::Side, src: crate::defs::Square, dst: crate::defs::Square, current_ply: u32, window: u32) -> bool {
        let recorded = self.table[side][src as usize][dst as usize];
        recorded != 0 && current_ply.saturating_sub(recorded) <= window
    }

    pub fn clear(&mut self) {
        self.table = [[[0; NUM_SQUARES]; NUM_SQUARES]; NUM_SIDES];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A single shared cancellation flag, polled at every move iteration
/// inside `minimax` and before every transposition probe. Cloning an
/// `Arc<Control>` across worker threads gives every in-flight search the
/// same stop signal.
#[derive(Debug, Default)]
pub struct Control {
    stop: AtomicBool,
}

impl Control {
    pub fn new() -> Self {
        Control { stop: AtomicBool::new(false) }
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.stop.store(false, Ordering::Relaxed);
    }
}

/// The mechanical limits a search obeys: a fixed depth, a node budget, or
/// a wall-clock allowance. No phase-aware allocation heuristic decides
/// these values here — the coordinator
/// or driver sets them and the search stops once any is exceeded.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: i8,
    pub max_nodes: Option<u64>,
    pub move_time_ms: Option<u128>,
    /// Whether a detected forced loss should surface as `Response::Resign`
    /// rather than playing on to the bitter end (spec.md §6's
    /// `can-resign` config key).
    pub can_resign: bool,
    /// How many plies back a quiet move's last best-move update still
    /// counts as "hot" for move ordering (spec.md §6's
    /// `history-window-plies` config key).
    pub history_window_plies: u32,
    /// Shuffle the root move list before each iterative-deepening pass
    /// (spec.md §6's `random-moves` config key), so repeated games from
    /// the same position don't always pick the same move among ties.
    pub random_moves: bool,
}

impl SearchLimits {
    pub fn depth(max_depth: i8) -> Self {
        SearchLimits {
            max_depth,
            max_nodes: None,
            move_time_ms: None,
            can_resign: true,
            history_window_plies: 16,
            random_moves: false,
        }
    }

    pub fn infinite() -> Self {
        SearchLimits {
            max_depth: MAX_PLY as i8,
            max_nodes: None,
            move_time_ms: None,
            can_resign: true,
            history_window_plies: 16,
            random_moves: false,
        }
    }

    pub fn exceeded(&self, depth_searched: i8, stats: &Stats, started_at: Instant) -> bool {
        if depth_searched > self.max_depth {
            return true;
        }
        if let Some(max_nodes) = self.max_nodes {
            if stats.nodes >= max_nodes {
                return true;
            }
        }
        if let Some(budget) = self.move_time_ms {
            if started_at.elapsed().as_millis() >= budget {
                return true;
            }
        }
        false
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits::infinite()
    }
}
