/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! the shared `TranspositionTable`. A fixed power-of-two
//! array of entries indexed by `zobrist & mask`, striped across a fixed
//! ring of `SHARD_COUNT` mutexes so the number of OS locks stays bounded
//! regardless of how many entries the requested byte budget buys.
//!
//! A parallel array of atomics holds just the zobrist half of each slot,
//! so a probe can reject a miss without ever touching a lock; only a
//! tentative hit pays for the mutex and the re-validation it needs.

use crate::movegen::defs::Move;
use crate::search::eval::{Eval, LOSS, WIN};
use crate::tables::zobrist::ZobristKey;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Sentinel depth marking a slot that has never been written.
pub const HASH_NOENTRY: i8 = -1;

/// Fixed ring size for the lock stripes (: "K=1024, power of
/// two"). Capacities smaller than this shrink the ring to match, so a
/// tiny table built for a unit test doesn't produce empty shards.
const MAX_SHARDS: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Entry {
    zobrist: ZobristKey,
    low: i32,
    high: i32,
    best_move: Move,
    base_ply: u32,
    depth: i8,
}

impl Entry {
    const EMPTY: Entry = Entry {
        zobrist: 0,
        low: 0,
        high: 0,
        best_move: Move::NONE,
        base_ply: 0,
        depth: HASH_NOENTRY,
    };
}

/// What a successful `probe` hands back to the caller: the stored bound
/// and the move it was computed for, suitable for both a cutoff and for
/// threading the PV through a transposition hit.
#[derive(Debug, Clone, Copy)]
pub struct TtHit {
    pub eval: Eval,
    pub best_move: Move,
}

pub struct TranspositionTable {
    capacity: usize,
    shard_count: usize,
    entries_per_shard: usize,
    /// Lock-free shadow of each slot's zobrist, indexed the same way as
    /// the locked entries.
    zobrists: Vec<AtomicU64>,
    shards: Vec<Mutex<Box<[Entry]>>>,
}

impl TranspositionTable {
    /// Build a table whose entry count is the largest power of two that
    /// fits `size_mb` megabytes, each entry costing `size_of::<Entry>()`
    /// bytes (roughly the zobrist/bound/move/ply/depth 24-byte layout
    /// describes, modulo Rust's own struct padding).
    pub fn with_size_mb(size_mb: usize) -> Self {
        let budget_bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Entry>().max(1);
        let requested = (budget_bytes / entry_size).max(1);
        let capacity = requested.next_power_of_two().min(1 << 30);
        Self::with_capacity(capacity)
    }

    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        let shard_count = capacity.min(MAX_SHARDS).next_power_of_two();
        let entries_per_shard = capacity / shard_count;

        let zobrists = (0..capacity).map(|_| AtomicU64::new(0)).collect();
        let shards = (0..shard_count)
            .map(|_| Mutex::new(vec![Entry::EMPTY; entries_per_shard].into_boxed_slice()))
            .collect();

        TranspositionTable { capacity, shard_count, entries_per_shard, zobrists, shards }
    }

    fn locate(&self, zobrist: ZobristKey) -> (usize, usize, usize) {
        let global = (zobrist as usize) & (self.capacity - 1);
        let shard = global & (self.shard_count - 1);
        let local = global / self.shard_count;
        (global, shard, local)
    }

    /// Issue a best-effort cache-warming touch for `zobrist`'s slot ahead
    /// of the `probe`/`conditional_update` call the caller knows is
    /// coming. Safe Rust has no stable prefetch
    /// intrinsic; a relaxed atomic load pulls the cache line in as a side
    /// effect, which is all a hint needs to do.
    pub fn prefetch(&self, zobrist: ZobristKey) {
        let (global, _, _) = self.locate(zobrist);
        self.zobrists[global].load(Ordering::Relaxed);
    }

    /// `IsHit`: a lock-free zobrist mismatch is an immediate
    /// miss. On a tentative match, the shard lock is taken and the entry
    /// re-validated, since the lock-free read can race a concurrent
    /// writer. A hit additionally requires the stored depth to cover
    /// `remaining_depth` (waived in quiescence) and the stored bound to
    /// be exact, a cutoff against `alpha`/`beta`, or a forced mate/loss.
    /// Hits refresh the entry's base-ply so it survives generation
    /// eviction policies.
    pub fn probe(
        &self,
        zobrist: ZobristKey,
        remaining_depth: i8,
        in_quiescence: bool,
        alpha: i32,
        beta: i32,
        searching_base_ply: u32,
    ) -> Option<TtHit> {
        let (global, shard, local) = self.locate(zobrist);
        if self.zobrists[global].load(Ordering::Relaxed) != zobrist {
            return None;
        }

        let mut guard = self.shards[shard].lock().unwrap();
        let entry = &mut guard[local];
        if entry.depth == HASH_NOENTRY || entry.zobrist != zobrist {
            return None;
        }
        if !in_quiescence && (entry.depth as i32) < (remaining_depth as i32) {
            return None;
        }

        let eval = Eval::new(entry.low, entry.high);
        let is_hit = eval.is_exact()
            || eval.low() >= beta
            || eval.high() <= alpha
            || eval.low() == WIN
            || eval.high() == LOSS;
        if !is_hit {
            return None;
        }

        entry.base_ply = searching_base_ply;
        Some(TtHit { eval, best_move: entry.best_move })
    }

    /// `ConditionalUpdate`: write the new entry if the slot is
    /// empty, the new search went deeper, the stored entry is from an
    /// older search generation (by base-ply), or the depths tie and the
    /// new bound is narrower (more informative) than the stored one.
    pub fn conditional_update(
        &self,
        zobrist: ZobristKey,
        eval: Eval,
        best_move: Move,
        depth: i8,
        base_ply: u32,
    ) {
        let (global, shard, local) = self.locate(zobrist);
        let mut guard = self.shards[shard].lock().unwrap();
        let entry = &mut guard[local];

        let should_write = entry.depth == HASH_NOENTRY
            || depth > entry.depth
            || entry.base_ply < base_ply
            || (depth == entry.depth && eval.range() < Eval::new(entry.low, entry.high).range());

        if should_write {
            entry.zobrist = zobrist;
            entry.low = eval.low();
            entry.high = eval.high();
            entry.best_move = best_move;
            entry.base_ply = base_ply;
            entry.depth = depth;
            self.zobrists[global].store(zobrist, Ordering::Relaxed);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored entry back to empty, keeping the allocation —
    /// used when starting a brand-new game rather than a new search ply
    /// within the same game.
    pub fn clear(&self) {
        for shard in &self.shards {
            let mut guard = shard.lock().unwrap();
            for entry in guard.iter_mut() {
                *entry = Entry::EMPTY;
            }
        }
        for z in &self.zobrists {
            z.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::defs::CastleKind;
    use crate::piece::Kind;

    fn dummy_move(src: crate::defs::Square, dst: crate::defs::Square) -> Move {
        Move { src, dst, promotion: Kind::Empty, check: crate::defs::FLAG, castle: CastleKind::None }
    }

    #[test]
    fn miss_on_empty_table() {
        let tt = TranspositionTable::with_size_mb(1);
        assert!(tt.probe(0xDEAD_BEEF, 4, false, -1000, 1000, 0).is_none());
    }

    #[test]
    fn exact_entry_round_trips() {
        let tt = TranspositionTable::with_size_mb(1);
        let zobrist = 0x1234_5678_9ABC_DEF0;
        let mv = dummy_move(12, 28);
        tt.conditional_update(zobrist, Eval::exact(42), mv, 6, 10);

        let hit = tt.probe(zobrist, 4, false, -1000, 1000, 10).expect("expected a hit");
        assert_eq!(hit.eval, Eval::exact(42));
        assert_eq!(hit.best_move, mv);
    }

    #[test]
    fn insufficient_depth_misses_outside_quiescence() {
        let tt = TranspositionTable::with_size_mb(1);
        let zobrist = 0xAAAA_BBBB_CCCC_DDDD;
        tt.conditional_update(zobrist, Eval::exact(10), dummy_move(1, 2), 2, 0);
        assert!(tt.probe(zobrist, 6, false, -1000, 1000, 0).is_none());
        assert!(tt.probe(zobrist, 6, true, -1000, 1000, 0).is_some());
    }

    #[test]
    fn deeper_search_overwrites_shallower() {
        let tt = TranspositionTable::with_size_mb(1);
        let zobrist = 0x1111_2222_3333_4444;
        tt.conditional_update(zobrist, Eval::new(5, 20), dummy_move(0, 1), 3, 0);
        tt.conditional_update(zobrist, Eval::exact(9), dummy_move(2, 3), 8, 0);
        let hit = tt.probe(zobrist, 8, false, -1000, 1000, 0).unwrap();
        assert_eq!(hit.eval, Eval::exact(9));
    }

    #[test]
    fn older_generation_is_replaced_even_at_equal_depth() {
        let tt = TranspositionTable::with_size_mb(1);
        let zobrist = 0x5555_6666_7777_8888;
        tt.conditional_update(zobrist, Eval::exact(1), dummy_move(4, 5), 4, 0);
        tt.conditional_update(zobrist, Eval::exact(2), dummy_move(6, 7), 4, 1);
        let hit = tt.probe(zobrist, 4, false, -1000, 1000, 1).unwrap();
        assert_eq!(hit.eval, Eval::exact(2));
    }

    #[test]
    fn fails_high_and_forced_mate_bounds_count_as_hits() {
        let tt = TranspositionTable::with_size_mb(1);
        let zobrist_beta = 0x9999_0000_1111_2222;
        tt.conditional_update(zobrist_beta, Eval::new(500, 900), dummy_move(8, 9), 5, 0);
        assert!(tt.probe(zobrist_beta, 4, false, -1000, 400, 0).is_some());

        let zobrist_mate = 0x9999_0000_1111_3333;
        tt.conditional_update(zobrist_mate, Eval::new(WIN, WIN + 50), dummy_move(10, 11), 5, 0);
        assert!(tt.probe(zobrist_mate, 4, false, -1000, 1000, 0).is_some());
    }
}
