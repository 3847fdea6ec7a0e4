/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! The unmake stack: one record per ply made,
//! recording everything `MakeMove` could not otherwise recover.

use crate::defs::{Square, MAX_GAME_PLIES};
use crate::movegen::defs::Move;
use crate::piece::Piece;
use crate::tables::zobrist::ZobristKey;

#[derive(Debug, Clone, Copy)]
pub struct UnmakeRecord {
    pub mv: Move,
    pub captured: Piece,
    pub castle_rights: u8,
    pub ep_square: Square,
    pub checking_coord: u8,
    pub ncp_plies: u32,
    pub zobrist: ZobristKey,
    pub repeat_ply: i64,
    pub evicted_ring_entry: Option<(u32, ZobristKey)>,
}

/// A plain growable vector of `UnmakeRecord`s indexed by ply - base_ply.
/// Each search worker owns its own `Board` and therefore its own stack,
/// so no synchronization is ever needed.
#[derive(Debug, Clone)]
pub struct UnmakeStack {
    records: Vec<UnmakeRecord>,
}

impl UnmakeStack {
    pub fn new() -> Self {
        UnmakeStack { records: Vec::with_capacity(MAX_GAME_PLIES) }
    }

    pub fn push(&mut self, record: UnmakeRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> UnmakeRecord {
        self.records.pop().expect("unmake stack must not be popped past empty")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for UnmakeStack {
    fn default() -> Self {
        Self::new()
    }
}
