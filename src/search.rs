/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Components G, H, I, J: `Eval`, `TranspositionTable`, the single-ply
//! `minimax` search function, and the `SearchCoordinator` that drives
//! iterative deepening and root-parallel workers on top of it.

// Partial hash hits (using a TT entry's bound to tighten alpha/beta without
// trusting its move at a shallower depth than stored) are intentionally not
// implemented here; we only use exact-depth-or-deeper hits.

pub mod alpha_beta;
pub mod coordinator;
pub mod defs;
pub mod eval;
pub mod tt;

pub use eval::Eval;
pub use tt::TranspositionTable;
