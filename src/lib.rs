/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Arctic: the core of a chess playing program — position
//! representation and incremental state machine, legal move generation
//! with pin/discovered-check analysis, an alpha-beta search with
//! quiescence, a shared transposition table, and the coordinator that
//! drives iterative deepening across a worker pool. The curses UI, the
//! XBoard/UCI text protocols, clock accounting, and game save/restore are
//! external collaborators and live outside this crate.

pub mod board;
pub mod defs;
pub mod engine;
pub mod evaluation;
pub mod misc;
pub mod movegen;
pub mod piece;
pub mod search;
pub mod tables;

pub use board::Board;
pub use board::fen::START_POSITION_FEN;
pub use evaluation::evaluate_position;
pub use movegen::MoveGenerator; 