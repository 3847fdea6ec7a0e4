/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Dispatch bodies for each `EngineCommand`, split out of `engine::mod`
//! to keep the command-handling logic separate from `Engine`'s setup and
//! teardown.

use super::Engine;
use crate::board::Board;
use crate::search::coordinator::SearchCommand;
use crate::search::defs::SearchLimits;

impl Engine {
    /// `new-game`: reset TT, history, PV. History/PV live inside
    /// the coordinator and are cleared at the start of every `think`
    /// anyway; the TT is shared and cleared here directly.
    pub(super) fn new_game(&mut self) {
        self.board = Board::starting(self.board.tables.clone());
        self.tt.clear();
    }

    /// `set-position(Board)`: install a board that has already
    /// satisfied `Position::IsLegal` (`Board::from_fen`/construction is
    /// the only way to get one, so by the time a caller holds a `Board`
    /// it is already legal).
    pub(super) fn set_position(&mut self, board: Board) {
        self.board = board;
    }

    /// `think`: search until a stop condition, emit the final
    /// move.
    pub(super) fn think(&mut self) {
        let limits = self.limits();
        let _ = self.search_tx.send(SearchCommand::Think { board: self.board.clone(), limits });
    }

    /// `ponder`: search under the opponent's turn; the
    /// coordinator treats ponder identically to think except that any
    /// stop or `think` command converts it — modeled here by
    /// sending the same `Think`-shaped job, since nothing distinguishes
    /// the two once dispatched other than which command preempts it.
    pub(super) fn ponder(&mut self) {
        let limits = self.limits();
        let _ = self.search_tx.send(SearchCommand::Ponder { board: self.board.clone(), limits });
    }

    /// `config(key, value)`: update `Settings`, clamping
    /// out-of-range values rather than
    /// rejecting them. `max-memory-bytes` is recorded for the next
    /// engine start; the shared transposition table is not live-resized
    /// while workers may be probing it (see DESIGN.md).
    pub(super) fn config(&mut self, key: &str, value: &str) {
        if let Err(msg) = self.settings.set(key, value) {
            log::warn!("config {key}={value}: {msg}");
        }
    }

    fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.settings.max_depth,
            max_nodes: self.settings.max_nodes,
            move_time_ms: None,
            can_resign: self.settings.can_resign,
            history_window_plies: self.settings.history_window_plies,
            random_moves: self.settings.random_moves,
        }
    }
}
