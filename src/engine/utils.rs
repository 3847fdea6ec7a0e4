/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Small helpers a driver needs around the `Engine` surface: applying a
//! move given in CAN text") and reading back the
//! current position as FEN, without reaching into `Engine`'s private
//! `Board`.

use super::Engine;
use super::defs::ErrNormal;
use crate::movegen::can;
use crate::movegen::MoveGenerator;
use crate::search::defs::HistoryTable;

impl Engine {
    /// Parses `text` as CAN against the current position's legal moves
    /// and applies it, returning the applied move's CAN form on success.
    /// Used by drivers relaying a human/GUI move ( `IllegalMove`
    /// is the error this surfaces as).
    pub fn apply_can_move(&mut self, text: &str) -> Result<String, String> {
        let mg = MoveGenerator::new();
        let history = HistoryTable::new();
        let legal = mg
            .generate_legal_moves(&self.board, false, &history, 0, 0)
            .map_err(|_| ErrNormal::NOT_LEGAL.to_string())?;
        let mv = can::parse(text, &self.board, &legal).map_err(|_| ErrNormal::BAD_CAN.to_string())?;
        self.board.make_move(mv);
        Ok(can::format(&mv))
    }

    /// The current position rendered as FEN, for drivers that display or
    /// log it.
    pub fn fen(&self) -> String {
        crate::board::fen::to_fen(&self.board.position)
    }
}
