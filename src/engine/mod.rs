/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! The ambient Engine command loop: the abstract
//! command/response vocabulary describes ("Engine API (core ↔
//! driver)"), wired onto the `SearchCoordinator`. A driver translating a
//! concrete protocol (UCI, XBoard, a GUI) into these commands is out of
//! scope; `Engine` is the stable surface it targets.

pub mod commands;
pub mod defs;
pub mod utils;

use crate::board::Board;
use crate::engine::defs::{ErrFatal, Response, Settings};
use crate::search::coordinator::{SearchCommand, SearchCoordinator};
use crate::search::tt::TranspositionTable;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Commands a driver issues. `config`
/// carries the raw `(key, value)` text pair; `Settings::set` owns parsing
/// and clamping.
pub enum EngineCommand {
    NewGame,
    SetPosition(Board),
    Think,
    Ponder,
    MoveNow,
    Bail,
    Config(String, String),
    Quit,
}

/// Owns the current position, the runtime `Settings`, and a
/// `SearchCoordinator` running on its own thread; `execute` dispatches
/// commands onto that thread and `responses()` is where its
/// `stats`/`pv`/`move`/`draw`/`resign` replies arrive.
pub struct Engine {
    pub(crate) settings: Settings,
    pub(crate) board: Board,
    pub(crate) tt: Arc<TranspositionTable>,
    pub(crate) search_tx: Sender<SearchCommand>,
    response_rx: Receiver<Response>,
    coordinator_handle: Option<thread::JoinHandle<()>>,
    pub(crate) quit: bool,
}

impl Engine {
    pub fn new(settings: Settings, board: Board) -> Self {
        let tt = Arc::new(TranspositionTable::with_size_mb(settings.tt_size));
        let (search_tx, search_rx) = bounded::<SearchCommand>(4);
        let (response_tx, response_rx) = bounded::<Response>(256);
        let mut coordinator = SearchCoordinator::new(Arc::clone(&tt), settings.threads);
        let coordinator_handle = Some(thread::spawn(move || coordinator.run(search_rx, response_tx)));
        Engine { settings, board, tt, search_tx, response_rx, coordinator_handle, quit: false }
    }

    /// Where `stats`/`pv`/`move`/`draw`/`resign` responses arrive.
    pub fn responses(&self) -> &Receiver<Response> {
        &self.response_rx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn execute(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::NewGame => self.new_game(),
            EngineCommand::SetPosition(board) => self.set_position(board),
            EngineCommand::Think => self.think(),
            EngineCommand::Ponder => self.ponder(),
            EngineCommand::MoveNow => {
                let _ = self.search_tx.send(SearchCommand::MoveNow);
            }
            EngineCommand::Bail => {
                let _ = self.search_tx.send(SearchCommand::Bail);
            }
            EngineCommand::Config(key, value) => self.config(&key, &value),
            EngineCommand::Quit => self.quit = true,
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let _ = self.search_tx.send(SearchCommand::Shutdown);
        if let Some(handle) = self.coordinator_handle.take() {
            handle.join().expect(ErrFatal::THREAD);
        }
    }
}
