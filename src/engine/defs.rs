/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Shared engine types: fatal/recoverable error strings, the
//! runtime `Settings` the `config(key, value)` command mutates,
//! and the `EngineOption` vocabulary a driver needs to describe those keys
//! over whatever protocol it implements.

use crate::movegen::defs::Move;
use crate::search::defs::Stats;

pub type EngineRunResult = Result<(), String>;

/// Messages reported on fatal engine errors: these should never happen,
/// and if they do the engine is in an unknown state and terminates
/// without attempting recovery.
pub struct ErrFatal;
impl ErrFatal {
    pub const LOCK: &'static str = "Lock failed.";
    pub const THREAD: &'static str = "Thread has failed.";
    pub const CHANNEL: &'static str = "Broken channel.";
    pub const INVARIANT: &'static str = "Board consistency check failed (InternalInvariantViolated).";
}

/// Recoverable errors surfaced to the driver as plain strings.
pub struct ErrNormal;
impl ErrNormal {
    pub const NOT_LEGAL: &'static str = "This is not a legal move in this position.";
    pub const FEN_FAILED: &'static str = "Setting up FEN failed. Position not changed.";
    pub const BAD_CAN: &'static str = "Could not parse move notation.";
}

/// The runtime configuration surface a driver can read and adjust via
/// `config(key, value)`, plus the process-startup values the CLI passes in.
#[derive(Debug, Clone)]
pub struct Settings {
    pub threads: usize,
    pub quiet: bool,
    pub tt_size: usize,
    pub max_depth: i8,
    pub max_nodes: Option<u64>,
    pub max_memory_bytes: Option<u64>,
    pub max_threads: usize,
    pub random_moves: bool,
    pub can_resign: bool,
    pub history_window_plies: u32,
}

impl Settings {
    pub fn new(threads: usize, quiet: bool, tt_size: usize) -> Self {
        Settings {
            threads: threads.max(1),
            quiet,
            tt_size,
            max_depth: crate::search::defs::MAX_PLY as i8,
            max_nodes: None,
            max_memory_bytes: None,
            max_threads: threads.max(1),
            random_moves: false,
            can_resign: true,
            history_window_plies: 16,
        }
    }

    /// Applies a `config(key, value)` pair, clamping
    /// out-of-range values to the legal range with a `log::warn!` rather
    /// than rejecting them.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "max-depth" => self.max_depth = clamp_parse(value, 1, crate::search::defs::MAX_PLY as i64, key)? as i8,
            "max-nodes" => self.max_nodes = Some(value.parse().map_err(|_| bad_int(key))?),
            "max-memory-bytes" => self.max_memory_bytes = Some(value.parse().map_err(|_| bad_int(key))?),
            "max-threads" => self.max_threads = clamp_parse(value, 1, 256, key)? as usize,
            "random-moves" => self.random_moves = value.parse().map_err(|_| bad_bool(key))?,
            "can-resign" => self.can_resign = value.parse().map_err(|_| bad_bool(key))?,
            "history-window-plies" => self.history_window_plies = clamp_parse(value, 1, 4096, key)? as u32,
            other => return Err(format!("unknown config key: {other}")),
        }
        Ok(())
    }
}

fn bad_int(key: &str) -> String {
    format!("{key}: expected an integer")
}
fn bad_bool(key: &str) -> String {
    format!("{key}: expected true/false")
}

fn clamp_parse(value: &str, min: i64, max: i64, key: &str) -> Result<i64, String> {
    let parsed: i64 = value.parse().map_err(|_| bad_int(key))?;
    let clamped = parsed.clamp(min, max);
    if clamped != parsed {
        log::warn!("config {key}={parsed} out of range [{min}, {max}], clamped to {clamped}");
    }
    Ok(clamped)
}

/// Information delivered to the master loop from the search coordinator,
/// carried alongside incoming commands on the same channel so comm and
/// search events multiplex onto a single receiver.
#[derive(Debug, Clone)]
pub enum Response {
    Stats(Stats),
    Pv { depth: i8, eval: i32, moves: Vec<Move> },
    Move(Move),
    Draw(Option<Move>),
    Resign,
}

pub enum UiElement {
    Spin,
    Button,
}

pub struct EngineOption {
    pub name: &'static str,
    pub ui_element: UiElement,
    pub default: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl EngineOption {
    pub fn new(
        name: &'static str,
        ui_element: UiElement,
        default: Option<String>,
        min: Option<String>,
        max: Option<String>,
    ) -> Self {
        Self { name, ui_element, default, min, max }
    }
}

/// The stable vocabulary of option names a driver's protocol front-end
/// maps onto `Settings::set`; the protocol text parsing
/// itself belongs to that (out-of-scope) driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOptionName {
    Hash(String),
    ClearHash,
    Threads(String),
    MaxDepth(String),
    MaxNodes(String),
    RandomMoves(String),
    CanResign(String),
    Nothing,
}

impl EngineOptionName {
    pub const HASH: &'static str = "Hash";
    pub const CLEAR_HASH: &'static str = "Clear Hash";
    pub const THREADS: &'static str = "Threads";
    pub const MAX_DEPTH: &'static str = "max-depth";
    pub const MAX_NODES: &'static str = "max-nodes";
    pub const RANDOM_MOVES: &'static str = "random-moves";
    pub const CAN_RESIGN: &'static str = "can-resign";
}

pub struct EngineOptionDefaults;
impl EngineOptionDefaults {
    pub const HASH_DEFAULT: usize = 32;
    pub const HASH_MIN: usize = 0;
    pub const HASH_MAX: usize = 65536;
    pub const THREADS_DEFAULT: usize = 1;
    pub const THREADS_MAX: usize = 256;
}
