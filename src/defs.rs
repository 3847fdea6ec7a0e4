/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Core scalar types shared by every other module: squares, sides,
//! directions, and the sentinel values used throughout the board and
//! move generator instead of `Option`.

/// A board square, 0 (a1) .. 63 (h8), rank = index >> 3, file = index & 7.
pub type Square = u8;

/// Sentinel meaning "no square" / "no en-passant target" / "no direction".
pub const FLAG: u8 = 0xFF;

pub const NUM_SQUARES: usize = 64;
pub const NUM_SIDES: usize = 2;

/// Side to move / piece color.
pub type Side = usize;

pub struct Sides;
impl Sides {
    pub const WHITE: Side = 0;
    pub const BLACK: Side = 1;
    pub const BOTH: usize = 2;
}

#[inline(always)]
pub fn opponent(side: Side) -> Side {
    side ^ 1
}

/// The eight precomputed ray directions, plus the two non-directional
/// relation codes used by `tables::DIR`.
pub struct Directions;
impl Directions {
    pub const NW: u8 = 0;
    pub const N: u8 = 1;
    pub const NE: u8 = 2;
    pub const E: u8 = 3;
    pub const SE: u8 = 4;
    pub const S: u8 = 5;
    pub const SW: u8 = 6;
    pub const W: u8 = 7;
    pub const NUM_DIRS: usize = 8;
    /// `tables::DIR[a][b]` is this when b is a knight-move away from a.
    pub const KNIGHT: u8 = 8;
    /// `tables::DIR[a][b]` is this when a and b share no ray or knight hop.
    pub const DIRFLAG: u8 = FLAG;
}

/// True for E/W/N/S (rank-or-file, "rook-like") directions.
#[inline(always)]
pub fn is_rook_direction(dir: u8) -> bool {
    dir & 1 == 1
}

#[inline(always)]
pub fn file_of(sq: Square) -> u8 {
    sq & 7
}

#[inline(always)]
pub fn rank_of(sq: Square) -> u8 {
    sq >> 3
}

#[inline(always)]
pub fn square_of(file: u8, rank: u8) -> Square {
    (rank << 3) | file
}

/// `checking-coord`: FLAG (not in check), DOUBLE_CHECK, or a checker square.
pub const DOUBLE_CHECK: u8 = 0xFE;

/// Castle-rights bitmask bits, one per (side, wing).
pub struct CastleRights;
impl CastleRights {
    pub const WHITE_OO: u8 = 1 << 0;
    pub const WHITE_OOO: u8 = 1 << 1;
    pub const BLACK_OO: u8 = 1 << 2;
    pub const BLACK_OOO: u8 = 1 << 3;
    pub const ALL: u8 = Self::WHITE_OO | Self::WHITE_OOO | Self::BLACK_OO | Self::BLACK_OOO;
}

/// Size of the fixed-capacity repetition ring; must be a power of two and
/// at least 128 so the 50-move rule always fits within the window.
pub const REPETITION_RING_SIZE: usize = 128;

/// Maximum plies a single game (or search line) is expected to carry,
/// sizing the unmake stack's initial allocation.
pub const MAX_GAME_PLIES: usize = 1024;

/// Upper bound on legal moves in any standard chess position; comfortably
/// above the theoretical maximum (218) with headroom for pseudo-legal
/// over-generation before filtering.
pub const MAX_LEGAL_MOVES: usize = 255;

/// Identifying strings for the CLI `--version`/`--help` banner and the
/// engine's `id`-style self-description; no functional role in the core.
pub struct About;
impl About {
    pub const ENGINE: &'static str = "Arctic";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    pub const AUTHOR: &'static str = "The Arctic authors";
    pub const EMAIL: &'static str = "arctic@example.invalid";
    pub const WEBSITE: &'static str = "Arctic is a chess engine core.";
}
