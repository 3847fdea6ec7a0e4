/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Zobrist randoms: one 64-bit value per (piece-id, square), per
//! en-passant file, per castle-rights bitmask value, and one for side to
//! move. Seeded deterministically with `rand_chacha` so a given process
//! always derives the same keys, which keeps transposition-table content
//! and perft node counts reproducible across runs.

use crate::defs::NUM_SQUARES;
use crate::piece::NUM_PIECE_IDS;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

pub type ZobristKey = u64;

const ZOBRIST_SEED: u64 = 0x415243_54494300; // "ARCTIC" in the low bytes

pub struct ZobristRandoms {
    pub piece_square: [[ZobristKey; NUM_SQUARES]; NUM_PIECE_IDS],
    pub en_passant_file: [ZobristKey; 8],
    /// Indexed by the raw 4-bit castle-rights value (0..=15).
    pub castle_rights: [ZobristKey; 16],
    pub side_to_move: ZobristKey,
}

impl ZobristRandoms {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_square = [[0u64; NUM_SQUARES]; NUM_PIECE_IDS];
        for piece_id in 0..NUM_PIECE_IDS {
            // Piece ids 0 and 1 are the two Empty identities:
            // requires XORing an empty piece in/out to be a no-op, so
            // those rows are left at zero instead of drawn from the rng.
            if piece_id < 2 {
                continue;
            }
            for sq in 0..NUM_SQUARES {
                piece_square[piece_id][sq] = rng.next_u64();
            }
        }

        let mut en_passant_file = [0u64; 8];
        for f in en_passant_file.iter_mut() {
            *f = rng.next_u64();
        }

        let mut castle_rights = [0u64; 16];
        for c in castle_rights.iter_mut() {
            *c = rng.next_u64();
        }

        ZobristRandoms {
            piece_square,
            en_passant_file,
            castle_rights,
            side_to_move: rng.next_u64(),
        }
    }
}

impl Default for ZobristRandoms {
    fn default() -> Self {
        Self::new()
    }
}
