/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! One-time precomputed tables: ray walks, knight/pawn move tables, the
//! direction and distance relations, and zobrist randoms. Built once
//! behind an `Arc` and shared between every `Board` clone.

pub mod zobrist;

use crate::defs::{file_of, rank_of, square_of, Directions, Side, Sides, Square, FLAG, NUM_SQUARES};
use crate::piece::NUM_PIECE_IDS;
use zobrist::ZobristRandoms;

/// Step deltas for the eight ray directions, indexed the same as
/// `Directions::{NW,N,NE,E,SE,S,SW,W}`.
const RAY_DELTAS: [(i8, i8); 8] = [
    (-1, 1),  // NW
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (1, -1),  // SE
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
];

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = RAY_DELTAS;

/// White's knight move preference: advancing moves first, then
/// center-biased file choices; black mirrors this. This only
/// affects move-ordering quality, never legality.
const KNIGHT_ORDER_WHITE: [usize; 8] = [0, 1, 7, 2, 6, 3, 5, 4];
const KNIGHT_ORDER_BLACK: [usize; 8] = [4, 5, 3, 6, 2, 7, 1, 0];
const KING_ORDER_WHITE: [usize; 8] = [1, 2, 0, 3, 7, 4, 6, 5];
const KING_ORDER_BLACK: [usize; 8] = [5, 6, 4, 7, 3, 0, 2, 1];

fn step(sq: Square, d: (i8, i8)) -> Option<Square> {
    let f = file_of(sq) as i8 + d.0;
    let r = rank_of(sq) as i8 + d.1;
    if (0..8).contains(&f) && (0..8).contains(&r) {
        Some(square_of(f as u8, r as u8))
    } else {
        None
    }
}

/// Pawn move table slot indices: two capture squares, the
/// single-push square, the double-push square.
pub struct PawnSlot;
impl PawnSlot {
    pub const CAP0: usize = 0;
    pub const CAP1: usize = 1;
    pub const PUSH1: usize = 2;
    pub const PUSH2: usize = 3;
}

pub struct Tables {
    /// `rays[square][direction]` is the sequence of squares reached by
    /// stepping `direction` from `square`, nearest first.
    pub rays: [[Vec<Square>; 8]; NUM_SQUARES],
    /// Ordered (by color preference) in-board knight destinations.
    pub knight_moves: [[Vec<Square>; 2]; NUM_SQUARES],
    /// Ordered (by color preference) in-board king destinations.
    pub king_moves: [[Vec<Square>; 2]; NUM_SQUARES],
    /// `pawn_moves[side][square][slot]`, FLAG where not applicable.
    pub pawn_moves: [[[Square; 4]; NUM_SQUARES]; 2],
    /// `dir[a][b]`: ray direction 0-7, `Directions::KNIGHT` (8) if `b` is a
    /// knight hop from `a`, `Directions::DIRFLAG` otherwise.
    pub dir: [[u8; NUM_SQUARES]; NUM_SQUARES],
    pub distance: [[u8; NUM_SQUARES]; NUM_SQUARES],
    pub center_distance: [u8; NUM_SQUARES],
    pub zobrist: ZobristRandoms,
}

const CENTER_SQUARES: [Square; 4] = [27, 28, 35, 36]; // d4 e4 d5 e5

fn chebyshev(a: Square, b: Square) -> u8 {
    let df = (file_of(a) as i16 - file_of(b) as i16).unsigned_abs() as u8;
    let dr = (rank_of(a) as i16 - rank_of(b) as i16).unsigned_abs() as u8;
    df.max(dr)
}

impl Tables {
    pub fn new() -> Self {
        let empty_vec_ray = || -> [Vec<Square>; 8] {
            [vec![], vec![], vec![], vec![], vec![], vec![], vec![], vec![]]
        };
        let mut rays: [[Vec<Square>; 8]; NUM_SQUARES] =
            std::array::from_fn(|_| empty_vec_ray());
        let mut dir = [[Directions::DIRFLAG; NUM_SQUARES]; NUM_SQUARES];

        for sq in 0..NUM_SQUARES as Square {
            for (d, delta) in RAY_DELTAS.iter().enumerate() {
                let mut cur = sq;
                while let Some(next) = step(cur, *delta) {
                    rays[sq as usize][d].push(next);
                    dir[sq as usize][next as usize] = d as u8;
                    cur = next;
                }
            }
        }

        let mut knight_moves: [[Vec<Square>; 2]; NUM_SQUARES] =
            std::array::from_fn(|_| [vec![], vec![]]);
        for sq in 0..NUM_SQUARES as Square {
            let mut raw = vec![];
            for delta in KNIGHT_DELTAS.iter() {
                if let Some(dst) = step(sq, *delta) {
                    raw.push(dst);
                    dir[sq as usize][dst as usize] = Directions::KNIGHT;
                }
            }
            for (side, order) in [KNIGHT_ORDER_WHITE, KNIGHT_ORDER_BLACK].iter().enumerate() {
                let mut ordered = vec![];
                for &idx in order.iter() {
                    if let Some(dst) = step(sq, KNIGHT_DELTAS[idx]) {
                        ordered.push(dst);
                    }
                }
                debug_assert_eq!(ordered.len(), raw.len());
                knight_moves[sq as usize][side] = ordered;
            }
        }

        let mut king_moves: [[Vec<Square>; 2]; NUM_SQUARES] =
            std::array::from_fn(|_| [vec![], vec![]]);
        for sq in 0..NUM_SQUARES as Square {
            for (side, order) in [KING_ORDER_WHITE, KING_ORDER_BLACK].iter().enumerate() {
                let mut ordered = vec![];
                for &idx in order.iter() {
                    if let Some(dst) = step(sq, KING_DELTAS[idx]) {
                        ordered.push(dst);
                    }
                }
                king_moves[sq as usize][side] = ordered;
            }
        }

        let mut pawn_moves = [[[FLAG; 4]; NUM_SQUARES]; 2];
        for sq in 0..NUM_SQUARES as Square {
            let rank = rank_of(sq);
            if rank == 0 || rank == 7 {
                continue; // pawns never rest here; table entries stay FLAG
            }
            for side in [Sides::WHITE, Sides::BLACK] {
                let fwd: i8 = if side == Sides::WHITE { 1 } else { -1 };
                let start_rank = if side == Sides::WHITE { 1 } else { 6 };
                if let Some(s) = step(sq, (-1, fwd)) {
                    pawn_moves[side][sq as usize][PawnSlot::CAP0] = s;
                }
                if let Some(s) = step(sq, (1, fwd)) {
                    pawn_moves[side][sq as usize][PawnSlot::CAP1] = s;
                }
                if let Some(s) = step(sq, (0, fwd)) {
                    pawn_moves[side][sq as usize][PawnSlot::PUSH1] = s;
                    if rank == start_rank {
                        if let Some(s2) = step(s, (0, fwd)) {
                            pawn_moves[side][sq as usize][PawnSlot::PUSH2] = s2;
                        }
                    }
                }
            }
        }

        let mut distance = [[0u8; NUM_SQUARES]; NUM_SQUARES];
        for a in 0..NUM_SQUARES as Square {
            for b in 0..NUM_SQUARES as Square {
                distance[a as usize][b as usize] = chebyshev(a, b);
            }
        }

        let mut center_distance = [0u8; NUM_SQUARES];
        for sq in 0..NUM_SQUARES as Square {
            center_distance[sq as usize] = CENTER_SQUARES
                .iter()
                .map(|&c| {
                    let df = (file_of(sq) as i16 - file_of(c) as i16).unsigned_abs() as u8;
                    let dr = (rank_of(sq) as i16 - rank_of(c) as i16).unsigned_abs() as u8;
                    df + dr
                })
                .min()
                .unwrap();
        }

        Tables {
            rays,
            knight_moves,
            king_moves,
            pawn_moves,
            dir,
            distance,
            center_distance,
            zobrist: ZobristRandoms::new(),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

/// `castle_mask[sq]`: AND-mask applied to castle rights whenever a piece
/// moves to or from `sq`. Depends on the active `Variant`'s home squares,
/// so it is computed per-variant rather than baked into `Tables`.
pub fn castle_mask(variant: &crate::piece::Variant) -> [u8; NUM_SQUARES] {
    use crate::defs::CastleRights;
    let mut mask = [CastleRights::ALL; NUM_SQUARES];
    mask[variant.king_home[Sides::WHITE] as usize] &=
        !(CastleRights::WHITE_OO | CastleRights::WHITE_OOO);
    mask[variant.king_home[Sides::BLACK] as usize] &=
        !(CastleRights::BLACK_OO | CastleRights::BLACK_OOO);
    mask[variant.rook_home_oo[Sides::WHITE] as usize] &= !CastleRights::WHITE_OO;
    mask[variant.rook_home_ooo[Sides::WHITE] as usize] &= !CastleRights::WHITE_OOO;
    mask[variant.rook_home_oo[Sides::BLACK] as usize] &= !CastleRights::BLACK_OO;
    mask[variant.rook_home_ooo[Sides::BLACK] as usize] &= !CastleRights::BLACK_OOO;
    mask
}

pub const NUM_PIECE_IDS_FOR_ZOBRIST: usize = NUM_PIECE_IDS;
