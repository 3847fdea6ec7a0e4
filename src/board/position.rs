/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! `Position`, a pure-value snapshot with no redundant
//! indexes. `Board` (component D) is built from one.

use crate::board::attacks::is_attacked_by_opponent_of;
use crate::defs::{rank_of, CastleRights, Side, Sides, Square, FLAG, NUM_SQUARES};
use crate::piece::{Kind, Piece, Variant};
use crate::tables::Tables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPosition {
    pub reason: &'static str,
}

impl std::fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid position: {}", self.reason)
    }
}
impl std::error::Error for InvalidPosition {}

#[derive(Debug, Clone, Copy)]
pub struct Position {
    /// Index 0 is a1, index 63 is h8 (rank = index>>3, file = index&7).
    pub squares: [Piece; NUM_SQUARES],
    pub turn: Side,
    pub ply: u32,
    /// Non-capture-or-pawn-move plies, 0 ≤ ncp_plies ≤ ply.
    pub ncp_plies: u32,
    pub castle_rights: u8,
    pub ep_square: Square,
    pub variant: Variant,
}

impl Position {
    pub fn empty() -> Self {
        Position {
            squares: [Piece::EMPTY; NUM_SQUARES],
            turn: Sides::WHITE,
            ply: 0,
            ncp_plies: 0,
            castle_rights: CastleRights::ALL,
            ep_square: FLAG,
            variant: Variant::default(),
        }
    }

    pub fn starting() -> Self {
        crate::board::fen::parse_fen(crate::board::fen::START_POSITION_FEN)
            .expect("the built-in starting FEN must parse")
    }

    /// `IsLegal`: exactly one king per side; no pawns on the back ranks;
    /// the side not to move is not in check; castle bits consistent with
    /// king/rook placement; en-passant target consistent with a pawn that
    /// could have just double-pushed.
    pub fn is_legal(&self, tables: &Tables) -> Result<(), InvalidPosition> {
        let mut king_count = [0u8; 2];
        for sq in 0..NUM_SQUARES {
            let p = self.squares[sq];
            if p.is_king() {
                king_count[p.side] += 1;
            }
            if p.kind == Kind::Pawn {
                let r = rank_of(sq as Square);
                if r == 0 || r == 7 {
                    return Err(InvalidPosition { reason: "pawn on back rank" });
                }
            }
        }
        if king_count[Sides::WHITE] != 1 || king_count[Sides::BLACK] != 1 {
            return Err(InvalidPosition { reason: "must have exactly one king per side" });
        }

        let not_to_move = crate::defs::opponent(self.turn);
        let king_sq = self.find_king(not_to_move);
        if is_attacked_by_opponent_of(&self.squares, tables, not_to_move, king_sq) {
            return Err(InvalidPosition { reason: "side not to move is in check" });
        }

        self.check_castle_rights_consistency(&self.variant)?;
        self.check_en_passant_consistency()?;

        Ok(())
    }

    /// True iff this is ply 0 of a standard game from the normal starting
    /// array — the coordinator's "don't bother thinking about move one"
    /// special case (: `isNormalStartingPosition`).
    pub fn is_standard_starting_position(&self) -> bool {
        if self.ply != 0 {
            return false;
        }
        let start = Position::starting();
        self.turn == start.turn
            && self.castle_rights == start.castle_rights
            && self.ep_square == start.ep_square
            && self.squares.iter().zip(start.squares.iter()).all(|(a, b)| a.kind == b.kind && a.side == b.side)
    }

    pub fn find_king(&self, side: Side) -> Square {
        for sq in 0..NUM_SQUARES {
            let p = self.squares[sq];
            if p.is_king() && p.side == side {
                return sq as Square;
            }
        }
        FLAG
    }

    fn check_castle_rights_consistency(&self, variant: &Variant) -> Result<(), InvalidPosition> {
        let checks: [(u8, Side, Square, Square); 4] = [
            (CastleRights::WHITE_OO, Sides::WHITE, variant.king_home[Sides::WHITE], variant.rook_home_oo[Sides::WHITE]),
            (CastleRights::WHITE_OOO, Sides::WHITE, variant.king_home[Sides::WHITE], variant.rook_home_ooo[Sides::WHITE]),
            (CastleRights::BLACK_OO, Sides::BLACK, variant.king_home[Sides::BLACK], variant.rook_home_oo[Sides::BLACK]),
            (CastleRights::BLACK_OOO, Sides::BLACK, variant.king_home[Sides::BLACK], variant.rook_home_ooo[Sides::BLACK]),
        ];
        for (bit, side, king_sq, rook_sq) in checks {
            if self.castle_rights & bit != 0 {
                let king = self.squares[king_sq as usize];
                let rook = self.squares[rook_sq as usize];
                if !(king.is_king() && king.side == side) || rook.kind != Kind::Rook || rook.side != side {
                    return Err(InvalidPosition { reason: "castle right set without king/rook in place" });
                }
            }
        }
        Ok(())
    }

    fn check_en_passant_consistency(&self) -> Result<(), InvalidPosition> {
        if self.ep_square == FLAG {
            return Ok(());
        }
        if self.squares[self.ep_square as usize].kind != Kind::Empty {
            return Err(InvalidPosition { reason: "en-passant target square is occupied" });
        }
        let ep_rank = rank_of(self.ep_square);
        // The side that just moved is the opponent of `turn`; their pawn
        // must sit one rank behind the ep square (from their direction).
        let (expected_pawn_rank, mover) = if ep_rank == 2 {
            (3u8, Sides::BLACK)
        } else if ep_rank == 5 {
            (4u8, Sides::WHITE)
        } else {
            return Err(InvalidPosition { reason: "en-passant target on impossible rank" });
        };
        let pawn_sq = crate::defs::square_of(crate::defs::file_of(self.ep_square), expected_pawn_rank);
        let pawn = self.squares[pawn_sq as usize];
        if pawn.kind != Kind::Pawn || pawn.side != mover {
            return Err(InvalidPosition { reason: "no double-pushed pawn behind en-passant target" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_array_at_ply_zero_is_recognized() {
        assert!(Position::starting().is_standard_starting_position());
    }

    #[test]
    fn a_played_move_is_no_longer_the_starting_position() {
        let mut after_e4 = Position::starting();
        after_e4.ply = 1;
        after_e4.turn = crate::defs::opponent(after_e4.turn);
        assert!(!after_e4.is_standard_starting_position());
    }
}
