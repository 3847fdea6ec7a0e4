/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! `Board` — a `Position` plus the redundant indexes needed to
//! make move generation and make/unmake O(1): piece-square lists with
//! reverse pointers, incremental zobrist, a repetition ring, and the
//! unmake stack. This is the hot path of the whole engine; every update
//! below is incremental, never a recomputation from `Position`.

pub mod attacks;
pub mod fen;
pub mod history;
pub mod position;
pub mod unmake;

use crate::defs::{
    file_of, opponent, rank_of, square_of, CastleRights, Side, Sides, Square, DOUBLE_CHECK, FLAG,
    NUM_SQUARES,
};
use crate::movegen::defs::{CastleKind, Move};
use crate::piece::{Kind, Piece, Variant, NUM_PIECE_IDS};
use crate::tables::{castle_mask, Tables};
use history::RepetitionRing;
pub use position::{InvalidPosition, Position};
use std::sync::Arc;
use unmake::{UnmakeRecord, UnmakeStack};

pub use crate::tables::zobrist::ZobristKey;

/// The mailbox board plus every redundant index it carries: piece-square
/// lists (`piece_squares[piece_id]`), their `reverse` pointers, incremental
/// material totals, the incremental zobrist, the checking-coord, the
/// repetition ring, and the unmake stack.
#[derive(Clone)]
pub struct Board {
    pub position: Position,
    /// `piece_squares[piece.index()]` is the ordered list of squares
    /// currently holding that piece identity (insertion order preserved,
    ///, so move-ordering randomization persists across clones).
    piece_squares: [Vec<Square>; NUM_PIECE_IDS],
    /// `reverse[sq]` is the index into `piece_squares[piece_at(sq)]` such
    /// that `piece_squares[piece_at(sq)][reverse[sq]] == sq`.
    reverse: [u8; NUM_SQUARES],
    pub material: [i32; 2],
    pub total_material: i32,
    pub zobrist: ZobristKey,
    pub checking_coord: u8,
    /// -1 or the ply of the first position in the current suffix seen
    /// twice.
    pub repeat_ply: i64,
    repetition: RepetitionRing,
    unmake: UnmakeStack,
    castle_mask: [u8; NUM_SQUARES],
    pub tables: Arc<Tables>,
}

impl Board {
    /// `setEmptyBoard + add each piece + compute ncheck + compute zobrist`.
    pub fn from_position(position: Position, tables: Arc<Tables>) -> Self {
        let castle_mask = castle_mask(&position.variant);
        let mut board = Board {
            position: Position { squares: [Piece::EMPTY; NUM_SQUARES], ..position },
            piece_squares: std::array::from_fn(|_| Vec::with_capacity(10)),
            reverse: [0; NUM_SQUARES],
            material: [0; 2],
            total_material: 0,
            zobrist: 0,
            checking_coord: FLAG,
            repeat_ply: -1,
            repetition: RepetitionRing::new(),
            unmake: UnmakeStack::new(),
            castle_mask,
            tables,
        };
        for sq in 0..NUM_SQUARES as Square {
            let p = position.squares[sq as usize];
            if !p.is_empty() {
                board.add_piece(p.side, p.kind, sq);
            }
        }
        board.zobrist ^= board.tables.zobrist.castle_rights[position.castle_rights as usize];
        if position.ep_square != FLAG {
            board.zobrist ^= board.tables.zobrist.en_passant_file[file_of(position.ep_square) as usize];
        }
        if position.turn == Sides::BLACK {
            board.zobrist ^= board.tables.zobrist.side_to_move;
        }
        board.recompute_checking_coord();
        board
    }

    pub fn starting(tables: Arc<Tables>) -> Self {
        Board::from_position(Position::starting(), tables)
    }

    pub fn from_fen(fen: &str, tables: Arc<Tables>) -> Result<Self, InvalidPosition> {
        let position = fen::parse_fen(fen)?;
        position.is_legal(&tables)?;
        Ok(Board::from_position(position, tables))
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.position.squares[sq as usize]
    }

    #[inline(always)]
    pub fn turn(&self) -> Side {
        self.position.turn
    }

    #[inline(always)]
    pub fn squares_of(&self, kind: Kind, side: Side) -> &[Square] {
        &self.piece_squares[Piece::new(kind, side).index()]
    }

    pub fn king_square(&self, side: Side) -> Square {
        self.squares_of(Kind::King, side)[0]
    }

    pub fn variant(&self) -> &Variant {
        &self.position.variant
    }

    /// Recomputes the zobrist key from scratch over the current
    /// `Position`, for the `InternalInvariantViolated` consistency check
    ///: `board.zobrist == calc_zobrist(board.position())`.
    pub fn calc_zobrist_from_scratch(&self) -> ZobristKey {
        let mut key: ZobristKey = 0;
        for sq in 0..NUM_SQUARES as Square {
            let p = self.position.squares[sq as usize];
            if !p.is_empty() {
                key ^= self.tables.zobrist.piece_square[p.index()][sq as usize];
            }
        }
        key ^= self.tables.zobrist.castle_rights[self.position.castle_rights as usize];
        if self.position.ep_square != FLAG {
            key ^= self.tables.zobrist.en_passant_file[file_of(self.position.ep_square) as usize];
        }
        if self.position.turn == Sides::BLACK {
            key ^= self.tables.zobrist.side_to_move;
        }
        key
    }

    /// Checks the reverse-pointer invariant holds for every occupied
    /// square.
    pub fn reverse_pointers_consistent(&self) -> bool {
        for sq in 0..NUM_SQUARES as Square {
            let p = self.position.squares[sq as usize];
            if p.is_empty() {
                continue;
            }
            let list = &self.piece_squares[p.index()];
            let idx = self.reverse[sq as usize] as usize;
            if idx >= list.len() || list[idx] != sq {
                return false;
            }
        }
        true
    }

    fn recompute_checking_coord(&mut self) {
        let king_sq = self.king_square(self.position.turn);
        self.checking_coord =
            attacks::checking_coord(&self.position.squares, &self.tables, self.position.turn, king_sq);
    }

    // ---- piece-list primitives (O(1)) ----

    fn add_piece(&mut self, side: Side, kind: Kind, sq: Square) {
        let piece = Piece::new(kind, side);
        let list = &mut self.piece_squares[piece.index()];
        self.reverse[sq as usize] = list.len() as u8;
        list.push(sq);
        self.position.squares[sq as usize] = piece;
        self.zobrist ^= self.tables.zobrist.piece_square[piece.index()][sq as usize];
        self.material[side] += piece.worth() as i32;
        self.total_material += piece.worth() as i32;
    }

    /// Pop-and-swap removal preserving the reverse-pointer invariant.
    fn remove_piece(&mut self, sq: Square) -> Piece {
        let piece = self.position.squares[sq as usize];
        debug_assert!(!piece.is_empty());
        let idx = self.reverse[sq as usize] as usize;
        let list = &mut self.piece_squares[piece.index()];
        list.swap_remove(idx);
        if idx < list.len() {
            let moved_sq = list[idx];
            self.reverse[moved_sq as usize] = idx as u8;
        }
        self.position.squares[sq as usize] = Piece::EMPTY;
        self.zobrist ^= self.tables.zobrist.piece_square[piece.index()][sq as usize];
        self.material[piece.side] -= piece.worth() as i32;
        self.total_material -= piece.worth() as i32;
        piece
    }

    /// Moves the piece standing on `src` to `dst` (which must be empty),
    /// keeping the same piece-list slot. Used for ordinary quiet moves and
    /// the non-capturing half of castling/en-passant.
    fn relocate_piece(&mut self, src: Square, dst: Square) {
        let piece = self.position.squares[src as usize];
        debug_assert!(!piece.is_empty());
        debug_assert!(self.position.squares[dst as usize].is_empty());
        let idx = self.reverse[src as usize];
        self.piece_squares[piece.index()][idx as usize] = dst;
        self.reverse[dst as usize] = idx;
        self.position.squares[dst as usize] = piece;
        self.position.squares[src as usize] = Piece::EMPTY;
        self.zobrist ^= self.tables.zobrist.piece_square[piece.index()][src as usize];
        self.zobrist ^= self.tables.zobrist.piece_square[piece.index()][dst as usize];
    }

    /// Analytically predicts the zobrist key after `mv` without mutating
    /// the board, so a caller can issue a transposition-table prefetch
    /// before paying for the piece-list update. Mirrors `make_move`'s
    /// zobrist arithmetic exactly.
    pub fn predict_zobrist_after(&self, mv: &Move) -> ZobristKey {
        let mut z = self.zobrist;
        let turn = self.position.turn;

        if mv.is_castle() {
            let (rook_src, rook_dst, king_dst) = self.castle_squares(mv);
            let king = self.position.squares[mv.src as usize];
            let rook = self.position.squares[rook_src as usize];
            z ^= self.tables.zobrist.piece_square[king.index()][mv.src as usize];
            z ^= self.tables.zobrist.piece_square[rook.index()][rook_src as usize];
            z ^= self.tables.zobrist.piece_square[rook.index()][rook_dst as usize];
            z ^= self.tables.zobrist.piece_square[king.index()][king_dst as usize];
        } else if mv.is_en_passant() {
            let captured_sq = square_of(file_of(mv.dst), rank_of(mv.src));
            let captured = self.position.squares[captured_sq as usize];
            let pawn = self.position.squares[mv.src as usize];
            z ^= self.tables.zobrist.piece_square[captured.index()][captured_sq as usize];
            z ^= self.tables.zobrist.piece_square[pawn.index()][mv.src as usize];
            z ^= self.tables.zobrist.piece_square[pawn.index()][mv.dst as usize];
        } else {
            let mover = self.position.squares[mv.src as usize];
            let captured = self.position.squares[mv.dst as usize];
            if !captured.is_empty() {
                z ^= self.tables.zobrist.piece_square[captured.index()][mv.dst as usize];
            }
            z ^= self.tables.zobrist.piece_square[mover.index()][mv.src as usize];
            let placed = if mv.is_promotion() { Piece::new(mv.promotion, turn) } else { mover };
            z ^= self.tables.zobrist.piece_square[placed.index()][mv.dst as usize];
        }

        let new_cbyte = self.next_castle_rights(mv);
        z ^= self.tables.zobrist.castle_rights[self.position.castle_rights as usize];
        z ^= self.tables.zobrist.castle_rights[new_cbyte as usize];

        if self.position.ep_square != FLAG {
            z ^= self.tables.zobrist.en_passant_file[file_of(self.position.ep_square) as usize];
        }
        let new_ep = self.next_ep_square(mv);
        if new_ep != FLAG {
            z ^= self.tables.zobrist.en_passant_file[file_of(new_ep) as usize];
        }

        z ^= self.tables.zobrist.side_to_move;
        z
    }

    fn castle_squares(&self, mv: &Move) -> (Square, Square, Square) {
        let side = self.position.turn;
        let variant = &self.position.variant;
        match mv.castle {
            CastleKind::KingSide => {
                (variant.rook_home_oo[side], variant.rook_dst_oo[side], variant.king_dst_oo[side])
            }
            CastleKind::QueenSide => {
                (variant.rook_home_ooo[side], variant.rook_dst_ooo[side], variant.king_dst_ooo[side])
            }
            CastleKind::None => unreachable!("castle_squares called on a non-castling move"),
        }
    }

    fn next_castle_rights(&self, mv: &Move) -> u8 {
        if mv.is_castle() {
            let side = self.position.turn;
            let mask = if side == Sides::WHITE {
                !(CastleRights::WHITE_OO | CastleRights::WHITE_OOO)
            } else {
                !(CastleRights::BLACK_OO | CastleRights::BLACK_OOO)
            };
            self.position.castle_rights & mask
        } else {
            self.position.castle_rights & self.castle_mask[mv.src as usize] & self.castle_mask[mv.dst as usize]
        }
    }

    fn next_ep_square(&self, mv: &Move) -> Square {
        let mover = self.position.squares[mv.src as usize];
        if mover.kind == Kind::Pawn {
            let from_rank = rank_of(mv.src) as i8;
            let to_rank = rank_of(mv.dst) as i8;
            if (from_rank - to_rank).abs() == 2 {
                return mv.dst;
            }
        }
        FLAG
    }

    /// `MakeMove`: snapshot reversible state, push the
    /// repetition ring, apply the move to the piece-list indexes, advance
    /// ply/turn/checking-coord, and update `ncp_plies`/`repeat_ply`.
    pub fn make_move(&mut self, mv: Move) {
        let captured_for_unmake = if mv.is_en_passant() {
            let captured_sq = square_of(file_of(mv.dst), rank_of(mv.src));
            self.position.squares[captured_sq as usize]
        } else if !mv.is_castle() {
            self.position.squares[mv.dst as usize]
        } else {
            Piece::EMPTY
        };

        let record = UnmakeRecord {
            mv,
            captured: captured_for_unmake,
            castle_rights: self.position.castle_rights,
            ep_square: self.position.ep_square,
            checking_coord: self.checking_coord,
            ncp_plies: self.position.ncp_plies,
            zobrist: self.zobrist,
            repeat_ply: self.repeat_ply,
            evicted_ring_entry: None,
        };

        let evicted = self.repetition.push(self.position.ply, self.zobrist);

        let is_capture_or_pawn_or_castle =
            !captured_for_unmake.is_empty() || mv.is_castle() || self.position.squares[mv.src as usize].kind == Kind::Pawn;

        let turn = self.position.turn;
        if mv.is_castle() {
            let (rook_src, rook_dst, king_dst) = self.castle_squares(&mv);
            self.remove_piece(mv.src);
            self.relocate_piece(rook_src, rook_dst);
            self.add_piece(turn, Kind::King, king_dst);
            let mask = if turn == Sides::WHITE {
                !(CastleRights::WHITE_OO | CastleRights::WHITE_OOO)
            } else {
                !(CastleRights::BLACK_OO | CastleRights::BLACK_OOO)
            };
            self.set_castle_rights(self.position.castle_rights & mask);
        } else if mv.is_en_passant() {
            let captured_sq = square_of(file_of(mv.dst), rank_of(mv.src));
            self.remove_piece(captured_sq);
            self.relocate_piece(mv.src, mv.dst);
            let new_cbyte =
                self.position.castle_rights & self.castle_mask[mv.src as usize] & self.castle_mask[mv.dst as usize];
            self.set_castle_rights(new_cbyte);
        } else {
            if !captured_for_unmake.is_empty() {
                self.remove_piece(mv.dst);
            }
            if mv.is_promotion() {
                self.remove_piece(mv.src);
                self.add_piece(turn, mv.promotion, mv.dst);
            } else {
                self.relocate_piece(mv.src, mv.dst);
            }
            let new_cbyte =
                self.position.castle_rights & self.castle_mask[mv.src as usize] & self.castle_mask[mv.dst as usize];
            self.set_castle_rights(new_cbyte);
        }

        let new_ep = self.next_ep_square(&mv);
        self.set_ep_square(new_ep);

        self.position.ply += 1;
        self.flip_turn();
        self.checking_coord = mv.check;

        if is_capture_or_pawn_or_castle {
            self.position.ncp_plies = 0;
            self.repeat_ply = -1;
        } else {
            self.position.ncp_plies += 1;
            if self.position.ncp_plies == 4 && self.repeat_ply == -1 {
                // Window [ply-ncpPlies, ply-4] in absolute plies is ages
                // [4, ncpPlies] from the current ply.
                if self
                    .repetition
                    .find_first_in_age_range(self.position.ply, 4, self.position.ncp_plies, self.zobrist)
                    .is_some()
                {
                    self.repeat_ply = self.position.ply as i64;
                }
            }
        }

        let mut record = record;
        record.evicted_ring_entry = evicted;
        self.unmake.push(record);
    }

    fn set_castle_rights(&mut self, new_cbyte: u8) {
        self.zobrist ^= self.tables.zobrist.castle_rights[self.position.castle_rights as usize];
        self.position.castle_rights = new_cbyte;
        self.zobrist ^= self.tables.zobrist.castle_rights[new_cbyte as usize];
    }

    fn set_ep_square(&mut self, new_ep: Square) {
        if self.position.ep_square != FLAG {
            self.zobrist ^= self.tables.zobrist.en_passant_file[file_of(self.position.ep_square) as usize];
        }
        self.position.ep_square = new_ep;
        if new_ep != FLAG {
            self.zobrist ^= self.tables.zobrist.en_passant_file[file_of(new_ep) as usize];
        }
    }

    fn flip_turn(&mut self) {
        self.zobrist ^= self.tables.zobrist.side_to_move;
        self.position.turn = opponent(self.position.turn);
    }

    /// `UnmakeMove`: reverses `make_move` exactly, restoring
    /// ply/turn first (their encodings must match what the original move
    /// expected), then the piece motion, then the repetition ring slot.
    pub fn unmake_move(&mut self) {
        let record = self.unmake.pop();
        let mv = record.mv;

        self.position.ply -= 1;
        self.flip_turn();
        let turn = self.position.turn;

        if mv.is_castle() {
            let (rook_src, rook_dst, king_dst) = self.castle_squares(&mv);
            self.remove_piece(king_dst);
            self.relocate_piece(rook_dst, rook_src);
            self.add_piece(turn, Kind::King, mv.src);
        } else if mv.is_en_passant() {
            let captured_sq = square_of(file_of(mv.dst), rank_of(mv.src));
            self.relocate_piece(mv.dst, mv.src);
            self.add_piece(opponent(turn), Kind::Pawn, captured_sq);
        } else if mv.is_promotion() {
            self.remove_piece(mv.dst);
            self.add_piece(turn, Kind::Pawn, mv.src);
            if !record.captured.is_empty() {
                self.add_piece(record.captured.side, record.captured.kind, mv.dst);
            }
        } else {
            self.relocate_piece(mv.dst, mv.src);
            if !record.captured.is_empty() {
                self.add_piece(record.captured.side, record.captured.kind, mv.dst);
            }
        }

        self.zobrist = record.zobrist;
        self.position.castle_rights = record.castle_rights;
        self.position.ep_square = record.ep_square;
        self.checking_coord = record.checking_coord;
        self.position.ncp_plies = record.ncp_plies;
        self.repeat_ply = record.repeat_ply;

        self.repetition.pop_restore(self.position.ply, record.evicted_ring_entry);
    }

    pub fn ply_depth_searched(&self) -> usize {
        self.unmake.len()
    }

    // ---- draw detection ----

    /// The classic insufficient-material enumeration: K-vs-k; KN/KB-vs-k;
    /// KB-vs-kb with same-colored bishops. Anything else with more
    /// material is not a detected draw here (the search's own alpha-beta
    /// bound still applies).
    pub fn is_insufficient_material(&self) -> bool {
        let minor_or_nothing = |side: Side| -> Option<Option<(Kind, Square)>> {
            let pawns = !self.squares_of(Kind::Pawn, side).is_empty();
            let rooks = !self.squares_of(Kind::Rook, side).is_empty();
            let queens = !self.squares_of(Kind::Queen, side).is_empty();
            if pawns || rooks || queens {
                return None;
            }
            let knights = self.squares_of(Kind::Knight, side);
            let bishops = self.squares_of(Kind::Bishop, side);
            match (knights.len(), bishops.len()) {
                (0, 0) => Some(None),
                (1, 0) => Some(Some((Kind::Knight, knights[0]))),
                (0, 1) => Some(Some((Kind::Bishop, bishops[0]))),
                _ => None,
            }
        };
        let w = minor_or_nothing(Sides::WHITE);
        let b = minor_or_nothing(Sides::BLACK);
        match (w, b) {
            (Some(None), Some(None)) => true,
            (Some(None), Some(Some(_))) | (Some(Some(_)), Some(None)) => true,
            (Some(Some((Kind::Bishop, sq_w))), Some(Some((Kind::Bishop, sq_b)))) => {
                bishop_square_color(sq_w) == bishop_square_color(sq_b)
            }
            _ => false,
        }
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.position.ncp_plies >= 100
    }

    /// True when the current position has occurred at least twice before
    /// within the `ncp_plies` window — i.e. this would be the claimable
    /// third occurrence.
    pub fn is_draw_threefold_repetition(&self) -> bool {
        self.repetition.count_within(self.position.ply, self.position.ncp_plies, self.zobrist) >= 2
    }

    /// Whether a repetition could plausibly be hit within `horizon` plies
    /// from here — used to gate the transposition probe.
    pub fn repetition_possible_within(&self, horizon: u32) -> bool {
        if self.position.ncp_plies == 0 {
            return false;
        }
        self.repeat_ply != -1
            || self
                .repetition
                .most_recent_within(self.position.ply, horizon.min(self.position.ncp_plies), self.zobrist)
                .is_some()
    }
}

fn bishop_square_color(sq: Square) -> u8 {
    (file_of(sq) + rank_of(sq)) & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Arc<Tables> {
        Arc::new(Tables::new())
    }

    #[test]
    fn starting_position_zobrist_matches_scratch_recompute() {
        let board = Board::starting(tables());
        assert_eq!(board.zobrist, board.calc_zobrist_from_scratch());
        assert!(board.reverse_pointers_consistent());
    }

    #[test]
    fn make_unmake_restores_zobrist_and_material() {
        let mut board = Board::starting(tables());
        let mv = Move {
            src: square_of(4, 1),
            dst: square_of(4, 3),
            promotion: Kind::Empty,
            check: FLAG,
            castle: CastleKind::None,
        };
        let zobrist_before = board.zobrist;
        let material_before = board.material;
        board.make_move(mv);
        assert_ne!(board.zobrist, zobrist_before);
        board.unmake_move();
        assert_eq!(board.zobrist, zobrist_before);
        assert_eq!(board.material, material_before);
        assert!(board.reverse_pointers_consistent());
    }

    #[test]
    fn predicted_zobrist_matches_actual_after_make() {
        let mut board = Board::starting(tables());
        let mv = Move {
            src: square_of(6, 0),
            dst: square_of(5, 2),
            promotion: Kind::Empty,
            check: FLAG,
            castle: CastleKind::None,
        };
        let predicted = board.predict_zobrist_after(&mv);
        board.make_move(mv);
        assert_eq!(predicted, board.zobrist);
    }

    #[test]
    fn insufficient_material_detects_bare_kings() {
        let board =
            Board::from_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1", tables()).expect("legal position");
        assert!(board.is_insufficient_material());
    }
}
