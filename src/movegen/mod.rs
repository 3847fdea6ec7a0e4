/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! the legal move generator. Given a `Board`, produces every
//! legal move for the side to move (optionally restricted to captures and
//! promotions for quiescence), with each move's `check` field precomputed
//!.

pub mod can;
pub mod defs;
pub mod san;

use crate::board::attacks::{attackers_of, is_attacked, is_attacked_by_opponent_of};
use crate::board::Board;
use crate::defs::{
    file_of, is_rook_direction, opponent, rank_of, square_of, Directions, Side, Sides, Square,
    DOUBLE_CHECK, FLAG,
};
use crate::piece::Kind;
use crate::search::defs::HistoryTable;
use crate::tables::{PawnSlot, Tables};
use defs::{CastleKind, Move, MoveList};

/// Stateless: every piece of mutable state (tables, history) lives on
/// `Board` or the search, matching the "search invokes move generator"
/// data flow without the generator owning anything itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

/// Bundles the shared history table with the current ply and the
/// configured "hot" window, so every helper below can classify a quiet
/// move without carrying three separate parameters.
struct HistoryCtx<'a> {
    history: &'a HistoryTable,
    ply: u32,
    window: u32,
}

impl<'a> HistoryCtx<'a> {
    fn hot(&self, side: Side, src: Square, dst: Square) -> bool {
        self.history.is_hot(side, src, dst, self.ply, self.window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBoard;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    /// Generates every legal move for the side to move. `captures_only`
    /// restricts to captures and promotions, as quiescence search wants
    ///: non-capturing check evasions are still included when
    /// in check, since quiescence must not silently go "checkmated".
    /// `history`/`ply`/`window` feed the preferred-prefix "hot" quiet-move
    /// classification (spec's history-heuristic move ordering); pass a
    /// fresh `HistoryTable` and `window: 0` where ordering doesn't matter.
    pub fn generate_legal_moves(
        &self,
        board: &Board,
        captures_only: bool,
        history: &HistoryTable,
        ply: u32,
        window: u32,
    ) -> Result<MoveList, InvalidBoard> {
        let side = board.turn();
        let enemy = opponent(side);
        let tables = &board.tables;
        let king_sq = board.king_square(side);
        let enemy_king_sq = board.king_square(enemy);
        if king_sq == FLAG || enemy_king_sq == FLAG {
            return Err(InvalidBoard);
        }

        let pins = compute_pin_map(board, tables, side, king_sq);
        let discovered = compute_discovered_map(board, tables, side, enemy_king_sq);
        let hctx = HistoryCtx { history, ply, window };

        let mut moves = MoveList::new();

        if board.checking_coord == DOUBLE_CHECK {
            self.generate_king_moves(board, tables, side, enemy, king_sq, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
            return Ok(moves);
        }

        if board.checking_coord != FLAG {
            self.generate_check_evasions(
                board, tables, side, king_sq, board.checking_coord, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx,
            );
            self.generate_king_moves(board, tables, side, enemy, king_sq, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
            return Ok(moves);
        }

        if !captures_only {
            self.generate_castling(board, tables, side, king_sq, &mut moves, &hctx);
        }
        self.generate_pawn_moves(board, tables, side, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
        self.generate_knight_moves(board, tables, side, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
        self.generate_slider_moves(board, tables, side, Kind::Bishop, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
        self.generate_slider_moves(board, tables, side, Kind::Rook, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
        self.generate_slider_moves(board, tables, side, Kind::Queen, &pins, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);
        self.generate_king_moves(board, tables, side, enemy, king_sq, &discovered, enemy_king_sq, &mut moves, captures_only, &hctx);

        Ok(moves)
    }

    // ---- check evasion ----

    #[allow(clippy::too_many_arguments)]
    fn generate_check_evasions(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        king_sq: Square,
        checker_sq: Square,
        pins: &[Option<u8>; 64],
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        // Quiescence still generates every evasion while in check, not just
        // captures - standing pat isn't legal when the king is attacked.
        _captures_only: bool,
        hctx: &HistoryCtx,
    ) {
        let checker = board.piece_at(checker_sq);
        let d = tables.dir[king_sq as usize][checker_sq as usize];
        let checker_is_slider = matches!(checker.kind, Kind::Bishop | Kind::Rook | Kind::Queen)
            && d != Directions::DIRFLAG
            && d != Directions::KNIGHT
            && slider_covers_direction(checker.kind, d);

        let mut block_squares: Vec<Square> = vec![checker_sq];
        if checker_is_slider {
            for &sq in tables.rays[king_sq as usize][d as usize].iter() {
                if sq == checker_sq {
                    break;
                }
                block_squares.push(sq);
            }
        }

        for &sq in block_squares.iter() {
            let is_capture = sq == checker_sq;
            if is_capture {
                for src in attackers_of(&board.position.squares, tables, side, sq) {
                    let mover = board.piece_at(src);
                    if mover.is_king() {
                        continue;
                    }
                    if !pin_allows(pins, src, king_sq, sq, tables) {
                        continue;
                    }
                    self.emit_normal_move(board, tables, side, src, sq, discovered, enemy_king_sq, moves, is_capture, hctx);
                }
                // En-passant capture of a checking pawn that just double-pushed,
                // or a horizontal interposition of a double-pushed checker via
                // en-passant, overriding the nominal destination with the
                // pawn-capture square.
                if checker.kind == Kind::Pawn && board.position.ep_square != FLAG {
                    self.maybe_add_en_passant(board, tables, side, sq, pins, king_sq, discovered, enemy_king_sq, moves, hctx);
                }
            } else {
                for src in attackers_of(&board.position.squares, tables, side, sq) {
                    let mover = board.piece_at(src);
                    if mover.is_king() || mover.kind == Kind::Pawn {
                        continue; // pawns can't block by "attacking" an empty square
                    }
                    if !pin_allows(pins, src, king_sq, sq, tables) {
                        continue;
                    }
                    self.emit_normal_move(board, tables, side, src, sq, discovered, enemy_king_sq, moves, false, hctx);
                }
                for src in pawn_push_sources(board, tables, side, sq) {
                    if !pin_allows(pins, src, king_sq, sq, tables) {
                        continue;
                    }
                    self.emit_normal_move(board, tables, side, src, sq, discovered, enemy_king_sq, moves, false, hctx);
                }
            }
        }
    }

    // ---- king moves ----

    #[allow(clippy::too_many_arguments)]
    fn generate_king_moves(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        enemy: Side,
        king_sq: Square,
        discovered: &[Option<Square>; 64],
        _enemy_king_sq: Square,
        moves: &mut MoveList,
        captures_only: bool,
        hctx: &HistoryCtx,
    ) {
        for &dst in tables.king_moves[king_sq as usize][side].iter() {
            let target = board.piece_at(dst);
            if !target.is_empty() && target.side == side {
                continue;
            }
            let is_capture = !target.is_empty();
            if captures_only && !is_capture {
                continue;
            }
            // King-as-transparent so a step along the same ray it is
            // leaving is still detected as attacked.
            if is_attacked(&board.position.squares, tables, enemy, dst, king_sq) {
                continue;
            }
            let check = king_move_check_field(tables, king_sq, dst, discovered);
            moves.add_move(
                Move { src: king_sq, dst, promotion: Kind::Empty, check, castle: CastleKind::None },
                is_capture,
                hctx.hot(side, king_sq, dst),
            );
        }
    }

    // ---- castling ----

    fn generate_castling(&self, board: &Board, tables: &Tables, side: Side, king_sq: Square, moves: &mut MoveList, hctx: &HistoryCtx) {
        use crate::defs::CastleRights;
        let variant = board.variant();
        let enemy = opponent(side);
        let (oo_right, ooo_right) = if side == Sides::WHITE {
            (CastleRights::WHITE_OO, CastleRights::WHITE_OOO)
        } else {
            (CastleRights::BLACK_OO, CastleRights::BLACK_OOO)
        };

        if board.position.castle_rights & oo_right != 0 {
            let rook_sq = variant.rook_home_oo[side];
            let king_dst = variant.king_dst_oo[side];
            let rook_dst = variant.rook_dst_oo[side];
            if self.castle_path_clear(board, king_sq, king_dst, rook_sq, rook_dst)
                && self.castle_path_unattacked(board, tables, enemy, king_sq, king_dst)
            {
                let check = rook_gives_check(tables, board, rook_dst, king_sq, rook_sq, opponent(side));
                moves.add_move(
                    Move { src: king_sq, dst: king_dst, promotion: Kind::Empty, check, castle: CastleKind::KingSide },
                    false,
                    hctx.hot(side, king_sq, king_dst),
                );
            }
        }
        if board.position.castle_rights & ooo_right != 0 {
            let rook_sq = variant.rook_home_ooo[side];
            let king_dst = variant.king_dst_ooo[side];
            let rook_dst = variant.rook_dst_ooo[side];
            if self.castle_path_clear(board, king_sq, king_dst, rook_sq, rook_dst)
                && self.castle_path_unattacked(board, tables, enemy, king_sq, king_dst)
            {
                let check = rook_gives_check(tables, board, rook_dst, king_sq, rook_sq, opponent(side));
                moves.add_move(
                    Move { src: king_sq, dst: king_dst, promotion: Kind::Empty, check, castle: CastleKind::QueenSide },
                    false,
                    hctx.hot(side, king_sq, king_dst),
                );
            }
        }
    }

    fn castle_path_clear(&self, board: &Board, king_sq: Square, king_dst: Square, rook_sq: Square, rook_dst: Square) -> bool {
        let lo = king_sq.min(king_dst);
        let hi = king_sq.max(king_dst);
        for sq in lo..=hi {
            if sq == king_sq || sq == rook_sq {
                continue;
            }
            if !board.piece_at(sq).is_empty() {
                return false;
            }
        }
        let lo = rook_sq.min(rook_dst);
        let hi = rook_sq.max(rook_dst);
        for sq in lo..=hi {
            if sq == rook_sq || sq == king_sq {
                continue;
            }
            if !board.piece_at(sq).is_empty() {
                return false;
            }
        }
        true
    }

    fn castle_path_unattacked(&self, board: &Board, tables: &Tables, enemy: Side, king_sq: Square, king_dst: Square) -> bool {
        let lo = king_sq.min(king_dst);
        let hi = king_sq.max(king_dst);
        for sq in lo..=hi {
            if is_attacked_by_opponent_of(&board.position.squares, tables, opponent(enemy), sq) {
                return false;
            }
        }
        true
    }

    // ---- pawns ----

    #[allow(clippy::too_many_arguments)]
    fn generate_pawn_moves(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        pins: &[Option<u8>; 64],
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        captures_only: bool,
        hctx: &HistoryCtx,
    ) {
        let king_sq = board.king_square(side);
        for &src in board.squares_of(Kind::Pawn, side).to_vec().iter() {
            let slots = tables.pawn_moves[side][src as usize];

            for &slot in &[PawnSlot::CAP0, PawnSlot::CAP1] {
                let dst = slots[slot];
                if dst == FLAG {
                    continue;
                }
                let target = board.piece_at(dst);
                if !target.is_empty() && target.side != side {
                    if !pin_allows(pins, src, king_sq, dst, tables) {
                        continue;
                    }
                    self.emit_pawn_move(board, tables, side, src, dst, discovered, enemy_king_sq, moves, true, hctx);
                } else if target.is_empty() && dst == board.position.ep_square {
                    if !pin_allows(pins, src, king_sq, dst, tables) {
                        continue;
                    }
                    self.maybe_add_en_passant_from(board, tables, side, src, dst, king_sq, discovered, enemy_king_sq, moves, hctx);
                }
            }

            if captures_only {
                continue;
            }

            let push1 = slots[PawnSlot::PUSH1];
            if push1 != FLAG && board.piece_at(push1).is_empty() {
                if pin_allows(pins, src, king_sq, push1, tables) {
                    self.emit_pawn_move(board, tables, side, src, push1, discovered, enemy_king_sq, moves, false, hctx);
                }
                let push2 = slots[PawnSlot::PUSH2];
                if push2 != FLAG && board.piece_at(push2).is_empty() && pin_allows(pins, src, king_sq, push2, tables) {
                    let check = pawn_move_check_field(board, tables, side, src, push2, discovered, enemy_king_sq);
                    moves.add_move(
                        Move { src, dst: push2, promotion: Kind::Empty, check, castle: CastleKind::None },
                        false,
                        hctx.hot(side, src, push2),
                    );
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_pawn_move(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        src: Square,
        dst: Square,
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        is_capture: bool,
        hctx: &HistoryCtx,
    ) {
        let back_rank = if side == Sides::WHITE { 7 } else { 0 };
        if rank_of(dst) == back_rank {
            for &promo in &[Kind::Queen, Kind::Rook, Kind::Bishop, Kind::Knight] {
                let check = promoted_pawn_check_field(board, tables, src, dst, promo, discovered, enemy_king_sq);
                moves.add_move(
                    Move { src, dst, promotion: promo, check, castle: CastleKind::None },
                    is_capture,
                    hctx.hot(side, src, dst),
                );
            }
        } else {
            let check = pawn_move_check_field(board, tables, side, src, dst, discovered, enemy_king_sq);
            moves.add_move(
                Move { src, dst, promotion: Kind::Empty, check, castle: CastleKind::None },
                is_capture,
                hctx.hot(side, src, dst),
            );
        }
    }

    /// Adds the en-passant move `src -> dst` if it is not illegal per the
    /// horizontal-pin exception: king, capturing pawn, captured pawn, and
    /// an enemy rook/queen sharing a rank, which static pin detection
    /// misses because two pawns vanish from the rank at once.
    #[allow(clippy::too_many_arguments)]
    fn maybe_add_en_passant_from(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        src: Square,
        dst: Square,
        king_sq: Square,
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        hctx: &HistoryCtx,
    ) {
        let captured_sq = square_of(file_of(dst), rank_of(src));
        if en_passant_exposes_king_horizontally(board, tables, side, src, captured_sq, king_sq) {
            return;
        }
        let check = pawn_move_check_field(board, tables, side, src, dst, discovered, enemy_king_sq);
        moves.add_move(
            Move { src, dst, promotion: Kind::Pawn, check, castle: CastleKind::None },
            true,
            hctx.hot(side, src, dst),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn maybe_add_en_passant(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        _checker_sq: Square,
        pins: &[Option<u8>; 64],
        king_sq: Square,
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        hctx: &HistoryCtx,
    ) {
        let ep = board.position.ep_square;
        for &slot in &[PawnSlot::CAP0, PawnSlot::CAP1] {
            for &src in board.squares_of(Kind::Pawn, side).to_vec().iter() {
                if tables.pawn_moves[side][src as usize][slot] == ep {
                    if !pin_allows(pins, src, king_sq, ep, tables) {
                        continue;
                    }
                    self.maybe_add_en_passant_from(board, tables, side, src, ep, king_sq, discovered, enemy_king_sq, moves, hctx);
                }
            }
        }
    }

    // ---- knights ----

    #[allow(clippy::too_many_arguments)]
    fn generate_knight_moves(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        pins: &[Option<u8>; 64],
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        captures_only: bool,
        hctx: &HistoryCtx,
    ) {
        for &src in board.squares_of(Kind::Knight, side).to_vec().iter() {
            if pins[src as usize].is_some() {
                continue; // a pinned knight has no legal destination
            }
            for &dst in tables.knight_moves[src as usize][side].iter() {
                let target = board.piece_at(dst);
                if !target.is_empty() && target.side == side {
                    continue;
                }
                let is_capture = !target.is_empty();
                if captures_only && !is_capture {
                    continue;
                }
                self.emit_normal_move(board, tables, side, src, dst, discovered, enemy_king_sq, moves, is_capture, hctx);
            }
        }
    }

    // ---- sliders ----

    #[allow(clippy::too_many_arguments)]
    fn generate_slider_moves(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        kind: Kind,
        pins: &[Option<u8>; 64],
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        captures_only: bool,
        hctx: &HistoryCtx,
    ) {
        let king_sq = board.king_square(side);
        for &src in board.squares_of(kind, side).to_vec().iter() {
            let dirs = directions_for(kind);
            for &d in dirs {
                for &dst in tables.rays[src as usize][d as usize].iter() {
                    let target = board.piece_at(dst);
                    if target.is_empty() {
                        if !pin_allows(pins, src, king_sq, dst, tables) {
                            continue;
                        }
                        if !captures_only {
                            self.emit_normal_move(board, tables, side, src, dst, discovered, enemy_king_sq, moves, false, hctx);
                        }
                        continue;
                    }
                    if target.side != side && pin_allows(pins, src, king_sq, dst, tables) {
                        self.emit_normal_move(board, tables, side, src, dst, discovered, enemy_king_sq, moves, true, hctx);
                    }
                    break; // stop at the first occupied square either way
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_normal_move(
        &self,
        board: &Board,
        tables: &Tables,
        side: Side,
        src: Square,
        dst: Square,
        discovered: &[Option<Square>; 64],
        enemy_king_sq: Square,
        moves: &mut MoveList,
        is_capture: bool,
        hctx: &HistoryCtx,
    ) {
        let mover = board.piece_at(src);
        let direct = direct_check_square(tables, board, mover.kind, side, src, dst, enemy_king_sq);
        let mut check = FLAG;
        if let Some(sq) = direct {
            check = combine_check(check, sq);
        }
        if let Some(sq) = discovered_through(tables, discovered, src, dst) {
            check = combine_check(check, sq);
        }
        moves.add_move(
            Move { src, dst, promotion: Kind::Empty, check, castle: CastleKind::None },
            is_capture,
            hctx.hot(side, src, dst),
        );
    }
}

fn directions_for(kind: Kind) -> &'static [u8] {
    const ROOK_DIRS: [u8; 4] = [Directions::N, Directions::E, Directions::S, Directions::W];
    const BISHOP_DIRS: [u8; 4] = [Directions::NW, Directions::NE, Directions::SE, Directions::SW];
    const QUEEN_DIRS: [u8; 8] = [
        Directions::NW, Directions::N, Directions::NE, Directions::E,
        Directions::SE, Directions::S, Directions::SW, Directions::W,
    ];
    match kind {
        Kind::Rook => &ROOK_DIRS,
        Kind::Bishop => &BISHOP_DIRS,
        Kind::Queen => &QUEEN_DIRS,
        _ => &[],
    }
}

fn slider_covers_direction(kind: Kind, dir: u8) -> bool {
    match kind {
        Kind::Queen => true,
        Kind::Rook => is_rook_direction(dir),
        Kind::Bishop => !is_rook_direction(dir),
        _ => false,
    }
}

/// True iff a pinned piece at `src` (pin info from `pins`) may legally
/// move to `dst` — i.e. `dst` stays on the king-to-slider ray, or the
/// piece is not pinned at all.
fn pin_allows(pins: &[Option<u8>; 64], src: Square, king_sq: Square, dst: Square, tables: &Tables) -> bool {
    match pins[src as usize] {
        None => true,
        Some(pin_dir) => tables.dir[king_sq as usize][dst as usize] == pin_dir,
    }
}

/// For each of the friendly king's eight rays, walks outward until the
/// first piece; if that piece is friendly and an enemy slider attacks
/// along the same ray beyond it, the friendly piece is pinned. Stores
/// the ray direction from the king through the pinned piece (and the
/// slider beyond it).
fn compute_pin_map(board: &Board, tables: &Tables, side: Side, king_sq: Square) -> [Option<u8>; 64] {
    let mut pins = [None; 64];
    let enemy = opponent(side);
    for d in 0..Directions::NUM_DIRS as u8 {
        let mut blocker: Option<Square> = None;
        for &sq in tables.rays[king_sq as usize][d as usize].iter() {
            let p = board.piece_at(sq);
            if p.is_empty() {
                continue;
            }
            if blocker.is_none() {
                if p.side == side {
                    blocker = Some(sq);
                    continue;
                } else {
                    break; // first piece is an enemy: no pin on this ray
                }
            } else {
                if p.side == enemy && slider_covers_direction(p.kind, d) {
                    pins[blocker.unwrap() as usize] = Some(d);
                }
                break;
            }
        }
    }
    pins
}

/// For each of the enemy king's eight rays, walks outward until the first
/// piece; if it is friendly and a friendly slider attacks along that ray
/// beyond it, moving the friendly blocker off that exact ray direction
/// gives discovered check.
fn compute_discovered_map(board: &Board, tables: &Tables, side: Side, enemy_king_sq: Square) -> [Option<Square>; 64] {
    let mut dc = [None; 64];
    for d in 0..Directions::NUM_DIRS as u8 {
        let mut blocker: Option<Square> = None;
        for &sq in tables.rays[enemy_king_sq as usize][d as usize].iter() {
            let p = board.piece_at(sq);
            if p.is_empty() {
                continue;
            }
            if blocker.is_none() {
                if p.side == side {
                    blocker = Some(sq);
                    continue;
                } else {
                    break;
                }
            } else {
                if p.side == side && slider_covers_direction(p.kind, d) {
                    dc[blocker.unwrap() as usize] = Some(sq);
                }
                break;
            }
        }
    }
    dc
}

/// If `src` was a discovered-check blocker and moving to `dst` no longer
/// covers the same ray toward the slider, returns the slider's square.
fn discovered_through(tables: &Tables, discovered: &[Option<Square>; 64], src: Square, dst: Square) -> Option<Square> {
    discovered[src as usize].filter(|&slider| tables.dir[src as usize][slider as usize] != tables.dir[dst as usize][slider as usize])
}

fn combine_check(existing: u8, new_sq: Square) -> u8 {
    if existing == FLAG {
        new_sq
    } else if existing == new_sq {
        existing
    } else {
        DOUBLE_CHECK
    }
}

fn direct_check_square(
    tables: &Tables,
    board: &Board,
    kind: Kind,
    side: Side,
    src: Square,
    dst: Square,
    enemy_king_sq: Square,
) -> Option<Square> {
    match kind {
        Kind::Knight => {
            if tables.dir[dst as usize][enemy_king_sq as usize] == Directions::KNIGHT {
                Some(enemy_king_sq)
            } else {
                None
            }
        }
        Kind::Bishop | Kind::Rook | Kind::Queen => {
            let d = tables.dir[dst as usize][enemy_king_sq as usize];
            if d != Directions::DIRFLAG && d != Directions::KNIGHT && slider_covers_direction(kind, d) {
                if nopose(board, tables, dst, enemy_king_sq, src) {
                    Some(enemy_king_sq)
                } else {
                    None
                }
            } else {
                None
            }
        }
        Kind::Pawn => {
            let fwd: i8 = if side == Sides::WHITE { 1 } else { -1 };
            let file = file_of(dst) as i8;
            let rank = rank_of(dst) as i8;
            for df in [-1i8, 1i8] {
                let f = file + df;
                let r = rank + fwd;
                if (0..8).contains(&f) && (0..8).contains(&r) && square_of(f as u8, r as u8) == enemy_king_sq {
                    return Some(enemy_king_sq);
                }
            }
            None
        }
        _ => None,
    }
}

fn pawn_move_check_field(
    board: &Board,
    tables: &Tables,
    side: Side,
    src: Square,
    dst: Square,
    discovered: &[Option<Square>; 64],
    enemy_king_sq: Square,
) -> u8 {
    let mut check = FLAG;
    if let Some(sq) = direct_check_square(tables, board, Kind::Pawn, side, src, dst, enemy_king_sq) {
        check = combine_check(check, sq);
    }
    if let Some(slider) = discovered_through(tables, discovered, src, dst) {
        check = combine_check(check, slider);
    }
    check
}

fn promoted_pawn_check_field(
    board: &Board,
    tables: &Tables,
    src: Square,
    dst: Square,
    promo: Kind,
    discovered: &[Option<Square>; 64],
    enemy_king_sq: Square,
) -> u8 {
    let mut check = FLAG;
    let d = tables.dir[dst as usize][enemy_king_sq as usize];
    match promo {
        Kind::Knight => {
            if d == Directions::KNIGHT {
                check = combine_check(check, enemy_king_sq);
            }
        }
        Kind::Bishop | Kind::Rook | Kind::Queen => {
            if d != Directions::DIRFLAG
                && d != Directions::KNIGHT
                && slider_covers_direction(promo, d)
                && nopose(board, tables, dst, enemy_king_sq, src)
            {
                check = combine_check(check, enemy_king_sq);
            }
        }
        _ => {}
    }
    if let Some(slider) = discovered_through(tables, discovered, src, dst) {
        check = combine_check(check, slider);
    }
    check
}

fn king_move_check_field(tables: &Tables, src: Square, dst: Square, discovered: &[Option<Square>; 64]) -> u8 {
    let mut check = FLAG;
    if let Some(slider) = discovered_through(tables, discovered, src, dst) {
        check = combine_check(check, slider);
    }
    check
}

fn rook_gives_check(
    tables: &Tables,
    board: &Board,
    rook_dst: Square,
    vacated_a: Square,
    vacated_b: Square,
    enemy_king_side: Side,
) -> u8 {
    let enemy_king_sq = board.king_square(enemy_king_side);
    let d = tables.dir[rook_dst as usize][enemy_king_sq as usize];
    if d != Directions::DIRFLAG && d != Directions::KNIGHT && is_rook_direction(d) {
        // The king's and rook's home squares are both vacated by castling
        // before the rook's new square can check the enemy king.
        if nopose2(board, tables, rook_dst, enemy_king_sq, vacated_a, vacated_b) {
            return enemy_king_sq;
        }
    }
    FLAG
}

/// Is the ray from `from` to `to` (must share a precomputed direction)
/// clear of pieces, treating `vacated` as empty even if currently
/// occupied? Used for check-field computation before the move is actually
/// made.
fn nopose(board: &Board, tables: &Tables, from: Square, to: Square, vacated: Square) -> bool {
    nopose2(board, tables, from, to, vacated, FLAG)
}

/// As `nopose`, but two squares (e.g. castling's king and rook homes) are
/// treated as vacated.
fn nopose2(board: &Board, tables: &Tables, from: Square, to: Square, vacated_a: Square, vacated_b: Square) -> bool {
    let d = tables.dir[from as usize][to as usize];
    if d == Directions::DIRFLAG || d == Directions::KNIGHT {
        return false;
    }
    for &sq in tables.rays[from as usize][d as usize].iter() {
        if sq == to {
            return true;
        }
        if sq == vacated_a || sq == vacated_b {
            continue;
        }
        if !board.piece_at(sq).is_empty() {
            return false;
        }
    }
    false
}

/// Friendly pawns whose forward push (single or double) lands on `dst`
/// (used to interpose a check by pushing a pawn).
fn pawn_push_sources(board: &Board, tables: &Tables, side: Side, dst: Square) -> Vec<Square> {
    let mut found = Vec::new();
    for &src in board.squares_of(Kind::Pawn, side).iter() {
        let slots = tables.pawn_moves[side][src as usize];
        if slots[PawnSlot::PUSH1] == dst && board.piece_at(dst).is_empty() {
            found.push(src);
        } else if slots[PawnSlot::PUSH2] == dst
            && slots[PawnSlot::PUSH1] != FLAG
            && board.piece_at(slots[PawnSlot::PUSH1]).is_empty()
            && board.piece_at(dst).is_empty()
        {
            found.push(src);
        }
    }
    found
}

/// The special-cased horizontal-pin test for en-passant: if king,
/// capturing pawn, captured pawn, and an enemy rook/queen share a rank,
/// the capture is illegal even though static pin detection misses it
/// (both pawns leave the rank in the same instant).
fn en_passant_exposes_king_horizontally(
    board: &Board,
    tables: &Tables,
    side: Side,
    capturing_pawn_src: Square,
    captured_pawn_sq: Square,
    king_sq: Square,
) -> bool {
    if rank_of(king_sq) != rank_of(capturing_pawn_src) || rank_of(king_sq) != rank_of(captured_pawn_sq) {
        return false;
    }
    let enemy = opponent(side);
    let d = tables.dir[king_sq as usize][capturing_pawn_src as usize];
    if d == Directions::DIRFLAG || !is_rook_direction(d) {
        return false;
    }
    for &sq in tables.rays[king_sq as usize][d as usize].iter() {
        if sq == capturing_pawn_src || sq == captured_pawn_sq {
            continue;
        }
        let p = board.piece_at(sq);
        if p.is_empty() {
            continue;
        }
        if p.side == enemy && matches!(p.kind, Kind::Rook | Kind::Queen) {
            return true;
        }
        return false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::tables::Tables;
    use std::sync::Arc;

    fn tables() -> Arc<Tables> {
        Arc::new(Tables::new())
    }

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let board = Board::starting(tables());
        let mg = MoveGenerator::new();
        let history = HistoryTable::new();
        let moves = mg.generate_legal_moves(&board, false, &history, 0, 0).unwrap();
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn stalemate_position_has_no_king_moves() {
        let board = Board::from_fen("8/8/8/8/8/kq6/8/K7 w - - 0 1", tables()).unwrap();
        let mg = MoveGenerator::new();
        let history = HistoryTable::new();
        let moves = mg.generate_legal_moves(&board, false, &history, 0, 0).unwrap();
        assert!(moves.is_empty());
    }

    #[test]
    fn en_passant_rejected_when_it_exposes_the_king() {
        let board = Board::from_fen("8/8/8/KPp4r/1R3p1k/8/4P3/8 w - c6 0 1", tables()).unwrap();
        let mg = MoveGenerator::new();
        let history = HistoryTable::new();
        let moves = mg.generate_legal_moves(&board, false, &history, 0, 0).unwrap();
        let b5 = square_of(1, 4);
        let c6 = square_of(2, 5);
        assert!(moves.find_by_src_dst(b5, c6).is_none());
    }

    #[test]
    fn a_hot_quiet_move_joins_the_preferred_prefix() {
        let board = Board::starting(tables());
        let mg = MoveGenerator::new();
        let mut history = HistoryTable::new();
        let g1 = square_of(6, 0);
        let f3 = square_of(5, 2);
        history.record(Sides::WHITE, g1, f3, 4);

        let cold = mg.generate_legal_moves(&board, false, &history, 20, 2).unwrap();
        let cold_len = cold.preferred_prefix_len();

        let hot = mg.generate_legal_moves(&board, false, &history, 5, 2).unwrap();
        let hot_len = hot.preferred_prefix_len();

        assert_eq!(cold_len, 0, "no captures/checks from the start, so nothing is preferred without history");
        assert_eq!(hot_len, 1, "Ng1-f3 recently caused a best-move update, so it joins the preferred prefix");
    }
}
