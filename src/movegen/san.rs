/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! Best-effort SAN (standard algebraic notation) formatting: test and
//! protocol glue only"), not a disambiguation-exact
//! driver-facing SAN library. Disambiguates by file, then
//! rank, then both, which covers every standard-chess position; it does
//! not attempt the full set of suffix annotations ("!", "?", NAG codes)
//! a dedicated SAN library would own.

use crate::board::Board;
use crate::movegen::defs::{CastleKind, Move, MoveList};
use crate::movegen::MoveGenerator;
use crate::piece::Kind;
use crate::search::defs::HistoryTable;

fn file_char(sq: u8) -> char {
    (b'a' + crate::defs::file_of(sq)) as char
}
fn rank_char(sq: u8) -> char {
    (b'1' + crate::defs::rank_of(sq)) as char
}

fn piece_letter(kind: Kind) -> &'static str {
    match kind {
        Kind::King => "K",
        Kind::Queen => "Q",
        Kind::Rook => "R",
        Kind::Bishop => "B",
        Kind::Knight => "N",
        _ => "",
    }
}

fn promo_letter(kind: Kind) -> &'static str {
    match kind {
        Kind::Queen => "Q",
        Kind::Rook => "R",
        Kind::Bishop => "B",
        Kind::Knight => "N",
        _ => "",
    }
}

/// Formats `mv`, which must be a member of `legal` (the legal move list
/// for `board`'s current position), as SAN.
pub fn format(mv: &Move, board: &Board, legal: &MoveList, mg: &MoveGenerator) -> String {
    if mv.castle == CastleKind::KingSide {
        return append_suffix("O-O", mv, board, mg);
    }
    if mv.castle == CastleKind::QueenSide {
        return append_suffix("O-O-O", mv, board, mg);
    }

    let mover = board.piece_at(mv.src);
    let is_capture = mv.is_en_passant() || !board.piece_at(mv.dst).is_empty();

    let mut out = String::new();
    if mover.kind == Kind::Pawn {
        if is_capture {
            out.push(file_char(mv.src));
        }
    } else {
        out.push_str(piece_letter(mover.kind));
        out.push_str(&disambiguation(mv, mover.kind, board, legal));
    }

    if is_capture {
        out.push('x');
    }
    out.push(file_char(mv.dst));
    out.push(rank_char(mv.dst));

    if mv.is_promotion() {
        out.push('=');
        out.push_str(promo_letter(mv.promotion));
    }

    append_suffix(&out, mv, board, mg)
}

fn disambiguation(mv: &Move, kind: Kind, board: &Board, legal: &MoveList) -> String {
    let contenders: Vec<&Move> = legal
        .iter()
        .filter(|m| m.dst == mv.dst && m.src != mv.src && board.piece_at(m.src).kind == kind)
        .collect();
    if contenders.is_empty() {
        return String::new();
    }
    let same_file = contenders.iter().any(|m| crate::defs::file_of(m.src) == crate::defs::file_of(mv.src));
    let same_rank = contenders.iter().any(|m| crate::defs::rank_of(m.src) == crate::defs::rank_of(mv.src));
    if !same_file {
        file_char(mv.src).to_string()
    } else if !same_rank {
        rank_char(mv.src).to_string()
    } else {
        format!("{}{}", file_char(mv.src), rank_char(mv.src))
    }
}

fn append_suffix(base: &str, mv: &Move, board: &Board, mg: &MoveGenerator) -> String {
    if !mv.gives_check() {
        return base.to_string();
    }
    let mut after = board.clone();
    after.make_move(*mv);
    let history = HistoryTable::new();
    let replies = mg.generate_legal_moves(&after, false, &history, 0, 0).unwrap_or_default();
    if replies.is_empty() {
        format!("{base}#")
    } else {
        format!("{base}+")
    }
}
