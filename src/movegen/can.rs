/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! CAN (coordinate algebraic notation) move codec: test and protocol glue
//! only"), not a driver-facing library. Encodes as
//! `<from-file><from-rank><to-file><to-rank>[promo-letter]`; both
//! `e1g1`-style (king moves two squares) and `e1h1`-style (king onto the
//! rook's square) castling notations are recognized against the legal
//! move list and converted to the canonical castle-flagged `Move`.

use crate::board::Board;
use crate::defs::{file_of, rank_of, square_of, Square};
use crate::movegen::defs::{CastleKind, Move, MoveList};
use crate::piece::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCan;

fn square_from_text(file: char, rank: char) -> Option<Square> {
    let f = file.to_ascii_lowercase() as i32 - 'a' as i32;
    let r = rank as i32 - '1' as i32;
    if (0..8).contains(&f) && (0..8).contains(&r) {
        Some(square_of(f as u8, r as u8))
    } else {
        None
    }
}

fn promo_from_char(c: char) -> Option<Kind> {
    match c.to_ascii_lowercase() {
        'q' => Some(Kind::Queen),
        'r' => Some(Kind::Rook),
        'b' => Some(Kind::Bishop),
        'n' => Some(Kind::Knight),
        _ => None,
    }
}

fn promo_to_char(kind: Kind) -> Option<char> {
    match kind {
        Kind::Queen => Some('q'),
        Kind::Rook => Some('r'),
        Kind::Bishop => Some('b'),
        Kind::Knight => Some('n'),
        _ => None,
    }
}

/// Parses `text` against `board`'s legal moves, so the returned `Move`
/// carries the correct `check`/`castle` fields exactly as generated.
/// Never returns a pseudo-legal-but-illegal move: the lookup is into an
/// already-filtered legal `MoveList`.
pub fn parse(text: &str, board: &Board, legal: &MoveList) -> Result<Move, InvalidCan> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 4 || chars.len() > 5 {
        return Err(InvalidCan);
    }
    let src = square_from_text(chars[0], chars[1]).ok_or(InvalidCan)?;
    let dst = square_from_text(chars[2], chars[3]).ok_or(InvalidCan)?;
    let promotion = if chars.len() == 5 { promo_from_char(chars[4]).ok_or(InvalidCan)? } else { Kind::Empty };

    if let Some(mv) = legal.find_by_src_dst_promo(src, dst, promotion) {
        return Ok(mv);
    }

    // KxR-style castling: dst names the rook's home square rather than the
    // king's two-square destination. Re-target the search at the matching
    // castle move by side and wing.
    let mover = board.piece_at(src);
    if mover.is_king() {
        let variant = board.variant();
        let side = mover.side;
        let wing = if dst == variant.rook_home_oo[side] {
            Some(CastleKind::KingSide)
        } else if dst == variant.rook_home_ooo[side] {
            Some(CastleKind::QueenSide)
        } else {
            None
        };
        if let Some(wing) = wing {
            if let Some(mv) = legal.iter().find(|m| m.src == src && m.castle == wing) {
                return Ok(*mv);
            }
        }
    }

    Err(InvalidCan)
}

/// Renders `mv` in CAN form. Castling always renders king-moves-two style
/// (`e1g1`), matching how `Move::src`/`dst` are stored internally.
pub fn format(mv: &Move) -> String {
    let mut out = String::with_capacity(5);
    out.push((b'a' + file_of(mv.src)) as char);
    out.push((b'1' + rank_of(mv.src)) as char);
    out.push((b'a' + file_of(mv.dst)) as char);
    out.push((b'1' + rank_of(mv.dst)) as char);
    if let Some(c) = promo_to_char(mv.promotion) {
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::MoveGenerator;
    use crate::search::defs::HistoryTable;
    use std::sync::Arc;

    #[test]
    fn round_trips_an_ordinary_move() {
        let board = Board::starting(Arc::new(crate::tables::Tables::new()));
        let history = HistoryTable::new();
        let legal = MoveGenerator::new().generate_legal_moves(&board, false, &history, 0, 0).unwrap();
        let mv = parse("e2e4", &board, &legal).expect("e2e4 is legal from the start");
        assert_eq!(format(&mv), "e2e4");
    }

    #[test]
    fn recognizes_kxr_style_castling() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Arc::new(crate::tables::Tables::new())).unwrap();
        let history = HistoryTable::new();
        let legal = MoveGenerator::new().generate_legal_moves(&board, false, &history, 0, 0).unwrap();
        let mv = parse("e1h1", &board, &legal).expect("KxR-style kingside castle");
        assert_eq!(mv.castle, CastleKind::KingSide);
        assert_eq!(format(&mv), "e1g1");
    }
}
