/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! FEN read/write. Full SAN/FEN protocol ownership belongs to the driver,
//! but a Position can be constructed by parsing external input, and tests
//! address positions by FEN, so this crate owns a minimal, legality-checked
//! FEN codec as test/protocol glue.

use crate::board::position::{InvalidPosition, Position};
use crate::defs::{square_of, CastleRights, Sides, FLAG};
use crate::piece::{Kind, Piece};

pub const START_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const KIWIPETE_FEN: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn kind_from_char(c: char) -> Option<Kind> {
    match c.to_ascii_lowercase() {
        'p' => Some(Kind::Pawn),
        'n' => Some(Kind::Knight),
        'b' => Some(Kind::Bishop),
        'r' => Some(Kind::Rook),
        'q' => Some(Kind::Queen),
        'k' => Some(Kind::King),
        _ => None,
    }
}

fn char_from_kind(kind: Kind, side: usize) -> char {
    let c = match kind {
        Kind::Pawn => 'p',
        Kind::Knight => 'n',
        Kind::Bishop => 'b',
        Kind::Rook => 'r',
        Kind::Queen => 'q',
        Kind::King => 'k',
        Kind::Empty => unreachable!(),
    };
    if side == Sides::WHITE {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

/// Parse a standard six-field FEN string. This does NOT validate legality
/// — callers that need `Position::is_legal` checked () should
/// call it themselves with the active `Tables`, since construction here
/// has no table access and legality needs one.
pub fn parse_fen(fen: &str) -> Result<Position, InvalidPosition> {
    let mut position = Position::empty();
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(InvalidPosition { reason: "FEN must have at least 4 fields" });
    }

    let mut rank = 7i32;
    let mut file = 0i32;
    for c in fields[0].chars() {
        match c {
            '/' => {
                if file != 8 {
                    return Err(InvalidPosition { reason: "FEN rank did not fill 8 files" });
                }
                rank -= 1;
                file = 0;
            }
            '1'..='8' => {
                file += c.to_digit(10).unwrap() as i32;
            }
            _ => {
                let kind = kind_from_char(c).ok_or(InvalidPosition { reason: "unrecognized FEN piece letter" })?;
                let side = if c.is_ascii_uppercase() { Sides::WHITE } else { Sides::BLACK };
                if !(0..8).contains(&file) || !(0..8).contains(&rank) {
                    return Err(InvalidPosition { reason: "FEN piece placement out of range" });
                }
                let sq = square_of(file as u8, rank as u8);
                position.squares[sq as usize] = Piece::new(kind, side);
                file += 1;
            }
        }
    }
    if rank != 0 || file != 8 {
        return Err(InvalidPosition { reason: "FEN piece placement did not cover the board" });
    }

    position.turn = match fields[1] {
        "w" => Sides::WHITE,
        "b" => Sides::BLACK,
        _ => return Err(InvalidPosition { reason: "FEN side-to-move must be w or b" }),
    };

    let mut castle_rights = 0u8;
    if fields[2] != "-" {
        for c in fields[2].chars() {
            castle_rights |= match c {
                'K' => CastleRights::WHITE_OO,
                'Q' => CastleRights::WHITE_OOO,
                'k' => CastleRights::BLACK_OO,
                'q' => CastleRights::BLACK_OOO,
                _ => return Err(InvalidPosition { reason: "unrecognized FEN castling letter" }),
            };
        }
    }
    position.castle_rights = castle_rights;

    position.ep_square = if fields[3] == "-" {
        FLAG
    } else {
        parse_square(fields[3]).ok_or(InvalidPosition { reason: "unrecognized FEN en-passant square" })?
    };

    let halfmove: u32 = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove: u32 = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);
    position.ncp_plies = halfmove;
    // Ply counts half-moves from game start; fullmove 1 + white-to-move is ply 0.
    position.ply = (fullmove.saturating_sub(1)) * 2 + if position.turn == Sides::BLACK { 1 } else { 0 };

    Ok(position)
}

fn parse_square(s: &str) -> Option<crate::defs::Square> {
    let mut chars = s.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some(square_of(file as u8 - b'a', rank as u8 - b'1'))
}

fn square_to_str(sq: crate::defs::Square) -> String {
    let file = (b'a' + crate::defs::file_of(sq)) as char;
    let rank = (b'1' + crate::defs::rank_of(sq)) as char;
    format!("{file}{rank}")
}

pub fn to_fen(position: &Position) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        let mut empties = 0u8;
        for file in 0..8 {
            let sq = square_of(file, rank);
            let p = position.squares[sq as usize];
            if p.is_empty() {
                empties += 1;
            } else {
                if empties > 0 {
                    out.push_str(&empties.to_string());
                    empties = 0;
                }
                out.push(char_from_kind(p.kind, p.side));
            }
        }
        if empties > 0 {
            out.push_str(&empties.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out.push(' ');
    out.push(if position.turn == Sides::WHITE { 'w' } else { 'b' });
    out.push(' ');
    let mut castle = String::new();
    if position.castle_rights & CastleRights::WHITE_OO != 0 {
        castle.push('K');
    }
    if position.castle_rights & CastleRights::WHITE_OOO != 0 {
        castle.push('Q');
    }
    if position.castle_rights & CastleRights::BLACK_OO != 0 {
        castle.push('k');
    }
    if position.castle_rights & CastleRights::BLACK_OOO != 0 {
        castle.push('q');
    }
    out.push_str(if castle.is_empty() { "-" } else { &castle });
    out.push(' ');
    out.push_str(&if position.ep_square == FLAG {
        "-".to_string()
    } else {
        square_to_str(position.ep_square)
    });
    out.push(' ');
    out.push_str(&position.ncp_plies.to_string());
    out.push(' ');
    let fullmove = position.ply / 2 + 1;
    out.push_str(&fullmove.to_string());
    out
}
