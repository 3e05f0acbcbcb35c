// This file is part of the kibitz library.
// Copyright (C) 2024 The kibitz developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Parse and write Forsyth-Edwards-Notation.
//!
//! Castling rights become [`Flags::CAN_CASTLE`] on the king and the corner
//! rook, and the en passant square becomes a [`Square::EN_PASSANT`] cell.
//! Move counters are only kept on the [`Fen`] record.
//!
//! # Examples
//!
//! ```
//! use kibitz::fen::Fen;
//!
//! let fen: Fen = "r1bqkbnr/ppp2Qpp/2np4/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4".parse()?;
//! let pos = fen.clone().into_position();
//! assert!(pos.is_check());
//!
//! assert_eq!(Fen::from_position(&pos).to_string(),
//!            "r1bqkbnr/ppp2Qpp/2np4/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1");
//! # Ok::<_, kibitz::fen::ParseFenError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use crate::{
    board::Board,
    color::Color,
    coords::Coords,
    position::Position,
    role::Role,
    square::{Flags, Square},
};

/// Errors that can occur when parsing a FEN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseFenError {
    InvalidBoard,
    InvalidTurn,
    InvalidCastling,
    InvalidEpSquare,
    InvalidHalfmoveClock,
    InvalidFullmoves,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseFenError::InvalidBoard => "invalid board part in fen",
            ParseFenError::InvalidTurn => "invalid turn part in fen",
            ParseFenError::InvalidCastling => "invalid castling part in fen",
            ParseFenError::InvalidEpSquare => "invalid en passant part in fen",
            ParseFenError::InvalidHalfmoveClock => "invalid halfmove clock in fen",
            ParseFenError::InvalidFullmoves => "invalid fullmove number in fen",
        })
    }
}

impl Error for ParseFenError {}

/// A parsed FEN record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fen {
    pub position: Position,
    pub halfmoves: u32,
    pub fullmoves: u32,
}

impl Default for Fen {
    fn default() -> Fen {
        Fen {
            position: Position::new(),
            halfmoves: 0,
            fullmoves: 1,
        }
    }
}

impl Fen {
    pub fn empty() -> Fen {
        Fen {
            position: Position::empty(),
            ..Fen::default()
        }
    }

    /// Describes a position. The counters are set to their initial values.
    pub fn from_position(pos: &Position) -> Fen {
        Fen {
            position: *pos,
            ..Fen::default()
        }
    }

    pub fn into_position(self) -> Position {
        self.position
    }

    /// Parses a FEN or EPD. Missing trailing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFenError`] naming the first invalid field.
    pub fn from_ascii(fen: &[u8]) -> Result<Fen, ParseFenError> {
        let fen = std::str::from_utf8(fen).map_err(|_| ParseFenError::InvalidBoard)?;
        let mut result = Fen::empty();
        let mut parts = fen.split_ascii_whitespace();

        let board_part = parts.next().ok_or(ParseFenError::InvalidBoard)?;
        let board = Board::from_board_fen(board_part)
            .filter(is_playable)
            .ok_or(ParseFenError::InvalidBoard)?;

        let turn = match parts.next() {
            Some("w") | None => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(ParseFenError::InvalidTurn),
        };
        result.position = Position::from_board(board, turn);

        if let Some(castling_part) = parts.next() {
            if castling_part != "-" {
                for ch in castling_part.chars() {
                    add_castling_right(&mut result.position, ch)?;
                }
            }
        }

        match parts.next() {
            Some("-") | None => (),
            Some(ep_part) => {
                let at: Coords = ep_part.parse().map_err(|_| ParseFenError::InvalidEpSquare)?;
                if !is_en_passant_target(&result.position, at) {
                    return Err(ParseFenError::InvalidEpSquare);
                }
                result.position.set_square(at, Square::EN_PASSANT);
            }
        }

        if let Some(halfmoves_part) = parts.next() {
            result.halfmoves = btoi::btou(halfmoves_part.as_bytes())
                .map_err(|_| ParseFenError::InvalidHalfmoveClock)?;
        }

        if let Some(fullmoves_part) = parts.next() {
            result.fullmoves = btoi::btou(fullmoves_part.as_bytes())
                .map_err(|_| ParseFenError::InvalidFullmoves)?;
        }

        if parts.next().is_some() {
            return Err(ParseFenError::InvalidFullmoves);
        }

        Ok(result)
    }
}

/// No pawns on the back ranks and at most one king per color.
fn is_playable(board: &Board) -> bool {
    let mut kings = [0; 2];
    for (at, piece) in board.pieces() {
        match piece.role {
            Role::Pawn if at.row() == 0 || at.row() == 7 => return false,
            Role::King => kings[piece.color as usize] += 1,
            _ => (),
        }
    }
    kings.iter().all(|&n| n <= 1)
}

/// The cell skipped by a double advance of the side that just moved: empty,
/// with that side's pawn beyond it and an empty starting cell behind it.
fn is_en_passant_target(pos: &Position, at: Coords) -> bool {
    let them = !pos.turn();
    let forward = them.forward();
    at.row() == them.en_passant_target_row()
        && pos.square(at).is_empty()
        && at
            .offset(forward, 0)
            .is_some_and(|beyond| pos.square(beyond).is(them.pawn()))
        && at
            .offset(-forward, 0)
            .is_some_and(|behind| pos.square(behind).is_empty())
}

fn add_castling_right(pos: &mut Position, ch: char) -> Result<(), ParseFenError> {
    let color = Color::from_white(ch.is_ascii_uppercase());
    let rook_col = match ch.to_ascii_lowercase() {
        'k' => 7,
        'q' => 0,
        _ => return Err(ParseFenError::InvalidCastling),
    };

    let king = Coords::new(color.home_row(), 4);
    let rook = king.with_col(rook_col);
    if !pos.square(king).is(color.king()) || !pos.square(rook).is(color.rook()) {
        return Err(ParseFenError::InvalidCastling);
    }

    pos.square_mut(king).insert_flags(Flags::CAN_CASTLE);
    pos.square_mut(rook).insert_flags(Flags::CAN_CASTLE);
    Ok(())
}

fn castling_part(pos: &Position) -> String {
    let mut fen = String::with_capacity(4);

    for color in Color::ALL {
        let king = Coords::new(color.home_row(), 4);
        if !pos.square(king).can_castle() {
            continue;
        }
        for (rook_col, ch) in [(7, 'k'), (0, 'q')] {
            let rook = pos.square(king.with_col(rook_col));
            if rook.is(color.rook()) && rook.can_castle() {
                fen.push(color.fold(ch.to_ascii_uppercase(), ch));
            }
        }
    }

    if fen.is_empty() {
        fen.push('-');
    }

    fen
}

fn ep_part(pos: &Position) -> String {
    pos.board()
        .iter()
        .find(|(_, square)| square.is_en_passant())
        .map_or_else(|| "-".to_owned(), |(at, _)| at.to_string())
}

/// Renders a position without move counters.
pub fn epd(pos: &Position) -> String {
    format!(
        "{} {} {} {}",
        pos.board().board_fen(),
        pos.turn().char(),
        castling_part(pos),
        ep_part(pos)
    )
}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(fen: &str) -> Result<Fen, ParseFenError> {
        Fen::from_ascii(fen.as_bytes())
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            epd(&self.position),
            self.halfmoves,
            self.fullmoves
        )
    }
}
