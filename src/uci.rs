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

//! Parse and write moves in coordinate notation.
//!
//! # Examples
//!
//! Parse and write UCIs:
//!
//! ```
//! use kibitz::{uci::Uci, Coords};
//!
//! let uci: Uci = "a7a8q".parse()?;
//! assert!(matches!(uci, Uci::Normal { promotion: Some(_), .. }));
//!
//! assert_eq!(uci.to_string(), "a7a8q");
//! # Ok::<_, kibitz::uci::ParseUciError>(())
//! ```
//!
//! Resolve a UCI to a legal move:
//!
//! ```
//! use kibitz::{uci::Uci, Position};
//!
//! let pos = Position::new();
//! let m = "g1f3".parse::<Uci>()?.to_move(&pos)?;
//! assert_eq!(m.to_string(), "g1-f3");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use crate::{coords::Coords, m::Move, position::Position, role::Role};

/// Error when parsing an invalid UCI.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseUciError;

impl fmt::Display for ParseUciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid uci")
    }
}

impl Error for ParseUciError {}

/// Error when a UCI does not name a legal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IllegalUciError;

impl fmt::Display for IllegalUciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("illegal uci")
    }
}

impl Error for IllegalUciError {}

/// A move as written in coordinate notation.
///
/// Castling is written as the king's move, for example `e1g1`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Uci {
    Normal {
        from: Coords,
        to: Coords,
        promotion: Option<Role>,
    },
    /// `0000`.
    Null,
}

impl FromStr for Uci {
    type Err = ParseUciError;

    fn from_str(uci: &str) -> Result<Uci, ParseUciError> {
        Uci::from_ascii(uci.as_bytes())
    }
}

impl fmt::Display for Uci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Uci::Normal {
                from,
                to,
                promotion: None,
            } => write!(f, "{from}{to}"),
            Uci::Normal {
                from,
                to,
                promotion: Some(promotion),
            } => write!(f, "{}{}{}", from, to, promotion.char()),
            Uci::Null => f.write_str("0000"),
        }
    }
}

impl From<Move> for Uci {
    fn from(m: Move) -> Uci {
        Uci::from_move(&m)
    }
}

impl Uci {
    /// Parses a move in coordinate notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseUciError`] if `uci` is not syntactically valid.
    pub fn from_ascii(uci: &[u8]) -> Result<Uci, ParseUciError> {
        if uci == b"0000" {
            return Ok(Uci::Null);
        }

        if uci.len() != 4 && uci.len() != 5 {
            return Err(ParseUciError);
        }

        let from = Coords::from_ascii(&uci[0..2]).map_err(|_| ParseUciError)?;
        let to = Coords::from_ascii(&uci[2..4]).map_err(|_| ParseUciError)?;
        let promotion = match uci.get(4) {
            None => None,
            Some(&ch) => Some(
                Role::from_char(char::from(ch))
                    .filter(|role| Role::PROMOTIONS.contains(role))
                    .ok_or(ParseUciError)?,
            ),
        };

        if from == to {
            return Err(ParseUciError);
        }

        Ok(Uci::Normal {
            from,
            to,
            promotion,
        })
    }

    /// Converts a move to coordinate notation. The empty move becomes
    /// [`Uci::Null`].
    pub fn from_move(m: &Move) -> Uci {
        if m.is_null() {
            Uci::Null
        } else {
            Uci::Normal {
                from: m.from(),
                to: m.to(),
                promotion: m.promoted_to(),
            }
        }
    }

    /// Tries to convert the `Uci` to a legal [`Move`] in the context of a
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalUciError`] if there is no such legal move, if a
    /// promotion piece is missing or superfluous, or for [`Uci::Null`].
    pub fn to_move(&self, pos: &Position) -> Result<Move, IllegalUciError> {
        match *self {
            Uci::Normal {
                from,
                to,
                promotion,
            } => pos
                .possible_moves_between(from, to)
                .into_iter()
                .find(|m| m.promoted_to() == promotion)
                .ok_or(IllegalUciError),
            Uci::Null => Err(IllegalUciError),
        }
    }
}
