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

use std::fmt;

use arrayvec::ArrayVec;

use crate::{coords::Coords, role::Role};

/// Description of a transition between two cells.
///
/// Besides source and destination, a move carries the rook columns of a
/// castling move and the promotion piece. For every move that is not a
/// castling move the two rook columns are equal, which is how castling is
/// recognized.
///
/// A move built from coordinates alone cannot describe castling or
/// promotion. Ask the position for fully specified moves instead, see
/// [`Position::possible_moves_between()`](crate::Position::possible_moves_between).
///
/// The all-zero move is the [`Move::EMPTY`] sentinel meaning "no move".
///
/// # Examples
///
/// ```
/// use kibitz::Move;
///
/// let m = Move::new(1, 4, 3, 4); // e2e4
/// assert!(!m.is_empty());
/// assert!(!m.is_castle());
/// assert_eq!(m.to_string(), "e2-e4");
///
/// assert!(Move::EMPTY.is_empty());
/// assert_eq!(Move::default(), Move::EMPTY);
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawMove")
)]
pub struct Move {
    src_row: u8,
    src_col: u8,
    dst_row: u8,
    dst_col: u8,
    rook_src_col: u8,
    rook_dst_col: u8,
    promoted_to: Option<Role>,
}

impl Move {
    /// No move.
    pub const EMPTY: Move = Move {
        src_row: 0,
        src_col: 0,
        dst_row: 0,
        dst_col: 0,
        rook_src_col: 0,
        rook_dst_col: 0,
        promoted_to: None,
    };

    /// Creates a plain move.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside `0..8`.
    #[track_caller]
    pub const fn new(src_row: u8, src_col: u8, dst_row: u8, dst_col: u8) -> Move {
        assert!(
            src_row < 8 && src_col < 8 && dst_row < 8 && dst_col < 8,
            "move coordinates out of range"
        );
        Move {
            src_row,
            src_col,
            dst_row,
            dst_col,
            rook_src_col: 0,
            rook_dst_col: 0,
            promoted_to: None,
        }
    }

    /// Creates a plain move between two cells.
    #[inline]
    pub const fn between(from: Coords, to: Coords) -> Move {
        Move::new(from.row(), from.col(), to.row(), to.col())
    }

    /// Creates a castling move of the king on `row`, from the e-file to
    /// `king_dst_col`, with the rook moving from `rook_src_col` to
    /// `rook_dst_col`.
    ///
    /// # Panics
    ///
    /// Panics if a value is out of range or the rook columns are equal.
    #[track_caller]
    pub const fn castle(row: u8, king_dst_col: u8, rook_src_col: u8, rook_dst_col: u8) -> Move {
        assert!(
            rook_src_col < 8 && rook_dst_col < 8 && rook_src_col != rook_dst_col,
            "invalid castling rook columns"
        );
        let mut m = Move::new(row, 4, row, king_dst_col);
        m.rook_src_col = rook_src_col;
        m.rook_dst_col = rook_dst_col;
        m
    }

    /// Returns the same move with the given promotion piece.
    ///
    /// # Panics
    ///
    /// Panics if `role` is a pawn or a king.
    #[must_use]
    #[track_caller]
    pub fn with_promotion(self, role: Role) -> Move {
        assert!(
            Role::PROMOTIONS.contains(&role),
            "invalid promotion piece"
        );
        Move {
            promoted_to: Some(role),
            ..self
        }
    }

    #[inline]
    pub const fn src_row(self) -> u8 {
        self.src_row
    }
    #[inline]
    pub const fn src_col(self) -> u8 {
        self.src_col
    }
    #[inline]
    pub const fn dst_row(self) -> u8 {
        self.dst_row
    }
    #[inline]
    pub const fn dst_col(self) -> u8 {
        self.dst_col
    }
    #[inline]
    pub const fn rook_src_col(self) -> u8 {
        self.rook_src_col
    }
    #[inline]
    pub const fn rook_dst_col(self) -> u8 {
        self.rook_dst_col
    }
    #[inline]
    pub const fn promoted_to(self) -> Option<Role> {
        self.promoted_to
    }

    /// The origin cell.
    #[inline]
    pub const fn from(self) -> Coords {
        Coords::new(self.src_row, self.src_col)
    }

    /// The target cell. For castling moves this is where the king lands.
    #[inline]
    pub const fn to(self) -> Coords {
        Coords::new(self.dst_row, self.dst_col)
    }

    /// Checks for the [`Move::EMPTY`] sentinel.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Move::EMPTY
    }

    /// Checks if source and destination coincide. Playing such a move only
    /// passes the turn.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.src_row == self.dst_row && self.src_col == self.dst_col
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.rook_src_col != self.rook_dst_col
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promoted_to.is_some()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMove {
    src_row: u8,
    src_col: u8,
    dst_row: u8,
    dst_col: u8,
    rook_src_col: u8,
    rook_dst_col: u8,
    promoted_to: Option<Role>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMove> for Move {
    type Error = &'static str;

    fn try_from(raw: RawMove) -> Result<Move, &'static str> {
        let from = Coords::try_new(raw.src_row, raw.src_col).ok_or("move source out of range")?;
        let to = Coords::try_new(raw.dst_row, raw.dst_col).ok_or("move target out of range")?;
        if raw.rook_src_col >= 8 || raw.rook_dst_col >= 8 {
            return Err("rook columns out of range");
        }
        if raw.promoted_to.is_some_and(|role| !Role::PROMOTIONS.contains(&role)) {
            return Err("invalid promotion piece");
        }
        Ok(Move {
            rook_src_col: raw.rook_src_col,
            rook_dst_col: raw.rook_dst_col,
            promoted_to: raw.promoted_to,
            ..Move::between(from, to)
        })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_castle() {
            f.write_str(if self.rook_src_col == 0 { "O-O-O" } else { "O-O" })
        } else {
            write!(f, "{}-{}", self.from(), self.to())?;
            if let Some(role) = self.promoted_to {
                write!(f, "={}", role.upper_char())?;
            }
            Ok(())
        }
    }
}

/// A container for moves that can be stored inline on the stack.
///
/// The capacity is enough for every legal position.
///
/// # Example
///
/// ```
/// use kibitz::Position;
///
/// let pos = Position::new();
/// let mut moves = pos.possible_moves();
/// moves.retain(|m| m.src_row() == 1);
/// assert_eq!(moves.len(), 16);
/// ```
pub type MoveList = ArrayVec<Move, 256>;
