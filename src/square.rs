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

use bitflags::bitflags;

use crate::{color::Color, role::Role, types::Piece};

bitflags! {
    /// Per-cell state flags.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Flags: u8 {
        /// The rook or king on this cell has never moved, so castling with
        /// it may still be possible.
        const CAN_CASTLE = 1;
        /// This empty cell was skipped by a double pawn advance on the
        /// previous ply and can be captured into en passant.
        const EN_PASSANT = 2;
    }
}

/// State of a single cell: an optional occupant plus [`Flags`].
///
/// # Examples
///
/// ```
/// use kibitz::{Color, Flags, Square};
///
/// let rook = Square::new(Color::White.rook()).with_flags(Flags::CAN_CASTLE);
/// assert!(rook.can_castle());
/// assert_eq!(rook.piece(), Some(Color::White.rook()));
///
/// assert!(Square::EMPTY.is_empty());
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    piece: Option<Piece>,
    flags: Flags,
}

impl Square {
    /// An empty cell without flags.
    pub const EMPTY: Square = Square {
        piece: None,
        flags: Flags::empty(),
    };

    /// An empty cell that can be captured into en passant.
    pub const EN_PASSANT: Square = Square {
        piece: None,
        flags: Flags::EN_PASSANT,
    };

    /// A cell holding `piece`, without flags.
    #[inline]
    pub const fn new(piece: Piece) -> Square {
        Square {
            piece: Some(piece),
            flags: Flags::empty(),
        }
    }

    #[must_use]
    #[inline]
    pub const fn with_flags(self, flags: Flags) -> Square {
        Square {
            piece: self.piece,
            flags: self.flags.union(flags),
        }
    }

    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        self.piece
    }

    #[inline]
    pub fn role(self) -> Option<Role> {
        self.piece.map(|p| p.role)
    }

    /// Color of the occupant, `None` if the cell is empty.
    #[inline]
    pub fn color(self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    #[inline]
    pub const fn flags(self) -> Flags {
        self.flags
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.piece.is_none()
    }

    #[inline]
    pub fn is(self, piece: Piece) -> bool {
        self.piece == Some(piece)
    }

    #[inline]
    pub fn is_occupied_by(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    #[inline]
    pub fn can_castle(self) -> bool {
        self.flags.contains(Flags::CAN_CASTLE)
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.flags.contains(Flags::EN_PASSANT)
    }

    #[inline]
    pub fn insert_flags(&mut self, flags: Flags) {
        self.flags.insert(flags);
    }

    #[inline]
    pub fn remove_flags(&mut self, flags: Flags) {
        self.flags.remove(flags);
    }

    /// Signed material value of the occupant, `0` if empty.
    #[inline]
    pub fn value(self) -> i32 {
        self.piece.map_or(0, Piece::value)
    }
}

impl From<Piece> for Square {
    fn from(piece: Piece) -> Square {
        Square::new(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut king = Square::new(Color::Black.king()).with_flags(Flags::CAN_CASTLE);
        assert!(king.can_castle());
        assert!(!king.is_en_passant());
        king.remove_flags(Flags::CAN_CASTLE);
        assert!(!king.can_castle());
        assert_eq!(king, Square::new(Color::Black.king()));
    }

    #[test]
    fn test_en_passant_cell() {
        let cell = Square::EN_PASSANT;
        assert!(cell.is_empty());
        assert!(cell.is_en_passant());
        assert_ne!(cell, Square::EMPTY);
        assert_eq!(cell.value(), 0);
    }

    #[test]
    fn test_occupant() {
        let cell = Square::from(Color::White.bishop());
        assert_eq!(cell.role(), Some(Role::Bishop));
        assert!(cell.is_occupied_by(Color::White));
        assert!(!cell.is_occupied_by(Color::Black));
        assert_eq!(cell.value(), 3);
    }
}
