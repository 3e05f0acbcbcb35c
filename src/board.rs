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

use std::fmt::{self, Write as _};

use crate::{
    color::Color,
    coords::Coords,
    role::Role,
    square::{Flags, Square},
    types::Piece,
};

/// The 64 cells of a chess board.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Square; 64],
}

impl Board {
    /// A board without any pieces.
    pub const fn empty() -> Board {
        Board {
            cells: [Square::EMPTY; 64],
        }
    }

    /// The standard starting layout. Kings and rooks may castle.
    pub fn new() -> Board {
        const BACKRANK: [Role; 8] = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::ALL {
            for (col, role) in (0..8).zip(BACKRANK) {
                let mut cell = Square::new(role.of(color));
                if matches!(role, Role::Rook | Role::King) {
                    cell.insert_flags(Flags::CAN_CASTLE);
                }
                board.set(Coords::new(color.home_row(), col), cell);
                board.set(Coords::new(color.pawn_row(), col), Square::new(color.pawn()));
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, at: Coords) -> Square {
        self.cells[at.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, at: Coords) -> &mut Square {
        &mut self.cells[at.index()]
    }

    #[inline]
    pub fn set(&mut self, at: Coords, cell: Square) {
        self.cells[at.index()] = cell;
    }

    #[inline]
    pub fn piece_at(&self, at: Coords) -> Option<Piece> {
        self.get(at).piece()
    }

    /// Empties a cell and returns what was there.
    pub fn take(&mut self, at: Coords) -> Square {
        std::mem::replace(self.get_mut(at), Square::EMPTY)
    }

    /// Finds the king of the given color.
    ///
    /// # Panics
    ///
    /// Panics if there is more than one king of that color.
    #[track_caller]
    pub fn king_of(&self, color: Color) -> Option<Coords> {
        let mut kings = self.pieces().filter(|&(_, piece)| piece == color.king());
        let king = kings.next().map(|(at, _)| at);
        assert!(kings.next().is_none(), "more than one {color} king");
        king
    }

    /// Clears `flags` on every cell of a row.
    pub fn clear_row_flags(&mut self, row: u8, flags: Flags) {
        for col in 0..8 {
            self.get_mut(Coords::new(row, col)).remove_flags(flags);
        }
    }

    /// All cells with their state, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, Square)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Coords::from_index(i), cell))
    }

    /// Occupied cells with their pieces, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coords, Piece)> + '_ {
        self.iter().filter_map(|(at, cell)| cell.piece().map(|p| (at, p)))
    }

    /// Parses the piece placement part of a FEN. No flags are set.
    pub fn from_board_fen(board_fen: &str) -> Option<Board> {
        let mut board = Board::empty();
        let mut rows = board_fen.split('/');

        for row in (0..8).rev() {
            let mut col = 0;
            for ch in rows.next()?.chars() {
                if let Some(empty) = ch.to_digit(10).filter(|&n| (1..=8).contains(&n)) {
                    col += empty as u8;
                } else {
                    let piece = Piece::from_char(ch)?;
                    if col >= 8 {
                        return None;
                    }
                    board.set(Coords::new(row, col), Square::new(piece));
                    col += 1;
                }
                if col > 8 {
                    return None;
                }
            }
            if col != 8 {
                return None;
            }
        }

        if rows.next().is_some() {
            return None;
        }

        Some(board)
    }

    /// Renders the piece placement part of a FEN.
    pub fn board_fen(&self) -> String {
        let mut fen = String::with_capacity(15);

        for row in (0..8).rev() {
            let mut empty = 0;

            for col in 0..8 {
                match self.piece_at(Coords::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }

            if row > 0 {
                fen.push('/');
            }
        }

        fen
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                f.write_char(
                    self.piece_at(Coords::new(row, col))
                        .map_or('.', Piece::char),
                )?;
                f.write_char(if col < 7 { ' ' } else { '\n' })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let board = Board::new();
        assert_eq!(board.piece_at("a2".parse().unwrap()), Some(Color::White.pawn()));
        assert_eq!(board.piece_at("b1".parse().unwrap()), Some(Color::White.knight()));
        assert_eq!(board.piece_at("d8".parse().unwrap()), Some(Color::Black.queen()));
        assert!(board.get("e1".parse().unwrap()).can_castle());
        assert!(board.get("h8".parse().unwrap()).can_castle());
        assert!(!board.get("b1".parse().unwrap()).can_castle());
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn test_board_fen() {
        assert_eq!(
            Board::new().board_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(Board::empty().board_fen(), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn test_from_board_fen() {
        let board = Board::from_board_fen("r3k2r/8/8/8/4P3/8/8/R3K2R").unwrap();
        assert_eq!(board.board_fen(), "r3k2r/8/8/8/4P3/8/8/R3K2R");
        assert_eq!(board.piece_at("e4".parse().unwrap()), Some(Color::White.pawn()));
        assert!(!board.get("a1".parse().unwrap()).can_castle());

        assert!(Board::from_board_fen("8/8/8/8/8/8/8").is_none());
        assert!(Board::from_board_fen("8/8/8/8/8/8/8/8/8").is_none());
        assert!(Board::from_board_fen("9/8/8/8/8/8/8/8").is_none());
        assert!(Board::from_board_fen("7/8/8/8/8/8/8/8").is_none());
        assert!(Board::from_board_fen("ppppppppp/8/8/8/8/8/8/8").is_none());
        assert!(Board::from_board_fen("8/8/8/8/8/8/8/7x").is_none());
    }

    #[test]
    fn test_king_of() {
        let board = Board::new();
        assert_eq!(board.king_of(Color::White), Some(Coords::new(0, 4)));
        assert_eq!(board.king_of(Color::Black), Some(Coords::new(7, 4)));
        assert_eq!(Board::empty().king_of(Color::White), None);
    }

    #[test]
    #[should_panic]
    fn test_two_kings() {
        let mut board = Board::empty();
        board.set(Coords::new(0, 0), Square::new(Color::White.king()));
        board.set(Coords::new(5, 5), Square::new(Color::White.king()));
        board.king_of(Color::White);
    }

    #[test]
    fn test_clear_row_flags() {
        let mut board = Board::empty();
        board.set(Coords::new(2, 3), Square::EN_PASSANT);
        board.clear_row_flags(2, Flags::EN_PASSANT);
        assert_eq!(board.get(Coords::new(2, 3)), Square::EMPTY);
    }
}
