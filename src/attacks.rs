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

//! Piece movement patterns and attack detection.
//!
//! Deltas are `(row, col)` pairs. Their order is the order in which moves
//! are generated.

use crate::{board::Board, color::Color, coords::Coords, role::Role};

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 0),
];

/// Cells along a ray, starting next to `from` and stopping at the edge of
/// the board. Blockers are not considered.
pub fn ray(from: Coords, (dr, dc): (i8, i8)) -> impl Iterator<Item = Coords> {
    std::iter::successors(from.offset(dr, dc), move |at| at.offset(dr, dc))
}

/// Tests if any piece of color `by` attacks `target`.
///
/// Looks outward from `target` for the nearest piece on each line and at
/// the knight offsets, instead of generating moves for the attacker. An
/// occupant of `target` itself is ignored.
///
/// # Examples
///
/// ```
/// use kibitz::{attacks, Board, Color, Coords, Square};
///
/// let mut board = Board::empty();
/// board.set(Coords::new(1, 3), Square::new(Color::White.pawn())); // d2
///
/// // White pawns capture upwards.
/// assert!(attacks::is_attacked(&board, Coords::new(2, 4), Color::White)); // e3
/// assert!(!attacks::is_attacked(&board, Coords::new(0, 4), Color::White)); // e1
/// ```
pub fn is_attacked(board: &Board, target: Coords, by: Color) -> bool {
    for dir in ROOK_DIRECTIONS {
        if let Some((distance, role)) = nearest(board, target, dir, by) {
            if matches!(role, Role::Rook | Role::Queen) || (distance == 1 && role == Role::King) {
                return true;
            }
        }
    }

    for dir @ (dr, _) in BISHOP_DIRECTIONS {
        if let Some((distance, role)) = nearest(board, target, dir, by) {
            match role {
                Role::Bishop | Role::Queen => return true,
                Role::King if distance == 1 => return true,
                // The pawn has to stand behind the target, seen from the
                // attacker's side.
                Role::Pawn if distance == 1 && dr == -by.forward() => return true,
                _ => {}
            }
        }
    }

    KNIGHT_DELTAS.iter().any(|&(dr, dc)| {
        target
            .offset(dr, dc)
            .is_some_and(|at| board.get(at).is(by.knight()))
    })
}

/// Nearest piece along a ray, if it belongs to `by`, with its distance.
fn nearest(board: &Board, from: Coords, dir: (i8, i8), by: Color) -> Option<(u8, Role)> {
    ray(from, dir)
        .zip(1..)
        .find_map(|(at, distance)| board.piece_at(at).map(|piece| (distance, piece)))
        .filter(|(_, piece)| piece.color == by)
        .map(|(distance, piece)| (distance, piece.role))
}
