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

use tracing::debug;

use crate::{position::Position, uci::Uci};

/// Counts legal move sequences.
///
/// Computing perft numbers is useful for comparing, testing and
/// debugging move generation correctness and performance.
///
/// The method used here is simple: Generate the legal moves and recurse,
/// counting the leaf nodes.
///
/// # Examples
///
/// ```
/// use kibitz::{perft, Position};
///
/// let pos = Position::new();
/// assert_eq!(perft(&pos, 1), 20);
/// assert_eq!(perft(&pos, 2), 400);
/// ```
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth < 1 {
        1
    } else {
        let moves = pos.possible_moves();

        if depth == 1 {
            moves.len() as u64
        } else {
            moves
                .iter()
                .map(|m| perft(&pos.play_unchecked(m), depth - 1))
                .sum()
        }
    }
}

/// Like [`perft()`], but logs the subtotal of every root move.
pub fn debug_perft(pos: &Position, depth: u32) -> u64 {
    if depth < 1 {
        1
    } else {
        pos.possible_moves()
            .iter()
            .map(|m| {
                let nodes = perft(&pos.play_unchecked(m), depth - 1);
                debug!(uci = %Uci::from_move(m), %m, nodes, "perft subtotal");
                nodes
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    #[test]
    fn test_zero_depth() {
        assert_eq!(perft(&Position::empty(), 0), 1);
        assert_eq!(perft(&Position::empty(), 1), 0);
    }

    #[test]
    fn test_debug_perft() {
        let pos: Position = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position();
        assert_eq!(debug_perft(&pos, 2), perft(&pos, 2));
        assert_eq!(perft(&pos, 2), 191);
    }
}
