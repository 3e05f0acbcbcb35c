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

//! Static evaluation of positions.

use crate::{coords::Coords, position::Position, role::Role, types::Piece};

/// Coefficients of the evaluation terms.
///
/// # Examples
///
/// ```
/// use kibitz::{Evaluator, Position, Weights};
///
/// let eval = Evaluator::new(Weights::MATERIAL);
/// assert_eq!(eval.evaluate(&Position::new()), 0);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    /// Multiplies the material value of every piece.
    pub material: i32,
    /// Rewards pawns for advancing, more so in the center files.
    pub advance: i32,
    /// Rewards pawns defending an own pawn diagonally ahead.
    pub protect: i32,
    /// Rewards centralized knights and bishops.
    pub mobility: i32,
    /// Rewards pawns threatening an enemy piece diagonally ahead.
    pub attack: i32,
}

impl Weights {
    /// Counts material only.
    pub const MATERIAL: Weights = Weights {
        material: 1,
        advance: 0,
        protect: 0,
        mobility: 0,
        attack: 0,
    };
}

impl Default for Weights {
    fn default() -> Weights {
        Weights {
            material: 32,
            advance: 1,
            protect: 1,
            mobility: 2,
            attack: 8,
        }
    }
}

/// Scores positions from white's point of view.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    pub const fn new(weights: Weights) -> Evaluator {
        Evaluator { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Sums the contributions of all pieces. Positive scores favor white.
    ///
    /// The result only depends on the board, and mirroring the board while
    /// swapping colors negates it.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        pos.board()
            .pieces()
            .map(|(at, piece)| self.piece_score(pos, at, piece))
            .sum()
    }

    fn piece_score(&self, pos: &Position, at: Coords, piece: Piece) -> i32 {
        let w = &self.weights;
        let mut score = w.material * piece.role.value();

        match piece.role {
            Role::Pawn => {
                let row = i32::from(at.row());
                let advanced = piece.color.fold(row - 1, 6 - row);
                score += w.advance * (advanced + 1) * (i32::from(at.col_centrality()) + 1);

                for dc in [-1, 1] {
                    let Some(target) = at
                        .offset(piece.color.forward(), dc)
                        .and_then(|ahead| pos.board().piece_at(ahead))
                    else {
                        continue;
                    };
                    if target == piece {
                        score += w.protect * Role::Pawn.value();
                    } else if target.color != piece.color && target.role != Role::Pawn {
                        score += w.attack * target.role.value();
                    }
                }
            }
            Role::Knight | Role::Bishop => {
                score += w.mobility * i32::from(at.row_centrality() + at.col_centrality());
            }
            Role::Rook | Role::Queen | Role::King => {}
        }

        piece.color.sign() * score
    }
}
