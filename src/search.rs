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

//! Best move search.
//!
//! [`Searcher::minimax()`] walks a tree of bounded depth. Lines that
//! capture or give check are followed deeper than quiet lines, and a
//! mating move ends the search of its node at once.

use tracing::{debug, trace};

use crate::{
    color::Color,
    eval::{Evaluator, Weights},
    m::{Move, MoveList},
    position::{Position, State},
};

/// Score of a position won by white.
pub const MAX_EVAL: i32 = i32::MAX / 2;
/// Score of a position won by black.
pub const MIN_EVAL: i32 = -MAX_EVAL;

/// Depth limits, counted in plies from the root.
///
/// The limit of a line is chosen by the move leading to a node: capture
/// lines use `capture`, moves giving check use `check`, and everything else
/// uses `quiet`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub quiet: u32,
    pub check: u32,
    pub capture: u32,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            quiet: 3,
            check: 4,
            capture: 5,
        }
    }
}

/// Counters collected during a search.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Successor positions built and classified.
    pub nodes: u64,
}

/// Searches positions with fixed limits and weights.
#[derive(Clone, Debug, Default)]
pub struct Searcher {
    config: SearchConfig,
    evaluator: Evaluator,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(config: SearchConfig, weights: Weights) -> Searcher {
        Searcher {
            config,
            evaluator: Evaluator::new(weights),
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Counters of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Finds the best move for the side to move, together with its score
    /// from white's point of view.
    ///
    /// Returns [`Move::EMPTY`] if there is no legal move.
    ///
    /// # Examples
    ///
    /// ```
    /// use kibitz::{fen::Fen, search::{Searcher, MAX_EVAL}};
    ///
    /// let pos = "6k1/5ppp/8/8/8/8/8/R5K1 w - -".parse::<Fen>()?.into_position();
    /// let mut searcher = Searcher::default();
    /// let (best, eval) = searcher.minimax(&pos);
    /// assert_eq!(best.to_string(), "a1-a8");
    /// assert_eq!(eval, MAX_EVAL - 1);
    /// # Ok::<_, kibitz::fen::ParseFenError>(())
    /// ```
    pub fn minimax(&mut self, pos: &Position) -> (Move, i32) {
        self.stats = SearchStats::default();
        let (best, eval) = self.find_best(pos, 1);
        debug!(%best, eval, nodes = self.stats.nodes, "minimax search finished");
        (best, eval)
    }

    fn find_best(&mut self, pos: &Position, depth: u32) -> (Move, i32) {
        let minimizing = pos.turn() == Color::Black;
        let mut best = Move::EMPTY;
        let mut best_eval = if minimizing { MAX_EVAL } else { MIN_EVAL };

        for m in ordered_moves(pos) {
            let capture = pos.is_capture(&m);
            let next = pos.play_unchecked(&m);
            self.stats.nodes += 1;

            let eval = match next.state() {
                State::Checkmate => {
                    let eval = if minimizing { MIN_EVAL + 1 } else { MAX_EVAL - 1 };
                    if depth == 1 {
                        trace!(%m, eval, "mate");
                    }
                    return (m, eval);
                }
                State::Stalemate => 0,
                state => {
                    let limit = if capture {
                        self.config.capture
                    } else if state == State::Check {
                        self.config.check
                    } else {
                        self.config.quiet
                    };
                    if depth < limit {
                        self.find_best(&next, depth + 1).1
                    } else {
                        self.evaluator.evaluate(&next)
                    }
                }
            };

            if depth == 1 {
                trace!(%m, eval, "root move");
            }

            if (minimizing && eval < best_eval) || (!minimizing && eval > best_eval) {
                best = m;
                best_eval = eval;
            }
        }

        (best, best_eval)
    }

    /// Picks the move that is best in material after a single ply, for the
    /// side to move. The first of equally good moves wins.
    pub fn capture_move(&mut self, pos: &Position) -> Move {
        self.stats = SearchStats::default();
        let material = Evaluator::new(Weights::MATERIAL);
        let sign = pos.turn().sign();

        let mut best = Move::EMPTY;
        let mut best_eval = i32::MIN;
        for m in pos.possible_moves() {
            self.stats.nodes += 1;
            let eval = sign * material.evaluate(&pos.play_unchecked(&m));
            if eval > best_eval {
                best = m;
                best_eval = eval;
            }
        }

        debug!(%best, best_eval, "capture search finished");
        best
    }

    /// Picks the first move that mates, or else the first legal move.
    pub fn checkmate_move(&mut self, pos: &Position) -> Move {
        self.stats = SearchStats::default();
        let moves = pos.possible_moves();

        let mate = moves.iter().copied().find(|m| {
            self.stats.nodes += 1;
            pos.play_unchecked(m).state() == State::Checkmate
        });

        let best = mate.or_else(|| moves.first().copied()).unwrap_or(Move::EMPTY);
        debug!(%best, mate = mate.is_some(), "checkmate search finished");
        best
    }
}

/// Legal moves in search order: captures, then promotions, then the rest.
/// Generation order is kept within each group.
pub fn ordered_moves(pos: &Position) -> MoveList {
    let moves = pos.possible_moves();
    let (captures, quiet): (MoveList, MoveList) =
        moves.into_iter().partition(|m| pos.is_capture(m));
    let (promotions, rest): (MoveList, MoveList) =
        quiet.into_iter().partition(|m| m.is_promotion());

    let mut ordered = captures;
    ordered.extend(promotions);
    ordered.extend(rest);
    ordered
}
