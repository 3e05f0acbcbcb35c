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

use std::{error::Error, fmt, str::FromStr};

use tracing::debug;

use crate::{
    eval::Weights,
    m::Move,
    position::Position,
    search::{SearchConfig, SearchStats, Searcher},
};

/// How an [`Engine`] picks its moves.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Bounded minimax search, see [`Searcher::minimax()`].
    #[default]
    Minimax,
    /// Best material after one ply.
    Capture,
    /// A mating move if there is one, otherwise any legal move.
    Checkmate,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Minimax, Strategy::Capture, Strategy::Checkmate];

    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Minimax => "minimax",
            Strategy::Capture => "capture",
            Strategy::Checkmate => "checkmate",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when parsing an unknown strategy name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseStrategyError;

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown strategy")
    }
}

impl Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Strategy, ParseStrategyError> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or(ParseStrategyError)
    }
}

/// Plays one side of a game: keeps the current position and picks moves
/// with a [`Strategy`].
///
/// # Examples
///
/// ```
/// use kibitz::{Engine, Move, Strategy};
///
/// let mut engine = Engine::new(Strategy::Capture);
/// engine.move_done(&Move::new(1, 4, 3, 4)); // e2e4
///
/// let reply = engine.best_move();
/// assert!(!reply.is_empty());
/// assert_eq!(engine.last_move(), reply);
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    strategy: Strategy,
    searcher: Searcher,
    position: Position,
    last_move: Move,
}

impl Engine {
    /// Creates an engine at the starting position with default limits and
    /// weights.
    pub fn new(strategy: Strategy) -> Engine {
        Engine::with_config(strategy, SearchConfig::default(), Weights::default())
    }

    pub fn with_config(strategy: Strategy, config: SearchConfig, weights: Weights) -> Engine {
        Engine {
            strategy,
            searcher: Searcher::new(config, weights),
            position: Position::new(),
            last_move: Move::EMPTY,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Replaces the current position.
    pub fn set_position(&mut self, position: Position) {
        debug!(turn = %position.turn(), "position set");
        self.position = position;
        self.last_move = Move::EMPTY;
    }

    /// The move most recently played on the engine's position, or
    /// [`Move::EMPTY`].
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    /// Counters of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.searcher.stats()
    }

    /// Picks a move for the side to move and plays it.
    ///
    /// Returns [`Move::EMPTY`] and leaves the position unchanged if the game
    /// is over.
    pub fn best_move(&mut self) -> Move {
        let best = match self.strategy {
            Strategy::Minimax => self.searcher.minimax(&self.position).0,
            Strategy::Capture => self.searcher.capture_move(&self.position),
            Strategy::Checkmate => self.searcher.checkmate_move(&self.position),
        };

        debug!(strategy = %self.strategy, %best, nodes = self.stats().nodes, "best move");

        if !best.is_empty() {
            self.move_done(&best);
        }
        best
    }

    /// Plays a move on the engine's position without checking it.
    pub fn move_done(&mut self, m: &Move) {
        self.position.move_done(m);
        self.last_move = *m;
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(Strategy::default())
    }
}
