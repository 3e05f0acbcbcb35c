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

//! A chess rules core with legal move generation and a small minimax
//! search.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use kibitz::{Position, State};
//!
//! let pos = Position::new();
//! let moves = pos.possible_moves();
//! assert_eq!(moves.len(), 20);
//! assert_eq!(pos.state(), State::Normal);
//! ```
//!
//! Play moves:
//!
//! ```
//! use kibitz::{Coords, Position};
//!
//! let pos = Position::new();
//!
//! // 1. e4
//! let e2: Coords = "e2".parse()?;
//! let e4: Coords = "e4".parse()?;
//! let m = pos.possible_moves_between(e2, e4)[0];
//! let pos = pos.play(&m)?;
//!
//! assert!(pos.square("e3".parse()?).is_en_passant());
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! use kibitz::{fen::Fen, State};
//!
//! let fool: Fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3".parse()?;
//! let pos = fool.into_position();
//! assert_eq!(pos.state(), State::Checkmate);
//! assert!(pos.state().is_terminal());
//! # Ok::<_, kibitz::fen::ParseFenError>(())
//! ```
//!
//! Let the engine reply:
//!
//! ```
//! use kibitz::{fen::Fen, uci::Uci, Engine, Strategy};
//!
//! let mut engine = Engine::new(Strategy::Minimax);
//! engine.set_position("6k1/5ppp/8/8/8/8/8/R5K1 w - -".parse::<Fen>()?.into_position());
//!
//! let m = engine.best_move();
//! assert_eq!(Uci::from_move(&m).to_string(), "a1a8");
//! # Ok::<_, kibitz::fen::ParseFenError>(())
//! ```
//!
//! Also supports [FEN](fen) and [UCI](uci) formats for positions and
//! moves, and [perft] for testing move generation.
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   the value types.
//!
//! # Logging
//!
//! Searches report their results through [`tracing`](https://docs.rs/tracing)
//! at `debug` level, and the score of every root move at `trace` level.

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod board;
mod color;
mod coords;
mod engine;
mod eval;
mod m;
mod perft;
mod position;
mod role;
mod square;
mod types;

pub mod attacks;
pub mod fen;
pub mod search;
pub mod uci;

pub use board::Board;
pub use color::{Color, ParseColorError};
pub use coords::{Coords, ParseCoordsError};
pub use engine::{Engine, ParseStrategyError, Strategy};
pub use eval::{Evaluator, Weights};
pub use m::{Move, MoveList};
pub use perft::{debug_perft, perft};
pub use position::{PlayError, Position, State};
pub use role::Role;
pub use square::{Flags, Square};
pub use types::Piece;
