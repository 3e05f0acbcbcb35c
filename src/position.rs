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

use std::{error::Error, fmt};

use crate::{
    attacks,
    board::Board,
    color::Color,
    coords::Coords,
    m::{Move, MoveList},
    role::Role,
    square::{Flags, Square},
};

/// Outcome of classifying a position from the side to move's view.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    Normal,
    Check,
    Checkmate,
    Stalemate,
    /// Reserved for positions that could not have arisen in a game. Never
    /// returned by [`Position::state()`].
    Illegal,
}

impl State {
    /// Checks if the game is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Checkmate | State::Stalemate)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Normal => "normal",
            State::Check => "check",
            State::Checkmate => "checkmate",
            State::Stalemate => "stalemate",
            State::Illegal => "illegal",
        })
    }
}

/// Error when trying to play an illegal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayError {
    m: Move,
}

impl PlayError {
    /// The rejected move.
    pub fn m(&self) -> Move {
        self.m
    }
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal move {}", self.m)
    }
}

impl Error for PlayError {}

/// A board together with the side to move.
///
/// Positions are small `Copy` values. Successors are built by copying and
/// then applying a move, see [`Position::play_unchecked()`].
///
/// # Examples
///
/// ```
/// use kibitz::{Color, Move, Position, State};
///
/// let pos = Position::new();
/// assert_eq!(pos.turn(), Color::White);
/// assert_eq!(pos.possible_moves().len(), 20);
///
/// let pos = pos.play(&Move::new(1, 4, 3, 4))?; // e2e4
/// assert_eq!(pos.turn(), Color::Black);
/// assert_eq!(pos.state(), State::Normal);
/// # Ok::<_, kibitz::PlayError>(())
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    board: Board,
    turn: Color,
}

impl Position {
    /// An empty board with white to move.
    pub const fn empty() -> Position {
        Position {
            board: Board::empty(),
            turn: Color::White,
        }
    }

    /// The starting position.
    pub fn new() -> Position {
        Position {
            board: Board::new(),
            turn: Color::White,
        }
    }

    /// Assembles a position from its parts. Nothing is validated.
    pub const fn from_board(board: Board, turn: Color) -> Position {
        Position { board, turn }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    #[inline]
    pub fn toggle_turn(&mut self) {
        self.turn = !self.turn;
    }

    #[inline]
    pub fn square(&self, at: Coords) -> Square {
        self.board.get(at)
    }

    #[inline]
    pub fn square_mut(&mut self, at: Coords) -> &mut Square {
        self.board.get_mut(at)
    }

    #[inline]
    pub fn set_square(&mut self, at: Coords, square: Square) {
        self.board.set(at, square);
    }

    /// Finds the king of the given color.
    ///
    /// # Panics
    ///
    /// Panics if that color has more than one king.
    #[track_caller]
    pub fn king_of(&self, color: Color) -> Option<Coords> {
        self.board.king_of(color)
    }

    /// Tests if a piece of color `by` could capture on `at`.
    pub fn is_attacked(&self, at: Coords, by: Color) -> bool {
        attacks::is_attacked(&self.board, at, by)
    }

    /// Tests if the king of `color` is not attacked. A side without a king
    /// is always safe.
    pub fn is_king_safe(&self, color: Color) -> bool {
        self.king_of(color)
            .is_none_or(|king| !self.is_attacked(king, !color))
    }

    /// Tests if the side to move is in check.
    pub fn is_check(&self) -> bool {
        !self.is_king_safe(self.turn)
    }

    /// Generates all legal moves of the side to move.
    ///
    /// Cells are visited in index order (a1, b1, ..., h8). The moves of
    /// each piece follow the fixed delta orders in [`attacks`], and
    /// castling comes last for the king.
    pub fn possible_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for (from, piece) in self.board.pieces() {
            if piece.color == self.turn {
                self.gen_moves_from(from, &mut moves);
            }
        }
        moves
    }

    /// Generates the legal moves of the piece on `from` that land on `to`.
    ///
    /// There are none if `from` does not hold a piece of the side to move,
    /// four for a promotion, and one otherwise.
    pub fn possible_moves_between(&self, from: Coords, to: Coords) -> MoveList {
        let mut moves = MoveList::new();
        if self.board.get(from).is_occupied_by(self.turn) {
            self.gen_moves_from(from, &mut moves);
            moves.retain(|m| m.to() == to);
        }
        moves
    }

    /// Checks if the side to move has at least one legal move.
    pub fn has_possible_moves(&self) -> bool {
        // Castling is never the only legal move, so it can be skipped.
        let mut moves = MoveList::new();
        self.board
            .pieces()
            .filter(|&(_, piece)| piece.color == self.turn)
            .any(|(from, _)| {
                self.gen_piece_moves(from, &mut moves);
                !moves.is_empty()
            })
    }

    /// Classifies the position for the side to move.
    ///
    /// The position is assumed to be reachable. In particular an opponent
    /// king left in check is not detected.
    pub fn state(&self) -> State {
        match (self.is_check(), self.has_possible_moves()) {
            (true, true) => State::Check,
            (true, false) => State::Checkmate,
            (false, true) => State::Normal,
            (false, false) => State::Stalemate,
        }
    }

    /// Checks if `m` is one of the legal moves in this position.
    pub fn is_legal(&self, m: &Move) -> bool {
        self.possible_moves_between(m.from(), m.to()).contains(m)
    }

    /// Checks if `m` takes a piece, including en passant captures.
    pub fn is_capture(&self, m: &Move) -> bool {
        !self.board.get(m.to()).is_empty()
            || (self.board.get(m.from()).role() == Some(Role::Pawn) && m.src_col() != m.dst_col())
    }

    /// Plays a move after checking that it is legal.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if `m` is not a legal move.
    pub fn play(self, m: &Move) -> Result<Position, PlayError> {
        if self.is_legal(m) {
            Ok(self.play_unchecked(m))
        } else {
            Err(PlayError { m: *m })
        }
    }

    /// Returns the successor after `m`, without checking legality.
    #[must_use]
    pub fn play_unchecked(mut self, m: &Move) -> Position {
        self.move_done(m);
        self
    }

    /// Applies `m` in place, without checking legality.
    ///
    /// A move whose source and destination coincide only passes the turn.
    ///
    /// # Panics
    ///
    /// Panics if the source cell is empty, or if the flags on the board do
    /// not allow an en passant or castling move that is played.
    #[track_caller]
    pub fn move_done(&mut self, m: &Move) {
        let us = self.turn;

        if !m.is_null() {
            let (from, to) = (m.from(), m.to());
            let src = self.board.take(from);
            let Some(piece) = src.piece() else {
                panic!("no piece to move on {from}");
            };
            let dst = self.board.get(to);

            if let Some(role) = m.promoted_to() {
                self.board.set(to, Square::new(role.of(piece.color)));
            } else {
                let mut moved = src;
                moved.remove_flags(Flags::CAN_CASTLE);
                self.board.set(to, moved);

                match piece.role {
                    Role::Pawn => self.pawn_done(from, to, dst),
                    Role::King => self.king_done(m, from, to),
                    _ => {}
                }
            }

            self.board
                .clear_row_flags((!us).en_passant_target_row(), Flags::EN_PASSANT);
        }

        self.turn = !us;
    }

    #[track_caller]
    fn pawn_done(&mut self, from: Coords, to: Coords, dst: Square) {
        if dst.is_en_passant() {
            let captured = self.board.take(from.with_col(to.col()));
            assert_eq!(
                captured.role(),
                Some(Role::Pawn),
                "en passant without a pawn to capture"
            );
        } else if from.col() == to.col()
            && from.row() == self.turn.pawn_row()
            && from.row().abs_diff(to.row()) == 2
        {
            let skipped = Coords::new((from.row() + to.row()) / 2, from.col());
            self.board.set(skipped, Square::EN_PASSANT);
        }
    }

    #[track_caller]
    fn king_done(&mut self, m: &Move, from: Coords, to: Coords) {
        let us = self.turn;

        if m.is_castle() {
            let mut rook = self.board.take(to.with_col(m.rook_src_col()));
            assert!(
                rook.is(us.rook()) && rook.can_castle(),
                "castling without a castling rook"
            );
            rook.remove_flags(Flags::CAN_CASTLE);
            self.board.set(to.with_col(m.rook_dst_col()), rook);
        }

        let home = Coords::new(us.home_row(), 4);
        if from == home {
            for col in [0, 7] {
                let cell = self.board.get_mut(home.with_col(col));
                if cell.is(us.rook()) {
                    cell.remove_flags(Flags::CAN_CASTLE);
                }
            }
        }
    }

    fn gen_moves_from(&self, from: Coords, moves: &mut MoveList) {
        self.gen_piece_moves(from, moves);
        if self.board.get(from).role() == Some(Role::King) {
            self.gen_castling_moves(from, moves);
        }
    }

    fn gen_piece_moves(&self, from: Coords, moves: &mut MoveList) {
        match self.board.get(from).role() {
            Some(Role::Pawn) => self.gen_pawn_moves(from, moves),
            Some(Role::Knight) => KnightTag::gen_moves(self, from, moves),
            Some(Role::Bishop) => BishopTag::gen_moves(self, from, moves),
            Some(Role::Rook) => RookTag::gen_moves(self, from, moves),
            Some(Role::Queen) => QueenTag::gen_moves(self, from, moves),
            Some(Role::King) => KingTag::gen_moves(self, from, moves),
            None => {}
        }
    }

    #[track_caller]
    fn gen_pawn_moves(&self, from: Coords, moves: &mut MoveList) {
        let us = self.turn;
        assert!(
            from.row() != 0 && from.row() != 7,
            "pawn on back rank at {from}"
        );

        let forward = us.forward();
        let Some(ahead) = from.offset(forward, 0) else {
            return;
        };
        let last_rank = ahead.row() == (!us).home_row();

        if self.board.get(ahead).is_empty() {
            self.push_pawn_move(Move::between(from, ahead), last_rank, moves);

            if from.row() == us.pawn_row() {
                if let Some(two) = ahead
                    .offset(forward, 0)
                    .filter(|&to| self.board.get(to).is_empty())
                {
                    self.push_move(Move::between(from, two), moves);
                }
            }
        }

        for dc in [-1, 1] {
            let Some(to) = from.offset(forward, dc) else {
                continue;
            };
            let target = self.board.get(to);
            let capturable = match target.piece() {
                Some(piece) => piece.color != us && piece.role != Role::King,
                None => from.row() == us.en_passant_row() && target.is_en_passant(),
            };
            if capturable {
                self.push_pawn_move(Move::between(from, to), last_rank, moves);
            }
        }
    }

    fn gen_castling_moves(&self, king: Coords, moves: &mut MoveList) {
        let us = self.turn;
        let row = us.home_row();
        if king != Coords::new(row, 4) || !self.board.get(king).can_castle() {
            return;
        }

        if self.is_castling_rook(Coords::new(row, 7))
            && self.are_empty(row, &[5, 6])
            && [4, 5, 6].into_iter().all(|col| self.king_safe_at(king, col))
        {
            moves.push(Move::castle(row, 6, 7, 5));
        }

        if self.is_castling_rook(Coords::new(row, 0))
            && self.are_empty(row, &[1, 2, 3])
            && [4, 3, 2].into_iter().all(|col| self.king_safe_at(king, col))
        {
            moves.push(Move::castle(row, 2, 0, 3));
        }
    }

    fn is_castling_rook(&self, at: Coords) -> bool {
        let cell = self.board.get(at);
        cell.is(self.turn.rook()) && cell.can_castle()
    }

    fn are_empty(&self, row: u8, cols: &[u8]) -> bool {
        cols.iter()
            .all(|&col| self.board.get(Coords::new(row, col)).is_empty())
    }

    /// Tests if the king would be safe after relocating it to `col` of its
    /// row, everything else unchanged.
    fn king_safe_at(&self, king: Coords, col: u8) -> bool {
        let mut board = self.board;
        let cell = board.take(king);
        let to = king.with_col(col);
        board.set(to, cell);
        !attacks::is_attacked(&board, to, !self.turn)
    }

    /// Tests if a non-pawn piece of the side to move may end on `to`.
    /// Kings are never captured.
    fn can_land(&self, to: Coords) -> bool {
        match self.board.piece_at(to) {
            None => true,
            Some(piece) => piece.color != self.turn && piece.role != Role::King,
        }
    }

    fn leaves_king_safe(&self, m: &Move) -> bool {
        self.play_unchecked(m).is_king_safe(self.turn)
    }

    fn push_move(&self, m: Move, moves: &mut MoveList) {
        if self.leaves_king_safe(&m) {
            moves.push(m);
        }
    }

    fn push_pawn_move(&self, m: Move, last_rank: bool, moves: &mut MoveList) {
        if self.leaves_king_safe(&m) {
            if last_rank {
                moves.extend(Role::PROMOTIONS.map(|role| m.with_promotion(role)));
            } else {
                moves.push(m);
            }
        }
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

trait Stepper {
    const ROLE: Role;
    const DELTAS: [(i8, i8); 8];

    fn gen_moves(pos: &Position, from: Coords, moves: &mut MoveList) {
        debug_assert_eq!(pos.board.get(from).role(), Some(Self::ROLE));
        for (dr, dc) in Self::DELTAS {
            if let Some(to) = from.offset(dr, dc).filter(|&to| pos.can_land(to)) {
                pos.push_move(Move::between(from, to), moves);
            }
        }
    }
}

trait Slider {
    const ROLE: Role;
    const DIRECTIONS: &'static [(i8, i8)];

    fn gen_moves(pos: &Position, from: Coords, moves: &mut MoveList) {
        debug_assert_eq!(pos.board.get(from).role(), Some(Self::ROLE));
        for &dir in Self::DIRECTIONS {
            for to in attacks::ray(from, dir) {
                if pos.can_land(to) {
                    pos.push_move(Move::between(from, to), moves);
                }
                if !pos.board.get(to).is_empty() {
                    break;
                }
            }
        }
    }
}

struct KingTag;
struct KnightTag;
struct BishopTag;
struct RookTag;
struct QueenTag;

impl Stepper for KingTag {
    const ROLE: Role = Role::King;
    const DELTAS: [(i8, i8); 8] = attacks::KING_DELTAS;
}

impl Stepper for KnightTag {
    const ROLE: Role = Role::Knight;
    const DELTAS: [(i8, i8); 8] = attacks::KNIGHT_DELTAS;
}

impl Slider for BishopTag {
    const ROLE: Role = Role::Bishop;
    const DIRECTIONS: &'static [(i8, i8)] = &attacks::BISHOP_DIRECTIONS;
}

impl Slider for RookTag {
    const ROLE: Role = Role::Rook;
    const DIRECTIONS: &'static [(i8, i8)] = &attacks::ROOK_DIRECTIONS;
}

impl Slider for QueenTag {
    const ROLE: Role = Role::Queen;
    const DIRECTIONS: &'static [(i8, i8)] = &attacks::QUEEN_DIRECTIONS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    /// Builds a position from tokens like `Ke1+` (castling flag) or `xe3`
    /// (en passant cell). Uppercase pieces are white.
    fn setup(tokens: &str, turn: Color) -> Position {
        let mut pos = Position::empty();
        pos.set_turn(turn);
        for token in tokens.split_whitespace() {
            let (head, tail) = token.split_at(1);
            let at: Coords = tail.trim_end_matches('+').parse().unwrap();
            let square = if head == "x" {
                Square::EN_PASSANT
            } else {
                Square::new(Piece::from_char(head.chars().next().unwrap()).unwrap())
            };
            let square = if tail.ends_with('+') {
                square.with_flags(Flags::CAN_CASTLE)
            } else {
                square
            };
            pos.set_square(at, square);
        }
        pos
    }

    fn uci(m: &Move) -> String {
        let mut s = format!("{}{}", m.from(), m.to());
        if let Some(role) = m.promoted_to() {
            s.push(role.char());
        }
        s
    }

    fn by_uci(pos: &Position, text: &str) -> Move {
        *pos.possible_moves()
            .iter()
            .find(|m| uci(m) == text)
            .unwrap_or_else(|| panic!("{text} not found"))
    }

    fn c(name: &str) -> Coords {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_position() {
        let pos = Position::new();
        assert_eq!(pos.possible_moves().len(), 20);
        assert_eq!(pos.state(), State::Normal);
        assert!(!pos.is_check());
        assert_eq!(Position::default(), pos);
    }

    #[test]
    fn test_double_advance() {
        let pos = Position::new().play_unchecked(&Move::new(1, 4, 3, 4));

        let mut expected = Position::new();
        expected.set_square(c("e2"), Square::EMPTY);
        expected.set_square(c("e4"), Square::new(Color::White.pawn()));
        expected.set_square(c("e3"), Square::EN_PASSANT);
        expected.set_turn(Color::Black);

        assert_eq!(pos, expected);
    }

    #[test]
    fn test_en_passant() {
        let mut pos = setup("Pe5 pd7", Color::Black);
        pos.move_done(&Move::new(6, 3, 4, 3)); // d7d5
        assert!(pos.square(c("d6")).is_en_passant());

        let moves: Vec<String> = pos.possible_moves().iter().map(uci).collect();
        assert_eq!(moves, ["e5e6", "e5d6"]);

        let m = by_uci(&pos, "e5d6");
        assert!(pos.is_capture(&m));
        let after = pos.play_unchecked(&m);
        assert!(after.square(c("d5")).is_empty());
        assert_eq!(after.board().piece_at(c("d6")), Some(Color::White.pawn()));
        assert!(!after.square(c("d6")).is_en_passant());
    }

    #[test]
    fn test_en_passant_expires() {
        let mut pos = setup("Pe5 Kh1 pd7 kh8", Color::Black);
        pos.move_done(&Move::new(6, 3, 4, 3)); // d7d5
        assert!(pos.possible_moves().iter().any(|m| uci(m) == "e5d6"));

        pos.move_done(&by_uci(&pos, "h1g1"));
        pos.move_done(&by_uci(&pos, "h8g8"));
        let moves: Vec<String> = pos.possible_moves().iter().map(uci).collect();
        assert_eq!(moves, ["g1f1", "g1h1", "g1f2", "g1g2", "g1h2", "e5e6"]);
    }

    #[test]
    fn test_promotion_fan_out() {
        let pos = setup("Pa7 nb8", Color::White);
        let moves: Vec<String> = pos.possible_moves().iter().map(uci).collect();
        assert_eq!(
            moves,
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
        assert_eq!(pos.possible_moves_between(c("a7"), c("a8")).len(), 4);

        let after = pos.play_unchecked(&by_uci(&pos, "a7b8n"));
        assert_eq!(after.board().piece_at(c("b8")), Some(Color::White.knight()));
        assert!(after.square(c("a7")).is_empty());
    }

    #[test]
    fn test_castling() {
        let pos = setup("Ra1+ Ke1+ Rh1+ ke8", Color::White);
        let castles: Vec<Move> = pos
            .possible_moves()
            .into_iter()
            .filter(|m| m.is_castle())
            .collect();
        assert_eq!(castles, [Move::castle(0, 6, 7, 5), Move::castle(0, 2, 0, 3)]);

        let after = pos.play_unchecked(&Move::castle(0, 6, 7, 5));
        assert_eq!(after.square(c("g1")), Square::new(Color::White.king()));
        assert_eq!(after.square(c("f1")), Square::new(Color::White.rook()));
        assert!(after.square(c("e1")).is_empty());
        assert!(after.square(c("h1")).is_empty());
        assert!(!after.square(c("a1")).can_castle());

        let after = pos.play_unchecked(&Move::castle(0, 2, 0, 3));
        assert_eq!(after.square(c("c1")), Square::new(Color::White.king()));
        assert_eq!(after.square(c("d1")), Square::new(Color::White.rook()));
        assert!(!after.square(c("h1")).can_castle());
    }

    #[test]
    fn test_king_move_clears_rook_flags() {
        let pos = setup("Ra1+ Ke1+ Rh1+ ke8", Color::White);
        let after = pos.play_unchecked(&Move::new(0, 4, 1, 4));
        assert!(!after.square(c("a1")).can_castle());
        assert!(!after.square(c("h1")).can_castle());
        assert!(!after.square(c("e2")).can_castle());

        let back = after
            .play_unchecked(&Move::new(7, 4, 6, 4))
            .play_unchecked(&Move::new(1, 4, 0, 4));
        assert!(back.possible_moves().iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_no_castling_without_king_flag() {
        let pos = setup("Ra1+ Ke1 Rh1+ ke8", Color::White);
        assert!(pos.possible_moves().iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_null_move() {
        let pos = setup("Pe2 Ke1 ke8 xd6", Color::White);
        let after = pos.play_unchecked(&Move::new(1, 4, 1, 4));
        assert_eq!(after.turn(), Color::Black);
        assert_eq!(after.board(), pos.board());
    }

    #[test]
    fn test_no_king_capture() {
        let pos = setup("Qd1 kd8", Color::White);
        assert!(pos
            .possible_moves()
            .iter()
            .all(|m| m.to() != c("d8")));
    }

    #[test]
    fn test_pinned_piece() {
        let pos = setup("Ke1 Be2 re8 kh8", Color::White);
        assert!(pos.possible_moves_between(c("e2"), c("d3")).is_empty());
        assert_eq!(pos.possible_moves_between(c("e1"), c("d1")).len(), 1);
        assert!(pos.possible_moves_between(c("e8"), c("e2")).is_empty());
    }

    #[test]
    fn test_state_is_idempotent() {
        let pos = setup("Kc7 Bd1 Qf2 Qg1 ka8 pb7", Color::White);
        let before = pos;
        assert_eq!(pos.state(), pos.state());
        assert_eq!(pos, before);
    }

    #[test]
    fn test_missing_king_is_safe() {
        let pos = setup("Ra1", Color::White);
        assert!(pos.is_king_safe(Color::White));
        assert!(pos.is_king_safe(Color::Black));
        assert_eq!(pos.state(), State::Normal);
    }

    #[test]
    fn test_play_rejects_illegal() {
        let pos = Position::new();
        let err = pos.play(&Move::new(1, 4, 4, 4)).unwrap_err();
        assert_eq!(err.m(), Move::new(1, 4, 4, 4));
        assert!(pos.play(&Move::new(0, 6, 2, 5)).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_pawn_on_back_rank() {
        setup("Pa8 Ke1", Color::White).possible_moves();
    }

    #[test]
    #[should_panic]
    fn test_move_from_empty_cell() {
        Position::new().move_done(&Move::new(3, 3, 4, 4));
    }
}
