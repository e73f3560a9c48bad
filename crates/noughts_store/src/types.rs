//! Core domain types for the game store.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Mark placed on the board by a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Cross.
    X,
    /// Nought (moves first in every game).
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Square {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 board, squares stored in row-major order (0-8).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from explicit squares.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at a position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Checks whether a position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of squares holding a mark.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Writes a mark into a square. Callers check emptiness first.
    pub(crate) fn place(&mut self, pos: Position, mark: Mark) {
        self.squares[pos.to_index()] = Square::Occupied(mark);
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Three in a row for the given mark.
    Won(Mark),
    /// Full board without a line.
    Tie,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Player setup has not been submitted yet.
    NotStarted,
    /// Moves are being accepted.
    InProgress,
    /// Game ended with a winner.
    Won(Mark),
    /// Game ended with a full board.
    Tied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_flips() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_display_numbers_empty_squares() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X);
        board.place(Position::TopLeft, Mark::O);
        assert_eq!(board.display(), "O|2|3\n-+-+-\n4|X|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_occupied_count() {
        let mut board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        board.place(Position::BottomRight, Mark::O);
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.get(Position::BottomRight).mark(), Some(Mark::O));
    }
}
