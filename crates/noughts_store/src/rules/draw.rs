//! Tie detection logic for tic-tac-toe.

use super::win::check_winner;
use crate::types::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winner is a tie.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::Mark;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X);
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let marks = [
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::O,
        ];
        let mut board = Board::new();
        for (pos, mark) in Position::ALL.into_iter().zip(marks) {
            board.place(pos, mark);
        }
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let mut board = Board::new();
        for pos in Position::ALL {
            board.place(pos, Mark::X);
        }
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
