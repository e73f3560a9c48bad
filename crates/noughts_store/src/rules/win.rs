//! Win detection logic for tic-tac-toe.

use crate::position::Position;
use crate::types::{Board, Mark, Square};
use tracing::instrument;

/// The 8 winning lines in scan order: rows, columns, diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns the first completed line in scan order, with its mark.
#[instrument(skip(board))]
pub fn winning_line(board: &Board) -> Option<(Mark, [Position; 3])> {
    LINES.into_iter().find_map(|line @ [a, b, c]| {
        let sq = board.get(a);
        match sq {
            Square::Occupied(mark) if sq == board.get(b) && sq == board.get(c) => {
                Some((mark, line))
            }
            _ => None,
        }
    })
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if that mark has three in a row,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_line(board).map(|(mark, _)| mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(mark: Mark, positions: &[Position]) -> Board {
        let mut board = Board::new();
        for pos in positions {
            board.place(*pos, mark);
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_wins_for_both_marks() {
        for mark in [Mark::X, Mark::O] {
            for line in LINES {
                let board = board_with(mark, &line);
                assert_eq!(winning_line(&board), Some((mark, line)), "{line:?}");
            }
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Mark::X, &[Position::TopLeft, Position::TopCenter]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut board = board_with(Mark::X, &[Position::TopLeft, Position::TopCenter]);
        board.place(Position::TopRight, Mark::O);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_in_scan_order_reported() {
        // Top row and left column both complete; the row comes first.
        let board = board_with(
            Mark::O,
            &[
                Position::TopLeft,
                Position::TopCenter,
                Position::TopRight,
                Position::MiddleLeft,
                Position::BottomLeft,
            ],
        );
        assert_eq!(winning_line(&board).map(|(_, line)| line), Some(LINES[0]));
    }
}
