//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The store calls [`evaluate`] after
//! every placement; nothing here mutates state.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner, winning_line};

use crate::types::{Board, Outcome};
use tracing::instrument;

/// Evaluates a board: a completed line wins, otherwise a drawn board ties.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(mark) = check_winner(board) {
        return Some(Outcome::Won(mark));
    }
    if is_draw(board) {
        return Some(Outcome::Tie);
    }
    None
}
