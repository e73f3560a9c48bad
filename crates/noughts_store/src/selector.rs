//! Random computer opponent.

use crate::position::Position;
use crate::types::Board;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Picks a uniformly random empty position, or `None` on a full board.
///
/// No look-ahead: winning and blocking moves are as likely as any other.
#[instrument(skip(board, rng))]
pub fn pick_random<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    let empty = Position::valid_moves(board);
    let choice = empty.choose(rng).copied();
    debug!(candidates = empty.len(), ?choice, "Computer picked a square");
    choice
}
