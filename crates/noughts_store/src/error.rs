//! Setup validation errors.

use crate::players::Seat;
use crate::types::Mark;
use derive_more::{Display, Error};

/// Reasons a player setup is rejected.
///
/// The display text is what the setup form shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SetupError {
    /// Both players picked the same mark.
    #[display("Players cannot choose same symbol. Please select different symbols.")]
    DuplicateMark {
        /// The mark both players chose.
        mark: Mark,
    },
    /// A required name was left blank.
    #[display("{seat} name is required.")]
    MissingName {
        /// Which seat is missing its name.
        seat: Seat,
    },
}
