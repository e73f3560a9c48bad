//! Player records and the setup form model.

use crate::error::SetupError;
use crate::types::Mark;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Name given to a computer opponent.
pub const COMPUTER_NAME: &str = "Computer";

/// Who controls a player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves come from UI input.
    #[default]
    Human,
    /// Moves are picked by the random selector after the thinking delay.
    Computer,
}

/// Which of the two setup slots a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Seat {
    /// First player (always human).
    #[strum(to_string = "Player 1")]
    One,
    /// Second player (human or computer).
    #[strum(to_string = "Player 2")]
    Two,
}

/// A configured player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Display name.
    name: String,
    /// Mark this player places.
    mark: Mark,
    /// Human or computer.
    kind: PlayerKind,
}

impl PlayerInfo {
    /// Creates a player record.
    pub fn new(name: impl Into<String>, mark: Mark, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            mark,
            kind,
        }
    }

    /// Creates a human player.
    pub fn human(name: impl Into<String>, mark: Mark) -> Self {
        Self::new(name, mark, PlayerKind::Human)
    }

    /// Creates the computer opponent.
    pub fn computer(mark: Mark) -> Self {
        Self::new(COMPUTER_NAME, mark, PlayerKind::Computer)
    }

    /// Whether moves for this player are automated.
    pub fn is_computer(&self) -> bool {
        self.kind == PlayerKind::Computer
    }
}

/// Contents of the setup form before validation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct PlayerSetup {
    /// Player 1 name.
    player1_name: String,
    /// Player 1 mark.
    player1_mark: Mark,
    /// Whether player 2 is a human or the computer.
    opponent: PlayerKind,
    /// Player 2 name, ignored for a computer opponent.
    player2_name: String,
    /// Player 2 mark.
    player2_mark: Mark,
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self {
            player1_name: String::new(),
            player1_mark: Mark::O,
            opponent: PlayerKind::Human,
            player2_name: String::new(),
            player2_mark: Mark::X,
        }
    }
}

impl PlayerSetup {
    /// Validates the form and builds both player records.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::DuplicateMark`] when both marks match and
    /// [`SetupError::MissingName`] when a required name is blank.
    #[instrument(skip(self), fields(opponent = %self.opponent))]
    pub fn validate(&self) -> Result<(PlayerInfo, PlayerInfo), SetupError> {
        if self.player1_mark == self.player2_mark {
            warn!(mark = %self.player1_mark, "Both players chose the same mark");
            return Err(SetupError::DuplicateMark {
                mark: self.player1_mark,
            });
        }

        let player1_name = self.player1_name.trim();
        if player1_name.is_empty() {
            warn!("Player 1 name missing");
            return Err(SetupError::MissingName { seat: Seat::One });
        }

        let player2 = match self.opponent {
            PlayerKind::Computer => PlayerInfo::computer(self.player2_mark),
            PlayerKind::Human => {
                let player2_name = self.player2_name.trim();
                if player2_name.is_empty() {
                    warn!("Player 2 name missing");
                    return Err(SetupError::MissingName { seat: Seat::Two });
                }
                PlayerInfo::human(player2_name, self.player2_mark)
            }
        };

        let player1 = PlayerInfo::human(player1_name, self.player1_mark);
        info!(player1 = %player1.name, player2 = %player2.name, "Setup validated");
        Ok((player1, player2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let setup = PlayerSetup::default();
        assert_eq!(*setup.player1_mark(), Mark::O);
        assert_eq!(*setup.player2_mark(), Mark::X);
        assert_eq!(*setup.opponent(), PlayerKind::Human);
    }

    #[test]
    fn test_duplicate_mark_rejected_first() {
        let setup = PlayerSetup::default()
            .with_player1_mark(Mark::X)
            .with_player2_mark(Mark::X);
        let err = setup.validate().unwrap_err();
        assert_eq!(err, SetupError::DuplicateMark { mark: Mark::X });
        assert_eq!(
            err.to_string(),
            "Players cannot choose same symbol. Please select different symbols."
        );
    }

    #[test]
    fn test_blank_names_rejected() {
        let setup = PlayerSetup::default().with_player1_name("   ");
        assert_eq!(
            setup.validate(),
            Err(SetupError::MissingName { seat: Seat::One })
        );

        let setup = PlayerSetup::default().with_player1_name("Ada");
        let err = setup.validate().unwrap_err();
        assert_eq!(err, SetupError::MissingName { seat: Seat::Two });
        assert_eq!(err.to_string(), "Player 2 name is required.");
    }

    #[test]
    fn test_computer_opponent_needs_no_name() {
        let setup = PlayerSetup::default()
            .with_player1_name(" Ada ")
            .with_opponent(PlayerKind::Computer)
            .with_player2_name("ignored");
        let (p1, p2) = setup.validate().expect("valid setup");
        assert_eq!(p1, PlayerInfo::human("Ada", Mark::O));
        assert_eq!(p2.name(), COMPUTER_NAME);
        assert_eq!(*p2.mark(), Mark::X);
        assert!(p2.is_computer());
    }
}
