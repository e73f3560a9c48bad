//! Noughts store - tic-tac-toe game state
//!
//! An owned session object holding the board, turn, outcome, player
//! records and UI flags, plus the pure rules it relies on.
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`] validates intents and publishes [`StoreEvent`]s
//! - **Rules**: line scan and tie detection over a 9-square [`Board`]
//! - **Selector**: uniformly random computer opponent
//! - **Players**: player records and setup form validation
//!
//! # Example
//!
//! ```
//! use noughts_store::{GameStore, Mark, Outcome, PlayerSetup, StoreSettings};
//!
//! let mut store = GameStore::with_settings(StoreSettings::default().with_seed(3));
//! store
//!     .submit_setup(
//!         &PlayerSetup::default()
//!             .with_player1_name("Ada")
//!             .with_player2_name("Bob"),
//!     )
//!     .expect("marks differ");
//!
//! for index in [0, 3, 1, 4, 2] {
//!     store.make_move(index);
//! }
//! assert_eq!(store.outcome(), Some(Outcome::Won(Mark::O)));
//! assert_eq!(store.winner_name(), Some("Ada"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod players;
mod position;
pub mod rules;
mod selector;
mod store;
mod types;

pub use error::SetupError;
pub use players::{COMPUTER_NAME, PlayerInfo, PlayerKind, PlayerSetup, Seat};
pub use position::Position;
pub use selector::pick_random;
pub use store::{
    DEFAULT_THINKING_DELAY, FIRST_MARK, GameStore, IgnoreReason, MoveReport, ScheduledMove,
    StoreEvent, StoreSettings,
};
pub use types::{Board, Mark, Outcome, Phase, Square};
