//! The game store: owned session state driving the UI.
//!
//! All mutation goes through `&mut GameStore`. Requests that are not
//! allowed in the current state (occupied square, finished game, computer
//! still thinking) are ignored and reported as [`MoveReport::Ignored`]
//! rather than failing.
//!
//! When a human move hands the turn to a computer player the store
//! schedules a [`ScheduledMove`] instead of starting a timer itself. The
//! owner of the store sleeps until [`GameStore::next_deadline`] and calls
//! [`GameStore::poll_scheduled`]. Reset and player setup cancel the
//! pending ticket, so a late timer can never play into a new game.

use crate::error::SetupError;
use crate::players::{PlayerInfo, PlayerKind, PlayerSetup};
use crate::position::Position;
use crate::rules;
use crate::selector;
use crate::types::{Board, Mark, Outcome, Phase};
use derive_getters::Getters;
use derive_setters::Setters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Default pause before a computer move is applied.
pub const DEFAULT_THINKING_DELAY: Duration = Duration::from_millis(500);

/// Mark that moves first in every game.
pub const FIRST_MARK: Mark = Mark::O;

/// Construction settings for a [`GameStore`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct StoreSettings {
    /// Pause before a scheduled computer move is due.
    thinking_delay: Duration,
    /// Fixed seed for the computer opponent; entropy when absent.
    #[setters(strip_option)]
    seed: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            thinking_delay: DEFAULT_THINKING_DELAY,
            seed: None,
        }
    }
}

/// Notification published after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A mark was placed.
    MovePlayed {
        /// Where it was placed.
        position: Position,
        /// Which mark.
        mark: Mark,
        /// Human input or computer selection.
        by: PlayerKind,
    },
    /// The turn passed to the given mark.
    TurnChanged(Mark),
    /// The game reached a terminal outcome.
    GameOver(Outcome),
    /// The computer started or stopped thinking.
    ThinkingChanged(bool),
    /// New player records were stored.
    PlayersSet,
    /// The setup popup was dismissed.
    PopupHidden,
    /// The board was cleared for a new game.
    Reset,
}

/// Why a move request had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The game already has an outcome.
    GameOver,
    /// A computer move is pending.
    ComputerThinking,
    /// Index outside 0-8.
    OutOfBounds(usize),
    /// The square already holds a mark.
    Occupied(Position),
    /// No empty square is left for the computer.
    NoEmptySquares,
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReport {
    /// The mark was placed.
    Placed {
        /// Where.
        position: Position,
        /// Which mark.
        mark: Mark,
        /// Outcome after the move, `None` if the game continues.
        outcome: Option<Outcome>,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl MoveReport {
    /// Whether the request changed the board.
    pub fn is_placed(&self) -> bool {
        matches!(self, MoveReport::Placed { .. })
    }
}

/// A pending computer move.
///
/// Tickets are tied to the game they were scheduled in. Running a ticket
/// that is no longer the pending one does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct ScheduledMove {
    /// Game generation the ticket belongs to.
    game: u64,
    /// When the move becomes due.
    due: Instant,
}

type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

/// Owned tic-tac-toe session state.
pub struct GameStore {
    board: Board,
    current_turn: Mark,
    outcome: Option<Outcome>,
    player1: PlayerInfo,
    player2: PlayerInfo,
    popup_visible: bool,
    pending: Option<ScheduledMove>,
    game: u64,
    thinking_delay: Duration,
    rng: StdRng,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for GameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore")
            .field("board", &self.board)
            .field("current_turn", &self.current_turn)
            .field("outcome", &self.outcome)
            .field("player1", &self.player1)
            .field("player2", &self.player2)
            .field("popup_visible", &self.popup_visible)
            .field("pending", &self.pending)
            .field("game", &self.game)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    /// Creates a store with default settings and an entropy-seeded opponent.
    pub fn new() -> Self {
        Self::with_settings(StoreSettings::default())
    }

    /// Creates a store from explicit settings.
    #[instrument]
    pub fn with_settings(settings: StoreSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!("Creating game store");
        Self {
            board: Board::new(),
            current_turn: FIRST_MARK,
            outcome: None,
            player1: PlayerInfo::human("", Mark::O),
            player2: PlayerInfo::human("", Mark::X),
            popup_visible: true,
            pending: None,
            game: 0,
            thinking_delay: settings.thinking_delay,
            rng,
            observers: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Reads
    // ─────────────────────────────────────────────────────────────

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark whose turn it is.
    pub fn current_turn(&self) -> Mark {
        self.current_turn
    }

    /// Outcome, once the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// First player record.
    pub fn player1(&self) -> &PlayerInfo {
        &self.player1
    }

    /// Second player record.
    pub fn player2(&self) -> &PlayerInfo {
        &self.player2
    }

    /// Whether the setup popup is still shown.
    pub fn popup_visible(&self) -> bool {
        self.popup_visible
    }

    /// Whether a computer move is pending.
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending computer move, if any.
    pub fn pending_move(&self) -> Option<ScheduledMove> {
        self.pending
    }

    /// When the pending computer move becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|ticket| ticket.due)
    }

    /// Configured thinking delay.
    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// Lifecycle phase derived from popup and outcome.
    pub fn phase(&self) -> Phase {
        if self.popup_visible {
            return Phase::NotStarted;
        }
        match self.outcome {
            None => Phase::InProgress,
            Some(Outcome::Won(mark)) => Phase::Won(mark),
            Some(Outcome::Tie) => Phase::Tied,
        }
    }

    /// Player placing the given mark. Player 1 wins a lookup tie.
    pub fn player_for(&self, mark: Mark) -> Option<&PlayerInfo> {
        if *self.player1.mark() == mark {
            Some(&self.player1)
        } else if *self.player2.mark() == mark {
            Some(&self.player2)
        } else {
            None
        }
    }

    /// Name of the player whose turn it is.
    pub fn current_player_name(&self) -> &str {
        if *self.player1.mark() == self.current_turn {
            self.player1.name()
        } else {
            self.player2.name()
        }
    }

    /// Name of the winner, if the game was won.
    pub fn winner_name(&self) -> Option<&str> {
        match self.outcome {
            Some(Outcome::Won(mark)) => self.player_for(mark).map(|p| p.name().as_str()),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Subscriptions
    // ─────────────────────────────────────────────────────────────

    /// Registers a callback for every [`StoreEvent`].
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
        debug!(observers = self.observers.len(), "Observer subscribed");
    }

    fn publish(&mut self, event: StoreEvent) {
        debug!(?event, "Publishing store event");
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Moves
    // ─────────────────────────────────────────────────────────────

    /// Plays the current turn's mark at `index` on behalf of a human.
    ///
    /// Ignored when the game is over, the computer is thinking, the index
    /// is out of range or the square is taken. When the turn passes to a
    /// computer player a move is scheduled after the thinking delay.
    #[instrument(skip(self), fields(turn = %self.current_turn))]
    pub fn make_move(&mut self, index: usize) -> MoveReport {
        if self.outcome.is_some() {
            return ignored(IgnoreReason::GameOver);
        }
        if self.pending.is_some() {
            return ignored(IgnoreReason::ComputerThinking);
        }
        let Some(position) = Position::from_index(index) else {
            return ignored(IgnoreReason::OutOfBounds(index));
        };

        let report = self.place(position, PlayerKind::Human);
        if let MoveReport::Placed { outcome: None, .. } = report
            && self.is_computer_turn()
        {
            self.schedule_computer_move(Instant::now());
        }
        report
    }

    /// Plays a uniformly random empty square for the current turn.
    ///
    /// Applies the same placement and outcome logic as a human move but
    /// never schedules a follow-up computer move. Ignored while a scheduled
    /// computer move is pending; that move plays when its ticket runs.
    #[instrument(skip(self), fields(turn = %self.current_turn))]
    pub fn computer_move(&mut self) -> MoveReport {
        if self.pending.is_some() {
            return ignored(IgnoreReason::ComputerThinking);
        }
        self.play_computer()
    }

    fn play_computer(&mut self) -> MoveReport {
        if self.outcome.is_some() {
            return ignored(IgnoreReason::GameOver);
        }
        match selector::pick_random(&self.board, &mut self.rng) {
            Some(position) => self.place(position, PlayerKind::Computer),
            None => ignored(IgnoreReason::NoEmptySquares),
        }
    }

    /// Fires the pending computer move if it is due at `now`.
    ///
    /// Returns the move report when a ticket ran.
    #[instrument(skip(self))]
    pub fn poll_scheduled(&mut self, now: Instant) -> Option<MoveReport> {
        let ticket = self.pending?;
        if ticket.due > now {
            return None;
        }
        self.run_scheduled(ticket)
    }

    /// Runs a ticket previously handed out by [`GameStore::pending_move`].
    ///
    /// Stale tickets (cancelled by reset or setup, or already run) are
    /// dropped without touching the board.
    #[instrument(skip(self))]
    pub fn run_scheduled(&mut self, ticket: ScheduledMove) -> Option<MoveReport> {
        if self.pending != Some(ticket) {
            debug!(current_game = self.game, "Dropping stale computer move");
            return None;
        }
        self.pending = None;
        let report = self.play_computer();
        self.publish(StoreEvent::ThinkingChanged(false));
        Some(report)
    }

    // ─────────────────────────────────────────────────────────────
    //  Session
    // ─────────────────────────────────────────────────────────────

    /// Clears the board for a new game; turn returns to O.
    ///
    /// Player records and popup visibility are kept. A pending computer
    /// move is cancelled.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.board = Board::new();
        self.current_turn = FIRST_MARK;
        self.outcome = None;
        self.start_new_generation();
        info!(game = self.game, "Game reset");
        self.publish(StoreEvent::Reset);
    }

    /// Stores both player records without validation.
    ///
    /// Use [`GameStore::submit_setup`] to validate form input first. The board
    /// is kept and a pending computer move is cancelled. When a game already
    /// under way now has a computer to move, a fresh move is scheduled; an
    /// empty board still waits for the first input.
    #[instrument(skip(self))]
    pub fn set_players(&mut self, player1: PlayerInfo, player2: PlayerInfo) {
        if player1.mark() == player2.mark() {
            warn!(mark = %player1.mark(), "Storing players with identical marks");
        }
        self.player1 = player1;
        self.player2 = player2;
        self.start_new_generation();
        info!(player1 = %self.player1.name(), player2 = %self.player2.name(), "Players set");
        self.publish(StoreEvent::PlayersSet);

        if self.outcome.is_none() && self.board.occupied_count() > 0 && self.is_computer_turn() {
            self.schedule_computer_move(Instant::now());
        }
    }

    /// Hides the setup popup.
    #[instrument(skip(self))]
    pub fn hide_popup(&mut self) {
        if !self.popup_visible {
            return;
        }
        self.popup_visible = false;
        self.publish(StoreEvent::PopupHidden);
    }

    /// Validates the setup form, then stores players and hides the popup.
    ///
    /// # Errors
    ///
    /// Returns the validation error unchanged; the store is not modified.
    #[instrument(skip(self, setup))]
    pub fn submit_setup(&mut self, setup: &PlayerSetup) -> Result<(), SetupError> {
        let (player1, player2) = setup.validate()?;
        self.set_players(player1, player2);
        self.hide_popup();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn place(&mut self, position: Position, by: PlayerKind) -> MoveReport {
        if !self.board.is_empty(position) {
            return ignored(IgnoreReason::Occupied(position));
        }

        let mark = self.current_turn;
        self.board.place(position, mark);
        info!(%position, %mark, %by, "Mark placed");
        debug!(board = %self.board.display(), "Board after placement");
        self.publish(StoreEvent::MovePlayed { position, mark, by });

        let outcome = rules::evaluate(&self.board);
        match outcome {
            Some(result) => {
                self.outcome = Some(result);
                info!(?result, "Game over");
                self.publish(StoreEvent::GameOver(result));
            }
            None => {
                self.current_turn = mark.opponent();
                self.publish(StoreEvent::TurnChanged(self.current_turn));
            }
        }

        MoveReport::Placed {
            position,
            mark,
            outcome,
        }
    }

    fn is_computer_turn(&self) -> bool {
        self.player_for(self.current_turn)
            .is_some_and(PlayerInfo::is_computer)
    }

    fn schedule_computer_move(&mut self, now: Instant) {
        let ticket = ScheduledMove {
            game: self.game,
            due: now + self.thinking_delay,
        };
        debug!(?ticket, "Scheduling computer move");
        self.pending = Some(ticket);
        self.publish(StoreEvent::ThinkingChanged(true));
    }

    fn start_new_generation(&mut self) {
        self.game += 1;
        if let Some(ticket) = self.pending.take() {
            debug!(?ticket, "Cancelled pending computer move");
            self.publish(StoreEvent::ThinkingChanged(false));
        }
    }
}

fn ignored(reason: IgnoreReason) -> MoveReport {
    debug!(?reason, "Move ignored");
    MoveReport::Ignored(reason)
}
