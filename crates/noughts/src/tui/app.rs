//! Application state and input dispatch.

use super::form::{FormAction, SetupForm};
use super::input::{digit_to_position, hit_test, move_cursor};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use noughts_store::{GameStore, Mark, Outcome, PlayerSetup, Position, StoreEvent};
use ratatui::layout::Rect;
use tracing::{debug, info, instrument};

/// Main application state: the store plus view-only state.
pub struct App {
    store: GameStore,
    form: SetupForm,
    cursor: Position,
    last_event: String,
    cells: [Rect; 9],
    should_quit: bool,
}

impl App {
    /// Creates the application around an owned store.
    pub fn new(store: GameStore, initial_setup: &PlayerSetup) -> Self {
        Self {
            store,
            form: SetupForm::new(initial_setup),
            cursor: Position::Center,
            last_event: "Please enter your details to start the game.".to_string(),
            cells: [Rect::default(); 9],
            should_quit: false,
        }
    }

    /// The game store.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Mutable access to the game store.
    pub fn store_mut(&mut self) -> &mut GameStore {
        &mut self.store
    }

    /// The setup form.
    pub fn form(&self) -> &SetupForm {
        &self.form
    }

    /// Square under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Description of the most recent store event.
    pub fn last_event(&self) -> &str {
        &self.last_event
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Where each square was last drawn.
    pub fn cells(&self) -> &[Rect; 9] {
        &self.cells
    }

    /// Remembers where each square was drawn, for mouse clicks.
    pub fn set_cells(&mut self, cells: [Rect; 9]) {
        self.cells = cells;
    }

    /// Headline for the board screen.
    pub fn status_line(&self) -> String {
        match self.store.outcome() {
            Some(Outcome::Tie) => "It's a tie!".to_string(),
            Some(Outcome::Won(_)) => {
                format!("Winner is: {}", self.store.winner_name().unwrap_or_default())
            }
            None if self.store.is_thinking() => {
                format!("{} is thinking...", self.store.current_player_name())
            }
            None => format!("Current Turn: {}", self.store.current_player_name()),
        }
    }

    /// Dispatches a terminal event.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row)
            }
            _ => {}
        }
    }

    /// Handles a key press on whichever screen is showing.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.store.popup_visible() {
            self.handle_form_key(key);
        } else {
            self.handle_board_key(key);
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match self.form.handle_key(key) {
            FormAction::None => {}
            FormAction::Quit => self.should_quit = true,
            FormAction::Submit => {
                let setup = self.form.to_setup();
                if let Err(error) = self.store.submit_setup(&setup) {
                    debug!(%error, "Setup rejected");
                    self.form.set_error(&error);
                }
            }
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.store.reset_game(),
            KeyCode::Enter | KeyCode::Char(' ') => self.play(self.cursor),
            KeyCode::Char(c) => {
                if let Some(position) = digit_to_position(c) {
                    self.cursor = position;
                    self.play(position);
                }
            }
            code => self.cursor = move_cursor(self.cursor, code),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        if self.store.popup_visible() {
            return;
        }
        if let Some(position) = hit_test(&self.cells, column, row) {
            self.cursor = position;
            self.play(position);
        }
    }

    fn play(&mut self, position: Position) {
        // Board input is inert once the game is over or while the computer thinks.
        if self.store.outcome().is_some() || self.store.is_thinking() {
            return;
        }
        let report = self.store.make_move(position.to_index());
        debug!(?report, "Square played");
    }

    /// Updates the event line from a published store event.
    pub fn on_store_event(&mut self, event: &StoreEvent) {
        let name_of = |mark: Mark| {
            self.store
                .player_for(mark)
                .map(|p| p.name().clone())
                .unwrap_or_else(|| mark.to_string())
        };
        self.last_event = match event {
            StoreEvent::MovePlayed { position, mark, .. } => {
                format!("{} ({}) played {}", name_of(*mark), mark, position)
            }
            StoreEvent::TurnChanged(mark) => format!("{} to move", name_of(*mark)),
            StoreEvent::GameOver(_) => "Game over. Press 'r' to play again or 'q' to quit.".to_string(),
            StoreEvent::ThinkingChanged(true) => "The computer is thinking...".to_string(),
            StoreEvent::ThinkingChanged(false) => return,
            StoreEvent::PlayersSet => "Players ready.".to_string(),
            StoreEvent::PopupHidden => "Game started.".to_string(),
            StoreEvent::Reset => "Board cleared.".to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use noughts_store::{PlayerKind, StoreSettings};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn started_app(opponent: PlayerKind) -> App {
        let setup = PlayerSetup::default()
            .with_player1_name("Ada")
            .with_player2_name("Bob")
            .with_opponent(opponent);
        let store = GameStore::with_settings(StoreSettings::default().with_seed(21));
        let mut app = App::new(store, &setup);
        // Tab to the submit button and press it.
        for _ in 0..app.form().visible_fields().len() - 1 {
            app.handle_event(key(KeyCode::Tab));
        }
        app.handle_event(key(KeyCode::Enter));
        assert!(!app.store().popup_visible());
        app
    }

    #[test]
    fn test_digit_keys_play_squares() {
        let mut app = started_app(PlayerKind::Human);
        assert_eq!(app.status_line(), "Current Turn: Ada");
        app.handle_event(key(KeyCode::Char('5')));
        assert_eq!(app.cursor(), Position::Center);
        assert_eq!(app.store().current_turn(), Mark::X);
        assert_eq!(app.status_line(), "Current Turn: Bob");
    }

    #[test]
    fn test_duplicate_marks_show_error() {
        let setup = PlayerSetup::default()
            .with_player1_name("Ada")
            .with_player2_name("Bob")
            .with_player2_mark(Mark::O);
        let mut app = App::new(GameStore::new(), &setup);
        for _ in 0..5 {
            app.handle_event(key(KeyCode::Tab));
        }
        app.handle_event(key(KeyCode::Enter));
        assert!(app.store().popup_visible());
        assert_eq!(
            app.form().error(),
            Some("Players cannot choose same symbol. Please select different symbols.")
        );
    }

    #[test]
    fn test_computer_turn_blocks_input_until_polled() {
        let mut app = started_app(PlayerKind::Computer);
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.status_line(), "Computer is thinking...");

        app.handle_event(key(KeyCode::Char('1')));
        assert_eq!(app.store().board().occupied_count(), 1);

        let due = app.store().next_deadline().expect("pending");
        app.store_mut().poll_scheduled(due);
        assert_eq!(app.store().board().occupied_count(), 2);
        assert_eq!(app.status_line(), "Current Turn: Ada");
    }

    #[test]
    fn test_reset_and_quit_keys() {
        let mut app = started_app(PlayerKind::Human);
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Char('r')));
        assert_eq!(app.store().board().occupied_count(), 0);
        assert!(!app.should_quit());
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_click_plays_square_under_pointer() {
        let mut app = started_app(PlayerKind::Human);
        let mut cells = [Rect::default(); 9];
        cells[2] = Rect::new(20, 2, 5, 3);
        app.set_cells(cells);
        app.handle_event(Event::Mouse(crossterm::event::MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 22,
            row: 3,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(app.cursor(), Position::TopRight);
        assert!(!app.store().board().is_empty(Position::TopRight));
    }

    #[test]
    fn test_store_events_update_event_line() {
        let mut app = started_app(PlayerKind::Human);
        app.on_store_event(&StoreEvent::MovePlayed {
            position: Position::Center,
            mark: Mark::O,
            by: PlayerKind::Human,
        });
        assert_eq!(app.last_event(), "Ada (O) played Center");
    }
}
