//! Player setup form state.

use crossterm::event::{KeyCode, KeyEvent};
use noughts_store::{Mark, PlayerKind, PlayerSetup, SetupError};
use tracing::debug;

/// Focusable form fields, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Player 1 name input.
    Player1Name,
    /// Player 1 mark selector.
    Player1Mark,
    /// Opponent kind selector.
    Opponent,
    /// Player 2 name input (hidden for a computer opponent).
    Player2Name,
    /// Player 2 mark selector.
    Player2Mark,
    /// Start button.
    Submit,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Player1Name,
        Field::Player1Mark,
        Field::Opponent,
        Field::Player2Name,
        Field::Player2Mark,
        Field::Submit,
    ];

    /// Label shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            Field::Player1Name => "Player 1 Name",
            Field::Player1Mark => "Player 1 Symbol",
            Field::Opponent => "Opponent Type",
            Field::Player2Name => "Player 2 Name",
            Field::Player2Mark => "Player 2 Symbol",
            Field::Submit => "Start Game",
        }
    }
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Keep editing.
    None,
    /// Validate and submit the form.
    Submit,
    /// Leave the application.
    Quit,
}

/// Editable setup form shown while the store's popup is visible.
#[derive(Debug, Clone)]
pub struct SetupForm {
    player1_name: String,
    player1_mark: Mark,
    opponent: PlayerKind,
    player2_name: String,
    player2_mark: Mark,
    focus: Field,
    error: Option<String>,
}

impl SetupForm {
    /// Creates a form pre-filled from configured values.
    pub fn new(initial: &PlayerSetup) -> Self {
        Self {
            player1_name: initial.player1_name().clone(),
            player1_mark: *initial.player1_mark(),
            opponent: *initial.opponent(),
            player2_name: initial.player2_name().clone(),
            player2_mark: *initial.player2_mark(),
            focus: Field::Player1Name,
            error: None,
        }
    }

    /// Fields currently shown, in focus order.
    pub fn visible_fields(&self) -> Vec<Field> {
        Field::ORDER
            .into_iter()
            .filter(|field| *field != Field::Player2Name || self.opponent == PlayerKind::Human)
            .collect()
    }

    /// Focused field.
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Validation message from the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Text shown for a field's current value.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Player1Name => self.player1_name.clone(),
            Field::Player1Mark => self.player1_mark.to_string(),
            Field::Opponent => match self.opponent {
                PlayerKind::Human => "Player vs. Player".to_string(),
                PlayerKind::Computer => "Player vs. Computer".to_string(),
            },
            Field::Player2Name => self.player2_name.clone(),
            Field::Player2Mark => self.player2_mark.to_string(),
            Field::Submit => String::new(),
        }
    }

    /// Builds the store's setup model from the current inputs.
    pub fn to_setup(&self) -> PlayerSetup {
        PlayerSetup::default()
            .with_player1_name(self.player1_name.clone())
            .with_player1_mark(self.player1_mark)
            .with_opponent(self.opponent)
            .with_player2_name(self.player2_name.clone())
            .with_player2_mark(self.player2_mark)
    }

    /// Records a rejected submit.
    pub fn set_error(&mut self, error: &SetupError) {
        self.error = Some(error.to_string());
    }

    /// Applies a key press to the focused field.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Tab | KeyCode::Down => self.shift_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.shift_focus(-1),
            KeyCode::Enter if self.focus == Field::Submit => return FormAction::Submit,
            KeyCode::Enter => self.shift_focus(1),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.is_selector() => {
                self.toggle()
            }
            KeyCode::Char(c) if self.is_text() => {
                if let Some(name) = self.focused_text_mut() {
                    name.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(name) = self.focused_text_mut() {
                    name.pop();
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn is_selector(&self) -> bool {
        matches!(
            self.focus,
            Field::Player1Mark | Field::Opponent | Field::Player2Mark
        )
    }

    fn is_text(&self) -> bool {
        matches!(self.focus, Field::Player1Name | Field::Player2Name)
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Player1Name => Some(&mut self.player1_name),
            Field::Player2Name => Some(&mut self.player2_name),
            _ => None,
        }
    }

    fn toggle(&mut self) {
        match self.focus {
            Field::Player1Mark => {
                self.player1_mark = self.player1_mark.opponent();
                self.error = None;
            }
            Field::Player2Mark => {
                self.player2_mark = self.player2_mark.opponent();
                self.error = None;
            }
            Field::Opponent => {
                self.opponent = match self.opponent {
                    PlayerKind::Human => PlayerKind::Computer,
                    PlayerKind::Computer => PlayerKind::Human,
                };
            }
            _ => {}
        }
        debug!(field = ?self.focus, "Toggled form selector");
    }

    fn shift_focus(&mut self, step: isize) {
        let fields = self.visible_fields();
        let current = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let len = fields.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.focus = fields[next];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut SetupForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut SetupForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_submitting() {
        let mut form = SetupForm::new(&PlayerSetup::default());
        type_text(&mut form, "Adx");
        press(&mut form, KeyCode::Backspace);
        type_text(&mut form, "a");
        assert_eq!(form.value(Field::Player1Name), "Ada");

        // Name, mark, opponent, player 2 name.
        for _ in 0..3 {
            press(&mut form, KeyCode::Tab);
        }
        assert_eq!(form.focus(), Field::Player2Name);
        type_text(&mut form, "Bob");

        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focus(), Field::Submit);
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::Submit);

        let setup = form.to_setup();
        assert_eq!(setup.player1_name(), "Ada");
        assert_eq!(setup.player2_name(), "Bob");
    }

    #[test]
    fn test_computer_opponent_hides_name_field() {
        let mut form = SetupForm::new(&PlayerSetup::default());
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focus(), Field::Opponent);
        press(&mut form, KeyCode::Right);
        assert!(!form.visible_fields().contains(&Field::Player2Name));

        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focus(), Field::Player2Mark);
        assert_eq!(*form.to_setup().opponent(), PlayerKind::Computer);
    }

    #[test]
    fn test_focus_wraps_backwards() {
        let mut form = SetupForm::new(&PlayerSetup::default());
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focus(), Field::Submit);
    }

    #[test]
    fn test_toggling_mark_clears_error() {
        let mut form = SetupForm::new(&PlayerSetup::default());
        form.set_error(&SetupError::DuplicateMark { mark: Mark::X });
        assert!(form.error().is_some());
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Char(' '));
        assert_eq!(form.value(Field::Player1Mark), "X");
        assert_eq!(form.error(), None);
    }
}
