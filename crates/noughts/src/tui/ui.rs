//! Stateless rendering for the setup popup and the board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;
use super::form::Field;
use noughts_store::{Mark, Position, Square, rules};

/// Renders the whole screen and records square areas for hit testing.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(2), // Headline
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Event line
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let headline_style = match app.store().outcome() {
        Some(noughts_store::Outcome::Tie) => Style::default().fg(Color::Yellow),
        Some(noughts_store::Outcome::Won(_)) => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::White),
    };
    let headline = Paragraph::new(app.status_line())
        .style(headline_style.add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(headline, chunks[1]);

    let cells = draw_board(frame, chunks[2], app);
    app.set_cells(cells);

    let event_line = Paragraph::new(app.last_event().to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(event_line, chunks[3]);

    let help = Paragraph::new("arrows/1-9/click: play   r: reset   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);

    if app.store().popup_visible() {
        draw_setup(frame, area, app);
    }
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) -> [Rect; 9] {
    let board_area = center_rect(area, 41, 11);
    let highlight = rules::winning_line(app.store().board()).map(|(_, line)| line);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    let mut cells = [Rect::default(); 9];
    for row in 0..3 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(13),
                Constraint::Length(1),
                Constraint::Length(13),
                Constraint::Length(1),
                Constraint::Length(13),
            ])
            .split(rows[row * 2]);

        for col in 0..3 {
            let Some(pos) = Position::from_row_col(row, col) else {
                continue;
            };
            let cell_area = cols[col * 2];
            let winning = highlight.is_some_and(|line| line.contains(&pos));
            draw_cell(frame, cell_area, app, pos, winning);
            cells[pos.to_index()] = cell_area;
            if col < 2 {
                draw_separator_vertical(frame, cols[col * 2 + 1]);
            }
        }
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
    cells
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, pos: Position, winning: bool) {
    let (symbol, base_style) = match app.store().board().get(pos) {
        Square::Empty => (
            format!("{}", pos.to_index() + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(Mark::X) => (
            "X".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Mark::O) => (
            "O".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if winning {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if pos == app.cursor() && !app.store().popup_visible() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let text = vec![
        Line::from(Span::styled(" ".repeat(area.width as usize), style)),
        Line::from(Span::styled(symbol, style)),
        Line::from(Span::styled(" ".repeat(area.width as usize), style)),
    ];
    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = (0..area.height).map(|_| Line::from("│")).collect();
    let sep = Paragraph::new(lines).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_setup(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.form();
    let popup = center_rect(area, 60, 19);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            "Please enter your details to start the game.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for field in form.visible_fields() {
        let focused = field == form.focus();
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        let line = match field {
            Field::Submit => Line::from(Span::styled(format!("{marker}[ {} ]", field.label()), style)),
            Field::Player1Name | Field::Player2Name => Line::from(vec![
                Span::raw(format!("{marker}{:<17}", field.label())),
                Span::styled(format!("{}_", form.value(field)), style),
            ]),
            _ => Line::from(vec![
                Span::raw(format!("{marker}{:<17}", field.label())),
                Span::styled(format!("< {} >", form.value(field)), style),
            ]),
        };
        lines.push(line);
        lines.push(Line::from(""));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Player Setup")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(paragraph, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_store::{GameStore, PlayerSetup, StoreSettings};
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_setup_popup_rendered_before_start() {
        let store = GameStore::with_settings(StoreSettings::default().with_seed(1));
        let mut app = App::new(store, &PlayerSetup::default());
        let screen = rendered(&mut app);
        assert!(screen.contains("Player Setup"));
        assert!(screen.contains("Player 1 Name"));
    }

    #[test]
    fn test_board_cells_recorded() {
        let mut store = GameStore::with_settings(StoreSettings::default().with_seed(1));
        store.hide_popup();
        let mut app = App::new(store, &PlayerSetup::default());
        let screen = rendered(&mut app);
        assert!(!screen.contains("Player Setup"));
        assert!(screen.contains("Current Turn"));

        let cells = *app.cells();
        for (i, cell) in cells.iter().enumerate() {
            assert!(cell.width > 0 && cell.height > 0, "square {i} not drawn");
            for other in &cells[i + 1..] {
                assert!(cell.x != other.x || cell.y != other.y);
            }
        }
    }
}
