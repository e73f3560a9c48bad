//! Keyboard and mouse mapping onto board positions.

use crossterm::event::KeyCode;
use noughts_store::Position;
use ratatui::layout::Rect;

/// Moves the cursor one square in the arrow's direction, stopping at edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Left => Position::from_row_col(row, col.wrapping_sub(1)),
        KeyCode::Right => Position::from_row_col(row, col + 1),
        KeyCode::Up => Position::from_row_col(row.wrapping_sub(1), col),
        KeyCode::Down => Position::from_row_col(row + 1, col),
        _ => None,
    };
    target.unwrap_or(cursor)
}

/// Maps keys '1'-'9' to squares in reading order.
pub fn digit_to_position(c: char) -> Option<Position> {
    let digit = c.to_digit(10)? as usize;
    digit.checked_sub(1).and_then(Position::from_index)
}

/// Finds the square whose rendered area contains a terminal cell.
pub fn hit_test(cells: &[Rect; 9], column: u16, row: u16) -> Option<Position> {
    cells
        .iter()
        .position(|area| {
            column >= area.x
                && column < area.x.saturating_add(area.width)
                && row >= area.y
                && row < area.y.saturating_add(area.height)
        })
        .and_then(Position::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_and_stops_at_edges() {
        assert_eq!(move_cursor(Position::Center, KeyCode::Up), Position::TopCenter);
        assert_eq!(move_cursor(Position::Center, KeyCode::Left), Position::MiddleLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Up), Position::TopLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Left), Position::TopLeft);
        assert_eq!(
            move_cursor(Position::BottomRight, KeyCode::Right),
            Position::BottomRight
        );
        assert_eq!(move_cursor(Position::Center, KeyCode::Enter), Position::Center);
    }

    #[test]
    fn test_digits_map_to_squares() {
        assert_eq!(digit_to_position('1'), Some(Position::TopLeft));
        assert_eq!(digit_to_position('9'), Some(Position::BottomRight));
        assert_eq!(digit_to_position('0'), None);
        assert_eq!(digit_to_position('x'), None);
    }

    #[test]
    fn test_hit_test() {
        let mut cells = [Rect::default(); 9];
        cells[4] = Rect::new(10, 5, 4, 2);
        assert_eq!(hit_test(&cells, 11, 6), Some(Position::Center));
        assert_eq!(hit_test(&cells, 14, 6), None);
    }
}
