use crossterm::event::KeyCode;

use super::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::domain::COLUMN_COUNT;

pub fn handle_navigation(app: &mut App, key: KeyCode) {
    let rows = app.visible_row_count();
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.cursor_row = wrap_decrement(app.cursor_row, rows),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_row = wrap_increment(app.cursor_row, rows),
        KeyCode::Left | KeyCode::Char('h') => {
            app.cursor_col = wrap_decrement(app.cursor_col, COLUMN_COUNT);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.cursor_col = wrap_increment(app.cursor_col, COLUMN_COUNT);
        }
        KeyCode::Home => app.cursor_col = 0,
        KeyCode::End => app.cursor_col = COLUMN_COUNT - 1,
        KeyCode::Enter if rows > 0 => app.begin_cell_edit(),
        KeyCode::Char('a') => app.add_row(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_current_row(),
        _ => {}
    }
}

/// Every accepted keystroke is written straight into the record.
pub fn handle_editing(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Esc => app.end_cell_edit(),
        KeyCode::Tab => app.accept_suggestion(),
        KeyCode::Backspace => app.edit_cell(|value| {
            value.pop();
        }),
        KeyCode::Char(ch) if app.accepts_char(ch) => app.edit_cell(|value| value.push(ch)),
        _ => {}
    }
}
