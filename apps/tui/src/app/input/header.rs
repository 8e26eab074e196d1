use crossterm::event::KeyCode;

use super::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, HeaderField};

pub fn handle_navigation(app: &mut App, key: KeyCode) {
    let fields = HeaderField::ALL;
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.header_field = fields[wrap_decrement(app.header_field.index(), fields.len())];
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.header_field = fields[wrap_increment(app.header_field.index(), fields.len())];
        }
        KeyCode::Left if app.header_field == HeaderField::Branch => {
            let previous = wrap_decrement(app.branch_index, app.branches.len());
            app.select_branch_index(previous);
        }
        KeyCode::Right if app.header_field == HeaderField::Branch => {
            let next = wrap_increment(app.branch_index, app.branches.len());
            app.select_branch_index(next);
        }
        KeyCode::Enter if app.header_field != HeaderField::Branch => app.editing = true,
        _ => {}
    }
}

pub fn handle_editing(app: &mut App, key: KeyCode) {
    let field = app.header_field;
    match key {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.editing = false,
        KeyCode::Backspace => {
            if let Some(value) = app.header_value_mut(field) {
                value.pop();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(value) = app.header_value_mut(field) {
                value.push(ch);
            }
        }
        _ => {}
    }
}
