mod header;
mod helpers;
mod table;

use crossterm::event::KeyCode;
use tracing::debug;

use crate::app::state::{App, Focus};

/// Routes one key press. A visible alert swallows everything but its
/// dismiss keys.
pub fn handle_input(app: &mut App, key: KeyCode) {
    if app.alert.is_some() {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
        return;
    }

    if toggle_help(app, key) {
        return;
    }

    if app.editing {
        match app.focus {
            Focus::Header => header::handle_editing(app, key),
            Focus::Table => table::handle_editing(app, key),
        }
        return;
    }

    match key {
        KeyCode::Char('q') => {
            debug!("quit requested");
            app.running = false;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Header => Focus::Table,
                Focus::Table => Focus::Header,
            };
        }
        KeyCode::Char('b') => {
            let next = helpers::wrap_increment(app.branch_index, app.branches.len());
            app.select_branch_index(next);
        }
        KeyCode::Char('B') => {
            let previous = helpers::wrap_decrement(app.branch_index, app.branches.len());
            app.select_branch_index(previous);
        }
        KeyCode::Char('s') => app.submit(),
        KeyCode::Char('x') => app.export(),
        _ => match app.focus {
            Focus::Header => header::handle_navigation(app, key),
            Focus::Table => table::handle_navigation(app, key),
        },
    }
}

/// F1 (or `?` outside editing) flips the overlay; while it is open only
/// Esc gets through.
fn toggle_help(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !app.editing) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
