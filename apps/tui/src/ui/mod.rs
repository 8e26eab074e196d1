pub mod screens;
pub mod widgets;

use ratatui::Frame;

use crate::app::App;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::entry::render_entry(app, f);

    if app.show_help {
        screens::help::render_help(f);
    }
    if let Some(alert) = &app.alert {
        widgets::popup::render_alert(f, alert);
    }
}
