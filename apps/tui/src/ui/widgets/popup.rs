use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;

use crate::app::state::{Alert, AlertKind};

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

const fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Info => Color::Green,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Error => Color::Red,
    }
}

pub fn render_alert(f: &mut Frame<'_>, alert: &Alert) {
    let area = centered_rect(50, 30, f.area());
    let color = alert_color(alert.kind);

    let block = Block::default()
        .title(alert.title.as_str())
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Text::from(vec![
        TextLine::from(""),
        TextLine::from(alert.message.as_str()),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::Yellow),
        )),
    ]);

    f.render_widget(ClearWidget, area);
    f.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
