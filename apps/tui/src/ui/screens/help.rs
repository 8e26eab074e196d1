use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::widgets::popup::{centered_rect, ClearWidget};

const SHORTCUTS: [(&str, &str); 14] = [
    ("F1 / ?", "Toggle this help screen"),
    ("Tab", "Switch between report header and table"),
    ("↑/↓ ←/→", "Move between fields and cells"),
    ("Enter", "Start or finish editing"),
    ("Esc", "Finish editing / close dialogs"),
    ("Tab (editing name)", "Take the first suggestion"),
    ("b / B", "Next / previous branch"),
    ("a", "Add a row to the selected branch"),
    ("d", "Delete the selected row"),
    ("s", "Validate and submit the report"),
    ("x", "Export the report to Excel"),
    ("Home/End", "First / last column"),
    ("h/j/k/l", "Move like the arrow keys"),
    ("q", "Quit application"),
];

pub fn render_help(f: &mut Frame<'_>) {
    let area = centered_rect(70, 80, f.area());

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Reservoir Data Entry",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Pick a branch, fill in one row per reservoir and submit. Rows left completely blank are not sent.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(SHORTCUTS.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("  {key}"), key_style),
            Span::raw(format!(" - {action}")),
        ])
    }));
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Press Esc to close this help screen",
        Style::default().fg(Color::Yellow),
    )));

    f.render_widget(ClearWidget, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(help_block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
