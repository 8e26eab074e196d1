use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

use crate::app::state::{App, Focus, HeaderField};
use crate::domain::{FieldKey, Years};
use crate::ui::widgets::tables::{column_window, scroll_offset};

const ROW_NUMBER_WIDTH: u16 = 4;
const EDIT_CURSOR: &str = "▏";

fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0, 0, 238))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn column_width(key: FieldKey) -> u16 {
    match key {
        FieldKey::Name => 20,
        _ => u16::try_from(key.header().chars().count()).map_or(12, |len| len.max(9)),
    }
}

pub fn render_entry(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_title(app, f, chunks[0]);
    render_header(app, f, chunks[1]);
    render_table(app, f, chunks[2]);
    render_suggestions(app, f, chunks[3]);
    render_status(app, f, chunks[4]);
    render_shortcuts(f, chunks[5]);
}

fn render_title(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = TextLine::from(vec![
        Span::styled(
            "Reservoir Data Entry",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            app.actions.client().base_url().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let label_style = Style::default().fg(Color::Yellow);
    let focused = app.focus == Focus::Header;

    let lines: Vec<TextLine<'_>> = HeaderField::ALL
        .into_iter()
        .map(|field| {
            let selected = focused && app.header_field == field;
            let mut value = match field {
                HeaderField::Organization => app.header.organization.clone(),
                HeaderField::Date => app.header.date.clone(),
                HeaderField::Executor => app.header.executor.clone(),
                HeaderField::Branch => format!("◀ {} ▶", app.current_branch()),
            };
            if selected && app.editing {
                value.push_str(EDIT_CURSOR);
            }
            let value_style = if selected {
                selected_style()
            } else {
                Style::default()
            };

            TextLine::from(vec![
                Span::styled(format!("{:<14}", format!("{}:", field.label())), label_style),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let border = if focused { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .title("Report")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let years = Years::now();
    let view = app.editor.view(years);
    let focused = app.focus == Focus::Table;
    let border = if focused { Color::Cyan } else { Color::Gray };

    let title = format!(
        "Reservoirs · {} ({} rows)",
        app.current_branch(),
        view.rows.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if view.rows.is_empty() {
        let paragraph = Paragraph::new("No filled rows yet. Press b to pick a branch.")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let widths: Vec<u16> = view.columns.iter().map(|key| column_width(*key)).collect();
    let available = area.width.saturating_sub(2 + ROW_NUMBER_WIDTH + 1);
    let window = column_window(&widths, available, app.cursor_col);

    let mut header_cells = vec![Cell::from("#")];
    header_cells.extend(view.columns[window.clone()].iter().map(|key| {
        let style = if key.year() == Some(years.current) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            key_style()
        };
        Cell::from(key.header()).style(style)
    }));
    let header = Row::new(header_cells);

    let mut constraints = vec![Constraint::Length(ROW_NUMBER_WIDTH)];
    constraints.extend(window.clone().map(|col| Constraint::Length(widths[col])));

    let max_visible_rows = usize::from(area.height.saturating_sub(3));
    let offset = scroll_offset(view.rows.len(), max_visible_rows, app.cursor_row);

    let rows = view
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let row_selected = focused && index == app.cursor_row;
            let marker = if row.deletable { "" } else { "·" };
            let mut cells = vec![Cell::from(format!("{}{marker}", row.number))];
            cells.extend(window.clone().map(|col| {
                let mut value = row.cells[col].clone();
                let cell_selected = row_selected && col == app.cursor_col;
                if cell_selected && app.editing {
                    value.push_str(EDIT_CURSOR);
                }
                let cell = Cell::from(value);
                if cell_selected {
                    cell.style(selected_style())
                } else {
                    cell
                }
            }));
            let row_style = if row_selected {
                Style::default().fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(cells).style(row_style)
        });

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_suggestions(app: &App, f: &mut Frame<'_>, area: Rect) {
    if !app.editing || app.suggestions.is_empty() {
        return;
    }

    let mut spans = vec![Span::styled("Suggestions: ", Style::default().fg(Color::DarkGray))];
    for (index, name) in app.suggestions.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if index == 0 {
            key_style()
        } else {
            Style::default()
        };
        spans.push(Span::styled(name.as_str(), style));
    }
    spans.push(Span::styled("  (Tab to accept)", Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().title("Status").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.pending > 0 {
        let throbber = Throbber::default()
            .label(app.status_message.as_str())
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(key_style());
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, inner, &mut state);
        return;
    }

    if app.status_message.is_empty() {
        return;
    }
    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    f.render_widget(
        Paragraph::new(Span::styled(app.status_message.as_str(), style)),
        inner,
    );
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts = [
        ("Tab", ": Header/Table   "),
        ("Enter", ": Edit   "),
        ("b", ": Branch   "),
        ("a/d", ": Add/Delete row   "),
        ("s", ": Submit   "),
        ("x", ": Excel   "),
        ("F1", ": Help   "),
        ("q", ": Quit"),
    ];
    let spans: Vec<Span<'_>> = shortcuts
        .into_iter()
        .flat_map(|(key, action)| [Span::styled(key, key_style()), Span::raw(action)])
        .collect();

    f.render_widget(
        Paragraph::new(TextLine::from(spans))
            .block(Block::default().borders(Borders::TOP))
            .alignment(Alignment::Center),
        area,
    );
}
