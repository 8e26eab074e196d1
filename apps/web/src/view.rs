use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Map},
        Block, Borders, List, ListItem, ListState, Paragraph,
    },
    Frame,
};

use crate::dashboard::Dashboard;
use crate::marker::{AlertLevel, FillBand};

const SIDE_PANEL_WIDTH: u16 = 36;
const ORANGE: Color = Color::Rgb(255, 165, 0);

pub fn render(f: &mut Frame<'_>, dashboard: &Dashboard) {
    let area = f.area();
    let block = Block::default()
        .title("Reservoir Monitor")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(inner);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDE_PANEL_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_side_panel(dashboard, f, content[0]);
    render_map(dashboard, f, content[1]);
    render_footer(dashboard, f, rows[1]);
}

fn render_side_panel(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let summary = dashboard.reconciler().store().summary();
    let legend = [
        FillBand::Critical,
        FillBand::High,
        FillBand::Elevated,
        FillBand::Normal,
        FillBand::Low,
    ]
    .into_iter()
    .flat_map(|band| {
        [
            Span::styled("■", Style::default().fg(band.color())),
            Span::raw(" "),
        ]
    })
    .collect::<Vec<_>>();

    let lines = vec![
        TextLine::from(format!("Total: {}", summary.total)),
        TextLine::from(Span::styled(
            format!("Critical: {}", summary.critical),
            Style::default().fg(Color::Red),
        )),
        TextLine::from(Span::styled(
            format!("Warning: {}", summary.warning),
            Style::default().fg(ORANGE),
        )),
        TextLine::from(format!("Average fill: {}", summary.average_label())),
        TextLine::from(""),
        TextLine::from(legend),
    ];

    let block = Block::default()
        .title("Summary")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), layout[0]);

    let block = Block::default()
        .title("Reservoirs")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let entries = dashboard.reconciler().store().side_list();
    if entries.is_empty() {
        let paragraph = Paragraph::new("Waiting for telemetry...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, layout[1]);
        return;
    }

    let items = entries
        .into_iter()
        .map(|entry| {
            let style = match entry.level {
                Some(AlertLevel::Critical) => Style::default().fg(Color::Red),
                Some(AlertLevel::Warning) => Style::default().fg(ORANGE),
                None => Style::default().fg(Color::White),
            };
            let mut spans = vec![Span::styled(entry.text, style)];
            if let Some(level) = entry.level {
                spans.push(Span::styled(format!(" [{}]", level.as_str()), style));
            }
            ListItem::new(TextLine::from(spans))
        })
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(dashboard.selected()));
    f.render_stateful_widget(list, layout[1], &mut state);
}

fn render_map(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let base = dashboard.base_layer();
    let block = Block::default()
        .title(format!("Map · {}", base.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    // Terminal cells are roughly twice as tall as they are wide.
    let aspect = f64::from(inner.width.max(1)) / (f64::from(inner.height.max(1)) * 2.0);
    let bounds = dashboard.camera().pose().view_bounds(aspect);

    // One braille dot in map units, used to thicken the boundary stroke.
    let dot_x = (bounds.lon[1] - bounds.lon[0]) / (f64::from(inner.width.max(1)) * 2.0);
    let dot_y = bounds.lat_span() / (f64::from(inner.height.max(1)) * 4.0);
    let (bg_r, bg_g, bg_b) = base.background();

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .background_color(Color::Rgb(bg_r, bg_g, bg_b))
        .x_bounds(bounds.lon)
        .y_bounds(bounds.lat)
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: base.resolution(),
                color: base.land_color(),
            });
            ctx.layer();

            if let Some(boundary) = dashboard.boundary() {
                for ((x1, y1), (x2, y2), outline) in boundary.segments() {
                    let color = outline.color.blend_over(base.background());
                    let half = f64::from(outline.width.saturating_sub(1)) / 2.0;
                    for pass in 0..outline.width {
                        let offset = f64::from(pass) - half;
                        ctx.draw(&CanvasLine {
                            x1: offset.mul_add(dot_x, x1),
                            y1: offset.mul_add(dot_y, y1),
                            x2: offset.mul_add(dot_x, x2),
                            y2: offset.mul_add(dot_y, y2),
                            color,
                        });
                    }
                }
                ctx.layer();
            }

            for marker in dashboard.reconciler().markers().iter() {
                let color = marker.band.color();
                ctx.draw(&Circle {
                    x: marker.position.lon,
                    y: marker.position.lat,
                    radius: dot_y * 3.0,
                    color,
                });
                ctx.print(
                    marker.position.lon + dot_x * 6.0,
                    marker.position.lat,
                    TextLine::from(Span::styled(marker.label.clone(), Style::default().fg(color))),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_footer(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let stream = dashboard.stream();
    let line = TextLine::from(vec![
        Span::styled("Stream: ", Style::default().fg(Color::Gray)),
        Span::styled(stream.label(), Style::default().fg(stream.color())),
        Span::raw("  "),
        Span::styled("Base: ", Style::default().fg(Color::Gray)),
        Span::raw(dashboard.base_layer().label()),
        Span::raw("  "),
        Span::styled("↑/↓ select  Enter focus  b base layer", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
