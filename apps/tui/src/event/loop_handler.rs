use std::collections::BTreeMap;
use std::io::Stdout;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::api::{ApiClient, DirectoryEntry};
use crate::app::{handle_input, App};
use crate::config::Settings;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Fetch the reservoir directory once and print a summary (no UI).
pub async fn run_headless(settings: &Settings, json: bool) -> Result<()> {
    let client = ApiClient::new(settings)?;
    let entries = client.fetch_directory().await?;
    info!(count = entries.len(), "headless directory summary");

    let stats = build_headless_stats(client.base_url(), &entries);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }
    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nReservoir Directory");
    println!("===================");
    println!("Backend: {}", stats.backend);
    println!("Total reservoirs: {}", stats.total_reservoirs);
    println!("With coordinates: {}", stats.with_coordinates);

    println!("\nReservoirs by Branch:");
    for (branch, count) in &stats.by_branch {
        println!("- {branch}: {count}");
    }
}

fn build_headless_stats(backend: &str, entries: &[DirectoryEntry]) -> HeadlessStats {
    let with_coordinates = entries
        .iter()
        .filter(|entry| entry.lat.is_some() && entry.lon.is_some())
        .count();

    let mut by_branch: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        let branch = entry
            .fili
            .as_deref()
            .map(str::trim)
            .filter(|branch| !branch.is_empty())
            .unwrap_or("(none)");
        *by_branch.entry(branch.to_string()).or_insert(0) += 1;
    }

    HeadlessStats {
        backend: backend.to_string(),
        total_reservoirs: entries.len(),
        with_coordinates,
        by_branch: by_branch.into_iter().collect(),
    }
}

#[derive(Debug, serde::Serialize)]
struct HeadlessStats {
    backend: String,
    total_reservoirs: usize,
    with_coordinates: usize,
    by_branch: Vec<(String, usize)>,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    app.start();

    loop {
        app.drain_outcomes();
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        debug!("leaving event loop");
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // redrawn on the next tick anyway
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // let spawned requests make progress between frames
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntryId;

    fn entry(id: i64, fili: Option<&str>, located: bool) -> DirectoryEntry {
        DirectoryEntry {
            id: EntryId::Number(id),
            name: Some(format!("R{id}")),
            lat: located.then_some(43.0),
            lon: located.then_some(77.0),
            fili: fili.map(str::to_string),
        }
    }

    #[test]
    fn stats_count_branches_and_located_entries() {
        let entries = [
            entry(1, Some("Almaty"), true),
            entry(2, Some("Almaty"), false),
            entry(3, Some(" "), true),
            entry(4, None, false),
        ];
        let stats = build_headless_stats("http://backend:8000", &entries);

        assert_eq!(stats.total_reservoirs, 4);
        assert_eq!(stats.with_coordinates, 2);
        assert_eq!(
            stats.by_branch,
            [("(none)".to_string(), 2), ("Almaty".to_string(), 2)]
        );

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_reservoirs"], 4);
        assert_eq!(json["by_branch"][1][0], "Almaty");
    }
}
