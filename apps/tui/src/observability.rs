use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

/// Log to a file: stdout belongs to the terminal UI. `RUST_LOG` wins over
/// the built-in default.
pub fn init_tracing(log_file: &Path, debug: bool) -> Result<()> {
    let default = if debug {
        "reservoir_entry=debug"
    } else {
        "reservoir_entry=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| eyre!("Failed to open log file {}: {e}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {e}"))
}
