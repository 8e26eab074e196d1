mod settings;

pub use settings::{Settings, DEFAULT_API_URL, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS};

use dotenv::dotenv;

/// Loads `.env` (if any) and reads the settings from the environment.
pub fn load() -> color_eyre::eyre::Result<Settings> {
    dotenv().ok();
    Settings::from_env()
}
