use color_eyre::eyre::{eyre, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://backend:8000";
pub const DEFAULT_LOG_FILE: &str = "reservoir_entry.log";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read from `RESERVOIR_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub export_dir: PathBuf,
    /// Branches offered before the directory has loaded.
    pub branches: Vec<String>,
    pub log_file: PathBuf,
    pub http_timeout: Duration,
    pub organization: String,
    pub executor: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            export_dir: PathBuf::from("."),
            branches: Vec::new(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            organization: String::new(),
            executor: String::new(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let http_timeout = match read("RESERVOIR_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| eyre!("RESERVOIR_HTTP_TIMEOUT_SECS must be whole seconds, got {raw:?}"))?;
                if secs == 0 {
                    return Err(eyre!("RESERVOIR_HTTP_TIMEOUT_SECS must be greater than zero"));
                }
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        let branches = read("RESERVOIR_BRANCHES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|branch| !branch.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_url: read("RESERVOIR_API_URL")
                .map_or(defaults.api_url, |url| url.trim_end_matches('/').to_string()),
            export_dir: read("RESERVOIR_EXPORT_DIR").map_or(defaults.export_dir, PathBuf::from),
            branches,
            log_file: read("RESERVOIR_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            http_timeout,
            organization: read("RESERVOIR_ORGANIZATION").unwrap_or_default(),
            executor: read("RESERVOIR_EXECUTOR").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, "http://backend:8000");
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_every_variable() {
        let settings = settings_from(&[
            ("RESERVOIR_API_URL", "http://localhost:8000/"),
            ("RESERVOIR_EXPORT_DIR", "/tmp/reports"),
            ("RESERVOIR_BRANCHES", "Almaty, Aktobe,,Shymkent "),
            ("RESERVOIR_LOG_FILE", "entry.log"),
            ("RESERVOIR_HTTP_TIMEOUT_SECS", "5"),
            ("RESERVOIR_ORGANIZATION", "Kazvodkhoz"),
            ("RESERVOIR_EXECUTOR", "A. Operator"),
        ])
        .unwrap();

        assert_eq!(settings.api_url, "http://localhost:8000");
        assert_eq!(settings.export_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(settings.branches, ["Almaty", "Aktobe", "Shymkent"]);
        assert_eq!(settings.log_file, PathBuf::from("entry.log"));
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert_eq!(settings.organization, "Kazvodkhoz");
        assert_eq!(settings.executor, "A. Operator");
    }

    #[test]
    fn rejects_bad_timeouts() {
        assert!(settings_from(&[("RESERVOIR_HTTP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(settings_from(&[("RESERVOIR_HTTP_TIMEOUT_SECS", "0")]).is_err());
    }
}
