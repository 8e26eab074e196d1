use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "reservoir_entry",
    version,
    about = "Daily reservoir report entry form"
)]
pub struct CliArgs {
    /// Print a directory summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the spreadsheet export directory
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,

    /// Branch offered before the directory loads (repeatable)
    #[arg(long = "branch", value_name = "NAME")]
    pub branches: Vec<String>,

    /// Request timeout for backend calls
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Override the log file location
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Flags win over `.env` and the process environment.
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("RESERVOIR_API_URL", url);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("RESERVOIR_EXPORT_DIR", dir);
        }
        if !self.branches.is_empty() {
            std::env::set_var("RESERVOIR_BRANCHES", self.branches.join(","));
        }
        if let Some(secs) = self.timeout_secs {
            std::env::set_var("RESERVOIR_HTTP_TIMEOUT_SECS", secs.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("RESERVOIR_LOG_FILE", path);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::parse_from([
            "reservoir_entry",
            "--headless",
            "--json",
            "--api-url",
            "http://localhost:8000",
            "--branch",
            "North",
            "--branch",
            "South",
            "--timeout-secs",
            "5",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(args.branches, ["North", "South"]);
        assert_eq!(args.timeout_secs, Some(5));
        assert!(args.export_dir.is_none());
    }

    #[test]
    fn help_lists_flags() {
        let help = CliArgs::help_text();
        assert!(help.contains("--export-dir"));
        assert!(help.contains("--headless"));
    }
}
