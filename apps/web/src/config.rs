pub const DEFAULT_API_BASE: &str = "http://backend:8000";
pub const DEFAULT_BOUNDARY_URL: &str = "kazakhstan.geojson";
const STREAM_PATH: &str = "/ws/reservoirs";

/// Endpoints the dashboard talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base: String,
    pub stream_url: String,
    pub boundary_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            stream_url: stream_url_for(DEFAULT_API_BASE),
            boundary_url: DEFAULT_BOUNDARY_URL.to_string(),
        }
    }
}

/// Values read from the page query string (`?api=…&ws=…&boundary=…`).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api: Option<String>,
    pub stream: Option<String>,
    pub boundary: Option<String>,
}

impl DashboardConfig {
    /// An `api` override also moves the stream unless `ws` is given too.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api) = non_blank(overrides.api) {
            let api = api.trim_end_matches('/').to_string();
            self.stream_url = stream_url_for(&api);
            self.api_base = api;
        }
        if let Some(stream) = non_blank(overrides.stream) {
            self.stream_url = stream;
        }
        if let Some(boundary) = non_blank(overrides.boundary) {
            self.boundary_url = boundary;
        }
        self
    }

    pub fn directory_url(&self) -> String {
        format!("{}/api/reservoirs/all", self.api_base)
    }

    pub fn latest_url(&self, id: &str) -> String {
        format!("{}/api/reservoirs/{id}/latest", self.api_base)
    }
}

fn stream_url_for(api_base: &str) -> String {
    let base = if let Some(rest) = api_base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        api_base.to_string()
    };
    format!("{base}{STREAM_PATH}")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
