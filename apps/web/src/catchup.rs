use futures::future::join_all;
use log::{error, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::telemetry::{lenient_number, lenient_text, ReservoirId, TelemetryRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// One row of `GET /api/reservoirs/all`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectoryEntry {
    pub id: ReservoirId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fili: Option<String>,
}

/// Body of `GET /api/reservoirs/{id}/latest`; only the fill level is used.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LatestStatus {
    #[serde(default, deserialize_with = "lenient_number")]
    pub filling: Option<f64>,
}

impl DirectoryEntry {
    /// A missing fill level is reported as 0%.
    pub fn into_record(self, status: &LatestStatus) -> TelemetryRecord {
        TelemetryRecord {
            id: self.id,
            name: self.name,
            lat: self.lat,
            lon: self.lon,
            fill_percent: Some(status.filling.unwrap_or(0.0)),
        }
    }
}

/// Read side of the backend used for the startup catch-up.
#[allow(async_fn_in_trait)]
pub trait ReservoirDirectory {
    async fn reservoirs(&self) -> Result<Vec<DirectoryEntry>, FetchError>;
    async fn latest(&self, id: &ReservoirId) -> Result<LatestStatus, FetchError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatchUpReport {
    pub delivered: usize,
    pub skipped: Vec<ReservoirId>,
    pub directory_failed: bool,
}

/// Loads the current state of every known reservoir and feeds it through
/// `deliver` in directory order. A failing reservoir is skipped; the rest
/// still arrive.
pub async fn catch_up<D, F>(directory: &D, mut deliver: F) -> CatchUpReport
where
    D: ReservoirDirectory,
    F: FnMut(TelemetryRecord),
{
    let mut report = CatchUpReport::default();

    let entries = match directory.reservoirs().await {
        Ok(entries) => entries,
        Err(err) => {
            error!("reservoir directory unavailable: {err}");
            report.directory_failed = true;
            return report;
        }
    };

    let statuses = join_all(entries.iter().map(|entry| directory.latest(&entry.id))).await;

    for (entry, status) in entries.into_iter().zip(statuses) {
        match status {
            Ok(status) => {
                deliver(entry.into_record(&status));
                report.delivered += 1;
            }
            Err(err) => {
                warn!("skipping reservoir {} in catch-up: {err}", entry.id);
                report.skipped.push(entry.id);
            }
        }
    }

    info!(
        "catch-up finished: {} delivered, {} skipped",
        report.delivered,
        report.skipped.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::collections::HashMap;

    struct FakeDirectory {
        entries: Result<Vec<DirectoryEntry>, FetchError>,
        statuses: HashMap<String, Result<LatestStatus, FetchError>>,
    }

    impl ReservoirDirectory for FakeDirectory {
        async fn reservoirs(&self) -> Result<Vec<DirectoryEntry>, FetchError> {
            self.entries.clone()
        }

        async fn latest(&self, id: &ReservoirId) -> Result<LatestStatus, FetchError> {
            self.statuses
                .get(id.as_str())
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }

    fn entry(json: &str) -> DirectoryEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn failing_reservoir_does_not_abort_the_others() {
        let directory = FakeDirectory {
            entries: Ok(vec![
                entry(r#"{"id":1,"name":"Kapshagay","lat":43.9,"lon":77.1,"fili":"Almaty"}"#),
                entry(r#"{"id":2,"name":"Bukhtarma","lat":49.6,"lon":83.5,"fili":"East"}"#),
                entry(r#"{"id":3,"name":"Shardara","lat":41.2,"lon":67.9,"fili":"South"}"#),
            ]),
            statuses: HashMap::from([
                ("1".to_string(), Ok(LatestStatus { filling: Some(91.0) })),
                ("2".to_string(), Err(FetchError::Transport("reset".into()))),
                ("3".to_string(), Ok(LatestStatus { filling: None })),
            ]),
        };

        let mut delivered = Vec::new();
        let report = block_on(catch_up(&directory, |record| delivered.push(record)));

        assert_eq!(report.delivered, 2);
        assert_eq!(report.skipped, vec![ReservoirId::new("2")]);
        assert!(!report.directory_failed);

        assert_eq!(delivered[0].id.as_str(), "1");
        assert_eq!(delivered[0].fill_percent, Some(91.0));
        assert_eq!(delivered[0].name.as_deref(), Some("Kapshagay"));
        assert_eq!(delivered[1].id.as_str(), "3");
        assert_eq!(delivered[1].fill_percent, Some(0.0));
    }

    #[test]
    fn directory_failure_ends_catch_up() {
        let directory = FakeDirectory {
            entries: Err(FetchError::Status(500)),
            statuses: HashMap::new(),
        };

        let mut delivered = Vec::new();
        let report = block_on(catch_up(&directory, |record| delivered.push(record)));

        assert!(report.directory_failed);
        assert!(delivered.is_empty());
    }

    #[test]
    fn latest_status_ignores_extra_fields() {
        let status: LatestStatus = serde_json::from_str(
            r#"{"reservoir_id":1,"filling":"63.5","water_level":null,"timestamp":"2025-03-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(status.filling, Some(63.5));
    }
}
