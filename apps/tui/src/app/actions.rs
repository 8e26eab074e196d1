use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::api::{Acknowledgement, ApiClient, DirectoryEntry};
use crate::app::submission::ReportPayload;

/// Result of a background request, delivered to the UI loop.
#[derive(Debug)]
pub enum TaskOutcome {
    Directory(Result<Vec<DirectoryEntry>, String>),
    Submitted(Result<Acknowledgement, String>),
    Exported(Result<PathBuf, String>),
}

/// Runs backend calls on the tokio runtime so input never waits on the network.
#[derive(Debug, Clone)]
pub struct AppActions {
    client: ApiClient,
    outcomes: UnboundedSender<TaskOutcome>,
}

impl AppActions {
    pub const fn new(client: ApiClient, outcomes: UnboundedSender<TaskOutcome>) -> Self {
        Self { client, outcomes }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn fetch_directory(&self) {
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = client.fetch_directory().await.map_err(|err| {
                error!(error = %err, "reservoir directory unavailable");
                err.to_string()
            });
            if let Ok(entries) = &result {
                info!(count = entries.len(), "reservoir directory loaded");
            }
            outcomes.send(TaskOutcome::Directory(result)).ok();
        });
    }

    pub fn submit(&self, payload: ReportPayload) {
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = client.submit(&payload).await.map_err(|err| {
                error!(error = %err, "submission failed");
                err.to_string()
            });
            outcomes.send(TaskOutcome::Submitted(result)).ok();
        });
    }

    pub fn export(&self, payload: ReportPayload) {
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = client.export(&payload).await.map_err(|err| {
                error!(error = %err, "spreadsheet export failed");
                err.to_string()
            });
            outcomes.send(TaskOutcome::Exported(result)).ok();
        });
    }
}
