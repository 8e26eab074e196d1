use thiserror::Error;
use tracing::{debug, info};

use crate::app::store::{RecordStore, StoreEvent};
use crate::domain::{placeholder_id, FieldKey, FormRecord, Years, COLUMN_COUNT};

pub const ALL_BRANCHES: &str = "all";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Please select a specific branch first!")]
    AllBranchesSelected,
    #[error("No row with id {0}")]
    UnknownRow(String),
}

/// Edits requested by the UI; every keystroke in a cell becomes a `SetField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectBranch(String),
    AddRow,
    DeleteRow(String),
    SetField {
        id: String,
        key: FieldKey,
        value: String,
    },
}

/// Rendered projection of the table. Row numbers are positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub years: Years,
    pub columns: [FieldKey; COLUMN_COUNT],
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub number: usize,
    pub id: String,
    pub deletable: bool,
    pub cells: Vec<String>,
}

/// Branch-scoped view over the record store.
#[derive(Debug)]
pub struct TableEditor {
    store: RecordStore,
    branch: String,
}

impl Default for TableEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableEditor {
    pub fn new() -> Self {
        let mut store = RecordStore::new();
        store.on_change(|event| match event {
            StoreEvent::Inserted(record) => {
                debug!(id = %record.id, branch = %record.branch, "row added");
            }
            StoreEvent::Updated(record) => debug!(id = %record.id, "row edited"),
            StoreEvent::Removed(record) => debug!(id = %record.id, "row removed"),
        });

        Self {
            store,
            branch: ALL_BRANCHES.to_string(),
        }
    }

    pub fn apply(&mut self, intent: Intent) -> Result<(), EditorError> {
        match intent {
            Intent::SelectBranch(branch) => {
                self.select_branch(&branch);
                Ok(())
            }
            Intent::AddRow => {
                let branch = self.branch.clone();
                self.add_row(&branch).map(|_| ())
            }
            Intent::DeleteRow(id) => {
                self.delete_row(&id);
                Ok(())
            }
            Intent::SetField { id, key, value } => {
                if self.store.set_field(&id, key, value) {
                    Ok(())
                } else {
                    Err(EditorError::UnknownRow(id))
                }
            }
        }
    }

    /// `"all"` shows non-empty rows of every branch. A concrete branch gets
    /// its placeholder row on first selection.
    pub fn select_branch(&mut self, branch: &str) {
        branch.clone_into(&mut self.branch);
        if branch == ALL_BRANCHES {
            return;
        }

        let has_placeholder = self
            .store
            .records()
            .iter()
            .any(|record| record.branch == branch && record.is_first);
        if !has_placeholder {
            self.store.upsert(FormRecord::placeholder(branch));
        }
        info!(branch, "branch selected");
    }

    /// Appends a blank row to `branch` and returns its id.
    pub fn add_row(&mut self, branch: &str) -> Result<String, EditorError> {
        if branch == ALL_BRANCHES {
            return Err(EditorError::AllBranchesSelected);
        }

        let mut stamp = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| i64::try_from(self.store.len()).unwrap_or(i64::MAX));
        let mut id = format!("{branch}_{stamp}");
        while self.store.contains(&id) || id == placeholder_id(branch) {
            stamp = stamp.wrapping_add(1);
            id = format!("{branch}_{stamp}");
        }

        self.store.upsert(FormRecord::new(id.clone(), branch));
        Ok(id)
    }

    /// Removes a row; the placeholder stays. Returns whether a row was removed.
    pub fn delete_row(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(record) if !record.is_first => self.store.remove(id).is_some(),
            _ => false,
        }
    }

    pub fn set_field(&mut self, id: &str, key: FieldKey, value: impl Into<String>) -> bool {
        self.store.set_field(id, key, value.into())
    }

    pub fn record(&self, id: &str) -> Option<&FormRecord> {
        self.store.get(id)
    }

    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn visible_records(&self, years: Years) -> Vec<&FormRecord> {
        if self.branch == ALL_BRANCHES {
            self.store
                .filter_by(|record| !record.branch.is_empty() && !record.is_empty_for(years))
        } else {
            self.store.filter_by(|record| record.branch == self.branch)
        }
    }

    /// Rows that leave the form: non-empty ones from every branch.
    pub fn non_empty_records(&self, years: Years) -> Vec<&FormRecord> {
        self.store.filter_by(|record| !record.is_empty_for(years))
    }

    pub fn view(&self, years: Years) -> TableView {
        let columns = FieldKey::columns(years);
        let rows = self
            .visible_records(years)
            .into_iter()
            .enumerate()
            .map(|(index, record)| RowView {
                number: index + 1,
                id: record.id.clone(),
                deletable: !record.is_first,
                cells: columns
                    .iter()
                    .map(|key| record.value(*key).to_string())
                    .collect(),
            })
            .collect();

        TableView {
            years,
            columns,
            rows,
        }
    }
}
