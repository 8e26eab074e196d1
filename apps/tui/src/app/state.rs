use std::time::Instant;

use color_eyre::Result;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::api::{ApiClient, DirectoryEntry};
use crate::app::actions::{AppActions, TaskOutcome};
use crate::app::editor::{Intent, TableEditor, ALL_BRANCHES};
use crate::app::submission::{build_payload, validate, ReportHeader};
use crate::app::suggest::{branch_choices, directory_names, suggest_names, MAX_SUGGESTIONS};
use crate::config::Settings;
use crate::domain::{FieldKey, InputKind, Years, COLUMN_COUNT};

const THROBBER_STEP_MS: u128 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Header,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Organization,
    Date,
    Executor,
    Branch,
}

impl HeaderField {
    pub const ALL: [Self; 4] = [Self::Organization, Self::Date, Self::Executor, Self::Branch];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Date => "Date",
            Self::Executor => "Executor",
            Self::Branch => "Branch",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Warning,
    Error,
}

/// Blocking popup; any dismiss key closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub settings: Settings,
    pub header: ReportHeader,
    pub editor: TableEditor,
    pub focus: Focus,
    pub header_field: HeaderField,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub editing: bool,
    /// Record bound to the cell being edited.
    pub editing_id: Option<String>,
    pub alert: Option<Alert>,
    pub status_message: String,
    pub show_help: bool,
    pub branches: Vec<String>,
    pub branch_index: usize,
    pub directory: Vec<DirectoryEntry>,
    pub reservoir_names: Vec<String>,
    pub suggestions: Vec<String>,
    pub pending: usize,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
    pub actions: AppActions,
    outcomes: UnboundedReceiver<TaskOutcome>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ApiClient::new(&settings)?;
        let (sender, outcomes) = mpsc::unbounded_channel();

        let header = ReportHeader {
            organization: settings.organization.clone(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            executor: settings.executor.clone(),
        };
        let branches = branch_choices(&settings.branches, &[]);

        Ok(Self {
            running: true,
            header,
            editor: TableEditor::new(),
            focus: Focus::Table,
            header_field: HeaderField::Organization,
            cursor_row: 0,
            cursor_col: 0,
            editing: false,
            editing_id: None,
            alert: None,
            status_message: String::new(),
            show_help: false,
            branches,
            branch_index: 0,
            directory: Vec::new(),
            reservoir_names: Vec::new(),
            suggestions: Vec::new(),
            pending: 0,
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
            actions: AppActions::new(client, sender),
            outcomes,
            settings,
        })
    }

    /// Kicks off the startup directory fetch.
    pub fn start(&mut self) {
        self.pending += 1;
        self.actions.fetch_directory();
    }

    /// Advances the spinner while requests are in flight.
    pub fn update(&mut self) {
        if self.pending > 0 && self.last_frame.elapsed().as_millis() >= THROBBER_STEP_MS {
            self.throbber.calc_next();
            self.last_frame = Instant::now();
        }
    }

    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    pub fn apply_outcome(&mut self, outcome: TaskOutcome) {
        self.pending = self.pending.saturating_sub(1);
        match outcome {
            TaskOutcome::Directory(Ok(entries)) => {
                self.set_directory(entries);
                self.status_message = format!(
                    "Directory loaded: {} reservoirs",
                    self.directory.len()
                );
            }
            TaskOutcome::Directory(Err(err)) => {
                self.status_message = format!("Error loading reservoir directory: {err}");
            }
            TaskOutcome::Submitted(Ok(ack)) => {
                info!(status = %ack.status, "report accepted");
                self.status_message = "Data submitted successfully!".to_string();
                self.alert = Some(Alert::new(
                    AlertKind::Info,
                    "Submitted",
                    "Data submitted successfully!",
                ));
            }
            TaskOutcome::Submitted(Err(err)) => {
                self.status_message = "Error sending data".to_string();
                self.alert = Some(Alert::new(
                    AlertKind::Error,
                    "Submission failed",
                    format!("Error sending data: {err}"),
                ));
            }
            TaskOutcome::Exported(Ok(path)) => {
                let saved = format!("Spreadsheet saved: {}", path.display());
                self.alert = Some(Alert::new(AlertKind::Info, "Exported", saved.clone()));
                self.status_message = saved;
            }
            TaskOutcome::Exported(Err(err)) => {
                self.status_message = "Error exporting to Excel".to_string();
                self.alert = Some(Alert::new(
                    AlertKind::Error,
                    "Export failed",
                    format!("Error exporting to Excel: {err}"),
                ));
            }
        }
    }

    pub fn set_directory(&mut self, entries: Vec<DirectoryEntry>) {
        let current = self.current_branch().to_string();
        self.reservoir_names = directory_names(&entries);
        self.branches = branch_choices(&self.settings.branches, &entries);
        self.branch_index = self
            .branches
            .iter()
            .position(|branch| *branch == current)
            .unwrap_or(0);
        self.directory = entries;
    }

    pub fn current_branch(&self) -> &str {
        self.branches
            .get(self.branch_index)
            .map_or(ALL_BRANCHES, String::as_str)
    }

    pub fn select_branch_index(&mut self, index: usize) {
        self.branch_index = index.min(self.branches.len().saturating_sub(1));
        let branch = self.current_branch().to_string();
        self.dispatch(Intent::SelectBranch(branch));
        self.cursor_row = 0;
        self.end_cell_edit();
    }

    /// Applies an intent and turns rejections into a warning popup.
    pub fn dispatch(&mut self, intent: Intent) {
        if let Err(err) = self.editor.apply(intent) {
            warn!(error = %err, "edit rejected");
            self.alert = Some(Alert::new(AlertKind::Warning, "Warning", err.to_string()));
        }
    }

    pub fn add_row(&mut self) {
        let before = self.visible_row_count();
        self.dispatch(Intent::AddRow);
        if self.visible_row_count() > before {
            self.cursor_row = self.visible_row_count() - 1;
            self.cursor_col = 0;
            self.status_message = "Row added".to_string();
        }
    }

    pub fn delete_current_row(&mut self) {
        let Some(id) = self.cursor_row_id() else {
            return;
        };
        self.dispatch(Intent::DeleteRow(id));
        self.clamp_cursor();
    }

    pub fn visible_row_count(&self) -> usize {
        self.editor.visible_records(Years::now()).len()
    }

    pub fn cursor_row_id(&self) -> Option<String> {
        self.editor
            .visible_records(Years::now())
            .get(self.cursor_row)
            .map(|record| record.id.clone())
    }

    pub fn cursor_field(&self) -> FieldKey {
        FieldKey::columns(Years::now())[self.cursor_col.min(COLUMN_COUNT - 1)]
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor_row = self
            .cursor_row
            .min(self.visible_row_count().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(COLUMN_COUNT - 1);
    }

    /// Record the next keystroke goes to: the bound one while editing.
    fn target_id(&self) -> Option<String> {
        self.editing_id.clone().or_else(|| self.cursor_row_id())
    }

    /// Current text of the cell being edited, or under the cursor.
    pub fn cursor_value(&self) -> String {
        self.target_id()
            .and_then(|id| self.editor.record(&id).map(|r| r.value(self.cursor_field()).to_string()))
            .unwrap_or_default()
    }

    /// Binds editing to the record under the cursor.
    pub fn begin_cell_edit(&mut self) {
        if let Some(id) = self.cursor_row_id() {
            self.editing_id = Some(id);
            self.editing = true;
        }
    }

    pub fn end_cell_edit(&mut self) {
        self.editing = false;
        self.editing_id = None;
        self.suggestions.clear();
    }

    /// Writes one keystroke into the bound record.
    pub fn edit_cell(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(id) = self.target_id() else {
            return;
        };
        let key = self.cursor_field();
        let mut value = self.cursor_value();
        edit(&mut value);
        self.dispatch(Intent::SetField {
            id: id.clone(),
            key,
            value: value.clone(),
        });
        self.refresh_suggestions(key, &value);

        // the "all" view hides rows that became empty
        let years = Years::now();
        let position = self
            .editor
            .visible_records(years)
            .iter()
            .position(|record| record.id == id);
        match position {
            Some(row) => self.cursor_row = row,
            None if self.editing => {
                info!(id = %id, "edited row emptied and hidden");
                self.end_cell_edit();
                self.clamp_cursor();
                self.status_message = "Row emptied and hidden from the all-branches view".to_string();
            }
            None => {}
        }
    }

    pub fn accepts_char(&self, ch: char) -> bool {
        match self.cursor_field().kind() {
            InputKind::Text => !ch.is_control(),
            InputKind::Number => ch.is_ascii_digit() || matches!(ch, '.' | '-'),
        }
    }

    fn refresh_suggestions(&mut self, key: FieldKey, value: &str) {
        self.suggestions = if key == FieldKey::Name {
            suggest_names(&self.reservoir_names, value, MAX_SUGGESTIONS)
        } else {
            Vec::new()
        };
    }

    /// Replaces the name cell with the best suggestion.
    pub fn accept_suggestion(&mut self) {
        let Some(best) = self.suggestions.first().cloned() else {
            return;
        };
        self.edit_cell(|value| *value = best);
        self.suggestions.clear();
    }

    pub fn header_value_mut(&mut self, field: HeaderField) -> Option<&mut String> {
        match field {
            HeaderField::Organization => Some(&mut self.header.organization),
            HeaderField::Date => Some(&mut self.header.date),
            HeaderField::Executor => Some(&mut self.header.executor),
            HeaderField::Branch => None,
        }
    }

    /// Validates what is on screen, then sends the non-empty rows.
    pub fn submit(&mut self) {
        let years = Years::now();
        if let Err(err) = validate(&self.header, &self.editor.view(years)) {
            warn!(error = %err, "submission blocked by validation");
            self.alert = Some(Alert::new(AlertKind::Warning, "Check the form", err.to_string()));
            return;
        }

        let payload = build_payload(&self.header, &self.editor, years);
        self.pending += 1;
        self.status_message = "Submitting...".to_string();
        self.actions.submit(payload);
    }

    pub fn export(&mut self) {
        let payload = build_payload(&self.header, &self.editor, Years::now());
        self.pending += 1;
        self.status_message = "Exporting to Excel...".to_string();
        self.actions.export(payload);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
