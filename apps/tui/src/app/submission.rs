use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::app::editor::{TableEditor, TableView};
use crate::domain::{InputKind, Years};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Numeric fields cannot be negative!")]
    NegativeNumber,
    #[error("All fields must be filled in!")]
    MissingValue,
}

/// Report header inputs above the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportHeader {
    pub organization: String,
    pub date: String,
    pub executor: String,
}

/// Body of both the submission and the spreadsheet export request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub organization: String,
    pub date: String,
    pub executor: String,
    pub water_reservoirs: Vec<Map<String, Value>>,
}

/// Scans every displayed input in screen order and stops at the first
/// problem. Blank displayed rows block submission even though they would
/// not be sent.
pub fn validate(header: &ReportHeader, view: &TableView) -> Result<(), ValidationError> {
    let header_inputs = [&header.organization, &header.date, &header.executor]
        .into_iter()
        .map(|value| (InputKind::Text, value.as_str()));

    let cell_inputs = view.rows.iter().flat_map(|row| {
        view.columns
            .iter()
            .zip(&row.cells)
            .map(|(key, value)| (key.kind(), value.as_str()))
    });

    for (kind, value) in header_inputs.chain(cell_inputs) {
        if kind == InputKind::Number && parses_negative(value) {
            return Err(ValidationError::NegativeNumber);
        }
        if value.is_empty() {
            return Err(ValidationError::MissingValue);
        }
    }
    Ok(())
}

fn parses_negative(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|number| number < 0.0)
}

pub fn build_payload(header: &ReportHeader, editor: &TableEditor, years: Years) -> ReportPayload {
    ReportPayload {
        organization: header.organization.clone(),
        date: header.date.clone(),
        executor: header.executor.clone(),
        water_reservoirs: editor
            .non_empty_records(years)
            .into_iter()
            .map(|record| record.to_wire(years))
            .collect(),
    }
}

/// `water_reservoirs_<date>.xlsx` with every space in the date replaced.
pub fn export_file_name(date: &str) -> String {
    format!("water_reservoirs_{}.xlsx", date.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKey;

    const YEARS: Years = Years::for_year(2025);

    fn header() -> ReportHeader {
        ReportHeader {
            organization: "Kazvodkhoz".into(),
            date: "2025-03-01".into(),
            executor: "A. Operator".into(),
        }
    }

    fn fill_row(editor: &mut TableEditor, id: &str) {
        for (index, key) in FieldKey::columns(YEARS).into_iter().enumerate() {
            editor.set_field(id, key, format!("{}", index + 1));
        }
    }

    #[test]
    fn payload_skips_blank_records() {
        let mut editor = TableEditor::new();
        editor.select_branch("X");
        let lake = editor.add_row("X").unwrap();
        editor.set_field(&lake, FieldKey::Name, "Lake");

        let payload = build_payload(&header(), &editor, YEARS);
        assert_eq!(payload.water_reservoirs.len(), 1);
        assert_eq!(payload.water_reservoirs[0]["name"], "Lake");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["organization"], "Kazvodkhoz");
        assert!(json["waterReservoirs"].is_array());
    }

    #[test]
    fn complete_form_passes() {
        let mut editor = TableEditor::new();
        editor.select_branch("X");
        fill_row(&mut editor, "X_first");
        assert_eq!(validate(&header(), &editor.view(YEARS)), Ok(()));
    }

    #[test]
    fn blank_header_is_reported_first() {
        let editor = TableEditor::new();
        let mut header = header();
        header.executor.clear();
        assert_eq!(
            validate(&header, &editor.view(YEARS)),
            Err(ValidationError::MissingValue)
        );
    }

    #[test]
    fn negative_number_wins_when_it_comes_first() {
        let mut editor = TableEditor::new();
        editor.select_branch("X");
        editor.set_field("X_first", FieldKey::Name, "Lake");
        editor.set_field("X_first", FieldKey::Npu, "-3");

        assert_eq!(
            validate(&header(), &editor.view(YEARS)),
            Err(ValidationError::NegativeNumber)
        );
    }

    #[test]
    fn negative_text_is_not_a_number_error() {
        let mut editor = TableEditor::new();
        editor.select_branch("X");
        fill_row(&mut editor, "X_first");
        editor.set_field("X_first", FieldKey::MinVolume, "-5");
        assert_eq!(validate(&header(), &editor.view(YEARS)), Ok(()));
    }

    #[test]
    fn blank_displayed_row_blocks_submission() {
        let mut editor = TableEditor::new();
        editor.select_branch("X");
        fill_row(&mut editor, "X_first");
        editor.add_row("X").unwrap();

        assert_eq!(
            validate(&header(), &editor.view(YEARS)),
            Err(ValidationError::MissingValue)
        );
        assert_eq!(build_payload(&header(), &editor, YEARS).water_reservoirs.len(), 1);
    }

    #[test]
    fn export_name_replaces_every_space() {
        assert_eq!(
            export_file_name("01 March 2025"),
            "water_reservoirs_01_March_2025.xlsx"
        );
        assert_eq!(export_file_name("2025-03-01"), "water_reservoirs_2025-03-01.xlsx");
    }
}
