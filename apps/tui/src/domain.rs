use std::collections::BTreeMap;

use chrono::Datelike;
use serde_json::{Map, Value};

/// Wall-clock years that label the rolling year columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Years {
    pub current: i32,
    pub past: i32,
}

impl Years {
    pub fn now() -> Self {
        Self::for_year(chrono::Local::now().year())
    }

    pub const fn for_year(current: i32) -> Self {
        Self {
            current,
            past: current - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
}

/// One editable column of the reservoir table.
///
/// Year-suffixed keys carry the year they were typed for, so values entered
/// before a year rollover stay attached to the old year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    Npu,
    NpuYear(i32),
    Volume,
    FpuVolume,
    VolumeYear(i32),
    Filling,
    FreeVolume,
    DailyInflow(i32),
    DailyOutflow(i32),
    MaxCapacity,
    MinVolume,
}

pub const COLUMN_COUNT: usize = 16;

impl FieldKey {
    /// Table columns in display order.
    pub const fn columns(years: Years) -> [Self; COLUMN_COUNT] {
        let Years { current, past } = years;
        [
            Self::Name,
            Self::Npu,
            Self::NpuYear(past),
            Self::NpuYear(current),
            Self::Volume,
            Self::FpuVolume,
            Self::VolumeYear(past),
            Self::VolumeYear(current),
            Self::Filling,
            Self::FreeVolume,
            Self::DailyInflow(past),
            Self::DailyInflow(current),
            Self::DailyOutflow(past),
            Self::DailyOutflow(current),
            Self::MaxCapacity,
            Self::MinVolume,
        ]
    }

    pub fn wire_name(self) -> String {
        match self {
            Self::Name => "name".to_string(),
            Self::Npu => "npu".to_string(),
            Self::NpuYear(year) => format!("npu_{year}"),
            Self::Volume => "volume".to_string(),
            Self::FpuVolume => "fpu_volume".to_string(),
            Self::VolumeYear(year) => format!("volume_{year}"),
            Self::Filling => "filling".to_string(),
            Self::FreeVolume => "free_volume".to_string(),
            Self::DailyInflow(year) => format!("daily_inflow_{year}"),
            Self::DailyOutflow(year) => format!("daily_outflow_{year}"),
            Self::MaxCapacity => "max_capacity".to_string(),
            Self::MinVolume => "min_volume".to_string(),
        }
    }

    pub const fn kind(self) -> InputKind {
        match self {
            Self::Name | Self::MinVolume => InputKind::Text,
            _ => InputKind::Number,
        }
    }

    pub fn header(self) -> String {
        match self {
            Self::Name => "Reservoir".to_string(),
            Self::Npu => "NPU".to_string(),
            Self::NpuYear(year) => format!("NPU {year}"),
            Self::Volume => "Volume".to_string(),
            Self::FpuVolume => "FPU vol.".to_string(),
            Self::VolumeYear(year) => format!("Vol. {year}"),
            Self::Filling => "Fill %".to_string(),
            Self::FreeVolume => "Free vol.".to_string(),
            Self::DailyInflow(year) => format!("Inflow {year}"),
            Self::DailyOutflow(year) => format!("Outflow {year}"),
            Self::MaxCapacity => "Max cap.".to_string(),
            Self::MinVolume => "Min vol.".to_string(),
        }
    }

    pub const fn year(self) -> Option<i32> {
        match self {
            Self::NpuYear(year)
            | Self::VolumeYear(year)
            | Self::DailyInflow(year)
            | Self::DailyOutflow(year) => Some(year),
            _ => None,
        }
    }
}

/// Blank input. `"0"` is a real value.
pub fn is_falsy(value: &str) -> bool {
    value.is_empty()
}

/// One table row as the operator typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub id: String,
    pub branch: String,
    pub is_first: bool,
    values: BTreeMap<FieldKey, String>,
}

impl FormRecord {
    pub fn new(id: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            branch: branch.into(),
            is_first: false,
            values: BTreeMap::new(),
        }
    }

    /// The persistent seed row of a branch.
    pub fn placeholder(branch: &str) -> Self {
        Self {
            is_first: true,
            ..Self::new(placeholder_id(branch), branch)
        }
    }

    pub fn value(&self, key: FieldKey) -> &str {
        self.values.get(&key).map_or("", String::as_str)
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    #[must_use]
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty_for(&self, years: Years) -> bool {
        FieldKey::columns(years)
            .into_iter()
            .all(|key| is_falsy(self.value(key)))
    }

    /// JSON object sent to the backend: every current column (blank when
    /// untouched), values kept from other years, and the placeholder flag.
    pub fn to_wire(&self, years: Years) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("id".into(), Value::String(self.id.clone()));
        object.insert("fili".into(), Value::String(self.branch.clone()));

        let columns = FieldKey::columns(years);
        for key in columns {
            object.insert(key.wire_name(), Value::String(self.value(key).to_string()));
        }
        for (key, value) in &self.values {
            if !columns.contains(key) {
                object.insert(key.wire_name(), Value::String(value.clone()));
            }
        }

        object.insert("isFirst".into(), Value::Bool(self.is_first));
        object
    }
}

pub fn placeholder_id(branch: &str) -> String {
    format!("{branch}_first")
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: Years = Years::for_year(2025);

    #[test]
    fn year_columns_follow_the_given_year() {
        let names: Vec<_> = FieldKey::columns(YEARS)
            .into_iter()
            .map(FieldKey::wire_name)
            .collect();
        assert_eq!(names[2], "npu_2024");
        assert_eq!(names[3], "npu_2025");
        assert_eq!(names[6], "volume_2024");
        assert_eq!(names[11], "daily_inflow_2025");
        assert_eq!(names[13], "daily_outflow_2025");
        assert_eq!(names.len(), COLUMN_COUNT);

        let next: Vec<_> = FieldKey::columns(Years::for_year(2026))
            .into_iter()
            .map(FieldKey::wire_name)
            .collect();
        assert_eq!(next[2], "npu_2025");
        assert_eq!(next[3], "npu_2026");
    }

    #[test]
    fn any_single_field_makes_a_record_non_empty() {
        let blank = FormRecord::new("north_1", "north");
        assert!(blank.is_empty_for(YEARS));

        for key in FieldKey::columns(YEARS) {
            let record = blank.clone().with(key, "0");
            assert!(!record.is_empty_for(YEARS), "{key:?} should count");
        }

        let cleared = blank.with(FieldKey::Filling, "");
        assert!(cleared.is_empty_for(YEARS));
    }

    #[test]
    fn last_years_values_do_not_count_after_rollover() {
        let record = FormRecord::new("north_1", "north").with(FieldKey::NpuYear(2023), "12");
        assert!(record.is_empty_for(YEARS));
    }

    #[test]
    fn wire_object_has_every_column_and_flags() {
        let record = FormRecord::placeholder("north")
            .with(FieldKey::Name, "Lake")
            .with(FieldKey::DailyInflow(2025), "3.5")
            .with(FieldKey::VolumeYear(2023), "7");

        let wire = record.to_wire(YEARS);
        assert_eq!(wire["id"], "north_first");
        assert_eq!(wire["fili"], "north");
        assert_eq!(wire["name"], "Lake");
        assert_eq!(wire["daily_inflow_2025"], "3.5");
        assert_eq!(wire["npu_2024"], "");
        assert_eq!(wire["volume_2023"], "7");
        assert_eq!(wire["isFirst"], true);
        assert_eq!(wire.len(), COLUMN_COUNT + 4);
    }

    #[test]
    fn text_columns_are_name_and_min_volume() {
        let text: Vec<_> = FieldKey::columns(YEARS)
            .into_iter()
            .filter(|key| key.kind() == InputKind::Text)
            .collect();
        assert_eq!(text, [FieldKey::Name, FieldKey::MinVolume]);
    }
}
