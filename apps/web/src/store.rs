use std::collections::HashMap;

use crate::marker::AlertLevel;
use crate::telemetry::{format_percent, ReservoirId, TelemetryRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Passed to change listeners after every mutation.
#[derive(Debug)]
pub struct StoreChange<'a> {
    pub record: &'a TelemetryRecord,
    pub upsert: Upsert,
    pub revision: u64,
}

type Listener = Box<dyn FnMut(&StoreChange<'_>)>;

/// Live reservoir list, one entry per id in first-seen order.
#[derive(Default)]
pub struct TelemetryStore {
    records: Vec<TelemetryRecord>,
    positions: HashMap<ReservoirId, usize>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins: the stored record is replaced wholesale.
    pub fn upsert(&mut self, record: TelemetryRecord) -> Upsert {
        let (index, upsert) = match self.positions.get(&record.id) {
            Some(&index) => {
                self.records[index] = record;
                (index, Upsert::Replaced)
            }
            None => {
                let index = self.records.len();
                self.positions.insert(record.id.clone(), index);
                self.records.push(record);
                (index, Upsert::Inserted)
            }
        };

        self.revision += 1;
        let change = StoreChange {
            record: &self.records[index],
            upsert,
            revision: self.revision,
        };
        for listener in &mut self.listeners {
            listener(&change);
        }

        upsert
    }

    pub fn on_change(&mut self, listener: impl FnMut(&StoreChange<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self, id: &ReservoirId) -> Option<&TelemetryRecord> {
        self.positions.get(id).map(|&index| &self.records[index])
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn filter_by<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a TelemetryRecord>
    where
        P: Fn(&TelemetryRecord) -> bool + 'a,
    {
        self.records.iter().filter(move |record| predicate(record))
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.records)
    }

    pub fn side_list(&self) -> Vec<ListEntry> {
        self.records.iter().map(ListEntry::from_record).collect()
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub average_fill: f64,
}

impl Summary {
    pub fn from_records(records: &[TelemetryRecord]) -> Self {
        let critical = records
            .iter()
            .filter(|r| AlertLevel::from_percent(r.fill_percent) == Some(AlertLevel::Critical))
            .count();
        let warning = records
            .iter()
            .filter(|r| AlertLevel::from_percent(r.fill_percent) == Some(AlertLevel::Warning))
            .count();

        let average_fill = if records.is_empty() {
            0.0
        } else {
            let sum: f64 = records.iter().map(TelemetryRecord::fill_or_zero).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / records.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        Self {
            total: records.len(),
            critical,
            warning,
            average_fill,
        }
    }

    pub fn average_label(&self) -> String {
        if self.total == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", self.average_fill)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: ReservoirId,
    pub text: String,
    pub level: Option<AlertLevel>,
}

impl ListEntry {
    fn from_record(record: &TelemetryRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: format!(
                "{}: {}%",
                record.display_name(),
                format_percent(record.fill_or_zero())
            ),
            level: AlertLevel::from_percent(record.fill_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn one_entry_per_id_with_latest_values() {
        let mut store = TelemetryStore::new();
        store.upsert(TelemetryRecord::new("A").with_fill(10.0));
        store.upsert(TelemetryRecord::new("B").with_fill(20.0));
        store.upsert(TelemetryRecord::new("A").with_fill(30.0));
        store.upsert(TelemetryRecord::new("C"));
        store.upsert(TelemetryRecord::new("B").with_fill(99.0));

        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        assert_eq!(store.get(&ReservoirId::new("A")).unwrap().fill_percent, Some(30.0));
        assert_eq!(store.get(&ReservoirId::new("B")).unwrap().fill_percent, Some(99.0));
    }

    #[test]
    fn replacement_drops_fields_missing_from_latest_message() {
        let mut store = TelemetryStore::new();
        store.upsert(
            TelemetryRecord::new("R1")
                .with_name("Dam A")
                .with_position(50.0, 60.0)
                .with_fill(95.0),
        );
        assert_eq!(store.upsert(TelemetryRecord::new("R1").with_fill(40.0)), Upsert::Replaced);

        let record = store.get(&ReservoirId::new("R1")).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.fill_percent, Some(40.0));
    }

    #[test]
    fn summary_counts_and_average() {
        let mut store = TelemetryStore::new();
        store.upsert(TelemetryRecord::new("A").with_fill(95.0));
        store.upsert(TelemetryRecord::new("B").with_fill(90.0));
        store.upsert(TelemetryRecord::new("C").with_fill(70.0));
        store.upsert(TelemetryRecord::new("D").with_fill(89.9));
        store.upsert(TelemetryRecord::new("E"));

        let summary = store.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.critical, 2);
        assert_eq!(summary.warning, 2);
        // (95 + 90 + 70 + 89.9 + 0) / 5 = 68.98
        assert!((summary.average_fill - 69.0).abs() < 1e-9);
        assert_eq!(summary.average_label(), "69.0%");
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = TelemetryStore::new().summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.critical, 0);
        assert_eq!(summary.warning, 0);
        assert!(summary.average_fill.abs() < f64::EPSILON);
        assert_eq!(summary.average_label(), "0%");
    }

    #[test]
    fn side_list_tags_alerts() {
        let mut store = TelemetryStore::new();
        store.upsert(TelemetryRecord::new("A").with_name("North").with_fill(92.0));
        store.upsert(TelemetryRecord::new("B").with_name("South").with_fill(71.5));
        store.upsert(TelemetryRecord::new("C").with_name("East"));

        let list = store.side_list();
        assert_eq!(list[0].text, "North: 92%");
        assert_eq!(list[0].level, Some(AlertLevel::Critical));
        assert_eq!(list[1].text, "South: 71.5%");
        assert_eq!(list[1].level, Some(AlertLevel::Warning));
        assert_eq!(list[2].text, "East: 0%");
        assert_eq!(list[2].level, None);
    }

    #[test]
    fn listeners_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = TelemetryStore::new();
        store.on_change({
            let seen = seen.clone();
            move |change| {
                seen.borrow_mut()
                    .push((change.record.id.to_string(), change.upsert, change.revision));
            }
        });

        store.upsert(TelemetryRecord::new("A"));
        store.upsert(TelemetryRecord::new("A"));

        assert_eq!(
            *seen.borrow(),
            vec![
                ("A".to_string(), Upsert::Inserted, 1),
                ("A".to_string(), Upsert::Replaced, 2)
            ]
        );
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn filter_by_predicate() {
        let mut store = TelemetryStore::new();
        store.upsert(TelemetryRecord::new("A").with_position(1.0, 1.0));
        store.upsert(TelemetryRecord::new("B"));

        let located: Vec<_> = store
            .filter_by(|record| record.position().is_some())
            .map(|record| record.id.as_str())
            .collect();
        assert_eq!(located, ["A"]);
    }
}
