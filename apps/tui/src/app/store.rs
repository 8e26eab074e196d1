use std::fmt;

use crate::domain::{FieldKey, FormRecord};

/// What changed in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent<'a> {
    Inserted(&'a FormRecord),
    Updated(&'a FormRecord),
    Removed(&'a FormRecord),
}

type Listener = Box<dyn FnMut(StoreEvent<'_>) + Send>;

/// Owned list of form records in insertion order.
#[derive(Default)]
pub struct RecordStore {
    records: Vec<FormRecord>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, listener: impl FnMut(StoreEvent<'_>) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the record with the same id, or appends it. Returns `true`
    /// when the record is new.
    pub fn upsert(&mut self, record: FormRecord) -> bool {
        let (index, inserted) = match self.position(&record.id) {
            Some(index) => {
                self.records[index] = record;
                (index, false)
            }
            None => {
                self.records.push(record);
                (self.records.len() - 1, true)
            }
        };

        let record = &self.records[index];
        let event = if inserted {
            StoreEvent::Inserted(record)
        } else {
            StoreEvent::Updated(record)
        };
        for listener in &mut self.listeners {
            listener(event);
        }
        inserted
    }

    /// Writes one field in place. Returns `false` for an unknown id.
    pub fn set_field(&mut self, id: &str, key: FieldKey, value: String) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.records[index].set(key, value);

        let record = &self.records[index];
        for listener in &mut self.listeners {
            listener(StoreEvent::Updated(record));
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<FormRecord> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        for listener in &mut self.listeners {
            listener(StoreEvent::Removed(&removed));
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&FormRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn records(&self) -> &[FormRecord] {
        &self.records
    }

    pub fn filter_by<P>(&self, predicate: P) -> Vec<&FormRecord>
    where
        P: Fn(&FormRecord) -> bool,
    {
        self.records.iter().filter(|record| predicate(record)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn upsert_replaces_by_id_and_keeps_order() {
        let mut store = RecordStore::new();
        assert!(store.upsert(FormRecord::new("a", "north")));
        assert!(store.upsert(FormRecord::new("b", "south")));
        assert!(!store.upsert(FormRecord::new("a", "north").with(FieldKey::Name, "Lake")));

        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.get("a").unwrap().value(FieldKey::Name), "Lake");
    }

    #[test]
    fn listeners_see_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = RecordStore::new();
        store.on_change({
            let seen = Arc::clone(&seen);
            move |event| {
                let label = match event {
                    StoreEvent::Inserted(r) => format!("+{}", r.id),
                    StoreEvent::Updated(r) => format!("~{}", r.id),
                    StoreEvent::Removed(r) => format!("-{}", r.id),
                };
                seen.lock().unwrap().push(label);
            }
        });

        store.upsert(FormRecord::new("a", "north"));
        assert!(store.set_field("a", FieldKey::Filling, "40".into()));
        assert!(!store.set_field("zzz", FieldKey::Filling, "40".into()));
        store.remove("a");
        assert!(store.remove("a").is_none());

        assert_eq!(*seen.lock().unwrap(), ["+a", "~a", "-a"]);
    }

    #[test]
    fn filter_by_selects_matching_records() {
        let mut store = RecordStore::new();
        store.upsert(FormRecord::new("a", "north"));
        store.upsert(FormRecord::new("b", "south"));
        store.upsert(FormRecord::new("c", "north"));

        let north = store.filter_by(|r| r.branch == "north");
        assert_eq!(north.len(), 2);
        assert_eq!(north[1].id, "c");
    }
}
