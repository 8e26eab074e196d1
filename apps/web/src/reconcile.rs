use log::{debug, warn};

use crate::marker::{Marker, MarkerLayer};
use crate::store::{TelemetryStore, Upsert};
use crate::telemetry::{parse_message, TelemetryRecord};

/// What a single message changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub upsert: Upsert,
    pub marker_updated: bool,
}

/// Folds telemetry messages into the live list and the map markers.
///
/// Each call is one atomic step: marker update, list upsert, then the
/// derived views (side list, summary) read the new state on the next render.
#[derive(Default)]
pub struct Reconciler {
    store: TelemetryStore,
    markers: MarkerLayer,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, record: TelemetryRecord) -> Reconciled {
        let marker_updated = match Marker::from_record(&record) {
            Some(marker) => {
                self.markers.upsert(marker);
                true
            }
            None => false,
        };
        let upsert = self.store.upsert(record);

        Reconciled {
            upsert,
            marker_updated,
        }
    }

    /// Parses and applies one raw stream message. Malformed messages are
    /// logged and dropped.
    pub fn apply_message(&mut self, text: &str) -> Option<Reconciled> {
        match parse_message(text) {
            Ok(record) => {
                debug!("telemetry update for reservoir {}", record.id);
                Some(self.apply(record))
            }
            Err(error) => {
                warn!("dropping malformed telemetry message: {error}");
                None
            }
        }
    }

    pub const fn store(&self) -> &TelemetryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TelemetryStore {
        &mut self.store
    }

    pub const fn markers(&self) -> &MarkerLayer {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{AlertLevel, FillBand};
    use crate::telemetry::ReservoirId;

    #[test]
    fn critical_reservoir_drops_out_of_alerts_after_update() {
        let mut reconciler = Reconciler::new();
        reconciler
            .apply_message(r#"{"id":"R1","name":"Dam A","lat":50,"lon":60,"fill_percent":95}"#)
            .unwrap();
        assert_eq!(reconciler.store().summary().critical, 1);

        let outcome = reconciler
            .apply_message(r#"{"id":"R1","fill_percent":40}"#)
            .unwrap();
        assert_eq!(outcome.upsert, Upsert::Replaced);
        assert!(!outcome.marker_updated);

        let store = reconciler.store();
        assert_eq!(store.len(), 1);
        let record = store.get(&ReservoirId::new("R1")).unwrap();
        assert_eq!(record.fill_percent, Some(40.0));

        let summary = store.summary();
        assert_eq!(summary.critical, 0);
        assert_eq!(summary.warning, 0);
        assert_eq!(store.side_list()[0].level, None::<AlertLevel>);
    }

    #[test]
    fn update_without_coordinates_still_reaches_the_summary() {
        let mut reconciler = Reconciler::new();
        let outcome = reconciler.apply(TelemetryRecord::new("R9").with_fill(80.0));

        assert!(!outcome.marker_updated);
        assert!(reconciler.markers().is_empty());
        assert_eq!(reconciler.store().summary().warning, 1);

        let outcome = reconciler.apply(
            TelemetryRecord::new("R9")
                .with_position(45.0, 70.0)
                .with_fill(80.0),
        );
        assert!(outcome.marker_updated);
        assert_eq!(
            reconciler.markers().get(&ReservoirId::new("R9")).unwrap().band,
            FillBand::High
        );
    }

    #[test]
    fn malformed_messages_are_dropped() {
        let mut reconciler = Reconciler::new();
        assert!(reconciler.apply_message("{oops").is_none());
        assert!(reconciler.apply_message(r#"{"fill_percent":10}"#).is_none());
        assert!(reconciler.store().is_empty());
    }

    #[test]
    fn messages_apply_in_delivery_order() {
        let mut reconciler = Reconciler::new();
        for (id, fill) in [("A", 10), ("B", 20), ("A", 95), ("B", 75), ("A", 5)] {
            reconciler.apply_message(&format!(r#"{{"id":"{id}","fill_percent":{fill}}}"#));
        }

        let store = reconciler.store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&ReservoirId::new("A")).unwrap().fill_percent, Some(5.0));
        assert_eq!(store.get(&ReservoirId::new("B")).unwrap().fill_percent, Some(75.0));
        assert_eq!(store.summary().warning, 1);
        assert_eq!(store.revision(), 5);
    }
}
