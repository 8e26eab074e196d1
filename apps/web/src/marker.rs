use std::collections::BTreeMap;

use ratzilla::ratatui::style::Color;

use crate::geo::GeoPoint;
use crate::telemetry::{format_percent, ReservoirId, TelemetryRecord};

/// Marker icon color bands, checked from the top down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillBand {
    Critical,
    High,
    Elevated,
    Normal,
    Low,
}

impl FillBand {
    pub fn from_percent(percent: Option<f64>) -> Self {
        match percent {
            Some(p) if p >= 90.0 => Self::Critical,
            Some(p) if p >= 70.0 => Self::High,
            Some(p) if p >= 50.0 => Self::Elevated,
            Some(p) if p >= 30.0 => Self::Normal,
            _ => Self::Low,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Critical => Color::Red,
            Self::High => Color::Rgb(255, 165, 0),
            Self::Elevated => Color::Yellow,
            Self::Normal => Color::Green,
            Self::Low => Color::Blue,
        }
    }
}

/// Side-list tag for reservoirs that need attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Critical,
    Warning,
}

impl AlertLevel {
    pub fn from_percent(percent: Option<f64>) -> Option<Self> {
        match percent {
            Some(p) if p >= 90.0 => Some(Self::Critical),
            Some(p) if p >= 70.0 => Some(Self::Warning),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: ReservoirId,
    pub position: GeoPoint,
    pub band: FillBand,
    pub label: String,
}

impl Marker {
    /// `None` when the record has no usable coordinates.
    pub fn from_record(record: &TelemetryRecord) -> Option<Self> {
        let position = record.position()?;
        Some(Self {
            id: record.id.clone(),
            position,
            band: FillBand::from_percent(record.fill_percent),
            label: format!(
                "{}: {}%",
                record.display_name(),
                format_percent(record.fill_or_zero())
            ),
        })
    }
}

/// Map entities keyed by reservoir id.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: BTreeMap<ReservoirId, Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the marker or overwrites the existing one in place.
    pub fn upsert(&mut self, marker: Marker) {
        self.markers.insert(marker.id.clone(), marker);
    }

    pub fn get(&self, id: &ReservoirId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table_thresholds() {
        let color = |percent| FillBand::from_percent(percent).color();
        assert_eq!(color(Some(95.0)), Color::Red);
        assert_eq!(color(Some(90.0)), Color::Red);
        assert_eq!(color(Some(75.0)), Color::Rgb(255, 165, 0));
        assert_eq!(color(Some(55.0)), Color::Yellow);
        assert_eq!(color(Some(35.0)), Color::Green);
        assert_eq!(color(Some(10.0)), Color::Blue);
        assert_eq!(color(None), Color::Blue);
    }

    #[test]
    fn alert_levels() {
        assert_eq!(AlertLevel::from_percent(Some(90.0)), Some(AlertLevel::Critical));
        assert_eq!(AlertLevel::from_percent(Some(89.9)), Some(AlertLevel::Warning));
        assert_eq!(AlertLevel::from_percent(Some(70.0)), Some(AlertLevel::Warning));
        assert_eq!(AlertLevel::from_percent(Some(69.9)), None);
        assert_eq!(AlertLevel::from_percent(None), None);
    }

    #[test]
    fn marker_requires_coordinates() {
        let record = TelemetryRecord::new("R1").with_fill(50.0);
        assert!(Marker::from_record(&record).is_none());
    }

    #[test]
    fn marker_label_shows_name_and_percent() {
        let record = TelemetryRecord::new("R1")
            .with_name("Dam A")
            .with_position(50.0, 60.0)
            .with_fill(95.0);
        let marker = Marker::from_record(&record).unwrap();
        assert_eq!(marker.label, "Dam A: 95%");
        assert_eq!(marker.band, FillBand::Critical);
        assert_eq!(marker.position, GeoPoint::new(50.0, 60.0));
    }

    #[test]
    fn upsert_replaces_marker_with_same_id() {
        let mut layer = MarkerLayer::new();
        let first = TelemetryRecord::new("R1").with_position(50.0, 60.0).with_fill(95.0);
        let second = TelemetryRecord::new("R1").with_position(51.0, 61.0).with_fill(20.0);
        layer.upsert(Marker::from_record(&first).unwrap());
        layer.upsert(Marker::from_record(&second).unwrap());

        assert_eq!(layer.len(), 1);
        let marker = layer.get(&ReservoirId::new("R1")).unwrap();
        assert_eq!(marker.band, FillBand::Low);
        assert_eq!(marker.position, GeoPoint::new(51.0, 61.0));
    }
}
