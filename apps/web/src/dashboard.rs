use log::{debug, info};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::style::Color;
use ratzilla::ratatui::widgets::canvas::MapResolution;

use crate::boundary::{BoundaryLayer, BORDER_OUTLINE};
use crate::camera::GlobeCamera;
use crate::reconcile::Reconciler;
use crate::store::Upsert;
use crate::telemetry::{ReservoirId, TelemetryRecord};

/// Work items for the single consumer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Raw text from the telemetry stream.
    Message(String),
    /// Record assembled by the startup catch-up.
    Record(TelemetryRecord),
    Stream(StreamStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Connecting,
    Live,
    Closed,
    Failed,
}

impl StreamStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Live => "live",
            Self::Closed => "closed",
            Self::Failed => "unreachable",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Connecting => Color::Yellow,
            Self::Live => Color::Green,
            Self::Closed => Color::Gray,
            Self::Failed => Color::Red,
        }
    }
}

/// Imagery under the boundary overlay, cycled with `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseLayer {
    #[default]
    Night,
    OutlineLow,
    OutlineHigh,
}

impl BaseLayer {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Night => Self::OutlineLow,
            Self::OutlineLow => Self::OutlineHigh,
            Self::OutlineHigh => Self::Night,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::OutlineLow => "Outline (low)",
            Self::OutlineHigh => "Outline (high)",
        }
    }

    pub const fn resolution(self) -> MapResolution {
        match self {
            Self::Night | Self::OutlineLow => MapResolution::Low,
            Self::OutlineHigh => MapResolution::High,
        }
    }

    pub const fn land_color(self) -> Color {
        match self {
            Self::Night => Color::Rgb(70, 70, 110),
            Self::OutlineLow | Self::OutlineHigh => Color::Gray,
        }
    }

    /// Background the translucent boundary is blended against.
    pub const fn background(self) -> (u8, u8, u8) {
        match self {
            Self::Night => (4, 6, 24),
            Self::OutlineLow | Self::OutlineHigh => (0, 0, 0),
        }
    }
}

/// Everything the map view renders from.
pub struct Dashboard {
    reconciler: Reconciler,
    camera: GlobeCamera,
    boundary: Option<BoundaryLayer>,
    base_layer: BaseLayer,
    selected: usize,
    stream: StreamStatus,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        let mut reconciler = Reconciler::new();
        reconciler.store_mut().on_change(|change| {
            let verb = match change.upsert {
                Upsert::Inserted => "added",
                Upsert::Replaced => "updated",
            };
            debug!(
                "reservoir {} {verb} (revision {})",
                change.record.id, change.revision
            );
        });

        Self {
            reconciler,
            camera: GlobeCamera::default(),
            boundary: None,
            base_layer: BaseLayer::default(),
            selected: 0,
            stream: StreamStatus::Connecting,
        }
    }

    pub fn apply(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Message(text) => {
                self.reconciler.apply_message(&text);
            }
            Inbound::Record(record) => {
                self.reconciler.apply(record);
            }
            Inbound::Stream(status) => {
                info!("telemetry stream {}", status.label());
                self.stream = status;
            }
        }
    }

    /// Strips polygon fills and applies the border outline before storing.
    pub fn set_boundary(&mut self, mut layer: BoundaryLayer) {
        layer.apply_outline(BORDER_OUTLINE);
        info!("boundary overlay loaded: {} polygons", layer.polygons.len());
        self.boundary = Some(layer);
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.reconciler.store().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Enter => self.focus_selected(),
            KeyCode::Char('b') => {
                self.base_layer = self.base_layer.next();
                info!("base layer: {}", self.base_layer.label());
            }
            _ => {}
        }
    }

    pub fn focus_on(&mut self, id: &ReservoirId) -> bool {
        let focused = self.camera.focus_on(id, self.reconciler.markers());
        if !focused {
            debug!("no marker for reservoir {id}, camera stays put");
        }
        focused
    }

    fn focus_selected(&mut self) {
        let Some(id) = self.selected_id().cloned() else {
            return;
        };
        self.focus_on(&id);
    }

    pub fn selected_id(&self) -> Option<&ReservoirId> {
        self.reconciler
            .store()
            .records()
            .get(self.selected)
            .map(|record| &record.id)
    }

    pub fn tick(&mut self, now_seconds: f64) {
        self.camera.tick(now_seconds);
    }

    pub const fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub const fn camera(&self) -> &GlobeCamera {
        &self.camera
    }

    pub const fn boundary(&self) -> Option<&BoundaryLayer> {
        self.boundary.as_ref()
    }

    pub const fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn stream(&self) -> StreamStatus {
        self.stream
    }
}
