use crate::animation::FrameClock;
use crate::geo::GeoPoint;
use crate::marker::MarkerLayer;
use crate::telemetry::ReservoirId;

pub const FLIGHT_DURATION_SECS: f64 = 1.5;
pub const FOCUS_ALTITUDE_M: f64 = 600_000.0;

const METERS_PER_DEGREE: f64 = 111_320.0;
// tan(30°): half of a 60° vertical field of view.
const HALF_FOV_TAN: f64 = 0.577_350_269_189_625_8;

/// Top-down camera over the configured region.
pub const HOME_POSE: CameraPose = CameraPose {
    center: GeoPoint::new(48.0, 67.0),
    altitude_m: 2_400_000.0,
    heading_deg: 0.0,
    pitch_deg: -90.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub center: GeoPoint,
    pub altitude_m: f64,
    pub heading_deg: f64,
    pub pitch_deg: f64,
}

/// Visible longitude/latitude window, ready for canvas bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub lon: [f64; 2],
    pub lat: [f64; 2],
}

impl ViewBounds {
    pub fn lat_span(&self) -> f64 {
        self.lat[1] - self.lat[0]
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.lon[0]..=self.lon[1]).contains(&point.lon)
            && (self.lat[0]..=self.lat[1]).contains(&point.lat)
    }
}

impl CameraPose {
    /// `aspect` is the width/height ratio of the render area in square units.
    pub fn view_bounds(&self, aspect: f64) -> ViewBounds {
        let half_lat = self.altitude_m * HALF_FOV_TAN / METERS_PER_DEGREE;
        let shrink = self.center.lat.to_radians().cos().max(0.1);
        let half_lon = half_lat * aspect.max(0.1) / shrink;
        ViewBounds {
            lon: [self.center.lon - half_lon, self.center.lon + half_lon],
            lat: [self.center.lat - half_lat, self.center.lat + half_lat],
        }
    }

    fn interpolate(self, target: Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(target.center, t),
            altitude_m: (target.altitude_m - self.altitude_m).mul_add(t, self.altitude_m),
            heading_deg: target.heading_deg,
            pitch_deg: target.pitch_deg,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: CameraPose,
    to: CameraPose,
    elapsed: f64,
}

#[derive(Debug, Clone)]
pub struct GlobeCamera {
    pose: CameraPose,
    flight: Option<Flight>,
    clock: FrameClock,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self::new(HOME_POSE)
    }
}

impl GlobeCamera {
    pub const fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            flight: None,
            clock: FrameClock::new(),
        }
    }

    pub const fn pose(&self) -> CameraPose {
        self.pose
    }

    pub const fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Starts a flight towards `target`, replacing any flight in progress.
    pub fn fly_to(&mut self, target: GeoPoint) {
        self.fly_to_pose(CameraPose {
            center: target,
            altitude_m: FOCUS_ALTITUDE_M,
            ..HOME_POSE
        });
    }

    fn fly_to_pose(&mut self, to: CameraPose) {
        self.flight = Some(Flight {
            from: self.pose,
            to,
            elapsed: 0.0,
        });
    }

    /// Flies to the marker with this id. Returns `false` and leaves the camera
    /// alone when there is no such marker.
    pub fn focus_on(&mut self, id: &ReservoirId, markers: &MarkerLayer) -> bool {
        let Some(marker) = markers.get(id) else {
            return false;
        };
        self.fly_to(marker.position);
        true
    }

    /// Advances any flight using the frame timestamp in seconds.
    pub fn tick(&mut self, now_seconds: f64) {
        let delta = self.clock.advance(now_seconds);
        let Some(flight) = self.flight.as_mut() else {
            return;
        };

        flight.elapsed += delta;
        let t = (flight.elapsed / FLIGHT_DURATION_SECS).clamp(0.0, 1.0);
        let eased = t * t * 2.0f64.mul_add(-t, 3.0);
        self.pose = flight.from.interpolate(flight.to, eased);

        if t >= 1.0 {
            self.pose = flight.to;
            self.flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;
    use crate::telemetry::TelemetryRecord;

    fn layer_with(id: &str, lat: f64, lon: f64) -> MarkerLayer {
        let mut layer = MarkerLayer::new();
        let record = TelemetryRecord::new(id).with_position(lat, lon);
        layer.upsert(Marker::from_record(&record).unwrap());
        layer
    }

    #[test]
    fn home_pose_looks_straight_down_over_region() {
        let camera = GlobeCamera::default();
        let pose = camera.pose();
        assert_eq!(pose.center, GeoPoint::new(48.0, 67.0));
        assert!((pose.altitude_m - 2_400_000.0).abs() < f64::EPSILON);
        assert!((pose.pitch_deg + 90.0).abs() < f64::EPSILON);
        assert!(pose.heading_deg.abs() < f64::EPSILON);
    }

    #[test]
    fn home_view_covers_the_region() {
        let bounds = HOME_POSE.view_bounds(1.25);
        assert!(bounds.contains(GeoPoint::new(41.0, 50.0)));
        assert!(bounds.contains(GeoPoint::new(55.0, 85.0)));
        assert!(!bounds.contains(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn focus_on_unknown_marker_is_a_noop() {
        let mut camera = GlobeCamera::default();
        let layer = layer_with("R1", 50.0, 60.0);
        assert!(!camera.focus_on(&ReservoirId::new("missing"), &layer));
        assert!(!camera.is_flying());
        camera.tick(0.0);
        camera.tick(0.2);
        assert_eq!(camera.pose(), HOME_POSE);
    }

    #[test]
    fn focus_on_marker_arrives_after_flight_duration() {
        let mut camera = GlobeCamera::default();
        let layer = layer_with("R1", 50.0, 60.0);
        assert!(camera.focus_on(&ReservoirId::new("R1"), &layer));

        camera.tick(100.0);
        camera.tick(100.2);
        assert!(camera.is_flying());
        let midway = camera.pose().center;
        assert!(midway.lat > 48.0 && midway.lat < 50.0);

        let mut now = 100.2;
        while now < 101.6 {
            now += 0.2;
            camera.tick(now);
        }

        assert!(!camera.is_flying());
        assert_eq!(camera.pose().center, GeoPoint::new(50.0, 60.0));
        assert!((camera.pose().altitude_m - FOCUS_ALTITUDE_M).abs() < f64::EPSILON);
    }
}
