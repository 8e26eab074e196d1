/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a point only when both coordinates are present, finite and in range.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        let point = Self::new(lat?, lon?);
        point.is_valid().then_some(point)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lat: (other.lat - self.lat).mul_add(t, self.lat),
            lon: (other.lon - self.lon).mul_add(t, self.lon),
        }
    }
}
