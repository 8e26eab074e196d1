//! Country boundary overlay loaded from GeoJSON.
//!
//! Polygons arrive filled, the way a GeoJSON data source styles them by
//! default. The dashboard strips the fill and draws only a translucent
//! outline on top of the base layer.

use ratzilla::ratatui::style::Color;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported GeoJSON object type: {0}")]
    UnsupportedType(String),
    #[error("malformed coordinates in {0}")]
    Coordinates(&'static str),
    #[error("no polygon or line geometry found")]
    Empty,
}

/// RGB color with an alpha channel, blended against the map background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn blend_over(self, background: (u8, u8, u8)) -> Color {
        let mix = |fg: u8, bg: u8| {
            let value = (f64::from(fg) - f64::from(bg)).mul_add(self.alpha, f64::from(bg));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let channel = value.round().clamp(0.0, 255.0) as u8;
            channel
        };
        Color::Rgb(
            mix(self.r, background.0),
            mix(self.g, background.1),
            mix(self.b, background.2),
        )
    }
}

pub const CYAN: Rgba = Rgba::opaque(0, 255, 255);
const DEFAULT_FILL: Rgba = Rgba::opaque(255, 255, 0).with_alpha(0.5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Rgba,
    pub width: u8,
}

/// Neon country border: no fill, cyan at 80% opacity, width 4.
pub const BORDER_OUTLINE: Outline = Outline {
    color: CYAN.with_alpha(0.8),
    width: 4,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    /// Rings of `(lon, lat)` pairs.
    pub rings: Vec<Vec<(f64, f64)>>,
    pub fill: Option<Rgba>,
    pub outline: Option<Outline>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryLayer {
    pub polygons: Vec<BoundaryPolygon>,
}

impl BoundaryLayer {
    pub fn from_geojson(text: &str) -> Result<Self, BoundaryError> {
        let value: Value = serde_json::from_str(text)?;
        let mut polygons = Vec::new();
        collect_object(&value, &mut polygons)?;
        if polygons.is_empty() {
            return Err(BoundaryError::Empty);
        }
        Ok(Self { polygons })
    }

    pub fn apply_outline(&mut self, outline: Outline) {
        for polygon in &mut self.polygons {
            polygon.fill = None;
            polygon.outline = Some(outline);
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64), Outline)> + '_ {
        self.polygons.iter().flat_map(|polygon| {
            let outline = polygon.outline;
            polygon.rings.iter().flat_map(move |ring| {
                ring.windows(2)
                    .filter_map(move |pair| outline.map(|outline| (pair[0], pair[1], outline)))
            })
        })
    }
}

fn collect_object(value: &Value, out: &mut Vec<BoundaryPolygon>) -> Result<(), BoundaryError> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or(BoundaryError::Coordinates("FeatureCollection"))?;
            for feature in features {
                collect_object(feature, out)?;
            }
            Ok(())
        }
        "Feature" => match value.get("geometry") {
            Some(Value::Null) | None => Ok(()),
            Some(geometry) => collect_object(geometry, out),
        },
        "GeometryCollection" => {
            let geometries = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or(BoundaryError::Coordinates("GeometryCollection"))?;
            for geometry in geometries {
                collect_object(geometry, out)?;
            }
            Ok(())
        }
        "Polygon" => {
            out.push(filled(rings(coordinates(value, "Polygon")?, "Polygon")?));
            Ok(())
        }
        "MultiPolygon" => {
            let parts = coordinates(value, "MultiPolygon")?
                .as_array()
                .ok_or(BoundaryError::Coordinates("MultiPolygon"))?;
            for part in parts {
                out.push(filled(rings(part, "MultiPolygon")?));
            }
            Ok(())
        }
        "LineString" => {
            out.push(filled(vec![ring(coordinates(value, "LineString")?, "LineString")?]));
            Ok(())
        }
        "MultiLineString" => {
            out.push(filled(rings(
                coordinates(value, "MultiLineString")?,
                "MultiLineString",
            )?));
            Ok(())
        }
        "Point" | "MultiPoint" => Ok(()),
        other => Err(BoundaryError::UnsupportedType(other.to_string())),
    }
}

fn filled(rings: Vec<Vec<(f64, f64)>>) -> BoundaryPolygon {
    BoundaryPolygon {
        rings,
        fill: Some(DEFAULT_FILL),
        outline: None,
    }
}

fn coordinates<'a>(value: &'a Value, kind: &'static str) -> Result<&'a Value, BoundaryError> {
    value
        .get("coordinates")
        .ok_or(BoundaryError::Coordinates(kind))
}

fn rings(value: &Value, kind: &'static str) -> Result<Vec<Vec<(f64, f64)>>, BoundaryError> {
    value
        .as_array()
        .ok_or(BoundaryError::Coordinates(kind))?
        .iter()
        .map(|item| ring(item, kind))
        .collect()
}

fn ring(value: &Value, kind: &'static str) -> Result<Vec<(f64, f64)>, BoundaryError> {
    value
        .as_array()
        .ok_or(BoundaryError::Coordinates(kind))?
        .iter()
        .map(|position| {
            let pair = position.as_array().ok_or(BoundaryError::Coordinates(kind))?;
            match (
                pair.first().and_then(Value::as_f64),
                pair.get(1).and_then(Value::as_f64),
            ) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(BoundaryError::Coordinates(kind)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "test"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[50.0, 40.0], [80.0, 40.0], [80.0, 55.0], [50.0, 55.0], [50.0, 40.0]]]
                }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]],
                        [[[3.0, 3.0], [4.0, 3.0], [4.0, 4.0], [3.0, 3.0]]]
                    ]
                }
            },
            {"type": "Feature", "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let layer = BoundaryLayer::from_geojson(SQUARE).unwrap();
        assert_eq!(layer.polygons.len(), 3);
        assert_eq!(layer.polygons[0].rings[0].len(), 5);
        assert_eq!(layer.polygons[0].rings[0][1], (80.0, 40.0));
        assert!(layer.polygons.iter().all(|p| p.fill.is_some()));
    }

    #[test]
    fn outline_strips_fill() {
        let mut layer = BoundaryLayer::from_geojson(SQUARE).unwrap();
        assert_eq!(layer.segments().count(), 0);

        layer.apply_outline(BORDER_OUTLINE);
        assert!(layer.polygons.iter().all(|p| p.fill.is_none()));
        assert!(layer
            .polygons
            .iter()
            .all(|p| p.outline == Some(BORDER_OUTLINE)));
        assert_eq!(layer.segments().count(), 4 + 3 + 3);
    }

    #[test]
    fn translucent_cyan_blends_over_black() {
        assert_eq!(
            BORDER_OUTLINE.color.blend_over((0, 0, 0)),
            Color::Rgb(0, 204, 204)
        );
        assert_eq!(BORDER_OUTLINE.width, 4);
    }

    #[test]
    fn broken_files_are_errors() {
        assert!(matches!(
            BoundaryLayer::from_geojson("{"),
            Err(BoundaryError::Json(_))
        ));
        assert!(matches!(
            BoundaryLayer::from_geojson(r#"{"type":"Point","coordinates":[1,2]}"#),
            Err(BoundaryError::Empty)
        ));
        assert!(matches!(
            BoundaryLayer::from_geojson(r#"{"type":"Polygon","coordinates":[[[1]]]}"#),
            Err(BoundaryError::Coordinates("Polygon"))
        ));
        assert!(matches!(
            BoundaryLayer::from_geojson(r#"{"type":"Topology"}"#),
            Err(BoundaryError::UnsupportedType(_))
        ));
    }
}
