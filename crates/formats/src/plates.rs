use foundation::Aabb2;
use serde_json::Value;
use tracing::debug;

use crate::geojson::{FeatureCollection, GeoJsonError, Geometry, GeometryKind};

/// Tectonic plate geometry, kept verbatim for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateCollection {
    pub raw: Value,
    pub summary: PlateSummary,
}

/// Best-effort description of the payload, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlateSummary {
    pub features: usize,
    /// Features the summary could not read; they still reach the renderer.
    pub unsummarized: usize,
    pub lines: usize,
    pub areas: usize,
    pub vertices: usize,
    pub bounds: Option<Aabb2>,
}

impl PlateSummary {
    fn of(fc: &FeatureCollection, unsummarized: usize) -> Self {
        Self {
            features: fc.features.len(),
            unsummarized,
            lines: fc.count_kind(GeometryKind::Line),
            areas: fc.count_kind(GeometryKind::Area),
            vertices: fc
                .features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .map(Geometry::vertex_count)
                .sum(),
            bounds: fc.bounds(),
        }
    }
}

impl PlateCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(value)
    }

    /// Accepts any JSON object without altering it. Only FeatureCollections
    /// are summarized; any other GeoJSON object gets an empty summary.
    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        if !value.is_object() {
            return Err(GeoJsonError::NotAnObject);
        }
        let summary = match FeatureCollection::from_geojson_value_lossy(&value) {
            Ok((fc, unsummarized)) => PlateSummary::of(&fc, unsummarized),
            Err(err) => {
                debug!("plate payload not summarized: {err}");
                PlateSummary::default()
            }
        };
        Ok(Self {
            raw: value,
            summary,
        })
    }
}
