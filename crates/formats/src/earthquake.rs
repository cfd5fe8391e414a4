//! Decoder for USGS earthquake summary feeds.
//!
//! Feed layout: <https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php>

use foundation::{EpochMillis, LatLng};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One seismic event as published by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Earthquake {
    pub id: Option<String>,
    pub magnitude: f64,
    pub place: String,
    pub time: Option<EpochMillis>,
    /// `[lon, lat, depth_km]`, in feed order.
    pub coordinates: [f64; 3],
}

impl Earthquake {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn depth_km(&self) -> f64 {
        self.coordinates[2]
    }

    pub fn position(&self) -> LatLng {
        LatLng::from_lon_lat(self.longitude(), self.latitude())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeed {
    pub title: Option<String>,
    pub generated: Option<EpochMillis>,
    pub earthquakes: Vec<Earthquake>,
    /// Features dropped for lacking a magnitude or a position.
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedFormatError {
    #[error("malformed earthquake feed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, found {0:?}")]
    UnexpectedType(String),
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    metadata: Value,
    /// Kept as raw values so one malformed feature cannot reject the feed.
    #[serde(default)]
    features: Option<Vec<Value>>,
}

impl EarthquakeFeed {
    pub fn from_geojson_str(payload: &str) -> Result<Self, FeedFormatError> {
        let raw: RawCollection = serde_json::from_str(payload)?;
        Self::from_raw(raw)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, FeedFormatError> {
        let raw: RawCollection = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCollection) -> Result<Self, FeedFormatError> {
        if raw.kind != "FeatureCollection" {
            return Err(FeedFormatError::UnexpectedType(raw.kind));
        }

        let features = raw.features.unwrap_or_default();
        let mut skipped = 0;
        let mut earthquakes = Vec::with_capacity(features.len());
        for feature in &features {
            match decode_feature(feature) {
                Some(quake) => earthquakes.push(quake),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "dropped earthquake features without magnitude or position");
        }

        Ok(Self {
            title: raw.metadata.get("title").and_then(Value::as_str).map(str::to_string),
            generated: raw.metadata.get("generated").and_then(Value::as_i64).map(EpochMillis),
            earthquakes,
            skipped,
        })
    }
}

/// `None` unless the feature carries a numeric `mag` and a numeric
/// `[lon, lat]` pair. Other fields fall back to defaults.
fn decode_feature(feature: &Value) -> Option<Earthquake> {
    let properties = feature.get("properties");
    let magnitude = properties?.get("mag")?.as_f64()?;

    let coords = feature.get("geometry")?.get("coordinates")?.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    let depth = coords.get(2).and_then(Value::as_f64).unwrap_or(0.0);

    let id = match feature.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let place = properties
        .and_then(|p| p.get("place"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let time = properties
        .and_then(|p| p.get("time"))
        .and_then(Value::as_i64)
        .map(EpochMillis);

    Some(Earthquake {
        id,
        magnitude,
        place,
        time,
        coordinates: [lon, lat, depth],
    })
}
