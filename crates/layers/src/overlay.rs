use formats::{EarthquakeFeed, PlateCollection, PlateSummary};
use serde::Serialize;
use serde_json::Value;

use crate::layer::{Layer, LayerId, layer_id};
use crate::markers::CircleMarker;
use crate::symbology::{PLATE_STYLE, PathStyle};

pub const EARTHQUAKES_NAME: &str = "Earthquakes";
pub const PLATES_NAME: &str = "Tectonic Plates";

/// Markers built from one earthquake feed.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeOverlay {
    pub title: Option<String>,
    pub markers: Vec<CircleMarker>,
    pub skipped: usize,
}

impl EarthquakeOverlay {
    pub fn from_feed(feed: &EarthquakeFeed) -> Self {
        Self {
            title: feed.title.clone(),
            markers: feed
                .earthquakes
                .iter()
                .map(CircleMarker::from_earthquake)
                .collect(),
            skipped: feed.skipped,
        }
    }
}

/// Plate geometry drawn as outline-only polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateOverlay {
    pub data: Value,
    pub style: PathStyle,
    pub summary: PlateSummary,
}

impl PlateOverlay {
    pub fn from_collection(plates: PlateCollection) -> Self {
        Self {
            data: plates.raw,
            style: PLATE_STYLE,
            summary: plates.summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayContent {
    Circles { markers: Vec<CircleMarker> },
    #[serde(rename = "geojson")]
    GeoJson { data: Value, style: PathStyle },
}

/// A toggleable group in the rendered map. `loaded` is false while the
/// group's feed has not delivered; the group is then listed but empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLayer {
    #[serde(serialize_with = "layer_id")]
    pub id: LayerId,
    pub name: String,
    pub active: bool,
    pub loaded: bool,
    #[serde(flatten)]
    pub content: OverlayContent,
}

impl OverlayLayer {
    pub fn earthquakes(id: LayerId, overlay: Option<&EarthquakeOverlay>) -> Self {
        Self {
            id,
            name: EARTHQUAKES_NAME.to_string(),
            active: true,
            loaded: overlay.is_some(),
            content: OverlayContent::Circles {
                markers: overlay.map(|o| o.markers.clone()).unwrap_or_default(),
            },
        }
    }

    pub fn plates(id: LayerId, overlay: Option<&PlateOverlay>) -> Self {
        Self {
            id,
            name: PLATES_NAME.to_string(),
            active: true,
            loaded: overlay.is_some(),
            content: OverlayContent::GeoJson {
                data: overlay.map(|o| o.data.clone()).unwrap_or(Value::Null),
                style: overlay.map(|o| o.style).unwrap_or(PLATE_STYLE),
            },
        }
    }

    pub fn len(&self) -> usize {
        match &self.content {
            OverlayContent::Circles { markers } => markers.len(),
            OverlayContent::GeoJson { data, .. } => data
                .get("features")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Layer for OverlayLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::{EarthquakeOverlay, OverlayLayer, PlateOverlay};
    use crate::layer::LayerId;
    use formats::{EarthquakeFeed, PlateCollection};
    use serde_json::json;

    fn feed() -> EarthquakeFeed {
        EarthquakeFeed::from_geojson_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"mag": 4.2, "place": "A", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]}},
                {"type": "Feature", "properties": {"mag": 0.3, "place": "B", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [4.0, 5.0, 6.0]}}
            ]
        }))
        .expect("feed")
    }

    #[test]
    fn one_marker_per_feature() {
        let overlay = EarthquakeOverlay::from_feed(&feed());
        assert_eq!(overlay.markers.len(), 2);
        assert_eq!(overlay.markers[0].color, "#ff8000");
        assert_eq!(overlay.markers[1].color, "#4ecc00");
    }

    #[test]
    fn missing_overlay_is_listed_empty() {
        let layer = OverlayLayer::plates(LayerId(2), None);
        assert!(!layer.loaded);
        assert!(layer.is_empty());
        let v = serde_json::to_value(&layer).expect("serialize");
        assert_eq!(v["kind"], "geojson");
        assert_eq!(v["data"], serde_json::Value::Null);
        assert_eq!(v["style"]["color"], "#FF4b00");
        assert_eq!(v["style"]["weight"], json!(3.0));
        assert_eq!(v["style"]["fillOpacity"], json!(0.0));
    }

    #[test]
    fn plate_overlay_keeps_geojson() {
        let value = json!({"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
        ]});
        let plates = PlateCollection::from_geojson_value(value.clone()).expect("plates");
        let overlay = PlateOverlay::from_collection(plates);
        let layer = OverlayLayer::plates(LayerId(2), Some(&overlay));
        assert!(layer.loaded);
        assert_eq!(layer.len(), 1);
        let v = serde_json::to_value(&layer).expect("serialize");
        assert_eq!(v["data"], value);
    }

    #[test]
    fn earthquake_layer_serializes_as_circles() {
        let overlay = EarthquakeOverlay::from_feed(&feed());
        let layer = OverlayLayer::earthquakes(LayerId(1), Some(&overlay));
        let v = serde_json::to_value(&layer).expect("serialize");
        assert_eq!(v["kind"], "circles");
        assert_eq!(v["name"], "Earthquakes");
        assert_eq!(v["id"], 1);
        assert_eq!(v["markers"].as_array().map(Vec::len), Some(2));
    }
}
