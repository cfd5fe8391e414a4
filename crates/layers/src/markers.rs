use chrono::{DateTime, Utc};
use formats::Earthquake;
use foundation::{EpochMillis, LatLng};
use serde::Serialize;

use crate::html::escape_html;
use crate::layer::lat_lng;
use crate::symbology::{MARKER_FILL_OPACITY, marker_color, marker_size};

/// A circle sized and colored by magnitude, with its popup content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    #[serde(rename = "center", serialize_with = "lat_lng")]
    pub position: LatLng,
    pub radius: f64,
    pub color: &'static str,
    pub fill_opacity: f64,
    pub popup: String,
}

impl CircleMarker {
    pub fn from_earthquake(quake: &Earthquake) -> Self {
        Self {
            position: quake.position(),
            radius: marker_size(quake.magnitude),
            color: marker_color(quake.magnitude),
            fill_opacity: MARKER_FILL_OPACITY,
            popup: popup_html(quake),
        }
    }
}

/// Magnitude, place, then time.
pub fn popup_html(quake: &Earthquake) -> String {
    format!(
        "<h2>{} magnitude</h2><hr><h4>{}</h4><p>{}</p>",
        quake.magnitude,
        escape_html(&quake.place),
        format_timestamp(quake.time)
    )
}

/// Human-readable UTC rendering of a feed timestamp.
pub fn format_timestamp(time: Option<EpochMillis>) -> String {
    time.and_then(|t| DateTime::<Utc>::from_timestamp_millis(t.0))
        .map(|dt| dt.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}
