//! Visual encodings shared by markers and the legend.

use serde::Serialize;

/// Meters of circle radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 10_000.0;

/// Fill opacity applied to every earthquake circle.
pub const MARKER_FILL_OPACITY: f64 = 0.5;

/// Circle radius in meters for a magnitude. Unclamped: negative or
/// non-finite input yields negative or non-finite output.
pub fn marker_size(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Color bucket for a magnitude. Buckets are half-open, so a value on a
/// boundary lands in the upper bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MagnitudeBand {
    Below1,
    From1,
    From2,
    From3,
    From4,
    From5,
    From6,
    From7,
    From8,
    /// NaN fails every comparison.
    Unclassified,
}

impl MagnitudeBand {
    pub fn classify(magnitude: f64) -> Self {
        if magnitude < 1.0 {
            MagnitudeBand::Below1
        } else if magnitude < 2.0 {
            MagnitudeBand::From1
        } else if magnitude < 3.0 {
            MagnitudeBand::From2
        } else if magnitude < 4.0 {
            MagnitudeBand::From3
        } else if magnitude < 5.0 {
            MagnitudeBand::From4
        } else if magnitude < 6.0 {
            MagnitudeBand::From5
        } else if magnitude < 7.0 {
            MagnitudeBand::From6
        } else if magnitude < 8.0 {
            MagnitudeBand::From7
        } else if magnitude >= 8.0 {
            MagnitudeBand::From8
        } else {
            MagnitudeBand::Unclassified
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            MagnitudeBand::Below1 => "#4ecc00",
            MagnitudeBand::From1 => "#bfff00",
            MagnitudeBand::From2 => "#ffff00",
            MagnitudeBand::From3 => "#ffbf00",
            MagnitudeBand::From4 => "#ff8000",
            MagnitudeBand::From5 => "#ff3000",
            MagnitudeBand::From6 => "#cc0000",
            MagnitudeBand::From7 => "#990000",
            MagnitudeBand::From8 => "#660c00",
            MagnitudeBand::Unclassified => "#000000",
        }
    }
}

pub fn marker_color(magnitude: f64) -> &'static str {
    MagnitudeBand::classify(magnitude).color()
}

/// Leaflet path options for vector overlays.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl PathStyle {
    pub const fn new(color: &'static str, weight: f64, fill_opacity: f64) -> Self {
        Self {
            color,
            weight,
            fill_opacity,
        }
    }
}

/// Outline-only stroke for plate boundaries.
pub const PLATE_STYLE: PathStyle = PathStyle::new("#FF4b00", 3.0, 0.0);
