use std::fmt::Write as _;

use serde::Serialize;

use crate::symbology::marker_color;

/// Magnitude thresholds listed in the legend, ascending.
pub const LEGEND_MAGNITUDES: [u32; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Corner a Leaflet control is anchored to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub threshold: u32,
    pub color: &'static str,
    /// Upper bound of the range, `None` for the open-ended last row.
    pub upper: Option<u32>,
}

impl LegendEntry {
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{} \u{2013} {}", self.threshold, upper),
            None => format!("{} +", self.threshold),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: ControlPosition,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// The magnitude color key: one row per threshold, each swatch colored
    /// by the same function that colors the markers.
    pub fn magnitude_scale() -> Self {
        let entries = LEGEND_MAGNITUDES
            .iter()
            .enumerate()
            .map(|(i, &threshold)| LegendEntry {
                threshold,
                color: marker_color(f64::from(threshold)),
                upper: LEGEND_MAGNITUDES.get(i + 1).copied(),
            })
            .collect();
        Self {
            position: ControlPosition::BottomRight,
            entries,
        }
    }

    /// Inner HTML of the legend control: a swatch `<i>` then the range label,
    /// rows separated by `<br>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for entry in &self.entries {
            let _ = write!(html, "<i style='background:{}'></i>{}", entry.color, entry.threshold);
            match entry.upper {
                Some(upper) => {
                    let _ = write!(html, " &ndash; {upper}<br>");
                }
                None => html.push_str(" +"),
            }
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPosition, Legend};

    #[test]
    fn nine_ascending_rows() {
        let legend = Legend::magnitude_scale();
        assert_eq!(legend.position, ControlPosition::BottomRight);
        assert_eq!(legend.entries.len(), 9);
        let thresholds: Vec<u32> = legend.entries.iter().map(|e| e.threshold).collect();
        assert_eq!(thresholds, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn labels_are_ranges_except_last() {
        let legend = Legend::magnitude_scale();
        assert_eq!(legend.entries[0].label(), "0 \u{2013} 1");
        assert_eq!(legend.entries[3].label(), "3 \u{2013} 4");
        assert_eq!(legend.entries[8].label(), "8 +");
    }

    #[test]
    fn swatches_use_marker_colors() {
        let legend = Legend::magnitude_scale();
        assert_eq!(legend.entries[0].color, "#4ecc00");
        assert_eq!(legend.entries[3].color, "#ffbf00");
        assert_eq!(legend.entries[8].color, "#660c00");
    }

    #[test]
    fn html_rows_in_order() {
        let html = Legend::magnitude_scale().to_html();
        assert!(html.starts_with("<i style='background:#4ecc00'></i>0 &ndash; 1<br>"));
        assert!(html.ends_with("<i style='background:#660c00'></i>8 +"));
        assert_eq!(html.matches("<br>").count(), 8);
        let first = html.find("#bfff00").expect("row 1");
        let last = html.find("#990000").expect("row 7");
        assert!(first < last);
    }
}
