use serde::Serialize;

use crate::layer::{Layer, LayerId, layer_id};

pub const MAPBOX_URL_TEMPLATE: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

pub const MAPBOX_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, \
<a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, \
Imagery \u{a9} <a href=\"https://www.mapbox.com/\">Mapbox</a>";

pub const DEFAULT_MAX_ZOOM: u8 = 18;

/// Display name and style id of each base map, in layer-control order.
pub const MAPBOX_STYLES: [(&str, &str); 6] = [
    ("Streets-Satellite", "mapbox.streets-satellite"),
    ("Street Map", "mapbox.streets"),
    ("Dark Map", "mapbox.dark"),
    ("Satellite", "mapbox.satellite"),
    ("Pirates", "mapbox.pirates"),
    ("High Contrast", "mapbox.high-contrast"),
];

pub const DEFAULT_BASE_LAYER: &str = "Streets-Satellite";

/// Settings shared by every base layer of one tile provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TileProvider {
    pub url_template: String,
    pub access_token: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileProvider {
    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self {
            url_template: MAPBOX_URL_TEMPLATE.to_string(),
            access_token: access_token.into(),
            attribution: MAPBOX_ATTRIBUTION.to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// One base layer per entry of `styles`, ids assigned from `first_id`.
    pub fn base_layers(&self, styles: &[(&str, &str)], first_id: u64) -> Vec<BaseLayer> {
        styles
            .iter()
            .zip(first_id..)
            .map(|(&(name, style_id), id)| BaseLayer {
                id: LayerId(id),
                name: name.to_string(),
                style_id: style_id.to_string(),
                url_template: self.url_template.clone(),
                access_token: self.access_token.clone(),
                attribution: self.attribution.clone(),
                max_zoom: self.max_zoom,
                active: false,
            })
            .collect()
    }
}

/// A mutually exclusive background tile set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseLayer {
    #[serde(serialize_with = "layer_id")]
    pub id: LayerId,
    pub name: String,
    pub style_id: String,
    pub url_template: String,
    pub access_token: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub active: bool,
}

impl Layer for BaseLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
