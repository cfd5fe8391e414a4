//! Assembly of the complete map description handed to the browser.

use foundation::{LatLng, LayerId};
use serde::Serialize;

use crate::layer::{Layer, lat_lng};
use crate::legend::{ControlPosition, Legend};
use crate::overlay::{EarthquakeOverlay, OverlayLayer, PlateOverlay};
use crate::tiles::{BaseLayer, DEFAULT_BASE_LAYER, MAPBOX_STYLES, TileProvider};

pub const MAP_CONTAINER_ID: &str = "map";

const FIRST_BASE_LAYER_ID: u64 = 1;
const EARTHQUAKES_LAYER_ID: LayerId = LayerId(100);
const PLATES_LAYER_ID: LayerId = LayerId(101);

/// Initial camera and base-layer selection.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub container_id: String,
    pub center: LatLng,
    pub zoom: u8,
    pub default_base: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            container_id: MAP_CONTAINER_ID.to_string(),
            center: LatLng::new(37.09, -95.71),
            zoom: 5,
            default_base: DEFAULT_BASE_LAYER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
    pub position: ControlPosition,
}

impl Default for LayerControl {
    fn default() -> Self {
        Self {
            collapsed: true,
            position: ControlPosition::TopRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendControl {
    pub position: ControlPosition,
    pub html: String,
    pub entries: Vec<LegendRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRow {
    pub color: &'static str,
    pub label: String,
}

impl From<&Legend> for LegendControl {
    fn from(legend: &Legend) -> Self {
        Self {
            position: legend.position,
            html: legend.to_html(),
            entries: legend
                .entries
                .iter()
                .map(|e| LegendRow {
                    color: e.color,
                    label: e.label(),
                })
                .collect(),
        }
    }
}

/// Everything the page bootstrap needs to construct the Leaflet map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub container_id: String,
    #[serde(serialize_with = "lat_lng")]
    pub center: LatLng,
    pub zoom: u8,
    pub base_layers: Vec<BaseLayer>,
    pub overlays: Vec<OverlayLayer>,
    pub legend: LegendControl,
    pub layer_control: LayerControl,
}

impl MapDocument {
    pub fn active_base(&self) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|l| l.active)
    }

    pub fn overlay(&self, name: &str) -> Option<&OverlayLayer> {
        self.overlays.iter().find(|o| o.name() == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("unknown base layer {name:?} (available: {available})")]
    UnknownBaseLayer { name: String, available: String },
    #[error("no base layers configured")]
    NoBaseLayers,
}

/// Builds map documents from whichever overlays have arrived. The fixed
/// parts (base layers, legend, control) are computed once up front.
#[derive(Debug, Clone)]
pub struct MapBuilder {
    view: MapView,
    base_layers: Vec<BaseLayer>,
    legend: LegendControl,
    control: LayerControl,
}

impl MapBuilder {
    pub fn new(view: MapView, provider: &TileProvider) -> Result<Self, MapError> {
        Self::with_base_layers(view, provider.base_layers(&MAPBOX_STYLES, FIRST_BASE_LAYER_ID))
    }

    pub fn with_base_layers(
        view: MapView,
        mut base_layers: Vec<BaseLayer>,
    ) -> Result<Self, MapError> {
        if base_layers.is_empty() {
            return Err(MapError::NoBaseLayers);
        }
        let Some(default) = base_layers
            .iter()
            .position(|l| l.name == view.default_base)
        else {
            let available = base_layers
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(MapError::UnknownBaseLayer {
                name: view.default_base.clone(),
                available,
            });
        };
        base_layers[default].active = true;

        Ok(Self {
            view,
            base_layers,
            legend: LegendControl::from(&Legend::magnitude_scale()),
            control: LayerControl::default(),
        })
    }

    pub fn build(
        &self,
        earthquakes: Option<&EarthquakeOverlay>,
        plates: Option<&PlateOverlay>,
    ) -> MapDocument {
        MapDocument {
            container_id: self.view.container_id.clone(),
            center: self.view.center,
            zoom: self.view.zoom,
            base_layers: self.base_layers.clone(),
            overlays: vec![
                OverlayLayer::earthquakes(EARTHQUAKES_LAYER_ID, earthquakes),
                OverlayLayer::plates(PLATES_LAYER_ID, plates),
            ],
            legend: self.legend.clone(),
            layer_control: self.control.clone(),
        }
    }
}
