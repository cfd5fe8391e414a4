pub mod html;
pub mod layer;
pub mod legend;
pub mod map;
pub mod markers;
pub mod overlay;
pub mod symbology;
pub mod tiles;

pub use layer::*;
pub use legend::{ControlPosition, Legend, LegendEntry};
pub use map::{MapBuilder, MapDocument, MapError, MapView};
pub use markers::CircleMarker;
pub use overlay::{EarthquakeOverlay, OverlayLayer, PlateOverlay};
pub use symbology::{MagnitudeBand, marker_color, marker_size};
pub use tiles::{BaseLayer, TileProvider};
