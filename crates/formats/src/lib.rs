pub mod earthquake;
pub mod geojson;
pub mod plates;

pub use earthquake::*;
pub use geojson::{FeatureCollection, GeoJsonError};
pub use plates::*;
