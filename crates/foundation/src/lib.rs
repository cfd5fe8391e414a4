pub mod bounds;
pub mod ids;
pub mod latlng;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use ids::*;
pub use latlng::*;
pub use time::*;
