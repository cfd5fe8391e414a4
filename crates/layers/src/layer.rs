use foundation::LatLng;
use serde::Serializer;

pub use foundation::LayerId;

/// Anything listed in the layer control.
pub trait Layer {
    fn id(&self) -> LayerId;
    fn name(&self) -> &str;
}

/// Serializes a position as Leaflet's `[lat, lng]` pair.
pub(crate) fn lat_lng<S: Serializer>(p: &LatLng, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(p.to_array())
}

pub(crate) fn layer_id<S: Serializer>(id: &LayerId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(id.0)
}
