/// Instant expressed as milliseconds since the Unix epoch, as carried by
/// GeoJSON feeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochMillis(pub i64);
