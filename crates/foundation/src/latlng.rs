/// Geographic position, latitude first, in degrees.
///
/// GeoJSON positions are `[lon, lat, (alt)]`; convert them with
/// [`LatLng::from_lon_lat`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a position from GeoJSON coordinate order.
    pub const fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lng: lon }
    }

    /// `[lat, lng]`, the order Leaflet expects.
    pub const fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn lon_lat_order_is_swapped() {
        let p = LatLng::from_lon_lat(-95.71, 37.09);
        assert_eq!(p.lat, 37.09);
        assert_eq!(p.lng, -95.71);
        assert_eq!(p.to_array(), [37.09, -95.71]);
    }
}
