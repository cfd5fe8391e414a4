//! Minimal GeoJSON FeatureCollection reader.
//!
//! Only the structure needed to validate and summarize a collection is
//! decoded; callers that hand the payload to a renderer keep the raw
//! `serde_json::Value` alongside.

use foundation::Aabb2;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryKind::Point,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => GeometryKind::Line,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => GeometryKind::Area,
        }
    }

    pub fn for_each_point(&self, mut f: impl FnMut(&GeoPoint)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(f),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(f),
        }
    }

    pub fn vertex_count(&self) -> usize {
        let mut n = 0;
        self.for_each_point(|_| n += 1);
        n
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        let mut out: Option<Aabb2> = None;
        self.for_each_point(|p| {
            let xy = [p.lon_deg, p.lat_deg];
            out = Some(match out {
                Some(mut b) => {
                    b.extend(xy);
                    b
                }
                None => Aabb2::from_point(xy),
            });
        });
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// GeoJSON permits `"geometry": null` for unlocated features.
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeoJsonError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a GeoJSON object")]
    NotAnObject,
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let mut features = Vec::new();
        for (index, feat_val) in collection_features(value)?.iter().enumerate() {
            let feature = parse_feature(feat_val)
                .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?;
            features.push(feature);
        }
        Ok(Self { features })
    }

    /// Like [`Self::from_geojson_value`], but features that do not parse
    /// are counted instead of failing the collection.
    pub fn from_geojson_value_lossy(value: &Value) -> Result<(Self, usize), GeoJsonError> {
        let raw = collection_features(value)?;
        let mut features = Vec::with_capacity(raw.len());
        let mut rejected = 0;
        for (index, feat_val) in raw.iter().enumerate() {
            match parse_feature(feat_val) {
                Ok(feature) => features.push(feature),
                Err(reason) => {
                    debug!(index, %reason, "feature left out of summary");
                    rejected += 1;
                }
            }
        }
        Ok((Self { features }, rejected))
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(Geometry::bounds))
            .reduce(Aabb2::union)
    }

    pub fn count_kind(&self, kind: GeometryKind) -> usize {
        self.features
            .iter()
            .filter(|f| f.geometry.as_ref().map(Geometry::kind) == Some(kind))
            .count()
    }
}

fn collection_features(value: &Value) -> Result<&Vec<Value>, GeoJsonError> {
    let obj = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(GeoJsonError::NotAFeatureCollection);
    }
    obj.get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoJsonError::NotAFeatureCollection)
}

fn parse_feature(value: &Value) -> Result<Feature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if ty != "Feature" {
        return Err(format!("unexpected feature type: {ty}"));
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = match obj.get("geometry") {
        None => return Err("feature missing geometry".to_string()),
        Some(Value::Null) => None,
        Some(g) => Some(parse_geometry(g)?),
    };

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of point lists".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}

#[cfg(test)]
mod tests {
    use super::{FeatureCollection, GeoJsonError, Geometry, GeometryKind};
    use foundation::Aabb2;

    const PLATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"Name": "AF-AN"},
                "geometry": {"type": "LineString", "coordinates": [[-0.4, -54.8], [0.1, -54.5], [3.2, -54.2]]}
            },
            {
                "type": "Feature",
                "id": 7,
                "properties": {"PlateName": "Cocos"},
                "geometry": {"type": "Polygon", "coordinates": [[[-104.0, 5.0], [-83.0, 5.0], [-83.0, 20.0], [-104.0, 5.0]]]}
            },
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_lines_and_polygons() {
        let fc = FeatureCollection::from_geojson_str(PLATES).expect("parse collection");
        assert_eq!(fc.features.len(), 3);
        assert!(matches!(
            fc.features[0].geometry,
            Some(Geometry::LineString(ref pts)) if pts.len() == 3
        ));
        assert_eq!(fc.features[1].id.as_deref(), Some("7"));
        assert!(fc.features[2].geometry.is_none());
        assert_eq!(fc.count_kind(GeometryKind::Line), 1);
        assert_eq!(fc.count_kind(GeometryKind::Area), 1);
    }

    #[test]
    fn bounds_cover_every_vertex() {
        let fc = FeatureCollection::from_geojson_str(PLATES).expect("parse collection");
        assert_eq!(
            fc.bounds(),
            Some(Aabb2::new([-104.0, -54.8], [3.2, 20.0]))
        );
        let total: usize = fc
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .map(Geometry::vertex_count)
            .sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_geojson_str(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, GeoJsonError::NotAFeatureCollection));
    }

    #[test]
    fn reports_index_of_bad_feature() {
        let payload = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Circle", "coordinates": [1, 2]}}
        ]}"#;
        let err = FeatureCollection::from_geojson_str(payload).unwrap_err();
        match err {
            GeoJsonError::InvalidFeature { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("Circle"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lossy_parse_counts_bad_features() {
        let payload = serde_json::json!({"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "GeometryCollection", "geometries": []}}
        ]});
        let (fc, rejected) = FeatureCollection::from_geojson_value_lossy(&payload).expect("collection");
        assert_eq!(fc.features.len(), 1);
        assert_eq!(rejected, 1);
        assert!(matches!(
            FeatureCollection::from_geojson_value(&payload),
            Err(GeoJsonError::InvalidFeature { index: 1, .. })
        ));
    }

    #[test]
    fn non_objects_are_not_geojson() {
        let err = FeatureCollection::from_geojson_value(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, GeoJsonError::NotAnObject));
    }
}
