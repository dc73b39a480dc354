use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::warn;

// Deeper nesting than any GeoJSON geometry needs; guards recursion on hostile input.
const MAX_COORDINATE_DEPTH: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    fn parse(ty: &str) -> Option<Self> {
        Some(match ty {
            "Point" => GeometryKind::Point,
            "MultiPoint" => GeometryKind::MultiPoint,
            "LineString" => GeometryKind::LineString,
            "MultiLineString" => GeometryKind::MultiLineString,
            "Polygon" => GeometryKind::Polygon,
            "MultiPolygon" => GeometryKind::MultiPolygon,
            "GeometryCollection" => GeometryKind::GeometryCollection,
            _ => return None,
        })
    }
}

/// Coordinate tree as it appears in GeoJSON: positions at the leaves, arrays
/// of arrays above them. Only lon/lat are kept; altitude is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Position([f64; 2]),
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// Visits every leaf position, depth first, in document order.
    pub fn for_each_position(&self, f: &mut impl FnMut(f64, f64)) {
        match self {
            Coordinates::Position([lon, lat]) => f(*lon, *lat),
            Coordinates::Nested(children) => {
                for child in children {
                    child.for_each_position(f);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for features whose geometry is `null`.
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Display text of a property: non-empty strings as-is, numbers and
    /// booleans in their JSON spelling. Null, empty, arrays and objects read
    /// as missing.
    pub fn property_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.properties.get(key)? {
            Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    Json(serde_json::Error),
    NotAFeatureCollection,
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GeoJsonError {
    fn from(e: serde_json::Error) -> Self {
        GeoJsonError::Json(e)
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        // Malformed entries are dropped; a feature with bad geometry keeps its
        // properties and loses only the geometry.
        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(index, feat_val) {
                Ok(feature) => features.push(feature),
                Err(reason) => warn!(index, %reason, "skipping malformed feature"),
            }
        }

        Ok(Self { features })
    }
}

fn parse_feature(index: usize, value: &Value) -> Result<Feature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let feat_type = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
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
        None | Some(Value::Null) => None,
        Some(g) => match parse_geometry(g) {
            Ok(geometry) => Some(geometry),
            Err(reason) => {
                warn!(index, %reason, "dropping malformed geometry");
                None
            }
        },
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
    let kind =
        GeometryKind::parse(ty).ok_or_else(|| format!("unsupported geometry type: {ty}"))?;

    if kind == GeometryKind::GeometryCollection {
        let members = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or("GeometryCollection missing geometries".to_string())?;
        let mut children = Vec::with_capacity(members.len());
        for member in members {
            children.push(parse_geometry(member)?.coordinates);
        }
        return Ok(Geometry {
            kind,
            coordinates: Coordinates::Nested(children),
        });
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;
    Ok(Geometry {
        kind,
        coordinates: parse_coordinates(coords, 0)?,
    })
}

fn parse_coordinates(value: &Value, depth: usize) -> Result<Coordinates, String> {
    if depth > MAX_COORDINATE_DEPTH {
        return Err("coordinates nested too deeply".to_string());
    }
    let arr = value
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;

    // A leaf is a numeric array; anything else is another nesting level.
    if arr.first().is_some_and(Value::is_number) {
        if arr.len() < 2 {
            return Err("position must have [lon, lat]".to_string());
        }
        let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
        let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
        return Ok(Coordinates::Position([lon, lat]));
    }

    let mut children = Vec::with_capacity(arr.len());
    for item in arr {
        children.push(parse_coordinates(item, depth + 1)?);
    }
    Ok(Coordinates::Nested(children))
}
