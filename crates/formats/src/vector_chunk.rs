use geo::Geometry;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry<f64>,
}

impl VectorFeature {
    /// String-valued property; numbers are rendered with their JSON text.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorChunk {
    pub features: Vec<VectorFeature>,
}

#[derive(Debug)]
pub enum VectorChunkError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for VectorChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorChunkError::Json(e) => write!(f, "JSON parse error: {e}"),
            VectorChunkError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            VectorChunkError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for VectorChunkError {}

impl VectorChunk {
    pub fn from_geojson_str(payload: &str) -> Result<Self, VectorChunkError> {
        let value: Value = serde_json::from_str(payload).map_err(VectorChunkError::Json)?;
        Self::from_geojson_value(&value)
    }

    /// Accepts a FeatureCollection object or a bare array of Features.
    pub fn from_geojson_value(value: &Value) -> Result<Self, VectorChunkError> {
        let features_val = match value {
            Value::Array(items) => items,
            Value::Object(obj) => {
                let ty = obj
                    .get("type")
                    .and_then(|v| v.as_str())
                    .ok_or(VectorChunkError::NotAFeatureCollection)?;
                if ty != "FeatureCollection" {
                    return Err(VectorChunkError::NotAFeatureCollection);
                }
                obj.get("features")
                    .and_then(|v| v.as_array())
                    .ok_or(VectorChunkError::NotAFeatureCollection)?
            }
            _ => return Err(VectorChunkError::NotAFeatureCollection),
        };

        let features = features_val
            .iter()
            .enumerate()
            .map(|(index, feat_val)| parse_feature(index, feat_val))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { features })
    }
}

pub fn parse_feature(index: usize, value: &Value) -> Result<VectorFeature, VectorChunkError> {
    let invalid = |reason: String| VectorChunkError::InvalidFeature { index, reason };

    let feat_obj = value
        .as_object()
        .ok_or_else(|| invalid("feature must be an object".to_string()))?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("feature missing type".to_string()))?;
    if feat_type != "Feature" {
        return Err(invalid(format!("unexpected feature type: {feat_type}")));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry_val = feat_obj
        .get("geometry")
        .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
    let geometry = parse_geometry(geometry_val).map_err(invalid)?;

    Ok(VectorFeature {
        id,
        properties,
        geometry,
    })
}

pub fn parse_geometry(value: &Value) -> Result<Geometry<f64>, String> {
    let geometry: geojson::Geometry =
        serde_json::from_value(value.clone()).map_err(|e| format!("bad geometry: {e}"))?;
    Geometry::<f64>::try_from(geometry).map_err(|e| format!("unsupported geometry: {e}"))
}

/// GeoJSON geometry object for `geom`.
pub fn geometry_to_geojson_value(geom: &Geometry<f64>) -> Value {
    let geometry = geojson::Geometry::new(geojson::Value::from(geom));
    serde_json::to_value(&geometry).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::{VectorChunk, VectorChunkError, geometry_to_geojson_value, parse_geometry};
    use geo::Geometry;
    use serde_json::json;

    #[test]
    fn parses_feature_collection_of_lines() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": { "NomEntiteH": "L'Oise" },
                    "geometry": { "type": "LineString", "coordinates": [[2.0, 49.0], [2.5, 49.3]] }
                },
                {
                    "type": "Feature",
                    "properties": null,
                    "geometry": {
                        "type": "MultiLineString",
                        "coordinates": [[[3.0, 49.0], [3.1, 49.1]], [[3.2, 49.2], [3.3, 49.3]]]
                    }
                }
            ]
        });
        let chunk = VectorChunk::from_geojson_value(&payload).expect("parse chunk");
        assert_eq!(chunk.features.len(), 2);
        assert_eq!(chunk.features[0].id.as_deref(), Some("7"));
        assert_eq!(
            chunk.features[0].property_text("NomEntiteH").as_deref(),
            Some("L'Oise")
        );
        assert!(matches!(
            chunk.features[0].geometry,
            Geometry::LineString(_)
        ));
        assert!(chunk.features[1].properties.is_empty());
        assert!(matches!(
            chunk.features[1].geometry,
            Geometry::MultiLineString(_)
        ));
    }

    #[test]
    fn accepts_bare_feature_array() {
        let payload = r#"[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.1,49.2]}}]"#;
        let chunk = VectorChunk::from_geojson_str(payload).expect("parse array");
        assert_eq!(chunk.features.len(), 1);
    }

    #[test]
    fn rejects_other_objects() {
        let err = VectorChunk::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, VectorChunkError::NotAFeatureCollection));
    }

    #[test]
    fn reports_index_of_bad_feature() {
        let payload = json!([
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
            {"type": "Feature", "properties": {}}
        ]);
        let err = VectorChunk::from_geojson_value(&payload).unwrap_err();
        match err {
            VectorChunkError::InvalidFeature { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("geometry"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn geometry_survives_geojson_export() {
        let value = json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]});
        let geom = parse_geometry(&value).expect("parse polygon");
        let exported = geometry_to_geojson_value(&geom);
        assert_eq!(exported["type"], "Polygon");
        assert_eq!(exported["coordinates"], value["coordinates"]);
    }
}
