use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

/// Registration key of the bundled boundary dataset.
pub const BUNDLED_MAP_NAME: &str = "湖北";

/// Simplified prefecture outlines of Hubei, embedded at build time.
pub const BUNDLED_GEOJSON: &str = include_str!("../../assets/hubei.geojson");

/// Immutable set of boundary features, kept in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoFeatureCollection {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoFeature {
    /// Top-level `name`, used only when `properties.name` is absent.
    pub name: Option<String>,
    pub properties: FeatureProperties,
    /// Outline in lon/lat degrees. `None` when missing or not a (multi)polygon.
    pub geometry: Option<MultiPolygon<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureProperties {
    pub name: Option<String>,
    /// Preferred label position (`cp` or `center`), lon/lat.
    pub label_anchor: Option<[f64; 2]>,
}

impl GeoFeatureCollection {
    /// Parse GeoJSON text. Only invalid JSON is an error; structural problems
    /// degrade to fewer (or no) features.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let features = value
            .get("features")
            .and_then(Value::as_array)
            .map(|features| features.iter().filter_map(GeoFeature::from_value).collect())
            .unwrap_or_default();
        Self { features }
    }

    /// The dataset shipped with the widget. Falls back to an empty collection
    /// if the embedded file is not valid JSON.
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_GEOJSON) {
            Ok(collection) => collection,
            Err(e) => {
                tracing::warn!(error = %e, "bundled GeoJSON is not valid JSON");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl GeoFeature {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            name: object.get("name").and_then(Value::as_str).map(str::to_owned),
            properties: object
                .get("properties")
                .map(FeatureProperties::from_value)
                .unwrap_or_default(),
            geometry: object.get("geometry").and_then(parse_geometry),
        })
    }

    /// `properties.name` wins over the top-level `name`. Empty strings never resolve.
    pub fn resolved_name(&self) -> Option<&str> {
        self.properties
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.name.as_deref().filter(|name| !name.is_empty()))
    }
}

impl FeatureProperties {
    fn from_value(value: &Value) -> Self {
        let label_anchor = value
            .get("cp")
            .or_else(|| value.get("center"))
            .and_then(parse_position)
            .map(|c| [c.x, c.y]);
        Self {
            name: value.get("name").and_then(Value::as_str).map(str::to_owned),
            label_anchor,
        }
    }
}

fn parse_geometry(value: &Value) -> Option<MultiPolygon<f64>> {
    let coordinates = value.get("coordinates")?.as_array()?;
    let polygons = match value.get("type")?.as_str()? {
        "Polygon" => vec![parse_polygon(coordinates)?],
        "MultiPolygon" => coordinates
            .iter()
            .map(|polygon| polygon.as_array().and_then(|rings| parse_polygon(rings)))
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    if polygons.is_empty() {
        return None;
    }
    Some(MultiPolygon(polygons))
}

/// First ring is the exterior, the rest are holes. `Polygon::new` closes open rings.
fn parse_polygon(rings: &[Value]) -> Option<Polygon<f64>> {
    let mut rings = rings
        .iter()
        .map(|ring| ring.as_array().and_then(|coords| parse_ring(coords)));
    let exterior = rings.next()??;
    let interiors = rings.collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}

fn parse_ring(coords: &[Value]) -> Option<LineString<f64>> {
    let points = coords
        .iter()
        .map(parse_position)
        .collect::<Option<Vec<_>>>()?;
    if points.len() < 3 {
        return None;
    }
    Some(LineString::from(points))
}

fn parse_position(value: &Value) -> Option<Coord<f64>> {
    let pair = value.as_array()?;
    Some(Coord {
        x: pair.first()?.as_f64()?,
        y: pair.get(1)?.as_f64()?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BUNDLED_GEOJSON, GeoFeatureCollection};

    #[test]
    fn missing_feature_list_yields_empty_collection() {
        assert!(GeoFeatureCollection::from_value(&json!({ "type": "FeatureCollection" })).is_empty());
        assert!(GeoFeatureCollection::from_value(&json!({ "features": 42 })).is_empty());
        assert!(GeoFeatureCollection::from_value(&json!(null)).is_empty());
    }

    #[test]
    fn invalid_json_is_the_only_error() {
        assert!(GeoFeatureCollection::from_json_str("{not json").is_err());
        let parsed = GeoFeatureCollection::from_json_str("[]").expect("valid json");
        assert!(parsed.is_empty());
    }

    #[test]
    fn properties_name_takes_precedence_over_top_level_name() {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": [
                { "name": "outer", "properties": { "name": "inner" } },
                { "name": "outer-only", "properties": {} },
                { "name": "fallback", "properties": { "name": "" } },
                { "properties": { "adcode": 1 } },
            ]
        }));

        let names: Vec<_> = collection
            .features
            .iter()
            .map(|f| f.resolved_name())
            .collect();
        assert_eq!(
            names,
            vec![Some("inner"), Some("outer-only"), Some("fallback"), None]
        );
    }

    #[test]
    fn non_object_features_are_skipped() {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": ["nope", 3, { "properties": { "name": "a" } }]
        }));
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn polygon_and_multipolygon_geometry_parse() {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": [
                {
                    "properties": { "name": "square" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
                    }
                },
                {
                    "properties": { "name": "pair" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                            [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]]
                        ]
                    }
                }
            ]
        }));

        let square = collection.features[0].geometry.as_ref().expect("square geometry");
        assert_eq!(square.0.len(), 1);
        assert!(square.0[0].exterior().is_closed());
        let pair = collection.features[1].geometry.as_ref().expect("pair geometry");
        assert_eq!(pair.0.len(), 2);
    }

    #[test]
    fn malformed_geometry_is_dropped_but_feature_kept() {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": [
                { "properties": { "name": "point" }, "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "properties": { "name": "short" }, "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0]]] } },
                { "properties": { "name": "text" }, "geometry": { "type": "Polygon", "coordinates": [[["a", 0.0], [1.0, 0.0], [1.0, 1.0]]] } },
            ]
        }));

        assert_eq!(collection.features.len(), 3);
        assert!(collection.features.iter().all(|f| f.geometry.is_none()));
    }

    #[test]
    fn label_anchor_reads_cp_then_center() {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": [
                { "properties": { "name": "a", "cp": [1.5, 2.5] } },
                { "properties": { "name": "b", "center": [3.0, 4.0] } },
                { "properties": { "name": "c", "cp": "bad" } },
            ]
        }));

        let anchors: Vec<_> = collection
            .features
            .iter()
            .map(|f| f.properties.label_anchor)
            .collect();
        assert_eq!(anchors, vec![Some([1.5, 2.5]), Some([3.0, 4.0]), None]);
    }

    #[test]
    fn bundled_dataset_parses_with_geometry() {
        let collection = GeoFeatureCollection::from_json_str(BUNDLED_GEOJSON).expect("valid json");
        assert!(!collection.is_empty());
        assert!(collection.features.iter().all(|f| f.geometry.is_some()));
        assert!(collection.features.iter().all(|f| f.resolved_name().is_some()));
    }
}
