use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// GeoJSON tag for a single feature.
pub const FEATURE: &str = "Feature";

/// GeoJSON tag for a point geometry.
pub const POINT: &str = "Point";

/// One point of interest on the map: a buoy or a surf spot.
///
/// Only `type` is checked. Geometry and properties may be `null`, and every member
/// the map does not read (`bbox`, foreign members) is carried in `extra` so the
/// feature is written back out as it came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    /// GeoJSON feature-level `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_tag() -> String {
    FEATURE.to_string()
}

impl Feature {
    pub fn point(longitude: f64, latitude: f64, properties: FeatureProperties) -> Self {
        Self {
            kind: feature_tag(),
            id: None,
            geometry: Some(Geometry::point(longitude, latitude)),
            properties: Some(properties),
            extra: Map::new(),
        }
    }

    /// `properties.id`, falling back to the feature-level `id`.
    pub fn id(&self) -> Option<&FeatureId> {
        self.properties
            .as_ref()
            .and_then(|p| p.id.as_ref())
            .or(self.id.as_ref())
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.as_ref()?.name.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.properties.as_ref()?.category
    }
}

/// Any GeoJSON geometry. Points are what the map draws, but other kinds pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]` for points, optionally followed by altitude.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub coordinates: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: POINT.to_string(),
            coordinates: Value::from(vec![longitude, latitude]),
            extra: Map::new(),
        }
    }
}

/// Properties the map reads from every feature. All optional.
///
/// Unknown keys land in `extra` and are written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureProperties {
    pub fn new(id: impl Into<FeatureId>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Feature identifier. Station feeds use numeric ids, spot feeds use slugs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(Number),
    Text(String),
}

impl FeatureId {
    /// Compare against an id written as text, e.g. from configuration.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            Self::Text(s) => s == other,
            Self::Number(n) => n.to_string() == other.trim(),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FeatureId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Which kind of point a feature marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Buoy,
    Spot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Feature {
        serde_json::from_value(value).expect("feature")
    }

    #[test]
    fn parses_buoy_with_numeric_id_and_extra_properties() {
        let feature = parse(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-122.88, 37.75] },
            "properties": {
                "id": 46026,
                "name": "San Francisco",
                "category": "buoy",
                "owner": "NDBC"
            }
        }));

        assert_eq!(feature.id(), Some(&FeatureId::from(46026)));
        assert_eq!(feature.category(), Some(Category::Buoy));
        assert_eq!(feature.geometry.unwrap().coordinates, json!([-122.88, 37.75]));
        let properties = feature.properties.unwrap();
        assert!(properties.description.is_none());
        assert_eq!(properties.extra["owner"], json!("NDBC"));
    }

    #[test]
    fn writes_extra_properties_back_out() {
        let mut properties = FeatureProperties::new("ocean-beach", "Ocean Beach", Category::Spot)
            .with_description("Heavy beach break");
        properties
            .extra
            .insert("region".to_string(), json!("Northern California"));
        let feature = Feature::point(-122.51, 37.76, properties);

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], json!("Feature"));
        assert_eq!(value["geometry"]["type"], json!("Point"));
        assert_eq!(value["geometry"]["coordinates"], json!([-122.51, 37.76]));
        assert_eq!(value["properties"]["region"], json!("Northern California"));
        assert_eq!(value["properties"]["category"], json!("spot"));
    }

    #[test]
    fn keeps_feature_members_on_the_way_out() {
        let input = json!({
            "type": "Feature",
            "id": "46026",
            "bbox": [0, 0, 1, 1],
            "station_owner": "NDBC",
            "geometry": { "type": "Point", "coordinates": [-122.88, 37.75, 0.0] },
            "properties": { "id": 46026, "name": "San Francisco", "category": "buoy" }
        });

        let output = serde_json::to_value(parse(input.clone())).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn accepts_altitude_in_point_coordinates() {
        let feature = parse(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-122.88, 37.75, 0.0] },
            "properties": { "id": 46026, "name": "San Francisco", "category": "buoy" }
        }));
        assert_eq!(
            feature.geometry.unwrap().coordinates,
            json!([-122.88, 37.75, 0.0])
        );
    }

    #[test]
    fn passes_other_geometries_through() {
        let input = json!({
            "type": "Feature",
            "geometry": {
                "type": "GeometryCollection",
                "geometries": [{ "type": "Point", "coordinates": [0.0, 0.0] }]
            },
            "properties": { "id": "reef", "name": "Reef", "category": "spot" }
        });
        let output = serde_json::to_value(parse(input.clone())).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn tolerates_null_members() {
        let feature = parse(json!({
            "type": "Feature",
            "geometry": null,
            "properties": null
        }));
        assert!(feature.geometry.is_none());
        assert!(feature.id().is_none());
        assert!(feature.name().is_none());

        let feature = parse(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "id": "x", "name": null, "category": "spot" }
        }));
        assert!(feature.name().is_none());
        assert_eq!(feature.category(), Some(Category::Spot));
    }

    #[test]
    fn accepts_float_and_large_ids() {
        let feature = parse(json!({
            "type": "Feature",
            "properties": { "id": 12.5, "name": "Float", "category": "buoy" }
        }));
        assert!(feature.id().unwrap().matches("12.5"));

        let feature = parse(json!({
            "type": "Feature",
            "properties": { "id": u64::MAX, "name": "Big", "category": "buoy" }
        }));
        assert!(feature.id().unwrap().matches(&u64::MAX.to_string()));
    }

    #[test]
    fn falls_back_to_feature_level_id() {
        let feature = parse(json!({
            "type": "Feature",
            "id": "steamer-lane",
            "properties": { "name": "Steamer Lane", "category": "spot" }
        }));
        assert!(feature.id().unwrap().matches("steamer-lane"));
    }

    #[test]
    fn missing_feature_tag_defaults() {
        let feature = parse(json!({
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "id": "x", "name": "X", "category": "spot" }
        }));
        assert_eq!(feature.kind, FEATURE);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result: Result<Feature, _> = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "id": "x", "name": "X", "category": "pier" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn feature_id_matches_text_form() {
        assert!(FeatureId::from(46026).matches("46026"));
        assert!(FeatureId::from("mavericks").matches("mavericks"));
        assert!(!FeatureId::from(46026).matches("mavericks"));
    }
}
