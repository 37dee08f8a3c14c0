use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Feature;

/// GeoJSON tag a source payload must carry to be merged.
pub const FEATURE_COLLECTION: &str = "FeatureCollection";

/// An ordered set of features under a GeoJSON type tag.
///
/// The tag is kept as a plain string rather than checked on parse, so a payload that
/// arrives with the wrong discriminator is still representable and can be turned away
/// by [`merge_feature_collections`](crate::merge_feature_collections).
///
/// Features are read one at a time: a feature that cannot be read is logged and
/// skipped instead of discarding the whole source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "skip_unreadable_features")]
    pub features: Vec<Feature>,
}

fn skip_unreadable_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    let features = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(feature) => Some(feature),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable feature");
                None
            }
        })
        .collect();
    Ok(features)
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FEATURE_COLLECTION.to_string(),
            features,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Read a source payload, returning `None` for anything that is not
    /// collection-shaped (`null`, arrays, missing `type`, unparsable features).
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Same as [`from_value`](Self::from_value) for raw bytes. Empty input is absent.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        serde_json::from_slice::<serde_json::Value>(bytes)
            .ok()
            .and_then(Self::from_value)
    }

    pub fn is_feature_collection(&self) -> bool {
        self.kind == FEATURE_COLLECTION
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
