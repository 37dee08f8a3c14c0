//! Buoy + spot collection merge.

use crate::models::FeatureCollection;

/// Combine the buoy and spot collections into the one collection the map draws.
///
/// Returns `None` unless both sources are present and both are tagged
/// `FeatureCollection`. `None` means "not ready": a source is still loading, came
/// back empty-handed, or sent something else. Two present but empty collections
/// merge into an empty collection, which is a real answer and not `None`.
///
/// Buoys come first, then spots, each in source order. Nothing is deduplicated or
/// sorted. The result is built fresh on every call.
pub fn merge_feature_collections(
    buoys: Option<&FeatureCollection>,
    spots: Option<&FeatureCollection>,
) -> Option<FeatureCollection> {
    let (buoys, spots) = (buoys?, spots?);
    if !buoys.is_feature_collection() || !spots.is_feature_collection() {
        return None;
    }

    let mut features = Vec::with_capacity(buoys.len() + spots.len());
    features.extend(buoys.features.iter().cloned());
    features.extend(spots.features.iter().cloned());
    Some(FeatureCollection::new(features))
}
