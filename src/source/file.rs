use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::FeatureCollection;

/// Read a source collection from a GeoJSON file.
///
/// A missing file is an absent source, and so is a file that does not hold a
/// feature collection. Any other I/O failure is an error.
pub fn read_collection_file(path: &Path) -> Result<Option<FeatureCollection>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Collection file not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let collection = FeatureCollection::from_slice(&bytes);
    if collection.is_none() {
        tracing::warn!(path = %path.display(), "File is not a feature collection");
    }
    Ok(collection)
}
