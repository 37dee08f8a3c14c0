//! Upstream sources for the map: buoy locations and surf spots.
//!
//! Each source is fetched independently, over HTTP via [`SourceClient`] or from disk
//! via [`read_collection_file`]. Neither path raises on a bad payload: anything that
//! is not collection-shaped comes back as `None`.

mod client;
mod file;

pub use client::*;
pub use file::*;

use serde::{Deserialize, Serialize};

/// One of the two independently fetched inputs to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Buoys,
    Spots,
}

impl Source {
    /// Both sources in merge order.
    pub const ALL: [Source; 2] = [Source::Buoys, Source::Spots];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buoys => "buoys",
            Self::Spots => "spots",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
