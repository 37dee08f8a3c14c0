//! GeoJSON models for the map.
//!
//! Only the members the map reads are typed: the feature type tag and a few optional
//! properties. Everything else a source sends, at any level, is kept
//! verbatim so the renderer sees the payload it was given.

mod collection;
mod feature;

pub use collection::*;
pub use feature::*;
