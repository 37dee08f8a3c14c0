//! Core types for the surf map feed.
//!
//! - [`models`]: GeoJSON point features and feature collections as served by the
//!   buoy and spot sources.
//! - [`merge`]: combines the two source collections into the single collection the
//!   map renders.

pub mod merge;
pub mod models;

pub use merge::merge_feature_collections;
pub use models::*;
