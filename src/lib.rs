pub mod api;
pub mod config;
pub mod feed;
pub mod source;

pub use surfmap_core::{merge_feature_collections, models};
