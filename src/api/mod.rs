mod handlers;

pub use handlers::SourceStatus;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::feed::MapFeed;
use crate::source::SourceClient;

/// Everything the handlers need. The featured-spot list is injected here rather
/// than living in a global.
#[derive(Debug, Clone)]
pub struct AppState {
    pub feed: MapFeed,
    pub client: SourceClient,
    pub featured_spots: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(feed: MapFeed, client: SourceClient, featured_spots: Vec<String>) -> Self {
        Self {
            feed,
            client,
            featured_spots: Arc::new(featured_spots),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Map
        .route("/map/features", get(handlers::get_map_features))
        // Sources
        .route("/sources", get(handlers::list_sources))
        .route("/sources/refresh", post(handlers::refresh_sources))
        // Spots
        .route("/spots/featured", get(handlers::get_featured_spots))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
