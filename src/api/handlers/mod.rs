use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::feed::{refresh_all, MapView, SourceState};
use crate::models::FeatureCollection;
use crate::source::Source;

// ============================================================
// Response Types
// ============================================================

/// Status of one source as reported by `/sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source: Source,
    /// `pending`, `loaded` or `failed`
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// `None` while loaded means the source sent nothing usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
}

impl SourceStatus {
    fn new(source: Source, state: &SourceState) -> Self {
        let mut status = Self {
            source,
            state: state.as_str().to_string(),
            revision: None,
            fetched_at: None,
            feature_count: None,
            error: None,
            failed_at: None,
        };
        match state {
            SourceState::Pending => {}
            SourceState::Loaded(snapshot) => {
                status.revision = Some(snapshot.revision);
                status.fetched_at = Some(snapshot.fetched_at);
                status.feature_count = snapshot.collection.as_ref().map(|c| c.len());
            }
            SourceState::Failed { error, failed_at } => {
                status.error = Some(error.clone());
                status.failed_at = Some(*failed_at);
            }
        }
        status
    }
}

fn loading() -> Response {
    (StatusCode::ACCEPTED, Json(MapView::Loading)).into_response()
}

fn source_statuses(state: &AppState) -> Vec<SourceStatus> {
    Source::ALL
        .iter()
        .map(|&source| SourceStatus::new(source, &state.feed.state(source)))
        .collect()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Map
// ============================================================

/// 200 with the merged collection, 202 while it cannot be built yet, 502 when a
/// source fetch failed.
pub async fn get_map_features(State(state): State<AppState>) -> Response {
    match state.feed.view() {
        MapView::Ready { collection } => Json(collection).into_response(),
        MapView::Loading => loading(),
        failed @ MapView::Failed { .. } => (StatusCode::BAD_GATEWAY, Json(failed)).into_response(),
    }
}

// ============================================================
// Sources
// ============================================================

pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceStatus>> {
    Json(source_statuses(&state))
}

pub async fn refresh_sources(State(state): State<AppState>) -> Json<Vec<SourceStatus>> {
    tracing::info!("Manual refresh requested");
    refresh_all(&state.client, &state.feed).await;
    Json(source_statuses(&state))
}

// ============================================================
// Spots
// ============================================================

/// Configured featured spots, in configuration order. Ids the spot source does
/// not know are skipped. A spot payload the merge would refuse counts as loading.
pub async fn get_featured_spots(State(state): State<AppState>) -> Response {
    let spots = state.feed.state(Source::Spots);
    let Some(collection) = spots.collection().filter(|c| c.is_feature_collection()) else {
        return loading();
    };

    let features = state
        .featured_spots
        .iter()
        .filter_map(|id| {
            collection
                .features
                .iter()
                .find(|f| f.id().is_some_and(|fid| fid.matches(id)))
        })
        .cloned()
        .collect();

    Json(FeatureCollection::new(features)).into_response()
}
