//! Live state of the two map sources and the merged view derived from it.
//!
//! Each source has its own watch channel holding its latest [`SourceState`].
//! Publishing a new state always gives that source a new identity. The merged
//! collection is never stored. Every read recomputes it from the current states,
//! so a reader can never see a merge built from stale inputs.

mod refresh;

pub use refresh::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::FeatureCollection;
use crate::source::Source;
use surfmap_core::merge_feature_collections;

/// One completed fetch of a source.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Identity of this fetch result. Every publish gets a fresh one.
    pub revision: Uuid,
    pub fetched_at: DateTime<Utc>,
    /// `None` when the source answered with nothing usable.
    pub collection: Option<Arc<FeatureCollection>>,
}

impl Snapshot {
    pub fn new(collection: Option<FeatureCollection>) -> Self {
        Self {
            revision: Uuid::new_v4(),
            fetched_at: Utc::now(),
            collection: collection.map(Arc::new),
        }
    }
}

/// Latest known state of one source.
#[derive(Debug, Clone, Default)]
pub enum SourceState {
    /// Never fetched.
    #[default]
    Pending,
    Loaded(Snapshot),
    /// The latest fetch failed before producing a payload.
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl SourceState {
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed {
            error: error.to_string(),
            failed_at: Utc::now(),
        }
    }

    pub fn collection(&self) -> Option<&FeatureCollection> {
        match self {
            Self::Loaded(snapshot) => snapshot.collection.as_deref(),
            _ => None,
        }
    }

    pub fn revision(&self) -> Option<Uuid> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot.revision),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loaded(_) => "loaded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// What the map should show right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapView {
    /// No merged collection yet: a source is pending, empty-handed or malformed.
    Loading,
    Ready { collection: FeatureCollection },
    /// A source fetch reported an error of its own.
    Failed { source: Source, error: String },
}

/// Shared handle on both sources. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MapFeed {
    buoys: Arc<watch::Sender<SourceState>>,
    spots: Arc<watch::Sender<SourceState>>,
}

impl Default for MapFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MapFeed {
    pub fn new() -> Self {
        let (buoys, _) = watch::channel(SourceState::Pending);
        let (spots, _) = watch::channel(SourceState::Pending);
        Self {
            buoys: Arc::new(buoys),
            spots: Arc::new(spots),
        }
    }

    fn channel(&self, source: Source) -> &watch::Sender<SourceState> {
        match source {
            Source::Buoys => &self.buoys,
            Source::Spots => &self.spots,
        }
    }

    /// Replace a source's state and wake every watcher.
    pub fn publish(&self, source: Source, state: SourceState) {
        match &state {
            SourceState::Loaded(snapshot) => tracing::debug!(
                %source,
                revision = %snapshot.revision,
                features = snapshot.collection.as_ref().map(|c| c.len()),
                "Publishing snapshot"
            ),
            SourceState::Failed { error, .. } => {
                tracing::warn!(%source, error = %error, "Publishing failure")
            }
            SourceState::Pending => tracing::debug!(%source, "Resetting to pending"),
        }
        self.channel(source).send_replace(state);
    }

    pub fn state(&self, source: Source) -> SourceState {
        self.channel(source).borrow().clone()
    }

    /// Merge the current source collections. Recomputed on every call.
    pub fn merged(&self) -> Option<FeatureCollection> {
        let buoys = self.state(Source::Buoys);
        let spots = self.state(Source::Spots);
        merge_feature_collections(buoys.collection(), spots.collection())
    }

    /// Fetch failures win over the merge, buoys checked first.
    pub fn view(&self) -> MapView {
        let buoys = self.state(Source::Buoys);
        let spots = self.state(Source::Spots);

        for (source, state) in [(Source::Buoys, &buoys), (Source::Spots, &spots)] {
            if let SourceState::Failed { error, .. } = state {
                return MapView::Failed {
                    source,
                    error: error.clone(),
                };
            }
        }

        match merge_feature_collections(buoys.collection(), spots.collection()) {
            Some(collection) => MapView::Ready { collection },
            None => MapView::Loading,
        }
    }

    pub fn subscribe(&self) -> FeedWatcher {
        FeedWatcher {
            feed: self.clone(),
            buoys: self.buoys.subscribe(),
            spots: self.spots.subscribe(),
        }
    }
}

/// Waits for either source to change and hands back the recomputed view.
#[derive(Debug)]
pub struct FeedWatcher {
    feed: MapFeed,
    buoys: watch::Receiver<SourceState>,
    spots: watch::Receiver<SourceState>,
}

impl FeedWatcher {
    pub async fn changed(&mut self) -> MapView {
        // The watcher holds the feed, so neither sender can close under us.
        tokio::select! {
            _ = self.buoys.changed() => {}
            _ = self.spots.changed() => {}
        }
        self.buoys.borrow_and_update();
        self.spots.borrow_and_update();
        self.feed.view()
    }
}
