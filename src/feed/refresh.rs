use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{MapFeed, Snapshot, SourceState};
use crate::source::{Source, SourceClient};

/// Fetch one source and publish whatever came back.
pub async fn refresh_source(client: &SourceClient, feed: &MapFeed, source: Source) {
    let state = match client.fetch(source).await {
        Ok(collection) => SourceState::Loaded(Snapshot::new(collection)),
        Err(e) => {
            tracing::error!(%source, error = %e, "Source fetch failed");
            SourceState::failed(e)
        }
    };
    feed.publish(source, state);
}

/// Fetch both sources concurrently. Each publishes as soon as its own fetch ends.
pub async fn refresh_all(client: &SourceClient, feed: &MapFeed) {
    tokio::join!(
        refresh_source(client, feed, Source::Buoys),
        refresh_source(client, feed, Source::Spots),
    );
}

/// Refresh both sources every `period` until the task is aborted.
///
/// The first refresh happens one period after spawning; callers that want data up
/// front run [`refresh_all`] themselves first.
pub fn spawn_refresh_loop(client: SourceClient, feed: MapFeed, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            tracing::debug!("Refreshing map sources");
            refresh_all(&client, &feed).await;
        }
    })
}
