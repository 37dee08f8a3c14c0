//! HTTP client for the buoy and spot GeoJSON endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::Source;
use crate::models::FeatureCollection;

/// Source fetch errors.
///
/// Only transport and HTTP-level failures are errors. A 2xx response carrying
/// something other than a feature collection is an absent result, not an error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: upstream rejected the request")]
    Unauthorized,

    #[error("Upstream error: {0}: {1}")]
    Upstream(StatusCode, String),
}

/// Where each source is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub buoys_url: String,
    pub spots_url: String,
}

impl SourceEndpoints {
    pub fn url(&self, source: Source) -> &str {
        match source {
            Source::Buoys => &self.buoys_url,
            Source::Spots => &self.spots_url,
        }
    }
}

/// HTTP client for the upstream sources.
#[derive(Debug, Clone)]
pub struct SourceClient {
    endpoints: SourceEndpoints,
    client: Client,
}

impl SourceClient {
    /// Create a client with a per-request timeout.
    pub fn new(endpoints: SourceEndpoints, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoints, client })
    }

    /// Fetch one source.
    ///
    /// `Ok(None)` covers an empty body, `null`, and any JSON that is not a feature
    /// collection.
    pub async fn fetch(&self, source: Source) -> Result<Option<FeatureCollection>, ClientError> {
        let url = self.endpoints.url(source);
        tracing::debug!(%source, url, "Fetching source");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(url.to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
                _ => ClientError::Upstream(status, body),
            });
        }

        let bytes = response.bytes().await?;
        let collection = FeatureCollection::from_slice(&bytes);
        match &collection {
            Some(c) => tracing::debug!(%source, features = c.len(), "Fetched source"),
            None if bytes.is_empty() => tracing::debug!(%source, "Source returned no body"),
            None => tracing::warn!(%source, "Source payload is not a feature collection"),
        }
        Ok(collection)
    }
}
