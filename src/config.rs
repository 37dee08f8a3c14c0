//! Service configuration.
//!
//! Values are layered: built-in defaults, then `config.json` in the user's config
//! directory (or an explicit path), then `SURFMAP_*` environment variables, then CLI
//! flags applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::source::SourceEndpoints;

const APP_NAME: &str = "surfmap";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfConfig {
    /// GeoJSON endpoint for buoy locations
    pub buoys_url: String,
    /// GeoJSON endpoint for surf spots
    pub spots_url: String,
    /// Port for the HTTP API
    pub port: u16,
    /// Seconds between background refreshes of both sources
    pub refresh_interval_secs: u64,
    /// Per-request timeout for source fetches
    pub request_timeout_secs: u64,
    /// Spot ids highlighted by `/spots/featured`, in display order
    pub featured_spots: Vec<String>,
}

impl Default for SurfConfig {
    fn default() -> Self {
        Self {
            buoys_url: "http://localhost:8080/locations/buoys.geojson".to_string(),
            spots_url: "http://localhost:8080/spots.geojson".to_string(),
            port: DEFAULT_PORT,
            refresh_interval_secs: 300,
            request_timeout_secs: 10,
            featured_spots: Vec::new(),
        }
    }
}

impl SurfConfig {
    /// Load from `path`, or the default location when `None`, then apply the
    /// environment. A missing file means defaults; a broken file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let config = Self::from_file(&path)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Apply `SURFMAP_*` overrides read through `lookup`. Unparsable numbers are
    /// ignored with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("SURFMAP_BUOYS_URL") {
            self.buoys_url = url;
        }
        if let Some(url) = lookup("SURFMAP_SPOTS_URL") {
            self.spots_url = url;
        }
        if let Some(port) = parse_override(&lookup, "SURFMAP_PORT") {
            self.port = port;
        }
        if let Some(secs) = parse_override(&lookup, "SURFMAP_REFRESH_SECS") {
            self.refresh_interval_secs = secs;
        }
        if let Some(secs) = parse_override(&lookup, "SURFMAP_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }
        if let Some(spots) = lookup("SURFMAP_FEATURED_SPOTS") {
            self.featured_spots = spots
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self
    }

    pub fn endpoints(&self) -> SourceEndpoints {
        SourceEndpoints {
            buoys_url: self.buoys_url.clone(),
            spots_url: self.spots_url.clone(),
        }
    }

    /// Never zero, so the refresh ticker cannot panic.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: not a valid number: {}", key, raw);
            None
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
