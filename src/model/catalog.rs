//! Release catalog provider
//!
//! The deck is fetched through the [`ReleaseProvider`] trait. The bundled
//! implementation reads a local JSON catalog file so the app runs without
//! network credentials; a remote-backed provider plugs in behind the same
//! trait.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::types::Release;

pub const CATALOG_PATH_ENV: &str = "SWIPEDECK_CATALOG";
const DEFAULT_CATALOG_PATH: &str = "catalog.json";

/// Source of deck snapshots. A failed fetch leaves the stack in its empty
/// display state with a retry affordance.
#[async_trait]
pub trait ReleaseProvider: Send + Sync {
    async fn fetch_deck(&self) -> Result<Vec<Release>>;
}

/// [`ReleaseProvider`] backed by a JSON file containing an array of
/// releases.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Build from `SWIPEDECK_CATALOG` or the default `catalog.json`.
    pub fn from_env() -> Self {
        let path = std::env::var(CATALOG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH));
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReleaseProvider for JsonCatalog {
    async fn fetch_deck(&self) -> Result<Vec<Release>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let releases: Vec<Release> = serde_json::from_str(&content)
            .with_context(|| format!("parsing catalog {}", self.path.display()))?;
        // Entries without an id or artists cannot be liked or rendered
        // meaningfully; drop them rather than failing the whole deck.
        let total = releases.len();
        let releases: Vec<Release> = releases
            .into_iter()
            .filter(|r| !r.id.is_empty() && !r.artists.is_empty())
            .collect();
        if releases.len() < total {
            tracing::warn!(
                dropped = total - releases.len(),
                "Catalog entries missing id or artists were skipped"
            );
        }
        tracing::info!(count = releases.len(), path = %self.path.display(), "Catalog loaded");
        Ok(releases)
    }
}
