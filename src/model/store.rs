//! Library persistence: liked/discovered sets and usage statistics
//!
//! The core only talks to the [`LibraryStore`] trait. Mutations are
//! fire-and-forget from the caller's point of view: the in-memory state in
//! [`JsonLibraryStore`] is updated immediately and the disk write happens on
//! a spawned task, so gesture handling never waits on persistence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::types::UserStats;

const LIBRARY_FILE: &str = ".cache/library.json";

/// Everything the store persists, as loaded at startup.
#[derive(Clone, Debug, Default)]
pub struct LibrarySnapshot {
    pub liked: HashSet<String>,
    pub discovered: HashSet<String>,
    pub stats: UserStats,
}

/// Persistence collaborator for the like/discovered sets and statistics.
///
/// `toggle_like` toggles on every call (two calls restore the original
/// state); `mark_discovered` is an idempotent add; the counters are
/// monotone. Implementations must not block mutations on disk latency.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn load(&self) -> Result<LibrarySnapshot>;
    /// Returns the new liked state of `id`.
    async fn toggle_like(&self, id: &str) -> Result<bool>;
    async fn mark_discovered(&self, id: &str) -> Result<()>;
    async fn record_swipe(&self) -> Result<()>;
    async fn touch_last_used(&self) -> Result<()>;
}

#[derive(Serialize, Deserialize, Default)]
struct LibraryFile {
    liked: Vec<String>,
    discovered: Vec<String>,
    stats: UserStats,
}

/// JSON-file-backed [`LibraryStore`] under `.cache/`.
#[derive(Clone)]
pub struct JsonLibraryStore {
    path: PathBuf,
    state: Arc<RwLock<LibrarySnapshot>>,
    last_error: Arc<RwLock<Option<String>>>,
}

impl JsonLibraryStore {
    pub fn new() -> Self {
        Self::with_path(LIBRARY_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(RwLock::new(LibrarySnapshot::default())),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Most recent background write failure, if any. Consumed by the main
    /// loop to surface a non-blocking notice.
    pub async fn take_error(&self) -> Option<String> {
        self.last_error.write().await.take()
    }

    /// Serialize the current state and write it out on a background task.
    async fn save_in_background(&self) {
        let file = {
            let state = self.state.read().await;
            LibraryFile {
                liked: state.liked.iter().cloned().collect(),
                discovered: state.discovered.iter().cloned().collect(),
                stats: state.stats.clone(),
            }
        };
        let path = self.path.clone();
        let last_error = self.last_error.clone();
        tokio::spawn(async move {
            if let Err(e) = write_library_file(&path, &file) {
                tracing::warn!(path = %path.display(), error = %e, "Library save failed");
                *last_error.write().await = Some(format!("Could not save library: {e}"));
            }
        });
    }
}

fn write_library_file(path: &Path, file: &LibraryFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let content = serde_json::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[async_trait]
impl LibraryStore for JsonLibraryStore {
    async fn load(&self) -> Result<LibrarySnapshot> {
        let path = self.path.clone();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: LibraryFile = serde_json::from_str(&content)?;
            let snapshot = LibrarySnapshot {
                liked: file.liked.into_iter().collect(),
                discovered: file.discovered.into_iter().collect(),
                stats: file.stats,
            };
            *self.state.write().await = snapshot.clone();
            tracing::info!(
                liked = snapshot.liked.len(),
                discovered = snapshot.discovered.len(),
                swipes = snapshot.stats.total_swipes,
                "Library loaded"
            );
            Ok(snapshot)
        } else {
            tracing::info!("No saved library, starting fresh");
            let snapshot = LibrarySnapshot::default();
            *self.state.write().await = snapshot.clone();
            Ok(snapshot)
        }
    }

    async fn toggle_like(&self, id: &str) -> Result<bool> {
        let now_liked = {
            let mut state = self.state.write().await;
            let now_liked = if state.liked.remove(id) {
                false
            } else {
                state.liked.insert(id.to_string());
                true
            };
            state.stats.total_liked = state.liked.len() as u64;
            state.stats.last_used = Utc::now();
            now_liked
        };
        self.save_in_background().await;
        Ok(now_liked)
    }

    async fn mark_discovered(&self, id: &str) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.discovered.insert(id.to_string());
            state.stats.total_discovered = state.discovered.len() as u64;
            state.stats.last_used = Utc::now();
        }
        self.save_in_background().await;
        Ok(())
    }

    async fn record_swipe(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.stats.total_swipes += 1;
            state.stats.last_used = Utc::now();
        }
        self.save_in_background().await;
        Ok(())
    }

    async fn touch_last_used(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.stats.last_used = Utc::now();
        }
        self.save_in_background().await;
        Ok(())
    }
}
