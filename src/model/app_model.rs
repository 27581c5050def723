//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::store::{LibrarySnapshot, LibraryStore};
use super::types::{UiState, UserStats};

const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Main application model containing shared state
///
/// The card-stack state (deck, cursor, animator) lives with the stack
/// controller, which exclusively owns it. The model holds the in-memory
/// mirror of the persisted library plus UI chrome state.
pub struct AppModel {
    pub store: Option<Arc<dyn LibraryStore>>,
    library: Arc<Mutex<LibrarySnapshot>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            store: None,
            library: Arc::new(Mutex::new(LibrarySnapshot::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_store(&mut self, store: Arc<dyn LibraryStore>) {
        self.store = Some(store);
    }

    pub fn get_store(&self) -> Option<Arc<dyn LibraryStore>> {
        self.store.clone()
    }

    // ========================================================================
    // Library mirror (liked / discovered sets, statistics)
    // ========================================================================

    /// Seed the in-memory mirror from the persisted snapshot at startup.
    pub async fn seed_library(&self, snapshot: LibrarySnapshot) {
        *self.library.lock().await = snapshot;
    }

    pub async fn library_snapshot(&self) -> LibrarySnapshot {
        self.library.lock().await.clone()
    }

    pub async fn is_liked(&self, id: &str) -> bool {
        self.library.lock().await.liked.contains(id)
    }

    /// Toggle `id` in the in-memory like set, returning the new state.
    pub async fn toggle_liked(&self, id: &str) -> bool {
        let mut library = self.library.lock().await;
        let now_liked = if library.liked.remove(id) {
            false
        } else {
            library.liked.insert(id.to_string());
            true
        };
        library.stats.total_liked = library.liked.len() as u64;
        now_liked
    }

    /// Append-only add to the in-memory discovered set. Returns `true` when
    /// the id was not yet present.
    pub async fn mark_discovered(&self, id: &str) -> bool {
        let mut library = self.library.lock().await;
        let inserted = library.discovered.insert(id.to_string());
        library.stats.total_discovered = library.discovered.len() as u64;
        inserted
    }

    pub async fn count_swipe(&self) -> u64 {
        let mut library = self.library.lock().await;
        library.stats.total_swipes += 1;
        library.stats.total_swipes
    }

    pub async fn touch_last_used(&self, now: DateTime<Utc>) {
        self.library.lock().await.stats.last_used = now;
    }

    pub async fn stats(&self) -> UserStats {
        self.library.lock().await.stats.clone()
    }

    // ========================================================================
    // UI chrome
    // ========================================================================

    pub async fn set_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn clear_notice(&self) {
        let mut state = self.ui_state.lock().await;
        state.notice = None;
        state.notice_timestamp = None;
    }

    /// Drop a notice once it has been on screen long enough.
    pub async fn auto_clear_old_notice(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(at) = state.notice_timestamp {
            if at.elapsed() >= NOTICE_TIMEOUT {
                state.notice = None;
                state.notice_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn set_loading(&self, loading: bool) {
        self.ui_state.lock().await.loading = loading;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
