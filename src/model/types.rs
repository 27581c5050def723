//! Core type definitions for the application

use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A music release shown on a card.
///
/// Immutable once placed in a deck snapshot; the cursor moves over the
/// snapshot, items are never removed or reordered during a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    /// Ordered artist names, never empty for a valid catalog entry.
    pub artists: Vec<String>,
    pub release_date: NaiveDate,
    pub cover_url: String,
    /// Canonical external link for the release.
    pub link_url: String,
    /// Optional secondary video link, precomputed by the catalog pipeline.
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Release {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Discrete result of classifying a terminated gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Like,
    Advance,
    Retreat,
    Cancel,
}

/// Rolling sample of one in-flight gesture: cumulative displacement and
/// instantaneous velocity since the press, in device-independent units.
/// Discarded on release; no history is kept beyond the latest sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    pub dx: f32,
    pub dy: f32,
    pub vx: f32,
    pub vy: f32,
}

impl GestureSample {
    /// A sample with any non-finite field is an input anomaly and must be
    /// treated as Cancel by the classifier.
    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Terminal cells are taller than wide; these factors map cell coordinates
/// to the device-independent units gestures and thresholds are specified in.
pub const UNITS_PER_COL: f32 = 8.0;
pub const UNITS_PER_ROW: f32 = 16.0;

/// Interaction area dimensions in device-independent units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn of_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f32 * UNITS_PER_COL,
            height: rows as f32 * UNITS_PER_ROW,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        // Placeholder until the first terminal frame reports its size.
        Self { width: 640.0, height: 480.0 }
    }
}

/// Transform applied to the active card, in units and degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation: f32,
    pub scale: f32,
}

impl CardTransform {
    pub const REST: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotation: 0.0,
        scale: 1.0,
    };
}

/// Scale/opacity of the next-card preview behind the active card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewTransform {
    pub scale: f32,
    pub opacity: f32,
}

impl PreviewTransform {
    pub const REST: Self = Self { scale: 0.9, opacity: 0.8 };
}

/// Per-frame snapshot of the card stack handed to the view.
#[derive(Clone, Debug)]
pub struct DeckView {
    pub active: Option<Release>,
    pub next: Option<Release>,
    /// 1-based position of the active card and the deck length.
    pub position: (usize, usize),
    pub card: CardTransform,
    pub preview: PreviewTransform,
    pub active_liked: bool,
    pub liked_count: usize,
    pub discovered_count: usize,
    pub total_swipes: u64,
    pub empty: bool,
}

/// Where the card stack currently is in its commit cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPhase {
    /// No outcome pending; gestures are accepted.
    Idle,
    /// Exactly one outcome committed-to, exit animation in flight.
    Transitioning { run: u64, outcome: Outcome, index: usize },
    /// Deck has zero items; distinct display state, not a cursor value.
    Empty,
}

/// Aggregate usage counters plus session timestamps. Counters only increase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserStats {
    pub total_swipes: u64,
    pub total_liked: u64,
    pub total_discovered: u64,
    pub session_start: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl Default for UserStats {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            total_swipes: 0,
            total_liked: 0,
            total_discovered: 0,
            session_start: now,
            last_used: now,
        }
    }
}

/// UI state for the application
#[derive(Clone, Default)]
pub struct UiState {
    /// Non-blocking notice (side-effect write failures, reload errors).
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    /// Deck fetch in progress.
    pub loading: bool,
}
