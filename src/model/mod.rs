//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the
//! application. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (releases, outcomes, transforms, stats)
//! - `deck`: Deck snapshot and bounded cursor
//! - `gesture`: Rolling gesture sampler
//! - `store`: Library persistence trait and JSON-backed store
//! - `catalog`: Release provider trait and JSON catalog
//! - `app_model`: Main application model with state management methods

mod types;
mod deck;
mod gesture;
mod store;
mod catalog;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    CardTransform, DeckView, GestureSample, Outcome, PreviewTransform, Release, StackPhase,
    UiState, UserStats, Viewport, UNITS_PER_COL, UNITS_PER_ROW,
};

pub use deck::Deck;
pub use gesture::GestureSampler;

pub use store::{JsonLibraryStore, LibrarySnapshot, LibraryStore};
pub use catalog::{CATALOG_PATH_ENV, JsonCatalog, ReleaseProvider};

pub use app_model::AppModel;
