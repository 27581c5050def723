//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the card stack.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key and mouse event handling
//! - `classify`: Gesture outcome classification
//! - `animator`: Card transition animator
//! - `stack`: Card-stack state machine and commit logic

mod input;
mod classify;
mod animator;
mod stack;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, ReleaseProvider};
use stack::StackState;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) stack: Arc<Mutex<StackState>>,
    pub(crate) provider: Arc<dyn ReleaseProvider>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, provider: Arc<dyn ReleaseProvider>) -> Self {
        Self {
            model,
            stack: Arc::new(Mutex::new(StackState::new())),
            provider,
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        format!("Error: {error:#}")
    }
}
