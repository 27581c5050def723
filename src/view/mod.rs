//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, rect math)
//! - `card`: Card stack rendering (active card, preview, empty state)
//! - `overlays`: Modal overlays (notice, help popup)

mod utils;
mod card;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{DeckView, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, deck: &DeckView, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header: title + deck position
                Constraint::Length(1), // Gesture hint line
                Constraint::Min(0),    // Card stack
                Constraint::Length(1), // Stats footer
            ])
            .split(frame.area());

        card::render_header(frame, chunks[0], deck);
        card::render_hint_line(frame, chunks[1]);

        if ui_state.loading {
            card::render_loading(frame, chunks[2]);
        } else if deck.empty {
            card::render_empty(frame, chunks[2]);
        } else {
            card::render_card_stack(frame, chunks[2], deck);
        }

        card::render_stats_footer(frame, chunks[3], deck);

        // Notice overlay (if there's a pending notice)
        if ui_state.notice.is_some() {
            overlays::render_notice(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
