//! Key and mouse event handling

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::model::{Outcome, UNITS_PER_COL, UNITS_PER_ROW};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                model.set_should_quit(true).await;
            }
            KeyCode::Esc => {
                model.clear_notice().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            // Reload the deck
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.reload_deck().await;
                });
            }
            // Keyboard fallbacks for the three gestures
            KeyCode::Right => {
                drop(model);
                self.trigger_outcome(Outcome::Advance, Instant::now()).await;
            }
            KeyCode::Left => {
                drop(model);
                self.trigger_outcome(Outcome::Retreat, Instant::now()).await;
            }
            KeyCode::Up => {
                drop(model);
                self.trigger_outcome(Outcome::Like, Instant::now()).await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Translate terminal mouse events into the pointer stream the gesture
    /// sampler consumes.
    pub async fn handle_mouse_event(&self, mouse: MouseEvent) -> Result<()> {
        let x = mouse.column as f32 * UNITS_PER_COL;
        let y = mouse.row as f32 * UNITS_PER_ROW;
        let now = Instant::now();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(x, y, now).await;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_move(x, y, now).await;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer_move(x, y, now).await;
                self.pointer_up(now).await;
            }
            _ => {}
        }
        Ok(())
    }
}
