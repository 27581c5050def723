//! Utility functions for rendering UI components

use chrono::NaiveDate;
use ratatui::layout::Rect;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Shift `rect` by signed cell offsets and clip it to `bounds`. Cards mid
/// exit can be pushed entirely off-screen, in which case `None`.
pub fn offset_and_clip(rect: Rect, dx: i32, dy: i32, bounds: Rect) -> Option<Rect> {
    let x = rect.x as i32 + dx;
    let y = rect.y as i32 + dy;
    let right = (x + rect.width as i32).min(bounds.right() as i32);
    let bottom = (y + rect.height as i32).min(bounds.bottom() as i32);
    let x = x.max(bounds.x as i32);
    let y = y.max(bounds.y as i32);
    if right <= x || bottom <= y {
        return None;
    }
    Some(Rect {
        x: x as u16,
        y: y as u16,
        width: (right - x) as u16,
        height: (bottom - y) as u16,
    })
}

/// Scale a rect around its center.
pub fn scale_rect(rect: Rect, scale: f32) -> Rect {
    let width = ((rect.width as f32 * scale).round() as u16).max(1);
    let height = ((rect.height as f32 * scale).round() as u16).max(1);
    Rect {
        x: rect.x + (rect.width.saturating_sub(width)) / 2,
        y: rect.y + (rect.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_card_clips_to_none() {
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = Rect::new(10, 5, 40, 14);
        assert!(offset_and_clip(rect, 100, 0, bounds).is_none());
        assert!(offset_and_clip(rect, 0, -30, bounds).is_none());
        let partial = offset_and_clip(rect, -20, 0, bounds).unwrap();
        assert_eq!(partial.x, 0);
        assert_eq!(partial.width, 30);
    }

    #[test]
    fn scale_shrinks_around_center() {
        let rect = Rect::new(10, 10, 20, 10);
        let scaled = scale_rect(rect, 0.8);
        assert_eq!(scaled.width, 16);
        assert_eq!(scaled.height, 8);
        assert!(scaled.x > rect.x);
    }
}
