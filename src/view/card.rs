//! Card stack rendering (header, active card, preview, empty state)

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::model::{DeckView, Release, UNITS_PER_COL, UNITS_PER_ROW};
use super::utils::{centered_rect, format_release_date, offset_and_clip, scale_rect, truncate_string};

pub fn render_header(frame: &mut Frame, area: Rect, deck: &DeckView) {
    let position = if deck.empty {
        String::new()
    } else {
        format!("{} / {}", deck.position.0, deck.position.1)
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "⚡ Discover",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(position, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

pub fn render_hint_line(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new("Swipe up to like • right for next • left to go back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, area);
}

pub fn render_card_stack(frame: &mut Frame, area: Rect, deck: &DeckView) {
    let base = card_rect(area);

    if let Some(next) = &deck.next {
        render_preview_card(frame, area, base, next, deck);
    }

    if let Some(active) = &deck.active {
        render_active_card(frame, area, base, active, deck);
    }
}

fn card_rect(area: Rect) -> Rect {
    let width = (area.width * 3 / 5).clamp(24, 60).min(area.width);
    let height = (area.height * 4 / 5).max(8).min(area.height);
    centered_rect(area, width, height)
}

fn render_preview_card(frame: &mut Frame, area: Rect, base: Rect, next: &Release, deck: &DeckView) {
    let rect = scale_rect(base, deck.preview.scale);
    let Some(rect) = offset_and_clip(rect, 0, 0, area) else {
        return;
    };

    // Terminal cells have no alpha channel; the preview brightens from gray
    // to white as it approaches full opacity.
    let fg = if deck.preview.opacity >= 0.95 {
        Color::White
    } else {
        Color::DarkGray
    };

    let text_width = rect.width.saturating_sub(4) as usize;
    let preview = Paragraph::new(vec![
        Line::default(),
        Line::from(truncate_string(&next.title, text_width)),
        Line::from(truncate_string(&next.artist_line(), text_width)),
    ])
    .style(Style::default().fg(fg))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(fg))
            .title(" UP NEXT ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(preview, rect);
}

fn render_active_card(frame: &mut Frame, area: Rect, base: Rect, active: &Release, deck: &DeckView) {
    let dx = (deck.card.translate_x / UNITS_PER_COL).round() as i32;
    let dy = (deck.card.translate_y / UNITS_PER_ROW).round() as i32;
    let rect = scale_rect(base, deck.card.scale);
    let Some(rect) = offset_and_clip(rect, dx, dy, area) else {
        return;
    };

    // No rotation in a terminal; a tilted card leans its text instead.
    let alignment = if deck.card.rotation < -2.0 {
        Alignment::Left
    } else if deck.card.rotation > 2.0 {
        Alignment::Right
    } else {
        Alignment::Center
    };

    let text_width = rect.width.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            truncate_string(&active.title, text_width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_string(&active.artist_line(), text_width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format_release_date(active.release_date),
            Style::default().fg(Color::Green),
        )),
        Line::default(),
        Line::from(Span::styled(
            truncate_string(&active.link_url, text_width),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(video) = &active.video_url {
        lines.push(Line::from(Span::styled(
            truncate_string(video, text_width),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .padding(Padding::horizontal(1));
    if deck.active_liked {
        block = block
            .title(" ♥ Liked ")
            .title_alignment(Alignment::Right)
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    }

    let card = Paragraph::new(lines).alignment(alignment).block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(card, rect);
}

pub fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading releases...")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(loading, centered_rect(area, area.width, 1));
}

pub fn render_empty(frame: &mut Frame, area: Rect) {
    let rect = centered_rect(area, area.width.min(50), 4);
    let empty = Paragraph::new(vec![
        Line::from(Span::styled(
            "No releases to discover",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press r to reload",
            Style::default().fg(Color::Green),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(empty, rect);
}

pub fn render_stats_footer(frame: &mut Frame, area: Rect, deck: &DeckView) {
    let footer = Paragraph::new(format!(
        "♥ {} liked • {} discovered • {} swipes",
        deck.liked_count, deck.discovered_count, deck.total_swipes
    ))
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
