//! Search widget rendering.
//!
//! Displays the client-name search input above the project cards.

use crate::app::{App, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the search widget.
///
/// # Details
/// Highlights when in search mode.
pub fn render_search(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.mode == UiMode::Search;
    let term = app.listing.search_term();

    let line = if term.is_empty() && !is_active {
        Line::from(Span::styled(
            "Search by client name... (press '/')",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                term,
                Style::default().fg(if is_active { Color::White } else { Color::Gray }),
            ),
            Span::styled(
                if is_active { "_" } else { "" },
                Style::default().fg(Color::Yellow),
            ),
        ])
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}
