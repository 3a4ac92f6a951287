//! Tabs widget rendering.
//!
//! Displays the tab headers for switching between adding and viewing projects.

use crate::app::App;
use crate::router::Route;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the tabs widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Highlights the active tab. The detail screen keeps the listing tab lit.
/// The signed-in email is shown in the block title.
pub fn render_tabs(app: &App, area: Rect, buf: &mut Buffer) {
    let current = app.route();

    let mut spans = Vec::new();
    for (i, tab) in Route::TABS.iter().enumerate() {
        let is_active = current.is_active_tab(tab);
        let style = if is_active {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }

        spans.push(Span::styled(format!(" F{} {} ", i + 1, tab.title()), style));
    }

    let title = match app.session.email() {
        Some(email) => format!("archdesk - {email}"),
        None => "archdesk".to_string(),
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(ratatui::layout::Alignment::Center);

    Widget::render(paragraph, area, buf);
}
