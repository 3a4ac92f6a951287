//! Project detail rendering.

use crate::api::RecordSummary;
use crate::app::App;
use crate::router::Route;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Render the project selected from the listing.
///
/// # Details
/// Shows the summary fields first, then every other field the backend sent.
pub fn render_detail(app: &App, area: Rect, buf: &mut Buffer) {
    let id = match app.route() {
        Route::ProjectDetail(id) => id.as_str(),
        _ => "",
    };

    let lines = match app.detail_record() {
        Some(record) => record_lines(record),
        None => vec![Line::from(Span::styled(
            format!("Project {id} is not in the loaded collection."),
            Style::default().fg(Color::Red),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!("Project {id} (Esc: back)"))
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false });
    Widget::render(paragraph, area, buf);
}

fn record_lines(record: &RecordSummary) -> Vec<Line<'_>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<24}"), Style::default().fg(Color::Cyan)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        field("Client", RecordSummary::display(record.client_name.as_deref()).to_string()),
        field("Type", RecordSummary::display(record.project_type.as_deref()).to_string()),
        field("Project Head", RecordSummary::display(record.project_head.as_deref()).to_string()),
    ];

    for (key, value) in &record.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        lines.push(field(key, value));
    }
    lines
}
