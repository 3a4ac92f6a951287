//! Project listing rendering.
//!
//! Displays the search bar, a status banner, one page of project cards and
//! the pagination footer.

use crate::api::RecordSummary;
use crate::app::{App, UiMode};
use crate::ui::render_search;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

/// Render the listing screen.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Each card takes four lines:
/// - Line 1: Client name (bold)
/// - Line 2: Project type
/// - Line 3: Project head
/// - Line 4: Separator
///
/// The pagination footer only appears when there is more than one page.
pub fn render_list(app: &App, area: Rect, buf: &mut Buffer) {
    let listing = &app.listing;
    let page = listing.visible_page();
    let show_pagination = page.total_pages > 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Loading / error banner
            Constraint::Min(0),    // Cards
            Constraint::Length(if show_pagination { 3 } else { 0 }),
        ])
        .split(area);

    render_search(app, chunks[0], buf);
    render_banner(app, chunks[1], buf);

    let title = format!(
        "Architectural Projects ({}/{})",
        page.matched,
        listing.collection().len()
    );

    if page.records.is_empty() {
        let list = List::new(vec![ListItem::new("No projects found.")])
            .block(Block::default().title(title).borders(Borders::ALL));
        Widget::render(list, chunks[2], buf);
    } else {
        let separator_width = chunks[2].width.saturating_sub(2).max(10) as usize;
        let separator_line = "─".repeat(separator_width);
        let browsing = app.mode == UiMode::Browse;

        let items: Vec<ListItem> = page
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let is_selected = browsing && idx == listing.selected_index();
                card(record, is_selected, &separator_line)
            })
            .collect();

        let mut list_state = ListState::default();
        if browsing {
            list_state.select(Some(listing.selected_index()));
        }

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            );

        StatefulWidget::render(list, chunks[2], buf, &mut list_state);
    }

    if show_pagination {
        render_pagination(app, page.total_pages, chunks[3], buf);
    }
}

fn card<'a>(record: &'a RecordSummary, is_selected: bool, separator: &str) -> ListItem<'a> {
    let name_style = Style::default()
        .fg(if is_selected {
            Color::Yellow
        } else {
            Color::White
        })
        .add_modifier(Modifier::BOLD);

    let line1 = Line::from(vec![
        Span::styled("Client: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            RecordSummary::display(record.client_name.as_deref()),
            name_style,
        ),
    ]);
    let line2 = Line::from(vec![
        Span::styled("Type: ", Style::default().fg(Color::Cyan)),
        Span::raw(RecordSummary::display(record.project_type.as_deref())),
    ]);
    let line3 = Line::from(vec![
        Span::styled("Project Head: ", Style::default().fg(Color::Cyan)),
        Span::raw(RecordSummary::display(record.project_head.as_deref())),
    ]);
    let separator = Line::from(Span::styled(
        separator.to_string(),
        Style::default().fg(if is_selected {
            Color::Blue
        } else {
            Color::DarkGray
        }),
    ));

    ListItem::new(vec![line1, line2, line3, separator])
}

fn render_banner(app: &App, area: Rect, buf: &mut Buffer) {
    let line = if app.listing.is_loading() {
        Line::from(Span::styled("Loading projects...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = app.listing.error() {
        Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Enter: show more  /: search  Left/Right: page  r: refresh",
            Style::default().fg(Color::DarkGray),
        ))
    };
    Widget::render(Paragraph::new(line), area, buf);
}

fn render_pagination(app: &App, total_pages: usize, area: Rect, buf: &mut Buffer) {
    let listing = &app.listing;
    let enabled = Style::default().fg(Color::White).bg(Color::Blue);
    let disabled = Style::default().fg(Color::DarkGray);

    let line = Line::from(vec![
        Span::styled(
            " < Previous ",
            if listing.can_go_prev() { enabled } else { disabled },
        ),
        Span::raw(format!(
            "   Page {} of {}   ",
            listing.current_page(),
            total_pages
        )),
        Span::styled(
            " Next > ",
            if listing.can_go_next() { enabled } else { disabled },
        ),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(ratatui::layout::Alignment::Center);
    Widget::render(paragraph, area, buf);
}
