//! Entry form rendering.
//!
//! Displays every record slot as a scrollable list, grouped by section,
//! followed by the submit button.

use crate::app::App;
use crate::form::{Preview, SubmissionState};
use crate::schema::{FieldSlot, FileSlot, Section, TextField};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

/// Render the entry form.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Text fields show their value and any validation error on a second line.
/// Attachment slots show the attached file and its preview; the focused slot
/// shows the path being typed instead.
pub fn render_form(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let focused = app.focused_slot();
    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_item = 0;

    items.push(section_header("Project Details"));
    for field in TextField::all() {
        let slot = FieldSlot::Text(field);
        if slot == focused {
            selected_item = items.len();
        }
        items.push(text_item(app, field, slot == focused));
    }

    for section in Section::ALL {
        items.push(section_header(section.title()));
        for file_slot in FileSlot::in_section(section) {
            let slot = FieldSlot::Attachment(file_slot);
            if slot == focused {
                selected_item = items.len();
            }
            items.push(file_item(app, file_slot, slot == focused));
        }
    }

    let mut list_state = ListState::default();
    list_state.select(Some(selected_item));

    let title = match app.entry.errors().len() {
        0 => format!(
            "Add Architectural Project ({} attachments)",
            app.entry.draft().attachment_count()
        ),
        invalid => format!(
            "Add Architectural Project ({} attachments, {invalid} invalid)",
            app.entry.draft().attachment_count()
        ),
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue));

    StatefulWidget::render(list, chunks[0], buf, &mut list_state);
    render_submit_button(app, chunks[1], buf);
}

fn section_header(title: &str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        title.to_uppercase(),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )))
}

fn label_span(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("{label:<24}"), style)
}

fn text_item<'a>(app: &'a App, field: TextField, focused: bool) -> ListItem<'a> {
    let value = app.entry.draft().text(field);
    let value_span = if value.is_empty() && !focused {
        Span::styled(field.spec().placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(value, Style::default().fg(Color::White))
    };

    let mut first = vec![label_span(field.label(), focused), value_span];
    if focused {
        first.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(message) = app.entry.error(field) {
        lines.push(Line::from(Span::styled(
            format!("{:24}{message}", ""),
            Style::default().fg(Color::Red),
        )));
    }
    ListItem::new(lines)
}

fn file_item<'a>(app: &'a App, slot: FileSlot, focused: bool) -> ListItem<'a> {
    let value_span = if focused {
        Span::styled(
            format!("path: {}_", app.path_input),
            Style::default().fg(Color::White),
        )
    } else {
        match app.entry.draft().file(slot) {
            Some(file) => Span::styled(
                format!("{} ({} bytes, {})", file.file_name, file.size(), file.content_type),
                Style::default().fg(Color::White),
            ),
            None => Span::styled("no file", Style::default().fg(Color::DarkGray)),
        }
    };

    let mut lines = vec![Line::from(vec![label_span(slot.label(), focused), value_span])];
    if let Some(preview) = app.entry.preview(slot) {
        let color = match preview {
            Preview::Image(_) => Color::Green,
            Preview::PdfMarker | Preview::GenericMarker => Color::Gray,
        };
        lines.push(Line::from(Span::styled(
            format!("{:24}{}", "", preview.describe()),
            Style::default().fg(color),
        )));
    }
    ListItem::new(lines)
}

fn render_submit_button(app: &App, area: Rect, buf: &mut Buffer) {
    let (label, style) = match app.entry.state() {
        SubmissionState::Submitting => (
            "Submitting... (Esc to cancel)",
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        SubmissionState::Idle => (
            "Submit Project (Ctrl+S)",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(label, style)))
        .block(Block::default().borders(Borders::ALL))
        .alignment(ratatui::layout::Alignment::Center);
    Widget::render(paragraph, area, buf);
}
