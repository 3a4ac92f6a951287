//! Login screen rendering.

use crate::app::App;
use crate::form::LoginField;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the login form.
///
/// # Details
/// The password is masked. Field errors appear under each field.
pub fn render_login(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = Vec::new();

    for field in [LoginField::Email, LoginField::Password] {
        let focused = app.login_focus == field;
        let value = app.login.value(field);
        let shown = match field {
            LoginField::Email => value.to_string(),
            LoginField::Password => "*".repeat(value.chars().count()),
        };

        lines.push(Line::from(Span::styled(
            field.label(),
            Style::default().fg(if focused { Color::Yellow } else { Color::Cyan }),
        )));
        lines.push(Line::from(vec![
            Span::styled(shown, Style::default().fg(Color::White)),
            Span::styled(if focused { "_" } else { "" }, Style::default().fg(Color::Yellow)),
        ]));
        match app.login.error(field) {
            Some(message) => lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from("")),
        }
    }

    let button = if app.login.is_submitting() {
        Span::styled(" Submitting... ", Style::default().fg(Color::White).bg(Color::DarkGray))
    } else {
        Span::styled(
            " Login (Enter) ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(button));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab: switch field  Esc: quit",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(Block::default().title("Login").borders(Borders::ALL));
    Widget::render(paragraph, area, buf);
}
