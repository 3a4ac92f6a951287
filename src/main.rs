//! archdesk - Terminal client for architectural project records.
//!
//! Main entry point and event loop for the application.

mod api;
mod app;
mod config;
mod form;
mod listing;
mod router;
mod schema;
mod session;
mod ui;

use anyhow::Context;
use api::ApiClient;
use app::{App, ToastLevel, UiMode};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use router::Route;
use schema::FieldSlot;
use session::Session;
use std::io;
use std::time::Duration;
use tracing::{error, info, warn};

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration and the stored session, initializes logging and the
/// terminal, and runs the event loop. A broken config or session file falls
/// back to defaults; only terminal failures abort.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = match Config::load(None) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    init_logging(&config)?;
    if let Some(err) = config_error {
        warn!(error = %format!("{err:#}"), "failed to load config, using defaults");
    }

    let session_path = config.session_file_path()?;
    let session = Session::load(&session_path).unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "failed to load session, starting signed out");
        Session::default()
    });

    let client = ApiClient::new(&config, &session).context("failed to build HTTP client")?;
    let mut app = App::new(client, session, session_path, config.page_size());
    info!(backend = %config.backend_url, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;
    if app.has_pending_tasks() {
        warn!("quitting with requests still in flight");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "event loop failed");
    }
    result
}

/// Route `tracing` output to the log file in the config directory.
///
/// # Details
/// The filter comes from `RUST_LOG`, defaulting to `archdesk=info`.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let dir = Config::app_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&dir, &config.log_file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("archdesk=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(filter),
        )
        .init();
    Ok(())
}

/// Render the complete UI.
///
/// # Details
/// Tab bar on top (hidden on the login screen), the current route's screen
/// in the middle and the toast line at the bottom.
fn render_ui(f: &mut ratatui::Frame, app: &App) {
    let show_tabs = app.route() != &Route::Login;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if show_tabs { 3 } else { 0 }), // Tabs
            Constraint::Min(0),                                // Screen
            Constraint::Length(1),                             // Toast
        ])
        .split(f.area());

    if show_tabs {
        ui::render_tabs(app, chunks[0], f.buffer_mut());
    }

    match app.route() {
        Route::Login => ui::render_login(app, chunks[1], f.buffer_mut()),
        Route::AddProject => ui::render_form(app, chunks[1], f.buffer_mut()),
        Route::ViewProjects => ui::render_list(app, chunks[1], f.buffer_mut()),
        Route::ProjectDetail(_) => ui::render_detail(app, chunks[1], f.buffer_mut()),
    }

    let toast = match &app.toast {
        Some(toast) => {
            let color = match toast.level {
                ToastLevel::Info => Color::Cyan,
                ToastLevel::Success => Color::Green,
                ToastLevel::Error => Color::Red,
            };
            Line::from(Span::styled(toast.text.as_str(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "F1/F2: switch tabs  Ctrl+L: log out  Ctrl+C: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(toast), chunks[2]);
}

/// Main event loop.
///
/// # Details
/// Polls for input every 100ms, folding finished network tasks into the
/// state on each tick so the UI never blocks on a request.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    while !app.should_quit {
        app.poll_tasks().await;
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(app, key);
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.route() != &Route::Login {
        match key.code {
            KeyCode::F(1) => return app.open_tab(Route::AddProject),
            KeyCode::F(2) => return app.open_tab(Route::ViewProjects),
            KeyCode::Char('l') if ctrl => return app.logout(),
            _ => {}
        }
    }

    match app.route().clone() {
        Route::Login => handle_login_key(app, key),
        Route::AddProject => handle_form_key(app, key, ctrl),
        Route::ViewProjects => handle_listing_key(app, key),
        Route::ProjectDetail(_) => match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.go_back(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_focus = app.login_focus.toggle();
        }
        KeyCode::Enter => app.start_login(),
        KeyCode::Backspace => app.login.pop_char(app.login_focus),
        KeyCode::Char(c) => app.login.push_char(app.login_focus, c),
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Char('s') if ctrl => app.start_submit(),
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Enter => match app.focused_slot() {
            FieldSlot::Attachment(_) if !app.path_input.trim().is_empty() => {
                app.attach_typed_path();
            }
            _ => app.start_submit(),
        },
        KeyCode::Delete => app.clear_focused_attachment(),
        KeyCode::Esc => {
            if app.entry.is_submitting() {
                app.cancel_submit();
            } else {
                app.clear_toast();
            }
        }
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) if !ctrl => app.form_input(c),
        _ => {}
    }
}

fn handle_listing_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        UiMode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.mode = UiMode::Browse,
            KeyCode::Backspace => app.listing.pop_search_char(),
            KeyCode::Char(c) => app.listing.push_search_char(c),
            _ => {}
        },
        UiMode::Browse => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('/') => app.mode = UiMode::Search,
            KeyCode::Left | KeyCode::Char('h') => {
                app.listing.prev_page();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                app.listing.next_page();
            }
            KeyCode::Up | KeyCode::Char('k') => app.listing.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => app.listing.cursor_down(),
            KeyCode::Enter => app.show_selected(),
            KeyCode::Char('r') => app.start_load(),
            _ => {}
        },
    }
}
