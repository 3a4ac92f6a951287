//! Application state management.
//!
//! Owns the forms, the listing, the session and the router, and runs the
//! network calls as background tasks whose outcomes are folded back in on
//! each tick of the event loop.

use crate::api::{ApiClient, ApiError, RecordSummary};
use crate::form::{EntryForm, LoginField, LoginForm, SUBMIT_SUCCESS};
use crate::listing::ListingView;
use crate::router::{Navigator, Route, Router};
use crate::schema::{FieldSlot, FileSlot, TextField};
use crate::session::Session;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Input mode on the listing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Arrow keys move the card cursor
    Browse,
    /// Typed characters edit the search term
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Single-line notification shown at the bottom of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
}

type Task<T> = Option<JoinHandle<Result<T, ApiError>>>;

/// Main application state.
#[derive(Debug)]
pub struct App {
    pub router: Router,
    pub session: Session,
    pub entry: EntryForm,
    pub listing: ListingView,
    pub login: LoginForm,
    pub login_focus: LoginField,
    /// Focused slot on the entry form, as an index into `FieldSlot::all()`
    pub form_focus: usize,
    /// Path being typed for the focused attachment slot
    pub path_input: String,
    pub mode: UiMode,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    client: ApiClient,
    session_path: PathBuf,
    submit_task: Task<serde_json::Value>,
    load_task: Task<Vec<RecordSummary>>,
    login_task: Task<String>,
}

impl App {
    pub fn new(client: ApiClient, session: Session, session_path: PathBuf, page_size: usize) -> Self {
        let router = Router::for_session(session.is_authenticated());
        Self {
            router,
            session,
            entry: EntryForm::new(),
            listing: ListingView::new(page_size),
            login: LoginForm::default(),
            login_focus: LoginField::Email,
            form_focus: 0,
            path_input: String::new(),
            mode: UiMode::Browse,
            toast: None,
            should_quit: false,
            client,
            session_path,
            submit_task: None,
            load_task: None,
            login_task: None,
        }
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn notify(&mut self, level: ToastLevel, text: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            text: text.into(),
        });
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.submit_task.is_some() || self.load_task.is_some() || self.login_task.is_some()
    }

    /// Switch tabs.
    ///
    /// # Details
    /// Entering the listing fetches the collection, as mounting it would.
    pub fn open_tab(&mut self, route: Route) {
        if self.router.current() == &route {
            return;
        }
        let mounts_listing = route == Route::ViewProjects;
        self.router.navigate(route);
        self.mode = UiMode::Browse;
        if mounts_listing {
            self.start_load();
        }
    }

    /// Leave the detail view.
    pub fn go_back(&mut self) {
        self.router.back();
    }

    // ---------------------------------------------------------------
    // Entry form
    // ---------------------------------------------------------------

    pub fn focused_slot(&self) -> FieldSlot {
        FieldSlot::all()
            .nth(self.form_focus)
            .unwrap_or(FieldSlot::Text(TextField::Title))
    }

    pub fn focus_next(&mut self) {
        let count = FieldSlot::all().count();
        self.form_focus = (self.form_focus + 1) % count;
        self.path_input.clear();
    }

    pub fn focus_prev(&mut self) {
        let count = FieldSlot::all().count();
        self.form_focus = (self.form_focus + count - 1) % count;
        self.path_input.clear();
    }

    /// Feed a typed character to the focused slot.
    pub fn form_input(&mut self, c: char) {
        match self.focused_slot() {
            FieldSlot::Text(field) => self.entry.push_char(field, c),
            FieldSlot::Attachment(_) => self.path_input.push(c),
        }
    }

    pub fn form_backspace(&mut self) {
        match self.focused_slot() {
            FieldSlot::Text(field) => self.entry.pop_char(field),
            FieldSlot::Attachment(_) => {
                self.path_input.pop();
            }
        }
    }

    /// Attach the typed path to the focused attachment slot.
    pub fn attach_typed_path(&mut self) {
        let FieldSlot::Attachment(slot) = self.focused_slot() else {
            return;
        };
        let raw = self.path_input.trim().to_string();
        if raw.is_empty() {
            return;
        }
        self.attach(slot, Path::new(&raw));
    }

    pub fn attach(&mut self, slot: FileSlot, path: &Path) {
        match self.entry.attach_path(slot, path) {
            Ok(()) => {
                self.path_input.clear();
                self.notify(ToastLevel::Info, format!("{} attached", slot.label()));
            }
            Err(err) => {
                warn!(slot = slot.key(), error = %err, "attachment rejected");
                self.notify(ToastLevel::Error, format!("{err:#}"));
            }
        }
    }

    /// Empty the focused attachment slot.
    pub fn clear_focused_attachment(&mut self) {
        if let FieldSlot::Attachment(slot) = self.focused_slot()
            && let Err(err) = self.entry.mutate_file(slot, None)
        {
            self.notify(ToastLevel::Error, err.to_string());
        }
    }

    /// Start uploading the form in the background.
    pub fn start_submit(&mut self) {
        match self.entry.begin_submit() {
            Ok(payload) => {
                let client = self.client.clone();
                self.submit_task =
                    Some(tokio::spawn(async move { client.upload_project(payload).await }));
                self.notify(ToastLevel::Info, "Submitting...");
            }
            Err(err) => self.notify(ToastLevel::Error, err.to_string()),
        }
    }

    /// Abort an in-flight upload.
    pub fn cancel_submit(&mut self) {
        if let Some(task) = self.submit_task.take() {
            task.abort();
        }
        if let Some(err) = self.entry.cancel_submit() {
            self.notify(ToastLevel::Error, err.to_string());
        }
    }

    // ---------------------------------------------------------------
    // Listing
    // ---------------------------------------------------------------

    /// Start fetching the collection unless a fetch is already running.
    pub fn start_load(&mut self) {
        if self.load_task.is_some() {
            return;
        }
        self.listing.begin_load();
        let client = self.client.clone();
        self.load_task = Some(tokio::spawn(async move { client.fetch_projects().await }));
    }

    /// "Show more" on the card under the cursor.
    pub fn show_selected(&mut self) {
        let id = self
            .listing
            .selected_record()
            .and_then(|record| record.id.clone());
        self.listing.select_record(id.as_deref(), &mut self.router);
    }

    pub fn detail_record(&self) -> Option<&RecordSummary> {
        match self.router.current() {
            Route::ProjectDetail(id) => self.listing.find(id),
            _ => None,
        }
    }

    // ---------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------

    pub fn start_login(&mut self) {
        match self.login.begin_login() {
            Ok((email, password)) => {
                let client = self.client.clone();
                self.login_task =
                    Some(tokio::spawn(async move { client.login(&email, &password).await }));
            }
            Err(message) => self.notify(ToastLevel::Error, message),
        }
    }

    /// Sign out and drop everything fetched or in flight for the old session.
    pub fn logout(&mut self) {
        if let Some(task) = self.submit_task.take() {
            task.abort();
        }
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        if let Some(task) = self.login_task.take() {
            task.abort();
        }
        self.entry.cancel_submit();
        self.entry.release_previews();
        self.listing.reset();
        self.mode = UiMode::Browse;
        self.session.clear();
        self.persist_session();
        self.client.set_session(&self.session);
        self.router.reset(Route::Login);
        info!("logged out");
        self.notify(ToastLevel::Info, "Logged out");
    }

    fn persist_session(&mut self) {
        if let Err(err) = self.session.save(&self.session_path) {
            warn!(error = %err, "failed to save session");
            self.notify(ToastLevel::Error, format!("Failed to save session: {err}"));
        }
    }

    // ---------------------------------------------------------------
    // Background tasks
    // ---------------------------------------------------------------

    /// Fold finished background tasks back into state.
    ///
    /// # Details
    /// Only tasks that already finished are awaited, so this never blocks
    /// the event loop.
    pub async fn poll_tasks(&mut self) {
        if let Some(outcome) = take_finished(&mut self.submit_task).await {
            match self.entry.finish_submit(outcome) {
                Ok(_) => self.notify(ToastLevel::Success, SUBMIT_SUCCESS),
                Err(err) => self.notify(ToastLevel::Error, err.to_string()),
            }
        }

        if let Some(outcome) = take_finished(&mut self.load_task).await {
            self.listing.finish_load(outcome);
        }

        if let Some(outcome) = take_finished(&mut self.login_task).await {
            match self.login.finish_login(outcome, &mut self.session) {
                Ok(message) => {
                    self.persist_session();
                    self.client.set_session(&self.session);
                    self.router.reset(Route::AddProject);
                    self.notify(ToastLevel::Success, message);
                }
                Err(message) => self.notify(ToastLevel::Error, message),
            }
        }
    }
}

async fn take_finished<T>(slot: &mut Task<T>) -> Option<Result<T, ApiError>> {
    if !slot.as_ref().is_some_and(JoinHandle::is_finished) {
        return None;
    }
    let task = slot.take()?;
    Some(task.await.unwrap_or_else(|err| Err(ApiError::Task(err))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::test_config;
    use crate::form::SubmissionState;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer, dir: &TempDir, session: Session) -> App {
        let client = ApiClient::new(&test_config(server), &session).unwrap();
        App::new(client, session, dir.path().join("session.json"), 9)
    }

    fn logged_in() -> Session {
        let mut session = Session::default();
        session.update("tok".to_string(), "a@b.co");
        session
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_tasks().await;
            if !app.has_pending_tasks() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background tasks did not settle");
    }

    #[tokio::test]
    async fn test_boot_routes_by_session() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        assert_eq!(app_for(&server, &dir, Session::default()).route(), &Route::Login);
        assert_eq!(app_for(&server, &dir, logged_in()).route(), &Route::AddProject);
    }

    #[tokio::test]
    async fn test_typing_into_text_and_attachment_slots() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, logged_in());

        for c in "Villa".chars() {
            app.form_input(c);
        }
        assert_eq!(app.entry.draft().text(TextField::Title), "Villa");

        let file = dir.path().join("plan.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        app.form_focus = 12;
        for c in file.to_string_lossy().chars() {
            app.form_input(c);
        }
        app.attach_typed_path();
        assert!(app.entry.draft().file(FileSlot::PresentationDrawing1).is_some());
        assert!(app.path_input.is_empty());

        app.clear_focused_attachment();
        assert!(app.entry.draft().file(FileSlot::PresentationDrawing1).is_none());
    }

    #[tokio::test]
    async fn test_submit_round_trip_through_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/architecture/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, logged_in());

        app.entry.mutate_scalar(TextField::ClientName, "Acme");
        app.start_submit();
        assert_eq!(app.entry.state(), SubmissionState::Submitting);
        app.start_submit();

        settle(&mut app).await;
        assert_eq!(app.entry.state(), SubmissionState::Idle);
        assert!(app.entry.draft().is_blank());
        assert_eq!(
            app.toast,
            Some(Toast {
                level: ToastLevel::Success,
                text: SUBMIT_SUCCESS.to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_submit_returns_to_idle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, logged_in());

        app.start_submit();
        app.cancel_submit();
        assert_eq!(app.entry.state(), SubmissionState::Idle);
        assert!(!app.has_pending_tasks());
        assert_eq!(app.toast.as_ref().map(|t| t.level), Some(ToastLevel::Error));
    }

    #[tokio::test]
    async fn test_opening_listing_fetches_and_show_more_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/architecture/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [{"_id": "a1", "clientName": "Acme Corp", "siteAddress": "Pune"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, logged_in());

        app.open_tab(Route::ViewProjects);
        assert!(app.listing.is_loading());
        settle(&mut app).await;
        assert_eq!(app.listing.collection().len(), 1);

        app.show_selected();
        assert_eq!(app.route(), &Route::ProjectDetail("a1".to_string()));
        assert_eq!(app.detail_record().unwrap().client_name.as_deref(), Some("Acme Corp"));

        app.go_back();
        assert_eq!(app.route(), &Route::ViewProjects);
    }

    #[tokio::test]
    async fn test_login_then_logout_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "fresh"})))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, Session::default());

        app.login.email = "a@b.co".to_string();
        app.login.password = "secret1".to_string();
        app.start_login();
        settle(&mut app).await;

        assert_eq!(app.route(), &Route::AddProject);
        let stored = Session::load(&dir.path().join("session.json")).unwrap();
        assert_eq!(stored.token(), Some("fresh"));

        app.logout();
        assert_eq!(app.route(), &Route::Login);
        let stored = Session::load(&dir.path().join("session.json")).unwrap();
        assert!(!stored.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_drops_listing_and_in_flight_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/architecture/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [{"_id": "a1", "clientName": "Acme Corp"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/architecture/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true}))
                    .set_delay(Duration::from_secs(1)),
            )
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&server, &dir, logged_in());

        app.open_tab(Route::ViewProjects);
        settle(&mut app).await;
        app.listing.push_search_char('a');
        assert_eq!(app.listing.collection().len(), 1);

        app.open_tab(Route::AddProject);
        app.start_submit();
        app.open_tab(Route::ViewProjects);
        assert!(app.has_pending_tasks());

        app.logout();
        assert!(!app.has_pending_tasks());
        assert!(app.listing.collection().is_empty());
        assert_eq!(app.listing.search_term(), "");
        assert!(!app.listing.is_loading());
        assert_eq!(app.entry.state(), SubmissionState::Idle);
    }
}
