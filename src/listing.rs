//! Project listing state.
//!
//! Holds the fetched project collection, the search term and the current
//! page. The visible page is always derived from those on demand; no
//! filtered copy is stored.

use crate::api::{ApiError, RecordSummary};
use crate::router::{Navigator, Route};
use tracing::{info, warn};

/// One page of filtered projects.
#[derive(Debug, PartialEq)]
pub struct VisiblePage<'a> {
    pub records: Vec<&'a RecordSummary>,
    pub total_pages: usize,
    /// Number of records matching the search term
    pub matched: usize,
}

/// Filter by client name and cut out one page.
///
/// # Arguments
/// * `search_term` - Case-insensitive substring matched against `clientName`
/// * `current_page` - 1-based page number
/// * `page_size` - Records per page (treated as at least 1)
/// * `collection` - Full, unfiltered collection
///
/// # Details
/// A record without `clientName` never matches, not even the empty term.
/// A page past the end is empty.
pub fn derive_visible_page<'a>(
    search_term: &str,
    current_page: usize,
    page_size: usize,
    collection: &'a [RecordSummary],
) -> VisiblePage<'a> {
    let page_size = page_size.max(1);
    let term = search_term.to_lowercase();

    let filtered: Vec<&RecordSummary> = collection
        .iter()
        .filter(|record| {
            record
                .client_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term))
        })
        .collect();

    let matched = filtered.len();
    let total_pages = matched.div_ceil(page_size);
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    let records = filtered.into_iter().skip(start).take(page_size).collect();

    VisiblePage {
        records,
        total_pages,
        matched,
    }
}

/// Listing view state.
#[derive(Debug)]
pub struct ListingView {
    collection: Vec<RecordSummary>,
    search_term: String,
    current_page: usize,
    page_size: usize,
    loading: bool,
    error: Option<String>,
    /// Card under the cursor, as an index into the visible page
    selected: usize,
}

impl ListingView {
    pub fn new(page_size: usize) -> Self {
        Self {
            collection: Vec::new(),
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            loading: false,
            error: None,
            selected: 0,
        }
    }

    pub fn collection(&self) -> &[RecordSummary] {
        &self.collection
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Forget the collection and the view state.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    /// Mark a fetch as started.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a fetch outcome.
    ///
    /// # Details
    /// Success replaces the collection wholesale. Failure keeps the last
    /// good collection and records the message for the error banner.
    pub fn finish_load(&mut self, outcome: Result<Vec<RecordSummary>, ApiError>) {
        self.loading = false;
        match outcome {
            Ok(records) => {
                info!(count = records.len(), "project collection replaced");
                self.collection = records;
                self.clamp_selection();
            }
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "failed to fetch projects");
                self.error = Some(format!("Failed to fetch projects: {err}"));
            }
        }
    }

    /// Fetch the collection and apply the outcome.
    #[cfg(test)]
    pub async fn load(&mut self, client: &crate::api::ApiClient) {
        self.begin_load();
        let outcome = client.fetch_projects().await;
        self.finish_load(outcome);
    }

    pub fn visible_page(&self) -> VisiblePage<'_> {
        derive_visible_page(
            &self.search_term,
            self.current_page,
            self.page_size,
            &self.collection,
        )
    }

    pub fn total_pages(&self) -> usize {
        self.visible_page().total_pages
    }

    /// Replace the search term.
    ///
    /// # Details
    /// The current page is kept even if the new term leaves fewer pages.
    #[cfg(test)]
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_term.push(c);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search_term.pop();
        self.clamp_selection();
    }

    /// Go back one page; inert on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    /// Go forward one page; inert on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Move the card cursor up, stopping at the first card.
    pub fn cursor_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the card cursor down, stopping at the last visible card.
    pub fn cursor_down(&mut self) {
        let visible = self.visible_page().records.len();
        if self.selected + 1 < visible {
            self.selected += 1;
        }
    }

    pub fn selected_record(&self) -> Option<&RecordSummary> {
        self.visible_page().records.get(self.selected).copied()
    }

    /// Hand a project over to the detail route.
    ///
    /// # Details
    /// Without an ID nothing happens apart from a log diagnostic.
    pub fn select_record(&self, id: Option<&str>, navigator: &mut impl Navigator) -> bool {
        match id {
            Some(id) if !id.is_empty() => {
                navigator.navigate(Route::ProjectDetail(id.to_string()));
                true
            }
            _ => {
                warn!("project ID is undefined");
                false
            }
        }
    }

    /// Record with the given backend ID, for the detail view.
    pub fn find(&self, id: &str) -> Option<&RecordSummary> {
        self.collection
            .iter()
            .find(|record| record.id.as_deref() == Some(id))
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_page().records.len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::api::client::tests::test_config;
    use crate::router::Router;
    use crate::session::Session;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn records(count: usize) -> Vec<RecordSummary> {
        (1..=count)
            .map(|i| RecordSummary::new(&i.to_string(), &format!("Client {i}")))
            .collect()
    }

    fn listing_with(records: Vec<RecordSummary>) -> ListingView {
        let mut listing = ListingView::new(9);
        listing.finish_load(Ok(records));
        listing
    }

    #[test]
    fn test_first_page_of_twenty() {
        let collection = records(20);
        let page = derive_visible_page("", 1, 9, &collection);
        assert_eq!(page.records.len(), 9);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_last_page_is_partial() {
        let collection = records(20);
        let page = derive_visible_page("", 3, 9, &collection);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id.as_deref(), Some("19"));
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let page = derive_visible_page("", 1, 9, &[]);
        assert!(page.records.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let collection = vec![RecordSummary::new("1", "Acme Corp")];
        assert_eq!(derive_visible_page("acme", 1, 9, &collection).matched, 1);
        assert_eq!(derive_visible_page("CORP", 1, 9, &collection).matched, 1);
        assert_eq!(derive_visible_page("me c", 1, 9, &collection).matched, 1);
        assert_eq!(derive_visible_page("zzz", 1, 9, &collection).matched, 0);
    }

    #[test]
    fn test_record_without_client_name_never_matches() {
        let collection = vec![
            RecordSummary::new("1", "Acme Corp"),
            RecordSummary {
                id: Some("2".to_string()),
                ..RecordSummary::default()
            },
        ];
        assert_eq!(derive_visible_page("", 1, 9, &collection).matched, 1);
        assert_eq!(derive_visible_page("a", 1, 9, &collection).matched, 1);
    }

    #[test]
    fn test_pagination_bounds() {
        let mut listing = listing_with(records(20));
        assert!(!listing.prev_page());
        assert_eq!(listing.current_page(), 1);

        assert!(listing.next_page());
        assert!(listing.next_page());
        assert_eq!(listing.current_page(), 3);
        assert!(!listing.next_page());
        assert_eq!(listing.current_page(), 3);

        assert!(listing.prev_page());
        assert_eq!(listing.current_page(), 2);
    }

    #[test]
    fn test_next_is_inert_without_results() {
        let mut listing = listing_with(Vec::new());
        assert!(!listing.next_page());
        assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn test_page_is_not_reset_when_filter_shrinks() {
        let mut listing = listing_with(records(20));
        listing.next_page();
        listing.next_page();
        listing.set_search_term("Client 1");
        // "Client 1" and "Client 10".."Client 19" match: 11 records, 2 pages
        assert_eq!(listing.current_page(), 3);
        assert_eq!(listing.total_pages(), 2);
        assert!(listing.visible_page().records.is_empty());
        assert!(listing.can_go_prev());
        assert!(!listing.can_go_next());
    }

    #[test]
    fn test_cursor_stays_within_page() {
        let mut listing = listing_with(records(3));
        listing.cursor_up();
        assert_eq!(listing.selected_index(), 0);
        listing.cursor_down();
        listing.cursor_down();
        listing.cursor_down();
        assert_eq!(listing.selected_index(), 2);
        assert_eq!(listing.selected_record().unwrap().id.as_deref(), Some("3"));

        listing.push_search_char('1');
        assert_eq!(listing.selected_index(), 0);
    }

    #[test]
    fn test_select_record_navigates() {
        let listing = listing_with(records(2));
        let mut router = Router::for_session(true);

        assert!(listing.select_record(Some("2"), &mut router));
        assert_eq!(router.current(), &Route::ProjectDetail("2".to_string()));
        assert_eq!(listing.find("2").unwrap().client_name.as_deref(), Some("Client 2"));
    }

    #[test]
    fn test_select_record_without_id_is_noop() {
        let listing = listing_with(records(2));
        let mut router = Router::for_session(true);

        assert!(!listing.select_record(None, &mut router));
        assert!(!listing.select_record(Some(""), &mut router));
        assert_eq!(router.current(), &Route::AddProject);
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/architecture/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"_id": "7", "clientName": "Solo"}
            })))
            .mount(&server)
            .await;
        let client = ApiClient::new(&test_config(&server), &Session::default()).unwrap();

        let mut listing = listing_with(records(4));
        listing.load(&client).await;
        assert!(!listing.is_loading());
        assert!(listing.error().is_none());
        assert_eq!(listing.collection(), &[RecordSummary::new("7", "Solo")]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = ApiClient::new(&test_config(&server), &Session::default()).unwrap();

        let mut listing = listing_with(records(4));
        listing.load(&client).await;
        assert!(!listing.is_loading());
        assert!(listing.error().unwrap().starts_with("Failed to fetch projects"));
        assert_eq!(listing.collection().len(), 4);
    }
}
