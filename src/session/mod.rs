//! Paging state for one logical query.
//!
//! A `SearchSession` moves `Idle → Loading → Ready` (or `Error`, shown as
//! ready-with-no-results). Every state change that needs data hands out a
//! [`PageRequest`] stamped with the session generation; the outcome is fed
//! back through [`SearchSession::complete`], which drops any request that a
//! newer one has superseded. That keeps a slow page-1 response from
//! overwriting a fast page-2 response without any transport-level
//! cancellation.

pub mod pagination;

use crate::catalog::client::CatalogClient;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::model::{CatalogItem, QueryFields};

pub use pagination::{PageEstimate, WINDOW, estimate, total_pages, visible_pages};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; treated as ready with empty results.
    Error,
}

/// Which listing a page request reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    Search(QueryFields),
    /// Query-less default listing, used whenever every field is empty.
    Popular,
}

/// A page fetch issued by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number.
    pub page: u32,
    pub size: u32,
    pub source: FetchSource,
    generation: u64,
}

impl PageRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Paging and result state for the current query.
#[derive(Debug, Clone)]
pub struct SearchSession {
    fields: QueryFields,
    current_page: u32,
    page_size: u32,
    max_results: u32,
    items: Vec<CatalogItem>,
    last_page_count: u32,
    has_more: bool,
    total_estimate: u32,
    state: SessionState,
    generation: u64,
    last_error: Option<CatalogError>,
}

impl SearchSession {
    /// `page_size` is clamped to `1..=max_results`.
    pub fn new(page_size: u32, max_results: u32) -> Self {
        let max_results = max_results.max(1);
        Self {
            fields: QueryFields::default(),
            current_page: 1,
            page_size: page_size.clamp(1, max_results),
            max_results,
            items: Vec::new(),
            last_page_count: 0,
            has_more: false,
            total_estimate: 0,
            state: SessionState::Idle,
            generation: 0,
            last_error: None,
        }
    }

    /// Start a new query at page 1.
    ///
    /// Empty fields fall back to the default listing rather than a search.
    pub fn set_query(&mut self, fields: QueryFields) -> PageRequest {
        self.fields = fields.normalized();
        self.reset_paging();
        self.issue()
    }

    /// Navigate to one-based page `n`.
    ///
    /// Returns `None` (and changes nothing) when `n` is the current page or
    /// outside `1..=total_pages`. Results are replaced, not appended.
    pub fn go_to_page(&mut self, n: u32) -> Option<PageRequest> {
        if n == self.current_page || n < 1 || n > self.total_pages() {
            return None;
        }
        self.current_page = n;
        Some(self.issue())
    }

    /// Change the page size and restart at page 1 with the same fields.
    pub fn set_page_size(&mut self, size: u32) -> PageRequest {
        self.page_size = size.clamp(1, self.max_results);
        self.reset_paging();
        self.issue()
    }

    /// Apply the outcome of `request`.
    ///
    /// Returns `false` when the request was superseded and its outcome
    /// ignored. A failure leaves an empty result set with the previous
    /// estimate intact so navigation stays usable.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        outcome: CatalogResult<Vec<CatalogItem>>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                stale = request.generation,
                current = self.generation,
                page = request.page,
                "ignoring superseded page response"
            );
            return false;
        }

        match outcome {
            Ok(items) => {
                let count = u32::try_from(items.len()).unwrap_or(u32::MAX);
                let next = estimate(
                    self.total_estimate,
                    request.page,
                    request.size,
                    count,
                    self.max_results,
                );
                self.items = items;
                self.last_page_count = count;
                self.has_more = next.has_more;
                self.total_estimate = next.total_estimate;
                self.state = SessionState::Ready;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, page = request.page, "page fetch failed");
                self.items.clear();
                self.last_page_count = 0;
                self.has_more = false;
                self.state = SessionState::Error;
                self.last_error = Some(e);
            }
        }
        true
    }

    /// Fetch `request` through `client` and apply the outcome.
    pub fn run(&mut self, client: &CatalogClient, request: PageRequest) -> bool {
        let outcome = client.fetch_page(&request);
        self.complete(&request, outcome)
    }

    pub fn fields(&self) -> &QueryFields {
        &self.fields
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Raw items of the last applied page (not annotated).
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn last_page_count(&self) -> u32 {
        self.last_page_count
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_estimate(&self) -> u32 {
        self.total_estimate
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_estimate, self.page_size)
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        visible_pages(self.current_page, self.total_pages())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Error from the last applied fetch, for a passive notice.
    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn source(&self) -> FetchSource {
        if self.fields.is_empty() {
            FetchSource::Popular
        } else {
            FetchSource::Search(self.fields.clone())
        }
    }

    fn reset_paging(&mut self) {
        self.current_page = 1;
        self.items.clear();
        self.last_page_count = 0;
        self.has_more = false;
        self.total_estimate = 0;
        self.last_error = None;
    }

    fn issue(&mut self) -> PageRequest {
        self.generation += 1;
        self.state = SessionState::Loading;
        PageRequest {
            page: self.current_page,
            size: self.page_size,
            source: self.source(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::memory::{BackendCall, Failures, MemoryBackend};

    fn catalog(n: usize) -> Vec<CatalogItem> {
        (0..n)
            .map(|i| CatalogItem::new(format!("id-{i}"), format!("Calm book {i}")))
            .collect()
    }

    fn setup(n: usize) -> (Arc<MemoryBackend>, CatalogClient, SearchSession) {
        let backend = Arc::new(MemoryBackend::new(catalog(n)));
        let client = CatalogClient::new(backend.clone(), 48);
        (backend, client, SearchSession::new(8, 48))
    }

    #[test]
    fn empty_query_uses_popular_listing() {
        let (backend, client, mut session) = setup(13);
        let request = session.set_query(QueryFields::free_text("   "));
        assert_eq!(request.source, FetchSource::Popular);
        assert!(session.run(&client, request));
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Popular { page: 0, size: 8 }]
        );
        assert_eq!(session.items().len(), 8);
    }

    #[test]
    fn unknown_subject_only_query_never_sends_empty_search() {
        let (backend, client, mut session) = setup(13);
        let request = session.set_query(QueryFields::default().with_subject("Astrology"));
        assert!(session.run(&client, request));
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Popular { page: 0, size: 8 }]
        );
        assert_eq!(session.items().len(), 8);
        assert!(session.has_more());
    }

    #[test]
    fn thirteen_items_across_two_pages() {
        let (backend, client, mut session) = setup(13);
        let request = session.set_query(QueryFields::default());
        session.run(&client, request);
        assert!(session.has_more());
        assert_eq!(session.total_estimate(), 9);
        assert_eq!(session.total_pages(), 2);
        assert_eq!(session.state(), SessionState::Ready);

        let request = session.go_to_page(2).expect("page 2 is reachable");
        session.run(&client, request);
        assert!(!session.has_more());
        assert_eq!(session.total_estimate(), 13);
        assert_eq!(session.total_pages(), 2);
        assert_eq!(session.items().len(), 5);
        assert_eq!(session.items()[0].id, "id-8");

        assert_eq!(
            backend.calls().last(),
            Some(&BackendCall::Popular { page: 1, size: 8 })
        );
    }

    #[test]
    fn out_of_range_navigation_is_a_no_op() {
        let (_backend, client, mut session) = setup(13);
        let request = session.set_query(QueryFields::default());
        session.run(&client, request);

        let generation = session.generation();
        for n in [0, 1, session.total_pages() + 1] {
            assert!(session.go_to_page(n).is_none());
        }
        assert_eq!(session.generation(), generation);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn superseded_responses_are_ignored() {
        let (_backend, client, mut session) = setup(20);
        let slow = session.set_query(QueryFields::free_text("calm"));
        let fast = session.set_query(QueryFields::free_text("book 1"));

        let fast_items = client.fetch_page(&fast).unwrap();
        assert!(session.complete(&fast, Ok(fast_items.clone())));

        let slow_items = client.fetch_page(&slow).unwrap();
        assert!(!session.complete(&slow, Ok(slow_items)));
        assert_eq!(session.items(), fast_items.as_slice());
        assert_eq!(session.fields(), &QueryFields::free_text("book 1"));
    }

    #[test]
    fn stale_page_cannot_overwrite_newer_page() {
        let (_backend, client, mut session) = setup(40);
        let first = session.set_query(QueryFields::default());
        session.run(&client, first);
        let to_two = session.go_to_page(2).unwrap();
        session.run(&client, to_two);
        let back_to_one = session.go_to_page(1).unwrap();
        let to_three = session.go_to_page(3).unwrap();

        let three = client.fetch_page(&to_three).unwrap();
        assert!(session.complete(&to_three, Ok(three)));
        let one = client.fetch_page(&back_to_one).unwrap();
        assert!(!session.complete(&back_to_one, Ok(one)));
        assert_eq!(session.current_page(), 3);
        assert_eq!(session.items()[0].id, "id-16");
    }

    #[test]
    fn failures_read_as_empty_but_keep_navigation() {
        let (backend, client, mut session) = setup(30);
        let request = session.set_query(QueryFields::default());
        session.run(&client, request);
        let pages = session.total_pages();

        backend.set_failures(Failures {
            popular: true,
            ..Default::default()
        });
        let request = session.go_to_page(2).unwrap();
        assert!(session.run(&client, request));
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.items().is_empty());
        assert!(session.last_error().is_some());
        assert_eq!(session.total_pages(), pages);
        assert!(session.go_to_page(1).is_some());
    }

    #[test]
    fn page_size_change_restarts_at_page_one() {
        let (backend, client, mut session) = setup(30);
        let request = session.set_query(QueryFields::free_text("calm"));
        session.run(&client, request);
        let request = session.go_to_page(2).unwrap();
        session.run(&client, request);

        let request = session.set_page_size(500);
        assert_eq!(request.page, 1);
        assert_eq!(request.size, 48);
        assert_eq!(request.source, FetchSource::Search(QueryFields::free_text("calm")));
        assert!(session.items().is_empty());
        session.run(&client, request);
        assert_eq!(session.items().len(), 30);
        assert!(!session.has_more());
        assert_eq!(session.total_pages(), 1);
        assert!(matches!(
            backend.calls().last(),
            Some(BackendCall::Search { page: 0, size: 48, .. })
        ));
    }

    #[test]
    fn estimate_is_non_decreasing_for_one_query() {
        let (_backend, client, mut session) = setup(45);
        let request = session.set_query(QueryFields::default());
        session.run(&client, request);
        let mut last = session.total_estimate();
        for page in [2, 3, 1, 4, 6, 5, 2] {
            if let Some(request) = session.go_to_page(page) {
                session.run(&client, request);
            }
            assert!(session.total_estimate() >= last);
            last = session.total_estimate();
        }
    }
}
