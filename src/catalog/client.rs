//! Typed access to the catalog read endpoints.
//!
//! `CatalogClient` is pure request/response on top of a [`CatalogBackend`]:
//! it bounds page sizes, drops unset query fields, validates the subject
//! filter, and recovers the subject list locally when the service fails.

use std::sync::Arc;

use crate::catalog::backend::CatalogBackend;
use crate::catalog::error::CatalogResult;
use crate::catalog::model::{CatalogItem, QueryFields};
use crate::session::{FetchSource, PageRequest};

/// Subject facets used when the service cannot provide them.
pub const FALLBACK_SUBJECTS: [&str; 6] = [
    "psychology",
    "productivity",
    "personal development",
    "mental health",
    "wellness",
    "motivation",
];

/// Read-side client for the book catalog.
pub struct CatalogClient {
    backend: Arc<dyn CatalogBackend>,
    max_results: u32,
    known_subjects: Vec<String>,
}

impl CatalogClient {
    /// `max_results` is the total number of items retrievable for one query.
    pub fn new(backend: Arc<dyn CatalogBackend>, max_results: u32) -> Self {
        Self {
            backend,
            max_results: max_results.max(1),
            known_subjects: fallback_subjects(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn CatalogBackend> {
        &self.backend
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Bound a requested page size to `1..=max_results`.
    pub fn clamp_size(&self, size: u32) -> u32 {
        size.clamp(1, self.max_results)
    }

    /// Subject facets the search filter accepts.
    pub fn known_subjects(&self) -> &[String] {
        &self.known_subjects
    }

    /// Run a field search for zero-based `page`.
    ///
    /// Fields left empty once the subject filter is validated fall back to
    /// the default listing; an empty search is never sent.
    pub fn search(
        &self,
        fields: &QueryFields,
        page: u32,
        size: u32,
    ) -> CatalogResult<Vec<CatalogItem>> {
        let fields = self.validate_subject(fields.normalized());
        if fields.is_empty() {
            return self.popular(page, size);
        }
        let size = self.clamp_size(size);
        let Some(limit) = self.page_limit(page, size) else {
            return Ok(Vec::new());
        };
        let mut items = self.backend.search(&fields, page, size)?;
        items.truncate(limit);
        tracing::debug!(page, size, returned = items.len(), "search page fetched");
        Ok(items)
    }

    /// Fetch zero-based `page` of the default listing.
    pub fn popular(&self, page: u32, size: u32) -> CatalogResult<Vec<CatalogItem>> {
        let size = self.clamp_size(size);
        let Some(limit) = self.page_limit(page, size) else {
            return Ok(Vec::new());
        };
        let mut items = self.backend.popular(page, size)?;
        items.truncate(limit);
        tracing::debug!(page, size, returned = items.len(), "popular page fetched");
        Ok(items)
    }

    /// Refresh and return the subject facets.
    ///
    /// Never fails: on any service error the fallback list is used.
    pub fn subjects(&mut self) -> Vec<String> {
        match self.backend.subjects() {
            Ok(subjects) if !subjects.is_empty() => {
                self.known_subjects = subjects;
            }
            Ok(_) => {
                tracing::warn!("service returned no subjects, using fallback list");
                self.known_subjects = fallback_subjects();
            }
            Err(e) => {
                tracing::warn!(error = %e, "subject lookup failed, using fallback list");
                self.known_subjects = fallback_subjects();
            }
        }
        self.known_subjects.clone()
    }

    /// Execute a session page request (one-based page, converted for the wire).
    pub fn fetch_page(&self, request: &PageRequest) -> CatalogResult<Vec<CatalogItem>> {
        let page = request.page.saturating_sub(1);
        match &request.source {
            FetchSource::Search(fields) => self.search(fields, page, request.size),
            FetchSource::Popular => self.popular(page, request.size),
        }
    }

    /// Items still retrievable on this page, or `None` past the ceiling.
    fn page_limit(&self, page: u32, size: u32) -> Option<usize> {
        let offset = u64::from(page) * u64::from(size);
        let remaining = u64::from(self.max_results).checked_sub(offset)?;
        if remaining == 0 {
            tracing::debug!(page, size, "page lies beyond max_results, skipping request");
            return None;
        }
        Some(remaining.min(u64::from(size)) as usize)
    }

    fn validate_subject(&self, mut fields: QueryFields) -> QueryFields {
        if let Some(subject) = fields.subject.take() {
            let known = self
                .known_subjects
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&subject));
            if known {
                fields.subject = Some(subject);
            } else {
                tracing::warn!(%subject, "ignoring unknown subject filter");
            }
        }
        fields
    }
}

fn fallback_subjects() -> Vec<String> {
    FALLBACK_SUBJECTS.iter().map(|s| s.to_string()).collect()
}
