//! `Bookshelf`: one user's browsing session over the catalog.
//!
//! Wires the pieces together. Queries flow through the [`SearchSession`]
//! and [`CatalogClient`]; save and remove go through the
//! [`CollectionStore`]; every list handed out is annotated against the
//! store at the moment it is asked for, so a save or remove shows up in
//! search results, practice books and the saved list alike.

use std::sync::Arc;

use crate::annotate::annotate;
use crate::catalog::backend::CatalogBackend;
use crate::catalog::client::CatalogClient;
use crate::catalog::http::HttpBackend;
use crate::catalog::model::{CatalogItem, QueryFields};
use crate::catalog::practice::PracticeCatalog;
use crate::collection::store::{CollectionObserver, CollectionStore};
use crate::config::ShelfConfig;
use crate::error::{ShelfError, ShelfResult};
use crate::session::SearchSession;

pub struct Bookshelf {
    client: CatalogClient,
    collection: CollectionStore,
    session: SearchSession,
    practice: PracticeCatalog,
}

impl Bookshelf {
    /// Shelf backed by the HTTP service named in `config`.
    pub fn open(config: &ShelfConfig) -> Self {
        Self::with_backend(Arc::new(HttpBackend::from_config(config)), config)
    }

    pub fn with_backend(backend: Arc<dyn CatalogBackend>, config: &ShelfConfig) -> Self {
        let config = config.clone().normalized();
        tracing::debug!(backend = %backend.describe(), "opening bookshelf");
        Self {
            client: CatalogClient::new(backend.clone(), config.max_results),
            collection: CollectionStore::new(backend),
            session: SearchSession::new(config.page_size, config.max_results),
            practice: PracticeCatalog::new(),
        }
    }

    /// Load the collection, refresh subjects and show the default listing.
    ///
    /// Never fails. Degraded reads come back as passive notices; the
    /// shelf stays usable with whatever did load.
    pub fn start(&mut self) -> Vec<ShelfError> {
        let mut notices = self.refresh();
        self.browse(QueryFields::default());
        notices.extend(self.page_notice());
        notices
    }

    /// Reload the collection and subject facets without touching the session.
    pub fn refresh(&mut self) -> Vec<ShelfError> {
        let mut notices = Vec::new();
        if let Err(e) = self.collection.load() {
            notices.push(e.into());
        }
        self.client.subjects();
        notices
    }

    /// The last page fetch failure, as a passive notice.
    pub fn page_notice(&self) -> Option<ShelfError> {
        self.session.last_error().cloned().map(ShelfError::from)
    }

    /// Start a new query; empty fields show the default listing.
    ///
    /// Returns `true` when the page was applied.
    pub fn browse(&mut self, fields: QueryFields) -> bool {
        let request = self.session.set_query(fields);
        self.session.run(&self.client, request)
    }

    /// Jump to one-based page `n`. Returns `false` when `n` is not navigable.
    pub fn go_to_page(&mut self, n: u32) -> bool {
        match self.session.go_to_page(n) {
            Some(request) => self.session.run(&self.client, request),
            None => false,
        }
    }

    pub fn set_page_size(&mut self, size: u32) -> bool {
        let request = self.session.set_page_size(size);
        self.session.run(&self.client, request)
    }

    /// Current page of results with saved state filled in.
    pub fn results(&self) -> Vec<CatalogItem> {
        annotate(self.session.items(), &self.collection)
    }

    /// The practice books with saved state filled in.
    pub fn practice_items(&self) -> Vec<CatalogItem> {
        annotate(self.practice.items(), &self.collection)
    }

    pub fn saved_items(&self) -> Vec<CatalogItem> {
        self.collection.items()
    }

    /// Known subject facets (the fallback list until refreshed).
    pub fn subjects(&self) -> &[String] {
        self.client.known_subjects()
    }

    pub fn save(&mut self, item: &CatalogItem) -> ShelfResult<CatalogItem> {
        Ok(self.collection.save(item)?)
    }

    /// Save a bundled practice book by id.
    pub fn save_practice(&mut self, id: &str) -> ShelfResult<CatalogItem> {
        let item = self
            .practice
            .get(id)
            .cloned()
            .ok_or_else(|| ShelfError::UnknownPracticeItem { id: id.to_string() })?;
        self.save(&item)
    }

    pub fn remove(&mut self, id: &str) -> ShelfResult<()> {
        Ok(self.collection.remove(id)?)
    }

    pub fn subscribe(&mut self, observer: Arc<dyn CollectionObserver>) {
        self.collection.subscribe(observer);
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    pub fn practice(&self) -> &PracticeCatalog {
        &self.practice
    }
}
