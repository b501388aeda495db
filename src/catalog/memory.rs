//! In-process implementation of the catalog contract.
//!
//! Backs offline mode (seeded with the practice catalog) and tests. Reads
//! filter a fixed item list; the collection is a `Mutex<Vec<_>>`. Failures
//! can be injected per endpoint, and every call is recorded.

use std::sync::Mutex;

use crate::catalog::backend::CatalogBackend;
use crate::catalog::client::FALLBACK_SUBJECTS;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::model::{CatalogItem, QueryFields};
use crate::collection::error::{CollectionError, CollectionResult};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Search {
        fields: QueryFields,
        page: u32,
        size: u32,
    },
    Popular {
        page: u32,
        size: u32,
    },
    Subjects,
    Collection,
    Save {
        id: String,
    },
    Remove {
        id: String,
    },
}

/// Endpoints that can be made to fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Failures {
    pub search: bool,
    pub popular: bool,
    pub subjects: bool,
    pub collection: bool,
    pub save: bool,
    pub remove: bool,
}

impl Failures {
    /// Every endpoint fails.
    pub fn all() -> Self {
        Self {
            search: true,
            popular: true,
            subjects: true,
            collection: true,
            save: true,
            remove: true,
        }
    }
}

struct MemoryState {
    collection: Vec<CatalogItem>,
    failures: Failures,
    calls: Vec<BackendCall>,
    next_id: u64,
}

/// Catalog and collection held entirely in memory.
pub struct MemoryBackend {
    catalog: Vec<CatalogItem>,
    subjects: Vec<String>,
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Backend whose searchable catalog is `catalog`.
    pub fn new(catalog: Vec<CatalogItem>) -> Self {
        Self {
            catalog,
            subjects: FALLBACK_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            state: Mutex::new(MemoryState {
                collection: Vec::new(),
                failures: Failures::default(),
                calls: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Backend seeded with the bundled practice books.
    pub fn practice() -> Self {
        Self::new(crate::catalog::PracticeCatalog::new().items().to_vec())
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-populate the saved collection.
    pub fn with_saved(self, items: Vec<CatalogItem>) -> Self {
        self.lock().collection = items;
        self
    }

    pub fn set_failures(&self, failures: Failures) {
        self.lock().failures = failures;
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Snapshot of the remote-side collection.
    pub fn saved(&self) -> Vec<CatalogItem> {
        self.lock().collection.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: BackendCall) -> Failures {
        let mut state = self.lock();
        state.calls.push(call);
        state.failures
    }

    fn page_of(items: Vec<&CatalogItem>, page: u32, size: u32) -> Vec<CatalogItem> {
        items
            .into_iter()
            .skip(page as usize * size as usize)
            .take(size as usize)
            .cloned()
            .collect()
    }
}

impl CatalogBackend for MemoryBackend {
    fn search(
        &self,
        fields: &QueryFields,
        page: u32,
        size: u32,
    ) -> CatalogResult<Vec<CatalogItem>> {
        let failures = self.record(BackendCall::Search {
            fields: fields.clone(),
            page,
            size,
        });
        if failures.search {
            return Err(CatalogError::unavailable("search", "injected failure"));
        }
        let fields = fields.normalized();
        let hits: Vec<&CatalogItem> = self
            .catalog
            .iter()
            .filter(|item| matches(item, &fields))
            .collect();
        Ok(Self::page_of(hits, page, size))
    }

    fn popular(&self, page: u32, size: u32) -> CatalogResult<Vec<CatalogItem>> {
        let failures = self.record(BackendCall::Popular { page, size });
        if failures.popular {
            return Err(CatalogError::unavailable("popular", "injected failure"));
        }
        Ok(Self::page_of(self.catalog.iter().collect(), page, size))
    }

    fn subjects(&self) -> CatalogResult<Vec<String>> {
        if self.record(BackendCall::Subjects).subjects {
            return Err(CatalogError::unavailable("subjects", "injected failure"));
        }
        Ok(self.subjects.clone())
    }

    fn collection(&self) -> CollectionResult<Vec<CatalogItem>> {
        if self.record(BackendCall::Collection).collection {
            return Err(CollectionError::Unavailable {
                message: "injected failure".into(),
            });
        }
        Ok(self.lock().collection.clone())
    }

    fn save(&self, item: &CatalogItem) -> CollectionResult<CatalogItem> {
        let failures = self.record(BackendCall::Save {
            id: item.id.clone(),
        });
        if failures.save {
            return Err(CollectionError::SaveFailed {
                id: item.id.clone(),
                message: "injected failure".into(),
            });
        }
        let mut state = self.lock();
        let mut stored = item.clone();
        stored.is_saved = false;
        if stored.id.trim().is_empty() {
            stored.id = format!("mem-{}", state.next_id);
            state.next_id += 1;
        }
        match state.collection.iter_mut().find(|s| s.same_entity(&stored)) {
            Some(existing) => *existing = stored.clone(),
            None => state.collection.push(stored.clone()),
        }
        Ok(stored)
    }

    fn remove(&self, id: &str) -> CollectionResult<()> {
        let failures = self.record(BackendCall::Remove { id: id.to_string() });
        if failures.remove {
            return Err(CollectionError::RemoveFailed {
                id: id.to_string(),
                message: "injected failure".into(),
            });
        }
        self.lock().collection.retain(|s| s.id != id);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} items)", self.catalog.len())
    }
}

/// Case-insensitive containment on every set field.
fn matches(item: &CatalogItem, fields: &QueryFields) -> bool {
    fn contains(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
    let description = item.description.as_deref().unwrap_or("");
    let authors = item.authors.join(" ");
    let categories = item.categories.join(" ");

    let free_text_ok = fields.free_text.as_deref().is_none_or(|q| {
        contains(&item.title, q)
            || contains(&authors, q)
            || contains(description, q)
            || contains(&categories, q)
    });
    let title_ok = fields.title.as_deref().is_none_or(|t| contains(&item.title, t));
    let author_ok = fields.author.as_deref().is_none_or(|a| contains(&authors, a));
    let description_ok = fields
        .description
        .as_deref()
        .is_none_or(|d| contains(description, d));
    let subject_ok = fields
        .subject
        .as_deref()
        .is_none_or(|s| contains(&categories, s));

    free_text_ok && title_ok && author_ok && description_ok && subject_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(vec![
            CatalogItem::new("a", "Atomic Habits")
                .with_authors(["James Clear"])
                .with_categories(["Productivity"]),
            CatalogItem::new("b", "Grit")
                .with_authors(["Angela Duckworth"])
                .with_categories(["Psychology", "Motivation"]),
            CatalogItem::new("c", "Mindset")
                .with_authors(["Carol S. Dweck"])
                .with_categories(["Psychology"]),
        ])
    }

    #[test]
    fn search_filters_and_pages() {
        let backend = backend();
        let hits = backend
            .search(&QueryFields::default().with_subject("psychology"), 0, 10)
            .unwrap();
        assert_eq!(hits.len(), 2);

        let second = backend
            .search(&QueryFields::default().with_subject("psychology"), 1, 1)
            .unwrap();
        assert_eq!(second[0].id, "c");

        let by_author = backend
            .search(&QueryFields::default().with_author("clear"), 0, 10)
            .unwrap();
        assert_eq!(by_author[0].id, "a");
    }

    #[test]
    fn save_is_upsert_and_assigns_missing_ids() {
        let backend = backend();
        backend.save(&CatalogItem::new("a", "Atomic Habits")).unwrap();
        backend.save(&CatalogItem::new("a", "Atomic Habits")).unwrap();
        assert_eq!(backend.saved().len(), 1);

        let stored = backend.save(&CatalogItem::new("", "Untracked")).unwrap();
        assert_eq!(stored.id, "mem-1");
        assert_eq!(backend.saved().len(), 2);
    }

    #[test]
    fn injected_failures_and_call_log() {
        let backend = backend();
        backend.set_failures(Failures {
            popular: true,
            ..Default::default()
        });
        assert!(backend.popular(0, 4).is_err());
        assert!(backend.subjects().is_ok());
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Popular { page: 0, size: 4 }, BackendCall::Subjects]
        );
    }
}
