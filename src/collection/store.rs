//! The authoritative local copy of the user's saved books.
//!
//! Loaded once from the service, then kept in step with each successful
//! save or remove. Local state is only committed after the remote call
//! succeeds, and a failed load never clears what is already held.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::annotate::Membership;
use crate::catalog::backend::CatalogBackend;
use crate::catalog::model::CatalogItem;
use crate::collection::error::{CollectionError, CollectionResult};

/// A change to collection membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// The saved set was replaced by a fresh load.
    Loaded { count: usize },
    Saved { id: String },
    Removed { id: String },
}

/// Receives membership changes so dependent views can re-annotate.
pub trait CollectionObserver: Send + Sync {
    fn notify(&self, event: &CollectionEvent);
}

/// Collects events into a `Vec` for testing.
#[derive(Default)]
pub struct VecObserver {
    events: Mutex<Vec<CollectionEvent>>,
}

impl VecObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far.
    pub fn events(&self) -> Vec<CollectionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl CollectionObserver for VecObserver {
    fn notify(&self, event: &CollectionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Saved-item set keyed by identifier, in save order.
pub struct CollectionStore {
    backend: Arc<dyn CatalogBackend>,
    items: HashMap<String, CatalogItem>,
    order: Vec<String>,
    observers: Vec<Arc<dyn CollectionObserver>>,
}

impl CollectionStore {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            items: HashMap::new(),
            order: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer for membership changes.
    pub fn subscribe(&mut self, observer: Arc<dyn CollectionObserver>) {
        self.observers.push(observer);
    }

    /// Replace the local set with the service's saved items.
    ///
    /// On failure the current contents are kept untouched.
    pub fn load(&mut self) -> CollectionResult<Vec<CatalogItem>> {
        let loaded = match self.backend.collection() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, kept = self.order.len(), "collection load failed");
                return Err(e);
            }
        };

        self.items.clear();
        self.order.clear();
        for item in loaded {
            self.insert(item);
        }
        tracing::info!(count = self.order.len(), "collection loaded");
        self.emit(&CollectionEvent::Loaded {
            count: self.order.len(),
        });
        Ok(self.items())
    }

    /// Save an item (live or practice) into the collection.
    ///
    /// Missing fields are defaulted before sending. Saving an id that is
    /// already a member replaces the entry instead of duplicating it.
    pub fn save(&mut self, item: &CatalogItem) -> CollectionResult<CatalogItem> {
        let mut prepared = item.clone().with_save_defaults();
        prepared.is_saved = false;

        let mut stored = self.backend.save(&prepared)?;
        stored.id = stored.id.trim().to_string();
        if stored.id.is_empty() {
            return Err(CollectionError::Validation { field: "identifier" });
        }
        if stored.title.trim().is_empty() {
            stored.title = prepared.title;
        }
        stored.is_saved = true;

        let id = stored.id.clone();
        self.insert(stored.clone());
        tracing::info!(%id, "saved to collection");
        self.emit(&CollectionEvent::Saved { id });
        Ok(stored)
    }

    /// Remove an item by identifier.
    ///
    /// Every id goes through the service, practice ids included.
    pub fn remove(&mut self, id: &str) -> CollectionResult<()> {
        self.backend.remove(id)?;
        if self.items.remove(id).is_some() {
            self.order.retain(|existing| existing != id);
        }
        tracing::info!(%id, "removed from collection");
        self.emit(&CollectionEvent::Removed { id: id.to_string() });
        Ok(())
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    /// Saved items in save order, each marked as saved.
    pub fn items(&self) -> Vec<CatalogItem> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, mut item: CatalogItem) {
        item.is_saved = true;
        if !self.items.contains_key(&item.id) {
            self.order.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    fn emit(&self, event: &CollectionEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }
}

impl Membership for CollectionStore {
    fn is_member(&self, id: &str) -> bool {
        CollectionStore::is_member(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::{BackendCall, Failures, MemoryBackend};
    use crate::catalog::model::{UNKNOWN_AUTHOR, UNKNOWN_TITLE};

    fn store_with(backend: &Arc<MemoryBackend>) -> CollectionStore {
        CollectionStore::new(backend.clone())
    }

    #[test]
    fn save_then_remove_updates_membership() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        let mut store = store_with(&backend);
        let item = CatalogItem::new("vol-1", "Grit");

        let saved = store.save(&item).unwrap();
        assert!(saved.is_saved);
        assert!(store.is_member("vol-1"));

        store.remove("vol-1").unwrap();
        assert!(!store.is_member("vol-1"));
        assert!(backend.saved().is_empty());
    }

    #[test]
    fn double_save_keeps_one_entry() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        let mut store = store_with(&backend);
        let item = CatalogItem::new("vol-1", "Grit");
        store.save(&item).unwrap();
        store.save(&item).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.items().iter().filter(|i| i.id == "vol-1").count(), 1);
    }

    #[test]
    fn practice_items_are_defaulted_and_written_through() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        let mut store = store_with(&backend);
        let item = CatalogItem::new("practice-sample-42", "");

        let saved = store.save(&item).unwrap();
        assert_eq!(saved.title, UNKNOWN_TITLE);
        assert_eq!(saved.authors, vec![UNKNOWN_AUTHOR.to_string()]);
        assert_eq!(saved.ratings_count, Some(0));
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Save {
                id: "practice-sample-42".into()
            }]
        );
    }

    #[test]
    fn failed_save_commits_nothing() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        backend.set_failures(Failures {
            save: true,
            ..Default::default()
        });
        let mut store = store_with(&backend);
        let err = store.save(&CatalogItem::new("vol-1", "Grit")).unwrap_err();
        assert!(matches!(err, CollectionError::SaveFailed { .. }));
        assert!(!store.is_member("vol-1"));
    }

    #[test]
    fn failed_remove_keeps_membership() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        let mut store = store_with(&backend);
        store.save(&CatalogItem::new("vol-1", "Grit")).unwrap();
        backend.set_failures(Failures {
            remove: true,
            ..Default::default()
        });
        let err = store.remove("vol-1").unwrap_err();
        assert!(matches!(err, CollectionError::RemoveFailed { .. }));
        assert!(store.is_member("vol-1"));
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let backend = Arc::new(
            MemoryBackend::new(vec![]).with_saved(vec![CatalogItem::new("vol-1", "Grit")]),
        );
        let mut store = store_with(&backend);
        assert_eq!(store.load().unwrap().len(), 1);

        backend.set_failures(Failures {
            collection: true,
            ..Default::default()
        });
        assert!(matches!(
            store.load(),
            Err(CollectionError::Unavailable { .. })
        ));
        assert!(store.is_member("vol-1"));
    }

    #[test]
    fn observers_see_every_change() {
        let backend = Arc::new(MemoryBackend::new(vec![]));
        let mut store = store_with(&backend);
        let observer = Arc::new(VecObserver::new());
        store.subscribe(observer.clone());

        store.load().unwrap();
        store.save(&CatalogItem::new("vol-1", "Grit")).unwrap();
        store.remove("vol-1").unwrap();

        assert_eq!(
            observer.events(),
            vec![
                CollectionEvent::Loaded { count: 0 },
                CollectionEvent::Saved { id: "vol-1".into() },
                CollectionEvent::Removed { id: "vol-1".into() },
            ]
        );
    }
}
