//! The remote catalog/collection contract.
//!
//! Every endpoint the book service exposes is one method here. Page indices
//! are zero-based, exactly as they go on the wire.

use crate::catalog::error::CatalogResult;
use crate::catalog::model::{CatalogItem, QueryFields};
use crate::collection::error::CollectionResult;

/// Request/response access to the catalog and the saved collection.
///
/// Implementations are stateless from the caller's point of view: no
/// caching, no retries. [`HttpBackend`](crate::catalog::HttpBackend) talks
/// to the real service, [`MemoryBackend`](crate::catalog::MemoryBackend)
/// keeps everything in process.
pub trait CatalogBackend: Send + Sync {
    /// `GET search` (or `search-advanced` for structured fields).
    fn search(&self, fields: &QueryFields, page: u32, size: u32)
    -> CatalogResult<Vec<CatalogItem>>;

    /// `GET popular`: the query-less default listing.
    fn popular(&self, page: u32, size: u32) -> CatalogResult<Vec<CatalogItem>>;

    /// `GET subjects`: filterable subject facets.
    fn subjects(&self) -> CatalogResult<Vec<String>>;

    /// `GET collection`: every saved item.
    fn collection(&self) -> CollectionResult<Vec<CatalogItem>>;

    /// `POST save`: returns the stored record, whose id may be server-assigned.
    fn save(&self, item: &CatalogItem) -> CollectionResult<CatalogItem>;

    /// `DELETE collection/{id}`.
    fn remove(&self, id: &str) -> CollectionResult<()>;

    /// Short label for logs.
    fn describe(&self) -> String;
}
