//! Remote book catalog: search, default listing, subject facets.
//!
//! The service contract lives in [`CatalogBackend`]; [`HttpBackend`] speaks
//! it over HTTP and [`MemoryBackend`] keeps it in process. [`CatalogClient`]
//! is the typed read-side interface the rest of the crate uses, and
//! [`PracticeCatalog`] is the bundled offline sample set.

pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod model;
pub mod practice;

pub use backend::CatalogBackend;
pub use client::{CatalogClient, FALLBACK_SUBJECTS};
pub use error::{CatalogError, CatalogResult};
pub use http::HttpBackend;
pub use memory::{BackendCall, Failures, MemoryBackend};
pub use model::{CatalogItem, PRACTICE_ID_PREFIX, QueryFields, is_practice_id};
pub use practice::PracticeCatalog;
