// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # wellshelf
//!
//! Client-side book discovery for a wellness journal: field search over a
//! remote catalog, page-by-page browsing with an estimated page count, and a
//! saved collection whose membership is reflected in every list shown.
//!
//! ## Architecture
//!
//! - **Catalog** (`catalog`): backend contract, HTTP and in-memory backends,
//!   the typed `CatalogClient`, and the bundled practice books
//! - **Collection** (`collection`): the authoritative saved set
//! - **Session** (`session`): paging state, page-count estimation, the
//!   visible page window, and stale-response handling
//! - **Annotation** (`annotate`): saved-state overlay for any list
//! - **Shelf** (`shelf`): all of the above behind one facade
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wellshelf::catalog::{MemoryBackend, QueryFields};
//! use wellshelf::config::ShelfConfig;
//! use wellshelf::shelf::Bookshelf;
//!
//! let mut shelf = Bookshelf::with_backend(
//!     Arc::new(MemoryBackend::practice()),
//!     &ShelfConfig::default(),
//! );
//! shelf.start();
//! shelf.browse(QueryFields::free_text("habits"));
//! for book in shelf.results() {
//!     println!("{} {}", book.title, if book.is_saved { "(saved)" } else { "" });
//! }
//! ```

pub mod annotate;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod session;
pub mod shelf;
