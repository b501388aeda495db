//! The user's saved collection.
//!
//! [`CollectionStore`] owns the saved set for one session. It is built once
//! and passed by reference to whatever needs membership lookups.

pub mod error;
pub mod store;

pub use error::{CollectionError, CollectionResult};
pub use store::{CollectionEvent, CollectionObserver, CollectionStore, VecObserver};
