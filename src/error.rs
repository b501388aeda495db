//! Rich diagnostic error types for wellshelf.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives; `ShelfError` carries any of them through to the user with
//! codes and help text intact.

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::error::CatalogError;
use crate::collection::error::CollectionError;
use crate::config::ConfigError;

/// Top-level error type.
#[derive(Debug, Error, Diagnostic)]
pub enum ShelfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("no practice book with id \"{id}\"")]
    #[diagnostic(
        code(wellshelf::practice::not_found),
        help("List the practice books with `wellshelf practice`.")
    )]
    UnknownPracticeItem { id: String },

    #[error("invalid book JSON in {path}: {message}")]
    #[diagnostic(
        code(wellshelf::input::invalid_item),
        help("Provide a single JSON object with at least `googleBooksId` and `title`.")
    )]
    InvalidItem { path: String, message: String },
}

impl ShelfError {
    /// Whether this failure should interrupt the user.
    ///
    /// Failed mutations are blocking. Read failures (search, listing,
    /// subjects, collection load) are shown passively as empty results.
    pub fn is_blocking(&self) -> bool {
        match self {
            ShelfError::Catalog(_) => false,
            ShelfError::Collection(CollectionError::Unavailable { .. }) => false,
            ShelfError::Collection(_) => true,
            ShelfError::Config(_) => true,
            ShelfError::UnknownPracticeItem { .. } => true,
            ShelfError::InvalidItem { .. } => true,
        }
    }
}

/// Convenience alias for top-level results.
pub type ShelfResult<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_passive_and_mutations_block() {
        let read: ShelfError = CatalogError::unavailable("search", "timeout").into();
        assert!(!read.is_blocking());

        let load: ShelfError = CollectionError::Unavailable {
            message: "down".into(),
        }
        .into();
        assert!(!load.is_blocking());

        let save: ShelfError = CollectionError::SaveFailed {
            id: "vol-1".into(),
            message: "500".into(),
        }
        .into();
        assert!(save.is_blocking());

        let validation: ShelfError = CollectionError::Validation { field: "identifier" }.into();
        assert!(validation.is_blocking());
    }

    #[test]
    fn diagnostic_codes_pass_through() {
        let err: ShelfError = CollectionError::RemoveFailed {
            id: "vol-1".into(),
            message: "404".into(),
        }
        .into();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("wellshelf::collection::remove_failed"));
    }
}
