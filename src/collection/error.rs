//! Rich diagnostic error types for the saved collection.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from collection load and mutation operations.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum CollectionError {
    #[error("collection unavailable: {message}")]
    #[diagnostic(
        code(wellshelf::collection::unavailable),
        help(
            "Saved books could not be loaded. Previously loaded items are kept; \
             retry once the service is reachable."
        )
    )]
    Unavailable { message: String },

    #[error("cannot save item: {field} could not be determined")]
    #[diagnostic(
        code(wellshelf::collection::validation),
        help("Every saved book needs an identifier and a title.")
    )]
    Validation { field: &'static str },

    #[error("failed to save \"{id}\": {message}")]
    #[diagnostic(
        code(wellshelf::collection::save_failed),
        help("The book was not added to your collection. Please try again.")
    )]
    SaveFailed { id: String, message: String },

    #[error("failed to remove \"{id}\": {message}")]
    #[diagnostic(
        code(wellshelf::collection::remove_failed),
        help("The book is still in your collection. Please try again.")
    )]
    RemoveFailed { id: String, message: String },
}

/// Convenience alias for collection operation results.
pub type CollectionResult<T> = std::result::Result<T, CollectionError>;
