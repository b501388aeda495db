//! Rich diagnostic error types for the remote catalog.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from catalog read operations (search, popular listing, subjects).
///
/// Callers treat these as "zero results", never as a crash.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum CatalogError {
    #[error("catalog unavailable ({endpoint}): {message}")]
    #[diagnostic(
        code(wellshelf::catalog::unavailable),
        help(
            "The book catalog could not be reached or returned an error. \
             Check `base_url` in the config file, or run with --offline to \
             browse the practice books."
        )
    )]
    Unavailable { endpoint: String, message: String },
}

impl CatalogError {
    pub fn unavailable(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for catalog operation results.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
