use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// Every error is local to a single request; no operation leaves the
/// dataset table or the contributor ledger partially applied.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required field was missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced dataset does not exist.
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// A mirrored dataset has no contributor links to redirect to.
    #[error("no mirror available: {0}")]
    Unavailable(String),

    /// Blob area I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
