//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A clock time or calendar date string was not in the expected shape,
    /// or one of its fields was out of range.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A service or window definition violates a configuration invariant.
    /// Raised when the catalog is loaded, never per query.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// Catalog JSON that is not structurally valid.
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
