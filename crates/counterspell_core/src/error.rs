//! Core error types

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by the core runtime
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A manual clock was moved to a non-finite or earlier time
    #[error("Invalid clock reading: {0}")]
    InvalidClock(f64),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
