//! Theme error types

use counterspell_core::StorageError;
use thiserror::Error;

/// Theme errors
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Neither the catalog nor the persisted store knows this id
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),

    /// Identifiers must be non-empty and usable as a class name
    #[error("Invalid theme identifier '{0}'")]
    InvalidIdentifier(String),

    /// A definition lacks required variables and must not be applied or persisted
    #[error("Theme '{id}' is missing variables: {}", .missing.join(", "))]
    MissingVariables {
        id: String,
        missing: Vec<&'static str>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to encode theme store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
