//! Layout error types

use thiserror::Error;

/// Layout errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A carousel needs at least one card
    #[error("Carousel has no cards")]
    EmptyCarousel,

    #[error("Invalid spring configuration: {0}")]
    InvalidSpring(String),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
