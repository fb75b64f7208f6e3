//! Error types for keystone-hough

use thiserror::Error;

/// Errors that can occur in the Hough stages
#[derive(Debug, Error)]
pub enum HoughError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] keystone_core::Error),

    /// The butterfly needs a power-of-two number of rows
    #[error("FHT input height must be a power of two, got {height}")]
    NotPowerOfTwo {
        /// Height of the rejected input
        height: u32,
    },

    /// Input that cannot be searched
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for Hough operations
pub type HoughResult<T> = Result<T, HoughError>;
