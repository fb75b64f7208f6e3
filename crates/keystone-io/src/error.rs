//! I/O error types
//!
//! The PNG, JPEG and PNM codecs report through different error types;
//! each codec module folds them into [`IoError`].

use thiserror::Error;

/// Error reading or writing an image.
#[derive(Error, Debug)]
pub enum IoError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Building the decoded image failed
    #[error("core error: {0}")]
    Core(#[from] keystone_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
