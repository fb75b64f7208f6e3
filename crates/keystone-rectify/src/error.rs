//! Error types for keystone-rectify

use thiserror::Error;

/// Errors that can occur while rectifying an image
#[derive(Debug, Error)]
pub enum RectifyError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] keystone_core::Error),

    /// Reading or writing an image failed
    #[error("I/O error: {0}")]
    Io(#[from] keystone_io::IoError),

    /// Preprocessing failed
    #[error("filter error: {0}")]
    Filter(#[from] keystone_filter::FilterError),

    /// Warping failed
    #[error("transform error: {0}")]
    Transform(#[from] keystone_transform::TransformError),

    /// Hough stages failed
    #[error("hough error: {0}")]
    Hough(#[from] keystone_hough::HoughError),

    /// The detected vanishing point admits no rectification
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for rectification
pub type RectifyResult<T> = Result<T, RectifyError>;
