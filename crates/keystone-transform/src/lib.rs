//! keystone-transform - Geometric transformations
//!
//! This crate provides the two resampling operations keystone needs:
//!
//! - Scaling to an exact size (bilinear or nearest-neighbor sampling)
//! - Projective (homography) warps onto an arbitrary output canvas

mod error;
pub mod projective;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use projective::{Interpolation, ProjectiveFill, projective};
pub use scale::{ScaleMethod, scale_to_size, scale_to_size_with};
