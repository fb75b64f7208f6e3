//! Keystone - Perspective correction of photographed documents
//!
//! A photographed page leans: its vertical structure (margins, columns,
//! rulings) converges on a vanishing point above the image. Keystone finds
//! that point with a two-pass Fast Hough Transform and warps the page so the
//! structure is vertical again.
//!
//! # Overview
//!
//! - Image I/O (PNG, JPEG, PNM)
//! - Preprocessing (grayscale, adaptive threshold, Canny)
//! - Geometric transforms (bilinear resize, projective warp)
//! - Fast Hough Transform and vanishing-point location
//! - Camera-model and shear-model rectification
//!
//! # Example
//!
//! ```
//! use keystone::hough::{BitReversal, fht};
//! use keystone::IPix;
//!
//! let order: Vec<u32> = BitReversal::new(4).collect();
//! assert_eq!(order, vec![0, 4, 2, 6, 1, 5, 3, 7]);
//!
//! let ones = IPix::from_data(4, 4, vec![1; 16]).unwrap();
//! let accum = fht(&ones).unwrap();
//! assert_eq!(accum.get(0, 0), Some(4));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use keystone_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use keystone_filter as filter;
pub use keystone_hough as hough;
pub use keystone_io as io;
pub use keystone_rectify as rectify;
pub use keystone_transform as transform;
