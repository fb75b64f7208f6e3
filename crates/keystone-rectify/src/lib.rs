//! keystone-rectify - Perspective rectification of photographed documents
//!
//! Finds the vanishing point of a page's near-vertical structure (text
//! columns, rulings, margins) with a two-pass Fast Hough Transform and warps
//! the page so that point moves to infinity straight up.
//!
//! # Quick Start
//!
//! ```no_run
//! use keystone_rectify::{RectifyOptions, rectify_file};
//!
//! let rect = rectify_file("page.jpg", "flat.png", &RectifyOptions::default()).unwrap();
//! println!("output is {}x{}", rect.width, rect.height);
//! ```
//!
//! # Modules
//!
//! - [`options`]: Run configuration
//! - [`perspective`]: Camera and shear homographies
//! - [`pipeline`]: Detection, rectification and file round trip
//! - [`debug`]: Intermediate-image sinks

pub mod debug;
mod error;
pub mod options;
pub mod perspective;
pub mod pipeline;

pub use error::{RectifyError, RectifyResult};

pub use debug::{DebugSink, DirectorySink, MemorySink, NullSink};
pub use options::{RectifyModel, RectifyOptions};
pub use perspective::{CameraPose, Rectification, camera_rectification, shear_rectification};
pub use pipeline::{Detection, Rectifier, rectify_file};
