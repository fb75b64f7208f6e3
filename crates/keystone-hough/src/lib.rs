//! keystone-hough - Fast Hough transform and vanishing-point location
//!
//! The Fast Hough Transform sums an image along every dyadic line of
//! integer shift in `O(w * h * log h)`, using the same butterfly and
//! bit-reversal structure as an iterative FFT. Running it twice (image and
//! mirror) covers both tilt directions; a second single-sided pass over the
//! emphasized accumulator finds the pencil of lines through the document's
//! vanishing point.
//!
//! # Pipeline
//!
//! ```text
//! edge map --double_fht--> (bottom, top) accumulator
//!          --emphasize--> ridge map --normalize_for_search--> 0..=255
//!          --fht--> (x, shift) accumulator --find_peak--> Peak
//! ```
//!
//! [`locate`] runs the whole chain and keeps every stage.

pub mod bitrev;
pub mod double;
pub mod emphasis;
mod error;
pub mod fht;
pub mod locate;

pub use bitrev::{BitReversal, bitrev_inc};
pub use double::double_fht;
pub use emphasis::{EmphasisMethod, emphasize, normalize_for_search};
pub use error::{HoughError, HoughResult};
pub use fht::fht;
pub use locate::{HoughStages, Peak, SlopeHeight, VanishingPoint, find_peak, locate};
