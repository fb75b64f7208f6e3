//! keystone-filter - Preprocessing filters
//!
//! Everything that turns a photographed page into the binary edge map the
//! Hough stages consume:
//!
//! - Grayscale conversion
//! - Separable Gaussian blur
//! - Adaptive (Gaussian-weighted local mean) thresholding
//! - Sobel gradients and Canny edge detection
//! - [`preprocess`], which chains them and resizes to the working resolution

pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod preprocess;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use convolve::{convert_to_gray, convolve_sep, gaussian_blur};
pub use edge::{EdgeOrientation, canny, sobel, sobel_magnitude};
pub use preprocess::{PreprocessOptions, Preprocessed, preprocess};
pub use threshold::adaptive_threshold;
