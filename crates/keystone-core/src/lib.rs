//! Keystone Core - Basic data structures for perspective correction
//!
//! This crate provides the data structures shared by every stage of the
//! keystone pipeline:
//!
//! - [`Pix`] / [`PixMut`] - Packed raster image (immutable / mutable)
//! - [`IPix`] - Signed 32-bit integer image used for Hough accumulators
//! - [`FPix`] - Floating-point image
//! - [`Box`] - Axis-aligned rectangle
//! - [`Pta`] - Point array
//! - [`Matrix3`] - 3x3 homography algebra

pub mod box_;
pub mod error;
pub mod fpix;
pub mod ipix;
pub mod matrix;
pub mod pix;
pub mod pta;

pub use box_::Box;
pub use error::{Error, Result};
pub use fpix::FPix;
pub use ipix::IPix;
pub use matrix::Matrix3;
pub use pix::{Color, ImageFormat, Pix, PixMut, PixelDepth};
pub use pta::Pta;

/// Color channel helpers for 32-bit RGBA pixels.
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Luma of an RGB triple, in the fixed-point form used by the
    /// grayscale converter: `(4899 R + 9617 G + 1868 B + 8192) >> 14`.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        let sum = 4899 * r as u32 + 9617 * g as u32 + 1868 * b as u32 + (1 << 13);
        (sum >> 14).min(255) as u8
    }

}
