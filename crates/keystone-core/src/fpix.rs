//! FPix - Floating-point image
//!
//! `FPix` is a 2D array of `f32` values. The peak-emphasis stage produces
//! one (gradient magnitudes or squared row deviations), which is then
//! stretched back to an integer range for the second Hough pass.

use crate::error::{Error, Result};
use crate::ipix::IPix;
use crate::pix::Pix;

/// Floating-point image
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FPix {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<f32>,
}

impl FPix {
    /// Create a new FPix with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    ///
    /// ```
    /// use keystone_core::FPix;
    ///
    /// let mut fpix = FPix::new(100, 100).unwrap();
    /// fpix.set_pixel(10, 20, 0.5).unwrap();
    /// assert_eq!(fpix.get_pixel(10, 20), Some(0.5));
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self::from_parts(
            width,
            height,
            vec![0.0; width as usize * height as usize],
        ))
    }

    /// Create an FPix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is 0 or the length does not match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if data.len() != width as usize * height as usize {
            return Err(Error::InvalidParameter(format!(
                "data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self::from_parts(width, height, data))
    }

    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable access to the raw data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let w = self.width as usize;
        &self.data[y as usize * w..(y as usize + 1) * w]
    }

    /// Get a pixel value, or `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Set a pixel value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: f32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.data[y as usize * self.width as usize + x as usize] = val;
        Ok(())
    }

    /// Smallest and largest value.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Min-max stretch into the integer range `lo..=hi`, rounding to nearest.
    ///
    /// The minimum maps to `lo` and the maximum to `hi`; a constant image
    /// maps entirely to `lo`.
    pub fn normalize_to_ipix(&self, lo: i32, hi: i32) -> IPix {
        let (min, max) = self.min_max();
        let range = max as f64 - min as f64;
        let data = if range > 0.0 && range.is_finite() {
            let scale = (hi as f64 - lo as f64) / range;
            self.data
                .iter()
                .map(|&v| lo + ((v as f64 - min as f64) * scale).round() as i32)
                .collect()
        } else {
            vec![lo; self.data.len()]
        };
        IPix::from_parts(self.width, self.height, data)
    }

    /// Min-max stretch to a displayable 8 bpp image.
    pub fn to_pix_normalized(&self) -> Result<Pix> {
        self.normalize_to_ipix(0, 255).normalize_to_pix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fpix_bounds() {
        let mut f = FPix::new(2, 2).unwrap();
        assert!(f.set_pixel(2, 0, 1.0).is_err());
        f.set_pixel(1, 1, -3.5).unwrap();
        assert_eq!(f.get_pixel(1, 1), Some(-3.5));
        assert_eq!(f.min_max(), (-3.5, 0.0));
    }

    #[test]
    fn test_normalize_to_ipix() {
        let f = FPix::from_data(4, 1, vec![2.0, 4.0, 5.0, 6.0]).unwrap();
        let n = f.normalize_to_ipix(0, 255);
        assert_eq!(n.row(0), &[0, 128, 191, 255]);
    }

    #[test]
    fn test_normalize_constant_maps_to_lo() {
        let f = FPix::from_data(3, 1, vec![7.0; 3]).unwrap();
        assert_eq!(f.normalize_to_ipix(10, 20).data(), &[10, 10, 10]);
    }
}
