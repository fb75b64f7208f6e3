//! IPix - Signed integer image
//!
//! `IPix` is a row-major 2D array of `i32`. Every Hough accumulator lives
//! in one: 32 bits hold the exact sum of a full-height line of 8-bit
//! samples for any height up to 2^23, so no averaging is needed between
//! butterfly stages.
//!
//! ```
//! use keystone_core::IPix;
//!
//! let mut acc = IPix::new(8, 4).unwrap();
//! acc.set(3, 2, 17).unwrap();
//! assert_eq!(acc.max_loc(), (17, 3, 2));
//! ```

use crate::error::{Error, Result};
use crate::fpix::FPix;
use crate::pix::{Pix, PixelDepth};

/// Signed 32-bit integer image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPix {
    width: u32,
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<i32>,
}

impl IPix {
    /// Create a zeroed image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        })
    }

    /// Wrap row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is 0 or `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<i32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<i32>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Copy the samples of an 8 or 16 bpp grayscale image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 32 bpp input.
    pub fn from_pix(pix: &Pix) -> Result<Self> {
        if pix.depth() == PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(32));
        }
        let (w, h) = (pix.width(), pix.height());
        let mut data = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                data.push(pix.get_pixel_unchecked(x, y) as i32);
            }
        }
        Self::from_data(w, h, data)
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw data.
    #[inline]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Get mutable access to the raw data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Get the value at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<i32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Set the value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside.
    pub fn set(&mut self, x: u32, y: u32, value: i32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[i32] {
        let w = self.width as usize;
        &self.data[y as usize * w..(y as usize + 1) * w]
    }

    /// Row `y` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [i32] {
        let w = self.width as usize;
        &mut self.data[y as usize * w..(y as usize + 1) * w]
    }

    /// Exchange rows `a` and `b` in place.
    pub fn swap_rows(&mut self, a: u32, b: u32) {
        if a == b {
            return;
        }
        let w = self.width as usize;
        let (lo, hi) = (a.min(b) as usize, a.max(b) as usize);
        let (head, tail) = self.data.split_at_mut(hi * w);
        head[lo * w..(lo + 1) * w].swap_with_slice(&mut tail[..w]);
    }

    /// Left-right mirror image.
    pub fn flip_lr(&self) -> IPix {
        let mut out = self.clone();
        for y in 0..self.height {
            out.row_mut(y).reverse();
        }
        out
    }

    /// Largest value and its location as `(value, x, y)`.
    ///
    /// Ties resolve to the first occurrence in row-major order.
    pub fn max_loc(&self) -> (i32, u32, u32) {
        let mut best = (self.data[0], 0usize);
        for (i, &v) in self.data.iter().enumerate().skip(1) {
            if v > best.0 {
                best = (v, i);
            }
        }
        let w = self.width as usize;
        (best.0, (best.1 % w) as u32, (best.1 / w) as u32)
    }

    /// Smallest and largest value.
    pub fn min_max(&self) -> (i32, i32) {
        self.data
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Convert to a floating-point image.
    pub fn to_fpix(&self) -> FPix {
        let data = self.data.iter().map(|&v| v as f32).collect();
        // Dimensions were validated when `self` was built
        FPix::from_parts(self.width, self.height, data)
    }

    /// Min-max stretch to an 8 bpp image (minimum -> 0, maximum -> 255).
    ///
    /// A constant image maps to all zeros.
    pub fn normalize_to_pix(&self) -> Result<Pix> {
        let (lo, hi) = self.min_max();
        let range = hi as f64 - lo as f64;
        let mut out = Pix::new(self.width, self.height, PixelDepth::Bit8)?.to_mut();
        if range > 0.0 {
            let scale = 255.0 / range;
            for y in 0..self.height {
                for (x, &v) in self.row(y).iter().enumerate() {
                    let g = ((v as f64 - lo as f64) * scale).round() as u32;
                    out.set_pixel_unchecked(x as u32, y, g.min(255));
                }
            }
        }
        Ok(out.into())
    }
}
