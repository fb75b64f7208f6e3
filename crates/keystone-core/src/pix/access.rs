//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in an 8-bit image, pixel 0 occupies bits 31..24 of the first word.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

#[inline]
fn read_packed(line: &[u32], x: u32, depth: PixelDepth) -> u32 {
    match depth {
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

#[inline]
fn write_packed(line: &mut [u32], x: u32, depth: PixelDepth, val: u32) {
    match depth {
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
        PixelDepth::Bit32 => line[x as usize] = val,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `x` lies beyond the row's words.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), x, self.depth())
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.depth() != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let wpl = self.wpl() as usize;
        let start = y as usize * wpl;
        read_packed(&self.data()[start..start + wpl], x, self.depth())
    }

    /// Set a pixel value at (x, y).
    ///
    /// The value is masked to the pixel depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width() as usize + x as usize,
                len: self.width() as usize * self.height() as usize,
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `x` lies beyond the row's words.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        write_packed(self.row_data_mut(y), x, depth, val);
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

/// Get an 8-bit pixel value.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    let word = line[(x >> 2) as usize];
    (word >> (24 - 8 * (x & 3))) & 0xff
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 24 - 8 * (x & 3);
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

/// Get a 16-bit pixel value.
#[inline]
pub fn get_data_two_bytes(line: &[u32], x: u32) -> u32 {
    let word = line[(x >> 1) as usize];
    (word >> (16 - 16 * (x & 1))) & 0xffff
}

/// Set a 16-bit pixel value.
#[inline]
pub fn set_data_two_bytes(line: &mut [u32], x: u32, val: u32) {
    let shift = 16 - 16 * (x & 1);
    let word = &mut line[(x >> 1) as usize];
    *word = (*word & !(0xffff << shift)) | ((val & 0xffff) << shift);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_packing_msb_first() {
        let mut line = [0u32; 2];
        set_data_byte(&mut line, 0, 0x12);
        set_data_byte(&mut line, 3, 0x34);
        set_data_byte(&mut line, 5, 0xff);
        assert_eq!(line[0], 0x1200_0034);
        assert_eq!(line[1], 0x00ff_0000);
        assert_eq!(get_data_byte(&line, 3), 0x34);
    }

    #[test]
    fn test_two_byte_packing() {
        let mut line = [0u32; 1];
        set_data_two_bytes(&mut line, 1, 0xbeef);
        assert_eq!(line[0], 0x0000_beef);
        assert_eq!(get_data_two_bytes(&line, 1), 0xbeef);
        assert_eq!(get_data_two_bytes(&line, 0), 0);
    }

    #[test]
    fn test_set_get_pixel_8bpp() {
        let mut pm = Pix::new(7, 3, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_pixel(6, 2, 300).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(6, 2), Some(300 & 0xff));
        assert_eq!(pix.get_pixel(7, 2), None);
    }

    #[test]
    fn test_rgb_requires_32bpp() {
        let mut pm = Pix::new(2, 2, PixelDepth::Bit8).unwrap().to_mut();
        assert!(pm.set_rgb(0, 0, 1, 2, 3).is_err());

        let mut pm = Pix::new(2, 2, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(1, 1, 10, 20, 30).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(1, 1), Some((10, 20, 30)));
    }
}
