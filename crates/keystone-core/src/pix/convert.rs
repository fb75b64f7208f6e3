//! Depth conversion
//!
//! The pipeline works on 8 bpp grayscale internally and draws its debug
//! overlays on 32 bpp RGB, so only those two targets are provided.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::Result;

impl Pix {
    /// Convert to 8-bit grayscale.
    ///
    /// - **8 bpp**: deep copy
    /// - **16 bpp**: most significant byte
    /// - **32 bpp**: fixed-point luma of the RGB channels (alpha ignored)
    ///
    /// ```
    /// use keystone_core::{Pix, PixelDepth};
    ///
    /// let pix32 = Pix::new(10, 10, PixelDepth::Bit32).unwrap();
    /// let pix8 = pix32.convert_to_8().unwrap();
    /// assert_eq!(pix8.depth(), PixelDepth::Bit8);
    /// ```
    pub fn convert_to_8(&self) -> Result<Pix> {
        let (w, h) = (self.width(), self.height());
        let map: fn(u32) -> u32 = match self.depth() {
            PixelDepth::Bit8 => return Ok(self.deep_clone()),
            PixelDepth::Bit16 => |v| v >> 8,
            PixelDepth::Bit32 => |v| {
                let (r, g, b) = color::extract_rgb(v);
                color::luma(r, g, b) as u32
            }
        };

        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        out.set_informat(self.informat());
        for y in 0..h {
            for x in 0..w {
                out.set_pixel_unchecked(x, y, map(self.get_pixel_unchecked(x, y)));
            }
        }
        Ok(out.into())
    }

    /// Convert to 32-bit RGB.
    ///
    /// Gray values are replicated into R, G and B; 32 bpp input is copied.
    pub fn convert_to_32(&self) -> Result<Pix> {
        let (w, h) = (self.width(), self.height());
        let shift = match self.depth() {
            PixelDepth::Bit32 => return Ok(self.deep_clone()),
            PixelDepth::Bit16 => 8,
            PixelDepth::Bit8 => 0,
        };

        let mut out = Pix::new(w, h, PixelDepth::Bit32)?.to_mut();
        out.set_informat(self.informat());
        for y in 0..h {
            for x in 0..w {
                let g = (self.get_pixel_unchecked(x, y) >> shift) as u8;
                out.set_pixel_unchecked(x, y, color::compose_rgb(g, g, g));
            }
        }
        Ok(out.into())
    }
}
