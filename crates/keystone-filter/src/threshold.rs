//! Adaptive thresholding
//!
//! Binarizes against a Gaussian-weighted local mean, which copes with the
//! uneven lighting of photographed pages far better than a global cut.

use crate::convolve::gaussian_blur;
use crate::{FilterError, FilterResult};
use keystone_core::{Pix, PixelDepth};

/// Threshold an 8 bpp image against its local Gaussian mean.
///
/// The mean is a `block x block` Gaussian blur (default sigma, replicate
/// border) rounded to 8 bits. A pixel becomes `maxval` when
/// `src > mean - offset` and 0 otherwise; a fractional `offset` is rounded
/// up first.
///
/// # Arguments
/// * `pix` - 8 bpp grayscale input
/// * `block` - odd neighborhood size, at least 3
/// * `offset` - constant subtracted from the local mean
/// * `maxval` - value written for pixels above the local threshold
pub fn adaptive_threshold(pix: &Pix, block: u32, offset: f32, maxval: u8) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    if block < 3 || block % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "threshold block must be odd and >= 3, got {block}"
        )));
    }
    if !offset.is_finite() {
        return Err(FilterError::InvalidParameters(format!(
            "threshold offset must be finite, got {offset}"
        )));
    }

    let mean = gaussian_blur(pix, block, 0.0)?;
    let delta = offset.ceil() as i32;

    let (w, h) = (pix.width(), pix.height());
    let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
    for y in 0..h {
        for x in 0..w {
            let src = pix.get_pixel_unchecked(x, y) as i32;
            let m = mean.get_pixel_unchecked(x, y) as i32;
            if src - m > -delta {
                out.set_pixel_unchecked(x, y, maxval as u32);
            }
        }
    }
    Ok(out.into())
}
