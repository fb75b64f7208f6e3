//! Image scaling operations
//!
//! Resizes to an exact output size. Output pixel centres are mapped back
//! onto the source with the half-pixel convention
//! `sx = (x + 0.5) * w / W - 0.5`, so scaling by any factor keeps the
//! image centred.

use crate::{TransformError, TransformResult};
use keystone_core::{Pix, PixelDepth, color};

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling
    Sampling,
    /// Bilinear interpolation
    #[default]
    Linear,
}

/// Source position and weight of the right/lower neighbor for output
/// coordinate `i` when mapping `src_len` samples onto `dst_len`.
fn linear_tap(i: u32, src_len: u32, dst_len: u32) -> (u32, f32) {
    let s = (i as f32 + 0.5) * src_len as f32 / dst_len as f32 - 0.5;
    let s0 = s.floor();
    if s0 < 0.0 {
        (0, 0.0)
    } else if s0 as u32 >= src_len - 1 {
        (src_len - 1, 0.0)
    } else {
        (s0 as u32, s - s0)
    }
}

fn nearest_tap(i: u32, src_len: u32, dst_len: u32) -> u32 {
    let s = ((i as f32 + 0.5) * src_len as f32 / dst_len as f32).floor() as u32;
    s.min(src_len - 1)
}

fn lerp(a: u8, b: u8, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}

fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend four neighbors of an 8 or 32 bpp image.
fn blend(pix: &Pix, (x0, fx): (u32, f32), (y0, fy): (u32, f32)) -> u32 {
    let x1 = (x0 + 1).min(pix.width() - 1);
    let y1 = (y0 + 1).min(pix.height() - 1);
    let p00 = pix.get_pixel_unchecked(x0, y0);
    let p10 = pix.get_pixel_unchecked(x1, y0);
    let p01 = pix.get_pixel_unchecked(x0, y1);
    let p11 = pix.get_pixel_unchecked(x1, y1);

    let mix = |a: u8, b: u8, c: u8, d: u8| -> u8 {
        let top = lerp(a, b, fx);
        let bottom = lerp(c, d, fx);
        quantize(top + (bottom - top) * fy)
    };

    match pix.depth() {
        PixelDepth::Bit32 => {
            let (r00, g00, b00) = color::extract_rgb(p00);
            let (r10, g10, b10) = color::extract_rgb(p10);
            let (r01, g01, b01) = color::extract_rgb(p01);
            let (r11, g11, b11) = color::extract_rgb(p11);
            color::compose_rgb(
                mix(r00, r10, r01, r11),
                mix(g00, g10, g01, g11),
                mix(b00, b10, b01, b11),
            )
        }
        _ => mix(p00 as u8, p10 as u8, p01 as u8, p11 as u8) as u32,
    }
}

/// Scale an image to exactly `width x height` with the given method.
///
/// # Supported depths
///
/// - 8 bpp grayscale
/// - 32 bpp color
pub fn scale_to_size_with(
    pix: &Pix,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Pix> {
    if !matches!(pix.depth(), PixelDepth::Bit8 | PixelDepth::Bit32) {
        return Err(TransformError::UnsupportedDepth(format!(
            "scaling needs 8 or 32 bpp, got {}",
            pix.depth().bits()
        )));
    }
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "target size must be non-empty, got {width}x{height}"
        )));
    }

    let (w, h) = (pix.width(), pix.height());
    let mut out = Pix::new(width, height, pix.depth())?.to_mut();
    out.set_informat(pix.informat());

    match method {
        ScaleMethod::Linear => {
            let xtaps: Vec<(u32, f32)> = (0..width).map(|x| linear_tap(x, w, width)).collect();
            for y in 0..height {
                let ytap = linear_tap(y, h, height);
                for (x, &xtap) in xtaps.iter().enumerate() {
                    out.set_pixel_unchecked(x as u32, y, blend(pix, xtap, ytap));
                }
            }
        }
        ScaleMethod::Sampling => {
            let xs: Vec<u32> = (0..width).map(|x| nearest_tap(x, w, width)).collect();
            for y in 0..height {
                let sy = nearest_tap(y, h, height);
                for (x, &sx) in xs.iter().enumerate() {
                    out.set_pixel_unchecked(x as u32, y, pix.get_pixel_unchecked(sx, sy));
                }
            }
        }
    }
    Ok(out.into())
}

/// Scale an image to exactly `width x height` with bilinear interpolation.
pub fn scale_to_size(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    log::debug!(
        "scaling {}x{} -> {width}x{height}",
        pix.width(),
        pix.height()
    );
    scale_to_size_with(pix, width, height, ScaleMethod::Linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x, y, x * 10);
            }
        }
        pm.into()
    }

    #[test]
    fn test_identity_size() {
        let pix = ramp(7, 3);
        let out = scale_to_size(&pix, 7, 3).unwrap();
        assert_eq!(out.data(), pix.data());
    }

    #[test]
    fn test_downscale_by_two_averages_pairs() {
        // sx = 2x + 0.5: halfway between columns 2x and 2x + 1
        let out = scale_to_size(&ramp(8, 2), 4, 1).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(5));
        assert_eq!(out.get_pixel(3, 0), Some(65));
    }

    #[test]
    fn test_upscale_clamps_edges() {
        let out = scale_to_size(&ramp(2, 1), 4, 1).unwrap();
        // Left of the first centre and right of the last one replicate
        assert_eq!(out.get_pixel(0, 0), Some(0));
        assert_eq!(out.get_pixel(3, 0), Some(10));
        // sx = 0.25 and 0.75
        assert_eq!(out.get_pixel(1, 0), Some(3));
        assert_eq!(out.get_pixel(2, 0), Some(8));
    }

    #[test]
    fn test_sampling() {
        let out = scale_to_size_with(&ramp(8, 1), 4, 1, ScaleMethod::Sampling).unwrap();
        let row: Vec<u32> = (0..4).map(|x| out.get_pixel(x, 0).unwrap()).collect();
        assert_eq!(row, vec![10, 30, 50, 70]);
    }

    #[test]
    fn test_color_scale() {
        let mut pm = Pix::new(4, 4, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_all(color::compose_rgb(10, 20, 30));
        let out = scale_to_size(&pm.into(), 9, 5).unwrap();
        assert_eq!(out.get_rgb(8, 4), Some((10, 20, 30)));
    }

    #[test]
    fn test_invalid_requests() {
        assert!(matches!(
            scale_to_size(&ramp(4, 4), 0, 4),
            Err(TransformError::InvalidParameters(_))
        ));
        let deep = Pix::new(4, 4, PixelDepth::Bit16).unwrap();
        assert!(matches!(
            scale_to_size(&deep, 2, 2),
            Err(TransformError::UnsupportedDepth(_))
        ));
    }
}
