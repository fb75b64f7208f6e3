//! Convolution operations
//!
//! Separable convolution on 8 bpp gray and 32 bpp color images. Pixels
//! outside the image boundary take the value of the nearest edge pixel
//! (replicate border).

use crate::{FilterError, FilterResult, Kernel};
use keystone_core::{Pix, PixelDepth, color};

/// Convert an image to 8 bpp grayscale.
///
/// 8 bpp input is returned as is (shared, not copied); 16 bpp keeps the
/// high byte and 32 bpp RGB is reduced to luma.
pub fn convert_to_gray(pix: &Pix) -> FilterResult<Pix> {
    if pix.depth() == PixelDepth::Bit8 {
        return Ok(pix.clone());
    }
    log::debug!(
        "converting {}x{} {} bpp image to gray",
        pix.width(),
        pix.height(),
        pix.depth().bits()
    );
    Ok(pix.convert_to_8()?)
}

/// Convolve one channel plane with a kernel, clamping sample positions.
fn convolve_plane(src: &[f32], w: u32, h: u32, kernel: &Kernel) -> Vec<f32> {
    let (w, h) = (w as i32, h as i32);
    let (kw, kh) = (kernel.width() as i32, kernel.height() as i32);
    let (kcx, kcy) = (kernel.center_x() as i32, kernel.center_y() as i32);
    let kdata = kernel.data();

    let mut out = vec![0.0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in 0..kh {
                let sy = (y + ky - kcy).clamp(0, h - 1);
                let row = &src[(sy * w) as usize..((sy + 1) * w) as usize];
                let krow = &kdata[(ky * kw) as usize..((ky + 1) * kw) as usize];
                for (kx, k) in krow.iter().enumerate() {
                    let sx = (x + kx as i32 - kcx).clamp(0, w - 1);
                    sum += row[sx as usize] * k;
                }
            }
            out[(y * w + x) as usize] = sum;
        }
    }
    out
}

/// Split an 8 or 32 bpp image into `f32` channel planes.
fn to_planes(pix: &Pix) -> Vec<Vec<f32>> {
    let (w, h) = (pix.width(), pix.height());
    let n = (w * h) as usize;
    let channels = if pix.depth() == PixelDepth::Bit32 { 3 } else { 1 };
    let mut planes = vec![Vec::with_capacity(n); channels];
    for y in 0..h {
        for x in 0..w {
            let val = pix.get_pixel_unchecked(x, y);
            if channels == 1 {
                planes[0].push(val as f32);
            } else {
                let (r, g, b) = color::extract_rgb(val);
                planes[0].push(r as f32);
                planes[1].push(g as f32);
                planes[2].push(b as f32);
            }
        }
    }
    planes
}

/// Round channel planes back into an image of the given depth.
fn from_planes(planes: &[Vec<f32>], w: u32, h: u32, depth: PixelDepth) -> FilterResult<Pix> {
    let quantize = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    let mut out = Pix::new(w, h, depth)?.to_mut();
    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize;
            let val = match planes {
                [gray] => quantize(gray[i]) as u32,
                [r, g, b] => color::compose_rgb(quantize(r[i]), quantize(g[i]), quantize(b[i])),
                _ => 0,
            };
            out.set_pixel_unchecked(x, y, val);
        }
    }
    Ok(out.into())
}

fn check_depth(pix: &Pix) -> FilterResult<()> {
    match pix.depth() {
        PixelDepth::Bit8 | PixelDepth::Bit32 => Ok(()),
        other => Err(FilterError::UnsupportedDepth {
            expected: "8 or 32 bpp",
            actual: other.bits(),
        }),
    }
}

/// Separable convolution (sequential application of two kernels)
///
/// Applies `kernel_x` first and `kernel_y` to the intermediate result,
/// keeping full `f32` precision between the passes and rounding once at
/// the end.
///
/// # Supported depths
///
/// - 8 bpp grayscale
/// - 32 bpp color (each of R, G, B independently)
pub fn convolve_sep(pix: &Pix, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<Pix> {
    check_depth(pix)?;
    let (w, h) = (pix.width(), pix.height());

    let planes: Vec<Vec<f32>> = to_planes(pix)
        .iter()
        .map(|plane| {
            let tmp = convolve_plane(plane, w, h, kernel_x);
            convolve_plane(&tmp, w, h, kernel_y)
        })
        .collect();

    from_planes(&planes, w, h, pix.depth())
}

/// Apply a `ksize x ksize` Gaussian blur.
///
/// `ksize` must be odd. When `sigma <= 0` it is derived from the size as
/// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_blur(pix: &Pix, ksize: u32, sigma: f32) -> FilterResult<Pix> {
    let row = Kernel::gaussian_row(ksize, sigma)?;
    let column = row.transposed();
    convolve_sep(pix, &row, &column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(w: u32, h: u32, f: impl Fn(u32, u32) -> u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x, y, f(x, y));
            }
        }
        pm.into()
    }

    #[test]
    fn test_blur_preserves_constant() {
        let pix = gray(9, 7, |_, _| 77);
        let out = gaussian_blur(&pix, 5, 0.0).unwrap();
        for y in 0..7 {
            for x in 0..9 {
                assert_eq!(out.get_pixel(x, y), Some(77));
            }
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let pix = gray(11, 11, |x, y| if x == 5 && y == 5 { 255 } else { 0 });
        let out = gaussian_blur(&pix, 5, 1.0).unwrap();
        let center = out.get_pixel(5, 5).unwrap();
        assert!(center < 255);
        assert!(out.get_pixel(6, 5).unwrap() > 0);
        assert_eq!(out.get_pixel(6, 5), out.get_pixel(4, 5));
        assert_eq!(out.get_pixel(5, 6), out.get_pixel(6, 5));
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_blur_color() {
        let mut pm = Pix::new(6, 6, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_all(color::compose_rgb(200, 100, 50));
        let out = gaussian_blur(&pm.into(), 3, 0.0).unwrap();
        assert_eq!(out.get_rgb(3, 3), Some((200, 100, 50)));
    }

    #[test]
    fn test_unsupported_depth() {
        let pix = Pix::new(4, 4, PixelDepth::Bit16).unwrap();
        assert!(matches!(
            gaussian_blur(&pix, 3, 0.0),
            Err(FilterError::UnsupportedDepth { actual: 16, .. })
        ));
    }

    #[test]
    fn test_convert_to_gray() {
        let mut pm = Pix::new(2, 1, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(0, 0, 255, 255, 255).unwrap();
        let g = convert_to_gray(&pm.into()).unwrap();
        assert_eq!(g.depth(), PixelDepth::Bit8);
        assert_eq!(g.get_pixel(0, 0), Some(255));
        assert_eq!(g.get_pixel(1, 0), Some(0));
    }
}
