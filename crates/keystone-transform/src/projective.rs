//! Projective transformations for images
//!
//! A projective (homography) warp maps source point `(x, y)` to
//! ```text
//! x' = (a*x + b*y + c) / (g*x + h*y + i)
//! y' = (d*x + e*y + f) / (g*x + h*y + i)
//! ```
//! The output is filled by inverse mapping: each destination pixel is sent
//! through the inverse matrix and the source is sampled there.

use crate::{TransformError, TransformResult};
use keystone_core::{Matrix3, Pix, PixelDepth, color};

/// Value brought in where the inverse mapping leaves the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectiveFill {
    /// Fill with white pixels
    White,
    /// Fill with black pixels
    #[default]
    Black,
    /// Fill with a specific pixel value (gray level or `0xRRGGBBAA`)
    Color(u32),
}

impl ProjectiveFill {
    /// Get the fill value for a specific pixel depth
    pub fn to_value(self, depth: PixelDepth) -> u32 {
        match self {
            ProjectiveFill::White => match depth {
                PixelDepth::Bit8 => 255,
                PixelDepth::Bit16 => 65535,
                PixelDepth::Bit32 => color::compose_rgb(255, 255, 255),
            },
            ProjectiveFill::Black => match depth {
                PixelDepth::Bit32 => color::compose_rgb(0, 0, 0),
                _ => 0,
            },
            ProjectiveFill::Color(val) => val,
        }
    }
}

/// Source sampling used by [`projective`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Bilinear interpolation of the four surrounding pixels
    #[default]
    Linear,
    /// Nearest pixel
    Sampled,
}

/// Channels of a pixel as floats (one for gray, three for RGB).
fn channels(val: u32, depth: PixelDepth) -> [f32; 3] {
    match depth {
        PixelDepth::Bit32 => {
            let (r, g, b) = color::extract_rgb(val);
            [r as f32, g as f32, b as f32]
        }
        _ => [val as f32; 3],
    }
}

fn compose(ch: [f32; 3], depth: PixelDepth) -> u32 {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    match depth {
        PixelDepth::Bit32 => color::compose_rgb(q(ch[0]), q(ch[1]), q(ch[2])),
        _ => q(ch[0]) as u32,
    }
}

/// Pixel at integer position, or `fill` outside the image.
#[inline]
fn fetch(pix: &Pix, x: i64, y: i64, fill: u32) -> u32 {
    if x < 0 || y < 0 || x >= pix.width() as i64 || y >= pix.height() as i64 {
        fill
    } else {
        pix.get_pixel_unchecked(x as u32, y as u32)
    }
}

fn sample_linear(pix: &Pix, sx: f64, sy: f64, fill: u32) -> u32 {
    let depth = pix.depth();
    let (x0, y0) = (sx.floor(), sy.floor());
    let (fx, fy) = ((sx - x0) as f32, (sy - y0) as f32);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = channels(fetch(pix, x0, y0, fill), depth);
    let p10 = channels(fetch(pix, x0 + 1, y0, fill), depth);
    let p01 = channels(fetch(pix, x0, y0 + 1, fill), depth);
    let p11 = channels(fetch(pix, x0 + 1, y0 + 1, fill), depth);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let top = p00[c] + (p10[c] - p00[c]) * fx;
        let bottom = p01[c] + (p11[c] - p01[c]) * fx;
        out[c] = top + (bottom - top) * fy;
    }
    compose(out, depth)
}

/// Warp `pix` through the homography `matrix` onto an
/// `out_width x out_height` canvas.
///
/// `matrix` maps source coordinates to destination coordinates. Destination
/// pixels whose preimage lies outside the source (or at infinity) take the
/// fill value; with [`Interpolation::Linear`] the fill also blends into the
/// border pixels.
///
/// # Supported depths
///
/// - 8 bpp grayscale
/// - 32 bpp color
///
/// # Errors
///
/// [`TransformError::SingularMatrix`] when `matrix` has no inverse.
pub fn projective(
    pix: &Pix,
    matrix: &Matrix3,
    out_width: u32,
    out_height: u32,
    interpolation: Interpolation,
    fill: ProjectiveFill,
) -> TransformResult<Pix> {
    let depth = pix.depth();
    if !matches!(depth, PixelDepth::Bit8 | PixelDepth::Bit32) {
        return Err(TransformError::UnsupportedDepth(format!(
            "projective warp needs 8 or 32 bpp, got {}",
            depth.bits()
        )));
    }
    let inverse = matrix.inverse().map_err(|e| match e {
        keystone_core::Error::SingularMatrix(_) => TransformError::SingularMatrix,
        other => TransformError::Core(other),
    })?;

    let fill_val = fill.to_value(depth);
    let mut out = Pix::new(out_width, out_height, depth)?.to_mut();
    out.set_informat(pix.informat());

    for y in 0..out_height {
        for x in 0..out_width {
            let [u, v, w] = inverse.transform_homogeneous(x as f64, y as f64);
            let val = if w == 0.0 || !w.is_finite() {
                fill_val
            } else {
                let (sx, sy) = (u / w, v / w);
                match interpolation {
                    Interpolation::Linear => sample_linear(pix, sx, sy, fill_val),
                    Interpolation::Sampled => {
                        fetch(pix, sx.round() as i64, sy.round() as i64, fill_val)
                    }
                }
            };
            out.set_pixel_unchecked(x, y, val);
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Pix {
        let mut pm = Pix::new(6, 5, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..5 {
            for x in 0..6 {
                pm.set_pixel_unchecked(x, y, 10 + x * 20 + y * 3);
            }
        }
        pm.into()
    }

    #[test]
    fn test_identity_warp() {
        let pix = pattern();
        for interp in [Interpolation::Linear, Interpolation::Sampled] {
            let out = projective(
                &pix,
                &Matrix3::identity(),
                6,
                5,
                interp,
                ProjectiveFill::White,
            )
            .unwrap();
            assert_eq!(out.data(), pix.data());
        }
    }

    #[test]
    fn test_translation_brings_in_fill() {
        let pix = pattern();
        let m = Matrix3::translation(2.0, 0.0);
        let out = projective(&pix, &m, 6, 5, Interpolation::Sampled, ProjectiveFill::Black).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(0));
        assert_eq!(out.get_pixel(1, 3), Some(0));
        assert_eq!(out.get_pixel(2, 1), pix.get_pixel(0, 1));
        assert_eq!(out.get_pixel(5, 4), pix.get_pixel(3, 4));
    }

    #[test]
    fn test_half_pixel_shift_interpolates() {
        let pix = pattern();
        let m = Matrix3::translation(-0.5, 0.0);
        let out = projective(&pix, &m, 6, 5, Interpolation::Linear, ProjectiveFill::Black).unwrap();
        // Halfway between 10 and 30 on the first row
        assert_eq!(out.get_pixel(0, 0), Some(20));
    }

    #[test]
    fn test_perspective_row_matches_point_mapping() {
        let mut pm = Pix::new(40, 40, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_all(color::compose_rgb(200, 10, 10));
        for y in 29..=31 {
            for x in 19..=21 {
                pm.set_rgb(x, y, 0, 250, 0).unwrap();
            }
        }
        let pix: Pix = pm.into();
        let m = Matrix3::new([[1.0, 0.1, 0.0], [0.0, 1.0, 0.0], [0.0, 0.004, 1.0]]);
        let (dx, dy) = m.transform_point(20.0, 30.0).unwrap();
        let out = projective(
            &pix,
            &m,
            60,
            60,
            Interpolation::Sampled,
            ProjectiveFill::Black,
        )
        .unwrap();
        assert_eq!(out.get_rgb(dx.round() as u32, dy.round() as u32), Some((0, 250, 0)));
    }

    #[test]
    fn test_singular_matrix() {
        let m = Matrix3::new([[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            projective(&pattern(), &m, 4, 4, Interpolation::Linear, ProjectiveFill::Black),
            Err(TransformError::SingularMatrix)
        ));
    }
}
