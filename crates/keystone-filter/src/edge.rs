//! Edge detection
//!
//! 3x3 Sobel gradients and Canny edge detection. The Sobel filter works on
//! [`IPix`] so it can differentiate Hough accumulators as well as images;
//! positions outside the image are mirrored without repeating the edge
//! sample (`-1 -> 1`, `n -> n - 2`).

use crate::{FilterError, FilterResult};
use keystone_core::{IPix, Pix, PixelDepth};

/// Edge detection orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrientation {
    /// Horizontal edges: the vertical derivative `d/dy`
    Horizontal,
    /// Vertical edges: the horizontal derivative `d/dx`
    Vertical,
    /// `|d/dx| + |d/dy|`
    All,
}

#[inline]
fn reflect101(i: i64, n: i64) -> usize {
    if n == 1 {
        return 0;
    }
    let i = if i < 0 { -i } else { i };
    let i = if i >= n { 2 * n - 2 - i } else { i };
    i as usize
}

/// Signed horizontal and vertical Sobel derivatives.
fn sobel_xy(image: &IPix) -> (Vec<i32>, Vec<i32>) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let data = image.data();
    let mut dx = vec![0i32; data.len()];
    let mut dy = vec![0i32; data.len()];

    for y in 0..h {
        let up = reflect101(y - 1, h) * w as usize;
        let mid = y as usize * w as usize;
        let down = reflect101(y + 1, h) * w as usize;
        for x in 0..w {
            let l = reflect101(x - 1, w);
            let c = x as usize;
            let r = reflect101(x + 1, w);

            let gx = (data[up + r] - data[up + l])
                + 2 * (data[mid + r] - data[mid + l])
                + (data[down + r] - data[down + l]);
            let gy = (data[down + l] + 2 * data[down + c] + data[down + r])
                - (data[up + l] + 2 * data[up + c] + data[up + r]);

            dx[mid + c] = gx;
            dy[mid + c] = gy;
        }
    }
    (dx, dy)
}

/// Apply the 3x3 Sobel operator to an integer image.
///
/// `Vertical` and `Horizontal` return the signed derivatives along x and y;
/// `All` returns the L1 magnitude `|dx| + |dy|`.
pub fn sobel(image: &IPix, orientation: EdgeOrientation) -> IPix {
    let (dx, dy) = sobel_xy(image);
    let data = match orientation {
        EdgeOrientation::Vertical => dx,
        EdgeOrientation::Horizontal => dy,
        EdgeOrientation::All => dx
            .iter()
            .zip(&dy)
            .map(|(gx, gy)| gx.saturating_abs().saturating_add(gy.saturating_abs()))
            .collect(),
    };
    let mut out = image.clone();
    out.data_mut().copy_from_slice(&data);
    out
}

fn check_gray(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

/// Sobel L1 gradient magnitude of an 8 bpp image, clipped to 255.
pub fn sobel_magnitude(pix: &Pix) -> FilterResult<Pix> {
    check_gray(pix)?;
    let mag = sobel(&IPix::from_pix(pix)?, EdgeOrientation::All);
    let mut out = Pix::new(pix.width(), pix.height(), PixelDepth::Bit8)?.to_mut();
    for y in 0..pix.height() {
        for (x, &v) in mag.row(y).iter().enumerate() {
            out.set_pixel_unchecked(x as u32, y, v.clamp(0, 255) as u32);
        }
    }
    Ok(out.into())
}

/// tan(22.5 deg) in Q15
const TG22: i64 = 13573;

/// Classification of a pixel after non-maximum suppression.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EdgeClass {
    None,
    Weak,
    Strong,
}

/// Canny edge detection on an 8 bpp image.
///
/// Uses 3x3 Sobel gradients with the L1 magnitude, non-maximum suppression
/// along the gradient direction quantized to four sectors, and hysteresis:
/// pixels above `high` seed edges that grow through 8-connected pixels
/// above `low`. The thresholds are swapped if given in the wrong order.
///
/// Returns an 8 bpp map with edges at 255 on 0.
pub fn canny(pix: &Pix, low: f64, high: f64) -> FilterResult<Pix> {
    check_gray(pix)?;
    if !low.is_finite() || !high.is_finite() {
        return Err(FilterError::InvalidParameters(format!(
            "Canny thresholds must be finite, got ({low}, {high})"
        )));
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let (low, high) = (low.floor() as i64, high.floor() as i64);

    let (w, h) = (pix.width() as usize, pix.height() as usize);
    let (dx, dy) = sobel_xy(&IPix::from_pix(pix)?);
    let mag: Vec<i64> = dx
        .iter()
        .zip(&dy)
        .map(|(gx, gy)| (gx.abs() + gy.abs()) as i64)
        .collect();
    let mag_at = |x: isize, y: isize| -> i64 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            mag[y as usize * w + x as usize]
        }
    };

    let mut class = vec![EdgeClass::None; w * h];
    let mut stack = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let m = mag[i];
            if m <= low {
                continue;
            }
            let (xi, yi) = (x as isize, y as isize);
            let ax = (dx[i] as i64).abs();
            let ay = (dy[i] as i64).abs() << 15;
            let tg22x = ax * TG22;

            let is_max = if ay < tg22x {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else {
                let tg67x = tg22x + (ax << 16);
                if ay > tg67x {
                    m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
                } else {
                    let s: isize = if (dx[i] ^ dy[i]) < 0 { -1 } else { 1 };
                    m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
                }
            };
            if !is_max {
                continue;
            }
            if m > high {
                class[i] = EdgeClass::Strong;
                stack.push(i);
            } else {
                class[i] = EdgeClass::Weak;
            }
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if class[j] == EdgeClass::Weak {
                    class[j] = EdgeClass::Strong;
                    stack.push(j);
                }
            }
        }
    }

    let mut out = Pix::new(pix.width(), pix.height(), PixelDepth::Bit8)?.to_mut();
    for (i, c) in class.iter().enumerate() {
        if *c == EdgeClass::Strong {
            out.set_pixel_unchecked((i % w) as u32, (i / w) as u32, 255);
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image(w: u32, h: u32, at: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..h {
            for x in at..w {
                pm.set_pixel_unchecked(x, y, 200);
            }
        }
        pm.into()
    }

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(2, 5), 2);
        assert_eq!(reflect101(-1, 1), 0);
    }

    #[test]
    fn test_sobel_ramp() {
        // f(x, y) = 3x: dx = 8 * 3 inside, zero at mirrored borders
        let data = (0..25).map(|i| 3 * (i % 5)).collect();
        let img = IPix::from_data(5, 5, data).unwrap();
        let dx = sobel(&img, EdgeOrientation::Vertical);
        let dy = sobel(&img, EdgeOrientation::Horizontal);
        assert_eq!(dx.get(2, 2), Some(24));
        assert_eq!(dx.get(0, 2), Some(0));
        assert_eq!(dx.get(4, 2), Some(0));
        assert!(dy.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sobel_all_is_l1() {
        let data = (0..36).map(|i| (i % 6) * 2 + (i / 6) * 5).collect();
        let img = IPix::from_data(6, 6, data).unwrap();
        let all = sobel(&img, EdgeOrientation::All);
        // dx = 8 * 2, dy = 8 * 5 away from the borders
        assert_eq!(all.get(3, 3), Some(16 + 40));
    }

    #[test]
    fn test_sobel_magnitude_clips() {
        let out = sobel_magnitude(&step_image(8, 8, 4)).unwrap();
        assert_eq!(out.get_pixel(3, 4), Some(255));
        assert_eq!(out.get_pixel(0, 4), Some(0));
    }

    #[test]
    fn test_canny_thin_step_edge() {
        let out = canny(&step_image(16, 16, 8), 50.0, 150.0).unwrap();
        for y in 0..16 {
            let row: Vec<u32> = (0..16).map(|x| out.get_pixel(x, y).unwrap()).collect();
            assert_eq!(row.iter().filter(|&&v| v == 255).count(), 1, "row {y}");
            assert!(row[7] == 255 || row[8] == 255);
        }
    }

    #[test]
    fn test_canny_flat_has_no_edges() {
        let mut pm = Pix::new(10, 10, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_all(120);
        let out = canny(&pm.into(), 10.0, 20.0).unwrap();
        assert!((0..10).all(|y| (0..10).all(|x| out.get_pixel(x, y) == Some(0))));
    }

    #[test]
    fn test_canny_swapped_thresholds() {
        let a = canny(&step_image(12, 12, 6), 150.0, 50.0).unwrap();
        let b = canny(&step_image(12, 12, 6), 50.0, 150.0).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
