//! Deterministic synthetic inputs
//!
//! Regression tests need images whose Hough response is known in advance:
//! brute-force dyadic line sums to check the transform against, single
//! dyadic lines, and pencils of lines converging on a chosen vanishing
//! point (either as a clean edge map or as a "photographed" ruled page).

use keystone_core::{Color, IPix, Pix, PixelDepth};

/// A straight segment `(top, bottom)` in pixel coordinates.
pub type Segment = ((f64, f64), (f64, f64));

/// Column visited at `row` by the dyadic line of `shift` starting at `x`
/// in a block of `height` rows (a power of two).
///
/// The line is defined recursively: its upper half starts at `x` and its
/// lower half at `x + ceil(shift / 2)`, both halves with shift
/// `floor(shift / 2)`. A one-row line is just column `x`.
pub fn dyadic_line_column(height: u32, shift: u32, x: u32, row: u32) -> u32 {
    let (mut h, mut s, mut col, mut r) = (height, shift, x, row);
    while h > 1 {
        let half = h / 2;
        if r >= half {
            col += s - s / 2;
            r -= half;
        }
        s /= 2;
        h = half;
    }
    col
}

/// Line sums computed directly, one dyadic line at a time.
///
/// `out[shift][x]` is the sum of `img` along the dyadic line from column
/// `x` in the top row to column `x + shift` in the bottom row, or zero
/// when that end column falls outside the image.
pub fn brute_force_fht(img: &IPix) -> IPix {
    let (w, h) = (img.width(), img.height());
    let mut out = IPix::new(w, h).unwrap();
    for s in 0..h {
        for x in 0..w {
            if x + s >= w {
                continue;
            }
            let sum = (0..h)
                .map(|r| img.get(dyadic_line_column(h, s, x, r), r).unwrap())
                .sum();
            out.set(x, s, sum).unwrap();
        }
    }
    out
}

/// An image holding `value` along exactly one dyadic line.
pub fn dyadic_line_image(width: u32, height: u32, x: u32, shift: u32, value: i32) -> IPix {
    let mut img = IPix::new(width, height).unwrap();
    for r in 0..height {
        img.set(dyadic_line_column(height, shift, x, r), r, value)
            .unwrap();
    }
    img
}

/// Small deterministic pseudo-random image (xorshift), values in `0..max`.
pub fn noise_image(width: u32, height: u32, max: i32, seed: u32) -> IPix {
    let mut state = seed.max(1);
    let data = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % max as u32) as i32
        })
        .collect();
    IPix::from_data(width, height, data).unwrap()
}

/// Vanishing point, in working-resolution pixels with the origin at the
/// top-left, encoded by a second-pass Hough peak `(x, shift)` on a
/// `d x d` map.
pub fn peak_vanishing_point(d: u32, x: u32, shift: u32) -> (f64, f64) {
    let (d, x, s) = (d as f64, x as f64, shift as f64);
    (x * d / (d - s), -d * s / (d - s))
}

/// `count` segments from the top edge to the bottom edge of a
/// `width x height` image, all pointing at `vp`, with bottom ends spread
/// evenly across the middle 80% of the width.
pub fn converging_rulings(width: u32, height: u32, vp: (f64, f64), count: u32) -> Vec<Segment> {
    let (w, h) = (width as f64, height as f64);
    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.5
            };
            let bottom = (w * (0.1 + 0.8 * t), h);
            let top_x = vp.0 + (bottom.0 - vp.0) * (0.0 - vp.1) / (h - vp.1);
            ((top_x, 0.0), bottom)
        })
        .collect()
}

/// A binary edge map (255 on black) of a pencil of lines converging on
/// the vanishing point that a second-pass peak `(x, shift)` encodes.
pub fn pencil_edge_map(d: u32, peak_x: u32, peak_shift: u32, count: u32, stroke: u32) -> Pix {
    let vp = peak_vanishing_point(d, peak_x, peak_shift);
    let mut pm = Pix::new(d, d, PixelDepth::Bit8).unwrap().to_mut();
    for (top, bottom) in converging_rulings(d, d, vp, count) {
        pm.render_line_color(top, bottom, stroke, Color::WHITE);
    }
    pm.into()
}

/// An RGB "photographed page": dark rulings on a light background.
pub fn ruled_page(width: u32, height: u32, rulings: &[Segment], stroke: u32) -> Pix {
    let mut pm = Pix::new(width, height, PixelDepth::Bit32).unwrap().to_mut();
    pm.set_all(Color::new(236, 232, 220).to_pixel32());
    for &(top, bottom) in rulings {
        pm.render_line_color(top, bottom, stroke, Color::new(30, 30, 40));
    }
    pm.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dyadic_line_endpoints() {
        for s in 0..16 {
            assert_eq!(dyadic_line_column(16, s, 3, 0), 3);
            assert_eq!(dyadic_line_column(16, s, 3, 15), 3 + s);
        }
    }

    #[test]
    fn test_dyadic_line_is_monotone() {
        let cols: Vec<u32> = (0..32).map(|r| dyadic_line_column(32, 21, 0, r)).collect();
        assert!(cols.windows(2).all(|p| p[1] >= p[0] && p[1] - p[0] <= 1));
    }

    #[test]
    fn test_rulings_meet_at_vp() {
        let vp = (150.0, -300.0);
        for ((tx, ty), (bx, by)) in converging_rulings(200, 100, vp, 5) {
            // Extend each segment to the vanishing row
            let t = (vp.1 - ty) / (by - ty);
            let x = tx + t * (bx - tx);
            assert!((x - vp.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_peak_vanishing_point() {
        let (x, y) = peak_vanishing_point(512, 300, 100);
        assert!((x - 300.0 * 512.0 / 412.0).abs() < 1e-9);
        assert!((y + 51200.0 / 412.0).abs() < 1e-9);
    }
}
