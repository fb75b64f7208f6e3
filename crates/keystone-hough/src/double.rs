//! Two-sided Hough accumulator
//!
//! [`fht`](crate::fht) only sees lines leaning right (non-negative shift).
//! Transforming the image and its mirror and placing both results in one
//! `w x w` map indexed by where a line meets the bottom row (map row) and
//! the top row (map column) covers both lean directions.

use crate::HoughResult;
use crate::fht::fht;
use keystone_core::IPix;

/// Map every dyadic line of `image` to the cell `(bottom column, top column)`.
///
/// The result is `w x w` for an image of width `w`. Cell `(row = x + s,
/// col = x)` holds the right-leaning line from `x` with shift `s`; cell
/// `(row = w - 1 - x - s, col = w - 1 - x)` holds the left-leaning one
/// from the mirror. Shifts of `height` or more are not computed, so when
/// the image is wider than tall the far corners stay zero.
pub fn double_fht(image: &IPix) -> HoughResult<IPix> {
    let w = image.width();
    let h = image.height();
    let mut out = IPix::new(w, w)?;

    let right = fht(image)?;
    let left = fht(&image.flip_lr())?;

    for x in 0..w {
        let smax = (w - x).min(h);
        for s in 0..smax {
            out.set(x, x + s, right.row(s)[x as usize])?;
        }
    }
    for x in 0..w {
        let smax = (w - x).min(h);
        for s in 0..smax {
            out.set(w - 1 - x, w - 1 - x - s, left.row(s)[x as usize])?;
        }
    }

    log::trace!("double FHT of {w}x{h} image");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_test::synth::dyadic_line_image;

    #[test]
    fn test_vertical_line_lands_on_diagonal() {
        let img = dyadic_line_image(8, 8, 5, 0, 1);
        let out = double_fht(&img).unwrap();
        assert_eq!(out.get(5, 5), Some(8));
        assert_eq!(out.max_loc(), (8, 5, 5));
    }

    #[test]
    fn test_right_leaning_line() {
        // Top column 1, bottom column 1 + 4
        let img = dyadic_line_image(8, 8, 1, 4, 3);
        let out = double_fht(&img).unwrap();
        assert_eq!(out.get(1, 5), Some(24));
        assert_eq!(out.max_loc(), (24, 1, 5));
    }

    #[test]
    fn test_left_leaning_line() {
        // Mirror of a shift-3 line from column 0: top column 7, bottom column 4
        let img = dyadic_line_image(8, 8, 0, 3, 1).flip_lr();
        let out = double_fht(&img).unwrap();
        assert_eq!(out.get(7, 4), Some(8));
    }

    #[test]
    fn test_wide_image_leaves_far_corner_zero() {
        let img = IPix::from_data(8, 2, vec![1; 16]).unwrap();
        let out = double_fht(&img).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        assert_eq!(out.get(0, 1), Some(2));
        assert_eq!(out.get(0, 7), Some(0));
        assert_eq!(out.get(7, 0), Some(0));
    }
}
