//! Fast Hough Transform
//!
//! For an image of power-of-two height `h`, `fht` computes `out[s][x]`: the
//! sum of the image along the dyadic line that starts at column `x` in the
//! top row and ends at column `x + s` in the bottom row, for every shift
//! `0 <= s < h`. Lines that would leave the image on the right contribute
//! nothing and their cells are zero.
//!
//! The dyadic line of shift `s` over `2k` rows is the line of shift
//! `s / 2` over the top `k` rows followed by the line of shift `s / 2`
//! starting `s - s / 2` columns further right over the bottom `k` rows.
//! Merging pairs of half-height results stage by stage gives the whole
//! transform in `log2(h)` passes; within a block, shifts end up in
//! bit-reversed row order and are put back in natural order at the end.
//!
//! Sums are accumulated exactly in `i32`.

use crate::bitrev::bitrev_inc;
use crate::{HoughError, HoughResult};
use keystone_core::IPix;

/// Run the Fast Hough Transform on `image`.
///
/// # Errors
///
/// [`HoughError::NotPowerOfTwo`] when the height is not a power of two.
pub fn fht(image: &IPix) -> HoughResult<IPix> {
    let height = image.height();
    if !height.is_power_of_two() {
        return Err(HoughError::NotPowerOfTwo { height });
    }
    let mut accum = image.clone();
    butterfly(&mut accum);
    unscramble(&mut accum);
    Ok(accum)
}

/// All merge stages, in place.
fn butterfly(accum: &mut IPix) {
    let width = accum.width() as usize;
    let height = accum.height();
    let mut lower = vec![0i32; width];

    let mut h = 2;
    while h <= height {
        let half = h / 2;
        for y in (0..height).step_by(h as usize) {
            let mut ss = 0u32;
            for s in 0..half {
                let u = y + s;
                let d = u + half;
                merge_rows(accum, u, d, ss as usize, &mut lower);
                ss = bitrev_inc(ss, h / 4);
            }
        }
        h <<= 1;
    }
}

/// Merge rows `u` (upper half) and `d` (lower half) for half-shift `ss`.
///
/// Row `u` becomes the line of shift `2 * ss` and row `d` the line of
/// shift `2 * ss + 1`. Both read the lower row before the merge, so it is
/// snapshotted into `lower` first.
fn merge_rows(accum: &mut IPix, u: u32, d: u32, ss: usize, lower: &mut [i32]) {
    let width = accum.width() as usize;
    lower.copy_from_slice(accum.row(d));

    let data = accum.data_mut();
    let (head, tail) = data.split_at_mut(d as usize * width);
    let upper = &mut head[u as usize * width..(u as usize + 1) * width];
    let down = &mut tail[..width];

    for i in 0..width {
        let top = upper[i];
        down[i] = if i + 2 * ss + 1 < width {
            top + lower[i + ss + 1]
        } else {
            0
        };
        upper[i] = if i + 2 * ss < width {
            top + lower[i + ss]
        } else {
            0
        };
    }
}

/// Put rows back in natural shift order.
fn unscramble(accum: &mut IPix) {
    let height = accum.height();
    let mut k = 0;
    for i in 0..height {
        if i < k {
            accum.swap_rows(i, k);
        }
        k = bitrev_inc(k, height / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_test::synth::brute_force_fht;

    #[test]
    fn test_single_row_is_identity() {
        let img = IPix::from_data(5, 1, vec![3, 1, 4, 1, 5]).unwrap();
        assert_eq!(fht(&img).unwrap(), img);
    }

    #[test]
    fn test_all_ones_4x4() {
        let img = IPix::from_data(4, 4, vec![1; 16]).unwrap();
        let out = fht(&img).unwrap();
        // Shift 0: every vertical line is inside
        assert_eq!(out.row(0), &[4, 4, 4, 4]);
        // Shift s: columns x with x + s < 4
        assert_eq!(out.row(1), &[4, 4, 4, 0]);
        assert_eq!(out.row(2), &[4, 4, 0, 0]);
        assert_eq!(out.row(3), &[4, 0, 0, 0]);
    }

    #[test]
    fn test_matches_brute_force() {
        let data = (0..8 * 8).map(|i| (i * 37 % 11) as i32).collect();
        let img = IPix::from_data(8, 8, data).unwrap();
        assert_eq!(fht(&img).unwrap(), brute_force_fht(&img));
    }

    #[test]
    fn test_narrow_image() {
        // Shifts at or beyond the width are all zero
        let img = IPix::from_data(3, 8, vec![2; 24]).unwrap();
        let out = fht(&img).unwrap();
        assert_eq!(out.row(2), &[16, 0, 0]);
        assert!((3..8).all(|s| out.row(s).iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let img = IPix::new(4, 6).unwrap();
        assert!(matches!(
            fht(&img),
            Err(HoughError::NotPowerOfTwo { height: 6 })
        ));
    }
}
