//! Peak emphasis
//!
//! Lines through a common vanishing point map to cells of the two-sided
//! accumulator that lie on one straight line. Before that line is searched
//! for, the accumulator is turned into a map where the pencil stands out
//! from the smooth background of unrelated line sums.

use keystone_core::{FPix, IPix};
use keystone_filter::{EdgeOrientation, sobel};

/// How the accumulator is sharpened before the second pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmphasisMethod {
    /// `|d/dx| + |d/dy|` with 3x3 Sobel kernels; ridges light up.
    /// Suited to thresholded maps.
    #[default]
    Gradient,
    /// Squared deviation from the row mean. Suited to thin Canny edges.
    RowVariance,
}

impl EmphasisMethod {
    /// Name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            EmphasisMethod::Gradient => "gradient",
            EmphasisMethod::RowVariance => "variance",
        }
    }
}

/// Emphasize the dominant pencil in a two-sided accumulator.
pub fn emphasize(accum: &IPix, method: EmphasisMethod) -> FPix {
    match method {
        EmphasisMethod::Gradient => sobel(accum, EdgeOrientation::All).to_fpix(),
        EmphasisMethod::RowVariance => row_variance(accum),
    }
}

fn row_variance(accum: &IPix) -> FPix {
    let w = accum.width() as usize;
    let mut out = accum.to_fpix();
    for (src, dst) in accum.data().chunks_exact(w).zip(out.data_mut().chunks_exact_mut(w)) {
        let mean = src.iter().map(|&v| v as f64).sum::<f64>() / w as f64;
        for (d, &v) in dst.iter_mut().zip(src) {
            let dev = v as f64 - mean;
            *d = (dev * dev) as f32;
        }
    }
    out
}

/// Stretch an emphasized map onto the integer range `0..=255` for the
/// second pass, so that its sums stay small whatever the method.
pub fn normalize_for_search(map: &FPix) -> IPix {
    map.normalize_to_ipix(0, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_flat_is_zero() {
        let accum = IPix::from_data(4, 4, vec![9; 16]).unwrap();
        let out = emphasize(&accum, EmphasisMethod::Gradient);
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_gradient_marks_ridge() {
        let mut accum = IPix::new(7, 7).unwrap();
        for y in 0..7 {
            accum.set(3, y, 10).unwrap();
        }
        let out = emphasize(&accum, EmphasisMethod::Gradient);
        // Sobel x is 40 on both flanks, 0 on the ridge and far away
        assert_eq!(out.get_pixel(2, 3), Some(40.0));
        assert_eq!(out.get_pixel(4, 3), Some(40.0));
        assert_eq!(out.get_pixel(3, 3), Some(0.0));
        assert_eq!(out.get_pixel(0, 3), Some(0.0));
    }

    #[test]
    fn test_row_variance() {
        let accum = IPix::from_data(4, 2, vec![1, 3, 1, 3, 5, 5, 5, 5]).unwrap();
        let out = emphasize(&accum, EmphasisMethod::RowVariance);
        assert_eq!(out.row(0), &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(out.row(1), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_for_search() {
        let map = FPix::from_data(3, 1, vec![2.0, 4.0, 6.0]).unwrap();
        let out = normalize_for_search(&map);
        assert_eq!(out.row(0), &[0, 128, 255]);
        let flat = FPix::from_data(2, 1, vec![3.0, 3.0]).unwrap();
        assert_eq!(normalize_for_search(&flat).row(0), &[0, 0]);
    }
}
