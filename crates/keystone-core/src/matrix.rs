//! Matrix3 - 3x3 homography algebra
//!
//! A fixed-size row-major `f64` matrix acting on homogeneous image
//! coordinates `(x, y, 1)`. Rotation constructors follow the usual
//! right-handed convention with image y pointing down.

use crate::error::{Error, Result};
use std::ops::Mul;

/// Determinants with a smaller magnitude are treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// A 3x3 real matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    /// Create a matrix from its rows.
    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Translation by `(tx, ty)`.
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new([[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]])
    }

    /// Pinhole camera intrinsics with focal length `f` and principal
    /// point `(cx, cy)`.
    pub const fn camera(f: f64, cx: f64, cy: f64) -> Self {
        Self::new([[f, 0.0, cx], [0.0, f, cy], [0.0, 0.0, 1.0]])
    }

    /// Rotation by `angle` radians about the x axis.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation by `angle` radians about the z (optical) axis.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is greater than 2.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`] when the determinant is not finite
    /// or its magnitude is negligible.
    pub fn inverse(&self) -> Result<Matrix3> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_EPS {
            return Err(Error::SingularMatrix(det));
        }

        let m = &self.m;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let adj = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];

        let mut inv = [[0.0; 3]; 3];
        for (r, row) in adj.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                inv[r][c] = v / det;
            }
        }
        Ok(Matrix3::new(inv))
    }

    /// Apply to `(x, y, 1)` and return the homogeneous result.
    #[inline]
    pub fn transform_homogeneous(&self, x: f64, y: f64) -> [f64; 3] {
        let m = &self.m;
        [
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
            m[2][0] * x + m[2][1] * y + m[2][2],
        ]
    }

    /// Apply to the point `(x, y)` and dehomogenize.
    ///
    /// Returns `None` when the point maps to infinity (`w == 0`).
    #[inline]
    pub fn transform_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let [tx, ty, tw] = self.transform_homogeneous(x, y);
        if tw == 0.0 {
            return None;
        }
        Some((tx / tw, ty / tw))
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Matrix3::new(out)
    }
}

impl Mul for &Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: &Matrix3) -> Matrix3 {
        *self * *rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: &Matrix3, b: &Matrix3) {
        for r in 0..3 {
            for c in 0..3 {
                assert!(
                    (a.get(r, c) - b.get(r, c)).abs() < 1e-9,
                    "({r},{c}): {} vs {}",
                    a.get(r, c),
                    b.get(r, c)
                );
            }
        }
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = Matrix3::camera(700.0, 320.0, 240.0) * Matrix3::rotation_x(0.3);
        let inv = m.inverse().unwrap();
        assert_close(&(m * inv), &Matrix3::identity());
        assert_close(&(inv * m), &Matrix3::identity());
    }

    #[test]
    fn test_singular_rejected() {
        let m = Matrix3::new([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(m.inverse(), Err(Error::SingularMatrix(_))));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let (x, y) = Matrix3::rotation_z(FRAC_PI_2)
            .transform_point(1.0, 0.0)
            .unwrap();
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_point_at_infinity() {
        let m = Matrix3::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(m.transform_point(3.0, 0.0), None);
        assert_eq!(m.transform_point(3.0, 2.0), Some((1.5, 1.0)));
    }

    #[test]
    fn test_translation_composes() {
        let t = Matrix3::translation(2.0, 3.0) * Matrix3::translation(-1.0, 1.0);
        assert_close(&t, &Matrix3::translation(1.0, 4.0));
        assert_eq!(Matrix3::default(), Matrix3::identity());
    }
}
