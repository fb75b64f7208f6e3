//! Pta - Point arrays
//!
//! Arrays of floating-point coordinate pairs. The rectifier pushes image
//! corners through a homography with [`Pta::transform`] and sizes the
//! output canvas from [`Pta::bounding_box`].
//!
//! # Storage layout
//!
//! Points are stored as separate X and Y vectors (SoA layout).

use crate::box_::Box;
use crate::error::{Error, Result};
use crate::matrix::Matrix3;

/// Array of points.
#[derive(Debug, Clone, Default)]
pub struct Pta {
    /// X coordinates
    x: Vec<f64>,
    /// Y coordinates
    y: Vec<f64>,
}

impl Pta {
    /// Create a new empty Pta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Pta with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }

    /// The four corners `(0,0)`, `(w,0)`, `(0,h)`, `(w,h)` of a `w x h` image.
    pub fn corners(w: f64, h: f64) -> Self {
        [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].into_iter().collect()
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Get a point by index.
    pub fn get(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.x.get(index)?, *self.y.get(index)?))
    }

    /// Add a point.
    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    /// Append all points of `other`.
    pub fn extend(&mut self, other: &Pta) {
        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
    }

    /// Map every point through the projective transform `m`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any point maps to the line at
    /// infinity or behind it (homogeneous `w <= 0`); such a point has no
    /// finite image on the output canvas.
    pub fn transform(&self, m: &Matrix3) -> Result<Pta> {
        let mut out = Pta::with_capacity(self.len());
        for (x, y) in self.iter() {
            let [tx, ty, tw] = m.transform_homogeneous(x, y);
            if tw <= 0.0 || !tw.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "point ({x}, {y}) maps to w = {tw}"
                )));
            }
            out.push(tx / tw, ty / tw);
        }
        Ok(out)
    }

    /// Smallest integer rectangle enclosing every point.
    ///
    /// Coordinates are floored, so the box spans
    /// `floor(min) ..= floor(max)`: `x = floor(min x)` and
    /// `w = floor(max x) - x + 1`. Returns `None` for an empty array.
    pub fn bounding_box(&self) -> Option<Box> {
        if self.is_empty() {
            return None;
        }
        let fold = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
                    (lo.min(c), hi.max(c))
                })
        };
        let (xmin, xmax) = fold(&self.x);
        let (ymin, ymax) = fold(&self.y);
        let (x0, y0) = (xmin.floor() as i32, ymin.floor() as i32);
        Some(Box::new_unchecked(
            x0,
            y0,
            xmax.floor() as i32 - x0 + 1,
            ymax.floor() as i32 - y0 + 1,
        ))
    }

    /// Create an iterator over points.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

impl FromIterator<(f64, f64)> for Pta {
    fn from_iter<T: IntoIterator<Item = (f64, f64)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut pta = Self::with_capacity(iter.size_hint().0);
        for (x, y) in iter {
            pta.push(x, y);
        }
        pta
    }
}
