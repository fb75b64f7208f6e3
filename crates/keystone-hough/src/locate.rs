//! Vanishing-point location
//!
//! Lines through a vanishing point `(X, Y)` above a `d x d` edge map meet the
//! top row at `a` and the bottom row at `b` with `a = X (1 - t) + b t`,
//! `t = -Y / (d - Y)`. In the two-sided accumulator (row `b`, column `a`)
//! that pencil is itself a right-leaning line starting at column
//! `x = X d / (d - Y)` with shift `s = d t`, which a second single-sided
//! FHT finds as its maximum. Inverting,
//!
//! ```text
//! X = x d / (d - s)        Y = -d s / (d - s)
//! ```

use crate::double::double_fht;
use crate::emphasis::{EmphasisMethod, emphasize, normalize_for_search};
use crate::fht::fht;
use crate::{HoughError, HoughResult};
use keystone_core::{FPix, IPix, Pix};

/// Maximum of the second-pass accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    /// Column where the pencil line starts (top row of the accumulator)
    pub x: u32,
    /// Shift of the pencil line
    pub shift: u32,
    /// Accumulated value at the peak
    pub value: i32,
}

/// Vanishing point in source pixels relative to the image centre
/// (x to the right, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VanishingPoint {
    /// A point in the image plane
    Finite {
        /// Horizontal offset from the centre
        x: f64,
        /// Vertical offset from the centre (negative: above)
        y: f64,
    },
    /// The rulings are parallel; nothing to correct
    AtInfinity,
}

impl VanishingPoint {
    /// Offsets from the centre, or `None` at infinity
    pub fn finite(self) -> Option<(f64, f64)> {
        match self {
            VanishingPoint::Finite { x, y } => Some((x, y)),
            VanishingPoint::AtInfinity => None,
        }
    }
}

/// The vanishing point as seen from the middle of the bottom edge
///
/// `height` is the vanishing point's height above the bottom edge in image
/// heights; `slope` is its horizontal offset from the bottom centre in
/// image widths, divided by `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeHeight {
    /// Horizontal run per unit height (widths per height)
    pub slope: f64,
    /// Height above the bottom edge (image heights)
    pub height: f64,
}

impl Peak {
    /// Vanishing point of this peak on a `d x d` map, in working pixels
    /// with the origin at the top-left, or `None` at infinity.
    pub fn working_vanishing_point(&self, d: u32) -> Option<(f64, f64)> {
        if self.shift >= d {
            return None;
        }
        let (d, x, s) = (d as f64, self.x as f64, self.shift as f64);
        Some((x * d / (d - s), -d * s / (d - s)))
    }

    /// Vanishing point in a `cols x rows` source image, relative to its
    /// centre.
    pub fn vanishing_point(&self, cols: u32, rows: u32, d: u32) -> VanishingPoint {
        if self.shift >= d {
            return VanishingPoint::AtInfinity;
        }
        let (cols, rows) = (cols as f64, rows as f64);
        let (d, x, s) = (d as f64, self.x as f64, self.shift as f64);
        let (cx, cy) = (0.5 * cols, 0.5 * rows);
        VanishingPoint::Finite {
            x: x * cols / (d - s) - cx,
            y: cy - d * rows / (d - s),
        }
    }

    /// Slope/height form of the vanishing point, or `None` at infinity.
    pub fn slope_height(&self, d: u32) -> Option<SlopeHeight> {
        if self.shift >= d {
            return None;
        }
        let (d, x, s) = (d as f64, self.x as f64, self.shift as f64);
        Some(SlopeHeight {
            slope: (x - (d - s) / 2.0) / d,
            height: d / (d - s),
        })
    }
}

/// Location of the largest cell; ties go to the first in row-major order.
pub fn find_peak(accum: &IPix) -> Peak {
    let (value, x, shift) = accum.max_loc();
    Peak { x, shift, value }
}

/// Every intermediate of [`locate`]
#[derive(Debug, Clone)]
pub struct HoughStages {
    /// Two-sided accumulator of the edge map
    pub accumulator: IPix,
    /// Emphasized accumulator
    pub emphasis: FPix,
    /// Emphasis stretched to `0..=255`
    pub search_map: IPix,
    /// Second-pass accumulator
    pub search: IPix,
    /// Its maximum
    pub peak: Peak,
}

/// Locate the dominant pencil of lines in a square edge map.
///
/// The map must be 8 or 16 bpp, square, with a power-of-two side `d`.
pub fn locate(edge_map: &Pix, method: EmphasisMethod) -> HoughResult<HoughStages> {
    let (w, h) = (edge_map.width(), edge_map.height());
    if w != h {
        return Err(HoughError::InvalidInput(format!(
            "edge map must be square, got {w}x{h}"
        )));
    }
    if !h.is_power_of_two() {
        return Err(HoughError::NotPowerOfTwo { height: h });
    }

    let accumulator = double_fht(&IPix::from_pix(edge_map)?)?;
    let emphasis = emphasize(&accumulator, method);
    let search_map = normalize_for_search(&emphasis);
    let search = fht(&search_map)?;
    let peak = find_peak(&search);

    log::debug!(
        "{} emphasis: peak at x = {}, shift = {} (value {})",
        method.name(),
        peak.x,
        peak.shift,
        peak.value
    );
    Ok(HoughStages {
        accumulator,
        emphasis,
        search_map,
        search,
        peak,
    })
}
