//! Vanishing point to rectifying homography
//!
//! Two models turn the detected vanishing point into a homography that
//! sends it to infinity straight up, making the rulings vertical:
//!
//! - [`camera_rectification`] treats the photo as taken by a pinhole camera
//!   with its principal point at the image centre, rolled about the optical
//!   axis by `tilt_angle` and tilted back about the horizontal axis by
//!   `tilt_from_vertical`. Undoing both gives `A = K Rx(a) Rz(t) K^-1`.
//! - [`shear_rectification`] moves the origin to the bottom centre, shears
//!   the vanishing point onto the vertical axis and adds one perspective
//!   row that pushes it to infinity. The bottom edge stays where it is.
//!
//! Either way the transformed corners are boxed and the box's top-left
//! corner is translated to the origin.

use crate::{RectifyError, RectifyResult};
use keystone_core::{Box, Matrix3, Pta};
use keystone_hough::{SlopeHeight, VanishingPoint};

/// Camera parameters recovered by [`camera_rectification`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Roll about the optical axis that brings the vanishing point onto the
    /// vertical axis (radians)
    pub tilt_angle: f64,
    /// Focal length in source pixels
    pub focal_length: f64,
    /// Tilt of the page plane away from the image plane (radians)
    pub tilt_from_vertical: f64,
}

/// A rectifying warp and its output canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Rectification {
    /// Camera parameters, for the camera model
    pub pose: Option<CameraPose>,
    /// Homography in source coordinates
    pub homography: Matrix3,
    /// Box enclosing the transformed image
    pub bounds: Box,
    /// `translation(-bounds.x, -bounds.y) * homography`
    pub matrix: Matrix3,
    /// Output width
    pub width: u32,
    /// Output height
    pub height: u32,
}

impl Rectification {
    /// Pass-through of a `cols x rows` image.
    pub fn identity(cols: u32, rows: u32) -> Self {
        Self {
            pose: None,
            homography: Matrix3::identity(),
            bounds: Box::new_unchecked(0, 0, cols as i32, rows as i32),
            matrix: Matrix3::identity(),
            width: cols,
            height: rows,
        }
    }

    /// Whether this rectification leaves the image unchanged
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }
}

fn invalid(msg: impl Into<String>) -> RectifyError {
    RectifyError::InvalidGeometry(msg.into())
}

/// Box `points` (already transformed) and build the final warp.
fn fit_canvas(
    homography: Matrix3,
    points: &Pta,
    cols: u32,
    rows: u32,
    max_scale: f64,
    pose: Option<CameraPose>,
) -> RectifyResult<Rectification> {
    let (mut xmin, mut xmax) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut ymin, mut ymax) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in points.iter() {
        xmin = xmin.min(x);
        xmax = xmax.max(x);
        ymin = ymin.min(y);
        ymax = ymax.max(y);
    }
    let (span_x, span_y) = (xmax - xmin, ymax - ymin);
    if !(span_x.is_finite() && span_y.is_finite()) {
        return Err(invalid("transformed corners are not finite"));
    }
    if span_x > max_scale * cols as f64 || span_y > max_scale * rows as f64 {
        return Err(invalid(format!(
            "output canvas {span_x:.0}x{span_y:.0} exceeds {max_scale} times the {cols}x{rows} input"
        )));
    }

    let bounds = points
        .bounding_box()
        .ok_or_else(|| invalid("no corners to bound"))?;
    if bounds.is_empty() {
        return Err(invalid(format!(
            "empty output canvas {}x{}",
            bounds.w, bounds.h
        )));
    }

    let matrix = Matrix3::translation(-bounds.x as f64, -bounds.y as f64) * homography;
    Ok(Rectification {
        pose,
        homography,
        bounds,
        matrix,
        width: bounds.w as u32,
        height: bounds.h as u32,
    })
}

fn transform_corners(points: &Pta, homography: &Matrix3) -> RectifyResult<Pta> {
    points
        .transform(homography)
        .map_err(|e| invalid(format!("corner maps onto or behind the horizon: {e}")))
}

/// Camera-model rectification of a `cols x rows` image whose vanishing
/// point is `vp` (relative to the image centre).
///
/// # Errors
///
/// [`RectifyError::InvalidGeometry`] when the vanishing point is at
/// infinity, not above the centre, yields no real camera, sends a corner
/// past the horizon, or needs a canvas more than `max_scale` times the
/// input.
pub fn camera_rectification(
    vp: VanishingPoint,
    cols: u32,
    rows: u32,
    max_scale: f64,
) -> RectifyResult<Rectification> {
    let (vx, vy) = vp
        .finite()
        .ok_or_else(|| invalid("vanishing point at infinity"))?;
    if !(vy < 0.0) || !vx.is_finite() {
        return Err(invalid(format!(
            "vanishing point ({vx:.1}, {vy:.1}) is not above the image centre"
        )));
    }
    let (cx, cy) = (0.5 * cols as f64, 0.5 * rows as f64);

    let tilt_angle = (-vx).atan2(-vy);
    let arg = -cy * tilt_angle.cos() / vy;
    if !(arg > 0.0 && arg.is_finite()) {
        return Err(invalid(format!("no camera for tan^2 = {arg}")));
    }
    let ta = arg.sqrt();
    let focal_length = cy / ta;
    let tilt_from_vertical = ta.atan();

    let camera = Matrix3::camera(focal_length, cx, cy);
    let homography = &(&(&camera * &Matrix3::rotation_x(tilt_from_vertical))
        * &Matrix3::rotation_z(tilt_angle))
        * &camera.inverse()?;

    log::debug!(
        "camera model: tilt {:.2} deg, f = {focal_length:.1}, tilt from vertical {:.2} deg",
        tilt_angle.to_degrees(),
        tilt_from_vertical.to_degrees()
    );

    let corners = transform_corners(&Pta::corners(cols as f64, rows as f64), &homography)?;
    fit_canvas(
        homography,
        &corners,
        cols,
        rows,
        max_scale,
        Some(CameraPose {
            tilt_angle,
            focal_length,
            tilt_from_vertical,
        }),
    )
}

/// Shear-model rectification of a `cols x rows` image from the slope/height
/// form of its vanishing point.
///
/// # Errors
///
/// [`RectifyError::InvalidGeometry`] when the vanishing point is not above
/// the top edge (`height <= 1`) or the canvas would exceed `max_scale`.
pub fn shear_rectification(
    sh: SlopeHeight,
    cols: u32,
    rows: u32,
    max_scale: f64,
) -> RectifyResult<Rectification> {
    if !(sh.height > 1.0 && sh.height.is_finite() && sh.slope.is_finite()) {
        return Err(invalid(format!(
            "vanishing point height {} is not above the top edge",
            sh.height
        )));
    }
    let (w, h) = (cols as f64, rows as f64);

    // Origin at the bottom centre, y up
    let to_base = Matrix3::new([[1.0, 0.0, -0.5 * w], [0.0, -1.0, h], [0.0, 0.0, 1.0]]);
    let shear = Matrix3::new([[1.0, -sh.slope * w / h, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    let horizon = Matrix3::new([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0 / (sh.height * h), 1.0],
    ]);
    let homography = &(&(&to_base.inverse()? * &horizon) * &shear) * &to_base;

    log::debug!(
        "shear model: slope {:.4}, height {:.3}",
        sh.slope,
        sh.height
    );

    // Only the top edge moves
    let top = Pta::from_iter([(0.0, 0.0), (w, 0.0)]);
    let mut points = transform_corners(&top, &homography)?;
    points.push(0.0, h);
    points.push(w, h);
    fit_canvas(homography, &points, cols, rows, max_scale, None)
}
