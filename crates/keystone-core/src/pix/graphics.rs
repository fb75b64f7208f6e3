//! Graphics rendering functions
//!
//! Just enough drawing for the diagnostic overlays: wide straight lines
//! and circle outlines, in a flat color.

use super::{PixMut, PixelDepth};
use crate::pta::Pta;

/// RGB color for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White color
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Green color
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };

    /// Convert to grayscale value (0-255)
    pub fn to_gray(&self) -> u8 {
        crate::color::luma(self.r, self.g, self.b)
    }

    /// Compose as 32-bit RGBA pixel
    pub fn to_pixel32(&self) -> u32 {
        crate::color::compose_rgb(self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// =============================================================================
// Point array generation helpers
// =============================================================================

/// Generate a point array for a line using Bresenham's integer algorithm.
///
/// The line connects `(x1, y1)` to `(x2, y2)` with 8-connectivity.
pub fn generate_line_pta(x1: i32, y1: i32, x2: i32, y2: i32) -> Pta {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1i32 } else { -1 };
    let sy = if y2 > y1 { 1i32 } else { -1 };

    let npts = dx.max(dy) + 1;
    let mut pta = Pta::with_capacity(npts as usize);
    let (mut x, mut y) = (x1, y1);

    if dx >= dy {
        let mut err = dx / 2;
        for _ in 0..npts {
            pta.push(x as f64, y as f64);
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2;
        for _ in 0..npts {
            pta.push(x as f64, y as f64);
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    pta
}

/// Generate a point array for a line with specified width.
///
/// For width > 1, parallel lines are added alternately on both sides,
/// offset across the minor axis of the line.
pub fn generate_wide_line_pta(x1: i32, y1: i32, x2: i32, y2: i32, width: u32) -> Pta {
    let mut result = generate_line_pta(x1, y1, x2, y2);
    let is_horizontal = (x2 - x1).abs() > (y2 - y1).abs();

    for i in 1..width.max(1) {
        let offset = (i + 1).div_ceil(2) as i32 * if i % 2 == 1 { -1 } else { 1 };
        let parallel = if is_horizontal {
            generate_line_pta(x1, y1 + offset, x2, y2 + offset)
        } else {
            generate_line_pta(x1 + offset, y1, x2 + offset, y2)
        };
        result.extend(&parallel);
    }

    result
}

/// Generate a point array for a circle outline of the given stroke width.
pub fn generate_circle_outline_pta(cx: i32, cy: i32, radius: u32, width: u32) -> Pta {
    let width = width.max(1) as f64;
    let r_outer = radius as f64 + width / 2.0;
    let r_inner = (radius as f64 - width / 2.0).max(0.0);
    let (outer_sq, inner_sq) = (r_outer * r_outer, r_inner * r_inner);

    let extent = r_outer.ceil() as i32;
    let mut pta = Pta::new();
    for dy in -extent..=extent {
        for dx in -extent..=extent {
            let dist_sq = (dx * dx + dy * dy) as f64;
            if dist_sq <= outer_sq && dist_sq >= inner_sq {
                pta.push((cx + dx) as f64, (cy + dy) as f64);
            }
        }
    }
    pta
}

/// Clip the segment `p0 -> p1` to the rectangle `[xmin, xmax] x [ymin, ymax]`
/// (Liang-Barsky). Returns `None` when the segment misses the rectangle.
pub fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    (xmin, ymin, xmax, ymax): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, p0.0 - xmin),
        (dx, xmax - p0.0),
        (-dy, p0.1 - ymin),
        (dy, ymax - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ))
}

// =============================================================================
// Rendering
// =============================================================================

impl PixMut {
    /// Render every in-bounds point of `pta` with `color`.
    ///
    /// Gray images receive the color's luma.
    pub fn render_pta_color(&mut self, pta: &Pta, color: Color) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let pixel_val = match self.depth() {
            PixelDepth::Bit8 => color.to_gray() as u32,
            PixelDepth::Bit16 => {
                let g = color.to_gray() as u32;
                (g << 8) | g
            }
            PixelDepth::Bit32 => color.to_pixel32(),
        };

        for (x, y) in pta.iter() {
            let (xi, yi) = (x.round() as i64, y.round() as i64);
            if xi < 0 || xi >= w || yi < 0 || yi >= h {
                continue;
            }
            self.set_pixel_unchecked(xi as u32, yi as u32, pixel_val);
        }
    }

    /// Render a wide line with a specific color.
    ///
    /// Endpoints may lie far outside the image (a vanishing point usually
    /// does); the segment is clipped to a margin around the image first.
    pub fn render_line_color(
        &mut self,
        p0: (f64, f64),
        p1: (f64, f64),
        width: u32,
        color: Color,
    ) {
        let margin = width as f64 + 1.0;
        let rect = (
            -margin,
            -margin,
            self.width() as f64 + margin,
            self.height() as f64 + margin,
        );
        if let Some((a, b)) = clip_segment(p0, p1, rect) {
            let pta = generate_wide_line_pta(
                a.0.round() as i32,
                a.1.round() as i32,
                b.0.round() as i32,
                b.1.round() as i32,
                width,
            );
            self.render_pta_color(&pta, color);
        }
    }

    /// Render a circle outline with a specific color.
    pub fn render_circle_color(&mut self, cx: i32, cy: i32, radius: u32, width: u32, color: Color) {
        let pta = generate_circle_outline_pta(cx, cy, radius, width);
        self.render_pta_color(&pta, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::Pix;

    #[test]
    fn test_line_endpoints_included() {
        let pta = generate_line_pta(0, 0, 5, 2);
        assert_eq!(pta.len(), 6);
        assert_eq!(pta.get(0), Some((0.0, 0.0)));
        assert_eq!(pta.get(5), Some((5.0, 2.0)));
    }

    #[test]
    fn test_wide_line_point_count() {
        let pta = generate_wide_line_pta(0, 5, 9, 5, 3);
        assert_eq!(pta.len(), 30);
    }

    #[test]
    fn test_clip_segment() {
        let rect = (0.0, 0.0, 10.0, 10.0);
        let (a, b) = clip_segment((-10.0, 5.0), (20.0, 5.0), rect).unwrap();
        assert!((a.0 - 0.0).abs() < 1e-9 && (a.1 - 5.0).abs() < 1e-9);
        assert!((b.0 - 10.0).abs() < 1e-9 && (b.1 - 5.0).abs() < 1e-9);
        assert!(clip_segment((-5.0, -5.0), (-1.0, 20.0), rect).is_none());
    }

    #[test]
    fn test_render_far_line_is_clipped() {
        let mut pm = Pix::new(20, 20, PixelDepth::Bit32).unwrap().to_mut();
        pm.render_line_color((10.0, 19.0), (10.0, -1.0e7), 1, Color::GREEN);
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(10, 0), Some((0, 255, 0)));
        assert_eq!(pix.get_rgb(10, 19), Some((0, 255, 0)));
        assert_eq!(pix.get_rgb(9, 10), Some((0, 0, 0)));
    }

    #[test]
    fn test_render_circle_on_gray() {
        let mut pm = Pix::new(21, 21, PixelDepth::Bit8).unwrap().to_mut();
        pm.render_circle_color(10, 10, 5, 1, Color::WHITE);
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(15, 10), Some(255));
        assert_eq!(pix.get_pixel(10, 10), Some(0));
    }
}
