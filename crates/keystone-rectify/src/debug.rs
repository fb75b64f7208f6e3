//! Debug artifacts
//!
//! The pipeline hands each named intermediate image to a [`DebugSink`].
//! Artifacts are best-effort: a sink never fails the run.

use keystone_core::{Color, IPix, Pix};
use keystone_hough::{Peak, VanishingPoint};
use keystone_io::{ImageFormat, write_image};
use std::path::PathBuf;

/// Receiver of intermediate images
pub trait DebugSink {
    /// Take the artifact `name`.
    fn emit(&mut self, name: &str, pix: &Pix);
}

/// Emit an artifact that may have failed to build; failures are logged
/// and skipped.
pub fn emit_built<E: std::fmt::Display>(
    sink: &mut dyn DebugSink,
    name: &str,
    built: Result<Pix, E>,
) {
    match built {
        Ok(pix) => sink.emit(name, &pix),
        Err(e) => log::warn!("cannot build debug image {name}: {e}"),
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn emit(&mut self, _name: &str, _pix: &Pix) {}
}

/// Sink writing `<dir>/<name>.png`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Write artifacts into `dir`, which must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the artifact `name` is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", ImageFormat::Png.extension()))
    }
}

impl DebugSink for DirectorySink {
    fn emit(&mut self, name: &str, pix: &Pix) {
        let path = self.path_for(name);
        match write_image(pix, &path, ImageFormat::Png) {
            Ok(()) => log::debug!("wrote {}", path.display()),
            Err(e) => log::warn!("cannot write debug image {}: {e}", path.display()),
        }
    }
}

/// Sink keeping every artifact in memory, in emission order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Artifacts received so far
    pub images: Vec<(String, Pix)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Names received so far
    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Most recent artifact called `name`
    pub fn get(&self, name: &str) -> Option<&Pix> {
        self.images
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }
}

impl DebugSink for MemorySink {
    fn emit(&mut self, name: &str, pix: &Pix) {
        self.images.push((name.to_string(), pix.clone()));
    }
}

const MARK_RADIUS: u32 = 15;
const MARK_WIDTH: u32 = 3;

/// Second-pass accumulator stretched to 8 bits, in color, with the peak
/// circled.
pub fn peak_overlay(search: &IPix, peak: &Peak) -> keystone_core::Result<Pix> {
    let mut out = search.normalize_to_pix()?.convert_to_32()?.to_mut();
    out.render_circle_color(
        peak.x as i32,
        peak.shift as i32,
        MARK_RADIUS,
        MARK_WIDTH,
        Color::GREEN,
    );
    Ok(out.into())
}

/// Source image with the lines from both bottom corners to the vanishing
/// point, and the two ends of the peak line marked on the top edge.
pub fn vanishing_overlay(
    src: &Pix,
    peak: &Peak,
    vp: VanishingPoint,
    d: u32,
) -> keystone_core::Result<Pix> {
    let (cols, rows) = (src.width(), src.height());
    let mut out = src.convert_to_32()?.to_mut();

    if let Some((vx, vy)) = vp.finite() {
        let target = (vx + 0.5 * cols as f64, vy + 0.5 * rows as f64);
        for corner in [(0.0, rows as f64), (cols as f64, rows as f64)] {
            out.render_line_color(corner, target, MARK_WIDTH, Color::GREEN);
        }
    }

    let (cols64, d64) = (cols as u64, d as u64);
    for top in [peak.x as u64, (peak.x + peak.shift) as u64] {
        let x = (top * cols64 / d64) as i32;
        out.render_circle_color(x, 0, MARK_RADIUS, MARK_WIDTH, Color::GREEN);
    }
    Ok(out.into())
}
