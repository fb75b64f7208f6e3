//! End-to-end rectification
//!
//! ```text
//! source --preprocess--> d x d edge map --locate--> Peak
//!        --camera / shear model--> Rectification --projective--> output
//! ```

use crate::debug::{
    DebugSink, DirectorySink, NullSink, emit_built, peak_overlay, vanishing_overlay,
};
use crate::options::{RectifyModel, RectifyOptions};
use crate::perspective::{Rectification, camera_rectification, shear_rectification};
use crate::{RectifyError, RectifyResult};
use keystone_core::{Pix, PixelDepth};
use keystone_filter::preprocess;
use keystone_hough::{Peak, SlopeHeight, VanishingPoint, locate};
use keystone_io::{format_from_path, read_image, write_image_auto};
use keystone_transform::projective;
use std::path::Path;

/// What [`Rectifier::detect`] found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Maximum of the second-pass accumulator
    pub peak: Peak,
    /// Vanishing point relative to the source centre
    pub vanishing_point: VanishingPoint,
    /// Slope/height form of the same point, `None` at infinity
    pub slope_height: Option<SlopeHeight>,
}

/// Perspective rectifier
#[derive(Debug, Clone)]
pub struct Rectifier {
    options: RectifyOptions,
}

impl Rectifier {
    /// Create a rectifier.
    ///
    /// # Errors
    ///
    /// Returns [`RectifyError::InvalidParameter`] or
    /// [`RectifyError::Filter`] if `options` do not validate.
    pub fn new(options: RectifyOptions) -> RectifyResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options this rectifier runs with
    pub fn options(&self) -> &RectifyOptions {
        &self.options
    }

    /// Locate the vanishing point of `pix`.
    ///
    /// With `debug` set, every intermediate goes to `sink`.
    pub fn detect(&self, pix: &Pix, sink: &mut dyn DebugSink) -> RectifyResult<Detection> {
        let d = self.options.working_size;
        let prep = preprocess(pix, &self.options.preprocess, d)?;
        let stages = locate(prep.edge_map(), self.options.emphasis)?;

        let peak = stages.peak;
        let vanishing_point = peak.vanishing_point(pix.width(), pix.height(), d);
        let slope_height = peak.slope_height(d);
        match vanishing_point {
            VanishingPoint::Finite { x, y } => {
                log::debug!("vanishing point at ({x:.1}, {y:.1}) from the centre")
            }
            VanishingPoint::AtInfinity => log::debug!("vanishing point at infinity"),
        }

        if self.options.debug {
            sink.emit("gray", &prep.gray);
            sink.emit("bw", &prep.bw);
            sink.emit("resized", &prep.resized);
            if let Some(edges) = &prep.edges {
                sink.emit("edges", edges);
            }
            emit_built(sink, "hough1", stages.accumulator.normalize_to_pix());
            emit_built(sink, "emphasis", stages.emphasis.to_pix_normalized());
            emit_built(sink, "hough2", peak_overlay(&stages.search, &peak));
            emit_built(sink, "debug", vanishing_overlay(pix, &peak, vanishing_point, d));
        }

        Ok(Detection {
            peak,
            vanishing_point,
            slope_height,
        })
    }

    /// Rectification of a `cols x rows` image for `detection`.
    ///
    /// Degenerate geometry is not an error: it is logged and the identity
    /// is returned.
    pub fn rectification(&self, detection: &Detection, cols: u32, rows: u32) -> Rectification {
        let max_scale = self.options.max_canvas_scale;
        let result = match self.options.model {
            RectifyModel::Camera => {
                camera_rectification(detection.vanishing_point, cols, rows, max_scale)
            }
            RectifyModel::Shear => match detection.slope_height {
                Some(sh) => shear_rectification(sh, cols, rows, max_scale),
                None => Err(RectifyError::InvalidGeometry(
                    "vanishing point at infinity".to_string(),
                )),
            },
        };
        match result {
            Ok(r) => {
                log::info!(
                    "{} model: {cols}x{rows} -> {}x{}",
                    self.options.model.name(),
                    r.width,
                    r.height
                );
                r
            }
            Err(e) => {
                log::warn!("{e}; leaving the image unrectified");
                Rectification::identity(cols, rows)
            }
        }
    }

    /// Detect and undo the perspective of `pix`.
    pub fn rectify(
        &self,
        pix: &Pix,
        sink: &mut dyn DebugSink,
    ) -> RectifyResult<(Pix, Rectification)> {
        let detection = self.detect(pix, sink)?;
        let rect = self.rectification(&detection, pix.width(), pix.height());
        if rect.is_identity() {
            return Ok((pix.clone(), rect));
        }

        let warped = match pix.depth() {
            PixelDepth::Bit16 => self.warp(&pix.convert_to_8()?, &rect)?,
            _ => self.warp(pix, &rect)?,
        };
        Ok((warped, rect))
    }

    fn warp(&self, pix: &Pix, rect: &Rectification) -> RectifyResult<Pix> {
        Ok(projective(
            pix,
            &rect.matrix,
            rect.width,
            rect.height,
            self.options.interpolation,
            self.options.fill,
        )?)
    }
}

/// Rectify the image at `input` and write it to `output`.
///
/// The output format follows the extension of `output`, which is checked
/// before any work is done. Nothing is written when a step fails. With
/// `debug` set, intermediates go to `options.debug_dir`.
pub fn rectify_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &RectifyOptions,
) -> RectifyResult<Rectification> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let rectifier = Rectifier::new(options.clone())?;
    format_from_path(output)?;

    let pix = read_image(input)?;
    log::debug!(
        "read {} ({}x{}, {} bpp)",
        input.display(),
        pix.width(),
        pix.height(),
        pix.depth().bits()
    );

    let (out, rect) = if options.debug {
        rectifier.rectify(&pix, &mut DirectorySink::new(&options.debug_dir))?
    } else {
        rectifier.rectify(&pix, &mut NullSink)?
    };
    write_image_auto(&out, output)?;
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::MemorySink;

    fn blank(w: u32, h: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_all(200);
        pm.into()
    }

    #[test]
    fn test_new_validates() {
        assert!(Rectifier::new(RectifyOptions::new().with_working_size(100)).is_err());
        assert!(Rectifier::new(RectifyOptions::new()).is_ok());
    }

    #[test]
    fn test_degenerate_passes_through() {
        let rectifier = Rectifier::new(RectifyOptions::new()).unwrap();
        let detection = Detection {
            peak: Peak {
                x: 0,
                shift: 64,
                value: 0,
            },
            vanishing_point: VanishingPoint::AtInfinity,
            slope_height: None,
        };
        let r = rectifier.rectification(&detection, 120, 90);
        assert!(r.is_identity());
        assert_eq!((r.width, r.height), (120, 90));

        let shear = Rectifier::new(RectifyOptions::new().with_model(RectifyModel::Shear)).unwrap();
        assert!(shear.rectification(&detection, 120, 90).is_identity());
    }

    #[test]
    fn test_blank_image_unchanged() {
        // A featureless page has a flat accumulator; whatever peak comes
        // out, the output must be a valid image.
        let rectifier = Rectifier::new(RectifyOptions::new().with_working_size(64)).unwrap();
        let pix = blank(80, 60);
        let (out, rect) = rectifier.rectify(&pix, &mut NullSink).unwrap();
        assert_eq!((out.width(), out.height()), (rect.width, rect.height));
    }

    #[test]
    fn test_debug_artifacts() {
        let opts = RectifyOptions::variance()
            .with_working_size(64)
            .with_debug(true);
        let rectifier = Rectifier::new(opts).unwrap();
        let mut sink = MemorySink::new();
        rectifier.detect(&blank(80, 60), &mut sink).unwrap();
        assert_eq!(
            sink.names(),
            vec![
                "gray", "bw", "resized", "edges", "hough1", "emphasis", "hough2", "debug"
            ]
        );
        assert_eq!(sink.get("resized").unwrap().width(), 64);
        assert_eq!(sink.get("debug").unwrap().width(), 80);

        // Nothing without the flag
        let quiet = Rectifier::new(RectifyOptions::new().with_working_size(64)).unwrap();
        let mut sink = MemorySink::new();
        quiet.detect(&blank(80, 60), &mut sink).unwrap();
        assert!(sink.images.is_empty());
    }

    #[test]
    fn test_rectify_file_rejects_output_extension() {
        let err = rectify_file("/nonexistent/in.png", "/tmp/out.xyz", &RectifyOptions::new());
        assert!(matches!(err, Err(RectifyError::Io(_))));
    }
}
