//! Edge-map preparation
//!
//! Chains the filters that turn a photographed page into the square binary
//! map the Hough stages search: grayscale, optional blur, adaptive
//! threshold, resize to the working resolution, optional Canny.

use crate::convolve::{convert_to_gray, gaussian_blur};
use crate::edge::canny;
use crate::threshold::adaptive_threshold;
use crate::{FilterError, FilterResult};
use keystone_core::Pix;
use keystone_transform::scale_to_size;

/// Preprocessing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    /// Adaptive-threshold Gaussian block size (odd, >= 3)
    pub threshold_block: u32,
    /// Constant subtracted from the local mean
    pub threshold_offset: f32,
    /// Value written for pixels above the local threshold
    pub threshold_maxval: u8,
    /// Gaussian pre-blur sigma, if any
    pub blur_sigma: Option<f32>,
    /// Canny `(low, high)` thresholds run on the resized map, if any
    pub edges: Option<(f64, f64)>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            threshold_block: 15,
            threshold_offset: 2.0,
            threshold_maxval: 127,
            blur_sigma: None,
            edges: None,
        }
    }
}

impl PreprocessOptions {
    /// Set the adaptive-threshold block size
    pub fn with_threshold_block(mut self, block: u32) -> Self {
        self.threshold_block = block;
        self
    }

    /// Set the adaptive-threshold offset
    pub fn with_threshold_offset(mut self, offset: f32) -> Self {
        self.threshold_offset = offset;
        self
    }

    /// Set the foreground value of the threshold
    pub fn with_threshold_maxval(mut self, maxval: u8) -> Self {
        self.threshold_maxval = maxval;
        self
    }

    /// Blur with the given sigma before thresholding
    pub fn with_blur(mut self, sigma: f32) -> Self {
        self.blur_sigma = Some(sigma);
        self
    }

    /// Run Canny on the resized map
    pub fn with_edges(mut self, low: f64, high: f64) -> Self {
        self.edges = Some((low, high));
        self
    }

    /// Validate the options
    pub fn validate(&self) -> FilterResult<()> {
        if self.threshold_block < 3 || self.threshold_block % 2 == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "threshold block must be odd and >= 3, got {}",
                self.threshold_block
            )));
        }
        if !self.threshold_offset.is_finite() {
            return Err(FilterError::InvalidParameters(
                "threshold offset must be finite".to_string(),
            ));
        }
        if let Some(sigma) = self.blur_sigma
            && !(sigma.is_finite() && sigma > 0.0)
        {
            return Err(FilterError::InvalidParameters(format!(
                "blur sigma must be positive, got {sigma}"
            )));
        }
        if let Some((low, high)) = self.edges
            && !(low.is_finite() && high.is_finite() && low >= 0.0 && high >= 0.0)
        {
            return Err(FilterError::InvalidParameters(format!(
                "Canny thresholds must be non-negative, got ({low}, {high})"
            )));
        }
        Ok(())
    }
}

/// Every intermediate image of [`preprocess`]
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// 8 bpp grayscale source, full resolution
    pub gray: Pix,
    /// Adaptive-threshold output, full resolution
    pub bw: Pix,
    /// Thresholded map resized to `d x d`
    pub resized: Pix,
    /// Canny output on the resized map, when enabled
    pub edges: Option<Pix>,
}

impl Preprocessed {
    /// The map handed to the Hough stages.
    pub fn edge_map(&self) -> &Pix {
        self.edges.as_ref().unwrap_or(&self.resized)
    }
}

/// Kernel size for a blur of the given sigma (about three sigma each side).
fn blur_size(sigma: f32) -> u32 {
    ((sigma * 6.0 + 1.0).round() as u32) | 1
}

/// Prepare the `d x d` edge map of `pix`.
///
/// Grayscale, optional Gaussian blur, adaptive threshold, bilinear resize
/// to `d x d`, optional Canny.
pub fn preprocess(pix: &Pix, options: &PreprocessOptions, d: u32) -> FilterResult<Preprocessed> {
    options.validate()?;

    let gray = convert_to_gray(pix)?;
    let source = match options.blur_sigma {
        Some(sigma) => gaussian_blur(&gray, blur_size(sigma), sigma)?,
        None => gray.clone(),
    };
    let bw = adaptive_threshold(
        &source,
        options.threshold_block,
        options.threshold_offset,
        options.threshold_maxval,
    )?;
    let resized = scale_to_size(&bw, d, d)?;
    let edges = match options.edges {
        Some((low, high)) => Some(canny(&resized, low, high)?),
        None => None,
    };

    log::debug!(
        "preprocessed {}x{} -> {d}x{d} edge map (canny: {})",
        pix.width(),
        pix.height(),
        edges.is_some()
    );
    Ok(Preprocessed {
        gray,
        bw,
        resized,
        edges,
    })
}
