//! Run configuration

use crate::{RectifyError, RectifyResult};
use keystone_filter::PreprocessOptions;
use keystone_hough::EmphasisMethod;
use keystone_transform::{Interpolation, ProjectiveFill};
use std::path::PathBuf;

/// How the homography is derived from the vanishing point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectifyModel {
    /// Pinhole camera tilted about the horizontal axis and rolled about the
    /// optical axis
    #[default]
    Camera,
    /// Shear plus a single perspective row, with the bottom edge held fixed
    Shear,
}

impl RectifyModel {
    /// Name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            RectifyModel::Camera => "camera",
            RectifyModel::Shear => "shear",
        }
    }
}

/// Options for [`Rectifier`](crate::Rectifier)
#[derive(Debug, Clone, PartialEq)]
pub struct RectifyOptions {
    /// Side of the square working map (default: 512)
    /// Must be a power of two between 16 and 4096
    pub working_size: u32,

    /// Accumulator emphasis before the second pass (default: gradient)
    pub emphasis: EmphasisMethod,

    /// Homography model (default: camera)
    pub model: RectifyModel,

    /// Edge-map preparation
    pub preprocess: PreprocessOptions,

    /// Value of output pixels with no source (default: black)
    pub fill: ProjectiveFill,

    /// Warp sampling (default: bilinear)
    pub interpolation: Interpolation,

    /// Largest allowed ratio of output to input size, per dimension
    /// (default: 8.0)
    pub max_canvas_scale: f64,

    /// Emit intermediate images to the debug sink (default: false)
    pub debug: bool,

    /// Directory for debug images written by [`rectify_file`](crate::rectify_file)
    /// (default: current directory)
    pub debug_dir: PathBuf,
}

impl Default for RectifyOptions {
    fn default() -> Self {
        Self {
            working_size: 512,
            emphasis: EmphasisMethod::Gradient,
            model: RectifyModel::Camera,
            preprocess: PreprocessOptions::default(),
            fill: ProjectiveFill::Black,
            interpolation: Interpolation::Linear,
            max_canvas_scale: 8.0,
            debug: false,
            debug_dir: PathBuf::from("."),
        }
    }
}

impl RectifyOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for edge-detected maps: Canny 50/150 followed by row-variance
    /// emphasis.
    pub fn variance() -> Self {
        Self {
            emphasis: EmphasisMethod::RowVariance,
            preprocess: PreprocessOptions::default().with_edges(50.0, 150.0),
            ..Self::default()
        }
    }

    /// Set the working resolution
    pub fn with_working_size(mut self, size: u32) -> Self {
        self.working_size = size;
        self
    }

    /// Set the emphasis method
    pub fn with_emphasis(mut self, emphasis: EmphasisMethod) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Set the homography model
    pub fn with_model(mut self, model: RectifyModel) -> Self {
        self.model = model;
        self
    }

    /// Set the preprocessing options
    pub fn with_preprocess(mut self, preprocess: PreprocessOptions) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Set the warp fill
    pub fn with_fill(mut self, fill: ProjectiveFill) -> Self {
        self.fill = fill;
        self
    }

    /// Set the warp interpolation
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the largest output/input size ratio
    pub fn with_max_canvas_scale(mut self, scale: f64) -> Self {
        self.max_canvas_scale = scale;
        self
    }

    /// Enable or disable debug images
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the debug image directory
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = dir.into();
        self
    }

    /// Validate options
    pub fn validate(&self) -> RectifyResult<()> {
        if !self.working_size.is_power_of_two() || !(16..=4096).contains(&self.working_size) {
            return Err(RectifyError::InvalidParameter(format!(
                "working_size must be a power of two in 16..=4096, got {}",
                self.working_size
            )));
        }
        if !(self.max_canvas_scale.is_finite() && self.max_canvas_scale >= 1.0) {
            return Err(RectifyError::InvalidParameter(format!(
                "max_canvas_scale must be at least 1, got {}",
                self.max_canvas_scale
            )));
        }
        self.preprocess.validate()?;
        Ok(())
    }
}
