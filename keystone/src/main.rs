//! keystone - straighten a photographed document
//!
//! # Usage
//!
//! ```bash
//! # Rectify with the default camera model
//! keystone page.jpg flat.png
//!
//! # Dump intermediate images to ./debug and log every stage
//! keystone -d --debug-dir debug page.jpg flat.png
//!
//! # Canny edges, row-variance emphasis, shear model
//! keystone --edges --emphasis variance --model shear page.jpg flat.jpg
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use keystone::hough::EmphasisMethod;
use keystone::rectify::{RectifyModel, RectifyOptions, rectify_file};
use std::path::PathBuf;

/// Accumulator emphasis before the second Hough pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emphasis {
    /// Sobel gradient magnitude
    Gradient,
    /// Squared deviation from the row mean
    Variance,
}

/// Homography model
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Model {
    /// Pinhole camera tilted and rolled
    Camera,
    /// Shear plus perspective row, bottom edge fixed
    Shear,
}

/// Remove the perspective skew of a photographed document
#[derive(Parser, Debug)]
#[command(name = "keystone")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image (PNG, JPEG or PNM)
    input: PathBuf,

    /// Output image; the format follows the extension
    output: PathBuf,

    /// Write intermediate images and log every stage
    #[arg(short, long)]
    debug: bool,

    /// Directory for intermediate images
    #[arg(long, default_value = ".")]
    debug_dir: PathBuf,

    /// Working resolution (power of two)
    #[arg(long, default_value = "512")]
    size: u32,

    /// Accumulator emphasis
    #[arg(long, value_enum, default_value = "gradient")]
    emphasis: Emphasis,

    /// Homography model
    #[arg(long, value_enum, default_value = "camera")]
    model: Model,

    /// Run Canny (50/150) on the working map
    #[arg(long)]
    edges: bool,
}

impl Args {
    fn options(&self) -> RectifyOptions {
        let base = if self.edges {
            RectifyOptions::variance()
        } else {
            RectifyOptions::new()
        };
        base.with_working_size(self.size)
            .with_emphasis(match self.emphasis {
                Emphasis::Gradient => EmphasisMethod::Gradient,
                Emphasis::Variance => EmphasisMethod::RowVariance,
            })
            .with_model(match self.model {
                Model::Camera => RectifyModel::Camera,
                Model::Shear => RectifyModel::Shear,
            })
            .with_debug(self.debug)
            .with_debug_dir(&self.debug_dir)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if args.debug {
        std::fs::create_dir_all(&args.debug_dir).with_context(|| {
            format!("Failed to create debug directory: {}", args.debug_dir.display())
        })?;
    }

    let rect = rectify_file(&args.input, &args.output, &args.options()).with_context(|| {
        format!(
            "Failed to rectify {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    log::info!(
        "wrote {} ({}x{})",
        args.output.display(),
        rect.width,
        rect.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["keystone", "in.jpg", "out.png"]);
        let opts = args.options();
        assert_eq!(opts, RectifyOptions::new());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from([
            "keystone",
            "-d",
            "--debug-dir",
            "dbg",
            "--size",
            "256",
            "--emphasis",
            "variance",
            "--model",
            "shear",
            "--edges",
            "in.jpg",
            "out.png",
        ]);
        let opts = args.options();
        assert!(opts.debug);
        assert_eq!(opts.debug_dir, PathBuf::from("dbg"));
        assert_eq!(opts.working_size, 256);
        assert_eq!(opts.emphasis, EmphasisMethod::RowVariance);
        assert_eq!(opts.model, RectifyModel::Shear);
        assert_eq!(opts.preprocess.edges, Some((50.0, 150.0)));
    }

    #[test]
    fn test_args_require_two_paths() {
        assert!(Args::try_parse_from(["keystone", "in.jpg"]).is_err());
        assert!(Args::try_parse_from(["keystone", "a", "b", "c"]).is_err());
        assert!(Args::try_parse_from(["keystone", "--model", "affine", "a", "b"]).is_err());
    }
}
