//! keystone-io - Image I/O
//!
//! Reads and writes the raster formats the rectifier accepts:
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG | gray 8/16, gray+alpha, RGB, RGBA, palette | gray 8/16, RGB, RGBA | `png-format` |
//! | JPEG | gray, RGB, CMYK | gray, RGB | `jpeg` |
//! | PNM | binary P5 / P6 | binary P5 / P6 | `pnm` |
//!
//! Input formats are detected from magic numbers; output formats are
//! chosen explicitly or from the output file's extension.

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes, format_from_path};
pub use keystone_core::ImageFormat;

use keystone_core::Pix;
use log::debug;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Read an image from a file, detecting the format from its contents.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let pix = read_image_mem(&bytes)?;
    debug!(
        "read {} ({}x{}, {} bpp)",
        path.display(),
        pix.width(),
        pix.height(),
        pix.depth().bits()
    );
    Ok(pix)
}

/// Decode an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    let pix = match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data))?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data))?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(data))?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{other:?} support is not enabled"
            )));
        }
    };

    let mut pix_mut = pix.to_mut();
    pix_mut.set_informat(format);
    Ok(pix_mut.into())
}

/// Encode an image into memory.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, &mut buf)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, &mut buf, jpeg::DEFAULT_QUALITY)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, &mut buf)?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {other:?}"
            )));
        }
    }
    Ok(buf)
}

/// Write an image to a file in the given format.
///
/// The image is fully encoded before the file is created, so an encoding
/// failure never leaves a partial file behind.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let bytes = write_image_mem(pix, format)?;
    fs::write(path, &bytes)?;
    debug!("wrote {} ({} bytes, {format:?})", path.display(), bytes.len());
    Ok(())
}

/// Write an image, choosing the format from the path's extension.
pub fn write_image_auto<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let format = format_from_path(&path)?;
    write_image(pix, path, format)
}
