//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale decodes to 8 bpp (16 bpp for lossless 16-bit
//! streams); RGB and CMYK decode to 32 bpp RGB.

use crate::{IoError, IoResult};
use keystone_core::{Pix, PixelDepth, color};
use jpeg_decoder::PixelFormat;
use std::io::{Read, Write};

/// Default quality used when writing JPEG output.
pub const DEFAULT_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {e}")))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let (width, height) = (info.width as u32, info.height as u32);
    let (depth, bytes_per_pixel) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, 1),
        PixelFormat::L16 => (PixelDepth::Bit16, 2),
        PixelFormat::RGB24 => (PixelDepth::Bit32, 3),
        PixelFormat::CMYK32 => (PixelDepth::Bit32, 4),
    };

    let expected = width as usize * height as usize * bytes_per_pixel;
    if pixels.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG produced {} bytes, expected {expected}",
            pixels.len()
        )));
    }

    let mut pix_mut = Pix::new(width, height, depth)?.to_mut();
    for (i, px) in pixels[..expected].chunks_exact(bytes_per_pixel).enumerate() {
        let (x, y) = ((i % width as usize) as u32, (i / width as usize) as u32);
        let val = match info.pixel_format {
            PixelFormat::L8 => px[0] as u32,
            PixelFormat::L16 => u16::from_be_bytes([px[0], px[1]]) as u32,
            PixelFormat::RGB24 => color::compose_rgb(px[0], px[1], px[2]),
            PixelFormat::CMYK32 => {
                // Adobe CMYK JPEGs store inverted ink values
                let k = px[3] as u32;
                let ch = |c: u8| ((c as u32 * k + 127) / 255) as u8;
                color::compose_rgb(ch(px[0]), ch(px[1]), ch(px[2]))
            }
        };
        pix_mut.set_pixel_unchecked(x, y, val);
    }
    Ok(pix_mut.into())
}

/// Write a JPEG image to a writer.
///
/// 8 bpp images are written as single-channel luma; 16 bpp images keep
/// their most significant byte; 32 bpp images are written as RGB.
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "{width}x{height} exceeds the JPEG size limit"
            )));
        }
    };

    let (color_type, data) = match pix.depth() {
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity(width as usize * height as usize * 3);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b]);
                }
            }
            (jpeg_encoder::ColorType::Rgb, data)
        }
        _ => {
            let gray = pix.convert_to_8()?;
            let mut data = Vec::with_capacity(width as usize * height as usize);
            for y in 0..height {
                for x in 0..width {
                    data.push(gray.get_pixel_unchecked(x, y) as u8);
                }
            }
            (jpeg_encoder::ColorType::Luma, data)
        }
    };

    let encoder = jpeg_encoder::Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(&data, w16, h16, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {e}")))
}
