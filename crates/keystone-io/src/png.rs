//! PNG image format support
//!
//! Palette and sub-byte grayscale images are expanded by the decoder, so
//! every PNG arrives as 8 or 16 bpp gray or 32 bpp RGB(A).

use crate::{IoError, IoResult};
use keystone_core::{Pix, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {e}")))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    let wide = bit_depth == BitDepth::Sixteen;

    let (pix_depth, spp) = match color_type {
        ColorType::Grayscale if wide => (PixelDepth::Bit16, 1),
        ColorType::Grayscale => (PixelDepth::Bit8, 1),
        ColorType::GrayscaleAlpha => (PixelDepth::Bit32, 4),
        ColorType::Rgb => (PixelDepth::Bit32, 3),
        ColorType::Rgba => (PixelDepth::Bit32, 4),
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(format!(
                "unexpanded PNG palette at {bit_depth:?}"
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {e}")))?;

    let mut pix_mut = Pix::new(width, height, pix_depth)?.to_mut();
    pix_mut.set_spp(spp);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    // Byte stride of one sample; 16-bit samples keep only the MSB when
    // packed into 32 bpp.
    let step = if wide { 2 } else { 1 };

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let px = x as usize;
            let val = match color_type {
                ColorType::Grayscale if wide => {
                    ((row[px * 2] as u32) << 8) | row[px * 2 + 1] as u32
                }
                ColorType::Grayscale => row[px] as u32,
                ColorType::GrayscaleAlpha => {
                    let idx = px * 2 * step;
                    let (g, a) = (row[idx], row[idx + step]);
                    color::compose_rgba(g, g, g, a)
                }
                ColorType::Rgb => {
                    let idx = px * 3 * step;
                    color::compose_rgb(row[idx], row[idx + step], row[idx + 2 * step])
                }
                _ => {
                    let idx = px * 4 * step;
                    color::compose_rgba(
                        row[idx],
                        row[idx + step],
                        row[idx + 2 * step],
                        row[idx + 3 * step],
                    )
                }
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth, bytes_per_pixel) = match pix.depth() {
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, 1),
        PixelDepth::Bit16 => (ColorType::Grayscale, BitDepth::Sixteen, 2),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, 3),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {e}")))?;

    let bytes_per_row = width as usize * bytes_per_pixel;
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        let row = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            let px = &mut row[x as usize * bytes_per_pixel..(x as usize + 1) * bytes_per_pixel];
            match bytes_per_pixel {
                1 => px[0] = val as u8,
                2 => px.copy_from_slice(&(val as u16).to_be_bytes()),
                3 => {
                    let (r, g, b) = color::extract_rgb(val);
                    px.copy_from_slice(&[r, g, b]);
                }
                _ => {
                    let (r, g, b, a) = color::extract_rgba(val);
                    px.copy_from_slice(&[r, g, b, a]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {e}")))?;

    Ok(())
}
