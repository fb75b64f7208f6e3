//! Binary PNM (PGM `P5` / PPM `P6`) support
//!
//! Sample values are rescaled to the full 8-bit range when the header's
//! maxval is below 255. PGM files with a maxval above 255 read as 16 bpp.

use crate::{IoError, IoResult};
use keystone_core::{Pix, PixelDepth, color};
use std::io::{BufRead, Write};

/// Read one header token, skipping whitespace and `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    let mut in_comment = false;
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0];
        if in_comment {
            in_comment = c != b'\n' && c != b'\r';
            continue;
        }
        if c == b'#' && token.is_empty() {
            in_comment = true;
        } else if c.is_ascii_whitespace() {
            if !token.is_empty() {
                // The single whitespace byte after maxval is consumed here
                break;
            }
        } else {
            token.push(c as char);
        }
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("truncated PNM header".to_string()));
    }
    Ok(token)
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {what}: '{token}'")))
}

/// Read a binary PGM or PPM image.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Pix> {
    let magic = read_token(&mut reader)?;
    let channels = match magic.as_str() {
        "P5" => 1usize,
        "P6" => 3,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {other} (only binary P5/P6 are read)"
            )));
        }
    };
    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 65535 || (channels == 3 && maxval > 255) {
        return Err(IoError::InvalidData(format!("unsupported PNM maxval {maxval}")));
    }

    let sample_bytes = if maxval > 255 { 2 } else { 1 };
    let depth = match (channels, sample_bytes) {
        (1, 1) => PixelDepth::Bit8,
        (1, _) => PixelDepth::Bit16,
        _ => PixelDepth::Bit32,
    };

    let mut data = vec![0u8; width as usize * height as usize * channels * sample_bytes];
    reader
        .read_exact(&mut data)
        .map_err(|e| IoError::DecodeError(format!("PNM pixel data: {e}")))?;

    let scale = |v: u8| -> u8 {
        if maxval == 255 {
            v
        } else {
            ((v as u32).min(maxval) * 255 / maxval) as u8
        }
    };

    let mut pix_mut = Pix::new(width, height, depth)?.to_mut();
    let stride = channels * sample_bytes;
    for (i, px) in data.chunks_exact(stride).enumerate() {
        let (x, y) = ((i % width as usize) as u32, (i / width as usize) as u32);
        let val = match depth {
            PixelDepth::Bit8 => scale(px[0]) as u32,
            PixelDepth::Bit16 => u16::from_be_bytes([px[0], px[1]]) as u32,
            PixelDepth::Bit32 => color::compose_rgb(scale(px[0]), scale(px[1]), scale(px[2])),
        };
        pix_mut.set_pixel_unchecked(x, y, val);
    }
    Ok(pix_mut.into())
}

/// Write a binary PGM (8/16 bpp) or PPM (32 bpp) image.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let (magic, maxval, bytes_per_pixel) = match pix.depth() {
        PixelDepth::Bit8 => ("P5", 255, 1),
        PixelDepth::Bit16 => ("P5", 65535, 2),
        PixelDepth::Bit32 => ("P6", 255, 3),
    };
    write!(writer, "{magic}\n{width} {height}\n{maxval}\n")?;

    let mut data = Vec::with_capacity(width as usize * height as usize * bytes_per_pixel);
    for y in 0..height {
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            match pix.depth() {
                PixelDepth::Bit8 => data.push(val as u8),
                PixelDepth::Bit16 => data.extend_from_slice(&(val as u16).to_be_bytes()),
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(val);
                    data.extend_from_slice(&[r, g, b]);
                }
            }
        }
    }
    writer.write_all(&data)?;
    Ok(())
}
