//! 24-bit BMP encoding for decoded-output dumps.
//!
//! Uncompressed BI_RGB, 54-byte header, bottom-up rows padded to 4-byte
//! boundaries, samples in B-G-R order.

use std::fs;
use std::path::Path;

use nvjet_core::codec_traits::HostTransfer;
use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{DeviceImage, OutputFormat};

const HEADER_BYTES: usize = 54;

fn row_stride(width: usize) -> usize {
    (width * 3 + 3) & !3
}

fn push_header(out: &mut Vec<u8>, width: usize, height: usize) {
    let image_bytes = row_stride(width) * height;
    let file_bytes = (HEADER_BYTES + image_bytes) as u32;

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_bytes.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // reserved1
    out.extend_from_slice(&0u16.to_le_bytes()); // reserved2
    out.extend_from_slice(&(HEADER_BYTES as u32).to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes()); // BITMAPINFOHEADER size
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&(image_bytes as u32).to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes()); // x pixels per meter
    out.extend_from_slice(&0i32.to_le_bytes()); // y pixels per meter
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}

/// Encode three compacted planes (`width * height` bytes each) into a
/// BMP file image.
pub fn encode_bmp_planar(r: &[u8], g: &[u8], b: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = row_stride(width);
    let mut out = Vec::with_capacity(HEADER_BYTES + stride * height);
    push_header(&mut out, width, height);

    for y in (0..height).rev() {
        let row = y * width;
        for x in 0..width {
            out.push(b[row + x]);
            out.push(g[row + x]);
            out.push(r[row + x]);
        }
        out.resize(out.len() + stride - width * 3, 0);
    }
    out
}

/// Encode one compacted interleaved plane (`width * 3 * height` bytes)
/// into a BMP file image.  `rgb_order` says whether pixels arrive as
/// R-G-B (swapped on write) or already as B-G-R.
pub fn encode_bmp_interleaved(
    pixels: &[u8],
    width: usize,
    height: usize,
    rgb_order: bool,
) -> Vec<u8> {
    let stride = row_stride(width);
    let mut out = Vec::with_capacity(HEADER_BYTES + stride * height);
    push_header(&mut out, width, height);

    for y in (0..height).rev() {
        let row = y * width * 3;
        for x in 0..width {
            let px = row + x * 3;
            if rgb_order {
                out.push(pixels[px + 2]);
                out.push(pixels[px + 1]);
                out.push(pixels[px]);
            } else {
                out.push(pixels[px]);
                out.push(pixels[px + 1]);
                out.push(pixels[px + 2]);
            }
        }
        out.resize(out.len() + stride - width * 3, 0);
    }
    out
}

/// Read a decoded output image back from the device and write it as a
/// BMP file.  The caller must have synchronized the submitting stream.
pub fn dump_bmp<T: HostTransfer>(
    transfer: &T,
    image: &DeviceImage,
    format: OutputFormat,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<()> {
    let (width, height) = (width as usize, height as usize);
    let encoded = match format {
        OutputFormat::Rgb | OutputFormat::Bgr => {
            let p0 = transfer.read_plane(image, 0, width, height)?;
            let p1 = transfer.read_plane(image, 1, width, height)?;
            let p2 = transfer.read_plane(image, 2, width, height)?;
            if format == OutputFormat::Rgb {
                encode_bmp_planar(&p0, &p1, &p2, width, height)
            } else {
                encode_bmp_planar(&p2, &p1, &p0, width, height)
            }
        }
        OutputFormat::Rgbi | OutputFormat::Bgri => {
            let pixels = transfer.read_plane(image, 0, width * 3, height)?;
            encode_bmp_interleaved(&pixels, width, height, format == OutputFormat::Rgbi)
        }
        other => {
            return Err(EngineError::Pipeline(format!(
                "BMP dump is not supported for the {other:?} output format"
            )))
        }
    };
    fs::write(path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    /// Undo bottom-up order, padding, and BGR swizzle.
    fn decode_bmp(bytes: &[u8]) -> (usize, usize, Vec<[u8; 3]>) {
        assert_eq!(&bytes[..2], b"BM");
        let width = read_u32(bytes, 18) as usize;
        let height = read_u32(bytes, 22) as usize;
        let stride = row_stride(width);

        let mut pixels = vec![[0u8; 3]; width * height];
        for y in 0..height {
            let src = HEADER_BYTES + (height - 1 - y) * stride;
            for x in 0..width {
                let px = src + x * 3;
                pixels[y * width + x] = [bytes[px + 2], bytes[px + 1], bytes[px]];
            }
        }
        (width, height, pixels)
    }

    #[test]
    fn planar_round_trip() {
        let (w, h) = (4usize, 4usize);
        let r: Vec<u8> = (0..w * h).map(|i| i as u8).collect();
        let g: Vec<u8> = (0..w * h).map(|i| (i * 3) as u8).collect();
        let b: Vec<u8> = (0..w * h).map(|i| (i * 7) as u8).collect();

        let bmp = encode_bmp_planar(&r, &g, &b, w, h);
        assert_eq!(bmp.len(), HEADER_BYTES + row_stride(w) * h);

        let (dw, dh, pixels) = decode_bmp(&bmp);
        assert_eq!((dw, dh), (w, h));
        for i in 0..w * h {
            assert_eq!(pixels[i], [r[i], g[i], b[i]]);
        }
    }

    #[test]
    fn interleaved_round_trip_with_padding() {
        // Width 3 forces a padded stride (9 → 12 bytes).
        let (w, h) = (3usize, 2usize);
        let rgb: Vec<u8> = (0..w * h * 3).map(|i| (i * 5) as u8).collect();

        let bmp = encode_bmp_interleaved(&rgb, w, h, true);
        assert_eq!(bmp.len(), HEADER_BYTES + 12 * h);

        let (_, _, pixels) = decode_bmp(&bmp);
        for i in 0..w * h {
            assert_eq!(pixels[i], [rgb[i * 3], rgb[i * 3 + 1], rgb[i * 3 + 2]]);
        }
    }

    #[test]
    fn bgr_interleaved_is_written_verbatim() {
        let bgr = vec![10u8, 20, 30];
        let bmp = encode_bmp_interleaved(&bgr, 1, 1, false);
        assert_eq!(&bmp[HEADER_BYTES..HEADER_BYTES + 3], &[10, 20, 30]);
    }
}
