//! Raster image analyzer.
//!
//! Decoded image metadata is reported directly. Raw bytes and streams are
//! probed for a device-independent bitmap header (optionally preceded by a
//! `BM` file header). Anything else gets a fallback note with its type.

use crate::stream::peek_head;
use crate::types::{ImageMeta, Payload};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor};
use thiserror::Error;

/// BMP file header magic.
pub const BMP_MAGIC: [u8; 2] = [b'B', b'M'];

/// Size of the BMP file header that precedes the DIB header in a `.bmp`.
pub const BMP_FILE_HEADER_LEN: usize = 14;

/// Largest DIB header (`BITMAPV5HEADER`).
pub const MAX_DIB_HEADER_LEN: usize = 124;

const CORE_HEADER_LEN: u32 = 12;
const INFO_HEADER_LEN: u32 = 40;
const BI_BITFIELDS: u32 = 3;
const BI_JPEG: u32 = 4;
const BI_PNG: u32 = 5;
const DEFAULT_DPI: f64 = 96.0;

/// Failure decoding a bitmap header.
#[derive(Debug, Error)]
pub enum DibError {
    /// The data ends before the header does.
    #[error("bitmap header truncated ({0})")]
    Truncated(#[from] io::Error),

    /// The header size field names no known header layout.
    #[error("unrecognized bitmap header size {0}")]
    UnknownHeader(u32),
}

/// Image size, resolution and pixel format, or a fallback note.
///
/// Never declines: a payload that cannot be read as an image still yields
/// its type name and the reason.
pub fn analyze(payload: &Payload) -> Vec<String> {
    let decoded = match payload {
        Payload::Image(meta) => Ok(meta.clone()),
        Payload::RawBytes(data) => parse_bitmap(data).map_err(|e| e.to_string()),
        Payload::Stream(stream) => {
            peek_head(stream.as_ref(), BMP_FILE_HEADER_LEN + MAX_DIB_HEADER_LEN)
                .map_err(|e| format!("stream could not be read ({e})"))
                .and_then(|head| parse_bitmap(&head).map_err(|e| e.to_string()))
        }
        _ => Err("payload is not image data".to_string()),
    };

    match decoded {
        Ok(meta) => image_lines(&meta),
        Err(reason) => vec![
            format!("Bitmap data type: {}", payload.type_name()),
            format!("Unable to extract image details: {reason}"),
        ],
    }
}

/// Detail lines for decoded image metadata.
pub fn image_lines(meta: &ImageMeta) -> Vec<String> {
    vec![
        format!("Image Size: {}x{}", meta.width, meta.height),
        format!("DPI: {}x{}", meta.dpi_x, meta.dpi_y),
        format!("Format: {}", meta.pixel_format),
    ]
}

/// Parse a `.bmp` file image or a bare DIB.
pub fn parse_bitmap(data: &[u8]) -> Result<ImageMeta, DibError> {
    if data.len() >= BMP_FILE_HEADER_LEN && data[..2] == BMP_MAGIC {
        return parse_dib(&data[BMP_FILE_HEADER_LEN..]);
    }
    parse_dib(data)
}

/// Parse a DIB header (`BITMAPCOREHEADER` or `BITMAPINFOHEADER` and later).
pub fn parse_dib(data: &[u8]) -> Result<ImageMeta, DibError> {
    let mut rdr = Cursor::new(data);
    let header_len = rdr.read_u32::<LittleEndian>()?;

    if header_len == CORE_HEADER_LEN {
        let width = rdr.read_u16::<LittleEndian>()?;
        let height = rdr.read_u16::<LittleEndian>()?;
        let _planes = rdr.read_u16::<LittleEndian>()?;
        let bit_count = rdr.read_u16::<LittleEndian>()?;
        return Ok(ImageMeta::new(
            u32::from(width),
            u32::from(height),
            pixel_format_name(bit_count, 0, false),
        ));
    }

    if !(INFO_HEADER_LEN..=MAX_DIB_HEADER_LEN as u32).contains(&header_len) {
        return Err(DibError::UnknownHeader(header_len));
    }

    let width = rdr.read_i32::<LittleEndian>()?;
    // Negative height marks a top-down bitmap
    let height = rdr.read_i32::<LittleEndian>()?;
    let _planes = rdr.read_u16::<LittleEndian>()?;
    let bit_count = rdr.read_u16::<LittleEndian>()?;
    let compression = rdr.read_u32::<LittleEndian>()?;
    let _size_image = rdr.read_u32::<LittleEndian>()?;
    let x_ppm = rdr.read_i32::<LittleEndian>()?;
    let y_ppm = rdr.read_i32::<LittleEndian>()?;

    let has_alpha = if header_len >= 56 {
        // Alpha mask follows clrUsed, clrImportant and the RGB masks
        rdr.set_position(52);
        rdr.read_u32::<LittleEndian>()? != 0
    } else {
        false
    };

    Ok(ImageMeta {
        width: width.unsigned_abs(),
        height: height.unsigned_abs(),
        dpi_x: ppm_to_dpi(x_ppm),
        dpi_y: ppm_to_dpi(y_ppm),
        pixel_format: pixel_format_name(bit_count, compression, has_alpha),
    })
}

/// Pixels-per-meter to dots-per-inch, rounded to two decimals.
fn ppm_to_dpi(ppm: i32) -> f64 {
    if ppm <= 0 {
        return DEFAULT_DPI;
    }
    (f64::from(ppm) * 0.0254 * 100.0).round() / 100.0
}

fn pixel_format_name(bit_count: u16, compression: u32, has_alpha: bool) -> String {
    match (bit_count, compression) {
        (_, BI_JPEG) => "Jpeg".to_string(),
        (_, BI_PNG) => "Png".to_string(),
        (1 | 2 | 4 | 8, _) => format!("Indexed{bit_count}"),
        (16, BI_BITFIELDS) => "Bgr565".to_string(),
        (16, _) => "Bgr555".to_string(),
        (24, _) => "Bgr24".to_string(),
        (32, _) if has_alpha => "Bgra32".to_string(),
        (32, _) => "Bgr32".to_string(),
        (n, _) => format!("{n}bpp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::PropertyBag;
    use crate::stream::{ByteStream, MemoryStream};
    use pretty_assertions::assert_eq;

    fn info_header(width: i32, height: i32, bits: u16, ppm: i32) -> Vec<u8> {
        let mut h = Vec::with_capacity(40);
        h.extend_from_slice(&40u32.to_le_bytes());
        h.extend_from_slice(&width.to_le_bytes());
        h.extend_from_slice(&height.to_le_bytes());
        h.extend_from_slice(&1u16.to_le_bytes());
        h.extend_from_slice(&bits.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes());
        h.extend_from_slice(&ppm.to_le_bytes());
        h.extend_from_slice(&ppm.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes());
        h.extend_from_slice(&0u32.to_le_bytes());
        h
    }

    #[test]
    fn test_image_meta_payload() {
        let meta = ImageMeta::new(1920, 1080, "Bgra32");
        assert_eq!(
            analyze(&Payload::Image(meta)),
            vec![
                "Image Size: 1920x1080".to_string(),
                "DPI: 96x96".to_string(),
                "Format: Bgra32".to_string(),
            ]
        );
    }

    #[test]
    fn test_dib_bytes() {
        let dib = info_header(16, -8, 24, 2835);
        let lines = analyze(&Payload::RawBytes(dib));
        assert_eq!(lines[0], "Image Size: 16x8");
        assert_eq!(lines[1], "DPI: 72.01x72.01");
        assert_eq!(lines[2], "Format: Bgr24");
    }

    #[test]
    fn test_bmp_file_bytes() {
        let mut bmp = b"BM".to_vec();
        bmp.extend_from_slice(&[0u8; 12]);
        bmp.extend_from_slice(&info_header(2, 2, 8, 0));
        let meta = parse_bitmap(&bmp).unwrap();
        assert_eq!(meta.width, 2);
        assert_eq!(meta.pixel_format, "Indexed8");
        assert_eq!(meta.dpi_x, 96.0);
    }

    #[test]
    fn test_core_header() {
        let mut core = 12u32.to_le_bytes().to_vec();
        core.extend_from_slice(&5u16.to_le_bytes());
        core.extend_from_slice(&7u16.to_le_bytes());
        core.extend_from_slice(&1u16.to_le_bytes());
        core.extend_from_slice(&1u16.to_le_bytes());
        let meta = parse_dib(&core).unwrap();
        assert_eq!((meta.width, meta.height), (5, 7));
        assert_eq!(meta.pixel_format, "Indexed1");
    }

    #[test]
    fn test_stream_probe_keeps_position() {
        let stream = MemoryStream::new(info_header(4, 4, 32, 3780));
        stream.set_position(10).unwrap();
        let lines = analyze(&Payload::stream(stream.clone()));
        assert_eq!(lines[0], "Image Size: 4x4");
        assert_eq!(lines[1], "DPI: 96.01x96.01");
        assert_eq!(stream.position().unwrap(), 10);
    }

    #[test]
    fn test_truncated_header_falls_back() {
        let lines = analyze(&Payload::RawBytes(vec![40, 0, 0]));
        assert_eq!(lines[0], "Bitmap data type: byte[]");
        assert!(lines[1].starts_with("Unable to extract image details: bitmap header truncated"));
    }

    #[test]
    fn test_unknown_header_falls_back() {
        let lines = analyze(&Payload::RawBytes(vec![0xFF; 64]));
        assert!(lines[1].contains("unrecognized bitmap header size"));
    }

    #[test]
    fn test_non_image_payload_falls_back() {
        let lines = analyze(&Payload::object(PropertyBag::new("InteropBitmap")));
        assert_eq!(
            lines,
            vec![
                "Bitmap data type: InteropBitmap".to_string(),
                "Unable to extract image details: payload is not image data".to_string(),
            ]
        );
    }
}
