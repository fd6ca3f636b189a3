//! Raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, RasterImage};

/// Formats the editor accepts as input.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Decode an encoded image into RGBA pixels, applying EXIF orientation.
///
/// The format is detected from the leading bytes, not from a file name.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if the bytes are not JPEG, PNG,
/// WebP or GIF, and `DecodeError::Corrupted` if the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let format = detect_format(bytes)?;
    let orientation = extract_orientation(bytes);

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let rgba = oriented.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    log::debug!(
        "decoded {:?} image {}x{} (orientation {:?})",
        format,
        width,
        height,
        orientation
    );
    Ok(RasterImage::from_rgba_image(rgba))
}

/// Identify the container format from magic bytes.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?;
    if SUPPORTED_FORMATS.contains(&format) {
        Ok(format)
    } else {
        Err(DecodeError::UnsupportedFormat)
    }
}

/// Extract EXIF orientation value from encoded bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

/// Returns `Orientation::Normal` if no EXIF data is found.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
