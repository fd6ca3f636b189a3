//! Resampling to exact dimensions.
//!
//! Uses the `image` crate's separable filters. Bilinear (the `Triangle`
//! kernel) is the default so that scaling looks smooth; nearest neighbour is
//! only used when asked for.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::RasterImage;

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, sharpest).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize an image to exact dimensions.
///
/// The aspect ratio is not preserved; callers that want that compute the
/// target size first (see `ResizeParams`).
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` if either target dimension is
/// zero, and `TransformError::MalformedSource` if the source buffer is the
/// wrong length.
pub fn resize(
    image: &RasterImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterImage, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or(TransformError::MalformedSource {
        width: image.width,
        height: image.height,
    })?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(RasterImage::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions_is_copy() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_upscale() {
        let img = create_test_image(50, 25);
        let resized = resize(&img, 100, 50, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert_eq!(
            resize(&img, 0, 50, FilterType::Bilinear),
            Err(TransformError::InvalidDimensions { width: 0, height: 50 })
        );
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_solid_color_stays_solid() {
        let img = RasterImage::filled(40, 30, [10, 20, 30, 255]);
        let resized = resize(&img, 17, 11, FilterType::Bilinear).unwrap();
        assert!(resized
            .pixels
            .chunks_exact(4)
            .all(|p| p == [10, 20, 30, 255]));
    }

    #[test]
    fn test_resize_malformed_source() {
        let img = RasterImage {
            width: 10,
            height: 10,
            pixels: vec![0; 12],
        };
        assert!(matches!(
            resize(&img, 5, 5, FilterType::Bilinear),
            Err(TransformError::MalformedSource { .. })
        ));
    }

    #[test]
    fn test_all_filter_types() {
        let img = create_test_image(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&img, 50, 25, filter).unwrap();
            assert_eq!(resized.width, 50);
            assert_eq!(resized.height, 25);
        }
    }
}
