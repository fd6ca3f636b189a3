//! Aspect-ratio center cropping.
//!
//! The crop keeps the largest centered rectangle of the requested ratio that
//! fits inside the source, then copies those pixels out unscaled.
//!
//! # Example
//!
//! ```ignore
//! // 1000x500 source, square crop -> 500x500 starting at (250, 0)
//! let square = center_crop(&image, 1.0)?;
//! ```

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::RasterImage;

/// Crop region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if region has non-zero area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A crop aspect ratio expressed as `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRatio {
    pub width: u32,
    pub height: u32,
}

impl CropRatio {
    pub const SQUARE: CropRatio = CropRatio::new(1, 1);
    pub const WIDESCREEN: CropRatio = CropRatio::new(16, 9);
    pub const STANDARD: CropRatio = CropRatio::new(4, 3);
    pub const PHOTO: CropRatio = CropRatio::new(3, 2);
    pub const PHOTO_PORTRAIT: CropRatio = CropRatio::new(2, 3);
    pub const STORY: CropRatio = CropRatio::new(9, 16);

    /// Ratios offered by the crop tool, in display order.
    pub const PRESETS: [CropRatio; 6] = [
        Self::SQUARE,
        Self::WIDESCREEN,
        Self::STANDARD,
        Self::PHOTO,
        Self::PHOTO_PORTRAIT,
        Self::STORY,
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The ratio as a float. A zero height yields infinity, a zero width zero;
    /// both are rejected by [`center_crop`].
    pub fn value(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Short label for the crop tool ("Square", or the ratio to 2 decimals).
    pub fn label(&self) -> String {
        if self.width == self.height && self.width != 0 {
            "Square".to_string()
        } else {
            format!("{:.2}", self.value())
        }
    }
}

/// Compute the centered region of aspect `ratio` inside a `width x height`
/// image.
///
/// If the image is wider than `ratio` the width is cut, otherwise the height.
/// Region size and origin are truncated toward zero, and the region is never
/// smaller than 1x1.
///
/// # Errors
///
/// Returns `TransformError::InvalidRatio` if `ratio` is not a positive finite
/// number, and `TransformError::InvalidDimensions` for an empty source.
pub fn center_crop_region(width: u32, height: u32, ratio: f64) -> Result<CropRegion, TransformError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(TransformError::InvalidRatio(ratio));
    }
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    let src_w = width as f64;
    let src_h = height as f64;

    let (new_w, new_h) = if src_w / src_h > ratio {
        (src_h * ratio, src_h)
    } else {
        (src_w, src_w / ratio)
    };

    let start_x = ((src_w - new_w) / 2.0) as u32;
    let start_y = ((src_h - new_h) / 2.0) as u32;

    let out_w = (new_w as u32).clamp(1, width - start_x.min(width - 1));
    let out_h = (new_h as u32).clamp(1, height - start_y.min(height - 1));

    Ok(CropRegion::new(start_x, start_y, out_w, out_h))
}

/// Center-crop an image to aspect `ratio` without resampling.
pub fn center_crop(image: &RasterImage, ratio: f64) -> Result<RasterImage, TransformError> {
    let region = center_crop_region(image.width, image.height, ratio)?;
    crop_to_region(image, region)
}

/// Copy a pixel region out of an image.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` if the region is empty or does
/// not lie entirely within the image.
pub fn crop_to_region(image: &RasterImage, region: CropRegion) -> Result<RasterImage, TransformError> {
    let fits = region.x as u64 + region.width as u64 <= image.width as u64
        && region.y as u64 + region.height as u64 <= image.height as u64;
    if !region.is_valid() || !fits {
        return Err(TransformError::InvalidDimensions {
            width: region.width,
            height: region.height,
        });
    }
    if !image.is_consistent() {
        return Err(TransformError::MalformedSource {
            width: image.width,
            height: image.height,
        });
    }

    // Fast path: full-image region returns a clone
    if region.x == 0 && region.y == 0 && region.width == image.width && region.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 4;
    let row_len = region.width as usize * 4;
    let mut output = Vec::with_capacity(row_len * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = y as usize * src_stride + region.x as usize * 4;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(RasterImage::new(region.width, region.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel encodes its own position.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x / 256) * 16 + y / 256) as u8);
                pixels.push(255);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_square_crop_of_landscape() {
        let region = center_crop_region(1000, 500, 1.0).unwrap();
        assert_eq!(region, CropRegion::new(250, 0, 500, 500));
    }

    #[test]
    fn test_square_crop_of_portrait() {
        let region = center_crop_region(300, 900, 1.0).unwrap();
        assert_eq!(region, CropRegion::new(0, 300, 300, 300));
    }

    #[test]
    fn test_center_crop_pixels() {
        let img = test_image(1000, 500);
        let result = center_crop(&img, 1.0).unwrap();

        assert_eq!(result.width, 500);
        assert_eq!(result.height, 500);
        // First output pixel comes from (250, 0)
        assert_eq!(result.pixel(0, 0), img.pixel(250, 0));
        assert_eq!(result.pixel(499, 499), img.pixel(749, 499));
    }

    #[test]
    fn test_widescreen_crop_truncates() {
        // 100 / (16/9) = 56.25 -> 56 rows, origin (100 - 56.25) / 2 = 21.875 -> 21
        let region = center_crop_region(100, 100, CropRatio::WIDESCREEN.value()).unwrap();
        assert_eq!(region, CropRegion::new(0, 21, 100, 56));
    }

    #[test]
    fn test_matching_ratio_is_identity() {
        let img = test_image(200, 100);
        let result = center_crop(&img, CropRatio::new(2, 1).value()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_invalid_ratios() {
        let img = test_image(10, 10);
        assert_eq!(center_crop(&img, 0.0), Err(TransformError::InvalidRatio(0.0)));
        assert!(center_crop(&img, -1.5).is_err());
        assert!(center_crop(&img, f64::NAN).is_err());
        assert!(center_crop(&img, f64::INFINITY).is_err());
        assert!(center_crop(&img, CropRatio::new(0, 3).value()).is_err());
    }

    #[test]
    fn test_extreme_ratio_keeps_one_pixel() {
        let region = center_crop_region(10, 10, 1000.0).unwrap();
        assert_eq!(region.width, 10);
        assert_eq!(region.height, 1);
    }

    #[test]
    fn test_crop_to_region_out_of_bounds() {
        let img = test_image(10, 10);
        assert!(crop_to_region(&img, CropRegion::new(5, 5, 6, 1)).is_err());
        assert!(crop_to_region(&img, CropRegion::new(0, 0, 0, 1)).is_err());
    }

    #[test]
    fn test_preset_labels() {
        assert_eq!(CropRatio::SQUARE.label(), "Square");
        assert_eq!(CropRatio::WIDESCREEN.label(), "1.78");
        assert_eq!(CropRatio::STORY.label(), "0.56");
        assert_eq!(CropRatio::PRESETS.len(), 6);
    }
}
