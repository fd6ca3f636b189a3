//! WASM bindings for the destructive transforms.
//!
//! These are stateless: each takes a `JsRasterImage` and returns a new one,
//! for callers that manage their own image state instead of using
//! `JsEditorSession`.

use crate::types::{filter_from_u8, js_error, JsRasterImage};
use pixkit_core::transform::{self, FlipAxis, InterpolationFilter};
use wasm_bindgen::prelude::*;

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - Source image
/// * `width` / `height` - Target size, both non-zero
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
#[wasm_bindgen]
pub fn resize_image(
    image: &JsRasterImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    transform::resize(&image.to_raster(), width, height, filter_from_u8(filter))
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}

/// Crop the largest centered region with the given aspect ratio (width / height).
///
/// # Example (TypeScript)
///
/// ```typescript
/// const square = center_crop(image, 1.0);
/// const widescreen = center_crop(image, 16 / 9);
/// ```
#[wasm_bindgen]
pub fn center_crop(image: &JsRasterImage, ratio: f64) -> Result<JsRasterImage, JsValue> {
    transform::center_crop(&image.to_raster(), ratio)
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}

/// Rotate an image around its center.
///
/// Positive angles rotate clockwise. Multiples of 90 degrees are exact; other
/// angles expand the canvas to fit and leave the corners transparent.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
/// * `use_lanczos` - Use high-quality Lanczos3 filter (slower), otherwise bilinear
#[wasm_bindgen]
pub fn rotate_image(
    image: &JsRasterImage,
    angle_degrees: f64,
    use_lanczos: bool,
) -> Result<JsRasterImage, JsValue> {
    let filter = if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    };

    transform::rotate(&image.to_raster(), angle_degrees, filter)
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}

/// Mirror an image. `axis` is `"horizontal"` or `"vertical"`.
#[wasm_bindgen]
pub fn flip_image(image: &JsRasterImage, axis: &str) -> Result<JsRasterImage, JsValue> {
    let axis: FlipAxis = axis.parse().map_err(js_error)?;
    transform::flip(&image.to_raster(), axis)
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resize_zero_is_error() {
        let img = JsRasterImage::new(2, 2, vec![0; 16]);
        assert!(resize_image(&img, 0, 2, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_center_crop_bad_ratio_is_error() {
        let img = JsRasterImage::new(2, 2, vec![0; 16]);
        assert!(center_crop(&img, 0.0).is_err());
        assert!(center_crop(&img, f64::NAN).is_err());
    }

    #[wasm_bindgen_test]
    fn test_flip_unknown_axis_is_error() {
        let img = JsRasterImage::new(2, 2, vec![0; 16]);
        let err = flip_image(&img, "diagonal").err().unwrap();
        assert!(err.as_string().unwrap().contains("diagonal"));
    }

    #[wasm_bindgen_test]
    fn test_malformed_buffer_is_error() {
        let img = JsRasterImage::new(4, 4, vec![0; 5]);
        assert!(rotate_image(&img, 90.0, false).is_err());
    }
}
