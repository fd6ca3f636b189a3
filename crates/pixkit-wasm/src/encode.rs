//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@pixkit/wasm';
//!
//! const bytes = encode_image(image, 'image/webp', 0.8);
//! const blob = new Blob([bytes], { type: 'image/webp' });
//! ```

use crate::types::{js_error, JsRasterImage};
use pixkit_core::encode::{self, ExportFormat};
use wasm_bindgen::prelude::*;

/// Encode an image for export.
///
/// # Arguments
///
/// * `image` - The RGBA image to encode
/// * `format` - `jpeg`, `png` or `webp`, as a name, extension or MIME type
/// * `quality` - Fraction in `[0.1, 1.0]`; out-of-range values are clamped,
///   PNG ignores it
///
/// # Errors
///
/// Returns an error if the format is unknown, the image buffer does not
/// match its dimensions, or the codec fails.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterImage, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let format: ExportFormat = format.parse().map_err(js_error)?;
    encode::encode(&image.to_raster(), format, quality).map_err(js_error)
}
