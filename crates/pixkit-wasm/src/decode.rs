//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@pixkit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const data = new ImageData(new Uint8ClampedArray(image.pixels()), image.width);
//! ```

use crate::types::{js_error, JsRasterImage};
use pixkit_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG, PNG, WebP or GIF image from bytes.
///
/// The format is sniffed from the data and EXIF orientation is applied, so
/// the returned RGBA pixels are upright.
///
/// # Errors
///
/// Returns an error if the format is not supported or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}

/// Check whether bytes start with a supported image signature.
#[wasm_bindgen]
pub fn is_supported_image(bytes: &[u8]) -> bool {
    decode::detect_format(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixkit_core::encode::encode_png;

    #[test]
    fn test_decode_png() {
        let pixels = [10u8, 20, 30, 255].repeat(6);
        let png = encode_png(&pixels, 3, 2).unwrap();

        let image = decode_image(&png).unwrap();
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixels(), pixels);
    }

    #[test]
    fn test_is_supported_image() {
        let png = encode_png(&[0, 0, 0, 255], 1, 1).unwrap();
        assert!(is_supported_image(&png));
        assert!(is_supported_image(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_supported_image(b"hello world"));
        assert!(!is_supported_image(&[]));
    }
}
