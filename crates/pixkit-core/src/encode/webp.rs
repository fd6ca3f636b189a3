//! WebP encoding.
//!
//! The `image` crate only ships a lossless WebP encoder. Lower quality
//! settings are emulated by snapping the color channels to fewer levels
//! before encoding, which the lossless coder then compresses much better.

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate_rgba, EncodeError, ExportFormat, MAX_QUALITY};

/// Number of levels per color channel for a quality fraction.
///
/// Grows with the square of quality so the top of the range stays close to
/// lossless while low settings become coarse quickly.
pub fn webp_levels(quality: f32) -> u16 {
    if quality >= MAX_QUALITY {
        return 256;
    }
    let q = quality.clamp(0.0, 1.0);
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

/// Snap the RGB channels of an RGBA buffer to `levels` evenly spaced values.
/// Alpha is left untouched.
pub fn quantize_rgb(pixels: &mut [u8], levels: u16) {
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (levels.max(2) as f32 - 1.0);
    for px in pixels.chunks_exact_mut(4) {
        for channel in px.iter_mut().take(3) {
            let bucket = (*channel as f32 / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Encode RGBA pixel data to WebP bytes.
///
/// `quality` is a fraction; `1.0` is bit-exact lossless. Below that the
/// quantized encoding is used unless the exact one comes out smaller, which
/// happens on smooth content where snapping creates new edges. Output size
/// therefore never exceeds the lossless size.
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let exact = encode_lossless(pixels, width, height)?;
    let levels = webp_levels(quality);
    if levels >= 256 {
        return Ok(exact);
    }

    let mut data = pixels.to_vec();
    quantize_rgb(&mut data, levels);
    let quantized = encode_lossless(&data, width, height)?;

    Ok(if quantized.len() <= exact.len() {
        quantized
    } else {
        exact
    })
}

fn encode_lossless(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ExportFormat::Webp,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ramp(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, 255 - v, v / 2, 200]
            })
            .collect()
    }

    #[test]
    fn test_levels_curve() {
        assert_eq!(webp_levels(1.0), 256);
        assert_eq!(webp_levels(0.0), 2);
        assert_eq!(webp_levels(0.5), 66);
        assert_eq!(webp_levels(0.1), 5);
        assert!(webp_levels(0.9) > webp_levels(0.8));
    }

    #[test]
    fn test_quantize_limits_distinct_values() {
        let mut pixels = ramp(256, 1);
        quantize_rgb(&mut pixels, 5);

        let reds: HashSet<u8> = pixels.chunks_exact(4).map(|p| p[0]).collect();
        assert!(reds.len() <= 5);
        assert!(reds.contains(&0));
        assert!(reds.contains(&255));
        assert!(pixels.chunks_exact(4).all(|p| p[3] == 200));
    }

    #[test]
    fn test_full_quality_is_lossless() {
        let pixels = ramp(32, 8);
        let webp = encode_webp(&pixels, 32, 8, 1.0).unwrap();
        let decoded = image::load_from_memory(&webp).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw(), &pixels);
    }

    /// Pseudo-random noise; snapping it to a few levels shrinks it a lot.
    fn textured(width: u32, height: u32) -> Vec<u8> {
        let mut state = 0x2545_f491u32;
        (0..width * height)
            .flat_map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let [r, g, b, _] = state.to_le_bytes();
                [r, g, b, 255]
            })
            .collect()
    }

    /// Smooth horizontal gradient, which already compresses well unquantized.
    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let row: Vec<u8> = (0..width)
            .flat_map(|x| {
                let v = (x * 255 / (width - 1)) as u8;
                [v, v, v, 255]
            })
            .collect();
        row.repeat(height as usize)
    }

    #[test]
    fn test_low_quality_decodes_to_quantized_pixels() {
        let pixels = textured(32, 32);
        let webp = encode_webp(&pixels, 32, 32, 0.1).unwrap();
        let decoded = image::load_from_memory(&webp).unwrap().into_rgba8();

        let mut expected = pixels.clone();
        quantize_rgb(&mut expected, webp_levels(0.1));
        assert_eq!(decoded.as_raw(), &expected);
    }

    #[test]
    fn test_low_quality_decodes_to_source_or_quantized() {
        let pixels = ramp(64, 64);
        let webp = encode_webp(&pixels, 64, 64, 0.1).unwrap();
        let decoded = image::load_from_memory(&webp).unwrap().into_rgba8();

        let mut quantized = pixels.clone();
        quantize_rgb(&mut quantized, webp_levels(0.1));
        assert!(decoded.as_raw() == &pixels || decoded.as_raw() == &quantized);
    }

    #[test]
    fn test_low_quality_not_larger() {
        for (name, pixels) in [
            ("ramp", ramp(64, 64)),
            ("gradient", gradient(64, 64)),
            ("textured", textured(64, 64)),
        ] {
            let high = encode_webp(&pixels, 64, 64, 1.0).unwrap();
            for quality in [0.1, 0.5, 0.9] {
                let low = encode_webp(&pixels, 64, 64, quality).unwrap();
                assert!(
                    low.len() <= high.len(),
                    "{name} at {quality}: low={}, high={}",
                    low.len(),
                    high.len()
                );
            }
        }
    }

    #[test]
    fn test_low_quality_shrinks_textured_image() {
        let pixels = textured(64, 64);
        let low = encode_webp(&pixels, 64, 64, 0.1).unwrap();
        let high = encode_webp(&pixels, 64, 64, 1.0).unwrap();
        assert!(low.len() < high.len(), "low={}, high={}", low.len(), high.len());
    }
}
