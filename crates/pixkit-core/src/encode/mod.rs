//! Image encoding for export.
//!
//! This module provides:
//! - JPEG with configurable quality (alpha composited onto black)
//! - Lossless PNG
//! - WebP via the pure-Rust lossless encoder, with RGB quantization standing
//!   in for lossy quality
//!
//! Quality is expressed as a fraction in `[0.1, 1.0]`, the same scale the
//! browser's `canvas.toBlob` uses.
//!
//! # Examples
//!
//! ```ignore
//! use pixkit_core::decode::RasterImage;
//! use pixkit_core::encode::{encode, ExportFormat};
//!
//! let image = RasterImage::filled(100, 100, [128, 128, 128, 255]);
//! let bytes = encode(&image, ExportFormat::Jpeg, 0.9).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod png;
mod webp;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::RasterImage;

pub use jpeg::{encode_jpeg, jpeg_quality};
pub use png::encode_png;
pub use webp::{encode_webp, quantize_rgb, webp_levels};

/// Lowest accepted export quality.
pub const MIN_QUALITY: f32 = 0.1;
/// Highest accepted export quality.
pub const MAX_QUALITY: f32 = 1.0;
/// Quality used when nothing else is configured.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Stem of every exported file name.
pub const EXPORT_FILE_STEM: &str = "edited-image";

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ExportFormat,
        message: String,
    },

    /// Not one of the export formats
    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),
}

/// Output encodings offered for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Jpeg, ExportFormat::Png, ExportFormat::Webp];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Png => "png",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Whether the quality setting has any effect.
    pub fn is_lossy(self) -> bool {
        !matches!(self, ExportFormat::Png)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Png => "PNG",
            ExportFormat::Webp => "WebP",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = EncodeError;

    /// Accepts a bare name, an extension or a MIME type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" => Ok(ExportFormat::Jpeg),
            "png" | "image/png" => Ok(ExportFormat::Png),
            "webp" | "image/webp" => Ok(ExportFormat::Webp),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Clamp a quality fraction into `[MIN_QUALITY, MAX_QUALITY]`.
///
/// NaN falls back to [`DEFAULT_QUALITY`].
pub fn clamp_quality(quality: f32) -> f32 {
    if quality.is_nan() {
        DEFAULT_QUALITY
    } else {
        quality.clamp(MIN_QUALITY, MAX_QUALITY)
    }
}

/// Export format and quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub quality: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ExportConfig {
    pub fn new(format: ExportFormat, quality: f32) -> Self {
        Self {
            format,
            quality: clamp_quality(quality),
        }
    }

    /// Store a new quality, clamped. Kept even when the format is lossless.
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = clamp_quality(quality);
    }
}

/// An encoded image ready to hand to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub extension: &'static str,
    pub mime: &'static str,
    pub file_name: String,
}

impl Export {
    pub fn new(bytes: Vec<u8>, format: ExportFormat) -> Self {
        Self {
            bytes,
            format,
            extension: format.extension(),
            mime: format.mime(),
            file_name: format!("{}.{}", EXPORT_FILE_STEM, format.extension()),
        }
    }
}

/// Check an RGBA buffer against its declared dimensions.
fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode an image in the requested format.
///
/// `quality` is clamped to `[0.1, 1.0]` and ignored for PNG.
pub fn encode(
    image: &RasterImage,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let quality = clamp_quality(quality);
    let bytes = match format {
        ExportFormat::Jpeg => {
            encode_jpeg(&image.pixels, image.width, image.height, jpeg_quality(quality))?
        }
        ExportFormat::Png => encode_png(&image.pixels, image.width, image.height)?,
        ExportFormat::Webp => encode_webp(&image.pixels, image.width, image.height, quality)?,
    };

    log::debug!(
        "encoded {}x{} as {} (q={:.2}): {} bytes",
        image.width,
        image.height,
        format,
        quality,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let noise = ((x * 7919 + y * 104_729) ^ (x * y)) % 256;
                pixels.extend_from_slice(&[
                    (x * 255 / width) as u8,
                    noise as u8,
                    ((x + y) * 3 % 256) as u8,
                    255,
                ]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("image/jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("image/png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("webp".parse::<ExportFormat>().unwrap(), ExportFormat::Webp);
        assert!(matches!(
            "image/gif".parse::<ExportFormat>(),
            Err(EncodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ExportFormat::Webp.mime(), "image/webp");
        assert!(!ExportFormat::Png.is_lossy());
        assert!(ExportFormat::Jpeg.is_lossy());
    }

    #[test]
    fn test_quality_clamping() {
        assert_eq!(clamp_quality(0.0), MIN_QUALITY);
        assert_eq!(clamp_quality(-3.0), MIN_QUALITY);
        assert_eq!(clamp_quality(7.0), MAX_QUALITY);
        assert_eq!(clamp_quality(0.55), 0.55);
        assert_eq!(clamp_quality(f32::NAN), DEFAULT_QUALITY);
    }

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.format, ExportFormat::Jpeg);
        assert_eq!(config.quality, 0.8);
    }

    #[test]
    fn test_export_config_keeps_quality_for_png() {
        let mut config = ExportConfig::new(ExportFormat::Png, 0.3);
        config.set_quality(0.05);
        assert_eq!(config.quality, MIN_QUALITY);
        assert_eq!(config.format, ExportFormat::Png);
    }

    #[test]
    fn test_export_file_name() {
        let export = Export::new(vec![1, 2, 3], ExportFormat::Webp);
        assert_eq!(export.file_name, "edited-image.webp");
        assert_eq!(export.mime, "image/webp");
        assert_eq!(export.extension, "webp");
    }

    #[test]
    fn test_encode_magic_bytes() {
        let img = textured(32, 24);

        let jpeg = encode(&img, ExportFormat::Jpeg, 0.8).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode(&img, ExportFormat::Png, 0.8).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let webp = encode(&img, ExportFormat::Webp, 0.8).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_higher_jpeg_quality_not_smaller() {
        let img = textured(96, 96);
        let low = encode(&img, ExportFormat::Jpeg, 0.2).unwrap();
        let high = encode(&img, ExportFormat::Jpeg, 0.9).unwrap();
        assert!(high.len() >= low.len(), "low={}, high={}", low.len(), high.len());
    }

    #[test]
    fn test_png_ignores_quality() {
        let img = textured(20, 20);
        let a = encode(&img, ExportFormat::Png, 0.1).unwrap();
        let b = encode(&img, ExportFormat::Png, 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_png_round_trips_exactly() {
        let img = textured(17, 9);
        let png = encode(&img, ExportFormat::Png, 0.5).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw(), &img.pixels);
    }

    #[test]
    fn test_out_of_range_quality_is_clamped_not_rejected() {
        let img = textured(8, 8);
        assert!(encode(&img, ExportFormat::Jpeg, 5.0).is_ok());
        assert!(encode(&img, ExportFormat::Webp, -1.0).is_ok());
    }

    #[test]
    fn test_encode_rejects_malformed_image() {
        let img = RasterImage {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        };
        for format in ExportFormat::ALL {
            assert!(matches!(
                encode(&img, format, 0.8),
                Err(EncodeError::InvalidPixelData { expected: 64, actual: 10 })
            ));
        }

        let empty = RasterImage {
            width: 0,
            height: 4,
            pixels: vec![],
        };
        assert!(matches!(
            encode(&empty, ExportFormat::Png, 0.8),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
