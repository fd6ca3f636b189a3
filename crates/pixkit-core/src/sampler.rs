//! Eyedropper: map a point on the displayed image back to a source pixel.
//!
//! The browser shows the bitmap scaled to fit its container, so a click
//! position has to be rescaled per axis before indexing the buffer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::decode::RasterImage;

/// Errors from color sampling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("Invalid display size: {width}x{height}")]
    InvalidDisplaySize { width: f64, height: f64 },

    #[error("Cannot sample an empty image")]
    EmptyImage,
}

/// A point in display (CSS pixel) coordinates, relative to the image's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The on-screen size of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The picked color in both structured and `#rrggbb` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledColor {
    pub rgb: Rgb,
    pub hex: String,
}

impl From<Rgb> for SampledColor {
    fn from(rgb: Rgb) -> Self {
        Self {
            rgb,
            hex: rgb.to_hex(),
        }
    }
}

/// Map a display coordinate to a source coordinate on one axis.
fn map_axis(pos: f64, display: f64, source: u32) -> u32 {
    let scaled = (pos * (source as f64 / display)).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as u32).min(source - 1)
    }
}

/// Read the color under `point`. Alpha is ignored.
///
/// # Errors
///
/// Returns `SampleError::InvalidDisplaySize` if either display dimension is
/// non-positive or non-finite.
pub fn sample_color(
    image: &RasterImage,
    point: DisplayPoint,
    display: DisplaySize,
) -> Result<SampledColor, SampleError> {
    if !display.is_valid() {
        return Err(SampleError::InvalidDisplaySize {
            width: display.width,
            height: display.height,
        });
    }
    if image.is_empty() || !image.is_consistent() {
        return Err(SampleError::EmptyImage);
    }

    let x = map_axis(point.x, display.width, image.width);
    let y = map_axis(point.y, display.height, image.height);

    Ok(Rgb::from_rgba(image.pixel(x, y)).into())
}
