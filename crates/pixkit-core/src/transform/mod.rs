//! Destructive geometric transforms: resize, center crop, rotate and flip.
//!
//! Every function here takes an immutable source [`RasterImage`] and returns
//! a freshly allocated one. None of them write into their input, which lets
//! the editor session swap the result in atomically.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Positive rotation angles turn the image clockwise on screen
//! - Crop regions are in whole pixels
//!
//! [`RasterImage`]: crate::decode::RasterImage

mod crop;
mod flip;
mod resize;
mod rotation;

use thiserror::Error;

pub use crop::{center_crop, center_crop_region, crop_to_region, CropRatio, CropRegion};
pub use flip::{flip, FlipAxis};
pub use resize::{resize, FilterType};
pub use rotation::{compute_rotated_bounds, rotate, InterpolationFilter};

/// Errors raised by transform parameters that fall outside their domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A target width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// A crop aspect ratio is zero, negative or not finite.
    #[error("Invalid crop ratio: {0}")]
    InvalidRatio(f64),

    /// A rotation angle is NaN or infinite.
    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),

    /// The source buffer length disagrees with its dimensions.
    #[error("Source image buffer does not match {width}x{height}")]
    MalformedSource { width: u32, height: u32 },

    /// An unrecognized flip axis name.
    #[error("Unknown flip axis: {0}")]
    UnknownAxis(String),
}
