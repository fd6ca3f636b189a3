//! Mirror an image across its vertical or horizontal center line.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::RasterImage;

/// Which way to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror columns: `(x, y) -> (width - 1 - x, y)`.
    Horizontal,
    /// Mirror rows: `(x, y) -> (x, height - 1 - y)`.
    Vertical,
}

impl FromStr for FlipAxis {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(FlipAxis::Horizontal),
            "vertical" | "v" => Ok(FlipAxis::Vertical),
            other => Err(TransformError::UnknownAxis(other.to_string())),
        }
    }
}

/// Return a mirrored copy of `image`.
///
/// Flipping twice along the same axis reproduces the input exactly.
pub fn flip(image: &RasterImage, axis: FlipAxis) -> Result<RasterImage, TransformError> {
    if !image.is_consistent() {
        return Err(TransformError::MalformedSource {
            width: image.width,
            height: image.height,
        });
    }

    let stride = image.width as usize * 4;
    let mut output = Vec::with_capacity(image.pixels.len());

    match axis {
        FlipAxis::Horizontal => {
            for row in image.pixels.chunks_exact(stride.max(1)) {
                for px in row.chunks_exact(4).rev() {
                    output.extend_from_slice(px);
                }
            }
        }
        FlipAxis::Vertical => {
            for row in image.pixels.chunks_exact(stride.max(1)).rev() {
                output.extend_from_slice(row);
            }
        }
    }

    Ok(RasterImage::new(image.width, image.height, output))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = RasterImage> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let len = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| RasterImage::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: flipping is an involution on arbitrary pixel data.
        #[test]
        fn prop_flip_involution(img in image_strategy(), horizontal in any::<bool>()) {
            let axis = if horizontal { FlipAxis::Horizontal } else { FlipAxis::Vertical };
            let twice = flip(&flip(&img, axis).unwrap(), axis).unwrap();
            prop_assert_eq!(twice, img);
        }
    }
}
