//! Resize form state.

use serde::{Deserialize, Serialize};

use crate::decode::Dimensions;

/// Target size for the next resize, with optional aspect lock.
///
/// When `lock_aspect` is on, editing one side recomputes the other from the
/// anchor ratio, rounded to the nearest pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub lock_aspect: bool,
}

impl Default for ResizeParams {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            lock_aspect: true,
        }
    }
}

impl ResizeParams {
    /// Reset the target size to `dims` and turn the aspect lock back on.
    pub fn seed(&mut self, dims: Dimensions) {
        self.width = dims.width;
        self.height = dims.height;
        self.lock_aspect = true;
    }

    /// Set the width; with the lock on, derive the height from `ratio`
    /// (width / height).
    pub fn set_width(&mut self, width: u32, ratio: Option<f64>) {
        self.width = width;
        if let Some(ratio) = self.locked_ratio(ratio) {
            self.height = round_to_u32(width as f64 / ratio);
        }
    }

    /// Set the height; with the lock on, derive the width from `ratio`.
    pub fn set_height(&mut self, height: u32, ratio: Option<f64>) {
        self.height = height;
        if let Some(ratio) = self.locked_ratio(ratio) {
            self.width = round_to_u32(height as f64 * ratio);
        }
    }

    fn locked_ratio(&self, ratio: Option<f64>) -> Option<f64> {
        ratio.filter(|r| self.lock_aspect && r.is_finite() && *r > 0.0)
    }
}

fn round_to_u32(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}
