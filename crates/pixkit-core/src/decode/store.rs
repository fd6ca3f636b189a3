//! The bitmap store: one working image, replaced wholesale on every edit.

use super::{decode_image, DecodeError, Dimensions, RasterImage};

/// Owns the currently loaded raster.
///
/// `current` is only ever swapped as a whole value, so a reader sees either
/// the previous bitmap or the complete new one. The dimensions of the first
/// image decoded by [`BitmapStore::load`] are kept as `original`; its pixels
/// are not.
#[derive(Debug, Default)]
pub struct BitmapStore {
    original: Option<Dimensions>,
    current: Option<RasterImage>,
}

impl BitmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and make the result both the original and the current
    /// image. On error the store is left exactly as it was.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&RasterImage, DecodeError> {
        let image = decode_image(bytes)?;
        self.original = Some(image.dimensions());
        Ok(self.current.insert(image))
    }

    /// Swap in a new current image, returning the previous one.
    ///
    /// The original dimensions are left untouched.
    pub fn replace(&mut self, image: RasterImage) -> Option<RasterImage> {
        debug_assert!(image.is_consistent(), "replacing with a malformed image");
        if self.original.is_none() {
            self.original = Some(image.dimensions());
        }
        self.current.replace(image)
    }

    /// Drop both the original reference and the current image.
    pub fn clear(&mut self) {
        self.original = None;
        self.current = None;
    }

    pub fn current(&self) -> Option<&RasterImage> {
        self.current.as_ref()
    }

    pub fn original_dimensions(&self) -> Option<Dimensions> {
        self.original
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}
