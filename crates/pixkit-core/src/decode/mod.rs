//! Image decoding and the bitmap store.
//!
//! This module provides:
//! - [`RasterImage`], the RGBA bitmap every other module operates on
//! - Decoding of JPEG, PNG, WebP and GIF input with EXIF orientation applied
//! - [`BitmapStore`], the single mutable slot holding the working image
//!
//! # Architecture
//!
//! Decoding is synchronous and runs on whatever thread calls it. In the
//! browser that is the main thread or a Web Worker via the WASM bindings.

mod load;
mod store;
mod types;

pub use load::{decode_image, detect_format, get_orientation};
pub use store::BitmapStore;
pub use types::{DecodeError, Dimensions, Orientation, RasterImage};
