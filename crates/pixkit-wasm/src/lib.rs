//! Pixkit WASM - WebAssembly bindings for Pixkit
//!
//! This crate provides WASM bindings to expose the pixkit-core functionality
//! to the browser editor.
//!
//! # Module Structure
//!
//! - `session` - `JsEditorSession`, the stateful editor
//! - `types` - WASM-compatible wrapper types for image data and exports
//! - `decode` - Image decoding bindings
//! - `transform` - Stateless resize, crop, rotate and flip
//! - `encode` - Export encoding bindings (JPEG, PNG, WebP)
//! - `sampler` - Color picker and caption rendering
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditorSession } from '@pixkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsEditorSession(undefined);
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.rotate_image(90);
//! const file = session.export();
//! ```

use pixkit_core::config::LogLevel;
use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod logger;
mod sampler;
mod session;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, is_supported_image};
pub use encode::encode_image;
pub use sampler::{render_caption, sample_color};
pub use session::JsEditorSession;
pub use transform::{center_crop, flip_image, resize_image, rotate_image};
pub use types::{JsExport, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
///
/// Installs the console logger at the default level. A session created
/// with an explicit `log_level` adjusts it afterwards.
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(LogLevel::default().to_level_filter());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
