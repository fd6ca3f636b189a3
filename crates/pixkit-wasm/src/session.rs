//! Stateful editor session for JavaScript.
//!
//! `JsEditorSession` wraps the core `EditorSession`, translating string tool,
//! axis and format names and hex colors at the boundary.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsEditorSession({ initial_tool: 'resize' });
//! session.load(bytes);
//! session.set_resize_width(800);
//! session.apply_resize();
//! session.select_tool('meme');
//! session.set_top_text('hello');
//! const frame = session.render();
//! const file = session.export();
//! ```

use pixkit_core::color::Rgb;
use pixkit_core::config::EditorConfig;
use pixkit_core::encode::ExportFormat;
use pixkit_core::sampler::{DisplayPoint, DisplaySize};
use pixkit_core::session::{EditOp, EditTicket, EditorSession, SessionState, Tool};
use pixkit_core::transform::{CropRatio, FlipAxis};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::logger;
use crate::types::{js_error, JsExport, JsRasterImage};

/// A destructive edit as described from JavaScript, e.g.
/// `{ kind: 'rotate', degrees: 90 }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JsEditOp {
    Resize { width: u32, height: u32 },
    Crop { width: u32, height: u32 },
    Rotate { degrees: f64 },
    Flip { axis: FlipAxis },
}

impl From<JsEditOp> for EditOp {
    fn from(op: JsEditOp) -> Self {
        match op {
            JsEditOp::Resize { width, height } => EditOp::Resize { width, height },
            JsEditOp::Crop { width, height } => EditOp::Crop(CropRatio::new(width, height)),
            JsEditOp::Rotate { degrees } => EditOp::Rotate(degrees),
            JsEditOp::Flip { axis } => EditOp::Flip(axis),
        }
    }
}

/// Editor session handle owned by the page.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
    ticket: Option<EditTicket>,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Create a session. `config` may be `undefined` or a partial
    /// `EditorConfig` object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditorSession, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?
        };
        logger::install(config.log_level.to_level_filter());
        Ok(Self::with_config(config))
    }

    /// `"none"` before an image is loaded, otherwise the active tool name.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            SessionState::NoImage => "none".to_string(),
            SessionState::Editing(tool) => tool.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.current().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn active_tool(&self) -> String {
        self.inner.active_tool().to_string()
    }

    /// Width of the current bitmap, 0 when nothing is loaded.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.current().map_or(0, |img| img.width)
    }

    /// Height of the current bitmap, 0 when nothing is loaded.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.current().map_or(0, |img| img.height)
    }

    /// Decode and load an image file.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load(bytes).map(|_| ()).map_err(js_error)
    }

    pub fn select_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool: Tool = tool.parse().map_err(js_error)?;
        self.inner.select_tool(tool);
        Ok(())
    }

    /// "Start over": drop the image and go back to the upload state.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.ticket = None;
    }

    // Resize form

    #[wasm_bindgen(getter)]
    pub fn resize_width(&self) -> u32 {
        self.inner.resize_params().width
    }

    #[wasm_bindgen(getter)]
    pub fn resize_height(&self) -> u32 {
        self.inner.resize_params().height
    }

    #[wasm_bindgen(getter)]
    pub fn lock_aspect(&self) -> bool {
        self.inner.resize_params().lock_aspect
    }

    pub fn set_resize_width(&mut self, width: u32) {
        self.inner.set_resize_width(width);
    }

    pub fn set_resize_height(&mut self, height: u32) {
        self.inner.set_resize_height(height);
    }

    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.inner.set_lock_aspect(lock);
    }

    // Destructive edits

    pub fn apply_resize(&mut self) -> Result<(), JsValue> {
        self.inner.apply_resize().map(|_| ()).map_err(js_error)
    }

    /// Center-crop to `ratio_width:ratio_height`, e.g. `(16, 9)`.
    pub fn apply_crop(&mut self, ratio_width: u32, ratio_height: u32) -> Result<(), JsValue> {
        self.inner
            .apply_crop(CropRatio::new(ratio_width, ratio_height))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Rotate by `degrees`, positive is clockwise.
    pub fn rotate_image(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.inner.rotate_image(degrees).map(|_| ()).map_err(js_error)
    }

    /// Mirror the image; `axis` is `"horizontal"` or `"vertical"`.
    pub fn flip_image(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis: FlipAxis = axis.parse().map_err(js_error)?;
        self.inner.flip_image(axis).map(|_| ()).map_err(js_error)
    }

    /// Reserve the session for an edit; returns the ticket id to pass to
    /// `complete_edit` or `cancel_edit`.
    pub fn begin_edit(&mut self, op: JsValue) -> Result<u32, JsValue> {
        let op: JsEditOp = serde_wasm_bindgen::from_value(op)
            .map_err(|e| JsValue::from_str(&format!("Invalid edit: {}", e)))?;
        self.begin(op.into()).map_err(js_error)
    }

    pub fn complete_edit(&mut self, ticket: u32) -> Result<(), JsValue> {
        let ticket = self.claim(ticket).map_err(js_error)?;
        self.inner.complete_edit(ticket).map(|_| ()).map_err(js_error)
    }

    pub fn cancel_edit(&mut self, ticket: u32) -> Result<(), JsValue> {
        let ticket = self.claim(ticket).map_err(js_error)?;
        self.inner.cancel_edit(ticket).map_err(js_error)
    }

    // Caption overlay

    pub fn set_top_text(&mut self, text: &str) {
        self.inner.set_top_text(text);
    }

    pub fn set_bottom_text(&mut self, text: &str) {
        self.inner.set_bottom_text(text);
    }

    /// Set the caption fill from a hex string such as `#ffffff`.
    pub fn set_fill_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color: Rgb = hex.parse().map_err(js_error)?;
        self.inner.set_fill_color(color);
        Ok(())
    }

    /// Set the caption outline from a hex string such as `#000000`.
    pub fn set_stroke_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color: Rgb = hex.parse().map_err(js_error)?;
        self.inner.set_stroke_color(color);
        Ok(())
    }

    /// The frame to draw: the current bitmap, with captions when the meme
    /// tool is active.
    pub fn render(&self) -> Result<JsRasterImage, JsValue> {
        self.inner
            .render()
            .map(|frame| JsRasterImage::from_raster(frame.into_owned()))
            .map_err(js_error)
    }

    // Picker and export

    /// Color under a click, as `#rrggbb`.
    pub fn sample_color(
        &self,
        x: f64,
        y: f64,
        display_width: f64,
        display_height: f64,
    ) -> Result<String, JsValue> {
        self.inner
            .sample_color(
                DisplayPoint::new(x, y),
                DisplaySize::new(display_width, display_height),
            )
            .map(|color| color.hex)
            .map_err(js_error)
    }

    /// Accepts `jpeg`, `png`, `webp` or their MIME types.
    pub fn set_export_format(&mut self, format: &str) -> Result<(), JsValue> {
        let format: ExportFormat = format.parse().map_err(js_error)?;
        self.inner.set_export_format(format);
        Ok(())
    }

    pub fn set_export_quality(&mut self, quality: f32) {
        self.inner.set_export_quality(quality);
    }

    #[wasm_bindgen(getter)]
    pub fn export_quality(&self) -> f32 {
        self.inner.export_config().quality
    }

    #[wasm_bindgen(getter)]
    pub fn export_mime(&self) -> String {
        self.inner.export_config().format.mime().to_string()
    }

    pub fn export(&self) -> Result<JsExport, JsValue> {
        self.inner
            .export()
            .map(JsExport::from_export)
            .map_err(js_error)
    }
}

impl JsEditorSession {
    pub(crate) fn with_config(config: EditorConfig) -> Self {
        Self {
            inner: EditorSession::new(config),
            ticket: None,
        }
    }

    fn begin(&mut self, op: EditOp) -> Result<u32, pixkit_core::EditError> {
        let ticket = self.inner.begin_edit(op)?;
        self.ticket = Some(ticket);
        Ok(ticket.id() as u32)
    }

    /// Match a ticket id from JavaScript against the pending ticket.
    fn claim(&mut self, id: u32) -> Result<EditTicket, pixkit_core::EditError> {
        match self.ticket {
            Some(ticket) if ticket.id() == id as u64 => {
                self.ticket = None;
                Ok(ticket)
            }
            _ => Err(pixkit_core::EditError::UnknownTicket(id as u64)),
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_undefined_config() {
        let s = JsEditorSession::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(s.state(), "none");
    }

    #[wasm_bindgen_test]
    fn test_new_with_partial_config() {
        let config = js_sys::Object::new();
        js_sys::Reflect::set(&config, &"initial_tool".into(), &"crop".into()).unwrap();
        let mut s = JsEditorSession::new(config.into()).unwrap();

        let png = pixkit_core::encode::encode_png(&[0, 0, 0, 255], 1, 1).unwrap();
        s.load(&png).unwrap();
        assert_eq!(s.active_tool(), "crop");
    }

    #[wasm_bindgen_test]
    fn test_operations_without_image_fail() {
        let mut s = JsEditorSession::new(JsValue::UNDEFINED).unwrap();
        assert!(s.apply_resize().is_err());
        assert!(s.render().is_err());
        assert!(s.export().is_err());
    }

    #[wasm_bindgen_test]
    fn test_begin_edit_from_js_object() {
        let mut s = JsEditorSession::new(JsValue::UNDEFINED).unwrap();
        let png = pixkit_core::encode::encode_png(&[0u8; 8], 2, 1).unwrap();
        s.load(&png).unwrap();

        let op = js_sys::Object::new();
        js_sys::Reflect::set(&op, &"kind".into(), &"rotate".into()).unwrap();
        js_sys::Reflect::set(&op, &"degrees".into(), &JsValue::from_f64(90.0)).unwrap();

        let ticket = s.begin_edit(op.into()).unwrap();
        assert!(s.apply_crop(1, 1).is_err());
        s.complete_edit(ticket).unwrap();
        assert_eq!((s.width(), s.height()), (1, 2));
    }

    #[wasm_bindgen_test]
    fn test_bad_names_rejected() {
        let mut s = JsEditorSession::new(JsValue::UNDEFINED).unwrap();
        assert!(s.select_tool("lasso").is_err());
        assert!(s.set_export_format("gif").is_err());
        assert!(s.set_fill_color("red").is_err());
    }
}
