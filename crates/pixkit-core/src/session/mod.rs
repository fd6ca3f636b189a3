//! The editor session: one working image, one active tool, and the
//! parameters each tool edits.
//!
//! # State machine
//!
//! ```text
//! NoImage --load--> Editing(initial_tool)
//! Editing(t) --select_tool(u)--> Editing(u)
//! Editing(t) --load--> Editing(t)          (source replaced)
//! any --reset--> NoImage
//! ```
//!
//! Destructive edits (resize, crop, rotate, flip) go through
//! [`EditorSession::begin_edit`] and [`EditorSession::complete_edit`]. Only
//! one edit may be pending at a time; a second `begin_edit` is rejected with
//! [`EditError::OperationInProgress`] and leaves the session untouched. The
//! current bitmap is only ever replaced as a whole, after the new one has
//! been fully computed.

mod params;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::config::{AspectAnchor, EditorConfig};
use crate::decode::{BitmapStore, DecodeError, Dimensions, RasterImage};
use crate::encode::{encode, EncodeError, Export, ExportConfig, ExportFormat};
use crate::overlay::{render_overlay, MemeParams, RenderError};
use crate::sampler::{self, DisplayPoint, DisplaySize, SampleError, SampledColor};
use crate::transform::{self, CropRatio, FlipAxis, TransformError};

pub use params::ResizeParams;

/// The editing tools offered by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Resize,
    Crop,
    Rotate,
    Meme,
    Compress,
    Convert,
    Picker,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Resize,
        Tool::Crop,
        Tool::Rotate,
        Tool::Meme,
        Tool::Compress,
        Tool::Convert,
        Tool::Picker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Resize => "resize",
            Tool::Crop => "crop",
            Tool::Rotate => "rotate",
            Tool::Meme => "meme",
            Tool::Compress => "compress",
            Tool::Convert => "convert",
            Tool::Picker => "picker",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == wanted)
            .ok_or_else(|| EditError::UnknownTool(s.to_string()))
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoImage,
    Editing(Tool),
}

/// A destructive edit, described before it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOp {
    Resize { width: u32, height: u32 },
    Crop(CropRatio),
    /// Degrees, positive is clockwise.
    Rotate(f64),
    Flip(FlipAxis),
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Resize { width, height } => write!(f, "resize to {width}x{height}"),
            EditOp::Crop(ratio) => write!(f, "crop to {}", ratio.label()),
            EditOp::Rotate(degrees) => write!(f, "rotate {degrees}\u{b0}"),
            EditOp::Flip(FlipAxis::Horizontal) => f.write_str("flip horizontal"),
            EditOp::Flip(FlipAxis::Vertical) => f.write_str("flip vertical"),
        }
    }
}

/// Handle for a pending edit, returned by [`EditorSession::begin_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditTicket(u64);

impl EditTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingEdit {
    ticket: EditTicket,
    op: EditOp,
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("No image loaded")]
    NoImage,

    #[error("Another edit is still in progress")]
    OperationInProgress,

    #[error("Edit ticket {0} is not pending")]
    UnknownTicket(u64),

    #[error("Unknown tool: {0:?}")]
    UnknownTool(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// An image editing session owned by a single caller.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    store: BitmapStore,
    active_tool: Tool,
    resize: ResizeParams,
    meme: MemeParams,
    export: ExportConfig,
    pending: Option<PendingEdit>,
    next_ticket: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        Self {
            store: BitmapStore::new(),
            active_tool: config.initial_tool,
            resize: ResizeParams::default(),
            meme: MemeParams::default(),
            export: config.export,
            pending: None,
            next_ticket: 1,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.store.is_loaded() {
            SessionState::Editing(self.active_tool)
        } else {
            SessionState::NoImage
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn current(&self) -> Option<&RasterImage> {
        self.store.current()
    }

    pub fn original_dimensions(&self) -> Option<Dimensions> {
        self.store.original_dimensions()
    }

    pub fn resize_params(&self) -> ResizeParams {
        self.resize
    }

    pub fn meme(&self) -> &MemeParams {
        &self.meme
    }

    pub fn export_config(&self) -> ExportConfig {
        self.export
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending.is_some()
    }

    fn current_or_err(&self) -> Result<&RasterImage, EditError> {
        self.store.current().ok_or(EditError::NoImage)
    }

    fn ensure_idle(&self) -> Result<(), EditError> {
        match self.pending {
            Some(pending) => {
                log::warn!(
                    "rejected: {} (ticket {}) is still pending",
                    pending.op,
                    pending.ticket.id()
                );
                Err(EditError::OperationInProgress)
            }
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Loading and tools
    // ------------------------------------------------------------------

    /// Decode `bytes` as the new source image.
    ///
    /// From `NoImage` this enters `Editing(initial_tool)`; while editing it
    /// replaces the source and keeps the active tool. On failure the session
    /// is unchanged.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Dimensions, EditError> {
        self.ensure_idle()?;

        let was_loaded = self.store.is_loaded();
        let dims = self.store.load(bytes)?.dimensions();
        if !was_loaded {
            self.active_tool = self.config.initial_tool;
        }
        self.resize.seed(dims);

        log::debug!("loaded {}x{} image ({} bytes)", dims.width, dims.height, bytes.len());
        Ok(dims)
    }

    /// Switch tools. Never touches the bitmap.
    pub fn select_tool(&mut self, tool: Tool) {
        if self.active_tool != tool {
            log::debug!("tool {} -> {}", self.active_tool, tool);
        }
        self.active_tool = tool;
    }

    /// "Start over": drop the image, any pending edit and the per-image
    /// parameters.
    pub fn reset(&mut self) {
        self.store.clear();
        self.pending = None;
        self.resize = ResizeParams::default();
        self.meme = MemeParams::default();
        self.active_tool = self.config.initial_tool;
        log::debug!("session reset");
    }

    // ------------------------------------------------------------------
    // Resize form
    // ------------------------------------------------------------------

    fn aspect_ratio(&self) -> Option<f64> {
        let dims = match self.config.aspect_anchor {
            AspectAnchor::Original => self.store.original_dimensions(),
            AspectAnchor::Current => self.store.current().map(RasterImage::dimensions),
        }?;
        (dims.height > 0).then(|| dims.aspect_ratio())
    }

    pub fn set_resize_width(&mut self, width: u32) {
        let ratio = self.aspect_ratio();
        self.resize.set_width(width, ratio);
    }

    pub fn set_resize_height(&mut self, height: u32) {
        let ratio = self.aspect_ratio();
        self.resize.set_height(height, ratio);
    }

    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.resize.lock_aspect = lock;
    }

    // ------------------------------------------------------------------
    // Destructive edits
    // ------------------------------------------------------------------

    /// Reserve the session for `op`.
    ///
    /// # Errors
    ///
    /// `OperationInProgress` if another edit is pending, `NoImage` if there is
    /// nothing to edit. Neither changes any state.
    pub fn begin_edit(&mut self, op: EditOp) -> Result<EditTicket, EditError> {
        self.ensure_idle()?;
        self.current_or_err()?;

        let ticket = EditTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(PendingEdit { ticket, op });

        log::debug!("begin {} (ticket {})", op, ticket.id());
        Ok(ticket)
    }

    /// Run the pending edit and swap its result in as the current bitmap.
    ///
    /// The pending slot is released whether or not the transform succeeds.
    /// On failure the current bitmap is left as it was.
    pub fn complete_edit(&mut self, ticket: EditTicket) -> Result<Dimensions, EditError> {
        let pending = self.take_pending(ticket)?;
        let source = self.current_or_err()?;

        let result = match pending.op {
            EditOp::Resize { width, height } => {
                transform::resize(source, width, height, self.config.resize_filter)
            }
            EditOp::Crop(ratio) => transform::center_crop(source, ratio.value()),
            EditOp::Rotate(degrees) => transform::rotate(source, degrees, self.config.rotate_filter),
            EditOp::Flip(axis) => transform::flip(source, axis),
        };

        let image = result.inspect_err(|e| {
            log::warn!("{} failed: {}", pending.op, e);
        })?;

        let dims = image.dimensions();
        self.store.replace(image);
        self.resize.seed(dims);

        log::debug!("{} done, now {}x{}", pending.op, dims.width, dims.height);
        Ok(dims)
    }

    /// Abandon a pending edit without touching the bitmap.
    pub fn cancel_edit(&mut self, ticket: EditTicket) -> Result<(), EditError> {
        let pending = self.take_pending(ticket)?;
        log::debug!("cancelled {} (ticket {})", pending.op, ticket.id());
        Ok(())
    }

    fn take_pending(&mut self, ticket: EditTicket) -> Result<PendingEdit, EditError> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                Ok(pending)
            }
            _ => Err(EditError::UnknownTicket(ticket.id())),
        }
    }

    fn run_edit(&mut self, op: EditOp) -> Result<Dimensions, EditError> {
        let ticket = self.begin_edit(op)?;
        self.complete_edit(ticket)
    }

    /// Resize to the dimensions in the resize form.
    pub fn apply_resize(&mut self) -> Result<Dimensions, EditError> {
        let ResizeParams { width, height, .. } = self.resize;
        self.run_edit(EditOp::Resize { width, height })
    }

    pub fn apply_crop(&mut self, ratio: CropRatio) -> Result<Dimensions, EditError> {
        self.run_edit(EditOp::Crop(ratio))
    }

    pub fn rotate_image(&mut self, degrees: f64) -> Result<Dimensions, EditError> {
        self.run_edit(EditOp::Rotate(degrees))
    }

    pub fn flip_image(&mut self, axis: FlipAxis) -> Result<Dimensions, EditError> {
        self.run_edit(EditOp::Flip(axis))
    }

    // ------------------------------------------------------------------
    // Caption overlay
    // ------------------------------------------------------------------

    pub fn set_meme(&mut self, params: MemeParams) {
        self.meme = params;
    }

    pub fn set_top_text(&mut self, text: impl Into<String>) {
        self.meme.top_text = text.into();
    }

    pub fn set_bottom_text(&mut self, text: impl Into<String>) {
        self.meme.bottom_text = text.into();
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.meme.fill = color;
    }

    pub fn set_stroke_color(&mut self, color: Rgb) {
        self.meme.stroke = color;
    }

    /// The frame the user sees: the current bitmap, plus captions when the
    /// meme tool is active.
    pub fn render(&self) -> Result<Cow<'_, RasterImage>, EditError> {
        let current = self.current_or_err()?;
        match self.active_tool {
            Tool::Meme if !self.meme.is_blank() => {
                let style = self.config.overlay_style();
                Ok(Cow::Owned(render_overlay(current, &self.meme, &style)?))
            }
            Tool::Meme
            | Tool::Resize
            | Tool::Crop
            | Tool::Rotate
            | Tool::Compress
            | Tool::Convert
            | Tool::Picker => Ok(Cow::Borrowed(current)),
        }
    }

    // ------------------------------------------------------------------
    // Picker and export
    // ------------------------------------------------------------------

    /// Pick the color under a point on the displayed image.
    pub fn sample_color(
        &self,
        point: DisplayPoint,
        display: DisplaySize,
    ) -> Result<SampledColor, EditError> {
        let current = self.current_or_err()?;
        Ok(sampler::sample_color(current, point, display)?)
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export.format = format;
    }

    /// Store a new export quality, clamped to `[0.1, 1.0]`.
    pub fn set_export_quality(&mut self, quality: f32) {
        self.export.set_quality(quality);
    }

    /// Encode the rendered frame with the current export settings.
    pub fn export(&self) -> Result<Export, EditError> {
        let frame = self.render()?;
        let ExportConfig { format, quality } = self.export;
        let bytes = encode(&frame, format, quality)?;
        Ok(Export::new(bytes, format))
    }
}
