//! Editor configuration.
//!
//! Every field has a default, so a host may pass a partial object (or
//! nothing at all) and get a working editor.

use serde::{Deserialize, Serialize};

use crate::encode::{clamp_quality, ExportConfig};
use crate::overlay::{OverlayStyle, DEFAULT_INSET};
use crate::session::Tool;
use crate::transform::{FilterType, InterpolationFilter};

/// Which dimensions the locked aspect ratio is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectAnchor {
    /// The first image loaded into the session.
    #[default]
    Original,
    /// The current bitmap, so the ratio follows crops and rotations.
    Current,
}

/// Verbosity of the `log` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for an [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tool selected when the first image is loaded.
    pub initial_tool: Tool,
    pub export: ExportConfig,
    pub resize_filter: FilterType,
    pub rotate_filter: InterpolationFilter,
    /// Caption distance from the top and bottom edges, in pixels.
    pub overlay_inset: u32,
    pub aspect_anchor: AspectAnchor,
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_tool: Tool::Resize,
            export: ExportConfig::default(),
            resize_filter: FilterType::default(),
            rotate_filter: InterpolationFilter::default(),
            overlay_inset: DEFAULT_INSET,
            aspect_anchor: AspectAnchor::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Normalize out-of-range values. Nothing is rejected.
    pub fn validate(&mut self) {
        self.export.quality = clamp_quality(self.export.quality);
    }

    /// Same as [`validate`](Self::validate), by value.
    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            inset: self.overlay_inset,
        }
    }
}
