//! Pixkit Core - image editor library
//!
//! This crate provides the raster pipeline behind the Pixkit browser editor:
//! decoding, geometric transforms, caption overlays, color picking, export
//! encoding, and the [`EditorSession`] state machine that ties them together.
//!
//! All pixel data is RGBA8 in a [`RasterImage`]. Transforms return new images
//! rather than mutating their input.

pub mod color;
pub mod config;
pub mod decode;
pub mod encode;
pub mod overlay;
pub mod sampler;
pub mod session;
pub mod transform;

pub use color::Rgb;
pub use config::{AspectAnchor, EditorConfig, LogLevel};
pub use decode::{BitmapStore, DecodeError, Dimensions, RasterImage};
pub use encode::{encode, EncodeError, Export, ExportConfig, ExportFormat};
pub use overlay::{render_overlay, MemeParams, OverlayStyle, RenderError};
pub use sampler::{sample_color, DisplayPoint, DisplaySize, SampleError, SampledColor};
pub use session::{
    EditError, EditOp, EditTicket, EditorSession, ResizeParams, SessionState, Tool,
};
pub use transform::{
    center_crop, compute_rotated_bounds, flip, resize, rotate, CropRatio, FilterType, FlipAxis,
    InterpolationFilter, TransformError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_end_to_end() {
        let source = RasterImage::filled(64, 32, [200, 50, 25, 255]);
        let png = encode(&source, ExportFormat::Png, 1.0).unwrap();

        let mut session = EditorSession::default();
        session.load(&png).unwrap();
        session.rotate_image(90.0).unwrap();
        session.apply_crop(CropRatio::SQUARE).unwrap();
        session.flip_image(FlipAxis::Vertical).unwrap();

        assert_eq!(session.current().unwrap().dimensions(), Dimensions::new(32, 32));

        let export = session.export().unwrap();
        assert_eq!(export.file_name, "edited-image.jpeg");
        assert!(!export.bytes.is_empty());
    }
}
