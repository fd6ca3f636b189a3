//! Meme-style caption overlay.
//!
//! The overlay is non-destructive: [`render_overlay`] composites top and
//! bottom captions onto a copy of the base image and returns it. The stored
//! bitmap is never touched, so the caption can be re-rendered from the
//! current image on every parameter change.
//!
//! # Layout
//!
//! - Font size is `floor(width / 10)`
//! - Captions are upper-cased before measuring
//! - Both captions are centered on `width / 2`; the top caption hangs from
//!   `inset`, the bottom caption sits on `height - inset`
//! - Each caption is drawn twice: a stroke pass of width `font_size / 15`,
//!   then the fill on top of it

mod glyphs;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::decode::RasterImage;

pub use glyphs::{glyph_blocks, measure, GlyphBlock, GLYPH_SIZE};

/// Default distance between a caption and the image edge.
pub const DEFAULT_INSET: u32 = 10;

/// Errors from overlay rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The base bitmap cannot be bound as a drawing surface.
    #[error("Rendering surface unavailable for {width}x{height} image")]
    ContextUnavailable { width: u32, height: u32 },
}

/// Caption text and colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemeParams {
    pub top_text: String,
    pub bottom_text: String,
    pub fill: Rgb,
    pub stroke: Rgb,
}

impl Default for MemeParams {
    fn default() -> Self {
        Self {
            top_text: String::new(),
            bottom_text: String::new(),
            fill: Rgb::WHITE,
            stroke: Rgb::BLACK,
        }
    }
}

impl MemeParams {
    /// True when neither caption has any text.
    pub fn is_blank(&self) -> bool {
        self.top_text.is_empty() && self.bottom_text.is_empty()
    }
}

/// Layout knobs that do not change per keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Distance from the top/bottom edge to the caption box, in pixels.
    pub inset: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            inset: DEFAULT_INSET,
        }
    }
}

/// Which edge a caption is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPosition {
    Top,
    Bottom,
}

/// Where a caption lands on an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    /// Left edge of the glyph box; may be negative when the text is wider
    /// than the image.
    pub x: i64,
    /// Top edge of the glyph box.
    pub y: i64,
    pub width: u64,
    pub height: u32,
    /// Glyph scale factor (8 pixels per unit).
    pub scale: u32,
    /// Stroke width before rounding, `font_size / 15`.
    pub stroke_width: f64,
}

/// Font size used for an image of the given width.
pub fn font_size(image_width: u32) -> u32 {
    image_width / 10
}

/// Compute the placement of a caption. Returns `None` for empty text or an
/// image too narrow to have a non-zero font size.
pub fn layout_caption(
    text: &str,
    image_width: u32,
    image_height: u32,
    position: CaptionPosition,
    style: &OverlayStyle,
) -> Option<CaptionLayout> {
    let size = font_size(image_width);
    if text.is_empty() || size == 0 {
        return None;
    }

    let scale = ((size as f64 / GLYPH_SIZE as f64).round() as u32).max(1);
    let (width, height) = measure(&text.to_uppercase(), scale);

    let x = image_width as i64 / 2 - (width / 2) as i64;
    let y = match position {
        CaptionPosition::Top => style.inset as i64,
        CaptionPosition::Bottom => image_height as i64 - style.inset as i64 - height as i64,
    };

    Some(CaptionLayout {
        x,
        y,
        width,
        height,
        scale,
        stroke_width: size as f64 / 15.0,
    })
}

/// Composite both captions onto a copy of `base`.
///
/// # Errors
///
/// Returns `RenderError::ContextUnavailable` if `base` is empty or its pixel
/// buffer does not match its dimensions.
pub fn render_overlay(
    base: &RasterImage,
    params: &MemeParams,
    style: &OverlayStyle,
) -> Result<RasterImage, RenderError> {
    if base.is_empty() || !base.is_consistent() {
        return Err(RenderError::ContextUnavailable {
            width: base.width,
            height: base.height,
        });
    }

    let mut canvas = base.clone();
    for (text, position) in [
        (&params.top_text, CaptionPosition::Top),
        (&params.bottom_text, CaptionPosition::Bottom),
    ] {
        if let Some(layout) = layout_caption(text, base.width, base.height, position, style) {
            draw_caption(&mut canvas, &text.to_uppercase(), &layout, params);
        }
    }

    Ok(canvas)
}

fn draw_caption(canvas: &mut RasterImage, text: &str, layout: &CaptionLayout, params: &MemeParams) {
    // Stroke is centered on the glyph outline, so half of it shows outside
    let radius = ((layout.stroke_width / 2.0).round() as i64).max(1);
    let blocks: Vec<GlyphBlock> = glyph_blocks(
        text,
        layout.scale,
        layout.x,
        layout.y,
        -radius,
        canvas.width as i64 + radius,
    )
    .collect();

    let stroke = params.stroke.to_rgba();
    for block in &blocks {
        stroke_block(canvas, block, radius, stroke);
    }

    let fill = params.fill.to_rgba();
    for block in &blocks {
        let end_x = block.x + block.size as i64;
        let end_y = block.y + block.size as i64;
        for y in clamp_span(block.y, end_y, canvas.height) {
            for x in clamp_span(block.x, end_x, canvas.width) {
                put_pixel(canvas, x, y, fill);
            }
        }
    }
}

/// Paint every pixel within `radius` of `block`.
fn stroke_block(canvas: &mut RasterImage, block: &GlyphBlock, radius: i64, rgba: [u8; 4]) {
    let last_x = block.x + block.size as i64 - 1;
    let last_y = block.y + block.size as i64 - 1;
    let limit = radius * radius;

    for y in clamp_span(block.y - radius, last_y + radius + 1, canvas.height) {
        let dy = distance_outside(y as i64, block.y, last_y);
        for x in clamp_span(block.x - radius, last_x + radius + 1, canvas.width) {
            let dx = distance_outside(x as i64, block.x, last_x);
            if dx * dx + dy * dy <= limit {
                put_pixel(canvas, x, y, rgba);
            }
        }
    }
}

#[inline]
fn distance_outside(v: i64, first: i64, last: i64) -> i64 {
    if v < first {
        first - v
    } else if v > last {
        v - last
    } else {
        0
    }
}

/// The part of `start..end` that lies inside `0..len`.
#[inline]
fn clamp_span(start: i64, end: i64, len: u32) -> std::ops::Range<usize> {
    let start = start.clamp(0, len as i64) as usize;
    let end = end.clamp(0, len as i64) as usize;
    start..end.max(start)
}

#[inline]
fn put_pixel(canvas: &mut RasterImage, x: usize, y: usize, rgba: [u8; 4]) {
    let idx = (y * canvas.width as usize + x) * 4;
    canvas.pixels[idx..idx + 4].copy_from_slice(&rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [u8; 4] = [40, 80, 120, 255];

    fn base_image() -> RasterImage {
        RasterImage::filled(400, 300, BASE)
    }

    fn params(top: &str, bottom: &str) -> MemeParams {
        MemeParams {
            top_text: top.to_string(),
            bottom_text: bottom.to_string(),
            ..MemeParams::default()
        }
    }

    fn changed_rows(base: &RasterImage, rendered: &RasterImage) -> Vec<u32> {
        (0..base.height)
            .filter(|&y| (0..base.width).any(|x| base.pixel(x, y) != rendered.pixel(x, y)))
            .collect()
    }

    #[test]
    fn test_font_size_is_tenth_of_width() {
        assert_eq!(font_size(400), 40);
        assert_eq!(font_size(99), 9);
        assert_eq!(font_size(5), 0);
    }

    #[test]
    fn test_layout_top_is_centered_and_inset() {
        let layout =
            layout_caption("hi", 400, 300, CaptionPosition::Top, &OverlayStyle::default()).unwrap();

        assert_eq!(layout.scale, 5);
        assert_eq!((layout.width, layout.height), (80, 40));
        assert_eq!(layout.x, 160);
        assert_eq!(layout.y, 10);
    }

    #[test]
    fn test_layout_bottom_sits_on_inset() {
        let layout =
            layout_caption("hi", 400, 300, CaptionPosition::Bottom, &OverlayStyle::default())
                .unwrap();
        assert_eq!(layout.y + layout.height as i64, 290);
    }

    #[test]
    fn test_layout_empty_text() {
        let style = OverlayStyle::default();
        assert!(layout_caption("", 400, 300, CaptionPosition::Top, &style).is_none());
        assert!(layout_caption("x", 9, 300, CaptionPosition::Top, &style).is_none());
    }

    #[test]
    fn test_text_is_uppercased() {
        let lower = render_overlay(&base_image(), &params("meme", ""), &OverlayStyle::default());
        let upper = render_overlay(&base_image(), &params("MEME", ""), &OverlayStyle::default());
        assert_eq!(lower.unwrap(), upper.unwrap());
    }

    #[test]
    fn test_blank_params_leave_image_untouched() {
        let base = base_image();
        let rendered = render_overlay(&base, &MemeParams::default(), &OverlayStyle::default());
        assert_eq!(rendered.unwrap(), base);
    }

    #[test]
    fn test_only_bottom_caption_rendered() {
        let base = base_image();
        let rendered =
            render_overlay(&base, &params("", "bottom"), &OverlayStyle::default()).unwrap();

        let rows = changed_rows(&base, &rendered);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y >= 150), "top half must be untouched");
    }

    #[test]
    fn test_only_top_caption_rendered() {
        let base = base_image();
        let rendered = render_overlay(&base, &params("top", ""), &OverlayStyle::default()).unwrap();

        let rows = changed_rows(&base, &rendered);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y < 150), "bottom half must be untouched");
    }

    #[test]
    fn test_base_is_not_mutated() {
        let base = base_image();
        let copy = base.clone();
        let _ = render_overlay(&base, &params("a", "b"), &OverlayStyle::default()).unwrap();
        assert_eq!(base, copy);
    }

    #[test]
    fn test_fill_change_only_touches_fill_pixels() {
        let base = base_image();
        let style = OverlayStyle::default();
        let white = params("top", "bottom");
        let mut red = white.clone();
        red.fill = Rgb::new(255, 0, 0);

        let a = render_overlay(&base, &white, &style).unwrap();
        let b = render_overlay(&base, &red, &style).unwrap();

        let mut differing = 0;
        for y in 0..base.height {
            for x in 0..base.width {
                let (pa, pb) = (a.pixel(x, y), b.pixel(x, y));
                if pa != pb {
                    differing += 1;
                    assert_eq!(pa, Rgb::WHITE.to_rgba());
                    assert_eq!(pb, [255, 0, 0, 255]);
                } else if pa != BASE {
                    // Untouched by the fill change: must be stroke
                    assert_eq!(pa, Rgb::BLACK.to_rgba());
                }
            }
        }
        assert!(differing > 0);
    }

    #[test]
    fn test_stroke_drawn_under_fill() {
        let base = base_image();
        let rendered = render_overlay(&base, &params("I", ""), &OverlayStyle::default()).unwrap();

        let pixels: Vec<[u8; 4]> = (0..base.height)
            .flat_map(|y| (0..base.width).map(move |x| (x, y)))
            .map(|(x, y)| rendered.pixel(x, y))
            .collect();
        assert!(pixels.contains(&Rgb::WHITE.to_rgba()));
        assert!(pixels.contains(&Rgb::BLACK.to_rgba()));
    }

    #[test]
    fn test_wide_text_is_clipped_not_panicking() {
        let base = RasterImage::filled(40, 40, BASE);
        let long = "a very long caption that overflows";
        let rendered = render_overlay(&base, &params(long, long), &OverlayStyle::default());
        assert!(rendered.is_ok());
    }

    #[test]
    fn test_long_caption_on_wide_image() {
        let base = RasterImage::filled(40_000, 20, BASE);
        let long = "x".repeat(300);
        let rendered = render_overlay(&base, &params(&long, ""), &OverlayStyle::default()).unwrap();
        assert_eq!((rendered.width, rendered.height), (40_000, 20));
        assert_ne!(rendered, base);
    }

    #[test]
    fn test_layout_width_of_long_caption() {
        let long = "x".repeat(300);
        let layout =
            layout_caption(&long, 40_000, 20, CaptionPosition::Top, &OverlayStyle::default())
                .unwrap();
        assert_eq!(layout.width, 1_200_000);
        assert_eq!(layout.x, 20_000 - 600_000);
    }

    #[test]
    fn test_malformed_base_is_context_unavailable() {
        let base = RasterImage {
            width: 10,
            height: 10,
            pixels: vec![0; 3],
        };
        assert_eq!(
            render_overlay(&base, &params("a", ""), &OverlayStyle::default()),
            Err(RenderError::ContextUnavailable {
                width: 10,
                height: 10
            })
        );
    }
}
