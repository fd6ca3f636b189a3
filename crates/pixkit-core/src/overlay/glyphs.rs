//! Bitmap glyph rasterization for captions.
//!
//! Glyphs come from the 8x8 `font8x8` tables and are scaled up with nearest
//! neighbour, so every covered font cell becomes a solid square block. Blocks
//! are produced lazily per glyph, and glyphs outside the visible columns are
//! skipped, so a caption far wider than the image costs no more than the part
//! that lands on it.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

/// Cell size of one glyph at scale 1.
pub const GLYPH_SIZE: u32 = 8;

/// One covered font cell, scaled to a `size` x `size` square at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBlock {
    pub x: i64,
    pub y: i64,
    pub size: u32,
}

fn glyph_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Size of `text` rendered at `scale`, in pixels. Saturates instead of
/// overflowing for absurdly long text.
pub fn measure(text: &str, scale: u32) -> (u64, u32) {
    let chars = text.chars().count() as u64;
    let advance = GLYPH_SIZE as u64 * scale as u64;
    (chars.saturating_mul(advance), GLYPH_SIZE.saturating_mul(scale))
}

/// Covered blocks of `text` laid out from `(x, y)`.
///
/// Glyphs whose cell does not overlap the columns `visible_start..visible_end`
/// are skipped entirely.
pub fn glyph_blocks(
    text: &str,
    scale: u32,
    x: i64,
    y: i64,
    visible_start: i64,
    visible_end: i64,
) -> impl Iterator<Item = GlyphBlock> + '_ {
    let scale = scale.max(1);
    let step = scale as i64;
    let advance = GLYPH_SIZE as i64 * step;

    text.chars()
        .enumerate()
        .filter_map(move |(index, ch)| {
            let origin = x.saturating_add((index as i64).saturating_mul(advance));
            let visible = origin < visible_end && origin.saturating_add(advance) > visible_start;
            visible.then_some((origin, ch))
        })
        .flat_map(move |(origin, ch)| {
            glyph_rows(ch)
                .into_iter()
                .enumerate()
                .flat_map(move |(row, bits)| {
                    // Bit 0 is the leftmost column
                    (0..GLYPH_SIZE)
                        .filter(move |col| (bits >> col) & 1 == 1)
                        .map(move |col| GlyphBlock {
                            x: origin + col as i64 * step,
                            y: y + row as i64 * step,
                            size: scale,
                        })
                })
        })
}
