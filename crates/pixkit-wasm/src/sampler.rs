//! Color picker and caption overlay bindings.

use crate::types::{js_error, JsRasterImage};
use pixkit_core::color::Rgb;
use pixkit_core::overlay::{self, MemeParams, OverlayStyle};
use pixkit_core::sampler::{self, DisplayPoint, DisplaySize};
use wasm_bindgen::prelude::*;

/// Pick the color under a click on the displayed image.
///
/// `x`/`y` are relative to the image's top-left corner in display pixels;
/// `display_width`/`display_height` are the size the image is shown at.
/// Returns a `#rrggbb` string.
#[wasm_bindgen]
pub fn sample_color(
    image: &JsRasterImage,
    x: f64,
    y: f64,
    display_width: f64,
    display_height: f64,
) -> Result<String, JsValue> {
    sampler::sample_color(
        &image.to_raster(),
        DisplayPoint::new(x, y),
        DisplaySize::new(display_width, display_height),
    )
    .map(|color| color.hex)
    .map_err(js_error)
}

/// Draw top and bottom captions onto a copy of `image`.
///
/// Colors are hex strings such as `#ffffff`.
#[wasm_bindgen]
pub fn render_caption(
    image: &JsRasterImage,
    top_text: &str,
    bottom_text: &str,
    fill: &str,
    stroke: &str,
) -> Result<JsRasterImage, JsValue> {
    let params = MemeParams {
        top_text: top_text.to_string(),
        bottom_text: bottom_text.to_string(),
        fill: fill.parse::<Rgb>().map_err(js_error)?,
        stroke: stroke.parse::<Rgb>().map_err(js_error)?,
    };

    overlay::render_overlay(&image.to_raster(), &params, &OverlayStyle::default())
        .map(JsRasterImage::from_raster)
        .map_err(js_error)
}
