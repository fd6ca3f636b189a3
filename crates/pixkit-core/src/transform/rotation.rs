//! Image rotation about the center.
//!
//! Quarter turns are exact pixel permutations. Any other angle expands the
//! canvas to the rotated bounding box and resamples with one of two filters:
//! - **Bilinear**: fast, used for interactive edits
//! - **Lanczos3**: sharper, for callers that want export quality
//!
//! # Algorithm
//!
//! Free rotation uses inverse mapping: for each output pixel center we find
//! the source position and interpolate. With y pointing down and a positive
//! angle θ turning the picture clockwise, the inverse transform is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the output pixel center relative to the output center.
//! Output pixels that map outside the source are transparent black.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::RasterImage;

/// Angles within this many degrees of a quarter turn are treated as exact.
const ANGLE_EPSILON: f64 = 0.001;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Interpolation filter for free rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation.
    Lanczos3,
}

/// A rotation reduced to either a quarter turn or a free angle.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Turn {
    Identity,
    Quarter,
    Half,
    ThreeQuarter,
    Free(f64),
}

impl Turn {
    fn classify(angle_degrees: f64) -> Self {
        let normalized = angle_degrees.rem_euclid(360.0);
        let near = |target: f64| (normalized - target).abs() < ANGLE_EPSILON;

        if near(0.0) || near(360.0) {
            Turn::Identity
        } else if near(90.0) {
            Turn::Quarter
        } else if near(180.0) {
            Turn::Half
        } else if near(270.0) {
            Turn::ThreeQuarter
        } else {
            Turn::Free(angle_degrees)
        }
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// The result is the smallest axis-aligned box that contains every corner of
/// the rotated `width x height` rectangle. The sign of the angle does not
/// matter.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match Turn::classify(angle_degrees) {
        Turn::Identity | Turn::Half => (width, height),
        Turn::Quarter | Turn::ThreeQuarter => (height, width),
        Turn::Free(angle) => {
            let angle_rad = angle.to_radians();
            let cos = angle_rad.cos().abs();
            let sin = angle_rad.sin().abs();

            let w = width as f64;
            let h = height as f64;

            // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
            let new_w = (w * cos + h * sin).ceil() as u32;
            let new_h = (w * sin + h * cos).ceil() as u32;

            (new_w.max(1), new_h.max(1))
        }
    }
}

/// Rotate an image about its center.
///
/// Positive angles rotate clockwise. `0` and `360` return an exact copy,
/// `90`, `-90` and `270` swap width and height without resampling.
///
/// # Errors
///
/// Returns `TransformError::InvalidAngle` for a non-finite angle and
/// `TransformError::MalformedSource` if the source buffer is the wrong length.
pub fn rotate(
    image: &RasterImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Result<RasterImage, TransformError> {
    if !angle_degrees.is_finite() {
        return Err(TransformError::InvalidAngle(angle_degrees));
    }
    if !image.is_consistent() {
        return Err(TransformError::MalformedSource {
            width: image.width,
            height: image.height,
        });
    }

    let turn = Turn::classify(angle_degrees);
    if turn == Turn::Identity {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or(TransformError::MalformedSource {
        width: image.width,
        height: image.height,
    })?;

    let rotated = match turn {
        Turn::Quarter => image::imageops::rotate90(&rgba),
        Turn::Half => image::imageops::rotate180(&rgba),
        Turn::ThreeQuarter => image::imageops::rotate270(&rgba),
        Turn::Identity => rgba,
        Turn::Free(angle) => return Ok(rotate_free(image, angle, filter)),
    };

    Ok(RasterImage::from_rgba_image(rotated))
}

fn rotate_free(image: &RasterImage, angle_degrees: f64, filter: InterpolationFilter) -> RasterImage {
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 4);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Continuous source position, shifted back to pixel-index space
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };
            output.extend_from_slice(&pixel);
        }
    }

    RasterImage::new(dst_w, dst_h, output)
}

#[inline]
fn get_pixel_f64(image: &RasterImage, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * 4;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

#[inline]
fn outside(image: &RasterImage, x: f64, y: f64) -> bool {
    x < -0.5 || y < -0.5 || x > image.width as f64 - 0.5 || y > image.height as f64 - 0.5
}

/// Sample a pixel using bilinear interpolation over the 4 nearest pixels.
///
/// Positions within half a pixel of the border are clamped to the edge.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if outside(image, x, y) {
        return TRANSPARENT;
    }

    let max_x = image.width as f64 - 1.0;
    let max_y = image.height as f64 - 1.0;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using a 6x6 Lanczos3 neighbourhood.
///
/// Falls back to bilinear within the kernel radius of the border.
fn sample_lanczos3(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px as usize, py as usize);
            for (acc, value) in sum.iter_mut().zip(pixel) {
                *acc += value * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..4 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, zero elsewhere.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
