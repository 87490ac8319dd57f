//! Evaluate a source image at displacement-map coordinates.
//!
//! Two interpolation modes are supported:
//!
//! - `Nearest` rounds each coordinate (half away from zero) and copies the
//!   pixel.
//! - `Bilinear` (default) blends the four pixels around `(x, y)` with weights
//!   `(1-fy)(1-fx)`, `(1-fy)fx`, `fy(1-fx)`, `fy·fx`. When `x0 + 1` or
//!   `y0 + 1` falls past the last column/row the read is clamped to the edge;
//!   the matching weight is zero there anyway once the coordinate itself is
//!   clamped.
//!
//! Blended channels are rounded to nearest and clamped to `[0, 255]`, so
//! bilinear sampling at integer coordinates reproduces nearest sampling.
//!
//! Coordinates outside `[0, W-1] × [0, H-1]` are handled by [`BorderPolicy`]:
//! `Clamp` snaps finite coordinates to the edge, `Reject` fails with
//! `IndexOutOfBounds` for anything more than [`REJECT_TOLERANCE`] pixels out.
//! Non-finite coordinates fail under both policies.

use crate::error::WarpError;
use crate::field::DisplacementMap;
use crate::image::rgb::CHANNELS;
use crate::image::{ImageView, ImageViewMut, RgbImageU8};
use log::warn;
use serde::Serialize;
use std::str::FromStr;

/// Slack (pixels) granted by [`BorderPolicy::Reject`] for rounding noise.
pub const REJECT_TOLERANCE: f32 = 1e-3;

/// Sub-pixel sampling method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Interpolation::Nearest),
            "bilinear" => Ok(Interpolation::Bilinear),
            other => Err(WarpError::invalid(format!(
                "unsupported interpolation mode '{other}' (expected nearest|bilinear)"
            ))),
        }
    }
}

impl TryFrom<String> for Interpolation {
    type Error = WarpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Handling of sampling coordinates that leave the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BorderPolicy {
    #[default]
    Clamp,
    Reject,
}

impl FromStr for BorderPolicy {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(BorderPolicy::Clamp),
            "reject" => Ok(BorderPolicy::Reject),
            other => Err(WarpError::invalid(format!(
                "unsupported border policy '{other}' (expected clamp|reject)"
            ))),
        }
    }
}

impl TryFrom<String> for BorderPolicy {
    type Error = WarpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resampled image plus the number of coordinates snapped to the border.
#[derive(Clone, Debug)]
pub struct ResampleOutput {
    pub image: RgbImageU8,
    pub clamped_samples: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImageResampler {
    pub interpolation: Interpolation,
    pub border: BorderPolicy,
}

impl ImageResampler {
    pub fn new(interpolation: Interpolation, border: BorderPolicy) -> Self {
        Self {
            interpolation,
            border,
        }
    }

    /// Sample `src` at every coordinate of `map`; output has the source shape.
    pub fn resample(
        &self,
        src: &RgbImageU8,
        map: &DisplacementMap,
    ) -> Result<ResampleOutput, WarpError> {
        let shape = (map.height(), map.width());
        if shape != src.shape() {
            return Err(WarpError::DimensionMismatch {
                expected: src.shape(),
                found: shape,
            });
        }

        let mut out = RgbImageU8::new(src.w, src.h);
        let mut clamped_samples = 0usize;
        for y in 0..src.h {
            let xs = map.x.row(y);
            let ys = map.y.row(y);
            let dst = out.row_mut(y);
            for x in 0..src.w {
                let (sx, sy, clamped) = self.place(xs[x], ys[x], src.w, src.h)?;
                clamped_samples += clamped as usize;
                let px = match self.interpolation {
                    Interpolation::Nearest => nearest(src, sx, sy),
                    Interpolation::Bilinear => bilinear(src, sx, sy),
                };
                dst[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&px);
            }
        }

        if clamped_samples > 0 {
            warn!(
                "ImageResampler::resample clamped {clamped_samples} of {} samples to the border",
                src.w * src.h
            );
        }
        Ok(ResampleOutput {
            image: out,
            clamped_samples,
        })
    }

    /// Apply the border policy; returns the in-bounds coordinate and whether
    /// it had to move.
    fn place(&self, x: f32, y: f32, w: usize, h: usize) -> Result<(f32, f32, bool), WarpError> {
        let oob = || WarpError::IndexOutOfBounds {
            x,
            y,
            width: w,
            height: h,
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(oob());
        }
        let max_x = (w - 1) as f32;
        let max_y = (h - 1) as f32;
        if self.border == BorderPolicy::Reject
            && (x < -REJECT_TOLERANCE
                || y < -REJECT_TOLERANCE
                || x > max_x + REJECT_TOLERANCE
                || y > max_y + REJECT_TOLERANCE)
        {
            return Err(oob());
        }
        let cx = x.clamp(0.0, max_x);
        let cy = y.clamp(0.0, max_y);
        let moved = (cx - x).abs() > REJECT_TOLERANCE || (cy - y).abs() > REJECT_TOLERANCE;
        Ok((cx, cy, moved))
    }
}

#[inline]
fn nearest(src: &RgbImageU8, x: f32, y: f32) -> [u8; 3] {
    let xi = (x.round() as usize).min(src.w - 1);
    let yi = (y.round() as usize).min(src.h - 1);
    src.get(xi, yi)
}

#[inline]
fn bilinear(src: &RgbImageU8, x: f32, y: f32) -> [u8; 3] {
    let x0 = (x.floor() as usize).min(src.w - 1);
    let y0 = (y.floor() as usize).min(src.h - 1);
    let x1 = (x0 + 1).min(src.w - 1);
    let y1 = (y0 + 1).min(src.h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get(x0, y0);
    let p01 = src.get(x1, y0);
    let p10 = src.get(x0, y1);
    let p11 = src.get(x1, y1);
    let w00 = (1.0 - fy) * (1.0 - fx);
    let w01 = (1.0 - fy) * fx;
    let w10 = fy * (1.0 - fx);
    let w11 = fy * fx;

    let mut px = [0u8; 3];
    for c in 0..CHANNELS {
        let v = p00[c] as f32 * w00 + p01[c] as f32 * w01 + p10[c] as f32 * w10 + p11[c] as f32 * w11;
        px[c] = to_byte(v);
    }
    px
}

#[inline]
fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
