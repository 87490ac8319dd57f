//! Contrast-based saliency: Scharr gradient magnitude of the luma channel.
//!
//! - Luma uses Rec. 601 weights on channels scaled to `[0, 1]`.
//! - The 3×3 Scharr pair is applied with border clamping.
//! - The magnitude is blurred with `smoothing_passes` rounds of a separable
//!   5-tap Gaussian (`[1, 4, 6, 4, 1] / 16`), then divided by its maximum.
//!
//! A flat image yields an all-zero map; the pipeline's epsilon keeps the mass
//! positive in that case.

use super::SaliencyProvider;
use crate::error::WarpError;
use crate::field::ScalarField;
use crate::image::{ImageView, ImageViewMut, RgbImageU8};
use log::debug;

type Kernel3 = [[f32; 3]; 3];

const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

/// Peak magnitudes at or below this are rounding noise on a flat image.
const FLAT_THRESHOLD: f32 = 1e-5;

/// Normalised 5-tap Gaussian `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

#[derive(Clone, Copy, Debug)]
pub struct GradientSaliency {
    pub smoothing_passes: usize,
}

impl Default for GradientSaliency {
    fn default() -> Self {
        Self {
            smoothing_passes: 2,
        }
    }
}

impl GradientSaliency {
    pub fn new(smoothing_passes: usize) -> Self {
        Self { smoothing_passes }
    }
}

impl SaliencyProvider for GradientSaliency {
    fn saliency(&self, image: &RgbImageU8) -> Result<ScalarField, WarpError> {
        if image.w == 0 || image.h == 0 {
            return Err(WarpError::invalid(format!(
                "cannot compute saliency of an empty {}x{} image",
                image.w, image.h
            )));
        }
        let mut mag = scharr_magnitude(&luma(image));
        for _ in 0..self.smoothing_passes {
            mag = blur_separable(&mag, &GAUSSIAN_5TAP);
        }
        let (_, max) = mag.min_max();
        if max > FLAT_THRESHOLD {
            let inv = 1.0 / max;
            mag.map_inplace(|v| v * inv);
        } else {
            mag.map_inplace(|_| 0.0);
        }
        debug!(
            "GradientSaliency::saliency {}x{} passes={} max_raw={:.4}",
            image.w, image.h, self.smoothing_passes, max
        );
        Ok(mag)
    }
}

/// Rec. 601 luma in `[0, 1]`.
pub fn luma(image: &RgbImageU8) -> ScalarField {
    ScalarField::from_fn(image.w, image.h, |x, y| {
        let [r, g, b] = image.get(x, y);
        (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
    })
}

/// Scharr gradient magnitude `sqrt(gx^2 + gy^2)` with clamped borders.
pub fn scharr_magnitude(l: &ScalarField) -> ScalarField {
    let (w, h) = (l.w, l.h);
    let mut mag = ScalarField::new(w, h);
    if w == 0 || h == 0 {
        return mag;
    }
    for y in 0..h {
        let rows = [l.row(y.saturating_sub(1)), l.row(y), l.row((y + 1).min(h - 1))];
        let out = mag.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut gx = 0.0;
            let mut gy = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                for (kx, &xi) in x_idx.iter().enumerate() {
                    gx += row[xi] * SCHARR_KERNEL_X[ky][kx];
                    gy += row[xi] * SCHARR_KERNEL_Y[ky][kx];
                }
            }
            *dst = (gx * gx + gy * gy).sqrt();
        }
    }
    mag
}

/// Separable convolution with edge clamping.
fn blur_separable(src: &ScalarField, taps: &[f32]) -> ScalarField {
    let (w, h) = (src.w, src.h);
    let r = (taps.len() / 2) as isize;
    let clamp = |i: isize, n: usize| i.clamp(0, n as isize - 1) as usize;

    let mut horiz = ScalarField::new(w, h);
    for y in 0..h {
        let s = src.row(y);
        for (x, dst) in horiz.row_mut(y).iter_mut().enumerate() {
            *dst = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * s[clamp(x as isize + k as isize - r, w)])
                .sum();
        }
    }

    let mut out = ScalarField::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v: f32 = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * horiz.get(x, clamp(y as isize + k as isize - r, h)))
                .sum();
            out.set(x, y, v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_zero_saliency() {
        let mut img = RgbImageU8::new(5, 4);
        for y in 0..4 {
            for x in 0..5 {
                img.set(x, y, [90, 90, 90]);
            }
        }
        let s = GradientSaliency::default().saliency(&img).unwrap();
        assert_eq!(s.shape(), (4, 5));
        assert!(s.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn edge_is_most_salient_and_normalized() {
        let mut img = RgbImageU8::new(12, 6);
        for y in 0..6 {
            for x in 6..12 {
                img.set(x, y, [255, 255, 255]);
            }
        }
        let s = GradientSaliency::new(1).saliency(&img).unwrap();
        let (min, max) = s.min_max();
        assert!(min >= 0.0);
        assert!((max - 1.0).abs() < 1e-6);
        assert!(s.get(5, 3) > s.get(0, 3));
        assert!(s.get(6, 3) > s.get(11, 3));
    }

    #[test]
    fn blur_preserves_constant() {
        let f = ScalarField::filled(4, 3, 0.7);
        let b = blur_separable(&f, &GAUSSIAN_5TAP);
        assert!(b.data.iter().all(|&v| (v - 0.7).abs() < 1e-6));
    }
}
