//! Local spacing of a displacement map.
//!
//! For output pixel `(u, v)` the map gives a source position `(x, y)`. The
//! absolute Jacobian determinant `|det ∂(x, y)/∂(u, v)|` is the source area
//! sampled per output pixel: below 1 the content is magnified (salient
//! regions), above 1 it is compressed. Derivatives use central differences in
//! the interior and one-sided differences on the border.

use crate::field::{DisplacementMap, ScalarField};
use crate::image::ImageView;
use nalgebra::Matrix2;
use serde::Serialize;

/// `|det J|` per output pixel.
pub fn local_spacing(map: &DisplacementMap) -> ScalarField {
    let (w, h) = (map.width(), map.height());
    ScalarField::from_fn(w, h, |u, v| jacobian(map, u, v).determinant().abs())
}

/// Jacobian `[[dx/du, dx/dv], [dy/du, dy/dv]]` at `(u, v)`.
pub fn jacobian(map: &DisplacementMap, u: usize, v: usize) -> Matrix2<f32> {
    let (w, h) = (map.width(), map.height());
    let (dxu, dyu) = if w > 1 {
        let (a, b) = (u.saturating_sub(1), (u + 1).min(w - 1));
        let span = (b - a) as f32;
        (
            (map.x.get(b, v) - map.x.get(a, v)) / span,
            (map.y.get(b, v) - map.y.get(a, v)) / span,
        )
    } else {
        (1.0, 0.0)
    };
    let (dxv, dyv) = if h > 1 {
        let (a, b) = (v.saturating_sub(1), (v + 1).min(h - 1));
        let span = (b - a) as f32;
        (
            (map.x.get(u, b) - map.x.get(u, a)) / span,
            (map.y.get(u, b) - map.y.get(u, a)) / span,
        )
    } else {
        (0.0, 1.0)
    };
    Matrix2::new(dxu, dxv, dyu, dyv)
}

/// Mean of `field` over the square window of `radius` around `(cx, cy)`,
/// clipped to the grid.
pub fn region_mean(field: &ScalarField, cx: usize, cy: usize, radius: usize) -> f64 {
    if field.is_empty() {
        return 0.0;
    }
    let x0 = cx.saturating_sub(radius);
    let y0 = cy.saturating_sub(radius);
    let x1 = (cx + radius).min(field.w - 1);
    let y1 = (cy + radius).min(field.h - 1);
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for y in y0..=y1 {
        for &v in &field.row(y)[x0..=x1] {
            sum += v as f64;
            n += 1;
        }
    }
    sum / n.max(1) as f64
}

/// Spacing statistics contrasting the most salient spot with the border.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    /// Location of the saliency maximum.
    pub peak: (usize, usize),
    /// Mean spacing in the 3×3 window around `peak`.
    pub peak_mean: f64,
    /// Mean spacing over the outermost rows and columns.
    pub border_mean: f64,
}

impl SpacingSummary {
    pub fn new(spacing: &ScalarField, saliency: &ScalarField) -> Self {
        let (min, max) = spacing.min_max();
        let peak = argmax(saliency);
        Self {
            min,
            max,
            mean: spacing.mean(),
            peak,
            peak_mean: region_mean(spacing, peak.0, peak.1, 1),
            border_mean: border_mean(spacing),
        }
    }
}

fn argmax(field: &ScalarField) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_v = f32::NEG_INFINITY;
    for y in 0..field.h {
        for (x, &v) in field.row(y).iter().enumerate() {
            if v > best_v {
                best_v = v;
                best = (x, y);
            }
        }
    }
    best
}

fn border_mean(field: &ScalarField) -> f64 {
    let (w, h) = (field.w, field.h);
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                sum += field.get(x, y) as f64;
                n += 1;
            }
        }
    }
    sum / n.max(1) as f64
}
