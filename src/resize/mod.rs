//! Separable cubic-convolution resizing of scalar fields.
//!
//! Sample positions are corner-aligned: destination index `j` maps to source
//! position `j * (n - 1) / (m - 1)`, so the first and last rows/columns of the
//! source and destination coincide. Samples needed beyond the border are
//! extended antisymmetrically (`f(-k) = 2 f(0) - f(k)`), which keeps linear
//! ramps linear up to the edge. With the Catmull-Rom kernel a constant field
//! resizes to the same constant and an identity coordinate grid resizes to the
//! identity grid of the new size, scaled to source units.
//!
//! Both passes precompute per-output taps once and then run one horizontal
//! pass into an intermediate buffer followed by one vertical pass.

pub mod kernel;

pub use kernel::{CubicKernel, InterpolationKernel, CATMULL_ROM};

use crate::error::WarpError;
use crate::field::ScalarField;
use crate::image::{ImageView, ImageViewMut};

/// Resize `src` to `w × h` with the Catmull-Rom kernel.
pub fn resize_cubic(src: &ScalarField, w: usize, h: usize) -> Result<ScalarField, WarpError> {
    resize_with(src, w, h, &CATMULL_ROM)
}

/// Resize `src` to `w × h` using `kernel`.
pub fn resize_with(
    src: &ScalarField,
    w: usize,
    h: usize,
    kernel: &dyn InterpolationKernel,
) -> Result<ScalarField, WarpError> {
    if src.is_empty() {
        return Err(WarpError::invalid("cannot resize an empty field"));
    }
    if w == 0 || h == 0 {
        return Err(WarpError::invalid(format!(
            "resize target {w}x{h} must be non-empty"
        )));
    }
    if src.w == w && src.h == h {
        return Ok(src.clone());
    }

    let col_taps = build_taps(src.w, w, kernel);
    let row_taps = build_taps(src.h, h, kernel);

    // horizontal: src.h rows of width w
    let mut horiz = ScalarField::new(w, src.h);
    for y in 0..src.h {
        let src_row = src.row(y);
        let dst_row = horiz.row_mut(y);
        for (dst_px, taps) in dst_row.iter_mut().zip(&col_taps) {
            *dst_px = taps.apply(|i| extend(src_row, i));
        }
    }

    // vertical
    let mut out = ScalarField::new(w, h);
    let mut column = vec![0.0f32; src.h];
    for x in 0..w {
        for (y, v) in column.iter_mut().enumerate() {
            *v = horiz.get(x, y);
        }
        for (y, taps) in row_taps.iter().enumerate() {
            let v = taps.apply(|i| extend(&column, i));
            out.set(x, y, v);
        }
    }
    Ok(out)
}

/// Source position sampled by destination index `j` when resizing `n → m`.
#[inline]
pub fn source_position(j: usize, n: usize, m: usize) -> f64 {
    if m <= 1 || n <= 1 {
        0.0
    } else {
        j as f64 * (n - 1) as f64 / (m - 1) as f64
    }
}

/// Precomputed kernel footprint for one output sample.
#[derive(Clone, Debug)]
struct Taps {
    first: isize,
    weights: Vec<f64>,
}

impl Taps {
    #[inline]
    fn apply(&self, fetch: impl Fn(isize) -> f32) -> f32 {
        let mut acc = 0.0f64;
        for (k, &w) in self.weights.iter().enumerate() {
            if w != 0.0 {
                acc += w * fetch(self.first + k as isize) as f64;
            }
        }
        acc as f32
    }
}

fn build_taps(n: usize, m: usize, kernel: &dyn InterpolationKernel) -> Vec<Taps> {
    let radius = kernel.radius() as isize;
    (0..m)
        .map(|j| {
            let pos = source_position(j, n, m);
            let base = pos.floor();
            let frac = pos - base;
            let first = base as isize - radius + 1;
            let weights = (0..(2 * radius) as usize)
                .map(|k| kernel.weight(frac - (k as isize - radius + 1) as f64))
                .collect();
            Taps { first, weights }
        })
        .collect()
}

/// Read `row[i]`, extending antisymmetrically about the end samples.
#[inline]
fn extend(row: &[f32], i: isize) -> f32 {
    let n = row.len() as isize;
    let last = n - 1;
    if i < 0 {
        let k = (-i).min(last) as usize;
        2.0 * row[0] - row[k]
    } else if i > last {
        let k = (i - last).min(last) as usize;
        2.0 * row[last as usize] - row[last as usize - k]
    } else {
        row[i as usize]
    }
}
