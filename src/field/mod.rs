//! Dense 2D grids used by the warping pipeline.
//!
//! [`ScalarField`] is an owned single-channel f32 grid in row-major layout
//! (stride == width). It stores mass densities, coordinate components and
//! saliency maps alike. The [`coords`] submodule groups the composite types
//! built on top of it.

pub mod coords;

pub use coords::{meshgrid, CoordinateField, DisplacementMap, WorkingGrid};

use crate::error::WarpError;
use crate::image::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    /// Grid width in cells
    pub w: usize,
    /// Grid height in cells
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ScalarField {
    /// Construct a zero-initialized field of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a field with every cell set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Build a field by evaluating `f(x, y)` for every cell.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut out = Self::new(w, h);
        for y in 0..h {
            let row = out.row_mut(y);
            for (x, v) in row.iter_mut().enumerate() {
                *v = f(x, y);
            }
        }
        out
    }

    /// Wrap a row-major buffer; fails when its length is not `w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self, WarpError> {
        if data.len() != w * h {
            return Err(WarpError::DimensionMismatch {
                expected: (h, w),
                found: (data.len() / w.max(1), w),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn len(&self) -> usize {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Sum of all cells, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.sum() / self.len() as f64
    }

    /// Population variance, accumulated in f64.
    pub fn variance(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.len() as f64
    }

    /// `(min, max)` over all cells; `(0, 0)` for an empty field.
    pub fn min_max(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Apply `f` to every cell in place.
    pub fn map_inplace(&mut self, f: impl Fn(f32) -> f32) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Elementwise `self * other`.
    pub fn mul(&self, other: &ScalarField) -> Result<ScalarField, WarpError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise `self / other`.
    pub fn div(&self, other: &ScalarField) -> Result<ScalarField, WarpError> {
        self.zip_with(other, |a, b| a / b)
    }

    fn zip_with(
        &self,
        other: &ScalarField,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<ScalarField, WarpError> {
        self.ensure_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(ScalarField {
            w: self.w,
            h: self.h,
            stride: self.w,
            data,
        })
    }

    pub fn ensure_same_shape(&self, other: &ScalarField) -> Result<(), WarpError> {
        if self.shape() != other.shape() {
            return Err(WarpError::DimensionMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }
}

impl ImageView for ScalarField {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ScalarField {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_on_small_field() {
        let f = ScalarField::from_fn(2, 2, |x, y| (x + 2 * y) as f32);
        assert_eq!(f.sum(), 6.0);
        assert_eq!(f.min_max(), (0.0, 3.0));
        assert!((f.variance() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn elementwise_ops_reject_shape_mismatch() {
        let a = ScalarField::new(3, 2);
        let b = ScalarField::new(2, 3);
        assert!(matches!(
            a.mul(&b),
            Err(WarpError::DimensionMismatch { .. })
        ));
    }
}
