//! Saliency providers feeding the warp pipeline.
//!
//! The warp only consumes a per-pixel importance map with the same shape as
//! the image, values roughly in `[0, 1]`. [`GradientSaliency`] derives one from
//! local contrast; [`PrecomputedSaliency`] wraps a map produced elsewhere.

pub mod gradient;

pub use gradient::{GradientSaliency, GAUSSIAN_5TAP};

use crate::error::WarpError;
use crate::field::ScalarField;
use crate::image::{ImageView, RgbImageU8};

/// Computes a saliency map for an image.
pub trait SaliencyProvider {
    /// Return a map with exactly the image's height and width.
    fn saliency(&self, image: &RgbImageU8) -> Result<ScalarField, WarpError>;
}

/// A saliency map computed ahead of time (e.g. loaded from disk).
#[derive(Clone, Debug)]
pub struct PrecomputedSaliency {
    map: ScalarField,
}

impl PrecomputedSaliency {
    pub fn new(map: ScalarField) -> Self {
        Self { map }
    }
}

impl SaliencyProvider for PrecomputedSaliency {
    fn saliency(&self, image: &RgbImageU8) -> Result<ScalarField, WarpError> {
        if self.map.shape() != image.shape() {
            return Err(WarpError::DimensionMismatch {
                expected: image.shape(),
                found: self.map.shape(),
            });
        }
        Ok(self.map.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precomputed_checks_shape() {
        let img = RgbImageU8::new(4, 3);
        let ok = PrecomputedSaliency::new(ScalarField::filled(4, 3, 0.5));
        assert_eq!(ok.saliency(&img).unwrap().shape(), (3, 4));
        let bad = PrecomputedSaliency::new(ScalarField::filled(3, 4, 0.5));
        assert!(matches!(
            bad.saliency(&img),
            Err(WarpError::DimensionMismatch {
                expected: (3, 4),
                found: (4, 3)
            })
        ));
    }
}
