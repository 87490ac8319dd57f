//! Recover plain coordinates from the diffused working grid and lift them back
//! to full resolution.
//!
//! `x = X̂ / U`, `y = Ŷ / U` at working resolution, then `U`, `x` and `y` are
//! upsampled with the same cubic resizer used on the way down. The mass stays
//! at or above the epsilon floor during diffusion, so the division never hits
//! zero; coordinates in cells whose mass sits near the floor can still be
//! large and are left to the resampler's border policy.

use crate::error::WarpError;
use crate::field::{DisplacementMap, ScalarField, WorkingGrid};
use crate::resize::resize_cubic;
use log::debug;

/// Full-resolution products of the reconstruction.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub displacement: DisplacementMap,
    /// Diffused mass upsampled to full resolution (observational only).
    pub mass: ScalarField,
}

/// Normalizes and upsamples a diffused working grid.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateReconstructor {
    width: usize,
    height: usize,
}

impl CoordinateReconstructor {
    /// Reconstructor targeting a `width × height` output.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn reconstruct(&self, grid: &WorkingGrid) -> Result<Reconstruction, WarpError> {
        let (xs, ys) = grid.coords.unweighted(&grid.mass)?;
        let x = resize_cubic(&xs, self.width, self.height)?;
        let y = resize_cubic(&ys, self.width, self.height)?;
        let mass = resize_cubic(&grid.mass, self.width, self.height)?;
        debug!(
            "CoordinateReconstructor::reconstruct {}x{} -> {}x{}",
            grid.width(),
            grid.height(),
            self.width,
            self.height
        );
        Ok(Reconstruction {
            displacement: DisplacementMap::new(x, y)?,
            mass,
        })
    }
}
