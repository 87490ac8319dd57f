//! Working-grid construction from full-resolution fields.
//!
//! The working size keeps the aspect ratio of the source while bounding the
//! number of cells near `pixel_budget`:
//!
//! - `nsy = floor(sqrt(N · H / W)) + 1`
//! - `nsx = floor(sqrt(N · W / H)) + 1`
//!
//! By default the coupled fields `X̂ = U·x`, `Ŷ = U·y` are formed at full
//! resolution and resized together with `U` by cubic convolution. The resized
//! mass is then floored at the mass epsilon, since cubic overshoot around sharp
//! peaks can dip below zero.
//!
//! [`WeightingOrder::AfterResize`] instead resizes `U` and the identity grids
//! separately and weights at working resolution, so every working cell starts
//! out carrying exactly its own source position. This changes the coordinates
//! entering diffusion and therefore the output; it is opt-in.

use crate::error::WarpError;
use crate::field::{meshgrid, CoordinateField, ScalarField, WorkingGrid};
use crate::resize::resize_cubic;
use log::debug;
use serde::{Deserialize, Serialize};

/// When the identity coordinates are multiplied by the mass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingOrder {
    /// Resize `U·x` and `U·y` built at full resolution.
    #[default]
    BeforeResize,
    /// Resize `U`, `x` and `y` separately, then multiply.
    AfterResize,
}

/// Working-grid dimensions `(nsx, nsy)` for an `h × w` source.
pub fn working_dims(h: usize, w: usize, pixel_budget: usize) -> Result<(usize, usize), WarpError> {
    if h == 0 || w == 0 {
        return Err(WarpError::invalid(format!(
            "source dimensions must be positive (got {h}x{w})"
        )));
    }
    if pixel_budget == 0 {
        return Err(WarpError::invalid("pixel budget must be positive"));
    }
    let y2x = h as f64 / w as f64;
    let budget = pixel_budget as f64;
    let nsy = (budget * y2x).sqrt().floor() as usize + 1;
    let nsx = (budget / y2x).sqrt().floor() as usize + 1;
    Ok((nsx, nsy))
}

/// Downsamples full-resolution mass and coordinates to a bounded working grid.
#[derive(Clone, Copy, Debug)]
pub struct GridResampler {
    pixel_budget: usize,
    mass_floor: f32,
    weighting: WeightingOrder,
}

impl GridResampler {
    pub fn new(pixel_budget: usize, mass_floor: f32) -> Self {
        Self {
            pixel_budget,
            mass_floor,
            weighting: WeightingOrder::default(),
        }
    }

    pub fn with_weighting(mut self, weighting: WeightingOrder) -> Self {
        self.weighting = weighting;
        self
    }

    /// Build the working grid for a strictly positive full-resolution `mass`.
    pub fn downsample(&self, mass: &ScalarField) -> Result<WorkingGrid, WarpError> {
        let (nsx, nsy) = working_dims(mass.h, mass.w, self.pixel_budget)?;
        if !(self.mass_floor > 0.0) {
            return Err(WarpError::invalid("mass floor must be positive"));
        }

        let (xs, ys) = meshgrid(mass.w, mass.h);
        let mut mass_small = resize_cubic(mass, nsx, nsy)?;
        let floor = self.mass_floor;
        mass_small.map_inplace(|v| if v > floor { v } else { floor });
        let coords = match self.weighting {
            WeightingOrder::BeforeResize => {
                let full = CoordinateField::weighted(mass, &xs, &ys)?;
                CoordinateField {
                    x_hat: resize_cubic(&full.x_hat, nsx, nsy)?,
                    y_hat: resize_cubic(&full.y_hat, nsx, nsy)?,
                }
            }
            WeightingOrder::AfterResize => {
                let xs_small = resize_cubic(&xs, nsx, nsy)?;
                let ys_small = resize_cubic(&ys, nsx, nsy)?;
                CoordinateField::weighted(&mass_small, &xs_small, &ys_small)?
            }
        };

        debug!(
            "GridResampler::downsample {}x{} -> {}x{} (budget={}, weighting={:?})",
            mass.w, mass.h, nsx, nsy, self.pixel_budget, self.weighting
        );
        WorkingGrid::new(mass_small, coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_dims_follow_aspect_ratio() {
        assert_eq!(working_dims(100, 100, 5000).unwrap(), (71, 71));
        let (nsx, nsy) = working_dims(480, 640, 5000).unwrap();
        assert_eq!((nsx, nsy), (82, 62));
    }

    #[test]
    fn working_dims_reject_bad_input() {
        assert!(matches!(
            working_dims(0, 10, 5000),
            Err(WarpError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            working_dims(10, 10, 0),
            Err(WarpError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn downsample_keeps_positions_and_positive_mass() {
        let mut mass = ScalarField::filled(9, 9, 0.01);
        mass.set(4, 4, 50.0);
        let grid = GridResampler::new(64, 0.01).downsample(&mass).unwrap();
        assert_eq!((grid.width(), grid.height()), (9, 9));
        assert!(grid.mass.data.iter().all(|&v| v >= 0.01));
        let (xs, ys) = grid.coords.unweighted(&grid.mass).unwrap();
        for y in 0..9 {
            for x in 0..9 {
                assert!((xs.get(x, y) - x as f32).abs() < 1e-4);
                assert!((ys.get(x, y) - y as f32).abs() < 1e-4);
            }
        }
    }

    fn blocky_mass() -> ScalarField {
        ScalarField::from_fn(30, 20, |x, y| {
            0.01 + if (x / 6 + y / 5) % 3 == 0 { 1.0 } else { 0.1 }
        })
    }

    #[test]
    fn default_weighting_resizes_full_resolution_products() {
        let mass = blocky_mass();
        let grid = GridResampler::new(100, 0.01).downsample(&mass).unwrap();
        let (nsx, nsy) = working_dims(20, 30, 100).unwrap();
        let (xs, ys) = meshgrid(30, 20);
        let x_hat = resize_cubic(&mass.mul(&xs).unwrap(), nsx, nsy).unwrap();
        let y_hat = resize_cubic(&mass.mul(&ys).unwrap(), nsx, nsy).unwrap();
        assert_eq!(grid.coords.x_hat, x_hat);
        assert_eq!(grid.coords.y_hat, y_hat);
        assert!(grid.mass.data.iter().all(|&v| v >= 0.01));
    }

    #[test]
    fn after_resize_weighting_uses_working_resolution_products() {
        let mass = blocky_mass();
        let grid = GridResampler::new(100, 0.01)
            .with_weighting(WeightingOrder::AfterResize)
            .downsample(&mass)
            .unwrap();
        let (nsx, nsy) = working_dims(20, 30, 100).unwrap();
        let (xs, _) = meshgrid(30, 20);
        let xs_small = resize_cubic(&xs, nsx, nsy).unwrap();
        assert_eq!(grid.coords.x_hat, grid.mass.mul(&xs_small).unwrap());

        let default = GridResampler::new(100, 0.01).downsample(&mass).unwrap();
        assert_eq!(grid.mass, default.mass);
        assert_ne!(grid.coords.x_hat, default.coords.x_hat);
    }
}
