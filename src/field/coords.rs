//! Coordinate-carrying grids: mass-weighted coordinates, the working grid
//! and the final displacement map.

use super::ScalarField;
use crate::error::WarpError;
use crate::image::ImageView;

/// Identity coordinate grids: `x[y][x] = x`, `y[y][x] = y`.
pub fn meshgrid(w: usize, h: usize) -> (ScalarField, ScalarField) {
    let xs = ScalarField::from_fn(w, h, |x, _| x as f32);
    let ys = ScalarField::from_fn(w, h, |_, y| y as f32);
    (xs, ys)
}

/// Mass-weighted position per cell: `x_hat = U·x`, `y_hat = U·y`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateField {
    pub x_hat: ScalarField,
    pub y_hat: ScalarField,
}

impl CoordinateField {
    /// Weight plain coordinate grids by `mass`.
    pub fn weighted(
        mass: &ScalarField,
        xs: &ScalarField,
        ys: &ScalarField,
    ) -> Result<Self, WarpError> {
        Ok(Self {
            x_hat: mass.mul(xs)?,
            y_hat: mass.mul(ys)?,
        })
    }

    /// Recover plain coordinates by dividing out `mass`.
    pub fn unweighted(&self, mass: &ScalarField) -> Result<(ScalarField, ScalarField), WarpError> {
        Ok((self.x_hat.div(mass)?, self.y_hat.div(mass)?))
    }
}

/// Mass field plus its coupled coordinate fields at working resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingGrid {
    pub mass: ScalarField,
    pub coords: CoordinateField,
}

impl WorkingGrid {
    /// Assemble a working grid, checking that all three fields share a shape.
    pub fn new(mass: ScalarField, coords: CoordinateField) -> Result<Self, WarpError> {
        mass.ensure_same_shape(&coords.x_hat)?;
        mass.ensure_same_shape(&coords.y_hat)?;
        Ok(Self { mass, coords })
    }

    pub fn width(&self) -> usize {
        self.mass.w
    }

    pub fn height(&self) -> usize {
        self.mass.h
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.sum()
    }
}

/// Per output pixel, the floating-point source coordinate to sample.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementMap {
    pub x: ScalarField,
    pub y: ScalarField,
}

impl DisplacementMap {
    pub fn new(x: ScalarField, y: ScalarField) -> Result<Self, WarpError> {
        x.ensure_same_shape(&y)?;
        Ok(Self { x, y })
    }

    /// Map sampling every pixel at its own position.
    pub fn identity(w: usize, h: usize) -> Self {
        let (x, y) = meshgrid(w, h);
        Self { x, y }
    }

    pub fn width(&self) -> usize {
        self.x.width()
    }

    pub fn height(&self) -> usize {
        self.x.height()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> (f32, f32) {
        (self.x.get(x, y), self.y.get(x, y))
    }

    /// Largest Euclidean distance from the identity mapping.
    pub fn max_offset(&self) -> f32 {
        let mut worst = 0.0f32;
        for y in 0..self.height() {
            let rx = self.x.row(y);
            let ry = self.y.row(y);
            for x in 0..self.width() {
                let dx = rx[x] - x as f32;
                let dy = ry[x] - y as f32;
                worst = worst.max((dx * dx + dy * dy).sqrt());
            }
        }
        worst
    }
}
