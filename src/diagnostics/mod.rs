//! Serializable run report for a warp.
//!
//! `WarpReport` is returned with every successful warp and can be written as
//! JSON by the binary. It records shapes, diffusion bookkeeping, summary
//! statistics of the key fields, per-stage timings and the local spacing of
//! the final displacement map.

pub mod spacing;
pub mod timing;

pub use spacing::{jacobian, local_spacing, region_mean, SpacingSummary};
pub use timing::{StageTiming, TimingBreakdown};

use crate::diffusion::DiffusionSummary;
use crate::field::ScalarField;
use serde::Serialize;

/// Width and height of a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn of(field: &ScalarField) -> Self {
        Self {
            width: field.w,
            height: field.h,
        }
    }
}

/// Summary statistics of a scalar field.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub sum: f64,
}

impl FieldStats {
    pub fn from_field(field: &ScalarField) -> Self {
        let (min, max) = field.min_max();
        Self {
            min,
            max,
            mean: field.mean(),
            sum: field.sum(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpReport {
    pub input: GridSize,
    pub working: GridSize,
    pub pixel_budget: usize,
    pub diffusion: DiffusionSummary,
    pub saliency: FieldStats,
    pub final_mass: FieldStats,
    /// Largest distance between an output pixel and its source position.
    pub max_displacement: f32,
    pub clamped_samples: usize,
    pub spacing: SpacingSummary,
    pub timings: TimingBreakdown,
}
