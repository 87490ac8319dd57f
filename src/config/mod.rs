//! Configuration for the warp pipeline and the command-line tool.
//!
//! [`WarpConfig`] is the library-level parameter set; every field has a
//! default so a JSON object may name only what it changes. [`tool`] holds the
//! file-driven configuration consumed by the `saliency_warp` binary.

pub mod tool;

pub use tool::{load_config, OutputConfig, SaliencySource, WarpToolConfig};

use crate::diffusion::{DiffusionOptions, DEFAULT_STEP_SIZE, DEFAULT_TOTAL_TIME};
use crate::error::WarpError;
use crate::grid::WeightingOrder;
use crate::sample::{BorderPolicy, Interpolation};
use serde::{Deserialize, Serialize};

/// Default working-grid size target (cells).
pub const DEFAULT_PIXEL_BUDGET: usize = 5000;
/// Default constant added to the saliency before diffusion.
pub const DEFAULT_MASS_EPSILON: f32 = 0.01;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Target number of cells in the working grid.
    pub pixel_budget: usize,
    pub total_diffusion_time: f64,
    pub step_size: f64,
    pub interpolation: Interpolation,
    /// Added to every saliency value; also the floor for resized mass.
    pub mass_epsilon: f32,
    pub border: BorderPolicy,
    pub check_stability: bool,
    /// `after_resize` weights coordinates at working resolution; this moves
    /// output pixels relative to the default `before_resize`.
    pub weighting: WeightingOrder,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            pixel_budget: DEFAULT_PIXEL_BUDGET,
            total_diffusion_time: DEFAULT_TOTAL_TIME,
            step_size: DEFAULT_STEP_SIZE,
            interpolation: Interpolation::default(),
            mass_epsilon: DEFAULT_MASS_EPSILON,
            border: BorderPolicy::default(),
            check_stability: true,
            weighting: WeightingOrder::default(),
        }
    }
}

impl WarpConfig {
    /// Check every parameter, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), WarpError> {
        if self.pixel_budget == 0 {
            return Err(WarpError::invalid("pixel_budget must be > 0"));
        }
        if !self.total_diffusion_time.is_finite() || self.total_diffusion_time < 0.0 {
            return Err(WarpError::invalid(format!(
                "total_diffusion_time must be finite and >= 0 (got {})",
                self.total_diffusion_time
            )));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(WarpError::invalid(format!(
                "step_size must be finite and > 0 (got {})",
                self.step_size
            )));
        }
        if !self.mass_epsilon.is_finite() || self.mass_epsilon <= 0.0 {
            return Err(WarpError::invalid(format!(
                "mass_epsilon must be finite and > 0 (got {})",
                self.mass_epsilon
            )));
        }
        Ok(())
    }

    pub fn diffusion_options(&self) -> DiffusionOptions {
        DiffusionOptions {
            total_time: self.total_diffusion_time,
            step_size: self.step_size,
            check_stability: self.check_stability,
        }
    }

    pub fn with_total_diffusion_time(mut self, t: f64) -> Self {
        self.total_diffusion_time = t;
        self
    }

    pub fn with_pixel_budget(mut self, budget: usize) -> Self {
        self.pixel_budget = budget;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}
