#![doc = include_str!("../README.md")]

// Core stages
pub mod diffusion;
pub mod grid;
pub mod reconstruct;
pub mod sample;

// Data model and support
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod image;
pub mod pipeline;
pub mod resize;
pub mod saliency;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::WarpConfig;
pub use crate::diffusion::HeatDiffusionEngine;
pub use crate::error::{PipelineError, Stage, WarpError};
pub use crate::field::{DisplacementMap, ScalarField, WorkingGrid};
pub use crate::grid::{GridResampler, WeightingOrder};
pub use crate::pipeline::{Inspection, SaliencyWarp, WarpOutput};
pub use crate::reconstruct::CoordinateReconstructor;
pub use crate::sample::{BorderPolicy, ImageResampler, Interpolation};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{ImageView, RgbImageU8};
    pub use crate::saliency::{GradientSaliency, PrecomputedSaliency, SaliencyProvider};
    pub use crate::{
        BorderPolicy, Interpolation, PipelineError, SaliencyWarp, ScalarField, WarpConfig,
        WarpError, WarpOutput,
    };
}
