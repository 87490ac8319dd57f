//! Saliency-weighted warp orchestrating the four warping stages.
//!
//! Overview
//! - Adds `mass_epsilon` to the saliency map to form a strictly positive mass
//!   field, and pairs it with the identity coordinate grids.
//! - Downsamples mass and coordinates to a working grid whose cell count is
//!   bounded by `pixel_budget` ([`GridResampler`](crate::grid::GridResampler)).
//! - Diffuses the mass for `total_diffusion_time`, advecting the weighted
//!   coordinates in proportion to the mass flux
//!   ([`HeatDiffusionEngine`](crate::diffusion::HeatDiffusionEngine)).
//! - Divides the coordinates back out and upsamples them to a full-resolution
//!   displacement map
//!   ([`CoordinateReconstructor`](crate::reconstruct::CoordinateReconstructor)).
//! - Samples the source image at the displacement coordinates
//!   ([`ImageResampler`](crate::sample::ImageResampler)).
//!
//! Modules
//! - `warp` – the [`SaliencyWarp`] entry point.
//! - `output` – [`WarpOutput`] and the read-only [`Inspection`] fields.
//!
//! Key Ideas
//! - Salient regions start with more mass. Mass spreads out during diffusion
//!   and drags the coordinates it carries along with it, so output pixels near
//!   salient content end up sampling a smaller source area (magnification)
//!   while the low-saliency background is compressed.
//! - Every failure is reported together with the stage that raised it, and no
//!   output image is produced for a failed run.

mod output;
mod warp;

pub use output::{Inspection, WarpOutput};
pub use warp::SaliencyWarp;
