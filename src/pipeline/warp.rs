use super::output::{Inspection, WarpOutput};
use crate::config::WarpConfig;
use crate::diagnostics::{
    local_spacing, FieldStats, GridSize, SpacingSummary, TimingBreakdown, WarpReport,
};
use crate::diffusion::HeatDiffusionEngine;
use crate::error::{PipelineError, Stage, WarpError};
use crate::field::{DisplacementMap, ScalarField};
use crate::grid::GridResampler;
use crate::image::{ImageView, RgbImageU8};
use crate::reconstruct::CoordinateReconstructor;
use crate::sample::ImageResampler;
use crate::saliency::SaliencyProvider;
use log::debug;
use std::time::Instant;

/// Content-aware image warp driven by a saliency map.
#[derive(Clone, Debug)]
pub struct SaliencyWarp {
    config: WarpConfig,
    engine: HeatDiffusionEngine,
}

impl SaliencyWarp {
    /// Validate `config` and prepare the diffusion schedule.
    pub fn new(config: WarpConfig) -> Result<Self, PipelineError> {
        let at_config = |e| PipelineError::new(Stage::Configuration, e);
        config.validate().map_err(at_config)?;
        let engine = HeatDiffusionEngine::new(config.diffusion_options()).map_err(at_config)?;
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Compute saliency with `provider`, then warp.
    pub fn warp_with(
        &self,
        image: &RgbImageU8,
        provider: &dyn SaliencyProvider,
    ) -> Result<WarpOutput, PipelineError> {
        let saliency = provider
            .saliency(image)
            .map_err(|e| PipelineError::new(Stage::Input, e))?;
        self.warp(image, &saliency)
    }

    /// Warp `image` so regions with high `saliency` are magnified.
    pub fn warp(
        &self,
        image: &RgbImageU8,
        saliency: &ScalarField,
    ) -> Result<WarpOutput, PipelineError> {
        let at = |stage: Stage| move |e: WarpError| PipelineError::new(stage, e);
        let mut timings = TimingBreakdown::default();

        let start = Instant::now();
        let mass = initial_mass(image, saliency, self.config.mass_epsilon).map_err(at(Stage::Input))?;
        timings.record_since(Stage::Input, start);

        let start = Instant::now();
        let mut grid = GridResampler::new(self.config.pixel_budget, self.config.mass_epsilon)
            .with_weighting(self.config.weighting)
            .downsample(&mass)
            .map_err(at(Stage::Downsample))?;
        let working = GridSize::of(&grid.mass);
        timings.record_since(Stage::Downsample, start);

        let start = Instant::now();
        let diffusion = self.engine.run(&mut grid).map_err(at(Stage::Diffusion))?;
        timings.record_since(Stage::Diffusion, start);

        let start = Instant::now();
        let reconstruction = CoordinateReconstructor::new(image.w, image.h)
            .reconstruct(&grid)
            .map_err(at(Stage::Reconstruct))?;
        timings.record_since(Stage::Reconstruct, start);

        let start = Instant::now();
        let resampled = ImageResampler::new(self.config.interpolation, self.config.border)
            .resample(image, &reconstruction.displacement)
            .map_err(at(Stage::Resample))?;
        timings.record_since(Stage::Resample, start);

        let displacement = reconstruction.displacement;
        let spacing = local_spacing(&displacement);
        let report = WarpReport {
            input: GridSize::of(saliency),
            working,
            pixel_budget: self.config.pixel_budget,
            diffusion,
            saliency: FieldStats::from_field(saliency),
            final_mass: FieldStats::from_field(&reconstruction.mass),
            max_displacement: displacement.max_offset(),
            clamped_samples: resampled.clamped_samples,
            spacing: SpacingSummary::new(&spacing, saliency),
            timings,
        };
        debug!(
            "SaliencyWarp::warp {}x{} working={}x{} steps={} max_disp={:.3} total_ms={:.2}",
            image.w,
            image.h,
            working.width,
            working.height,
            report.diffusion.steps,
            report.max_displacement,
            report.timings.total_ms
        );

        let inspection = Inspection {
            initial_mass: mass,
            final_mass: reconstruction.mass,
            initial_coords: DisplacementMap::identity(image.w, image.h),
            final_coords: displacement.clone(),
        };
        Ok(WarpOutput {
            image: resampled.image,
            displacement,
            inspection,
            report,
        })
    }
}

/// `saliency + epsilon`, after checking shape and value range.
fn initial_mass(
    image: &RgbImageU8,
    saliency: &ScalarField,
    epsilon: f32,
) -> Result<ScalarField, WarpError> {
    if saliency.shape() != image.shape() {
        return Err(WarpError::DimensionMismatch {
            expected: image.shape(),
            found: saliency.shape(),
        });
    }
    if image.w == 0 || image.h == 0 {
        return Err(WarpError::invalid(format!(
            "input image must be non-empty (got {}x{})",
            image.w, image.h
        )));
    }
    let mut mass = saliency.clone();
    mass.map_inplace(|v| v + epsilon);
    if let Some(bad) = mass.data.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(WarpError::invalid(format!(
            "saliency must be finite and > -mass_epsilon (found mass {bad})"
        )));
    }
    Ok(mass)
}
