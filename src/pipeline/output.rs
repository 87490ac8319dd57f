use crate::diagnostics::WarpReport;
use crate::field::{DisplacementMap, ScalarField};
use crate::image::RgbImageU8;

/// Full-resolution fields captured before and after diffusion.
///
/// Purely observational: nothing in the pipeline reads these back.
#[derive(Clone, Debug)]
pub struct Inspection {
    pub(crate) initial_mass: ScalarField,
    pub(crate) final_mass: ScalarField,
    pub(crate) initial_coords: DisplacementMap,
    pub(crate) final_coords: DisplacementMap,
}

impl Inspection {
    /// Saliency plus epsilon, as fed into the downsampler.
    pub fn initial_mass(&self) -> &ScalarField {
        &self.initial_mass
    }

    /// Diffused mass upsampled to full resolution.
    pub fn final_mass(&self) -> &ScalarField {
        &self.final_mass
    }

    /// Identity coordinates before diffusion.
    pub fn initial_coords(&self) -> &DisplacementMap {
        &self.initial_coords
    }

    /// Coordinates after diffusion (the displacement map).
    pub fn final_coords(&self) -> &DisplacementMap {
        &self.final_coords
    }
}

/// Result of a successful warp.
#[derive(Clone, Debug)]
pub struct WarpOutput {
    pub image: RgbImageU8,
    pub displacement: DisplacementMap,
    pub inspection: Inspection,
    pub report: WarpReport,
}
