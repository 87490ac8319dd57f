//! Error kinds raised by the warping pipeline.
//!
//! Components return [`WarpError`]; the pipeline entry point wraps it into a
//! [`PipelineError`] that also records the [`Stage`] that failed.

use serde::Serialize;

/// Failure raised by one of the warping components.
#[derive(Clone, Debug, PartialEq)]
pub enum WarpError {
    /// Two grids that must share a shape do not.
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A configuration value is out of range or unrecognised.
    InvalidConfiguration { reason: String },
    /// A sampling coordinate lies outside the source image after the border
    /// policy was applied.
    IndexOutOfBounds {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },
    /// A diffused mass value left the positive range.
    NumericalInstability { step: usize, min_mass: f32 },
}

impl WarpError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        WarpError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WarpError::DimensionMismatch { .. } => "DimensionMismatch",
            WarpError::InvalidConfiguration { .. } => "InvalidConfiguration",
            WarpError::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            WarpError::NumericalInstability { .. } => "NumericalInstability",
        }
    }
}

impl std::fmt::Display for WarpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarpError::DimensionMismatch { expected, found } => write!(
                f,
                "dimension mismatch (expected {}x{}, found {}x{})",
                expected.0, expected.1, found.0, found.1
            ),
            WarpError::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            WarpError::IndexOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "sample ({x:.3}, {y:.3}) outside {width}x{height} source image"
            ),
            WarpError::NumericalInstability { step, min_mass } => write!(
                f,
                "diffusion diverged at step {step} (min mass {min_mass:e})"
            ),
        }
    }
}

impl std::error::Error for WarpError {}

/// Pipeline stage in which a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Configuration,
    Input,
    Downsample,
    Diffusion,
    Reconstruct,
    Resample,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Input => "input",
            Stage::Downsample => "downsample",
            Stage::Diffusion => "diffusion",
            Stage::Reconstruct => "reconstruct",
            Stage::Resample => "resample",
        };
        f.write_str(name)
    }
}

/// Error returned by [`SaliencyWarp::warp`](crate::SaliencyWarp::warp).
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineError {
    pub stage: Stage,
    pub error: WarpError,
}

impl PipelineError {
    pub fn new(stage: Stage, error: WarpError) -> Self {
        Self { stage, error }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed at {} stage: {}", self.error.kind(), self.stage, self.error)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_names_stage_and_kind() {
        let err = PipelineError::new(
            Stage::Input,
            WarpError::DimensionMismatch {
                expected: (4, 4),
                found: (4, 5),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("DimensionMismatch"), "{msg}");
        assert!(msg.contains("input"), "{msg}");
    }
}
