use crate::error::Stage;
use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: f64,
}

/// Per-stage timings of a warp run, in execution order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, stage: Stage, elapsed_ms: f64) {
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming { stage, elapsed_ms });
    }

    /// Record the time elapsed since `start` for `stage`.
    pub fn record_since(&mut self, stage: Stage, start: Instant) {
        self.push(stage, start.elapsed().as_secs_f64() * 1000.0);
    }

    pub fn get(&self, stage: Stage) -> Option<f64> {
        self.stages
            .iter()
            .find(|t| t.stage == stage)
            .map(|t| t.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_accumulates_total() {
        let mut t = TimingBreakdown::default();
        t.push(Stage::Downsample, 1.5);
        t.push(Stage::Diffusion, 10.0);
        assert_eq!(t.total_ms, 11.5);
        assert_eq!(t.get(Stage::Diffusion), Some(10.0));
        assert_eq!(t.get(Stage::Resample), None);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r#""stage":"downsample""#), "{json}");
        assert!(json.contains("elapsedMs"));
    }
}
