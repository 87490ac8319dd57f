use super::WarpConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct WarpToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub saliency: SaliencySource,
    #[serde(default)]
    pub warp: WarpConfig,
    pub output: OutputConfig,
}

/// Where the saliency map comes from.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SaliencySource {
    /// Contrast saliency computed from the input image.
    Gradient {
        #[serde(default = "default_smoothing_passes")]
        smoothing_passes: usize,
    },
    /// Grayscale image on disk, scaled to `[0, 1]`.
    File { path: PathBuf },
}

impl Default for SaliencySource {
    fn default() -> Self {
        SaliencySource::Gradient {
            smoothing_passes: default_smoothing_passes(),
        }
    }
}

fn default_smoothing_passes() -> usize {
    2
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    /// Directory receiving normalized PNGs of the inspection fields.
    #[serde(default)]
    pub inspect_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<WarpToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_tool_config() {
        let cfg: WarpToolConfig = serde_json::from_str(
            r#"{"input": "in.png", "output": {"image": "out/warped.png"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.input, PathBuf::from("in.png"));
        assert!(matches!(
            cfg.saliency,
            SaliencySource::Gradient { smoothing_passes: 2 }
        ));
        assert_eq!(cfg.warp, WarpConfig::default());
        assert!(cfg.output.report_json.is_none());
    }

    #[test]
    fn parses_file_saliency_and_warp_overrides() {
        let cfg: WarpToolConfig = serde_json::from_str(
            r#"{
                "input": "in.png",
                "saliency": {"kind": "file", "path": "sal.png"},
                "warp": {"total_diffusion_time": 100, "border": "reject"},
                "output": {"image": "o.png", "report_json": "r.json", "inspect_dir": "dbg"}
            }"#,
        )
        .unwrap();
        assert!(matches!(cfg.saliency, SaliencySource::File { ref path } if path == Path::new("sal.png")));
        assert_eq!(cfg.warp.total_diffusion_time, 100.0);
        assert_eq!(cfg.warp.border, crate::sample::BorderPolicy::Reject);
        assert_eq!(cfg.output.inspect_dir, Some(PathBuf::from("dbg")));
    }
}
