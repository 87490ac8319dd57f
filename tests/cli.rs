mod common;

use common::synthetic_image::pattern_rgb;
use saliency_warp::image::io::{load_rgb_image, save_rgb_image};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("saliency_warp_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn binary_writes_image_report_and_inspection() {
    let dir = scratch_dir("cli");
    let input = dir.join("input.png");
    save_rgb_image(&pattern_rgb(20, 12), &input).unwrap();

    let config = serde_json::json!({
        "input": input,
        "warp": { "pixel_budget": 120, "total_diffusion_time": 5.0 },
        "output": {
            "image": dir.join("out/warped.png"),
            "report_json": dir.join("out/report.json"),
            "inspect_dir": dir.join("inspect")
        }
    });
    let config_path = dir.join("config.json");
    fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_saliency_warp"))
        .arg(&config_path)
        .status()
        .unwrap();
    assert!(status.success());

    let warped = load_rgb_image(&dir.join("out/warped.png")).unwrap();
    assert_eq!((warped.w, warped.h), (20, 12));
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("out/report.json")).unwrap()).unwrap();
    assert_eq!(report["diffusion"]["steps"], 25);
    for name in ["mass_initial.png", "mass_final.png", "coords_x_final.png"] {
        assert!(dir.join("inspect").join(name).exists(), "missing {name}");
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn binary_fails_on_bad_config() {
    let dir = scratch_dir("cli_bad");
    let config_path = dir.join("config.json");
    fs::write(
        &config_path,
        r#"{"input": "missing.png", "warp": {"interpolation": "sinc"}, "output": {"image": "x.png"}}"#,
    )
    .unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_saliency_warp"))
        .arg(&config_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config"), "{stderr}");
    let _ = fs::remove_dir_all(&dir);
}
