mod common;

use common::synthetic_image::{pattern_rgb, spike_saliency};
use saliency_warp::diagnostics::{local_spacing, region_mean};
use saliency_warp::field::{DisplacementMap, ScalarField};
use saliency_warp::prelude::*;
use saliency_warp::resize::resize_cubic;
use saliency_warp::{ImageResampler, Stage, WeightingOrder};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn uniform_saliency_returns_input_unchanged() {
    init_logging();
    let image = pattern_rgb(4, 4);
    let saliency = ScalarField::filled(4, 4, 1.0);
    let warp = SaliencyWarp::new(WarpConfig::default()).unwrap();
    let out = warp.warp(&image, &saliency).unwrap();

    assert_eq!(out.report.working.width, 71);
    assert_eq!(out.report.working.height, 71);
    assert!(
        out.displacement.max_offset() < 1e-3,
        "max offset {}",
        out.displacement.max_offset()
    );
    assert_eq!(out.image, image);
    assert_eq!(out.report.clamped_samples, 0);
}

#[test]
fn peaked_saliency_magnifies_the_peak() {
    init_logging();
    let (w, h) = (17, 17);
    let image = pattern_rgb(w, h);
    let saliency = spike_saliency(w, h, 8, 8, 5.0);
    let config = WarpConfig::default()
        .with_pixel_budget(256)
        .with_total_diffusion_time(100.0);
    let out = SaliencyWarp::new(config).unwrap().warp(&image, &saliency).unwrap();
    assert_eq!((out.report.working.width, out.report.working.height), (17, 17));

    let spacing = local_spacing(&out.displacement);
    let near_peak = region_mean(&spacing, 8, 8, 1);
    let corners = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .iter()
        .map(|&(x, y)| region_mean(&spacing, x, y, 1))
        .sum::<f64>()
        / 4.0;
    assert!(
        near_peak < corners,
        "spacing near peak {near_peak} should be below corner spacing {corners}"
    );
    assert!(out.report.spacing.peak == (8, 8));

    // the map stays symmetric about the peak
    let (cx, cy) = out.displacement.get(8, 8);
    assert!((cx - 8.0).abs() < 1e-3 && (cy - 8.0).abs() < 1e-3);
    let mass = &out.report.diffusion;
    assert!(((mass.mass_after - mass.mass_before) / mass.mass_before).abs() < 1e-4);
}

#[test]
fn bilinear_matches_nearest_on_integer_coordinates() {
    let image = pattern_rgb(9, 7);
    // every output pixel samples some other in-bounds integer position
    let x = ScalarField::from_fn(9, 7, |u, v| ((u * 4 + v) % 9) as f32);
    let y = ScalarField::from_fn(9, 7, |u, v| ((v * 3 + u) % 7) as f32);
    let map = DisplacementMap::new(x, y).unwrap();

    let bilinear = ImageResampler::new(Interpolation::Bilinear, BorderPolicy::Reject)
        .resample(&image, &map)
        .unwrap();
    let nearest = ImageResampler::new(Interpolation::Nearest, BorderPolicy::Reject)
        .resample(&image, &map)
        .unwrap();
    assert_eq!(bilinear.image, nearest.image);
    for v in 0..7 {
        for u in 0..9 {
            let (sx, sy) = map.get(u, v);
            assert_eq!(bilinear.image.get(u, v), image.get(sx as usize, sy as usize));
        }
    }
}

#[test]
fn constant_field_survives_down_and_up_sampling() {
    let field = ScalarField::filled(120, 90, 0.37);
    let small = resize_cubic(&field, 82, 62).unwrap();
    let back = resize_cubic(&small, 120, 90).unwrap();
    assert!(small.data.iter().all(|&v| (v - 0.37).abs() < 1e-5));
    assert!(back.data.iter().all(|&v| (v - 0.37).abs() < 1e-5));
}

#[test]
fn mismatched_saliency_is_reported_at_input() {
    let warp = SaliencyWarp::new(WarpConfig::default()).unwrap();
    let err = warp
        .warp(&pattern_rgb(8, 6), &ScalarField::new(6, 8))
        .unwrap_err();
    assert_eq!(err.stage, Stage::Input);
    assert_eq!(
        err.error,
        WarpError::DimensionMismatch {
            expected: (6, 8),
            found: (8, 6)
        }
    );
    assert!(err.to_string().starts_with("DimensionMismatch failed at input stage"));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    for config in [
        WarpConfig::default().with_pixel_budget(0),
        WarpConfig::default().with_total_diffusion_time(-0.5),
        WarpConfig::default().with_total_diffusion_time(f64::NAN),
    ] {
        let err = SaliencyWarp::new(config).unwrap_err();
        assert_eq!(err.stage, Stage::Configuration);
        assert!(matches!(err.error, WarpError::InvalidConfiguration { .. }));
    }
    assert!(matches!(
        "cubic".parse::<Interpolation>(),
        Err(WarpError::InvalidConfiguration { .. })
    ));
}

#[test]
fn gradient_saliency_drives_a_full_warp() {
    init_logging();
    let image = pattern_rgb(24, 16);
    let warp = SaliencyWarp::new(
        WarpConfig::default()
            .with_pixel_budget(200)
            .with_total_diffusion_time(20.0),
    )
    .unwrap();
    let out = warp.warp_with(&image, &GradientSaliency::default()).unwrap();
    assert_eq!(out.image.shape(), image.shape());
    assert_eq!(out.inspection.initial_mass().shape(), (16, 24));
    assert_eq!(out.inspection.final_mass().shape(), (16, 24));
    assert_eq!(out.inspection.initial_coords().max_offset(), 0.0);
    assert_eq!(out.report.diffusion.steps, 100);

    let json = serde_json::to_value(&out.report).unwrap();
    assert_eq!(json["input"]["width"], 24);
    assert!(json["timings"]["stages"].as_array().unwrap().len() == 5);
}

#[test]
fn weighting_order_changes_the_displacement() {
    let (w, h) = (40, 30);
    let image = pattern_rgb(w, h);
    let saliency = ScalarField::from_fn(w, h, |x, y| if (x / 8 + y / 6) % 2 == 0 { 1.0 } else { 0.0 });
    let base = WarpConfig::default()
        .with_pixel_budget(300)
        .with_total_diffusion_time(20.0);
    let before = SaliencyWarp::new(base.clone()).unwrap().warp(&image, &saliency).unwrap();
    let after = SaliencyWarp::new(WarpConfig {
        weighting: WeightingOrder::AfterResize,
        ..base
    })
    .unwrap()
    .warp(&image, &saliency)
    .unwrap();

    assert_eq!(before.report.working, after.report.working);
    assert_ne!(before.displacement, after.displacement);
}
