#![allow(dead_code)]

use saliency_warp::field::{meshgrid, CoordinateField, ScalarField, WorkingGrid};
use saliency_warp::image::RgbImageU8;

/// Checkerboard mass field alternating `low` and `high` in `cell`-sized squares.
pub fn checkerboard_field(width: usize, height: usize, cell: usize, low: f32, high: f32) -> ScalarField {
    assert!(cell > 0, "cell size must be positive");
    ScalarField::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) & 1 == 0 {
            low
        } else {
            high
        }
    })
}

/// RGB image with a distinct, deterministic colour per pixel.
pub fn pattern_rgb(width: usize, height: usize) -> RgbImageU8 {
    let mut img = RgbImageU8::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 37 + y * 11) % 256) as u8;
            let g = ((x * 5 + y * 53) % 256) as u8;
            let b = ((x * y * 7 + 19) % 256) as u8;
            img.set(x, y, [r, g, b]);
        }
    }
    img
}

/// Saliency map that is zero except for `value` at `(px, py)`.
pub fn spike_saliency(width: usize, height: usize, px: usize, py: usize, value: f32) -> ScalarField {
    let mut s = ScalarField::new(width, height);
    s.set(px, py, value);
    s
}

/// Working grid carrying identity coordinates weighted by `mass`.
pub fn working_grid(mass: ScalarField) -> WorkingGrid {
    let (xs, ys) = meshgrid(mass.w, mass.h);
    let coords = CoordinateField::weighted(&mass, &xs, &ys).expect("shapes match");
    WorkingGrid::new(mass, coords).expect("shapes match")
}
