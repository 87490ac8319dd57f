//! I/O helpers for RGB images, saliency maps and JSON.
//!
//! - `load_rgb_image` / `save_rgb_image`: 8-bit RGB round trip through any
//!   format the `image` crate was built with.
//! - `load_saliency_image`: read a grayscale map into a `ScalarField` in [0, 1].
//! - `save_field_png`: write a `ScalarField` as a min/max-normalized gray PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageView, RgbImageU8};
use crate::field::ScalarField;
use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    RgbImageU8::from_raw(w, h, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size decoding {}", path.display()))
}

/// Save an RGB image; the format follows the file extension.
pub fn save_rgb_image(image: &RgbImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let packed = match image.as_slice() {
        Some(data) => data.to_vec(),
        None => image.rows().flatten().copied().collect(),
    };
    let out = RgbImage::from_raw(image.w as u32, image.h as u32, packed)
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Load a saliency map stored as a grayscale image, scaled to [0, 1].
pub fn load_saliency_image(path: &Path) -> Result<ScalarField, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    ScalarField::from_vec(w, h, data)
        .map_err(|e| format!("Failed to read saliency {}: {e}", path.display()))
}

/// Save a field to a grayscale PNG, stretching `[min, max]` to `[0, 255]`.
///
/// A constant field is written as mid-gray.
pub fn save_field_png(field: &ScalarField, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (min, max) = field.min_max();
    let range = max - min;
    let mut out = GrayImage::new(field.w as u32, field.h as u32);
    for y in 0..field.h {
        for (x, &v) in field.row(y).iter().enumerate() {
            let t = if range > 0.0 { (v - min) / range } else { 0.5 };
            let px = (t * 255.0).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x as u32, y as u32, Luma([px]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
