use saliency_warp::config::{load_config, SaliencySource};
use saliency_warp::image::io::{
    load_rgb_image, load_saliency_image, save_field_png, save_rgb_image, write_json_file,
};
use saliency_warp::saliency::{GradientSaliency, PrecomputedSaliency, SaliencyProvider};
use saliency_warp::{SaliencyWarp, WarpOutput};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let image = load_rgb_image(&config.input)?;
    let provider: Box<dyn SaliencyProvider> = match &config.saliency {
        SaliencySource::Gradient { smoothing_passes } => {
            Box::new(GradientSaliency::new(*smoothing_passes))
        }
        SaliencySource::File { path } => {
            Box::new(PrecomputedSaliency::new(load_saliency_image(path)?))
        }
    };

    let warp = SaliencyWarp::new(config.warp.clone()).map_err(|e| e.to_string())?;
    let out = warp
        .warp_with(&image, provider.as_ref())
        .map_err(|e| e.to_string())?;

    save_rgb_image(&out.image, &config.output.image)?;
    println!(
        "Saved warped {}x{} image to {} (working grid {}x{}, {} steps, {:.1} ms)",
        out.image.w,
        out.image.h,
        config.output.image.display(),
        out.report.working.width,
        out.report.working.height,
        out.report.diffusion.steps,
        out.report.timings.total_ms
    );

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &out.report)?;
        println!("Saved report to {}", path.display());
    }
    if let Some(dir) = &config.output.inspect_dir {
        write_inspection(&out, dir)?;
        println!("Saved inspection fields to {}", dir.display());
    }
    Ok(())
}

fn write_inspection(out: &WarpOutput, dir: &Path) -> Result<(), String> {
    let ins = &out.inspection;
    save_field_png(ins.initial_mass(), &dir.join("mass_initial.png"))?;
    save_field_png(ins.final_mass(), &dir.join("mass_final.png"))?;
    save_field_png(&ins.initial_coords().x, &dir.join("coords_x_initial.png"))?;
    save_field_png(&ins.initial_coords().y, &dir.join("coords_y_initial.png"))?;
    save_field_png(&ins.final_coords().x, &dir.join("coords_x_final.png"))?;
    save_field_png(&ins.final_coords().y, &dir.join("coords_y_final.png"))?;
    Ok(())
}

fn usage() -> String {
    "Usage: saliency_warp <config.json>".to_string()
}
