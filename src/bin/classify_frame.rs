use sandbox_terrain::config::{self, RuntimeConfig};
use sandbox_terrain::diagnostics::ClassificationReport;
use sandbox_terrain::image::io::{
    load_color_image, load_depth_png, save_grayscale_f32, save_grayscale_u8, save_mask_png,
    write_json_file,
};
use sandbox_terrain::image::ImageF32;
use sandbox_terrain::noise::{noise_to_u8, propagate_noise};
use sandbox_terrain::TerrainClassifier;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "classify_frame".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| usage(&program))?;
    let config = config::load_config(&config_path)?;

    let depth = load_depth_png(&config.input.depth)?;
    let color = load_color_image(&config.input.color)?;

    let classifier = TerrainClassifier::new(config.params.clone());
    let report = classifier
        .classify_with_diagnostics(
            &depth.as_view(),
            &color.as_view(),
            config.input.depth_scale,
            config.input.baseline_distance_m,
        )
        .map_err(|e| format!("Classification failed: {e}"))?;

    print_text_summary(&report);
    save_outputs(&config, &report)?;
    Ok(())
}

fn print_text_summary(report: &ClassificationReport) {
    let s = &report.summary;
    println!("Classification summary");
    println!("  frame: {}x{}", s.width, s.height);
    println!("  signal: {}", if s.has_signal { "ok" } else { "none" });
    println!("  building px: {}", s.building_pixels);
    println!("  road px: {}", s.road_pixels);
    println!("  park px: {}", s.park_pixels);
    println!("  latency_ms: {:.3}", s.latency_ms);
    for stage in &report.trace.timings.stages {
        println!("    {:<10} {:>8.3} ms", stage.label, stage.elapsed_ms);
    }
}

fn save_outputs(config: &RuntimeConfig, report: &ClassificationReport) -> Result<(), String> {
    let out = &config.output;
    let masks = &report.masks;
    if let Some(path) = &out.building_mask {
        save_mask_png(&masks.building, path)?;
    }
    if let Some(path) = &out.road_mask {
        save_mask_png(&masks.road, path)?;
    }
    if let Some(path) = &out.park_mask {
        save_mask_png(&masks.park, path)?;
    }
    if let Some(path) = &out.label_map {
        let labels = masks.label_map();
        save_grayscale_u8(labels.w, labels.h, labels.to_u8(), path)?;
    }
    if let Some(path) = &out.noise_map {
        let noise = propagate_noise(masks, &config.params.noise)
            .map_err(|e| format!("Noise map failed: {e}"))?;
        save_grayscale_u8(noise.w, noise.h, noise_to_u8(&noise), path)?;
    }
    if let Some(path) = &out.height_map {
        save_grayscale_f32(&height_preview(report), path)?;
    }
    if let Some(path) = &out.json_out {
        write_json_file(path, report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

/// Height map stretched over the valid range for viewing.
fn height_preview(report: &ClassificationReport) -> ImageF32 {
    let height = &report.height_map;
    let (lo, hi) = match (
        report.trace.height.min_height_m,
        report.trace.height.max_height_m,
    ) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        _ => return ImageF32::new(height.w, height.h),
    };
    let mut preview = height.clone();
    for v in preview.data.iter_mut() {
        if *v > 0.0 {
            *v = (*v - lo) / (hi - lo);
        }
    }
    preview
}
