use coherent_lines::config::load_config;
use coherent_lines::image::io::{load_grayscale_image, save_grayscale_as, write_json_file};
use coherent_lines::image::{GrayImageU8, ImageF32};
use coherent_lines::progress::LogProgress;
use coherent_lines::{generate_with_progress, CldError};
use log::{info, warn};
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CldError> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    info!(
        "loaded {} ({}x{})",
        config.input.display(),
        gray.width(),
        gray.height()
    );
    let image = ImageF32::from_u8(&gray.as_view());
    let output = generate_with_progress(&image, &config.options, &LogProgress)?;

    let out = &config.output;
    save_grayscale_as(
        &GrayImageU8::from_mask(&output.mask),
        &out.mask,
        out.format_for(&out.mask)?,
    )?;
    println!(
        "Saved line drawing to {} ({} line pixels, {:.1}% coverage, {:.1} ms)",
        out.mask.display(),
        output.report.off_pixels,
        output.report.line_coverage() * 100.0,
        output.report.timing.total_ms
    );

    match (&output.anti_aliased, &out.anti_aliased) {
        (Some(soft), Some(path)) => {
            save_grayscale_as(soft, path, out.format_for(path)?)?;
            println!("Saved anti-aliased drawing to {}", path.display());
        }
        (Some(_), None) => warn!("anti_alias is set but output.anti_aliased is missing"),
        _ => {}
    }

    match (&output.flow_preview, &out.flow_preview) {
        (Some(preview), Some(path)) => {
            save_grayscale_as(&GrayImageU8::from_f32(preview), path, out.format_for(path)?)?;
            println!("Saved flow preview to {}", path.display());
        }
        (Some(_), None) => warn!("visualize_flow is set but output.flow_preview is missing"),
        _ => {}
    }

    if let Some(path) = &out.report_json {
        write_json_file(path, &output.report)?;
        println!("Saved run report to {}", path.display());
    }

    Ok(())
}

fn usage() -> CldError {
    CldError::InvalidOption {
        name: "config",
        reason: "Usage: cld <config.json>".to_string(),
    }
}
