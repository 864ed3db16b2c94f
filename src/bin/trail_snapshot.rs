//! Renders a synthetic pointer trail to PNG and dumps its samples to CSV.
//!
//! Usage: `trail_snapshot [config.json] [out.png]`

use std::env;
use std::f64::consts::PI;
use std::path::PathBuf;
use std::process::ExitCode;

use image::{Rgba, RgbaImage};
use log::{error, info};

use pointer_trail::constants::TICK_INTERVAL_MS;
use pointer_trail::utils::{ensure_output_dir, export_points_to_csv};
use pointer_trail::{logging, FrameOutcome, ImageSurface, RenderConfig, TrailSession};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 320;
const SAMPLE_INTERVAL_MS: f64 = 8.0;
const SAMPLE_COUNT: usize = 40;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let config_path = args.next();
    let out_path = args.next().map(PathBuf::from);

    let config = match config_path {
        Some(path) => match RenderConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                logging::init(2);
                error!("Cannot load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => RenderConfig::default(),
    };
    logging::init(config.log_level);

    let mut session = TrailSession::new(config);

    // A loose spiral sweeping across the canvas.
    let mut now = 0.0;
    for i in 0..SAMPLE_COUNT {
        let s = i as f64 / SAMPLE_COUNT as f64;
        let angle = s * 1.5 * PI;
        let radius = 40.0 + 90.0 * s;
        let x = f64::from(WIDTH) / 2.0 + radius * angle.cos();
        let y = f64::from(HEIGHT) / 2.0 + radius * angle.sin();
        session.push_sample(x, y, now);
        now += SAMPLE_INTERVAL_MS;
    }

    let out_dir = ensure_output_dir();
    let csv_path = out_dir.join("trail_points.csv");
    if let Err(e) = export_points_to_csv(&csv_path, session.points()) {
        error!("Failed to write {:?}: {}", csv_path, e);
        return ExitCode::FAILURE;
    }

    let background = RgbaImage::from_pixel(WIDTH, HEIGHT, Rgba([24, 24, 32, 255]));
    let mut surface = ImageSurface::from_image(background);
    let render_at = now + f64::from(TICK_INTERVAL_MS);
    match session.render(&mut surface, render_at) {
        FrameOutcome::Drawn { strokes } => info!("Drew {} strokes at t={}ms", strokes, render_at),
        FrameOutcome::Aborted { reason, .. } => {
            error!("Frame aborted: {}", reason);
            return ExitCode::FAILURE;
        }
        other => info!("Nothing drawn: {:?}", other),
    }

    let png_path = out_path.unwrap_or_else(|| out_dir.join("trail_snapshot.png"));
    if let Err(e) = surface.save_png(&png_path) {
        error!("Failed to write {:?}: {}", png_path, e);
        return ExitCode::FAILURE;
    }
    let stats = session.stats();
    info!(
        "Wrote {:?} and {:?} ({} frames drawn, {} skipped)",
        png_path, csv_path, stats.frames_drawn, stats.frames_skipped
    );
    ExitCode::SUCCESS
}
