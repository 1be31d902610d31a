//! ASCII preview command

use super::{frame_time, load_settings, parse_platform};
use anyhow::{bail, Context, Result};
use haze_core::{resolve, Viewport};
use haze_particles::FieldTuning;
use haze_render::{HeadlessHost, RenderDriver};
use std::time::Instant;

pub struct PreviewArgs {
    pub settings: Option<String>,
    pub platform: String,
    pub frames: u64,
    pub cols: usize,
    pub rows: usize,
    pub width: f32,
    pub height: f32,
    pub seed: Option<u32>,
    pub tuning: Option<String>,
}

const PREVIEW_FPS: u32 = 60;

pub fn run(args: PreviewArgs) -> Result<()> {
    let store = load_settings(args.settings.as_deref())?;
    let tier = parse_platform(&args.platform)?;
    let config = resolve(&store, tier, false);

    if !config.enabled {
        println!("Effect is disabled in these settings; nothing to preview.");
        return Ok(());
    }

    let viewport = Viewport::new(args.width, args.height);
    let host = HeadlessHost::ascii(viewport, args.cols, args.rows);
    let mut driver = RenderDriver::new(host, config);
    if let Some(seed) = args.seed {
        driver = driver.with_seed(seed);
    }
    if let Some(path) = &args.tuning {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let tuning: FieldTuning =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;
        driver = driver.with_tuning(tuning);
    }

    driver.start();
    if driver.surface().is_none() {
        bail!("no surface for a {}x{} viewport", args.width, args.height);
    }

    let t0 = Instant::now();
    for frame in 0..args.frames.max(1) {
        let Some(handle) = driver.host_mut().next_frame() else {
            break;
        };
        driver.on_frame(handle, t0 + frame_time(frame, PREVIEW_FPS));
    }

    if let Some(canvas) = driver.surface() {
        print!("{}", canvas.to_ascii());
    }
    if let (Some(stats), Some(layers)) = (driver.field_stats(), driver.layers()) {
        println!(
            "{} particles, {} settled layer(s), {} frame(s) on {} ({})",
            stats.particles,
            layers.len(),
            driver.frames_rendered(),
            tier,
            driver.config().skin.name()
        );
    }

    driver.stop();
    Ok(())
}
