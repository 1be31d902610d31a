//! Scripted headless simulation command

use super::{frame_time, load_settings, parse_platform};
use crate::script::{Script, ScriptAction};
use anyhow::{bail, Context, Result};
use haze_core::{resolve, Viewport};
use haze_particles::FieldStats;
use haze_render::{HeadlessHost, RenderDriver};
use haze_runtime::{ActivationMachine, EffectDriver, EventBus, HostEvent};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

pub struct SimulateArgs {
    pub script: String,
    pub settings: Option<String>,
    pub platform: String,
    pub frames: u64,
    pub fps: u32,
    pub width: f32,
    pub height: f32,
    pub reduced_motion: bool,
    pub format: String,
}

#[derive(Debug, Serialize)]
struct Summary {
    frames_simulated: u64,
    frames_rendered: u64,
    starts: u32,
    stops: u32,
    failed_starts: u32,
    surfaces_acquired: u64,
    surfaces_released: u64,
    live_surfaces: usize,
    particles: usize,
    settled: u64,
    recycled: u64,
    layers: usize,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        bail!("unknown format '{}'; valid values: text, json", args.format);
    }

    let script = Script::from_file(Path::new(&args.script))
        .with_context(|| format!("Failed to load script {}", args.script))?;
    let mut store = load_settings(args.settings.as_deref())?;
    let tier = parse_platform(&args.platform)?;
    let config = resolve(&store, tier, args.reduced_motion);

    let host = HeadlessHost::recording(Viewport::new(args.width, args.height));
    let driver = RenderDriver::new(host, config.clone());
    let mut machine =
        ActivationMachine::new(driver, config).with_rules(script.screens.clone().unwrap_or_default());
    let mut bus = EventBus::new();

    let text = args.format == "text";
    if text {
        println!(
            "Simulating {} frame(s) at {} fps, {} event(s), platform {}",
            args.frames,
            args.fps,
            script.events.len(),
            tier
        );
    }

    // Last field snapshot while running; the driver drops it on stop
    let mut stats = FieldStats::default();
    let mut layers = 0;

    let t0 = Instant::now();
    for frame in 0..args.frames {
        let now = t0 + frame_time(frame, args.fps);

        for event in script.events_at(frame) {
            match &event.action {
                ScriptAction::Setting { key, value } => {
                    store.set(key, value.clone());
                    let config = resolve(&store, tier, args.reduced_motion);
                    bus.push(HostEvent::SettingsChanged(config));
                }
                ScriptAction::Resize { width, height } => {
                    // the host reports the new size from now on, even across restarts
                    let viewport = Viewport::new(*width, *height);
                    machine.driver_mut().host_mut().set_viewport(viewport);
                    bus.push(HostEvent::ViewportResized(viewport));
                }
                action => {
                    if let Some(host_event) = action.to_host_event() {
                        bus.push(host_event);
                    }
                }
            }
        }

        let was_running = machine.driver().is_running();
        if !bus.is_empty() {
            machine.pump(&mut bus);
        }
        let running = machine.driver().is_running();
        if text && was_running != running {
            println!(
                "  frame {:>5}: {}",
                frame,
                if running { "started" } else { "stopped" }
            );
        }

        let driver = machine.driver_mut();
        if let Some(handle) = driver.host_mut().next_frame() {
            driver.on_frame(handle, now);
        }
        if let Some(s) = driver.field_stats() {
            stats = s;
        }
        if let Some(l) = driver.layers() {
            layers = l.len();
        }
    }

    machine.shutdown();

    let transitions = machine.transitions();
    let driver = machine.driver();
    let host = driver.host();
    let summary = Summary {
        frames_simulated: args.frames,
        frames_rendered: driver.frames_rendered(),
        starts: transitions.starts,
        stops: transitions.stops,
        failed_starts: transitions.failed_starts,
        surfaces_acquired: host.surfaces_acquired(),
        surfaces_released: host.surfaces_released(),
        live_surfaces: host.live_surfaces(),
        particles: stats.particles,
        settled: stats.settled,
        recycled: stats.recycled,
        layers,
    };

    if text {
        print_summary(&summary);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if let Some(last) = script.last_frame() {
        if last >= args.frames {
            log::warn!(
                "script has events up to frame {} but only {} frame(s) were simulated",
                last,
                args.frames
            );
        }
    }

    Ok(())
}

fn print_summary(s: &Summary) {
    println!();
    println!("Frames rendered:  {} / {}", s.frames_rendered, s.frames_simulated);
    println!(
        "Transitions:      {} start(s), {} stop(s), {} failed start(s)",
        s.starts, s.stops, s.failed_starts
    );
    println!(
        "Surfaces:         {} acquired, {} released, {} live",
        s.surfaces_acquired, s.surfaces_released, s.live_surfaces
    );
    println!(
        "Particles:        {} in pool, {} settled, {} recycled",
        s.particles, s.settled, s.recycled
    );
    println!("Settled layers:   {}", s.layers);
}
