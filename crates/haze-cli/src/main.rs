//! Haze CLI - Resolve, simulate and preview the ambient particle effect

mod commands;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{preview, resolve, settings, simulate};

#[derive(Parser)]
#[command(name = "haze")]
#[command(about = "Ambient fog/smoke particle effect engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve stored settings into a simulation config
    Resolve {
        /// Path to settings file
        #[arg(long)]
        settings: Option<String>,

        /// Platform tier (tv, mobile, desktop, other)
        #[arg(long, conflicts_with = "user_agent")]
        platform: Option<String>,

        /// Classify the platform from a user agent string instead
        #[arg(long)]
        user_agent: Option<String>,

        /// Touch points reported with the user agent
        #[arg(long, default_value = "0")]
        touch_points: u32,

        /// Screen width reported with the user agent
        #[arg(long, default_value = "1920")]
        screen_width: u32,

        /// Host requests reduced motion
        #[arg(long)]
        reduced_motion: bool,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Replay a scripted host session against a headless render loop
    Simulate {
        /// Path to script file
        #[arg(long)]
        script: String,

        /// Path to settings file
        #[arg(long)]
        settings: Option<String>,

        /// Platform tier (tv, mobile, desktop, other)
        #[arg(long, default_value = "desktop")]
        platform: String,

        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Host requests reduced motion
        #[arg(long)]
        reduced_motion: bool,

        /// Summary format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run the effect for a while and print the last frame as ASCII art
    Preview {
        /// Path to settings file
        #[arg(long)]
        settings: Option<String>,

        /// Platform tier (tv, mobile, desktop, other)
        #[arg(long, default_value = "desktop")]
        platform: String,

        /// Number of frames to run before printing
        #[arg(long, default_value = "240")]
        frames: u64,

        /// Character columns
        #[arg(long, default_value = "80")]
        cols: usize,

        /// Character rows
        #[arg(long, default_value = "24")]
        rows: usize,

        /// Viewport width in pixels
        #[arg(long, default_value = "640")]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value = "360")]
        height: f32,

        /// Random seed
        #[arg(long)]
        seed: Option<u32>,

        /// TOML file overriding the field's feel constants
        #[arg(long)]
        tuning: Option<String>,
    },

    /// Inspect or edit a settings file
    #[command(subcommand)]
    Settings(settings::SettingsCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Resolve {
            settings,
            platform,
            user_agent,
            touch_points,
            screen_width,
            reduced_motion,
            format,
        } => resolve::run(resolve::ResolveArgs {
            settings,
            platform,
            user_agent,
            touch_points,
            screen_width,
            reduced_motion,
            format,
        }),
        Commands::Simulate {
            script,
            settings,
            platform,
            frames,
            fps,
            width,
            height,
            reduced_motion,
            format,
        } => simulate::run(simulate::SimulateArgs {
            script,
            settings,
            platform,
            frames,
            fps,
            width,
            height,
            reduced_motion,
            format,
        }),
        Commands::Preview {
            settings,
            platform,
            frames,
            cols,
            rows,
            width,
            height,
            seed,
            tuning,
        } => preview::run(preview::PreviewArgs {
            settings,
            platform,
            frames,
            cols,
            rows,
            width,
            height,
            seed,
            tuning,
        }),
        Commands::Settings(cmd) => settings::run(cmd),
    }
}
