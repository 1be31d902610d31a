//! CLI command implementations

pub mod preview;
pub mod resolve;
pub mod settings;
pub mod simulate;

use anyhow::{Context, Result};
use haze_core::{PlatformTier, SettingsStore};
use std::path::Path;
use std::time::Duration;

/// Load a settings file, or start from an empty store (all defaults).
pub fn load_settings(path: Option<&str>) -> Result<SettingsStore> {
    let mut store = SettingsStore::new();
    if let Some(path) = path {
        store
            .load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load settings from {}", path))?;
    }
    Ok(store)
}

pub fn parse_platform(name: &str) -> Result<PlatformTier> {
    name.parse::<PlatformTier>()
        .context("valid platforms: tv, mobile, desktop, other")
}

/// Wall-clock offset of frame `n` at `fps`
pub fn frame_time(n: u64, fps: u32) -> Duration {
    Duration::from_secs_f64(n as f64 / fps.max(1) as f64)
}
