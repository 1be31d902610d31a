//! Configuration resolver: stored settings + platform tier -> simulation parameters.
//!
//! Every setting is read and clamped independently. Nothing here can fail:
//! out-of-range numbers clamp to the nearest bound, unusable values fall back
//! to their documented default.

use crate::error::HazeError;
use crate::platform::PlatformTier;
use crate::settings::{keys, SettingsStore};
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base particle diameter before the size multiplier, in pixels
pub const BASE_PARTICLE_SIZE: f32 = 3.0;

pub const MAX_DENSITY: i64 = 3;
pub const MAX_PARTICLE_SIZE: i64 = 4;
pub const MAX_SETTLE_SPEED: i64 = 3;
pub const MAX_FALL_SPEED: i64 = 3;

// Rows: tv, mobile, desktop, other. Column 0 is "auto" and mirrors the mid tier.
const PARTICLE_COUNT: [[usize; 4]; 4] = [
    [40, 25, 40, 60],
    [60, 40, 60, 90],
    [110, 70, 110, 160],
    [80, 50, 80, 120],
];

const SIZE_MULTIPLIER: [[f32; 5]; 4] = [
    [1.0, 0.7, 1.0, 1.3, 1.6],
    [0.8, 0.6, 0.8, 1.1, 1.4],
    [1.0, 0.7, 1.0, 1.4, 1.8],
    [1.0, 0.7, 1.0, 1.3, 1.6],
];

const SETTLE_INTENSITY: [[f32; 4]; 4] = [
    [0.6, 0.3, 0.6, 1.0],
    [0.8, 0.4, 0.8, 1.3],
    [1.0, 0.5, 1.0, 1.6],
    [0.8, 0.4, 0.8, 1.3],
];

const FALL_SPEED_MULTIPLIER: [[f32; 4]; 4] = [
    [0.8, 0.5, 0.8, 1.2],
    [1.0, 0.6, 1.0, 1.5],
    [1.0, 0.6, 1.0, 1.6],
    [1.0, 0.6, 1.0, 1.4],
];

/// Cosmetic variant of the effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skin {
    #[default]
    Fog,
    Smoke,
}

impl Skin {
    pub fn color(self) -> Color {
        match self {
            Skin::Fog => Color::from_hex(0xE6ECF2),
            Skin::Smoke => Color::from_hex(0x9A9A9E),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Skin::Fog => "fog",
            Skin::Smoke => "smoke",
        }
    }
}

impl FromStr for Skin {
    type Err = HazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fog" => Ok(Skin::Fog),
            "smoke" => Ok(Skin::Smoke),
            other => Err(HazeError::UnknownSkin(other.to_string())),
        }
    }
}

/// Resolved, clamped simulation parameters. Replaced wholesale on every
/// settings change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub particle_count: usize,
    /// Particle diameter at depth 1.0, in pixels
    pub particle_size: f32,
    pub fall_speed: f32,
    pub settle_intensity: f32,
    pub settle_enabled: bool,
    pub in_card_visible: bool,
    pub platform: PlatformTier,
    pub reduced_motion: bool,
    pub enabled: bool,
    pub skin: Skin,
}

impl SimulationConfig {
    pub fn color(&self) -> Color {
        self.skin.color()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        resolve(&SettingsStore::new(), PlatformTier::Other, false)
    }
}

/// Resolve stored settings into a simulation config. Pure; safe to call often.
pub fn resolve(
    settings: &SettingsStore,
    platform: PlatformTier,
    reduced_motion: bool,
) -> SimulationConfig {
    let row = platform.index();

    let density = index_setting(settings, keys::DENSITY, MAX_DENSITY);
    let size = index_setting(settings, keys::PARTICLE_SIZE, MAX_PARTICLE_SIZE);
    let settle_speed = index_setting(settings, keys::SETTLE_SPEED, MAX_SETTLE_SPEED);
    let fall_speed = index_setting(settings, keys::FALL_SPEED, MAX_FALL_SPEED);

    let skin = match settings.get_str(keys::SKIN) {
        Some(name) => name.parse().unwrap_or_else(|e| {
            log::warn!("{e}, using fog");
            Skin::Fog
        }),
        None => Skin::Fog,
    };

    SimulationConfig {
        particle_count: PARTICLE_COUNT[row][density],
        particle_size: BASE_PARTICLE_SIZE * SIZE_MULTIPLIER[row][size],
        fall_speed: FALL_SPEED_MULTIPLIER[row][fall_speed],
        settle_intensity: SETTLE_INTENSITY[row][settle_speed],
        settle_enabled: settings
            .get_bool(keys::SETTLE)
            .unwrap_or_else(|| default_settle(platform)),
        in_card_visible: settings.get_bool(keys::IN_CARD_VISIBLE).unwrap_or(false),
        platform,
        reduced_motion,
        enabled: settings.get_bool(keys::ENABLED).unwrap_or(true),
        skin,
    }
}

/// Settling costs an extra gradient pass per layer; TVs skip it by default.
pub fn default_settle(platform: PlatformTier) -> bool {
    platform != PlatformTier::ConstrainedTv
}

/// Read a table index setting, clamped to `[0, max]`. Missing or unusable
/// values map to 0 ("auto").
fn index_setting(settings: &SettingsStore, key: &str, max: i64) -> usize {
    match settings.get_int(key) {
        Some(v) => {
            let clamped = v.clamp(0, max);
            if clamped != v {
                log::debug!("setting '{key}' = {v} clamped to {clamped}");
            }
            clamped as usize
        }
        None => {
            if settings.has(key) {
                log::debug!("setting '{key}' is not a number, using auto");
            }
            0
        }
    }
}

/// What a running effect has to do to apply a new config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// Nothing visible changed.
    None,
    /// Density, size, fall speed or settle speed changed: reallocate
    /// particles. Takes precedence over the other variants; settled layers
    /// are kept unless settling is now off.
    Rebuild,
    /// Only the skin changed: recolor particles in place.
    Reparametrize,
    /// Settling switched off: drop deposited layers.
    ClearLayers,
    /// Both `Reparametrize` and `ClearLayers`.
    Retune,
}

impl ConfigChange {
    pub fn between(old: &SimulationConfig, new: &SimulationConfig) -> Self {
        if old.particle_count != new.particle_count
            || old.particle_size != new.particle_size
            || old.fall_speed != new.fall_speed
            || old.settle_intensity != new.settle_intensity
        {
            return ConfigChange::Rebuild;
        }
        let tuning = old.skin != new.skin;
        let settle_off = old.settle_enabled && !new.settle_enabled;

        match (tuning, settle_off) {
            (true, true) => ConfigChange::Retune,
            (true, false) => ConfigChange::Reparametrize,
            (false, true) => ConfigChange::ClearLayers,
            (false, false) => ConfigChange::None,
        }
    }

    pub fn reparametrizes(self) -> bool {
        matches!(self, ConfigChange::Reparametrize | ConfigChange::Retune)
    }

    pub fn clears_layers(self) -> bool {
        matches!(self, ConfigChange::ClearLayers | ConfigChange::Retune)
    }
}
