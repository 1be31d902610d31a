//! Haze Core - Foundational types for the Haze ambient effect engine
//!
//! This crate provides what every other Haze crate depends on:
//! - `HazeError` and the `Result` alias
//! - `Color`, `Viewport` - Common types
//! - `PlatformTier` - Device class detection
//! - `SettingsStore` - Raw persisted settings
//! - `resolve` / `SimulationConfig` - The configuration resolver

pub mod config;
mod error;
pub mod platform;
pub mod settings;
mod types;

pub use config::{resolve, ConfigChange, SimulationConfig, Skin};
pub use error::{HazeError, Result};
pub use platform::{PlatformProbe, PlatformTier};
pub use settings::SettingsStore;
pub use types::{Color, Viewport};
