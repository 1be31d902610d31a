//! Effect driver trait

use haze_core::{SimulationConfig, Viewport};

/// The render loop as seen by the activation machine.
///
/// The machine only ever decides *whether* the effect runs; everything about
/// *how* it runs sits behind this trait. `start` and `stop` must be
/// idempotent: calling either twice in a row is the same as calling it once.
pub trait EffectDriver {
    /// Begin rendering. May fail silently (e.g. no surface available), in
    /// which case `is_running` keeps returning false.
    fn start(&mut self);

    /// Stop rendering and release the surface before returning.
    fn stop(&mut self);

    /// Apply a new configuration snapshot, in place where possible.
    fn update(&mut self, config: &SimulationConfig);

    /// The host viewport changed size.
    fn resize(&mut self, viewport: Viewport);

    fn is_running(&self) -> bool;

    /// Human-readable name for logging
    fn name(&self) -> &str;
}
