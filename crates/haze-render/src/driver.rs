//! The render loop driver
//!
//! Two states. While stopped the driver holds nothing but its config: no
//! surface, no particles, no pending frame. While running it owns all three,
//! and every delivered frame schedules the next one.

use crate::host::{FrameHandle, RenderHost};
use haze_core::{ConfigChange, HazeError, SimulationConfig, Viewport};
use haze_particles::{FieldStats, FieldTuning, ParticleField, SettleLayers, Surface};
use haze_runtime::{EffectDriver, FrameClock};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Everything that only exists while running
struct ActiveLoop<S> {
    surface: S,
    field: ParticleField,
    layers: SettleLayers,
    pending: Option<FrameHandle>,
}

pub struct RenderDriver<H: RenderHost> {
    host: H,
    active: Option<ActiveLoop<H::Surface>>,
    config: SimulationConfig,
    tuning: FieldTuning,
    clock: FrameClock,
    viewport: Viewport,
    seed: u32,
    frames: u64,
}

impl<H: RenderHost> RenderDriver<H> {
    pub fn new(host: H, config: SimulationConfig) -> Self {
        let viewport = host.viewport();
        Self {
            host,
            active: None,
            config,
            tuning: FieldTuning::default(),
            clock: FrameClock::new(),
            viewport,
            seed: 0x5EED_F06,
            frames: 0,
        }
    }

    pub fn with_tuning(mut self, tuning: FieldTuning) -> Self {
        self.clock = FrameClock::with_max_delta(tuning.max_delta);
        self.tuning = tuning;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn state(&self) -> DriverState {
        if self.active.is_some() {
            DriverState::Running
        } else {
            DriverState::Stopped
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The live surface, if running
    pub fn surface(&self) -> Option<&H::Surface> {
        self.active.as_ref().map(|a| &a.surface)
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.active.as_ref().map(|a| &a.field)
    }

    pub fn layers(&self) -> Option<&SettleLayers> {
        self.active.as_ref().map(|a| &a.layers)
    }

    pub fn field_stats(&self) -> Option<FieldStats> {
        self.field().map(|f| f.stats())
    }

    /// The frame callback the driver is waiting for, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.active.as_ref().and_then(|a| a.pending)
    }

    /// Frames rendered since the driver was created
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Acquire the surface, build the particle pool and schedule the first
    /// frame. No-op if already running.
    pub fn start(&mut self) {
        if self.active.is_some() {
            return;
        }

        let viewport = self.host.viewport();
        let surface = if viewport.is_empty() {
            Err(HazeError::SurfaceUnavailable(format!(
                "viewport is {}x{}",
                viewport.width, viewport.height
            )))
        } else {
            self.host.acquire_surface(viewport)
        };
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("effect not shown: {e}");
                return;
            }
        };

        let seed = self.next_seed();
        let mut field = ParticleField::new(self.config.clone(), self.tuning, seed);
        field.rebuild(&self.config, viewport);
        let layers = SettleLayers::new(seed.rotate_left(16));

        self.viewport = viewport;
        self.clock.reset();
        let pending = Some(self.host.request_frame());
        self.active = Some(ActiveLoop {
            surface,
            field,
            layers,
            pending,
        });
        log::debug!("render loop started at {}x{}", viewport.width, viewport.height);
    }

    /// Cancel the pending frame, release the surface and drop all particle
    /// state. No-op if already stopped.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(handle) = active.pending {
            self.host.cancel_frame(handle);
        }
        self.host.release_surface(active.surface);
        log::debug!(
            "render loop stopped after {} frame(s), {} particle(s) settled",
            self.frames,
            active.field.stats().settled
        );
    }

    /// Frame callback. Runs one simulation + draw pass and schedules the next
    /// frame. Returns false (and does nothing) for stale or unexpected
    /// handles, including any callback that fires after `stop`.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.pending != Some(handle) {
            return false;
        }
        active.pending = None;

        let dt = self.clock.tick(now);
        let color = self.config.color();

        active.surface.clear();
        active.layers.render(&mut active.surface, color);
        active.field.step(dt, &mut active.layers);
        active.field.render(&mut active.surface);

        self.frames += 1;
        active.pending = Some(self.host.request_frame());
        true
    }

    /// The viewport changed: particle coordinates are relative to the old
    /// size, so the pool is rebuilt and settled layers dropped. A viewport
    /// with no area stops the loop.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if viewport.is_empty() {
            if self.active.is_some() {
                log::warn!(
                    "viewport collapsed to {}x{}; stopping render loop",
                    viewport.width,
                    viewport.height
                );
                self.stop();
            }
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.surface.resize(viewport);
            active.field.rebuild(&self.config, viewport);
            active.layers.clear();
        }
    }

    /// Install a new config, applying the smallest change that realises it.
    pub fn update(&mut self, config: &SimulationConfig) {
        let change = ConfigChange::between(&self.config, config);
        self.config = config.clone();

        let Some(active) = self.active.as_mut() else {
            return;
        };
        log::debug!("config change while running: {change:?}");

        if change == ConfigChange::Rebuild {
            active.field.rebuild(&self.config, self.viewport);
        } else if change.reparametrizes() {
            active.field.reparametrize(&self.config);
        }
        if change.clears_layers() || !self.config.settle_enabled {
            active.layers.clear();
        }
    }

    fn next_seed(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.seed
    }
}

impl<H: RenderHost> EffectDriver for RenderDriver<H> {
    fn start(&mut self) {
        RenderDriver::start(self);
    }

    fn stop(&mut self) {
        RenderDriver::stop(self);
    }

    fn update(&mut self, config: &SimulationConfig) {
        RenderDriver::update(self, config);
    }

    fn resize(&mut self, viewport: Viewport) {
        RenderDriver::resize(self, viewport);
    }

    fn is_running(&self) -> bool {
        self.active.is_some()
    }

    fn name(&self) -> &str {
        "haze"
    }
}
