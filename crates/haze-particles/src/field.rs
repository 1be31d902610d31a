//! The particle field simulator
//!
//! Owns a fixed pool of particles that drift across the surface forever.
//! Particles never die: leaving the sides wraps them around, leaving the
//! bottom (or settling) recycles them to the top. The pool only reallocates
//! on `rebuild`.

use crate::particle::{Particle, ParticlePool, MAX_DEPTH, MIN_DEPTH};
use crate::rand::ParticleRng;
use crate::settle::SettleLayers;
use crate::surface::Surface;
use haze_core::{SimulationConfig, Viewport};
use haze_runtime::MAX_FRAME_DELTA;
use serde::{Deserialize, Serialize};

/// Settle probability per second at settle intensity 1.0
pub const SETTLE_RATE: f32 = 0.8;
/// Wobble angular frequency, rad/s
pub const WOBBLE_FREQ: f32 = 0.6;
/// Wobble amplitude at depth 1.0, px/s
pub const WOBBLE_AMP: f32 = 12.0;
/// Fall speed at depth 1.0 and multiplier 1.0, px/s
pub const BASE_FALL_SPEED: f32 = 28.0;
/// Largest lateral drift at depth 1.0, px/s
pub const MAX_DRIFT: f32 = 10.0;
/// Settle heights span this fraction range of the surface height
pub const SETTLE_BAND: (f32, f32) = (0.7, 0.95);

/// Empirically tuned "feel" constants. Hosts may override any of them;
/// missing fields keep their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub max_delta: f32,
    pub settle_rate: f32,
    pub wobble_freq: f32,
    pub wobble_amp: f32,
    pub base_fall_speed: f32,
    pub max_drift: f32,
    pub settle_band: (f32, f32),
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            max_delta: MAX_FRAME_DELTA,
            settle_rate: SETTLE_RATE,
            wobble_freq: WOBBLE_FREQ,
            wobble_amp: WOBBLE_AMP,
            base_fall_speed: BASE_FALL_SPEED,
            max_drift: MAX_DRIFT,
            settle_band: SETTLE_BAND,
        }
    }
}

/// Counters for logs and the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub particles: usize,
    pub rebuilds: u32,
    /// Particles converted into layers since the last rebuild
    pub settled: u64,
    pub recycled: u64,
}

pub struct ParticleField {
    pool: ParticlePool,
    rng: ParticleRng,
    tuning: FieldTuning,
    config: SimulationConfig,
    viewport: Viewport,
    elapsed: f32,
    stats: FieldStats,
}

impl ParticleField {
    /// An empty field. Call [`rebuild`](Self::rebuild) before stepping.
    pub fn new(config: SimulationConfig, tuning: FieldTuning, seed: u32) -> Self {
        Self {
            pool: ParticlePool::new(),
            rng: ParticleRng::new(seed),
            tuning,
            config,
            viewport: Viewport::default(),
            elapsed: 0.0,
            stats: FieldStats::default(),
        }
    }

    /// Reallocate the pool for `config` and scatter particles over the
    /// whole surface.
    pub fn rebuild(&mut self, config: &SimulationConfig, viewport: Viewport) {
        self.config = config.clone();
        self.viewport = viewport;

        let rng = &mut self.rng;
        let tuning = &self.tuning;
        let cfg = &self.config;
        self.pool.rebuild(cfg.particle_count, || {
            let mut p = spawn(rng, tuning, cfg, viewport);
            p.y = rng.range(0.0, viewport.height.max(0.0));
            p
        });

        self.stats.particles = self.pool.len();
        self.stats.rebuilds += 1;
        self.stats.settled = 0;
        self.stats.recycled = 0;
        log::debug!(
            "particle field rebuilt: {} particles on {}x{}",
            self.pool.len(),
            viewport.width,
            viewport.height
        );
    }

    /// Update size, fall speed and settle height of every particle in place.
    /// The pool size is untouched; use `rebuild` when the count changes.
    pub fn reparametrize(&mut self, config: &SimulationConfig) {
        self.config = config.clone();
        let height = self.viewport.height;
        for p in self.pool.as_mut_slice() {
            p.apply_config(
                &self.config,
                self.tuning.base_fall_speed,
                height,
                self.tuning.settle_band,
            );
        }
    }

    /// Advance every particle by `dt` seconds (clamped to the tuning's
    /// `max_delta`). Particles that settle are deposited into `layers`.
    /// Returns the number of particles that settled this step.
    pub fn step(&mut self, dt: f32, layers: &mut SettleLayers) -> usize {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.tuning.max_delta)
        } else {
            0.0
        };
        self.elapsed += dt;

        let Viewport { width, height } = self.viewport;
        let settle_chance = if self.config.settle_enabled {
            self.config.settle_intensity * self.tuning.settle_rate * dt
        } else {
            0.0
        };

        let mut settled = 0;
        for p in self.pool.as_mut_slice() {
            let wobble = (self.elapsed * self.tuning.wobble_freq + p.phase).sin()
                * self.tuning.wobble_amp
                * p.z;
            p.x += (p.vx + wobble) * dt;
            p.y += p.vy * dt;

            let margin = p.size;
            if p.x < -margin {
                p.x = width + margin;
            } else if p.x > width + margin {
                p.x = -margin;
            }

            if p.y > height + margin {
                if self.config.settle_enabled {
                    layers.deposit(p);
                    settled += 1;
                } else {
                    self.stats.recycled += 1;
                }
                *p = spawn(&mut self.rng, &self.tuning, &self.config, self.viewport);
            } else if settle_chance > 0.0
                && p.y > p.settle_height
                && self.rng.chance(settle_chance)
            {
                layers.deposit(p);
                *p = spawn(&mut self.rng, &self.tuning, &self.config, self.viewport);
                settled += 1;
            }
        }

        self.stats.settled += settled as u64;
        settled
    }

    /// Draw every particle as a soft dot in the skin color.
    pub fn render(&self, surface: &mut dyn Surface) {
        let color = self.config.color();
        for p in self.pool.as_slice() {
            surface.fill_circle(p.x, p.y, p.size * 0.5, color.with_alpha(p.opacity));
        }
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Seconds simulated since creation
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// A fresh particle just above the top edge at a random column.
fn spawn(
    rng: &mut ParticleRng,
    tuning: &FieldTuning,
    config: &SimulationConfig,
    viewport: Viewport,
) -> Particle {
    let z = rng.range(MIN_DEPTH, MAX_DEPTH);
    let mut p = Particle {
        x: rng.range(0.0, viewport.width.max(0.0)),
        y: 0.0,
        z,
        size: 0.0,
        vx: rng.range(-tuning.max_drift, tuning.max_drift) * z,
        vy: 0.0,
        opacity: 0.0,
        phase: rng.phase(),
        settle_height: 0.0,
    };
    p.apply_config(config, tuning.base_fall_speed, viewport.height, tuning.settle_band);
    p.y = -p.size;
    p
}
