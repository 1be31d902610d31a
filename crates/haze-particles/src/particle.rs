//! Particle state and the fixed-size pool that owns it

use crate::curves::{inverse_lerp, lerp_f32};
use haze_core::SimulationConfig;

/// Nearest (smallest, slowest, faintest) depth a particle can have
pub const MIN_DEPTH: f32 = 0.4;
/// Farthest-forward depth
pub const MAX_DEPTH: f32 = 1.0;

/// One drifting particle. Positions are in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Depth factor in [MIN_DEPTH, MAX_DEPTH]; larger is closer to the viewer
    pub z: f32,
    /// Diameter in pixels
    pub size: f32,
    /// Lateral drift, px/s
    pub vx: f32,
    /// Fall speed, px/s
    pub vy: f32,
    pub opacity: f32,
    /// Per-particle offset for the sinusoidal wobble
    pub phase: f32,
    /// Vertical position past which the particle may settle
    pub settle_height: f32,
}

impl Particle {
    /// Normalized depth in [0, 1]
    pub fn depth_ratio(&self) -> f32 {
        inverse_lerp(MIN_DEPTH, MAX_DEPTH, self.z)
    }

    /// Recompute every field that derives from depth and config. Position,
    /// drift, and phase are left alone so a live retune is seamless.
    pub fn apply_config(
        &mut self,
        config: &SimulationConfig,
        base_fall_speed: f32,
        surface_height: f32,
        settle_band: (f32, f32),
    ) {
        let t = self.depth_ratio();
        self.size = config.particle_size * (0.5 + self.z);
        self.vy = base_fall_speed * self.z * config.fall_speed;
        self.opacity = lerp_f32(0.15, 0.6, t);
        // Closer particles settle lower on screen
        self.settle_height = surface_height * lerp_f32(settle_band.0, settle_band.1, t);
    }
}

/// Fixed-size particle storage.
///
/// The pool is sized once per rebuild and never grows or shrinks while the
/// simulation runs: out-of-bounds particles are recycled in place.
#[derive(Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    /// Drop all particles and build `count` fresh ones with `make`.
    /// Allocates exactly once.
    pub fn rebuild(&mut self, count: usize, mut make: impl FnMut() -> Particle) {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(make());
        }
        self.particles = particles;
    }

    /// Release the storage entirely.
    pub fn release(&mut self) {
        self.particles = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::{resolve, PlatformTier, SettingsStore};

    fn particle(z: f32) -> Particle {
        Particle {
            x: 10.0,
            y: 20.0,
            z,
            size: 0.0,
            vx: 3.0,
            vy: 0.0,
            opacity: 0.0,
            phase: 1.0,
            settle_height: 0.0,
        }
    }

    #[test]
    fn pool_rebuild_and_release() {
        let mut pool = ParticlePool::new();
        assert!(pool.is_empty());

        pool.rebuild(5, || particle(0.5));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.capacity(), 5);

        pool.rebuild(2, || particle(0.5));
        assert_eq!(pool.len(), 2);

        pool.release();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn apply_config_keeps_motion_state() {
        let cfg = resolve(&SettingsStore::new(), PlatformTier::Desktop, false);
        let mut p = particle(1.0);
        p.apply_config(&cfg, 30.0, 1000.0, (0.7, 0.95));

        assert_eq!((p.x, p.y, p.vx, p.phase), (10.0, 20.0, 3.0, 1.0));
        assert!((p.size - cfg.particle_size * 1.5).abs() < 1e-5);
        assert!((p.vy - 30.0 * cfg.fall_speed).abs() < 1e-5);
        assert!((p.settle_height - 950.0).abs() < 1e-3);
        assert!((p.opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn deeper_particles_are_smaller_and_slower() {
        let cfg = resolve(&SettingsStore::new(), PlatformTier::Desktop, false);
        let mut far = particle(MIN_DEPTH);
        let mut near = particle(MAX_DEPTH);
        far.apply_config(&cfg, 30.0, 1000.0, (0.7, 0.95));
        near.apply_config(&cfg, 30.0, 1000.0, (0.7, 0.95));
        assert!(far.size < near.size);
        assert!(far.vy < near.vy);
        assert!(far.opacity < near.opacity);
        assert!(far.settle_height < near.settle_height);
    }
}
