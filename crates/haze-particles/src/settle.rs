//! Settled layers: bands of fog deposited at the bottom of the surface

use crate::particle::Particle;
use crate::rand::ParticleRng;
use crate::surface::Surface;
use haze_core::Color;
use std::collections::VecDeque;

/// Maximum number of bands kept at once
pub const LAYER_CAPACITY: usize = 5;

pub const LAYER_MIN_HEIGHT: f32 = 16.0;
pub const LAYER_MAX_HEIGHT: f32 = 48.0;
pub const LAYER_MIN_DENSITY: f32 = 0.04;
pub const LAYER_MAX_DENSITY: f32 = 0.12;

/// A static band produced when a particle settles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledLayer {
    /// Band height in pixels, measured up from the bottom edge
    pub height: f32,
    /// Opacity at the bottom edge
    pub density: f32,
    /// Multiplier on `density`, in [0, 1]
    pub fade: f32,
    /// Insertion order, starting at 0
    pub seq: u64,
}

/// Bounded FIFO of settled layers. Oldest layers are drawn first and
/// evicted first.
#[derive(Debug)]
pub struct SettleLayers {
    layers: VecDeque<SettledLayer>,
    capacity: usize,
    next_seq: u64,
    rng: ParticleRng,
}

impl SettleLayers {
    pub fn new(seed: u32) -> Self {
        Self::with_capacity(LAYER_CAPACITY, seed)
    }

    pub fn with_capacity(capacity: usize, seed: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            layers: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
            rng: ParticleRng::new(seed),
        }
    }

    /// Turn a settling particle into a new band, evicting the oldest band if
    /// the accumulator is full. Returns the new band.
    pub fn deposit(&mut self, particle: &Particle) -> SettledLayer {
        let density = self.rng.range(LAYER_MIN_DENSITY, LAYER_MAX_DENSITY)
            * particle.opacity.clamp(0.0, 1.0).max(0.5);
        let layer = SettledLayer {
            height: self.rng.range(LAYER_MIN_HEIGHT, LAYER_MAX_HEIGHT),
            density,
            fade: 1.0,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        if self.layers.len() == self.capacity {
            self.layers.pop_front();
        }
        self.layers.push_back(layer);
        layer
    }

    /// Draw every band as a gradient from transparent to its density,
    /// oldest first so newer bands stack on top.
    pub fn render(&self, surface: &mut dyn Surface, color: Color) {
        let bottom = surface.viewport().height;
        for layer in &self.layers {
            surface.fill_vertical_gradient(
                bottom - layer.height,
                bottom,
                color,
                0.0,
                layer.density * layer.fade,
            );
        }
    }

    /// Remove every band. Idempotent; keeps the allocation.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bands from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &SettledLayer> {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::Viewport;

    fn particle() -> Particle {
        Particle {
            x: 0.0,
            y: 0.0,
            z: 0.7,
            size: 3.0,
            vx: 0.0,
            vy: 10.0,
            opacity: 0.4,
            phase: 0.0,
            settle_height: 0.0,
        }
    }

    /// Records gradient calls only
    struct Bands {
        calls: Vec<(f32, f32, f32)>,
    }

    impl Surface for Bands {
        fn viewport(&self) -> Viewport {
            Viewport::new(100.0, 200.0)
        }
        fn resize(&mut self, _viewport: Viewport) {}
        fn clear(&mut self) {}
        fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32, _color: Color) {}
        fn fill_vertical_gradient(
            &mut self,
            top: f32,
            bottom: f32,
            _color: Color,
            top_alpha: f32,
            bottom_alpha: f32,
        ) {
            assert_eq!(top_alpha, 0.0);
            self.calls.push((top, bottom, bottom_alpha));
        }
    }

    #[test]
    fn deposit_ranges() {
        let mut layers = SettleLayers::new(1);
        for _ in 0..50 {
            let layer = layers.deposit(&particle());
            assert!((LAYER_MIN_HEIGHT..LAYER_MAX_HEIGHT).contains(&layer.height));
            assert!(layer.density > 0.0 && layer.density < LAYER_MAX_DENSITY);
            assert_eq!(layer.fade, 1.0);
        }
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut layers = SettleLayers::new(3);
        for i in 0..100 {
            layers.deposit(&particle());
            assert!(layers.len() <= LAYER_CAPACITY, "after {i} deposits");
        }
        assert_eq!(layers.len(), LAYER_CAPACITY);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut layers = SettleLayers::new(3);
        for _ in 0..LAYER_CAPACITY {
            layers.deposit(&particle());
        }
        let seqs: Vec<u64> = layers.iter().map(|l| l.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);

        layers.deposit(&particle());
        layers.deposit(&particle());
        let seqs: Vec<u64> = layers.iter().map(|l| l.seq).collect();
        assert_eq!(seqs, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut layers = SettleLayers::new(3);
        layers.deposit(&particle());
        layers.clear();
        assert!(layers.is_empty());
        layers.clear();
        assert!(layers.is_empty());
        // sequence numbers keep increasing across clears
        assert_eq!(layers.deposit(&particle()).seq, 1);
    }

    #[test]
    fn render_draws_oldest_first_from_bottom() {
        let mut layers = SettleLayers::new(5);
        let first = layers.deposit(&particle());
        let second = layers.deposit(&particle());

        let mut surface = Bands { calls: Vec::new() };
        layers.render(&mut surface, Color::WHITE);

        assert_eq!(surface.calls.len(), 2);
        assert_eq!(surface.calls[0], (200.0 - first.height, 200.0, first.density));
        assert_eq!(surface.calls[1], (200.0 - second.height, 200.0, second.density));
    }
}
