//! Haze Particles - CPU particle field for the ambient effect
//!
//! Provides the allocation-stable simulation:
//! - `ParticleField` - fixed pool of drifting particles with wrap/recycle
//! - `SettleLayers` - bounded FIFO of fog bands deposited at the bottom
//! - `Surface` - the two drawing primitives the effect needs
//! - `ParticleRng` - small seedable PRNG

pub mod curves;
pub mod field;
pub mod particle;
pub mod rand;
pub mod settle;
mod surface;

pub use field::{FieldStats, FieldTuning, ParticleField};
pub use particle::{Particle, ParticlePool};
pub use rand::ParticleRng;
pub use settle::{SettleLayers, SettledLayer, LAYER_CAPACITY};
pub use surface::Surface;
