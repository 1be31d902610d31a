//! Haze Runtime - Frame timing and activation
//!
//! Provides the building blocks between the host and the render loop:
//! - `FrameClock` - clamped per-frame delta time
//! - `HostEvent` / `EventBus` - queued host notifications
//! - `EffectDriver` - trait for the render loop the machine controls
//! - `ActivationMachine` - signals + config -> start/stop decisions
//! - `Poller` / `HostProbe` - polling fallback for missed host events

pub mod activation;
mod clock;
mod event;
mod event_bus;
pub mod poll;
pub mod screen;
mod signals;
mod system;

pub use activation::{should_run, ActivationMachine, Transitions};
pub use clock::{FrameClock, MAX_FRAME_DELTA};
pub use event::HostEvent;
pub use event_bus::EventBus;
pub use poll::{HostProbe, Poller, StaticProbe, POLL_INTERVAL};
pub use screen::{ScreenClass, ScreenDescriptor, ScreenRules};
pub use signals::{ActivationSignals, Signal};
pub use system::EffectDriver;
