//! Haze Render - the frame loop that drives the particle field
//!
//! This crate owns the running/stopped lifecycle of the effect: acquiring
//! and releasing the drawing surface, scheduling frame callbacks, and
//! stepping the simulation once per delivered frame. Hosts plug in through
//! the `RenderHost` trait; `HeadlessHost` is an in-process host used by the
//! CLI and tests.

mod canvas;
mod driver;
mod headless;
mod host;
mod recording;

pub use canvas::{AsciiCanvas, RAMP};
pub use driver::{DriverState, RenderDriver};
pub use headless::HeadlessHost;
pub use host::{FrameHandle, RenderHost};
pub use recording::{DrawOp, RecordingSurface};
