//! What the render loop needs from the host application

use haze_core::{Result, Viewport};
use haze_particles::Surface;

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host side of the render loop: surface ownership and frame scheduling.
///
/// Frame callbacks are delivered by the host calling
/// [`RenderDriver::on_frame`](crate::RenderDriver::on_frame) with the handle
/// returned from `request_frame`.
pub trait RenderHost {
    type Surface: Surface;

    /// Current size of the area the effect covers
    fn viewport(&self) -> Viewport;

    /// Create (or attach) the drawing surface. Failure keeps the effect off.
    fn acquire_surface(&mut self, viewport: Viewport) -> Result<Self::Surface>;

    /// Detach and free a surface obtained from `acquire_surface`.
    fn release_surface(&mut self, surface: Self::Surface);

    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a scheduled callback. Cancelling an already-delivered handle is
    /// harmless.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
