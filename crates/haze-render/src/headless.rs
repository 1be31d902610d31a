//! In-process render host for the CLI and tests
//!
//! Frames are never delivered on their own: the caller pulls the next
//! scheduled handle with [`HeadlessHost::next_frame`] and hands it to the
//! driver, which makes every run deterministic.

use crate::canvas::AsciiCanvas;
use crate::host::{FrameHandle, RenderHost};
use crate::recording::RecordingSurface;
use haze_core::{HazeError, Result, Viewport};
use haze_particles::Surface;

pub struct HeadlessHost<S> {
    viewport: Viewport,
    make_surface: Box<dyn Fn(Viewport) -> S>,
    scheduled: Vec<FrameHandle>,
    next_handle: u64,
    live: usize,
    acquired: u64,
    released: u64,
    /// When set, every `acquire_surface` call fails
    pub fail_acquire: bool,
}

impl<S: Surface> HeadlessHost<S> {
    pub fn new(viewport: Viewport, make_surface: impl Fn(Viewport) -> S + 'static) -> Self {
        Self {
            viewport,
            make_surface: Box::new(make_surface),
            scheduled: Vec::new(),
            next_handle: 1,
            live: 0,
            acquired: 0,
            released: 0,
            fail_acquire: false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Deliver the oldest scheduled frame: it is removed from the schedule
    /// and returned for the caller to pass to `on_frame`.
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        if self.scheduled.is_empty() {
            None
        } else {
            Some(self.scheduled.remove(0))
        }
    }

    /// Frame callbacks requested and neither delivered nor cancelled
    pub fn scheduled_frames(&self) -> usize {
        self.scheduled.len()
    }

    /// Surfaces acquired and not yet released
    pub fn live_surfaces(&self) -> usize {
        self.live
    }

    pub fn surfaces_acquired(&self) -> u64 {
        self.acquired
    }

    pub fn surfaces_released(&self) -> u64 {
        self.released
    }
}

impl HeadlessHost<RecordingSurface> {
    pub fn recording(viewport: Viewport) -> Self {
        Self::new(viewport, RecordingSurface::new)
    }
}

impl HeadlessHost<AsciiCanvas> {
    /// Host whose surfaces rasterize into a character grid of
    /// `cols`x`rows` cells.
    pub fn ascii(viewport: Viewport, cols: usize, rows: usize) -> Self {
        Self::new(viewport, move |vp| AsciiCanvas::new(vp, cols, rows))
    }
}

impl<S: Surface> RenderHost for HeadlessHost<S> {
    type Surface = S;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn acquire_surface(&mut self, viewport: Viewport) -> Result<S> {
        if self.fail_acquire {
            return Err(HazeError::SurfaceUnavailable(
                "headless host refused the surface".to_string(),
            ));
        }
        self.live += 1;
        self.acquired += 1;
        Ok((self.make_surface)(viewport))
    }

    fn release_surface(&mut self, surface: S) {
        drop(surface);
        self.live = self.live.saturating_sub(1);
        self.released += 1;
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.scheduled.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_delivered_in_order() {
        let mut host = HeadlessHost::recording(Viewport::new(100.0, 100.0));
        let a = host.request_frame();
        let b = host.request_frame();
        assert_eq!(host.scheduled_frames(), 2);
        assert_eq!(host.next_frame(), Some(a));
        assert_eq!(host.next_frame(), Some(b));
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn cancel_removes_only_that_frame() {
        let mut host = HeadlessHost::recording(Viewport::new(100.0, 100.0));
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.next_frame(), Some(b));
    }

    #[test]
    fn surface_accounting() {
        let mut host = HeadlessHost::recording(Viewport::new(100.0, 100.0));
        let s = host.acquire_surface(Viewport::new(100.0, 100.0)).unwrap();
        assert_eq!(host.live_surfaces(), 1);
        host.release_surface(s);
        assert_eq!(host.live_surfaces(), 0);
        assert_eq!(host.surfaces_acquired(), 1);
        assert_eq!(host.surfaces_released(), 1);

        host.fail_acquire = true;
        assert!(host.acquire_surface(Viewport::new(100.0, 100.0)).is_err());
        assert_eq!(host.live_surfaces(), 0);
    }
}
