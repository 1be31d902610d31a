//! A surface that records draw calls instead of rasterizing them

use haze_core::{Color, Viewport};
use haze_particles::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
    Gradient {
        top: f32,
        bottom: f32,
        color: Color,
        top_alpha: f32,
        bottom_alpha: f32,
    },
}

/// Keeps the draw calls made since the last `clear`.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    ops: Vec<DrawOp>,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Draw calls of the current frame, in submission order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }

    pub fn gradients(&self) -> usize {
        self.ops.len() - self.circles()
    }

    /// Number of times the surface was cleared
    pub fn clears(&self) -> u64 {
        self.clears
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ops.clear();
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn fill_vertical_gradient(
        &mut self,
        top: f32,
        bottom: f32,
        color: Color,
        top_alpha: f32,
        bottom_alpha: f32,
    ) {
        self.ops.push(DrawOp::Gradient {
            top,
            bottom,
            color,
            top_alpha,
            bottom_alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_drops_recorded_ops() {
        let mut s = RecordingSurface::new(Viewport::new(10.0, 10.0));
        s.fill_circle(1.0, 1.0, 2.0, Color::WHITE);
        s.fill_vertical_gradient(5.0, 10.0, Color::WHITE, 0.0, 0.1);
        assert_eq!(s.circles(), 1);
        assert_eq!(s.gradients(), 1);

        s.clear();
        assert!(s.ops().is_empty());
        assert_eq!(s.clears(), 1);
    }
}
