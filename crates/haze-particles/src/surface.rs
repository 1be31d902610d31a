//! Drawing target abstraction

use haze_core::{Color, Viewport};

/// The 2D surface the effect draws on, in pixel coordinates with the origin
/// at the top-left corner.
///
/// Implementations only need the two primitives the effect uses; blending is
/// source-over with the color's alpha.
pub trait Surface {
    fn viewport(&self) -> Viewport;

    fn resize(&mut self, viewport: Viewport);

    /// Make every pixel fully transparent.
    fn clear(&mut self);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);

    /// Fill the full-width band `[top, bottom)` with `color`, its alpha going
    /// linearly from `top_alpha` at the top edge to `bottom_alpha` at the
    /// bottom edge.
    fn fill_vertical_gradient(
        &mut self,
        top: f32,
        bottom: f32,
        color: Color,
        top_alpha: f32,
        bottom_alpha: f32,
    );
}
