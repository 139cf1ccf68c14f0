//! World-to-screen projection provided by the host camera.

use glam::{Vec2, Vec3};

/// Converts world positions to screen coordinates.
///
/// `None` means the host could not place the point on screen at all (behind
/// the camera, outside the projection frustum). A returned point may still
/// lie outside the display; callers apply their own bounds test.
pub trait Projector {
    /// Project a world-space point to screen space in pixels.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

impl<P: Projector + ?Sized> Projector for &P {
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        (**self).world_to_screen(world)
    }
}

/// Whether `point` lies inside `[0, size.x)` on X **or** inside `[0, size.y)`
/// on Y. A point in range on only one axis passes.
#[inline]
pub fn within_display_on_either_axis(point: Vec2, size: Vec2) -> bool {
    let x_in = point.x >= 0.0 && point.x < size.x;
    let y_in = point.y >= 0.0 && point.y < size.y;
    x_in || y_in
}
