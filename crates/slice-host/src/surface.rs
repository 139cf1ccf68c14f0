//! The host drawing surface.
//!
//! Modeled on an immediate-mode draw list: points are appended to an implicit
//! current path with [`DrawSurface::path_line_to`], and
//! [`DrawSurface::path_fill_convex`] fills and clears it. A surface is only
//! valid for the frame callback it was handed to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FillColor
// ---------------------------------------------------------------------------

/// Straight RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillColor(pub [f32; 4]);

impl FillColor {
    /// Construct from channels.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Pack as `0xAABBGGRR`, the layout immediate-mode draw lists take.
    ///
    /// Channels are clamped to `0.0..=1.0` and rounded to nearest.
    pub fn to_abgr_u32(self) -> u32 {
        let [r, g, b, a] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u32);
        (a << 24) | (b << 16) | (g << 8) | r
    }

    /// Whether every channel is finite and within `0.0..=1.0`.
    pub fn is_normalized(self) -> bool {
        self.0.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

// ---------------------------------------------------------------------------
// DrawSurface
// ---------------------------------------------------------------------------

/// Drawing primitives the overlay needs from the host.
pub trait DrawSurface {
    /// Size of the display in pixels. Used as clip bounds.
    fn display_size(&self) -> Vec2;

    /// Discard any points on the current path.
    fn begin_path(&mut self);

    /// Append a point to the current path.
    fn path_line_to(&mut self, point: Vec2);

    /// Fill the current path as a convex polygon and clear it.
    fn path_fill_convex(&mut self, color: FillColor);

    /// Measured size of `text` in pixels.
    fn text_size(&self, text: &str) -> Vec2;

    /// Padding the host adds around a text label, per axis.
    fn label_padding(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Draw a text label with its top-left corner at `at`.
    fn label(&mut self, at: Vec2, text: &str, background_alpha: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_alpha_high_red_low() {
        assert_eq!(FillColor::rgba(1.0, 0.0, 0.0, 1.0).to_abgr_u32(), 0xFF00_00FF);
        assert_eq!(FillColor::rgba(0.0, 0.0, 1.0, 0.0).to_abgr_u32(), 0x00FF_0000);
    }

    #[test]
    fn packing_rounds_to_nearest() {
        // 0.15 * 255 = 38.25 -> 38, 0.4 * 255 = 102.0 -> 102
        assert_eq!(FillColor::rgba(0.0, 0.0, 1.0, 0.15).to_abgr_u32() >> 24, 38);
        assert_eq!(FillColor::rgba(1.0, 0.0, 0.0, 0.4).to_abgr_u32() >> 24, 102);
    }

    #[test]
    fn packing_clamps() {
        assert_eq!(FillColor::rgba(2.0, -1.0, 0.0, 1.0).to_abgr_u32(), 0xFF00_00FF);
    }

    #[test]
    fn normalized_check() {
        assert!(FillColor::rgba(0.0, 1.0, 0.5, 0.15).is_normalized());
        assert!(!FillColor::rgba(0.0, 1.1, 0.5, 0.15).is_normalized());
        assert!(!FillColor::rgba(f32::NAN, 0.0, 0.0, 1.0).is_normalized());
    }
}
