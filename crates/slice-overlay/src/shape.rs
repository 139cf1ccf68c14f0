//! Hazard zone tessellation and screen projection.
//!
//! Each [`HazardShape`] becomes one or more filled screen-space polygons:
//!
//! | Shape | Polygons | Points before clipping |
//! |-------|----------|------------------------|
//! | Circle | 1 | `2 * segments + 1` |
//! | One-sided strip | `slices` | 6 per slice |
//! | Two-sided strip | `2 * slices` | 6 per slice |
//!
//! World geometry lives on the horizontal plane through the marker: a facing
//! angle `a` points along `(sin a, 0, cos a)` and Y is held at the marker's
//! height.
//!
//! # Strips
//!
//! A strip is a corridor `length` long and `width` wide that starts at the
//! marker and extends along its heading. The heading is the marker rotation
//! turned by a quarter turn (both ways for a two-sided strip). The corridor is
//! cut into `slices` short quads that are projected and filled one at a time,
//! so a strip running off screen still shows its visible part. Every slice is
//! walked as a closed loop:
//!
//! ```text
//!   far_left -- far_mid -- far_right
//!      |                       |
//!   near_left - near_mid - near_right
//! ```
//!
//! `far_right, far_mid, far_left, near_left, near_mid, near_right`. Left is
//! the heading turned by `+PI/2`. A projected strip point is kept only if it
//! passes [`within_display_on_either_axis`].
//!
//! # Circles
//!
//! A circle is sampled at angles `i * PI / segments` for
//! `i in 0..=2 * segments`, so the last sample closes the loop onto the first.
//! Circle samples are not bounds tested.
//!
//! In both cases a point the projector cannot place is skipped and the rest of
//! the polygon is kept.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use slice_host::projection::{within_display_on_either_axis, Projector};
use slice_host::surface::{DrawSurface, FillColor};

use crate::config::{OverlayConfig, ShapeConfig, ShapePalette};
use crate::hazard::{HazardMarker, HazardShape};

/// Number of world points per strip slice.
pub const STRIP_SLICE_POINTS: usize = 6;

// ---------------------------------------------------------------------------
// World-space tessellation
// ---------------------------------------------------------------------------

/// Unit vector on the horizontal plane for facing angle `angle`.
#[inline]
pub fn facing(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, angle.cos())
}

/// Outline samples of a circle around `center` at the center's height.
///
/// Returns `2 * segments + 1` points; the last coincides with the first.
pub fn circle_outline(center: Vec3, radius: f32, segments: u32) -> Vec<Vec3> {
    let step = PI / segments as f32;
    (0..=u64::from(segments) * 2)
        .map(|i| {
            let theta = step * i as f32;
            Vec3::new(
                center.x + radius * theta.sin(),
                center.y,
                center.z + radius * theta.cos(),
            )
        })
        .collect()
}

/// World points of every slice of a strip, in fill order.
///
/// Slices run from the marker outwards; see the module docs for the point
/// order within a slice.
pub fn strip_slices(
    center: Vec3,
    heading: f32,
    length: f32,
    width: f32,
    slices: u32,
) -> Vec<[Vec3; STRIP_SLICE_POINTS]> {
    let half_width = width * 0.5;
    let left = center + facing(heading + FRAC_PI_2) * half_width;
    let right = center + facing(heading - FRAC_PI_2) * half_width;
    let step = facing(heading) * (length / slices as f32);

    (0..slices)
        .map(|k| {
            let near = step * k as f32;
            let far = step * (k + 1) as f32;
            [
                right + far,
                center + far,
                left + far,
                left + near,
                center + near,
                right + near,
            ]
        })
        .collect()
}

/// Strip headings for a marker rotation. Empty for circles.
pub fn strip_headings(shape: HazardShape, rotation: f32) -> Vec<f32> {
    match shape {
        HazardShape::OneSidedStrip => vec![rotation + FRAC_PI_2],
        HazardShape::TwoSidedStrip => vec![rotation + FRAC_PI_2, rotation - FRAC_PI_2],
        HazardShape::Circle => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Screen-space polygons
// ---------------------------------------------------------------------------

/// One filled polygon in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPolygon {
    pub points: Vec<Vec2>,
    pub color: FillColor,
}

/// Totals for one drawn marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub polygons: usize,
    pub points: usize,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.polygons += other.polygons;
        self.points += other.points;
    }
}

/// Turns hazard markers into filled screen polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeProjector {
    shapes: ShapeConfig,
    colors: ShapePalette,
}

impl Default for ShapeProjector {
    fn default() -> Self {
        Self::new(ShapeConfig::default(), ShapePalette::default())
    }
}

impl ShapeProjector {
    /// Projector with explicit geometry and colors.
    pub fn new(shapes: ShapeConfig, colors: ShapePalette) -> Self {
        Self { shapes, colors }
    }

    /// Projector using the shape and color sections of `config`.
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.shapes, config.colors)
    }

    /// Fill color for `shape`.
    pub fn color(&self, shape: HazardShape) -> FillColor {
        match shape {
            HazardShape::OneSidedStrip => self.colors.one_sided_strip,
            HazardShape::TwoSidedStrip => self.colors.two_sided_strip,
            HazardShape::Circle => self.colors.circle,
        }
    }

    /// Project a hazard zone to screen polygons.
    ///
    /// `display` is the screen size used for the strip bounds test.
    pub fn project<P: Projector + ?Sized>(
        &self,
        shape: HazardShape,
        center: Vec3,
        rotation: f32,
        projector: &P,
        display: Vec2,
    ) -> Vec<ProjectedPolygon> {
        let color = self.color(shape);
        match shape {
            HazardShape::Circle => {
                let points = circle_outline(center, self.shapes.circle_radius, self.shapes.circle_segments)
                    .into_iter()
                    .filter_map(|world| projector.world_to_screen(world))
                    .collect();
                vec![ProjectedPolygon { points, color }]
            }
            HazardShape::OneSidedStrip | HazardShape::TwoSidedStrip => {
                strip_headings(shape, rotation)
                    .into_iter()
                    .flat_map(|heading| {
                        strip_slices(
                            center,
                            heading,
                            self.shapes.strip_length,
                            self.shapes.strip_width,
                            self.shapes.strip_slices,
                        )
                    })
                    .map(|slice| ProjectedPolygon {
                        points: slice
                            .into_iter()
                            .filter_map(|world| projector.world_to_screen(world))
                            .filter(|screen| within_display_on_either_axis(*screen, display))
                            .collect(),
                        color,
                    })
                    .collect()
            }
        }
    }

    /// Project `marker` and fill its polygons on `surface`.
    pub fn draw<P, S>(&self, marker: &HazardMarker, projector: &P, surface: &mut S) -> DrawStats
    where
        P: Projector + ?Sized,
        S: DrawSurface + ?Sized,
    {
        let polygons = self.project(
            marker.shape,
            marker.position,
            marker.rotation,
            projector,
            surface.display_size(),
        );

        let mut stats = DrawStats::default();
        for polygon in &polygons {
            surface.begin_path();
            for point in &polygon.points {
                surface.path_line_to(*point);
            }
            surface.path_fill_convex(polygon.color);
            stats.polygons += 1;
            stats.points += polygon.points.len();
        }
        stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
