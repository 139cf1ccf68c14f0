//! Object labels for diagnosing marker detection.
//!
//! When enabled, every in-range object gets a text label at its projected
//! position showing its address, entity id, table index, kind, model id, name
//! and distance. Labels fade with distance and are skipped when they would run
//! past the right or bottom edge of the display.
//!
//! The status line is a single label in the top-left corner showing the gate
//! inputs: territory, local player, login state, and object table size. It is
//! drawn before the gates are checked, so it stays visible while gated.

use glam::Vec2;
use slice_host::events::TerritoryId;
use slice_host::object::GameObject;
use slice_host::projection::Projector;
use slice_host::surface::DrawSurface;

use crate::hazard::Sighting;

/// Extra room reserved around a label, per axis, on top of host padding.
pub const LABEL_SAFETY_MARGIN: f32 = 10.0;

/// Labels never fade below this background alpha.
pub const MIN_LABEL_ALPHA: f32 = 0.2;

/// Top-left corner of the status line.
pub const STATUS_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);

/// Label text for a sighting.
pub fn label_text(sighting: &Sighting) -> String {
    let object = &sighting.object;
    let model = sighting
        .model_id
        .map_or_else(|| "?".to_owned(), |model| model.to_string());
    format!(
        "{:X}:{}[{}] - {} - {}: {} - {:.2}",
        object.address, object.entity_id, object.index, object.kind, model, object.name, sighting.distance
    )
}

/// Background alpha for a label at `distance`.
pub fn label_alpha(distance: f32, max_distance: f32) -> f32 {
    (1.0 - distance / max_distance).max(MIN_LABEL_ALPHA)
}

/// Gate inputs shown on the status line.
#[derive(Debug, Clone)]
pub struct GateStatus {
    /// Last territory the host reported, if any.
    pub territory: Option<TerritoryId>,
    pub player: Option<GameObject>,
    pub logged_in: bool,
    pub in_designated_territory: bool,
    /// Slots in the object table.
    pub object_count: usize,
}

/// Status line text.
pub fn status_text(status: &GateStatus) -> String {
    let territory = status
        .territory
        .map_or_else(|| "-".to_owned(), |territory| territory.to_string());
    let player = status.player.as_ref().map_or_else(
        || "-".to_owned(),
        |player| format!("{} ({})", player.name, player.entity_id),
    );
    format!(
        "Current zone: {territory} Player: {player} Logged in: {}, In designated territory: {}, Objects: {}",
        status.logged_in,
        if status.in_designated_territory { "Yes" } else { "No" },
        status.object_count
    )
}

/// Draw the status line at [`STATUS_ORIGIN`]. Returns whether it fit.
pub fn draw_status<S: DrawSurface + ?Sized>(status: &GateStatus, surface: &mut S) -> bool {
    let text = status_text(status);
    if !fits(surface, STATUS_ORIGIN, &text) {
        return false;
    }
    surface.label(STATUS_ORIGIN, &text, 1.0);
    true
}

fn fits<S: DrawSurface + ?Sized>(surface: &S, at: Vec2, text: &str) -> bool {
    let size = surface.text_size(text) + surface.label_padding() + Vec2::splat(LABEL_SAFETY_MARGIN);
    let display = surface.display_size();
    at.x + size.x <= display.x && at.y + size.y <= display.y
}

/// Draw the label for `sighting`. Returns whether a label was drawn.
pub fn draw_label<P, S>(
    sighting: &Sighting,
    max_distance: f32,
    projector: &P,
    surface: &mut S,
) -> bool
where
    P: Projector + ?Sized,
    S: DrawSurface + ?Sized,
{
    if sighting.distance > max_distance {
        return false;
    }
    let Some(at) = projector.world_to_screen(sighting.object.position) else {
        return false;
    };

    let text = label_text(sighting);
    if !fits(surface, at, &text) {
        return false;
    }

    surface.label(at, &text, label_alpha(sighting.distance, max_distance));
    true
}
