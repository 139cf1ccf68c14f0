//! In-memory host used by tests, benches and the headless replay driver.
//!
//! Nothing here touches a real client. [`SceneHost`] is an editable object
//! table, [`FlatProjector`] is a top-down camera, [`RecordingSurface`] keeps
//! every polygon and label it is asked to draw, and [`RecordingRegistry`]
//! tracks live subscriptions.

use glam::{Vec2, Vec3};

use crate::client::ClientView;
use crate::entity::EntityId;
use crate::events::{EventKind, EventRegistry, SubscriptionToken, TerritoryId};
use crate::object::{GameObject, NativeBlock, ObjectKind};
use crate::projection::Projector;
use crate::surface::{DrawSurface, FillColor};

// ---------------------------------------------------------------------------
// Object constructors
// ---------------------------------------------------------------------------

/// An [`ObjectKind::EventObj`] carrying `model_id` in its native block.
pub fn event_object(entity_id: u32, model_id: i32, position: Vec3, rotation: f32) -> GameObject {
    GameObject {
        index: 0,
        entity_id: EntityId::new(entity_id),
        kind: ObjectKind::EventObj,
        name: String::new(),
        position,
        rotation,
        address: 0x1_4000_0000 + u64::from(entity_id) * 0x1A0,
        native: NativeBlock::with_model_id(model_id),
    }
}

/// A player object at `position`.
pub fn player_object(entity_id: u32, position: Vec3) -> GameObject {
    GameObject {
        kind: ObjectKind::Player,
        name: "Local Player".to_owned(),
        native: NativeBlock::with_model_id(0),
        ..event_object(entity_id, 0, position, 0.0)
    }
}

// ---------------------------------------------------------------------------
// SceneHost
// ---------------------------------------------------------------------------

/// Editable object table with an optional local player.
#[derive(Debug, Clone)]
pub struct SceneHost {
    /// Reported login state.
    pub logged_in: bool,
    slots: Vec<Option<GameObject>>,
    player_slot: Option<usize>,
}

impl Default for SceneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost {
    /// Logged in, empty table, no player.
    pub fn new() -> Self {
        Self {
            logged_in: true,
            slots: Vec::new(),
            player_slot: None,
        }
    }

    /// Insert `object` in the first free slot and return the slot index.
    ///
    /// The object's `index` field is overwritten with the slot index.
    pub fn insert(&mut self, mut object: GameObject) -> usize {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len());
        object.index = index;
        if index == self.slots.len() {
            self.slots.push(Some(object));
        } else {
            self.slots[index] = Some(object);
        }
        index
    }

    /// Insert a player object and mark it as the local player.
    pub fn insert_player(&mut self, position: Vec3) -> usize {
        let index = self.insert(player_object(0x1000_0001, position));
        self.player_slot = Some(index);
        index
    }

    /// Empty slot `index`. Returns the removed object.
    pub fn remove(&mut self, index: usize) -> Option<GameObject> {
        if self.player_slot == Some(index) {
            self.player_slot = None;
        }
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Mutable access to an occupied slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut GameObject> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Move the local player, if any.
    pub fn move_player(&mut self, position: Vec3) {
        let Some(index) = self.player_slot else {
            return;
        };
        if let Some(player) = self.get_mut(index) {
            player.position = position;
        }
    }
}

impl ClientView for SceneHost {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn object_count(&self) -> usize {
        self.slots.len()
    }

    fn object(&self, index: usize) -> Option<GameObject> {
        self.slots.get(index).cloned().flatten()
    }

    fn local_player(&self) -> Option<GameObject> {
        self.player_slot.and_then(|index| self.object(index))
    }
}

// ---------------------------------------------------------------------------
// FlatProjector
// ---------------------------------------------------------------------------

/// Top-down orthographic camera: `screen = world.xz * scale + offset`.
///
/// With `near_z` set, points with `world.z < near_z` are reported as not
/// projectable, standing in for "behind the camera".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProjector {
    pub scale: f32,
    pub offset: Vec2,
    pub near_z: Option<f32>,
}

impl FlatProjector {
    /// `screen = world.xz`.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            near_z: None,
        }
    }

    /// Scaled and shifted so that world `center` lands at screen `target`.
    pub fn centered(center: Vec3, target: Vec2, scale: f32) -> Self {
        Self {
            scale,
            offset: target - Vec2::new(center.x, center.z) * scale,
            near_z: None,
        }
    }

    /// Same camera with a "behind camera" cutoff.
    pub fn with_near_z(self, near_z: f32) -> Self {
        Self {
            near_z: Some(near_z),
            ..self
        }
    }
}

impl Projector for FlatProjector {
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        if self.near_z.is_some_and(|near| world.z < near) {
            return None;
        }
        Some(Vec2::new(world.x, world.z) * self.scale + self.offset)
    }
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// A filled polygon captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPolygon {
    pub points: Vec<Vec2>,
    pub color: FillColor,
}

/// A text label captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLabel {
    pub at: Vec2,
    pub text: String,
    pub background_alpha: f32,
}

/// Draw surface that records instead of rasterizing.
///
/// Text is measured as a fixed-width font of `glyph` pixels per character.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub display: Vec2,
    pub glyph: Vec2,
    pub padding: Vec2,
    pub polygons: Vec<RecordedPolygon>,
    pub labels: Vec<RecordedLabel>,
    current: Vec<Vec2>,
}

impl RecordingSurface {
    /// Empty surface of the given display size.
    pub fn new(display: Vec2) -> Self {
        Self {
            display,
            glyph: Vec2::new(7.0, 13.0),
            padding: Vec2::new(8.0, 8.0),
            polygons: Vec::new(),
            labels: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Total number of points across all recorded polygons.
    pub fn point_count(&self) -> usize {
        self.polygons.iter().map(|p| p.points.len()).sum()
    }

    /// Points appended since the last fill.
    pub fn pending_points(&self) -> &[Vec2] {
        &self.current
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.labels.clear();
        self.current.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn display_size(&self) -> Vec2 {
        self.display
    }

    fn begin_path(&mut self) {
        self.current.clear();
    }

    fn path_line_to(&mut self, point: Vec2) {
        self.current.push(point);
    }

    fn path_fill_convex(&mut self, color: FillColor) {
        let points = std::mem::take(&mut self.current);
        self.polygons.push(RecordedPolygon { points, color });
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(self.glyph.x * text.chars().count() as f32, self.glyph.y)
    }

    fn label_padding(&self) -> Vec2 {
        self.padding
    }

    fn label(&mut self, at: Vec2, text: &str, background_alpha: f32) {
        self.labels.push(RecordedLabel {
            at,
            text: text.to_owned(),
            background_alpha,
        });
    }
}

// ---------------------------------------------------------------------------
// RecordingRegistry
// ---------------------------------------------------------------------------

/// Event registry that tracks live subscriptions.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistry {
    pub territory: TerritoryId,
    live: Vec<(SubscriptionToken, EventKind)>,
    next_token: u64,
}

impl RecordingRegistry {
    /// Registry reporting `territory` as current.
    pub fn in_territory(territory: TerritoryId) -> Self {
        Self {
            territory,
            ..Self::default()
        }
    }

    /// Number of live subscriptions of `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.live.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Total live subscriptions.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl EventRegistry for RecordingRegistry {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionToken {
        self.next_token += 1;
        let token = SubscriptionToken::new(self.next_token);
        self.live.push((token, kind));
        token
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.live.len();
        self.live.retain(|(t, _)| *t != token);
        self.live.len() != before
    }

    fn current_territory(&self) -> TerritoryId {
        self.territory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_reuses_freed_slots() {
        let mut scene = SceneHost::new();
        let a = scene.insert(event_object(1, 0, Vec3::ZERO, 0.0));
        let b = scene.insert(event_object(2, 0, Vec3::ZERO, 0.0));
        assert_eq!((a, b), (0, 1));
        scene.remove(a);
        let c = scene.insert(event_object(3, 0, Vec3::ZERO, 0.0));
        assert_eq!(c, 0);
        assert_eq!(scene.object(0).unwrap().entity_id, EntityId::new(3));
        assert_eq!(scene.objects().count(), 2);
    }

    #[test]
    fn missing_player_reports_origin() {
        let scene = SceneHost::new();
        assert_eq!(scene.local_player_position(), Vec3::ZERO);
    }

    #[test]
    fn player_position_tracks_moves() {
        let mut scene = SceneHost::new();
        scene.insert_player(Vec3::new(1.0, 2.0, 3.0));
        scene.move_player(Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(scene.local_player_position(), Vec3::new(4.0, 0.0, 4.0));
    }

    #[test]
    fn flat_projector_near_cutoff() {
        let projector = FlatProjector::identity().with_near_z(0.0);
        assert_eq!(
            projector.world_to_screen(Vec3::new(3.0, 9.0, 4.0)),
            Some(Vec2::new(3.0, 4.0))
        );
        assert_eq!(projector.world_to_screen(Vec3::new(3.0, 0.0, -0.5)), None);
    }

    #[test]
    fn centered_projector_maps_center_to_target() {
        let center = Vec3::new(10.0, 5.0, -2.0);
        let projector = FlatProjector::centered(center, Vec2::new(960.0, 540.0), 20.0);
        assert_eq!(projector.world_to_screen(center), Some(Vec2::new(960.0, 540.0)));
    }

    #[test]
    fn registry_tokens_are_distinct_and_removable() {
        let mut registry = RecordingRegistry::in_territory(144);
        let draw = registry.subscribe(EventKind::Draw);
        let zone = registry.subscribe(EventKind::TerritoryChanged);
        assert_ne!(draw, zone);
        assert_eq!(registry.live_count(), 2);
        assert!(registry.unsubscribe(draw));
        assert!(!registry.unsubscribe(draw));
        assert_eq!(registry.subscriber_count(EventKind::Draw), 0);
        assert_eq!(registry.subscriber_count(EventKind::TerritoryChanged), 1);
    }
}
