//! Hazard marker classification.
//!
//! A hazard marker is an [`ObjectKind::EventObj`] prop whose model id is one
//! of three telegraph models. Each model maps to one [`HazardShape`].
//! [`scan`] walks the object table once, drops everything out of range, and
//! reports a [`Sighting`] per in-range object with its marker classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slice_host::client::ClientView;
use slice_host::entity::EntityId;
use slice_host::object::{GameObject, ObjectKind};

/// Model id of the one-sided strip telegraph.
pub const MODEL_ONE_SIDED_STRIP: i32 = 2_010_777;
/// Model id of the two-sided strip telegraph.
pub const MODEL_TWO_SIDED_STRIP: i32 = 2_010_778;
/// Model id of the circle telegraph.
pub const MODEL_CIRCLE: i32 = 2_010_779;

// ---------------------------------------------------------------------------
// HazardShape
// ---------------------------------------------------------------------------

/// Shape class of a hazard zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardShape {
    /// One rectangular corridor.
    OneSidedStrip,
    /// Two corridors extending to both sides of the marker.
    TwoSidedStrip,
    /// A filled disc.
    Circle,
}

impl HazardShape {
    /// All shapes, in model id order.
    pub const ALL: [HazardShape; 3] = [Self::OneSidedStrip, Self::TwoSidedStrip, Self::Circle];

    /// Shape for a recognized model id.
    pub fn from_model_id(model_id: i32) -> Option<Self> {
        match model_id {
            MODEL_ONE_SIDED_STRIP => Some(Self::OneSidedStrip),
            MODEL_TWO_SIDED_STRIP => Some(Self::TwoSidedStrip),
            MODEL_CIRCLE => Some(Self::Circle),
            _ => None,
        }
    }

    /// The model id this shape is identified by.
    pub fn model_id(self) -> i32 {
        match self {
            Self::OneSidedStrip => MODEL_ONE_SIDED_STRIP,
            Self::TwoSidedStrip => MODEL_TWO_SIDED_STRIP,
            Self::Circle => MODEL_CIRCLE,
        }
    }
}

// ---------------------------------------------------------------------------
// HazardMarker
// ---------------------------------------------------------------------------

/// A hazard marker seen this frame. Rebuilt every frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardMarker {
    pub entity_id: EntityId,
    pub model_id: i32,
    pub shape: HazardShape,
    pub position: Vec3,
    /// Facing angle in radians.
    pub rotation: f32,
}

impl HazardMarker {
    /// Classify an object whose model id has already been read.
    ///
    /// Returns `None` unless the object is an event prop with a hazard model.
    /// Range is not checked here.
    pub fn from_object(object: &GameObject, model_id: i32) -> Option<Self> {
        if object.kind != ObjectKind::EventObj {
            return None;
        }
        let shape = HazardShape::from_model_id(model_id)?;
        Some(Self::with_shape(object, model_id, shape))
    }

    /// Build a marker of a given shape for any object.
    pub fn with_shape(object: &GameObject, model_id: i32, shape: HazardShape) -> Self {
        Self {
            entity_id: object.entity_id,
            model_id,
            shape,
            position: object.position,
            rotation: object.rotation,
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// One object within range of the player.
#[derive(Debug, Clone)]
pub struct Sighting {
    pub object: GameObject,
    /// Distance to the player.
    pub distance: f32,
    /// Model id, or `None` if the native block could not be read.
    pub model_id: Option<i32>,
    /// Hazard classification, if the object is a marker.
    pub marker: Option<HazardMarker>,
}

/// Result of one pass over the object table.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Number of occupied slots visited.
    pub objects_scanned: usize,
    /// Objects within range, in table order.
    pub sightings: Vec<Sighting>,
}

impl Scan {
    /// Iterate the hazard markers found.
    pub fn markers(&self) -> impl Iterator<Item = &HazardMarker> + '_ {
        self.sightings.iter().filter_map(|s| s.marker.as_ref())
    }

    /// Number of in-range objects whose model id could not be read.
    pub fn unreadable(&self) -> usize {
        self.sightings.iter().filter(|s| s.model_id.is_none()).count()
    }
}

/// Visit every object within `max_distance` of `player` and classify it.
///
/// An object at exactly `max_distance` is in range. Objects whose native block
/// is unreadable are kept as sightings without a model and logged.
pub fn scan<C: ClientView + ?Sized>(client: &C, player: Vec3, max_distance: f32) -> Scan {
    let mut scan = Scan::default();
    for index in 0..client.object_count() {
        let Some(object) = client.object(index) else {
            continue;
        };
        scan.objects_scanned += 1;

        let distance = object.position.distance(player);
        if distance > max_distance {
            continue;
        }

        let model_id = match object.model_id() {
            Ok(model_id) => Some(model_id),
            Err(e) => {
                tracing::warn!(
                    entity = %object.entity_id,
                    index = object.index,
                    error = %e,
                    "skipping object with unreadable model id"
                );
                None
            }
        };
        let marker = model_id.and_then(|model_id| HazardMarker::from_object(&object, model_id));

        scan.sightings.push(Sighting {
            object,
            distance,
            model_id,
            marker,
        });
    }
    scan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
