//! Property tests for classification, spawn debounce and shape geometry.
//!
//! These tests use `proptest` to generate random scenes, frame timelines and
//! marker poses, and check the overlay's invariants against a simple model.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use slice_host::entity::EntityId;
use slice_host::object::ObjectKind;
use slice_host::testing::{event_object, FlatProjector, SceneHost};
use slice_overlay::debounce::{SpawnKey, SpawnState, SpawnTracker};
use slice_overlay::hazard::{self, HazardMarker, HazardShape};
use slice_overlay::shape::{circle_outline, strip_headings, strip_slices, ShapeProjector};

const WINDOW: Duration = Duration::from_secs(5);

/// Strategy that generates finite coordinates within a few hundred yalms.
fn coord() -> impl Strategy<Value = f32> {
    (-40_000i32..40_000i32).prop_map(|v| v as f32 * 0.01)
}

fn angle() -> impl Strategy<Value = f32> {
    (-3142i32..3142i32).prop_map(|v| v as f32 * 0.001)
}

fn non_hazard_model() -> impl Strategy<Value = i32> {
    any::<i32>().prop_filter("hazard model", |m| HazardShape::from_model_id(*m).is_none())
}

fn non_event_kind() -> impl Strategy<Value = ObjectKind> {
    (0u8..=16).prop_map(ObjectKind::from_raw).prop_filter("event prop", |k| *k != ObjectKind::EventObj)
}

fn hazard_shape() -> impl Strategy<Value = HazardShape> {
    prop::sample::select(HazardShape::ALL.to_vec())
}

fn key(entity: u32) -> SpawnKey {
    SpawnKey {
        entity_id: EntityId::new(entity),
        model_id: HazardShape::Circle.model_id(),
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn unrecognized_models_never_classify(model in non_hazard_model(), x in coord(), z in coord()) {
        let object = event_object(1, model, Vec3::new(x, 0.0, z), 0.0);
        prop_assert!(HazardMarker::from_object(&object, model).is_none());
    }

    #[test]
    fn only_event_props_classify(shape in hazard_shape(), kind in non_event_kind()) {
        let mut object = event_object(1, shape.model_id(), Vec3::ZERO, 0.0);
        object.kind = kind;
        prop_assert!(HazardMarker::from_object(&object, shape.model_id()).is_none());
    }

    #[test]
    fn scan_keeps_exactly_the_markers_in_range(
        objects in prop::collection::vec((hazard_shape(), coord(), coord()), 0..40),
        px in coord(),
        pz in coord(),
    ) {
        let player = Vec3::new(px, 0.0, pz);
        let mut scene = SceneHost::new();
        let mut expected = Vec::new();
        for (i, (shape, x, z)) in objects.iter().enumerate() {
            let position = Vec3::new(*x, 0.0, *z);
            let entity = 0x4000_0000 + i as u32;
            scene.insert(event_object(entity, shape.model_id(), position, 0.0));
            if position.distance(player) <= 30.0 {
                expected.push(EntityId::new(entity));
            }
        }

        let scan = hazard::scan(&scene, player, 30.0);
        let found: Vec<EntityId> = scan.markers().map(|m| m.entity_id).collect();
        prop_assert_eq!(found, expected);
        prop_assert_eq!(scan.objects_scanned, objects.len());
    }
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    /// Continuously observed marker: ready exactly when the window has passed.
    #[test]
    fn continuous_sighting_is_ready_after_window(steps in prop::collection::vec(0u64..2_000, 1..40)) {
        let t0 = Instant::now();
        let mut tracker = SpawnTracker::new(WINDOW);
        let mut elapsed = Duration::ZERO;

        tracker.begin_frame();
        prop_assert_eq!(tracker.observe(key(1), t0), SpawnState::FirstSeen);
        tracker.end_frame();

        for step in steps {
            elapsed += Duration::from_millis(step);
            tracker.begin_frame();
            let state = tracker.observe(key(1), t0 + elapsed);
            prop_assert_eq!(tracker.end_frame(), 0);
            prop_assert_eq!(state.is_ready(), elapsed >= WINDOW);
        }
    }

    /// Random presence timeline for a handful of markers, checked against a
    /// map of first-seen frame times.
    #[test]
    fn tracker_matches_presence_model(
        frames in prop::collection::vec(prop::collection::vec(any::<bool>(), 4), 1..60),
    ) {
        let t0 = Instant::now();
        let step = Duration::from_millis(250);
        let mut tracker = SpawnTracker::new(WINDOW);
        let mut model: HashMap<u32, Duration> = HashMap::new();

        for (n, present) in frames.iter().enumerate() {
            let now = step * n as u32;
            tracker.begin_frame();
            for (entity, seen) in present.iter().enumerate() {
                let entity = entity as u32;
                if !*seen {
                    continue;
                }
                let state = tracker.observe(key(entity), t0 + now);
                match model.get(&entity) {
                    None => {
                        prop_assert_eq!(state, SpawnState::FirstSeen);
                        model.insert(entity, now);
                    }
                    Some(first) => prop_assert_eq!(state.is_ready(), now - *first >= WINDOW),
                }
            }
            let before = model.len();
            model.retain(|entity, _| present[*entity as usize]);
            prop_assert_eq!(tracker.end_frame(), before - model.len());
            prop_assert_eq!(tracker.len(), model.len());
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn circle_points_lie_on_the_radius(
        x in coord(),
        y in coord(),
        z in coord(),
        radius in 1u32..50,
        segments in 1u32..200,
    ) {
        let center = Vec3::new(x, y, z);
        let radius = radius as f32;
        let points = circle_outline(center, radius, segments);
        prop_assert_eq!(points.len(), 2 * segments as usize + 1);
        for point in &points {
            prop_assert!((point.distance(center) - radius).abs() < 1e-2);
            prop_assert_eq!(point.y, center.y);
        }
    }

    #[test]
    fn circle_projection_keeps_every_sample(x in coord(), z in coord(), rotation in angle()) {
        let shapes = ShapeProjector::default();
        let center = Vec3::new(x, 0.0, z);
        let polygons = shapes.project(
            HazardShape::Circle,
            center,
            rotation,
            &FlatProjector::identity(),
            Vec2::new(1920.0, 1080.0),
        );
        prop_assert_eq!(polygons.len(), 1);
        prop_assert_eq!(polygons[0].points.len(), 201);
        let screen_center = Vec2::new(x, z);
        for point in &polygons[0].points {
            prop_assert!((point.distance(screen_center) - 11.0).abs() < 1e-2);
        }
    }

    /// The two halves of a two-sided strip mirror each other through the marker.
    #[test]
    fn two_sided_strip_is_point_symmetric(x in coord(), z in coord(), rotation in angle()) {
        let center = Vec3::new(x, 0.0, z);
        let headings = strip_headings(HazardShape::TwoSidedStrip, rotation);
        prop_assert_eq!(headings.len(), 2);

        let forward = strip_slices(center, headings[0], 25.0, 5.0, 20);
        let backward = strip_slices(center, headings[1], 25.0, 5.0, 20);
        for (a, b) in forward.iter().zip(&backward) {
            for (p, q) in a.iter().zip(b) {
                let mirrored = center * 2.0 - *p;
                prop_assert!(mirrored.distance(*q) < 1e-2, "{:?} vs {:?}", mirrored, q);
            }
        }
    }

    #[test]
    fn strip_slices_stay_inside_the_corridor(rotation in angle(), slices in 1u32..64) {
        let heading = strip_headings(HazardShape::OneSidedStrip, rotation)[0];
        let along = Vec3::new(heading.sin(), 0.0, heading.cos());
        for slice in strip_slices(Vec3::ZERO, heading, 25.0, 5.0, slices) {
            for point in slice {
                let d = point.dot(along);
                let side = (point - along * d).length();
                prop_assert!((-1e-3..=25.0 + 1e-3).contains(&d));
                prop_assert!(side <= 2.5 + 1e-3);
            }
        }
    }
}
