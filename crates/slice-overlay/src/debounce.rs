//! Spawn debouncing for freshly detected markers.
//!
//! A telegraph prop often reports a default pose or model for its first
//! frames. [`SpawnTracker`] remembers when each marker was first seen and
//! holds it back until a fixed window has elapsed.
//!
//! # Frame protocol
//!
//! 1. [`begin_frame`](SpawnTracker::begin_frame) marks every tracked key as
//!    unconfirmed.
//! 2. [`observe`](SpawnTracker::observe) is called for each marker seen this
//!    frame; it confirms the key and reports whether to draw.
//! 3. [`end_frame`](SpawnTracker::end_frame) forgets every key that was not
//!    observed, so a marker that despawns, leaves range or changes model
//!    starts a fresh window if it comes back.
//!
//! # Identity
//!
//! Keys are `(entity id, model id)`. The host recycles entity ids, so a new
//! marker that takes over an id in the same frame the old one vanished, with
//! the same model, inherits the old first-seen time. Any frame in which the id
//! is not a marker resets it.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use slice_host::entity::EntityId;

use crate::hazard::HazardMarker;

/// Tracking key for one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnKey {
    pub entity_id: EntityId,
    pub model_id: i32,
}

impl From<&HazardMarker> for SpawnKey {
    fn from(marker: &HazardMarker) -> Self {
        Self {
            entity_id: marker.entity_id,
            model_id: marker.model_id,
        }
    }
}

/// What to do with an observed marker this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnState {
    /// First sighting; now tracked, not drawn.
    FirstSeen,
    /// Inside the debounce window; not drawn.
    Settling { remaining: Duration },
    /// Window elapsed; draw.
    Ready,
}

impl SpawnState {
    /// Whether the marker should be drawn.
    pub fn is_ready(self) -> bool {
        matches!(self, SpawnState::Ready)
    }
}

/// First-seen timestamps for markers, pruned every frame.
#[derive(Debug, Clone)]
pub struct SpawnTracker {
    window: Duration,
    first_seen: HashMap<SpawnKey, Instant>,
    unconfirmed: HashSet<SpawnKey>,
}

impl SpawnTracker {
    /// Tracker that holds markers back for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            first_seen: HashMap::new(),
            unconfirmed: HashSet::new(),
        }
    }

    /// The debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start a frame: every tracked key becomes unconfirmed.
    pub fn begin_frame(&mut self) {
        self.unconfirmed.clear();
        self.unconfirmed.extend(self.first_seen.keys().copied());
    }

    /// Record a sighting at `now` and decide whether it may be drawn.
    ///
    /// A marker is ready once `now - first_seen >= window`.
    pub fn observe(&mut self, key: SpawnKey, now: Instant) -> SpawnState {
        self.unconfirmed.remove(&key);

        let Some(&first_seen) = self.first_seen.get(&key) else {
            self.first_seen.insert(key, now);
            tracing::debug!(
                entity = %key.entity_id,
                model = key.model_id,
                "marker first seen"
            );
            return SpawnState::FirstSeen;
        };

        let elapsed = now.saturating_duration_since(first_seen);
        if elapsed < self.window {
            SpawnState::Settling {
                remaining: self.window - elapsed,
            }
        } else {
            SpawnState::Ready
        }
    }

    /// Finish a frame: forget every key not observed since
    /// [`begin_frame`](Self::begin_frame). Returns how many were dropped.
    pub fn end_frame(&mut self) -> usize {
        let pruned = self.unconfirmed.len();
        for key in self.unconfirmed.drain() {
            self.first_seen.remove(&key);
            tracing::trace!(entity = %key.entity_id, model = key.model_id, "marker no longer seen");
        }
        pruned
    }

    /// When `key` was first seen, if tracked.
    pub fn first_seen(&self, key: &SpawnKey) -> Option<Instant> {
        self.first_seen.get(key).copied()
    }

    /// Number of tracked markers.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.first_seen.clear();
        self.unconfirmed.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
