//! Frame-driven overlay controller.
//!
//! The [`OverlayController`] owns all overlay state: the config, the shape
//! projector, the spawn tracker and its own host subscriptions. The host drives
//! it through [`dispatch`](OverlayController::dispatch). Each draw:
//!
//! 1. Gates: the controller is started, the client is logged in, and the
//!    player is in the designated territory. Otherwise nothing is drawn.
//! 2. The object table is scanned for hazard markers within range.
//! 3. Each marker passes through the spawn debounce; ready markers are
//!    projected and filled.
//! 4. Markers not seen this frame are dropped from the spawn tracker.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use glam::{Vec2, Vec3};
//! use slice_host::prelude::*;
//! use slice_host::testing::*;
//! use slice_overlay::prelude::*;
//!
//! let mut registry = RecordingRegistry::in_territory(144);
//! let mut overlay = OverlayController::new(OverlayConfig::default()).unwrap();
//! overlay.start(&mut registry).unwrap();
//!
//! let mut scene = SceneHost::new();
//! scene.insert_player(Vec3::ZERO);
//! scene.insert(event_object(0x4000_0001, MODEL_CIRCLE, Vec3::new(10.0, 0.0, 0.0), 0.0));
//!
//! let camera = FlatProjector::centered(Vec3::ZERO, Vec2::new(960.0, 540.0), 10.0);
//! let mut surface = RecordingSurface::new(Vec2::new(1920.0, 1080.0));
//! let t0 = Instant::now();
//!
//! let first = overlay.on_draw(&mut Frame::new(&scene, &camera, &mut surface, t0)).unwrap();
//! assert_eq!((first.hazards, first.rendered), (1, 0));
//!
//! let later = t0 + Duration::from_secs(5);
//! let report = overlay.on_draw(&mut Frame::new(&scene, &camera, &mut surface, later)).unwrap();
//! assert_eq!(report.rendered, 1);
//! assert_eq!(surface.polygons.len(), 1);
//!
//! overlay.stop(&mut registry);
//! assert_eq!(registry.live_count(), 0);
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};
use slice_host::client::ClientView;
use slice_host::events::{EventKind, EventRegistry, HostEvent, SubscriptionToken, TerritoryId};
use slice_host::projection::Projector;
use slice_host::surface::DrawSurface;

use crate::config::OverlayConfig;
use crate::debounce::{SpawnKey, SpawnState, SpawnTracker};
use crate::debug;
use crate::hazard::{self, HazardMarker, HazardShape, MODEL_CIRCLE};
use crate::shape::{DrawStats, ShapeProjector};
use crate::OverlayError;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything the host lends the overlay for one draw callback.
///
/// `now` is sampled once per frame; every debounce decision in the frame uses
/// it. The surface must not be retained past the callback.
pub struct Frame<'a, C: ?Sized, P: ?Sized, S: ?Sized> {
    pub client: &'a C,
    pub projector: &'a P,
    pub surface: &'a mut S,
    pub now: Instant,
}

impl<'a, C: ?Sized, P: ?Sized, S: ?Sized> Frame<'a, C, P, S> {
    /// Bundle the host's per-frame collaborators.
    pub fn new(client: &'a C, projector: &'a P, surface: &'a mut S, now: Instant) -> Self {
        Self {
            client,
            projector,
            surface,
            now,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameReport
// ---------------------------------------------------------------------------

/// Counters for one draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    /// The frame was skipped by the login or territory gate.
    pub gated: bool,
    /// Occupied object slots visited.
    pub objects_scanned: usize,
    /// Objects within range of the player.
    pub in_range: usize,
    /// In-range objects whose model id could not be read.
    pub unreadable: usize,
    /// Markers classified this frame.
    pub hazards: usize,
    /// Markers held back by the spawn debounce.
    pub suppressed: usize,
    /// Markers drawn.
    pub rendered: usize,
    /// Tracked markers dropped because they were not seen this frame.
    pub pruned: usize,
    /// Filled polygons emitted.
    pub polygons: usize,
    /// Points emitted across all polygons.
    pub points: usize,
    /// Debug labels drawn.
    pub labels: usize,
    /// The debug status line was drawn.
    pub status: bool,
}

// ---------------------------------------------------------------------------
// OverlayController
// ---------------------------------------------------------------------------

/// Host subscriptions held while started.
#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    draw: SubscriptionToken,
    territory: SubscriptionToken,
}

/// The overlay's single owner of state.
#[derive(Debug)]
pub struct OverlayController {
    config: OverlayConfig,
    shapes: ShapeProjector,
    spawns: SpawnTracker,
    subscriptions: Option<Subscriptions>,
    territory: Option<TerritoryId>,
    in_designated_territory: bool,
    last_report: FrameReport,
}

impl OverlayController {
    /// Create a stopped controller.
    ///
    /// # Errors
    ///
    /// [`OverlayError::Config`] if `config` does not validate.
    pub fn new(config: OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;
        Ok(Self {
            shapes: ShapeProjector::from_config(&config),
            spawns: SpawnTracker::new(config.spawn_debounce()),
            config,
            subscriptions: None,
            territory: None,
            in_designated_territory: false,
            last_report: FrameReport::default(),
        })
    }

    /// Subscribe to draw and territory events and read the current territory.
    ///
    /// # Errors
    ///
    /// [`OverlayError::AlreadyStarted`] if called twice without
    /// [`stop`](Self::stop).
    pub fn start<R: EventRegistry + ?Sized>(&mut self, registry: &mut R) -> Result<(), OverlayError> {
        if self.subscriptions.is_some() {
            return Err(OverlayError::AlreadyStarted);
        }
        self.subscriptions = Some(Subscriptions {
            draw: registry.subscribe(EventKind::Draw),
            territory: registry.subscribe(EventKind::TerritoryChanged),
        });
        self.on_territory_changed(registry.current_territory());
        tracing::debug!(
            territory = registry.current_territory(),
            active = self.in_designated_territory,
            "overlay started"
        );
        Ok(())
    }

    /// Remove this controller's subscriptions and forget tracked markers.
    ///
    /// Stopping a stopped controller does nothing.
    pub fn stop<R: EventRegistry + ?Sized>(&mut self, registry: &mut R) {
        let Some(subscriptions) = self.subscriptions.take() else {
            return;
        };
        for token in [subscriptions.draw, subscriptions.territory] {
            if !registry.unsubscribe(token) {
                tracing::warn!(token = token.to_raw(), "subscription was already gone on stop");
            }
        }
        self.spawns.clear();
        self.territory = None;
        self.in_designated_territory = false;
        tracing::debug!("overlay stopped");
    }

    /// Route a host event. This is the callback boundary: errors are logged,
    /// never returned.
    pub fn dispatch<C, P, S>(&mut self, event: HostEvent, frame: &mut Frame<'_, C, P, S>)
    where
        C: ClientView + ?Sized,
        P: Projector + ?Sized,
        S: DrawSurface + ?Sized,
    {
        tracing::trace!(kind = ?event.kind(), "host event");
        match event {
            HostEvent::Draw => {
                if let Err(e) = self.on_draw(frame) {
                    tracing::error!(error = %e, "overlay draw failed");
                }
            }
            HostEvent::TerritoryChanged(territory) => self.on_territory_changed(territory),
        }
    }

    /// Update the territory gate.
    pub fn on_territory_changed(&mut self, territory: TerritoryId) {
        let active = territory == self.config.designated_territory;
        if active != self.in_designated_territory {
            tracing::debug!(territory, active, "territory gate changed");
        }
        self.territory = Some(territory);
        self.in_designated_territory = active;
    }

    /// Run one frame.
    ///
    /// # Errors
    ///
    /// [`OverlayError::NotStarted`] if the controller is not started.
    pub fn on_draw<C, P, S>(&mut self, frame: &mut Frame<'_, C, P, S>) -> Result<FrameReport, OverlayError>
    where
        C: ClientView + ?Sized,
        P: Projector + ?Sized,
        S: DrawSurface + ?Sized,
    {
        if self.subscriptions.is_none() {
            return Err(OverlayError::NotStarted);
        }

        let mut report = FrameReport::default();
        if self.config.debug.status_line {
            let status = debug::GateStatus {
                territory: self.territory,
                player: frame.client.local_player(),
                logged_in: frame.client.is_logged_in(),
                in_designated_territory: self.in_designated_territory,
                object_count: frame.client.object_count(),
            };
            report.status = debug::draw_status(&status, &mut *frame.surface);
        }

        if !frame.client.is_logged_in() || !self.in_designated_territory {
            report.gated = true;
            self.last_report = report;
            return Ok(report);
        }

        let player_position = frame.client.local_player_position();
        let marked_player = if self.config.debug.mark_local_player {
            frame.client.local_player().map(|p| p.index)
        } else {
            None
        };

        let scan = hazard::scan(frame.client, player_position, self.config.max_distance);
        report.objects_scanned = scan.objects_scanned;
        report.in_range = scan.sightings.len();
        report.unreadable = scan.unreadable();

        let mut drawn = DrawStats::default();
        self.spawns.begin_frame();
        for sighting in &scan.sightings {
            let marker = sighting.marker.or_else(|| {
                (marked_player == Some(sighting.object.index))
                    .then(|| HazardMarker::with_shape(&sighting.object, MODEL_CIRCLE, HazardShape::Circle))
            });

            if let Some(marker) = marker {
                report.hazards += 1;
                match self.spawns.observe(SpawnKey::from(&marker), frame.now) {
                    SpawnState::Ready => {
                        drawn += self.shapes.draw(&marker, frame.projector, &mut *frame.surface);
                        report.rendered += 1;
                    }
                    SpawnState::FirstSeen | SpawnState::Settling { .. } => report.suppressed += 1,
                }
            }

            if self.config.debug.object_labels
                && debug::draw_label(
                    sighting,
                    self.config.max_distance,
                    frame.projector,
                    &mut *frame.surface,
                )
            {
                report.labels += 1;
            }
        }
        report.pruned = self.spawns.end_frame();
        report.polygons = drawn.polygons;
        report.points = drawn.points;

        tracing::trace!(
            scanned = report.objects_scanned,
            hazards = report.hazards,
            rendered = report.rendered,
            suppressed = report.suppressed,
            pruned = report.pruned,
            "overlay frame"
        );
        self.last_report = report;
        Ok(report)
    }

    // -- accessors ----------------------------------------------------------

    /// Whether [`start`](Self::start) has been called without a matching
    /// [`stop`](Self::stop).
    pub fn is_started(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Last territory reported by the host while started.
    pub fn territory(&self) -> Option<TerritoryId> {
        self.territory
    }

    /// Whether the territory gate is open.
    pub fn is_in_designated_territory(&self) -> bool {
        self.in_designated_territory
    }

    /// Active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Spawn tracker state.
    pub fn spawn_tracker(&self) -> &SpawnTracker {
        &self.spawns
    }

    /// Report from the last draw.
    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
