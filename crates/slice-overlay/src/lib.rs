//! Slice Overlay -- hazard telegraph overlay for the Gold Saucer slice game.
//!
//! The game marks each falling slice with an invisible prop a few seconds
//! before it lands. This crate finds those props near the player and draws
//! the zone each one will hit as a translucent polygon on the game screen.
//!
//! # Pipeline
//!
//! Per draw callback, driven by [`OverlayController`](controller::OverlayController):
//!
//! 1. [`hazard::scan`] filters the object table down to in-range objects and
//!    classifies hazard markers by model id.
//! 2. [`SpawnTracker`](debounce::SpawnTracker) holds each new marker back
//!    until it has been visible for the debounce window.
//! 3. [`ShapeProjector`](shape::ShapeProjector) tessellates the zone, projects
//!    it through the host camera and fills it.
//!
//! Host access goes through the traits in [`slice_host`].

#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod debug;
pub mod hazard;
pub mod shape;

/// Re-export the host crate for convenience.
pub use slice_host;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the overlay controller.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// A frame arrived before [`start`](controller::OverlayController::start).
    #[error("overlay is not started")]
    NotStarted,

    /// [`start`](controller::OverlayController::start) was called twice.
    #[error("overlay is already started")]
    AlreadyStarted,

    /// Configuration is unusable.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{DebugConfig, OverlayConfig, ShapeConfig, ShapePalette};
    pub use crate::controller::{Frame, FrameReport, OverlayController};
    pub use crate::debounce::{SpawnKey, SpawnState, SpawnTracker};
    pub use crate::hazard::{
        HazardMarker, HazardShape, Scan, Sighting, MODEL_CIRCLE, MODEL_ONE_SIDED_STRIP,
        MODEL_TWO_SIDED_STRIP,
    };
    pub use crate::shape::{DrawStats, ProjectedPolygon, ShapeProjector};
    pub use crate::OverlayError;
}
