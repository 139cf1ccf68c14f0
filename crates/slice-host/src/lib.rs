//! Slice Host -- the boundary between the overlay and the game client.
//!
//! The overlay never talks to the client directly. Everything it consumes is
//! expressed here as plain data or a narrow trait:
//!
//! - [`ClientView`](client::ClientView): login state, local player, and the
//!   object table as [`GameObject`](object::GameObject) snapshots.
//! - [`Projector`](projection::Projector): the camera's world-to-screen
//!   transform.
//! - [`DrawSurface`](surface::DrawSurface): path and label primitives for the
//!   current frame.
//! - [`EventRegistry`](events::EventRegistry): draw and territory-change
//!   subscriptions.
//!
//! The one read that depends on the client's native memory layout, the model
//! id, is confined to [`NativeBlock`](object::NativeBlock).
//!
//! # Quick Start
//!
//! ```
//! use slice_host::prelude::*;
//! use slice_host::testing::{event_object, SceneHost};
//! use glam::Vec3;
//!
//! let mut scene = SceneHost::new();
//! scene.insert_player(Vec3::ZERO);
//! scene.insert(event_object(0x4000_0001, 2_010_779, Vec3::new(10.0, 0.0, 0.0), 0.0));
//!
//! let marker = scene.objects().find(|o| o.kind == ObjectKind::EventObj).unwrap();
//! assert_eq!(marker.model_id().unwrap(), 2_010_779);
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod entity;
pub mod events;
pub mod object;
pub mod projection;
pub mod surface;
pub mod testing;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while reading host data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The native block ends before a field that must be read from it.
    #[error("native object block is {len} bytes, need at least {required}")]
    NativeBlockTooShort { len: usize, required: usize },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::client::ClientView;
    pub use crate::entity::EntityId;
    pub use crate::events::{EventKind, EventRegistry, HostEvent, SubscriptionToken, TerritoryId};
    pub use crate::object::{GameObject, NativeBlock, ObjectKind, MODEL_ID_OFFSET};
    pub use crate::projection::{within_display_on_either_axis, Projector};
    pub use crate::surface::{DrawSurface, FillColor};
    pub use crate::HostError;
}
