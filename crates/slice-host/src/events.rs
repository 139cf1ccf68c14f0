//! Host event subscriptions.
//!
//! The host calls into a plugin through two events: a per-frame draw and a
//! territory change. A plugin subscribes through an [`EventRegistry`] and
//! keeps the returned [`SubscriptionToken`]s so it can remove exactly its own
//! subscriptions later.

use serde::{Deserialize, Serialize};

/// Territory (zone) identifier.
pub type TerritoryId = u16;

/// Kinds of host event a plugin can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Fired once per rendered frame.
    Draw,
    /// Fired when the player enters a new territory.
    TerritoryChanged,
}

/// A delivered host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Draw,
    TerritoryChanged(TerritoryId),
}

impl HostEvent {
    /// The subscription kind this event is delivered under.
    pub fn kind(self) -> EventKind {
        match self {
            HostEvent::Draw => EventKind::Draw,
            HostEvent::TerritoryChanged(_) => EventKind::TerritoryChanged,
        }
    }
}

/// Opaque handle for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    /// Construct from a host-chosen raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Subscription bookkeeping offered by the host.
pub trait EventRegistry {
    /// Subscribe to `kind`. Each call returns a distinct token.
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionToken;

    /// Remove a subscription. Returns `false` if the token was not live.
    fn unsubscribe(&mut self, token: SubscriptionToken) -> bool;

    /// The territory the player is currently in.
    fn current_territory(&self) -> TerritoryId;
}
