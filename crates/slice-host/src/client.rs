//! Read access to client state: login, local player, object table.

use glam::Vec3;

use crate::object::GameObject;

/// Client state the overlay reads once per frame.
pub trait ClientView {
    /// Whether a character is logged in.
    fn is_logged_in(&self) -> bool;

    /// Number of slots in the object table. Slots may be empty.
    fn object_count(&self) -> usize;

    /// Snapshot of the object in slot `index`, or `None` for an empty slot.
    fn object(&self, index: usize) -> Option<GameObject>;

    /// The local player's object, if loaded.
    fn local_player(&self) -> Option<GameObject>;

    /// Position of the local player, or the world origin when no player is
    /// loaded.
    fn local_player_position(&self) -> Vec3 {
        self.local_player().map_or(Vec3::ZERO, |player| player.position)
    }

    /// Iterate occupied object slots in index order.
    fn objects(&self) -> ObjectIter<'_, Self>
    where
        Self: Sized,
    {
        ObjectIter {
            client: self,
            next: 0,
        }
    }
}

/// Iterator over occupied slots of a [`ClientView`].
pub struct ObjectIter<'a, C: ClientView> {
    client: &'a C,
    next: usize,
}

impl<C: ClientView> Iterator for ObjectIter<'_, C> {
    type Item = GameObject;

    fn next(&mut self) -> Option<GameObject> {
        while self.next < self.client.object_count() {
            let index = self.next;
            self.next += 1;
            if let Some(object) = self.client.object(index) {
                return Some(object);
            }
        }
        None
    }
}
