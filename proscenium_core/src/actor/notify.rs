// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property notifications and notification batching.

use core::ops::{Deref, DerefMut};

use crate::event::ActorEventKind;
use crate::property::Property;

use super::id::ActorId;
use super::store::ActorStore;

/// Batches property notifications until dropped.
///
/// Created by [`ActorStore::freeze_notify`]. While any guard is alive,
/// notifications for the same actor and property collapse into one; they
/// are queued, in first-seen order, when the last guard drops. The guard
/// dereferences to the store so it can be used in its place.
#[derive(Debug)]
pub struct NotifyFreeze<'a> {
    store: &'a mut ActorStore,
}

impl Deref for NotifyFreeze<'_> {
    type Target = ActorStore;

    fn deref(&self) -> &ActorStore {
        self.store
    }
}

impl DerefMut for NotifyFreeze<'_> {
    fn deref_mut(&mut self) -> &mut ActorStore {
        self.store
    }
}

impl Drop for NotifyFreeze<'_> {
    fn drop(&mut self) {
        self.store.thaw_notify();
    }
}

impl ActorStore {
    /// Starts batching property notifications; see [`NotifyFreeze`].
    pub fn freeze_notify(&mut self) -> NotifyFreeze<'_> {
        self.notify_freeze += 1;
        NotifyFreeze { store: self }
    }

    /// Whether property notifications are currently batched.
    #[must_use]
    pub fn is_notify_frozen(&self) -> bool {
        self.notify_freeze > 0
    }

    fn thaw_notify(&mut self) {
        debug_assert!(self.notify_freeze > 0, "unbalanced notify thaw");
        self.notify_freeze = self.notify_freeze.saturating_sub(1);
        if self.notify_freeze > 0 {
            return;
        }
        let pending = core::mem::take(&mut self.pending_notifies);
        for (actor, property) in pending {
            if self.is_alive(actor) {
                self.emit(actor, ActorEventKind::Notify(property));
            }
        }
    }

    /// Queues a change notification for `property`.
    pub(crate) fn notify(&mut self, actor: ActorId, property: Property) {
        if self.notify_freeze > 0 {
            if !self.pending_notifies.contains(&(actor, property)) {
                self.pending_notifies.push((actor, property));
            }
            return;
        }
        self.emit(actor, ActorEventKind::Notify(property));
    }

    pub(crate) fn notify_all(&mut self, actor: ActorId, properties: &[Property]) {
        for &p in properties {
            self.notify(actor, p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ActorEvent;

    #[test]
    fn frozen_notifications_collapse() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        {
            let mut frozen = store.freeze_notify();
            frozen.set_opacity(a, 10);
            frozen.set_opacity(a, 20);
            frozen.set_reactive(a, true);
            assert!(frozen.is_notify_frozen());
            assert!(frozen.pending_events().is_empty());
        }
        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert_eq!(
            events,
            vec![
                ActorEvent {
                    actor: a,
                    kind: ActorEventKind::Notify(Property::Opacity),
                },
                ActorEvent {
                    actor: a,
                    kind: ActorEventKind::Notify(Property::Reactive),
                },
            ]
        );
    }

    #[test]
    fn nested_freezes_flush_once() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        {
            let mut outer = store.freeze_notify();
            {
                let mut inner = outer.freeze_notify();
                inner.set_reactive(a, true);
            }
            assert!(outer.pending_events().is_empty());
        }
        assert_eq!(store.drain_events().count(), 1);
    }
}
