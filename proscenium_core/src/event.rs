// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications produced by the actor store.
//!
//! The store never calls back into application code to report a change.
//! Instead it appends [`ActorEvent`]s to a queue that the embedder drains
//! with [`ActorStore::drain_events`](crate::actor::ActorStore::drain_events),
//! typically once per frame.
//!
//! Property notifications can be batched with
//! [`ActorStore::freeze_notify`](crate::actor::ActorStore::freeze_notify):
//! while frozen, repeated notifications for the same actor and property
//! collapse into one, delivered when the last freeze is released.

use crate::actor::ActorId;
use crate::property::Property;

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorEventKind {
    /// A property changed.
    Notify(Property),
    /// The actor was shown.
    Show,
    /// The actor was hidden.
    Hide,
    /// The actor became realized.
    Realize,
    /// The actor is about to lose its realized state. Emitted before its
    /// children are unrealized.
    Unrealize,
    /// The actor is being destroyed. Its handle becomes stale right after.
    Destroy,
    /// The actor's parent changed; carries the previous parent.
    ParentSet {
        /// Parent before the change.
        old_parent: Option<ActorId>,
    },
    /// A child was added to the actor.
    ChildAdded(ActorId),
    /// A child was removed from the actor.
    ChildRemoved(ActorId),
    /// A relayout was queued on the actor.
    QueueRelayout,
    /// A transition stopped.
    TransitionStopped {
        /// The transition's name.
        name: String,
        /// Whether it ran to completion.
        is_finished: bool,
    },
    /// The actor's last transition stopped.
    TransitionsCompleted,
    /// The set of stage views the actor overlaps changed.
    StageViewsChanged,
    /// The ceiling of the actor's resource scale changed.
    ResourceScaleChanged,
}

/// A notification about one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorEvent {
    /// The actor the event is about.
    pub actor: ActorId,
    /// What happened.
    pub kind: ActorEventKind,
}

impl ActorEvent {
    /// Whether this is a property notification for `property`.
    #[must_use]
    pub fn is_notify(&self, property: Property) -> bool {
        self.kind == ActorEventKind::Notify(property)
    }
}
