// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Proscenium uses [`understory_dirty`] to propagate "something above me
//! moved" through the actor tree without walking it eagerly on every
//! property write.
//!
//! [`ABSOLUTE_GEOMETRY`] is marked with
//! [`EagerPolicy`](understory_dirty::EagerPolicy) whenever an actor's local
//! transform or allocation origin changes. Every child has a dependency edge
//! onto its parent on this channel, so the mark reaches the whole subtree
//! immediately. The store drains the channel lazily, right before anything
//! reads a stage-relative modelview or a visible paint volume, and for each
//! affected actor invalidates those caches and schedules a finish-layout
//! pass.

use understory_dirty::Channel;

/// An ancestor's transform changed: the stage-relative modelview, visible
/// paint volume and stage views of the affected actors are stale.
pub const ABSOLUTE_GEOMETRY: Channel = Channel::new(0);
