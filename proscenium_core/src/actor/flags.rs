// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-actor state bits.
//!
//! [`ActorFlags`] is the public view of an actor's state. [`PrivateFlags`]
//! holds the cache-validity bits and reentrancy guards the store maintains
//! internally; their legal combinations are constrained by the invariants
//! documented on [`ActorStore`](super::ActorStore), not by the type.

use bitflags::bitflags;

bitflags! {
    /// Public actor state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActorFlags: u8 {
        /// The actor will be painted.
        const MAPPED = 1 << 0;
        /// Backend resources for the actor may exist.
        const REALIZED = 1 << 1;
        /// The actor takes part in picking.
        const REACTIVE = 1 << 2;
        /// The actor should be shown.
        const VISIBLE = 1 << 3;
        /// Visibility and geometry changes of the actor do not queue a
        /// relayout on its parent.
        const NO_LAYOUT = 1 << 4;
    }
}

bitflags! {
    /// Internal actor state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub(crate) struct PrivateFlags: u64 {
        // Reentrancy guards.
        const IN_DESTRUCTION = 1 << 0;
        const IN_MAP_UNMAP = 1 << 1;
        const IN_RELAYOUT = 1 << 2;
        const IN_PAINT = 1 << 3;
        const IN_PICK = 1 << 4;

        const IS_TOPLEVEL = 1 << 5;
        const SHOW_ON_SET_PARENT = 1 << 6;

        // Layout.
        const NEEDS_WIDTH_REQUEST = 1 << 7;
        const NEEDS_HEIGHT_REQUEST = 1 << 8;
        const NEEDS_ALLOCATION = 1 << 9;
        const HAS_ALLOCATION = 1 << 10;

        // Expand.
        const X_EXPAND_SET = 1 << 11;
        const Y_EXPAND_SET = 1 << 12;
        const NEEDS_COMPUTE_EXPAND = 1 << 13;
        const NEEDS_X_EXPAND = 1 << 14;
        const NEEDS_Y_EXPAND = 1 << 15;

        // Transform caches.
        const TRANSFORM_VALID = 1 << 16;
        const STAGE_RELATIVE_VALID = 1 << 17;

        // Paint volumes and finish-layout.
        const NEEDS_PAINT_VOLUME_UPDATE = 1 << 18;
        const NEEDS_VISIBLE_PV_UPDATE = 1 << 19;
        const NEEDS_UPDATE_STAGE_VIEWS = 1 << 20;
        const NEEDS_FINISH_LAYOUT = 1 << 21;

        // Redraw.
        const NEEDS_REDRAW = 1 << 22;
        const IS_DIRTY = 1 << 23;
        const PROPAGATED_ONE_REDRAW = 1 << 24;

        const ENABLE_PAINT_UNMAPPED = 1 << 25;
        const CONTENT_BOX_VALID = 1 << 26;
        /// Painted by a clone rather than by its parent.
        const IN_CLONE_PAINT = 1 << 27;
    }
}

impl PrivateFlags {
    /// All three layout requests.
    pub(crate) const NEEDS_LAYOUT: Self = Self::NEEDS_WIDTH_REQUEST
        .union(Self::NEEDS_HEIGHT_REQUEST)
        .union(Self::NEEDS_ALLOCATION);

    /// State of a freshly created actor.
    pub(crate) const INITIAL: Self = Self::NEEDS_LAYOUT
        .union(Self::SHOW_ON_SET_PARENT)
        .union(Self::NEEDS_PAINT_VOLUME_UPDATE)
        .union(Self::NEEDS_VISIBLE_PV_UPDATE)
        .union(Self::NEEDS_UPDATE_STAGE_VIEWS)
        .union(Self::NEEDS_FINISH_LAYOUT);
}
