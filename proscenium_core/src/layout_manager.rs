// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout delegates.
//!
//! A [`LayoutManager`] decides how big a container wants to be and where its
//! children go. It is consulted only through the narrow preferred-size and
//! allocate contract; the store takes care of caching, margins, alignment
//! and constraints around it.
//!
//! When a manager's own configuration changes it must tell the store with
//! [`ActorStore::layout_changed`](crate::actor::ActorStore::layout_changed),
//! which queues a relayout on the container.

use kurbo::Rect;

use crate::actor::{ActorId, ActorStore};
use crate::property::Animatable;

/// Sizes and positions the children of a container.
///
/// Animatable properties of the manager are reachable through the
/// `@layout.<property>` path.
pub trait LayoutManager: Animatable {
    /// Minimum and natural width of `container` for the given height
    /// (negative when unconstrained).
    fn preferred_width(&self, store: &mut ActorStore, container: ActorId, for_height: f64) -> (f64, f64);

    /// Minimum and natural height of `container` for the given width
    /// (negative when unconstrained).
    fn preferred_height(&self, store: &mut ActorStore, container: ActorId, for_width: f64) -> (f64, f64);

    /// Allocates every child of `container` inside `allocation`, which is in
    /// the container's own coordinates (origin at zero).
    fn allocate(&self, store: &mut ActorStore, container: ActorId, allocation: Rect);

    /// The manager was attached to, or detached from, a container.
    fn set_container(&self, container: Option<ActorId>) {
        _ = container;
    }
}

/// Places every child at its fixed position with its preferred size.
///
/// Actors without a manager of their own lay their children out this way.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedLayout;

impl Animatable for FixedLayout {}

impl LayoutManager for FixedLayout {
    fn preferred_width(&self, store: &mut ActorStore, container: ActorId, _for_height: f64) -> (f64, f64) {
        let mut min_right = 0.0_f64;
        let mut natural_right = 0.0_f64;
        let children: Vec<ActorId> = store.children(container).collect();
        for child in children {
            let x = store.x(child);
            let (min_w, _, nat_w, _) = store.preferred_size(child);
            min_right = min_right.max(x + min_w);
            natural_right = natural_right.max(x + nat_w);
        }
        (min_right, natural_right)
    }

    fn preferred_height(&self, store: &mut ActorStore, container: ActorId, _for_width: f64) -> (f64, f64) {
        let mut min_bottom = 0.0_f64;
        let mut natural_bottom = 0.0_f64;
        let children: Vec<ActorId> = store.children(container).collect();
        for child in children {
            let y = store.y(child);
            let (_, min_h, _, nat_h) = store.preferred_size(child);
            min_bottom = min_bottom.max(y + min_h);
            natural_bottom = natural_bottom.max(y + nat_h);
        }
        (min_bottom, natural_bottom)
    }

    fn allocate(&self, store: &mut ActorStore, container: ActorId, _allocation: Rect) {
        let children: Vec<ActorId> = store.children(container).collect();
        for child in children {
            let origin = store.fixed_position(child).unwrap_or_default();
            store.allocate_preferred_size(child, origin.x, origin.y);
        }
    }
}
