// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The actor tree.
//!
//! Every actor lives in an [`ActorStore`] and is addressed by an [`ActorId`].
//! The store is split into topical `impl` blocks:
//!
//! - tree structure and child ordering (`tree`, `traverse`),
//! - visibility, realization and mapping (`lifecycle`),
//! - size negotiation and allocation (`layout`),
//! - transforms and coordinate queries (`transforms`),
//! - paint volumes, redraw queuing and clipped redraws (`volume`, `redraw`),
//! - painting and picking (`painting`),
//! - implicit and explicit transitions (`animation`),
//! - attached actions, constraints and effects (`metas`),
//! - clones (`clone`),
//! - generic property access (`properties`).
//!
//! Per-actor behavior that subclasses would override lives behind
//! [`ActorClass`](crate::class::ActorClass); the stock behavior is in
//! [`defaults`] so that classes can chain up to it.

mod animation;
mod clone;
pub mod defaults;
mod flags;
mod id;
mod layout;
mod lifecycle;
mod metas;
mod node;
mod notify;
mod painting;
mod properties;
mod redraw;
mod store;
mod transforms;
mod traverse;
mod tree;
mod volume;

pub use clone::CloneClass;
pub use flags::ActorFlags;
pub use id::ActorId;
pub use lifecycle::MapStateChange;
pub use notify::NotifyFreeze;
pub use store::ActorStore;
pub use transforms::RotateAxis;
pub use traverse::{ChildIter, Children, TraverseVisit};
