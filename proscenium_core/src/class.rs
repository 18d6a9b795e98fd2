// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actor kinds.
//!
//! The store is generic over what an actor *is*: every actor carries an
//! [`ActorClass`] chosen at creation, and the store calls into it at the
//! points where behavior differs between kinds (measuring, allocating,
//! painting, mapping). Every method has a default that forwards to the
//! matching free function in [`defaults`](crate::actor::defaults), so an
//! override that only wants to add to the default calls it explicitly:
//!
//! ```rust,ignore
//! fn allocate(&self, store: &mut ActorStore, actor: ActorId, allocation: Rect) {
//!     defaults::allocate(store, actor, allocation);
//!     self.relayout_decorations(store, actor);
//! }
//! ```
//!
//! Classes are shared between actors (`Rc<dyn ActorClass>`); per-actor
//! state belongs in the store or behind interior mutability.

use kurbo::Rect;

use crate::actor::{ActorId, ActorStore, defaults};
use crate::paint::{PaintContext, PaintNode, PickContext};
use crate::paint_volume::PaintVolume;
use crate::transform::Transform3d;

/// Behavior shared by every actor of one kind.
pub trait ActorClass {
    /// Name used in diagnostics and tree dumps.
    fn type_name(&self) -> &'static str {
        "Actor"
    }

    /// Minimum and natural width for the given height (negative when
    /// unconstrained), margins excluded.
    fn preferred_width(&self, store: &mut ActorStore, actor: ActorId, for_height: f64) -> (f64, f64) {
        defaults::preferred_width(store, actor, for_height)
    }

    /// Minimum and natural height for the given width (negative when
    /// unconstrained), margins excluded.
    fn preferred_height(&self, store: &mut ActorStore, actor: ActorId, for_width: f64) -> (f64, f64) {
        defaults::preferred_height(store, actor, for_width)
    }

    /// Stores `allocation` and lays out the children.
    fn allocate(&self, store: &mut ActorStore, actor: ActorId, allocation: Rect) {
        defaults::allocate(store, actor, allocation);
    }

    /// Multiplies the actor's local transform onto `matrix`.
    fn apply_transform(&self, store: &ActorStore, actor: ActorId, matrix: &mut Transform3d) {
        defaults::apply_transform(store, actor, matrix);
    }

    /// The volume the actor may paint into, before effects.
    fn paint_volume(&self, store: &mut ActorStore, actor: ActorId) -> Option<PaintVolume> {
        defaults::paint_volume(store, actor)
    }

    /// Paints the actor and its children.
    fn paint(&self, store: &mut ActorStore, actor: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
        defaults::paint(store, actor, ctx, node);
    }

    /// Paints what is specific to this kind, before the children.
    fn paint_node(&self, store: &ActorStore, actor: ActorId, node: &mut dyn PaintNode) {
        defaults::paint_node(store, actor, node);
    }

    /// Records the actor and its children under the pick point.
    fn pick(&self, store: &mut ActorStore, actor: ActorId, ctx: &mut PickContext) {
        defaults::pick(store, actor, ctx);
    }

    /// Sets the mapped flag and maps the children.
    fn map(&self, store: &mut ActorStore, actor: ActorId) {
        defaults::map(store, actor);
    }

    /// Unmaps the children and clears the mapped flag.
    fn unmap(&self, store: &mut ActorStore, actor: ActorId) {
        defaults::unmap(store, actor);
    }

    /// Backend resources may now be created.
    fn realize(&self, store: &mut ActorStore, actor: ActorId) {
        _ = (store, actor);
    }

    /// Backend resources must be released.
    fn unrealize(&self, store: &mut ActorStore, actor: ActorId) {
        _ = (store, actor);
    }

    /// Whether painting the actor may draw over itself, which matters when
    /// it is painted with partial opacity.
    fn has_overlaps(&self, store: &ActorStore, actor: ActorId) -> bool {
        _ = (store, actor);
        true
    }

    /// Scale the actor's resources should be rendered at, or `None` when
    /// it is not on any view.
    fn calculate_resource_scale(&self, store: &ActorStore, actor: ActorId) -> Option<f64> {
        defaults::calculate_resource_scale(store, actor)
    }

    /// The actor is being destroyed. Called before it leaves its parent.
    fn destroy(&self, store: &mut ActorStore, actor: ActorId) {
        _ = (store, actor);
    }
}

/// The kind of actors created with
/// [`ActorStore::create_actor`](crate::actor::ActorStore::create_actor):
/// every behavior is the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainActor;

impl ActorClass for PlainActor {}
