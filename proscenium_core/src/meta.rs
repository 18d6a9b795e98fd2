// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named, ordered groups of helper objects attached to an actor.
//!
//! Every actor has three groups: actions, constraints and effects. Entries
//! are addressed by a name unique within their group and can be disabled
//! without being removed. Properties of an entry are reachable through the
//! `@actions.<name>.<property>`, `@constraints.<name>.<property>` and
//! `@effects.<name>.<property>` paths.

use std::rc::Rc;

use bitflags::bitflags;
use kurbo::Rect;

use crate::actor::{ActorId, ActorStore};
use crate::geometry::Orientation;
use crate::paint::PaintNode;
use crate::paint_volume::PaintVolume;
use crate::property::Animatable;

/// A behavior attached to an actor, such as a drag or click handler.
pub trait Action: Animatable {
    /// The action was added to `actor`.
    fn attached(&self, actor: ActorId) {
        _ = actor;
    }

    /// The action was removed from `actor`.
    fn detached(&self, actor: ActorId) {
        _ = actor;
    }
}

/// Adjusts an actor's allocation or preferred size.
pub trait Constraint: Animatable {
    /// Rewrites the allocation about to be stored on `actor`.
    fn update_allocation(&self, store: &ActorStore, actor: ActorId, allocation: &mut Rect) {
        _ = (store, actor, allocation);
    }

    /// Rewrites a preferred-size answer for `actor` on one axis.
    fn update_preferred_size(
        &self,
        store: &ActorStore,
        actor: ActorId,
        orientation: Orientation,
        for_size: f64,
        minimum: &mut f64,
        natural: &mut f64,
    ) {
        _ = (store, actor, orientation, for_size, minimum, natural);
    }
}

bitflags! {
    /// Hints passed to an effect when it paints.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EffectPaintFlags: u8 {
        /// The actor's own appearance changed since the effect last ran, so
        /// any cached result is stale.
        const ACTOR_DIRTY = 1 << 0;
    }
}

/// Alters how an actor paints.
pub trait Effect: Animatable {
    /// Runs before the actor paints. Returning `false` skips the actor's
    /// own paint and the remaining effects.
    fn pre_paint(&self, actor: ActorId, node: &mut dyn PaintNode, flags: EffectPaintFlags) -> bool {
        _ = (actor, node, flags);
        true
    }

    /// Runs after the actor painted, in reverse effect order.
    fn post_paint(&self, actor: ActorId, node: &mut dyn PaintNode) {
        _ = (actor, node);
    }

    /// Grows `volume` to cover everything the effect draws. Returning
    /// `false` means the effect cannot tell, which disables culling for the
    /// actor.
    fn modify_paint_volume(&self, actor: ActorId, volume: &mut PaintVolume) -> bool {
        _ = (actor, volume);
        true
    }
}

/// One entry of a [`MetaGroup`].
pub struct MetaEntry<T: ?Sized> {
    name: String,
    enabled: bool,
    object: Rc<T>,
}

impl<T: ?Sized> MetaEntry<T> {
    /// The entry's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entry takes part in layout and paint.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The attached object.
    #[must_use]
    pub fn object(&self) -> &Rc<T> {
        &self.object
    }
}

impl<T: ?Sized> Clone for MetaEntry<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            enabled: self.enabled,
            object: Rc::clone(&self.object),
        }
    }
}

impl<T: ?Sized> core::fmt::Debug for MetaEntry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetaEntry")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// An ordered list of uniquely named objects.
pub struct MetaGroup<T: ?Sized> {
    entries: Vec<MetaEntry<T>>,
}

impl<T: ?Sized> Default for MetaGroup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> core::fmt::Debug for MetaGroup<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T: ?Sized> MetaGroup<T> {
    /// Appends `object` under `name`. Returns `false`, leaving the group
    /// untouched, if the name is taken.
    pub fn add(&mut self, name: &str, object: Rc<T>) -> bool {
        if self.contains(name) {
            tracing::warn!(name, "a meta object with this name already exists");
            return false;
        }
        self.entries.push(MetaEntry {
            name: name.to_owned(),
            enabled: true,
            object,
        });
        true
    }

    /// Removes and returns the object named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Rc<T>> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos).object)
    }

    /// The object named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<T>> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.object)
    }

    /// Whether an object named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Enables or disables the object named `name`. Returns whether it
    /// exists.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Removes everything, returning the removed entries in order.
    pub fn clear(&mut self) -> Vec<MetaEntry<T>> {
        core::mem::take(&mut self.entries)
    }

    /// All entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &MetaEntry<T>> {
        self.entries.iter()
    }

    /// Enabled objects in order, cloned so the caller may use the store
    /// while holding them.
    #[must_use]
    pub fn enabled(&self) -> Vec<MetaEntry<T>> {
        self.entries.iter().filter(|e| e.enabled).cloned().collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `name` in the group.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}
