// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural operations on the actor tree.
//!
//! Every insertion funnels through `add_child_internal` and every removal
//! through `remove_child_internal`; reordering is a removal followed by an
//! insertion with notifications suppressed.

use bitflags::bitflags;
use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::event::ActorEventKind;
use crate::property::Property;

use super::flags::PrivateFlags;
use super::id::{ActorId, INVALID};
use super::lifecycle::MapStateChange;
use super::store::ActorStore;

bitflags! {
    /// Side effects of [`ActorStore::add_child_internal`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct AddChildFlags: u8 {
        const EMIT_PARENT_SET = 1 << 0;
        const EMIT_CHILD_ADDED = 1 << 1;
        const CHECK_STATE = 1 << 2;
        const NOTIFY_FIRST_LAST = 1 << 3;
        const SHOW_ON_SET_PARENT = 1 << 4;
    }
}

bitflags! {
    /// Side effects of [`ActorStore::remove_child_internal`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct RemoveChildFlags: u8 {
        const EMIT_PARENT_SET = 1 << 0;
        const EMIT_CHILD_REMOVED = 1 << 1;
        const CHECK_STATE = 1 << 2;
        const NOTIFY_FIRST_LAST = 1 << 3;
        const STOP_TRANSITIONS = 1 << 4;
        const CLEAR_STAGE_VIEWS = 1 << 5;
    }
}

impl AddChildFlags {
    pub(crate) const DEFAULT: Self = Self::all();
}

impl RemoveChildFlags {
    pub(crate) const DEFAULT: Self = Self::all();
}

/// Where a new child goes in its parent's list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum InsertAt {
    /// Before the first sibling with a greater z-position.
    Depth,
    /// At an index; out-of-range values append.
    Index(i32),
    /// Right after a sibling, or last.
    Above(Option<u32>),
    /// Right before a sibling, or first.
    Below(Option<u32>),
    /// Between two known slots, used when splicing in a replacement.
    Between { prev: u32, next: u32 },
}

impl ActorStore {
    // -- Topology queries --

    /// Returns the parent of `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.opt_id(self.node(id).parent)
    }

    /// First child in paint order.
    #[must_use]
    pub fn first_child(&self, id: ActorId) -> Option<ActorId> {
        self.opt_id(self.node(id).first_child)
    }

    /// Last child in paint order.
    #[must_use]
    pub fn last_child(&self, id: ActorId) -> Option<ActorId> {
        self.opt_id(self.node(id).last_child)
    }

    /// Next sibling in paint order.
    #[must_use]
    pub fn next_sibling(&self, id: ActorId) -> Option<ActorId> {
        self.opt_id(self.node(id).next_sibling)
    }

    /// Previous sibling in paint order.
    #[must_use]
    pub fn prev_sibling(&self, id: ActorId) -> Option<ActorId> {
        self.opt_id(self.node(id).prev_sibling)
    }

    /// Number of direct children.
    #[must_use]
    pub fn n_children(&self, id: ActorId) -> u32 {
        self.node(id).n_children
    }

    /// The child at `index`, if any.
    #[must_use]
    pub fn child_at_index(&self, id: ActorId, index: usize) -> Option<ActorId> {
        self.children(id).nth(index)
    }

    /// Whether `descendant` is `ancestor` or inside its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: ActorId, descendant: ActorId) -> bool {
        self.validate(ancestor);
        self.validate(descendant);
        let mut idx = descendant.idx;
        while idx != INVALID {
            if idx == ancestor.idx {
                return true;
            }
            idx = self.nodes[idx as usize].parent;
        }
        false
    }

    // -- Insertion --

    /// Adds `child` to `parent`, before the first child with a greater
    /// z-position.
    ///
    /// Adding an actor to itself, adding an actor that already has a
    /// parent, adding a stage, or adding to or from an actor being destroyed
    /// logs a warning and does nothing.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) {
        self.add_child_internal(parent, child, AddChildFlags::DEFAULT, InsertAt::Depth);
    }

    /// Inserts `child` at `index`. Negative or out-of-range indices append.
    pub fn insert_child_at_index(&mut self, parent: ActorId, child: ActorId, index: i32) {
        self.add_child_internal(parent, child, AddChildFlags::DEFAULT, InsertAt::Index(index));
    }

    /// Inserts `child` right above `sibling`, or on top of every child when
    /// `sibling` is `None`.
    pub fn insert_child_above(&mut self, parent: ActorId, child: ActorId, sibling: Option<ActorId>) {
        let at = InsertAt::Above(self.sibling_slot(parent, sibling));
        self.add_child_internal(parent, child, AddChildFlags::DEFAULT, at);
    }

    /// Inserts `child` right below `sibling`, or beneath every child when
    /// `sibling` is `None`.
    pub fn insert_child_below(&mut self, parent: ActorId, child: ActorId, sibling: Option<ActorId>) {
        let at = InsertAt::Below(self.sibling_slot(parent, sibling));
        self.add_child_internal(parent, child, AddChildFlags::DEFAULT, at);
    }

    /// Replaces `old_child` with `new_child`, which takes its exact slot.
    pub fn replace_child(&mut self, parent: ActorId, old_child: ActorId, new_child: ActorId) {
        self.validate(parent);
        self.validate(old_child);
        self.validate(new_child);
        if self.nodes[old_child.idx as usize].parent != parent.idx {
            tracing::warn!(%parent, child = %old_child, "replaced actor is not a child of this parent");
            return;
        }
        if self.nodes[new_child.idx as usize].parent != INVALID {
            tracing::warn!(child = %new_child, "replacement actor already has a parent");
            return;
        }
        let prev = self.nodes[old_child.idx as usize].prev_sibling;
        let next = self.nodes[old_child.idx as usize].next_sibling;
        self.remove_child_internal(parent, old_child, RemoveChildFlags::DEFAULT);
        self.add_child_internal(parent, new_child, AddChildFlags::DEFAULT, InsertAt::Between { prev, next });
    }

    /// Resolves a sibling handle into a slot, dropping it (with a warning)
    /// if it is not a child of `parent`.
    fn sibling_slot(&self, parent: ActorId, sibling: Option<ActorId>) -> Option<u32> {
        let sibling = sibling?;
        self.validate(sibling);
        if self.nodes[sibling.idx as usize].parent == parent.idx {
            Some(sibling.idx)
        } else {
            tracing::warn!(%parent, %sibling, "sibling is not a child of this parent");
            None
        }
    }

    fn insertion_slots(&self, p: u32, c: u32, at: InsertAt) -> (u32, u32) {
        let parent = &self.nodes[p as usize];
        match at {
            InsertAt::Depth => {
                let z = self.nodes[c as usize].transform_info().z_position;
                let mut next = parent.first_child;
                while next != INVALID
                    && self.nodes[next as usize].transform_info().z_position <= z
                {
                    next = self.nodes[next as usize].next_sibling;
                }
                let prev = if next == INVALID {
                    parent.last_child
                } else {
                    self.nodes[next as usize].prev_sibling
                };
                (prev, next)
            }
            InsertAt::Index(index) => {
                let n = i64::from(parent.n_children);
                if index < 0 || i64::from(index) >= n {
                    return (parent.last_child, INVALID);
                }
                let mut next = parent.first_child;
                for _ in 0..index {
                    next = self.nodes[next as usize].next_sibling;
                }
                (self.nodes[next as usize].prev_sibling, next)
            }
            InsertAt::Above(Some(s)) => (s, self.nodes[s as usize].next_sibling),
            InsertAt::Above(None) => (parent.last_child, INVALID),
            InsertAt::Below(Some(s)) => (self.nodes[s as usize].prev_sibling, s),
            InsertAt::Below(None) => (INVALID, parent.first_child),
            InsertAt::Between { prev, next } => (prev, next),
        }
    }

    fn link_child(&mut self, p: u32, c: u32, prev: u32, next: u32) {
        {
            let child = &mut self.nodes[c as usize];
            child.parent = p;
            child.prev_sibling = prev;
            child.next_sibling = next;
        }
        if prev != INVALID {
            self.nodes[prev as usize].next_sibling = c;
        } else {
            self.nodes[p as usize].first_child = c;
        }
        if next != INVALID {
            self.nodes[next as usize].prev_sibling = c;
        } else {
            self.nodes[p as usize].last_child = c;
        }
    }

    fn unlink_child(&mut self, c: u32) {
        let (p, prev, next) = {
            let child = &self.nodes[c as usize];
            (child.parent, child.prev_sibling, child.next_sibling)
        };
        if prev != INVALID {
            self.nodes[prev as usize].next_sibling = next;
        } else {
            self.nodes[p as usize].first_child = next;
        }
        if next != INVALID {
            self.nodes[next as usize].prev_sibling = prev;
        } else {
            self.nodes[p as usize].last_child = prev;
        }
        let child = &mut self.nodes[c as usize];
        child.parent = INVALID;
        child.prev_sibling = INVALID;
        child.next_sibling = INVALID;
    }

    pub(crate) fn add_child_internal(&mut self, parent: ActorId, child: ActorId, flags: AddChildFlags, at: InsertAt) {
        self.validate(parent);
        self.validate(child);

        if parent == child {
            tracing::warn!(actor = %child, "cannot add an actor to itself");
            return;
        }
        if self.nodes[child.idx as usize].parent != INVALID {
            tracing::warn!(
                %child,
                current_parent = ?self.parent(child),
                "actor already has a parent; remove it first"
            );
            return;
        }
        if self.nodes[child.idx as usize].is_toplevel() {
            tracing::warn!(%child, "cannot add a stage as a child");
            return;
        }
        if self.nodes[child.idx as usize].in_destruction()
            || self.nodes[parent.idx as usize].in_destruction()
        {
            tracing::warn!(%parent, %child, "cannot add a child while it or its parent is being destroyed");
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!(%parent, %child, "cannot add an ancestor as a child");
            return;
        }

        let (p, c) = (parent.idx, child.idx);
        let old_first = self.nodes[p as usize].first_child;
        let old_last = self.nodes[p as usize].last_child;

        let (prev, next) = self.insertion_slots(p, c, at);
        self.link_child(p, c, prev, next);
        {
            let parent_node = &mut self.nodes[p as usize];
            parent_node.n_children += 1;
            parent_node.age += 1;
        }

        let cloned = self.nodes[p as usize].in_cloned_branch;
        if cloned > 0 {
            self.push_in_cloned_branch(child, cloned);
        }
        let unmapped = self.nodes[p as usize].unmapped_paint_branch_counter;
        if unmapped > 0 {
            self.push_in_paint_unmapped_branch(child, unmapped);
        }

        let _ = self.dirty.add_dependency(c, p, dirty::ABSOLUTE_GEOMETRY);
        self.nodes[c as usize]
            .private
            .remove(PrivateFlags::TRANSFORM_VALID);
        self.dirty.mark_with(c, dirty::ABSOLUTE_GEOMETRY, &EagerPolicy);

        let child_private = self.nodes[c as usize].private;
        if child_private.intersects(
            PrivateFlags::NEEDS_COMPUTE_EXPAND
                | PrivateFlags::NEEDS_X_EXPAND
                | PrivateFlags::NEEDS_Y_EXPAND,
        ) {
            self.queue_compute_expand(parent);
        }

        if flags.contains(AddChildFlags::EMIT_PARENT_SET) {
            self.emit(child, ActorEventKind::ParentSet { old_parent: None });
        }
        if flags.contains(AddChildFlags::CHECK_STATE) {
            self.update_map_state(child, MapStateChange::Check);
        }
        if flags.contains(AddChildFlags::SHOW_ON_SET_PARENT)
            && self.has(child, PrivateFlags::SHOW_ON_SET_PARENT)
        {
            self.show(child);
        }

        if self.nodes[c as usize].is_mapped() {
            self.queue_redraw(child);
        }

        // The child may have been laid out in another tree; start over so
        // the relayout reaches the new parent.
        if self.nodes[c as usize].private.intersects(PrivateFlags::NEEDS_LAYOUT) {
            self.nodes[c as usize]
                .private
                .remove(PrivateFlags::NEEDS_LAYOUT);
            self.queue_relayout(child);
        }

        if flags.contains(AddChildFlags::EMIT_CHILD_ADDED) {
            self.emit(parent, ActorEventKind::ChildAdded(child));
        }
        if flags.contains(AddChildFlags::NOTIFY_FIRST_LAST) {
            if old_first != self.nodes[p as usize].first_child {
                self.notify(parent, Property::FirstChild);
            }
            if old_last != self.nodes[p as usize].last_child {
                self.notify(parent, Property::LastChild);
            }
        }
    }

    // -- Removal --

    /// Removes `child` from `parent`.
    ///
    /// The child is unrealized, its transitions stop and it stays alive as
    /// a detached root; use [`destroy`](Self::destroy) to free it.
    pub fn remove_child(&mut self, parent: ActorId, child: ActorId) {
        self.validate(parent);
        self.validate(child);
        if parent == child {
            tracing::warn!(actor = %child, "cannot remove an actor from itself");
            return;
        }
        if self.nodes[child.idx as usize].parent != parent.idx {
            tracing::warn!(%parent, %child, "actor is not a child of this parent");
            return;
        }
        self.remove_child_internal(parent, child, RemoveChildFlags::DEFAULT);
    }

    /// Removes every child of `parent`, leaving them alive.
    pub fn remove_all_children(&mut self, parent: ActorId) {
        self.validate(parent);
        let mut frozen = self.freeze_notify();
        while let Some(child) = frozen.first_child(parent) {
            frozen.remove_child_internal(parent, child, RemoveChildFlags::DEFAULT);
        }
    }

    /// Destroys every child of `parent`.
    pub fn destroy_all_children(&mut self, parent: ActorId) {
        self.validate(parent);
        let mut frozen = self.freeze_notify();
        while let Some(child) = frozen.first_child(parent) {
            frozen.destroy(child);
        }
    }

    pub(crate) fn remove_child_internal(&mut self, parent: ActorId, child: ActorId, flags: RemoveChildFlags) {
        let (p, c) = (parent.idx, child.idx);
        let was_mapped = self.nodes[c as usize].is_mapped();
        let old_first = self.nodes[p as usize].first_child;
        let old_last = self.nodes[p as usize].last_child;

        if flags.contains(RemoveChildFlags::STOP_TRANSITIONS) {
            self.stop_transitions_on_remove(child);
        }
        if flags.contains(RemoveChildFlags::CHECK_STATE) {
            self.update_map_state(child, MapStateChange::MakeUnrealized);
        }

        let cloned = self.nodes[p as usize].in_cloned_branch;
        if cloned > 0 {
            self.pop_in_cloned_branch(child, cloned);
        }
        let unmapped = self.nodes[p as usize].unmapped_paint_branch_counter;
        if unmapped > 0 {
            self.pop_in_paint_unmapped_branch(child, unmapped);
        }

        self.unlink_child(c);
        {
            let parent_node = &mut self.nodes[p as usize];
            parent_node.n_children -= 1;
            parent_node.age += 1;
        }

        self.dirty.remove_dependency(c, p, dirty::ABSOLUTE_GEOMETRY);
        self.nodes[c as usize]
            .private
            .remove(PrivateFlags::TRANSFORM_VALID);
        self.dirty.mark_with(c, dirty::ABSOLUTE_GEOMETRY, &EagerPolicy);

        if flags.contains(RemoveChildFlags::CLEAR_STAGE_VIEWS) {
            self.clear_stage_views_recursive(child);
        }

        let expands = {
            let node = &self.nodes[c as usize];
            node.private.intersects(PrivateFlags::NEEDS_X_EXPAND | PrivateFlags::NEEDS_Y_EXPAND)
        };
        if expands && !self.nodes[p as usize].in_destruction() {
            self.queue_compute_expand(parent);
        }

        if flags.contains(RemoveChildFlags::EMIT_PARENT_SET) {
            self.emit(
                child,
                ActorEventKind::ParentSet {
                    old_parent: Some(parent),
                },
            );
        }

        if was_mapped && !self.nodes[p as usize].in_destruction() {
            self.queue_relayout(parent);
        }

        if flags.contains(RemoveChildFlags::EMIT_CHILD_REMOVED) {
            self.emit(parent, ActorEventKind::ChildRemoved(child));
        }
        if flags.contains(RemoveChildFlags::NOTIFY_FIRST_LAST) {
            if old_first != self.nodes[p as usize].first_child {
                self.notify(parent, Property::FirstChild);
            }
            if old_last != self.nodes[p as usize].last_child {
                self.notify(parent, Property::LastChild);
            }
        }
    }

    // -- Reordering --

    /// Moves `child` right above `sibling`, or on top when `sibling` is
    /// `None`.
    pub fn set_child_above_sibling(&mut self, parent: ActorId, child: ActorId, sibling: Option<ActorId>) {
        if !self.check_reorder(parent, child, sibling) {
            return;
        }
        self.remove_child_internal(parent, child, RemoveChildFlags::empty());
        let at = InsertAt::Above(sibling.map(|s| s.idx));
        self.add_child_internal(parent, child, AddChildFlags::NOTIFY_FIRST_LAST, at);
        self.queue_relayout(parent);
    }

    /// Moves `child` right below `sibling`, or to the bottom when `sibling`
    /// is `None`.
    pub fn set_child_below_sibling(&mut self, parent: ActorId, child: ActorId, sibling: Option<ActorId>) {
        if !self.check_reorder(parent, child, sibling) {
            return;
        }
        self.remove_child_internal(parent, child, RemoveChildFlags::empty());
        let at = InsertAt::Below(sibling.map(|s| s.idx));
        self.add_child_internal(parent, child, AddChildFlags::NOTIFY_FIRST_LAST, at);
        self.queue_relayout(parent);
    }

    /// Moves `child` to `index`; out-of-range indices move it to the top.
    pub fn set_child_at_index(&mut self, parent: ActorId, child: ActorId, index: i32) {
        if !self.check_reorder(parent, child, None) {
            return;
        }
        self.remove_child_internal(parent, child, RemoveChildFlags::empty());
        self.add_child_internal(parent, child, AddChildFlags::NOTIFY_FIRST_LAST, InsertAt::Index(index));
        self.queue_relayout(parent);
    }

    fn check_reorder(&self, parent: ActorId, child: ActorId, sibling: Option<ActorId>) -> bool {
        self.validate(parent);
        self.validate(child);
        if self.nodes[child.idx as usize].parent != parent.idx {
            tracing::warn!(%parent, %child, "actor is not a child of this parent");
            return false;
        }
        if let Some(sibling) = sibling {
            self.validate(sibling);
            if sibling == child {
                tracing::warn!(%child, "cannot order an actor relative to itself");
                return false;
            }
            if self.nodes[sibling.idx as usize].parent != parent.idx {
                tracing::warn!(%parent, %sibling, "sibling is not a child of this parent");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kids(store: &ActorStore, parent: ActorId) -> Vec<ActorId> {
        store.children(parent).collect()
    }

    #[test]
    fn add_child_sorts_by_depth() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let deep = store.create_actor();
        let shallow = store.create_actor();
        let middle = store.create_actor();
        store.set_z_position(deep, 10.0);
        store.set_z_position(middle, 5.0);
        store.add_child(parent, deep);
        store.add_child(parent, shallow);
        store.add_child(parent, middle);
        assert_eq!(kids(&store, parent), vec![shallow, middle, deep]);
    }

    #[test]
    fn equal_depth_keeps_insertion_order() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(parent, a);
        store.add_child(parent, b);
        assert_eq!(kids(&store, parent), vec![a, b]);
    }

    #[test]
    fn insert_at_index_clamps() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        let d = store.create_actor();
        store.insert_child_at_index(parent, a, 0);
        store.insert_child_at_index(parent, b, 99);
        store.insert_child_at_index(parent, c, 1);
        store.insert_child_at_index(parent, d, -1);
        assert_eq!(kids(&store, parent), vec![a, c, b, d]);
        assert_eq!(store.child_at_index(parent, 2), Some(b));
    }

    #[test]
    fn insert_above_and_below() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        let d = store.create_actor();
        store.insert_child_above(parent, a, None);
        store.insert_child_below(parent, b, None);
        store.insert_child_above(parent, c, Some(b));
        store.insert_child_below(parent, d, Some(b));
        assert_eq!(kids(&store, parent), vec![d, b, c, a]);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        let x = store.create_actor();
        for k in [a, b, c] {
            store.add_child(parent, k);
        }
        store.replace_child(parent, b, x);
        assert_eq!(kids(&store, parent), vec![a, x, c]);
        assert_eq!(store.parent(b), None);
        assert_eq!(store.n_children(parent), 3);
    }

    #[test]
    fn invalid_adds_are_ignored() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let other = store.create_actor();
        let child = store.create_actor();
        store.add_child(parent, parent);
        store.add_child(parent, child);
        store.add_child(other, child);
        store.add_child(child, parent);
        assert_eq!(store.parent(child), Some(parent));
        assert_eq!(store.n_children(other), 0);
        assert_eq!(store.parent(parent), None);
    }

    #[test]
    fn remove_from_wrong_parent_is_ignored() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let other = store.create_actor();
        let child = store.create_actor();
        store.add_child(parent, child);
        store.remove_child(other, child);
        assert_eq!(store.parent(child), Some(parent));
    }

    #[test]
    fn reorder_moves_without_add_remove_events() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        for k in [a, b, c] {
            store.add_child(parent, k);
        }
        store.drain_events().for_each(drop);

        store.set_child_above_sibling(parent, a, Some(c));
        assert_eq!(kids(&store, parent), vec![b, c, a]);
        store.set_child_below_sibling(parent, a, Some(b));
        assert_eq!(kids(&store, parent), vec![a, b, c]);
        store.set_child_at_index(parent, c, 0);
        assert_eq!(kids(&store, parent), vec![c, a, b]);

        let structural = store.drain_events().any(|e| {
            matches!(
                e.kind,
                ActorEventKind::ChildAdded(_)
                    | ActorEventKind::ChildRemoved(_)
                    | ActorEventKind::ParentSet { .. }
            )
        });
        assert!(!structural);
    }

    #[test]
    fn first_last_notifications() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(parent, a);
        let events: Vec<_> = store.drain_events().collect();
        assert!(events.iter().any(|e| e.actor == parent && e.is_notify(Property::FirstChild)));
        assert!(events.iter().any(|e| e.actor == parent && e.is_notify(Property::LastChild)));

        store.add_child(parent, b);
        let events: Vec<_> = store.drain_events().collect();
        assert!(!events.iter().any(|e| e.is_notify(Property::FirstChild)));
        assert!(events.iter().any(|e| e.is_notify(Property::LastChild)));
    }

    #[test]
    fn remove_emits_parent_set_with_old_parent() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let child = store.create_actor();
        store.add_child(parent, child);
        store.drain_events().for_each(drop);
        store.remove_child(parent, child);
        let events: Vec<_> = store.drain_events().collect();
        assert!(events.iter().any(|e| e.actor == child
            && e.kind
                == ActorEventKind::ParentSet {
                    old_parent: Some(parent)
                }));
        assert!(events
            .iter()
            .any(|e| e.actor == parent && e.kind == ActorEventKind::ChildRemoved(child)));
    }

    #[test]
    fn remove_all_children_keeps_them_alive() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(parent, a);
        store.add_child(parent, b);
        store.remove_all_children(parent);
        assert_eq!(store.n_children(parent), 0);
        assert!(store.is_alive(a) && store.is_alive(b));
        store.add_child(parent, b);
        store.destroy_all_children(parent);
        assert!(!store.is_alive(b));
    }
}
