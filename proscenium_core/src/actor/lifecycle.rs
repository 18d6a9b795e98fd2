// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility, mapping, realization and destruction.
//!
//! Three bits describe where an actor is in its life: `VISIBLE` is what the
//! application asked for, `REALIZED` says backend resources may exist and
//! `MAPPED` says the actor will be painted. Every operation that can change
//! them funnels through [`ActorStore::update_map_state`], which derives the
//! legal combination from the actor's own visibility and its parent's state.

use std::rc::Rc;

use crate::event::ActorEventKind;
use crate::geometry::Orientation;
use crate::property::Property;

use super::flags::{ActorFlags, PrivateFlags};
use super::id::INVALID;
use super::node::ActorNode;
use super::traverse::TraverseVisit;
use super::tree::RemoveChildFlags;
use super::{ActorId, ActorStore};

/// The change requested from [`ActorStore::update_map_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapStateChange {
    /// Reconcile the flags with the current visibility and parent state.
    Check,
    /// The actor is being mapped by its parent.
    MakeMapped,
    /// The actor is being unmapped by its parent.
    MakeUnmapped,
    /// The actor is leaving its parent and must lose its resources.
    MakeUnrealized,
}

impl ActorStore {
    // -- Visibility --

    /// Makes the actor visible. It is mapped as soon as its parent is.
    pub fn show(&mut self, id: ActorId) {
        self.validate(id);
        if self.nodes[id.idx as usize].is_visible() {
            // An unparented actor remembers the request for its next parent.
            self.set_show_on_set_parent(id, true);
            return;
        }

        let mut s = self.freeze_notify();
        s.set_show_on_set_parent(id, true);

        if s.nodes[id.idx as usize].private.intersects(
            PrivateFlags::NEEDS_COMPUTE_EXPAND
                | PrivateFlags::NEEDS_X_EXPAND
                | PrivateFlags::NEEDS_Y_EXPAND,
        ) {
            s.queue_compute_expand(id);
        }

        s.nodes[id.idx as usize].flags.insert(ActorFlags::VISIBLE);
        s.update_map_state(id, MapStateChange::Check);

        let parent = s.parent(id);
        if let Some(parent) = parent
            && !s.nodes[parent.idx as usize]
                .flags
                .contains(ActorFlags::NO_LAYOUT)
        {
            // The parent may have skipped this actor while it was hidden;
            // start from scratch so the relayout is not short-circuited.
            s.nodes[id.idx as usize]
                .private
                .remove(PrivateFlags::NEEDS_LAYOUT);
            s.queue_relayout(id);
        }

        s.emit(id, ActorEventKind::Show);
        s.notify(id, Property::Visible);

        if let Some(parent) = parent {
            s.queue_redraw(parent);
        }
    }

    /// Hides the actor, unmapping it and its descendants.
    pub fn hide(&mut self, id: ActorId) {
        self.validate(id);
        if !self.nodes[id.idx as usize].is_visible() {
            self.set_show_on_set_parent(id, false);
            return;
        }

        let mut s = self.freeze_notify();
        s.set_show_on_set_parent(id, false);

        let parent = s.parent(id);
        if let Some(parent) = parent
            && s.nodes[id.idx as usize]
                .private
                .intersects(PrivateFlags::NEEDS_X_EXPAND | PrivateFlags::NEEDS_Y_EXPAND)
        {
            s.queue_compute_expand(parent);
        }

        s.nodes[id.idx as usize].flags.remove(ActorFlags::VISIBLE);
        s.update_map_state(id, MapStateChange::Check);

        if s.nodes[id.idx as usize].is_toplevel() {
            s.update_map_state(id, MapStateChange::MakeUnmapped);
            s.unrealize_not_hiding(id);
        }

        if let Some(parent) = parent
            && !s.nodes[parent.idx as usize]
                .flags
                .contains(ActorFlags::NO_LAYOUT)
        {
            s.queue_relayout(parent);
        }

        s.emit(id, ActorEventKind::Hide);
        s.notify(id, Property::Visible);

        if let Some(parent) = parent {
            s.queue_redraw(parent);
        }
    }

    /// Shows or hides the actor.
    pub fn set_visible(&mut self, id: ActorId, visible: bool) {
        if visible {
            self.show(id);
        } else {
            self.hide(id);
        }
    }

    /// Whether the actor is shown automatically when added to a parent.
    /// Defaults to `true`.
    #[must_use]
    pub fn show_on_set_parent(&self, id: ActorId) -> bool {
        self.node(id)
            .private
            .contains(PrivateFlags::SHOW_ON_SET_PARENT)
    }

    /// Sets whether the actor is shown when added to a parent.
    pub fn set_show_on_set_parent(&mut self, id: ActorId, show: bool) {
        if self.show_on_set_parent(id) == show {
            return;
        }
        self.set_private(id, PrivateFlags::SHOW_ON_SET_PARENT, show);
        self.notify(id, Property::ShowOnSetParent);
    }

    // -- Map state --

    /// Lets the host of a stage report whether its window is on screen.
    ///
    /// Mapping a stage maps every visible descendant.
    pub fn set_stage_mapped(&mut self, stage: ActorId, mapped: bool) {
        self.validate(stage);
        if !self.nodes[stage.idx as usize].is_toplevel() {
            tracing::warn!(actor = %stage, "only a stage can be mapped by its host");
            return;
        }
        if self.nodes[stage.idx as usize].is_mapped() == mapped {
            return;
        }
        let change = if mapped {
            MapStateChange::MakeMapped
        } else {
            MapStateChange::MakeUnmapped
        };
        self.update_map_state(stage, change);
    }

    /// Reconciles the mapped and realized flags of `id` with its visibility
    /// and its parent.
    pub fn update_map_state(&mut self, id: ActorId, change: MapStateChange) {
        self.validate(id);
        let i = id.idx as usize;
        let was_mapped = self.nodes[i].is_mapped();

        if self.nodes[i].is_toplevel() {
            // Toplevels are realized when shown; the host decides when they
            // are mapped.
            if self.nodes[i].is_visible() {
                self.realize(id);
            }
            match change {
                MapStateChange::Check => {}
                MapStateChange::MakeMapped => {
                    debug_assert!(!was_mapped, "stage mapped twice");
                    self.set_mapped(id, true);
                }
                MapStateChange::MakeUnmapped => self.set_mapped(id, false),
                MapStateChange::MakeUnrealized => {
                    tracing::error!(
                        actor = %id,
                        "a stage cannot be unrealized by removing it from a parent"
                    );
                }
            }
        } else {
            let mut should_be_mapped = false;
            let mut may_be_realized = true;
            let mut must_be_realized = false;

            let parent = self.nodes[i].parent;
            if parent == INVALID || change == MapStateChange::MakeUnrealized {
                may_be_realized = false;
            } else {
                let p = &self.nodes[parent as usize];
                if change != MapStateChange::MakeUnmapped && self.nodes[i].is_visible() {
                    let visible_realized_toplevel =
                        p.is_toplevel() && p.is_visible() && p.is_realized();
                    if p.is_mapped() || visible_realized_toplevel {
                        should_be_mapped = true;
                    }
                }

                if self.nodes[i]
                    .private
                    .contains(PrivateFlags::ENABLE_PAINT_UNMAPPED)
                {
                    should_be_mapped = true;
                    must_be_realized = true;
                }

                if !p.is_realized() {
                    may_be_realized = false;
                }
            }

            if change == MapStateChange::MakeMapped && !should_be_mapped {
                tracing::warn!(
                    actor = %id,
                    "asked to map an actor whose parent is not mapped or which is hidden"
                );
            }

            if !should_be_mapped {
                self.set_mapped(id, false);
            }
            if must_be_realized {
                self.realize(id);
            }
            if !may_be_realized {
                self.unrealize_not_hiding(id);
            }
            if should_be_mapped {
                if !must_be_realized {
                    self.realize(id);
                }
                // Realization fails without a realized parent.
                if self.nodes[i].is_realized() {
                    self.set_mapped(id, true);
                }
            }
        }

        if self.debug.verify_map_state {
            self.verify_map_state(id);
        }
    }

    fn set_mapped(&mut self, id: ActorId, mapped: bool) {
        let i = id.idx as usize;
        if self.nodes[i].is_mapped() == mapped {
            return;
        }
        if self.nodes[i].private.contains(PrivateFlags::IN_MAP_UNMAP) {
            tracing::warn!(actor = %id, "map state changed while already mapping or unmapping");
            return;
        }
        self.nodes[i].private.insert(PrivateFlags::IN_MAP_UNMAP);
        let class = Rc::clone(&self.nodes[i].class);
        if mapped {
            class.map(self, id);
        } else {
            class.unmap(self, id);
        }
        if self.is_alive(id) {
            self.nodes[i].private.remove(PrivateFlags::IN_MAP_UNMAP);
        }
    }

    /// Maps a visible, unmapped child of an actor being mapped. Used by the
    /// default map implementation.
    pub(crate) fn map_child(&mut self, child: ActorId) {
        let node = &self.nodes[child.idx as usize];
        if node.is_mapped() || !node.is_visible() {
            return;
        }
        self.update_map_state(child, MapStateChange::MakeMapped);
    }

    /// Unmaps a mapped child of an actor being unmapped.
    pub(crate) fn unmap_child(&mut self, child: ActorId) {
        if !self.nodes[child.idx as usize].is_mapped() {
            return;
        }
        self.update_map_state(child, MapStateChange::MakeUnmapped);
    }

    // -- Realization --

    /// Realizes the actor, and its ancestors first.
    ///
    /// Fails silently unless the actor is, or is inside, a stage.
    pub fn realize(&mut self, id: ActorId) {
        self.validate(id);
        let i = id.idx as usize;
        if self.nodes[i].is_realized() {
            return;
        }

        let parent = self.parent(id);
        if let Some(parent) = parent {
            self.realize(parent);
        }

        if !self.nodes[i].is_toplevel() {
            let parent_realized = parent.is_some_and(|p| self.nodes[p.idx as usize].is_realized());
            if !parent_realized {
                return;
            }
        }

        self.nodes[i].flags.insert(ActorFlags::REALIZED);
        let class = Rc::clone(&self.nodes[i].class);
        class.realize(self, id);
        self.emit(id, ActorEventKind::Realize);
        self.notify(id, Property::Realized);

        self.update_map_state(id, MapStateChange::Check);
    }

    /// Unrealizes an unmapped actor and its descendants.
    ///
    /// Logs a warning and does nothing if the actor is mapped.
    pub fn unrealize(&mut self, id: ActorId) {
        self.validate(id);
        let node = &self.nodes[id.idx as usize];
        if node.is_mapped() && node.unmapped_paint_branch_counter == 0 {
            tracing::warn!(actor = %id, "cannot unrealize a mapped actor");
            return;
        }
        self.unrealize_not_hiding(id);
    }

    /// Unrealizes the subtree without touching visibility. Children release
    /// their resources before their parent's flag is cleared.
    pub(crate) fn unrealize_not_hiding(&mut self, id: ActorId) {
        self.traverse_depth_first(
            id,
            &mut |store, actor, _| {
                if !store.nodes[actor.idx as usize].is_realized() {
                    return TraverseVisit::SkipChildren;
                }
                store.emit(actor, ActorEventKind::Unrealize);
                let class = Rc::clone(&store.nodes[actor.idx as usize].class);
                class.unrealize(store, actor);
                TraverseVisit::Continue
            },
            &mut |store, actor, _| {
                let node = &mut store.nodes[actor.idx as usize];
                if !node.is_realized() {
                    return TraverseVisit::Continue;
                }
                node.flags.remove(ActorFlags::REALIZED);
                if node.unmapped_paint_branch_counter == 0 {
                    node.visible_paint_volume = None;
                    node.last_visible_paint_volume = None;
                    node.private.insert(PrivateFlags::NEEDS_VISIBLE_PV_UPDATE);
                }
                store.notify(actor, Property::Realized);
                TraverseVisit::Continue
            },
        );
    }

    // -- Offscreen painting --

    /// Lets the actor be painted while it is not mapped, for example into an
    /// offscreen buffer.
    ///
    /// The actor and its descendants are realized and mapped regardless of
    /// their ancestors, as long as the actor is inside a stage.
    pub fn set_enable_paint_unmapped(&mut self, id: ActorId, enable: bool) {
        self.validate(id);
        if self.has(id, PrivateFlags::ENABLE_PAINT_UNMAPPED) == enable {
            return;
        }
        self.set_private(id, PrivateFlags::ENABLE_PAINT_UNMAPPED, enable);
        if enable {
            self.push_in_paint_unmapped_branch(id, 1);
            // Ancestors must be realized first for the map-state checks to
            // hold.
            self.realize(id);
            if self.nodes[id.idx as usize].is_realized() {
                self.update_map_state(id, MapStateChange::MakeMapped);
            }
        } else {
            self.update_map_state(id, MapStateChange::Check);
            self.pop_in_paint_unmapped_branch(id, 1);
        }
    }

    /// Whether the actor is painted while unmapped.
    #[must_use]
    pub fn is_paint_unmapped_enabled(&self, id: ActorId) -> bool {
        self.node(id)
            .private
            .contains(PrivateFlags::ENABLE_PAINT_UNMAPPED)
    }

    pub(crate) fn push_in_paint_unmapped_branch(&mut self, id: ActorId, count: u32) {
        self.traverse_depth_first(
            id,
            &mut |store, actor, _| {
                store.nodes[actor.idx as usize].unmapped_paint_branch_counter += count;
                TraverseVisit::Continue
            },
            &mut |_, _, _| TraverseVisit::Continue,
        );
    }

    pub(crate) fn pop_in_paint_unmapped_branch(&mut self, id: ActorId, count: u32) {
        self.traverse_depth_first(
            id,
            &mut |store, actor, _| {
                let node = &mut store.nodes[actor.idx as usize];
                node.unmapped_paint_branch_counter = node.unmapped_paint_branch_counter.saturating_sub(count);
                TraverseVisit::Continue
            },
            &mut |_, _, _| TraverseVisit::Continue,
        );
    }

    // -- Verification --

    /// Describes how the actor's flags break the map-state rules, if they
    /// do.
    #[must_use]
    pub fn map_state_violation(&self, id: ActorId) -> Option<String> {
        let node = self.node(id);
        if node.is_mapped() && !node.is_realized() {
            return Some(format!("{id} is mapped but not realized"));
        }
        if node.is_toplevel() || node.parent == INVALID {
            return None;
        }
        let parent = &self.nodes[node.parent as usize];
        if node.is_realized() && !parent.is_realized() {
            return Some(format!("{id} is realized but its parent is not"));
        }
        if node.is_mapped() && !parent.is_mapped() && node.unmapped_paint_branch_counter == 0 {
            let visible_realized_toplevel =
                parent.is_toplevel() && parent.is_visible() && parent.is_realized();
            if !visible_realized_toplevel {
                return Some(format!("{id} is mapped but its parent is not"));
            }
        }
        if node.is_visible()
            && parent.is_mapped()
            && !node.is_mapped()
            && !parent.private.contains(PrivateFlags::IN_MAP_UNMAP)
            && !node.private.contains(PrivateFlags::IN_MAP_UNMAP)
        {
            return Some(format!("{id} is visible inside a mapped parent but not mapped"));
        }
        None
    }

    fn verify_map_state(&self, id: ActorId) {
        let violation = self.map_state_violation(id);
        debug_assert!(violation.is_none(), "map state violation: {violation:?}");
        if let Some(msg) = violation {
            tracing::error!(actor = %id, "{msg}");
        }
    }

    // -- Expand --

    /// Whether the actor, or any visible descendant, asks for extra space
    /// along `orientation`.
    pub fn needs_expand(&mut self, id: ActorId, orientation: Orientation) -> bool {
        self.validate(id);
        let node = &self.nodes[id.idx as usize];
        if !node.is_visible() || node.in_destruction() {
            return false;
        }
        self.compute_expand(id);
        let flag = match orientation {
            Orientation::Horizontal => PrivateFlags::NEEDS_X_EXPAND,
            Orientation::Vertical => PrivateFlags::NEEDS_Y_EXPAND,
        };
        self.has(id, flag)
    }

    fn compute_expand(&mut self, id: ActorId) {
        if !self.has(id, PrivateFlags::NEEDS_COMPUTE_EXPAND) {
            return;
        }
        let x_set = self.has(id, PrivateFlags::X_EXPAND_SET);
        let y_set = self.has(id, PrivateFlags::Y_EXPAND_SET);
        let info = *self.nodes[id.idx as usize].layout_info();
        let mut x_expand = x_set && info.x_expand;
        let mut y_expand = y_set && info.y_expand;

        if !(x_set && y_set) {
            let children: Vec<ActorId> = self.children(id).collect();
            for child in children {
                if !x_set && !x_expand {
                    x_expand = self.needs_expand(child, Orientation::Horizontal);
                }
                if !y_set && !y_expand {
                    y_expand = self.needs_expand(child, Orientation::Vertical);
                }
            }
        }

        let node = &mut self.nodes[id.idx as usize];
        node.private.remove(PrivateFlags::NEEDS_COMPUTE_EXPAND);
        node.private.set(PrivateFlags::NEEDS_X_EXPAND, x_expand);
        node.private.set(PrivateFlags::NEEDS_Y_EXPAND, y_expand);
    }

    /// Marks the expand state of the actor and its ancestors stale.
    pub(crate) fn queue_compute_expand(&mut self, id: ActorId) {
        if self.has(id, PrivateFlags::NEEDS_COMPUTE_EXPAND) {
            return;
        }
        let mut changed = false;
        let mut idx = id.idx;
        while idx != INVALID {
            let node = &mut self.nodes[idx as usize];
            if !node.private.contains(PrivateFlags::NEEDS_COMPUTE_EXPAND) {
                node.private.insert(PrivateFlags::NEEDS_COMPUTE_EXPAND);
                changed = true;
            }
            idx = node.parent;
        }
        if changed {
            self.queue_relayout(id);
        }
    }

    // -- Destruction --

    /// Destroys the actor and, by default, all of its descendants.
    ///
    /// The actor is removed from its parent, its meta objects, content and
    /// layout manager are detached and its transitions dropped. Its handle
    /// is stale afterwards. Destroying an actor that is already being
    /// destroyed does nothing.
    pub fn destroy(&mut self, id: ActorId) {
        self.validate(id);
        let i = id.idx as usize;
        if self.nodes[i].in_destruction() {
            return;
        }
        self.nodes[i].private.insert(PrivateFlags::IN_DESTRUCTION);

        let mut s = self.freeze_notify();
        s.emit(id, ActorEventKind::Destroy);

        let class = Rc::clone(&s.nodes[i].class);
        class.destroy(&mut s, id);

        if let Some(parent) = s.parent(id) {
            s.remove_child_internal(parent, id, RemoveChildFlags::DEFAULT);
        }

        if s.nodes[i].is_toplevel() {
            s.update_map_state(id, MapStateChange::MakeUnmapped);
            s.unrealize_not_hiding(id);
        }

        // Children not removed by the class go with their parent.
        while let Some(child) = s.first_child(id) {
            s.destroy(child);
        }

        s.clear_actions(id);
        s.clear_constraints(id);
        s.clear_effects(id);
        if let Some(content) = s.nodes[i].content.take() {
            content.detached(id);
        }
        if let Some(manager) = s.nodes[i].layout_manager.take() {
            manager.set_container(None);
        }
        s.nodes[i].animation = None;

        if let Some(source) = s.nodes[i].clone_source.take()
            && s.is_alive(source)
        {
            s.nodes[source.idx as usize].clones.retain(|&c| c != id);
        }
        let clones = core::mem::take(&mut s.nodes[i].clones);
        for clone in clones {
            if s.is_alive(clone) {
                s.nodes[clone.idx as usize].clone_source = None;
                s.queue_relayout(clone);
            }
        }

        s.pending_relayouts.retain(|&a| a != id);
        s.dirty.remove_key(id.idx);
        let plain = Rc::clone(&s.plain);
        s.nodes[i] = ActorNode::vacant(plain);
        s.free_list.push(id.idx);
    }
}
