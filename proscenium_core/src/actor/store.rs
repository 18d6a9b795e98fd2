// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actor storage: slot allocation, handle validation and basic state.

use std::rc::Rc;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::class::{ActorClass, PlainActor};
use crate::config::DebugConfig;
use crate::event::{ActorEvent, ActorEventKind};
use crate::layout_manager::FixedLayout;
use crate::property::Property;
use crate::stage::StageHost;
use crate::trace::{TraceSink, Tracer};

use super::flags::{ActorFlags, PrivateFlags};
use super::id::{ActorId, INVALID};
use super::node::ActorNode;

/// Arena of actors addressed by [`ActorId`] handles.
///
/// Destroyed actors are recycled via a free list, and generation counters
/// make stale handles fail loudly: every method taking an [`ActorId`] panics
/// with a "stale ActorId" message when handed a handle to a destroyed actor.
///
/// # Invariants
///
/// - A mapped actor is realized.
/// - A realized non-toplevel actor with a parent has a realized parent.
/// - A mapped non-toplevel actor with a parent has a mapped parent, unless
///   it is inside a branch painted while unmapped.
/// - Walking a child list forwards and backwards yields the same actors,
///   and their number is the parent's child count.
pub struct ActorStore {
    pub(crate) nodes: Vec<ActorNode>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,

    pub(crate) dirty: DirtyTracker<u32>,

    pub(crate) events: Vec<ActorEvent>,
    pub(crate) notify_freeze: u32,
    pub(crate) pending_notifies: Vec<(ActorId, Property)>,

    /// Roots of queued relayouts, consumed by `update_stage`.
    pub(crate) pending_relayouts: Vec<ActorId>,

    pub(crate) debug: DebugConfig,
    pub(crate) tracer: Tracer,
    pub(crate) frame_index: u64,

    pub(crate) plain: Rc<dyn ActorClass>,
}

impl core::fmt::Debug for ActorStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActorStore")
            .field("len", &self.nodes.len())
            .field("free", &self.free_list.len())
            .field("pending_events", &self.events.len())
            .field("debug", &self.debug)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Default for ActorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorStore {
    /// Creates an empty store with [`DebugConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_debug_config(DebugConfig::default())
    }

    /// Creates an empty store with the given debug switches.
    #[must_use]
    pub fn with_debug_config(debug: DebugConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            events: Vec::new(),
            notify_freeze: 0,
            pending_notifies: Vec::new(),
            pending_relayouts: Vec::new(),
            debug,
            tracer: Tracer::none(),
            frame_index: 0,
            plain: Rc::new(PlainActor),
        }
    }

    /// The debug switches in effect.
    #[must_use]
    pub fn debug_config(&self) -> DebugConfig {
        self.debug
    }

    /// Replaces the debug switches.
    pub fn set_debug_config(&mut self, debug: DebugConfig) {
        self.debug = debug;
    }

    /// Installs a trace sink. Events reach it only with the `trace` feature.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take_sink()
    }

    /// Number of frames driven through [`update_stage`](Self::update_stage).
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // -- Allocation API --

    /// Creates a plain actor.
    ///
    /// The actor starts hidden, unparented, with no size and a pending
    /// relayout.
    pub fn create_actor(&mut self) -> ActorId {
        let class = Rc::clone(&self.plain);
        self.create_actor_with_class(class)
    }

    /// Creates an actor whose behavior is customized by `class`.
    pub fn create_actor_with_class(&mut self, class: Rc<dyn ActorClass>) -> ActorId {
        let node = ActorNode::new(class);
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.nodes[idx as usize] = node;
            idx
        } else {
            let idx = u32::try_from(self.nodes.len()).unwrap_or(INVALID);
            assert!(idx != INVALID, "actor store is full");
            self.nodes.push(node);
            self.generation.push(0);
            idx
        };
        self.id_at(idx)
    }

    /// Creates a stage: a toplevel actor shown through `host`.
    ///
    /// Stages cannot be added to another actor. They are realized when
    /// shown, and mapped by the host through
    /// [`set_stage_mapped`](Self::set_stage_mapped). Children are placed by
    /// a [`FixedLayout`] unless another manager is set.
    pub fn create_stage(&mut self, host: Rc<dyn StageHost>) -> ActorId {
        let id = self.create_actor();
        let node = &mut self.nodes[id.idx as usize];
        node.private.insert(PrivateFlags::IS_TOPLEVEL);
        node.flags.insert(ActorFlags::REACTIVE);
        node.host = Some(host);
        node.layout_manager = Some(Rc::new(FixedLayout));
        id
    }

    /// Returns whether the given handle refers to a live actor.
    #[must_use]
    pub fn is_alive(&self, id: ActorId) -> bool {
        (id.idx as usize) < self.nodes.len()
            && self.generation[id.idx as usize] == id.generation
            && self.nodes[id.idx as usize].alive
    }

    /// All live actors without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<ActorId> {
        (0..self.nodes.len())
            .filter_map(|i| u32::try_from(i).ok())
            .filter(|&i| {
                let n = &self.nodes[i as usize];
                n.alive && n.parent == INVALID
            })
            .map(|i| self.id_at(i))
            .collect()
    }

    /// Number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the store holds no live actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Basic state --

    /// Public state bits.
    #[must_use]
    pub fn flags(&self, id: ActorId) -> ActorFlags {
        self.node(id).flags
    }

    /// The behavior attached at creation.
    #[must_use]
    pub fn class(&self, id: ActorId) -> Rc<dyn ActorClass> {
        Rc::clone(&self.node(id).class)
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self, id: ActorId) -> Option<&str> {
        self.node(id).name.as_deref()
    }

    /// Sets the diagnostic name.
    pub fn set_name(&mut self, id: ActorId, name: Option<&str>) {
        self.node_mut(id).name = name.map(str::to_owned);
    }

    /// Whether the actor is a stage.
    #[must_use]
    pub fn is_toplevel(&self, id: ActorId) -> bool {
        self.node(id).is_toplevel()
    }

    /// Whether the actor will be painted.
    #[must_use]
    pub fn is_mapped(&self, id: ActorId) -> bool {
        self.node(id).is_mapped()
    }

    /// Whether backend resources for the actor may exist.
    #[must_use]
    pub fn is_realized(&self, id: ActorId) -> bool {
        self.node(id).is_realized()
    }

    /// Whether the actor should be shown.
    #[must_use]
    pub fn is_visible(&self, id: ActorId) -> bool {
        self.node(id).is_visible()
    }

    /// Whether the actor is being destroyed.
    #[must_use]
    pub fn is_in_destruction(&self, id: ActorId) -> bool {
        self.node(id).in_destruction()
    }

    /// Whether the actor is inside a pick pass.
    #[must_use]
    pub fn is_in_pick(&self, id: ActorId) -> bool {
        self.node(id).private.contains(PrivateFlags::IN_PICK)
    }

    /// Whether the actor is inside a paint pass.
    #[must_use]
    pub fn is_in_paint(&self, id: ActorId) -> bool {
        self.node(id).private.contains(PrivateFlags::IN_PAINT)
    }

    /// Whether the actor takes part in picking.
    #[must_use]
    pub fn is_reactive(&self, id: ActorId) -> bool {
        self.node(id).flags.contains(ActorFlags::REACTIVE)
    }

    /// Sets whether the actor takes part in picking.
    pub fn set_reactive(&mut self, id: ActorId, reactive: bool) {
        if self.is_reactive(id) == reactive {
            return;
        }
        self.node_mut(id).flags.set(ActorFlags::REACTIVE, reactive);
        self.notify(id, Property::Reactive);
    }

    /// Sets or clears [`ActorFlags::NO_LAYOUT`].
    pub fn set_no_layout(&mut self, id: ActorId, no_layout: bool) {
        self.node_mut(id).flags.set(ActorFlags::NO_LAYOUT, no_layout);
    }

    /// The stage the actor belongs to: the toplevel at the root of its tree.
    #[must_use]
    pub fn stage(&self, id: ActorId) -> Option<ActorId> {
        self.validate(id);
        let mut idx = id.idx;
        while idx != INVALID {
            let node = &self.nodes[idx as usize];
            if node.is_toplevel() {
                return Some(self.id_at(idx));
            }
            idx = node.parent;
        }
        None
    }

    /// The host of the actor's stage.
    #[must_use]
    pub fn stage_host(&self, id: ActorId) -> Option<Rc<dyn StageHost>> {
        let stage = self.stage(id)?;
        self.nodes[stage.idx as usize].host.clone()
    }

    // -- Events --

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, ActorEvent> {
        self.events.drain(..)
    }

    /// Queued events, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &[ActorEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, actor: ActorId, kind: ActorEventKind) {
        self.events.push(ActorEvent { actor, kind });
    }

    // -- Internal helpers --

    /// Builds a handle for a live slot.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> ActorId {
        ActorId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Builds a handle for a slot index that may be [`INVALID`].
    #[inline]
    pub(crate) fn opt_id(&self, idx: u32) -> Option<ActorId> {
        (idx != INVALID).then(|| self.id_at(idx))
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ActorId) {
        assert!(
            self.is_alive(id),
            "stale ActorId: {id:?} (current gen: {})",
            if (id.idx as usize) < self.generation.len() {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    #[inline]
    pub(crate) fn node(&self, id: ActorId) -> &ActorNode {
        self.validate(id);
        &self.nodes[id.idx as usize]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: ActorId) -> &mut ActorNode {
        self.validate(id);
        &mut self.nodes[id.idx as usize]
    }

    #[inline]
    pub(crate) fn has(&self, id: ActorId, flag: PrivateFlags) -> bool {
        self.nodes[id.idx as usize].private.contains(flag)
    }

    #[inline]
    pub(crate) fn set_private(&mut self, id: ActorId, flag: PrivateFlags, on: bool) {
        self.nodes[id.idx as usize].private.set(flag, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStage;

    #[test]
    fn create_and_destroy() {
        let mut store = ActorStore::new();
        let id = store.create_actor();
        assert!(store.is_alive(id));
        store.destroy(id);
        assert!(!store.is_alive(id));
        assert!(store.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = ActorStore::new();
        let id1 = store.create_actor();
        store.destroy(id1);
        let id2 = store.create_actor();
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    #[should_panic(expected = "stale ActorId")]
    fn destroyed_handle_panics_on_flags() {
        let mut store = ActorStore::new();
        let id = store.create_actor();
        store.destroy(id);
        let _ = store.flags(id);
    }

    #[test]
    #[should_panic(expected = "stale ActorId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let child = store.create_actor();
        store.destroy(child);
        store.add_child(parent, child);
    }

    #[test]
    fn stage_is_found_from_descendants() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(640.0, 480.0)));
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(stage, a);
        store.add_child(a, b);
        assert_eq!(store.stage(b), Some(stage));
        assert!(store.is_toplevel(stage));
        assert!(store.stage_host(b).is_some());

        let loose = store.create_actor();
        assert_eq!(store.stage(loose), None);
    }

    #[test]
    fn roots_returns_parentless_actors() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(a, b);
        assert_eq!(store.roots(), vec![a, c]);
    }

    #[test]
    fn reactive_notifies_once() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.set_reactive(a, true);
        store.set_reactive(a, true);
        let n = store
            .drain_events()
            .filter(|e| e.is_notify(Property::Reactive))
            .count();
        assert_eq!(n, 1);
    }
}
