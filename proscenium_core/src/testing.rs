// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording implementations of the embedder traits.
//!
//! These are what the crate's own tests run against, and they are public so
//! that embedders and layout-manager authors can test their code the same
//! way: build a tree, drive it, and assert on what reached the host or the
//! paint backend.

use core::cell::{Cell, RefCell};

use kurbo::Rect;

use crate::actor::{ActorId, ActorStore};
use crate::geometry::Color;
use crate::layout_manager::LayoutManager;
use crate::paint::{PaintLayer, PaintNode};
use crate::property::Animatable;
use crate::stage::{StageHost, StageView};
use crate::transform::Transform3d;

/// A [`StageHost`] that records every request made to it.
#[derive(Debug)]
pub struct RecordingStage {
    viewport: Rect,
    projection: Cell<Transform3d>,
    views: RefCell<Vec<StageView>>,
    clips: RefCell<Vec<Option<Rect>>>,
    relayouts: RefCell<Vec<ActorId>>,
    updates: Cell<u32>,
}

impl RecordingStage {
    /// A stage of `width` by `height` with an identity projection and no
    /// views.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, width, height),
            projection: Cell::new(Transform3d::IDENTITY),
            views: RefCell::new(Vec::new()),
            clips: RefCell::new(Vec::new()),
            relayouts: RefCell::new(Vec::new()),
            updates: Cell::new(0),
        }
    }

    /// Replaces the stage-to-window matrix.
    pub fn set_projection(&self, projection: Transform3d) {
        self.projection.set(projection);
    }

    /// Replaces the views the stage is shown on.
    pub fn set_views(&self, views: Vec<StageView>) {
        *self.views.borrow_mut() = views;
    }

    /// Returns and forgets the redraw clips reported so far, in order.
    /// `None` entries are full-stage redraws.
    pub fn take_clips(&self) -> Vec<Option<Rect>> {
        core::mem::take(&mut *self.clips.borrow_mut())
    }

    /// Returns and forgets the relayout roots reported so far.
    pub fn take_relayouts(&self) -> Vec<ActorId> {
        core::mem::take(&mut *self.relayouts.borrow_mut())
    }

    /// How many times an update was scheduled.
    #[must_use]
    pub fn update_count(&self) -> u32 {
        self.updates.get()
    }
}

impl StageHost for RecordingStage {
    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn projection(&self) -> Transform3d {
        self.projection.get()
    }

    fn queue_actor_relayout(&self, actor: ActorId) {
        self.relayouts.borrow_mut().push(actor);
    }

    fn add_to_redraw_clip(&self, clip: Option<Rect>) {
        self.clips.borrow_mut().push(clip);
    }

    fn schedule_update(&self) {
        self.updates.set(self.updates.get() + 1);
    }

    fn views_for_rect(&self, rect: Rect) -> Vec<StageView> {
        self.views
            .borrow()
            .iter()
            .filter(|view| view.layout.intersect(rect).area() > 0.0)
            .copied()
            .collect()
    }
}

/// A layout manager that reports fixed sizes and counts how often it is
/// asked.
///
/// Children are allocated at their fixed position with their preferred
/// size.
#[derive(Debug)]
pub struct CountingLayout {
    min: f64,
    natural: f64,
    width_calls: Cell<u32>,
    height_calls: Cell<u32>,
    allocate_calls: Cell<u32>,
    container: Cell<Option<ActorId>>,
}

impl CountingLayout {
    /// A manager asking for `min` by `min` at least and `natural` by
    /// `natural` ideally.
    #[must_use]
    pub fn new(min: f64, natural: f64) -> Self {
        Self {
            min,
            natural,
            width_calls: Cell::new(0),
            height_calls: Cell::new(0),
            allocate_calls: Cell::new(0),
            container: Cell::new(None),
        }
    }

    /// Calls to [`LayoutManager::preferred_width`].
    #[must_use]
    pub fn width_calls(&self) -> u32 {
        self.width_calls.get()
    }

    /// Calls to [`LayoutManager::preferred_height`].
    #[must_use]
    pub fn height_calls(&self) -> u32 {
        self.height_calls.get()
    }

    /// Calls to [`LayoutManager::allocate`].
    #[must_use]
    pub fn allocate_calls(&self) -> u32 {
        self.allocate_calls.get()
    }

    /// The container the manager is attached to.
    #[must_use]
    pub fn container(&self) -> Option<ActorId> {
        self.container.get()
    }
}

impl Animatable for CountingLayout {}

impl LayoutManager for CountingLayout {
    fn preferred_width(&self, _store: &mut ActorStore, _container: ActorId, _for_height: f64) -> (f64, f64) {
        self.width_calls.set(self.width_calls.get() + 1);
        (self.min, self.natural)
    }

    fn preferred_height(&self, _store: &mut ActorStore, _container: ActorId, _for_width: f64) -> (f64, f64) {
        self.height_calls.set(self.height_calls.get() + 1);
        (self.min, self.natural)
    }

    fn allocate(&self, store: &mut ActorStore, container: ActorId, _allocation: Rect) {
        self.allocate_calls.set(self.allocate_calls.get() + 1);
        let children: Vec<ActorId> = store.children(container).collect();
        for child in children {
            let origin = store.fixed_position(child).unwrap_or_default();
            store.allocate_preferred_size(child, origin.x, origin.y);
        }
    }

    fn set_container(&self, container: Option<ActorId>) {
        self.container.set(container);
    }
}

/// One call received by a [`RecordingPaintNode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    /// [`PaintNode::push_layer`].
    Push(PaintLayer),
    /// [`PaintNode::pop_layer`].
    Pop,
    /// [`PaintNode::add_rectangle`].
    Rectangle(Rect, Color),
}

/// A [`PaintNode`] that keeps the frame description it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingPaintNode {
    ops: Vec<PaintOp>,
    submitted: bool,
}

impl RecordingPaintNode {
    /// Every call received, in order.
    #[must_use]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// The actors whose layers were opened, in paint order.
    #[must_use]
    pub fn painted_actors(&self) -> Vec<ActorId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Push(PaintLayer::Actor(actor)) => Some(*actor),
                _ => None,
            })
            .collect()
    }

    /// Whether every push was matched by a pop, without ever popping more
    /// than was pushed.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0_usize;
        for op in &self.ops {
            match op {
                PaintOp::Push(_) => depth += 1,
                PaintOp::Pop => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                PaintOp::Rectangle(..) => {}
            }
        }
        depth == 0
    }

    /// Whether the frame was submitted.
    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submitted
    }
}

impl PaintNode for RecordingPaintNode {
    fn push_layer(&mut self, layer: PaintLayer) {
        self.ops.push(PaintOp::Push(layer));
    }

    fn pop_layer(&mut self) {
        self.ops.push(PaintOp::Pop);
    }

    fn add_rectangle(&mut self, rect: Rect, color: Color) {
        self.ops.push(PaintOp::Rectangle(rect, color));
    }

    fn submit(&mut self) {
        self.submitted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_are_filtered_by_overlap() {
        let host = RecordingStage::new(200.0, 100.0);
        host.set_views(vec![
            StageView {
                id: 0,
                layout: Rect::new(0.0, 0.0, 100.0, 100.0),
                scale: 1.0,
            },
            StageView {
                id: 1,
                layout: Rect::new(100.0, 0.0, 200.0, 100.0),
                scale: 2.0,
            },
        ]);
        let ids: Vec<u32> = host
            .views_for_rect(Rect::new(120.0, 10.0, 130.0, 20.0))
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![1]);
        // Touching edges do not count.
        assert!(host.views_for_rect(Rect::new(200.0, 0.0, 210.0, 10.0)).is_empty());
    }

    #[test]
    fn unbalanced_pops_are_detected() {
        let mut node = RecordingPaintNode::default();
        node.pop_layer();
        node.push_layer(PaintLayer::Clip(Rect::ZERO));
        assert!(!node.is_balanced());
    }
}
