// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the actor tree and a paint backend.
//!
//! The core never draws anything itself. Painting walks the mapped tree and
//! describes it to a [`PaintNode`]: a nested sequence of layers (actor,
//! transform and clip) with rectangles and content inside them. A
//! backend turns that description into draw calls; the
//! [`testing`](crate::testing) module has one that just records it.
//!
//! [`PaintContext`] carries what the backend knows about the frame being
//! drawn: the clip frusta used for culling and whether the output goes
//! somewhere other than the stage.

use kurbo::{Point, Rect};

use crate::actor::ActorId;
use crate::geometry::Color;
use crate::paint_volume::Frustum;
use crate::transform::Transform3d;

/// A nesting level opened with [`PaintNode::push_layer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintLayer {
    /// Everything until the matching pop belongs to this actor.
    Actor(ActorId),
    /// Multiplies the current modelview.
    Transform(Transform3d),
    /// Restricts drawing to a rectangle in the current coordinates.
    Clip(Rect),
}

/// Receives the description of a frame.
///
/// Layers nest: every [`push_layer`](Self::push_layer) is matched by one
/// [`pop_layer`](Self::pop_layer).
pub trait PaintNode {
    /// Opens a layer.
    fn push_layer(&mut self, layer: PaintLayer);

    /// Closes the innermost open layer.
    fn pop_layer(&mut self);

    /// Fills `rect`, in the current coordinates, with `color`.
    fn add_rectangle(&mut self, rect: Rect, color: Color);

    /// The frame is complete.
    fn submit(&mut self) {}
}

/// Per-frame paint state.
#[derive(Clone, Debug, Default)]
pub struct PaintContext {
    clip_frusta: Vec<Frustum>,
    redraw_clip: Option<Rect>,
    off_stage: bool,
}

impl PaintContext {
    /// A context that paints the whole stage with no culling frusta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context restricted to `clip`, in window coordinates.
    #[must_use]
    pub fn with_redraw_clip(clip: Rect) -> Self {
        Self {
            clip_frusta: vec![Frustum::from_rect(clip)],
            redraw_clip: Some(clip),
            off_stage: false,
        }
    }

    /// Adds a frustum actors are culled against. An actor is culled when
    /// it lies outside every frustum.
    pub fn push_clip_frustum(&mut self, frustum: Frustum) {
        self.clip_frusta.push(frustum);
    }

    /// Removes the last frustum added.
    pub fn pop_clip_frustum(&mut self) -> Option<Frustum> {
        self.clip_frusta.pop()
    }

    /// The culling frusta, in window coordinates.
    #[must_use]
    pub fn clip_frusta(&self) -> &[Frustum] {
        &self.clip_frusta
    }

    /// The damaged area being repainted, if known.
    #[must_use]
    pub fn redraw_clip(&self) -> Option<Rect> {
        self.redraw_clip
    }

    /// Marks the output as going somewhere other than the stage, such as an
    /// offscreen buffer. Culling is skipped.
    pub fn set_off_stage(&mut self, off_stage: bool) {
        self.off_stage = off_stage;
    }

    /// Whether the output goes somewhere other than the stage.
    #[must_use]
    pub fn is_off_stage(&self) -> bool {
        self.off_stage
    }
}

/// State of a pick pass: the point being tested and the actors found
/// under it, bottom first.
#[derive(Clone, Debug)]
pub struct PickContext {
    point: Point,
    reactive_only: bool,
    hits: Vec<ActorId>,
}

impl PickContext {
    /// Picks reactive actors at `point`, in stage coordinates.
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self {
            point,
            reactive_only: true,
            hits: Vec::new(),
        }
    }

    /// Picks every mapped actor at `point`, reactive or not.
    #[must_use]
    pub fn all(point: Point) -> Self {
        Self {
            reactive_only: false,
            ..Self::new(point)
        }
    }

    /// The point being tested.
    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    /// Whether non-reactive actors are skipped.
    #[must_use]
    pub fn reactive_only(&self) -> bool {
        self.reactive_only
    }

    /// Records a hit. Later hits are on top of earlier ones.
    pub fn log_hit(&mut self, actor: ActorId) {
        self.hits.push(actor);
    }

    /// Every hit in paint order.
    #[must_use]
    pub fn hits(&self) -> &[ActorId] {
        &self.hits
    }

    /// The last actor hit, which is the one painted on top.
    #[must_use]
    pub fn topmost(&self) -> Option<ActorId> {
        self.hits.last().copied()
    }
}
