// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the actor tree and the window system.
//!
//! A *stage* is a toplevel actor created with
//! [`ActorStore::create_stage`](crate::actor::ActorStore::create_stage). It
//! carries a [`StageHost`]: the embedder's handle on the output the stage is
//! shown on. The store reports damage and relayout requests to the host and
//! asks it which views cover a region of the stage.

use kurbo::Rect;

use crate::actor::ActorId;
use crate::transform::Transform3d;

/// One output region of a stage, with its own scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageView {
    /// Identifier chosen by the host.
    pub id: u32,
    /// Area of the stage shown by this view, in stage coordinates.
    pub layout: Rect,
    /// Device pixels per stage unit.
    pub scale: f64,
}

/// Services the window system provides to a stage.
///
/// Methods take `&self`; hosts that record state use interior mutability.
pub trait StageHost {
    /// Size of the stage in stage units, as a rectangle at the origin.
    fn viewport(&self) -> Rect;

    /// Matrix from stage coordinates to window pixels. Perspective stages
    /// return a projective matrix.
    fn projection(&self) -> Transform3d {
        Transform3d::IDENTITY
    }

    /// An actor in this stage needs a new layout pass.
    fn queue_actor_relayout(&self, actor: ActorId) {
        _ = actor;
    }

    /// Adds a window-space area to the next frame's damage. `None` means the
    /// whole stage.
    fn add_to_redraw_clip(&self, clip: Option<Rect>) {
        _ = clip;
    }

    /// Asks for a frame to be scheduled.
    fn schedule_update(&self) {}

    /// The views overlapping `rect` (window space).
    fn views_for_rect(&self, rect: Rect) -> Vec<StageView> {
        _ = rect;
        Vec::new()
    }

    /// The scale of `view`. Hosts may override this to account for
    /// fractional scaling policies.
    fn view_scale(&self, view: &StageView) -> f64 {
        view.scale
    }
}
