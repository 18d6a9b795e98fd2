// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage tracking and the finish-layout pass.
//!
//! Queuing a redraw records the request on the actor (optionally with a clip
//! volume in its own coordinates) and marks it and its ancestors dirty, at
//! most once per frame. Nothing is sent to the host yet: the finish-layout
//! pass that runs after relayout turns each pending request into a
//! window-space clip, once the actor's final position is known.

use kurbo::Rect;

use crate::event::ActorEventKind;
use crate::paint_volume::PaintVolume;
use crate::stage::StageView;
use crate::trace::{RedrawClipEvent, RedrawQueuedEvent};

use super::flags::PrivateFlags;
use super::id::INVALID;
use super::traverse::TraverseVisit;
use super::{ActorId, ActorStore};

impl ActorStore {
    /// Queues a redraw of the whole actor.
    pub fn queue_redraw(&mut self, id: ActorId) {
        self.queue_redraw_full(id, None);
    }

    /// Queues a redraw of `clip` (in the actor's coordinates), or of the
    /// whole actor when `clip` is `None`.
    pub fn queue_redraw_with_clip(&mut self, id: ActorId, clip: Option<Rect>) {
        let volume = match clip {
            Some(rect) if !self.debug.disable_clipped_redraws => Some(PaintVolume::from_rect(rect)),
            _ => None,
        };
        self.queue_redraw_full(id, volume);
    }

    /// Queues a redraw on behalf of the effect named `effect`.
    ///
    /// If nothing else dirties the actor before it paints, only that effect
    /// and the ones after it see the actor as dirty, so earlier effects can
    /// reuse cached output.
    pub fn queue_effect_redraw(&mut self, id: ActorId, effect: &str) {
        self.validate(id);
        let i = id.idx as usize;
        if self.nodes[i].in_destruction() {
            return;
        }
        let already_pending = self.nodes[i].private.contains(PrivateFlags::NEEDS_REDRAW);
        let node = &mut self.nodes[i];
        if !already_pending {
            node.effect_to_redraw = Some(effect.to_owned());
        } else if node.effect_to_redraw.as_deref() != Some(effect) {
            // Two effects asked: fall back to a plain redraw.
            node.effect_to_redraw = None;
        }
        self.queue_redraw_full(id, None);
    }

    pub(crate) fn queue_redraw_full(&mut self, id: ActorId, clip: Option<PaintVolume>) {
        self.validate(id);
        let i = id.idx as usize;
        if self.nodes[i].in_destruction() {
            return;
        }
        if !self.nodes[i].is_mapped() && !self.has_mapped_clones(id) {
            return;
        }
        let Some(stage) = self.stage(id) else {
            return;
        };
        if self.nodes[stage.idx as usize].in_destruction() {
            return;
        }

        let clipped = clip.is_some();
        let node = &mut self.nodes[i];
        // An empty clip list with a pending redraw means the whole actor,
        // which absorbs any further clip.
        if !node.private.contains(PrivateFlags::NEEDS_REDRAW) || !node.next_redraw_clips.is_empty() {
            match clip {
                Some(volume) => node.next_redraw_clips.push(volume),
                None => node.next_redraw_clips.clear(),
            }
        }
        node.private.insert(PrivateFlags::NEEDS_REDRAW);

        self.queue_update_finish_layout(id);
        self.propagate_queue_redraw(id);

        if let Some(host) = self.stage_host(id) {
            host.schedule_update();
        }
        self.tracer.redraw_queued(&RedrawQueuedEvent {
            frame_index: self.frame_index,
            actor: id.idx,
            clipped,
        });
    }

    /// Marks `origin` and its ancestors dirty, stopping at an invisible
    /// actor or one that already propagated this frame.
    fn propagate_queue_redraw(&mut self, origin: ActorId) {
        let mut idx = origin.idx;
        while idx != INVALID {
            let node = &self.nodes[idx as usize];
            if node.in_destruction() {
                break;
            }
            let clones = node.clones.clone();
            for clone in clones {
                self.queue_redraw(clone);
            }

            let node = &mut self.nodes[idx as usize];
            node.private.insert(PrivateFlags::IS_DIRTY);
            if idx != origin.idx {
                node.effect_to_redraw = None;
            }
            if !node.is_visible() || node.private.contains(PrivateFlags::PROPAGATED_ONE_REDRAW) {
                break;
            }
            node.private.insert(PrivateFlags::PROPAGATED_ONE_REDRAW);
            idx = node.parent;
        }
    }

    /// Whether a redraw is pending for the actor.
    #[must_use]
    pub fn is_redraw_queued(&self, id: ActorId) -> bool {
        self.node(id).private.contains(PrivateFlags::NEEDS_REDRAW)
    }

    /// Marks the actor and its ancestors as needing the finish-layout
    /// pass.
    pub(crate) fn queue_update_finish_layout(&mut self, id: ActorId) {
        let mut idx = id.idx;
        while idx != INVALID {
            let node = &mut self.nodes[idx as usize];
            if node.private.contains(PrivateFlags::NEEDS_FINISH_LAYOUT) {
                break;
            }
            node.private.insert(PrivateFlags::NEEDS_FINISH_LAYOUT);
            idx = node.parent;
        }
    }

    /// Brings stage-relative state up to date for every marked actor in
    /// the subtree, and sends pending redraws to the host as clips.
    pub(crate) fn finish_layout(&mut self, id: ActorId) {
        let i = id.idx as usize;
        {
            let node = &self.nodes[i];
            if node.in_destruction() || !node.private.contains(PrivateFlags::NEEDS_FINISH_LAYOUT) {
                return;
            }
        }
        // Redraws queued from here on belong to the next frame.
        self.set_private(id, PrivateFlags::PROPAGATED_ONE_REDRAW, false);
        if !self.nodes[i].is_mapped() && !self.has_mapped_clones(id) {
            return;
        }

        let mut moved = false;
        if self.has(id, PrivateFlags::NEEDS_VISIBLE_PV_UPDATE) {
            let visible = self.transformed_paint_volume(id, None);
            let node = &mut self.nodes[i];
            node.last_visible_paint_volume = node.visible_paint_volume.take();
            node.visible_paint_volume = visible;
            node.private.remove(PrivateFlags::NEEDS_VISIBLE_PV_UPDATE);
            moved = true;
        }

        if self.has(id, PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS) {
            self.update_stage_views(id);
            self.update_resource_scale(id);
            self.set_private(id, PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS, false);
        }

        if self.has(id, PrivateFlags::NEEDS_REDRAW) {
            self.add_to_redraw_clip(id, moved);
            let node = &mut self.nodes[i];
            node.next_redraw_clips.clear();
            node.private.remove(PrivateFlags::NEEDS_REDRAW);
        }

        let children: Vec<ActorId> = self.children(id).collect();
        for child in children {
            self.finish_layout(child);
        }
        self.set_private(id, PrivateFlags::NEEDS_FINISH_LAYOUT, false);
    }

    fn add_to_redraw_clip(&mut self, id: ActorId, moved: bool) {
        let Some(host) = self.stage_host(id) else {
            return;
        };
        let projection = host.projection();
        let to_window = |mut volume: PaintVolume| {
            volume.transform(&projection);
            volume.paint_box()
        };

        let node = &self.nodes[id.idx as usize];
        let mut clips: Vec<Option<Rect>> = Vec::new();
        if !node.next_redraw_clips.is_empty() {
            let local = node.next_redraw_clips.clone();
            let modelview = self.stage_relative_transform(id);
            for mut volume in local {
                volume.transform(&modelview);
                clips.push(Some(to_window(volume)));
            }
        } else if moved {
            match (node.last_visible_paint_volume, node.visible_paint_volume) {
                (Some(old), Some(new)) => {
                    clips.push(Some(to_window(old)));
                    clips.push(Some(to_window(new)));
                }
                _ => clips.push(None),
            }
        } else {
            clips.push(node.visible_paint_volume.map(to_window));
        }

        for clip in clips {
            host.add_to_redraw_clip(clip);
            self.tracer.redraw_clip(&RedrawClipEvent {
                frame_index: self.frame_index,
                actor: id.idx,
                clip,
            });
        }
    }

    // -- Stage views --

    /// The stage views the actor overlapped at the last finish-layout.
    #[must_use]
    pub fn peek_stage_views(&self, id: ActorId) -> &[StageView] {
        &self.node(id).stage_views
    }

    fn update_stage_views(&mut self, id: ActorId) {
        let old = std::mem::take(&mut self.nodes[id.idx as usize].stage_views);
        let mut views = Vec::new();
        if self.nodes[id.idx as usize].needs_allocation() {
            tracing::warn!(actor = %id, "cannot find the stage views of an actor that needs an allocation");
        } else if let Some(host) = self.stage_host(id) {
            let extents = self.transformed_extents(id);
            if extents.width() != 0.0 && extents.height() != 0.0 {
                views = host.views_for_rect(extents);
            }
        }
        let changed = views != old;
        self.nodes[id.idx as usize].stage_views = views;
        if changed {
            self.emit(id, ActorEventKind::StageViewsChanged);
        }
    }

    /// The scale the actor's resources should be rendered at: the largest
    /// scale of the views it is on, falling back to its parent's when it
    /// is not on any view yet, and to 1 outside a stage.
    #[must_use]
    pub fn resource_scale(&self, id: ActorId) -> f64 {
        self.validate(id);
        let mut idx = id.idx;
        while idx != INVALID {
            let node = &self.nodes[idx as usize];
            if let Some(scale) = node.resource_scale {
                return scale;
            }
            idx = node.parent;
        }
        1.0
    }

    fn update_resource_scale(&mut self, id: ActorId) {
        let i = id.idx as usize;
        let class = std::rc::Rc::clone(&self.nodes[i].class);
        let Some(new_scale) = class.calculate_resource_scale(self, id) else {
            // Off every view: keep the last scale.
            return;
        };
        let node = &mut self.nodes[i];
        let old = node.resource_scale;
        if old == Some(new_scale) {
            return;
        }
        node.resource_scale = Some(new_scale);
        // The first scale is a discovery, not a change.
        if let Some(old) = old
            && old.ceil() != new_scale.ceil()
        {
            self.emit(id, ActorEventKind::ResourceScaleChanged);
        }
    }

    /// Forgets the stage views of a subtree leaving its stage.
    pub(crate) fn clear_stage_views_recursive(&mut self, id: ActorId) {
        self.traverse_depth_first(
            id,
            &mut |store: &mut Self, actor, _| {
                let node = &mut store.nodes[actor.idx as usize];
                node.private
                    .insert(PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS | PrivateFlags::NEEDS_FINISH_LAYOUT);
                let old = std::mem::take(&mut node.stage_views);
                if !old.is_empty() {
                    store.emit(actor, ActorEventKind::StageViewsChanged);
                }
                TraverseVisit::Continue
            },
            &mut |_: &mut Self, _, _| TraverseVisit::Continue,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use kurbo::Point;

    use super::*;
    use crate::paint::PaintContext;
    use crate::testing::{RecordingPaintNode, RecordingStage};

    fn stage_with_host(store: &mut ActorStore, host: &Rc<RecordingStage>) -> ActorId {
        let stage = store.create_stage(host.clone());
        store.show(stage);
        store.set_stage_mapped(stage, true);
        stage
    }

    fn placed(store: &mut ActorStore, parent: ActorId, rect: Rect) -> ActorId {
        let a = store.create_actor();
        store.add_child(parent, a);
        store.set_position(a, rect.origin());
        store.set_size(a, rect.width(), rect.height());
        a
    }

    #[test]
    fn redraw_is_a_no_op_outside_a_stage() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.show(a);
        store.queue_redraw(a);
        assert!(!store.is_redraw_queued(a));
    }

    #[test]
    fn propagation_marks_each_ancestor_once() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = placed(&mut store, a, Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = placed(&mut store, a, Rect::new(10.0, 0.0, 20.0, 10.0));
        store.update_stage(stage);
        for actor in [stage, a, b, c] {
            assert!(!store.has(actor, PrivateFlags::PROPAGATED_ONE_REDRAW));
        }

        store.queue_redraw(b);
        assert!(store.has(a, PrivateFlags::PROPAGATED_ONE_REDRAW));
        assert!(store.has(stage, PrivateFlags::PROPAGATED_ONE_REDRAW));

        // The sibling stops at the shared parent.
        store.queue_redraw(c);
        assert!(store.has(c, PrivateFlags::PROPAGATED_ONE_REDRAW));
        assert!(store.is_redraw_queued(b) && store.is_redraw_queued(c));
    }

    #[test]
    fn skipped_subtrees_propagate_again_next_frame() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let parent = placed(&mut store, stage, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = placed(&mut store, parent, Rect::new(60.0, 60.0, 80.0, 80.0));
        store.update_stage(stage);
        store.paint_stage(stage, &mut PaintContext::new(), &mut RecordingPaintNode::default());

        // The child lies outside the damaged area, so painting skips it.
        store.queue_redraw(child);
        store.update_stage(stage);
        let mut ctx = PaintContext::with_redraw_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut ctx, &mut node);
        assert!(node.painted_actors().contains(&parent));
        assert!(!node.painted_actors().contains(&child));
        assert!(!store.has(child, PrivateFlags::PROPAGATED_ONE_REDRAW));
        assert!(!store.has(parent, PrivateFlags::IS_DIRTY));

        store.queue_redraw(child);
        assert!(store.has(parent, PrivateFlags::IS_DIRTY));
        assert!(store.has(parent, PrivateFlags::PROPAGATED_ONE_REDRAW));
    }

    #[test]
    fn finish_layout_sends_clips_and_clears_requests() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(10.0, 20.0, 40.0, 60.0));
        store.update_stage(stage);
        host.take_clips();

        store.queue_redraw(a);
        store.update_stage(stage);
        assert!(!store.is_redraw_queued(a));
        assert_eq!(host.take_clips(), vec![Some(Rect::new(10.0, 20.0, 40.0, 60.0))]);
    }

    #[test]
    fn moving_damages_old_and_new_area() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.update_stage(stage);
        host.take_clips();

        store.set_position(a, Point::new(50.0, 0.0));
        store.update_stage(stage);
        let clips = host.take_clips();
        assert!(clips.contains(&Some(Rect::new(0.0, 0.0, 10.0, 10.0))));
        assert!(clips.contains(&Some(Rect::new(50.0, 0.0, 60.0, 10.0))));
    }

    #[test]
    fn clipped_redraw_is_mapped_to_window_space() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 60.0, 60.0));
        store.update_stage(stage);
        host.take_clips();

        store.queue_redraw_with_clip(a, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
        store.queue_redraw_with_clip(a, Some(Rect::new(20.0, 20.0, 25.0, 25.0)));
        store.update_stage(stage);
        assert_eq!(host.take_clips(), vec![
            Some(Rect::new(10.0, 10.0, 15.0, 15.0)),
            Some(Rect::new(30.0, 30.0, 35.0, 35.0)),
        ]);
    }

    #[test]
    fn full_redraw_absorbs_clips() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 30.0, 30.0));
        store.update_stage(stage);
        host.take_clips();

        store.queue_redraw(a);
        store.queue_redraw_with_clip(a, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
        store.update_stage(stage);
        assert_eq!(host.take_clips(), vec![Some(Rect::new(0.0, 0.0, 30.0, 30.0))]);
    }

    #[test]
    fn stage_views_and_resource_scale() {
        let host = Rc::new(RecordingStage::new(200.0, 100.0));
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
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 20.0, 20.0));
        store.update_stage(stage);
        assert_eq!(store.peek_stage_views(a).len(), 1);
        assert_eq!(store.resource_scale(a), 1.0);
        store.drain_events().for_each(drop);

        store.set_position(a, Point::new(95.0, 10.0));
        store.update_stage(stage);
        assert_eq!(store.peek_stage_views(a).len(), 2);
        assert_eq!(store.resource_scale(a), 2.0);
        let events: Vec<_> = store
            .drain_events()
            .filter(|e| e.actor == a)
            .map(|e| e.kind)
            .collect();
        assert!(events.contains(&ActorEventKind::StageViewsChanged));
        assert!(events.contains(&ActorEventKind::ResourceScaleChanged));
    }

    #[test]
    fn removal_clears_stage_views() {
        let host = Rc::new(RecordingStage::new(100.0, 100.0));
        host.set_views(vec![StageView {
            id: 0,
            layout: Rect::new(0.0, 0.0, 100.0, 100.0),
            scale: 1.0,
        }]);
        let mut store = ActorStore::new();
        let stage = stage_with_host(&mut store, &host);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.update_stage(stage);
        assert!(!store.peek_stage_views(a).is_empty());

        store.remove_child(stage, a);
        assert!(store.peek_stage_views(a).is_empty());
    }
}
