// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint and pick passes, and the visual properties they read.
//!
//! Painting an actor opens an actor layer on the [`PaintNode`], applies the
//! actor's local transform and clip, runs its effects around the class's
//! paint and closes the layers again. Before any of that, the actor's
//! visible paint volume is tested against the context's clip frusta and the
//! whole subtree is skipped when it lies outside all of them.

use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use crate::content::Content;
use crate::geometry::{Color, ContentGravity, ContentRepeat, RequestMode, ScalingFilter, content_box};
use crate::meta::EffectPaintFlags;
use crate::paint::{PaintContext, PaintLayer, PaintNode, PickContext};
use crate::paint_volume::CullResult;
use crate::property::{Property, Value};
use crate::trace::{CullEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind};
use crate::transform::Transform3d;

use super::defaults::contains_inclusive;
use super::flags::PrivateFlags;
use super::id::INVALID;
use super::{ActorId, ActorStore};

const PAINT_VOLUME_OUTLINE: Color = Color::rgba(0, 255, 0, 160);
const REDRAW_TINT: Color = Color::rgba(255, 0, 0, 64);

impl ActorStore {
    /// Paints `stage` and everything mapped inside it into `node`, then
    /// submits the node.
    pub fn paint_stage(&mut self, stage: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
        self.validate(stage);
        if !self.nodes[stage.idx as usize].is_toplevel() {
            tracing::warn!(actor = %stage, "paint_stage needs a stage");
            return;
        }
        let frame_index = self.frame_index;
        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Paint,
        });

        self.paint(stage, ctx, node);
        if self.debug.redraws
            && let Some(clip) = ctx.redraw_clip()
        {
            node.add_rectangle(clip, REDRAW_TINT);
        }
        node.submit();

        self.tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Paint,
        });
    }

    /// Paints the actor and its subtree.
    ///
    /// Unmapped actors are skipped unless a clone is painting them.
    pub fn paint(&mut self, id: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
        self.validate(id);
        let i = id.idx as usize;
        let in_clone_paint = {
            let n = &self.nodes[i];
            if n.in_destruction() {
                return;
            }
            let in_clone_paint = n.private.contains(PrivateFlags::IN_CLONE_PAINT);
            if !in_clone_paint && !n.is_mapped() {
                return;
            }
            in_clone_paint
        };

        self.set_private(id, PrivateFlags::PROPAGATED_ONE_REDRAW, false);

        if !in_clone_paint && self.cull_actor(id, ctx) == Some(CullResult::Out) {
            tracing::trace!(actor = %id, "culled");
            return;
        }

        self.set_private(id, PrivateFlags::IN_PAINT, true);
        node.push_layer(PaintLayer::Actor(id));
        let mut depth = 1;
        if !in_clone_paint {
            let transform = self.local_transform(id);
            node.push_layer(PaintLayer::Transform(transform));
            depth += 1;
        }
        if let Some(clip) = self.paint_clip(id) {
            node.push_layer(PaintLayer::Clip(clip));
            depth += 1;
        }

        self.paint_with_effects(id, ctx, node);

        if self.debug.paint_volumes
            && let Some(volume) = self.paint_volume(id)
        {
            outline(node, volume.bounding_box());
        }

        for _ in 0..depth {
            node.pop_layer();
        }

        let n = &mut self.nodes[i];
        n.private.remove(PrivateFlags::IN_PAINT | PrivateFlags::IS_DIRTY);
        n.effect_to_redraw = None;
    }

    fn paint_clip(&self, id: ActorId) -> Option<Rect> {
        let n = &self.nodes[id.idx as usize];
        match n.clip {
            Some(clip) => Some(clip),
            None if n.clip_to_allocation => Some(Rect::from_origin_size(Point::ZERO, n.allocation.size())),
            None => None,
        }
    }

    fn paint_with_effects(&mut self, id: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
        let i = id.idx as usize;
        let class = Rc::clone(&self.nodes[i].class);
        let effects = self.nodes[i].effects.enabled();
        if effects.is_empty() {
            class.paint(self, id, ctx, node);
            return;
        }

        let dirty = self.nodes[i].private.contains(PrivateFlags::IS_DIRTY);
        let target = self.nodes[i].effect_to_redraw.clone();
        // Effects before the one that queued the redraw can reuse their
        // cached output.
        let mut reached = target.is_none();
        let mut ran = 0;
        let mut proceed = true;
        for (k, entry) in effects.iter().enumerate() {
            if !reached && target.as_deref() == Some(entry.name()) {
                reached = true;
            }
            let flags = if dirty && reached {
                EffectPaintFlags::ACTOR_DIRTY
            } else {
                EffectPaintFlags::empty()
            };
            self.nodes[i].current_effect = Some(k);
            if !entry.object().pre_paint(id, node, flags) {
                proceed = false;
                break;
            }
            ran = k + 1;
        }
        self.nodes[i].current_effect = None;

        if proceed {
            class.paint(self, id, ctx, node);
        }

        for k in (0..ran).rev() {
            self.nodes[i].current_effect = Some(k);
            effects[k].object().post_paint(id, node);
        }
        self.nodes[i].current_effect = None;
    }

    /// Tests the actor's visible paint volume against the clip frusta.
    ///
    /// `None` when no test was possible: culling is disabled, the context
    /// paints off stage or has no frusta, or the volume is unknown or
    /// stale. `Some(CullResult::Out)` means the actor can be skipped.
    pub fn cull_actor(&mut self, id: ActorId, ctx: &PaintContext) -> Option<CullResult> {
        self.validate(id);
        if self.debug.disable_culling || ctx.is_off_stage() || ctx.clip_frusta().is_empty() {
            return None;
        }
        let n = &self.nodes[id.idx as usize];
        if n.unmapped_paint_branch_counter > 0 || n.private.contains(PrivateFlags::NEEDS_VISIBLE_PV_UPDATE) {
            return None;
        }
        let mut volume = n.visible_paint_volume?;
        let projection = self
            .stage_host(id)
            .map_or(Transform3d::IDENTITY, |host| host.projection());
        volume.transform(&projection);

        let result = if ctx
            .clip_frusta()
            .iter()
            .any(|frustum| volume.cull(frustum) == CullResult::In)
        {
            CullResult::In
        } else {
            CullResult::Out
        };
        self.tracer.cull(&CullEvent {
            frame_index: self.frame_index,
            actor: id.idx,
            result,
        });
        Some(result)
    }

    // -- Pick --

    /// Runs a pick pass over `stage`.
    pub fn pick_stage(&mut self, stage: ActorId, ctx: &mut PickContext) {
        self.validate(stage);
        let frame_index = self.frame_index;
        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Pick,
        });
        self.pick(stage, ctx);
        self.tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Pick,
        });
    }

    /// Picks the actor and its subtree. Points outside the actor's clip
    /// never reach its children.
    pub fn pick(&mut self, id: ActorId, ctx: &mut PickContext) {
        self.validate(id);
        let i = id.idx as usize;
        {
            let n = &self.nodes[i];
            if n.in_destruction() || !n.is_mapped() {
                return;
            }
        }
        if let Some(clip) = self.paint_clip(id) {
            let point = ctx.point();
            let inside = self
                .transform_stage_point(id, point.x, point.y)
                .is_some_and(|local| contains_inclusive(clip, local));
            if !inside {
                return;
            }
        }

        self.set_private(id, PrivateFlags::IN_PICK, true);
        let class = Rc::clone(&self.nodes[i].class);
        class.pick(self, id, ctx);
        if self.is_alive(id) {
            self.set_private(id, PrivateFlags::IN_PICK, false);
        }
    }

    /// The topmost reactive actor under `point` (stage coordinates).
    pub fn actor_at_pos(&mut self, stage: ActorId, point: Point) -> Option<ActorId> {
        let mut ctx = PickContext::new(point);
        self.pick_stage(stage, &mut ctx);
        ctx.topmost()
    }

    // -- Opacity --

    /// Sets the opacity, 0 (transparent) to 255 (opaque).
    pub fn set_opacity(&mut self, id: ActorId, opacity: u8) {
        self.animate_property(id, Property::Opacity, Value::Uint8(opacity));
    }

    /// The actor's own opacity.
    #[must_use]
    pub fn opacity(&self, id: ActorId) -> u8 {
        self.node(id).opacity
    }

    /// The opacity the actor is painted with: its own multiplied by its
    /// ancestors', or the override when one is set.
    #[must_use]
    pub fn paint_opacity(&self, id: ActorId) -> u8 {
        self.validate(id);
        let mut result = 255_u32;
        let mut idx = id.idx;
        while idx != INVALID {
            let n = &self.nodes[idx as usize];
            if let Some(forced) = n.opacity_override {
                result = result * u32::from(forced) / 255;
                break;
            }
            result = result * u32::from(n.opacity) / 255;
            if n.is_toplevel() {
                break;
            }
            idx = n.parent;
        }
        u8::try_from(result).unwrap_or(u8::MAX)
    }

    /// Forces the paint opacity of the actor, ignoring its ancestors. Used
    /// when the actor is painted somewhere its ancestors' opacity does not
    /// apply.
    pub fn set_opacity_override(&mut self, id: ActorId, opacity: Option<u8>) {
        self.validate(id);
        if self.node(id).opacity_override == opacity {
            return;
        }
        self.node_mut(id).opacity_override = opacity;
        self.queue_redraw(id);
    }

    /// The forced paint opacity, if any.
    #[must_use]
    pub fn opacity_override(&self, id: ActorId) -> Option<u8> {
        self.node(id).opacity_override
    }

    pub(crate) fn set_opacity_internal(&mut self, id: ActorId, opacity: u8) {
        if self.node(id).opacity == opacity {
            return;
        }
        self.node_mut(id).opacity = opacity;
        self.queue_redraw(id);
        self.notify(id, Property::Opacity);
    }

    /// Whether painting the actor at partial opacity needs it to be
    /// flattened first.
    #[must_use]
    pub fn has_overlaps(&self, id: ActorId) -> bool {
        self.node(id).class.has_overlaps(self, id)
    }

    // -- Background --

    /// Sets the color painted behind the content, or removes it.
    pub fn set_background_color(&mut self, id: ActorId, color: Option<Color>) {
        match color {
            Some(color) => self.animate_property(id, Property::BackgroundColor, Value::Color(color)),
            None => {
                self.validate(id);
                if self.node_mut(id).background_color.take().is_some() {
                    self.queue_redraw(id);
                    self.notify(id, Property::BackgroundColorSet);
                }
            }
        }
    }

    /// The background color, if set.
    #[must_use]
    pub fn background_color(&self, id: ActorId) -> Option<Color> {
        self.node(id).background_color
    }

    pub(crate) fn set_background_color_internal(&mut self, id: ActorId, color: Color) {
        let old = self.node(id).background_color;
        if old == Some(color) {
            return;
        }
        self.node_mut(id).background_color = Some(color);
        self.queue_redraw(id);
        self.notify(id, Property::BackgroundColor);
        if old.is_none() {
            self.notify(id, Property::BackgroundColorSet);
        }
    }

    // -- Content --

    /// Replaces the content delegate.
    pub fn set_content(&mut self, id: ActorId, content: Option<Rc<dyn Content>>) {
        self.validate(id);
        if let Some(old) = self.node_mut(id).content.take() {
            old.detached(id);
        }
        if let Some(content) = &content {
            content.attached(id);
        }
        self.node_mut(id).content = content;
        self.content_changed(id);
    }

    /// The content delegate, if any.
    #[must_use]
    pub fn content(&self, id: ActorId) -> Option<Rc<dyn Content>> {
        self.node(id).content.clone()
    }

    /// Tells the store that the content of `id` changed.
    pub fn invalidate_content(&mut self, id: ActorId) {
        self.validate(id);
        self.content_changed(id);
    }

    fn content_changed(&mut self, id: ActorId) {
        self.set_private(id, PrivateFlags::CONTENT_BOX_VALID, false);
        if self.node(id).request_mode == RequestMode::ContentSize {
            self.queue_relayout(id);
        }
        self.queue_redraw(id);
        self.notify(id, Property::ContentBox);
    }

    /// Where the content is painted, in the actor's coordinates.
    pub fn content_box(&mut self, id: ActorId) -> Rect {
        self.validate(id);
        let content_box = self.compute_content_box(id);
        let n = &mut self.nodes[id.idx as usize];
        n.content_box = content_box;
        n.private.insert(PrivateFlags::CONTENT_BOX_VALID);
        content_box
    }

    /// The cached content box if valid, otherwise a fresh one.
    pub(crate) fn compute_content_box(&self, id: ActorId) -> Rect {
        let n = self.node(id);
        if n.private.contains(PrivateFlags::CONTENT_BOX_VALID) {
            return n.content_box;
        }
        let size = n.allocation.size();
        let preferred = n
            .content
            .as_ref()
            .and_then(|content| content.preferred_size());
        match preferred {
            Some(content_size) => content_box(n.content_gravity, size, content_size),
            None => Rect::from_origin_size(Point::ZERO, size),
        }
    }

    pub(crate) fn set_content_box_internal(&mut self, id: ActorId, content_box: Rect) {
        let n = self.node_mut(id);
        if n.private.contains(PrivateFlags::CONTENT_BOX_VALID) && n.content_box == content_box {
            return;
        }
        n.content_box = content_box;
        n.private.insert(PrivateFlags::CONTENT_BOX_VALID);
        self.queue_redraw(id);
        self.notify(id, Property::ContentBox);
    }

    /// Sets how the content is placed inside the allocation. The content
    /// box moves to its new place through a transition when an easing
    /// state is active.
    pub fn set_content_gravity(&mut self, id: ActorId, gravity: ContentGravity) {
        self.validate(id);
        if self.node(id).content_gravity == gravity {
            return;
        }
        let old_box = self.content_box(id);
        self.node_mut(id).content_gravity = gravity;
        self.set_private(id, PrivateFlags::CONTENT_BOX_VALID, false);
        let new_box = self.compute_content_box(id);
        // Animate from where the content is now.
        self.node_mut(id).content_box = old_box;
        self.set_private(id, PrivateFlags::CONTENT_BOX_VALID, true);
        self.notify(id, Property::ContentGravity);
        self.animate_property(id, Property::ContentBox, Value::Rect(new_box));
    }

    /// How the content is placed inside the allocation.
    #[must_use]
    pub fn content_gravity(&self, id: ActorId) -> ContentGravity {
        self.node(id).content_gravity
    }

    /// Sets the filters used when the content is scaled down and up.
    pub fn set_content_scaling_filters(&mut self, id: ActorId, min_filter: ScalingFilter, mag_filter: ScalingFilter) {
        self.validate(id);
        let mut s = self.freeze_notify();
        let mut changed = false;
        if s.node(id).min_filter != min_filter {
            s.node_mut(id).min_filter = min_filter;
            s.notify(id, Property::MinificationFilter);
            changed = true;
        }
        if s.node(id).mag_filter != mag_filter {
            s.node_mut(id).mag_filter = mag_filter;
            s.notify(id, Property::MagnificationFilter);
            changed = true;
        }
        if changed {
            s.queue_redraw(id);
        }
    }

    /// The minification and magnification filters.
    #[must_use]
    pub fn content_scaling_filters(&self, id: ActorId) -> (ScalingFilter, ScalingFilter) {
        let n = self.node(id);
        (n.min_filter, n.mag_filter)
    }

    /// Sets on which axes the content is tiled.
    pub fn set_content_repeat(&mut self, id: ActorId, repeat: ContentRepeat) {
        self.validate(id);
        if self.node(id).content_repeat == repeat {
            return;
        }
        self.node_mut(id).content_repeat = repeat;
        self.queue_redraw(id);
        self.notify(id, Property::ContentRepeat);
    }

    /// On which axes the content is tiled.
    #[must_use]
    pub fn content_repeat(&self, id: ActorId) -> ContentRepeat {
        self.node(id).content_repeat
    }
}

fn outline(node: &mut dyn PaintNode, r: Rect) {
    let w = r.width();
    let h = r.height();
    for edge in [
        Rect::from_origin_size((r.x0, r.y0), Size::new(w, 1.0)),
        Rect::from_origin_size((r.x0, r.y1 - 1.0), Size::new(w, 1.0)),
        Rect::from_origin_size((r.x0, r.y0), Size::new(1.0, h)),
        Rect::from_origin_size((r.x1 - 1.0, r.y0), Size::new(1.0, h)),
    ] {
        node.add_rectangle(edge, PAINT_VOLUME_OUTLINE);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::config::DebugConfig;
    use crate::testing::{PaintOp, RecordingPaintNode, RecordingStage};

    fn mapped_stage(store: &mut ActorStore) -> ActorId {
        let stage = store.create_stage(Rc::new(RecordingStage::new(100.0, 100.0)));
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
    fn paints_children_in_order() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = placed(&mut store, stage, Rect::new(20.0, 0.0, 30.0, 10.0));
        store.update_stage(stage);

        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut PaintContext::new(), &mut node);
        assert_eq!(node.painted_actors(), vec![stage, a, b]);
        assert!(node.is_balanced());
        assert!(node.submitted());
    }

    #[test]
    fn hidden_actors_are_not_painted() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.update_stage(stage);
        store.hide(a);

        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut PaintContext::new(), &mut node);
        assert_eq!(node.painted_actors(), vec![stage]);
    }

    #[test]
    fn actor_outside_the_clip_is_culled() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let near = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        let far = placed(&mut store, stage, Rect::new(80.0, 80.0, 90.0, 90.0));
        store.update_stage(stage);

        let mut ctx = PaintContext::with_redraw_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(store.cull_actor(far, &ctx), Some(CullResult::Out));
        assert_eq!(store.cull_actor(near, &ctx), Some(CullResult::In));

        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut ctx, &mut node);
        assert!(node.painted_actors().contains(&near));
        assert!(!node.painted_actors().contains(&far));
    }

    #[test]
    fn culling_can_be_disabled() {
        let mut store = ActorStore::with_debug_config(DebugConfig {
            disable_culling: true,
            ..DebugConfig::default()
        });
        let stage = mapped_stage(&mut store);
        let far = placed(&mut store, stage, Rect::new(80.0, 80.0, 90.0, 90.0));
        store.update_stage(stage);

        let ctx = PaintContext::with_redraw_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(store.cull_actor(far, &ctx), None);
    }

    #[test]
    fn background_and_clip_are_emitted() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 30.0, 30.0));
        store.set_background_color(a, Some(Color::rgba(255, 0, 0, 255)));
        store.set_opacity(a, 128);
        store.set_clip_to_allocation(a, true);
        store.update_stage(stage);

        let mut node = RecordingPaintNode::default();
        store.paint(a, &mut PaintContext::new(), &mut node);
        assert!(node.ops().contains(&PaintOp::Push(PaintLayer::Clip(Rect::new(0.0, 0.0, 20.0, 20.0)))));
        assert!(node.ops().contains(&PaintOp::Rectangle(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            Color::rgba(255, 0, 0, 128)
        )));
    }

    #[test]
    fn paint_opacity_multiplies_ancestors() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(a, b);
        store.set_opacity(a, 128);
        store.set_opacity(b, 128);
        assert_eq!(store.paint_opacity(b), 64);
        store.set_opacity_override(b, Some(200));
        assert_eq!(store.paint_opacity(b), 200);
    }

    #[test]
    fn effects_wrap_the_paint() {
        struct Counting {
            pre: Cell<u32>,
            post: Cell<u32>,
            dirty: Cell<bool>,
        }
        impl crate::property::Animatable for Counting {}
        impl crate::meta::Effect for Counting {
            fn pre_paint(&self, _actor: ActorId, _node: &mut dyn PaintNode, flags: EffectPaintFlags) -> bool {
                self.pre.set(self.pre.get() + 1);
                self.dirty.set(flags.contains(EffectPaintFlags::ACTOR_DIRTY));
                true
            }
            fn post_paint(&self, _actor: ActorId, _node: &mut dyn PaintNode) {
                self.post.set(self.post.get() + 1);
            }
        }

        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        let effect = Rc::new(Counting {
            pre: Cell::new(0),
            post: Cell::new(0),
            dirty: Cell::new(false),
        });
        store.add_effect(a, "count", effect.clone());
        store.update_stage(stage);

        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut PaintContext::new(), &mut node);
        assert_eq!((effect.pre.get(), effect.post.get()), (1, 1));
        assert!(effect.dirty.get());

        // Nothing changed since the last paint.
        store.paint_stage(stage, &mut PaintContext::new(), &mut node);
        assert!(!effect.dirty.get());
    }

    #[test]
    fn pick_finds_the_topmost_reactive_actor() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let below = placed(&mut store, stage, Rect::new(0.0, 0.0, 50.0, 50.0));
        let above = placed(&mut store, stage, Rect::new(25.0, 25.0, 75.0, 75.0));
        store.set_reactive(below, true);
        store.set_reactive(above, true);
        store.update_stage(stage);

        assert_eq!(store.actor_at_pos(stage, Point::new(30.0, 30.0)), Some(above));
        assert_eq!(store.actor_at_pos(stage, Point::new(10.0, 10.0)), Some(below));
        assert_eq!(store.actor_at_pos(stage, Point::new(90.0, 90.0)), Some(stage));

        store.set_reactive(above, false);
        assert_eq!(store.actor_at_pos(stage, Point::new(30.0, 30.0)), Some(below));
    }

    #[test]
    fn content_gravity_places_the_content() {
        struct Square;
        impl crate::property::Animatable for Square {}
        impl Content for Square {
            fn preferred_size(&self) -> Option<Size> {
                Some(Size::new(10.0, 10.0))
            }
            fn paint_content(&self, _actor: ActorId, content_box: Rect, _opacity: u8, node: &mut dyn PaintNode) {
                node.add_rectangle(content_box, Color::WHITE);
            }
        }

        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.allocate(a, Rect::new(0.0, 0.0, 30.0, 30.0));
        store.set_content(a, Some(Rc::new(Square)));
        assert_eq!(store.content_box(a), Rect::new(0.0, 0.0, 30.0, 30.0));
        store.set_content_gravity(a, ContentGravity::Center);
        assert_eq!(store.content_box(a), Rect::new(10.0, 10.0, 20.0, 20.0));
    }
}
