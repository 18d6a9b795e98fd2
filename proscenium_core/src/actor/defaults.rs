// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default actor behavior.
//!
//! Each function here is what the matching [`ActorClass`] method does when
//! a class does not override it. Overrides call them directly to extend the
//! default rather than replace it.
//!
//! [`ActorClass`]: crate::class::ActorClass

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::geometry::{Color, Point3};
use crate::layout_manager::{FixedLayout, LayoutManager};
use crate::paint::{PaintContext, PaintNode, PickContext};
use crate::paint_volume::PaintVolume;
use crate::property::Property;
use crate::transform::Transform3d;

use super::flags::{ActorFlags, PrivateFlags};
use super::id::INVALID;
use super::{ActorId, ActorStore};

fn layout_manager_of(store: &ActorStore, actor: ActorId) -> Rc<dyn LayoutManager> {
    store
        .node(actor)
        .layout_manager
        .clone()
        .unwrap_or_else(|| Rc::new(FixedLayout))
}

/// Asks the layout manager when the actor has children; an empty actor
/// has no preferred width.
pub fn preferred_width(store: &mut ActorStore, actor: ActorId, for_height: f64) -> (f64, f64) {
    if store.node(actor).n_children == 0 {
        return (0.0, 0.0);
    }
    let manager = layout_manager_of(store, actor);
    manager.preferred_width(store, actor, for_height)
}

/// Asks the layout manager when the actor has children; an empty actor
/// has no preferred height.
pub fn preferred_height(store: &mut ActorStore, actor: ActorId, for_width: f64) -> (f64, f64) {
    if store.node(actor).n_children == 0 {
        return (0.0, 0.0);
    }
    let manager = layout_manager_of(store, actor);
    manager.preferred_height(store, actor, for_width)
}

/// Stores the allocation, then lets the layout manager place the children
/// inside the origin-zeroed box.
pub fn allocate(store: &mut ActorStore, actor: ActorId, allocation: Rect) {
    store.set_allocation_internal(actor, allocation);
    if store.node(actor).n_children == 0 {
        return;
    }
    let manager = layout_manager_of(store, actor);
    let local = Rect::from_origin_size(Point::ZERO, allocation.size());
    manager.allocate(store, actor, local);
}

/// Multiplies the local transform of `actor` onto `matrix`: the parent's
/// child transform, then the allocation origin and pivot, then either the
/// override matrix or translation, scale and rotation, and finally the
/// pivot rolled back.
pub fn apply_transform(store: &ActorStore, actor: ActorId, matrix: &mut Transform3d) {
    let node = store.node(actor);
    let info = node.transform_info();
    let alloc = node.allocation;

    let pivot = Point3::new(
        info.pivot.x * alloc.width(),
        info.pivot.y * alloc.height(),
        info.pivot_z,
    );

    if node.parent != INVALID {
        let parent_info = store.nodes[node.parent as usize].transform_info();
        if parent_info.child_transform_set {
            *matrix = *matrix * parent_info.child_transform;
        }
    }

    if info.transform_set {
        *matrix = *matrix
            * Transform3d::from_translation(alloc.x0 + pivot.x, alloc.y0 + pivot.y, pivot.z)
            * info.transform;
    } else {
        *matrix = *matrix
            * Transform3d::from_translation(
                alloc.x0 + pivot.x + info.translation.x,
                alloc.y0 + pivot.y + info.translation.y,
                info.z_position + pivot.z + info.translation.z,
            )
            * Transform3d::from_scale(info.scale.x, info.scale.y, info.scale.z)
            * Transform3d::from_rotation_z(info.rotation.z.to_radians())
            * Transform3d::from_rotation_y(info.rotation.y.to_radians())
            * Transform3d::from_rotation_x(info.rotation.x.to_radians());
    }

    *matrix = *matrix * Transform3d::from_translation(-pivot.x, -pivot.y, -pivot.z);
}

/// The clip when one is set. Otherwise the allocation, grown to cover
/// every mapped child unless the actor clips to its allocation.
///
/// `None` if a mapped child cannot report a volume.
pub fn paint_volume(store: &mut ActorStore, actor: ActorId) -> Option<PaintVolume> {
    let node = store.node(actor);
    if let Some(clip) = node.clip {
        return Some(PaintVolume::from_rect(clip));
    }

    let size = node.allocation.size();
    let clip_to_allocation = node.clip_to_allocation;
    let mut volume = PaintVolume::new();
    volume.set_width(size.width);
    volume.set_height(size.height);
    if clip_to_allocation {
        return Some(volume);
    }

    let children: Vec<ActorId> = store.children(actor).collect();
    for child in children {
        if !store.nodes[child.idx as usize].is_mapped() {
            continue;
        }
        let Some(child_volume) = store.transformed_paint_volume(child, Some(actor)) else {
            tracing::trace!(actor = %actor, child = %child, "child has no paint volume");
            return None;
        };
        volume.union(&child_volume);
    }
    Some(volume)
}

/// Paints the actor's own node, then each child in order.
pub fn paint(store: &mut ActorStore, actor: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
    let class = store.class(actor);
    class.paint_node(store, actor, node);
    let children: Vec<ActorId> = store.children(actor).collect();
    for child in children {
        store.paint(child, ctx, node);
    }
}

/// Fills the allocation with the background color, then paints the
/// content, both at the actor's paint opacity.
pub fn paint_node(store: &ActorStore, actor: ActorId, node: &mut dyn PaintNode) {
    let opacity = store.paint_opacity(actor);
    let n = store.node(actor);
    let bounds = Rect::from_origin_size(Point::ZERO, n.allocation.size());

    if let Some(color) = n.background_color {
        let alpha = scale_alpha(color.a, opacity);
        if alpha > 0 {
            node.add_rectangle(bounds, Color { a: alpha, ..color });
        }
    }

    if let Some(content) = &n.content {
        let content_box = store.compute_content_box(actor);
        content.paint_content(actor, content_box, opacity, node);
    }
}

fn scale_alpha(alpha: u8, opacity: u8) -> u8 {
    let scaled = (u32::from(alpha) * u32::from(opacity) + 127) / 255;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

/// Logs a hit when the pick point falls inside the allocation, then picks
/// the children.
pub fn pick(store: &mut ActorStore, actor: ActorId, ctx: &mut PickContext) {
    let reactive = store.nodes[actor.idx as usize]
        .flags
        .contains(ActorFlags::REACTIVE);
    if reactive || !ctx.reactive_only() {
        let point = ctx.point();
        let size = store.node(actor).allocation.size();
        let bounds = Rect::from_origin_size(Point::ZERO, size);
        if let Some(local) = store.transform_stage_point(actor, point.x, point.y)
            && contains_inclusive(bounds, local)
        {
            ctx.log_hit(actor);
        }
    }

    let children: Vec<ActorId> = store.children(actor).collect();
    for child in children {
        store.pick(child, ctx);
    }
}

pub(crate) fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Sets the mapped flag, schedules the stage-relative state to be
/// recomputed and maps every visible child.
pub fn map(store: &mut ActorStore, actor: ActorId) {
    {
        let node = store.node_mut(actor);
        node.flags.insert(ActorFlags::MAPPED);
        node.private.insert(
            PrivateFlags::NEEDS_PAINT_VOLUME_UPDATE
                | PrivateFlags::NEEDS_VISIBLE_PV_UPDATE
                | PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS,
        );
    }
    store.queue_update_finish_layout(actor);
    if let Some(parent) = store.parent(actor) {
        store.queue_update_paint_volume(parent);
    }
    store.notify(actor, Property::Mapped);

    let children: Vec<ActorId> = store.children(actor).collect();
    for child in children {
        store.map_child(child);
    }
}

/// Unmaps every child, clears the mapped flag and asks the parent to
/// repaint the area the actor covered.
pub fn unmap(store: &mut ActorStore, actor: ActorId) {
    let children: Vec<ActorId> = store.children(actor).collect();
    for child in children {
        store.unmap_child(child);
    }

    {
        let node = store.node_mut(actor);
        node.flags.remove(ActorFlags::MAPPED);
        node.visible_paint_volume = None;
        node.last_visible_paint_volume = None;
        node.private.insert(PrivateFlags::NEEDS_VISIBLE_PV_UPDATE);
        node.private.remove(PrivateFlags::PROPAGATED_ONE_REDRAW);
    }

    if let Some(parent) = store.parent(actor) {
        let parent_node = &store.nodes[parent.idx as usize];
        if !parent_node.in_destruction() {
            if parent_node.flags.contains(ActorFlags::NO_LAYOUT) {
                store.queue_redraw(parent);
            } else {
                store.queue_relayout(parent);
            }
        }
        store.queue_update_paint_volume(parent);
    }
    store.notify(actor, Property::Mapped);
}

/// The largest scale among the views the actor overlaps, as reported by
/// the stage host.
pub fn calculate_resource_scale(store: &ActorStore, actor: ActorId) -> Option<f64> {
    let views = store.peek_stage_views(actor);
    if views.is_empty() {
        return None;
    }
    let host = store.stage_host(actor)?;
    views
        .iter()
        .map(|view| host.view_scale(view))
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ActorClass;
    use crate::testing::RecordingStage;

    /// Measures itself as fifty wide at minimum but only ten naturally.
    struct Lopsided;

    impl ActorClass for Lopsided {
        fn preferred_width(&self, _store: &mut ActorStore, _actor: ActorId, _for_height: f64) -> (f64, f64) {
            (50.0, 10.0)
        }
    }

    #[test]
    fn empty_actor_prefers_nothing() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        assert_eq!(preferred_width(&mut store, a, -1.0), (0.0, 0.0));
        assert_eq!(preferred_height(&mut store, a, -1.0), (0.0, 0.0));
    }

    #[test]
    fn children_are_measured_by_fixed_layout() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let child = store.create_actor();
        store.add_child(a, child);
        store.set_position(child, Point::new(10.0, 5.0));
        store.set_size(child, 20.0, 30.0);
        assert_eq!(preferred_width(&mut store, a, -1.0), (30.0, 30.0));
        assert_eq!(preferred_height(&mut store, a, -1.0), (35.0, 35.0));
    }

    #[test]
    fn natural_is_raised_to_minimum() {
        let mut store = ActorStore::new();
        let a = store.create_actor_with_class(Rc::new(Lopsided));
        assert_eq!(store.preferred_width(a, -1.0), (50.0, 50.0));
        assert_eq!(store.preferred_width(a, 100.0), (50.0, 50.0));
    }

    #[test]
    fn allocate_places_children_in_local_space() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let child = store.create_actor();
        store.add_child(a, child);
        store.set_position(child, Point::new(3.0, 4.0));
        store.set_size(child, 5.0, 6.0);
        store.allocate(a, Rect::new(100.0, 100.0, 200.0, 200.0));
        assert_eq!(store.allocation(child), Rect::new(3.0, 4.0, 8.0, 10.0));
    }

    #[test]
    fn background_is_scaled_by_paint_opacity() {
        assert_eq!(scale_alpha(255, 255), 255);
        assert_eq!(scale_alpha(255, 0), 0);
        assert_eq!(scale_alpha(200, 128), 100);
    }

    #[test]
    fn resource_scale_is_the_largest_view_scale() {
        let host = Rc::new(RecordingStage::new(200.0, 100.0));
        host.set_views(vec![
            crate::stage::StageView {
                id: 0,
                layout: Rect::new(0.0, 0.0, 100.0, 100.0),
                scale: 1.5,
            },
            crate::stage::StageView {
                id: 1,
                layout: Rect::new(100.0, 0.0, 200.0, 100.0),
                scale: 3.0,
            },
        ]);
        let mut store = ActorStore::new();
        let stage = store.create_stage(host.clone());
        store.show(stage);
        store.set_stage_mapped(stage, true);
        let a = store.create_actor();
        store.add_child(stage, a);
        assert_eq!(calculate_resource_scale(&store, a), None);

        store.set_position(a, Point::new(50.0, 0.0));
        store.set_size(a, 100.0, 10.0);
        store.update_stage(stage);
        assert_eq!(calculate_resource_scale(&store, a), Some(3.0));
    }
}
