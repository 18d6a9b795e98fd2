// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clones: actors that paint another actor's subtree as their own content.
//!
//! A source keeps the list of clones watching it and every actor below the
//! source counts how many clones are watching its branch
//! (`in_cloned_branch`). Redraws queued inside a cloned branch are mirrored
//! to the clones, and an unmapped actor still accepts redraws while one of
//! its clones is mapped.

use std::rc::Rc;

use kurbo::Rect;

use crate::class::ActorClass;
use crate::paint::{PaintContext, PaintNode};
use crate::transform::Transform3d;

use super::flags::PrivateFlags;
use super::id::INVALID;
use super::traverse::TraverseVisit;
use super::{ActorId, ActorStore, defaults};

/// The kind of actors made by [`ActorStore::create_clone`].
///
/// Measures like its source, and paints the source scaled to its own
/// allocation with the source's own transform left out.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloneClass;

impl ActorClass for CloneClass {
    fn type_name(&self) -> &'static str {
        "Clone"
    }

    fn preferred_width(&self, store: &mut ActorStore, actor: ActorId, for_height: f64) -> (f64, f64) {
        match store.clone_source(actor) {
            Some(source) => store.preferred_width(source, for_height),
            None => (0.0, 0.0),
        }
    }

    fn preferred_height(&self, store: &mut ActorStore, actor: ActorId, for_width: f64) -> (f64, f64) {
        match store.clone_source(actor) {
            Some(source) => store.preferred_height(source, for_width),
            None => (0.0, 0.0),
        }
    }

    fn allocate(&self, store: &mut ActorStore, actor: ActorId, allocation: Rect) {
        defaults::allocate(store, actor, allocation);
        // A source outside any container is never allocated by a parent.
        if let Some(source) = store.clone_source(actor)
            && store.parent(source).is_none()
            && !store.has_allocation(source)
        {
            store.allocate_preferred_size(source, 0.0, 0.0);
        }
    }

    fn paint(&self, store: &mut ActorStore, actor: ActorId, ctx: &mut PaintContext, node: &mut dyn PaintNode) {
        self.paint_node(store, actor, node);
        let Some(source) = store.clone_source(actor) else {
            return;
        };
        if store.node(source).private.contains(PrivateFlags::IN_CLONE_PAINT) {
            tracing::warn!(clone = %actor, %source, "clone paints itself through its source");
            return;
        }

        let clone_size = store.allocation(actor).size();
        let source_size = store.allocation(source).size();
        let scale = if source_size.width > 0.0 && source_size.height > 0.0 {
            Some(Transform3d::from_scale(
                clone_size.width / source_size.width,
                clone_size.height / source_size.height,
                1.0,
            ))
        } else {
            None
        };

        let was_mapped = store.is_mapped(source);
        if !was_mapped {
            store.set_enable_paint_unmapped(source, true);
        }
        let old_override = store.opacity_override(source);
        let opacity = store.paint_opacity(actor);
        store.set_opacity_override(source, Some(opacity));
        store.set_private(source, PrivateFlags::IN_CLONE_PAINT, true);

        if let Some(scale) = scale {
            node.push_layer(crate::paint::PaintLayer::Transform(scale));
        }
        store.paint(source, ctx, node);
        if scale.is_some() {
            node.pop_layer();
        }

        if store.is_alive(source) {
            store.set_private(source, PrivateFlags::IN_CLONE_PAINT, false);
            store.set_opacity_override(source, old_override);
            if !was_mapped {
                store.set_enable_paint_unmapped(source, false);
            }
        }
    }

    fn has_overlaps(&self, store: &ActorStore, actor: ActorId) -> bool {
        store
            .clone_source(actor)
            .is_some_and(|source| store.has_overlaps(source))
    }
}

impl ActorStore {
    /// Creates a clone of `source`.
    pub fn create_clone(&mut self, source: ActorId) -> ActorId {
        self.validate(source);
        let clone = self.create_actor_with_class(Rc::new(CloneClass));
        self.set_clone_source(clone, Some(source));
        clone
    }

    /// Points `clone` at another source, or at none.
    pub fn set_clone_source(&mut self, clone: ActorId, source: Option<ActorId>) {
        self.validate(clone);
        let old = self.node(clone).clone_source;
        if old == source {
            return;
        }
        if let Some(source) = source
            && (source == clone || self.contains(source, clone))
        {
            tracing::warn!(%clone, %source, "a clone cannot show one of its ancestors");
            return;
        }
        if let Some(old) = old {
            self.detach_clone(old, clone);
        }
        self.node_mut(clone).clone_source = source;
        if let Some(source) = source {
            self.attach_clone(source, clone);
        }
        self.queue_relayout(clone);
    }

    /// The actor `clone` paints, if any.
    #[must_use]
    pub fn clone_source(&self, clone: ActorId) -> Option<ActorId> {
        self.node(clone).clone_source
    }

    /// Registers `clone` as watching `source`.
    pub fn attach_clone(&mut self, source: ActorId, clone: ActorId) {
        self.validate(source);
        self.validate(clone);
        if self.node(source).clones.contains(&clone) {
            return;
        }
        self.node_mut(source).clones.push(clone);
        self.push_in_cloned_branch(source, 1);
    }

    /// Unregisters `clone` from `source`.
    pub fn detach_clone(&mut self, source: ActorId, clone: ActorId) {
        self.validate(source);
        let clones = &mut self.node_mut(source).clones;
        let Some(pos) = clones.iter().position(|&c| c == clone) else {
            return;
        };
        clones.remove(pos);
        self.pop_in_cloned_branch(source, 1);
    }

    /// The clones watching `source`.
    #[must_use]
    pub fn clones(&self, source: ActorId) -> &[ActorId] {
        &self.node(source).clones
    }

    /// Whether a mapped clone shows the actor, directly or through one of
    /// its ancestors.
    #[must_use]
    pub fn has_mapped_clones(&self, id: ActorId) -> bool {
        self.validate(id);
        if self.nodes[id.idx as usize].in_cloned_branch == 0 {
            return false;
        }
        let mut idx = id.idx;
        while idx != INVALID {
            let n = &self.nodes[idx as usize];
            if n
                .clones
                .iter()
                .any(|clone| self.nodes[clone.idx as usize].is_mapped())
            {
                return true;
            }
            idx = n.parent;
        }
        false
    }

    pub(crate) fn push_in_cloned_branch(&mut self, id: ActorId, count: u32) {
        self.traverse_depth_first(
            id,
            &mut |store, actor, _| {
                store.nodes[actor.idx as usize].in_cloned_branch += count;
                TraverseVisit::Continue
            },
            &mut |_, _, _| TraverseVisit::Continue,
        );
    }

    pub(crate) fn pop_in_cloned_branch(&mut self, id: ActorId, count: u32) {
        self.traverse_depth_first(
            id,
            &mut |store, actor, _| {
                let node = &mut store.nodes[actor.idx as usize];
                node.in_cloned_branch = node.in_cloned_branch.saturating_sub(count);
                TraverseVisit::Continue
            },
            &mut |_, _, _| TraverseVisit::Continue,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;
    use crate::testing::{RecordingPaintNode, RecordingStage};

    fn mapped_stage(store: &mut ActorStore) -> ActorId {
        let stage = store.create_stage(Rc::new(RecordingStage::new(200.0, 200.0)));
        store.show(stage);
        store.set_stage_mapped(stage, true);
        stage
    }

    #[test]
    fn cloned_branch_counts_follow_the_tree() {
        let mut store = ActorStore::new();
        let source = store.create_actor();
        let child = store.create_actor();
        store.add_child(source, child);
        let clone = store.create_clone(source);
        assert_eq!(store.clones(source), &[clone]);
        assert_eq!(store.node(child).in_cloned_branch, 1);

        let late = store.create_actor();
        store.add_child(child, late);
        assert_eq!(store.node(late).in_cloned_branch, 1);
        store.remove_child(child, late);
        assert_eq!(store.node(late).in_cloned_branch, 0);

        store.set_clone_source(clone, None);
        assert_eq!(store.node(child).in_cloned_branch, 0);
        assert!(store.clones(source).is_empty());
    }

    #[test]
    fn unmapped_source_with_mapped_clone_accepts_redraws() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let source = store.create_actor();
        store.add_child(stage, source);
        store.hide(source);
        let clone = store.create_clone(source);
        store.add_child(stage, clone);
        assert!(!store.is_mapped(source));
        assert!(store.has_mapped_clones(source));

        store.update_stage(stage);
        store.queue_redraw(source);
        assert!(store.is_redraw_queued(clone));
    }

    #[test]
    fn clone_paints_its_source_without_the_source_transform() {
        let mut store = ActorStore::new();
        let stage = mapped_stage(&mut store);
        let source = store.create_actor();
        store.set_size(source, 10.0, 10.0);
        store.set_background_color(source, Some(Color::BLACK));
        let clone = store.create_clone(source);
        store.add_child(stage, clone);
        store.set_position(clone, kurbo::Point::new(50.0, 50.0));
        store.update_stage(stage);
        assert_eq!(store.allocation(clone), Rect::new(50.0, 50.0, 60.0, 60.0));

        let mut node = RecordingPaintNode::default();
        store.paint_stage(stage, &mut PaintContext::new(), &mut node);
        assert_eq!(node.painted_actors(), vec![stage, clone, source]);
        assert!(node.is_balanced());
        assert!(!store.is_mapped(source));
    }

    #[test]
    fn destroying_the_source_releases_clones() {
        let mut store = ActorStore::new();
        let source = store.create_actor();
        let clone = store.create_clone(source);
        store.destroy(source);
        assert_eq!(store.clone_source(clone), None);
    }
}
