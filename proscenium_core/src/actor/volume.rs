// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint volumes and clipping.
//!
//! The local paint volume is cached until the allocation, clip, children or
//! effects change. Invalidation walks up the tree because a parent's
//! default volume is the union of its children's.

use std::rc::Rc;

use kurbo::Rect;

use crate::paint_volume::PaintVolume;
use crate::property::{Property, Value};

use super::flags::PrivateFlags;
use super::id::INVALID;
use super::{ActorId, ActorStore};

impl ActorStore {
    /// The volume the actor may paint into, in its own coordinates.
    ///
    /// `None` when it cannot be known: the actor is not mapped, has no
    /// valid allocation, or some part of it (a child, an effect) declined to
    /// report a volume.
    pub fn paint_volume(&mut self, id: ActorId) -> Option<PaintVolume> {
        self.validate(id);
        let i = id.idx as usize;
        if !self.nodes[i].is_mapped() && !self.has_mapped_clones(id) {
            return None;
        }
        if self.nodes[i].needs_allocation() {
            tracing::trace!(actor = %id, "no paint volume while an allocation is pending");
            return None;
        }

        let in_effect = self.nodes[i].current_effect.is_some();
        if !in_effect && !self.nodes[i].private.contains(PrivateFlags::NEEDS_PAINT_VOLUME_UPDATE) {
            return self.nodes[i].paint_volume;
        }

        let volume = self.compute_paint_volume(id);
        if !in_effect {
            let node = &mut self.nodes[i];
            node.paint_volume = volume;
            node.private.remove(PrivateFlags::NEEDS_PAINT_VOLUME_UPDATE);
        }
        volume
    }

    fn compute_paint_volume(&mut self, id: ActorId) -> Option<PaintVolume> {
        let i = id.idx as usize;
        let class = Rc::clone(&self.nodes[i].class);
        let mut volume = class.paint_volume(self, id)?;

        // While an effect paints, only the effects before it apply.
        let effects = self.nodes[i].effects.enabled();
        let limit = self.nodes[i].current_effect.unwrap_or(effects.len());
        for entry in effects.iter().take(limit) {
            if !entry.object().modify_paint_volume(id, &mut volume) {
                return None;
            }
        }
        Some(volume)
    }

    /// The paint volume in `ancestor`'s coordinates, or stage coordinates
    /// when `ancestor` is `None`. The result is axis aligned in the target
    /// space.
    pub fn transformed_paint_volume(&mut self, id: ActorId, ancestor: Option<ActorId>) -> Option<PaintVolume> {
        let mut volume = self.paint_volume(id)?;
        let m = self.relative_transform(id, ancestor);
        volume.transform(&m);
        volume.axis_align();
        Some(volume)
    }

    /// The last stage-relative paint volume computed by
    /// [`update_stage`](Self::update_stage).
    #[must_use]
    pub fn visible_paint_volume(&self, id: ActorId) -> Option<PaintVolume> {
        self.node(id).visible_paint_volume
    }

    /// Marks the local paint volume of the actor and its ancestors stale.
    pub(crate) fn queue_update_paint_volume(&mut self, id: ActorId) {
        let stale = PrivateFlags::NEEDS_PAINT_VOLUME_UPDATE
            | PrivateFlags::NEEDS_VISIBLE_PV_UPDATE
            | PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS;
        let mut idx = id.idx;
        while idx != INVALID {
            let node = &mut self.nodes[idx as usize];
            if node.private.contains(PrivateFlags::NEEDS_PAINT_VOLUME_UPDATE) {
                break;
            }
            node.private.insert(stale);
            let parent = node.parent;
            let here = self.id_at(idx);
            self.queue_update_finish_layout(here);
            idx = parent;
        }
    }

    // -- Clip --

    /// Restricts painting to `clip`, in the actor's coordinates.
    pub fn set_clip(&mut self, id: ActorId, clip: Rect) {
        self.animate_property(id, Property::ClipRect, Value::Rect(clip));
    }

    /// Removes the clip.
    pub fn remove_clip(&mut self, id: ActorId) {
        self.validate(id);
        if self.node(id).clip.is_none() {
            return;
        }
        self.node_mut(id).clip = None;
        self.clip_changed(id);
        self.notify(id, Property::HasClip);
    }

    /// Whether a clip rectangle is set.
    #[must_use]
    pub fn has_clip(&self, id: ActorId) -> bool {
        self.node(id).clip.is_some()
    }

    /// The clip rectangle, if set.
    #[must_use]
    pub fn clip(&self, id: ActorId) -> Option<Rect> {
        self.node(id).clip
    }

    /// Clips painting to the allocation.
    pub fn set_clip_to_allocation(&mut self, id: ActorId, clip: bool) {
        self.validate(id);
        if self.node(id).clip_to_allocation == clip {
            return;
        }
        self.node_mut(id).clip_to_allocation = clip;
        self.clip_changed(id);
        self.notify(id, Property::ClipToAllocation);
    }

    /// Whether painting is clipped to the allocation.
    #[must_use]
    pub fn clip_to_allocation(&self, id: ActorId) -> bool {
        self.node(id).clip_to_allocation
    }

    pub(crate) fn set_clip_internal(&mut self, id: ActorId, clip: Rect) {
        let had_clip = self.node(id).clip.is_some();
        self.node_mut(id).clip = Some(clip);
        self.clip_changed(id);
        self.notify(id, Property::ClipRect);
        if !had_clip {
            self.notify(id, Property::HasClip);
        }
    }

    fn clip_changed(&mut self, id: ActorId) {
        self.queue_update_paint_volume(id);
        self.queue_redraw(id);
    }
}
