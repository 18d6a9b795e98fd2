// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-actor records.
//!
//! Every slot in the store holds one [`ActorNode`]. Rarely used state lives
//! in boxed side tables ([`LayoutInfo`], [`TransformInfo`],
//! [`AnimationInfo`]) that are only allocated on first write; readers fall
//! back to the `DEFAULT` constants.

use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use crate::animation::{EasingState, PropertyTransition};
use crate::class::ActorClass;
use crate::content::Content;
use crate::geometry::{ActorAlign, Color, ContentGravity, ContentRepeat, Margin, Point3, RequestMode, ScalingFilter};
use crate::layout_manager::LayoutManager;
use crate::meta::{Action, Constraint, Effect, MetaGroup};
use crate::paint_volume::PaintVolume;
use crate::stage::{StageHost, StageView};
use crate::transform::Transform3d;

use super::flags::{ActorFlags, PrivateFlags};
use super::id::{ActorId, INVALID};

/// Number of cached answers per axis.
pub(crate) const N_CACHED_SIZE_REQUESTS: usize = 3;

/// One cached preferred-size answer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct SizeRequest {
    pub(crate) for_size: f64,
    pub(crate) min_size: f64,
    pub(crate) natural_size: f64,
    /// Zero marks an empty slot.
    pub(crate) age: u32,
}

/// Layout properties that most actors leave at their defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LayoutInfo {
    pub(crate) fixed_pos: Point,
    pub(crate) fixed_position_set: bool,
    pub(crate) margin: Margin,
    pub(crate) x_align: ActorAlign,
    pub(crate) y_align: ActorAlign,
    pub(crate) x_expand: bool,
    pub(crate) y_expand: bool,
    pub(crate) minimum: Size,
    pub(crate) natural: Size,
    pub(crate) min_width_set: bool,
    pub(crate) min_height_set: bool,
    pub(crate) natural_width_set: bool,
    pub(crate) natural_height_set: bool,
}

impl LayoutInfo {
    pub(crate) const DEFAULT: Self = Self {
        fixed_pos: Point::ZERO,
        fixed_position_set: false,
        margin: Margin::ZERO,
        x_align: ActorAlign::Fill,
        y_align: ActorAlign::Fill,
        x_expand: false,
        y_expand: false,
        minimum: Size::ZERO,
        natural: Size::ZERO,
        min_width_set: false,
        min_height_set: false,
        natural_width_set: false,
        natural_height_set: false,
    };
}

/// Transformation properties that most actors leave at their defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TransformInfo {
    /// Rotation angles around X, Y and Z, in degrees.
    pub(crate) rotation: Point3,
    pub(crate) scale: Point3,
    pub(crate) translation: Point3,
    pub(crate) z_position: f64,
    /// Normalized against the allocation size.
    pub(crate) pivot: Point,
    pub(crate) pivot_z: f64,
    pub(crate) transform: Transform3d,
    pub(crate) transform_set: bool,
    pub(crate) child_transform: Transform3d,
    pub(crate) child_transform_set: bool,
}

impl TransformInfo {
    pub(crate) const DEFAULT: Self = Self {
        rotation: Point3::ZERO,
        scale: Point3::new(1.0, 1.0, 1.0),
        translation: Point3::ZERO,
        z_position: 0.0,
        pivot: Point::ZERO,
        pivot_z: 0.0,
        transform: Transform3d::IDENTITY,
        transform_set: false,
        child_transform: Transform3d::IDENTITY,
        child_transform_set: false,
    };
}

/// A transition owned by an actor.
#[derive(Clone, Debug)]
pub(crate) struct TransitionClosure {
    pub(crate) transition: PropertyTransition,
    /// Created by a property write rather than by `add_transition`.
    pub(crate) is_implicit: bool,
}

/// Easing-state stack and running transitions.
#[derive(Clone, Debug, Default)]
pub(crate) struct AnimationInfo {
    pub(crate) states: Vec<EasingState>,
    pub(crate) transitions: BTreeMap<String, TransitionClosure>,
}

impl AnimationInfo {
    pub(crate) fn current_state(&self) -> Option<&EasingState> {
        self.states.last()
    }
}

/// Everything the store knows about one actor.
pub(crate) struct ActorNode {
    // -- Topology --
    pub(crate) parent: u32,
    pub(crate) first_child: u32,
    pub(crate) last_child: u32,
    pub(crate) prev_sibling: u32,
    pub(crate) next_sibling: u32,
    pub(crate) n_children: u32,
    /// Bumped on every structural change to the child list.
    pub(crate) age: u64,
    pub(crate) alive: bool,

    // -- Kind and state --
    pub(crate) class: Rc<dyn ActorClass>,
    pub(crate) name: Option<String>,
    pub(crate) flags: ActorFlags,
    pub(crate) private: PrivateFlags,
    pub(crate) host: Option<Rc<dyn StageHost>>,

    // -- Geometry --
    pub(crate) allocation: Rect,
    pub(crate) request_mode: RequestMode,
    pub(crate) width_requests: [SizeRequest; N_CACHED_SIZE_REQUESTS],
    pub(crate) height_requests: [SizeRequest; N_CACHED_SIZE_REQUESTS],
    pub(crate) cached_width_age: u32,
    pub(crate) cached_height_age: u32,
    pub(crate) clip: Option<Rect>,
    pub(crate) clip_to_allocation: bool,
    pub(crate) layout_info: Option<Box<LayoutInfo>>,
    pub(crate) transform_info: Option<Box<TransformInfo>>,
    /// Cached local matrix, valid with `TRANSFORM_VALID`.
    pub(crate) transform: Transform3d,
    /// Cached actor-to-stage matrix, valid with `STAGE_RELATIVE_VALID`.
    pub(crate) stage_relative_modelview: Transform3d,

    // -- Visuals --
    pub(crate) opacity: u8,
    pub(crate) opacity_override: Option<u8>,
    pub(crate) background_color: Option<Color>,
    pub(crate) content: Option<Rc<dyn Content>>,
    pub(crate) content_box: Rect,
    pub(crate) content_gravity: ContentGravity,
    pub(crate) min_filter: ScalingFilter,
    pub(crate) mag_filter: ScalingFilter,
    pub(crate) content_repeat: ContentRepeat,
    pub(crate) layout_manager: Option<Rc<dyn LayoutManager>>,

    // -- Meta groups --
    pub(crate) actions: MetaGroup<dyn Action>,
    pub(crate) constraints: MetaGroup<dyn Constraint>,
    pub(crate) effects: MetaGroup<dyn Effect>,
    /// Index (into the enabled effects) of the effect being painted.
    pub(crate) current_effect: Option<usize>,
    pub(crate) effect_to_redraw: Option<String>,

    // -- Damage --
    /// Cached local paint volume, valid unless `NEEDS_PAINT_VOLUME_UPDATE`.
    pub(crate) paint_volume: Option<PaintVolume>,
    /// Stage-relative paint volume as of the last finish-layout.
    pub(crate) visible_paint_volume: Option<PaintVolume>,
    pub(crate) last_visible_paint_volume: Option<PaintVolume>,
    /// Pending clipped redraws, in actor coordinates. Empty with
    /// `NEEDS_REDRAW` set means the whole actor.
    pub(crate) next_redraw_clips: Vec<PaintVolume>,
    pub(crate) stage_views: Vec<StageView>,
    pub(crate) resource_scale: Option<f64>,

    // -- Clones and offscreen branches --
    pub(crate) clones: Vec<ActorId>,
    /// For clone actors: the actor being mirrored.
    pub(crate) clone_source: Option<ActorId>,
    pub(crate) in_cloned_branch: u32,
    pub(crate) unmapped_paint_branch_counter: u32,

    pub(crate) animation: Option<Box<AnimationInfo>>,
}

impl core::fmt::Debug for ActorNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActorNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("n_children", &self.n_children)
            .field("flags", &self.flags)
            .field("allocation", &self.allocation)
            .finish_non_exhaustive()
    }
}

impl ActorNode {
    pub(crate) fn new(class: Rc<dyn ActorClass>) -> Self {
        Self {
            parent: INVALID,
            first_child: INVALID,
            last_child: INVALID,
            prev_sibling: INVALID,
            next_sibling: INVALID,
            n_children: 0,
            age: 0,
            alive: true,
            class,
            name: None,
            flags: ActorFlags::empty(),
            private: PrivateFlags::INITIAL,
            host: None,
            allocation: Rect::ZERO,
            request_mode: RequestMode::HeightForWidth,
            width_requests: [SizeRequest::default(); N_CACHED_SIZE_REQUESTS],
            height_requests: [SizeRequest::default(); N_CACHED_SIZE_REQUESTS],
            cached_width_age: 1,
            cached_height_age: 1,
            clip: None,
            clip_to_allocation: false,
            layout_info: None,
            transform_info: None,
            transform: Transform3d::IDENTITY,
            stage_relative_modelview: Transform3d::IDENTITY,
            opacity: 255,
            opacity_override: None,
            background_color: None,
            content: None,
            content_box: Rect::ZERO,
            content_gravity: ContentGravity::ResizeFill,
            min_filter: ScalingFilter::Linear,
            mag_filter: ScalingFilter::Linear,
            content_repeat: ContentRepeat::empty(),
            layout_manager: None,
            actions: MetaGroup::default(),
            constraints: MetaGroup::default(),
            effects: MetaGroup::default(),
            current_effect: None,
            effect_to_redraw: None,
            paint_volume: None,
            visible_paint_volume: None,
            last_visible_paint_volume: None,
            next_redraw_clips: Vec::new(),
            stage_views: Vec::new(),
            resource_scale: None,
            clones: Vec::new(),
            clone_source: None,
            in_cloned_branch: 0,
            unmapped_paint_branch_counter: 0,
            animation: None,
        }
    }

    /// A slot whose actor was destroyed.
    pub(crate) fn vacant(class: Rc<dyn ActorClass>) -> Self {
        let mut node = Self::new(class);
        node.alive = false;
        node.private = PrivateFlags::empty();
        node
    }

    #[inline]
    pub(crate) fn layout_info(&self) -> &LayoutInfo {
        self.layout_info.as_deref().unwrap_or(&LayoutInfo::DEFAULT)
    }

    pub(crate) fn layout_info_mut(&mut self) -> &mut LayoutInfo {
        self.layout_info
            .get_or_insert_with(|| Box::new(LayoutInfo::DEFAULT))
    }

    #[inline]
    pub(crate) fn transform_info(&self) -> &TransformInfo {
        self.transform_info
            .as_deref()
            .unwrap_or(&TransformInfo::DEFAULT)
    }

    pub(crate) fn transform_info_mut(&mut self) -> &mut TransformInfo {
        self.transform_info
            .get_or_insert_with(|| Box::new(TransformInfo::DEFAULT))
    }

    pub(crate) fn animation_mut(&mut self) -> &mut AnimationInfo {
        self.animation.get_or_insert_with(Box::default)
    }

    #[inline]
    pub(crate) fn is_toplevel(&self) -> bool {
        self.private.contains(PrivateFlags::IS_TOPLEVEL)
    }

    #[inline]
    pub(crate) fn is_mapped(&self) -> bool {
        self.flags.contains(ActorFlags::MAPPED)
    }

    #[inline]
    pub(crate) fn is_realized(&self) -> bool {
        self.flags.contains(ActorFlags::REALIZED)
    }

    #[inline]
    pub(crate) fn is_visible(&self) -> bool {
        self.flags.contains(ActorFlags::VISIBLE)
    }

    #[inline]
    pub(crate) fn in_destruction(&self) -> bool {
        self.private.contains(PrivateFlags::IN_DESTRUCTION)
    }

    #[inline]
    pub(crate) fn needs_allocation(&self) -> bool {
        self.private.contains(PrivateFlags::NEEDS_ALLOCATION)
    }

    /// Drops every cached size request.
    pub(crate) fn invalidate_size_requests(&mut self) {
        self.width_requests = [SizeRequest::default(); N_CACHED_SIZE_REQUESTS];
        self.height_requests = [SizeRequest::default(); N_CACHED_SIZE_REQUESTS];
        self.cached_width_age = 1;
        self.cached_height_age = 1;
    }
}
