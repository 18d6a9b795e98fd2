// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size negotiation and allocation.
//!
//! Layout is two-pass. A parent asks each child for its minimum and natural
//! size on one axis, optionally for a given size on the other axis, then
//! hands each child a box. Answers are cached per axis in three slots keyed
//! by the for-size. Explicit size overrides, margins, alignment and
//! constraints are applied around the class's own answer.
//!
//! [`queue_relayout`](ActorStore::queue_relayout) marks an actor and its
//! ancestors as needing layout and records the topmost one as a relayout
//! root; [`update_stage`](ActorStore::update_stage) re-allocates the roots.

use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use crate::event::ActorEventKind;
use crate::geometry::{ActorAlign, Margin, Orientation, RequestMode};
use crate::layout_manager::LayoutManager;
use crate::property::{Property, Value};
use crate::trace::{AllocationEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind};

use super::flags::{ActorFlags, PrivateFlags};
use super::id::INVALID;
use super::node::{LayoutInfo, N_CACHED_SIZE_REQUESTS, SizeRequest};
use super::{ActorId, ActorStore};

/// One of the four explicit size overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SizeOverride {
    MinWidth,
    MinHeight,
    NaturalWidth,
    NaturalHeight,
}

impl SizeOverride {
    const fn value_property(self) -> Property {
        match self {
            Self::MinWidth => Property::MinWidth,
            Self::MinHeight => Property::MinHeight,
            Self::NaturalWidth => Property::NaturalWidth,
            Self::NaturalHeight => Property::NaturalHeight,
        }
    }

    const fn set_property(self) -> Property {
        match self {
            Self::MinWidth => Property::MinWidthSet,
            Self::MinHeight => Property::MinHeightSet,
            Self::NaturalWidth => Property::NaturalWidthSet,
            Self::NaturalHeight => Property::NaturalHeightSet,
        }
    }

    fn value(self, info: &LayoutInfo) -> f64 {
        match self {
            Self::MinWidth => info.minimum.width,
            Self::MinHeight => info.minimum.height,
            Self::NaturalWidth => info.natural.width,
            Self::NaturalHeight => info.natural.height,
        }
    }

    fn is_set(self, info: &LayoutInfo) -> bool {
        match self {
            Self::MinWidth => info.min_width_set,
            Self::MinHeight => info.min_height_set,
            Self::NaturalWidth => info.natural_width_set,
            Self::NaturalHeight => info.natural_height_set,
        }
    }

    fn store(self, info: &mut LayoutInfo, value: f64) {
        match self {
            Self::MinWidth => info.minimum.width = value,
            Self::MinHeight => info.minimum.height = value,
            Self::NaturalWidth => info.natural.width = value,
            Self::NaturalHeight => info.natural.height = value,
        }
    }

    fn mark(self, info: &mut LayoutInfo, set: bool) {
        match self {
            Self::MinWidth => info.min_width_set = set,
            Self::MinHeight => info.min_height_set = set,
            Self::NaturalWidth => info.natural_width_set = set,
            Self::NaturalHeight => info.natural_height_set = set,
        }
    }
}

/// Finds the cache slot answering `for_size`, or the slot to overwrite.
///
/// Returns `(hit, slot)`. A pending request invalidates every slot.
fn lookup_cached_request(
    requests: &mut [SizeRequest; N_CACHED_SIZE_REQUESTS],
    needs_request: bool,
    for_size: f64,
) -> (bool, usize) {
    if needs_request {
        *requests = [SizeRequest::default(); N_CACHED_SIZE_REQUESTS];
        return (false, 0);
    }
    let mut oldest = 0;
    for (i, request) in requests.iter().enumerate() {
        if request.age > 0 && request.for_size == for_size {
            return (true, i);
        }
        if request.age < requests[oldest].age {
            oldest = i;
        }
    }
    (false, oldest)
}

/// Removes the margins from one axis of an allocation.
fn adjust_for_margin(
    margin_start: f64,
    margin_end: f64,
    minimum: &mut f64,
    natural: &mut f64,
    start: &mut f64,
    end: &mut f64,
) {
    *minimum = (*minimum - (margin_start + margin_end)).max(0.0);
    *natural = (*natural - (margin_start + margin_end)).max(0.0);
    *start += margin_start;
    *end -= margin_end;
}

/// Shrinks one axis of an allocation to the natural size and positions it
/// according to `align`.
fn adjust_for_alignment(align: ActorAlign, natural: f64, start: &mut f64, end: &mut f64) {
    let allocated = *end - *start;
    match align {
        ActorAlign::Fill => {}
        ActorAlign::Start => {
            *end = *start + natural.min(allocated);
        }
        ActorAlign::End => {
            if allocated > natural {
                *start += allocated - natural;
                *end = *start + natural;
            }
        }
        ActorAlign::Center => {
            if allocated > natural {
                *start += ((allocated - natural) / 2.0).floor();
                *end = *start + natural;
            }
        }
    }
}

fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

impl ActorStore {
    // -- Position and size --

    /// The X coordinate in the parent's space: the fixed position while a
    /// layout is pending, the allocation afterwards.
    #[must_use]
    pub fn x(&self, id: ActorId) -> f64 {
        self.position(id).x
    }

    /// The Y coordinate in the parent's space.
    #[must_use]
    pub fn y(&self, id: ActorId) -> f64 {
        self.position(id).y
    }

    /// The position in the parent's space.
    #[must_use]
    pub fn position(&self, id: ActorId) -> Point {
        let node = self.node(id);
        if node.needs_allocation() {
            let info = node.layout_info();
            if info.fixed_position_set {
                info.fixed_pos
            } else {
                Point::ZERO
            }
        } else {
            node.allocation.origin()
        }
    }

    /// The width: the natural width while a layout is pending, the
    /// allocated width afterwards.
    pub fn width(&mut self, id: ActorId) -> f64 {
        self.size(id).width
    }

    /// The height: the natural height while a layout is pending, the
    /// allocated height afterwards.
    pub fn height(&mut self, id: ActorId) -> f64 {
        self.size(id).height
    }

    /// The width and height together.
    pub fn size(&mut self, id: ActorId) -> Size {
        let node = self.node(id);
        if !node.needs_allocation() {
            return node.allocation.size();
        }
        let (_, _, natural_width, natural_height) = self.preferred_size(id);
        Size::new(natural_width, natural_height)
    }

    /// The fixed position, if one was set.
    #[must_use]
    pub fn fixed_position(&self, id: ActorId) -> Option<Point> {
        let info = self.node(id).layout_info();
        info.fixed_position_set.then_some(info.fixed_pos)
    }

    /// Whether a fixed position was set.
    #[must_use]
    pub fn is_fixed_position_set(&self, id: ActorId) -> bool {
        self.node(id).layout_info().fixed_position_set
    }

    /// The last box handed to the actor, in its parent's coordinates.
    #[must_use]
    pub fn allocation(&self, id: ActorId) -> Rect {
        self.node(id).allocation
    }

    /// Whether the actor has been allocated and no relayout is pending.
    #[must_use]
    pub fn has_allocation(&self, id: ActorId) -> bool {
        let node = self.node(id);
        node.private.contains(PrivateFlags::HAS_ALLOCATION) && !node.needs_allocation()
    }

    /// Sets the fixed X coordinate.
    pub fn set_x(&mut self, id: ActorId, x: f64) {
        self.animate_property(id, Property::X, Value::Float(x));
    }

    /// Sets the fixed Y coordinate.
    pub fn set_y(&mut self, id: ActorId, y: f64) {
        self.animate_property(id, Property::Y, Value::Float(y));
    }

    /// Sets the fixed position.
    pub fn set_position(&mut self, id: ActorId, position: Point) {
        self.animate_property(id, Property::Position, Value::Point(position));
    }

    /// Sets or clears whether the fixed position is used.
    pub fn set_fixed_position_set(&mut self, id: ActorId, is_set: bool) {
        self.validate(id);
        if self.node(id).layout_info().fixed_position_set == is_set {
            return;
        }
        self.node_mut(id).layout_info_mut().fixed_position_set = is_set;
        self.notify(id, Property::FixedPositionSet);
        self.queue_relayout(id);
    }

    /// Forces the width. A negative width removes the override.
    pub fn set_width(&mut self, id: ActorId, width: f64) {
        if width < 0.0 {
            self.set_width_internal(id, width);
        } else {
            self.animate_property(id, Property::Width, Value::Float(width));
        }
    }

    /// Forces the height. A negative height removes the override.
    pub fn set_height(&mut self, id: ActorId, height: f64) {
        if height < 0.0 {
            self.set_height_internal(id, height);
        } else {
            self.animate_property(id, Property::Height, Value::Float(height));
        }
    }

    /// Forces the width and height. A negative dimension removes the
    /// override on that axis.
    pub fn set_size(&mut self, id: ActorId, width: f64, height: f64) {
        let mut s = self.freeze_notify();
        s.set_width(id, width);
        s.set_height(id, height);
    }

    /// The minimum-width override, whether or not it is in effect.
    #[must_use]
    pub fn min_width(&self, id: ActorId) -> f64 {
        self.node(id).layout_info().minimum.width
    }

    /// The minimum-height override, whether or not it is in effect.
    #[must_use]
    pub fn min_height(&self, id: ActorId) -> f64 {
        self.node(id).layout_info().minimum.height
    }

    /// The natural-width override, whether or not it is in effect.
    #[must_use]
    pub fn natural_width(&self, id: ActorId) -> f64 {
        self.node(id).layout_info().natural.width
    }

    /// The natural-height override, whether or not it is in effect.
    #[must_use]
    pub fn natural_height(&self, id: ActorId) -> f64 {
        self.node(id).layout_info().natural.height
    }

    /// Whether the minimum-width override is in effect.
    #[must_use]
    pub fn is_min_width_set(&self, id: ActorId) -> bool {
        self.node(id).layout_info().min_width_set
    }

    /// Whether the minimum-height override is in effect.
    #[must_use]
    pub fn is_min_height_set(&self, id: ActorId) -> bool {
        self.node(id).layout_info().min_height_set
    }

    /// Whether the natural-width override is in effect.
    #[must_use]
    pub fn is_natural_width_set(&self, id: ActorId) -> bool {
        self.node(id).layout_info().natural_width_set
    }

    /// Whether the natural-height override is in effect.
    #[must_use]
    pub fn is_natural_height_set(&self, id: ActorId) -> bool {
        self.node(id).layout_info().natural_height_set
    }

    /// Overrides the minimum width.
    pub fn set_min_width(&mut self, id: ActorId, width: f64) {
        self.animate_property(id, Property::MinWidth, Value::Float(width));
    }

    /// Overrides the minimum height.
    pub fn set_min_height(&mut self, id: ActorId, height: f64) {
        self.animate_property(id, Property::MinHeight, Value::Float(height));
    }

    /// Overrides the natural width.
    pub fn set_natural_width(&mut self, id: ActorId, width: f64) {
        self.animate_property(id, Property::NaturalWidth, Value::Float(width));
    }

    /// Overrides the natural height.
    pub fn set_natural_height(&mut self, id: ActorId, height: f64) {
        self.animate_property(id, Property::NaturalHeight, Value::Float(height));
    }

    /// Enables or disables the minimum-width override.
    pub fn set_min_width_set(&mut self, id: ActorId, set: bool) {
        self.set_size_override_set(id, SizeOverride::MinWidth, set);
    }

    /// Enables or disables the minimum-height override.
    pub fn set_min_height_set(&mut self, id: ActorId, set: bool) {
        self.set_size_override_set(id, SizeOverride::MinHeight, set);
    }

    /// Enables or disables the natural-width override.
    pub fn set_natural_width_set(&mut self, id: ActorId, set: bool) {
        self.set_size_override_set(id, SizeOverride::NaturalWidth, set);
    }

    /// Enables or disables the natural-height override.
    pub fn set_natural_height_set(&mut self, id: ActorId, set: bool) {
        self.set_size_override_set(id, SizeOverride::NaturalHeight, set);
    }

    // -- Margins, alignment, expansion --

    /// Extra space around the actor, inside its parent's box.
    #[must_use]
    pub fn margin(&self, id: ActorId) -> Margin {
        self.node(id).layout_info().margin
    }

    /// Sets all four margins.
    pub fn set_margin(&mut self, id: ActorId, margin: Margin) {
        let mut s = self.freeze_notify();
        s.set_margin_top(id, margin.top);
        s.set_margin_right(id, margin.right);
        s.set_margin_bottom(id, margin.bottom);
        s.set_margin_left(id, margin.left);
    }

    /// Sets the top margin.
    pub fn set_margin_top(&mut self, id: ActorId, v: f64) {
        self.animate_property(id, Property::MarginTop, Value::Float(v));
    }

    /// Sets the right margin.
    pub fn set_margin_right(&mut self, id: ActorId, v: f64) {
        self.animate_property(id, Property::MarginRight, Value::Float(v));
    }

    /// Sets the bottom margin.
    pub fn set_margin_bottom(&mut self, id: ActorId, v: f64) {
        self.animate_property(id, Property::MarginBottom, Value::Float(v));
    }

    /// Sets the left margin.
    pub fn set_margin_left(&mut self, id: ActorId, v: f64) {
        self.animate_property(id, Property::MarginLeft, Value::Float(v));
    }

    /// Horizontal alignment inside the allocated box.
    #[must_use]
    pub fn x_align(&self, id: ActorId) -> ActorAlign {
        self.node(id).layout_info().x_align
    }

    /// Vertical alignment inside the allocated box.
    #[must_use]
    pub fn y_align(&self, id: ActorId) -> ActorAlign {
        self.node(id).layout_info().y_align
    }

    /// Sets the horizontal alignment.
    pub fn set_x_align(&mut self, id: ActorId, align: ActorAlign) {
        self.set_align_internal(id, Property::XAlign, align);
    }

    /// Sets the vertical alignment.
    pub fn set_y_align(&mut self, id: ActorId, align: ActorAlign) {
        self.set_align_internal(id, Property::YAlign, align);
    }

    /// The explicitly requested horizontal expansion.
    #[must_use]
    pub fn x_expand(&self, id: ActorId) -> bool {
        self.node(id).layout_info().x_expand
    }

    /// The explicitly requested vertical expansion.
    #[must_use]
    pub fn y_expand(&self, id: ActorId) -> bool {
        self.node(id).layout_info().y_expand
    }

    /// Requests extra horizontal space. Overrides what the children ask
    /// for.
    pub fn set_x_expand(&mut self, id: ActorId, expand: bool) {
        self.set_expand_internal(id, Orientation::Horizontal, expand);
    }

    /// Requests extra vertical space. Overrides what the children ask for.
    pub fn set_y_expand(&mut self, id: ActorId, expand: bool) {
        self.set_expand_internal(id, Orientation::Vertical, expand);
    }

    /// How the actor negotiates its size.
    #[must_use]
    pub fn request_mode(&self, id: ActorId) -> RequestMode {
        self.node(id).request_mode
    }

    /// Changes how the actor negotiates its size.
    pub fn set_request_mode(&mut self, id: ActorId, mode: RequestMode) {
        self.validate(id);
        if self.node(id).request_mode == mode {
            return;
        }
        self.node_mut(id).request_mode = mode;
        self.notify(id, Property::RequestMode);
        self.queue_relayout(id);
    }

    // -- Layout manager --

    /// The delegate laying out the children, if any.
    #[must_use]
    pub fn layout_manager(&self, id: ActorId) -> Option<Rc<dyn LayoutManager>> {
        self.node(id).layout_manager.clone()
    }

    /// Replaces the delegate laying out the children.
    pub fn set_layout_manager(&mut self, id: ActorId, manager: Option<Rc<dyn LayoutManager>>) {
        self.validate(id);
        if let Some(old) = self.node_mut(id).layout_manager.take() {
            old.set_container(None);
        }
        if let Some(manager) = &manager {
            manager.set_container(Some(id));
        }
        self.node_mut(id).layout_manager = manager;
        self.queue_relayout(id);
    }

    /// Tells the store that `container`'s layout manager changed its
    /// configuration.
    pub fn layout_changed(&mut self, container: ActorId) {
        self.queue_relayout(container);
    }

    // -- Preferred size --

    /// Minimum and natural width for the given height (negative when
    /// unconstrained), margins included.
    pub fn preferred_width(&mut self, id: ActorId, for_height: f64) -> (f64, f64) {
        self.preferred_size_for_axis(id, Orientation::Horizontal, for_height)
    }

    /// Minimum and natural height for the given width (negative when
    /// unconstrained), margins included.
    pub fn preferred_height(&mut self, id: ActorId, for_width: f64) -> (f64, f64) {
        self.preferred_size_for_axis(id, Orientation::Vertical, for_width)
    }

    /// Minimum width, minimum height, natural width and natural height,
    /// negotiated in the actor's request mode.
    pub fn preferred_size(&mut self, id: ActorId) -> (f64, f64, f64, f64) {
        self.validate(id);
        match self.node(id).request_mode {
            RequestMode::HeightForWidth => {
                let (min_w, nat_w) = self.preferred_width(id, -1.0);
                let (min_h, nat_h) = self.preferred_height(id, nat_w);
                (min_w, min_h, nat_w, nat_h)
            }
            RequestMode::WidthForHeight => {
                let (min_h, nat_h) = self.preferred_height(id, -1.0);
                let (min_w, nat_w) = self.preferred_width(id, nat_h);
                (min_w, min_h, nat_w, nat_h)
            }
            RequestMode::ContentSize => {
                let natural = self.content_preferred_size(id).unwrap_or(Size::ZERO);
                (0.0, 0.0, natural.width, natural.height)
            }
        }
    }

    fn content_preferred_size(&self, id: ActorId) -> Option<Size> {
        self.node(id)
            .content
            .as_ref()
            .and_then(|content| content.preferred_size())
    }

    fn preferred_size_for_axis(&mut self, id: ActorId, orientation: Orientation, for_size: f64) -> (f64, f64) {
        self.validate(id);
        let i = id.idx as usize;
        let info = *self.nodes[i].layout_info();
        let (min_override, nat_override, margin_along, margin_across) = match orientation {
            Orientation::Horizontal => (
                SizeOverride::MinWidth,
                SizeOverride::NaturalWidth,
                info.margin.horizontal(),
                info.margin.vertical(),
            ),
            Orientation::Vertical => (
                SizeOverride::MinHeight,
                SizeOverride::NaturalHeight,
                info.margin.vertical(),
                info.margin.horizontal(),
            ),
        };

        let min_set = min_override.is_set(&info);
        let nat_set = nat_override.is_set(&info);
        let fixed_min = min_override.value(&info) + margin_along;
        let fixed_nat = nat_override.value(&info) + margin_along;
        if min_set && nat_set {
            return (fixed_min, fixed_nat);
        }

        let for_size = if for_size >= 0.0 {
            (for_size - margin_across).max(0.0)
        } else {
            for_size
        };

        let needs_flag = match orientation {
            Orientation::Horizontal => PrivateFlags::NEEDS_WIDTH_REQUEST,
            Orientation::Vertical => PrivateFlags::NEEDS_HEIGHT_REQUEST,
        };
        let needs_request = self.nodes[i].private.contains(needs_flag);
        let node = &mut self.nodes[i];
        let requests = match orientation {
            Orientation::Horizontal => &mut node.width_requests,
            Orientation::Vertical => &mut node.height_requests,
        };
        let (hit, slot) = lookup_cached_request(requests, needs_request, for_size);

        let (minimum, natural) = if hit {
            (requests[slot].min_size, requests[slot].natural_size)
        } else {
            let class = Rc::clone(&self.nodes[i].class);
            let (mut minimum, mut natural) = match orientation {
                Orientation::Horizontal => class.preferred_width(self, id, for_size),
                Orientation::Vertical => class.preferred_height(self, id, for_size),
            };
            let constraints = self.nodes[i].constraints.enabled();
            for entry in &constraints {
                entry.object().update_preferred_size(
                    self,
                    id,
                    orientation,
                    for_size,
                    &mut minimum,
                    &mut natural,
                );
            }
            minimum += margin_along;
            natural += margin_along;
            natural = natural.max(minimum);

            let node = &mut self.nodes[i];
            let (requests, age) = match orientation {
                Orientation::Horizontal => (&mut node.width_requests, &mut node.cached_width_age),
                Orientation::Vertical => (&mut node.height_requests, &mut node.cached_height_age),
            };
            requests[slot] = SizeRequest {
                for_size,
                min_size: minimum,
                natural_size: natural,
                age: *age,
            };
            *age += 1;
            node.private.remove(needs_flag);
            (minimum, natural)
        };

        (
            if min_set { fixed_min } else { minimum },
            if nat_set { fixed_nat } else { natural },
        )
    }

    // -- Allocation --

    /// Assigns `box_` (in the parent's coordinates) to the actor.
    ///
    /// Constraints may rewrite the box; margins and alignment then shrink
    /// it. Allocating the same box twice without an intervening relayout
    /// does nothing. A changed box goes through an implicit transition when
    /// an easing state is active.
    pub fn allocate(&mut self, id: ActorId, box_: Rect) {
        self.validate(id);
        let i = id.idx as usize;
        if box_.is_nan() {
            tracing::warn!(actor = %id, ?box_, "refusing to allocate a box with NaN coordinates");
            return;
        }

        let mut real = box_;
        let constraints = self.nodes[i].constraints.enabled();
        for entry in &constraints {
            entry.object().update_allocation(self, id, &mut real);
        }
        self.adjust_allocation(id, &mut real);

        if real.x1 < real.x0 || real.y1 < real.y0 {
            tracing::warn!(actor = %id, ?real, "allocation has a negative size; clamping");
            real.x1 = real.x1.max(real.x0);
            real.y1 = real.y1.max(real.y0);
        }

        let old = self.nodes[i].allocation;
        let changed = old != real;
        if !self.nodes[i].needs_allocation() && !changed {
            tracing::trace!(actor = %id, "no allocation needed");
            return;
        }
        if !changed {
            self.allocate_internal(id, real);
            return;
        }
        self.animate_property(id, Property::Allocation, Value::Rect(real));
    }

    /// Applies margins and alignment to a box about to be allocated.
    fn adjust_allocation(&mut self, id: ActorId, allocation: &mut Rect) {
        let alloc_width = allocation.width();
        let alloc_height = allocation.height();
        if alloc_width == 0.0 && alloc_height == 0.0 {
            return;
        }
        let info = *self.node(id).layout_info();

        let (mut min_w, mut nat_w, mut min_h, mut nat_h);
        match self.node(id).request_mode {
            RequestMode::HeightForWidth => {
                (min_w, nat_w) = self.preferred_width(id, -1.0);
                (min_h, nat_h) = self.preferred_height(id, alloc_width);
            }
            RequestMode::WidthForHeight => {
                (min_h, nat_h) = self.preferred_height(id, -1.0);
                (min_w, nat_w) = self.preferred_width(id, alloc_height);
            }
            RequestMode::ContentSize => {
                let natural = self.content_preferred_size(id).unwrap_or(Size::ZERO);
                (min_w, nat_w, min_h, nat_h) = (0.0, natural.width, 0.0, natural.height);
            }
        }

        let mut adjusted = *allocation;
        adjust_for_margin(
            info.margin.left,
            info.margin.right,
            &mut min_w,
            &mut nat_w,
            &mut adjusted.x0,
            &mut adjusted.x1,
        );
        adjust_for_alignment(info.x_align, nat_w, &mut adjusted.x0, &mut adjusted.x1);
        adjust_for_margin(
            info.margin.top,
            info.margin.bottom,
            &mut min_h,
            &mut nat_h,
            &mut adjusted.y0,
            &mut adjusted.y1,
        );
        adjust_for_alignment(info.y_align, nat_h, &mut adjusted.y0, &mut adjusted.y1);

        if !rect_contains_rect(*allocation, adjusted) {
            tracing::warn!(
                actor = %id,
                ?allocation,
                ?adjusted,
                "margins and alignment moved the allocation outside the assigned box"
            );
            return;
        }
        *allocation = adjusted;
    }

    /// Runs the class's allocate with the relayout guard held.
    pub(crate) fn allocate_internal(&mut self, id: ActorId, allocation: Rect) {
        let i = id.idx as usize;
        self.nodes[i].private.insert(PrivateFlags::IN_RELAYOUT);
        let class = Rc::clone(&self.nodes[i].class);
        class.allocate(self, id, allocation);
        self.nodes[i].private.remove(PrivateFlags::IN_RELAYOUT);

        self.tracer.allocation(&AllocationEvent {
            frame_index: self.frame_index,
            actor: id.idx,
            allocation: self.nodes[i].allocation,
        });
        self.queue_redraw(id);
    }

    /// Stores `allocation` without laying out children.
    ///
    /// Only valid while the actor is being allocated, i.e. from an
    /// [`ActorClass::allocate`](crate::class::ActorClass::allocate)
    /// override.
    pub fn set_allocation(&mut self, id: ActorId, allocation: Rect) {
        self.validate(id);
        if !self.has(id, PrivateFlags::IN_RELAYOUT) {
            tracing::warn!(actor = %id, "set_allocation called outside of allocate");
            return;
        }
        self.set_allocation_internal(id, allocation);
    }

    /// Stores `allocation` and invalidates whatever depends on it. Returns
    /// whether the box changed.
    pub(crate) fn set_allocation_internal(&mut self, id: ActorId, allocation: Rect) -> bool {
        let i = id.idx as usize;
        let mut s = self.freeze_notify();
        let old = s.nodes[i].allocation;
        {
            let node = &mut s.nodes[i];
            node.allocation = allocation;
            node.private.remove(PrivateFlags::NEEDS_LAYOUT);
            node.private.insert(PrivateFlags::HAS_ALLOCATION);
        }

        let size_changed = old.size() != allocation.size();
        let changed = size_changed || old.origin() != allocation.origin();
        if changed {
            s.transform_changed(id);
            if size_changed {
                s.queue_update_paint_volume(id);
            }
            s.notify(id, Property::Allocation);
            if s.nodes[i].content.is_some() {
                s.nodes[i].private.remove(PrivateFlags::CONTENT_BOX_VALID);
                s.notify(id, Property::ContentBox);
            }
        }
        s.notify_if_geometry_changed(id, old);
        changed
    }

    /// Notifies the geometry properties that differ from `old`.
    fn notify_if_geometry_changed(&mut self, id: ActorId, old: Rect) {
        let node = self.node(id);
        let mut changed = Vec::with_capacity(6);
        if node.needs_allocation() {
            changed.extend([
                Property::X,
                Property::Y,
                Property::Position,
                Property::Width,
                Property::Height,
                Property::Size,
            ]);
        } else if node
            .private
            .intersects(PrivateFlags::NEEDS_WIDTH_REQUEST | PrivateFlags::NEEDS_HEIGHT_REQUEST)
        {
            changed.extend([Property::Width, Property::Height, Property::Size]);
        } else {
            let new = node.allocation;
            if new.x0 != old.x0 {
                changed.push(Property::X);
            }
            if new.y0 != old.y0 {
                changed.push(Property::Y);
            }
            if new.origin() != old.origin() {
                changed.push(Property::Position);
            }
            if new.width() != old.width() {
                changed.push(Property::Width);
            }
            if new.height() != old.height() {
                changed.push(Property::Height);
            }
            if new.size() != old.size() {
                changed.push(Property::Size);
            }
        }
        self.notify_all(id, &changed);
    }

    /// Allocates the natural size at `(x, y)`.
    pub fn allocate_preferred_size(&mut self, id: ActorId, x: f64, y: f64) {
        let (_, _, natural_width, natural_height) = self.preferred_size(id);
        self.allocate(id, Rect::new(x, y, x + natural_width, y + natural_height));
    }

    /// Allocates the natural size clamped to the available space, honoring
    /// the request mode.
    pub fn allocate_available_size(&mut self, id: ActorId, x: f64, y: f64, available_width: f64, available_height: f64) {
        // Upper bound first: a minimum larger than the space available wins.
        let clamp = |v: f64, lo: f64, hi: f64| if v > hi { hi } else if v < lo { lo } else { v };
        let (width, height) = match self.request_mode(id) {
            RequestMode::HeightForWidth | RequestMode::ContentSize => {
                let (min_w, nat_w) = self.preferred_width(id, available_height);
                let width = clamp(nat_w, min_w, available_width);
                let (min_h, nat_h) = self.preferred_height(id, width);
                (width, clamp(nat_h, min_h, available_height))
            }
            RequestMode::WidthForHeight => {
                let (min_h, nat_h) = self.preferred_height(id, available_width);
                let height = clamp(nat_h, min_h, available_height);
                let (min_w, nat_w) = self.preferred_width(id, height);
                (clamp(nat_w, min_w, available_width), height)
            }
        };
        self.allocate(id, Rect::new(x, y, x + width, y + height));
    }

    // -- Relayout --

    /// Marks the actor and its ancestors as needing a new size request and
    /// allocation, and schedules a stage update.
    ///
    /// Propagation stops at an ancestor that already needs layout or at a
    /// child of an actor flagged [`NO_LAYOUT`](ActorFlags::NO_LAYOUT); the
    /// topmost marked actor becomes a relayout root.
    pub fn queue_relayout(&mut self, id: ActorId) {
        self.validate(id);
        let i = id.idx as usize;
        {
            let node = &self.nodes[i];
            if node.in_destruction() || node.private.contains(PrivateFlags::NEEDS_LAYOUT) {
                return;
            }
        }

        let mut cur = id.idx;
        let mut root = None;
        loop {
            let node = &mut self.nodes[cur as usize];
            node.private.insert(PrivateFlags::NEEDS_LAYOUT);
            node.invalidate_size_requests();
            let parent = node.parent;
            let here = self.id_at(cur);
            self.emit(here, ActorEventKind::QueueRelayout);

            if parent == INVALID {
                root = Some(here);
                break;
            }
            let parent_node = &self.nodes[parent as usize];
            if parent_node.flags.contains(ActorFlags::NO_LAYOUT) {
                root = Some(here);
                break;
            }
            if parent_node.in_destruction()
                || parent_node.private.contains(PrivateFlags::NEEDS_LAYOUT)
            {
                break;
            }
            cur = parent;
        }

        if let Some(root) = root {
            if !self.pending_relayouts.contains(&root) {
                self.pending_relayouts.push(root);
            }
            if let Some(host) = self.stage_host(root) {
                host.queue_actor_relayout(root);
                host.schedule_update();
            }
        }
        self.queue_redraw(id);
    }

    /// Whether a relayout is pending for the actor.
    #[must_use]
    pub fn needs_relayout(&self, id: ActorId) -> bool {
        self.node(id).private.intersects(PrivateFlags::NEEDS_LAYOUT)
    }

    /// Runs one frame's worth of layout for `stage`: pending relayout roots
    /// are re-allocated, then stage-relative state is brought up to date
    /// and pending redraws are turned into clip regions.
    pub fn update_stage(&mut self, stage: ActorId) {
        self.validate(stage);
        if !self.nodes[stage.idx as usize].is_toplevel() {
            tracing::warn!(actor = %stage, "update_stage needs a stage");
            return;
        }
        self.frame_index += 1;
        let frame_index = self.frame_index;

        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Relayout,
        });
        self.maybe_relayout(stage);
        self.tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Relayout,
        });

        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::FinishLayout,
        });
        self.flush_absolute_geometry();
        self.finish_layout(stage);
        self.tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::FinishLayout,
        });
    }

    fn maybe_relayout(&mut self, stage: ActorId) {
        let pending = std::mem::take(&mut self.pending_relayouts);
        let mut roots = Vec::new();
        for root in pending {
            if !self.is_alive(root) {
                continue;
            }
            if self.stage(root) == Some(stage) {
                roots.push(root);
            } else {
                self.pending_relayouts.push(root);
            }
        }

        if self.nodes[stage.idx as usize].needs_allocation() || roots.contains(&stage) {
            let viewport = self
                .stage_host(stage)
                .map_or(Rect::ZERO, |host| host.viewport());
            self.allocate(stage, viewport);
        }
        for root in roots {
            if root == stage || !self.is_alive(root) || !self.nodes[root.idx as usize].needs_allocation() {
                continue;
            }
            let origin = self
                .fixed_position(root)
                .unwrap_or_else(|| self.nodes[root.idx as usize].allocation.origin());
            self.allocate_preferred_size(root, origin.x, origin.y);
        }
    }

    // -- Internal setters --

    pub(crate) fn set_x_internal(&mut self, id: ActorId, x: f64) {
        let info = *self.node(id).layout_info();
        if info.fixed_position_set && info.fixed_pos.x == x {
            return;
        }
        let old = self.node(id).allocation;
        let mut s = self.freeze_notify();
        s.node_mut(id).layout_info_mut().fixed_pos.x = x;
        s.notify(id, Property::FixedX);
        s.set_fixed_position_set(id, true);
        s.notify_if_geometry_changed(id, old);
        s.queue_relayout(id);
    }

    pub(crate) fn set_y_internal(&mut self, id: ActorId, y: f64) {
        let info = *self.node(id).layout_info();
        if info.fixed_position_set && info.fixed_pos.y == y {
            return;
        }
        let old = self.node(id).allocation;
        let mut s = self.freeze_notify();
        s.node_mut(id).layout_info_mut().fixed_pos.y = y;
        s.notify(id, Property::FixedY);
        s.set_fixed_position_set(id, true);
        s.notify_if_geometry_changed(id, old);
        s.queue_relayout(id);
    }

    pub(crate) fn set_position_internal(&mut self, id: ActorId, position: Point) {
        let mut s = self.freeze_notify();
        s.set_x_internal(id, position.x);
        s.set_y_internal(id, position.y);
    }

    /// A non-negative width sets both overrides; a negative one clears
    /// them. A stage keeps its minimum width.
    pub(crate) fn set_width_internal(&mut self, id: ActorId, width: f64) {
        let toplevel = self.node(id).is_toplevel();
        let mut s = self.freeze_notify();
        if width >= 0.0 {
            if !toplevel {
                s.set_size_override(id, SizeOverride::MinWidth, width);
            }
            s.set_size_override(id, SizeOverride::NaturalWidth, width);
        } else {
            if !toplevel {
                s.set_size_override_set(id, SizeOverride::MinWidth, false);
            }
            s.set_size_override_set(id, SizeOverride::NaturalWidth, false);
        }
    }

    pub(crate) fn set_height_internal(&mut self, id: ActorId, height: f64) {
        let toplevel = self.node(id).is_toplevel();
        let mut s = self.freeze_notify();
        if height >= 0.0 {
            if !toplevel {
                s.set_size_override(id, SizeOverride::MinHeight, height);
            }
            s.set_size_override(id, SizeOverride::NaturalHeight, height);
        } else {
            if !toplevel {
                s.set_size_override_set(id, SizeOverride::MinHeight, false);
            }
            s.set_size_override_set(id, SizeOverride::NaturalHeight, false);
        }
    }

    pub(crate) fn set_size_internal(&mut self, id: ActorId, size: Size) {
        let mut s = self.freeze_notify();
        s.set_width_internal(id, size.width);
        s.set_height_internal(id, size.height);
    }

    pub(crate) fn set_size_override(&mut self, id: ActorId, which: SizeOverride, value: f64) {
        let info = *self.node(id).layout_info();
        if which.is_set(&info) && which.value(&info) == value {
            return;
        }
        let old = self.node(id).allocation;
        let mut s = self.freeze_notify();
        which.store(s.node_mut(id).layout_info_mut(), value);
        s.notify(id, which.value_property());
        s.set_size_override_set(id, which, true);
        s.notify_if_geometry_changed(id, old);
        s.queue_relayout(id);
    }

    fn set_size_override_set(&mut self, id: ActorId, which: SizeOverride, set: bool) {
        self.validate(id);
        if which.is_set(self.node(id).layout_info()) == set {
            return;
        }
        let old = self.node(id).allocation;
        which.mark(self.node_mut(id).layout_info_mut(), set);
        self.notify(id, which.set_property());
        self.notify_if_geometry_changed(id, old);
        self.queue_relayout(id);
    }

    pub(crate) fn set_margin_internal(&mut self, id: ActorId, property: Property, value: f64) {
        let margin = &mut self.node_mut(id).layout_info_mut().margin;
        let slot = match property {
            Property::MarginTop => &mut margin.top,
            Property::MarginRight => &mut margin.right,
            Property::MarginBottom => &mut margin.bottom,
            _ => &mut margin.left,
        };
        if *slot == value {
            return;
        }
        *slot = value;
        self.queue_relayout(id);
        self.notify(id, property);
    }

    pub(crate) fn set_align_internal(&mut self, id: ActorId, property: Property, align: ActorAlign) {
        self.validate(id);
        let info = self.node_mut(id).layout_info_mut();
        let slot = if property == Property::XAlign {
            &mut info.x_align
        } else {
            &mut info.y_align
        };
        if *slot == align {
            return;
        }
        *slot = align;
        self.queue_relayout(id);
        self.notify(id, property);
    }

    pub(crate) fn set_expand_internal(&mut self, id: ActorId, orientation: Orientation, expand: bool) {
        self.validate(id);
        let (set_flag, property) = match orientation {
            Orientation::Horizontal => (PrivateFlags::X_EXPAND_SET, Property::XExpand),
            Orientation::Vertical => (PrivateFlags::Y_EXPAND_SET, Property::YExpand),
        };
        let info = self.node_mut(id).layout_info_mut();
        let slot = match orientation {
            Orientation::Horizontal => &mut info.x_expand,
            Orientation::Vertical => &mut info.y_expand,
        };
        let already = *slot == expand;
        *slot = expand;
        if already && self.has(id, set_flag) {
            return;
        }
        self.set_private(id, set_flag, true);
        self.queue_compute_expand(id);
        self.notify(id, property);
    }
}
