// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic, name-addressed property access.
//!
//! [`ActorStore::property`] and [`ActorStore::set_property`] read and write
//! any [`Property`] as a [`Value`]. Writes go through the same path as the
//! typed setters, so animatable properties still honor the easing state.
//!
//! Transitions write through `set_final_state` (plain properties) and
//! [`ActorStore::set_final_property`] (any path, including
//! `@layout.<p>`, `@content.<p>` and `@<section>.<name>.<p>`), which apply
//! a value at once.

use kurbo::Rect;

use crate::error::PropertyError;
use crate::geometry::{Color, Orientation};
use crate::property::{Animatable, MetaSection, Property, PropertyPath, Value};
use crate::transform::Transform3d;

use super::layout::SizeOverride;
use super::transforms::RotateAxis;
use super::{ActorId, ActorStore};

fn check_kind(property: Property, value: &Value) -> Result<(), PropertyError> {
    if value.kind() == property.value_kind() {
        Ok(())
    } else {
        Err(PropertyError::TypeMismatch {
            name: property.name().to_owned(),
            expected: property.value_kind(),
            found: value.kind(),
        })
    }
}

impl ActorStore {
    /// The current value of `property`.
    ///
    /// Takes `&mut self` because some values (size, content box) are
    /// computed and cached on demand.
    pub fn property(&mut self, id: ActorId, property: Property) -> Value {
        self.validate(id);
        match property {
            Property::X => Value::Float(self.x(id)),
            Property::Y => Value::Float(self.y(id)),
            Property::Position => Value::Point(self.position(id)),
            Property::Width => Value::Float(self.width(id)),
            Property::Height => Value::Float(self.height(id)),
            Property::Size => Value::Size(self.size(id)),
            Property::FixedX => Value::Float(self.node(id).layout_info().fixed_pos.x),
            Property::FixedY => Value::Float(self.node(id).layout_info().fixed_pos.y),
            Property::FixedPositionSet => Value::Bool(self.is_fixed_position_set(id)),
            Property::MinWidth => Value::Float(self.min_width(id)),
            Property::MinWidthSet => Value::Bool(self.is_min_width_set(id)),
            Property::MinHeight => Value::Float(self.min_height(id)),
            Property::MinHeightSet => Value::Bool(self.is_min_height_set(id)),
            Property::NaturalWidth => Value::Float(self.natural_width(id)),
            Property::NaturalWidthSet => Value::Bool(self.is_natural_width_set(id)),
            Property::NaturalHeight => Value::Float(self.natural_height(id)),
            Property::NaturalHeightSet => Value::Bool(self.is_natural_height_set(id)),
            Property::RequestMode => Value::RequestMode(self.request_mode(id)),
            Property::Allocation => Value::Rect(self.allocation(id)),
            Property::ZPosition => Value::Float(self.z_position(id)),
            Property::ClipRect => Value::Rect(self.clip(id).unwrap_or(Rect::ZERO)),
            Property::HasClip => Value::Bool(self.has_clip(id)),
            Property::ClipToAllocation => Value::Bool(self.clip_to_allocation(id)),
            Property::Opacity => Value::Uint8(self.opacity(id)),
            Property::Visible => Value::Bool(self.is_visible(id)),
            Property::Mapped => Value::Bool(self.is_mapped(id)),
            Property::Realized => Value::Bool(self.is_realized(id)),
            Property::Reactive => Value::Bool(self.is_reactive(id)),
            Property::ShowOnSetParent => Value::Bool(self.show_on_set_parent(id)),
            Property::PivotPoint => Value::Point(self.pivot_point(id)),
            Property::PivotPointZ => Value::Float(self.pivot_point_z(id)),
            Property::ScaleX => Value::Float(self.scale(id).0),
            Property::ScaleY => Value::Float(self.scale(id).1),
            Property::ScaleZ => Value::Float(self.scale_z(id)),
            Property::RotationAngleX => Value::Float(self.rotation_angle(id, RotateAxis::X)),
            Property::RotationAngleY => Value::Float(self.rotation_angle(id, RotateAxis::Y)),
            Property::RotationAngleZ => Value::Float(self.rotation_angle(id, RotateAxis::Z)),
            Property::TranslationX => Value::Float(self.translation(id).x),
            Property::TranslationY => Value::Float(self.translation(id).y),
            Property::TranslationZ => Value::Float(self.translation(id).z),
            Property::Transform => Value::Matrix(
                self.transform_override(id)
                    .unwrap_or(Transform3d::IDENTITY),
            ),
            Property::TransformSet => Value::Bool(self.is_transform_set(id)),
            Property::ChildTransform => Value::Matrix(
                self.child_transform(id)
                    .unwrap_or(Transform3d::IDENTITY),
            ),
            Property::ChildTransformSet => Value::Bool(self.child_transform(id).is_some()),
            Property::MarginTop => Value::Float(self.margin(id).top),
            Property::MarginRight => Value::Float(self.margin(id).right),
            Property::MarginBottom => Value::Float(self.margin(id).bottom),
            Property::MarginLeft => Value::Float(self.margin(id).left),
            Property::XAlign => Value::Align(self.x_align(id)),
            Property::YAlign => Value::Align(self.y_align(id)),
            Property::XExpand => Value::Bool(self.x_expand(id)),
            Property::YExpand => Value::Bool(self.y_expand(id)),
            Property::BackgroundColor => Value::Color(
                self.background_color(id)
                    .unwrap_or(Color::TRANSPARENT),
            ),
            Property::BackgroundColorSet => Value::Bool(self.background_color(id).is_some()),
            Property::ContentGravity => Value::Gravity(self.content_gravity(id)),
            Property::ContentBox => Value::Rect(self.content_box(id)),
            Property::MinificationFilter => Value::Filter(self.content_scaling_filters(id).0),
            Property::MagnificationFilter => Value::Filter(self.content_scaling_filters(id).1),
            Property::ContentRepeat => Value::Repeat(self.content_repeat(id)),
            Property::FirstChild => Value::Actor(self.first_child(id)),
            Property::LastChild => Value::Actor(self.last_child(id)),
        }
    }

    /// Writes `property` the way its typed setter would, animating it when
    /// an easing state is active.
    pub fn set_property(&mut self, id: ActorId, property: Property, value: Value) -> Result<(), PropertyError> {
        self.validate(id);
        if property.is_read_only() {
            return Err(PropertyError::ReadOnly(property.name().to_owned()));
        }
        check_kind(property, &value)?;
        match (property, value) {
            (Property::Width, Value::Float(v)) => self.set_width(id, v),
            (Property::Height, Value::Float(v)) => self.set_height(id, v),
            (Property::BackgroundColor, Value::Color(c)) => self.set_background_color(id, Some(c)),
            _ if property.is_animatable() => self.animate_property(id, property, value),
            _ => self.set_final_state(id, property, value)?,
        }
        Ok(())
    }

    /// Looks `name` up and writes it with
    /// [`set_property`](Self::set_property).
    pub fn set_property_by_name(&mut self, id: ActorId, name: &str, value: Value) -> Result<(), PropertyError> {
        let property = Property::from_name(name).ok_or_else(|| PropertyError::Unknown(name.to_owned()))?;
        self.set_property(id, property, value)
    }

    /// Applies `value` at once through the property's internal setter.
    ///
    /// Allocation and content box, read-only from outside, are accepted
    /// here so transitions can drive them.
    pub(crate) fn set_final_state(&mut self, id: ActorId, property: Property, value: Value) -> Result<(), PropertyError> {
        check_kind(property, &value)?;
        match (property, value) {
            (Property::X | Property::FixedX, Value::Float(v)) => self.set_x_internal(id, v),
            (Property::Y | Property::FixedY, Value::Float(v)) => self.set_y_internal(id, v),
            (Property::Position, Value::Point(p)) => self.set_position_internal(id, p),
            (Property::Width, Value::Float(v)) => self.set_width_internal(id, v),
            (Property::Height, Value::Float(v)) => self.set_height_internal(id, v),
            (Property::Size, Value::Size(s)) => self.set_size_internal(id, s),
            (Property::FixedPositionSet, Value::Bool(b)) => self.set_fixed_position_set(id, b),
            (Property::MinWidth, Value::Float(v)) => self.set_size_override(id, SizeOverride::MinWidth, v),
            (Property::MinHeight, Value::Float(v)) => self.set_size_override(id, SizeOverride::MinHeight, v),
            (Property::NaturalWidth, Value::Float(v)) => self.set_size_override(id, SizeOverride::NaturalWidth, v),
            (Property::NaturalHeight, Value::Float(v)) => self.set_size_override(id, SizeOverride::NaturalHeight, v),
            (Property::MinWidthSet, Value::Bool(b)) => self.set_min_width_set(id, b),
            (Property::MinHeightSet, Value::Bool(b)) => self.set_min_height_set(id, b),
            (Property::NaturalWidthSet, Value::Bool(b)) => self.set_natural_width_set(id, b),
            (Property::NaturalHeightSet, Value::Bool(b)) => self.set_natural_height_set(id, b),
            (Property::RequestMode, Value::RequestMode(mode)) => self.set_request_mode(id, mode),
            (Property::Allocation, Value::Rect(r)) => self.allocate_internal(id, r),
            (Property::ZPosition, Value::Float(v)) => self.set_z_position_internal(id, v),
            (Property::ClipRect, Value::Rect(r)) => self.set_clip_internal(id, r),
            (Property::ClipToAllocation, Value::Bool(b)) => self.set_clip_to_allocation(id, b),
            (Property::Opacity, Value::Uint8(o)) => self.set_opacity_internal(id, o),
            (Property::Visible, Value::Bool(b)) => self.set_visible(id, b),
            (Property::Reactive, Value::Bool(b)) => self.set_reactive(id, b),
            (Property::ShowOnSetParent, Value::Bool(b)) => self.set_show_on_set_parent(id, b),
            (Property::PivotPoint, Value::Point(p)) => self.set_pivot_point_internal(id, p),
            (Property::PivotPointZ, Value::Float(v)) => self.set_pivot_point_z_internal(id, v),
            (Property::ScaleX | Property::ScaleY | Property::ScaleZ, Value::Float(v)) => {
                self.set_scale_internal(id, property, v);
            }
            (Property::RotationAngleX | Property::RotationAngleY | Property::RotationAngleZ, Value::Float(v)) => {
                self.set_rotation_internal(id, property, v);
            }
            (Property::TranslationX | Property::TranslationY | Property::TranslationZ, Value::Float(v)) => {
                self.set_translation_internal(id, property, v);
            }
            (Property::Transform, Value::Matrix(m)) => self.set_transform_internal(id, m),
            (Property::ChildTransform, Value::Matrix(m)) => self.set_child_transform_internal(id, m),
            (
                Property::MarginTop | Property::MarginRight | Property::MarginBottom | Property::MarginLeft,
                Value::Float(v),
            ) => self.set_margin_internal(id, property, v),
            (Property::XAlign | Property::YAlign, Value::Align(a)) => self.set_align_internal(id, property, a),
            (Property::XExpand, Value::Bool(b)) => self.set_expand_internal(id, Orientation::Horizontal, b),
            (Property::YExpand, Value::Bool(b)) => self.set_expand_internal(id, Orientation::Vertical, b),
            (Property::BackgroundColor, Value::Color(c)) => self.set_background_color_internal(id, c),
            (Property::ContentGravity, Value::Gravity(g)) => self.set_content_gravity(id, g),
            (Property::ContentBox, Value::Rect(r)) => self.set_content_box_internal(id, r),
            (Property::MinificationFilter, Value::Filter(f)) => {
                let (_, mag) = self.content_scaling_filters(id);
                self.set_content_scaling_filters(id, f, mag);
            }
            (Property::MagnificationFilter, Value::Filter(f)) => {
                let (min, _) = self.content_scaling_filters(id);
                self.set_content_scaling_filters(id, min, f);
            }
            (Property::ContentRepeat, Value::Repeat(r)) => self.set_content_repeat(id, r),
            _ => return Err(PropertyError::ReadOnly(property.name().to_owned())),
        }
        Ok(())
    }

    // -- Paths --

    /// Reads a property addressed by a path: a plain property name,
    /// `@layout.<p>`, `@content.<p>` or `@<section>.<name>.<p>`.
    pub fn property_by_path(&mut self, id: ActorId, path: &str) -> Result<Value, PropertyError> {
        self.validate(id);
        let unknown = || PropertyError::Unknown(path.to_owned());
        match PropertyPath::parse(path) {
            PropertyPath::Plain(name) => {
                let property = Property::from_name(name).ok_or_else(unknown)?;
                Ok(self.property(id, property))
            }
            PropertyPath::Layout(name) => {
                let manager = self
                    .layout_manager(id)
                    .ok_or(PropertyError::NoDelegate("layout"))?;
                manager.animatable_property(name).ok_or_else(unknown)
            }
            PropertyPath::Content(name) => {
                let content = self
                    .content(id)
                    .ok_or(PropertyError::NoDelegate("content"))?;
                content.animatable_property(name).ok_or_else(unknown)
            }
            PropertyPath::Meta {
                section,
                name,
                property,
            } => {
                let node = self.node(id);
                let found = match section {
                    MetaSection::Actions => node
                        .actions
                        .get(name)
                        .map(|a| a.animatable_property(property)),
                    MetaSection::Constraints => node
                        .constraints
                        .get(name)
                        .map(|c| c.animatable_property(property)),
                    MetaSection::Effects => node
                        .effects
                        .get(name)
                        .map(|e| e.animatable_property(property)),
                };
                found
                    .ok_or_else(|| PropertyError::NoSuchMeta {
                        section: section.as_str(),
                        name: name.to_owned(),
                    })?
                    .ok_or_else(unknown)
            }
        }
    }

    /// Writes a property addressed by a path at once, bypassing the easing
    /// state. This is what transitions call on every frame.
    pub fn set_final_property(&mut self, id: ActorId, path: &str, value: Value) -> Result<(), PropertyError> {
        self.validate(id);
        match PropertyPath::parse(path) {
            PropertyPath::Plain(name) => {
                let property = Property::from_name(name).ok_or_else(|| PropertyError::Unknown(path.to_owned()))?;
                self.set_final_state(id, property, value)
            }
            PropertyPath::Layout(name) => {
                let manager = self
                    .layout_manager(id)
                    .ok_or(PropertyError::NoDelegate("layout"))?;
                manager.set_final_state(name, &value)?;
                self.layout_changed(id);
                Ok(())
            }
            PropertyPath::Content(name) => {
                let content = self
                    .content(id)
                    .ok_or(PropertyError::NoDelegate("content"))?;
                content.set_final_state(name, &value)?;
                self.invalidate_content(id);
                Ok(())
            }
            PropertyPath::Meta {
                section,
                name,
                property,
            } => {
                let no_such_meta = || PropertyError::NoSuchMeta {
                    section: section.as_str(),
                    name: name.to_owned(),
                };
                match section {
                    MetaSection::Actions => {
                        let action = self.action(id, name).ok_or_else(no_such_meta)?;
                        action.set_final_state(property, &value)
                    }
                    MetaSection::Constraints => {
                        let constraint = self.constraint(id, name).ok_or_else(no_such_meta)?;
                        constraint.set_final_state(property, &value)?;
                        self.queue_relayout(id);
                        Ok(())
                    }
                    MetaSection::Effects => {
                        let effect = self.effect(id, name).ok_or_else(no_such_meta)?;
                        effect.set_final_state(property, &value)?;
                        self.queue_update_paint_volume(id);
                        self.queue_effect_redraw(id, name);
                        Ok(())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use kurbo::Point;

    use super::*;
    use crate::animation::{Interval, PropertyTransition};
    use crate::geometry::ActorAlign;
    use crate::meta::Effect;

    struct Blur {
        radius: Cell<f64>,
    }

    impl Animatable for Blur {
        fn animatable_property(&self, name: &str) -> Option<Value> {
            (name == "radius").then(|| Value::Float(self.radius.get()))
        }

        fn set_final_state(&self, name: &str, value: &Value) -> Result<(), PropertyError> {
            match (name, value) {
                ("radius", Value::Float(r)) => {
                    self.radius.set(*r);
                    Ok(())
                }
                _ => Err(PropertyError::Unknown(name.to_owned())),
            }
        }
    }

    impl Effect for Blur {}

    #[test]
    fn generic_access_matches_typed_access() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.set_property(a, Property::Opacity, Value::Uint8(42)).unwrap();
        assert_eq!(store.opacity(a), 42);
        store
            .set_property_by_name(a, "x-align", Value::Align(ActorAlign::Center))
            .unwrap();
        assert_eq!(store.x_align(a), ActorAlign::Center);
        store
            .set_property(a, Property::Position, Value::Point(Point::new(3.0, 4.0)))
            .unwrap();
        assert_eq!(store.property(a, Property::FixedX), Value::Float(3.0));
        assert_eq!(store.property(a, Property::FixedPositionSet), Value::Bool(true));
    }

    #[test]
    fn bad_writes_are_rejected() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        assert_eq!(
            store.set_property(a, Property::Mapped, Value::Bool(true)),
            Err(PropertyError::ReadOnly("mapped".to_owned()))
        );
        assert!(matches!(
            store.set_property(a, Property::Opacity, Value::Float(0.5)),
            Err(PropertyError::TypeMismatch { .. })
        ));
        assert_eq!(
            store.set_property_by_name(a, "wobble", Value::Bool(true)),
            Err(PropertyError::Unknown("wobble".to_owned()))
        );
    }

    #[test]
    fn paths_reach_meta_objects() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.add_effect(
            a,
            "blur",
            Rc::new(Blur {
                radius: Cell::new(2.0),
            }),
        );
        assert_eq!(store.property_by_path(a, "@effects.blur.radius"), Ok(Value::Float(2.0)));
        store
            .set_final_property(a, "@effects.blur.radius", Value::Float(8.0))
            .unwrap();
        assert_eq!(store.property_by_path(a, "@effects.blur.radius"), Ok(Value::Float(8.0)));
        assert_eq!(
            store.property_by_path(a, "@effects.glow.radius"),
            Err(PropertyError::NoSuchMeta {
                section: "effects",
                name: "glow".to_owned(),
            })
        );
        assert_eq!(
            store.property_by_path(a, "@layout.spacing"),
            Err(PropertyError::NoDelegate("layout"))
        );
    }

    #[test]
    fn transitions_drive_meta_properties() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let blur = Rc::new(Blur {
            radius: Cell::new(0.0),
        });
        store.add_effect(a, "blur", blur.clone());
        let t = PropertyTransition::new("@effects.blur.radius", Interval::to(Value::Float(10.0)), 100);
        store.add_transition(a, "@effects.blur.radius", t);
        store.advance(0);
        store.advance(50);
        assert_eq!(blur.radius.get(), 5.0);
        store.advance(100);
        assert_eq!(blur.radius.get(), 10.0);
    }

    #[test]
    fn malformed_paths_are_plain_names() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        assert_eq!(
            store.property_by_path(a, "@effects.blur"),
            Err(PropertyError::Unknown("@effects.blur".to_owned()))
        );
        assert_eq!(store.property_by_path(a, "opacity"), Ok(Value::Uint8(255)));
    }
}
