// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property identifiers and boxed values.
//!
//! Every observable actor property has a [`Property`] variant with a
//! canonical kebab-case name. Reading and writing by name goes through
//! [`Value`], the boxed representation also used by transition intervals.

use kurbo::{Point, Rect, Size};

use crate::actor::ActorId;
use crate::error::PropertyError;
use crate::geometry::{
    ActorAlign, Color, ContentGravity, ContentRepeat, Point3, RequestMode, ScalingFilter, lerp_rect,
    lerp_u8,
};
use crate::transform::Transform3d;

/// An actor property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// Horizontal position in the parent.
    X,
    /// Vertical position in the parent.
    Y,
    /// Position in the parent.
    Position,
    /// Width of the actor.
    Width,
    /// Height of the actor.
    Height,
    /// Size of the actor.
    Size,
    /// Position forced on the X axis.
    FixedX,
    /// Position forced on the Y axis.
    FixedY,
    /// Whether the fixed position is used.
    FixedPositionSet,
    /// Forced minimum width.
    MinWidth,
    /// Whether the forced minimum width is used.
    MinWidthSet,
    /// Forced minimum height.
    MinHeight,
    /// Whether the forced minimum height is used.
    MinHeightSet,
    /// Forced natural width.
    NaturalWidth,
    /// Whether the forced natural width is used.
    NaturalWidthSet,
    /// Forced natural height.
    NaturalHeight,
    /// Whether the forced natural height is used.
    NaturalHeightSet,
    /// Geometry negotiation mode.
    RequestMode,
    /// The box assigned by the parent.
    Allocation,
    /// Position on the Z axis.
    ZPosition,
    /// Explicit clip in actor coordinates.
    ClipRect,
    /// Whether an explicit clip is set.
    HasClip,
    /// Clip painting to the allocation.
    ClipToAllocation,
    /// Opacity, 0 to 255.
    Opacity,
    /// Whether the actor should be shown.
    Visible,
    /// Whether the actor will be painted.
    Mapped,
    /// Whether backend resources may exist.
    Realized,
    /// Whether the actor takes part in picking.
    Reactive,
    /// Show the actor when it gets a parent.
    ShowOnSetParent,
    /// Normalized transformation center.
    PivotPoint,
    /// Z component of the transformation center.
    PivotPointZ,
    /// Scale factor on the X axis.
    ScaleX,
    /// Scale factor on the Y axis.
    ScaleY,
    /// Scale factor on the Z axis.
    ScaleZ,
    /// Rotation around the X axis, in degrees.
    RotationAngleX,
    /// Rotation around the Y axis, in degrees.
    RotationAngleY,
    /// Rotation around the Z axis, in degrees.
    RotationAngleZ,
    /// Extra translation on the X axis.
    TranslationX,
    /// Extra translation on the Y axis.
    TranslationY,
    /// Extra translation on the Z axis.
    TranslationZ,
    /// Matrix overriding pivot, scale, rotation and translation.
    Transform,
    /// Whether the override matrix is used.
    TransformSet,
    /// Matrix applied on top of every child.
    ChildTransform,
    /// Whether the child matrix is used.
    ChildTransformSet,
    /// Space above the actor.
    MarginTop,
    /// Space right of the actor.
    MarginRight,
    /// Space below the actor.
    MarginBottom,
    /// Space left of the actor.
    MarginLeft,
    /// Horizontal alignment inside the allocation.
    XAlign,
    /// Vertical alignment inside the allocation.
    YAlign,
    /// Request extra horizontal space.
    XExpand,
    /// Request extra vertical space.
    YExpand,
    /// Color painted behind the content.
    BackgroundColor,
    /// Whether the background color is painted.
    BackgroundColorSet,
    /// Placement of the content.
    ContentGravity,
    /// Where the content is painted.
    ContentBox,
    /// Filter used when content shrinks.
    MinificationFilter,
    /// Filter used when content grows.
    MagnificationFilter,
    /// Tiling policy of the content.
    ContentRepeat,
    /// First child in paint order.
    FirstChild,
    /// Last child in paint order.
    LastChild,
}

impl Property {
    /// Every property, in declaration order.
    pub const ALL: &[Self] = &[
        Self::X,
        Self::Y,
        Self::Position,
        Self::Width,
        Self::Height,
        Self::Size,
        Self::FixedX,
        Self::FixedY,
        Self::FixedPositionSet,
        Self::MinWidth,
        Self::MinWidthSet,
        Self::MinHeight,
        Self::MinHeightSet,
        Self::NaturalWidth,
        Self::NaturalWidthSet,
        Self::NaturalHeight,
        Self::NaturalHeightSet,
        Self::RequestMode,
        Self::Allocation,
        Self::ZPosition,
        Self::ClipRect,
        Self::HasClip,
        Self::ClipToAllocation,
        Self::Opacity,
        Self::Visible,
        Self::Mapped,
        Self::Realized,
        Self::Reactive,
        Self::ShowOnSetParent,
        Self::PivotPoint,
        Self::PivotPointZ,
        Self::ScaleX,
        Self::ScaleY,
        Self::ScaleZ,
        Self::RotationAngleX,
        Self::RotationAngleY,
        Self::RotationAngleZ,
        Self::TranslationX,
        Self::TranslationY,
        Self::TranslationZ,
        Self::Transform,
        Self::TransformSet,
        Self::ChildTransform,
        Self::ChildTransformSet,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::XAlign,
        Self::YAlign,
        Self::XExpand,
        Self::YExpand,
        Self::BackgroundColor,
        Self::BackgroundColorSet,
        Self::ContentGravity,
        Self::ContentBox,
        Self::MinificationFilter,
        Self::MagnificationFilter,
        Self::ContentRepeat,
        Self::FirstChild,
        Self::LastChild,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Position => "position",
            Self::Width => "width",
            Self::Height => "height",
            Self::Size => "size",
            Self::FixedX => "fixed-x",
            Self::FixedY => "fixed-y",
            Self::FixedPositionSet => "fixed-position-set",
            Self::MinWidth => "min-width",
            Self::MinWidthSet => "min-width-set",
            Self::MinHeight => "min-height",
            Self::MinHeightSet => "min-height-set",
            Self::NaturalWidth => "natural-width",
            Self::NaturalWidthSet => "natural-width-set",
            Self::NaturalHeight => "natural-height",
            Self::NaturalHeightSet => "natural-height-set",
            Self::RequestMode => "request-mode",
            Self::Allocation => "allocation",
            Self::ZPosition => "z-position",
            Self::ClipRect => "clip-rect",
            Self::HasClip => "has-clip",
            Self::ClipToAllocation => "clip-to-allocation",
            Self::Opacity => "opacity",
            Self::Visible => "visible",
            Self::Mapped => "mapped",
            Self::Realized => "realized",
            Self::Reactive => "reactive",
            Self::ShowOnSetParent => "show-on-set-parent",
            Self::PivotPoint => "pivot-point",
            Self::PivotPointZ => "pivot-point-z",
            Self::ScaleX => "scale-x",
            Self::ScaleY => "scale-y",
            Self::ScaleZ => "scale-z",
            Self::RotationAngleX => "rotation-angle-x",
            Self::RotationAngleY => "rotation-angle-y",
            Self::RotationAngleZ => "rotation-angle-z",
            Self::TranslationX => "translation-x",
            Self::TranslationY => "translation-y",
            Self::TranslationZ => "translation-z",
            Self::Transform => "transform",
            Self::TransformSet => "transform-set",
            Self::ChildTransform => "child-transform",
            Self::ChildTransformSet => "child-transform-set",
            Self::MarginTop => "margin-top",
            Self::MarginRight => "margin-right",
            Self::MarginBottom => "margin-bottom",
            Self::MarginLeft => "margin-left",
            Self::XAlign => "x-align",
            Self::YAlign => "y-align",
            Self::XExpand => "x-expand",
            Self::YExpand => "y-expand",
            Self::BackgroundColor => "background-color",
            Self::BackgroundColorSet => "background-color-set",
            Self::ContentGravity => "content-gravity",
            Self::ContentBox => "content-box",
            Self::MinificationFilter => "minification-filter",
            Self::MagnificationFilter => "magnification-filter",
            Self::ContentRepeat => "content-repeat",
            Self::FirstChild => "first-child",
            Self::LastChild => "last-child",
        }
    }

    /// Looks a property up by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Kind of [`Value`] the property holds.
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::X
            | Self::Y
            | Self::Width
            | Self::Height
            | Self::FixedX
            | Self::FixedY
            | Self::MinWidth
            | Self::MinHeight
            | Self::NaturalWidth
            | Self::NaturalHeight
            | Self::ZPosition
            | Self::PivotPointZ
            | Self::ScaleX
            | Self::ScaleY
            | Self::ScaleZ
            | Self::RotationAngleX
            | Self::RotationAngleY
            | Self::RotationAngleZ
            | Self::TranslationX
            | Self::TranslationY
            | Self::TranslationZ
            | Self::MarginTop
            | Self::MarginRight
            | Self::MarginBottom
            | Self::MarginLeft => ValueKind::Float,
            Self::Position
            | Self::PivotPoint => ValueKind::Point,
            Self::Size => ValueKind::Size,
            Self::FixedPositionSet
            | Self::MinWidthSet
            | Self::MinHeightSet
            | Self::NaturalWidthSet
            | Self::NaturalHeightSet
            | Self::HasClip
            | Self::ClipToAllocation
            | Self::Visible
            | Self::Mapped
            | Self::Realized
            | Self::Reactive
            | Self::ShowOnSetParent
            | Self::TransformSet
            | Self::ChildTransformSet
            | Self::XExpand
            | Self::YExpand
            | Self::BackgroundColorSet => ValueKind::Bool,
            Self::RequestMode => ValueKind::RequestMode,
            Self::Allocation
            | Self::ClipRect
            | Self::ContentBox => ValueKind::Rect,
            Self::Opacity => ValueKind::Uint8,
            Self::Transform
            | Self::ChildTransform => ValueKind::Matrix,
            Self::XAlign
            | Self::YAlign => ValueKind::Align,
            Self::BackgroundColor => ValueKind::Color,
            Self::ContentGravity => ValueKind::Gravity,
            Self::MinificationFilter
            | Self::MagnificationFilter => ValueKind::Filter,
            Self::ContentRepeat => ValueKind::Repeat,
            Self::FirstChild
            | Self::LastChild => ValueKind::Actor,
        }
    }

    /// Whether setting the property may go through an implicit transition.
    #[must_use]
    pub const fn is_animatable(self) -> bool {
        matches!(
            self,
            Self::X
                | Self::Y
                | Self::Position
                | Self::Width
                | Self::Height
                | Self::Size
                | Self::FixedX
                | Self::FixedY
                | Self::MinWidth
                | Self::MinHeight
                | Self::NaturalWidth
                | Self::NaturalHeight
                | Self::Allocation
                | Self::ZPosition
                | Self::ClipRect
                | Self::Opacity
                | Self::PivotPoint
                | Self::PivotPointZ
                | Self::ScaleX
                | Self::ScaleY
                | Self::ScaleZ
                | Self::RotationAngleX
                | Self::RotationAngleY
                | Self::RotationAngleZ
                | Self::TranslationX
                | Self::TranslationY
                | Self::TranslationZ
                | Self::Transform
                | Self::ChildTransform
                | Self::MarginTop
                | Self::MarginRight
                | Self::MarginBottom
                | Self::MarginLeft
                | Self::BackgroundColor
                | Self::ContentBox
        )
    }

    /// Whether the property can only be read from outside the actor.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::Allocation
                | Self::HasClip
                | Self::Mapped
                | Self::Realized
                | Self::TransformSet
                | Self::ChildTransformSet
                | Self::BackgroundColorSet
                | Self::ContentBox
                | Self::FirstChild
                | Self::LastChild
        )
    }
}

/// The kind of a [`Value`], used for type checks and error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Float`].
    Float,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Uint8`].
    Uint8,
    /// [`Value::Color`].
    Color,
    /// [`Value::Point`].
    Point,
    /// [`Value::Point3`].
    Point3,
    /// [`Value::Size`].
    Size,
    /// [`Value::Rect`].
    Rect,
    /// [`Value::Matrix`].
    Matrix,
    /// [`Value::Align`].
    Align,
    /// [`Value::Gravity`].
    Gravity,
    /// [`Value::RequestMode`].
    RequestMode,
    /// [`Value::Filter`].
    Filter,
    /// [`Value::Repeat`].
    Repeat,
    /// [`Value::Actor`].
    Actor,
}

/// A boxed property value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// A scalar.
    Float(f64),
    /// A flag.
    Bool(bool),
    /// A byte, used for opacity.
    Uint8(u8),
    /// A color.
    Color(Color),
    /// A 2-D point.
    Point(Point),
    /// A 3-D point.
    Point3(Point3),
    /// A 2-D size.
    Size(Size),
    /// A box.
    Rect(Rect),
    /// A 4×4 matrix.
    Matrix(Transform3d),
    /// An alignment.
    Align(ActorAlign),
    /// A content gravity.
    Gravity(ContentGravity),
    /// A request mode.
    RequestMode(RequestMode),
    /// A scaling filter.
    Filter(ScalingFilter),
    /// A repeat policy.
    Repeat(ContentRepeat),
    /// A reference to another actor, or none.
    Actor(Option<ActorId>),
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Uint8(_) => ValueKind::Uint8,
            Self::Color(_) => ValueKind::Color,
            Self::Point(_) => ValueKind::Point,
            Self::Point3(_) => ValueKind::Point3,
            Self::Size(_) => ValueKind::Size,
            Self::Rect(_) => ValueKind::Rect,
            Self::Matrix(_) => ValueKind::Matrix,
            Self::Align(_) => ValueKind::Align,
            Self::Gravity(_) => ValueKind::Gravity,
            Self::RequestMode(_) => ValueKind::RequestMode,
            Self::Filter(_) => ValueKind::Filter,
            Self::Repeat(_) => ValueKind::Repeat,
            Self::Actor(_) => ValueKind::Actor,
        }
    }

    /// Interpolates towards `other` at `t`.
    ///
    /// Numeric and geometric values are blended; discrete values switch to
    /// `other` once `t` passes one half. Returns `None` when the kinds
    /// differ.
    #[must_use]
    pub fn interpolate(&self, other: &Self, t: f64) -> Option<Self> {
        let step = |a: Self, b: Self| if t > 0.5 { b } else { a };
        Some(match (*self, *other) {
            (Self::Float(a), Self::Float(b)) => Self::Float(a + (b - a) * t),
            (Self::Uint8(a), Self::Uint8(b)) => Self::Uint8(lerp_u8(a, b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            (Self::Point(a), Self::Point(b)) => Self::Point(a.lerp(b, t)),
            (Self::Point3(a), Self::Point3(b)) => Self::Point3(a.lerp(b, t)),
            (Self::Size(a), Self::Size(b)) => Self::Size(Size::new(
                a.width + (b.width - a.width) * t,
                a.height + (b.height - a.height) * t,
            )),
            (Self::Rect(a), Self::Rect(b)) => Self::Rect(lerp_rect(a, b, t)),
            (Self::Matrix(a), Self::Matrix(b)) => Self::Matrix(a.lerp(&b, t)),
            (a, b) if a.kind() == b.kind() => step(a, b),
            _ => return None,
        })
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the box, if this is one.
    #[must_use]
    pub const fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Uint8(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Self::Point(v)
    }
}

impl From<Size> for Value {
    fn from(v: Size) -> Self {
        Self::Size(v)
    }
}

impl From<Rect> for Value {
    fn from(v: Rect) -> Self {
        Self::Rect(v)
    }
}

impl From<Transform3d> for Value {
    fn from(v: Transform3d) -> Self {
        Self::Matrix(v)
    }
}

/// An object whose named properties can be driven by a transition.
///
/// Implemented by layout managers, content delegates and meta objects so
/// that `@layout.…`, `@content.…` and `@section.name.…` paths can be
/// animated. Implementations use interior mutability; the store only holds
/// shared references.
pub trait Animatable {
    /// Current value of `name`, or `None` if there is no such property.
    fn animatable_property(&self, name: &str) -> Option<Value> {
        _ = name;
        None
    }

    /// Writes an (interpolated) value.
    fn set_final_state(&self, name: &str, value: &Value) -> Result<(), PropertyError> {
        _ = value;
        Err(PropertyError::Unknown(name.to_owned()))
    }
}

/// One of the three named meta-object groups on an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaSection {
    /// `@actions`.
    Actions,
    /// `@constraints`.
    Constraints,
    /// `@effects`.
    Effects,
}

impl MetaSection {
    /// The section keyword as it appears in a path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Constraints => "constraints",
            Self::Effects => "effects",
        }
    }
}

/// A parsed transition or property name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyPath<'a> {
    /// A property of the actor itself.
    Plain(&'a str),
    /// `@layout.<property>`: a property of the layout manager.
    Layout(&'a str),
    /// `@content.<property>`: a property of the content delegate.
    Content(&'a str),
    /// `@<section>.<name>.<property>`: a property of a meta object.
    Meta {
        /// Which group.
        section: MetaSection,
        /// Name of the meta object inside the group.
        name: &'a str,
        /// Property of the meta object.
        property: &'a str,
    },
}

impl<'a> PropertyPath<'a> {
    /// Parses `path`.
    ///
    /// Anything that does not match one of the `@` forms exactly, including
    /// malformed `@` strings, is a plain name.
    #[must_use]
    pub fn parse(path: &'a str) -> Self {
        Self::parse_decorated(path).unwrap_or(Self::Plain(path))
    }

    fn parse_decorated(path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix('@')?;
        let segments: Vec<&'a str> = rest.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        match segments.as_slice() {
            ["layout", property] => Some(Self::Layout(*property)),
            ["content", property] => Some(Self::Content(*property)),
            [section, name, property] => {
                let section = match *section {
                    "actions" => MetaSection::Actions,
                    "constraints" => MetaSection::Constraints,
                    "effects" => MetaSection::Effects,
                    _ => return None,
                };
                Some(Self::Meta {
                    section,
                    name: *name,
                    property: *property,
                })
            }
            _ => None,
        }
    }

    /// The transition-name prefix shared by every property of a meta object.
    #[must_use]
    pub fn meta_prefix(section: MetaSection, name: &str) -> String {
        format!("@{}.{}.", section.as_str(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &p in Property::ALL {
            assert_eq!(Property::from_name(p.name()), Some(p), "{p:?}");
        }
        assert_eq!(Property::from_name("no-such-thing"), None);
    }

    #[test]
    fn read_only_allocation_is_still_animatable() {
        assert!(Property::Allocation.is_animatable());
        assert!(Property::Allocation.is_read_only());
        assert!(!Property::Visible.is_animatable());
    }

    #[test]
    fn float_interpolation() {
        let v = Value::Float(0.0).interpolate(&Value::Float(100.0), 0.25);
        assert_eq!(v, Some(Value::Float(25.0)));
    }

    #[test]
    fn discrete_values_step_at_half() {
        let a = Value::Bool(false);
        let b = Value::Bool(true);
        assert_eq!(a.interpolate(&b, 0.5), Some(a));
        assert_eq!(a.interpolate(&b, 0.6), Some(b));
    }

    #[test]
    fn mismatched_kinds_do_not_interpolate() {
        assert_eq!(Value::Float(0.0).interpolate(&Value::Bool(true), 0.5), None);
    }

    #[test]
    fn parses_layout_and_content() {
        assert_eq!(PropertyPath::parse("@layout.spacing"), PropertyPath::Layout("spacing"));
        assert_eq!(PropertyPath::parse("@content.color"), PropertyPath::Content("color"));
    }

    #[test]
    fn parses_meta_paths() {
        assert_eq!(
            PropertyPath::parse("@effects.blur.radius"),
            PropertyPath::Meta {
                section: MetaSection::Effects,
                name: "blur",
                property: "radius",
            }
        );
    }

    #[test]
    fn malformed_paths_fall_back_to_plain() {
        for s in [
            "@layout",
            "@layout.a.b",
            "@content.a.b",
            "@effects.blur",
            "@effects.blur.radius.extra",
            "@widgets.a.b",
            "@actions..x",
            "x",
        ] {
            assert_eq!(PropertyPath::parse(s), PropertyPath::Plain(s), "{s}");
        }
    }

    #[test]
    fn meta_prefix_format() {
        assert_eq!(
            PropertyPath::meta_prefix(MetaSection::Constraints, "snap"),
            "@constraints.snap."
        );
    }
}
