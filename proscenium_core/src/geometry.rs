// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometry and styling value types shared by the actor tree.
//!
//! Two-dimensional boxes, points and sizes come from [`kurbo`]; an actor's
//! allocation is a [`kurbo::Rect`] expressed in its parent's coordinate
//! space. This module adds the few types `kurbo` does not cover.

use kurbo::{Rect, Size};

/// A point in 3-D space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the point with its `z` dropped.
    #[inline]
    #[must_use]
    pub const fn to_2d(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// Linear interpolation towards `other`.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Component-wise comparison within `epsilon`.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl From<kurbo::Point> for Point3 {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y, 0.0)
    }
}

/// Extra space around an actor, added to its preferred size and removed
/// from the box it is allocated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    /// Space above.
    pub top: f64,
    /// Space to the right.
    pub right: f64,
    /// Space below.
    pub bottom: f64,
    /// Space to the left.
    pub left: f64,
}

impl Margin {
    /// No margin on any side.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Same margin on every side.
    #[must_use]
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Sum of the left and right margins.
    #[inline]
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of the top and bottom margins.
    #[inline]
    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// How an actor fills the space its parent gives it along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActorAlign {
    /// Stretch to fill the whole allocation.
    #[default]
    Fill,
    /// Natural size, pinned to the start edge.
    Start,
    /// Natural size, centered.
    Center,
    /// Natural size, pinned to the end edge.
    End,
}

/// Which axis a size request or expansion refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The X axis.
    Horizontal,
    /// The Y axis.
    Vertical,
}

/// Geometry management mode of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestMode {
    /// Width is negotiated first; height is asked for that width.
    #[default]
    HeightForWidth,
    /// Height is negotiated first; width is asked for that height.
    WidthForHeight,
    /// The content delegate's intrinsic size decides both axes.
    ContentSize,
}

/// Where the content of an actor sits inside its allocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentGravity {
    /// Top-left corner.
    TopLeft,
    /// Top edge, centered horizontally.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge, centered vertically.
    Left,
    /// Centered.
    Center,
    /// Right edge, centered vertically.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge, centered horizontally.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
    /// Stretched to fill the allocation, ignoring aspect ratio.
    #[default]
    ResizeFill,
    /// Scaled to fit the allocation while keeping the aspect ratio.
    ResizeAspect,
}

/// Texture filter used when content is scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalingFilter {
    /// Linear filtering.
    #[default]
    Linear,
    /// Nearest-neighbour filtering.
    Nearest,
    /// Trilinear filtering with mipmaps.
    Trilinear,
}

bitflags::bitflags! {
    /// Axes along which content is tiled instead of stretched.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContentRepeat: u8 {
        /// Repeat along the X axis.
        const X_AXIS = 1 << 0;
        /// Repeat along the Y axis.
        const Y_AXIS = 1 << 1;
    }
}

/// An 8-bit-per-channel, straight alpha color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Creates a color from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise interpolation towards `other`, rounded to nearest.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: lerp_u8(self.a, other.a, t),
        }
    }
}

/// Interpolates between two bytes, rounding and saturating.
#[must_use]
pub fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped to the u8 range first"
    )]
    let out = v.round().clamp(0.0, 255.0) as u8;
    out
}

/// Interpolates every edge of a box.
#[must_use]
pub fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        a.x0 + (b.x0 - a.x0) * t,
        a.y0 + (b.y0 - a.y0) * t,
        a.x1 + (b.x1 - a.x1) * t,
        a.y1 + (b.y1 - a.y1) * t,
    )
}

/// Box equality within a small tolerance, used to decide whether an
/// allocation actually changed.
#[must_use]
pub fn rect_approx_eq(a: Rect, b: Rect) -> bool {
    const EPS: f64 = 1e-6;
    (a.x0 - b.x0).abs() < EPS
        && (a.y0 - b.y0).abs() < EPS
        && (a.x1 - b.x1).abs() < EPS
        && (a.y1 - b.y1).abs() < EPS
}

/// Places `content` (a preferred size) inside `alloc_size` according to
/// `gravity`, returning the content box relative to the allocation origin.
#[must_use]
pub fn content_box(gravity: ContentGravity, alloc_size: Size, content: Size) -> Rect {
    let (aw, ah) = (alloc_size.width, alloc_size.height);
    let (cw, ch) = (content.width, content.height);
    let at = |x: f64, y: f64| Rect::new(x, y, x + cw, y + ch);
    match gravity {
        ContentGravity::TopLeft => at(0.0, 0.0),
        ContentGravity::Top => at((aw - cw) / 2.0, 0.0),
        ContentGravity::TopRight => at(aw - cw, 0.0),
        ContentGravity::Left => at(0.0, (ah - ch) / 2.0),
        ContentGravity::Center => at((aw - cw) / 2.0, (ah - ch) / 2.0),
        ContentGravity::Right => at(aw - cw, (ah - ch) / 2.0),
        ContentGravity::BottomLeft => at(0.0, ah - ch),
        ContentGravity::Bottom => at((aw - cw) / 2.0, ah - ch),
        ContentGravity::BottomRight => at(aw - cw, ah - ch),
        ContentGravity::ResizeFill => Rect::new(0.0, 0.0, aw, ah),
        ContentGravity::ResizeAspect => {
            if cw <= 0.0 || ch <= 0.0 {
                return Rect::new(0.0, 0.0, aw, ah);
            }
            let r_c = cw / ch;
            let (w, h) = if aw / ah.max(f64::MIN_POSITIVE) > r_c {
                (ah * r_c, ah)
            } else {
                (aw, aw / r_c)
            };
            let x = (aw - w) / 2.0;
            let y = (ah - h) / 2.0;
            Rect::new(x, y, x + w, y + h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_sums() {
        let m = Margin {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(m.horizontal(), 6.0);
        assert_eq!(m.vertical(), 4.0);
    }

    #[test]
    fn color_lerp_rounds() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(c, Color::rgba(128, 128, 128, 255));
    }

    #[test]
    fn content_box_center() {
        let b = content_box(
            ContentGravity::Center,
            Size::new(100.0, 50.0),
            Size::new(20.0, 10.0),
        );
        assert_eq!(b, Rect::new(40.0, 20.0, 60.0, 30.0));
    }

    #[test]
    fn content_box_aspect_letterboxes() {
        let b = content_box(
            ContentGravity::ResizeAspect,
            Size::new(200.0, 100.0),
            Size::new(10.0, 10.0),
        );
        assert_eq!(b, Rect::new(50.0, 0.0, 150.0, 100.0));
    }

    #[test]
    fn rect_lerp_midpoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 30.0, 30.0);
        assert_eq!(lerp_rect(a, b, 0.5), Rect::new(5.0, 5.0, 20.0, 20.0));
    }
}
