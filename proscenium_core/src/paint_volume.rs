// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint volumes and frustum culling.
//!
//! A [`PaintVolume`] bounds everything an actor may draw, expressed as a
//! possibly-transformed box with eight vertices:
//!
//! ```text
//!        4 ────── 5
//!       /│       /│
//!      0 ────── 1 │
//!      │ 7 ─────│─6
//!      │/       │/
//!      3 ────── 2
//! ```
//!
//! Setters only maintain the *key* vertices 0, 1, 3 and 4; the rest are
//! derived lazily by [`PaintVolume::complete`]. Most actors are flat, so a
//! volume with zero depth only ever looks at the front four vertices.

use kurbo::Rect;

use crate::geometry::Point3;
use crate::transform::Transform3d;

/// Result of testing a volume against a set of clip frusta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CullResult {
    /// At least partially visible.
    In,
    /// Entirely outside every frustum.
    Out,
}

/// A bounding volume in some actor's (or the stage's) coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintVolume {
    vertices: [Point3; 8],
    is_empty: bool,
    is_axis_aligned: bool,
    is_complete: bool,
    is_2d: bool,
}

impl Default for PaintVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintVolume {
    /// An empty volume at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: [Point3::ZERO; 8],
            is_empty: true,
            is_axis_aligned: true,
            is_complete: true,
            is_2d: true,
        }
    }

    /// A flat volume covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut pv = Self::new();
        pv.set_origin(Point3::new(rect.x0, rect.y0, 0.0));
        pv.set_width(rect.width().max(0.0));
        pv.set_height(rect.height().max(0.0));
        pv
    }

    /// Whether the volume has no extent on any axis.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Whether the volume has zero depth.
    #[inline]
    #[must_use]
    pub const fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// Whether the key vertices still describe an axis-aligned box.
    #[inline]
    #[must_use]
    pub const fn is_axis_aligned(&self) -> bool {
        self.is_axis_aligned
    }

    /// Whether all eight vertices are up to date.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// The vertices that carry information: four for flat volumes, eight
    /// otherwise. Completes the volume first.
    #[must_use]
    pub fn vertices(&mut self) -> &[Point3] {
        self.complete();
        let n = self.vertex_count();
        &self.vertices[..n]
    }

    fn vertex_count(&self) -> usize {
        if self.is_2d { 4 } else { 8 }
    }

    /// The front top-left vertex.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point3 {
        self.vertices[0]
    }

    /// Moves the volume so that its origin lands on `origin`.
    pub fn set_origin(&mut self, origin: Point3) {
        let dx = origin.x - self.vertices[0].x;
        let dy = origin.y - self.vertices[0].y;
        let dz = origin.z - self.vertices[0].z;
        for i in [0, 1, 3, 4] {
            self.vertices[i].x += dx;
            self.vertices[i].y += dy;
            self.vertices[i].z += dz;
        }
        self.is_complete = false;
    }

    fn update_is_empty(&mut self) {
        let v = &self.vertices;
        self.is_empty = v[0].x == v[1].x && v[0].y == v[3].y && v[0].z == v[4].z;
    }

    fn reset_key_vertices_if_empty(&mut self) {
        if self.is_empty {
            let o = self.vertices[0];
            self.vertices[1] = o;
            self.vertices[3] = o;
            self.vertices[4] = o;
        }
    }

    /// Sets the extent along X. Negative widths are ignored with a warning.
    pub fn set_width(&mut self, width: f64) {
        if width < 0.0 {
            tracing::warn!(width, "paint volume width must be non-negative");
            return;
        }
        self.reset_key_vertices_if_empty();
        self.axis_align();
        self.vertices[1].x = self.vertices[0].x + width;
        self.is_complete = false;
        self.update_is_empty();
    }

    /// Sets the extent along Y. Negative heights are ignored with a warning.
    pub fn set_height(&mut self, height: f64) {
        if height < 0.0 {
            tracing::warn!(height, "paint volume height must be non-negative");
            return;
        }
        self.reset_key_vertices_if_empty();
        self.axis_align();
        self.vertices[3].y = self.vertices[0].y + height;
        self.is_complete = false;
        self.update_is_empty();
    }

    /// Sets the extent along Z. Negative depths are ignored with a warning.
    pub fn set_depth(&mut self, depth: f64) {
        if depth < 0.0 {
            tracing::warn!(depth, "paint volume depth must be non-negative");
            return;
        }
        self.reset_key_vertices_if_empty();
        self.axis_align();
        self.vertices[4].z = self.vertices[0].z + depth;
        self.is_complete = false;
        self.is_2d = depth == 0.0;
        self.update_is_empty();
    }

    /// Extent along X of the axis-aligned bounds.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty {
            return 0.0;
        }
        let aligned = self.aligned_copy();
        aligned.vertices[1].x - aligned.vertices[0].x
    }

    /// Extent along Y of the axis-aligned bounds.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty {
            return 0.0;
        }
        let aligned = self.aligned_copy();
        aligned.vertices[3].y - aligned.vertices[0].y
    }

    /// Extent along Z of the axis-aligned bounds.
    #[must_use]
    pub fn depth(&self) -> f64 {
        if self.is_empty {
            return 0.0;
        }
        let aligned = self.aligned_copy();
        aligned.vertices[4].z - aligned.vertices[0].z
    }

    fn aligned_copy(&self) -> Self {
        let mut tmp = *self;
        tmp.axis_align();
        tmp
    }

    /// Derives the non-key vertices from the key ones.
    pub fn complete(&mut self) {
        if self.is_empty || self.is_complete {
            return;
        }
        let v = &mut self.vertices;
        let l2r = (v[1].x - v[0].x, v[1].y - v[0].y, v[1].z - v[0].z);
        let t2b = (v[3].x - v[0].x, v[3].y - v[0].y, v[3].z - v[0].z);
        let add = |p: Point3, d: (f64, f64, f64)| Point3::new(p.x + d.0, p.y + d.1, p.z + d.2);

        v[2] = add(v[3], l2r);
        if !self.is_2d {
            v[5] = add(v[4], l2r);
            v[6] = add(v[5], t2b);
            v[7] = add(v[4], t2b);
        }
        self.is_complete = true;
    }

    /// Replaces a transformed volume by its axis-aligned bounds.
    pub fn axis_align(&mut self) {
        if self.is_empty || self.is_axis_aligned {
            return;
        }
        let v = &self.vertices;
        if v[0].x == v[1].x && v[0].y == v[3].y && v[0].z == v[4].z {
            self.is_axis_aligned = true;
            return;
        }
        self.complete();

        let count = self.vertex_count();
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..count] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        self.vertices[0] = min;
        self.vertices[1] = Point3::new(max.x, min.y, min.z);
        self.vertices[3] = Point3::new(min.x, max.y, min.z);
        self.vertices[4] = Point3::new(min.x, min.y, max.z);
        self.is_complete = false;
        self.is_axis_aligned = true;
        self.is_2d = max.z == min.z;
    }

    /// Min/max corners of the axis-aligned bounds.
    fn bounds3(&mut self) -> (Point3, Point3) {
        self.complete();
        let count = self.vertex_count();
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..count] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        (min, max)
    }

    /// Grows this volume to also enclose `other`.
    ///
    /// Empty volumes contribute nothing, not even their origin.
    pub fn union(&mut self, other: &Self) {
        if other.is_empty {
            return;
        }
        if self.is_empty {
            *self = *other;
            self.is_complete = false;
            return;
        }

        self.axis_align();
        let (a_min, a_max) = self.bounds3();
        let mut other = *other;
        other.axis_align();
        let (b_min, b_max) = other.bounds3();

        let min = Point3::new(
            a_min.x.min(b_min.x),
            a_min.y.min(b_min.y),
            a_min.z.min(b_min.z),
        );
        let max = Point3::new(
            a_max.x.max(b_max.x),
            a_max.y.max(b_max.y),
            a_max.z.max(b_max.z),
        );
        self.vertices[0] = min;
        self.vertices[1] = Point3::new(max.x, min.y, min.z);
        self.vertices[3] = Point3::new(min.x, max.y, min.z);
        self.vertices[4] = Point3::new(min.x, min.y, max.z);
        self.is_2d = max.z == min.z;
        self.is_empty = false;
        self.is_complete = false;
    }

    /// Grows this volume to also enclose a flat box.
    pub fn union_box(&mut self, rect: Rect) {
        self.union(&Self::from_rect(rect));
    }

    /// Transforms every vertex by `matrix` (with perspective divide).
    ///
    /// The result is generally no longer axis aligned.
    pub fn transform(&mut self, matrix: &Transform3d) {
        if self.is_empty {
            self.vertices[0] = matrix.transform_point3(self.vertices[0]);
            return;
        }
        self.complete();
        let count = self.vertex_count();
        for v in &mut self.vertices[..count] {
            *v = matrix.transform_point3(*v);
        }
        self.is_axis_aligned = false;
    }

    /// Projects the volume through `modelview` then `projection`, mapping
    /// normalized device coordinates into `viewport`.
    pub fn project(&mut self, modelview: &Transform3d, projection: &Transform3d, viewport: Rect) {
        let mvp = *projection * *modelview;
        let to_viewport = |p: Point3| {
            Point3::new(
                viewport.x0 + (p.x + 1.0) * viewport.width() / 2.0,
                viewport.y0 + (1.0 - p.y) * viewport.height() / 2.0,
                p.z,
            )
        };
        if self.is_empty {
            self.vertices[0] = to_viewport(mvp.transform_point3(self.vertices[0]));
            return;
        }
        self.complete();
        let count = self.vertex_count();
        for v in &mut self.vertices[..count] {
            *v = to_viewport(mvp.transform_point3(*v));
        }
        self.is_axis_aligned = false;
    }

    /// The 2-D bounding box of the (completed) vertices.
    ///
    /// An empty volume yields a zero-sized box at its origin.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        if self.is_empty {
            let o = self.vertices[0];
            return Rect::new(o.x, o.y, o.x, o.y);
        }
        let mut tmp = *self;
        let (min, max) = tmp.bounds3();
        Rect::new(min.x, min.y, max.x, max.y)
    }

    /// Pixel-aligned 2-D bounds suitable for a redraw clip: flat volumes
    /// snap outward to whole pixels, deep ones get one more pixel of room
    /// for sub-pixel placement.
    #[must_use]
    pub fn paint_box(&self) -> Rect {
        let b = self.bounding_box();
        let snapped = Rect::new(
            round_to_256ths(b.x0).floor(),
            round_to_256ths(b.y0).floor(),
            round_to_256ths(b.x1).ceil(),
            round_to_256ths(b.y1).ceil(),
        );
        if self.is_2d {
            snapped
        } else {
            snapped.inflate(1.0, 1.0)
        }
    }

    /// Tests the volume against `frustum`.
    ///
    /// The volume must already be in the frustum's coordinate space. Empty
    /// volumes are always outside.
    #[must_use]
    pub fn cull(&self, frustum: &Frustum) -> CullResult {
        if self.is_empty {
            return CullResult::Out;
        }
        let mut tmp = *self;
        let (min, max) = tmp.bounds3();
        if frustum.intersects_box(min, max) {
            CullResult::In
        } else {
            CullResult::Out
        }
    }
}

fn round_to_256ths(v: f64) -> f64 {
    (v * 256.0).round() / 256.0
}

/// A plane `normal · p + d = 0` whose normal points into the kept half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Plane normal.
    pub normal: Point3,
    /// Signed offset.
    pub d: f64,
}

impl Plane {
    /// Builds a normalized plane from its four coefficients.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        let len = (a * a + b * b + c * c).sqrt();
        if len == 0.0 {
            return Self {
                normal: Point3::new(a, b, c),
                d,
            };
        }
        Self {
            normal: Point3::new(a / len, b / len, c / len),
            d: d / len,
        }
    }

    /// Signed distance from `p`; positive on the kept side.
    #[inline]
    #[must_use]
    pub fn distance(&self, p: Point3) -> f64 {
        self.normal.x * p.x + self.normal.y * p.y + self.normal.z * p.z + self.d
    }
}

/// A convex region bounded by six planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    /// Left, right, top, bottom, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// An axis-aligned 2-D clip rectangle, unbounded in depth.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        const FAR: f64 = 1.0e9;
        Self {
            planes: [
                Plane::new(1.0, 0.0, 0.0, -rect.x0),
                Plane::new(-1.0, 0.0, 0.0, rect.x1),
                Plane::new(0.0, 1.0, 0.0, -rect.y0),
                Plane::new(0.0, -1.0, 0.0, rect.y1),
                Plane::new(0.0, 0.0, 1.0, FAR),
                Plane::new(0.0, 0.0, -1.0, FAR),
            ],
        }
    }

    /// Extracts the view frustum of a combined projection × modelview
    /// matrix.
    #[must_use]
    pub fn from_matrix(m: &Transform3d) -> Self {
        let row = |i: usize| [m.get(i, 0), m.get(i, 1), m.get(i, 2), m.get(i, 3)];
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        let add = |a: [f64; 4], b: [f64; 4]| Plane::new(a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]);
        let sub = |a: [f64; 4], b: [f64; 4]| Plane::new(a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]);
        Self {
            planes: [
                add(r3, r0),
                sub(r3, r0),
                sub(r3, r1),
                add(r3, r1),
                add(r3, r2),
                sub(r3, r2),
            ],
        }
    }

    /// Whether the axis-aligned box `[min, max]` is at least partially
    /// inside.
    #[must_use]
    pub fn intersects_box(&self, min: Point3, max: Point3) -> bool {
        self.planes.iter().all(|plane| {
            let n = plane.normal;
            let p = Point3::new(
                if n.x >= 0.0 { max.x } else { min.x },
                if n.y >= 0.0 { max.y } else { min.y },
                if n.z >= 0.0 { max.z } else { min.z },
            );
            plane.distance(p) >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_volume_is_empty() {
        let pv = PaintVolume::new();
        assert!(pv.is_empty());
        assert_eq!(pv.width(), 0.0);
    }

    #[test]
    fn setting_size_makes_non_empty() {
        let mut pv = PaintVolume::new();
        pv.set_width(10.0);
        pv.set_height(5.0);
        assert!(!pv.is_empty());
        assert!(pv.is_2d());
        assert_eq!(pv.bounding_box(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn negative_width_is_ignored() {
        let mut pv = PaintVolume::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        pv.set_width(-1.0);
        assert_eq!(pv.width(), 4.0);
    }

    #[test]
    fn union_ignores_empty_origin() {
        let mut a = PaintVolume::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        a.union(&PaintVolume::new());
        assert_eq!(a.bounding_box(), Rect::new(10.0, 10.0, 20.0, 20.0));

        let mut empty = PaintVolume::new();
        empty.union(&a);
        assert_eq!(empty.bounding_box(), Rect::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn union_encloses_both() {
        let mut a = PaintVolume::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        a.union_box(Rect::new(5.0, -5.0, 30.0, 8.0));
        assert_eq!(a.bounding_box(), Rect::new(0.0, -5.0, 30.0, 10.0));
    }

    #[test]
    fn union_with_depth_is_3d() {
        let mut a = PaintVolume::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut b = PaintVolume::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        b.set_depth(4.0);
        a.union(&b);
        assert!(!a.is_2d());
        assert_eq!(a.depth(), 4.0);
    }

    #[test]
    fn transform_then_align() {
        let mut pv = PaintVolume::from_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        pv.transform(&Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2));
        assert!(!pv.is_axis_aligned());
        let b = pv.bounding_box();
        assert!((b.x0 + 20.0).abs() < 1e-9, "{b:?}");
        assert!((b.x1 - 0.0).abs() < 1e-9, "{b:?}");
        assert!((b.y1 - 10.0).abs() < 1e-9, "{b:?}");
        pv.axis_align();
        assert!(pv.is_axis_aligned());
        assert!((pv.width() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn complete_fills_derived_vertices() {
        let mut pv = PaintVolume::from_rect(Rect::new(1.0, 2.0, 4.0, 6.0));
        assert!(!pv.is_complete());
        let v = pv.vertices().to_vec();
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], Point3::new(4.0, 6.0, 0.0));
    }

    #[test]
    fn paint_box_snaps_outward() {
        let pv = PaintVolume::from_rect(Rect::new(0.25, 0.5, 10.5, 10.75));
        assert_eq!(pv.paint_box(), Rect::new(0.0, 0.0, 11.0, 11.0));
    }

    #[test]
    fn cull_in_and_out() {
        let frustum = Frustum::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let inside = PaintVolume::from_rect(Rect::new(90.0, 90.0, 120.0, 120.0));
        let outside = PaintVolume::from_rect(Rect::new(200.0, 0.0, 220.0, 20.0));
        assert_eq!(inside.cull(&frustum), CullResult::In);
        assert_eq!(outside.cull(&frustum), CullResult::Out);
        assert_eq!(PaintVolume::new().cull(&frustum), CullResult::Out);
    }

    #[test]
    fn frustum_from_orthographic_matrix() {
        // Maps [0, 100] x [0, 100] onto [-1, 1].
        let m = Transform3d::from_translation(-1.0, -1.0, 0.0)
            * Transform3d::from_scale(0.02, 0.02, 0.001);
        let f = Frustum::from_matrix(&m);
        assert!(f.intersects_box(Point3::new(10.0, 10.0, 0.0), Point3::new(20.0, 20.0, 0.0)));
        assert!(!f.intersects_box(Point3::new(110.0, 10.0, 0.0), Point3::new(120.0, 20.0, 0.0)));
    }
}
