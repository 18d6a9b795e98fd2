// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transform pipeline.
//!
//! An actor's local matrix maps its own coordinates into its parent's. It is
//! composed from the allocation origin, the pivot point, scale, rotation,
//! translation and z-position, or from an explicit override matrix, and
//! finally the parent's child transform. The stage-relative matrix chains
//! local matrices up to the stage. Both are cached; the stage-relative cache
//! of a whole subtree is invalidated through the
//! [`ABSOLUTE_GEOMETRY`](crate::dirty::ABSOLUTE_GEOMETRY) channel.

use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::geometry::Point3;
use crate::property::{Property, Value};
use crate::transform::Transform3d;

use super::flags::PrivateFlags;
use super::id::INVALID;
use super::{ActorId, ActorStore};

/// Tolerance for treating two cached matrices as the same.
const MATRIX_EPSILON: f64 = 1e-6;

/// An axis of rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotateAxis {
    /// Around the X axis.
    X,
    /// Around the Y axis.
    Y,
    /// Around the Z axis.
    Z,
}

impl RotateAxis {
    const fn property(self) -> Property {
        match self {
            Self::X => Property::RotationAngleX,
            Self::Y => Property::RotationAngleY,
            Self::Z => Property::RotationAngleZ,
        }
    }
}

/// Maps a window-space point into the rectangle `(0, 0, du, dv)` given the
/// projected corners of that rectangle (top-left, top-right, bottom-left,
/// bottom-right).
///
/// This is Heckbert's quad-to-quad inversion specialized to a rectangular
/// source. Returns `None` for degenerate quads.
fn invert_quad(v: &[Point3; 4], du: f64, dv: f64, point: Point) -> Option<Point> {
    if du == 0.0 || dv == 0.0 {
        return None;
    }
    let det2 = |a: f64, b: f64, c: f64, d: f64| a * d - b * c;

    let mut rq = [[0.0_f64; 3]; 3];
    let px = v[0].x - v[1].x + v[3].x - v[2].x;
    let py = v[0].y - v[1].y + v[3].y - v[2].y;

    if px.abs() < 1.0 && py.abs() < 1.0 {
        // Affine.
        rq[0][0] = v[1].x - v[0].x;
        rq[1][0] = v[3].x - v[1].x;
        rq[2][0] = v[0].x;
        rq[0][1] = v[1].y - v[0].y;
        rq[1][1] = v[3].y - v[1].y;
        rq[2][1] = v[0].y;
        rq[0][2] = 0.0;
        rq[1][2] = 0.0;
        rq[2][2] = 1.0;
    } else {
        let dx1 = v[1].x - v[3].x;
        let dx2 = v[2].x - v[3].x;
        let dy1 = v[1].y - v[3].y;
        let dy2 = v[2].y - v[3].y;
        let del = det2(dx1, dx2, dy1, dy2);
        if del.abs() < f64::EPSILON {
            return None;
        }
        rq[0][2] = det2(px, dx2, py, dy2) / del;
        rq[1][2] = det2(dx1, px, dy1, py) / del;
        rq[2][2] = 1.0;
        rq[0][0] = v[1].x - v[0].x + rq[0][2] * v[1].x;
        rq[1][0] = v[2].x - v[0].x + rq[1][2] * v[2].x;
        rq[2][0] = v[0].x;
        rq[0][1] = v[1].y - v[0].y + rq[0][2] * v[1].y;
        rq[1][1] = v[2].y - v[0].y + rq[1][2] * v[2].y;
        rq[2][1] = v[0].y;
    }

    // Scale from the unit square to the source rectangle.
    rq[0][0] /= du;
    rq[1][0] /= dv;
    rq[0][1] /= du;
    rq[1][1] /= dv;
    rq[0][2] /= du;
    rq[1][2] /= dv;

    // Adjugate of rq.
    let st = [
        [
            det2(rq[1][1], rq[1][2], rq[2][1], rq[2][2]),
            det2(rq[2][1], rq[2][2], rq[0][1], rq[0][2]),
            det2(rq[0][1], rq[0][2], rq[1][1], rq[1][2]),
        ],
        [
            det2(rq[1][2], rq[1][0], rq[2][2], rq[2][0]),
            det2(rq[2][2], rq[2][0], rq[0][2], rq[0][0]),
            det2(rq[0][2], rq[0][0], rq[1][2], rq[1][0]),
        ],
        [
            det2(rq[1][0], rq[1][1], rq[2][0], rq[2][1]),
            det2(rq[2][0], rq[2][1], rq[0][0], rq[0][1]),
            det2(rq[0][0], rq[0][1], rq[1][0], rq[1][1]),
        ],
    ];

    let det = rq[0][0] * st[0][0] + rq[0][1] * st[0][1] + rq[0][2] * st[0][2];
    if det.abs() <= f64::EPSILON {
        return None;
    }

    let xf = point.x * st[0][0] + point.y * st[1][0] + st[2][0];
    let yf = point.x * st[0][1] + point.y * st[1][1] + st[2][1];
    let wf = point.x * st[0][2] + point.y * st[1][2] + st[2][2];
    if wf == 0.0 {
        return None;
    }
    Some(Point::new(xf / wf, yf / wf))
}

impl ActorStore {
    // -- Getters --

    /// Pivot point, normalized against the allocation size.
    #[must_use]
    pub fn pivot_point(&self, id: ActorId) -> Point {
        self.node(id).transform_info().pivot
    }

    /// Z component of the pivot point, in pixels.
    #[must_use]
    pub fn pivot_point_z(&self, id: ActorId) -> f64 {
        self.node(id).transform_info().pivot_z
    }

    /// Scale factors along X and Y.
    #[must_use]
    pub fn scale(&self, id: ActorId) -> (f64, f64) {
        let s = self.node(id).transform_info().scale;
        (s.x, s.y)
    }

    /// Scale factor along Z.
    #[must_use]
    pub fn scale_z(&self, id: ActorId) -> f64 {
        self.node(id).transform_info().scale.z
    }

    /// Rotation around `axis`, in degrees.
    #[must_use]
    pub fn rotation_angle(&self, id: ActorId, axis: RotateAxis) -> f64 {
        let r = self.node(id).transform_info().rotation;
        match axis {
            RotateAxis::X => r.x,
            RotateAxis::Y => r.y,
            RotateAxis::Z => r.z,
        }
    }

    /// Translation applied after scaling and rotation.
    #[must_use]
    pub fn translation(&self, id: ActorId) -> Point3 {
        self.node(id).transform_info().translation
    }

    /// Position on the Z axis. Also decides where [`add_child`] inserts.
    ///
    /// [`add_child`]: Self::add_child
    #[must_use]
    pub fn z_position(&self, id: ActorId) -> f64 {
        self.node(id).transform_info().z_position
    }

    /// Whether an override matrix replaces scale, rotation and translation.
    #[must_use]
    pub fn is_transform_set(&self, id: ActorId) -> bool {
        self.node(id).transform_info().transform_set
    }

    /// The override matrix, if set.
    #[must_use]
    pub fn transform_override(&self, id: ActorId) -> Option<Transform3d> {
        let info = self.node(id).transform_info();
        info.transform_set.then_some(info.transform)
    }

    /// The matrix applied to every child on top of its own transform, if
    /// set.
    #[must_use]
    pub fn child_transform(&self, id: ActorId) -> Option<Transform3d> {
        let info = self.node(id).transform_info();
        info.child_transform_set.then_some(info.child_transform)
    }

    /// Whether any rotation angle is non-zero.
    #[must_use]
    pub fn is_rotated(&self, id: ActorId) -> bool {
        let r = self.node(id).transform_info().rotation;
        r.x != 0.0 || r.y != 0.0 || r.z != 0.0
    }

    /// Whether the actor is scaled along X or Y.
    #[must_use]
    pub fn is_scaled(&self, id: ActorId) -> bool {
        let s = self.node(id).transform_info().scale;
        s.x != 1.0 || s.y != 1.0
    }

    // -- Setters --

    /// Sets the pivot point, normalized against the allocation size.
    pub fn set_pivot_point(&mut self, id: ActorId, pivot: Point) {
        self.animate_property(id, Property::PivotPoint, Value::Point(pivot));
    }

    /// Sets the Z component of the pivot point.
    pub fn set_pivot_point_z(&mut self, id: ActorId, pivot_z: f64) {
        self.animate_property(id, Property::PivotPointZ, Value::Float(pivot_z));
    }

    /// Sets the scale factors along X and Y.
    pub fn set_scale(&mut self, id: ActorId, scale_x: f64, scale_y: f64) {
        let mut s = self.freeze_notify();
        s.animate_property(id, Property::ScaleX, Value::Float(scale_x));
        s.animate_property(id, Property::ScaleY, Value::Float(scale_y));
    }

    /// Sets the scale factor along Z.
    pub fn set_scale_z(&mut self, id: ActorId, scale_z: f64) {
        self.animate_property(id, Property::ScaleZ, Value::Float(scale_z));
    }

    /// Sets the rotation around `axis`, in degrees.
    pub fn set_rotation_angle(&mut self, id: ActorId, axis: RotateAxis, degrees: f64) {
        self.animate_property(id, axis.property(), Value::Float(degrees));
    }

    /// Sets the translation.
    pub fn set_translation(&mut self, id: ActorId, x: f64, y: f64, z: f64) {
        let mut s = self.freeze_notify();
        s.animate_property(id, Property::TranslationX, Value::Float(x));
        s.animate_property(id, Property::TranslationY, Value::Float(y));
        s.animate_property(id, Property::TranslationZ, Value::Float(z));
    }

    /// Sets the position on the Z axis. Does not reorder siblings.
    pub fn set_z_position(&mut self, id: ActorId, z: f64) {
        self.animate_property(id, Property::ZPosition, Value::Float(z));
    }

    /// Replaces scale, rotation and translation with `matrix`. `None`
    /// restores them.
    pub fn set_transform(&mut self, id: ActorId, matrix: Option<Transform3d>) {
        let m = matrix.unwrap_or(Transform3d::IDENTITY);
        self.animate_property(id, Property::Transform, Value::Matrix(m));
    }

    /// Sets a matrix applied to every child of the actor.
    pub fn set_child_transform(&mut self, id: ActorId, matrix: Option<Transform3d>) {
        let m = matrix.unwrap_or(Transform3d::IDENTITY);
        self.animate_property(id, Property::ChildTransform, Value::Matrix(m));
    }

    // -- Internal setters, shared by immediate writes and transitions --

    pub(crate) fn set_pivot_point_internal(&mut self, id: ActorId, pivot: Point) {
        self.node_mut(id).transform_info_mut().pivot = pivot;
        self.transform_changed(id);
        self.notify(id, Property::PivotPoint);
    }

    pub(crate) fn set_pivot_point_z_internal(&mut self, id: ActorId, pivot_z: f64) {
        self.node_mut(id).transform_info_mut().pivot_z = pivot_z;
        self.transform_changed(id);
        self.notify(id, Property::PivotPointZ);
    }

    pub(crate) fn set_scale_internal(&mut self, id: ActorId, property: Property, factor: f64) {
        let info = self.node_mut(id).transform_info_mut();
        match property {
            Property::ScaleX => info.scale.x = factor,
            Property::ScaleY => info.scale.y = factor,
            _ => info.scale.z = factor,
        }
        self.transform_changed(id);
        self.notify(id, property);
    }

    pub(crate) fn set_rotation_internal(&mut self, id: ActorId, property: Property, degrees: f64) {
        let info = self.node_mut(id).transform_info_mut();
        match property {
            Property::RotationAngleX => info.rotation.x = degrees,
            Property::RotationAngleY => info.rotation.y = degrees,
            _ => info.rotation.z = degrees,
        }
        self.transform_changed(id);
        self.notify(id, property);
    }

    pub(crate) fn set_translation_internal(&mut self, id: ActorId, property: Property, value: f64) {
        let info = self.node_mut(id).transform_info_mut();
        match property {
            Property::TranslationX => info.translation.x = value,
            Property::TranslationY => info.translation.y = value,
            _ => info.translation.z = value,
        }
        self.transform_changed(id);
        self.notify(id, property);
    }

    pub(crate) fn set_z_position_internal(&mut self, id: ActorId, z: f64) {
        self.node_mut(id).transform_info_mut().z_position = z;
        self.transform_changed(id);
        self.notify(id, Property::ZPosition);
    }

    pub(crate) fn set_transform_internal(&mut self, id: ActorId, matrix: Transform3d) {
        let was_set = self.is_transform_set(id);
        let info = self.node_mut(id).transform_info_mut();
        info.transform = matrix;
        info.transform_set = !matrix.is_identity();
        let now_set = info.transform_set;
        self.transform_changed(id);
        self.notify(id, Property::Transform);
        if was_set != now_set {
            self.notify(id, Property::TransformSet);
        }
    }

    pub(crate) fn set_child_transform_internal(&mut self, id: ActorId, matrix: Transform3d) {
        let was_set = self.child_transform(id).is_some();
        let info = self.node_mut(id).transform_info_mut();
        info.child_transform = matrix;
        info.child_transform_set = !matrix.is_identity();
        let now_set = info.child_transform_set;

        // Every child's local matrix includes ours.
        let children: Vec<ActorId> = self.children(id).collect();
        for child in children {
            self.transform_changed(child);
        }
        self.queue_redraw(id);
        self.notify(id, Property::ChildTransform);
        if was_set != now_set {
            self.notify(id, Property::ChildTransformSet);
        }
    }

    /// Invalidates the local matrix of `id` and the stage-relative state of
    /// its subtree.
    pub(crate) fn transform_changed(&mut self, id: ActorId) {
        self.nodes[id.idx as usize]
            .private
            .remove(PrivateFlags::TRANSFORM_VALID);
        if let Some(parent) = self.parent(id) {
            self.queue_update_paint_volume(parent);
        }
        self.dirty
            .mark_with(id.idx, dirty::ABSOLUTE_GEOMETRY, &EagerPolicy);
        self.queue_update_finish_layout(id);
        self.queue_redraw(id);
    }

    /// Applies pending [`ABSOLUTE_GEOMETRY`](dirty::ABSOLUTE_GEOMETRY)
    /// marks: every affected actor drops its stage-relative matrix and is
    /// scheduled for a visible-paint-volume and stage-view update.
    pub(crate) fn flush_absolute_geometry(&mut self) {
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::ABSOLUTE_GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in affected {
            let node = &mut self.nodes[idx as usize];
            if !node.alive {
                continue;
            }
            node.private.remove(PrivateFlags::STAGE_RELATIVE_VALID);
            node.private.insert(
                PrivateFlags::NEEDS_VISIBLE_PV_UPDATE | PrivateFlags::NEEDS_UPDATE_STAGE_VIEWS,
            );
            let id = self.id_at(idx);
            self.queue_update_finish_layout(id);
        }
    }

    // -- Matrices --

    /// The local matrix: from the actor's coordinates to its parent's.
    pub fn local_transform(&mut self, id: ActorId) -> Transform3d {
        self.validate(id);
        let i = id.idx as usize;
        if self.nodes[i].private.contains(PrivateFlags::TRANSFORM_VALID) {
            return self.nodes[i].transform;
        }
        let class = Rc::clone(&self.nodes[i].class);
        let mut m = Transform3d::IDENTITY;
        class.apply_transform(self, id, &mut m);
        let node = &mut self.nodes[i];
        node.transform = m;
        node.private.insert(PrivateFlags::TRANSFORM_VALID);
        m
    }

    /// The matrix from the actor's coordinates to stage coordinates.
    ///
    /// For an actor outside any stage this is relative to the root of its
    /// tree, including the root's own transform.
    pub fn stage_relative_transform(&mut self, id: ActorId) -> Transform3d {
        self.validate(id);
        self.flush_absolute_geometry();

        // Walk up to the first valid cache, then resolve downwards.
        let mut chain = Vec::new();
        let mut idx = id.idx;
        let mut base = Transform3d::IDENTITY;
        while idx != INVALID {
            let node = &self.nodes[idx as usize];
            if node.private.contains(PrivateFlags::STAGE_RELATIVE_VALID) {
                base = node.stage_relative_modelview;
                break;
            }
            chain.push(idx);
            idx = node.parent;
        }

        for &idx in chain.iter().rev() {
            let node = &self.nodes[idx as usize];
            let m = if node.is_toplevel() {
                Transform3d::IDENTITY
            } else {
                let local = self.local_transform(self.id_at(idx));
                base * local
            };
            let node = &mut self.nodes[idx as usize];
            node.stage_relative_modelview = m;
            node.private.insert(PrivateFlags::STAGE_RELATIVE_VALID);
            base = m;
        }
        base
    }

    /// The matrix from the actor's coordinates to `ancestor`'s, or to stage
    /// coordinates when `ancestor` is `None`.
    ///
    /// If `ancestor` is not actually an ancestor the result maps into the
    /// root of the actor's tree.
    pub fn relative_transform(&mut self, id: ActorId, ancestor: Option<ActorId>) -> Transform3d {
        self.validate(id);
        let Some(ancestor) = ancestor else {
            return self.stage_relative_transform(id);
        };
        self.validate(ancestor);
        if ancestor == id {
            return Transform3d::IDENTITY;
        }
        if self.parent(id) == Some(ancestor) {
            return self.local_transform(id);
        }
        if self.nodes[ancestor.idx as usize].is_toplevel() && self.stage(id) == Some(ancestor) {
            return self.stage_relative_transform(id);
        }

        let ancestor_sr = self.stage_relative_transform(ancestor);
        if ancestor_sr.is_identity() {
            return self.stage_relative_transform(id);
        }
        let self_sr = self.stage_relative_transform(id);
        if self_sr.approx_eq(&ancestor_sr, MATRIX_EPSILON) {
            return Transform3d::IDENTITY;
        }
        if let Some(inv) = ancestor_sr.inverse() {
            return inv * self_sr;
        }

        // Singular ancestor: walk the chain by hand.
        let mut m = Transform3d::IDENTITY;
        let mut cur = Some(id);
        while let Some(a) = cur {
            if a == ancestor {
                break;
            }
            m = self.local_transform(a) * m;
            cur = self.parent(a);
        }
        m
    }

    fn projection(&self, id: ActorId) -> Transform3d {
        self.stage_host(id)
            .map_or(Transform3d::IDENTITY, |host| host.projection())
    }

    /// Maps a point in the actor's coordinates to window coordinates.
    pub fn apply_transform_to_point(&mut self, id: ActorId, point: Point3) -> Point3 {
        let m = self.projection(id) * self.stage_relative_transform(id);
        m.transform_point3(point)
    }

    /// Maps a point in the actor's coordinates to `ancestor`'s, or to window
    /// coordinates when `ancestor` is `None`.
    pub fn apply_relative_transform_to_point(
        &mut self,
        id: ActorId,
        ancestor: Option<ActorId>,
        point: Point3,
    ) -> Point3 {
        if ancestor.is_none() {
            return self.apply_transform_to_point(id, point);
        }
        self.relative_transform(id, ancestor)
            .transform_point3(point)
    }

    fn allocation_corners(&self, id: ActorId) -> [Point3; 4] {
        let a = self.node(id).allocation;
        let (w, h) = (a.width(), a.height());
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(0.0, h, 0.0),
            Point3::new(w, h, 0.0),
        ]
    }

    /// The four corners of the allocation (top-left, top-right,
    /// bottom-left, bottom-right) in `ancestor`'s coordinates, or stage
    /// coordinates when `ancestor` is `None`.
    pub fn allocation_vertices(&mut self, id: ActorId, ancestor: Option<ActorId>) -> [Point3; 4] {
        let m = self.relative_transform(id, ancestor);
        self.allocation_corners(id)
            .map(|p| m.transform_point3(p))
    }

    /// The four corners of the allocation in window coordinates.
    pub fn abs_allocation_vertices(&mut self, id: ActorId) -> [Point3; 4] {
        let m = self.projection(id) * self.stage_relative_transform(id);
        self.allocation_corners(id)
            .map(|p| m.transform_point3(p))
    }

    /// Bounding box of the transformed allocation, in window coordinates.
    pub fn transformed_extents(&mut self, id: ActorId) -> Rect {
        let v = self.abs_allocation_vertices(id);
        let mut rect = Rect::from_points(v[0].to_2d(), v[0].to_2d());
        for p in &v[1..] {
            rect = rect.union_pt(p.to_2d());
        }
        rect
    }

    /// Window position of the allocation's top-left corner.
    pub fn transformed_position(&mut self, id: ActorId) -> Point {
        self.abs_allocation_vertices(id)[0].to_2d()
    }

    /// Size of the transformed allocation's bounding box.
    pub fn transformed_size(&mut self, id: ActorId) -> Size {
        self.transformed_extents(id).size()
    }

    /// Maps a window-space point into the actor's coordinates, following
    /// perspective. Returns `None` when the actor has no area on screen.
    pub fn transform_stage_point(&mut self, id: ActorId, x: f64, y: f64) -> Option<Point> {
        let v = self.abs_allocation_vertices(id);
        let alloc = self.node(id).allocation;
        let du = alloc.width().ceil();
        let dv = alloc.height().ceil();
        invert_quad(&v, du, dv, Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStage;

    fn placed(store: &mut ActorStore, parent: ActorId, rect: Rect) -> ActorId {
        let a = store.create_actor();
        store.add_child(parent, a);
        store.allocate(a, rect);
        a
    }

    fn close(a: Point3, b: Point3) -> bool {
        a.approx_eq(b, 1e-6)
    }

    #[test]
    fn local_matrix_includes_allocation_origin() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let a = placed(&mut store, root, Rect::new(10.0, 20.0, 60.0, 70.0));
        let p = store.apply_relative_transform_to_point(a, Some(root), Point3::new(5.0, 5.0, 0.0));
        assert!(close(p, Point3::new(15.0, 25.0, 0.0)));
    }

    #[test]
    fn scale_about_center_pivot() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let a = placed(&mut store, root, Rect::new(0.0, 0.0, 100.0, 100.0));
        store.set_pivot_point(a, Point::new(0.5, 0.5));
        store.set_scale(a, 2.0, 2.0);
        assert!(store.is_scaled(a));
        let p = store.apply_relative_transform_to_point(a, Some(root), Point3::new(0.0, 0.0, 0.0));
        assert!(close(p, Point3::new(-50.0, -50.0, 0.0)));
        let c = store.apply_relative_transform_to_point(a, Some(root), Point3::new(50.0, 50.0, 0.0));
        assert!(close(c, Point3::new(50.0, 50.0, 0.0)));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let a = placed(&mut store, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.set_rotation_angle(a, RotateAxis::Z, 90.0);
        assert!(store.is_rotated(a));
        let p = store.apply_relative_transform_to_point(a, Some(root), Point3::new(1.0, 0.0, 0.0));
        assert!(close(p, Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn override_matrix_replaces_translation() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let a = placed(&mut store, root, Rect::new(10.0, 0.0, 20.0, 10.0));
        store.set_translation(a, 100.0, 0.0, 0.0);
        store.set_transform(a, Some(Transform3d::from_scale(3.0, 1.0, 1.0)));
        assert!(store.is_transform_set(a));
        let p = store.apply_relative_transform_to_point(a, Some(root), Point3::new(1.0, 0.0, 0.0));
        assert!(close(p, Point3::new(13.0, 0.0, 0.0)));

        store.set_transform(a, None);
        assert!(!store.is_transform_set(a));
        let p = store.apply_relative_transform_to_point(a, Some(root), Point3::new(1.0, 0.0, 0.0));
        assert!(close(p, Point3::new(111.0, 0.0, 0.0)));
    }

    #[test]
    fn child_transform_applies_to_children_only() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let parent = placed(&mut store, root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = placed(&mut store, parent, Rect::new(10.0, 0.0, 20.0, 10.0));
        store.set_child_transform(parent, Some(Transform3d::from_translation(0.0, 5.0, 0.0)));
        let p = store.apply_relative_transform_to_point(child, Some(parent), Point3::new(0.0, 0.0, 0.0));
        assert!(close(p, Point3::new(10.0, 5.0, 0.0)));
        let q = store.apply_relative_transform_to_point(parent, Some(root), Point3::new(0.0, 0.0, 0.0));
        assert!(close(q, Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn stage_relative_cache_follows_ancestor_moves() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(200.0, 200.0)));
        let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 110.0, 110.0));
        let b = placed(&mut store, a, Rect::new(5.0, 5.0, 15.0, 15.0));
        let p = store.apply_transform_to_point(b, Point3::ZERO);
        assert!(close(p, Point3::new(15.0, 15.0, 0.0)));

        store.set_translation(a, 50.0, 0.0, 0.0);
        let p = store.apply_transform_to_point(b, Point3::ZERO);
        assert!(close(p, Point3::new(65.0, 15.0, 0.0)));
    }

    #[test]
    fn relative_transform_round_trips() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let a = placed(&mut store, root, Rect::new(3.0, 4.0, 53.0, 44.0));
        let b = placed(&mut store, a, Rect::new(7.0, 1.0, 27.0, 31.0));
        store.set_rotation_angle(b, RotateAxis::Z, 30.0);
        store.set_scale(b, 1.5, 0.5);
        store.set_rotation_angle(a, RotateAxis::Y, 20.0);

        let p = Point3::new(4.0, 9.0, 0.0);
        for ancestor in [a, root] {
            let m = store.relative_transform(b, Some(ancestor));
            let inv = m.inverse().expect("non-singular chain");
            let there = store.apply_relative_transform_to_point(b, Some(ancestor), p);
            let back = inv.transform_point3(there);
            assert!(back.approx_eq(p, 1e-9), "{back:?} != {p:?}");
        }
    }

    #[test]
    fn stage_point_inverts_affine_transforms() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(400.0, 400.0)));
        let a = placed(&mut store, stage, Rect::new(100.0, 100.0, 200.0, 150.0));
        store.set_pivot_point(a, Point::new(0.5, 0.5));
        store.set_rotation_angle(a, RotateAxis::Z, 45.0);

        let local = Point3::new(20.0, 30.0, 0.0);
        let window = store.apply_transform_to_point(a, local);
        let back = store
            .transform_stage_point(a, window.x, window.y)
            .expect("actor has area");
        assert!((back.x - 20.0).abs() < 1e-6 && (back.y - 30.0).abs() < 1e-6);
    }

    #[test]
    fn stage_point_fails_for_zero_area() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(400.0, 400.0)));
        let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 10.0, 50.0));
        assert_eq!(store.transform_stage_point(a, 10.0, 20.0), None);
    }

    #[test]
    fn extents_of_rotated_square() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(400.0, 400.0)));
        let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.set_pivot_point(a, Point::new(0.5, 0.5));
        store.set_rotation_angle(a, RotateAxis::Z, 45.0);
        let size = store.transformed_size(a);
        let diag = 10.0 * 2.0_f64.sqrt();
        assert!((size.width - diag).abs() < 1e-9);
        assert!((size.height - diag).abs() < 1e-9);
    }
}
