// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the actor tree, driven through the public API
//! only.

use std::rc::Rc;

use kurbo::{Point, Rect};
use proscenium_core::actor::{ActorId, ActorStore, RotateAxis};
use proscenium_core::animation::AnimationMode;
use proscenium_core::class::ActorClass;
use proscenium_core::event::{ActorEvent, ActorEventKind};
use proscenium_core::geometry::Point3;
use proscenium_core::paint::PaintContext;
use proscenium_core::paint_volume::CullResult;
use proscenium_core::testing::{RecordingPaintNode, RecordingStage};

fn mapped_stage(store: &mut ActorStore, width: f64, height: f64) -> ActorId {
    // Contract warnings show up in the output of a failing test.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let stage = store.create_stage(Rc::new(RecordingStage::new(width, height)));
    store.show(stage);
    store.set_stage_mapped(stage, true);
    stage
}

fn placed(store: &mut ActorStore, parent: ActorId, rect: Rect) -> ActorId {
    let a = store.create_actor();
    store.add_child(parent, a);
    store.set_position(a, rect.origin());
    store.set_size(a, rect.width(), rect.height());
    a
}

fn forward(store: &ActorStore, parent: ActorId) -> Vec<ActorId> {
    let mut out = Vec::new();
    let mut cur = store.first_child(parent);
    while let Some(c) = cur {
        out.push(c);
        cur = store.next_sibling(c);
    }
    out
}

fn backward(store: &ActorStore, parent: ActorId) -> Vec<ActorId> {
    let mut out = Vec::new();
    let mut cur = store.last_child(parent);
    while let Some(c) = cur {
        out.push(c);
        cur = store.prev_sibling(c);
    }
    out.reverse();
    out
}

#[test]
fn add_and_remove_children() {
    let mut store = ActorStore::new();
    let a = store.create_actor();
    let b = store.create_actor();
    let c = store.create_actor();
    store.add_child(a, b);
    store.set_z_position(c, 5.0);
    store.add_child(a, c);

    assert_eq!(store.first_child(a), Some(b));
    assert_eq!(store.last_child(a), Some(c));
    assert_eq!(store.n_children(a), 2);

    store.remove_child(a, b);
    assert_eq!(store.first_child(a), Some(c));
    assert_eq!(store.last_child(a), Some(c));
    assert_eq!(store.n_children(a), 1);
    assert_eq!(store.parent(b), None);
}

#[test]
fn sibling_links_agree_in_both_directions() {
    let mut store = ActorStore::new();
    let parent = store.create_actor();
    let kids: Vec<ActorId> = (0..8).map(|_| store.create_actor()).collect();

    store.add_child(parent, kids[0]);
    store.insert_child_at_index(parent, kids[1], 0);
    store.insert_child_above(parent, kids[2], Some(kids[1]));
    store.insert_child_below(parent, kids[3], None);
    store.insert_child_at_index(parent, kids[4], 99);
    store.remove_child(parent, kids[2]);
    store.insert_child_below(parent, kids[5], Some(kids[4]));
    store.insert_child_above(parent, kids[6], None);
    store.set_child_at_index(parent, kids[6], 1);
    store.remove_child(parent, kids[3]);
    store.insert_child_at_index(parent, kids[7], -1);
    store.set_child_above_sibling(parent, kids[1], Some(kids[7]));

    let fwd = forward(&store, parent);
    assert_eq!(fwd, backward(&store, parent));
    assert_eq!(fwd.len(), store.n_children(parent) as usize);
    assert_eq!(fwd, store.children(parent).collect::<Vec<_>>());
    assert!(!fwd.contains(&kids[2]) && !fwd.contains(&kids[3]));
}

#[test]
fn natural_size_is_never_below_minimum() {
    struct Lopsided;
    impl ActorClass for Lopsided {
        fn preferred_width(&self, _: &mut ActorStore, _: ActorId, _: f64) -> (f64, f64) {
            (50.0, 10.0)
        }

        fn preferred_height(&self, _: &mut ActorStore, _: ActorId, _: f64) -> (f64, f64) {
            (50.0, 10.0)
        }
    }

    let mut store = ActorStore::new();
    let a = store.create_actor_with_class(Rc::new(Lopsided));
    for for_size in [-1.0, 0.0, 20.0, 500.0] {
        assert_eq!(store.preferred_width(a, for_size), (50.0, 50.0));
        assert_eq!(store.preferred_height(a, for_size), (50.0, 50.0));
    }
}

#[test]
fn repeated_allocation_is_silent() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 100.0, 100.0);
    let a = placed(&mut store, stage, Rect::new(10.0, 10.0, 30.0, 30.0));
    store.update_stage(stage);
    store.drain_events().for_each(drop);

    let box_ = store.allocation(a);
    store.allocate(a, box_);
    assert_eq!(store.drain_events().count(), 0);
}

#[test]
fn relative_transform_round_trips_through_stage_points() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 400.0, 400.0);
    let outer = placed(&mut store, stage, Rect::new(40.0, 60.0, 240.0, 160.0));
    let inner = placed(&mut store, outer, Rect::new(10.0, 5.0, 90.0, 45.0));
    store.set_pivot_point(inner, Point::new(0.5, 0.5));
    store.set_rotation_angle(inner, RotateAxis::Z, 30.0);
    store.set_scale(outer, 1.25, 0.75);
    store.update_stage(stage);

    let p = Point3::new(12.0, 7.0, 0.0);
    let on_stage = store.apply_relative_transform_to_point(inner, Some(stage), p);
    let back = store
        .transform_stage_point(inner, on_stage.x, on_stage.y)
        .expect("non-singular chain");
    assert!((back.x - p.x).abs() < 1e-6, "{back:?}");
    assert!((back.y - p.y).abs() < 1e-6, "{back:?}");
}

#[test]
fn implicit_animation_reaches_the_target_once() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 400.0, 400.0);
    let a = placed(&mut store, stage, Rect::new(0.0, 0.0, 10.0, 10.0));
    store.update_stage(stage);
    store.drain_events().for_each(drop);

    store.save_easing_state(a);
    store.set_easing_mode(a, AnimationMode::Linear);
    store.set_easing_duration(a, 1000);
    store.set_x(a, 100.0);
    store.restore_easing_state(a);
    assert_eq!(store.x(a), 0.0);

    let mut last = 0.0;
    for now in [0, 250, 500, 750] {
        store.advance(now);
        store.update_stage(stage);
        let x = store.x(a);
        assert!(x >= last && x < 100.0, "x = {x} at {now}");
        last = x;
    }
    store.advance(1000);
    store.update_stage(stage);
    assert_eq!(store.x(a), 100.0);

    let finished: Vec<ActorEvent> = store
        .drain_events()
        .filter(|e| e.actor == a)
        .filter(|e| matches!(&e.kind, ActorEventKind::TransitionStopped { name, is_finished: true } if name == "x"))
        .collect();
    assert_eq!(finished.len(), 1);
}

#[test]
fn actors_outside_every_frustum_are_not_painted() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 100.0, 100.0);
    let inside = placed(&mut store, stage, Rect::new(5.0, 5.0, 15.0, 15.0));
    let outside = placed(&mut store, stage, Rect::new(70.0, 70.0, 90.0, 90.0));
    store.update_stage(stage);

    let mut ctx = PaintContext::with_redraw_clip(Rect::new(0.0, 0.0, 30.0, 30.0));
    assert_eq!(store.cull_actor(outside, &ctx), Some(CullResult::Out));

    let mut node = RecordingPaintNode::default();
    store.paint_stage(stage, &mut ctx, &mut node);
    let painted = node.painted_actors();
    assert!(painted.contains(&inside));
    assert!(!painted.contains(&outside));
    assert!(node.is_balanced());
}

#[test]
fn map_state_survives_reparenting_and_visibility_changes() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 100.0, 100.0);
    let a = store.create_actor();
    let b = store.create_actor();
    let c = store.create_actor();
    let loose = store.create_actor();
    store.add_child(stage, a);
    store.add_child(a, b);
    store.add_child(loose, c);
    store.hide(a);
    store.add_child(b, loose);
    store.show(a);
    store.remove_child(b, loose);
    store.add_child(stage, loose);
    store.hide(b);

    for actor in [stage, a, b, c, loose] {
        assert_eq!(store.map_state_violation(actor), None);
        if store.is_mapped(actor) {
            assert!(store.is_realized(actor));
        }
        if let Some(parent) = store.parent(actor)
            && store.is_realized(actor)
        {
            assert!(store.is_realized(parent));
        }
    }
    assert!(store.is_mapped(c));
    assert!(!store.is_mapped(b));
}

#[test]
fn topmost_reactive_actor_is_picked() {
    let mut store = ActorStore::new();
    let stage = mapped_stage(&mut store, 100.0, 100.0);
    let below = placed(&mut store, stage, Rect::new(0.0, 0.0, 50.0, 50.0));
    let above = placed(&mut store, stage, Rect::new(25.0, 25.0, 75.0, 75.0));
    store.set_reactive(below, true);
    store.set_reactive(above, true);
    store.update_stage(stage);

    assert_eq!(store.actor_at_pos(stage, Point::new(30.0, 30.0)), Some(above));
    assert_eq!(store.actor_at_pos(stage, Point::new(10.0, 10.0)), Some(below));
    store.set_reactive(above, false);
    assert_eq!(store.actor_at_pos(stage, Point::new(30.0, 30.0)), Some(below));
}

#[test]
#[should_panic(expected = "stale ActorId")]
fn stale_handles_panic() {
    let mut store = ActorStore::new();
    let a = store.create_actor();
    store.destroy(a);
    store.show(a);
}
