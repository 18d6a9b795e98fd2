// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recorder installed on a live store sees the passes of a frame.

use std::rc::Rc;

use kurbo::{Point, Rect};
use proscenium_core::actor::ActorStore;
use proscenium_core::paint::PaintContext;
use proscenium_core::testing::{RecordingPaintNode, RecordingStage};
use proscenium_core::trace::PhaseKind;
use proscenium_debug::recorder::{RecordedEvent, RecorderSink};

#[test]
fn recorder_sees_layout_and_paint_passes() {
    let mut store = ActorStore::new();
    let recorder = RecorderSink::new();
    let recording = recorder.recording();
    store.set_trace_sink(Box::new(recorder));

    let stage = store.create_stage(Rc::new(RecordingStage::new(100.0, 100.0)));
    store.show(stage);
    store.set_stage_mapped(stage, true);
    let a = store.create_actor();
    store.add_child(stage, a);
    store.set_position(a, Point::new(5.0, 5.0));
    store.set_size(a, 20.0, 20.0);
    store.update_stage(stage);

    let mut node = RecordingPaintNode::default();
    store.paint_stage(stage, &mut PaintContext::new(), &mut node);

    let events: Vec<RecordedEvent> = recording.records().into_iter().map(|r| r.event).collect();
    let phases: Vec<(bool, PhaseKind)> = events
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::PhaseBegin(p) => Some((true, p.phase)),
            RecordedEvent::PhaseEnd(p) => Some((false, p.phase)),
            _ => None,
        })
        .collect();
    assert!(phases.contains(&(true, PhaseKind::Relayout)));
    assert!(phases.contains(&(false, PhaseKind::Relayout)));
    assert!(phases.contains(&(true, PhaseKind::Paint)));
    assert!(phases.contains(&(false, PhaseKind::Paint)));

    let allocated: Vec<Rect> = events
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::Allocation(ev) if ev.actor == a.index() => Some(ev.allocation),
            _ => None,
        })
        .collect();
    assert_eq!(allocated.last(), Some(&Rect::new(5.0, 5.0, 25.0, 25.0)));

    let mut json = Vec::new();
    proscenium_debug::chrome::export(&recording.to_bytes(), &mut json).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&json).unwrap();
    assert_eq!(parsed.len(), events.len());
}
