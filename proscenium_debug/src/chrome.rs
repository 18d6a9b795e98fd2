// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use kurbo::Rect;
use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Passes become duration slices; everything else is an instant event
/// carrying the actor slot in `args`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for record in decode(bytes) {
        let ts = record.at_us;
        let event = match record.event {
            RecordedEvent::PhaseBegin(e) => json!({
                "ph": "B",
                "name": format!("{:?}", e.phase),
                "cat": "Frame",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                }
            }),
            RecordedEvent::PhaseEnd(e) => json!({
                "ph": "E",
                "name": format!("{:?}", e.phase),
                "cat": "Frame",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                }
            }),
            RecordedEvent::RedrawQueued(e) => instant("QueueRedraw", "Redraw", ts, json!({
                "frame_index": e.frame_index,
                "actor": e.actor,
                "clipped": e.clipped,
            })),
            RecordedEvent::Cull(e) => instant("Cull", "Paint", ts, json!({
                "frame_index": e.frame_index,
                "actor": e.actor,
                "result": format!("{:?}", e.result),
            })),
            RecordedEvent::Allocation(e) => instant("Allocate", "Layout", ts, json!({
                "frame_index": e.frame_index,
                "actor": e.actor,
                "allocation": rect(e.allocation),
            })),
            RecordedEvent::RedrawClip(e) => instant("RedrawClip", "Redraw", ts, json!({
                "frame_index": e.frame_index,
                "actor": e.actor,
                "clip": e.clip.map(rect),
            })),
            RecordedEvent::TransitionStopped {
                frame_index,
                actor,
                name,
                is_finished,
            } => instant("TransitionStopped", "Animation", ts, json!({
                "frame_index": frame_index,
                "actor": actor,
                "name": name,
                "is_finished": is_finished,
            })),
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(name: &str, cat: &str, ts: u64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn rect(r: Rect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use proscenium_core::trace::{
        PhaseBeginEvent, PhaseEndEvent, PhaseKind, RedrawClipEvent, TraceSink,
    };

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let now = Rc::new(Cell::new(1_000_u64));
        let clock = Rc::clone(&now);
        let mut rec = RecorderSink::with_clock(move || clock.get());
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Relayout,
        });
        rec.on_redraw_clip(&RedrawClipEvent {
            frame_index: 0,
            actor: 2,
            clip: None,
        });
        now.set(1_250);
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Relayout,
        });

        let mut out = Vec::new();
        export(&rec.to_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Relayout");
        assert_eq!(parsed[0]["ts"], 1_000);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "RedrawClip");
        assert!(parsed[1]["args"]["clip"].is_null());

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 1_250);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
