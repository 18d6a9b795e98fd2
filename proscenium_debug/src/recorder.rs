// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! byte buffer as little-endian records, each stamped with the time it was
//! received. [`decode`] reads them back as an iterator of [`Record`].
//!
//! The store owns its sink once installed, so the buffer is shared: keep a
//! [`Recording`] handle from [`RecorderSink::recording`] to read what was
//! captured while the sink is still in use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use kurbo::Rect;
use proscenium_core::paint_volume::CullResult;
use proscenium_core::trace::{
    AllocationEvent, CullEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RedrawClipEvent,
    RedrawQueuedEvent, TraceSink, TransitionStoppedEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_REDRAW_QUEUED: u8 = 3;
const TAG_CULL: u8 = 4;
const TAG_ALLOCATION: u8 = 5;
const TAG_REDRAW_CLIP: u8 = 6;
const TAG_TRANSITION_STOPPED: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
pub struct RecorderSink {
    buf: Rc<RefCell<Vec<u8>>>,
    clock: Box<dyn FnMut() -> u64>,
}

impl fmt::Debug for RecorderSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecorderSink")
            .field("len", &self.buf.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder stamping events with the microseconds
    /// elapsed since its creation.
    #[must_use]
    pub fn new() -> Self {
        let start = Instant::now();
        Self::with_clock(move || u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX))
    }

    /// Creates an empty recorder reading timestamps, in microseconds, from
    /// `clock`.
    #[must_use]
    pub fn with_clock(clock: impl FnMut() -> u64 + 'static) -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
            clock: Box::new(clock),
        }
    }

    /// A handle that reads the buffer while the sink is installed.
    #[must_use]
    pub fn recording(&self) -> Recording {
        Recording {
            buf: Rc::clone(&self.buf),
        }
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8) {
        let at = (self.clock)();
        self.write_u8(tag);
        self.write_u64(at);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.borrow_mut().push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_f64(r.x0);
        self.write_f64(r.y0);
        self.write_f64(r.x1);
        self.write_f64(r.y1);
    }

    fn write_str(&mut self, s: &str) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "transition names are short; longer ones are cut at the length limit"
        )]
        let len = s.len().min(u32::MAX as usize) as u32;
        self.write_u32(len);
        self.buf
            .borrow_mut()
            .extend_from_slice(&s.as_bytes()[..len as usize]);
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Relayout => 0,
            PhaseKind::FinishLayout => 1,
            PhaseKind::Paint => 2,
            PhaseKind::Pick => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.begin(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.begin(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
    }

    fn on_redraw_queued(&mut self, e: &RedrawQueuedEvent) {
        self.begin(TAG_REDRAW_QUEUED);
        self.write_u64(e.frame_index);
        self.write_u32(e.actor);
        self.write_u8(u8::from(e.clipped));
    }

    fn on_cull(&mut self, e: &CullEvent) {
        self.begin(TAG_CULL);
        self.write_u64(e.frame_index);
        self.write_u32(e.actor);
        self.write_u8(match e.result {
            CullResult::In => 0,
            CullResult::Out => 1,
        });
    }

    fn on_allocation(&mut self, e: &AllocationEvent) {
        self.begin(TAG_ALLOCATION);
        self.write_u64(e.frame_index);
        self.write_u32(e.actor);
        self.write_rect(e.allocation);
    }

    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        self.begin(TAG_REDRAW_CLIP);
        self.write_u64(e.frame_index);
        self.write_u32(e.actor);
        match e.clip {
            Some(r) => {
                self.write_u8(1);
                self.write_rect(r);
            }
            None => {
                self.write_u8(0);
                self.write_rect(Rect::ZERO);
            }
        }
    }

    fn on_transition_stopped(&mut self, e: &TransitionStoppedEvent<'_>) {
        self.begin(TAG_TRANSITION_STOPPED);
        self.write_u64(e.frame_index);
        self.write_u32(e.actor);
        self.write_u8(u8::from(e.is_finished));
        self.write_str(e.name);
    }
}

/// Shared read access to a [`RecorderSink`]'s buffer.
#[derive(Clone, Debug)]
pub struct Recording {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl Recording {
    /// Returns a copy of the bytes recorded so far.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Decodes everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        decode(&self.buf.borrow()).collect()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.buf.borrow_mut().clear();
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`RedrawQueuedEvent`].
    RedrawQueued(RedrawQueuedEvent),
    /// A [`CullEvent`].
    Cull(CullEvent),
    /// An [`AllocationEvent`].
    Allocation(AllocationEvent),
    /// A [`RedrawClipEvent`].
    RedrawClip(RedrawClipEvent),
    /// A [`TransitionStoppedEvent`], with the name owned.
    TransitionStopped {
        /// Frame counter.
        frame_index: u64,
        /// Slot index of the actor.
        actor: u32,
        /// Transition name.
        name: String,
        /// Whether the timeline ran to completion.
        is_finished: bool,
    },
}

impl RecordedEvent {
    /// The frame the event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::PhaseBegin(e) => e.frame_index,
            Self::PhaseEnd(e) => e.frame_index,
            Self::RedrawQueued(e) => e.frame_index,
            Self::Cull(e) => e.frame_index,
            Self::Allocation(e) => e.frame_index,
            Self::RedrawClip(e) => e.frame_index,
            Self::TransitionStopped { frame_index, .. } => *frame_index,
        }
    }
}

/// A decoded event and the time it was recorded.
#[derive(Clone, Debug)]
pub struct Record {
    /// Microseconds on the recorder's clock.
    pub at_us: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`]. Decoding stops at the first truncated or unknown record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        ))
    }

    fn read_str(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Relayout,
            1 => PhaseKind::FinishLayout,
            2 => PhaseKind::Paint,
            _ => PhaseKind::Pick,
        })
    }

    fn decode_event(&mut self, tag: u8) -> Option<RecordedEvent> {
        Some(match tag {
            TAG_PHASE_BEGIN => RecordedEvent::PhaseBegin(PhaseBeginEvent {
                frame_index: self.read_u64()?,
                phase: self.read_phase()?,
            }),
            TAG_PHASE_END => RecordedEvent::PhaseEnd(PhaseEndEvent {
                frame_index: self.read_u64()?,
                phase: self.read_phase()?,
            }),
            TAG_REDRAW_QUEUED => RecordedEvent::RedrawQueued(RedrawQueuedEvent {
                frame_index: self.read_u64()?,
                actor: self.read_u32()?,
                clipped: self.read_u8()? != 0,
            }),
            TAG_CULL => RecordedEvent::Cull(CullEvent {
                frame_index: self.read_u64()?,
                actor: self.read_u32()?,
                result: if self.read_u8()? == 0 {
                    CullResult::In
                } else {
                    CullResult::Out
                },
            }),
            TAG_ALLOCATION => RecordedEvent::Allocation(AllocationEvent {
                frame_index: self.read_u64()?,
                actor: self.read_u32()?,
                allocation: self.read_rect()?,
            }),
            TAG_REDRAW_CLIP => {
                let frame_index = self.read_u64()?;
                let actor = self.read_u32()?;
                let present = self.read_u8()? != 0;
                let rect = self.read_rect()?;
                RecordedEvent::RedrawClip(RedrawClipEvent {
                    frame_index,
                    actor,
                    clip: present.then_some(rect),
                })
            }
            TAG_TRANSITION_STOPPED => {
                let frame_index = self.read_u64()?;
                let actor = self.read_u32()?;
                let is_finished = self.read_u8()? != 0;
                RecordedEvent::TransitionStopped {
                    frame_index,
                    actor,
                    name: self.read_str()?,
                    is_finished,
                }
            }
            _ => return None,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at_us = self.read_u64()?;
        let event = self.decode_event(tag)?;
        Some(Record { at_us, event })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn stepping_recorder() -> RecorderSink {
        let now = Rc::new(Cell::new(0_u64));
        RecorderSink::with_clock(move || {
            now.set(now.get() + 10);
            now.get()
        })
    }

    #[test]
    fn phases_decode_in_order_with_timestamps() {
        let mut rec = stepping_recorder();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 5,
            phase: PhaseKind::Paint,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 5,
            phase: PhaseKind::Paint,
        });

        let records: Vec<_> = decode(&rec.to_bytes()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].at_us, 10);
        assert_eq!(records[1].at_us, 20);
        match &records[0].event {
            RecordedEvent::PhaseBegin(e) => {
                assert_eq!(e.frame_index, 5);
                assert_eq!(e.phase, PhaseKind::Paint);
            }
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        assert!(matches!(records[1].event, RecordedEvent::PhaseEnd(_)));
    }

    #[test]
    fn redraw_clip_keeps_full_redraws_apart() {
        let mut rec = stepping_recorder();
        rec.on_redraw_clip(&RedrawClipEvent {
            frame_index: 1,
            actor: 3,
            clip: Some(Rect::new(1.0, 2.0, 3.0, 4.0)),
        });
        rec.on_redraw_clip(&RedrawClipEvent {
            frame_index: 1,
            actor: 4,
            clip: None,
        });
        let clips: Vec<Option<Rect>> = rec
            .recording()
            .records()
            .into_iter()
            .filter_map(|r| match r.event {
                RecordedEvent::RedrawClip(e) => Some(e.clip),
                _ => None,
            })
            .collect();
        assert_eq!(clips, vec![Some(Rect::new(1.0, 2.0, 3.0, 4.0)), None]);
    }

    #[test]
    fn transition_names_survive() {
        let mut rec = stepping_recorder();
        rec.on_transition_stopped(&TransitionStoppedEvent {
            frame_index: 2,
            actor: 9,
            name: "@effects.blur.radius",
            is_finished: false,
        });
        rec.on_cull(&CullEvent {
            frame_index: 2,
            actor: 9,
            result: CullResult::Out,
        });
        let records = rec.recording().records();
        assert_eq!(records.len(), 2);
        match &records[0].event {
            RecordedEvent::TransitionStopped {
                actor,
                name,
                is_finished,
                ..
            } => {
                assert_eq!(*actor, 9);
                assert_eq!(name, "@effects.blur.radius");
                assert!(!is_finished);
            }
            other => panic!("expected TransitionStopped, got {other:?}"),
        }
        match &records[1].event {
            RecordedEvent::Cull(e) => assert_eq!(e.result, CullResult::Out),
            other => panic!("expected Cull, got {other:?}"),
        }
    }

    #[test]
    fn truncated_buffer_stops_decoding() {
        let mut rec = stepping_recorder();
        rec.on_allocation(&AllocationEvent {
            frame_index: 0,
            actor: 1,
            allocation: Rect::new(0.0, 0.0, 10.0, 10.0),
        });
        rec.on_allocation(&AllocationEvent {
            frame_index: 0,
            actor: 2,
            allocation: Rect::new(0.0, 0.0, 5.0, 5.0),
        });
        let mut bytes = rec.to_bytes();
        bytes.truncate(bytes.len() - 3);
        assert_eq!(decode(&bytes).count(), 1);
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn recording_handle_sees_later_events() {
        let mut rec = stepping_recorder();
        let handle = rec.recording();
        assert!(handle.records().is_empty());
        rec.on_redraw_queued(&RedrawQueuedEvent {
            frame_index: 0,
            actor: 1,
            clipped: true,
        });
        assert_eq!(handle.records().len(), 1);
        handle.clear();
        assert!(handle.records().is_empty());
    }
}
