// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! actor store calls while it lays out, finishes, paints and picks a stage.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink and is installed on the store with
//! [`ActorStore::set_trace_sink`](crate::actor::ActorStore::set_trace_sink).
//! When the `trace` feature is **off**, every `Tracer` method compiles to
//! nothing. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! This is separate from the `tracing` log output: the sink receives typed,
//! per-frame records meant for recording and timeline export.

use kurbo::Rect;

use crate::paint_volume::CullResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which pass over the actor tree is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Size negotiation and allocation.
    Relayout,
    /// Visible paint volumes, stage views and redraw clips.
    FinishLayout,
    /// Painting into paint nodes.
    Paint,
    /// Hit-testing.
    Pick,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a pass.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which pass is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a pass.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which pass is ending.
    pub phase: PhaseKind,
}

/// Emitted when a redraw is queued on a mapped actor.
#[derive(Clone, Copy, Debug)]
pub struct RedrawQueuedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the actor.
    pub actor: u32,
    /// Whether the redraw carried an explicit clip volume.
    pub clipped: bool,
}

/// Emitted when an actor is tested against the clip frusta during paint.
#[derive(Clone, Copy, Debug)]
pub struct CullEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the actor.
    pub actor: u32,
    /// Outcome of the test.
    pub result: CullResult,
}

/// Emitted when an actor's stored allocation changes.
#[derive(Clone, Copy, Debug)]
pub struct AllocationEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the actor.
    pub actor: u32,
    /// The new allocation, parent-relative.
    pub allocation: Rect,
}

/// Emitted when an area is added to the stage's redraw clip.
#[derive(Clone, Copy, Debug)]
pub struct RedrawClipEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the actor whose damage this is.
    pub actor: u32,
    /// Stage-space area, or `None` for a full redraw.
    pub clip: Option<Rect>,
}

/// Emitted when a transition's timeline stops.
#[derive(Clone, Copy, Debug)]
pub struct TransitionStoppedEvent<'a> {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the actor.
    pub actor: u32,
    /// Transition name.
    pub name: &'a str,
    /// Whether the timeline ran to completion.
    pub is_finished: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a pass.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a redraw is queued.
    fn on_redraw_queued(&mut self, e: &RedrawQueuedEvent) {
        _ = e;
    }

    /// Called after an actor was tested against the clip frusta.
    fn on_cull(&mut self, e: &CullEvent) {
        _ = e;
    }

    /// Called when an allocation is stored.
    fn on_allocation(&mut self, e: &AllocationEvent) {
        _ = e;
    }

    /// Called when damage is added to the stage's redraw clip.
    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        _ = e;
    }

    /// Called when a transition stops.
    fn on_transition_stopped(&mut self, e: &TransitionStoppedEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// an installed sink is dropped immediately.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Removes and returns the installed sink.
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RedrawQueuedEvent`].
    #[inline]
    pub fn redraw_queued(&mut self, e: &RedrawQueuedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_redraw_queued(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CullEvent`].
    #[inline]
    pub fn cull(&mut self, e: &CullEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cull(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AllocationEvent`].
    #[inline]
    pub fn allocation(&mut self, e: &AllocationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_allocation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RedrawClipEvent`].
    #[inline]
    pub fn redraw_clip(&mut self, e: &RedrawClipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_redraw_clip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionStoppedEvent`].
    #[inline]
    pub fn transition_stopped(&mut self, e: &TransitionStoppedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_stopped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Relayout,
        });
        sink.on_transition_stopped(&TransitionStoppedEvent {
            frame_index: 0,
            actor: 1,
            name: "x",
            is_finished: true,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: 3,
            phase: PhaseKind::Paint,
        });
        assert!(tracer.take_sink().is_none());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct SharedSink(Rc<RefCell<Vec<u32>>>);
        impl TraceSink for SharedSink {
            fn on_cull(&mut self, e: &CullEvent) {
                self.0.borrow_mut().push(e.actor);
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(SharedSink(seen.clone())));
        tracer.cull(&CullEvent {
            frame_index: 0,
            actor: 7,
            result: CullResult::Out,
        });
        assert_eq!(*seen.borrow(), vec![7]);
    }
}
