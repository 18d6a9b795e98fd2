// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use kurbo::Rect;
use proscenium_core::paint_volume::CullResult;
use proscenium_core::trace::{
    AllocationEvent, CullEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RedrawClipEvent,
    RedrawQueuedEvent, TraceSink, TransitionStoppedEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    show_culls: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("show_culls", &self.show_culls)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            show_culls: true,
        }
    }

    /// Whether cull results are printed. There is one per painted actor,
    /// so they dominate the output of large trees.
    #[must_use]
    pub fn with_culls(mut self, show: bool) -> Self {
        self.show_culls = show;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Relayout => "relayout",
        PhaseKind::FinishLayout => "finish-layout",
        PhaseKind::Paint => "paint",
        PhaseKind::Pick => "pick",
    }
}

fn rect(r: Rect) -> String {
    format!("({:.1},{:.1} {:.1}x{:.1})", r.x0, r.y0, r.width(), r.height())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_redraw_queued(&mut self, e: &RedrawQueuedEvent) {
        let kind = if e.clipped { "clipped" } else { "full" };
        let _ = writeln!(
            self.writer,
            "[redraw] frame={} actor=#{} {kind}",
            e.frame_index, e.actor,
        );
    }

    fn on_cull(&mut self, e: &CullEvent) {
        if !self.show_culls {
            return;
        }
        let result = match e.result {
            CullResult::In => "in",
            CullResult::Out => "OUT",
        };
        let _ = writeln!(
            self.writer,
            "[cull] frame={} actor=#{} {result}",
            e.frame_index, e.actor,
        );
    }

    fn on_allocation(&mut self, e: &AllocationEvent) {
        let _ = writeln!(
            self.writer,
            "[alloc] frame={} actor=#{} {}",
            e.frame_index,
            e.actor,
            rect(e.allocation),
        );
    }

    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        let clip = e.clip.map_or_else(|| "whole stage".to_owned(), rect);
        let _ = writeln!(
            self.writer,
            "[damage] frame={} actor=#{} {clip}",
            e.frame_index, e.actor,
        );
    }

    fn on_transition_stopped(&mut self, e: &TransitionStoppedEvent<'_>) {
        let how = if e.is_finished { "finished" } else { "cancelled" };
        let _ = writeln!(
            self.writer,
            "[transition] frame={} actor=#{} {:?} {how}",
            e.frame_index, e.actor, e.name,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_allocation() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_allocation(&AllocationEvent {
            frame_index: 1,
            actor: 4,
            allocation: Rect::new(10.0, 20.0, 40.0, 60.0),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[alloc]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("(10.0,20.0 30.0x40.0)"), "got: {output}");
    }

    #[test]
    fn culls_can_be_silenced() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_culls(false);
        sink.on_cull(&CullEvent {
            frame_index: 0,
            actor: 1,
            result: CullResult::Out,
        });
        sink.on_transition_stopped(&TransitionStoppedEvent {
            frame_index: 0,
            actor: 1,
            name: "opacity",
            is_finished: true,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(!output.contains("[cull]"), "got: {output}");
        assert!(output.contains("\"opacity\" finished"), "got: {output}");
    }
}
