// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property transitions.

use super::easing::AnimationMode;
use super::interval::Interval;
use super::timeline::Timeline;
use crate::property::Value;

/// A timeline bound to an interval and the property path it drives.
///
/// The path uses the same grammar as
/// [`PropertyPath`](crate::property::PropertyPath): a plain property name,
/// `@layout.<p>`, `@content.<p>` or `@<section>.<name>.<p>`.
#[derive(Clone, Debug)]
pub struct PropertyTransition {
    property_name: String,
    timeline: Timeline,
    interval: Interval,
    remove_on_complete: bool,
}

impl PropertyTransition {
    /// A transition of `property_name` over `interval`, lasting
    /// `duration_ms`.
    #[must_use]
    pub fn new(property_name: impl Into<String>, interval: Interval, duration_ms: u32) -> Self {
        Self {
            property_name: property_name.into(),
            timeline: Timeline::new(duration_ms),
            interval,
            remove_on_complete: false,
        }
    }

    /// Sets the easing curve and returns `self`.
    #[must_use]
    pub fn with_mode(mut self, mode: AnimationMode) -> Self {
        self.timeline.set_progress_mode(mode);
        self
    }

    /// Sets the start delay and returns `self`.
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.timeline.set_delay(delay_ms);
        self
    }

    /// The property path this transition writes.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// The driving timeline.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The driving timeline, mutably.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// The interpolated range.
    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The interpolated range, mutably.
    pub fn interval_mut(&mut self) -> &mut Interval {
        &mut self.interval
    }

    /// Whether the owning actor drops the transition once it finishes.
    #[must_use]
    pub fn remove_on_complete(&self) -> bool {
        self.remove_on_complete
    }

    /// Sets whether the owning actor drops the transition once it finishes.
    pub fn set_remove_on_complete(&mut self, remove: bool) {
        self.remove_on_complete = remove;
    }

    /// The value for the timeline's current eased progress.
    #[must_use]
    pub fn current_value(&self) -> Option<Value> {
        self.interval.compute(self.timeline.progress())
    }

    /// The value at `elapsed` milliseconds into the run, as carried by a
    /// [`NewFrame`](super::TimelineEvent::NewFrame) event.
    #[must_use]
    pub fn value_at(&self, elapsed: i64) -> Option<Value> {
        let duration = self.timeline.duration();
        let linear = if duration == 0 {
            1.0
        } else {
            (elapsed as f64 / f64::from(duration)).clamp(0.0, 1.0)
        };
        self.interval
            .compute(self.timeline.progress_mode().apply(linear))
    }
}
