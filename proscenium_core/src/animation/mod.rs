// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timelines, easing curves and property transitions.
//!
//! Animation is frame driven. Each actor owns the transitions that animate
//! its properties; [`ActorStore::advance`](crate::actor::ActorStore::advance)
//! ticks all of them once per frame, and every tick writes the interpolated
//! value back through the same setter an immediate change would use.

mod easing;
mod interval;
mod timeline;
mod transition;

pub use easing::{AnimationMode, StepPosition};
pub use interval::Interval;
pub use timeline::{Timeline, TimelineDirection, TimelineEvent};
pub use transition::PropertyTransition;

/// Parameters for implicit transitions, pushed and popped per actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EasingState {
    /// Duration in milliseconds. Zero disables implicit transitions.
    pub duration: u32,
    /// Easing curve.
    pub mode: AnimationMode,
    /// Delay before the transition starts, in milliseconds.
    pub delay: u32,
}

impl EasingState {
    /// The state a fresh [`save_easing_state`] pushes.
    ///
    /// [`save_easing_state`]: crate::actor::ActorStore::save_easing_state
    pub const DEFAULT: Self = Self {
        duration: 250,
        mode: AnimationMode::EaseOutCubic,
        delay: 0,
    };
}

impl Default for EasingState {
    fn default() -> Self {
        Self::DEFAULT
    }
}
