// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven timelines.
//!
//! A [`Timeline`] is a pure state machine. It never reads a clock: the owner
//! feeds it frame times through [`Timeline::tick`] and then drains the
//! [`TimelineEvent`]s it produced. All times are milliseconds.

use super::easing::AnimationMode;

/// Which way elapsed time moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimelineDirection {
    /// From zero to the duration.
    #[default]
    Forward,
    /// From the duration to zero.
    Backward,
}

/// Something that happened to a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineEvent {
    /// Playback began (after any delay).
    Started,
    /// A new frame, with the elapsed time after advancing.
    NewFrame {
        /// Elapsed milliseconds.
        elapsed: i64,
    },
    /// Playback was paused.
    Paused,
    /// One run from end to end finished.
    Completed,
    /// Playback stopped, either at the end of the last repeat
    /// (`is_finished`) or because it was stopped explicitly.
    Stopped {
        /// Whether the timeline ran to completion.
        is_finished: bool,
    },
}

/// Playback state and timing of one animation.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration: i64,
    delay: i64,
    direction: TimelineDirection,
    repeat_count: i32,
    current_repeat: i32,
    auto_reverse: bool,
    progress_mode: AnimationMode,

    elapsed_time: i64,
    msecs_delta: i64,
    last_frame_time: i64,
    is_playing: bool,
    waiting_first_tick: bool,
    /// Set while a start is pending behind a delay: the frame time the
    /// delay started counting from, once known.
    delay_pending: Option<Option<i64>>,

    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Creates a stopped, forward timeline lasting `duration_ms`.
    #[must_use]
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration: i64::from(duration_ms),
            delay: 0,
            direction: TimelineDirection::Forward,
            repeat_count: 0,
            current_repeat: 0,
            auto_reverse: false,
            progress_mode: AnimationMode::Linear,
            elapsed_time: 0,
            msecs_delta: 0,
            last_frame_time: 0,
            is_playing: false,
            waiting_first_tick: false,
            delay_pending: None,
            events: Vec::new(),
        }
    }

    /// Duration in milliseconds.
    #[must_use]
    pub fn duration(&self) -> u32 {
        u32::try_from(self.duration).unwrap_or(u32::MAX)
    }

    /// Sets the duration.
    pub fn set_duration(&mut self, duration_ms: u32) {
        self.duration = i64::from(duration_ms);
    }

    /// Delay before playback begins, in milliseconds.
    #[must_use]
    pub fn delay(&self) -> u32 {
        u32::try_from(self.delay).unwrap_or(u32::MAX)
    }

    /// Sets the delay. Has no effect on a start that is already pending.
    pub fn set_delay(&mut self, delay_ms: u32) {
        self.delay = i64::from(delay_ms);
    }

    /// Playback direction.
    #[must_use]
    pub fn direction(&self) -> TimelineDirection {
        self.direction
    }

    /// Sets the playback direction.
    ///
    /// Switching to backward on a rewound timeline moves it to the end.
    pub fn set_direction(&mut self, direction: TimelineDirection) {
        if self.direction != direction {
            self.direction = direction;
            if self.elapsed_time == 0 {
                self.elapsed_time = self.duration;
            }
        }
    }

    /// Number of extra runs; `-1` repeats forever.
    #[must_use]
    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    /// Sets the number of extra runs. Values below `-1` are clamped.
    pub fn set_repeat_count(&mut self, count: i32) {
        if count < -1 {
            tracing::warn!(count, "repeat count must be -1 or non-negative");
        }
        self.repeat_count = count.max(-1);
    }

    /// Whether the direction flips after each run.
    #[must_use]
    pub fn auto_reverse(&self) -> bool {
        self.auto_reverse
    }

    /// Sets whether the direction flips after each run.
    pub fn set_auto_reverse(&mut self, reverse: bool) {
        self.auto_reverse = reverse;
    }

    /// The easing curve used by [`progress`](Self::progress).
    #[must_use]
    pub fn progress_mode(&self) -> AnimationMode {
        self.progress_mode
    }

    /// Sets the easing curve.
    pub fn set_progress_mode(&mut self, mode: AnimationMode) {
        self.progress_mode = mode;
    }

    /// Elapsed milliseconds within the current run.
    #[must_use]
    pub fn elapsed_time(&self) -> i64 {
        self.elapsed_time
    }

    /// Milliseconds between the last two frames, or zero when stopped.
    #[must_use]
    pub fn delta(&self) -> i64 {
        if self.is_playing { self.msecs_delta } else { 0 }
    }

    /// Whether the timeline is advancing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether a start is waiting for the delay to run out.
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.delay_pending.is_some()
    }

    /// Linear position in the run, in `[0, 1]`.
    #[must_use]
    pub fn linear_progress(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        self.elapsed_time as f64 / self.duration as f64
    }

    /// Eased position in the run.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress_mode.apply(self.linear_progress())
    }

    /// Removes and returns the events produced so far.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, TimelineEvent> {
        self.events.drain(..)
    }

    fn is_complete(&self) -> bool {
        match self.direction {
            TimelineDirection::Forward => self.elapsed_time >= self.duration,
            TimelineDirection::Backward => self.elapsed_time <= 0,
        }
    }

    fn set_is_playing(&mut self, playing: bool) {
        if playing == self.is_playing {
            return;
        }
        self.is_playing = playing;
        if playing {
            self.waiting_first_tick = true;
            self.current_repeat = 0;
        }
    }

    /// Starts playback.
    ///
    /// No-op while playing, while a delayed start is pending, or when the
    /// duration is zero.
    pub fn start(&mut self) {
        if self.delay_pending.is_some() || self.is_playing || self.duration == 0 {
            return;
        }
        if self.delay > 0 {
            self.delay_pending = Some(None);
        } else {
            self.begin_playing();
        }
    }

    fn begin_playing(&mut self) {
        self.delay_pending = None;
        self.msecs_delta = 0;
        self.set_is_playing(true);
        self.events.push(TimelineEvent::Started);
    }

    /// Drops a pending delayed start.
    pub fn cancel_delay(&mut self) {
        self.delay_pending = None;
    }

    /// Pauses on the current frame.
    pub fn pause(&mut self) {
        self.cancel_delay();
        if !self.is_playing {
            return;
        }
        self.msecs_delta = 0;
        self.set_is_playing(false);
        self.events.push(TimelineEvent::Paused);
    }

    /// Stops and rewinds. Emits `Stopped { is_finished: false }` only if the
    /// timeline was playing.
    pub fn stop(&mut self) {
        let was_playing = self.is_playing;
        self.pause();
        self.rewind();
        if was_playing {
            self.events.push(TimelineEvent::Stopped { is_finished: false });
        }
    }

    /// Moves to the first frame of the current direction.
    pub fn rewind(&mut self) {
        match self.direction {
            TimelineDirection::Forward => self.advance(0),
            TimelineDirection::Backward => self.advance(self.duration()),
        }
    }

    /// Skips `msecs` in the current direction, wrapping past the ends.
    pub fn skip(&mut self, msecs: u32) {
        let msecs = i64::from(msecs);
        match self.direction {
            TimelineDirection::Forward => {
                self.elapsed_time += msecs;
                if self.elapsed_time > self.duration {
                    self.elapsed_time = 1;
                }
            }
            TimelineDirection::Backward => {
                self.elapsed_time -= msecs;
                if self.elapsed_time < 1 {
                    self.elapsed_time = self.duration - 1;
                }
            }
        }
        self.msecs_delta = 0;
    }

    /// Jumps to `msecs` (clamped to the duration) without emitting a frame.
    pub fn advance(&mut self, msecs: u32) {
        self.elapsed_time = i64::from(msecs).clamp(0, self.duration);
    }

    /// Feeds the frame time `now_ms`.
    ///
    /// The first frame after a start only records the time and emits a
    /// zero-delta frame. A clock that went backwards drops the frame.
    pub fn tick(&mut self, now_ms: i64) {
        if let Some(delay_start) = self.delay_pending {
            match delay_start {
                None => {
                    self.delay_pending = Some(Some(now_ms));
                    return;
                }
                Some(t0) if now_ms - t0 >= self.delay => self.begin_playing(),
                Some(_) => return,
            }
        }

        if !self.is_playing {
            return;
        }

        if self.waiting_first_tick {
            self.last_frame_time = now_ms;
            self.msecs_delta = 0;
            self.waiting_first_tick = false;
            self.do_frame();
            return;
        }

        let msecs = now_ms - self.last_frame_time;
        if msecs < 0 {
            tracing::debug!(msecs, "frame clock rolled back; dropping frame");
            self.last_frame_time = now_ms;
            return;
        }
        if msecs != 0 {
            self.last_frame_time = now_ms;
            self.msecs_delta = msecs;
            self.do_frame();
        }
    }

    fn do_frame(&mut self) -> bool {
        match self.direction {
            TimelineDirection::Forward => self.elapsed_time += self.msecs_delta,
            TimelineDirection::Backward => self.elapsed_time -= self.msecs_delta,
        }

        if !self.is_complete() {
            self.events.push(TimelineEvent::NewFrame {
                elapsed: self.elapsed_time,
            });
            return self.is_playing;
        }

        let saved_direction = self.direction;
        let overflow = self.elapsed_time;
        self.elapsed_time = match self.direction {
            TimelineDirection::Forward => self.duration,
            TimelineDirection::Backward => 0,
        };
        self.events.push(TimelineEvent::NewFrame {
            elapsed: self.elapsed_time,
        });

        if self.is_playing
            && (self.repeat_count == 0 || self.repeat_count == self.current_repeat)
        {
            self.set_is_playing(false);
            self.events.push(TimelineEvent::Completed);
            self.events.push(TimelineEvent::Stopped { is_finished: true });
        } else {
            self.events.push(TimelineEvent::Completed);
        }

        self.current_repeat += 1;

        if self.auto_reverse {
            self.direction = match self.direction {
                TimelineDirection::Forward => TimelineDirection::Backward,
                TimelineDirection::Backward => TimelineDirection::Forward,
            };
        }

        if self.repeat_count != 0 && self.is_playing {
            self.elapsed_time = match saved_direction {
                TimelineDirection::Forward => overflow - self.duration,
                TimelineDirection::Backward => self.duration + overflow,
            };
            if self.direction != saved_direction {
                self.elapsed_time = self.duration - self.elapsed_time;
            }
            true
        } else {
            self.rewind();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(t: &mut Timeline) -> Vec<TimelineEvent> {
        t.drain_events().collect()
    }

    #[test]
    fn zero_duration_never_starts() {
        let mut t = Timeline::new(0);
        t.start();
        assert!(!t.is_playing());
        assert!(events(&mut t).is_empty());
    }

    #[test]
    fn first_tick_is_zero_delta() {
        let mut t = Timeline::new(100);
        t.start();
        assert_eq!(events(&mut t), vec![TimelineEvent::Started]);
        t.tick(5_000);
        assert_eq!(events(&mut t), vec![TimelineEvent::NewFrame { elapsed: 0 }]);
        t.tick(5_040);
        assert_eq!(events(&mut t), vec![TimelineEvent::NewFrame { elapsed: 40 }]);
        assert_eq!(t.delta(), 40);
    }

    #[test]
    fn completes_once_and_rewinds() {
        let mut t = Timeline::new(100);
        t.start();
        t.tick(0);
        t.tick(60);
        events(&mut t);
        t.tick(130);
        assert_eq!(
            events(&mut t),
            vec![
                TimelineEvent::NewFrame { elapsed: 100 },
                TimelineEvent::Completed,
                TimelineEvent::Stopped { is_finished: true },
            ]
        );
        assert!(!t.is_playing());
        assert_eq!(t.elapsed_time(), 0);
        t.tick(200);
        assert!(events(&mut t).is_empty());
    }

    #[test]
    fn clock_roll_back_drops_frame() {
        let mut t = Timeline::new(100);
        t.start();
        t.tick(50);
        t.tick(70);
        events(&mut t);
        t.tick(10);
        assert!(events(&mut t).is_empty());
        assert_eq!(t.elapsed_time(), 20);
        t.tick(30);
        assert_eq!(t.elapsed_time(), 40);
    }

    #[test]
    fn stop_emits_unfinished_only_when_playing() {
        let mut t = Timeline::new(100);
        t.stop();
        assert!(events(&mut t).is_empty());
        t.start();
        t.tick(0);
        t.tick(30);
        events(&mut t);
        t.stop();
        assert_eq!(
            events(&mut t),
            vec![
                TimelineEvent::Paused,
                TimelineEvent::Stopped { is_finished: false },
            ]
        );
        assert_eq!(t.elapsed_time(), 0);
    }

    #[test]
    fn delay_counts_frame_time() {
        let mut t = Timeline::new(100);
        t.set_delay(50);
        t.start();
        assert!(t.is_delayed());
        t.tick(1_000);
        t.tick(1_030);
        assert!(!t.is_playing());
        t.tick(1_050);
        assert!(t.is_playing());
        assert_eq!(
            events(&mut t),
            vec![TimelineEvent::Started, TimelineEvent::NewFrame { elapsed: 0 }]
        );
    }

    #[test]
    fn repeat_wraps_overflow() {
        let mut t = Timeline::new(100);
        t.set_repeat_count(1);
        t.start();
        t.tick(0);
        t.tick(130);
        assert!(t.is_playing());
        assert_eq!(t.elapsed_time(), 30);
        t.tick(230);
        assert!(!t.is_playing());
        let evs = events(&mut t);
        assert_eq!(
            evs.iter()
                .filter(|e| matches!(e, TimelineEvent::Completed))
                .count(),
            2
        );
        assert_eq!(
            evs.last(),
            Some(&TimelineEvent::Stopped { is_finished: true })
        );
    }

    #[test]
    fn auto_reverse_bounces() {
        let mut t = Timeline::new(100);
        t.set_repeat_count(-1);
        t.set_auto_reverse(true);
        t.start();
        t.tick(0);
        t.tick(120);
        assert_eq!(t.direction(), TimelineDirection::Backward);
        assert_eq!(t.elapsed_time(), 80);
        t.tick(150);
        assert_eq!(t.elapsed_time(), 50);
    }

    #[test]
    fn progress_uses_mode() {
        let mut t = Timeline::new(100);
        t.set_progress_mode(AnimationMode::EaseInQuad);
        t.advance(50);
        assert!((t.linear_progress() - 0.5).abs() < 1e-12);
        assert!((t.progress() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn backward_direction_starts_from_end() {
        let mut t = Timeline::new(100);
        t.set_direction(TimelineDirection::Backward);
        assert_eq!(t.elapsed_time(), 100);
        t.start();
        t.tick(0);
        t.tick(40);
        assert_eq!(t.elapsed_time(), 60);
    }
}
