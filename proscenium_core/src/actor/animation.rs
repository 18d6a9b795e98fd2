// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing states, implicit and explicit transitions, and frame driving.
//!
//! Every animatable setter funnels into `animate_property`. With no saved
//! easing state, a zero duration, or an actor nobody can see, the value is
//! written at once through the property's internal setter. Otherwise a
//! transition named after the property is created, or the running one is
//! retargeted, and [`ActorStore::advance`] writes interpolated values
//! through that same setter on every frame.

use crate::animation::{AnimationMode, EasingState, Interval, PropertyTransition, TimelineEvent};
use crate::event::ActorEventKind;
use crate::property::{Property, Value};
use crate::trace::TransitionStoppedEvent;

use super::flags::PrivateFlags;
use super::node::{AnimationInfo, TransitionClosure};
use super::{ActorId, ActorStore};

/// What one timeline tick asks the store to do.
enum FrameStep {
    Write(Value),
    Stopped { is_finished: bool },
}

impl ActorStore {
    // -- Easing states --

    /// Pushes a new easing state (250 ms, ease-out-cubic, no delay) that
    /// governs the implicit transitions created from now on.
    pub fn save_easing_state(&mut self, id: ActorId) {
        self.validate(id);
        self.node_mut(id)
            .animation_mut()
            .states
            .push(EasingState::DEFAULT);
    }

    /// Pops the easing state pushed by the matching
    /// [`save_easing_state`](Self::save_easing_state).
    pub fn restore_easing_state(&mut self, id: ActorId) {
        self.validate(id);
        let popped = self
            .node_mut(id)
            .animation
            .as_mut()
            .and_then(|info| info.states.pop());
        if popped.is_none() {
            tracing::warn!(actor = %id, "restore_easing_state called without a saved easing state");
        }
    }

    fn current_easing_state_mut(&mut self, id: ActorId, setter: &'static str) -> Option<&mut EasingState> {
        self.validate(id);
        let state = self.nodes[id.idx as usize]
            .animation
            .as_mut()
            .and_then(|info| info.states.last_mut());
        if state.is_none() {
            tracing::warn!(actor = %id, setter, "save_easing_state must be called first");
        }
        state
    }

    fn current_easing_state(&self, id: ActorId) -> Option<EasingState> {
        self.node(id)
            .animation
            .as_deref()
            .and_then(AnimationInfo::current_state)
            .copied()
    }

    /// Sets the duration of the current easing state, in milliseconds.
    pub fn set_easing_duration(&mut self, id: ActorId, duration_ms: u32) {
        if let Some(state) = self.current_easing_state_mut(id, "set_easing_duration") {
            state.duration = duration_ms;
        }
    }

    /// The duration of the current easing state, or 0 without one.
    #[must_use]
    pub fn easing_duration(&self, id: ActorId) -> u32 {
        self.current_easing_state(id).map_or(0, |s| s.duration)
    }

    /// Sets the easing curve of the current easing state.
    pub fn set_easing_mode(&mut self, id: ActorId, mode: AnimationMode) {
        if let Some(state) = self.current_easing_state_mut(id, "set_easing_mode") {
            state.mode = mode;
        }
    }

    /// The easing curve of the current easing state, or linear without
    /// one.
    #[must_use]
    pub fn easing_mode(&self, id: ActorId) -> AnimationMode {
        self.current_easing_state(id)
            .map_or(AnimationMode::Linear, |s| s.mode)
    }

    /// Sets the delay of the current easing state, in milliseconds.
    pub fn set_easing_delay(&mut self, id: ActorId, delay_ms: u32) {
        if let Some(state) = self.current_easing_state_mut(id, "set_easing_delay") {
            state.delay = delay_ms;
        }
    }

    /// The delay of the current easing state, or 0 without one.
    #[must_use]
    pub fn easing_delay(&self, id: ActorId) -> u32 {
        self.current_easing_state(id).map_or(0, |s| s.delay)
    }

    // -- Implicit transitions --

    /// Writes `value` to `property`, through a transition when the
    /// current easing state asks for one.
    pub(crate) fn animate_property(&mut self, id: ActorId, property: Property, value: Value) {
        self.validate(id);
        let name = property.name();

        if !self.has_transition(id, name) {
            if self.should_skip_implicit_transition(id, property) {
                self.write_final_state(id, property, value);
                return;
            }
            let state = self.current_easing_state(id).unwrap_or(EasingState::DEFAULT);
            let initial = self.property(id, property);
            let Some(interval) = Interval::new(initial, value) else {
                tracing::warn!(actor = %id, property = name, "value kind does not match the property");
                return;
            };
            let mut transition = PropertyTransition::new(name, interval, state.duration)
                .with_mode(state.mode)
                .with_delay(state.delay);
            transition.set_remove_on_complete(true);
            self.insert_transition(id, name, transition, true);
            return;
        }

        let state = self.current_easing_state(id).filter(|s| s.duration > 0);
        let Some(state) = state else {
            // The write is immediate, so whatever was animating the
            // property is obsolete.
            self.remove_transition(id, name);
            self.write_final_state(id, property, value);
            return;
        };

        let current = self.property(id, property);
        let Some(closure) = self.transition_closure_mut(id, name) else {
            return;
        };
        let transition = &mut closure.transition;
        if transition.timeline().is_playing() && transition.interval().final_value() == value {
            return;
        }
        transition.interval_mut().set_initial(current);
        transition.interval_mut().set_final(value);
        let timeline = transition.timeline_mut();
        timeline.set_duration(state.duration);
        timeline.set_progress_mode(state.mode);
        timeline.set_delay(state.delay);
        timeline.rewind();
        if !timeline.is_playing() {
            timeline.start();
        }
    }

    fn should_skip_implicit_transition(&self, id: ActorId, property: Property) -> bool {
        let n = self.node(id);
        if n.in_destruction() {
            return true;
        }
        match self.current_easing_state(id) {
            Some(state) if state.duration > 0 => {}
            _ => return true,
        }
        if !n.is_mapped() && !self.has_mapped_clones(id) {
            return true;
        }
        property == Property::Allocation && !n.private.contains(PrivateFlags::HAS_ALLOCATION)
    }

    fn write_final_state(&mut self, id: ActorId, property: Property, value: Value) {
        if let Err(err) = self.set_final_state(id, property, value) {
            tracing::warn!(actor = %id, %err, "cannot write property");
        }
    }

    // -- Explicit transitions --

    /// Adds `transition` under `name` and starts it. The transition writes
    /// the property path it was created for. Returns `false`, dropping
    /// `transition`, when a transition with that name exists.
    pub fn add_transition(&mut self, id: ActorId, name: &str, mut transition: PropertyTransition) -> bool {
        self.validate(id);
        if self.has_transition(id, name) {
            tracing::warn!(actor = %id, name, "a transition with this name already exists");
            return false;
        }
        if transition.interval().initial().is_none() {
            match self.property_by_path(id, transition.property_name()) {
                Ok(current) => transition.interval_mut().set_initial(current),
                Err(err) => tracing::warn!(actor = %id, name, %err, "cannot read the initial value"),
            }
        }
        self.insert_transition(id, name, transition, false);
        true
    }

    fn insert_transition(&mut self, id: ActorId, name: &str, mut transition: PropertyTransition, is_implicit: bool) {
        transition.timeline_mut().start();
        self.node_mut(id).animation_mut().transitions.insert(
            name.to_owned(),
            TransitionClosure {
                transition,
                is_implicit,
            },
        );
    }

    /// Removes the transition named `name` and stops it. The actor is
    /// detached from it first, so nothing is reported.
    pub fn remove_transition(&mut self, id: ActorId, name: &str) -> Option<PropertyTransition> {
        self.validate(id);
        let mut closure = self
            .node_mut(id)
            .animation
            .as_mut()?
            .transitions
            .remove(name)?;
        let timeline = closure.transition.timeline_mut();
        timeline.stop();
        timeline.drain_events();
        Some(closure.transition)
    }

    /// Removes every transition without reporting them.
    pub fn remove_all_transitions(&mut self, id: ActorId) {
        self.validate(id);
        let Some(info) = self.node_mut(id).animation.as_mut() else {
            return;
        };
        for closure in info.transitions.values_mut() {
            closure.transition.timeline_mut().stop();
        }
        info.transitions.clear();
    }

    /// The transition named `name`.
    #[must_use]
    pub fn transition(&self, id: ActorId, name: &str) -> Option<&PropertyTransition> {
        self.node(id)
            .animation
            .as_ref()?
            .transitions
            .get(name)
            .map(|closure| &closure.transition)
    }

    /// The transition named `name`, mutably. Timeline events it produces
    /// are handled by the next [`advance`](Self::advance).
    pub fn transition_mut(&mut self, id: ActorId, name: &str) -> Option<&mut PropertyTransition> {
        self.validate(id);
        self.transition_closure_mut(id, name)
            .map(|closure| &mut closure.transition)
    }

    /// Names of the actor's transitions.
    #[must_use]
    pub fn transition_names(&self, id: ActorId) -> Vec<String> {
        self.node(id)
            .animation
            .as_ref()
            .map(|info| info.transitions.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn has_transition(&self, id: ActorId, name: &str) -> bool {
        self.node(id)
            .animation
            .as_ref()
            .is_some_and(|info| info.transitions.contains_key(name))
    }

    fn transition_closure_mut(&mut self, id: ActorId, name: &str) -> Option<&mut TransitionClosure> {
        self.nodes[id.idx as usize]
            .animation
            .as_mut()?
            .transitions
            .get_mut(name)
    }

    pub(crate) fn remove_transitions_with_prefix(&mut self, id: ActorId, prefix: &str) {
        let names: Vec<String> = self
            .transition_names(id)
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        for name in names {
            self.remove_transition(id, &name);
        }
    }

    /// Stops the implicit transitions and those that remove themselves on
    /// completion, as happens when the actor leaves its parent.
    pub(crate) fn stop_transitions_on_remove(&mut self, id: ActorId) {
        let names: Vec<String> = match self.node(id).animation.as_deref() {
            Some(info) => info
                .transitions
                .iter()
                .filter(|(_, c)| c.is_implicit || c.transition.remove_on_complete())
                .map(|(name, _)| name.clone())
                .collect(),
            None => return,
        };
        for name in names {
            let Some(closure) = self.transition_closure_mut(id, &name) else {
                continue;
            };
            let timeline = closure.transition.timeline_mut();
            let was_playing = timeline.is_playing();
            timeline.stop();
            timeline.drain_events();
            let remove = closure.transition.remove_on_complete();
            self.finish_transition(id, &name, remove, was_playing.then_some(false));
        }
    }

    // -- Frame driving --

    /// Ticks every transition of every actor with the frame time `now_ms`
    /// and writes the interpolated values.
    pub fn advance(&mut self, now_ms: i64) {
        let animated: Vec<ActorId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                n.alive
                    && n.animation
                        .as_ref()
                        .is_some_and(|info| !info.transitions.is_empty())
            })
            .map(|(idx, _)| self.id_at(idx as u32))
            .collect();
        for id in animated {
            if self.is_alive(id) {
                self.advance_actor(id, now_ms);
            }
        }
    }

    fn advance_actor(&mut self, id: ActorId, now_ms: i64) {
        for name in self.transition_names(id) {
            let Some((steps, path, remove_on_complete)) = self.tick_transition(id, &name, now_ms) else {
                continue;
            };
            for step in steps {
                match step {
                    FrameStep::Write(value) => {
                        if let Err(err) = self.set_final_property(id, &path, value) {
                            tracing::warn!(actor = %id, transition = %name, %err, "cannot write transition value");
                        }
                    }
                    FrameStep::Stopped { is_finished } => {
                        self.finish_transition(id, &name, remove_on_complete, Some(is_finished));
                    }
                }
                if !self.is_alive(id) {
                    return;
                }
            }
        }
    }

    /// Ticks one transition, returning what it produced, the property path
    /// it writes and whether it removes itself when done.
    fn tick_transition(&mut self, id: ActorId, name: &str, now_ms: i64) -> Option<(Vec<FrameStep>, String, bool)> {
        let transition = &mut self.transition_closure_mut(id, name)?.transition;
        transition.timeline_mut().tick(now_ms);
        let events: Vec<TimelineEvent> = transition.timeline_mut().drain_events().collect();
        let steps = events
            .into_iter()
            .filter_map(|event| match event {
                TimelineEvent::NewFrame { elapsed } => transition.value_at(elapsed).map(FrameStep::Write),
                TimelineEvent::Stopped { is_finished } => Some(FrameStep::Stopped { is_finished }),
                _ => None,
            })
            .collect();
        Some((
            steps,
            transition.property_name().to_owned(),
            transition.remove_on_complete(),
        ))
    }

    /// Drops a stopped transition if it removes itself, reports it when
    /// `stopped` carries its outcome, and reports the end of the actor's
    /// transitions once none are left.
    fn finish_transition(&mut self, id: ActorId, name: &str, remove: bool, stopped: Option<bool>) {
        if remove && let Some(info) = self.node_mut(id).animation.as_mut() {
            info.transitions.remove(name);
        }
        let Some(is_finished) = stopped else {
            return;
        };
        self.report_transition_stopped(id, name, is_finished);
        let none_left = self
            .node(id)
            .animation
            .as_ref()
            .is_none_or(|info| info.transitions.is_empty());
        if none_left {
            self.emit(id, ActorEventKind::TransitionsCompleted);
        }
    }

    fn report_transition_stopped(&mut self, id: ActorId, name: &str, is_finished: bool) {
        tracing::trace!(actor = %id, name, is_finished, "transition stopped");
        self.tracer.transition_stopped(&TransitionStoppedEvent {
            frame_index: self.frame_index,
            actor: id.idx,
            name,
            is_finished,
        });
        self.emit(
            id,
            ActorEventKind::TransitionStopped {
                name: name.to_owned(),
                is_finished,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use kurbo::Point;

    use super::*;
    use crate::event::ActorEvent;
    use crate::testing::RecordingStage;

    fn mapped_actor(store: &mut ActorStore) -> ActorId {
        let stage = store.create_stage(Rc::new(RecordingStage::new(200.0, 200.0)));
        store.show(stage);
        store.set_stage_mapped(stage, true);
        let a = store.create_actor();
        store.add_child(stage, a);
        store.update_stage(stage);
        a
    }

    fn stopped(events: &[ActorEvent], name: &str) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match &e.kind {
                ActorEventKind::TransitionStopped { name: n, is_finished } if n == name => Some(*is_finished),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn no_easing_state_writes_immediately() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        store.set_opacity(a, 100);
        assert_eq!(store.opacity(a), 100);
        assert!(store.transition_names(a).is_empty());
    }

    #[test]
    fn unmapped_actors_do_not_animate() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.save_easing_state(a);
        store.set_opacity(a, 100);
        assert_eq!(store.opacity(a), 100);
    }

    #[test]
    fn implicit_transition_runs_to_the_target() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        store.save_easing_state(a);
        store.set_easing_duration(a, 1000);
        store.set_easing_mode(a, AnimationMode::Linear);
        store.set_opacity(a, 55);
        store.restore_easing_state(a);
        assert_eq!(store.opacity(a), 255);
        assert!(store.transition(a, "opacity").is_some());

        store.advance(0);
        store.advance(500);
        assert_eq!(store.opacity(a), 155);
        store.advance(1000);
        assert_eq!(store.opacity(a), 55);
        assert!(store.transition(a, "opacity").is_none());

        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert_eq!(stopped(&events, "opacity"), vec![true]);
        assert!(events.iter().any(|e| e.kind == ActorEventKind::TransitionsCompleted));
    }

    #[test]
    fn second_write_retargets_the_running_transition() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        store.save_easing_state(a);
        store.set_easing_mode(a, AnimationMode::Linear);
        store.set_easing_duration(a, 100);
        store.set_z_position(a, 10.0);
        store.advance(0);
        store.advance(50);
        assert_eq!(store.z_position(a), 5.0);

        store.set_z_position(a, -10.0);
        assert_eq!(store.transition_names(a), vec!["z-position".to_owned()]);
        store.advance(100);
        assert_eq!(store.z_position(a), -2.5);
        store.advance(150);
        assert_eq!(store.z_position(a), -10.0);
    }

    #[test]
    fn zero_duration_write_cancels_the_transition() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        store.save_easing_state(a);
        store.set_easing_duration(a, 100);
        store.set_position(a, Point::new(40.0, 0.0));
        store.advance(0);
        store.drain_events();

        store.set_easing_duration(a, 0);
        store.set_position(a, Point::new(5.0, 5.0));
        assert!(store.transition(a, "position").is_none());
        assert_eq!(store.fixed_position(a), Some(Point::new(5.0, 5.0)));
        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert!(stopped(&events, "position").is_empty());
    }

    #[test]
    fn removing_a_playing_transition_is_silent() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        store.save_easing_state(a);
        store.set_easing_duration(a, 1000);
        store.set_opacity(a, 55);
        store.advance(0);
        store.advance(100);
        assert!(store.transition(a, "opacity").is_some_and(|t| t.timeline().is_playing()));
        store.drain_events();

        assert!(store.remove_transition(a, "opacity").is_some());
        assert!(store.transition_names(a).is_empty());
        store.advance(200);
        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert!(stopped(&events, "opacity").is_empty());
        assert!(!events.iter().any(|e| e.kind == ActorEventKind::TransitionsCompleted));
    }

    #[test]
    fn explicit_transition_takes_its_start_from_the_actor() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.set_scale_z(a, 2.0);
        let t = PropertyTransition::new("scale-z", Interval::to(Value::Float(4.0)), 100);
        assert!(store.add_transition(a, "grow", t.clone()));
        assert!(!store.add_transition(a, "grow", t));
        assert_eq!(
            store.transition(a, "grow").and_then(|t| t.interval().initial()),
            Some(Value::Float(2.0))
        );

        store.advance(0);
        store.advance(100);
        assert_eq!(store.scale_z(a), 4.0);
        // Explicit transitions stay until removed.
        assert!(store.transition(a, "grow").is_some());
        assert!(store.remove_transition(a, "grow").is_some());
        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert_eq!(stopped(&events, "grow"), vec![true]);
    }

    #[test]
    fn easing_setters_need_a_saved_state() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.set_easing_duration(a, 500);
        assert_eq!(store.easing_duration(a), 0);
        store.save_easing_state(a);
        assert_eq!(store.easing_duration(a), 250);
        assert_eq!(store.easing_mode(a), AnimationMode::EaseOutCubic);
        store.set_easing_delay(a, 30);
        assert_eq!(store.easing_delay(a), 30);
        store.restore_easing_state(a);
        store.restore_easing_state(a);
        assert_eq!(store.easing_delay(a), 0);
    }

    #[test]
    fn removing_a_child_stops_its_implicit_transitions() {
        let mut store = ActorStore::new();
        let a = mapped_actor(&mut store);
        let stage = store.parent(a).unwrap();
        store.save_easing_state(a);
        store.set_opacity(a, 0);
        store.advance(0);
        store.drain_events();

        store.remove_child(stage, a);
        assert!(store.transition_names(a).is_empty());
        let events: Vec<ActorEvent> = store.drain_events().collect();
        assert_eq!(stopped(&events, "opacity"), vec![false]);
        assert!(events.iter().any(|e| e.kind == ActorEventKind::TransitionsCompleted));
    }
}
