// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actions, constraints and effects attached to actors.
//!
//! Constraints take part in layout, so changing them queues a relayout.
//! Effects take part in painting and may grow the paint volume, so changing
//! them queues a paint-volume update and a redraw. Removing an entry also
//! drops the transitions animating its properties.

use std::rc::Rc;

use crate::meta::{Action, Constraint, Effect};
use crate::property::{MetaSection, PropertyPath};

use super::{ActorId, ActorStore};

impl ActorStore {
    // -- Actions --

    /// Attaches `action` under `name`. Returns `false` if the name is
    /// taken.
    pub fn add_action(&mut self, id: ActorId, name: &str, action: Rc<dyn Action>) -> bool {
        self.validate(id);
        if !self.node_mut(id).actions.add(name, Rc::clone(&action)) {
            return false;
        }
        action.attached(id);
        true
    }

    /// Detaches and returns the action named `name`.
    pub fn remove_action(&mut self, id: ActorId, name: &str) -> Option<Rc<dyn Action>> {
        self.validate(id);
        let action = self.node_mut(id).actions.remove(name)?;
        action.detached(id);
        self.remove_meta_transitions(id, MetaSection::Actions, name);
        Some(action)
    }

    /// The action named `name`.
    #[must_use]
    pub fn action(&self, id: ActorId, name: &str) -> Option<Rc<dyn Action>> {
        self.node(id).actions.get(name).cloned()
    }

    /// Names of the attached actions, in order.
    #[must_use]
    pub fn action_names(&self, id: ActorId) -> Vec<String> {
        self.node(id)
            .actions
            .iter()
            .map(|e| e.name().to_owned())
            .collect()
    }

    /// Enables or disables the action named `name`.
    pub fn set_action_enabled(&mut self, id: ActorId, name: &str, enabled: bool) -> bool {
        self.validate(id);
        self.node_mut(id).actions.set_enabled(name, enabled)
    }

    /// Detaches every action.
    pub fn clear_actions(&mut self, id: ActorId) {
        self.validate(id);
        let removed = self.node_mut(id).actions.clear();
        for entry in removed {
            entry.object().detached(id);
            self.remove_meta_transitions(id, MetaSection::Actions, entry.name());
        }
    }

    // -- Constraints --

    /// Attaches `constraint` under `name` and queues a relayout. Returns
    /// `false` if the name is taken.
    pub fn add_constraint(&mut self, id: ActorId, name: &str, constraint: Rc<dyn Constraint>) -> bool {
        self.validate(id);
        if !self.node_mut(id).constraints.add(name, constraint) {
            return false;
        }
        self.queue_relayout(id);
        true
    }

    /// Detaches and returns the constraint named `name`.
    pub fn remove_constraint(&mut self, id: ActorId, name: &str) -> Option<Rc<dyn Constraint>> {
        self.validate(id);
        let constraint = self.node_mut(id).constraints.remove(name)?;
        self.remove_meta_transitions(id, MetaSection::Constraints, name);
        self.queue_relayout(id);
        Some(constraint)
    }

    /// The constraint named `name`.
    #[must_use]
    pub fn constraint(&self, id: ActorId, name: &str) -> Option<Rc<dyn Constraint>> {
        self.node(id).constraints.get(name).cloned()
    }

    /// Names of the attached constraints, in order.
    #[must_use]
    pub fn constraint_names(&self, id: ActorId) -> Vec<String> {
        self.node(id)
            .constraints
            .iter()
            .map(|e| e.name().to_owned())
            .collect()
    }

    /// Enables or disables the constraint named `name`.
    pub fn set_constraint_enabled(&mut self, id: ActorId, name: &str, enabled: bool) -> bool {
        self.validate(id);
        let found = self.node_mut(id).constraints.set_enabled(name, enabled);
        if found {
            self.queue_relayout(id);
        }
        found
    }

    /// Detaches every constraint.
    pub fn clear_constraints(&mut self, id: ActorId) {
        self.validate(id);
        let removed = self.node_mut(id).constraints.clear();
        if removed.is_empty() {
            return;
        }
        for entry in &removed {
            self.remove_meta_transitions(id, MetaSection::Constraints, entry.name());
        }
        if !self.node(id).in_destruction() {
            self.queue_relayout(id);
        }
    }

    // -- Effects --

    /// Attaches `effect` under `name`, after the existing effects. Returns
    /// `false` if the name is taken.
    pub fn add_effect(&mut self, id: ActorId, name: &str, effect: Rc<dyn Effect>) -> bool {
        self.validate(id);
        if !self.node_mut(id).effects.add(name, effect) {
            return false;
        }
        self.effects_changed(id);
        true
    }

    /// Detaches and returns the effect named `name`.
    pub fn remove_effect(&mut self, id: ActorId, name: &str) -> Option<Rc<dyn Effect>> {
        self.validate(id);
        let effect = self.node_mut(id).effects.remove(name)?;
        if self.node(id).effect_to_redraw.as_deref() == Some(name) {
            self.node_mut(id).effect_to_redraw = None;
        }
        self.remove_meta_transitions(id, MetaSection::Effects, name);
        self.effects_changed(id);
        Some(effect)
    }

    /// The effect named `name`.
    #[must_use]
    pub fn effect(&self, id: ActorId, name: &str) -> Option<Rc<dyn Effect>> {
        self.node(id).effects.get(name).cloned()
    }

    /// Names of the attached effects, in paint order.
    #[must_use]
    pub fn effect_names(&self, id: ActorId) -> Vec<String> {
        self.node(id)
            .effects
            .iter()
            .map(|e| e.name().to_owned())
            .collect()
    }

    /// Whether any effect is attached.
    #[must_use]
    pub fn has_effects(&self, id: ActorId) -> bool {
        !self.node(id).effects.is_empty()
    }

    /// Enables or disables the effect named `name`.
    pub fn set_effect_enabled(&mut self, id: ActorId, name: &str, enabled: bool) -> bool {
        self.validate(id);
        let found = self.node_mut(id).effects.set_enabled(name, enabled);
        if found {
            self.effects_changed(id);
        }
        found
    }

    /// Detaches every effect.
    pub fn clear_effects(&mut self, id: ActorId) {
        self.validate(id);
        let removed = self.node_mut(id).effects.clear();
        if removed.is_empty() {
            return;
        }
        self.node_mut(id).effect_to_redraw = None;
        for entry in &removed {
            self.remove_meta_transitions(id, MetaSection::Effects, entry.name());
        }
        if !self.node(id).in_destruction() {
            self.effects_changed(id);
        }
    }

    fn effects_changed(&mut self, id: ActorId) {
        self.queue_update_paint_volume(id);
        self.queue_redraw(id);
    }

    fn remove_meta_transitions(&mut self, id: ActorId, section: MetaSection, name: &str) {
        let prefix = PropertyPath::meta_prefix(section, name);
        self.remove_transitions_with_prefix(id, &prefix);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::animation::{Interval, PropertyTransition};
    use crate::property::{Animatable, Value};

    #[derive(Default)]
    struct Tap {
        attached: Cell<u32>,
        detached: Cell<u32>,
    }

    impl Animatable for Tap {}

    impl Action for Tap {
        fn attached(&self, _actor: ActorId) {
            self.attached.set(self.attached.get() + 1);
        }

        fn detached(&self, _actor: ActorId) {
            self.detached.set(self.detached.get() + 1);
        }
    }

    #[test]
    fn actions_are_told_when_they_come_and_go() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let tap = Rc::new(Tap::default());
        assert!(store.add_action(a, "tap", tap.clone()));
        assert!(!store.add_action(a, "tap", tap.clone()));
        assert_eq!(tap.attached.get(), 1);
        assert_eq!(store.action_names(a), vec!["tap".to_owned()]);

        assert!(store.remove_action(a, "tap").is_some());
        assert!(store.remove_action(a, "tap").is_none());
        assert_eq!(tap.detached.get(), 1);
    }

    #[test]
    fn destroy_detaches_actions() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let tap = Rc::new(Tap::default());
        store.add_action(a, "tap", tap.clone());
        store.destroy(a);
        assert_eq!(tap.detached.get(), 1);
    }

    #[test]
    fn removing_a_meta_drops_its_transitions() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.add_action(a, "tap", Rc::new(Tap::default()));
        let interval = Interval::new(Value::Float(0.0), Value::Float(1.0)).unwrap();
        store.add_transition(a, "@actions.tap.progress", PropertyTransition::new("@actions.tap.progress", interval.clone(), 100));
        store.add_transition(a, "x", PropertyTransition::new("x", interval, 100));

        store.remove_action(a, "tap");
        assert!(store.transition(a, "@actions.tap.progress").is_none());
        assert!(store.transition(a, "x").is_some());
    }

    #[test]
    fn effect_order_is_kept() {
        struct Nop;
        impl Animatable for Nop {}
        impl Effect for Nop {}

        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.add_effect(a, "one", Rc::new(Nop));
        store.add_effect(a, "two", Rc::new(Nop));
        store.add_effect(a, "three", Rc::new(Nop));
        store.remove_effect(a, "two");
        assert_eq!(store.effect_names(a), vec!["one".to_owned(), "three".to_owned()]);
        assert!(store.has_effects(a));
        store.clear_effects(a);
        assert!(!store.has_effects(a));
    }
}
