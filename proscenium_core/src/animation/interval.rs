// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed value ranges.

use crate::property::{Value, ValueKind};

/// The range a transition interpolates over.
///
/// The initial value may be left unset; the owning actor fills it in with
/// the property's current value when the transition is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    initial: Option<Value>,
    final_value: Value,
}

impl Interval {
    /// An interval between two values of the same kind.
    ///
    /// Returns `None` when the kinds differ.
    #[must_use]
    pub fn new(initial: Value, final_value: Value) -> Option<Self> {
        (initial.kind() == final_value.kind()).then_some(Self {
            initial: Some(initial),
            final_value,
        })
    }

    /// An interval whose start is taken from the animated object later.
    #[must_use]
    pub fn to(final_value: Value) -> Self {
        Self {
            initial: None,
            final_value,
        }
    }

    /// Kind of the values in the interval.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.final_value.kind()
    }

    /// Start value, if known.
    #[must_use]
    pub fn initial(&self) -> Option<Value> {
        self.initial
    }

    /// End value.
    #[must_use]
    pub fn final_value(&self) -> Value {
        self.final_value
    }

    /// Replaces the start value. Ignored (with a warning) on a kind mismatch.
    pub fn set_initial(&mut self, value: Value) {
        if value.kind() != self.kind() {
            tracing::warn!(
                expected = ?self.kind(),
                found = ?value.kind(),
                "interval initial value has the wrong kind"
            );
            return;
        }
        self.initial = Some(value);
    }

    /// Replaces the end value. Ignored (with a warning) on a kind mismatch.
    pub fn set_final(&mut self, value: Value) {
        if value.kind() != self.kind() {
            tracing::warn!(
                expected = ?self.kind(),
                found = ?value.kind(),
                "interval final value has the wrong kind"
            );
            return;
        }
        self.final_value = value;
    }

    /// Whether both ends are known.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.initial.is_some()
    }

    /// The value at `progress`, which may leave `[0, 1]` for overshooting
    /// easing curves.
    #[must_use]
    pub fn compute(&self, progress: f64) -> Option<Value> {
        self.initial?.interpolate(&self.final_value, progress)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    #[test]
    fn rejects_mismatched_kinds() {
        assert!(Interval::new(Value::Float(0.0), Value::Bool(true)).is_none());
    }

    #[test]
    fn computes_between_ends() {
        let i = Interval::new(Value::Float(10.0), Value::Float(20.0)).unwrap();
        assert_eq!(i.compute(0.25), Some(Value::Float(12.5)));
        assert_eq!(i.compute(1.0), Some(Value::Float(20.0)));
    }

    #[test]
    fn unset_initial_yields_nothing() {
        let mut i = Interval::to(Value::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!i.is_valid());
        assert_eq!(i.compute(0.5), None);
        i.set_initial(Value::Rect(Rect::ZERO));
        assert_eq!(
            i.compute(0.5),
            Some(Value::Rect(Rect::new(0.0, 0.0, 5.0, 5.0)))
        );
    }

    #[test]
    fn wrong_kind_setters_are_ignored() {
        let mut i = Interval::new(Value::Uint8(0), Value::Uint8(255)).unwrap();
        i.set_final(Value::Float(1.0));
        assert_eq!(i.final_value(), Value::Uint8(255));
    }
}
