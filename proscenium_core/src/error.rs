// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the string-addressed property API.
//!
//! Contract violations in the actor tree itself never surface as errors:
//! they are logged and the offending call becomes a no-op. Errors are
//! reserved for lookups driven by user-supplied names and values.

use crate::property::ValueKind;

/// Failure to read or write a property by name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// No property with this name exists on the target.
    #[error("unknown property `{0}`")]
    Unknown(String),
    /// The property exists but cannot be animated.
    #[error("property `{0}` is not animatable")]
    NotAnimatable(String),
    /// The supplied value has the wrong type.
    #[error("property `{name}` expects a {expected:?} value, got {found:?}")]
    TypeMismatch {
        /// Property name.
        name: String,
        /// Kind the property stores.
        expected: ValueKind,
        /// Kind that was supplied.
        found: ValueKind,
    },
    /// The property can only be read.
    #[error("property `{0}` is read-only")]
    ReadOnly(String),
    /// A `@section.name.property` path names a meta object that is not
    /// attached.
    #[error("no {section} named `{name}`")]
    NoSuchMeta {
        /// `actions`, `constraints` or `effects`.
        section: &'static str,
        /// The meta object's name.
        name: String,
    },
    /// A `@layout.` or `@content.` path was used on an actor without a
    /// layout manager or content.
    #[error("actor has no {0} delegate")]
    NoDelegate(&'static str),
}
