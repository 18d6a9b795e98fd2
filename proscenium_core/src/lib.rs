// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and actor tree for a retained-mode scene graph.
//!
//! `proscenium_core` keeps a tree of *actors*: rectangular nodes that
//! negotiate their size with their parent, carry a local 3D transform,
//! track which part of the screen they dirty, and animate property changes
//! implicitly. Actors live in an arena with generational handles, so
//! stale handles are detected instead of dangling.
//!
//! # Architecture
//!
//! A frame turns property writes into layout, damage and a paint
//! description:
//!
//! ```text
//!   setters / ActorStore::advance()
//!       │  (queue_relayout, queue_redraw, notify)
//!       ▼
//!   ActorStore::update_stage() ──► allocate ──► finish layout
//!       │                                         │
//!       │        ┌────────────────────────────────┘
//!       ▼        ▼
//!   StageHost::add_to_redraw_clip()   ActorEvent queue
//!       │
//!       ▼
//!   ActorStore::paint_stage() ──► PaintNode (layers + rectangles)
//! ```
//!
//! **[`actor`]**: The [`ActorStore`](actor::ActorStore) arena and every
//! operation on actors: tree edits, visibility and mapping, layout,
//! transforms, redraw queuing, painting, picking and transitions.
//!
//! **[`class`]**: The [`ActorClass`](class::ActorClass) trait through which
//! actor kinds override measuring, allocation, painting and mapping.
//!
//! **[`layout_manager`]**, **[`content`]**, **[`meta`]**: Delegates an
//! actor consults for child layout, content drawing, and attached actions,
//! constraints and effects.
//!
//! **[`stage`]** and **[`paint`]**: The contracts with the window system and
//! the paint backend.
//!
//! **[`dirty`]**: Propagation of absolute-geometry invalidation through
//! `understory_dirty`.
//!
//! **[`paint_volume`]**: Paint volumes, projection and frustum culling.
//!
//! **[`animation`]**: Timelines, easing curves, intervals and property
//! transitions.
//!
//! **[`property`]**, **[`error`]**: Name-addressed property access and its
//! errors.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`config`]**: Debug switches read from the environment.
//!
//! **[`testing`]**: Recording hosts and backends for tests.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod actor;
pub mod animation;
pub mod class;
pub mod config;
pub mod content;
pub mod dirty;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout_manager;
pub mod meta;
pub mod paint;
pub mod paint_volume;
pub mod property;
pub mod stage;
pub mod testing;
pub mod trace;
pub mod transform;
