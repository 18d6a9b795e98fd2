// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content delegates.

use kurbo::{Rect, Size};

use crate::actor::ActorId;
use crate::paint::PaintNode;
use crate::property::Animatable;

/// Something an actor paints inside its content box, such as an image.
///
/// When the content changes it should call
/// [`ActorStore::invalidate_content`](crate::actor::ActorStore::invalidate_content)
/// for each actor it is attached to.
pub trait Content: Animatable {
    /// Intrinsic size, if the content has one.
    fn preferred_size(&self) -> Option<Size> {
        None
    }

    /// Paints into `node`. `content_box` is in the actor's coordinates.
    fn paint_content(&self, actor: ActorId, content_box: Rect, opacity: u8, node: &mut dyn PaintNode);

    /// The content was set on `actor`.
    fn attached(&self, actor: ActorId) {
        _ = actor;
    }

    /// The content was removed from `actor`.
    fn detached(&self, actor: ActorId) {
        _ = actor;
    }
}
