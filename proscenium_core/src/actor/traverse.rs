// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use std::collections::VecDeque;

use super::id::{ActorId, INVALID};
use super::store::ActorStore;

/// An iterator over the direct children of an actor, in paint order.
///
/// Created by [`ActorStore::children`]. Also iterates backwards.
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a ActorStore,
    front: u32,
    back: u32,
    remaining: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a ActorStore, parent: u32) -> Self {
        let node = &store.nodes[parent as usize];
        Self {
            store,
            front: node.first_child,
            back: node.last_child,
            remaining: node.n_children,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ActorId;

    fn next(&mut self) -> Option<ActorId> {
        if self.remaining == 0 || self.front == INVALID {
            return None;
        }
        let idx = self.front;
        self.front = self.store.nodes[idx as usize].next_sibling;
        self.remaining -= 1;
        Some(self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<ActorId> {
        if self.remaining == 0 || self.back == INVALID {
            return None;
        }
        let idx = self.back;
        self.back = self.store.nodes[idx as usize].prev_sibling;
        self.remaining -= 1;
        Some(self.store.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// A cursor over the children of an actor that tolerates removing or
/// destroying the current child.
///
/// Any other structural change to the parent's child list invalidates the
/// cursor: [`next`](Self::next) then logs a warning and returns `None`.
#[derive(Clone, Copy, Debug)]
pub struct ChildIter {
    root: ActorId,
    /// The last child returned, or [`INVALID`] before the first.
    current: u32,
    age: u64,
}

impl ChildIter {
    /// Starts iterating over the children of `root`.
    #[must_use]
    pub fn new(store: &ActorStore, root: ActorId) -> Self {
        Self {
            root,
            current: INVALID,
            age: store.node(root).age,
        }
    }

    /// Whether the parent's child list is unchanged since the cursor last
    /// moved.
    #[must_use]
    pub fn is_valid(&self, store: &ActorStore) -> bool {
        store.is_alive(self.root) && store.nodes[self.root.idx as usize].age == self.age
    }

    fn check(&self, store: &ActorStore) -> bool {
        if self.is_valid(store) {
            return true;
        }
        tracing::warn!(
            root = %self.root,
            "child iterator used after the child list changed"
        );
        false
    }

    /// Advances to the next child.
    pub fn next(&mut self, store: &ActorStore) -> Option<ActorId> {
        if !self.check(store) {
            return None;
        }
        let next = if self.current == INVALID {
            store.nodes[self.root.idx as usize].first_child
        } else {
            store.nodes[self.current as usize].next_sibling
        };
        if next == INVALID {
            return None;
        }
        self.current = next;
        Some(store.id_at(next))
    }

    /// Moves back to the previous child.
    pub fn prev(&mut self, store: &ActorStore) -> Option<ActorId> {
        if !self.check(store) {
            return None;
        }
        let prev = if self.current == INVALID {
            store.nodes[self.root.idx as usize].last_child
        } else {
            store.nodes[self.current as usize].prev_sibling
        };
        if prev == INVALID {
            return None;
        }
        self.current = prev;
        Some(store.id_at(prev))
    }

    fn take_current(&mut self, store: &ActorStore) -> Option<ActorId> {
        if !self.check(store) || self.current == INVALID {
            return None;
        }
        let cur = store.id_at(self.current);
        self.current = store.nodes[self.current as usize].prev_sibling;
        Some(cur)
    }

    /// Removes the child last returned by [`next`](Self::next). The removed
    /// actor stays alive as a detached root.
    pub fn remove(&mut self, store: &mut ActorStore) {
        if let Some(cur) = self.take_current(store) {
            store.remove_child(self.root, cur);
            self.age = store.nodes[self.root.idx as usize].age;
        }
    }

    /// Destroys the child last returned by [`next`](Self::next).
    pub fn destroy(&mut self, store: &mut ActorStore) {
        if let Some(cur) = self.take_current(store) {
            store.destroy(cur);
            self.age = store.nodes[self.root.idx as usize].age;
        }
    }
}

/// What a traversal callback wants to happen next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraverseVisit {
    /// Keep going.
    Continue,
    /// Do not descend into this actor's children.
    SkipChildren,
    /// Stop the whole traversal.
    Break,
}

impl ActorStore {
    /// Iterates the direct children of `id` in paint order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: ActorId) -> Children<'_> {
        self.validate(id);
        Children::new(self, id.idx)
    }

    /// Walks the subtree rooted at `root` depth first.
    ///
    /// `before` runs when an actor is entered and `after` once its children
    /// are done; both receive the depth relative to `root`. Returns
    /// [`TraverseVisit::Break`] if a callback stopped the walk.
    pub fn traverse_depth_first<B, A>(&mut self, root: ActorId, before: &mut B, after: &mut A) -> TraverseVisit
    where
        B: FnMut(&mut Self, ActorId, u32) -> TraverseVisit,
        A: FnMut(&mut Self, ActorId, u32) -> TraverseVisit,
    {
        self.validate(root);
        self.traverse_depth(root.idx, 0, before, after)
    }

    fn traverse_depth<B, A>(&mut self, idx: u32, depth: u32, before: &mut B, after: &mut A) -> TraverseVisit
    where
        B: FnMut(&mut Self, ActorId, u32) -> TraverseVisit,
        A: FnMut(&mut Self, ActorId, u32) -> TraverseVisit,
    {
        let id = self.id_at(idx);
        let visit = before(self, id, depth);
        if visit == TraverseVisit::Break {
            return TraverseVisit::Break;
        }
        if visit != TraverseVisit::SkipChildren && self.is_alive(id) {
            let mut child = self.nodes[idx as usize].first_child;
            while child != INVALID {
                let next = self.nodes[child as usize].next_sibling;
                if self.traverse_depth(child, depth + 1, before, after) == TraverseVisit::Break {
                    return TraverseVisit::Break;
                }
                child = next;
            }
        }
        if !self.is_alive(id) {
            return TraverseVisit::Continue;
        }
        after(self, id, depth)
    }

    /// Walks the subtree rooted at `root` breadth first, calling `visit` on
    /// each actor with its depth relative to `root`.
    pub fn traverse_breadth_first<F>(&mut self, root: ActorId, visit: &mut F) -> TraverseVisit
    where
        F: FnMut(&mut Self, ActorId, u32) -> TraverseVisit,
    {
        self.validate(root);
        let mut queue = VecDeque::from([(root, 0_u32)]);
        while let Some((id, depth)) = queue.pop_front() {
            if !self.is_alive(id) {
                continue;
            }
            match visit(self, id, depth) {
                TraverseVisit::Break => return TraverseVisit::Break,
                TraverseVisit::SkipChildren => {}
                TraverseVisit::Continue => {
                    if self.is_alive(id) {
                        queue.extend(self.children(id).map(|c| (c, depth + 1)));
                    }
                }
            }
        }
        TraverseVisit::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(store: &mut ActorStore) -> (ActorId, ActorId, ActorId, ActorId) {
        let root = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let a1 = store.create_actor();
        store.add_child(root, a);
        store.add_child(root, b);
        store.add_child(a, a1);
        (root, a, b, a1)
    }

    #[test]
    fn children_iterate_both_ways() {
        let mut store = ActorStore::new();
        let (root, a, b, _) = tree(&mut store);
        let fwd: Vec<_> = store.children(root).collect();
        let mut back: Vec<_> = store.children(root).rev().collect();
        back.reverse();
        assert_eq!(fwd, vec![a, b]);
        assert_eq!(fwd, back);
        assert_eq!(store.children(root).len(), 2);
    }

    #[test]
    fn depth_first_runs_after_children() {
        let mut store = ActorStore::new();
        let (root, a, b, a1) = tree(&mut store);
        let mut log = Vec::new();
        let mut after_log = Vec::new();
        store.traverse_depth_first(
            root,
            &mut |_, id, depth| {
                log.push((id, depth));
                TraverseVisit::Continue
            },
            &mut |_, id, _| {
                after_log.push(id);
                TraverseVisit::Continue
            },
        );
        assert_eq!(log, vec![(root, 0), (a, 1), (a1, 2), (b, 1)]);
        assert_eq!(after_log, vec![a1, a, b, root]);
    }

    #[test]
    fn skip_children_and_break() {
        let mut store = ActorStore::new();
        let (root, a, b, _) = tree(&mut store);
        let mut seen = Vec::new();
        store.traverse_depth_first(
            root,
            &mut |_, id, _| {
                seen.push(id);
                if id == a {
                    TraverseVisit::SkipChildren
                } else {
                    TraverseVisit::Continue
                }
            },
            &mut |_, _, _| TraverseVisit::Continue,
        );
        assert_eq!(seen, vec![root, a, b]);

        let mut count = 0;
        let result = store.traverse_breadth_first(root, &mut |_, _, _| {
            count += 1;
            if count == 2 {
                TraverseVisit::Break
            } else {
                TraverseVisit::Continue
            }
        });
        assert_eq!(result, TraverseVisit::Break);
        assert_eq!(count, 2);
    }

    #[test]
    fn breadth_first_order() {
        let mut store = ActorStore::new();
        let (root, a, b, a1) = tree(&mut store);
        let mut seen = Vec::new();
        store.traverse_breadth_first(root, &mut |_, id, depth| {
            seen.push((id, depth));
            TraverseVisit::Continue
        });
        assert_eq!(seen, vec![(root, 0), (a, 1), (b, 1), (a1, 2)]);
    }

    #[test]
    fn child_iter_survives_removal() {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        let kids: Vec<_> = (0..4)
            .map(|_| {
                let c = store.create_actor();
                store.add_child(root, c);
                c
            })
            .collect();
        let mut iter = ChildIter::new(&store, root);
        let mut i = 0;
        while let Some(child) = iter.next(&store) {
            if i % 2 == 0 {
                iter.remove(&mut store);
            } else {
                assert_eq!(child, kids[i]);
            }
            i += 1;
        }
        assert_eq!(i, 4);
        let left: Vec<_> = store.children(root).collect();
        assert_eq!(left, vec![kids[1], kids[3]]);
        assert!(store.parent(kids[0]).is_none());
    }

    #[test]
    fn child_iter_destroy() {
        let mut store = ActorStore::new();
        let (root, a, b, a1) = tree(&mut store);
        let mut iter = ChildIter::new(&store, root);
        while iter.next(&store).is_some() {
            iter.destroy(&mut store);
        }
        assert!(!store.is_alive(a));
        assert!(!store.is_alive(a1));
        assert!(!store.is_alive(b));
        assert_eq!(store.n_children(root), 0);
    }

    #[test]
    fn child_iter_invalidated_by_outside_change() {
        let mut store = ActorStore::new();
        let (root, _, _, _) = tree(&mut store);
        let mut iter = ChildIter::new(&store, root);
        assert!(iter.next(&store).is_some());
        let extra = store.create_actor();
        store.add_child(root, extra);
        assert!(!iter.is_valid(&store));
        assert_eq!(iter.next(&store), None);
    }
}
