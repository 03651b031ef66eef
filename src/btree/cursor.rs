//! Resumable bidirectional traversal over a [`BTree`].
//!
//! A cursor suspends an in-order walk between calls by keeping its own
//! stack of `(node, index)` frames instead of borrowing the call stack.
//! Frames are pushed as the traversal descends and popped as it unwinds;
//! a single `descended` flag records whether the child at the top frame's
//! current index has already been visited, which is what lets a frame's
//! trailing child be entered exactly once before the frame pops.
//!
//! Frame-stack invariants:
//! - The bottom frame always refers to the tree's root.
//! - Every frame below the top holds the child index through which the
//!   traversal descended to the frame above it.
//! - The top frame's index is the cursor position: `next` yields the key
//!   at the position and advances past it, `previous` steps back first and
//!   yields the key it lands on. A reverse enumeration is therefore
//!   `current_value` followed by `previous` to exhaustion.
//!
//! Cursors borrow the tree shared for their whole lifetime, so the tree
//! cannot be structurally mutated while any cursor is live.

use std::cmp::Ordering;

use smallvec::SmallVec;

use super::node::Node;
use super::tree::{BTree, KeyOrder};
use crate::iter::Iterate;

/// Frames kept inline before the stack spills to the heap. Eight levels
/// cover any realistic order/key-count combination.
const INLINE_DEPTH: usize = 8;

struct Frame<'t, K> {
    node: &'t Node<K>,
    index: usize,
}

impl<K> Clone for Frame<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Frame<'_, K> {}

type FrameStack<'t, K> = SmallVec<[Frame<'t, K>; INLINE_DEPTH]>;

/// Suspended in-order position inside a [`BTree`], created by the tree's
/// `cursor_*` constructors in a single O(log n) descent.
pub struct Cursor<'t, K, C> {
    tree: &'t BTree<K, C>,
    frames: FrameStack<'t, K>,
    /// True when the child at the top frame's current index has already
    /// been visited (set on every pop, cleared on every yield).
    descended: bool,
}

impl<K, C: KeyOrder<K>> BTree<K, C> {
    /// Cursor positioned at the in-order first key.
    pub fn cursor_first(&self) -> Cursor<'_, K, C> {
        let mut frames = FrameStack::new();
        let mut node = self.root.as_ref();
        while !node.is_leaf() {
            frames.push(Frame { node, index: 0 });
            node = &node.children[0];
        }
        frames.push(Frame { node, index: 0 });
        Cursor {
            tree: self,
            frames,
            descended: false,
        }
    }

    /// Cursor positioned at the in-order last key.
    pub fn cursor_last(&self) -> Cursor<'_, K, C> {
        let mut frames = FrameStack::new();
        let mut node = self.root.as_ref();
        while !node.is_leaf() {
            frames.push(Frame {
                node,
                index: node.key_count(),
            });
            node = &node.children[node.key_count()];
        }
        frames.push(Frame {
            node,
            index: node.key_count().saturating_sub(1),
        });
        Cursor {
            tree: self,
            frames,
            descended: false,
        }
    }

    /// Cursor positioned at the exact match for `key`, or `None` when the
    /// key is absent. The ancestor chain is built during the same descent
    /// the search performs.
    pub fn cursor_seek(&self, key: &K) -> Option<Cursor<'_, K, C>> {
        let mut frames = FrameStack::new();
        let mut node = self.root.as_ref();
        loop {
            if node.keys.is_empty() {
                return None;
            }
            let index = node.asc_position(|k| self.cmp.cmp_exact(key, k));
            let descend = match self.cmp.cmp_exact(key, &node.keys[index]) {
                Ordering::Equal => {
                    frames.push(Frame { node, index });
                    return Some(self.positioned(frames));
                }
                Ordering::Less => index,
                Ordering::Greater => node.key_count(),
            };
            if node.is_leaf() {
                return None;
            }
            frames.push(Frame {
                node,
                index: descend,
            });
            node = &node.children[descend];
        }
    }

    /// Cursor positioned where [`search_like`](BTree::search_like) would
    /// match, or `None`.
    pub fn cursor_seek_like(&self, key: &K) -> Option<Cursor<'_, K, C>> {
        let mut frames = FrameStack::new();
        Self::seek_like_in(&self.cmp, &self.root, key, false, &mut frames)
            .then(|| self.positioned(frames))
    }

    /// Cursor positioned where [`search_soft_like`](BTree::search_soft_like)
    /// would match, or `None`.
    pub fn cursor_seek_soft_like(&self, key: &K) -> Option<Cursor<'_, K, C>> {
        let mut frames = FrameStack::new();
        Self::seek_like_in(&self.cmp, &self.root, key, true, &mut frames)
            .then(|| self.positioned(frames))
    }

    /// Cursor positioned where [`search_last_like`](BTree::search_last_like)
    /// would match, or `None`.
    pub fn cursor_seek_last_like(&self, key: &K) -> Option<Cursor<'_, K, C>> {
        let mut frames = FrameStack::new();
        Self::seek_last_like_in(&self.cmp, &self.root, key, false, &mut frames)
            .then(|| self.positioned(frames))
    }

    /// Cursor positioned where
    /// [`search_soft_last_like`](BTree::search_soft_last_like) would match,
    /// or `None`.
    pub fn cursor_seek_soft_last_like(&self, key: &K) -> Option<Cursor<'_, K, C>> {
        let mut frames = FrameStack::new();
        Self::seek_last_like_in(&self.cmp, &self.root, key, true, &mut frames)
            .then(|| self.positioned(frames))
    }

    fn positioned<'t>(&'t self, frames: FrameStack<'t, K>) -> Cursor<'t, K, C> {
        // A position on an internal node's key resumes forward from that
        // key: its left subtree counts as already visited.
        let descended = frames.last().is_some_and(|frame| !frame.node.is_leaf());
        Cursor {
            tree: self,
            frames,
            descended,
        }
    }

    fn seek_like_in<'t>(
        cmp: &C,
        node: &'t Node<K>,
        key: &K,
        soft: bool,
        frames: &mut FrameStack<'t, K>,
    ) -> bool {
        if node.keys.is_empty() {
            return false;
        }
        let index = node.asc_position(|k| cmp.cmp_exact(key, k));
        let descend = match cmp.cmp_exact(key, &node.keys[index]) {
            Ordering::Equal => {
                frames.push(Frame { node, index });
                return true;
            }
            Ordering::Less => index,
            Ordering::Greater => node.key_count(),
        };
        if !node.is_leaf() {
            frames.push(Frame {
                node,
                index: descend,
            });
            if Self::seek_like_in(cmp, &node.children[descend], key, soft, frames) {
                return true;
            }
            frames.pop();
        }
        if descend < node.key_count() {
            let like = cmp.cmp_like(key, &node.keys[descend]);
            let accepted = if soft {
                like != Ordering::Less
            } else {
                like == Ordering::Equal
            };
            if accepted {
                frames.push(Frame {
                    node,
                    index: descend,
                });
                return true;
            }
        }
        false
    }

    fn seek_last_like_in<'t>(
        cmp: &C,
        node: &'t Node<K>,
        key: &K,
        soft: bool,
        frames: &mut FrameStack<'t, K>,
    ) -> bool {
        if node.keys.is_empty() {
            return false;
        }
        let index = node.desc_position(|k| cmp.cmp_like(key, k));
        let like = cmp.cmp_like(key, &node.keys[index]);
        let descend = if like == Ordering::Less { 0 } else { index + 1 };
        if !node.is_leaf() {
            frames.push(Frame {
                node,
                index: descend,
            });
            if Self::seek_last_like_in(cmp, &node.children[descend], key, soft, frames) {
                return true;
            }
            frames.pop();
        }
        if like == Ordering::Equal {
            frames.push(Frame { node, index });
            return true;
        }
        if soft
            && descend < node.key_count()
            && cmp.cmp_like(key, &node.keys[descend]) != Ordering::Greater
        {
            frames.push(Frame {
                node,
                index: descend,
            });
            return true;
        }
        false
    }
}

impl<'t, K, C: KeyOrder<K>> Cursor<'t, K, C> {
    /// True when the cursor points at a key.
    pub fn valid(&self) -> bool {
        self.current_value().is_some()
    }

    /// The key at the cursor position, without moving.
    pub fn current_value(&self) -> Option<&'t K> {
        let frame = self.frames.last()?;
        frame.node.keys.get(frame.index)
    }

    /// True if [`next`](Cursor::next) would yield a key.
    pub fn has_next(&self) -> bool {
        let mut descended = self.descended;
        for frame in self.frames.iter().rev() {
            if frame.index < frame.node.key_count() {
                return true;
            }
            if !frame.node.is_leaf() && !descended {
                return true;
            }
            descended = true;
        }
        false
    }

    /// True if [`previous`](Cursor::previous) would yield a key.
    pub fn has_previous(&self) -> bool {
        let mut descended = self.descended;
        for frame in self.frames.iter().rev() {
            if frame.index > 0 {
                return true;
            }
            if !frame.node.is_leaf() && !descended {
                return true;
            }
            descended = true;
        }
        false
    }

    /// Yields the key at the position and advances to the next in-order
    /// key, descending into unvisited subtrees and popping exhausted
    /// frames as needed. `None` at the true end.
    pub fn next(&mut self) -> Option<&'t K> {
        loop {
            let depth = self.frames.len();
            if depth == 0 {
                return None;
            }
            let Frame { node, index } = self.frames[depth - 1];
            if index < node.key_count() {
                if node.is_leaf() || self.descended {
                    self.frames[depth - 1].index = index + 1;
                    self.descended = false;
                    return Some(&node.keys[index]);
                }
                self.frames.push(Frame {
                    node: &node.children[index],
                    index: 0,
                });
            } else if !node.is_leaf() && !self.descended {
                // The trailing child still holds keys greater than every
                // key of this frame.
                self.frames.push(Frame {
                    node: &node.children[index],
                    index: 0,
                });
            } else if depth > 1 {
                self.frames.pop();
                self.descended = true;
            } else {
                return None;
            }
        }
    }

    /// Steps back to the previous in-order key and yields it, the
    /// structural mirror of [`next`](Cursor::next). `None` at the true
    /// beginning.
    pub fn previous(&mut self) -> Option<&'t K> {
        loop {
            let depth = self.frames.len();
            if depth == 0 {
                return None;
            }
            let Frame { node, index } = self.frames[depth - 1];
            if index > 0 {
                if node.is_leaf() || self.descended {
                    self.frames[depth - 1].index = index - 1;
                    self.descended = false;
                    return Some(&node.keys[index - 1]);
                }
                let child = &node.children[index];
                self.frames.push(Frame {
                    node: child,
                    index: child.key_count(),
                });
            } else if !node.is_leaf() && !self.descended {
                let child = &node.children[0];
                self.frames.push(Frame {
                    node: child,
                    index: child.key_count(),
                });
            } else if depth > 1 {
                self.frames.pop();
                self.descended = true;
            } else {
                return None;
            }
        }
    }

    /// Discards the frame chain and repositions at the in-order first key.
    pub fn first(&mut self) {
        *self = self.tree.cursor_first();
    }

    /// Discards the frame chain and repositions at the in-order last key.
    pub fn last(&mut self) {
        *self = self.tree.cursor_last();
    }
}

impl<'t, K, C: KeyOrder<K>> Iterate for Cursor<'t, K, C> {
    type Item = &'t K;

    fn has_next(&self) -> bool {
        Cursor::has_next(self)
    }

    fn next(&mut self) -> Option<&'t K> {
        Cursor::next(self)
    }

    fn current_value(&self) -> Option<&'t K> {
        Cursor::current_value(self)
    }

    fn first(&mut self) {
        Cursor::first(self);
    }

    fn last(&mut self) {
        Cursor::last(self);
    }

    fn has_previous(&self) -> bool {
        Cursor::has_previous(self)
    }

    fn previous(&mut self) -> Option<&'t K> {
        Cursor::previous(self)
    }

    // remove/add keep the unsupported defaults: deleting the current key
    // could trigger a merge that invalidates every ancestor frame, and the
    // borrow-based design has no way to re-derive the chain mid-flight.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::NaturalOrder;

    fn tree_with(order: usize, keys: &[i32]) -> BTree<i32, NaturalOrder> {
        let mut tree = BTree::new(order, NaturalOrder).unwrap();
        for &key in keys {
            assert!(tree.add(key));
        }
        tree
    }

    fn forward(tree: &BTree<i32, NaturalOrder>) -> Vec<i32> {
        let mut cursor = tree.cursor_first();
        let mut out = Vec::new();
        while let Some(key) = cursor.next() {
            out.push(*key);
        }
        out
    }

    #[test]
    fn forward_walk_is_complete_and_ordered() {
        let keys: Vec<i32> = (1..=100).collect();
        let tree = tree_with(3, &keys);
        assert_eq!(forward(&tree), keys);
    }

    #[test]
    fn reverse_walk_is_complete_and_ordered() {
        let keys: Vec<i32> = (1..=100).collect();
        let tree = tree_with(4, &keys);
        let mut cursor = tree.cursor_last();
        let mut out = vec![*cursor.current_value().unwrap()];
        while let Some(key) = cursor.previous() {
            out.push(*key);
        }
        let expected: Vec<i32> = (1..=100).rev().collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_tree_cursors_are_exhausted() {
        let tree = tree_with(3, &[]);
        let mut cursor = tree.cursor_first();
        assert!(!cursor.valid());
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
        assert_eq!(cursor.next(), None);
        let mut cursor = tree.cursor_last();
        assert_eq!(cursor.current_value(), None);
        assert_eq!(cursor.previous(), None);
    }

    #[test]
    fn next_and_previous_ping_pong() {
        let tree = tree_with(3, &[1, 2, 3, 4, 5]);
        let mut cursor = tree.cursor_first();
        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.next(), Some(&2));
        assert_eq!(cursor.previous(), Some(&2));
        assert_eq!(cursor.next(), Some(&2));
        assert_eq!(cursor.next(), Some(&3));
    }

    #[test]
    fn seek_positions_on_the_match() {
        let keys: Vec<i32> = (1..=50).collect();
        let tree = tree_with(3, &keys);
        for &key in &keys {
            let cursor = tree.cursor_seek(&key).unwrap();
            assert_eq!(cursor.current_value(), Some(&key));
        }
        assert!(tree.cursor_seek(&99).is_none());
    }

    #[test]
    fn seek_resumes_in_order_from_the_match() {
        let tree = tree_with(3, &[10, 20, 30, 40, 50, 60, 70]);
        let mut cursor = tree.cursor_seek(&40).unwrap();
        let rest: Vec<i32> = std::iter::from_fn(|| cursor.next().copied()).collect();
        assert_eq!(rest, vec![40, 50, 60, 70]);
    }

    #[test]
    fn has_next_agrees_with_next_at_every_step() {
        let tree = tree_with(3, &(1..=25).collect::<Vec<_>>());
        let mut cursor = tree.cursor_first();
        for _ in 1..=25 {
            assert!(cursor.has_next());
            assert!(cursor.next().is_some());
        }
        assert!(!cursor.has_next());
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn has_previous_agrees_with_previous_at_every_step() {
        let tree = tree_with(3, &(1..=25).collect::<Vec<_>>());
        let mut cursor = tree.cursor_last();
        for _ in 1..25 {
            assert!(cursor.has_previous());
            assert!(cursor.previous().is_some());
        }
        assert!(!cursor.has_previous());
        assert_eq!(cursor.previous(), None);
    }

    #[test]
    fn first_and_last_rebuild_the_chain() {
        let tree = tree_with(3, &[5, 1, 9, 3, 7]);
        let mut cursor = tree.cursor_seek(&7).unwrap();
        cursor.first();
        assert_eq!(cursor.current_value(), Some(&1));
        cursor.last();
        assert_eq!(cursor.current_value(), Some(&9));
        assert_eq!(cursor.previous(), Some(&7));
    }

    #[test]
    fn iterate_contract_mutations_are_unsupported() {
        let tree = tree_with(3, &[1, 2, 3]);
        let mut cursor = tree.cursor_first();
        assert!(!Iterate::remove(&mut cursor));
        assert!(!Iterate::add(&mut cursor, &4));
        // the tree is untouched
        assert_eq!(forward(&tree), vec![1, 2, 3]);
    }
}
