//! Tree-level algorithms: construction, insertion with proactive splitting,
//! the borrow/merge deletion cascade, and the search family.
//!
//! ## Insertion
//!
//! `add` probes for the key first (the tree is a set under the comparator's
//! exact mode), then descends from the root splitting any full child it is
//! about to enter. Splitting before descending means the promoted median
//! always has room in the parent, so the recursion never re-ascends. The
//! root is the only node whose split grows the tree's height.
//!
//! ## Deletion
//!
//! `delete` maintains the dual guarantee: it never recurses into a child
//! holding only the minimum key count. Before each descent the target child
//! is topped up — borrow a key from a sibling with spare capacity (rotating
//! through the separator), or merge two minimal siblings around their
//! separator. A key found in an internal node is replaced by its in-order
//! predecessor (or successor) which is then deleted from the leaf level by
//! the same discipline. Height shrinks only when a merge drains the root.
//!
//! ## Search variants
//!
//! All searches are single descents: exact membership, rank lookup
//! (`search_position`), and four partial-match forms driven by the
//! comparator's like mode. The "last" forms steer the descent with the
//! like-mode descending position so they land on the highest-ranked key of
//! a matching run; the "soft" forms relax the acceptance test at the stop
//! position from equality to a directional bound.

use std::cmp::Ordering;

use eyre::{ensure, Result};

use super::node::Node;

/// Caller-supplied, dual-mode key ordering.
///
/// `cmp_exact` must be a total order over keys and is used for all
/// structural decisions and membership tests. `cmp_like` is the relaxed
/// "like" mode backing the partial-match searches: it should treat a key as
/// equal to any stored key of which it is a logical prefix, and defaults to
/// the exact order for key types with no prefix notion.
///
/// Both modes must agree on non-matching keys (a key that is like-equal to
/// a stored key must order between that key's exact neighbors), which every
/// natural prefix relation satisfies.
pub trait KeyOrder<K> {
    /// Total order over keys; `Equal` only for identical keys.
    fn cmp_exact(&self, a: &K, b: &K) -> Ordering;

    /// Relaxed order where `a` compares `Equal` to any `b` it logically
    /// prefixes. Defaults to the exact order.
    fn cmp_like(&self, a: &K, b: &K) -> Ordering {
        self.cmp_exact(a, b)
    }
}

/// [`KeyOrder`] for keys that already carry a total order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: Ord> KeyOrder<K> for NaturalOrder {
    fn cmp_exact(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Order-configurable B-tree of unique keys.
///
/// The tree owns its keys; ordering is delegated entirely to the
/// comparator supplied at construction, which is used unchanged for every
/// subsequent operation. Absence is reported as `None`/`false`, never as
/// an error.
#[derive(Debug)]
pub struct BTree<K, C> {
    pub(crate) root: Box<Node<K>>,
    pub(crate) cmp: C,
    pub(crate) order: usize,
}

impl<K, C: KeyOrder<K>> BTree<K, C> {
    /// Creates an empty tree holding at most `order` keys per node.
    ///
    /// Orders below 3 are rejected: order 2 makes the minimum occupancy
    /// zero, which legalizes empty non-root nodes.
    pub fn new(order: usize, cmp: C) -> Result<Self> {
        ensure!(order >= 3, "tree order must be at least 3, got {order}");
        Ok(BTree {
            root: Box::new(Node::new(order)),
            cmp,
            order,
        })
    }

    /// Maximum number of keys per node, fixed at construction.
    pub fn order(&self) -> usize {
        self.order
    }

    /// True when the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.keys.is_empty()
    }

    /// The root node, for structural inspection via [`Node::walk`].
    pub fn root(&self) -> &Node<K> {
        &self.root
    }

    /// Drops every key and resets the tree to a single empty leaf root.
    pub fn clear(&mut self) {
        self.root = Box::new(Node::new(self.order));
    }

    /// Pre-order traversal of every node; the callback aborts the walk by
    /// returning `false`. Returns whether the walk ran to completion.
    pub fn walk<F>(&self, callback: &mut F) -> bool
    where
        F: FnMut(&Node<K>) -> bool,
    {
        self.root.walk(callback)
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Inserts `key`, returning `false` (tree unchanged) when an exact
    /// match is already present.
    pub fn add(&mut self, key: K) -> bool {
        if self.search(&key).is_some() {
            return false;
        }
        if self.root.is_full(self.order) {
            let old_root = std::mem::replace(&mut self.root, Box::new(Node::new(self.order)));
            self.root.children.push(old_root);
            self.root.split_child(0, self.order);
        }
        Self::insert_non_full(&self.cmp, self.order, &mut self.root, key);
        true
    }

    fn insert_non_full(cmp: &C, order: usize, node: &mut Node<K>, key: K) {
        let mut index = node
            .keys
            .partition_point(|k| cmp.cmp_exact(&key, k) == Ordering::Greater);
        if node.is_leaf() {
            node.keys.insert(index, key);
            return;
        }
        if node.children[index].is_full(order) {
            node.split_child(index, order);
            if cmp.cmp_exact(&key, &node.keys[index]) == Ordering::Greater {
                index += 1;
            }
        }
        Self::insert_non_full(cmp, order, &mut node.children[index], key);
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Removes the key matching `key` under the exact order and returns
    /// it, or `None` when absent.
    pub fn delete(&mut self, key: &K) -> Option<K> {
        let removed = Self::remove_from(&self.cmp, self.order, &mut self.root, key);
        if self.root.keys.is_empty() && !self.root.is_leaf() {
            // A merge absorbed the root's last separator; its lone child
            // becomes the new root and the tree loses a level.
            let merged = self.root.children.remove(0);
            self.root = merged;
        }
        removed
    }

    fn remove_from(cmp: &C, order: usize, node: &mut Node<K>, key: &K) -> Option<K> {
        if node.is_leaf() {
            let index = node.find_exact(|k| cmp.cmp_exact(key, k))?;
            return Some(node.keys.remove(index));
        }
        let spare = (order + 1) / 2;
        if let Some(index) = node.find_exact(|k| cmp.cmp_exact(key, k)) {
            if node.children[index].key_count() >= spare {
                let predecessor = Self::remove_greatest(order, &mut node.children[index]);
                Some(std::mem::replace(&mut node.keys[index], predecessor))
            } else if node.children[index + 1].key_count() >= spare {
                let successor = Self::remove_least(order, &mut node.children[index + 1]);
                Some(std::mem::replace(&mut node.keys[index], successor))
            } else {
                node.merge_children(index);
                Self::remove_from(cmp, order, &mut node.children[index], key)
            }
        } else {
            let mut index = Self::subtree_index(cmp, node, key);
            if node.children[index].key_count() < spare {
                index = Self::refill_child(order, node, index);
            }
            Self::remove_from(cmp, order, &mut node.children[index], key)
        }
    }

    /// Index of the child whose subtree must contain `key`, given that
    /// `key` is not in `node` itself.
    fn subtree_index(cmp: &C, node: &Node<K>, key: &K) -> usize {
        let index = node.asc_position(|k| cmp.cmp_exact(key, k));
        if cmp.cmp_exact(key, &node.keys[index]) == Ordering::Less {
            index
        } else {
            node.key_count()
        }
    }

    /// Brings the child at `index` above minimum occupancy before a
    /// descent, borrowing from a spare sibling or merging with one (left
    /// preferred). Returns the child's index after rebalancing, which
    /// shifts down by one when it is merged into its left sibling.
    fn refill_child(order: usize, node: &mut Node<K>, index: usize) -> usize {
        let spare = (order + 1) / 2;
        if index > 0 && node.children[index - 1].key_count() >= spare {
            node.rotate_from_left(index);
            index
        } else if index < node.key_count() && node.children[index + 1].key_count() >= spare {
            node.rotate_from_right(index);
            index
        } else if index > 0 {
            node.merge_children(index - 1);
            index - 1
        } else {
            node.merge_children(index);
            index
        }
    }

    /// Removes and returns the greatest key of the subtree at `node`,
    /// topping up each child before descending into it.
    fn remove_greatest(order: usize, node: &mut Node<K>) -> K {
        if node.is_leaf() {
            let last = node.keys.len() - 1;
            return node.keys.remove(last);
        }
        let spare = (order + 1) / 2;
        let mut index = node.key_count();
        if node.children[index].key_count() < spare {
            index = Self::refill_child(order, node, index);
        }
        Self::remove_greatest(order, &mut node.children[index])
    }

    /// Mirror of [`remove_greatest`](BTree::remove_greatest) for the least
    /// key.
    fn remove_least(order: usize, node: &mut Node<K>) -> K {
        if node.is_leaf() {
            return node.keys.remove(0);
        }
        let spare = (order + 1) / 2;
        let mut index = 0;
        if node.children[index].key_count() < spare {
            index = Self::refill_child(order, node, index);
        }
        Self::remove_least(order, &mut node.children[index])
    }

    // ------------------------------------------------------------------
    // Search family
    // ------------------------------------------------------------------

    /// Exact-match lookup; returns the stored key.
    pub fn search(&self, key: &K) -> Option<&K> {
        let mut node = self.root.as_ref();
        loop {
            if node.keys.is_empty() {
                return None;
            }
            let index = node.asc_position(|k| self.cmp.cmp_exact(key, k));
            let descend = match self.cmp.cmp_exact(key, &node.keys[index]) {
                Ordering::Equal => return Some(&node.keys[index]),
                Ordering::Less => index,
                Ordering::Greater => node.key_count(),
            };
            if node.is_leaf() {
                return None;
            }
            node = &node.children[descend];
        }
    }

    /// True when an exact match for `key` is stored.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// In-order rank lookup, 1-indexed: the `position`-th smallest key, or
    /// `None` when `position` is 0 or past the key count.
    pub fn search_position(&self, position: usize) -> Option<&K> {
        if position == 0 {
            return None;
        }
        let mut remaining = position;
        Self::position_in(&self.root, &mut remaining)
    }

    fn position_in<'a>(node: &'a Node<K>, remaining: &mut usize) -> Option<&'a K> {
        if node.is_leaf() {
            if *remaining <= node.key_count() {
                return Some(&node.keys[*remaining - 1]);
            }
            *remaining -= node.key_count();
            return None;
        }
        for index in 0..node.key_count() {
            if let Some(found) = Self::position_in(&node.children[index], remaining) {
                return Some(found);
            }
            *remaining -= 1;
            if *remaining == 0 {
                return Some(&node.keys[index]);
            }
        }
        Self::position_in(&node.children[node.key_count()], remaining)
    }

    /// Exact match if one exists, otherwise the key adjacent to where the
    /// exact search stopped, provided it is like-equal to `key`. A single
    /// best-effort partial match, not a range.
    pub fn search_like(&self, key: &K) -> Option<&K> {
        Self::like_in(&self.cmp, &self.root, key, false)
    }

    /// [`search_like`](BTree::search_like) with the acceptance test
    /// relaxed from like-equality to "not like-less" at the stop position.
    pub fn search_soft_like(&self, key: &K) -> Option<&K> {
        Self::like_in(&self.cmp, &self.root, key, true)
    }

    fn like_in<'a>(cmp: &C, node: &'a Node<K>, key: &K, soft: bool) -> Option<&'a K> {
        if node.keys.is_empty() {
            return None;
        }
        let index = node.asc_position(|k| cmp.cmp_exact(key, k));
        let descend = match cmp.cmp_exact(key, &node.keys[index]) {
            Ordering::Equal => return Some(&node.keys[index]),
            Ordering::Less => index,
            Ordering::Greater => node.key_count(),
        };
        if !node.is_leaf() {
            if let Some(found) = Self::like_in(cmp, &node.children[descend], key, soft) {
                return Some(found);
            }
        }
        if descend < node.key_count() {
            let like = cmp.cmp_like(key, &node.keys[descend]);
            let accepted = if soft {
                like != Ordering::Less
            } else {
                like == Ordering::Equal
            };
            if accepted {
                return Some(&node.keys[descend]);
            }
        }
        None
    }

    /// The highest-ranked key that is like-equal to `key`. The descent is
    /// steered by the like-mode descending position, so the whole matching
    /// run is kept to the search path's right and its last member is the
    /// first candidate examined on the way back up.
    pub fn search_last_like(&self, key: &K) -> Option<&K> {
        Self::last_like_in(&self.cmp, &self.root, key, false)
    }

    /// [`search_last_like`](BTree::search_last_like) with a fallback: when
    /// no like-equal key exists, accepts the key just past the stop
    /// position provided `key` is not like-greater than it.
    pub fn search_soft_last_like(&self, key: &K) -> Option<&K> {
        Self::last_like_in(&self.cmp, &self.root, key, true)
    }

    fn last_like_in<'a>(cmp: &C, node: &'a Node<K>, key: &K, soft: bool) -> Option<&'a K> {
        if node.keys.is_empty() {
            return None;
        }
        let index = node.desc_position(|k| cmp.cmp_like(key, k));
        let like = cmp.cmp_like(key, &node.keys[index]);
        let descend = if like == Ordering::Less { 0 } else { index + 1 };
        if !node.is_leaf() {
            if let Some(found) = Self::last_like_in(cmp, &node.children[descend], key, soft) {
                return Some(found);
            }
        }
        if like == Ordering::Equal {
            return Some(&node.keys[index]);
        }
        if soft && descend < node.key_count() && cmp.cmp_like(key, &node.keys[descend]) != Ordering::Greater
        {
            return Some(&node.keys[descend]);
        }
        None
    }
}
