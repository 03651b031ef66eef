//! # Order-configurable B-tree
//!
//! This module implements the library's ordered-key index structure. Unlike
//! a fixed-degree `std` map, the maximum number of keys per node (the
//! *order*) is chosen at construction, and key ordering is supplied by the
//! caller as a [`KeyOrder`] implementation rather than derived from `Ord`.
//!
//! ## Node shape
//!
//! Every node holds up to `order` keys; internal nodes hold `keys + 1`
//! children, and all leaves sit at the same depth:
//!
//! ```text
//!                 [ k3 ,        k7 ]
//!                /      |          \
//!        [k1, k2]   [k4, k5, k6]   [k8, k9]
//! ```
//!
//! Child `i` spans the open interval between keys `i-1` and `i`. After any
//! completed `add`/`delete`, every non-root node holds at least
//! `ceil(order/2) - 1` keys (the classic minimum-occupancy invariant).
//!
//! ## Mutation discipline
//!
//! - **Insertion** splits any full node *before* routing a key through it,
//!   so the recursion never has to re-ascend. Tree height grows only by
//!   splitting a full root.
//! - **Deletion** guarantees, before every recursive descent, that the
//!   target child sits above minimum occupancy — borrowing a key from a
//!   spare sibling or merging two minimal siblings around their separator.
//!   Height shrinks only when a merge empties the root.
//!
//! ## Search modes
//!
//! The comparator's exact mode drives membership and structure. Its like
//! mode treats a short key as equal to any stored key it is a prefix of,
//! and powers four partial-match searches (`search_like` and friends) that
//! differ only in which end of the matching run they prefer and how strict
//! the acceptance test is.
//!
//! ## Cursors
//!
//! [`Cursor`] suspends an in-order (or reverse) traversal between calls by
//! keeping an explicit stack of `(node, index)` frames instead of borrowing
//! the call stack. Cursors are created in O(log n) positioned at either
//! end or at the result of any search variant, and implement the shared
//! [`Iterate`](crate::iter::Iterate) contract.

mod cursor;
mod node;
mod tree;

pub use cursor::Cursor;
pub use node::Node;
pub use tree::{BTree, KeyOrder, NaturalOrder};
