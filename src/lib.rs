//! # ordtree
//!
//! An order-configurable, in-memory B-tree with caller-supplied key
//! comparison. The tree stores opaque owned keys and delegates all ordering
//! decisions to a [`KeyOrder`] implementation with two modes: an exact total
//! order used for structure and membership, and a relaxed "like" order that
//! lets a short key match every stored key it is a logical prefix of. The
//! like mode powers a family of prefix searches on top of the same single
//! descent the exact operations use.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Public API (BTree)             │
//! │   add / delete / search family / walk       │
//! ├──────────────────────┬──────────────────────┤
//! │   Tree algorithms    │   Cursor             │
//! │   (btree/tree.rs)    │   (btree/cursor.rs)  │
//! │   split / borrow /   │   frame stack,       │
//! │   merge cascade      │   Iterate contract   │
//! ├──────────────────────┴──────────────────────┤
//! │        Node storage (btree/node.rs)         │
//! │   keys + children, in-node binary search    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```
//! use ordtree::{BTree, NaturalOrder};
//!
//! let mut tree: BTree<i64, _> = BTree::new(8, NaturalOrder).unwrap();
//! assert!(tree.add(42));
//! assert!(!tree.add(42)); // duplicates are rejected
//! assert_eq!(tree.search(&42), Some(&42));
//! assert_eq!(tree.delete(&42), Some(42));
//! assert_eq!(tree.search(&42), None);
//! ```
//!
//! ## Thread safety
//!
//! The tree carries no internal synchronization. It is a plain owned value;
//! callers needing concurrent access wrap it in a lock of their choosing.
//! Cursors borrow the tree shared, so structural mutation while a cursor is
//! live is rejected at compile time.

pub mod btree;
pub mod iter;

pub use btree::{BTree, Cursor, KeyOrder, NaturalOrder, Node};
pub use iter::Iterate;
