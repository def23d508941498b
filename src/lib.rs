//! This crate exposes an AVL tree, a self-balancing Binary Search Tree (BST), along with the
//! plain BST it is built on.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). Without any care, inserting sorted keys gives a
//! tree whose height is the number of keys. See [`bst`].
//!
//! ## AVL Tree
//!
//! An AVL tree additionally keeps, for every `Node`, the heights of its two subtrees within one
//! of each other. The difference `height(right) - height(left)` is stored in each node as its
//! *balance factor* and is always `-1`, `0`, or `1`. Insertions and removals restore this by
//! rotating nodes on the way back up to the root, which bounds the height to about
//! `1.44 * lg(N + 2)`. See [`avl`].
//!
//! ## Features
//!
//! - `quickcheck`: implements `quickcheck::Arbitrary` for both trees.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod error;

#[cfg(feature = "quickcheck")]
mod arbitrary;
mod util;

pub use error::InvariantError;
