//! Errors reported when validating a tree's structure.
//!
//! None of the tree operations fail on ordinary input. These errors only come out of
//! [`bst::Tree::check_links`][crate::bst::Tree::check_links] and
//! [`avl::Tree::check_invariants`][crate::avl::Tree::check_invariants], and any of them
//! means the tree was corrupted by a bug rather than by the caller.

use thiserror::Error;

use crate::bst::NodeId;

/// A broken structural invariant found while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The root node has a parent link.
    #[error("root {root:?} has a parent link")]
    RootHasParent {
        /// The offending root.
        root: NodeId,
    },

    /// A child's parent link does not point back at the node that owns it.
    #[error("node {child:?} is a child of {parent:?} but links to {linked:?} as its parent")]
    BrokenParentLink {
        /// The node that owns `child`.
        parent: NodeId,
        /// The child with the bad back-reference.
        child: NodeId,
        /// What the child's parent link actually says.
        linked: Option<NodeId>,
    },

    /// An in-order walk visited a key that was not strictly greater than the one before it.
    #[error("node {node:?} is out of order with its in-order predecessor")]
    OutOfOrder {
        /// The node whose key is too small.
        node: NodeId,
    },

    /// The number of reachable nodes disagrees with the recorded length.
    #[error("tree records {recorded} entries but {reachable} are reachable from the root")]
    LengthMismatch {
        /// The length the tree believes it has.
        recorded: usize,
        /// The number of nodes actually reachable.
        reachable: usize,
    },

    /// A balance factor outside of `{-1, 0, 1}`.
    #[error("node {node:?} has balance factor {balance}")]
    BalanceOutOfRange {
        /// The unbalanced node.
        node: NodeId,
        /// Its balance factor.
        balance: i8,
    },

    /// A stored balance factor that disagrees with the real subtree heights.
    #[error("node {node:?} stores balance factor {recorded} but its subtrees differ by {actual}")]
    StaleBalance {
        /// The node with the stale balance factor.
        node: NodeId,
        /// The stored balance factor.
        recorded: i8,
        /// `height(right) - height(left)`.
        actual: isize,
    },
}
