//! A self-balancing BST (specifically, an AVL tree) built on top of [`bst::Tree`].
//!
//! Every node records its balance factor, `height(right) - height(left)`, which is kept in
//! `{-1, 0, 1}`. After the base tree attaches or splices out a node, a fix-up pass walks back up
//! the parent links adjusting balance factors and rotating wherever one would reach `±2`.
//!
//! Insertion needs at most one (single or double) rotation: the rotated subtree ends up exactly
//! as tall as it was before the insert, so nothing above it changes. Removal is different. A
//! rotation can leave the subtree one level shorter, so the walk may have to rotate at every
//! level up to the root.
//!
//! # Examples
//!
//! ```
//! use avlbst::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Sorted input would make a plain BST into a linked list.
//! for key in 0..1023 {
//!     tree.insert(key, key * 2);
//! }
//! assert_eq!(tree.height(), 10);
//! assert_eq!(tree.find(&512), Some(&1024));
//!
//! // Inserting a new value for the same key overwrites the value.
//! tree.insert(512, 0);
//! assert_eq!(tree.find(&512), Some(&0));
//!
//! // Removing a node returns its value.
//! assert_eq!(tree.remove(&512), Some(0));
//! assert_eq!(tree.find(&512), None);
//! assert!(tree.check_invariants().is_ok());
//! ```

use std::fmt;

use log::trace;

use crate::bst::{self, NodeId, Search};
use crate::error::InvariantError;
use crate::util::Side;

/// A self-balancing Binary Search Tree. This can be used for inserting, finding, and removing
/// keys and values in `O(lg N)`.
#[derive(Clone)]
pub struct Tree<K, V> {
    raw: bst::Tree<K, V>,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            raw: bst::Tree::new(),
        }
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every entry from the tree.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Potentially finds the value associated with the given key in this tree. If no node has the
    /// corresponding key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlbst::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.find(&1), Some(&2));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.raw.find(key)
    }

    /// Like [`Tree::find`] but the value can be modified in place.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        self.raw.find_mut(key)
    }

    /// Returns whether a node with the given key exists.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.raw.contains_key(key)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.first()
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.last()
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> bst::Iter<'_, K, V> {
        self.raw.iter()
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.raw.keys()
    }

    /// Iterates over the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.raw.values()
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has a
    /// height of 0.
    ///
    /// The balance factors say which child is taller, so this only walks a single path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.raw.root();
        while let Some(id) = current {
            height += 1;
            current = if self.raw.balance(id) > 0 {
                self.raw.right(id)
            } else {
                self.raw.left(id)
            };
        }
        height
    }

    /// Checks every structural invariant of the tree: the ones [`bst::Tree::check_links`]
    /// checks, plus that every stored balance factor is in `{-1, 0, 1}` and matches the actual
    /// heights of the node's subtrees.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        self.raw.check_links()?;

        let heights = self.raw.subtree_heights();
        let height = |link: Option<NodeId>| link.map_or(0, |id| heights[id.0] as isize);
        for node in self.raw.preorder() {
            let recorded = self.raw.balance(node);
            if !(-1..=1).contains(&recorded) {
                return Err(InvariantError::BalanceOutOfRange {
                    node,
                    balance: recorded,
                });
            }
            let actual = height(self.raw.right(node)) - height(self.raw.left(node));
            if actual != recorded as isize {
                return Err(InvariantError::StaleBalance {
                    node,
                    recorded,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Inserts the given value into the tree stored at the given key. Inserting a new value for an
    /// existing key overwrites its value without touching the tree's shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlbst::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// tree.insert(1, 2);
    /// assert_eq!(tree.find(&1), Some(&2));
    ///
    /// tree.insert(1, 3);
    /// assert_eq!(tree.find(&1), Some(&3));
    /// ```
    pub fn insert(&mut self, key: K, value: V)
    where
        K: Ord,
    {
        match self.raw.search(&key) {
            Search::Found(id) => self.raw.node_mut(id).value = value,
            Search::Vacant(None) => {
                self.raw.attach(key, value, None);
            }
            Search::Vacant(Some((parent, side))) => {
                let child = self.raw.attach(key, value, Some((parent, side)));
                // If the parent was leaning the other way, the new leaf just evened it out and
                // its height didn't change. Otherwise it got taller and so might its ancestors.
                let balance = self.raw.update_balance(parent, side.growth());
                self.debug_check_node(parent);
                if balance != 0 {
                    self.insert_fix(parent, child);
                }
            }
        }
    }

    /// Removes the node containing the given key from the tree and returns its value. If the tree
    /// does not contain a node with the key, nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlbst::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.remove(&1), Some(2));
    /// assert_eq!(tree.remove(&1), None);
    /// assert_eq!(tree.find(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V>
    where
        K: Ord,
    {
        let target = self.raw.removal_target(key)?;
        let parent = self.raw.parent(target);
        let diff = self.raw.side_of(target).map_or(0, Side::shrink);

        let (_, value) = self.raw.detach(target);
        self.remove_fix(parent, diff);

        Some(value)
    }

    /// In debug builds, checks what a fix-up just wrote to `node`: its balance factor is in range
    /// and its children link back to it. Nothing else in the tree is visited.
    fn debug_check_node(&self, node: NodeId) {
        if cfg!(debug_assertions) {
            let balance = self.raw.balance(node);
            assert!(
                (-1..=1).contains(&balance),
                "{:?} was left with balance factor {}",
                node,
                balance
            );
            for child in [self.raw.left(node), self.raw.right(node)].into_iter().flatten() {
                assert_eq!(
                    self.raw.parent(child),
                    Some(node),
                    "{:?} does not link back to its parent",
                    child
                );
            }
        }
    }

    /// Walks up from `parent`, whose subtree just got one level taller on the side of `child`,
    /// until some ancestor absorbs the extra height or a rotation removes it.
    fn insert_fix(&mut self, mut parent: NodeId, mut child: NodeId) {
        while let Some(grandparent) = self.raw.parent(parent) {
            let side = if self.raw.left(grandparent) == Some(parent) {
                Side::Left
            } else {
                Side::Right
            };

            match self.raw.update_balance(grandparent, side.growth()) {
                0 => {
                    trace!("insert fix-up absorbed at {:?}", grandparent);
                    self.debug_check_node(grandparent);
                    return;
                }
                -1 | 1 => {
                    trace!("insert fix-up propagating past {:?}", grandparent);
                    self.debug_check_node(grandparent);
                    child = parent;
                    parent = grandparent;
                }
                _ => {
                    self.rebalance_insert(grandparent, parent, child, side);
                    return;
                }
            }
        }
    }

    /// Fixes a `grandparent` whose balance factor just hit `±2` because `parent`, on `side`,
    /// grew taller through `child`.
    fn rebalance_insert(&mut self, grandparent: NodeId, parent: NodeId, child: NodeId, side: Side) {
        let child_balance = self.raw.balance(child);
        match (side, self.raw.balance(parent)) {
            (Side::Left, -1) => {
                self.rotate_right(grandparent);
                self.raw.set_balance(grandparent, 0);
                self.raw.set_balance(parent, 0);
            }
            (Side::Left, 1) => {
                self.rotate_left(parent);
                self.rotate_right(grandparent);
                let (parent_balance, grandparent_balance) = match child_balance {
                    -1 => (0, 1),
                    0 => (0, 0),
                    1 => (-1, 0),
                    b => unreachable!("child on the insertion path has balance {}", b),
                };
                self.raw.set_balance(parent, parent_balance);
                self.raw.set_balance(grandparent, grandparent_balance);
                self.raw.set_balance(child, 0);
            }
            (Side::Right, 1) => {
                self.rotate_left(grandparent);
                self.raw.set_balance(grandparent, 0);
                self.raw.set_balance(parent, 0);
            }
            (Side::Right, -1) => {
                self.rotate_right(parent);
                self.rotate_left(grandparent);
                let (parent_balance, grandparent_balance) = match child_balance {
                    1 => (0, -1),
                    0 => (0, 0),
                    -1 => (1, 0),
                    b => unreachable!("child on the insertion path has balance {}", b),
                };
                self.raw.set_balance(parent, parent_balance);
                self.raw.set_balance(grandparent, grandparent_balance);
                self.raw.set_balance(child, 0);
            }
            (_, b) => unreachable!("a subtree that just grew has balance {}", b),
        }

        for node in [grandparent, parent, child] {
            self.debug_check_node(node);
        }
    }

    /// Walks up from `node`, one of whose subtrees just got one level shorter. `diff` is how much
    /// that moves `node`'s balance factor: `+1` if the left side shrank, `-1` if the right did.
    fn remove_fix(&mut self, mut node: Option<NodeId>, mut diff: i8) {
        while let Some(current) = node {
            // Which way `current`'s parent shifts has to be worked out before any rotation moves
            // `current` out of its slot.
            let parent = self.raw.parent(current);
            let next_diff = self.raw.side_of(current).map_or(0, Side::shrink);

            let shrank = match self.raw.balance(current) + diff {
                -2 => self.rebalance_left_heavy(current),
                2 => self.rebalance_right_heavy(current),
                0 => {
                    self.raw.set_balance(current, 0);
                    self.debug_check_node(current);
                    true
                }
                b @ (-1 | 1) => {
                    self.raw.set_balance(current, b);
                    self.debug_check_node(current);
                    false
                }
                b => unreachable!("balance factor {} after removal", b),
            };
            if !shrank {
                trace!("remove fix-up absorbed at {:?}", current);
                return;
            }
            trace!("remove fix-up propagating past {:?}", current);

            node = parent;
            diff = next_diff;
        }
    }

    /// Rotates a node whose balance factor reached `-2` after a removal from its right subtree.
    /// Returns whether the rotated subtree ended up shorter than it was before the removal.
    fn rebalance_left_heavy(&mut self, node: NodeId) -> bool {
        let child = self
            .raw
            .left(node)
            .expect("A left-heavy node has a left child");
        match self.raw.balance(child) {
            -1 => {
                self.rotate_right(node);
                self.raw.set_balance(node, 0);
                self.raw.set_balance(child, 0);
                self.debug_check_node(node);
                self.debug_check_node(child);
                true
            }
            0 => {
                self.rotate_right(node);
                self.raw.set_balance(node, -1);
                self.raw.set_balance(child, 1);
                self.debug_check_node(node);
                self.debug_check_node(child);
                false
            }
            1 => {
                let grandchild = self
                    .raw
                    .right(child)
                    .expect("A right-leaning node has a right child");
                let grandchild_balance = self.raw.balance(grandchild);
                self.rotate_left(child);
                self.rotate_right(node);
                let (node_balance, child_balance) = match grandchild_balance {
                    1 => (0, -1),
                    0 => (0, 0),
                    -1 => (1, 0),
                    b => unreachable!("grandchild has balance {}", b),
                };
                self.raw.set_balance(node, node_balance);
                self.raw.set_balance(child, child_balance);
                self.raw.set_balance(grandchild, 0);
                for node in [node, child, grandchild] {
                    self.debug_check_node(node);
                }
                true
            }
            b => unreachable!("left child has balance {}", b),
        }
    }

    /// Mirror image of [`Tree::rebalance_left_heavy`].
    fn rebalance_right_heavy(&mut self, node: NodeId) -> bool {
        let child = self
            .raw
            .right(node)
            .expect("A right-heavy node has a right child");
        match self.raw.balance(child) {
            1 => {
                self.rotate_left(node);
                self.raw.set_balance(node, 0);
                self.raw.set_balance(child, 0);
                self.debug_check_node(node);
                self.debug_check_node(child);
                true
            }
            0 => {
                self.rotate_left(node);
                self.raw.set_balance(node, 1);
                self.raw.set_balance(child, -1);
                self.debug_check_node(node);
                self.debug_check_node(child);
                false
            }
            -1 => {
                let grandchild = self
                    .raw
                    .left(child)
                    .expect("A left-leaning node has a left child");
                let grandchild_balance = self.raw.balance(grandchild);
                self.rotate_right(child);
                self.rotate_left(node);
                let (node_balance, child_balance) = match grandchild_balance {
                    -1 => (0, 1),
                    0 => (0, 0),
                    1 => (-1, 0),
                    b => unreachable!("grandchild has balance {}", b),
                };
                self.raw.set_balance(node, node_balance);
                self.raw.set_balance(child, child_balance);
                self.raw.set_balance(grandchild, 0);
                for node in [node, child, grandchild] {
                    self.debug_check_node(node);
                }
                true
            }
            b => unreachable!("right child has balance {}", b),
        }
    }

    /// Rotate `node` to the left. This moves the right child up vertically and `node` down
    /// vertically. Does nothing if there is no right child. Balance factors are left for the
    /// caller to fix.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///    node                        x
    ///    /  \                       / \
    ///   a    x      rotate ->    node  c
    ///       / \                  /  \
    ///      b   c                a    b
    /// ```
    fn rotate_left(&mut self, node: NodeId) {
        let Some(x) = self.raw.right(node) else {
            return;
        };
        trace!("rotating left at {:?}", node);

        let parent = self.raw.parent(node);
        self.raw.replace_child(parent, node, Some(x));

        let inner = self.raw.left(x);
        self.raw.set_right(node, inner);
        if let Some(inner) = inner {
            self.raw.set_parent(inner, Some(node));
        }

        self.raw.set_left(x, Some(node));
        self.raw.set_parent(node, Some(x));
    }

    /// Rotate `node` to the right. The mirror image of [`Tree::rotate_left`].
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///    node                        x
    ///    /  \                       / \
    ///   x    c      rotate ->      a  node
    ///  / \                            /  \
    /// a   b                          b    c
    /// ```
    fn rotate_right(&mut self, node: NodeId) {
        let Some(x) = self.raw.left(node) else {
            return;
        };
        trace!("rotating right at {:?}", node);

        let parent = self.raw.parent(node);
        self.raw.replace_child(parent, node, Some(x));

        let inner = self.raw.right(x);
        self.raw.set_left(node, inner);
        if let Some(inner) = inner {
            self.raw.set_parent(inner, Some(node));
        }

        self.raw.set_right(x, Some(node));
        self.raw.set_parent(node, Some(x));
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = bst::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
