//! An unbalanced BST stored in an arena. Nodes are addressed by [`NodeId`] and keep a
//! back-reference to their parent so that callers can walk up the tree without a stack.
//!
//! This tree does no rebalancing of its own. It is the storage layer under
//! [`avl::Tree`][crate::avl::Tree], which reuses its structural primitives (linking children,
//! finding predecessors, splicing nodes out) and layers balance factors and rotations on top.
//! It's also perfectly usable on its own, as long as you don't mind `O(n)` operations on
//! sorted input.
//!
//! # Examples
//!
//! ```
//! use avlbst::bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), None);
//!
//! tree.insert(1, 2);
//! assert_eq!(tree.find(&1), Some(&2));
//!
//! // Inserting a new value for the same key overwrites the value.
//! tree.insert(1, 3);
//! assert_eq!(tree.find(&1), Some(&3));
//!
//! // Removing a node returns its value.
//! assert_eq!(tree.remove(&1), Some(3));
//! assert_eq!(tree.find(&1), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use crate::error::InvariantError;
use crate::util::Side;

/// The index of a node in a tree's arena. Only meaningful for the tree that handed it out, and
/// only until that node is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// `height(right) - height(left)`. Stored here for trees that balance themselves; this tree
    /// never reads it.
    pub(crate) balance: i8,
}

/// Where a key lives in the tree, or where it would be attached if it were inserted.
pub(crate) enum Search {
    Found(NodeId),
    /// The empty child slot the key belongs in. `None` means the tree is empty and the key would
    /// become the root.
    Vacant(Option<(NodeId, Side)>),
}

/// A Binary Search Tree with no balancing. This can be used for inserting, finding, and removing
/// keys and values.
#[derive(Clone)]
pub struct Tree<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    /// Slots in `nodes` that were freed and can be handed out again.
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
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
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every entry from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Potentially finds the value associated with the given key in this tree. If no node has the
    /// corresponding key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlbst::bst::Tree;
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
        self.find_node(key).map(|id| &self.node(id).value)
    }

    /// Like [`Tree::find`] but the value can be modified in place.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        let id = self.find_node(key)?;
        Some(&mut self.node_mut(id).value)
    }

    /// Returns whether a node with the given key exists.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find_node(key).is_some()
    }

    /// Inserts the given value into the tree stored at the given key. Inserting a new value for an
    /// existing key overwrites its value and leaves the tree's shape alone.
    pub fn insert(&mut self, key: K, value: V)
    where
        K: Ord,
    {
        match self.search(&key) {
            Search::Found(id) => self.node_mut(id).value = value,
            Search::Vacant(slot) => {
                self.attach(key, value, slot);
            }
        }
    }

    /// Removes the node containing the given key from the tree and returns its value. If the tree
    /// does not contain a node with the key, nothing happens.
    ///
    /// A node with two children trades places with its in-order predecessor first so that the
    /// node actually unlinked has at most one child.
    pub fn remove(&mut self, key: &K) -> Option<V>
    where
        K: Ord,
    {
        let target = self.removal_target(key)?;
        Some(self.detach(target).1)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.leftmost(root)))
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.rightmost(root)))
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            next: self.root.map(|root| self.leftmost(root)),
            remaining: self.len,
        }
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has a
    /// height of 0.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.subtree_heights()[root.0])
    }

    /// Checks that the heights of every node's two subtrees differ by at most one.
    pub fn is_balanced(&self) -> bool {
        let heights = self.subtree_heights();
        let height = |link: Option<NodeId>| link.map_or(0, |id| heights[id.0]);
        self.preorder()
            .into_iter()
            .all(|id| height(self.left(id)).abs_diff(height(self.right(id))) <= 1)
    }

    /// Checks whether every leaf sits at the same depth. An empty tree trivially does.
    pub fn has_equal_leaf_depths(&self) -> bool {
        let mut leaf_depth = None;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            if node.left.is_none() && node.right.is_none() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(d) if d != depth => return false,
                    Some(_) => {}
                }
            }
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        true
    }

    /// Walks the whole tree checking that:
    ///
    /// 1. the root has no parent,
    /// 2. every child links back to the node that owns it,
    /// 3. exactly [`Tree::len`] nodes are reachable,
    /// 4. keys strictly increase in order.
    pub fn check_links(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(()),
                recorded => Err(InvariantError::LengthMismatch {
                    recorded,
                    reachable: 0,
                }),
            };
        };
        if self.parent(root).is_some() {
            return Err(InvariantError::RootHasParent { root });
        }

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reachable += 1;
            // Bail out before a corrupted cycle can spin forever.
            if reachable > self.len {
                break;
            }
            for child in [self.left(id), self.right(id)].into_iter().flatten() {
                let linked = self.parent(child);
                if linked != Some(id) {
                    return Err(InvariantError::BrokenParentLink {
                        parent: id,
                        child,
                        linked,
                    });
                }
                stack.push(child);
            }
        }
        if reachable != self.len {
            return Err(InvariantError::LengthMismatch {
                recorded: self.len,
                reachable,
            });
        }

        let mut prev: Option<NodeId> = None;
        let mut next = Some(self.leftmost(root));
        while let Some(id) = next {
            if let Some(prev) = prev {
                if self.node(prev).key >= self.node(id).key {
                    return Err(InvariantError::OutOfOrder { node: id });
                }
            }
            prev = Some(id);
            next = self.successor(id);
        }
        Ok(())
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes[id.0]
            .as_ref()
            .expect("NodeId refers to a freed slot")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes[id.0]
            .as_mut()
            .expect("NodeId refers to a freed slot")
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.node_mut(id).parent = parent;
    }

    pub(crate) fn set_left(&mut self, id: NodeId, left: Option<NodeId>) {
        self.node_mut(id).left = left;
    }

    pub(crate) fn set_right(&mut self, id: NodeId, right: Option<NodeId>) {
        self.node_mut(id).right = right;
    }

    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.set_left(id, child),
            Side::Right => self.set_right(id, child),
        }
    }

    pub(crate) fn balance(&self, id: NodeId) -> i8 {
        self.node(id).balance
    }

    pub(crate) fn set_balance(&mut self, id: NodeId, balance: i8) {
        self.node_mut(id).balance = balance;
    }

    /// Adds `diff` to the balance factor of `id` and returns the result.
    pub(crate) fn update_balance(&mut self, id: NodeId, diff: i8) -> i8 {
        let node = self.node_mut(id);
        node.balance += diff;
        node.balance
    }

    /// Which of its parent's slots `id` occupies, or `None` for the root.
    pub(crate) fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Puts `new` wherever `old` hung off of `parent` (or at the root when `parent` is `None`)
    /// and points `new` back at `parent`. `old`'s own links are left alone.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.set_root(new),
            Some(p) if self.left(p) == Some(old) => self.set_left(p, new),
            Some(p) => self.set_right(p, new),
        }
        if let Some(new) = new {
            self.set_parent(new, parent);
        }
    }

    /// Allocates a childless node with a balance factor of 0.
    pub(crate) fn new_node(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            balance: 0,
        };
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Releases the slot of a node that is no longer linked into the tree.
    fn free_node(&mut self, id: NodeId) -> (K, V) {
        let node = self.nodes[id.0]
            .take()
            .expect("Freeing a slot that is already free");
        self.free.push(id);
        self.len -= 1;
        (node.key, node.value)
    }

    pub(crate) fn find_node(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        match self.search(key) {
            Search::Found(id) => Some(id),
            Search::Vacant(_) => None,
        }
    }

    pub(crate) fn search(&self, key: &K) -> Search
    where
        K: Ord,
    {
        let Some(mut current) = self.root else {
            return Search::Vacant(None);
        };
        loop {
            let node = self.node(current);
            let side = match key.cmp(&node.key) {
                Ordering::Equal => return Search::Found(current),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match self.child(current, side) {
                Some(child) => current = child,
                None => return Search::Vacant(Some((current, side))),
            }
        }
    }

    /// Creates a node for `key` in an empty slot found by [`Tree::search`].
    pub(crate) fn attach(&mut self, key: K, value: V, slot: Option<(NodeId, Side)>) -> NodeId {
        match slot {
            None => {
                let id = self.new_node(key, value, None);
                self.set_root(Some(id));
                id
            }
            Some((parent, side)) => {
                let id = self.new_node(key, value, Some(parent));
                self.set_child(parent, side, Some(id));
                id
            }
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.left(id) {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    /// The node with the largest key smaller than `id`'s.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.left(id) {
            return Some(self.rightmost(left));
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if self.right(parent) == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// The node with the smallest key larger than `id`'s.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.right(id) {
            return Some(self.leftmost(right));
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if self.left(parent) == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Exchanges the keys and values of two nodes. Links are untouched and each position keeps
    /// its own balance factor, since that describes the shape under the position rather than the
    /// entry stored there.
    pub(crate) fn swap_contents(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.nodes.split_at_mut(hi);
        let lo = head[lo].as_mut().expect("NodeId refers to a freed slot");
        let hi = tail[0].as_mut().expect("NodeId refers to a freed slot");
        mem::swap(&mut lo.key, &mut hi.key);
        mem::swap(&mut lo.value, &mut hi.value);
    }

    /// Finds the node holding `key` and, if it has two children, swaps its contents with its
    /// in-order predecessor. Returns the node that now holds `key`, which has at most one child.
    pub(crate) fn removal_target(&mut self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        let id = self.find_node(key)?;
        if self.left(id).is_none() || self.right(id).is_none() {
            return Some(id);
        }
        let predecessor = self
            .predecessor(id)
            .expect("A node with a left child has a predecessor");
        self.swap_contents(id, predecessor);
        Some(predecessor)
    }

    /// Unlinks a node with at most one child, letting that child take its place, and frees it.
    pub(crate) fn detach(&mut self, id: NodeId) -> (K, V) {
        let node = self.node(id);
        debug_assert!(
            node.left.is_none() || node.right.is_none(),
            "Only nodes with at most one child can be detached"
        );
        let (parent, child) = (node.parent, node.left.or(node.right));
        self.replace_child(parent, id, child);
        self.free_node(id)
    }

    /// Every reachable node, parents before children.
    pub(crate) fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.right(id));
            stack.extend(self.left(id));
        }
        order
    }

    /// The height of every reachable node's subtree, indexed by slot. Computed without recursion
    /// so that degenerate trees don't blow the stack.
    pub(crate) fn subtree_heights(&self) -> Vec<usize> {
        let mut heights = vec![0; self.nodes.len()];
        // Children come after their parents in pre-order, so walking it backwards sees every
        // child before its parent.
        for id in self.preorder().into_iter().rev() {
            let left = self.left(id).map_or(0, |l| heights[l.0]);
            let right = self.right(id).map_or(0, |r| heights[r.0]);
            heights[id.0] = left.max(right) + 1;
        }
        heights
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
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over a tree's entries. It follows parent links to find each successor so
/// it needs no stack of its own.
pub struct Iter<'a, K, V> {
    tree: &'a Tree<K, V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.successor(id);
        self.remaining -= 1;
        Some(self.tree.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_adding_left() {
        let keys = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        let mut tree = Tree::new();

        for key in keys {
            tree.insert(key, key * 2);
        }

        // No balancing - this is a linked list now.
        assert_eq!(tree.height(), 10);
        assert!(!tree.is_balanced());
        assert!(tree.check_links().is_ok());
        for key in keys {
            assert_eq!(tree.find(&key), Some(&(key * 2)));
        }
    }

    #[test]
    fn insert_overwrites_existing_value() {
        let mut tree = Tree::new();
        tree.insert(5, "five");
        tree.insert(3, "three");
        tree.insert(5, "FIVE");

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.find(&5), Some(&"FIVE"));
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut tree: Tree<_, _> = vec![(1, 10), (2, 20)].into_iter().collect();
        if let Some(v) = tree.find_mut(&2) {
            *v += 1;
        }
        assert_eq!(tree.find(&2), Some(&21));
        assert_eq!(tree.find_mut(&3), None);
    }

    #[test]
    fn predecessor_and_successor() {
        let mut tree = Tree::new();
        for key in [5, 3, 8, 2, 4, 7, 9, 6] {
            tree.insert(key, ());
        }
        let key_of = |id: Option<NodeId>| id.map(|id| tree.node(id).key);

        let five = tree.find_node(&5).unwrap();
        let six = tree.find_node(&6).unwrap();
        let two = tree.find_node(&2).unwrap();
        let four = tree.find_node(&4).unwrap();

        // Down into the left subtree.
        assert_eq!(key_of(tree.predecessor(five)), Some(4));
        // Up through the ancestors.
        assert_eq!(key_of(tree.predecessor(six)), Some(5));
        assert_eq!(key_of(tree.predecessor(two)), None);
        assert_eq!(key_of(tree.successor(four)), Some(5));
    }

    #[test]
    fn remove_with_no_children() {
        let mut tree = Tree::new();
        tree.insert(5, 5.to_string());
        tree.insert(3, 3.to_string());
        tree.insert(7, 7.to_string());

        assert_eq!(tree.remove(&7), Some(7.to_string()));
        assert_eq!(tree.find(&7), None);
        assert_eq!(tree.find(&3), Some(&3.to_string()));
        assert_eq!(tree.find(&5), Some(&5.to_string()));
        assert!(tree.check_links().is_ok());
    }

    #[test]
    fn remove_with_two_children_uses_predecessor() {
        let mut tree = Tree::new();
        for key in [5, 3, 8, 2, 4, 7, 9] {
            tree.insert(key, key);
        }

        assert_eq!(tree.remove(&5), Some(5));

        // 4 was the predecessor so it now sits at the root.
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).key, 4);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [2, 3, 4, 7, 8, 9]);
        assert!(tree.check_links().is_ok());
    }

    #[test]
    fn remove_root_until_empty() {
        let mut tree: Tree<_, _> = (0..8).map(|k| (k, k)).collect();
        while let Some(root) = tree.root() {
            let key = tree.node(root).key;
            assert_eq!(tree.remove(&key), Some(key));
            assert!(tree.check_links().is_ok());
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn remove_missing_key() {
        let mut tree = Tree::new();
        assert_eq!(tree.remove(&1), None::<i32>);
        tree.insert(1, 1);
        assert_eq!(tree.remove(&2), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = Tree::new();
        tree.insert(1, 1);
        tree.insert(2, 2);
        tree.remove(&1);
        tree.insert(3, 3);

        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn swap_contents_keeps_balance_with_position() {
        let mut tree = Tree::new();
        tree.insert(2, "two");
        tree.insert(1, "one");
        let two = tree.find_node(&2).unwrap();
        let one = tree.find_node(&1).unwrap();
        tree.set_balance(two, -1);

        tree.swap_contents(two, one);

        assert_eq!(tree.node(two).key, 1);
        assert_eq!(tree.node(two).value, "one");
        assert_eq!(tree.node(one).key, 2);
        assert_eq!(tree.balance(two), -1);
        assert_eq!(tree.balance(one), 0);
        assert_eq!(tree.left(two), Some(one));
    }

    #[test]
    fn equal_leaf_depths() {
        let tree: Tree<i32, ()> = Tree::new();
        assert!(tree.has_equal_leaf_depths());

        let mut tree = Tree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key, ());
        }
        assert!(tree.has_equal_leaf_depths());

        tree.insert(8, ());
        assert!(!tree.has_equal_leaf_depths());

        // A single chain has exactly one leaf.
        let chain: Tree<_, _> = (0..5).map(|k| (k, ())).collect();
        assert!(chain.has_equal_leaf_depths());
    }

    #[test]
    fn check_links_catches_corruption() {
        let mut tree: Tree<_, _> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
        let one = tree.find_node(&1).unwrap();
        let three = tree.find_node(&3).unwrap();

        tree.set_parent(one, Some(three));
        assert!(matches!(
            tree.check_links(),
            Err(InvariantError::BrokenParentLink { .. })
        ));

        let two = tree.find_node(&2).unwrap();
        tree.set_parent(one, Some(two));
        tree.node_mut(one).key = 5;
        assert_eq!(
            tree.check_links(),
            Err(InvariantError::OutOfOrder { node: two })
        );
    }

    #[test]
    fn iter_is_sorted() {
        let tree: Tree<_, _> = [5, 1, 4, 2, 3].iter().map(|&k| (k, k * 10)).collect();
        let entries: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(entries, [(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);
        assert_eq!(tree.iter().len(), 5);
        assert_eq!(tree.first(), Some((&1, &10)));
        assert_eq!(tree.last(), Some((&5, &50)));
    }
}
