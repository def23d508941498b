use avlbst::avl::Tree;
use quickcheck_macros::quickcheck;

use std::collections::{BTreeMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a map.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same entries in both.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, map: &mut BTreeMap<K, V>)
where
    K: Clone + Ord,
    V: std::fmt::Debug + PartialEq + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert(k.clone(), v.clone());
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                assert_eq!(bst.remove(k), map.remove(k));
            }
        }
    }
}

/// The worst-case height of an AVL tree holding `len` nodes.
fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2()
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map);
    tree.iter().eq(map.iter()) && tree.len() == map.len()
}

#[quickcheck]
fn inserts_keep_invariants(xs: Vec<i16>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, ());
    }

    tree.check_invariants().is_ok() && tree.keys().zip(tree.keys().skip(1)).all(|(a, b)| a < b)
}

#[quickcheck]
fn height_stays_logarithmic(ops: Vec<Op<i16, ()>>) -> bool {
    let mut tree = Tree::new();
    ops.iter().all(|op| {
        match op {
            Op::Insert(k, v) => tree.insert(*k, *v),
            Op::Remove(k) => {
                tree.remove(k);
            }
        }
        tree.check_invariants().is_ok() && tree.height() as f64 <= height_bound(tree.len())
    })
}

#[quickcheck]
fn reinserting_only_changes_the_value(xs: Vec<i8>, key: i8) -> bool {
    let mut tree: Tree<i8, i32> = xs.iter().map(|&x| (x, x as i32)).collect();
    tree.insert(key, 0);
    let before = tree.clone();

    tree.insert(key, 1000);

    tree.height() == before.height()
        && tree.find(&key) == Some(&1000)
        && tree
            .iter()
            .zip(before.iter())
            .all(|((k, v), (bk, bv))| k == bk && (k == &key || v == bv))
}

#[quickcheck]
fn removing_absent_key_changes_nothing(xs: Vec<i8>, absent: i8) -> bool {
    let mut tree: Tree<i8, i8> = xs.iter().filter(|&&x| x != absent).map(|&x| (x, x)).collect();
    let before: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
    let height = tree.height();

    tree.remove(&absent).is_none()
        && tree.iter().map(|(&k, &v)| (k, v)).eq(before)
        && tree.height() == height
}

#[quickcheck]
fn removing_everything_empties_the_tree(xs: Vec<i8>, order: Vec<usize>) -> bool {
    let mut tree: Tree<i8, ()> = xs.iter().map(|&x| (x, ())).collect();
    let mut keys: Vec<i8> = tree.keys().copied().collect();

    // Shuffle the removal order using the second input.
    for (i, j) in order.into_iter().enumerate() {
        let len = keys.len();
        if len > 0 {
            keys.swap(i % len, j % len);
        }
    }
    for key in &keys {
        if tree.remove(key).is_none() {
            return false;
        }
    }

    tree.is_empty() && tree.len() == 0 && tree.height() == 0
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<i8, i8> = xs.iter().map(|&x| (x, x)).collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    for delete in &deletes {
        tree.remove(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - remove each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.find(x).is_some())
        && tree.check_invariants().is_ok()
}
