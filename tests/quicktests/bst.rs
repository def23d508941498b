use avlbst::bst::Tree;
use quickcheck_macros::quickcheck;

use std::collections::BTreeMap;

use crate::Op;

#[quickcheck]
fn matches_btreemap(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    for op in &ops {
        match *op {
            Op::Insert(k, v) => {
                tree.insert(k, v);
                map.insert(k, v);
            }
            Op::Remove(k) => {
                if tree.remove(&k) != map.remove(&k) {
                    return false;
                }
            }
        }
    }

    tree.check_links().is_ok() && tree.iter().eq(map.iter()) && tree.len() == map.len()
}

#[quickcheck]
fn sorted_input_degenerates(n: u8) -> bool {
    let tree: Tree<u8, ()> = (0..n).map(|k| (k, ())).collect();

    tree.height() == n as usize && tree.is_balanced() == (n <= 2)
}

#[quickcheck]
fn first_and_last(xs: Vec<i8>) -> bool {
    let tree: Tree<i8, ()> = xs.iter().map(|&x| (x, ())).collect();

    tree.first().map(|(k, _)| k) == xs.iter().min() && tree.last().map(|(k, _)| k) == xs.iter().max()
}
