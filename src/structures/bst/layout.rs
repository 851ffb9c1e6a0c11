//! Display coordinates for the tree
//!
//! Two passes over the whole tree after every structural change:
//!
//! 1. in-order sequencing: each node's x is the next value of a counter
//!    advanced in left → self → right order, and y grows with depth
//! 2. post-order centering: a parent with two children sits over the mean of
//!    their x; with one child it sits half a step beside it
//!
//! Finally the whole tree is shifted so the root lands on the canvas center.
//! Every node's x stays inside the in-order span of its own subtree, so two
//! nodes on the same level can never share a position.

use super::tree::{Slot, Tree};

pub const H_SPACING: f64 = 50.0;
pub const V_SPACING: f64 = 70.0;
pub const TOP_MARGIN: f64 = 40.0;

pub(crate) fn layout(tree: &mut Tree, canvas_center: f64) {
    let Some(root) = tree.root() else {
        return;
    };

    let mut counter = 0usize;
    sequence(tree, Some(root), 0, &mut counter);
    center(tree, root);

    let shift = tree.node(root).map_or(0.0, |node| canvas_center - node.x);
    let slots: Vec<Slot> = collect(tree, root);
    for slot in slots {
        if let Some(node) = tree.node_mut(slot) {
            node.x += shift;
        }
    }
}

fn sequence(tree: &mut Tree, slot: Option<Slot>, depth: usize, counter: &mut usize) {
    let Some(slot) = slot else {
        return;
    };
    let (left, right) = match tree.node(slot) {
        Some(node) => (node.left, node.right),
        None => return,
    };

    sequence(tree, left, depth + 1, counter);
    if let Some(node) = tree.node_mut(slot) {
        node.x = *counter as f64 * H_SPACING;
        node.y = TOP_MARGIN + depth as f64 * V_SPACING;
    }
    *counter += 1;
    sequence(tree, right, depth + 1, counter);
}

fn center(tree: &mut Tree, slot: Slot) {
    let (left, right) = match tree.node(slot) {
        Some(node) => (node.left, node.right),
        None => return,
    };
    if let Some(left) = left {
        center(tree, left);
    }
    if let Some(right) = right {
        center(tree, right);
    }

    let left_x = left.and_then(|child| tree.node(child)).map(|node| node.x);
    let right_x = right.and_then(|child| tree.node(child)).map(|node| node.x);
    let x = match (left_x, right_x) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(l), None) => Some(l + H_SPACING / 2.0),
        (None, Some(r)) => Some(r - H_SPACING / 2.0),
        (None, None) => None,
    };
    if let (Some(x), Some(node)) = (x, tree.node_mut(slot)) {
        node.x = x;
    }
}

fn collect(tree: &Tree, root: Slot) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(tree.len());
    let mut stack = vec![root];
    while let Some(slot) = stack.pop() {
        if let Some(node) = tree.node(slot) {
            slots.push(slot);
            stack.extend(node.left);
            stack.extend(node.right);
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::super::tree::Side;
    use super::*;

    #[test]
    fn root_is_centered_and_children_flank_it() {
        let mut tree = Tree::default();
        let root = tree.attach(50, None);
        let left = tree.attach(30, Some((root, Side::Left)));
        let right = tree.attach(70, Some((root, Side::Right)));
        layout(&mut tree, 400.0);

        let root = tree.node(root).unwrap();
        let left = tree.node(left).unwrap();
        let right = tree.node(right).unwrap();
        assert_eq!(root.x, 400.0);
        assert_eq!(root.y, TOP_MARGIN);
        assert_eq!(left.x, 400.0 - H_SPACING);
        assert_eq!(right.x, 400.0 + H_SPACING);
        assert_eq!(left.y, TOP_MARGIN + V_SPACING);
    }

    #[test]
    fn single_child_parent_is_offset() {
        let mut tree = Tree::default();
        let root = tree.attach(50, None);
        let left = tree.attach(30, Some((root, Side::Left)));
        layout(&mut tree, 0.0);
        assert_eq!(tree.node(root).unwrap().x, 0.0);
        assert_eq!(tree.node(left).unwrap().x, -H_SPACING / 2.0);
    }
}
