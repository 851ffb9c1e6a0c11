//! Arena-backed binary tree
//!
//! Children are owned through slot indices; `parent` is a plain back index
//! used only to walk upward when splicing nodes out.

use super::{NodeView, TreeSnapshot};
use crate::Value;
use serde::Serialize;

pub(crate) type Slot = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TreeNode {
    pub(crate) value: Value,
    pub(crate) left: Option<Slot>,
    pub(crate) right: Option<Slot>,
    pub(crate) parent: Option<Slot>,
    pub(crate) x: f64,
    pub(crate) y: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tree {
    nodes: Vec<Option<TreeNode>>,
    free: Vec<Slot>,
    root: Option<Slot>,
    len: usize,
}

impl Tree {
    pub(crate) fn root(&self) -> Option<Slot> {
        self.root
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn node(&self, slot: Slot) -> Option<&TreeNode> {
        self.nodes.get(slot)?.as_ref()
    }

    pub(crate) fn node_mut(&mut self, slot: Slot) -> Option<&mut TreeNode> {
        self.nodes.get_mut(slot)?.as_mut()
    }

    pub(crate) fn value(&self, slot: Slot) -> Option<Value> {
        self.node(slot).map(|node| node.value)
    }

    pub(crate) fn child(&self, slot: Slot, side: Side) -> Option<Slot> {
        let node = self.node(slot)?;
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    /// Create a leaf under `parent` (or as the root)
    pub(crate) fn attach(&mut self, value: Value, parent: Option<(Slot, Side)>) -> Slot {
        let (x, y) = parent
            .and_then(|(slot, side)| {
                let node = self.node(slot)?;
                let dx = super::layout::H_SPACING / 2.0;
                Some(match side {
                    Side::Left => (node.x - dx, node.y + super::layout::V_SPACING),
                    Side::Right => (node.x + dx, node.y + super::layout::V_SPACING),
                })
            })
            .unwrap_or((0.0, super::layout::TOP_MARGIN));

        let node = TreeNode {
            value,
            left: None,
            right: None,
            parent: parent.map(|(slot, _)| slot),
            x,
            y,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match parent {
            Some((parent, Side::Left)) => {
                if let Some(node) = self.node_mut(parent) {
                    node.left = Some(slot);
                }
            }
            Some((parent, Side::Right)) => {
                if let Some(node) = self.node_mut(parent) {
                    node.right = Some(slot);
                }
            }
            None => self.root = Some(slot),
        }
        self.len += 1;
        slot
    }

    /// Remove a node with at most one child, moving that child into its place
    ///
    /// Returns the promoted child, if any.
    pub(crate) fn splice_out(&mut self, slot: Slot) -> Option<Option<Slot>> {
        let node = self.node(slot)?;
        if node.left.is_some() && node.right.is_some() {
            return None;
        }
        let child = node.left.or(node.right);
        let parent = node.parent;

        if let Some(child) = child {
            self.node_mut(child)?.parent = parent;
        }
        match parent {
            Some(parent) => {
                let parent_node = self.node_mut(parent)?;
                if parent_node.left == Some(slot) {
                    parent_node.left = child;
                } else {
                    parent_node.right = child;
                }
            }
            None => self.root = child,
        }

        self.nodes[slot] = None;
        self.free.push(slot);
        self.len -= 1;
        Some(child)
    }

    pub(crate) fn set_value(&mut self, slot: Slot, value: Value) {
        if let Some(node) = self.node_mut(slot) {
            node.value = value;
        }
    }

    /// Values in left → self → right order
    pub(crate) fn in_order(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(slot) = cursor {
                stack.push(slot);
                cursor = self.node(slot).and_then(|node| node.left);
            }
            let Some(slot) = stack.pop() else {
                break;
            };
            if let Some(node) = self.node(slot) {
                values.push(node.value);
                cursor = node.right;
            }
        }
        values
    }

    /// Pre-order list of node views
    pub(crate) fn snapshot(&self) -> TreeSnapshot {
        let mut nodes = Vec::with_capacity(self.len);
        let mut stack: Vec<Slot> = self.root.into_iter().collect();
        while let Some(slot) = stack.pop() {
            let Some(node) = self.node(slot) else {
                continue;
            };
            nodes.push(NodeView {
                value: node.value,
                x: node.x,
                y: node.y,
                left: node.left.and_then(|child| self.value(child)),
                right: node.right.and_then(|child| self.value(child)),
                parent: node.parent.and_then(|parent| self.value(parent)),
            });
            stack.extend(node.right);
            stack.extend(node.left);
        }
        TreeSnapshot {
            root: self.root.and_then(|root| self.value(root)),
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_promotes_the_only_child() {
        let mut tree = Tree::default();
        let root = tree.attach(50, None);
        let left = tree.attach(30, Some((root, Side::Left)));
        let grandchild = tree.attach(20, Some((left, Side::Left)));

        assert_eq!(tree.splice_out(left), Some(Some(grandchild)));
        assert_eq!(tree.child(root, Side::Left), Some(grandchild));
        assert_eq!(tree.node(grandchild).unwrap().parent, Some(root));
        assert_eq!(tree.in_order(), vec![20, 50]);
    }

    #[test]
    fn splice_refuses_two_children() {
        let mut tree = Tree::default();
        let root = tree.attach(50, None);
        tree.attach(30, Some((root, Side::Left)));
        tree.attach(70, Some((root, Side::Right)));
        assert_eq!(tree.splice_out(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn removing_the_root_leaf_empties_the_tree() {
        let mut tree = Tree::default();
        let root = tree.attach(1, None);
        assert_eq!(tree.splice_out(root), Some(None));
        assert_eq!(tree.root(), None);
        assert!(tree.snapshot().nodes.is_empty());
    }
}
