//! Circular singly linked chain addressed through its tail
//!
//! Only `tail` is stored; the head is always `tail.next`. Linking before the
//! head or unlinking the head rewires `tail.next` without any walk.

use super::Chain;
use crate::errors::{EngineError, Result};
use crate::structures::sequence::Shape;
use crate::Value;

#[derive(Debug, Clone)]
struct Node {
    value: Value,
    next: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CircularChain {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    tail: Option<usize>,
    len: usize,
}

impl CircularChain {
    fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)?.as_ref()
    }

    fn node_mut(&mut self, id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(id)?.as_mut()
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn head_id(&self) -> Option<usize> {
        Some(self.node(self.tail?)?.next)
    }

    /// Slot of the node at `index`, walking from the head
    fn locate(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        let mut id = self.head_id()?;
        for _ in 0..index {
            id = self.node(id)?.next;
        }
        Some(id)
    }

    fn link(&mut self, index: usize, value: Value) -> Option<()> {
        match self.tail {
            None => {
                let id = self.alloc(Node { value, next: 0 });
                self.node_mut(id)?.next = id;
                self.tail = Some(id);
            }
            Some(tail) => {
                let prev = if index == 0 || index == self.len {
                    tail
                } else {
                    self.locate(index - 1)?
                };
                let next = self.node(prev)?.next;
                let id = self.alloc(Node { value, next });
                self.node_mut(prev)?.next = id;
                if index == self.len {
                    self.tail = Some(id);
                }
            }
        }
        self.len += 1;
        Some(())
    }

    fn unlink(&mut self, index: usize) -> Option<Value> {
        if index >= self.len {
            return None;
        }
        let tail = self.tail?;
        let prev = if index == 0 {
            tail
        } else {
            self.locate(index - 1)?
        };
        let id = self.node(prev)?.next;
        let node = self.nodes.get_mut(id)?.take()?;

        if self.len == 1 {
            self.tail = None;
        } else {
            self.node_mut(prev)?.next = node.next;
            if id == tail {
                self.tail = Some(prev);
            }
        }
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    pub fn head(&self) -> Option<Value> {
        Some(self.node(self.head_id()?)?.value)
    }

    pub fn tail(&self) -> Option<Value> {
        Some(self.node(self.tail?)?.value)
    }
}

impl Chain for CircularChain {
    const SHAPE: Shape = Shape::Circular;

    fn len(&self) -> usize {
        self.len
    }

    fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.head_id();
        for _ in 0..self.len {
            let Some(node) = cursor.and_then(|id| self.node(id)) else {
                break;
            };
            values.push(node.value);
            cursor = Some(node.next);
        }
        values
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        if index > self.len {
            return Err(EngineError::out_of_bounds(index, self.len));
        }
        self.link(index, value)
            .ok_or(EngineError::out_of_bounds(index, self.len))
    }

    fn remove(&mut self, index: usize) -> Result<Value> {
        let len = self.len;
        self.unlink(index)
            .ok_or(EngineError::out_of_bounds(index, len))
    }

    fn insert_route(&self, index: usize) -> Vec<usize> {
        if index == 0 || index >= self.len {
            Vec::new()
        } else {
            (0..index).collect()
        }
    }

    fn remove_route(&self, index: usize) -> Vec<usize> {
        // The tail's predecessor is only reachable by walking from the head.
        if index == 0 {
            Vec::new()
        } else {
            (0..index.min(self.len)).collect()
        }
    }
}
