//! Doubly linked chain stored in an index arena
//!
//! Nodes live in a slot vector; `prev`/`next` are slot indices. Freed slots
//! are recycled through a free list.

use super::Chain;
use crate::errors::{EngineError, Result};
use crate::structures::sequence::Shape;
use crate::Value;

#[derive(Debug, Clone)]
struct Node {
    value: Value,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DoublyChain {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl DoublyChain {
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

    /// Slot of the node at `index`, walking from the closer end
    fn locate(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        if index <= self.len / 2 {
            let mut id = self.head?;
            for _ in 0..index {
                id = self.node(id)?.next?;
            }
            Some(id)
        } else {
            let mut id = self.tail?;
            for _ in 0..self.len - 1 - index {
                id = self.node(id)?.prev?;
            }
            Some(id)
        }
    }

    fn link(&mut self, index: usize, value: Value) -> Option<()> {
        let next = if index == self.len {
            None
        } else {
            Some(self.locate(index)?)
        };
        let prev = match next {
            Some(id) => self.node(id)?.prev,
            None => self.tail,
        };

        let id = self.alloc(Node { value, prev, next });
        match prev {
            Some(prev) => self.node_mut(prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.node_mut(next)?.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
        Some(())
    }

    fn unlink(&mut self, index: usize) -> Option<Value> {
        let id = self.locate(index)?;
        let node = self.nodes.get_mut(id)?.take()?;
        match node.prev {
            Some(prev) => self.node_mut(prev)?.next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next)?.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    /// Values from tail to head, following `prev` pointers
    pub fn values_reversed(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.tail;
        while let Some(node) = cursor.and_then(|id| self.node(id)) {
            values.push(node.value);
            cursor = node.prev;
        }
        values
    }
}

impl Chain for DoublyChain {
    const SHAPE: Shape = Shape::Doubly;

    fn len(&self) -> usize {
        self.len
    }

    fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(node) = cursor.and_then(|id| self.node(id)) {
            values.push(node.value);
            cursor = node.next;
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
        } else if index <= self.len / 2 {
            (0..index).collect()
        } else {
            (index..self.len).rev().collect()
        }
    }

    fn remove_route(&self, index: usize) -> Vec<usize> {
        if index == 0 || index + 1 >= self.len {
            Vec::new()
        } else if index < self.len / 2 {
            (0..index).collect()
        } else {
            (index + 1..self.len).rev().collect()
        }
    }
}
