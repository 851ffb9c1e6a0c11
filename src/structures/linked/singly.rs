//! Singly linked chain: each node owns the next one

use super::Chain;
use crate::errors::{EngineError, Result};
use crate::structures::sequence::Shape;
use crate::Value;

#[derive(Debug, Clone)]
struct Node {
    value: Value,
    next: Option<Box<Node>>,
}

#[derive(Debug, Clone, Default)]
pub struct SinglyChain {
    head: Option<Box<Node>>,
    len: usize,
}

impl SinglyChain {
    pub fn head(&self) -> Option<Value> {
        self.head.as_ref().map(|node| node.value)
    }
}

impl Chain for SinglyChain {
    const SHAPE: Shape = Shape::Singly;

    fn len(&self) -> usize {
        self.len
    }

    fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            values.push(node.value);
            cursor = node.next.as_deref();
        }
        values
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        if index > self.len {
            return Err(EngineError::out_of_bounds(index, self.len));
        }

        let mut cursor = &mut self.head;
        for _ in 0..index {
            cursor = &mut cursor
                .as_mut()
                .ok_or(EngineError::out_of_bounds(index, self.len))?
                .next;
        }
        let next = cursor.take();
        *cursor = Some(Box::new(Node { value, next }));
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.len {
            return Err(EngineError::out_of_bounds(index, self.len));
        }

        let mut cursor = &mut self.head;
        for _ in 0..index {
            cursor = &mut cursor
                .as_mut()
                .ok_or(EngineError::out_of_bounds(index, self.len))?
                .next;
        }
        let mut node = cursor
            .take()
            .ok_or(EngineError::out_of_bounds(index, self.len))?;
        *cursor = node.next.take();
        self.len -= 1;
        Ok(node.value)
    }

    fn insert_route(&self, index: usize) -> Vec<usize> {
        (0..index.min(self.len)).collect()
    }

    fn remove_route(&self, index: usize) -> Vec<usize> {
        (0..index.min(self.len)).collect()
    }
}

impl Drop for SinglyChain {
    // Unlink iteratively so long chains don't recurse through Box drops.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_anywhere() {
        let mut chain = SinglyChain::default();
        chain.insert(0, 2).unwrap();
        chain.insert(0, 1).unwrap();
        chain.insert(2, 4).unwrap();
        chain.insert(2, 3).unwrap();
        assert_eq!(chain.values(), vec![1, 2, 3, 4]);

        assert_eq!(chain.remove(1).unwrap(), 2);
        assert_eq!(chain.remove(2).unwrap(), 4);
        assert_eq!(chain.values(), vec![1, 3]);
        assert_eq!(chain.head(), Some(1));
        assert!(chain.remove(2).is_err());
    }
}
