//! Stateful structure engines
//!
//! Each engine owns its authoritative state exclusively. Operations return a
//! [`Timeline`](crate::history::Timeline) and touch that state at most once,
//! after the whole history has been recorded:
//!
//! - [`array`]: indexed insert/remove/update over a contiguous row
//! - [`stack`], [`queue`], [`deque`]: capacity-bounded linear containers
//! - [`linked`]: singly, doubly and circular linked lists
//! - [`bst`]: binary search tree with display coordinates
//!
//! The linear engines share the frame vocabulary and shifting mechanics in
//! [`sequence`].

pub mod array;
pub mod bst;
mod container;
pub mod deque;
pub mod linked;
pub mod queue;
pub mod sequence;
pub mod stack;

use crate::errors::{EngineError, Result};
use serde::Serialize;

pub(crate) use container::RANDOM_VALUE_MAX;

pub use array::ArrayEngine;
pub use bst::BstEngine;
pub use deque::DequeEngine;
pub use linked::{CircularLinkedList, DoublyLinkedList, SinglyLinkedList};
pub use queue::QueueEngine;
pub use sequence::{Fault, SeqFrame, SeqSnapshot, SeqTimeline, Shape};
pub use stack::StackEngine;

/// Maximum number of elements a structure may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capacity {
    #[default]
    Unbounded,
    Fixed(usize),
}

impl Capacity {
    /// Validated fixed capacity
    pub fn fixed(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(EngineError::InvalidCapacity(limit));
        }
        Ok(Capacity::Fixed(limit))
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Fixed(limit) => Some(*limit),
        }
    }

    /// Whether a structure currently holding `len` elements can take one more
    pub fn admits(&self, len: usize) -> bool {
        match self {
            Capacity::Unbounded => true,
            Capacity::Fixed(limit) => len < *limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_admits_until_full() {
        let capacity = Capacity::fixed(2).unwrap();
        assert!(capacity.admits(0));
        assert!(capacity.admits(1));
        assert!(!capacity.admits(2));
        assert!(Capacity::Unbounded.admits(usize::MAX - 1));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(Capacity::fixed(0), Err(EngineError::InvalidCapacity(0)));
    }
}
