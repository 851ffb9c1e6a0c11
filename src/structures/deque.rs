//! Double-ended queue engine
//!
//! Both ends are O(1) structurally: inserting at the front opens a slot
//! directly at position 0 and removing from the front drops slot 0, with no
//! lift/place shifting in between.

use super::container::Container;
use super::sequence::{Fault, SeqFrame, SeqSnapshot, SeqTimeline};
use super::Capacity;
use crate::errors::Result;
use crate::Value;
use rand::Rng;
use tracing::debug;

/// Which end of the deque an operation works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Front,
    Back,
}

impl End {
    fn name(self) -> &'static str {
        match self {
            End::Front => "front",
            End::Back => "back",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DequeEngine {
    inner: Container,
}

impl DequeEngine {
    pub fn new(capacity: Capacity) -> Self {
        DequeEngine {
            inner: Container::new(capacity),
        }
    }

    pub fn from_values(values: &[Value], capacity: Capacity) -> Result<Self> {
        Ok(DequeEngine {
            inner: Container::from_values(values, capacity)?,
        })
    }

    pub fn with_history_limit(mut self, bytes: usize) -> Self {
        self.inner.set_history_limit(bytes);
        self
    }

    pub fn state(&self) -> SeqSnapshot {
        self.inner.state()
    }

    pub fn values(&self) -> &[Value] {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    pub fn capacity(&self) -> Capacity {
        self.inner.capacity()
    }

    pub fn push_front(&mut self, value: Value) -> Result<SeqTimeline> {
        self.push(End::Front, value)
    }

    pub fn push_back(&mut self, value: Value) -> Result<SeqTimeline> {
        self.push(End::Back, value)
    }

    pub fn pop_front(&mut self) -> Result<SeqTimeline> {
        self.pop(End::Front)
    }

    pub fn pop_back(&mut self) -> Result<SeqTimeline> {
        self.pop(End::Back)
    }

    pub fn peek_front(&self) -> Result<SeqTimeline> {
        self.peek(End::Front)
    }

    pub fn peek_back(&self) -> Result<SeqTimeline> {
        self.peek(End::Back)
    }

    pub fn push(&mut self, end: End, value: Value) -> Result<SeqTimeline> {
        let len = self.inner.len();
        let (mut cells, mut recorder) = self
            .inner
            .begin(format!("Insert {} at the {}", value, end.name()))?;

        if !self.inner.capacity().admits(len) {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Overflow,
                format!("Deque overflow: cannot insert {}, the deque is full", value),
            );
        }

        let index = match end {
            End::Front => 0,
            End::Back => len,
        };
        cells.record(
            &mut recorder,
            SeqFrame::PreInsert { index, value },
            format!("{} waits at the {}", value, end.name()),
        )?;
        cells.expand_at(&mut recorder, index)?;
        cells.fill_slot(&mut recorder, index, value)?;

        let timeline = self.inner.commit(
            cells,
            recorder,
            None,
            format!("{} is at the {}", value, end.name()),
        )?;
        debug!(?end, value, frames = timeline.len(), "deque push");
        Ok(timeline)
    }

    pub fn pop(&mut self, end: End) -> Result<SeqTimeline> {
        let (mut cells, mut recorder) = self
            .inner
            .begin(format!("Remove the {} element", end.name()))?;

        let Some(last) = cells.len().checked_sub(1) else {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Deque underflow: nothing to remove",
            );
        };

        let index = match end {
            End::Front => 0,
            End::Back => last,
        };
        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: vec![index],
            },
            format!("Select the {} element", end.name()),
        )?;
        let value = cells.detach(&mut recorder, index)?;
        cells.shrink_at(&mut recorder, index)?;

        let timeline =
            self.inner
                .commit(cells, recorder, Some(value), format!("Removed {}", value))?;
        debug!(?end, value, frames = timeline.len(), "deque pop");
        Ok(timeline)
    }

    pub fn peek(&self, end: End) -> Result<SeqTimeline> {
        let (cells, mut recorder) = self
            .inner
            .begin(format!("Peek at the {} element", end.name()))?;

        let Some(last) = cells.len().checked_sub(1) else {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Deque underflow: nothing to peek at",
            );
        };

        let index = match end {
            End::Front => 0,
            End::Back => last,
        };
        let value = cells.get(index);
        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: vec![index],
            },
            format!("The {} element", end.name()),
        )?;
        self.inner.conclude(
            cells,
            recorder,
            value,
            format!("{} is {}", end.name(), value.unwrap_or_default()),
        )
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> Result<SeqTimeline> {
        self.inner.set_capacity(capacity)
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, len: usize) -> Result<SeqTimeline> {
        self.inner.randomize(rng, len)
    }

    pub fn clear(&mut self) -> Result<SeqTimeline> {
        self.inner.clear()
    }
}

impl Default for DequeEngine {
    fn default() -> Self {
        Self::new(Capacity::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_insert_has_no_shift_frames() {
        let mut deque = DequeEngine::from_values(&[2, 3], Capacity::Unbounded).unwrap();
        let timeline = deque.push_front(1).unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "pre-insert", "expand", "insert", "end"]
        );
        assert_eq!(deque.values(), &[1, 2, 3]);
    }

    #[test]
    fn both_ends_pop() {
        let mut deque = DequeEngine::from_values(&[1, 2, 3], Capacity::Unbounded).unwrap();
        let front = deque.pop_front().unwrap();
        let back = deque.pop_back().unwrap();
        assert_eq!(front.last().kind, SeqFrame::End { value: Some(1) });
        assert_eq!(back.last().kind, SeqFrame::End { value: Some(3) });
        assert_eq!(front.tags(), vec!["start", "highlight", "lift", "shrink", "end"]);
        assert_eq!(deque.values(), &[2]);
    }

    #[test]
    fn capacity_applies_to_both_ends() {
        let mut deque = DequeEngine::new(Capacity::Fixed(2));
        deque.push_back(1).unwrap();
        deque.push_front(0).unwrap();
        assert!(deque.push_back(2).unwrap().failed());
        assert!(deque.push_front(2).unwrap().failed());
        assert_eq!(deque.values(), &[0, 1]);
    }

    #[test]
    fn peeks_read_both_ends() {
        let deque = DequeEngine::from_values(&[5, 6, 7], Capacity::Unbounded).unwrap();
        assert_eq!(
            deque.peek_front().unwrap().last().kind,
            SeqFrame::End { value: Some(5) }
        );
        assert_eq!(
            deque.peek_back().unwrap().last().kind,
            SeqFrame::End { value: Some(7) }
        );
        assert_eq!(deque.values(), &[5, 6, 7]);
        let empty = DequeEngine::default();
        assert!(empty.peek_back().unwrap().failed());
    }
}
