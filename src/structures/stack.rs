//! Stack engine
//!
//! Push and pop are O(1), but each still records `pre-insert` / `highlight` /
//! `lift` frames so the animation stays continuous. A fixed-capacity stack
//! rejects a push onto a full stack with an `overflow` error frame; pop and
//! peek on an empty stack end in `underflow`.

use super::container::Container;
use super::sequence::{Fault, SeqFrame, SeqSnapshot, SeqTimeline};
use super::Capacity;
use crate::errors::Result;
use crate::Value;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StackEngine {
    inner: Container,
}

impl StackEngine {
    pub fn new(capacity: Capacity) -> Self {
        StackEngine {
            inner: Container::new(capacity),
        }
    }

    /// Build a stack whose last value is the top
    pub fn from_values(values: &[Value], capacity: Capacity) -> Result<Self> {
        Ok(StackEngine {
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

    /// Bottom to top
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

    pub fn push(&mut self, value: Value) -> Result<SeqTimeline> {
        let len = self.inner.len();
        let (mut cells, mut recorder) = self.inner.begin(format!("Push {}", value))?;

        if !self.inner.capacity().admits(len) {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Overflow,
                format!("Stack overflow: cannot push {}, the stack is full", value),
            );
        }

        cells.record(
            &mut recorder,
            SeqFrame::PreInsert { index: len, value },
            format!("{} is placed above the top", value),
        )?;
        cells.expand_at(&mut recorder, len)?;
        cells.fill_slot(&mut recorder, len, value)?;

        let timeline = self.inner.commit(
            cells,
            recorder,
            None,
            format!("{} is the new top", value),
        )?;
        debug!(value, frames = timeline.len(), "stack push");
        Ok(timeline)
    }

    pub fn pop(&mut self) -> Result<SeqTimeline> {
        let (mut cells, mut recorder) = self.inner.begin("Pop the top element")?;

        let Some(top) = cells.len().checked_sub(1) else {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Stack underflow: nothing to pop",
            );
        };

        cells.record(
            &mut recorder,
            SeqFrame::Highlight { indices: vec![top] },
            "Select the top element",
        )?;
        let value = cells.detach(&mut recorder, top)?;
        cells.shrink_at(&mut recorder, top)?;

        let timeline =
            self.inner
                .commit(cells, recorder, Some(value), format!("Popped {}", value))?;
        debug!(value, frames = timeline.len(), "stack pop");
        Ok(timeline)
    }

    pub fn peek(&self) -> Result<SeqTimeline> {
        let (cells, mut recorder) = self.inner.begin("Peek at the top element")?;

        let Some(top) = cells.len().checked_sub(1) else {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Stack underflow: nothing to peek at",
            );
        };

        let value = cells.get(top);
        cells.record(
            &mut recorder,
            SeqFrame::Highlight { indices: vec![top] },
            "The top element",
        )?;
        self.inner.conclude(
            cells,
            recorder,
            value,
            format!("Top is {}", value.unwrap_or_default()),
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

impl Default for StackEngine {
    fn default() -> Self {
        Self::new(Capacity::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_pre_insert_and_commits() {
        let mut stack = StackEngine::default();
        let timeline = stack.push(3).unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "pre-insert", "expand", "insert", "end"]
        );
        assert_eq!(stack.values(), &[3]);
    }

    #[test]
    fn pop_lifts_the_top() {
        let mut stack = StackEngine::from_values(&[1, 2], Capacity::Unbounded).unwrap();
        let timeline = stack.pop().unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "highlight", "lift", "shrink", "end"]
        );
        assert_eq!(timeline.last().kind, SeqFrame::End { value: Some(2) });
        assert_eq!(stack.values(), &[1]);
    }

    #[test]
    fn empty_stack_underflows() {
        let mut stack = StackEngine::new(Capacity::Fixed(3));
        for timeline in [stack.pop().unwrap(), stack.peek().unwrap()] {
            assert_eq!(timeline.tags(), vec!["start", "error"]);
            assert_eq!(
                timeline.last().kind,
                SeqFrame::Error {
                    fault: Fault::Underflow
                }
            );
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn peek_does_not_mutate() {
        let stack = StackEngine::from_values(&[1, 2], Capacity::Unbounded).unwrap();
        let before = stack.state();
        let timeline = stack.peek().unwrap();
        assert_eq!(timeline.last().kind, SeqFrame::End { value: Some(2) });
        assert_eq!(timeline.final_snapshot(), &before);
        assert_eq!(stack.state(), before);
    }
}
