//! Queue engine
//!
//! Backed by a contiguous row: enqueue appends at the back, dequeue lifts the
//! front element and shifts the remaining elements one slot left. Capacity
//! faults follow the stack's overflow/underflow contract.

use super::container::Container;
use super::sequence::{Fault, SeqFrame, SeqSnapshot, SeqTimeline};
use super::Capacity;
use crate::errors::Result;
use crate::Value;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QueueEngine {
    inner: Container,
}

impl QueueEngine {
    pub fn new(capacity: Capacity) -> Self {
        QueueEngine {
            inner: Container::new(capacity),
        }
    }

    /// Build a queue whose first value is the front
    pub fn from_values(values: &[Value], capacity: Capacity) -> Result<Self> {
        Ok(QueueEngine {
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

    /// Front to back
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

    pub fn enqueue(&mut self, value: Value) -> Result<SeqTimeline> {
        let len = self.inner.len();
        let (mut cells, mut recorder) = self.inner.begin(format!("Enqueue {}", value))?;

        if !self.inner.capacity().admits(len) {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Overflow,
                format!("Queue overflow: cannot enqueue {}, the queue is full", value),
            );
        }

        cells.record(
            &mut recorder,
            SeqFrame::PreInsert { index: len, value },
            format!("{} joins the back of the queue", value),
        )?;
        cells.expand_at(&mut recorder, len)?;
        cells.fill_slot(&mut recorder, len, value)?;

        let timeline = self.inner.commit(
            cells,
            recorder,
            None,
            format!("{} is at the back", value),
        )?;
        debug!(value, frames = timeline.len(), "queue enqueue");
        Ok(timeline)
    }

    pub fn dequeue(&mut self) -> Result<SeqTimeline> {
        let (mut cells, mut recorder) = self.inner.begin("Dequeue the front element")?;

        if cells.len() == 0 {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Queue underflow: nothing to dequeue",
            );
        }

        cells.record(
            &mut recorder,
            SeqFrame::Highlight { indices: vec![0] },
            "Select the front element",
        )?;
        let value = cells.detach(&mut recorder, 0)?;
        cells.close_slot(&mut recorder, 0)?;

        let timeline =
            self.inner
                .commit(cells, recorder, Some(value), format!("Dequeued {}", value))?;
        debug!(value, frames = timeline.len(), "queue dequeue");
        Ok(timeline)
    }

    pub fn peek(&self) -> Result<SeqTimeline> {
        let (cells, mut recorder) = self.inner.begin("Peek at the front element")?;

        let Some(value) = cells.get(0) else {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Underflow,
                "Queue underflow: nothing to peek at",
            );
        };

        cells.record(
            &mut recorder,
            SeqFrame::Highlight { indices: vec![0] },
            "The front element",
        )?;
        self.inner
            .conclude(cells, recorder, Some(value), format!("Front is {}", value))
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

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new(Capacity::Unbounded)
    }
}
