//! Array engine: indexed insertion, removal and update over a contiguous row

use super::container::Container;
use super::sequence::{Fault, SeqFrame, SeqSnapshot, SeqTimeline};
use super::Capacity;
use crate::errors::{EngineError, Result};
use crate::Value;
use rand::Rng;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ArrayEngine {
    inner: Container,
}

impl ArrayEngine {
    pub fn new(capacity: Capacity) -> Self {
        ArrayEngine {
            inner: Container::new(capacity),
        }
    }

    pub fn from_values(values: &[Value], capacity: Capacity) -> Result<Self> {
        Ok(ArrayEngine {
            inner: Container::from_values(values, capacity)?,
        })
    }

    /// Byte budget for a single operation's history
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

    /// Insert `value` at `index`, shifting later elements one slot right
    pub fn insert(&mut self, index: usize, value: Value) -> Result<SeqTimeline> {
        let len = self.inner.len();
        if index > len {
            warn!(index, len, "array insert out of bounds");
            return Err(EngineError::out_of_bounds(index, len));
        }

        let (mut cells, mut recorder) =
            self.inner.begin(format!("Insert {} at index {}", value, index))?;

        if !self.inner.capacity().admits(len) {
            return self.inner.reject(
                cells,
                recorder,
                Fault::Overflow,
                format!("Overflow: the array is full ({} elements)", len),
            );
        }

        cells.record(
            &mut recorder,
            SeqFrame::PreInsert { index, value },
            format!("{} is waiting to enter at index {}", value, index),
        )?;
        cells.open_slot(&mut recorder, index)?;
        cells.fill_slot(&mut recorder, index, value)?;

        let timeline = self
            .inner
            .commit(cells, recorder, None, format!("Inserted {}", value))?;
        debug!(index, value, frames = timeline.len(), "array insert");
        Ok(timeline)
    }

    /// Append `value` at the end
    pub fn push(&mut self, value: Value) -> Result<SeqTimeline> {
        self.insert(self.inner.len(), value)
    }

    /// Remove the element at `index`, shifting later elements one slot left
    pub fn remove(&mut self, index: usize) -> Result<SeqTimeline> {
        let len = self.inner.len();
        if index >= len {
            warn!(index, len, "array remove out of bounds");
            return Err(EngineError::out_of_bounds(index, len));
        }

        let (mut cells, mut recorder) =
            self.inner.begin(format!("Remove the element at index {}", index))?;
        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: vec![index],
            },
            format!("Select index {}", index),
        )?;
        let removed = cells.detach(&mut recorder, index)?;
        cells.close_slot(&mut recorder, index)?;

        let timeline = self.inner.commit(
            cells,
            recorder,
            Some(removed),
            format!("Removed {}", removed),
        )?;
        debug!(index, removed, frames = timeline.len(), "array remove");
        Ok(timeline)
    }

    /// Overwrite the element at `index`
    pub fn update(&mut self, index: usize, value: Value) -> Result<SeqTimeline> {
        let len = self.inner.len();
        if index >= len {
            warn!(index, len, "array update out of bounds");
            return Err(EngineError::out_of_bounds(index, len));
        }

        let (mut cells, mut recorder) =
            self.inner.begin(format!("Set index {} to {}", index, value))?;
        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: vec![index],
            },
            format!("Select index {}", index),
        )?;
        let old = cells.replace(&mut recorder, index, value)?;
        self.inner
            .commit(cells, recorder, Some(old), format!("{} replaced {}", value, old))
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

impl Default for ArrayEngine {
    fn default() -> Self {
        Self::new(Capacity::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_in_the_middle_shifts_right() {
        let mut array = ArrayEngine::from_values(&[1, 2, 3], Capacity::Unbounded).unwrap();
        let timeline = array.insert(1, 9).unwrap();

        assert_eq!(array.values(), &[1, 9, 2, 3]);
        assert_eq!(
            timeline.tags(),
            vec![
                "start",
                "pre-insert",
                "expand",
                "lift",
                "place",
                "lift",
                "place",
                "insert",
                "end"
            ]
        );
        assert_eq!(timeline.final_snapshot(), &array.state());
    }

    #[test]
    fn insert_at_end_needs_no_shift() {
        let mut array = ArrayEngine::from_values(&[1], Capacity::Unbounded).unwrap();
        let timeline = array.push(2).unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "pre-insert", "expand", "insert", "end"]
        );
        assert_eq!(array.values(), &[1, 2]);
    }

    #[test]
    fn insert_past_the_end_is_refused() {
        let mut array = ArrayEngine::from_values(&[1, 2], Capacity::Unbounded).unwrap();
        assert_eq!(
            array.insert(3, 5).unwrap_err(),
            EngineError::out_of_bounds(3, 2)
        );
        assert_eq!(array.values(), &[1, 2]);
    }

    #[test]
    fn full_array_overflows_without_mutation() {
        let mut array = ArrayEngine::from_values(&[1, 2], Capacity::Fixed(2)).unwrap();
        let before = array.state();
        let timeline = array.insert(0, 5).unwrap();

        assert!(timeline.failed());
        assert_eq!(
            timeline.last().kind,
            SeqFrame::Error {
                fault: Fault::Overflow
            }
        );
        assert_eq!(array.state(), before);
    }

    #[test]
    fn remove_shifts_left_and_reports_value() {
        let mut array = ArrayEngine::from_values(&[4, 5, 6], Capacity::Unbounded).unwrap();
        let timeline = array.remove(0).unwrap();

        assert_eq!(array.values(), &[5, 6]);
        assert_eq!(timeline.last().kind, SeqFrame::End { value: Some(4) });
        assert_eq!(
            timeline.tags(),
            vec![
                "start",
                "highlight",
                "lift",
                "lift",
                "place",
                "lift",
                "place",
                "shrink",
                "end"
            ]
        );
    }

    #[test]
    fn update_replaces_in_place() {
        let mut array = ArrayEngine::from_values(&[4, 5, 6], Capacity::Unbounded).unwrap();
        let timeline = array.update(2, 60).unwrap();
        assert_eq!(array.values(), &[4, 5, 60]);
        assert_eq!(timeline.last().kind, SeqFrame::End { value: Some(6) });
        assert!(array.update(3, 1).is_err());
    }

    #[test]
    fn operations_are_deterministic() {
        let base = ArrayEngine::from_values(&[3, 1, 4, 1, 5], Capacity::Fixed(8)).unwrap();
        let mut a = base.clone();
        let mut b = base.clone();
        assert_eq!(a.insert(2, 7).unwrap(), b.insert(2, 7).unwrap());
        assert_eq!(a.remove(4).unwrap(), b.remove(4).unwrap());
    }
}
