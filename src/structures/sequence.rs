//! Shared frame vocabulary and shifting mechanics for linear structures
//!
//! Arrays, stacks, queues, deques and the linked lists all render as a row of
//! slots. Inserting into the middle of the row is recorded as
//! **expand → (lift, place)* → insert**: a vacant slot is appended, each
//! displaced element is lifted out of its slot and placed one position to the
//! right, and the new value drops into the opened gap. Removal mirrors it as
//! **lift → (lift, place)* → shrink**.
//!
//! Operations run against a [`Cells`] working copy. The owning engine only
//! commits the copy back once the whole history has been recorded.

use super::Capacity;
use crate::history::{FrameKind, Footprint, Recorder, Timeline};
use crate::Value;
use serde::Serialize;

/// How the presentation layer should draw the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    Contiguous,
    Singly,
    Doubly,
    Circular,
}

/// An element detached from the row while it moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lifted {
    pub value: Value,
    pub from: usize,
}

/// Visualizable state of a linear structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeqSnapshot {
    /// `None` marks a vacant slot
    pub cells: Vec<Option<Value>>,
    /// Element in flight between a `lift` and its `place`
    pub lifted: Option<Lifted>,
    /// Element being removed, shown until the row shrinks
    pub detached: Option<Value>,
    pub capacity: Capacity,
    pub shape: Shape,
}

impl SeqSnapshot {
    /// Occupied slots in order
    pub fn values(&self) -> Vec<Value> {
        self.cells.iter().flatten().copied().collect()
    }
}

impl Footprint for SeqSnapshot {
    fn footprint(&self) -> usize {
        self.cells.len() * std::mem::size_of::<Option<Value>>() + std::mem::size_of::<Self>()
    }
}

/// Why a capacity-bounded operation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fault {
    Overflow,
    Underflow,
}

/// Frame kinds shared by all linear engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SeqFrame {
    Start,
    /// Walking past a node on the way to the target position
    Traverse { index: usize },
    Highlight { indices: Vec<usize> },
    /// The value about to enter the structure, not yet attached
    PreInsert { index: usize, value: Value },
    Expand { at: usize },
    Lift { index: usize },
    Place { from: usize, to: usize },
    Insert { index: usize, value: Value },
    Replace { index: usize, old: Value, new: Value },
    Shrink { at: usize },
    /// Elements dropped by a capacity reduction
    Truncate { dropped: Vec<Value> },
    /// Contents replaced wholesale
    Fill { values: Vec<Value> },
    Found { index: usize },
    NotFound,
    /// `value` is whatever the operation produced (popped, peeked, removed)
    End { value: Option<Value> },
    Error { fault: Fault },
}

impl FrameKind for SeqFrame {
    fn tag(&self) -> &'static str {
        match self {
            SeqFrame::Start => "start",
            SeqFrame::Traverse { .. } => "traverse",
            SeqFrame::Highlight { .. } => "highlight",
            SeqFrame::PreInsert { .. } => "pre-insert",
            SeqFrame::Expand { .. } => "expand",
            SeqFrame::Lift { .. } => "lift",
            SeqFrame::Place { .. } => "place",
            SeqFrame::Insert { .. } => "insert",
            SeqFrame::Replace { .. } => "replace",
            SeqFrame::Shrink { .. } => "shrink",
            SeqFrame::Truncate { .. } => "truncate",
            SeqFrame::Fill { .. } => "fill",
            SeqFrame::Found { .. } => "found",
            SeqFrame::NotFound => "not-found",
            SeqFrame::End { .. } => "end",
            SeqFrame::Error { .. } => "error",
        }
    }

    fn is_start(&self) -> bool {
        matches!(self, SeqFrame::Start)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SeqFrame::End { .. } | SeqFrame::Error { .. })
    }

    fn is_error(&self) -> bool {
        matches!(self, SeqFrame::Error { .. })
    }
}

pub type SeqTimeline = Timeline<SeqFrame, SeqSnapshot>;
pub(crate) type SeqRecorder = Recorder<SeqFrame, SeqSnapshot>;

/// Mutable working copy of a row of slots
#[derive(Debug, Clone)]
pub(crate) struct Cells {
    slots: Vec<Option<Value>>,
    lifted: Option<Lifted>,
    detached: Option<Value>,
    capacity: Capacity,
    shape: Shape,
}

impl Cells {
    pub(crate) fn new(values: &[Value], capacity: Capacity, shape: Shape) -> Self {
        Cells {
            slots: values.iter().copied().map(Some).collect(),
            lifted: None,
            detached: None,
            capacity,
            shape,
        }
    }

    pub(crate) fn snapshot(&self) -> SeqSnapshot {
        SeqSnapshot {
            cells: self.slots.clone(),
            lifted: self.lifted,
            detached: self.detached,
            capacity: self.capacity,
            shape: self.shape,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<Value> {
        self.slots.get(index).copied().flatten()
    }

    pub(crate) fn values(&self) -> Vec<Value> {
        self.slots.iter().flatten().copied().collect()
    }

    pub(crate) fn set_capacity(&mut self, capacity: Capacity) {
        self.capacity = capacity;
    }

    pub(crate) fn replace_all(&mut self, values: &[Value]) {
        self.slots = values.iter().copied().map(Some).collect();
    }

    /// Drop everything past `len`, returning the dropped values
    pub(crate) fn truncate(&mut self, len: usize) -> Vec<Value> {
        if len >= self.slots.len() {
            return Vec::new();
        }
        self.slots.split_off(len).into_iter().flatten().collect()
    }

    pub(crate) fn record(
        &self,
        recorder: &mut SeqRecorder,
        kind: SeqFrame,
        description: impl Into<String>,
    ) -> crate::errors::Result<()> {
        recorder.push(kind, description, self.snapshot())?;
        Ok(())
    }

    /// Insert a vacant slot directly at `at` (pointer rewiring, no shifting)
    pub(crate) fn expand_at(
        &mut self,
        recorder: &mut SeqRecorder,
        at: usize,
    ) -> crate::errors::Result<()> {
        self.slots.insert(at, None);
        self.record(
            recorder,
            SeqFrame::Expand { at },
            format!("Make room at position {}", at),
        )
    }

    /// Open a vacant slot at `index` by growing the row and shifting right
    pub(crate) fn open_slot(
        &mut self,
        recorder: &mut SeqRecorder,
        index: usize,
    ) -> crate::errors::Result<()> {
        let end = self.slots.len();
        self.slots.push(None);
        self.record(
            recorder,
            SeqFrame::Expand { at: end },
            format!("Grow the row to {} slots", end + 1),
        )?;

        for from in (index..end).rev() {
            self.move_one(recorder, from, from + 1)?;
        }
        Ok(())
    }

    /// Drop `value` into the vacant slot at `index`
    pub(crate) fn fill_slot(
        &mut self,
        recorder: &mut SeqRecorder,
        index: usize,
        value: Value,
    ) -> crate::errors::Result<()> {
        self.slots[index] = Some(value);
        self.record(
            recorder,
            SeqFrame::Insert { index, value },
            format!("Insert {} at position {}", value, index),
        )
    }

    /// Lift the element at `index` out of the row, leaving the slot vacant
    pub(crate) fn detach(
        &mut self,
        recorder: &mut SeqRecorder,
        index: usize,
    ) -> crate::errors::Result<Value> {
        let value = self.slots[index].take().unwrap_or_default();
        self.detached = Some(value);
        self.record(
            recorder,
            SeqFrame::Lift { index },
            format!("Lift {} out of position {}", value, index),
        )?;
        Ok(value)
    }

    /// Close the vacant slot at `index` by shifting everything after it left
    pub(crate) fn close_slot(
        &mut self,
        recorder: &mut SeqRecorder,
        index: usize,
    ) -> crate::errors::Result<()> {
        let end = self.slots.len();
        for from in index + 1..end {
            self.move_one(recorder, from, from - 1)?;
        }
        self.shrink_at(recorder, end - 1)
    }

    /// Remove the vacant slot at `at`
    pub(crate) fn shrink_at(
        &mut self,
        recorder: &mut SeqRecorder,
        at: usize,
    ) -> crate::errors::Result<()> {
        self.slots.remove(at);
        self.detached = None;
        self.record(
            recorder,
            SeqFrame::Shrink { at },
            format!("Shrink the row to {} slots", self.slots.len()),
        )
    }

    /// Overwrite the element at `index` in place
    pub(crate) fn replace(
        &mut self,
        recorder: &mut SeqRecorder,
        index: usize,
        new: Value,
    ) -> crate::errors::Result<Value> {
        let old = self.slots[index].replace(new).unwrap_or_default();
        self.record(
            recorder,
            SeqFrame::Replace { index, old, new },
            format!("Replace {} with {} at position {}", old, new, index),
        )?;
        Ok(old)
    }

    fn move_one(
        &mut self,
        recorder: &mut SeqRecorder,
        from: usize,
        to: usize,
    ) -> crate::errors::Result<()> {
        let value = self.slots[from].take().unwrap_or_default();
        self.lifted = Some(Lifted { value, from });
        self.record(
            recorder,
            SeqFrame::Lift { index: from },
            format!("Lift {} from position {}", value, from),
        )?;

        self.lifted = None;
        self.slots[to] = Some(value);
        self.record(
            recorder,
            SeqFrame::Place { from, to },
            format!("Place {} at position {}", value, to),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(recorder: &SeqRecorder) -> Vec<&'static str> {
        recorder.frames().iter().map(|frame| frame.tag()).collect()
    }

    #[test]
    fn open_slot_shifts_right_from_the_back() {
        let mut cells = Cells::new(&[1, 2, 3], Capacity::Unbounded, Shape::Contiguous);
        let mut recorder = SeqRecorder::new();
        cells.open_slot(&mut recorder, 1).unwrap();
        cells.fill_slot(&mut recorder, 1, 9).unwrap();

        assert_eq!(cells.values(), vec![1, 9, 2, 3]);
        assert_eq!(
            tags(&recorder),
            vec!["expand", "lift", "place", "lift", "place", "insert"]
        );
    }

    #[test]
    fn close_slot_shifts_left_then_shrinks() {
        let mut cells = Cells::new(&[1, 2, 3], Capacity::Unbounded, Shape::Contiguous);
        let mut recorder = SeqRecorder::new();
        let removed = cells.detach(&mut recorder, 0).unwrap();
        assert_eq!(cells.snapshot().detached, Some(1));
        cells.close_slot(&mut recorder, 0).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(cells.values(), vec![2, 3]);
        assert_eq!(cells.snapshot().detached, None);
        assert_eq!(
            tags(&recorder),
            vec!["lift", "lift", "place", "lift", "place", "shrink"]
        );
    }

    #[test]
    fn lifted_element_is_visible_between_lift_and_place() {
        let mut cells = Cells::new(&[4, 5], Capacity::Unbounded, Shape::Contiguous);
        let mut recorder = SeqRecorder::new();
        cells.open_slot(&mut recorder, 0).unwrap();
        let frames = recorder.frames();

        // expand, lift(1), place(1->2), lift(0), place(0->1)
        assert_eq!(frames[1].snapshot.lifted, Some(Lifted { value: 5, from: 1 }));
        assert_eq!(frames[1].snapshot.cells, vec![Some(4), None, None]);
        assert_eq!(frames[2].snapshot.lifted, None);
        assert_eq!(frames[4].snapshot.cells, vec![None, Some(4), Some(5)]);
    }
}
