//! Linked list engines
//!
//! [`ListEngine`] records the journey for every insertion and removal and is
//! generic over the node representation ([`Chain`]). The representation
//! decides how the engine may navigate:
//!
//! - [`SinglyChain`]: only a `head`, so every walk starts at the head
//! - [`DoublyChain`]: `head` and `tail` with back pointers, so a walk starts
//!   from whichever end is closer to the target
//! - [`CircularChain`]: only a `tail`; the head is `tail.next`, so both head
//!   insertion and head removal are pure pointer rewiring
//!
//! Each node passed on the way emits a `traverse` frame. Head and tail
//! mutations link or unlink directly; anything in the middle records the
//! shift frames from [`sequence`](super::sequence).

mod circular;
mod doubly;
mod singly;

pub use circular::CircularChain;
pub use doubly::DoublyChain;
pub use singly::SinglyChain;

use super::container::RANDOM_VALUE_MAX;
use super::sequence::{Cells, SeqFrame, SeqRecorder, SeqSnapshot, SeqTimeline, Shape};
use super::Capacity;
use crate::errors::{EngineError, Result};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::Value;
use rand::Rng;
use std::fmt;
use tracing::{debug, warn};

pub type SinglyLinkedList = ListEngine<SinglyChain>;
pub type DoublyLinkedList = ListEngine<DoublyChain>;
pub type CircularLinkedList = ListEngine<CircularChain>;

/// Owned node storage for one list flavour
pub trait Chain: Default + Clone + fmt::Debug {
    const SHAPE: Shape;

    fn len(&self) -> usize;

    /// Values from head to tail
    fn values(&self) -> Vec<Value>;

    /// Link a new node so that it ends up at position `index`
    fn insert(&mut self, index: usize, value: Value) -> Result<()>;

    /// Unlink the node at position `index`
    fn remove(&mut self, index: usize) -> Result<Value>;

    /// Positions walked, in order, before a node can be linked at `index`
    fn insert_route(&self, index: usize) -> Vec<usize>;

    /// Positions walked, in order, before the node at `index` can be unlinked
    fn remove_route(&self, index: usize) -> Vec<usize>;
}

#[derive(Debug, Clone)]
pub struct ListEngine<C: Chain> {
    chain: C,
    history_limit: usize,
}

impl<C: Chain> ListEngine<C> {
    pub fn new() -> Self {
        ListEngine {
            chain: C::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn from_values(values: &[Value]) -> Result<Self> {
        let mut engine = Self::new();
        for (index, value) in values.iter().enumerate() {
            engine.chain.insert(index, *value)?;
        }
        Ok(engine)
    }

    pub fn with_history_limit(mut self, bytes: usize) -> Self {
        self.history_limit = bytes;
        self
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn values(&self) -> Vec<Value> {
        self.chain.values()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    pub fn state(&self) -> SeqSnapshot {
        self.cells().snapshot()
    }

    fn cells(&self) -> Cells {
        Cells::new(&self.chain.values(), Capacity::Unbounded, C::SHAPE)
    }

    fn begin(&self, description: String) -> Result<(Cells, SeqRecorder)> {
        let cells = self.cells();
        let mut recorder = SeqRecorder::with_limit(self.history_limit);
        cells.record(&mut recorder, SeqFrame::Start, description)?;
        Ok((cells, recorder))
    }

    fn walk(cells: &Cells, recorder: &mut SeqRecorder, route: &[usize]) -> Result<()> {
        for &index in route {
            cells.record(
                recorder,
                SeqFrame::Traverse { index },
                format!("Pass node {}", cells.get(index).unwrap_or_default()),
            )?;
        }
        Ok(())
    }

    pub fn add_to_head(&mut self, value: Value) -> Result<SeqTimeline> {
        self.add_at_index(0, value)
    }

    pub fn add_to_tail(&mut self, value: Value) -> Result<SeqTimeline> {
        self.add_at_index(self.chain.len(), value)
    }

    pub fn add_at_index(&mut self, index: usize, value: Value) -> Result<SeqTimeline> {
        let len = self.chain.len();
        if index > len {
            warn!(index, len, "list insert out of bounds");
            return Err(EngineError::out_of_bounds(index, len));
        }

        let (mut cells, mut recorder) =
            self.begin(format!("Add {} at position {}", value, index))?;
        Self::walk(&cells, &mut recorder, &self.chain.insert_route(index))?;

        let at_end = index == 0 || index == len;
        let neighbours: Vec<usize> = if at_end {
            match index {
                0 if len > 0 => vec![0],
                0 => Vec::new(),
                _ => vec![len - 1],
            }
        } else {
            vec![index - 1, index]
        };
        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: neighbours,
            },
            format!("Link {} in at position {}", value, index),
        )?;

        if at_end {
            cells.expand_at(&mut recorder, index)?;
        } else {
            cells.open_slot(&mut recorder, index)?;
        }
        cells.fill_slot(&mut recorder, index, value)?;
        cells.record(
            &mut recorder,
            SeqFrame::End { value: None },
            format!("{} added", value),
        )?;

        self.chain.insert(index, value)?;
        debug_assert_eq!(self.chain.values(), cells.values());
        let timeline = recorder.finish();
        debug!(shape = ?C::SHAPE, index, value, frames = timeline.len(), "list insert");
        Ok(timeline)
    }

    pub fn remove_from_head(&mut self) -> Result<SeqTimeline> {
        self.remove_at_index(0)
    }

    pub fn remove_from_tail(&mut self) -> Result<SeqTimeline> {
        match self.chain.len() {
            0 => Err(EngineError::empty("remove from tail")),
            len => self.remove_at_index(len - 1),
        }
    }

    pub fn remove_at_index(&mut self, index: usize) -> Result<SeqTimeline> {
        let len = self.chain.len();
        if len == 0 {
            warn!(index, "list remove on empty list");
            return Err(EngineError::empty("remove"));
        }
        if index >= len {
            warn!(index, len, "list remove out of bounds");
            return Err(EngineError::out_of_bounds(index, len));
        }

        let (mut cells, mut recorder) =
            self.begin(format!("Remove the node at position {}", index))?;
        Self::walk(&cells, &mut recorder, &self.chain.remove_route(index))?;

        cells.record(
            &mut recorder,
            SeqFrame::Highlight {
                indices: vec![index],
            },
            format!("Unlink node {}", cells.get(index).unwrap_or_default()),
        )?;
        let value = cells.detach(&mut recorder, index)?;
        if index == 0 || index == len - 1 {
            cells.shrink_at(&mut recorder, index)?;
        } else {
            cells.close_slot(&mut recorder, index)?;
        }
        cells.record(
            &mut recorder,
            SeqFrame::End { value: Some(value) },
            format!("Removed {}", value),
        )?;

        let removed = self.chain.remove(index)?;
        debug_assert_eq!(removed, value);
        debug_assert_eq!(self.chain.values(), cells.values());
        let timeline = recorder.finish();
        debug!(shape = ?C::SHAPE, index, value, frames = timeline.len(), "list remove");
        Ok(timeline)
    }

    /// Walk from the head until `target` is found
    pub fn search(&self, target: Value) -> Result<SeqTimeline> {
        let (cells, mut recorder) = self.begin(format!("Search for {}", target))?;

        let found = cells.values().iter().position(|&value| value == target);
        let passed = found.unwrap_or(cells.len());
        Self::walk(&cells, &mut recorder, &(0..passed).collect::<Vec<_>>())?;

        match found {
            Some(index) => {
                cells.record(
                    &mut recorder,
                    SeqFrame::Found { index },
                    format!("Found {} at position {}", target, index),
                )?;
                cells.record(
                    &mut recorder,
                    SeqFrame::End {
                        value: Some(target),
                    },
                    "Search complete",
                )?;
            }
            None => {
                cells.record(
                    &mut recorder,
                    SeqFrame::NotFound,
                    format!("{} is not in the list", target),
                )?;
                cells.record(&mut recorder, SeqFrame::End { value: None }, "Search complete")?;
            }
        }
        Ok(recorder.finish())
    }

    /// Replace the list with `len` random values
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, len: usize) -> Result<SeqTimeline> {
        let values: Vec<Value> = (0..len).map(|_| rng.gen_range(1..=RANDOM_VALUE_MAX)).collect();

        let (mut cells, mut recorder) = self.begin("Generate a random list".to_string())?;
        cells.replace_all(&values);
        cells.record(
            &mut recorder,
            SeqFrame::Fill {
                values: values.clone(),
            },
            format!("Link {:?}", values),
        )?;
        cells.record(
            &mut recorder,
            SeqFrame::End { value: None },
            "Random list ready",
        )?;

        let mut chain = C::default();
        for (index, value) in values.into_iter().enumerate() {
            chain.insert(index, value)?;
        }
        self.chain = chain;
        Ok(recorder.finish())
    }
}

impl<C: Chain> Default for ListEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traversed(timeline: &SeqTimeline) -> Vec<usize> {
        timeline
            .iter()
            .filter_map(|frame| match frame.kind {
                SeqFrame::Traverse { index } => Some(index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn randomize_links_values_in_range() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(11);
        let mut list = CircularLinkedList::new();
        let timeline = list.randomize(&mut rng, 40).unwrap();
        assert_eq!(timeline.tags(), vec!["start", "fill", "end"]);
        assert_eq!(list.len(), 40);
        assert!(list
            .values()
            .iter()
            .all(|value| (1..=RANDOM_VALUE_MAX).contains(value)));
        assert_eq!(timeline.final_snapshot(), &list.state());
    }

    #[test]
    fn singly_walks_from_head_to_reach_the_tail() {
        let mut list = SinglyLinkedList::from_values(&[1, 2, 3]).unwrap();
        let timeline = list.add_to_tail(4).unwrap();
        assert_eq!(traversed(&timeline), vec![0, 1, 2]);
        assert_eq!(list.values(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn doubly_walks_from_the_closer_end() {
        let mut list = DoublyLinkedList::from_values(&[0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        let near_head = list.clone().add_at_index(2, 9).unwrap();
        let near_tail = list.add_at_index(6, 9).unwrap();
        assert_eq!(traversed(&near_head), vec![0, 1]);
        assert_eq!(traversed(&near_tail), vec![7, 6]);
        assert_eq!(list.values(), vec![0, 1, 2, 3, 4, 5, 9, 6, 7]);
    }

    #[test]
    fn doubly_tail_access_needs_no_walk() {
        let mut list = DoublyLinkedList::from_values(&[1, 2, 3]).unwrap();
        assert!(traversed(&list.add_to_tail(4).unwrap()).is_empty());
        assert!(traversed(&list.remove_from_tail().unwrap()).is_empty());
    }

    #[test]
    fn circular_head_insert_is_pure_rewiring() {
        let mut list = CircularLinkedList::from_values(&[2, 3]).unwrap();
        let timeline = list.add_to_head(1).unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "highlight", "expand", "insert", "end"]
        );
        assert_eq!(list.values(), vec![1, 2, 3]);

        let timeline = list.remove_from_head().unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "highlight", "lift", "shrink", "end"]
        );
        assert_eq!(list.values(), vec![2, 3]);
    }

    #[test]
    fn middle_insert_records_shift_frames() {
        let mut list = SinglyLinkedList::from_values(&[1, 3]).unwrap();
        let timeline = list.add_at_index(1, 2).unwrap();
        assert_eq!(
            timeline.tags(),
            vec![
                "start",
                "traverse",
                "highlight",
                "expand",
                "lift",
                "place",
                "insert",
                "end"
            ]
        );
        assert_eq!(list.values(), vec![1, 2, 3]);
        assert_eq!(timeline.final_snapshot(), &list.state());
    }

    #[test]
    fn out_of_bounds_is_reported_not_recorded() {
        let mut list = DoublyLinkedList::from_values(&[1]).unwrap();
        assert_eq!(
            list.add_at_index(3, 5).unwrap_err(),
            EngineError::out_of_bounds(3, 1)
        );
        assert_eq!(
            list.remove_at_index(1).unwrap_err(),
            EngineError::out_of_bounds(1, 1)
        );
        let mut empty = CircularLinkedList::new();
        assert!(matches!(
            empty.remove_from_tail(),
            Err(EngineError::EmptyStructure { .. })
        ));
        assert_eq!(list.values(), vec![1]);
    }

    #[test]
    fn search_reports_found_and_missing() {
        let list = SinglyLinkedList::from_values(&[4, 8, 15]).unwrap();
        let hit = list.search(8).unwrap();
        assert_eq!(hit.tags(), vec!["start", "traverse", "found", "end"]);
        let miss = list.search(16).unwrap();
        assert_eq!(
            miss.tags(),
            vec!["start", "traverse", "traverse", "traverse", "not-found", "end"]
        );
    }

    #[test]
    fn shapes_are_reported_in_snapshots() {
        assert_eq!(SinglyLinkedList::new().state().shape, Shape::Singly);
        assert_eq!(DoublyLinkedList::new().state().shape, Shape::Doubly);
        assert_eq!(CircularLinkedList::new().state().shape, Shape::Circular);
    }
}
