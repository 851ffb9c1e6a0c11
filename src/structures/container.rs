//! Authoritative state shared by the array, stack, queue and deque engines

use super::sequence::{Cells, Fault, SeqFrame, SeqRecorder, SeqSnapshot, SeqTimeline, Shape};
use super::Capacity;
use crate::errors::{EngineError, Result};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::Value;
use rand::Rng;
use tracing::debug;

/// Largest value produced by `randomize`
pub(crate) const RANDOM_VALUE_MAX: Value = 99;

#[derive(Debug, Clone)]
pub(crate) struct Container {
    values: Vec<Value>,
    capacity: Capacity,
    shape: Shape,
    history_limit: usize,
}

impl Container {
    pub(crate) fn new(capacity: Capacity) -> Self {
        Container {
            values: Vec::new(),
            capacity,
            shape: Shape::Contiguous,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub(crate) fn from_values(values: &[Value], capacity: Capacity) -> Result<Self> {
        if let Capacity::Fixed(limit) = capacity {
            if limit == 0 {
                return Err(EngineError::InvalidCapacity(limit));
            }
            if values.len() > limit {
                return Err(EngineError::InvalidArgument(format!(
                    "{} initial values exceed capacity {}",
                    values.len(),
                    limit
                )));
            }
        }
        let mut container = Container::new(capacity);
        container.values = values.to_vec();
        Ok(container)
    }

    pub(crate) fn set_history_limit(&mut self, bytes: usize) {
        self.history_limit = bytes;
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub(crate) fn state(&self) -> SeqSnapshot {
        self.cells().snapshot()
    }

    fn cells(&self) -> Cells {
        Cells::new(&self.values, self.capacity, self.shape)
    }

    /// Working copy plus a recorder holding the `start` frame
    pub(crate) fn begin(&self, description: impl Into<String>) -> Result<(Cells, SeqRecorder)> {
        let cells = self.cells();
        let mut recorder = SeqRecorder::with_limit(self.history_limit);
        cells.record(&mut recorder, SeqFrame::Start, description)?;
        Ok((cells, recorder))
    }

    /// Record the `end` frame and commit the working copy
    pub(crate) fn commit(
        &mut self,
        cells: Cells,
        mut recorder: SeqRecorder,
        value: Option<Value>,
        description: impl Into<String>,
    ) -> Result<SeqTimeline> {
        cells.record(&mut recorder, SeqFrame::End { value }, description)?;
        self.values = cells.values();
        Ok(recorder.finish())
    }

    /// Record the `end` frame of a read-only operation
    pub(crate) fn conclude(
        &self,
        cells: Cells,
        mut recorder: SeqRecorder,
        value: Option<Value>,
        description: impl Into<String>,
    ) -> Result<SeqTimeline> {
        cells.record(&mut recorder, SeqFrame::End { value }, description)?;
        Ok(recorder.finish())
    }

    /// Record the `error` frame; the working copy is discarded
    pub(crate) fn reject(
        &self,
        cells: Cells,
        mut recorder: SeqRecorder,
        fault: Fault,
        description: impl Into<String>,
    ) -> Result<SeqTimeline> {
        cells.record(&mut recorder, SeqFrame::Error { fault }, description)?;
        let timeline = recorder.finish();
        debug!(?fault, frames = timeline.len(), "operation rejected");
        Ok(timeline)
    }

    /// Change the capacity, dropping elements from the back if it shrinks
    /// below the current size
    pub(crate) fn set_capacity(&mut self, capacity: Capacity) -> Result<SeqTimeline> {
        if capacity == Capacity::Fixed(0) {
            return Err(EngineError::InvalidCapacity(0));
        }

        let (mut cells, mut recorder) = self.begin(match capacity {
            Capacity::Unbounded => "Remove the capacity limit".to_string(),
            Capacity::Fixed(limit) => format!("Set capacity to {}", limit),
        })?;

        if let Capacity::Fixed(limit) = capacity {
            if limit < cells.len() {
                let indices: Vec<usize> = (limit..cells.len()).collect();
                cells.record(
                    &mut recorder,
                    SeqFrame::Highlight { indices },
                    format!("Elements past position {} no longer fit", limit - 1),
                )?;
                let dropped = cells.truncate(limit);
                cells.record(
                    &mut recorder,
                    SeqFrame::Truncate {
                        dropped: dropped.clone(),
                    },
                    format!("Drop {:?} from the back", dropped),
                )?;
            }
        }

        cells.set_capacity(capacity);
        let timeline = self.commit(cells, recorder, None, "Capacity updated")?;
        self.capacity = capacity;
        Ok(timeline)
    }

    /// Replace the contents with `len` random values (clamped to capacity)
    pub(crate) fn randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        len: usize,
    ) -> Result<SeqTimeline> {
        let len = self.capacity.limit().map_or(len, |limit| len.min(limit));
        let values: Vec<Value> = (0..len)
            .map(|_| rng.gen_range(1..=RANDOM_VALUE_MAX))
            .collect();

        let (mut cells, mut recorder) = self.begin("Generate random contents")?;
        cells.replace_all(&values);
        cells.record(
            &mut recorder,
            SeqFrame::Fill {
                values: values.clone(),
            },
            format!("Fill with {:?}", values),
        )?;
        self.commit(cells, recorder, None, "Random contents ready")
    }

    pub(crate) fn clear(&mut self) -> Result<SeqTimeline> {
        let (mut cells, mut recorder) = self.begin("Clear all elements")?;
        if cells.len() > 0 {
            cells.record(
                &mut recorder,
                SeqFrame::Highlight {
                    indices: (0..cells.len()).collect(),
                },
                "Every element will be removed",
            )?;
            let dropped = cells.truncate(0);
            cells.record(
                &mut recorder,
                SeqFrame::Truncate { dropped },
                "Remove everything",
            )?;
        }
        self.commit(cells, recorder, None, "Structure is empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shrinking_capacity_truncates_from_the_back() {
        let mut container =
            Container::from_values(&[1, 2, 3, 4], Capacity::Fixed(5)).unwrap();
        let timeline = container.set_capacity(Capacity::Fixed(2)).unwrap();

        assert_eq!(container.values(), &[1, 2]);
        assert_eq!(container.capacity(), Capacity::Fixed(2));
        assert_eq!(timeline.tags(), vec!["start", "highlight", "truncate", "end"]);
        assert_eq!(
            timeline.frames()[2].kind,
            SeqFrame::Truncate {
                dropped: vec![3, 4]
            }
        );
        assert_eq!(timeline.final_snapshot(), &container.state());
    }

    #[test]
    fn growing_capacity_keeps_elements() {
        let mut container = Container::from_values(&[7, 8], Capacity::Fixed(2)).unwrap();
        let timeline = container.set_capacity(Capacity::Fixed(10)).unwrap();
        assert_eq!(container.values(), &[7, 8]);
        assert_eq!(timeline.tags(), vec!["start", "end"]);
    }

    #[test]
    fn zero_capacity_is_refused_without_change() {
        let mut container = Container::from_values(&[7], Capacity::Fixed(2)).unwrap();
        assert_eq!(
            container.set_capacity(Capacity::Fixed(0)).unwrap_err(),
            EngineError::InvalidCapacity(0)
        );
        assert_eq!(container.capacity(), Capacity::Fixed(2));
    }

    #[test]
    fn randomize_respects_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut container = Container::new(Capacity::Fixed(3));
        let timeline = container.randomize(&mut rng, 10).unwrap();
        assert_eq!(container.len(), 3);
        assert_eq!(timeline.final_snapshot().values(), container.values());
    }

    #[test]
    fn history_limit_leaves_state_untouched() {
        let mut container = Container::from_values(&[1, 2, 3], Capacity::Unbounded).unwrap();
        container.set_history_limit(1);
        assert!(matches!(
            container.clear(),
            Err(EngineError::HistoryLimitExceeded(_))
        ));
        assert_eq!(container.values(), &[1, 2, 3]);
    }
}
