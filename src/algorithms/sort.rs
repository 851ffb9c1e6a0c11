//! Bubble sort and insertion sort

use crate::errors::Result;
use crate::history::{Footprint, FrameKind, Recorder, Timeline};
use crate::Value;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSnapshot {
    pub values: Vec<Value>,
    /// Leading positions already in final order (insertion sort)
    pub sorted_prefix: usize,
    /// Trailing positions already in final order (bubble sort)
    pub sorted_suffix: usize,
    /// Element held out of the array while insertion sort shifts
    pub key: Option<Value>,
    /// Gap the key will drop into
    pub hole: Option<usize>,
}

impl Footprint for SortSnapshot {
    fn footprint(&self) -> usize {
        self.values.footprint() + std::mem::size_of::<Self>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SortFrame {
    Start,
    Compare { left: usize, right: usize },
    Swap { left: usize, right: usize },
    NoSwap { left: usize, right: usize },
    PassComplete { pass: usize, swaps: usize },
    /// A full pass made no swaps
    EarlyExit { pass: usize },
    SelectKey { index: usize, key: Value },
    Shift { from: usize, to: usize },
    Insert { index: usize, key: Value },
    End,
}

impl FrameKind for SortFrame {
    fn tag(&self) -> &'static str {
        match self {
            SortFrame::Start => "start",
            SortFrame::Compare { .. } => "compare",
            SortFrame::Swap { .. } => "swap",
            SortFrame::NoSwap { .. } => "no-swap",
            SortFrame::PassComplete { .. } => "pass-complete",
            SortFrame::EarlyExit { .. } => "early-exit",
            SortFrame::SelectKey { .. } => "select-key",
            SortFrame::Shift { .. } => "shift",
            SortFrame::Insert { .. } => "insert",
            SortFrame::End => "end",
        }
    }

    fn is_start(&self) -> bool {
        matches!(self, SortFrame::Start)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SortFrame::End)
    }

    fn is_error(&self) -> bool {
        false
    }
}

pub type SortTimeline = Timeline<SortFrame, SortSnapshot>;

/// Working state of one sort run
struct Run {
    state: SortSnapshot,
    recorder: Recorder<SortFrame, SortSnapshot>,
}

impl Run {
    fn new(values: Vec<Value>) -> Self {
        Run {
            state: SortSnapshot {
                values,
                sorted_prefix: 0,
                sorted_suffix: 0,
                key: None,
                hole: None,
            },
            recorder: Recorder::new(),
        }
    }

    fn record(&mut self, kind: SortFrame, description: impl Into<String>) -> Result<()> {
        self.recorder.push(kind, description, self.state.clone())?;
        Ok(())
    }

    fn finish(mut self, description: &str) -> Result<SortTimeline> {
        self.record(SortFrame::End, description)?;
        Ok(self.recorder.finish())
    }
}

/// Adjacent compare-and-swap passes, stopping early once a pass is clean
pub fn bubble_sort(values: Vec<Value>) -> Result<SortTimeline> {
    let len = values.len();
    let mut run = Run::new(values);
    run.record(SortFrame::Start, format!("Bubble sort {:?}", run.state.values))?;

    let mut passes = 0;
    for pass in 0..len.saturating_sub(1) {
        passes += 1;
        let mut swaps = 0;
        for left in 0..len - 1 - pass {
            let right = left + 1;
            let (a, b) = (run.state.values[left], run.state.values[right]);
            run.record(
                SortFrame::Compare { left, right },
                format!("Compare {} and {}", a, b),
            )?;
            if a > b {
                run.state.values.swap(left, right);
                swaps += 1;
                run.record(
                    SortFrame::Swap { left, right },
                    format!("{} > {}, swap them", a, b),
                )?;
            } else {
                run.record(
                    SortFrame::NoSwap { left, right },
                    format!("{} <= {}, leave them", a, b),
                )?;
            }
        }

        run.state.sorted_suffix = pass + 1;
        run.record(
            SortFrame::PassComplete { pass, swaps },
            format!("Pass {} done with {} swaps", pass + 1, swaps),
        )?;
        if swaps == 0 {
            run.state.sorted_suffix = len;
            run.record(
                SortFrame::EarlyExit { pass },
                "No swaps in a full pass, the array is sorted",
            )?;
            break;
        }
    }
    run.state.sorted_suffix = len;

    let timeline = run.finish("Sorted")?;
    debug!(len, passes, frames = timeline.len(), "bubble sort");
    Ok(timeline)
}

/// Grow a sorted prefix by shifting each key left into place
pub fn insertion_sort(values: Vec<Value>) -> Result<SortTimeline> {
    let len = values.len();
    let mut run = Run::new(values);
    run.record(
        SortFrame::Start,
        format!("Insertion sort {:?}", run.state.values),
    )?;
    run.state.sorted_prefix = len.min(1);

    for index in 1..len {
        let key = run.state.values[index];
        run.state.key = Some(key);
        run.state.hole = Some(index);
        run.record(
            SortFrame::SelectKey { index, key },
            format!("Take {} as the key", key),
        )?;

        let mut hole = index;
        while hole > 0 {
            let left = hole - 1;
            let value = run.state.values[left];
            run.record(
                SortFrame::Compare { left, right: hole },
                format!("Compare {} with key {}", value, key),
            )?;
            if value <= key {
                break;
            }
            run.state.values[hole] = value;
            run.state.hole = Some(left);
            run.record(
                SortFrame::Shift {
                    from: left,
                    to: hole,
                },
                format!("{} > {}, shift {} right", value, key, value),
            )?;
            hole = left;
        }

        run.state.values[hole] = key;
        run.state.key = None;
        run.state.hole = None;
        run.state.sorted_prefix = index + 1;
        run.record(
            SortFrame::Insert { index: hole, key },
            format!("Drop {} into position {}", key, hole),
        )?;
    }

    let timeline = run.finish("Sorted")?;
    debug!(len, frames = timeline.len(), "insertion sort");
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_sort_shifts_larger_values_right() {
        let timeline = insertion_sort(vec![5, 2, 4]).unwrap();
        let inserts: Vec<Vec<Value>> = timeline
            .iter()
            .filter(|frame| frame.tag() == "insert")
            .map(|frame| frame.snapshot.values.clone())
            .collect();
        assert_eq!(inserts, vec![vec![2, 5, 4], vec![2, 4, 5]]);

        let shifts: Vec<&SortFrame> = timeline
            .iter()
            .filter(|frame| frame.tag() == "shift")
            .map(|frame| &frame.kind)
            .collect();
        assert_eq!(
            shifts,
            vec![
                &SortFrame::Shift { from: 0, to: 1 },
                &SortFrame::Shift { from: 1, to: 2 }
            ]
        );
        assert_eq!(timeline.final_snapshot().sorted_prefix, 3);
    }

    #[test]
    fn insertion_sort_holds_the_key_out_of_the_array() {
        let timeline = insertion_sort(vec![5, 2]).unwrap();
        let shifted = timeline
            .iter()
            .find(|frame| frame.tag() == "shift")
            .unwrap();
        assert_eq!(shifted.snapshot.values, vec![5, 5]);
        assert_eq!(shifted.snapshot.key, Some(2));
        assert_eq!(shifted.snapshot.hole, Some(0));
    }

    #[test]
    fn bubble_sort_exits_early_on_a_clean_pass() {
        let timeline = bubble_sort(vec![1, 3, 2, 4]).unwrap();
        assert_eq!(timeline.final_snapshot().values, vec![1, 2, 3, 4]);
        assert_eq!(
            timeline
                .iter()
                .filter(|frame| frame.tag() == "pass-complete")
                .count(),
            2
        );
        assert!(timeline
            .iter()
            .any(|frame| frame.kind == SortFrame::EarlyExit { pass: 1 }));
        assert_eq!(timeline.final_snapshot().sorted_suffix, 4);
    }

    #[test]
    fn bubble_sort_grows_the_sorted_suffix() {
        let timeline = bubble_sort(vec![3, 2, 1]).unwrap();
        let suffixes: Vec<usize> = timeline
            .iter()
            .filter(|frame| frame.tag() == "pass-complete")
            .map(|frame| frame.snapshot.sorted_suffix)
            .collect();
        assert_eq!(suffixes, vec![1, 2]);
        assert_eq!(timeline.final_snapshot().values, vec![1, 2, 3]);
    }

    #[test]
    fn trivial_inputs() {
        assert_eq!(bubble_sort(vec![]).unwrap().tags(), vec!["start", "end"]);
        assert_eq!(insertion_sort(vec![]).unwrap().tags(), vec!["start", "end"]);
        assert_eq!(insertion_sort(vec![7]).unwrap().tags(), vec!["start", "end"]);
    }
}
