//! Linear and binary search

use crate::errors::Result;
use crate::history::{Footprint, FrameKind, Recorder, Timeline};
use crate::Value;
use serde::Serialize;
use tracing::debug;

/// Array under search plus the pointers the presentation layer draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSnapshot {
    pub values: Vec<Value>,
    /// Inclusive window still in play (binary search only)
    pub low: Option<usize>,
    pub high: Option<usize>,
    /// Index being compared
    pub cursor: Option<usize>,
}

impl Footprint for SearchSnapshot {
    fn footprint(&self) -> usize {
        self.values.footprint() + std::mem::size_of::<Self>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SearchFrame {
    Start,
    Compare { index: usize, value: Value },
    Midpoint { low: usize, high: usize, mid: usize },
    Found { index: usize },
    NotFound,
    End { found: Option<usize> },
}

impl FrameKind for SearchFrame {
    fn tag(&self) -> &'static str {
        match self {
            SearchFrame::Start => "start",
            SearchFrame::Compare { .. } => "compare",
            SearchFrame::Midpoint { .. } => "midpoint",
            SearchFrame::Found { .. } => "found",
            SearchFrame::NotFound => "not-found",
            SearchFrame::End { .. } => "end",
        }
    }

    fn is_start(&self) -> bool {
        matches!(self, SearchFrame::Start)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SearchFrame::End { .. })
    }

    fn is_error(&self) -> bool {
        false
    }
}

pub type SearchTimeline = Timeline<SearchFrame, SearchSnapshot>;
type SearchRecorder = Recorder<SearchFrame, SearchSnapshot>;

struct Pointers {
    low: Option<usize>,
    high: Option<usize>,
    cursor: Option<usize>,
}

fn record(
    recorder: &mut SearchRecorder,
    values: &[Value],
    pointers: &Pointers,
    kind: SearchFrame,
    description: impl Into<String>,
) -> Result<()> {
    let snapshot = SearchSnapshot {
        values: values.to_vec(),
        low: pointers.low,
        high: pointers.high,
        cursor: pointers.cursor,
    };
    recorder.push(kind, description, snapshot)?;
    Ok(())
}

fn conclude(
    recorder: &mut SearchRecorder,
    values: &[Value],
    pointers: &Pointers,
    target: Value,
    found: Option<usize>,
) -> Result<()> {
    match found {
        Some(index) => record(
            recorder,
            values,
            pointers,
            SearchFrame::Found { index },
            format!("Found {} at index {}", target, index),
        )?,
        None => record(
            recorder,
            values,
            pointers,
            SearchFrame::NotFound,
            format!("{} is not in the array", target),
        )?,
    }
    record(
        recorder,
        values,
        pointers,
        SearchFrame::End { found },
        "Search complete",
    )
}

/// Scan from the left until the first match
#[derive(Debug, Clone)]
pub struct LinearSearch {
    values: Vec<Value>,
}

impl LinearSearch {
    pub fn new(values: Vec<Value>) -> Self {
        LinearSearch { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn run(&self, target: Value) -> Result<SearchTimeline> {
        let values = &self.values;
        let mut recorder = SearchRecorder::new();
        let mut pointers = Pointers {
            low: None,
            high: None,
            cursor: None,
        };
        record(
            &mut recorder,
            values,
            &pointers,
            SearchFrame::Start,
            format!("Search for {}", target),
        )?;

        let mut found = None;
        for (index, &value) in values.iter().enumerate() {
            pointers.cursor = Some(index);
            let verdict = if value == target { "match" } else { "no match" };
            record(
                &mut recorder,
                values,
                &pointers,
                SearchFrame::Compare { index, value },
                format!("Compare {} with {}: {}", value, target, verdict),
            )?;
            if value == target {
                found = Some(index);
                break;
            }
        }
        if found.is_none() {
            pointers.cursor = None;
        }
        conclude(&mut recorder, values, &pointers, target, found)?;

        let timeline = recorder.finish();
        debug!(target, ?found, frames = timeline.len(), "linear search");
        Ok(timeline)
    }
}

/// Halve a sorted window until the target is hit or the window is empty
#[derive(Debug, Clone)]
pub struct BinarySearch {
    values: Vec<Value>,
}

impl BinarySearch {
    /// The input is sorted on construction
    pub fn new(mut values: Vec<Value>) -> Self {
        values.sort_unstable();
        BinarySearch { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn run(&self, target: Value) -> Result<SearchTimeline> {
        let values = &self.values;
        let mut recorder = SearchRecorder::new();
        let mut pointers = Pointers {
            low: None,
            high: None,
            cursor: None,
        };
        record(
            &mut recorder,
            values,
            &pointers,
            SearchFrame::Start,
            format!("Search for {}", target),
        )?;
        if values.is_empty() {
            conclude(&mut recorder, values, &pointers, target, None)?;
            return Ok(recorder.finish());
        }

        let mut low = 0usize;
        let mut high = values.len() - 1;
        let mut found = None;
        loop {
            let mid = low + (high - low) / 2;
            pointers = Pointers {
                low: Some(low),
                high: Some(high),
                cursor: Some(mid),
            };
            let value = values[mid];
            let description = match value.cmp(&target) {
                std::cmp::Ordering::Equal => format!("{} == {}", value, target),
                std::cmp::Ordering::Less => {
                    format!("{} < {}, discard the left half", value, target)
                }
                std::cmp::Ordering::Greater => {
                    format!("{} > {}, discard the right half", value, target)
                }
            };
            record(
                &mut recorder,
                values,
                &pointers,
                SearchFrame::Midpoint { low, high, mid },
                description,
            )?;

            match value.cmp(&target) {
                std::cmp::Ordering::Equal => {
                    found = Some(mid);
                    break;
                }
                std::cmp::Ordering::Less => low = mid + 1,
                std::cmp::Ordering::Greater => match mid.checked_sub(1) {
                    Some(next) => high = next,
                    None => break,
                },
            }
            if low > high {
                break;
            }
        }
        if found.is_none() {
            pointers.cursor = None;
        }
        conclude(&mut recorder, values, &pointers, target, found)?;

        let timeline = recorder.finish();
        debug!(target, ?found, frames = timeline.len(), "binary search");
        Ok(timeline)
    }
}
