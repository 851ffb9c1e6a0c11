//! Frame histories for replayable operations
//!
//! Every engine operation records an ordered list of [`Frame`]s, each one an
//! owned copy of the structure's visualizable state plus a per-engine kind
//! tag. The finished list is a [`Timeline`]: non-empty, opening with a
//! `start` frame and closed by exactly one terminal frame (`end` or `error`).
//!
//! # Memory accounting
//!
//! Snapshots are full copies, so a long operation on a large structure can
//! grow quickly. A [`Recorder`] tracks the estimated footprint of everything
//! it holds and refuses frames past its byte budget.

use serde::Serialize;
use thiserror::Error;

/// Default byte budget for a single operation's history (64 MiB)
pub const DEFAULT_HISTORY_LIMIT: usize = 64 * 1024 * 1024;

/// Closed vocabulary of frame tags for one engine
pub trait FrameKind {
    /// Short tag used by the presentation layer (`start`, `lift`, `swap`, ...)
    fn tag(&self) -> &'static str;

    fn is_start(&self) -> bool;

    /// `end` or `error`
    fn is_terminal(&self) -> bool;

    fn is_error(&self) -> bool;
}

/// Rough size estimate of a snapshot in bytes
pub trait Footprint {
    fn footprint(&self) -> usize;
}

impl<T> Footprint for Vec<T> {
    fn footprint(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }
}

/// One recorded step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<K, S> {
    #[serde(flatten)]
    pub kind: K,
    pub description: String,
    pub snapshot: S,
}

impl<K: FrameKind, S> Frame<K, S> {
    pub fn new(kind: K, description: impl Into<String>, snapshot: S) -> Self {
        Frame {
            kind,
            description: description.into(),
            snapshot,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Errors raised while building or validating a frame history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("frame history is empty")]
    Empty,

    #[error("first frame is '{0}', expected 'start'")]
    MissingStart(&'static str),

    #[error("last frame is '{0}', expected 'end' or 'error'")]
    MissingTerminal(&'static str),

    #[error("terminal frame '{tag}' at index {index} is not the last frame")]
    MisplacedTerminal { tag: &'static str, index: usize },

    #[error("history memory limit exceeded: {current} + {requested} > {limit} bytes")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },
}

/// Append-only frame builder used by engines while an operation runs
#[derive(Debug)]
pub struct Recorder<K, S> {
    frames: Vec<Frame<K, S>>,
    max_memory: usize,
    current_memory: usize,
}

impl<K: FrameKind, S: Footprint> Recorder<K, S> {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(max_memory: usize) -> Self {
        Recorder {
            frames: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Record a frame
    pub fn push(
        &mut self,
        kind: K,
        description: impl Into<String>,
        snapshot: S,
    ) -> Result<(), HistoryError> {
        let description = description.into();
        let size = frame_size::<K, S>(&description, &snapshot);

        if self.current_memory + size > self.max_memory {
            return Err(HistoryError::LimitExceeded {
                current: self.current_memory,
                requested: size,
                limit: self.max_memory,
            });
        }

        self.current_memory += size;
        self.frames.push(Frame {
            kind,
            description,
            snapshot,
        });
        Ok(())
    }

    /// Frames recorded so far
    pub fn frames(&self) -> &[Frame<K, S>] {
        &self.frames
    }

    /// Number of frames recorded so far
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Seal the history
    ///
    /// Engines only call this right after recording their terminal frame, so
    /// the shape check is a debug assertion rather than a runtime error.
    pub fn finish(self) -> Timeline<K, S> {
        debug_assert_eq!(validate(&self.frames), Ok(()));
        Timeline {
            frames: self.frames,
        }
    }
}

impl<K: FrameKind, S: Footprint> Default for Recorder<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

fn frame_size<K, S: Footprint>(description: &str, snapshot: &S) -> usize {
    snapshot.footprint() + description.len() + std::mem::size_of::<K>()
}

fn validate<K: FrameKind, S>(frames: &[Frame<K, S>]) -> Result<(), HistoryError> {
    let first = frames.first().ok_or(HistoryError::Empty)?;
    if !first.kind.is_start() {
        return Err(HistoryError::MissingStart(first.kind.tag()));
    }

    let last_index = frames.len() - 1;
    if !frames[last_index].kind.is_terminal() {
        return Err(HistoryError::MissingTerminal(frames[last_index].kind.tag()));
    }

    if let Some(index) = frames[..last_index]
        .iter()
        .position(|frame| frame.kind.is_terminal())
    {
        return Err(HistoryError::MisplacedTerminal {
            tag: frames[index].kind.tag(),
            index,
        });
    }

    Ok(())
}

/// A complete, immutable account of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline<K, S> {
    frames: Vec<Frame<K, S>>,
}

impl<K: FrameKind, S> Timeline<K, S> {
    /// Validate an externally assembled frame list
    pub fn new(frames: Vec<Frame<K, S>>) -> Result<Self, HistoryError> {
        validate(&frames)?;
        Ok(Timeline { frames })
    }

    pub fn frames(&self) -> &[Frame<K, S>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for a validated timeline
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame<K, S>> {
        self.frames.get(index)
    }

    pub fn first(&self) -> &Frame<K, S> {
        &self.frames[0]
    }

    pub fn last(&self) -> &Frame<K, S> {
        &self.frames[self.frames.len() - 1]
    }

    /// Snapshot carried by the terminal frame
    pub fn final_snapshot(&self) -> &S {
        &self.last().snapshot
    }

    /// Whether the operation ended in an `error` frame
    pub fn failed(&self) -> bool {
        self.last().kind.is_error()
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.frames.iter().map(|frame| frame.kind.tag()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame<K, S>> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Frame<K, S>> {
        self.frames
    }
}

impl<K, S: Footprint> Timeline<K, S> {
    /// Same estimate the recorder charged against its budget
    pub fn estimated_size(&self) -> usize {
        self.frames
            .iter()
            .map(|frame| frame_size::<K, S>(&frame.description, &frame.snapshot))
            .sum()
    }
}

impl<'a, K, S> IntoIterator for &'a Timeline<K, S> {
    type Item = &'a Frame<K, S>;
    type IntoIter = std::slice::Iter<'a, Frame<K, S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Tag {
        Start,
        Step,
        End,
        Error,
    }

    impl FrameKind for Tag {
        fn tag(&self) -> &'static str {
            match self {
                Tag::Start => "start",
                Tag::Step => "step",
                Tag::End => "end",
                Tag::Error => "error",
            }
        }

        fn is_start(&self) -> bool {
            matches!(self, Tag::Start)
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Tag::End | Tag::Error)
        }

        fn is_error(&self) -> bool {
            matches!(self, Tag::Error)
        }
    }

    fn frame(tag: Tag) -> Frame<Tag, Vec<i64>> {
        Frame::new(tag, "", vec![1, 2, 3])
    }

    #[test]
    fn validates_shape() {
        assert_eq!(
            Timeline::<Tag, Vec<i64>>::new(vec![]).unwrap_err(),
            HistoryError::Empty
        );
        assert_eq!(
            Timeline::new(vec![frame(Tag::Step), frame(Tag::End)]).unwrap_err(),
            HistoryError::MissingStart("step")
        );
        assert_eq!(
            Timeline::new(vec![frame(Tag::Start), frame(Tag::Step)]).unwrap_err(),
            HistoryError::MissingTerminal("step")
        );
        assert_eq!(
            Timeline::new(vec![frame(Tag::Start), frame(Tag::End), frame(Tag::End)]).unwrap_err(),
            HistoryError::MisplacedTerminal {
                tag: "end",
                index: 1
            }
        );

        let timeline = Timeline::new(vec![frame(Tag::Start), frame(Tag::Error)]).unwrap();
        assert!(timeline.failed());
        assert_eq!(timeline.tags(), vec!["start", "error"]);
    }

    #[test]
    fn recorder_enforces_limit() {
        let mut recorder: Recorder<Tag, Vec<i64>> = Recorder::with_limit(64);
        recorder.push(Tag::Start, "a", vec![0; 4]).unwrap();
        let err = recorder.push(Tag::Step, "b", vec![0; 16]).unwrap_err();
        assert!(matches!(err, HistoryError::LimitExceeded { .. }));
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn snapshots_are_independent_copies() {
        let mut live = vec![1, 2, 3];
        let mut recorder: Recorder<Tag, Vec<i64>> = Recorder::new();
        recorder.push(Tag::Start, "start", live.clone()).unwrap();
        live.push(4);
        recorder.push(Tag::End, "end", live.clone()).unwrap();
        live.clear();

        let used = recorder.memory_usage();
        let timeline = recorder.finish();
        assert_eq!(timeline.estimated_size(), used);
        assert_eq!(timeline.first().snapshot, vec![1, 2, 3]);
        assert_eq!(timeline.final_snapshot(), &vec![1, 2, 3, 4]);
    }
}
