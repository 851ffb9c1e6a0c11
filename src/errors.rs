//! Validation failures reported by engine operations
//!
//! [`EngineError`] covers every way an operation can be *refused*: the
//! arguments do not make sense for the current state, so nothing is recorded
//! and the structure is left exactly as it was.
//!
//! Capacity faults (overflow, underflow) are not errors at this level. They
//! are narrated as a terminal `error` frame inside an otherwise normal
//! timeline.
//!
//! [`CliError`] is the binary's error: bad command lines plus anything the
//! library refuses while a scenario is being assembled.

use crate::history::HistoryError;
use crate::playback::PlaybackError;
use crate::NodeId;
use thiserror::Error;

/// Convenience alias used by all engines
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Index outside the valid range for the requested operation
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Removal or inspection on a structure with no elements
    #[error("cannot {operation}: structure is empty")]
    EmptyStructure { operation: &'static str },

    /// A fixed capacity must hold at least one element
    #[error("invalid capacity {0}: must be at least 1")]
    InvalidCapacity(usize),

    /// Graph traversal given an id that is not in the adjacency map
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    /// Any other malformed argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation's history would outgrow its memory budget
    #[error(transparent)]
    HistoryLimitExceeded(#[from] HistoryError),
}

impl EngineError {
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        EngineError::IndexOutOfBounds { index, len }
    }

    pub fn empty(operation: &'static str) -> Self {
        EngineError::EmptyStructure { operation }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no scenario given")]
    MissingScenario,

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' needs a value")]
    MissingValue(&'static str),

    #[error("invalid {what} '{value}'")]
    InvalidValue { what: &'static str, value: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("failed to encode frames: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            EngineError::out_of_bounds(7, 3).to_string(),
            "index 7 out of bounds for length 3"
        );
        assert_eq!(
            EngineError::empty("pop").to_string(),
            "cannot pop: structure is empty"
        );
        assert_eq!(
            EngineError::UnknownNode(9).to_string(),
            "node 9 is not in the graph"
        );
    }
}
