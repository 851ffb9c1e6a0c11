//! # Introduction
//!
//! Stepwise runs data structure and algorithm operations and records every
//! meaningful micro-step as a self-contained frame. The recorded history is
//! then played back forward, backward, or automatically without ever re-running
//! the operation.
//!
//! ## Pipeline
//!
//! ```text
//! Operation request → Engine → Timeline (frames) → Playback → TUI
//! ```
//!
//! 1. [`structures`]: stateful engines (array, stack, queue, deque, linked
//!    lists, binary search tree). Each operation mutates the authoritative
//!    state at most once and returns a [`history::Timeline`].
//! 2. [`algorithms`]: stateless runs over an input: linear and binary
//!    search, bubble and insertion sort, breadth- and depth-first traversal.
//! 3. [`history`]: the frame contract: [`history::Frame`],
//!    [`history::Recorder`] and [`history::Timeline`].
//! 4. [`playback`]: [`playback::Playback`] steps through a held frame list
//!    and auto-advances through a pluggable [`playback::Scheduler`].
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Failure model
//!
//! Invalid arguments are refused with an [`errors::EngineError`] and record
//! nothing. Capacity faults (overflow, underflow) end the timeline with an
//! `error` frame. Misses (search, find, unreachable target) are ordinary
//! outcomes. In every failing case the structure is left untouched.

pub mod algorithms;
pub mod config;
pub mod errors;
pub mod history;
pub mod playback;
pub mod scenario;
pub mod structures;
pub mod ui;

/// Element type stored by every engine
pub type Value = i64;

/// Graph node identifier
pub type NodeId = u32;
