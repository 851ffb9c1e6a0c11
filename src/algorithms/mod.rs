//! Stateless algorithm runs
//!
//! Unlike [`structures`](crate::structures), nothing here owns state between
//! calls. Each run takes its input by value, works on a private copy and
//! returns the full frame history:
//!
//! - [`search`]: linear and binary search with explicit `low`/`high`/`mid`
//! - [`sort`]: bubble sort (sorted suffix) and insertion sort (sorted prefix)
//! - [`graph`]: breadth- and depth-first traversal with path reconstruction

pub mod graph;
pub mod search;
pub mod sort;

pub use graph::{bfs, dfs, Graph, GraphFrame, GraphTimeline, TraversalSnapshot};
pub use search::{BinarySearch, LinearSearch, SearchFrame, SearchSnapshot, SearchTimeline};
pub use sort::{bubble_sort, insertion_sort, SortFrame, SortSnapshot, SortTimeline};
