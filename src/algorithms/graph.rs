//! Breadth- and depth-first traversal
//!
//! Both traversals share one frontier loop; they differ only in which end of
//! the frontier is taken and in when a node counts as visited:
//!
//! | | frontier | marked visited |
//! |-----|----------|----------------|
//! | BFS | FIFO | when enqueued |
//! | DFS | LIFO | when popped |
//!
//! Because DFS marks late, a node can sit on the stack more than once; the
//! extra copies are skipped with a `revisit` frame when popped. Parent
//! pointers are set on first discovery only, so the reconstructed path is
//! always the discovery path.

use crate::errors::{EngineError, Result};
use crate::history::{Footprint, FrameKind, Recorder, Timeline};
use crate::NodeId;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, warn};

/// Fixed adjacency map; every neighbor is itself a node of the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Graph {
    pub fn new(adjacency: impl IntoIterator<Item = (NodeId, Vec<NodeId>)>) -> Result<Self> {
        let adjacency: BTreeMap<NodeId, Vec<NodeId>> = adjacency.into_iter().collect();
        for neighbors in adjacency.values() {
            if let Some(&missing) = neighbors
                .iter()
                .find(|neighbor| !adjacency.contains_key(neighbor))
            {
                return Err(EngineError::UnknownNode(missing));
            }
        }
        Ok(Graph { adjacency })
    }

    /// Build from an edge list, linking both directions in edge order
    pub fn undirected(edges: &[(NodeId, NodeId)]) -> Self {
        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for &(a, b) in edges {
            let forward = adjacency.entry(a).or_default();
            if !forward.contains(&b) {
                forward.push(b);
            }
            let backward = adjacency.entry(b).or_default();
            if !backward.contains(&a) {
                backward.push(a);
            }
        }
        Graph { adjacency }
    }

    /// Nodes `0..nodes`, each pair joined with probability `edge_chance`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, nodes: NodeId, edge_chance: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&edge_chance) {
            warn!(edge_chance, "rejected edge probability");
            return Err(EngineError::InvalidArgument(format!(
                "edge probability must be within 0..=1, got {}",
                edge_chance
            )));
        }
        let mut edges = Vec::new();
        for a in 0..nodes {
            for b in a + 1..nodes {
                if rng.gen_bool(edge_chance) {
                    edges.push((a, b));
                }
            }
        }
        let mut graph = Graph::undirected(&edges);
        for node in 0..nodes {
            graph.adjacency.entry(node).or_default();
        }
        Ok(graph)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

/// Traversal state at one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalSnapshot {
    /// Queue front or stack bottom first
    pub frontier: Vec<NodeId>,
    /// Nodes in the order they were marked visited
    pub visited: Vec<NodeId>,
    /// Discovery edges so far, `(parent, child)`
    pub explored: Vec<(NodeId, NodeId)>,
    /// Node just taken off the frontier
    pub current: Option<NodeId>,
}

impl Footprint for TraversalSnapshot {
    fn footprint(&self) -> usize {
        self.frontier.footprint()
            + self.visited.footprint()
            + self.explored.footprint()
            + std::mem::size_of::<Self>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GraphFrame {
    Start {
        start: NodeId,
        target: Option<NodeId>,
    },
    Dequeue { node: NodeId },
    Pop { node: NodeId },
    /// Popped a node that was already processed
    Revisit { node: NodeId },
    Compare { node: NodeId, target: NodeId },
    /// Neighbor already visited
    Skip { from: NodeId, to: NodeId },
    Enqueue { from: NodeId, to: NodeId },
    Push { from: NodeId, to: NodeId },
    Found { node: NodeId, path: Vec<NodeId> },
    NotFound { target: NodeId },
    End {
        path: Option<Vec<NodeId>>,
        visited: Vec<NodeId>,
    },
}

impl GraphFrame {
    /// Edge to draw highlighted, if the frame concerns one
    pub fn highlighted_edge(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            GraphFrame::Enqueue { from, to } | GraphFrame::Push { from, to } => Some((from, to)),
            _ => None,
        }
    }
}

impl FrameKind for GraphFrame {
    fn tag(&self) -> &'static str {
        match self {
            GraphFrame::Start { .. } => "start",
            GraphFrame::Dequeue { .. } => "dequeue",
            GraphFrame::Pop { .. } => "pop",
            GraphFrame::Revisit { .. } => "revisit",
            GraphFrame::Compare { .. } => "compare",
            GraphFrame::Skip { .. } => "skip",
            GraphFrame::Enqueue { .. } => "enqueue",
            GraphFrame::Push { .. } => "push",
            GraphFrame::Found { .. } => "found",
            GraphFrame::NotFound { .. } => "not-found",
            GraphFrame::End { .. } => "end",
        }
    }

    fn is_start(&self) -> bool {
        matches!(self, GraphFrame::Start { .. })
    }

    fn is_terminal(&self) -> bool {
        matches!(self, GraphFrame::End { .. })
    }

    fn is_error(&self) -> bool {
        false
    }
}

pub type GraphTimeline = Timeline<GraphFrame, TraversalSnapshot>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discipline {
    Breadth,
    Depth,
}

impl Discipline {
    fn name(self) -> &'static str {
        match self {
            Discipline::Breadth => "BFS",
            Discipline::Depth => "DFS",
        }
    }
}

pub fn bfs(graph: &Graph, start: NodeId, target: Option<NodeId>) -> Result<GraphTimeline> {
    explore(graph, start, target, Discipline::Breadth)
}

pub fn dfs(graph: &Graph, start: NodeId, target: Option<NodeId>) -> Result<GraphTimeline> {
    explore(graph, start, target, Discipline::Depth)
}

struct Traversal {
    frontier: VecDeque<NodeId>,
    visited: FxHashSet<NodeId>,
    order: Vec<NodeId>,
    parents: FxHashMap<NodeId, NodeId>,
    explored: Vec<(NodeId, NodeId)>,
    current: Option<NodeId>,
    recorder: Recorder<GraphFrame, TraversalSnapshot>,
}

impl Traversal {
    fn snapshot(&self) -> TraversalSnapshot {
        TraversalSnapshot {
            frontier: self.frontier.iter().copied().collect(),
            visited: self.order.clone(),
            explored: self.explored.clone(),
            current: self.current,
        }
    }

    fn record(&mut self, kind: GraphFrame, description: impl Into<String>) -> Result<()> {
        let snapshot = self.snapshot();
        self.recorder.push(kind, description, snapshot)?;
        Ok(())
    }

    fn mark(&mut self, node: NodeId) {
        if self.visited.insert(node) {
            self.order.push(node);
        }
    }

    fn discover(&mut self, from: NodeId, to: NodeId) {
        if !self.parents.contains_key(&to) {
            self.parents.insert(to, from);
            self.explored.push((from, to));
        }
    }

    /// Walk parent pointers back from `node`, then reverse
    fn path_to(&self, start: NodeId, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut cursor = node;
        while cursor != start {
            match self.parents.get(&cursor) {
                Some(&parent) => {
                    path.push(parent);
                    cursor = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

fn explore(
    graph: &Graph,
    start: NodeId,
    target: Option<NodeId>,
    discipline: Discipline,
) -> Result<GraphTimeline> {
    for node in std::iter::once(start).chain(target) {
        if !graph.contains(node) {
            warn!(node, traversal = discipline.name(), "unknown node");
            return Err(EngineError::UnknownNode(node));
        }
    }

    let mut run = Traversal {
        frontier: VecDeque::new(),
        visited: FxHashSet::default(),
        order: Vec::new(),
        parents: FxHashMap::default(),
        explored: Vec::new(),
        current: None,
        recorder: Recorder::new(),
    };
    run.frontier.push_back(start);
    if discipline == Discipline::Breadth {
        run.mark(start);
    }
    let opening = match target {
        Some(target) => format!("{} from {} looking for {}", discipline.name(), start, target),
        None => format!("{} from {}", discipline.name(), start),
    };
    run.record(GraphFrame::Start { start, target }, opening)?;

    let mut found_path = None;
    loop {
        let taken = match discipline {
            Discipline::Breadth => run.frontier.pop_front(),
            Discipline::Depth => run.frontier.pop_back(),
        };
        let Some(node) = taken else {
            break;
        };
        run.current = Some(node);

        match discipline {
            Discipline::Breadth => {
                run.record(GraphFrame::Dequeue { node }, format!("Dequeue {}", node))?;
            }
            Discipline::Depth => {
                if run.visited.contains(&node) {
                    run.record(
                        GraphFrame::Revisit { node },
                        format!("{} was already visited, discard it", node),
                    )?;
                    continue;
                }
                run.mark(node);
                run.record(GraphFrame::Pop { node }, format!("Pop and visit {}", node))?;
            }
        }

        if let Some(target) = target {
            let verdict = if node == target { "match" } else { "no match" };
            run.record(
                GraphFrame::Compare { node, target },
                format!("Compare {} with target {}: {}", node, target, verdict),
            )?;
            if node == target {
                let path = run.path_to(start, node);
                run.record(
                    GraphFrame::Found {
                        node,
                        path: path.clone(),
                    },
                    format!("Reached {} via {:?}", node, path),
                )?;
                found_path = Some(path);
                break;
            }
        }

        for &neighbor in graph.neighbors(node) {
            if run.visited.contains(&neighbor) {
                run.record(
                    GraphFrame::Skip {
                        from: node,
                        to: neighbor,
                    },
                    format!("{} is already visited", neighbor),
                )?;
                continue;
            }
            run.discover(node, neighbor);
            run.frontier.push_back(neighbor);
            match discipline {
                Discipline::Breadth => {
                    run.mark(neighbor);
                    run.record(
                        GraphFrame::Enqueue {
                            from: node,
                            to: neighbor,
                        },
                        format!("Enqueue {} (edge {}-{})", neighbor, node, neighbor),
                    )?;
                }
                Discipline::Depth => {
                    run.record(
                        GraphFrame::Push {
                            from: node,
                            to: neighbor,
                        },
                        format!("Push {} (edge {}-{})", neighbor, node, neighbor),
                    )?;
                }
            }
        }
    }

    run.current = None;
    if let (Some(target), None) = (target, &found_path) {
        run.record(
            GraphFrame::NotFound { target },
            format!("{} is unreachable from {}", target, start),
        )?;
    }
    let visited = run.order.clone();
    let summary = format!("{} complete, visited {:?}", discipline.name(), visited);
    run.record(
        GraphFrame::End {
            path: found_path.clone(),
            visited,
        },
        summary,
    )?;

    let timeline = run.recorder.finish();
    debug!(
        traversal = discipline.name(),
        start,
        ?target,
        found = found_path.is_some(),
        frames = timeline.len(),
        "graph traversal"
    );
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Graph {
        Graph::new([
            (0, vec![1, 2]),
            (1, vec![0, 3]),
            (2, vec![0]),
            (3, vec![1]),
        ])
        .unwrap()
    }

    fn end_of(timeline: &GraphTimeline) -> (Option<Vec<NodeId>>, Vec<NodeId>) {
        match &timeline.last().kind {
            GraphFrame::End { path, visited } => (path.clone(), visited.clone()),
            other => panic!("unexpected terminal {:?}", other),
        }
    }

    #[test]
    fn bfs_marks_on_discovery_and_reconstructs_the_path() {
        let timeline = bfs(&sample(), 0, Some(3)).unwrap();
        let (path, visited) = end_of(&timeline);
        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(path, Some(vec![0, 1, 3]));

        let dequeued: Vec<NodeId> = timeline
            .iter()
            .filter_map(|frame| match frame.kind {
                GraphFrame::Dequeue { node } => Some(node),
                _ => None,
            })
            .collect();
        assert_eq!(dequeued, vec![0, 1, 2, 3]);
        assert_eq!(&timeline.tags()[timeline.len() - 2..], &["found", "end"]);
    }

    #[test]
    fn bfs_without_target_exhausts_the_frontier() {
        let timeline = bfs(&sample(), 2, None).unwrap();
        let (path, visited) = end_of(&timeline);
        assert_eq!(path, None);
        assert_eq!(visited, vec![2, 0, 1, 3]);
        assert!(!timeline.tags().contains(&"compare"));
    }

    #[test]
    fn dfs_marks_on_pop_and_skips_stale_entries() {
        // 0 pushes 1 and 2; 2 is popped first and pushes 1 again
        let graph = Graph::undirected(&[(0, 1), (0, 2), (2, 1)]);
        let timeline = dfs(&graph, 0, None).unwrap();
        let (_, visited) = end_of(&timeline);
        assert_eq!(visited, vec![0, 2, 1]);
        assert!(timeline
            .iter()
            .any(|frame| frame.kind == GraphFrame::Revisit { node: 1 }));

        let explored = &timeline.final_snapshot().explored;
        assert_eq!(explored, &vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn dfs_path_follows_first_discovery() {
        let timeline = dfs(&sample(), 0, Some(3)).unwrap();
        let (path, _) = end_of(&timeline);
        assert_eq!(path, Some(vec![0, 1, 3]));
    }

    #[test]
    fn unreachable_target_is_not_found() {
        let graph = Graph::new([(0, vec![1]), (1, vec![0]), (2, vec![])]).unwrap();
        let timeline = bfs(&graph, 0, Some(2)).unwrap();
        assert_eq!(&timeline.tags()[timeline.len() - 2..], &["not-found", "end"]);
        assert_eq!(end_of(&timeline).0, None);
    }

    #[test]
    fn start_equal_to_target() {
        let timeline = dfs(&sample(), 2, Some(2)).unwrap();
        assert_eq!(end_of(&timeline).0, Some(vec![2]));
    }

    #[test]
    fn unknown_nodes_are_rejected() {
        assert_eq!(
            bfs(&sample(), 9, None).unwrap_err(),
            EngineError::UnknownNode(9)
        );
        assert_eq!(
            dfs(&sample(), 0, Some(7)).unwrap_err(),
            EngineError::UnknownNode(7)
        );
        assert_eq!(
            Graph::new([(0, vec![5])]).unwrap_err(),
            EngineError::UnknownNode(5)
        );
    }

    #[test]
    fn random_graphs_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        let graph = Graph::random(&mut rng, 6, 0.5).unwrap();
        assert_eq!(graph.len(), 6);
        for node in graph.nodes() {
            for &neighbor in graph.neighbors(node) {
                assert!(graph.neighbors(neighbor).contains(&node));
            }
        }
        assert!(Graph::random(&mut rng, 3, 1.5).is_err());
    }
}
