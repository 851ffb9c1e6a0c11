//! Binary search tree engine
//!
//! Nodes live in an arena ([`tree`]) with a non-owning parent index per node.
//! Every structural change is followed by a full [`layout`] pass, recorded as
//! a `reposition` frame, so each snapshot carries coordinates that are valid
//! on their own.
//!
//! Like the linear engines, operations run on a working copy of the tree and
//! the engine adopts it only after the terminal frame has been recorded.

mod layout;
mod tree;

pub use layout::{H_SPACING, TOP_MARGIN, V_SPACING};
pub use tree::Side;

use super::container::RANDOM_VALUE_MAX;
use crate::errors::{EngineError, Result};
use crate::history::{Footprint, FrameKind, Recorder, Timeline, DEFAULT_HISTORY_LIMIT};
use crate::Value;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};
use tree::{Slot, Tree};

/// One node as the presentation layer sees it
///
/// Links are given by value since values are unique in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub value: Value,
    pub x: f64,
    pub y: f64,
    pub left: Option<Value>,
    pub right: Option<Value>,
    pub parent: Option<Value>,
}

/// Whole tree in pre-order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub root: Option<Value>,
    pub nodes: Vec<NodeView>,
}

impl TreeSnapshot {
    pub fn node(&self, value: Value) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.value == value)
    }
}

impl Footprint for TreeSnapshot {
    fn footprint(&self) -> usize {
        self.nodes.len() * std::mem::size_of::<NodeView>() + std::mem::size_of::<Self>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    InOrder,
    PreOrder,
    PostOrder,
}

impl Order {
    pub fn name(self) -> &'static str {
        match self {
            Order::InOrder => "in-order",
            Order::PreOrder => "pre-order",
            Order::PostOrder => "post-order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TreeFrame {
    Start,
    /// Comparing against `value`, then heading `toward` one of its children
    Traverse { value: Value, toward: Option<Side> },
    Duplicate { value: Value },
    /// New leaf hung under `parent` at a provisional position
    Attach {
        value: Value,
        parent: Option<Value>,
        side: Option<Side>,
    },
    Reposition,
    Insert { value: Value },
    HighlightFound { value: Value },
    NotFound { value: Value },
    /// In-order successor of a node with two children
    Successor { value: Value },
    Copy { from: Value, into: Value },
    /// Node unlinked, its only child (if any) moved into its place
    Splice {
        removed: Value,
        child: Option<Value>,
    },
    /// Node visited by a traversal; `output` is the sequence so far
    #[serde(rename = "traverse")]
    Visit { value: Value, output: Vec<Value> },
    Fill { values: Vec<Value> },
    End {
        value: Option<Value>,
        output: Vec<Value>,
    },
}

impl FrameKind for TreeFrame {
    fn tag(&self) -> &'static str {
        match self {
            TreeFrame::Start => "start",
            TreeFrame::Traverse { .. } => "traverse",
            TreeFrame::Duplicate { .. } => "duplicate",
            TreeFrame::Attach { .. } => "attach",
            TreeFrame::Reposition => "reposition",
            TreeFrame::Insert { .. } => "insert",
            TreeFrame::HighlightFound { .. } => "highlight-found",
            TreeFrame::NotFound { .. } => "not-found",
            TreeFrame::Successor { .. } => "successor",
            TreeFrame::Copy { .. } => "copy",
            TreeFrame::Splice { .. } => "splice",
            TreeFrame::Visit { .. } => "traverse",
            TreeFrame::Fill { .. } => "fill",
            TreeFrame::End { .. } => "end",
        }
    }

    fn is_start(&self) -> bool {
        matches!(self, TreeFrame::Start)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, TreeFrame::End { .. })
    }

    fn is_error(&self) -> bool {
        false
    }
}

pub type TreeTimeline = Timeline<TreeFrame, TreeSnapshot>;
type TreeRecorder = Recorder<TreeFrame, TreeSnapshot>;

/// Where a descent for `value` stopped
enum Descent {
    Found(Slot),
    Vacant(Option<(Slot, Side)>),
}

fn record(
    recorder: &mut TreeRecorder,
    tree: &Tree,
    kind: TreeFrame,
    description: impl Into<String>,
) -> Result<()> {
    recorder.push(kind, description, tree.snapshot())?;
    Ok(())
}

/// Compare `value` against each node from the root down, recording a
/// `traverse` frame per comparison when a recorder is given
fn descend(tree: &Tree, value: Value, mut recorder: Option<&mut TreeRecorder>) -> Result<Descent> {
    let mut cursor = tree.root();
    let mut parent = None;
    while let Some(slot) = cursor {
        let current = tree.value(slot).unwrap_or_default();
        if current == value {
            return Ok(Descent::Found(slot));
        }
        let side = if value < current { Side::Left } else { Side::Right };
        if let Some(recorder) = recorder.as_deref_mut() {
            let relation = match side {
                Side::Left => "<",
                Side::Right => ">",
            };
            record(
                recorder,
                tree,
                TreeFrame::Traverse {
                    value: current,
                    toward: Some(side),
                },
                format!("{} {} {}, go {}", value, relation, current, side.name()),
            )?;
        }
        parent = Some((slot, side));
        cursor = tree.child(slot, side);
    }
    Ok(Descent::Vacant(parent))
}

/// Visit order of the subtree at `slot`; each call returns its own list
fn walk(tree: &Tree, slot: Option<Slot>, order: Order) -> Vec<Value> {
    let Some(node) = slot.and_then(|slot| tree.node(slot)) else {
        return Vec::new();
    };
    let left = walk(tree, node.left, order);
    let right = walk(tree, node.right, order);

    let mut visited = Vec::with_capacity(left.len() + right.len() + 1);
    match order {
        Order::PreOrder => {
            visited.push(node.value);
            visited.extend(left);
            visited.extend(right);
        }
        Order::InOrder => {
            visited.extend(left);
            visited.push(node.value);
            visited.extend(right);
        }
        Order::PostOrder => {
            visited.extend(left);
            visited.extend(right);
            visited.push(node.value);
        }
    }
    visited
}

#[derive(Debug, Clone)]
pub struct BstEngine {
    tree: Tree,
    canvas_center: f64,
    history_limit: usize,
}

fn check_center(canvas_center: f64) -> Result<()> {
    if !canvas_center.is_finite() {
        warn!(canvas_center, "rejected canvas center");
        return Err(EngineError::InvalidArgument(format!(
            "canvas center must be finite, got {}",
            canvas_center
        )));
    }
    Ok(())
}

impl BstEngine {
    /// Empty tree whose root will sit at `canvas_center`
    pub fn new(canvas_center: f64) -> Result<Self> {
        check_center(canvas_center)?;
        Ok(BstEngine {
            tree: Tree::default(),
            canvas_center,
            history_limit: DEFAULT_HISTORY_LIMIT,
        })
    }

    /// Build a tree by plain insertion, without recording anything
    pub fn from_values(values: &[Value], canvas_center: f64) -> Result<Self> {
        let mut engine = Self::new(canvas_center)?;
        for &value in values {
            if let Descent::Vacant(parent) = descend(&engine.tree, value, None)? {
                engine.tree.attach(value, parent);
            }
        }
        layout::layout(&mut engine.tree, canvas_center);
        Ok(engine)
    }

    pub fn with_history_limit(mut self, bytes: usize) -> Self {
        self.history_limit = bytes;
        self
    }

    pub fn state(&self) -> TreeSnapshot {
        self.tree.snapshot()
    }

    /// Values in ascending order
    pub fn values(&self) -> Vec<Value> {
        self.tree.in_order()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    pub fn canvas_center(&self) -> f64 {
        self.canvas_center
    }

    fn begin(&self, description: String) -> Result<(Tree, TreeRecorder)> {
        let tree = self.tree.clone();
        let mut recorder = TreeRecorder::with_limit(self.history_limit);
        record(&mut recorder, &tree, TreeFrame::Start, description)?;
        Ok((tree, recorder))
    }

    pub fn insert(&mut self, value: Value) -> Result<TreeTimeline> {
        let (mut tree, mut recorder) = self.begin(format!("Insert {}", value))?;

        let parent = match descend(&tree, value, Some(&mut recorder))? {
            Descent::Found(_) => {
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::Duplicate { value },
                    format!("{} is already in the tree", value),
                )?;
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::End {
                        value: None,
                        output: Vec::new(),
                    },
                    "Nothing inserted",
                )?;
                debug!(value, "bst insert skipped duplicate");
                return Ok(recorder.finish());
            }
            Descent::Vacant(parent) => parent,
        };

        tree.attach(value, parent);
        let parent_value = parent.and_then(|(slot, _)| tree.value(slot));
        let description = match (parent_value, parent) {
            (Some(parent_value), Some((_, side))) => {
                format!("Attach {} as the {} child of {}", value, side.name(), parent_value)
            }
            _ => format!("{} becomes the root", value),
        };
        record(
            &mut recorder,
            &tree,
            TreeFrame::Attach {
                value,
                parent: parent_value,
                side: parent.map(|(_, side)| side),
            },
            description,
        )?;

        layout::layout(&mut tree, self.canvas_center);
        record(
            &mut recorder,
            &tree,
            TreeFrame::Reposition,
            "Recompute node positions",
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::Insert { value },
            format!("{} inserted", value),
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: Some(value),
                output: Vec::new(),
            },
            "Insert complete",
        )?;

        self.tree = tree;
        let timeline = recorder.finish();
        debug!(value, frames = timeline.len(), "bst insert");
        Ok(timeline)
    }

    pub fn delete(&mut self, value: Value) -> Result<TreeTimeline> {
        let (mut tree, mut recorder) = self.begin(format!("Delete {}", value))?;

        let slot = match descend(&tree, value, Some(&mut recorder))? {
            Descent::Found(slot) => slot,
            Descent::Vacant(_) => {
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::NotFound { value },
                    format!("{} is not in the tree", value),
                )?;
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::End {
                        value: None,
                        output: Vec::new(),
                    },
                    "Nothing deleted",
                )?;
                debug!(value, "bst delete missed");
                return Ok(recorder.finish());
            }
        };
        record(
            &mut recorder,
            &tree,
            TreeFrame::HighlightFound { value },
            format!("Found {}", value),
        )?;

        let two_children = tree.child(slot, Side::Left).is_some()
            && tree.child(slot, Side::Right).is_some();
        let doomed = if two_children {
            let successor = self.find_successor(&tree, slot, &mut recorder)?;
            let successor_value = tree.value(successor).unwrap_or_default();
            record(
                &mut recorder,
                &tree,
                TreeFrame::Successor {
                    value: successor_value,
                },
                format!("In-order successor is {}", successor_value),
            )?;
            tree.set_value(slot, successor_value);
            record(
                &mut recorder,
                &tree,
                TreeFrame::Copy {
                    from: successor_value,
                    into: value,
                },
                format!("Copy {} over {}", successor_value, value),
            )?;
            successor
        } else {
            slot
        };

        let removed = tree.value(doomed).unwrap_or_default();
        let child = tree
            .splice_out(doomed)
            .ok_or_else(|| EngineError::InvalidArgument(format!("cannot splice out {}", removed)))?;
        let child_value = child.and_then(|child| tree.value(child));
        let description = match child_value {
            Some(child_value) => format!("Unlink {}, {} takes its place", removed, child_value),
            None => format!("Unlink leaf {}", removed),
        };
        record(
            &mut recorder,
            &tree,
            TreeFrame::Splice {
                removed,
                child: child_value,
            },
            description,
        )?;

        layout::layout(&mut tree, self.canvas_center);
        record(
            &mut recorder,
            &tree,
            TreeFrame::Reposition,
            "Recompute node positions",
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: Some(value),
                output: Vec::new(),
            },
            format!("{} deleted", value),
        )?;

        self.tree = tree;
        let timeline = recorder.finish();
        debug!(value, two_children, frames = timeline.len(), "bst delete");
        Ok(timeline)
    }

    /// Leftmost descent of the right subtree
    fn find_successor(
        &self,
        tree: &Tree,
        slot: Slot,
        recorder: &mut TreeRecorder,
    ) -> Result<Slot> {
        let value = tree.value(slot).unwrap_or_default();
        record(
            recorder,
            tree,
            TreeFrame::Traverse {
                value,
                toward: Some(Side::Right),
            },
            format!("{} has two children, look right for its successor", value),
        )?;
        let mut cursor = tree
            .child(slot, Side::Right)
            .ok_or_else(|| EngineError::InvalidArgument(format!("{} has no right child", value)))?;
        while let Some(left) = tree.child(cursor, Side::Left) {
            let current = tree.value(cursor).unwrap_or_default();
            record(
                recorder,
                tree,
                TreeFrame::Traverse {
                    value: current,
                    toward: Some(Side::Left),
                },
                format!("Go left from {}", current),
            )?;
            cursor = left;
        }
        Ok(cursor)
    }

    pub fn find(&self, value: Value) -> Result<TreeTimeline> {
        let (tree, mut recorder) = self.begin(format!("Find {}", value))?;
        let found = match descend(&tree, value, Some(&mut recorder))? {
            Descent::Found(_) => {
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::HighlightFound { value },
                    format!("Found {}", value),
                )?;
                Some(value)
            }
            Descent::Vacant(_) => {
                record(
                    &mut recorder,
                    &tree,
                    TreeFrame::NotFound { value },
                    format!("{} is not in the tree", value),
                )?;
                None
            }
        };
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: found,
                output: Vec::new(),
            },
            "Search complete",
        )?;
        let timeline = recorder.finish();
        debug!(value, found = found.is_some(), frames = timeline.len(), "bst find");
        Ok(timeline)
    }

    pub fn min(&self) -> Result<TreeTimeline> {
        self.extreme(Side::Left)
    }

    pub fn max(&self) -> Result<TreeTimeline> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Result<TreeTimeline> {
        let (label, operation) = match side {
            Side::Left => ("minimum", "find the minimum"),
            Side::Right => ("maximum", "find the maximum"),
        };
        let Some(mut cursor) = self.tree.root() else {
            warn!(operation, "bst is empty");
            return Err(EngineError::empty(operation));
        };

        let (tree, mut recorder) = self.begin(format!("Find the {}", label))?;
        while let Some(next) = tree.child(cursor, side) {
            let current = tree.value(cursor).unwrap_or_default();
            record(
                &mut recorder,
                &tree,
                TreeFrame::Traverse {
                    value: current,
                    toward: Some(side),
                },
                format!("Keep going {} from {}", side.name(), current),
            )?;
            cursor = next;
        }
        let value = tree.value(cursor).unwrap_or_default();
        record(
            &mut recorder,
            &tree,
            TreeFrame::HighlightFound { value },
            format!("The {} is {}", label, value),
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: Some(value),
                output: Vec::new(),
            },
            "Search complete",
        )?;
        Ok(recorder.finish())
    }

    pub fn traverse(&self, order: Order) -> Result<TreeTimeline> {
        let (tree, mut recorder) = self.begin(format!("{} traversal", order.name()))?;

        let visited = walk(&tree, tree.root(), order);
        for (step, &value) in visited.iter().enumerate() {
            record(
                &mut recorder,
                &tree,
                TreeFrame::Visit {
                    value,
                    output: visited[..=step].to_vec(),
                },
                format!("Visit {}", value),
            )?;
        }
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: None,
                output: visited,
            },
            format!("{} traversal complete", order.name()),
        )?;

        let timeline = recorder.finish();
        debug!(order = order.name(), frames = timeline.len(), "bst traverse");
        Ok(timeline)
    }

    /// Replace the tree with up to `count` distinct random values
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Result<TreeTimeline> {
        let pool: Vec<Value> = (1..=RANDOM_VALUE_MAX).collect();
        let values: Vec<Value> = pool.choose_multiple(rng, count).copied().collect();

        let (_, mut recorder) = self.begin("Generate a random tree".to_string())?;
        let mut tree = Tree::default();
        for &value in &values {
            if let Descent::Vacant(parent) = descend(&tree, value, None)? {
                tree.attach(value, parent);
            }
        }
        record(
            &mut recorder,
            &tree,
            TreeFrame::Fill {
                values: values.clone(),
            },
            format!("Insert {:?}", values),
        )?;
        layout::layout(&mut tree, self.canvas_center);
        record(
            &mut recorder,
            &tree,
            TreeFrame::Reposition,
            "Recompute node positions",
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: None,
                output: Vec::new(),
            },
            "Random tree ready",
        )?;

        self.tree = tree;
        Ok(recorder.finish())
    }

    /// Re-center the layout on a new canvas
    pub fn set_canvas_center(&mut self, canvas_center: f64) -> Result<TreeTimeline> {
        check_center(canvas_center)?;
        let (mut tree, mut recorder) = self.begin(format!("Center the tree on {}", canvas_center))?;
        layout::layout(&mut tree, canvas_center);
        record(
            &mut recorder,
            &tree,
            TreeFrame::Reposition,
            "Recompute node positions",
        )?;
        record(
            &mut recorder,
            &tree,
            TreeFrame::End {
                value: None,
                output: Vec::new(),
            },
            "Layout updated",
        )?;

        self.tree = tree;
        self.canvas_center = canvas_center;
        Ok(recorder.finish())
    }
}

impl Default for BstEngine {
    fn default() -> Self {
        BstEngine {
            tree: Tree::default(),
            canvas_center: 0.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn built(values: &[Value]) -> BstEngine {
        let mut engine = BstEngine::new(400.0).unwrap();
        for &value in values {
            engine.insert(value).unwrap();
        }
        engine
    }

    fn assert_no_overlap(snapshot: &TreeSnapshot) {
        for (i, a) in snapshot.nodes.iter().enumerate() {
            for b in &snapshot.nodes[i + 1..] {
                assert!(
                    a.x != b.x || a.y != b.y,
                    "{} and {} share ({}, {})",
                    a.value,
                    b.value,
                    a.x,
                    a.y
                );
            }
        }
    }

    #[test]
    fn insert_descends_then_repositions() {
        let mut engine = built(&[50, 30]);
        let timeline = engine.insert(20).unwrap();
        assert_eq!(
            timeline.tags(),
            vec!["start", "traverse", "traverse", "attach", "reposition", "insert", "end"]
        );
        assert_eq!(engine.values(), vec![20, 30, 50]);
        assert_eq!(timeline.final_snapshot(), &engine.state());
        assert_eq!(engine.state().node(50).unwrap().x, 400.0);
    }

    #[test]
    fn duplicate_insert_is_recorded_not_applied() {
        let mut engine = built(&[50, 30]);
        let before = engine.state();
        let timeline = engine.insert(30).unwrap();
        assert_eq!(timeline.tags(), vec!["start", "traverse", "duplicate", "end"]);
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn deleting_a_node_with_one_child_splices_it_out() {
        let mut engine = built(&[50, 30, 70, 20]);
        let timeline = engine.delete(30).unwrap();

        assert!(timeline.iter().any(|frame| frame.kind
            == TreeFrame::Splice {
                removed: 30,
                child: Some(20)
            }));
        let state = engine.state();
        assert_eq!(state.node(50).unwrap().left, Some(20));
        assert_eq!(state.node(20).unwrap().parent, Some(50));
        assert_eq!(engine.values(), vec![20, 50, 70]);
        assert_no_overlap(&state);
        assert_eq!(timeline.final_snapshot(), &state);
    }

    #[test]
    fn deleting_a_node_with_two_children_uses_the_successor() {
        let mut engine = built(&[50, 30, 70, 60, 80, 65]);
        let timeline = engine.delete(50).unwrap();

        assert!(timeline
            .iter()
            .any(|frame| frame.kind == TreeFrame::Successor { value: 60 }));
        assert!(timeline.iter().any(|frame| frame.kind
            == TreeFrame::Copy {
                from: 60,
                into: 50
            }));
        let state = engine.state();
        assert_eq!(state.root, Some(60));
        assert_eq!(state.node(70).unwrap().left, Some(65));
        assert_eq!(engine.values(), vec![30, 60, 65, 70, 80]);
        assert_no_overlap(&state);
    }

    #[test]
    fn deleting_the_last_node_empties_the_tree() {
        let mut engine = built(&[1]);
        engine.delete(1).unwrap();
        assert!(engine.is_empty());
        assert_eq!(engine.state(), TreeSnapshot::default());
    }

    #[test]
    fn missing_values_are_reported() {
        let mut engine = built(&[50, 30]);
        let before = engine.state();
        let timeline = engine.delete(40).unwrap();
        assert_eq!(timeline.tags(), vec!["start", "traverse", "traverse", "not-found", "end"]);
        assert_eq!(engine.state(), before);

        let timeline = engine.find(40).unwrap();
        assert_eq!(timeline.last().kind, TreeFrame::End { value: None, output: vec![] });
        let timeline = engine.find(30).unwrap();
        assert_eq!(timeline.tags(), vec!["start", "traverse", "highlight-found", "end"]);
    }

    #[test]
    fn traversal_orders() {
        let engine = built(&[50, 30, 70, 20, 40]);
        let output = |order| match engine.traverse(order).unwrap().last().kind.clone() {
            TreeFrame::End { output, .. } => output,
            other => panic!("unexpected terminal {:?}", other),
        };
        assert_eq!(output(Order::InOrder), vec![20, 30, 40, 50, 70]);
        assert_eq!(output(Order::PreOrder), vec![50, 30, 20, 40, 70]);
        assert_eq!(output(Order::PostOrder), vec![20, 40, 30, 70, 50]);

        let timeline = engine.traverse(Order::InOrder).unwrap();
        assert_eq!(timeline.len(), 7);
        assert_eq!(
            timeline.tags(),
            vec!["start", "traverse", "traverse", "traverse", "traverse", "traverse", "end"]
        );
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json[1]["type"], "traverse");
        assert_eq!(json[1]["output"], serde_json::json!([20]));
        assert_eq!(
            timeline.get(3).unwrap().kind,
            TreeFrame::Visit {
                value: 40,
                output: vec![20, 30, 40]
            }
        );
    }

    #[test]
    fn min_and_max_descend_to_the_edges() {
        let engine = built(&[50, 30, 70, 20, 80]);
        let min = engine.min().unwrap();
        assert_eq!(min.tags(), vec!["start", "traverse", "traverse", "highlight-found", "end"]);
        assert_eq!(min.last().kind, TreeFrame::End { value: Some(20), output: vec![] });
        let max = engine.max().unwrap();
        assert_eq!(max.last().kind, TreeFrame::End { value: Some(80), output: vec![] });
        assert!(matches!(
            BstEngine::default().min(),
            Err(EngineError::EmptyStructure { .. })
        ));
    }

    #[test]
    fn random_trees_hold_distinct_values_without_overlap() {
        let mut engine = BstEngine::new(300.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let timeline = engine.randomize(&mut rng, 12).unwrap();
        assert_eq!(timeline.tags(), vec!["start", "fill", "reposition", "end"]);
        assert_eq!(engine.len(), 12);
        assert_no_overlap(&engine.state());

        let values = engine.values();
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn recentering_moves_the_root() {
        let mut engine = built(&[50, 30, 70]);
        engine.set_canvas_center(100.0).unwrap();
        let state = engine.state();
        assert_eq!(state.node(50).unwrap().x, 100.0);
        assert_eq!(state.node(30).unwrap().x, 100.0 - H_SPACING);
        assert!(engine.set_canvas_center(f64::NAN).is_err());
    }

    #[test]
    fn non_finite_center_is_rejected_at_construction() {
        for center in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                BstEngine::new(center),
                Err(EngineError::InvalidArgument(_))
            ));
            assert!(matches!(
                BstEngine::from_values(&[50, 30], center),
                Err(EngineError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn history_limit_leaves_the_tree_untouched() {
        let mut engine = built(&[50, 30, 70]).with_history_limit(64);
        let before = engine.state();
        assert!(matches!(
            engine.insert(20),
            Err(EngineError::HistoryLimitExceeded(_))
        ));
        assert_eq!(engine.state(), before);
    }
}
