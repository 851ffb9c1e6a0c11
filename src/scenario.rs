//! Demo scripts for the binary
//!
//! A [`Script`] is the list of operations one scenario runs, each already
//! recorded. Typed timelines are flattened into [`DisplayFrame`]s that the
//! TUI can render without knowing which engine produced them; the typed form
//! is kept alongside as JSON for `--json`.

use crate::algorithms::{
    bfs, bubble_sort, dfs, insertion_sort, BinarySearch, Graph, GraphFrame, LinearSearch,
    SearchFrame, SearchSnapshot, SortFrame, SortSnapshot, TraversalSnapshot,
};
use crate::config::{Config, Scenario};
use crate::errors::{CliError, Result as EngineResult};
use crate::history::{FrameKind, Timeline};
use crate::structures::bst::{Order, TreeFrame, TreeSnapshot};
use crate::structures::linked::{Chain, ListEngine};
use crate::structures::{
    ArrayEngine, BstEngine, Capacity, CircularLinkedList, DequeEngine, DoublyLinkedList,
    QueueEngine, SeqFrame, SeqSnapshot, SinglyLinkedList, StackEngine, RANDOM_VALUE_MAX,
};
use crate::{NodeId, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

const RANDOM_LEN: usize = 6;

/// Snapshot of whichever engine produced the frame
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Row(SeqSnapshot),
    Tree(TreeSnapshot),
    Search(SearchSnapshot),
    Sort(SortSnapshot),
    Traversal(TraversalSnapshot),
}

impl From<SeqSnapshot> for View {
    fn from(snapshot: SeqSnapshot) -> Self {
        View::Row(snapshot)
    }
}

impl From<TreeSnapshot> for View {
    fn from(snapshot: TreeSnapshot) -> Self {
        View::Tree(snapshot)
    }
}

impl From<SearchSnapshot> for View {
    fn from(snapshot: SearchSnapshot) -> Self {
        View::Search(snapshot)
    }
}

impl From<SortSnapshot> for View {
    fn from(snapshot: SortSnapshot) -> Self {
        View::Sort(snapshot)
    }
}

impl From<TraversalSnapshot> for View {
    fn from(snapshot: TraversalSnapshot) -> Self {
        View::Traversal(snapshot)
    }
}

/// What a frame points at: slot indices for rows, values for trees, node ids
/// for graphs
pub trait Marks {
    fn marks(&self) -> Vec<i64>;
}

impl Marks for SeqFrame {
    fn marks(&self) -> Vec<i64> {
        let indices = match self {
            SeqFrame::Traverse { index }
            | SeqFrame::PreInsert { index, .. }
            | SeqFrame::Lift { index }
            | SeqFrame::Insert { index, .. }
            | SeqFrame::Replace { index, .. }
            | SeqFrame::Found { index } => vec![*index],
            SeqFrame::Expand { at } | SeqFrame::Shrink { at } => vec![*at],
            SeqFrame::Place { to, .. } => vec![*to],
            SeqFrame::Highlight { indices } => indices.clone(),
            _ => Vec::new(),
        };
        indices.into_iter().map(|index| index as i64).collect()
    }
}

impl Marks for TreeFrame {
    fn marks(&self) -> Vec<i64> {
        match self {
            TreeFrame::Traverse { value, .. }
            | TreeFrame::Duplicate { value }
            | TreeFrame::Attach { value, .. }
            | TreeFrame::Insert { value }
            | TreeFrame::HighlightFound { value }
            | TreeFrame::Successor { value }
            | TreeFrame::Visit { value, .. } => vec![*value],
            TreeFrame::Copy { from, .. } => vec![*from],
            TreeFrame::Splice {
                child: Some(child), ..
            } => vec![*child],
            _ => Vec::new(),
        }
    }
}

impl Marks for SearchFrame {
    fn marks(&self) -> Vec<i64> {
        match *self {
            SearchFrame::Compare { index, .. } | SearchFrame::Found { index } => {
                vec![index as i64]
            }
            SearchFrame::Midpoint { mid, .. } => vec![mid as i64],
            _ => Vec::new(),
        }
    }
}

impl Marks for SortFrame {
    fn marks(&self) -> Vec<i64> {
        match *self {
            SortFrame::Compare { left, right }
            | SortFrame::Swap { left, right }
            | SortFrame::NoSwap { left, right } => vec![left as i64, right as i64],
            SortFrame::SelectKey { index, .. } | SortFrame::Insert { index, .. } => {
                vec![index as i64]
            }
            SortFrame::Shift { to, .. } => vec![to as i64],
            _ => Vec::new(),
        }
    }
}

impl Marks for GraphFrame {
    fn marks(&self) -> Vec<i64> {
        let nodes: Vec<NodeId> = match self {
            GraphFrame::Dequeue { node }
            | GraphFrame::Pop { node }
            | GraphFrame::Revisit { node }
            | GraphFrame::Compare { node, .. } => vec![*node],
            GraphFrame::Skip { from, to }
            | GraphFrame::Enqueue { from, to }
            | GraphFrame::Push { from, to } => vec![*from, *to],
            GraphFrame::Found { path, .. } => path.clone(),
            _ => Vec::new(),
        };
        nodes.into_iter().map(i64::from).collect()
    }
}

/// Engine-independent form of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub tag: &'static str,
    pub description: String,
    pub failed: bool,
    pub marks: Vec<i64>,
    pub view: View,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub label: String,
    pub frames: Vec<DisplayFrame>,
    pub json: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub scenario: Scenario,
    pub operations: Vec<Operation>,
    /// Operations the engine refused, with the reason
    pub refused: Vec<String>,
    /// Input graph for traversal scenarios
    pub graph: Option<Graph>,
}

#[derive(Serialize)]
struct JsonOperation<'a> {
    operation: &'a str,
    frames: &'a serde_json::Value,
}

impl Script {
    fn new(scenario: Scenario) -> Self {
        Script {
            scenario,
            operations: Vec::new(),
            refused: Vec::new(),
            graph: None,
        }
    }

    /// Record one engine call; a refused call is noted and skipped
    fn push<K, S>(
        &mut self,
        label: impl Into<String>,
        result: EngineResult<Timeline<K, S>>,
    ) -> Result<(), CliError>
    where
        K: FrameKind + Marks + Serialize,
        S: Serialize + Into<View>,
    {
        let label = label.into();
        let timeline = match result {
            Ok(timeline) => timeline,
            Err(err) => {
                warn!(operation = %label, error = %err, "operation refused");
                self.refused.push(format!("{}: {}", label, err));
                return Ok(());
            }
        };

        let json = serde_json::to_value(&timeline)?;
        let frames = timeline
            .into_frames()
            .into_iter()
            .map(|frame| DisplayFrame {
                tag: frame.kind.tag(),
                failed: frame.kind.is_error(),
                marks: frame.kind.marks(),
                description: frame.description,
                view: frame.snapshot.into(),
            })
            .collect();
        self.operations.push(Operation {
            label,
            frames,
            json,
        });
        Ok(())
    }

    pub fn total_frames(&self) -> usize {
        self.operations.iter().map(|op| op.frames.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        let operations: Vec<JsonOperation> = self
            .operations
            .iter()
            .map(|op| JsonOperation {
                operation: &op.label,
                frames: &op.json,
            })
            .collect();
        Ok(serde_json::to_string_pretty(&operations)?)
    }
}

/// Input values: explicit, else seeded random, else the scenario default
fn input(config: &Config, rng: &mut Option<StdRng>, default: &[Value]) -> Vec<Value> {
    if !config.values.is_empty() {
        return config.values.clone();
    }
    match rng {
        Some(rng) => (0..RANDOM_LEN).map(|_| rng.gen_range(1..=RANDOM_VALUE_MAX)).collect(),
        None => default.to_vec(),
    }
}

pub fn build(config: &Config) -> Result<Script, CliError> {
    let mut rng = config.seed.map(StdRng::seed_from_u64);
    let mut script = Script::new(config.scenario);

    match config.scenario {
        Scenario::Array => array(config, &mut rng, &mut script)?,
        Scenario::Stack => stack(config, &mut rng, &mut script)?,
        Scenario::Queue => queue(config, &mut rng, &mut script)?,
        Scenario::Deque => deque(config, &mut rng, &mut script)?,
        Scenario::Singly => list(SinglyLinkedList::new(), config, &mut rng, &mut script)?,
        Scenario::Doubly => list(DoublyLinkedList::new(), config, &mut rng, &mut script)?,
        Scenario::Circular => list(CircularLinkedList::new(), config, &mut rng, &mut script)?,
        Scenario::Bst => bst(config, &mut rng, &mut script)?,
        Scenario::Bfs | Scenario::Dfs => traversal(config, &mut rng, &mut script)?,
        Scenario::Linear | Scenario::Binary => search(config, &mut rng, &mut script)?,
        Scenario::Bubble => {
            let values = input(config, &mut rng, &[5, 2, 4, 6, 1, 3]);
            script.push(format!("bubble sort {:?}", values), bubble_sort(values))?;
        }
        Scenario::Insertion => {
            let values = input(config, &mut rng, &[5, 2, 4, 6, 1, 3]);
            script.push(format!("insertion sort {:?}", values), insertion_sort(values))?;
        }
    }

    info!(
        scenario = %config.scenario,
        operations = script.operations.len(),
        frames = script.total_frames(),
        refused = script.refused.len(),
        "script built"
    );
    Ok(script)
}

fn array(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let capacity = config.capacity.unwrap_or_default();
    let mut engine = match rng {
        Some(rng) if config.values.is_empty() => {
            let mut engine = ArrayEngine::new(capacity);
            script.push("random", engine.randomize(rng, RANDOM_LEN))?;
            engine
        }
        _ => ArrayEngine::from_values(&input(config, &mut None, &[5, 12, 8, 3]), capacity)?,
    };

    let at = engine.len().min(1);
    script.push(format!("insert(at {}, 42)", at), engine.insert(at, 42))?;
    script.push("push(99)", engine.push(99))?;
    if !engine.is_empty() {
        script.push("update(at 0, 11)", engine.update(0, 11))?;
        let middle = engine.len() / 2;
        script.push(format!("remove(at {})", middle), engine.remove(middle))?;
    }
    if let Some(limit) = capacity.limit().filter(|&limit| limit > 1) {
        let smaller = Capacity::fixed(limit - 1)?;
        script.push(
            format!("set_capacity({})", limit - 1),
            engine.set_capacity(smaller),
        )?;
    }
    Ok(())
}

fn stack(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let values = input(config, rng, &[5, 7, 9]);
    let capacity = match config.capacity {
        Some(capacity) => capacity,
        None => Capacity::fixed(values.len().max(1))?,
    };
    let mut engine = StackEngine::new(capacity);
    for &value in &values {
        script.push(format!("push({})", value), engine.push(value))?;
    }
    script.push("push(99)", engine.push(99))?;
    script.push("peek", engine.peek())?;
    for _ in 0..=engine.len() {
        script.push("pop", engine.pop())?;
    }
    Ok(())
}

fn queue(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let values = input(config, rng, &[5, 7, 9]);
    let capacity = match config.capacity {
        Some(capacity) => capacity,
        None => Capacity::fixed(values.len().max(1))?,
    };
    let mut engine = QueueEngine::new(capacity);
    for &value in &values {
        script.push(format!("enqueue({})", value), engine.enqueue(value))?;
    }
    script.push("enqueue(99)", engine.enqueue(99))?;
    script.push("peek", engine.peek())?;
    for _ in 0..=engine.len() {
        script.push("dequeue", engine.dequeue())?;
    }
    Ok(())
}

fn deque(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let values = input(config, rng, &[5, 7, 9]);
    let capacity = match config.capacity {
        Some(capacity) => capacity,
        None => Capacity::fixed(values.len() + 1)?,
    };
    let mut engine = DequeEngine::new(capacity);
    for &value in &values {
        script.push(format!("push_back({})", value), engine.push_back(value))?;
    }
    script.push("push_front(1)", engine.push_front(1))?;
    script.push("push_front(2)", engine.push_front(2))?;
    script.push("peek_front", engine.peek_front())?;
    script.push("peek_back", engine.peek_back())?;
    script.push("pop_front", engine.pop_front())?;
    script.push("pop_back", engine.pop_back())?;
    Ok(())
}

fn list<C: Chain>(
    mut engine: ListEngine<C>,
    config: &Config,
    rng: &mut Option<StdRng>,
    script: &mut Script,
) -> Result<(), CliError> {
    match rng {
        Some(rng) if config.values.is_empty() => {
            script.push("random", engine.randomize(rng, RANDOM_LEN))?;
        }
        _ => engine = ListEngine::from_values(&input(config, &mut None, &[10, 20, 30, 40]))?,
    }

    let target = engine.values().get(engine.len() / 2).copied().unwrap_or(0);
    script.push("add_to_head(5)", engine.add_to_head(5))?;
    let middle = engine.len() / 2;
    script.push(
        format!("add_at_index({}, 25)", middle),
        engine.add_at_index(middle, 25),
    )?;
    script.push("add_to_tail(50)", engine.add_to_tail(50))?;
    script.push(format!("search({})", target), engine.search(target))?;
    script.push("search(1000)", engine.search(1000))?;
    let middle = engine.len() / 2;
    script.push(
        format!("remove_at_index({})", middle),
        engine.remove_at_index(middle),
    )?;
    script.push("remove_from_tail", engine.remove_from_tail())?;
    script.push("remove_from_head", engine.remove_from_head())?;
    Ok(())
}

fn bst(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let mut engine = BstEngine::new(config.canvas_center)?;
    match rng {
        Some(rng) if config.values.is_empty() => {
            script.push("random", engine.randomize(rng, RANDOM_LEN + 1))?;
        }
        _ => {
            for value in input(config, &mut None, &[50, 30, 70, 20, 40, 60, 80]) {
                script.push(format!("insert({})", value), engine.insert(value))?;
            }
        }
    }

    let values = engine.values();
    let Some(root) = engine.state().root else {
        return Ok(());
    };
    script.push(format!("insert({})", root), engine.insert(root))?;
    if let Some(&smallest) = values.first() {
        script.push(format!("find({})", smallest), engine.find(smallest))?;
    }
    script.push("find(1000)", engine.find(1000))?;
    for order in [Order::InOrder, Order::PreOrder, Order::PostOrder] {
        script.push(format!("traverse({})", order.name()), engine.traverse(order))?;
    }
    script.push("min", engine.min())?;
    script.push("max", engine.max())?;
    if let Some(&second) = values.get(1) {
        script.push(format!("delete({})", second), engine.delete(second))?;
    }
    script.push(format!("delete({})", root), engine.delete(root))?;
    Ok(())
}

fn node_id(value: Value) -> Result<NodeId, CliError> {
    NodeId::try_from(value).map_err(|_| CliError::InvalidValue {
        what: "node id",
        value: value.to_string(),
    })
}

fn traversal(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let graph = match rng {
        Some(rng) => Graph::random(rng, 8, 0.3)?,
        None => Graph::undirected(&[
            (0, 1),
            (0, 2),
            (1, 3),
            (1, 4),
            (2, 5),
            (4, 6),
            (5, 6),
            (6, 7),
        ]),
    };
    let start = config.values.first().copied().map(node_id).transpose()?.unwrap_or(0);
    let target = match config.values.get(1) {
        Some(&value) => Some(node_id(value)?),
        None => graph.nodes().last(),
    };

    let (name, run): (&str, fn(&Graph, NodeId, Option<NodeId>) -> EngineResult<_>) =
        match config.scenario {
            Scenario::Dfs => ("dfs", dfs),
            _ => ("bfs", bfs),
        };
    if let Some(target) = target {
        script.push(
            format!("{}({} → {})", name, start, target),
            run(&graph, start, Some(target)),
        )?;
    }
    script.push(format!("{}({})", name, start), run(&graph, start, None))?;
    script.graph = Some(graph);
    Ok(())
}

fn search(config: &Config, rng: &mut Option<StdRng>, script: &mut Script) -> Result<(), CliError> {
    let (target, values) = match config.values.split_first() {
        Some((&target, rest)) if !rest.is_empty() => (target, rest.to_vec()),
        Some((&target, _)) => (target, vec![3, 9, 14, 22, 41, 55, 67, 81]),
        None => {
            let values = input(config, rng, &[3, 9, 14, 22, 41, 55, 67, 81]);
            let target = values.get(values.len() / 2).copied().unwrap_or(0);
            (target, values)
        }
    };
    let miss = values.iter().max().map_or(0, |max| max + 1);

    match config.scenario {
        Scenario::Binary => {
            let search = BinarySearch::new(values);
            script.push(format!("binary search({})", target), search.run(target))?;
            script.push(format!("binary search({})", miss), search.run(miss))?;
        }
        _ => {
            let search = LinearSearch::new(values);
            script.push(format!("linear search({})", target), search.run(target))?;
            script.push(format!("linear search({})", miss), search.run(miss))?;
        }
    }
    Ok(())
}
