// Integration tests walking complete operations through the public API

use stepwise::algorithms::{
    bfs, insertion_sort, BinarySearch, Graph, GraphFrame, SearchFrame, SortFrame,
};
use stepwise::errors::EngineError;
use stepwise::playback::{ManualScheduler, Playback};
use stepwise::structures::bst::TreeFrame;
use stepwise::structures::{
    ArrayEngine, BstEngine, Capacity, DoublyLinkedList, Fault, QueueEngine, SeqFrame,
    StackEngine,
};

#[test]
fn test_stack_overflow_leaves_state_alone() {
    let mut stack = StackEngine::new(Capacity::fixed(2).unwrap());

    let timeline = stack.push(5).unwrap();
    assert!(!timeline.failed());
    assert_eq!(stack.values(), &[5]);

    stack.push(7).unwrap();
    assert_eq!(stack.values(), &[5, 7]);

    let before = stack.state();
    let timeline = stack.push(9).unwrap();
    assert!(timeline.failed());
    assert_eq!(
        timeline.last().kind,
        SeqFrame::Error {
            fault: Fault::Overflow
        }
    );
    assert_eq!(stack.values(), &[5, 7]);
    assert_eq!(stack.state(), before);
    assert_eq!(timeline.final_snapshot(), &before);
}

#[test]
fn test_binary_search_narrows_the_window() {
    let search = BinarySearch::new(vec![3, 9, 14, 22, 41, 55, 67, 81]);
    let timeline = search.run(41).unwrap();

    let midpoints: Vec<(usize, usize, usize)> = timeline
        .iter()
        .filter_map(|frame| match frame.kind {
            SearchFrame::Midpoint { low, high, mid } => Some((low, high, mid)),
            _ => None,
        })
        .collect();
    assert_eq!(midpoints, vec![(0, 7, 3), (4, 7, 5), (4, 4, 4)]);
    assert_eq!(timeline.last().kind, SearchFrame::End { found: Some(4) });
}

#[test]
fn test_bfs_visits_in_discovery_order() {
    let graph = Graph::new([
        (0, vec![1, 2]),
        (1, vec![0, 3]),
        (2, vec![0]),
        (3, vec![1]),
    ])
    .unwrap();
    let timeline = bfs(&graph, 0, Some(3)).unwrap();

    match &timeline.last().kind {
        GraphFrame::End { path, visited } => {
            assert_eq!(visited, &vec![0, 1, 2, 3]);
            assert_eq!(path, &Some(vec![0, 1, 3]));
        }
        other => panic!("unexpected terminal {:?}", other),
    }

    // 2 is enqueued before 3 is discovered through 1
    let enqueued: Vec<u32> = timeline
        .iter()
        .filter_map(|frame| match frame.kind {
            GraphFrame::Enqueue { to, .. } => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(enqueued, vec![1, 2, 3]);
}

#[test]
fn test_insertion_sort_scenario() {
    let timeline = insertion_sort(vec![5, 2, 4]).unwrap();

    let keys: Vec<i64> = timeline
        .iter()
        .filter_map(|frame| match frame.kind {
            SortFrame::SelectKey { key, .. } => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![2, 4]);

    let after_insert: Vec<Vec<i64>> = timeline
        .iter()
        .filter(|frame| matches!(frame.kind, SortFrame::Insert { .. }))
        .map(|frame| frame.snapshot.values.clone())
        .collect();
    assert_eq!(after_insert, vec![vec![2, 5, 4], vec![2, 4, 5]]);
    assert_eq!(timeline.final_snapshot().sorted_prefix, 3);
}

#[test]
fn test_bst_delete_splices_single_child() {
    let mut tree = BstEngine::new(400.0).unwrap();
    for value in [50, 30, 70, 20] {
        tree.insert(value).unwrap();
    }

    let timeline = tree.delete(30).unwrap();
    assert!(timeline.iter().any(|frame| frame.kind
        == TreeFrame::Splice {
            removed: 30,
            child: Some(20)
        }));

    let state = tree.state();
    assert_eq!(state.node(50).unwrap().left, Some(20));
    assert!(state.node(30).is_none());
    assert_eq!(timeline.final_snapshot(), &state);

    let mut positions: Vec<(i64, i64)> = state
        .nodes
        .iter()
        .map(|node| (node.x as i64, node.y as i64))
        .collect();
    positions.sort_unstable();
    positions.dedup();
    assert_eq!(positions.len(), state.nodes.len());
}

#[test]
fn test_validation_failures_record_nothing() {
    let mut array = ArrayEngine::from_values(&[1, 2, 3], Capacity::Unbounded).unwrap();
    assert_eq!(
        array.insert(9, 4).unwrap_err(),
        EngineError::IndexOutOfBounds { index: 9, len: 3 }
    );
    assert_eq!(array.values(), &[1, 2, 3]);

    assert_eq!(
        Capacity::fixed(0).unwrap_err(),
        EngineError::InvalidCapacity(0)
    );

    let mut list = DoublyLinkedList::new();
    assert!(matches!(
        list.remove_from_head(),
        Err(EngineError::EmptyStructure { .. })
    ));
}

#[test]
fn test_underflow_is_a_frame_not_an_error() {
    let mut queue = QueueEngine::new(Capacity::Unbounded);
    let timeline = queue.dequeue().unwrap();
    assert_eq!(timeline.tags(), vec!["start", "error"]);
    assert!(queue.is_empty());
}

#[test]
fn test_playback_replays_recorded_frames() {
    let mut stack = StackEngine::new(Capacity::Unbounded);
    stack.push(1).unwrap();
    let timeline = stack.push(2).unwrap();
    let expected: Vec<_> = timeline.iter().map(|frame| frame.snapshot.clone()).collect();

    let mut playback = Playback::new(ManualScheduler::new());
    playback.load(timeline.into_frames()).unwrap();
    let last = playback.len() - 1;

    for index in [last, 0, last, 1] {
        let frame = playback.seek(index).unwrap();
        assert_eq!(frame.snapshot, expected[index]);
    }
}
