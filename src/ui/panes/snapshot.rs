//! Snapshot pane rendering
//!
//! Draws the structure exactly as the current frame recorded it. Nothing here
//! looks at engine state, so stepping backward renders the same text as the
//! first visit to a frame.
//!
//! # Views
//!
//! - rows (arrays, stacks, queues, deques, linked lists) as boxed cells with
//!   the shape's connector between them
//! - trees by depth, with the recorded x coordinates scaled to the pane width
//! - search and sort runs as a single row with the live window or sorted
//!   region tinted
//! - graph traversals as frontier, visited set and the adjacency list

use super::pane_block;
use crate::algorithms::{Graph, SearchSnapshot, SortSnapshot, TraversalSnapshot};
use crate::scenario::{DisplayFrame, View};
use crate::structures::bst::{TreeSnapshot, TOP_MARGIN, V_SPACING};
use crate::structures::{SeqSnapshot, Shape};
use crate::ui::theme::DEFAULT_THEME;
use crate::{NodeId, Value};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph},
    Frame,
};

const CELL_WIDTH: usize = 6;

pub fn render_snapshot_pane(
    frame: &mut Frame,
    area: Rect,
    current: &DisplayFrame,
    graph: Option<&Graph>,
) {
    let block = pane_block(" Snapshot ", false).padding(Padding::new(1, 1, 1, 0));
    let width = area.width.saturating_sub(4) as usize;

    let lines = match &current.view {
        View::Row(snapshot) => row_lines(snapshot, &current.marks),
        View::Tree(snapshot) => tree_lines(snapshot, &current.marks, width),
        View::Search(snapshot) => search_lines(snapshot, &current.marks),
        View::Sort(snapshot) => sort_lines(snapshot, &current.marks),
        View::Traversal(snapshot) => traversal_lines(snapshot, &current.marks, graph),
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell(value: Option<Value>) -> String {
    match value {
        Some(value) => format!("[{:^4}]", value),
        None => "[    ]".to_string(),
    }
}

fn plain() -> Style {
    Style::default().fg(DEFAULT_THEME.fg)
}

fn dim() -> Style {
    Style::default().fg(DEFAULT_THEME.comment)
}

fn marked() -> Style {
    Style::default()
        .fg(DEFAULT_THEME.marked)
        .add_modifier(Modifier::BOLD)
}

fn is_marked(marks: &[i64], index: usize) -> bool {
    marks.contains(&(index as i64))
}

/// Index labels centred under cells separated by `gap` columns
fn index_line(len: usize, gap: usize) -> Line<'static> {
    let text: String = (0..len)
        .map(|index| format!("{:^width$}{}", index, " ".repeat(gap), width = CELL_WIDTH))
        .collect();
    Line::from(Span::styled(text, dim()))
}

fn row_lines(snapshot: &SeqSnapshot, marks: &[i64]) -> Vec<Line<'static>> {
    let connector = match snapshot.shape {
        Shape::Contiguous => " ",
        Shape::Singly | Shape::Circular => " → ",
        Shape::Doubly => " ⇄ ",
    };

    let capacity = match snapshot.capacity.limit() {
        Some(limit) => limit.to_string(),
        None => "∞".to_string(),
    };
    let occupied = snapshot.cells.iter().filter(|slot| slot.is_some()).count();
    let mut lines = vec![
        Line::from(Span::styled(format!("size {}/{}", occupied, capacity), dim())),
        Line::default(),
    ];

    let mut cells = Vec::new();
    if snapshot.shape != Shape::Contiguous && !snapshot.cells.is_empty() {
        cells.push(Span::styled("head ", dim()));
    }
    for (index, slot) in snapshot.cells.iter().enumerate() {
        if index > 0 {
            cells.push(Span::styled(connector, dim()));
        }
        let style = if is_marked(marks, index) {
            marked()
        } else if slot.is_none() {
            dim()
        } else {
            plain()
        };
        cells.push(Span::styled(cell(*slot), style));
    }
    match snapshot.shape {
        Shape::Circular if !snapshot.cells.is_empty() => {
            cells.push(Span::styled(" ↺ head", dim()))
        }
        Shape::Singly | Shape::Doubly if !snapshot.cells.is_empty() => {
            cells.push(Span::styled(" → null", dim()))
        }
        _ => {}
    }
    if snapshot.cells.is_empty() {
        cells.push(Span::styled("(empty)", dim()));
    }
    lines.push(Line::from(cells));

    if !snapshot.cells.is_empty() {
        let indent = if snapshot.shape == Shape::Contiguous { 0 } else { 5 };
        let mut labels = index_line(snapshot.cells.len(), connector.chars().count());
        labels.spans.insert(0, Span::raw(" ".repeat(indent)));
        lines.push(labels);
    }

    lines.push(Line::default());
    let in_flight = Style::default().fg(DEFAULT_THEME.in_flight);
    if let Some(lifted) = snapshot.lifted {
        lines.push(Line::from(Span::styled(
            format!("lifted {} from slot {}", lifted.value, lifted.from),
            in_flight,
        )));
    }
    if let Some(detached) = snapshot.detached {
        lines.push(Line::from(Span::styled(format!("detached {}", detached), in_flight)));
    }
    lines
}

fn depth_of(y: f64) -> usize {
    ((y - TOP_MARGIN) / V_SPACING).round().max(0.0) as usize
}

/// Place text fragments at columns, left to right
fn place(mut items: Vec<(usize, String, Style)>) -> Line<'static> {
    items.sort_by_key(|(column, _, _)| *column);
    let mut spans = Vec::new();
    let mut cursor = 0;
    for (column, text, style) in items {
        let column = column.max(cursor);
        if column > cursor {
            spans.push(Span::raw(" ".repeat(column - cursor)));
        }
        cursor = column + text.chars().count();
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn tree_lines(snapshot: &TreeSnapshot, marks: &[i64], width: usize) -> Vec<Line<'static>> {
    if snapshot.nodes.is_empty() {
        return vec![Line::from(Span::styled("(empty tree)", dim()))];
    }

    let min_x = snapshot.nodes.iter().map(|node| node.x).fold(f64::INFINITY, f64::min);
    let max_x = snapshot
        .nodes
        .iter()
        .map(|node| node.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = (max_x - min_x).max(1.0);
    let usable = width.saturating_sub(CELL_WIDTH).max(1) as f64;
    let column = |x: f64| ((x - min_x) / span * usable).round() as usize;

    let depth = snapshot
        .nodes
        .iter()
        .map(|node| depth_of(node.y))
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for level in 0..=depth {
        let row: Vec<_> = snapshot
            .nodes
            .iter()
            .filter(|node| depth_of(node.y) == level)
            .collect();

        if level > 0 {
            let edges = row
                .iter()
                .filter_map(|node| {
                    let parent = snapshot.node(node.parent?)?;
                    let (from, to) = (column(parent.x), column(node.x));
                    let glyph = if to < from { "/" } else { "\\" };
                    Some(((from + to) / 2 + 2, glyph.to_string(), dim()))
                })
                .collect();
            lines.push(place(edges));
        }

        let values = row
            .iter()
            .map(|node| {
                let style = if marks.contains(&node.value) {
                    marked()
                } else {
                    plain()
                };
                (column(node.x), format!("({})", node.value), style)
            })
            .collect();
        lines.push(place(values));
    }

    lines.push(Line::default());
    if let Some(root) = snapshot.root.and_then(|root| snapshot.node(root)) {
        lines.push(Line::from(Span::styled(
            format!("root {} at ({:.0}, {:.0})", root.value, root.x, root.y),
            dim(),
        )));
    }
    lines
}

fn search_lines(snapshot: &SearchSnapshot, marks: &[i64]) -> Vec<Line<'static>> {
    let in_window = |index: usize| match (snapshot.low, snapshot.high) {
        (Some(low), Some(high)) => (low..=high).contains(&index),
        (Some(_), None) => false,
        _ => true,
    };

    let cells: Vec<Span> = snapshot
        .values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let style = if is_marked(marks, index) || snapshot.cursor == Some(index) {
                marked()
            } else if in_window(index) {
                plain()
            } else {
                dim()
            };
            Span::styled(format!("{} ", cell(Some(value))), style)
        })
        .collect();

    let mut lines = vec![
        Line::from(cells),
        index_line(snapshot.values.len(), 1),
        Line::default(),
    ];
    if let (Some(low), Some(high)) = (snapshot.low, snapshot.high) {
        lines.push(Line::from(Span::styled(
            format!("window {}..={}", low, high),
            Style::default().fg(DEFAULT_THEME.secondary),
        )));
    }
    lines
}

fn sort_lines(snapshot: &SortSnapshot, marks: &[i64]) -> Vec<Line<'static>> {
    let len = snapshot.values.len();
    let settled = |index: usize| {
        index < snapshot.sorted_prefix || index >= len.saturating_sub(snapshot.sorted_suffix)
    };

    let cells: Vec<Span> = snapshot
        .values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let (text, style) = if snapshot.hole == Some(index) {
                (cell(None), Style::default().fg(DEFAULT_THEME.in_flight))
            } else if is_marked(marks, index) {
                (cell(Some(value)), marked())
            } else if settled(index) {
                (cell(Some(value)), Style::default().fg(DEFAULT_THEME.settled))
            } else {
                (cell(Some(value)), plain())
            };
            Span::styled(format!("{} ", text), style)
        })
        .collect();

    let mut lines = vec![Line::from(cells), index_line(len, 1), Line::default()];
    if let Some(key) = snapshot.key {
        lines.push(Line::from(Span::styled(
            format!("key {}", key),
            Style::default().fg(DEFAULT_THEME.in_flight),
        )));
    }
    lines
}

fn node_list(nodes: &[NodeId]) -> String {
    let names: Vec<String> = nodes.iter().map(NodeId::to_string).collect();
    format!("[{}]", names.join(", "))
}

fn traversal_lines(
    snapshot: &TraversalSnapshot,
    marks: &[i64],
    graph: Option<&Graph>,
) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!("{:<10}", text), dim());
    let mut lines = vec![
        Line::from(vec![
            label("frontier"),
            Span::styled(node_list(&snapshot.frontier), Style::default().fg(DEFAULT_THEME.secondary)),
        ]),
        Line::from(vec![
            label("visited"),
            Span::styled(node_list(&snapshot.visited), Style::default().fg(DEFAULT_THEME.settled)),
        ]),
        Line::from(vec![
            label("current"),
            Span::styled(
                snapshot.current.map_or("-".to_string(), |node| node.to_string()),
                marked(),
            ),
        ]),
    ];
    if !snapshot.explored.is_empty() {
        let edges: Vec<String> = snapshot
            .explored
            .iter()
            .map(|(from, to)| format!("{}→{}", from, to))
            .collect();
        lines.push(Line::from(vec![
            label("edges"),
            Span::styled(edges.join(" "), plain()),
        ]));
    }

    let Some(graph) = graph else {
        return lines;
    };
    lines.push(Line::default());
    let style_of = |node: NodeId| {
        if snapshot.current == Some(node) || marks.contains(&i64::from(node)) {
            marked()
        } else if snapshot.visited.contains(&node) {
            Style::default().fg(DEFAULT_THEME.settled)
        } else if snapshot.frontier.contains(&node) {
            Style::default().fg(DEFAULT_THEME.secondary)
        } else {
            plain()
        }
    };
    for node in graph.nodes() {
        let mut spans = vec![
            Span::styled(format!("{:>3}", node), style_of(node)),
            Span::styled(" : ", dim()),
        ];
        for &neighbor in graph.neighbors(node) {
            spans.push(Span::styled(format!("{} ", neighbor), style_of(neighbor)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn placed_fragments_never_overlap() {
        let line = place(vec![
            (4, "(30)".to_string(), plain()),
            (0, "(20)".to_string(), plain()),
            (5, "(40)".to_string(), plain()),
        ]);
        assert_eq!(text(&line), "(20)(30)(40)");
    }

    #[test]
    fn tree_rows_follow_depth() {
        let mut engine = crate::structures::BstEngine::new(200.0).unwrap();
        for value in [50, 30, 70] {
            engine.insert(value).unwrap();
        }
        let lines = tree_lines(&engine.state(), &[], 40);
        let rows: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rows[0].trim(), "(50)");
        assert!(rows[1].trim_start().starts_with('/') && rows[1].trim_end().ends_with('\\'));
        assert!(rows[2].contains("(30)") && rows[2].contains("(70)"));
    }
}
