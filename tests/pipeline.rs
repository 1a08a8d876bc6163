use std::collections::BTreeSet;

use proptest::prelude::*;

use jj_log_graph::config::Config;
use jj_log_graph::graph::{NodeData, parse_graph_text};
use jj_log_graph::layout::{GraphLayout, LayoutOptions, NodeCreation, ParentLineCreation, PathInstruction};
use jj_log_graph::pipeline::build_stages;
use jj_log_graph::render_graph;

/// A merge of two branches off an immutable base, as `jj log` prints it
const MERGE_LOG: &str = r#"@  {"commitId": "a1", "changeId": "zz", "parents": ["b2"], "isWorkingCopy": true}
○    {"commitId": "b2", "parents": ["c3", "d4"], "description": "merge feature\n"}
├─╮
│ ○  {"commitId": "d4", "parents": ["e5"]}
○ │  {"commitId": "c3", "parents": ["e5"]}
├─╯
◆  {"commitId": "e5", "parents": ["f6"], "isImmutable": true}
~  (elided revisions)
"#;

#[test]
fn single_linear_chain() {
    let config = Config::default();
    let stages = build_stages("@  aaa\n○  bbb\n○  ccc\n", &config);

    assert_eq!(stages.layout.node_columns, vec![0, 0, 0]);
    assert_eq!(stages.layout.edges.len(), 2);
    for edge in &stages.layout.edges {
        assert_eq!(
            edge.path,
            vec![
                PathInstruction::Start { column: 0, row: edge.from },
                PathInstruction::Continue,
                PathInstruction::End,
            ]
        );
    }
    assert_eq!(stages.colors.color_count(), 1);
    assert!(stages.colors.edge_colors.iter().all(|e| e.color == 0));
}

#[test]
fn merge_reconciles_parent_order() {
    let stages = build_stages(MERGE_LOG, &Config::default());
    let nodes = &stages.graph.nodes;

    assert_eq!(nodes.len(), 6);
    // d4 sits left of c3 in the text order of rows, but c3 is the declared first parent
    assert_eq!(nodes[1].parents, vec![3, 2]);
    // e5's declared parent is hidden behind the elided node, which backfills the slot
    assert_eq!(nodes[4].parents, vec![5]);
    assert_eq!(nodes[5].data, NodeData::Elided);
}

#[test]
fn merge_layout_and_colors() {
    let stages = build_stages(MERGE_LOG, &Config::default());

    assert_eq!(stages.layout.node_columns, vec![0, 0, 1, 0, 0, 0]);

    // second parent edge of the merge branches out into column 1
    let merge_edge = &stages.layout.edges[2];
    assert_eq!((merge_edge.from, merge_edge.to), (1, 2));
    assert!(merge_edge.path.contains(&PathInstruction::Branch { column: 1 }));

    // the first-parent chain keeps one color, the merged branch has another
    assert_eq!(stages.colors.node_colors, vec![0, 0, 1, 0, 0, 0]);
    let first = stages.colors.edge_colors[1];
    let second = stages.colors.edge_colors[2];
    assert_eq!((first.from, first.to, first.color), (1, 3, 0));
    assert_eq!((second.from, second.to, second.color), (1, 2, 1));
}

#[test]
fn rendered_output_shape() {
    let render = render_graph(MERGE_LOG, &Config::default());

    assert_eq!(render.max_column, 1);
    assert_eq!(render.nodes.len(), 6);
    assert_eq!(render.edges.len(), 6);

    let merge_node = &render.nodes[1];
    assert_eq!((merge_node.draw.x, merge_node.draw.y), (12.0, 36.0));
    assert_eq!(merge_node.parents, vec![3, 2]);
    assert_eq!(
        merge_node.data.metadata().map(|m| m.summary()),
        Some("merge feature")
    );

    // d4 -> e5 comes back from column 1 to column 0
    let edge = &render.edges[3];
    assert_eq!((edge.from, edge.to), (2, 4));
    assert_eq!(edge.path_data, "M36,60 v24 v3 q0,9 -9,9 h-3 h-3 q-9,0 -9,9 v3");

    let json = serde_json::to_value(&render).unwrap();
    assert_eq!(json["maxColumn"], 1);
    assert_eq!(json["nodes"][0]["glyph"], "@");
    assert_eq!(json["nodes"][0]["data"]["type"], "commit");
    assert_eq!(json["nodes"][0]["data"]["isWorkingCopy"], true);
    assert_eq!(json["nodes"][5]["data"]["type"], "elided");
    assert!(json["edges"][0]["d"].is_string());
}

#[test]
fn elided_node_keeps_graph_parents() {
    let text = "\
~    (elided revisions)
├─╮
│ ○  bbb
○ │  ccc
├─╯
○  ddd
";
    let stages = build_stages(text, &Config::default());
    let elided = &stages.graph.nodes[0];

    assert_eq!(elided.data, NodeData::Elided);
    assert!(elided.data.metadata().is_none());
    assert_eq!(elided.parents, vec![1, 2]);
}

#[test]
fn policies_change_layout_but_not_colors() {
    let text = "\
@  aaa
│ ○  bbb
├─╯
○  ccc
";
    let new = build_stages(text, &Config::default());
    let existing = build_stages(
        text,
        &Config {
            layout: LayoutOptions {
                parent_line_creation: ParentLineCreation::Existing,
                node_creation: NodeCreation::Existing,
            },
            ..Config::default()
        },
    );

    assert_eq!(new.layout.node_columns, existing.layout.node_columns);
    assert_eq!(new.layout.column_count, 2);
    assert_eq!(new.colors, existing.colors);
    // under `existing`, bbb's line joins aaa's line immediately
    assert_eq!(
        existing.layout.edges[1].path,
        vec![
            PathInstruction::Start { column: 1, row: 1 },
            PathInstruction::Branch { column: 0 },
            PathInstruction::Continue,
            PathInstruction::End,
        ]
    );
}

/// Most edges in flight across any one row
fn max_open_edges(layout: &GraphLayout) -> usize {
    (0..layout.node_columns.len())
        .map(|row| {
            layout
                .edges
                .iter()
                .filter(|e| e.from <= row && row < e.to)
                .count()
        })
        .max()
        .unwrap_or(0)
}

fn graph_line() -> impl Strategy<Value = String> {
    let glyphs = prop::collection::vec(
        prop::sample::select(vec![
            ' ', ' ', '─', '│', '│', '╷', '╯', '╰', '┴', '╮', '╭', '┬', '┤', '├', '┼', '@', '○', '◆', '~',
        ]),
        0..8,
    );
    let payload = prop::sample::select(vec![
        "",
        "0a1b",
        "(elided revisions)",
        r#"{"commitId": "0a1b", "parents": ["2c3d", "4e5f"]}"#,
        r#"{"commitId": "2c3d", "parents": []}"#,
        "{broken",
    ]);
    (glyphs, payload).prop_map(|(glyphs, payload)| {
        let mut line: String = glyphs.into_iter().collect();
        line.push_str(payload);
        line
    })
}

fn graph_text() -> impl Strategy<Value = String> {
    prop::collection::vec(graph_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

fn any_options() -> impl Strategy<Value = LayoutOptions> {
    (
        prop::sample::select(vec![
            ParentLineCreation::New,
            ParentLineCreation::Existing,
            ParentLineCreation::Leftmost,
        ]),
        prop::sample::select(vec![NodeCreation::Existing, NodeCreation::Leftmost]),
    )
        .prop_map(|(parent_line_creation, node_creation)| LayoutOptions {
            parent_line_creation,
            node_creation,
        })
}

proptest! {
    #[test]
    fn rendering_is_deterministic(text in graph_text(), layout in any_options()) {
        let config = Config { layout, ..Config::default() };
        prop_assert_eq!(render_graph(&text, &config), render_graph(&text, &config));
    }

    #[test]
    fn rows_and_columns_are_dense(text in graph_text()) {
        let parsed = parse_graph_text(&text);

        for (i, node) in parsed.nodes.iter().enumerate() {
            prop_assert_eq!(node.normalized_row, i);
            prop_assert!(node.parents.iter().all(|&p| p > i && p < parsed.nodes.len()));
            prop_assert!(node.children.iter().all(|&c| c < i));
        }

        let columns: BTreeSet<usize> = parsed.nodes.iter().map(|n| n.normalized_column).collect();
        let expected: BTreeSet<usize> = (0..columns.len()).collect();
        prop_assert_eq!(columns, expected);
    }

    #[test]
    fn every_edge_starts_and_ends(text in graph_text(), layout in any_options()) {
        let config = Config { layout, ..Config::default() };
        let stages = build_stages(&text, &config);

        prop_assert_eq!(stages.layout.edges.len(), stages.graph.directed_edges.len());
        for edge in &stages.layout.edges {
            let starts = matches!(edge.path.first(), Some(PathInstruction::Start { .. }));
            prop_assert!(starts);
            prop_assert_eq!(edge.path.last(), Some(&PathInstruction::End));
        }
    }

    #[test]
    fn first_parent_chains_keep_their_color(text in graph_text()) {
        let stages = build_stages(&text, &Config::default());
        let nodes = &stages.graph.nodes;
        let colors = &stages.colors;

        for node in nodes {
            let Some(parent) = node.first_parent() else {
                continue;
            };
            let color = colors.node_colors[node.id];

            let edge = colors
                .edge_colors
                .iter()
                .find(|e| e.from == node.id && e.to == parent);
            prop_assert_eq!(edge.map(|e| e.color), Some(color));

            let first_parent_children: Vec<usize> = nodes[parent]
                .children
                .iter()
                .copied()
                .filter(|&c| nodes[c].first_parent() == Some(parent))
                .collect();
            if first_parent_children == [node.id] {
                prop_assert_eq!(colors.node_colors[parent], color);
            }
        }
    }

    #[test]
    fn columns_never_exceed_open_edges(text in graph_text(), layout in any_options()) {
        let config = Config { layout, ..Config::default() };
        let stages = build_stages(&text, &config);
        let highest = stages.layout.column_count.saturating_sub(1);
        prop_assert!(highest <= max_open_edges(&stages.layout));
    }
}
