//! The full text-to-geometry pipeline.

use serde::Serialize;

use crate::config::Config;
use crate::graph::{CommitGraph, NodeData, NodeId, parse_graph_text, reconcile};
use crate::layout::{ColorMap, ColumnLayoutEngine, GraphLayout, assign_colors};
use crate::render::{EdgeToDraw, NodeToDraw, PathRenderer};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    #[serde(flatten)]
    pub draw: NodeToDraw,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

/// Everything a UI needs to draw the graph
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRender {
    /// Highest column used by any node or edge, for sizing the canvas
    pub max_column: usize,
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<EdgeToDraw>,
}

/// Intermediate results of every stage, for callers that need more than the drawing
#[derive(Clone, Debug, Default)]
pub struct GraphStages {
    pub graph: CommitGraph,
    pub layout: GraphLayout,
    pub colors: ColorMap,
}

/// Parse, reconcile, lay out and color
pub fn build_stages(text: &str, config: &Config) -> GraphStages {
    let parsed = parse_graph_text(text);
    let graph = reconcile(&parsed);
    let layout = ColumnLayoutEngine::new(config.layout).build(&graph.nodes);
    let colors = assign_colors(&graph.nodes);

    GraphStages {
        graph,
        layout,
        colors,
    }
}

/// Run the whole pipeline on one block of `jj log` graph text
pub fn render_graph(text: &str, config: &Config) -> GraphRender {
    let GraphStages {
        graph,
        layout,
        colors,
    } = build_stages(text, config);

    let renderer = PathRenderer::new(config.path);
    let nodes_to_draw = renderer.render_nodes(&graph, &layout, &colors);
    let (edges, max_edge_column) = renderer.render_edges(&layout, &colors);

    let nodes = graph
        .nodes
        .into_iter()
        .zip(nodes_to_draw)
        .map(|(node, draw)| RenderedNode {
            draw,
            parents: node.parents,
            children: node.children,
            data: node.data,
        })
        .collect();

    GraphRender {
        max_column: layout.max_node_column().max(max_edge_column),
        nodes,
        edges,
    }
}
