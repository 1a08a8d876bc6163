//! Branch color assignment by first-parent chains.

use serde::Serialize;

use crate::graph::{CommitGraphNode, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeColor {
    pub from: NodeId,
    pub to: NodeId,
    pub color: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMap {
    /// Indexed by node id
    pub node_colors: Vec<usize>,
    /// Same order as the directed edges: by child node, then by parent order
    pub edge_colors: Vec<EdgeColor>,
}

impl ColorMap {
    pub fn node_color(&self, node: NodeId) -> Option<usize> {
        self.node_colors.get(node).copied()
    }

    /// Number of distinct color indices handed out
    pub fn color_count(&self) -> usize {
        self.node_colors.iter().max().map_or(0, |max| max + 1)
    }
}

/// Color every node and edge. Nodes are expected ordered by id with children first;
/// other orders still get colors but lose first-parent inheritance.
///
/// A node takes the smallest color among the children whose first parent it is,
/// so a branch keeps one color down its first-parent chain. Heads and nodes that
/// are nobody's first parent start a new color. The edge to a first parent carries
/// the child's color; merge edges carry the color of the branch being merged in.
pub fn assign_colors(nodes: &[CommitGraphNode]) -> ColorMap {
    let mut node_colors: Vec<usize> = Vec::with_capacity(nodes.len());
    let mut next_color = 0;

    for node in nodes {
        // children not colored yet (out-of-order input) are skipped
        let inherited = node
            .children
            .iter()
            .filter(|&&child| nodes.get(child).and_then(CommitGraphNode::first_parent) == Some(node.id))
            .filter_map(|&child| node_colors.get(child).copied())
            .min();

        let color = inherited.unwrap_or_else(|| {
            next_color += 1;
            next_color - 1
        });
        node_colors.push(color);
    }

    let edge_colors = nodes
        .iter()
        .flat_map(|node| {
            let node_colors = &node_colors;
            let child_color = node_colors.get(node.id).copied().unwrap_or(0);
            node.parents.iter().enumerate().map(move |(i, &parent)| EdgeColor {
                from: node.id,
                to: parent,
                color: match i {
                    0 => child_color,
                    _ => node_colors.get(parent).copied().unwrap_or(child_color),
                },
            })
        })
        .collect();

    ColorMap {
        node_colors,
        edge_colors,
    }
}
