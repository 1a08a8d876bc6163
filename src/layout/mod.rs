//! Column assignment for graph nodes and draw instructions for the edges between them.

mod color;

pub use color::{ColorMap, EdgeColor, assign_colors};

use std::fmt;
use std::mem;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseOptionError;
use crate::graph::{CommitGraphNode, NodeId};

/// How a new parent line picks its column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParentLineCreation {
    /// Never share a column with another line; take the leftmost empty column
    #[default]
    New,
    /// Join a line already heading to the same parent when there is one
    Existing,
    /// Whichever is further left: a line to the same parent or an empty column
    Leftmost,
}

/// How a node picks its column among the lines that arrive at it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeCreation {
    /// Sit on the leftmost arriving line
    #[default]
    Existing,
    /// Sit on the leftmost arriving line or the leftmost empty column, whichever is further left
    Leftmost,
}

impl FromStr for ParentLineCreation {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ParentLineCreation::New),
            "existing" => Ok(ParentLineCreation::Existing),
            "leftmost" => Ok(ParentLineCreation::Leftmost),
            other => Err(ParseOptionError::new("parentLineCreation", other)),
        }
    }
}

impl FromStr for NodeCreation {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "existing" => Ok(NodeCreation::Existing),
            "leftmost" => Ok(NodeCreation::Leftmost),
            other => Err(ParseOptionError::new("nodeCreation", other)),
        }
    }
}

impl fmt::Display for ParentLineCreation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentLineCreation::New => "new",
            ParentLineCreation::Existing => "existing",
            ParentLineCreation::Leftmost => "leftmost",
        };
        f.write_str(name)
    }
}

impl fmt::Display for NodeCreation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeCreation::Existing => "existing",
            NodeCreation::Leftmost => "leftmost",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub parent_line_creation: ParentLineCreation,
    pub node_creation: NodeCreation,
}

/// Column search policy shared by node placement and line creation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnPreference {
    New,
    Existing,
    Leftmost,
}

impl From<ParentLineCreation> for ColumnPreference {
    fn from(value: ParentLineCreation) -> Self {
        match value {
            ParentLineCreation::New => ColumnPreference::New,
            ParentLineCreation::Existing => ColumnPreference::Existing,
            ParentLineCreation::Leftmost => ColumnPreference::Leftmost,
        }
    }
}

impl From<NodeCreation> for ColumnPreference {
    fn from(value: NodeCreation) -> Self {
        match value {
            NodeCreation::Existing => ColumnPreference::Existing,
            NodeCreation::Leftmost => ColumnPreference::Leftmost,
        }
    }
}

/// One step of an edge's route, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathInstruction {
    /// Origin at the child node
    Start { column: usize, row: usize },
    /// One row further down in the current column
    Continue,
    /// Move to another column during the next row step
    Branch { column: usize },
    /// Reached the parent node
    End,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: usize,
    pub from: NodeId,
    pub to: NodeId,
    pub path: Vec<PathInstruction>,
}

/// Result of [`ColumnLayoutEngine::build`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLayout {
    /// Indexed by node id
    pub node_columns: Vec<usize>,
    /// In creation order: by child node, then by reconciled parent order
    pub edges: Vec<LayoutEdge>,
    /// Number of column slots the layout ever needed
    pub column_count: usize,
}

impl GraphLayout {
    pub fn column_of(&self, node: NodeId) -> Option<usize> {
        self.node_columns.get(node).copied()
    }

    /// Highest column any node sits in
    pub fn max_node_column(&self) -> usize {
        self.node_columns.iter().copied().max().unwrap_or(0)
    }
}

/// Assigns columns in a single top-to-bottom pass.
///
/// Each column slot owns the edges currently passing through it, as indices into
/// the edge table. An edge lives in exactly one slot from its creation until the
/// row of its parent node.
pub struct ColumnLayoutEngine {
    options: LayoutOptions,
    columns: Vec<Vec<usize>>,
    edges: Vec<LayoutEdge>,
}

impl ColumnLayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            columns: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Lay out nodes ordered by id, where each node's id is its index.
    /// Parents must come after their children.
    pub fn build(&mut self, nodes: &[CommitGraphNode]) -> GraphLayout {
        self.columns.clear();
        self.edges.clear();

        let mut node_columns = Vec::with_capacity(nodes.len());
        for node in nodes {
            // Step 1: place the node
            let column =
                self.find_or_create_column(self.options.node_creation.into(), node.id, None);

            // Step 2: lines arriving at this node end here
            self.end_arriving_edges(node.id, column);

            // Step 3: anything else in the node's column moves aside
            self.displace_edges(column);

            // Step 4: everything still in flight passes through this row
            self.continue_edges();

            // Step 5: open a line per parent, first parent first
            self.start_parent_edges(node, column);

            node_columns.push(column);
        }

        tracing::trace!(
            nodes = nodes.len(),
            columns = self.columns.len(),
            "built column layout"
        );

        GraphLayout {
            node_columns,
            edges: mem::take(&mut self.edges),
            column_count: self.columns.len(),
        }
    }

    /// Lowest-numbered empty column, skipping `reserved`
    fn leftmost_empty_column(&self, reserved: Option<usize>) -> Option<usize> {
        (0..self.columns.len()).find(|&c| Some(c) != reserved && self.columns[c].is_empty())
    }

    /// Lowest-numbered column with a line heading to `target`, skipping `reserved`
    fn leftmost_column_to(&self, target: NodeId, reserved: Option<usize>) -> Option<usize> {
        (0..self.columns.len()).find(|&c| {
            Some(c) != reserved && self.columns[c].iter().any(|&e| self.edges[e].to == target)
        })
    }

    fn find_or_create_column(
        &mut self,
        preference: ColumnPreference,
        target: NodeId,
        reserved: Option<usize>,
    ) -> usize {
        let empty = self.leftmost_empty_column(reserved);
        let chosen = match preference {
            ColumnPreference::New => empty,
            ColumnPreference::Existing => self.leftmost_column_to(target, reserved).or(empty),
            ColumnPreference::Leftmost => match (self.leftmost_column_to(target, reserved), empty) {
                (Some(existing), Some(empty)) => Some(existing.min(empty)),
                (existing, empty) => existing.or(empty),
            },
        };

        chosen.unwrap_or_else(|| {
            self.columns.push(Vec::new());
            self.columns.len() - 1
        })
    }

    fn end_arriving_edges(&mut self, node: NodeId, node_column: usize) {
        let edges = &mut self.edges;
        for (column, slot) in self.columns.iter_mut().enumerate() {
            let (arriving, staying): (Vec<usize>, Vec<usize>) =
                mem::take(slot).into_iter().partition(|&e| edges[e].to == node);
            *slot = staying;

            for e in arriving {
                let path = &mut edges[e].path;
                if column != node_column {
                    path.push(PathInstruction::Branch {
                        column: node_column,
                    });
                }
                path.push(PathInstruction::Continue);
                path.push(PathInstruction::End);
            }
        }
    }

    fn displace_edges(&mut self, node_column: usize) {
        let displaced = mem::take(&mut self.columns[node_column]);
        for e in displaced {
            let target = self.edges[e].to;
            let column = self.find_or_create_column(
                self.options.parent_line_creation.into(),
                target,
                Some(node_column),
            );
            self.edges[e].path.push(PathInstruction::Branch { column });
            self.columns[column].push(e);
        }
    }

    fn continue_edges(&mut self) {
        for slot in &self.columns {
            for &e in slot {
                self.edges[e].path.push(PathInstruction::Continue);
            }
        }
    }

    fn start_parent_edges(&mut self, node: &CommitGraphNode, node_column: usize) {
        for &parent in &node.parents {
            let column =
                self.find_or_create_column(self.options.parent_line_creation.into(), parent, None);

            let mut path = vec![PathInstruction::Start {
                column: node_column,
                row: node.id,
            }];
            if column != node_column {
                path.push(PathInstruction::Branch { column });
            }

            let id = self.edges.len();
            self.edges.push(LayoutEdge {
                id,
                from: node.id,
                to: parent,
                path,
            });
            self.columns[column].push(id);
        }
    }
}
