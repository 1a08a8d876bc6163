//! Turns the raw skeleton into commit nodes whose parent order follows the
//! parent ids declared in each node's metadata.
//!
//! Text adjacency does not say which parent is the first parent, and the first
//! parent decides both the straight-down line in the layout and the branch color.

use serde::Serialize;

use super::commit::NodeData;
use super::text_parser::ParsedGraph;

/// Node id, equal to the normalized row
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitGraphNode {
    pub id: NodeId,
    pub data: NodeData,
    pub glyph: char,
    /// Ordered: first parent first
    pub parents: Vec<NodeId>,
    /// Unordered
    pub children: Vec<NodeId>,
}

impl CommitGraphNode {
    pub fn first_parent(&self) -> Option<NodeId> {
        self.parents.first().copied()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitGraph {
    /// Indexed by node id
    pub nodes: Vec<CommitGraphNode>,
    /// `(child, parent)` pairs, grouped by child in node order, parents in reconciled order
    pub directed_edges: Vec<(NodeId, NodeId)>,
}

/// Decode every payload and put each commit's parents in declared order
pub fn reconcile(parsed: &ParsedGraph) -> CommitGraph {
    let mut nodes: Vec<CommitGraphNode> = parsed
        .nodes
        .iter()
        .map(|raw| CommitGraphNode {
            id: raw.normalized_row,
            data: NodeData::from_payload(&raw.payload),
            glyph: raw.glyph,
            parents: raw.parents.iter().copied().collect(),
            children: raw.children.iter().copied().collect(),
        })
        .collect();
    nodes.sort_by_key(|n| n.id);

    for index in 0..nodes.len() {
        let Some(metadata) = nodes[index].data.metadata() else {
            continue;
        };
        let graph_parents = &nodes[index].parents;
        let graph_parent_ids: Vec<&str> = graph_parents
            .iter()
            .map(|&parent| nodes[parent].data.commit_id())
            .collect();

        let ordered = reorder_parents(graph_parents, &graph_parent_ids, &metadata.parents);
        nodes[index].parents = ordered;
    }

    let directed_edges = nodes
        .iter()
        .flat_map(|node| node.parents.iter().map(move |&parent| (node.id, parent)))
        .collect();

    CommitGraph {
        nodes,
        directed_edges,
    }
}

/// Slot `i` takes the graph parent whose id is `declared[i]`. Unmatched slots are
/// backfilled from the unclaimed graph parents in their original order, and graph
/// parents nobody claimed go last. Declared parents with nothing left to backfill
/// them (parents outside the visible log) are dropped.
fn reorder_parents(graph_parents: &[NodeId], graph_parent_ids: &[&str], declared: &[String]) -> Vec<NodeId> {
    let mut unclaimed: Vec<Option<&str>> = graph_parent_ids.iter().copied().map(Some).collect();

    let mut slots: Vec<Option<NodeId>> = declared
        .iter()
        .map(|id| {
            let index = unclaimed.iter().position(|c| *c == Some(id.as_str()))?;
            unclaimed[index] = None;
            Some(graph_parents[index])
        })
        .collect();

    for slot in slots.iter_mut().filter(|s| s.is_none()) {
        if let Some(index) = unclaimed.iter().position(Option::is_some) {
            unclaimed[index] = None;
            *slot = Some(graph_parents[index]);
        }
    }

    let mut ordered: Vec<NodeId> = slots.into_iter().flatten().collect();
    for &parent in graph_parents {
        if !ordered.contains(&parent) {
            ordered.push(parent);
        }
    }
    ordered
}
