//! Decodes `jj log --graph` style text into a raw node/edge skeleton.
//!
//! Every line is split into a graph part (connector glyphs) and a data part (the
//! payload). Connectors are followed row by row to work out which earlier node rows
//! are still "active" in each column; when a node glyph shows up, the active rows in
//! its column become its children.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::glyph::{Glyph, is_graph_termination};

/// A node as read from the text, before any payload decoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawGraphNode {
    /// Line index in the input text
    pub row: usize,
    /// Dense row index (0..N) once blank and connector-only lines are dropped
    pub normalized_row: usize,
    /// Character column of the node glyph in its line
    pub column: usize,
    /// Dense column index over the columns that hold at least one node
    pub normalized_column: usize,
    /// Normalized rows of this node's parents (always later rows)
    pub parents: BTreeSet<usize>,
    /// Normalized rows of this node's children (always earlier rows)
    pub children: BTreeSet<usize>,
    pub glyph: char,
    /// Everything from the first payload character to the end of the line, untrimmed
    pub payload: String,
}

/// Output of [`parse_graph_text`]
#[derive(Clone, Debug, Default)]
pub struct ParsedGraph {
    /// Nodes ordered by normalized row; `nodes[i].normalized_row == i`
    pub nodes: Vec<RawGraphNode>,
    /// Original line index to position in `nodes`
    pub original_row_index: BTreeMap<usize, usize>,
}

impl ParsedGraph {
    pub fn node_at_original_row(&self, row: usize) -> Option<&RawGraphNode> {
        self.original_row_index.get(&row).map(|&i| &self.nodes[i])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Split a line at the first payload character
fn split_line(line: &str) -> (&str, &str) {
    match line.char_indices().find(|(_, c)| is_graph_termination(*c)) {
        Some((index, _)) => line.split_at(index),
        None => (line, ""),
    }
}

/// Parse a whole graph text block. Never fails: unknown characters in the graph
/// part are taken to be node glyphs.
pub fn parse_graph_text(text: &str) -> ParsedGraph {
    let mut nodes: Vec<RawGraphNode> = Vec::new();
    let mut original_row_index: BTreeMap<usize, usize> = BTreeMap::new();
    // column -> rows whose parent line currently runs through that column
    let mut active_children: HashMap<usize, BTreeSet<usize>> = HashMap::new();
    let mut graph_part_max_len = 0;

    for (row, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (graph_part, data_part) = split_line(line);

        // Short lines are padded with spaces so trailing columns terminate
        let mut glyphs: Vec<Glyph> = graph_part.chars().map(Glyph::classify).collect();
        if glyphs.len() < graph_part_max_len {
            glyphs.resize(graph_part_max_len, Glyph::Space);
        }
        graph_part_max_len = graph_part_max_len.max(glyphs.len());

        let mut node_at: Option<(usize, char)> = None;
        let mut horizontal_bus = 0usize;
        let mut column_bus: Vec<usize> = Vec::with_capacity(glyphs.len());
        let mut bus_children: HashMap<usize, BTreeSet<usize>> = HashMap::new();

        for (column, glyph) in glyphs.iter().copied().enumerate() {
            if let Some(c) = glyph.node_char() {
                node_at = Some((column, c));
            }

            column_bus.push(horizontal_bus);

            // The next glyph is not horizontally linked to this one
            if !glyph.is_horizontal() {
                horizontal_bus += 1;
            }

            if glyph.is_child() {
                let pending = bus_children.entry(horizontal_bus).or_default();
                if let Some(children) = active_children.get(&column) {
                    pending.extend(children.iter().copied());
                }
            }
        }

        for (column, glyph) in glyphs.iter().copied().enumerate() {
            if glyph.is_parent() {
                let mut propagated = bus_children
                    .get(&column_bus[column])
                    .cloned()
                    .unwrap_or_default();
                if let Some(children) = active_children.get(&column) {
                    propagated.extend(children.iter().copied());
                }
                active_children.insert(column, propagated);
            }

            if glyph.terminates_propagation() {
                active_children.remove(&column);
            }
        }

        let Some((column, glyph)) = node_at else {
            continue;
        };

        let children = active_children.remove(&column).unwrap_or_default();
        for child in &children {
            if let Some(&index) = original_row_index.get(child) {
                nodes[index].parents.insert(row);
            }
        }

        original_row_index.insert(row, nodes.len());
        nodes.push(RawGraphNode {
            row,
            normalized_row: row,
            column,
            normalized_column: column,
            parents: BTreeSet::new(),
            children,
            glyph,
            payload: data_part.to_string(),
        });
        active_children.insert(column, BTreeSet::from([row]));
    }

    normalize(&mut nodes);

    tracing::trace!(nodes = nodes.len(), "parsed graph text");

    ParsedGraph {
        nodes,
        original_row_index,
    }
}

/// Renumber rows and columns densely, rewriting every parent/child reference
fn normalize(nodes: &mut [RawGraphNode]) {
    let rows: BTreeSet<usize> = nodes.iter().map(|n| n.row).collect();
    let columns: BTreeSet<usize> = nodes.iter().map(|n| n.column).collect();

    let row_map: HashMap<usize, usize> = rows.into_iter().enumerate().map(|(i, r)| (r, i)).collect();
    let column_map: HashMap<usize, usize> =
        columns.into_iter().enumerate().map(|(i, c)| (c, i)).collect();

    for node in nodes.iter_mut() {
        node.normalized_row = row_map[&node.row];
        node.normalized_column = column_map[&node.column];
        node.parents = node.parents.iter().map(|r| row_map[r]).collect();
        node.children = node.children.iter().map(|r| row_map[r]).collect();
    }
}
