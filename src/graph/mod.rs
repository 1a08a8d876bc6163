//! Graph text decoding: glyph parsing, payload decoding and parent reconciliation

mod commit;
mod diff_summary;
pub mod glyph;
mod reconcile;
mod text_parser;

pub use commit::{CommitMetadata, ELIDED_REVISIONS, NodeData, RefName, Signature, UNKNOWN_COMMIT_ID};
pub use diff_summary::{DiffStatus, DiffSummaryItem, parse_diff_summary};
pub use reconcile::{CommitGraph, CommitGraphNode, NodeId, reconcile};
pub use text_parser::{ParsedGraph, RawGraphNode, parse_graph_text};
