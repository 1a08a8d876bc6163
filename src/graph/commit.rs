use serde::{Deserialize, Serialize};

use super::diff_summary::{DiffSummaryItem, parse_diff_summary};

/// Exact payload `jj` prints for a collapsed run of commits
pub const ELIDED_REVISIONS: &str = "(elided revisions)";

/// Commit id reported for nodes that have none (elided runs)
pub const UNKNOWN_COMMIT_ID: &str = "unknown";

/// Author or committer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub timestamp: String,
}

/// Local or remote bookmark, or a tag
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefName {
    pub name: String,
    pub remote: Option<String>,
}

/// Structured commit record emitted by the log template, one JSON object per node line.
/// Boolean flags are omitted upstream when false.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitMetadata {
    pub description: String,
    pub is_mine: bool,
    pub is_working_copy: bool,
    pub is_head: bool,
    pub is_divergent: bool,
    pub is_hidden: bool,
    pub is_immutable: bool,
    pub is_conflicted: bool,
    pub is_empty: bool,
    pub change_id: String,
    pub change_id_prefix_len: usize,
    pub commit_id: String,
    pub commit_id_prefix_len: usize,
    pub author: Signature,
    pub committer: Signature,
    /// Parent commit ids in their logical order (first parent first)
    pub parents: Vec<String>,
    pub diff_summary_raw: Vec<String>,
    pub bookmarks_local: Vec<RefName>,
    pub bookmarks_remote: Vec<RefName>,
    pub tags: Vec<RefName>,
}

impl CommitMetadata {
    /// Shortest unambiguous change id prefix
    pub fn short_change_id(&self) -> &str {
        prefix(&self.change_id, self.change_id_prefix_len)
    }

    pub fn short_commit_id(&self) -> &str {
        prefix(&self.commit_id, self.commit_id_prefix_len)
    }

    /// First line of the description
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    pub fn diff_summary(&self) -> Vec<DiffSummaryItem> {
        parse_diff_summary(&self.diff_summary_raw)
    }
}

fn prefix(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Decoded node payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeData {
    Elided,
    Commit(Box<CommitMetadata>),
    CommitId {
        #[serde(rename = "commitId")]
        commit_id: String,
    },
}

impl NodeData {
    /// Classify a raw payload. Malformed JSON degrades to a bare id holding the text.
    pub fn from_payload(payload: &str) -> Self {
        let payload = payload.trim();
        if payload == ELIDED_REVISIONS {
            return NodeData::Elided;
        }
        if payload.starts_with('{') {
            match serde_json::from_str::<CommitMetadata>(payload) {
                Ok(metadata) => return NodeData::Commit(Box::new(metadata)),
                Err(e) => tracing::debug!("commit metadata did not decode, keeping raw id: {e}"),
            }
        }
        NodeData::CommitId {
            commit_id: payload.to_string(),
        }
    }

    /// The commit id this node answers to when matching declared parents
    pub fn commit_id(&self) -> &str {
        match self {
            NodeData::Elided => UNKNOWN_COMMIT_ID,
            NodeData::Commit(metadata) => &metadata.commit_id,
            NodeData::CommitId { commit_id } => commit_id,
        }
    }

    pub fn metadata(&self) -> Option<&CommitMetadata> {
        match self {
            NodeData::Commit(metadata) => Some(metadata),
            NodeData::Elided | NodeData::CommitId { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elided_payload() {
        assert_eq!(NodeData::from_payload("(elided revisions)  "), NodeData::Elided);
        assert_eq!(NodeData::Elided.commit_id(), UNKNOWN_COMMIT_ID);
    }

    #[test]
    fn test_bare_commit_id() {
        let data = NodeData::from_payload("0af3c1 ");
        assert_eq!(data.commit_id(), "0af3c1");
        assert!(data.metadata().is_none());
    }

    #[test]
    fn test_commit_json() {
        let payload = r#"{"description": "fix parser\n\nlonger text\n", "isWorkingCopy": true,
            "changeId": "qpvuntsm", "changeIdPrefixLen": 2, "commitId": "e8849ae1", "commitIdPrefixLen": 1,
            "author": {"name": "A", "email": "a@example.com", "timestamp": "2025-01-01T00:00:00Z"},
            "parents": ["0000000000"], "diffSummaryRaw": ["M src/lib.rs"],
            "bookmarksLocal": [{"name": "main", "remote": null}], "bookmarksRemote": [], "tags": []}"#;
        let data = NodeData::from_payload(payload);
        let metadata = data.metadata().expect("commit variant");

        assert_eq!(data.commit_id(), "e8849ae1");
        assert!(metadata.is_working_copy);
        assert!(!metadata.is_immutable);
        assert_eq!(metadata.short_change_id(), "qp");
        assert_eq!(metadata.short_commit_id(), "e");
        assert_eq!(metadata.summary(), "fix parser");
        assert_eq!(metadata.parents, vec!["0000000000".to_string()]);
        assert_eq!(metadata.bookmarks_local[0].name, "main");
        assert_eq!(metadata.committer, Signature::default());
        assert_eq!(metadata.diff_summary().len(), 1);
    }

    #[test]
    fn test_malformed_json_falls_back_to_id() {
        let data = NodeData::from_payload("{not json");
        assert_eq!(
            data,
            NodeData::CommitId {
                commit_id: "{not json".to_string()
            }
        );
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(NodeData::Elided).unwrap();
        assert_eq!(json["type"], "elided");

        let json = serde_json::to_value(NodeData::from_payload("abc")).unwrap();
        assert_eq!(json["type"], "commitId");
        assert_eq!(json["commitId"], "abc");
    }
}
