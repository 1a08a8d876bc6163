//! Decoding of `jj diff --summary` lines carried in commit metadata.

use serde::Serialize;

const PATH_SEP: char = '/';
const RENAME_ARROW: &str = " => ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffStatus {
    Modified,
    Added,
    Removed,
    Copied,
    Renamed,
    Unknown(char),
}

impl DiffStatus {
    pub fn from_short(c: char) -> Self {
        match c {
            'M' => DiffStatus::Modified,
            'A' => DiffStatus::Added,
            'D' => DiffStatus::Removed,
            'C' => DiffStatus::Copied,
            'R' => DiffStatus::Renamed,
            other => DiffStatus::Unknown(other),
        }
    }
}

/// One changed file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummaryItem {
    pub status: DiffStatus,
    pub source: String,
    pub target: String,
    /// Path components; a rename collapses its differing middle into a single `old => new` item
    pub path_items: Vec<String>,
}

fn path_items(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split(PATH_SEP).filter(|p| !p.is_empty()).map(str::to_string)
}

/// Split `prefix{old => new}suffix` into its four parts
fn split_rename(path: &str) -> Option<(&str, &str, &str, &str)> {
    let arrow = path.find(RENAME_ARROW)?;
    let open = path[..arrow].rfind('{')?;
    let after = arrow + RENAME_ARROW.len();
    let close = after + path[after..].find('}')?;
    Some((&path[..open], &path[open + 1..arrow], &path[after..close], &path[close + 1..]))
}

fn parse_line(line: &str) -> Option<DiffSummaryItem> {
    let mut chars = line.chars();
    let status = DiffStatus::from_short(chars.next()?);
    // status letter and separator
    let path = chars.as_str().get(1..)?;

    let item = match split_rename(path) {
        Some((prefix, old, new, suffix)) => DiffSummaryItem {
            status,
            source: format!("{prefix}{old}{suffix}"),
            target: format!("{prefix}{new}{suffix}"),
            path_items: path_items(prefix)
                .chain(std::iter::once(format!("{old}{RENAME_ARROW}{new}")))
                .chain(path_items(suffix))
                .collect(),
        },
        None => DiffSummaryItem {
            status,
            source: path.to_string(),
            target: path.to_string(),
            path_items: path_items(path).collect(),
        },
    };
    Some(item)
}

/// Decode raw summary lines, skipping any too short to hold a status and a path
pub fn parse_diff_summary(raw: &[String]) -> Vec<DiffSummaryItem> {
    raw.iter()
        .filter(|line| line.chars().count() > 2)
        .filter_map(|line| parse_line(line))
        .collect()
}
