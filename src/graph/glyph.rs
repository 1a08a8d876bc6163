//! Box-drawing glyph classification for `jj log` graph text (curved style).

/// A single column of the graph part of a log line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Space,
    /// `─`
    Horizontal,
    /// `│`
    Parent,
    /// `╷`
    Ancestor,
    /// `╯`
    MergeLeft,
    /// `╰`
    MergeRight,
    /// `┴`
    MergeBoth,
    /// `╮`
    ForkLeft,
    /// `╭`
    ForkRight,
    /// `┬`
    ForkBoth,
    /// `┤`
    JoinLeft,
    /// `├`
    JoinRight,
    /// `┼`
    JoinBoth,
    /// Anything outside the connector alphabet marks the node itself (`@`, `○`, `◆`, `~`, ...)
    Node(char),
}

impl Glyph {
    pub fn classify(c: char) -> Self {
        match c {
            ' ' => Glyph::Space,
            '─' => Glyph::Horizontal,
            '│' => Glyph::Parent,
            '╷' => Glyph::Ancestor,
            '╯' => Glyph::MergeLeft,
            '╰' => Glyph::MergeRight,
            '┴' => Glyph::MergeBoth,
            '╮' => Glyph::ForkLeft,
            '╭' => Glyph::ForkRight,
            '┬' => Glyph::ForkBoth,
            '┤' => Glyph::JoinLeft,
            '├' => Glyph::JoinRight,
            '┼' => Glyph::JoinBoth,
            other => Glyph::Node(other),
        }
    }

    /// Glyphs that pull the previous row's active children of this column into the row
    pub fn is_child(self) -> bool {
        matches!(
            self,
            Glyph::Parent
                | Glyph::MergeLeft
                | Glyph::MergeRight
                | Glyph::MergeBoth
                | Glyph::JoinLeft
                | Glyph::JoinRight
                | Glyph::JoinBoth
        )
    }

    /// Glyphs that hand active children down to the next row.
    /// `╷` is excluded; an ancestor link leaves the column's set untouched.
    pub fn is_parent(self) -> bool {
        matches!(
            self,
            Glyph::Parent
                | Glyph::ForkLeft
                | Glyph::ForkRight
                | Glyph::ForkBoth
                | Glyph::JoinLeft
                | Glyph::JoinRight
                | Glyph::JoinBoth
        )
    }

    /// Glyphs that connect this column to its right-hand neighbour within the row
    pub fn is_horizontal(self) -> bool {
        !matches!(
            self,
            Glyph::Space | Glyph::Parent | Glyph::Ancestor | Glyph::Node(_)
        )
    }

    /// Glyphs after which nothing in this column continues downward
    pub fn terminates_propagation(self) -> bool {
        matches!(
            self,
            Glyph::Space | Glyph::MergeLeft | Glyph::MergeRight | Glyph::MergeBoth
        )
    }

    pub fn node_char(self) -> Option<char> {
        match self {
            Glyph::Node(c) => Some(c),
            _ => None,
        }
    }
}

/// First character of a payload: a hex commit id, a JSON object, or `(elided revisions)`
pub fn is_graph_termination(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f' | '{' | '(')
}
