//! Edge geometry as SVG path data.
//!
//! Edges are built as a [`Spline`]: an absolute start point followed by relative
//! segments. Straight runs become single `v` commands; a column change becomes a
//! quarter turn out of the vertical, a horizontal run, and a quarter turn back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{CommitGraph, NodeId};
use crate::layout::{ColorMap, GraphLayout, LayoutEdge, PathInstruction};

/// A 2D point, or a relative offset inside a segment
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SplinePoint {
    pub x: f32,
    pub y: f32,
}

impl SplinePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for SplinePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A relative path segment
#[derive(Clone, Debug, PartialEq)]
pub enum SplineSegment {
    Vertical { dy: f32 },
    Horizontal { dx: f32 },
    Line { end: SplinePoint },
    QuadraticBezier { control: SplinePoint, end: SplinePoint },
    CubicBezier {
        control1: SplinePoint,
        control2: SplinePoint,
        end: SplinePoint,
    },
    /// Cubic whose first control point mirrors the previous segment's
    SmoothCubic { control2: SplinePoint, end: SplinePoint },
}

impl fmt::Display for SplineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineSegment::Vertical { dy } => write!(f, "v{dy}"),
            SplineSegment::Horizontal { dx } => write!(f, "h{dx}"),
            SplineSegment::Line { end } => write!(f, "l{end}"),
            SplineSegment::QuadraticBezier { control, end } => write!(f, "q{control} {end}"),
            SplineSegment::CubicBezier {
                control1,
                control2,
                end,
            } => write!(f, "c{control1} {control2} {end}"),
            SplineSegment::SmoothCubic { control2, end } => write!(f, "s{control2} {end}"),
        }
    }
}

/// A complete edge path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spline {
    pub start: SplinePoint,
    pub segments: Vec<SplineSegment>,
}

impl Spline {
    pub fn new(start: SplinePoint) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn vertical(&mut self, dy: f32) {
        self.segments.push(SplineSegment::Vertical { dy });
    }

    pub fn horizontal(&mut self, dx: f32) {
        self.segments.push(SplineSegment::Horizontal { dx });
    }

    pub fn push(&mut self, segment: SplineSegment) {
        self.segments.push(segment);
    }

    /// SVG `d` attribute
    pub fn to_path_data(&self) -> String {
        let mut data = format!("M{}", self.start);
        for segment in &self.segments {
            data.push(' ');
            data.push_str(&segment.to_string());
        }
        data
    }
}

/// Curve command used for the quarter turns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    #[serde(rename = "l")]
    Line,
    #[serde(rename = "c")]
    Cubic,
    #[serde(rename = "s")]
    Smooth,
    #[default]
    #[serde(rename = "q")]
    Quadratic,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathStyle {
    /// Side length of one grid cell
    pub unit: f32,
    /// Fraction of half a cell spent curving; the rest is straight
    pub curviness: f32,
    pub curve: CurveKind,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            unit: 24.0,
            curviness: 0.75,
            curve: CurveKind::Quadratic,
        }
    }
}

impl PathStyle {
    pub fn center_offset(&self) -> f32 {
        self.unit / 2.0
    }

    pub fn curve_offset(&self) -> f32 {
        self.center_offset() * self.curviness
    }

    fn straight_offset(&self) -> f32 {
        self.center_offset() - self.curve_offset()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeToDraw {
    pub id: NodeId,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub color: usize,
    pub glyph: char,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeToDraw {
    pub id: usize,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "d")]
    pub path_data: String,
    pub color: usize,
}

/// Walks an edge's instructions, remembering where the pen is
struct EdgeTracer {
    spline: Spline,
    current_column: usize,
    next_column: usize,
    vertical_rows: usize,
    max_column: usize,
}

pub struct PathRenderer {
    style: PathStyle,
}

impl PathRenderer {
    pub fn new(style: PathStyle) -> Self {
        Self { style }
    }

    /// Center of a grid cell
    pub fn cell_center(&self, column: usize, row: usize) -> SplinePoint {
        let center = self.style.center_offset();
        SplinePoint::new(
            column as f32 * self.style.unit + center,
            row as f32 * self.style.unit + center,
        )
    }

    pub fn render_nodes(&self, graph: &CommitGraph, layout: &GraphLayout, colors: &ColorMap) -> Vec<NodeToDraw> {
        graph
            .nodes
            .iter()
            .map(|node| {
                let column = layout.column_of(node.id).unwrap_or(0);
                let center = self.cell_center(column, node.id);
                NodeToDraw {
                    id: node.id,
                    column,
                    x: center.x,
                    y: center.y,
                    color: colors.node_color(node.id).unwrap_or(0),
                    glyph: node.glyph,
                }
            })
            .collect()
    }

    /// Path data for every edge, plus the highest column any edge reaches
    pub fn render_edges(&self, layout: &GraphLayout, colors: &ColorMap) -> (Vec<EdgeToDraw>, usize) {
        let mut max_column = 0;
        let edges = layout
            .edges
            .iter()
            .map(|edge| {
                let color = colors.edge_colors.get(edge.id);
                debug_assert_eq!(color.map(|c| (c.from, c.to)), Some((edge.from, edge.to)));

                let (spline, edge_max_column) = self.trace(edge);
                max_column = max_column.max(edge_max_column);
                EdgeToDraw {
                    id: edge.id,
                    from: edge.from,
                    to: edge.to,
                    path_data: spline.to_path_data(),
                    color: color.map_or(0, |c| c.color),
                }
            })
            .collect();
        (edges, max_column)
    }

    pub fn edge_spline(&self, edge: &LayoutEdge) -> Spline {
        self.trace(edge).0
    }

    fn trace(&self, edge: &LayoutEdge) -> (Spline, usize) {
        let mut tracer = EdgeTracer {
            spline: Spline::default(),
            current_column: 0,
            next_column: 0,
            vertical_rows: 0,
            max_column: 0,
        };

        for instruction in &edge.path {
            match *instruction {
                PathInstruction::Start { column, row } => {
                    tracer.spline = Spline::new(self.cell_center(column, row));
                    tracer.current_column = column;
                    tracer.next_column = column;
                    tracer.vertical_rows = 0;
                    tracer.max_column = tracer.max_column.max(column);
                }
                PathInstruction::Continue => {
                    if tracer.next_column == tracer.current_column {
                        tracer.vertical_rows += 1;
                    } else {
                        self.draw_vertical(&mut tracer);
                        self.draw_turn(&mut tracer);
                    }
                }
                PathInstruction::Branch { column } => {
                    if tracer.next_column != tracer.current_column {
                        tracing::warn!(
                            from = edge.from,
                            to = edge.to,
                            path = ?edge.path,
                            "multiple consecutive branch instructions"
                        );
                    }
                    tracer.next_column = column;
                }
                PathInstruction::End => {
                    self.draw_vertical(&mut tracer);
                    self.draw_turn(&mut tracer);
                }
            }
        }

        (tracer.spline, tracer.max_column)
    }

    fn draw_vertical(&self, tracer: &mut EdgeTracer) {
        if tracer.vertical_rows > 0 {
            tracer.spline.vertical(tracer.vertical_rows as f32 * self.style.unit);
            tracer.vertical_rows = 0;
        }
    }

    /// Move from the current column to the pending one over one row
    fn draw_turn(&self, tracer: &mut EdgeTracer) {
        let (from, to) = (tracer.current_column, tracer.next_column);
        if from != to {
            let direction = if to > from { 1.0 } else { -1.0 };
            let straight = self.style.straight_offset();

            tracer.spline.vertical(straight);
            tracer.spline.push(self.turn_out_of_vertical(direction));
            tracer.spline.horizontal(straight * direction);

            let distance = from.abs_diff(to);
            if distance > 1 {
                tracer
                    .spline
                    .horizontal((distance - 1) as f32 * self.style.unit * direction);
            }

            tracer.spline.horizontal(straight * direction);
            tracer.spline.push(self.turn_into_vertical(direction));
            tracer.spline.vertical(straight);
        }

        tracer.current_column = to;
        tracer.max_column = tracer.max_column.max(to);
    }

    fn turn_out_of_vertical(&self, direction: f32) -> SplineSegment {
        let o = self.style.curve_offset();
        let end = SplinePoint::new(o * direction, o);
        let control = SplinePoint::new(0.0, o);
        match self.style.curve {
            CurveKind::Line => SplineSegment::Line { end },
            CurveKind::Cubic => SplineSegment::CubicBezier {
                control1: control,
                control2: control,
                end,
            },
            CurveKind::Smooth => SplineSegment::SmoothCubic { control2: control, end },
            CurveKind::Quadratic => SplineSegment::QuadraticBezier { control, end },
        }
    }

    fn turn_into_vertical(&self, direction: f32) -> SplineSegment {
        let o = self.style.curve_offset();
        let end = SplinePoint::new(o * direction, o);
        let control = SplinePoint::new(o * direction, 0.0);
        match self.style.curve {
            CurveKind::Line => SplineSegment::Line { end },
            CurveKind::Cubic => SplineSegment::CubicBezier {
                control1: control,
                control2: control,
                end,
            },
            CurveKind::Smooth => SplineSegment::SmoothCubic { control2: control, end },
            CurveKind::Quadratic => SplineSegment::QuadraticBezier { control, end },
        }
    }
}
