mod spline;
pub mod svg;

pub use spline::{
    CurveKind, EdgeToDraw, NodeToDraw, PathRenderer, PathStyle, Spline, SplinePoint, SplineSegment,
};
