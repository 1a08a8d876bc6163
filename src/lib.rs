//! Turns `jj log` graph text into a laid-out, colored commit graph with SVG path
//! geometry for every edge.
//!
//! The stages run left to right: [`graph::parse_graph_text`] reads the glyphs,
//! [`graph::reconcile`] decodes payloads and fixes parent order,
//! [`layout::ColumnLayoutEngine`] assigns columns, [`layout::assign_colors`] picks
//! branch colors and [`render::PathRenderer`] produces the geometry.
//! [`pipeline::render_graph`] runs them all.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod render;

pub use config::Config;
pub use pipeline::{GraphRender, RenderedNode, render_graph};
