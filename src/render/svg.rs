//! Standalone SVG output for a rendered graph.

use std::fmt::{self, Write};

use crate::pipeline::{GraphRender, RenderedNode};

use super::spline::PathStyle;

/// RGBA color with components in 0..=1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`; alpha goes out separately as an opacity attribute
    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Branch colors, indexed by color index modulo length
pub const LANE_COLORS: &[Color] = &[
    Color::rgba(0.231, 0.510, 0.965, 1.0), // Blue
    Color::rgba(0.133, 0.773, 0.369, 1.0), // Green
    Color::rgba(0.961, 0.620, 0.043, 1.0), // Amber
    Color::rgba(0.659, 0.333, 0.969, 1.0), // Purple
    Color::rgba(0.392, 0.455, 0.545, 1.0), // Slate
    Color::rgba(0.4, 0.9, 0.9, 1.0),       // Cyan
    Color::rgba(1.0, 0.5, 0.5, 1.0),       // Red
    Color::rgba(0.7, 0.7, 0.9, 1.0),       // Lavender
];

pub fn lane_color(index: usize) -> Color {
    LANE_COLORS[index % LANE_COLORS.len()]
}

/// Escape text for element content
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Hover text for a node: short change id, short commit id and summary
fn node_title(node: &RenderedNode) -> Option<String> {
    let metadata = node.data.metadata()?;
    let title = format!(
        "{} {} {}",
        metadata.short_change_id(),
        metadata.short_commit_id(),
        metadata.summary()
    );
    Some(escape_xml(title.trim_end()))
}

/// Glyphs drawn as an outline rather than a filled dot
fn is_hollow(glyph: char) -> bool {
    matches!(glyph, '○' | '~')
}

/// Write the graph as an SVG document: edges first, nodes on top
pub fn write_svg<W: Write>(out: &mut W, render: &GraphRender, style: &PathStyle) -> fmt::Result {
    let width = (render.max_column + 1) as f32 * style.unit;
    let height = render.nodes.len().max(1) as f32 * style.unit;
    let radius = style.unit * 0.25;
    let stroke_width = (style.unit / 12.0).max(1.0);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;

    writeln!(out, r#"  <g fill="none" stroke-width="{stroke_width}">"#)?;
    for edge in &render.edges {
        let color = lane_color(edge.color);
        writeln!(
            out,
            r#"    <path d="{}" stroke="{}" stroke-opacity="{}"/>"#,
            edge.path_data,
            color.to_hex(),
            color.a
        )?;
    }
    writeln!(out, "  </g>")?;

    writeln!(out, "  <g>")?;
    for node in &render.nodes {
        let color = lane_color(node.draw.color);
        let (hex, opacity) = (color.to_hex(), color.a);
        let paint = if is_hollow(node.draw.glyph) {
            format!(
                r#"fill="white" stroke="{hex}" stroke-opacity="{opacity}" stroke-width="{stroke_width}""#
            )
        } else {
            format!(r#"fill="{hex}" fill-opacity="{opacity}""#)
        };
        write!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{radius}" {paint}"#,
            node.draw.x, node.draw.y
        )?;
        match node_title(node) {
            Some(title) => writeln!(out, "><title>{title}</title></circle>")?,
            None => writeln!(out, "/>")?,
        }
    }
    writeln!(out, "  </g>")?;

    writeln!(out, "</svg>")
}

pub fn to_svg_document(render: &GraphRender, style: &PathStyle) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    write_svg(&mut svg, render, style)?;
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::render_graph;

    #[test]
    fn test_hex_colors() {
        assert_eq!(Color::rgba(1.0, 0.0, 0.5, 1.0).to_hex(), "#ff0080");
        assert_eq!(lane_color(0), lane_color(LANE_COLORS.len()));
    }

    #[test]
    fn test_document_has_one_element_per_edge_and_node() {
        let config = Config::default();
        let render = render_graph("@  aaa\n○  bbb\n~  (elided revisions)\n", &config);
        let svg = to_svg_document(&render, &config.path).unwrap();

        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert_eq!(svg.matches("<circle ").count(), 3);
        assert!(svg.contains(r#"d="M12,12 v24""#));
        assert!(svg.contains(r#"width="24" height="72""#));
        assert!(svg.contains(r#"stroke-opacity="1""#));
    }

    #[test]
    fn test_filled_node_carries_fill_opacity() {
        let config = Config::default();
        let mut render = render_graph("@  aaa\n", &config);
        render.nodes[0].draw.glyph = '●';
        let svg = to_svg_document(&render, &config.path).unwrap();

        assert!(svg.contains(r##"fill="#3b82f6" fill-opacity="1""##));
    }

    #[test]
    fn test_commit_nodes_get_a_title() {
        let config = Config::default();
        let text = r#"@  {"commitId": "e8849ae1", "commitIdPrefixLen": 2, "changeId": "qpvuntsm", "changeIdPrefixLen": 3, "description": "fix <parser>\nbody"}
~  (elided revisions)
"#;
        let svg = to_svg_document(&render_graph(text, &config), &config.path).unwrap();

        assert!(svg.contains("<title>qpv e8 fix &lt;parser&gt;</title></circle>"));
        assert_eq!(svg.matches("<title>").count(), 1);
    }
}
