use crate::execution::{CellStatus, ViewState};
use crate::layout::{EdgeKind, Layout, LayoutNode};
use std::fmt;

const EDGE_COLOR: &str = "#64748b";

/// Renders a layout as a standalone SVG document.
///
/// When an input panel is present it is drawn to the left of the canvas and
/// the cards are shifted right by its width.
#[derive(Default)]
pub struct SvgRenderer<'a> {
    view: Option<&'a ViewState>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors each card by the status the view reports for it.
    pub fn with_view(mut self, view: &'a ViewState) -> Self {
        self.view = Some(view);
        self
    }

    pub fn render(&self, layout: &Layout) -> String {
        SvgDocument {
            layout,
            view: self.view,
        }
        .to_string()
    }
}

struct SvgDocument<'a> {
    layout: &'a Layout,
    view: Option<&'a ViewState>,
}

impl SvgDocument<'_> {
    fn offset_x(&self) -> f64 {
        if self.layout.input_anchors.is_empty() {
            0.0
        } else {
            self.layout.metrics.input_panel_width
        }
    }

    fn fill_for(&self, node: &LayoutNode) -> &'static str {
        let Some(view) = self.view else {
            return "#ffffff";
        };
        match view.cell(&node.name).map(|c| (c.state.status, c.state.cached)) {
            Some((CellStatus::Completed, true)) => "#ecfccb",
            Some((CellStatus::Completed, false)) => "#dcfce7",
            Some((CellStatus::Running, _)) => "#dbeafe",
            Some((CellStatus::Error, _)) => "#fee2e2",
            Some((CellStatus::Skipped, _)) => "#f1f5f9",
            _ => "#f8fafc",
        }
    }

    fn write_inputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;
        let metrics = &layout.metrics;
        let offset = self.offset_x();

        for anchor in &layout.input_anchors {
            writeln!(
                f,
                r#"  <text x="8" y="{}" font-size="12" fill="{}">{}</text>"#,
                anchor.y + 4.0,
                anchor.color,
                escape(&anchor.name)
            )?;
            writeln!(
                f,
                r#"  <circle cx="{}" cy="{}" r="4" fill="{}"/>"#,
                anchor.x, anchor.y, anchor.color
            )?;

            let consumers = layout
                .nodes
                .iter()
                .filter(|n| n.input_deps.iter().any(|p| p == &anchor.name));
            for node in consumers {
                let (x1, y1) = (anchor.x, anchor.y);
                let (x2, y2) = (offset + node.x, node.y + metrics.card_height / 2.0);
                let bend = (x2 - x1).abs() / 2.0;
                writeln!(
                    f,
                    r#"  <path d="M {} {} C {} {}, {} {}, {} {}" fill="none" stroke="{}" stroke-opacity="0.6" stroke-width="1.5"/>"#,
                    x1,
                    y1,
                    x1 + bend,
                    y1,
                    x2 - bend,
                    y2,
                    x2,
                    y2,
                    anchor.color
                )?;
            }
        }
        Ok(())
    }

    fn write_edges(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;
        let metrics = &layout.metrics;
        let offset = self.offset_x();

        for edge in &layout.edges {
            let (Some(source), Some(target)) = (
                layout.node_at(edge.source_index),
                layout.node_at(edge.target_index),
            ) else {
                continue;
            };
            let x1 = offset + source.x + metrics.card_width;
            let y1 = source.y + metrics.card_height / 2.0;
            let x2 = offset + target.x;
            let y2 = target.y + metrics.card_height / 2.0;
            let bend = ((x2 - x1).abs() / 2.0).max(metrics.gap_x / 2.0);
            let dash = match edge.kind {
                EdgeKind::DirectData => "",
                EdgeKind::Selective => r#" stroke-dasharray="6 4""#,
                EdgeKind::ExecutionOrder => r#" stroke-dasharray="2 4""#,
            };
            writeln!(
                f,
                r#"  <path class="edge {}" d="M {} {} C {} {}, {} {}, {} {}" fill="none" stroke="{}" stroke-width="2"{} marker-end="url(#arrow)"/>"#,
                edge_class(edge.kind),
                x1,
                y1,
                x1 + bend,
                y1,
                x2 - bend,
                y2,
                x2,
                y2,
                EDGE_COLOR,
                dash
            )?;
        }
        Ok(())
    }

    fn write_nodes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = &self.layout.metrics;
        let offset = self.offset_x();

        for node in &self.layout.nodes {
            let x = offset + node.x;
            writeln!(f, r#"  <g class="cell" data-name="{}">"#, escape(&node.name))?;
            writeln!(
                f,
                r##"    <rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="{}" stroke="#94a3b8"/>"##,
                x,
                node.y,
                metrics.card_width,
                metrics.card_height,
                self.fill_for(node)
            )?;
            writeln!(
                f,
                r#"    <text x="{}" y="{}" font-size="14" font-weight="600">{}</text>"#,
                x + 12.0,
                node.y + 24.0,
                escape(&node.name)
            )?;

            let mut badges = Vec::new();
            if node.is_branch {
                badges.push("branch");
            }
            if node.is_merge {
                badges.push("merge");
            }
            if !badges.is_empty() {
                writeln!(
                    f,
                    r##"    <text x="{}" y="{}" font-size="11" fill="#64748b">{}</text>"##,
                    x + 12.0,
                    node.y + metrics.card_height - 12.0,
                    badges.join(" / ")
                )?;
            }
            writeln!(f, "  </g>")?;
        }
        Ok(())
    }
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;
        let offset = self.offset_x();
        let panel_height = layout
            .input_anchors
            .last()
            .map(|a| a.y + layout.metrics.input_row_height / 2.0 + layout.metrics.padding)
            .unwrap_or(0.0);
        let width = offset + layout.width;
        let height = layout.height.max(panel_height);

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )?;
        writeln!(
            f,
            r#"  <defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker></defs>"#,
            EDGE_COLOR
        )?;

        self.write_inputs(f)?;
        self.write_edges(f)?;
        self.write_nodes(f)?;

        writeln!(f, "</svg>")
    }
}

fn edge_class(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::DirectData => "direct-data",
        EdgeKind::Selective => "selective",
        EdgeKind::ExecutionOrder => "execution-order",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
