use crate::layout::{EdgeOrigin, Layout};
use itertools::Itertools;
use std::fmt;

/// Formats a layout as a plain-text column listing.
pub struct TextRenderer;

impl TextRenderer {
    pub fn render(layout: &Layout) -> String {
        DisplayLayout { layout }.to_string()
    }
}

/// A wrapper to display a layout column by column.
pub struct DisplayLayout<'a> {
    pub layout: &'a Layout,
}

impl fmt::Display for DisplayLayout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;
        let mode = if layout.linear { "linear" } else { "layered" };
        writeln!(
            f,
            "======== LAYOUT ({}, {} cells, {}x{} px) ========",
            mode,
            layout.nodes.len(),
            layout.width,
            layout.height
        )?;

        let columns = layout
            .nodes
            .iter()
            .sorted_by_key(|n| (n.layer, n.row))
            .chunk_by(|n| n.layer);
        for (layer, nodes) in &columns {
            let names = nodes
                .map(|n| {
                    let mut label = n.name.clone();
                    if n.is_branch {
                        label.push_str(" <branch>");
                    }
                    if n.is_merge {
                        label.push_str(" <merge>");
                    }
                    if !n.input_deps.is_empty() {
                        label.push_str(&format!(" [inputs: {}]", n.input_deps.join(", ")));
                    }
                    label
                })
                .join(" | ");
            writeln!(f, "{:>4}: {}", layer, names)?;
        }

        if !layout.edges.is_empty() {
            writeln!(f, "\n--- EDGES ---")?;
            for edge in &layout.edges {
                let origin = match edge.origin {
                    EdgeOrigin::Handoff => "handoff",
                    EdgeOrigin::Implicit => "reference",
                    EdgeOrigin::Both => "handoff+reference",
                };
                writeln!(
                    f,
                    "{} -> {} ({}, {})",
                    edge.source,
                    edge.target,
                    edge.kind.as_str(),
                    origin
                )?;
            }
        }

        if !layout.input_anchors.is_empty() {
            writeln!(f, "\n--- INPUTS ---")?;
            for anchor in &layout.input_anchors {
                writeln!(
                    f,
                    "{} {} -> {}",
                    anchor.color,
                    anchor.name,
                    if anchor.consumers.is_empty() {
                        "(unused)".to_string()
                    } else {
                        anchor.consumers.join(", ")
                    }
                )?;
            }
        }

        if !layout.cyclic.is_empty() {
            writeln!(f, "\n--- UNPLACED (cycle) ---")?;
            writeln!(f, "{}", layout.cyclic.join(", "))?;
        }

        Ok(())
    }
}
