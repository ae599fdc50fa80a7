//! The graph builder: turns an ordered list of cells into a positioned layout.
//!
//! Dependencies come from three places: explicit `handoffs` (forward edges),
//! template references to other cells' outputs, and context import lists (both
//! reverse edges, since "B reads A" means `A -> B`). Cells are then either laid
//! out in a single row in list order, or grouped into topological layers.
//!
//! The engine is a pure function of its inputs. It never fails: links to
//! unknown cells are ignored, and cells caught in a cycle are reported in
//! [`Layout::cyclic`] instead of being placed.

use crate::workflow::{CascadeDefinition, Cell, InputsSchema};
use ahash::AHashMap;
use itertools::Itertools;

mod classify;
mod dependencies;
mod layering;
pub mod model;
pub mod placement;

use classify::classify_edge;
use dependencies::DependencyGraph;
use layering::assign_layers;
pub use model::*;
pub use placement::LayoutMetrics;
use placement::{Slot, layered_slots, linear_slots};

pub struct LayoutEngine<'a> {
    cells: &'a [Cell],
    inputs: &'a InputsSchema,
    linear: bool,
    metrics: LayoutMetrics,
}

pub struct LayoutEngineBuilder<'a> {
    cells: &'a [Cell],
    inputs: &'a InputsSchema,
    linear: bool,
    metrics: LayoutMetrics,
}

impl<'a> LayoutEngineBuilder<'a> {
    pub fn new(cells: &'a [Cell], inputs: &'a InputsSchema) -> Self {
        Self {
            cells,
            inputs,
            linear: false,
            metrics: LayoutMetrics::default(),
        }
    }

    /// Single row in list order instead of topological columns.
    pub fn linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> LayoutEngine<'a> {
        LayoutEngine {
            cells: self.cells,
            inputs: self.inputs,
            linear: self.linear,
            metrics: self.metrics,
        }
    }
}

impl<'a> LayoutEngine<'a> {
    pub fn builder(cells: &'a [Cell], inputs: &'a InputsSchema) -> LayoutEngineBuilder<'a> {
        LayoutEngineBuilder::new(cells, inputs)
    }

    pub fn for_definition(definition: &'a CascadeDefinition) -> LayoutEngineBuilder<'a> {
        LayoutEngineBuilder::new(&definition.cells, &definition.inputs_schema)
    }

    /// Computes the layout. Identical inputs always give an identical layout.
    pub fn layout(&self) -> Layout {
        let graph = DependencyGraph::new(self.cells);

        let (slots, unplaced) = if self.linear {
            (linear_slots(self.cells.len()), Vec::new())
        } else {
            let layering = assign_layers(&graph);
            (
                layered_slots(self.cells.len(), &layering.layers),
                layering.unplaced,
            )
        };

        let cyclic: Vec<String> = unplaced
            .iter()
            .map(|&i| self.cells[i].name().to_string())
            .collect();
        if !cyclic.is_empty() {
            tracing::warn!(
                cells = %cyclic.iter().join(", "),
                "Dependency cycle detected; affected cells were left out of the layered layout"
            );
        }

        let placed_edges: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| slots[e.source].is_some() && slots[e.target].is_some())
            .collect();

        let mut out_degree: AHashMap<usize, usize> = AHashMap::new();
        let mut in_degree: AHashMap<usize, usize> = AHashMap::new();
        for edge in &placed_edges {
            *out_degree.entry(edge.source).or_default() += 1;
            *in_degree.entry(edge.target).or_default() += 1;
        }
        let is_branch = |i: usize| out_degree.get(&i).copied().unwrap_or(0) > 1;
        let is_merge = |i: usize| in_degree.get(&i).copied().unwrap_or(0) > 1;

        let nodes: Vec<LayoutNode> = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| slots[i].map(|slot| (i, cell, slot)))
            .map(|(i, cell, Slot { layer, row })| LayoutNode {
                name: cell.name().to_string(),
                index: i,
                layer,
                row,
                x: self.metrics.column_x(layer),
                y: self.metrics.row_y(row),
                is_branch: is_branch(i),
                is_merge: is_merge(i),
                input_deps: graph.dependencies[i]
                    .inputs
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
                implicit_deps: graph.dependencies[i]
                    .implicit
                    .iter()
                    .map(|&d| self.cells[d].name().to_string())
                    .collect(),
            })
            .collect();

        let edges: Vec<LayoutEdge> = placed_edges
            .iter()
            .map(|edge| LayoutEdge {
                source: self.cells[edge.source].name().to_string(),
                target: self.cells[edge.target].name().to_string(),
                source_index: edge.source,
                target_index: edge.target,
                kind: classify_edge(&graph, edge.source, edge.target),
                origin: edge.origin,
                is_branch: is_branch(edge.source),
                is_merge: is_merge(edge.target),
            })
            .collect();

        let columns = nodes.iter().map(|n| n.layer + 1).max().unwrap_or(0);
        let rows = nodes.iter().map(|n| n.row + 1).max().unwrap_or(0);
        let (width, height) = self.metrics.canvas_size(columns, rows);

        let input_anchors = self.input_anchors(&nodes);

        tracing::debug!(
            linear = self.linear,
            nodes = nodes.len(),
            edges = edges.len(),
            columns,
            rows,
            cyclic = cyclic.len(),
            "Built cascade layout"
        );

        Layout {
            nodes,
            edges,
            width,
            height,
            input_anchors,
            cyclic,
            linear: self.linear,
            metrics: self.metrics.clone(),
        }
    }

    fn input_anchors(&self, nodes: &[LayoutNode]) -> Vec<InputAnchor> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, (name, description))| InputAnchor {
                name: name.clone(),
                description: description.clone(),
                x: self.metrics.input_panel_width,
                y: self.metrics.input_anchor_y(i),
                color: self.metrics.input_color(i),
                consumers: nodes
                    .iter()
                    .filter(|n| n.input_deps.iter().any(|p| p == name))
                    .map(|n| n.name.clone())
                    .collect(),
            })
            .collect()
    }
}

/// Lays out `cells` with default metrics.
pub fn build_layout(cells: &[Cell], inputs: &InputsSchema, linear: bool) -> Layout {
    LayoutEngine::builder(cells, inputs)
        .linear(linear)
        .build()
        .layout()
}
