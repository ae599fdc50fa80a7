use super::placement::LayoutMetrics;
use serde::Serialize;

/// A positioned, renderable view of a cascade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Canvas width in pixels. Zero when nothing was placed.
    pub width: f64,
    /// Canvas height in pixels. Zero when nothing was placed.
    pub height: f64,
    /// Connector anchors for the input parameter panel, in schema order.
    pub input_anchors: Vec<InputAnchor>,
    /// Cells that could not be layered because they sit on or behind a cycle.
    /// Always empty in linear mode.
    pub cyclic: Vec<String>,
    pub linear: bool,
    pub metrics: LayoutMetrics,
}

impl Layout {
    pub fn node(&self, name: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Looks a node up by its position in the cell list. Unlike [`Layout::node`]
    /// this stays exact when names repeat.
    pub fn node_at(&self, index: usize) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&LayoutEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Number of columns used by the placed nodes.
    pub fn column_count(&self) -> usize {
        self.nodes.iter().map(|n| n.layer + 1).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A cell with its computed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub name: String,
    /// Position of the cell in the original list.
    pub index: usize,
    /// Column. The topological layer in layered mode, the list position in linear mode.
    pub layer: usize,
    /// Position inside the column.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    /// More than one outgoing edge.
    pub is_branch: bool,
    /// More than one incoming edge.
    pub is_merge: bool,
    /// Input parameters consumed by this cell.
    pub input_deps: Vec<String>,
    /// Cells this one depends on through references or context imports.
    pub implicit_deps: Vec<String>,
}

/// A dependency between two placed cells, pointing from dependency to dependent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub source: String,
    pub target: String,
    /// List positions of the two cells, see [`LayoutNode::index`].
    pub source_index: usize,
    pub target_index: usize,
    pub kind: EdgeKind,
    pub origin: EdgeOrigin,
    /// The source has more than one outgoing edge.
    pub is_branch: bool,
    /// The target has more than one incoming edge.
    pub is_merge: bool,
}

/// What actually flows along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// The target's templates read the source's output.
    DirectData,
    /// The target imports the source through its context list (or imports everything).
    Selective,
    /// Only an ordering hint; no data moves.
    ExecutionOrder,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::DirectData => "direct data",
            EdgeKind::Selective => "selective",
            EdgeKind::ExecutionOrder => "execution order",
        }
    }
}

/// Where an edge came from in the definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrigin {
    /// The source lists the target in its handoffs.
    Handoff,
    /// The target references or imports the source.
    Implicit,
    /// Both of the above.
    Both,
}

impl EdgeOrigin {
    pub(super) fn merge(self, other: EdgeOrigin) -> EdgeOrigin {
        if self == other { self } else { EdgeOrigin::Both }
    }
}

/// Where a connector for an input parameter starts, in input panel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputAnchor {
    pub name: String,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    /// Placed cells consuming this parameter, in list order.
    pub consumers: Vec<String>,
}
