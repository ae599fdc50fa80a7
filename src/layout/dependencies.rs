use super::model::EdgeOrigin;
use crate::workflow::Cell;
use ahash::AHashMap;

/// What a single cell depends on, resolved to list indices.
pub(super) struct CellDependencies<'a> {
    /// Upstream cells, from output references first and context imports second.
    pub implicit: Vec<usize>,
    /// Upstream cells named by the context import list.
    pub context: Vec<usize>,
    pub imports_all: bool,
    /// Input parameters consumed, in first-seen order.
    pub inputs: Vec<&'a str>,
}

/// A directed edge from dependency to dependent, before placement.
pub(super) struct DependencyEdge {
    pub source: usize,
    pub target: usize,
    pub origin: EdgeOrigin,
}

/// The dependency graph of a cell list, with every name resolved to an index.
///
/// Names that resolve to nothing and self-references are dropped. With
/// duplicate names the first cell carrying the name wins.
pub(super) struct DependencyGraph<'a> {
    pub cells: &'a [Cell],
    pub dependencies: Vec<CellDependencies<'a>>,
    pub edges: Vec<DependencyEdge>,
    /// Sources of the edges pointing at each cell.
    pub incoming: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub(super) fn new(cells: &'a [Cell]) -> Self {
        let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            index.entry(cell.name()).or_insert(i);
        }

        let dependencies: Vec<CellDependencies<'a>> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| Self::resolve_cell(cells, &index, i, cell))
            .collect();

        let mut edges: Vec<DependencyEdge> = Vec::new();
        let mut edge_index: AHashMap<(usize, usize), usize> = AHashMap::new();
        let mut add_edge = |source: usize, target: usize, origin: EdgeOrigin| {
            if source == target {
                return;
            }
            match edge_index.get(&(source, target)) {
                Some(&existing) => {
                    let edge: &mut DependencyEdge = &mut edges[existing];
                    edge.origin = edge.origin.merge(origin);
                }
                None => {
                    edge_index.insert((source, target), edges.len());
                    edges.push(DependencyEdge {
                        source,
                        target,
                        origin,
                    });
                }
            }
        };

        for (i, cell) in cells.iter().enumerate() {
            for handoff in cell.handoffs() {
                if let Some(&target) = index.get(handoff.as_str()) {
                    add_edge(i, target, EdgeOrigin::Handoff);
                }
            }
            for &source in &dependencies[i].implicit {
                add_edge(source, i, EdgeOrigin::Implicit);
            }
        }

        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); cells.len()];
        for edge in &edges {
            incoming[edge.target].push(edge.source);
        }

        Self {
            cells,
            dependencies,
            edges,
            incoming,
        }
    }

    fn resolve_cell(
        cells: &'a [Cell],
        index: &AHashMap<&str, usize>,
        position: usize,
        cell: &'a Cell,
    ) -> CellDependencies<'a> {
        let mut implicit: Vec<usize> = Vec::new();
        for name in cell.references().outputs() {
            if let Some(&source) = index.get(name)
                && source != position
                && !implicit.contains(&source)
            {
                implicit.push(source);
            }
        }

        let mut context: Vec<usize> = Vec::new();
        for name in cell.context_imports(cells, position) {
            if let Some(&source) = index.get(name)
                && source != position
                && !context.contains(&source)
            {
                context.push(source);
                if !implicit.contains(&source) {
                    implicit.push(source);
                }
            }
        }

        CellDependencies {
            implicit,
            context,
            imports_all: cell.imports_all_context(),
            inputs: cell.references().inputs().collect(),
        }
    }
}
