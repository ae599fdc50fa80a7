use super::dependencies::DependencyGraph;
use super::model::EdgeKind;

/// Decides what flows along the edge `source -> target`.
///
/// A template reading the source's output wins over a context import, which
/// wins over a bare ordering hint.
pub(super) fn classify_edge(graph: &DependencyGraph<'_>, source: usize, target: usize) -> EdgeKind {
    let source_name = graph.cells[source].name();
    let target_cell = &graph.cells[target];
    let target_deps = &graph.dependencies[target];

    if target_cell.references().references_output(source_name) {
        EdgeKind::DirectData
    } else if target_deps.imports_all || target_deps.context.contains(&source) {
        EdgeKind::Selective
    } else {
        EdgeKind::ExecutionOrder
    }
}
