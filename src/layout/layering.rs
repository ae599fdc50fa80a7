use super::dependencies::DependencyGraph;

/// Result of topologically layering a dependency graph.
pub(super) struct Layering {
    /// Cell indices per layer, each layer in list order.
    pub layers: Vec<Vec<usize>>,
    /// Cells never placed: members of a cycle and everything downstream of one.
    pub unplaced: Vec<usize>,
}

/// Assigns every cell the first layer after all of its sources.
///
/// Each pass collects the cells whose sources were all placed by earlier
/// passes. A pass that places nothing ends the loop, leaving the rest unplaced.
pub(super) fn assign_layers(graph: &DependencyGraph<'_>) -> Layering {
    let count = graph.cells.len();
    let mut placed = vec![false; count];
    let mut remaining: Vec<usize> = (0..count).collect();
    let mut layers: Vec<Vec<usize>> = Vec::new();

    while !remaining.is_empty() {
        let ready: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| graph.incoming[i].iter().all(|&source| placed[source]))
            .collect();

        if ready.is_empty() {
            break;
        }

        for &i in &ready {
            placed[i] = true;
        }
        remaining.retain(|&i| !placed[i]);
        layers.push(ready);
    }

    Layering {
        layers,
        unplaced: remaining,
    }
}
