use super::state::{CellState, CellStatus, Checkpoint, SessionSnapshot, SessionStatus};
use ahash::AHashSet;
use serde::Serialize;

/// What to show for one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub name: String,
    pub state: CellState,
    /// `false` for cells the server reported but the definition does not contain.
    pub in_definition: bool,
}

/// Number of cells per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub error: usize,
    pub skipped: usize,
    pub unknown: usize,
    /// Completed cells whose result came from cache. Also counted in `completed`.
    pub cached: usize,
}

impl StatusCounts {
    fn record(&mut self, state: &CellState) {
        match state.status {
            CellStatus::Pending => self.pending += 1,
            CellStatus::Running => self.running += 1,
            CellStatus::Completed => self.completed += 1,
            CellStatus::Error => self.error += 1,
            CellStatus::Skipped => self.skipped += 1,
            CellStatus::Unknown => self.unknown += 1,
        }
        if state.cached && state.status == CellStatus::Completed {
            self.cached += 1;
        }
    }

    pub fn finished(&self) -> usize {
        self.completed + self.error + self.skipped
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.finished() + self.unknown
    }
}

/// The display state of a run, derived from a single server snapshot.
///
/// This is recomputed from scratch for every snapshot and never patched in
/// place, so a view can never drift from what the server last reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub session_id: String,
    pub status: SessionStatus,
    /// Definition cells first, in definition order, then any extra cells the
    /// server reported, by name.
    pub cells: Vec<CellView>,
    pub counts: StatusCounts,
    /// Finished cells over all cells, in `[0, 1]`.
    pub progress: f64,
    pub total_cost: f64,
    pub total_duration_ms: f64,
    pub running: Vec<String>,
    pub current_cell: Option<String>,
    /// Set while the run is blocked on a human-input checkpoint.
    pub awaiting_input: Option<Checkpoint>,
    pub is_terminal: bool,
    pub error: Option<String>,
}

impl ViewState {
    /// Builds the view for `snapshot`, listing cells in `cell_order` first.
    ///
    /// Cells in `cell_order` the server has not mentioned yet show as pending.
    pub fn from_snapshot<S: AsRef<str>>(snapshot: &SessionSnapshot, cell_order: &[S]) -> Self {
        let mut cells: Vec<CellView> = Vec::with_capacity(cell_order.len());
        let mut listed: AHashSet<&str> = AHashSet::with_capacity(cell_order.len());

        for name in cell_order {
            let name = name.as_ref();
            if !listed.insert(name) {
                continue;
            }
            cells.push(CellView {
                name: name.to_string(),
                state: snapshot.cells.get(name).cloned().unwrap_or_default(),
                in_definition: true,
            });
        }
        for (name, state) in &snapshot.cells {
            if listed.contains(name.as_str()) {
                continue;
            }
            cells.push(CellView {
                name: name.clone(),
                state: state.clone(),
                in_definition: false,
            });
        }

        let mut counts = StatusCounts::default();
        for cell in &cells {
            counts.record(&cell.state);
        }

        let progress = match counts.total() {
            0 => 0.0,
            total => counts.finished() as f64 / total as f64,
        };

        let total_cost = snapshot
            .total_cost
            .unwrap_or_else(|| cells.iter().filter_map(|c| c.state.cost).sum());
        let total_duration_ms: f64 = cells.iter().filter_map(|c| c.state.duration_ms).sum();

        let running = cells
            .iter()
            .filter(|c| c.state.status == CellStatus::Running)
            .map(|c| c.name.clone())
            .collect();

        let is_terminal = snapshot.status.is_terminal();
        let awaiting_input = if is_terminal {
            None
        } else {
            snapshot.checkpoint.clone()
        };

        let error = snapshot.error.clone().or_else(|| {
            (snapshot.status == SessionStatus::Error)
                .then(|| cells.iter().find_map(|c| c.state.error.clone()))
                .flatten()
        });

        Self {
            session_id: snapshot.session_id.clone(),
            status: snapshot.status,
            cells,
            counts,
            progress,
            total_cost,
            total_duration_ms,
            running,
            current_cell: snapshot.current_cell.clone(),
            awaiting_input,
            is_terminal,
            error,
        }
    }

    pub fn cell(&self, name: &str) -> Option<&CellView> {
        self.cells.iter().find(|c| c.name == name)
    }

    pub fn status_of(&self, name: &str) -> CellStatus {
        self.cell(name)
            .map(|c| c.state.status)
            .unwrap_or(CellStatus::Pending)
    }
}
