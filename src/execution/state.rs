use super::lenient::{null_as_default, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a cascade run as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Starting,
    Running,
    /// Waiting on a human-input checkpoint.
    #[serde(alias = "waiting", alias = "waiting_for_input")]
    Blocked,
    #[serde(alias = "complete", alias = "success")]
    Completed,
    #[serde(alias = "failed")]
    Error,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SessionStatus {
    /// No further updates are expected once a session reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Error | SessionStatus::Cancelled
        )
    }
}

/// Status of a single cell inside a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    #[default]
    Pending,
    Running,
    #[serde(alias = "complete", alias = "success")]
    Completed,
    #[serde(alias = "failed")]
    Error,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl CellStatus {
    /// The cell will not change state again.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            CellStatus::Completed | CellStatus::Error | CellStatus::Skipped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Pending => "pending",
            CellStatus::Running => "running",
            CellStatus::Completed => "completed",
            CellStatus::Error => "error",
            CellStatus::Skipped => "skipped",
            CellStatus::Unknown => "unknown",
        }
    }
}

/// Server-reported state of one cell. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellState {
    #[serde(deserialize_with = "null_as_default")]
    pub status: CellStatus,
    pub cost: Option<f64>,
    pub duration_ms: Option<f64>,
    /// Tabular result rows, when the cell produced any.
    #[serde(alias = "result_rows", deserialize_with = "null_as_default")]
    pub rows: Vec<serde_json::Value>,
    /// The result was served from cache rather than recomputed.
    #[serde(deserialize_with = "null_as_default")]
    pub cached: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    pub error: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A pending human-input request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkpoint {
    #[serde(alias = "id", deserialize_with = "null_as_default")]
    pub checkpoint_id: String,
    #[serde(alias = "phase_name")]
    pub cell_name: Option<String>,
    #[serde(alias = "prompt")]
    pub question: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<String>,
}

/// One poll's worth of session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub session_id: String,
    pub cascade_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: SessionStatus,
    #[serde(alias = "current_phase")]
    pub current_cell: Option<String>,
    #[serde(alias = "phases", deserialize_with = "null_as_default")]
    pub cells: BTreeMap<String, CellState>,
    pub total_cost: Option<f64>,
    #[serde(alias = "pending_checkpoint")]
    pub checkpoint: Option<Checkpoint>,
    pub error: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}
