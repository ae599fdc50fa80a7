use crate::error::DocumentError;
use crate::execution::lenient::{null_as_default, timestamp};
use crate::workflow::{CascadeDefinition, CascadeDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST run-cascade`.
///
/// Either a path the backend can read or the cascade text itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_yaml: Option<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl RunRequest {
    /// Sends the definition inline as YAML.
    pub fn from_definition(definition: &CascadeDefinition) -> Result<Self, DocumentError> {
        Ok(Self {
            cascade_yaml: Some(CascadeDocument::to_yaml(definition)?),
            ..Self::default()
        })
    }

    /// Asks the backend to load the cascade from a path it can see.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            cascade_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub session_id: String,
    #[serde(default)]
    pub cascade_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A single log line of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    /// Position in the session log, used as the `after` cursor.
    #[serde(deserialize_with = "null_as_default")]
    pub index: u64,
    #[serde(deserialize_with = "timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Option<String>,
    #[serde(alias = "phase_name")]
    pub cell_name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "content", deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LogsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogEntry>,
}

/// Cost so far of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_cost: f64,
    #[serde(alias = "by_phase", deserialize_with = "null_as_default")]
    pub by_cell: BTreeMap<String, f64>,
    pub tokens_in: Option<u64>,
    pub tokens_out: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(super) struct CancelRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckpointAnswer<'a> {
    pub response: &'a serde_json::Value,
}
