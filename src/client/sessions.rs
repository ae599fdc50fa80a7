//! Polling endpoints.

use super::types::{CostSummary, LogEntry, LogsResponse};
use super::{Client, Result};
use crate::execution::SessionSnapshot;

impl Client {
    /// Fetches the current status of a session, including per-cell state.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 if the session does not exist.
    pub async fn session_status(&self, session_id: &str) -> Result<SessionSnapshot> {
        let path = format!("sessions/{}/status", session_id);
        let response = self.get(&path).await?;
        let mut snapshot: SessionSnapshot = self.handle_response(response).await?;
        if snapshot.session_id.is_empty() {
            snapshot.session_id = session_id.to_string();
        }
        Ok(snapshot)
    }

    /// Fetches log entries with an index greater than `after`, or all of them.
    pub async fn session_logs(&self, session_id: &str, after: Option<u64>) -> Result<Vec<LogEntry>> {
        let path = format!("sessions/{}/logs", session_id);
        let response = match after {
            Some(after) => self.get_with_query(&path, &[("after", after)]).await?,
            None => self.get(&path).await?,
        };
        let logs: LogsResponse = self.handle_response(response).await?;
        Ok(logs.logs)
    }

    /// Fetches the accumulated cost of a session.
    pub async fn session_cost(&self, session_id: &str) -> Result<CostSummary> {
        let path = format!("sessions/{}/cost", session_id);
        let response = self.get(&path).await?;
        let mut cost: CostSummary = self.handle_response(response).await?;
        if cost.session_id.is_empty() {
            cost.session_id = session_id.to_string();
        }
        Ok(cost)
    }
}
