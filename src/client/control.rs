//! Control endpoints: start, cancel, answer.

use super::types::{CancelRequest, CheckpointAnswer, RunRequest, RunResponse};
use super::{Client, Result};

impl Client {
    /// Starts a cascade run and returns the new session id.
    pub async fn run_cascade(&self, request: &RunRequest) -> Result<RunResponse> {
        let response = self.post("run-cascade", request).await?;
        let run: RunResponse = self.handle_response(response).await?;
        tracing::info!(session_id = %run.session_id, "Cascade run started");
        Ok(run)
    }

    /// Asks the backend to cancel a running session.
    pub async fn cancel_session(&self, session_id: &str, reason: Option<&str>) -> Result<()> {
        let path = format!("sessions/{}/cancel", session_id);
        let response = self.post(&path, &CancelRequest { reason }).await?;
        self.handle_empty_response(response).await?;
        tracing::info!(%session_id, "Cancellation requested");
        Ok(())
    }

    /// Answers a pending human-input checkpoint.
    pub async fn respond_checkpoint(
        &self,
        checkpoint_id: &str,
        response: &serde_json::Value,
    ) -> Result<()> {
        let path = format!("checkpoints/{}/respond", checkpoint_id);
        let reply = self.post(&path, &CheckpointAnswer { response }).await?;
        self.handle_empty_response(reply).await
    }
}
