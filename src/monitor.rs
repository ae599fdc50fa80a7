//! Polls a session on a fixed interval and publishes a fresh view per poll.
//!
//! Polls run one after another on a single task, so a slow response is never
//! overtaken by a later one. Each published value replaces the previous one.

use crate::client::Client;
use crate::error::ClientError;
use crate::execution::{SessionSnapshot, ViewState};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Anything that can produce a session snapshot.
pub trait SnapshotSource {
    fn fetch(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionSnapshot, ClientError>> + Send;
}

impl SnapshotSource for Client {
    fn fetch(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionSnapshot, ClientError>> + Send {
        self.session_status(session_id)
    }
}

/// The latest thing a watcher should display.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorUpdate {
    /// Nothing fetched yet.
    Waiting,
    View(Box<ViewState>),
    /// The last poll failed. The next tick polls again.
    Failed { message: String },
}

impl MonitorUpdate {
    pub fn view(&self) -> Option<&ViewState> {
        match self {
            MonitorUpdate::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.view().is_some_and(|v| v.is_terminal)
    }
}

pub struct Monitor<S> {
    source: S,
    session_id: String,
    interval: Duration,
    cell_order: Vec<String>,
}

impl<S> Monitor<S>
where
    S: SnapshotSource + Send + Sync + 'static,
{
    pub fn new(source: S, session_id: impl Into<String>) -> Self {
        Self {
            source,
            session_id: session_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
            cell_order: Vec::new(),
        }
    }

    /// Sets the poll interval, clamped to `[MIN_POLL_INTERVAL, MAX_POLL_INTERVAL]`.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
        self
    }

    /// Cell names of the definition, so views list them in order and show unseen ones as pending.
    pub fn cell_order<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.cell_order = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.interval
    }

    /// Fetches one snapshot and derives its view.
    pub async fn poll_once(&self) -> MonitorUpdate {
        match self.source.fetch(&self.session_id).await {
            Ok(snapshot) => {
                let view = ViewState::from_snapshot(&snapshot, &self.cell_order);
                tracing::debug!(
                    session_id = %self.session_id,
                    status = ?view.status,
                    progress = view.progress,
                    "Polled session"
                );
                MonitorUpdate::View(Box::new(view))
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Session poll failed");
                MonitorUpdate::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Starts polling on a background task.
    ///
    /// The task stops after publishing a terminal view, or once every receiver
    /// has been dropped.
    pub fn watch(self) -> (watch::Receiver<MonitorUpdate>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(MonitorUpdate::Waiting);
        let handle = tokio::spawn(self.run(tx));
        (rx, handle)
    }

    async fn run(self, tx: watch::Sender<MonitorUpdate>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                tracing::debug!(session_id = %self.session_id, "All watchers gone, stopping");
                break;
            }

            let update = self.poll_once().await;
            let terminal = update.is_terminal();
            if tx.send(update).is_err() {
                break;
            }
            if terminal {
                tracing::info!(session_id = %self.session_id, "Session finished");
                break;
            }
        }
    }
}
