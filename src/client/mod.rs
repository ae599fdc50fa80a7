//! HTTP client for the cascade execution backend.
//!
//! Covers the two halves of the surface the builder talks to: polling
//! endpoints (session status, logs, cost) and the control endpoints (run,
//! cancel, answer a checkpoint). Requests are one-shot; there are no retries.

use crate::error::ClientError;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

mod control;
mod sessions;
pub mod types;

pub use types::*;

pub type Result<T> = std::result::Result<T, ClientError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A client for the cascade backend API.
///
/// # Example
///
/// ```no_run
/// use cascade::client::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:5001")?.with_api_key("secret");
/// let snapshot = client.session_status("session-42").await?;
/// println!("{:?}", snapshot.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
    api_key: Option<String>,
}

impl Client {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let http = HttpClient::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            base_url,
            http,
            api_key: None,
        })
    }

    /// Sends `Authorization: Bearer <key>` with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replaces the client-wide request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = HttpClient::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        tracing::trace!(%url, "GET");
        self.with_auth(self.http.get(&url))
            .send()
            .await
            .map_err(ClientError::Http)
    }

    pub(crate) async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.url(path);
        tracing::trace!(%url, "GET");
        self.with_auth(self.http.get(&url).query(query))
            .send()
            .await
            .map_err(ClientError::Http)
    }

    pub(crate) async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let url = self.url(path);
        tracing::trace!(%url, "POST");
        self.with_auth(self.http.post(&url).json(body))
            .send()
            .await
            .map_err(ClientError::Http)
    }

    /// Deserializes a successful JSON response, or turns a failure into `ClientError::Api`.
    pub(crate) async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::api_error(status, response).await)
        }
    }

    /// Accepts any success status and ignores the body.
    pub(crate) async fn handle_empty_response(&self, response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() || status == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(Self::api_error(status, response).await)
        }
    }

    async fn api_error(status: StatusCode, response: Response) -> ClientError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| {
                json["error"]
                    .as_str()
                    .or_else(|| json["message"].as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
