use thiserror::Error;

/// Errors that can occur while reading or writing a cascade document.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse cascade YAML: {0}")]
    Parse(String),

    #[error("Failed to serialize cascade to YAML: {0}")]
    Serialize(String),

    #[error("Could not read cascade file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Could not write cascade file '{path}': {message}")]
    Write { path: String, message: String },
}

/// Problems found when validating a cascade definition.
///
/// These are advisory. The layout engine accepts definitions with any of these
/// issues and degrades silently, so callers decide whether to surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Cell #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Cell name '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("Cell '{cell}' hands off to unknown cell '{target}'")]
    UnknownHandoff { cell: String, target: String },

    #[error("Cell '{cell}' references the output of unknown cell '{target}'")]
    UnknownOutput { cell: String, target: String },

    #[error("Cell '{cell}' imports context from unknown cell '{target}'")]
    UnknownContext { cell: String, target: String },

    #[error("Cell '{cell}' consumes input '{param}', which is not declared in inputs_schema")]
    UndeclaredInput { cell: String, param: String },

    #[error("Cell '{0}' references its own output")]
    SelfReference(String),
}

/// Errors that can occur when converting a custom user format into a `CascadeDefinition`.
#[derive(Error, Debug, Clone)]
pub enum CascadeConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors returned by the HTTP control and polling client.
#[cfg(feature = "client")]
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
