//! Error types for vcd-client.

use std::time::Duration;

use crate::types::VcdError;

/// Result type alias for vcd-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vcd-client operations.
///
/// `context` holds the operation and URL the error surfaced from, e.g.
/// `GET https://vcd.example.com/cloudapi/1.0.0/roles/`.
#[derive(Debug, thiserror::Error)]
#[error("{}{kind}", context_prefix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Operation context appended while the error propagates.
    pub context: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

fn context_prefix(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|c| format!("{}: ", c))
        .unwrap_or_default()
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            source: None,
        }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            context: None,
            source: Some(Box::new(source)),
        }
    }

    /// Prepend operation context (operation name, URL) to the error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(inner) => format!("{}: {}", context, inner),
            None => context,
        });
        self
    }

    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } | ErrorKind::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded vCD error body, if this is a structured API error.
    pub fn api_error(&self) -> Option<&VcdError> {
        match &self.kind {
            ErrorKind::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_)) || self.status() == Some(401)
    }

    /// Returns true if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if a task reported failure or did not finish in time.
    pub fn is_task_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Task(_) | ErrorKind::TaskTimeout { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP failure reported by the transport.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Structured error body returned by vCD for a known failure status.
    #[error("API error {status}: {error}")]
    Api { status: u16, error: VcdError },

    /// Status outside both the success and the structured error sets.
    #[error("unhandled API response, status code: {status}")]
    UnhandledResponse { status: String },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// XML serialization/deserialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// An asynchronous task finished in a failed state.
    #[error("Task error: {0}")]
    Task(String),

    /// A task was still running when the polling bound elapsed.
    #[error("Task {task} did not complete within {timeout:?}")]
    TaskTimeout { task: String, timeout: Duration },

    /// The endpoint needs a newer API version than the server offers.
    #[error(
        "endpoint '{endpoint}' requires API version to support at least '{required}'. \
         Maximum supported version in this instance: {max_supported}"
    )]
    UnsupportedVersion {
        endpoint: String,
        required: String,
        max_supported: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing or rejected credentials.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::with_source(ErrorKind::Xml(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}
