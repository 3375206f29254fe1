//! Error types for vcd-openapi.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// The client error behind this one, if any.
    pub fn client_error(&self) -> Option<&busbar_vcd_client::Error> {
        self.source
            .as_deref()
            .and_then(|s| s.downcast_ref::<busbar_vcd_client::Error>())
    }

    /// Returns true if the item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
            || self.client_error().is_some_and(|e| e.is_not_found())
    }

    /// Returns true if the server is too old for the endpoint.
    pub fn is_unsupported_version(&self) -> bool {
        self.client_error().is_some_and(|e| {
            matches!(
                e.kind,
                busbar_vcd_client::ErrorKind::UnsupportedVersion { .. }
            )
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Unexpected status for {operation}: expected {expected}, got {got}")]
    UnexpectedStatus {
        operation: String,
        expected: String,
        got: u16,
    },
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Task error: {0}")]
    Task(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    Other(String),
}

impl From<busbar_vcd_client::Error> for Error {
    fn from(err: busbar_vcd_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Json(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}
