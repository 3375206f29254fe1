//! Error types for vcd-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for vcd-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vcd-auth operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The underlying client error, when the failure came from an API call.
    pub fn client_error(&self) -> Option<&busbar_vcd_client::Error> {
        self.source
            .as_deref()
            .and_then(|s| s.downcast_ref::<busbar_vcd_client::Error>())
    }

    /// Returns true if vCD rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized(_))
            || self.client_error().is_some_and(|e| e.is_auth_error())
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login succeeded but no session token came back.
    #[error("Missing session token: {0}")]
    MissingToken(String),

    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// SAML/ADFS exchange failed.
    #[error("SAML error: {0}")]
    Saml(String),

    /// Error from the vCD client layer.
    #[error("{0}")]
    Client(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// XML error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<busbar_vcd_client::Error> for Error {
    fn from(err: busbar_vcd_client::Error) -> Self {
        // client messages are already sanitized
        Error::with_source(ErrorKind::Client(err.to_string()), err)
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

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(err.to_string()), err)
    }
}
