//! Versioned session state.

use crate::error::{Error, ErrorKind, Result};
use crate::types::SupportedVersions;
use crate::version::ApiVersion;

/// Which header carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthHeader {
    /// `Authorization: Bearer <token>` (vCD 9.7+ access tokens).
    #[default]
    Bearer,
    /// `x-vcloud-authorization: <token>` (legacy session tokens).
    Legacy,
}

impl AuthHeader {
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthHeader::Bearer => "Authorization",
            AuthHeader::Legacy => "x-vcloud-authorization",
        }
    }

    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthHeader::Bearer => format!("Bearer {}", token),
            AuthHeader::Legacy => token.to_string(),
        }
    }
}

/// Session negotiated with one vCD instance.
///
/// A session is produced by a login flow and handed to
/// [`VcdClient::set_session`](crate::VcdClient::set_session). It is never
/// mutated in place by requests.
#[derive(Clone)]
pub struct Session {
    /// Version sent in `Accept` headers unless an endpoint asks for more.
    pub api_version: String,
    /// Highest version advertised by `/api/versions`.
    pub max_supported_version: Option<String>,
    token: Option<String>,
    auth_header: AuthHeader,
    /// Organization the session belongs to (`System` for providers).
    pub org: Option<String>,
    /// User name, when known.
    pub user: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api_version", &self.api_version)
            .field("max_supported_version", &self.max_supported_version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("auth_header", &self.auth_header)
            .field("org", &self.org)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Unauthenticated session pinned to a version.
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            max_supported_version: None,
            token: None,
            auth_header: AuthHeader::Bearer,
            org: None,
            user: None,
        }
    }

    /// Pick `min(requested, highest supported)` from a discovery document.
    pub fn negotiate(requested: &str, versions: &SupportedVersions) -> Result<Self> {
        let requested_version: ApiVersion = requested.parse()?;
        let max = versions.max_version().ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "server did not advertise any API version".to_string(),
            ))
        })?;

        let api_version = if requested_version > max {
            max.to_string()
        } else {
            requested_version.to_string()
        };

        Ok(Self::new(api_version).with_max_supported_version(max.to_string()))
    }

    pub fn with_token(mut self, token: impl Into<String>, header: AuthHeader) -> Self {
        self.token = Some(token.into());
        self.auth_header = header;
        self
    }

    pub fn with_max_supported_version(mut self, version: impl Into<String>) -> Self {
        self.max_supported_version = Some(version.into());
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn auth_header(&self) -> AuthHeader {
        self.auth_header
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Returns true for a provider (`System` org) session.
    pub fn is_provider(&self) -> bool {
        self.org
            .as_deref()
            .is_some_and(|o| o.eq_ignore_ascii_case("system"))
    }

    /// Version used by the compatibility gate.
    ///
    /// Falls back to the pinned version when discovery never ran.
    pub fn max_version(&self) -> Result<ApiVersion> {
        self.max_supported_version
            .as_deref()
            .unwrap_or(&self.api_version)
            .parse()
    }
}
