//! Credentials and login method selection.
//!
//! All credential types implement custom Debug to redact sensitive data.

use std::path::PathBuf;

use busbar_vcd_client::{AuthHeader, ClientConfig, VcdClient, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};

/// Organization name of provider (system administrator) sessions.
pub const SYSTEM_ORG: &str = "System";

/// How to obtain a session.
#[derive(Clone)]
pub enum AuthMethod {
    /// User name and password.
    Password { user: String, password: String },
    /// An existing session token.
    Token { token: String, header: AuthHeader },
    /// An API token (OAuth refresh token) generated in the vCD UI.
    ApiToken { refresh_token: String },
    /// A service account token file, rewritten after every use.
    ApiTokenFile { path: PathBuf },
    /// User name and password exchanged at an ADFS server.
    Saml {
        user: String,
        password: String,
        /// Relying party trust id; defaults to the org's SAML entity id.
        custom_rpt_id: Option<String>,
    },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Password { user, .. } => f
                .debug_struct("Password")
                .field("user", user)
                .field("password", &"[REDACTED]")
                .finish(),
            AuthMethod::Token { header, .. } => f
                .debug_struct("Token")
                .field("token", &"[REDACTED]")
                .field("header", header)
                .finish(),
            AuthMethod::ApiToken { .. } => f
                .debug_struct("ApiToken")
                .field("refresh_token", &"[REDACTED]")
                .finish(),
            AuthMethod::ApiTokenFile { path } => {
                f.debug_struct("ApiTokenFile").field("path", path).finish()
            }
            AuthMethod::Saml {
                user,
                custom_rpt_id,
                ..
            } => f
                .debug_struct("Saml")
                .field("user", user)
                .field("password", &"[REDACTED]")
                .field("custom_rpt_id", custom_rpt_id)
                .finish(),
        }
    }
}

impl AuthMethod {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Password { .. } => "password",
            AuthMethod::Token { .. } => "token",
            AuthMethod::ApiToken { .. } => "api_token",
            AuthMethod::ApiTokenFile { .. } => "api_token_file",
            AuthMethod::Saml { .. } => "saml_adfs",
        }
    }
}

/// Everything needed to open a session with one vCD instance.
#[derive(Debug, Clone)]
pub struct VcdCredentials {
    url: String,
    org: String,
    api_version: String,
    insecure: bool,
    method: AuthMethod,
}

impl VcdCredentials {
    pub fn new(url: impl Into<String>, org: impl Into<String>, method: AuthMethod) -> Self {
        Self {
            url: url.into(),
            org: org.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            insecure: false,
            method,
        }
    }

    /// Provider login with user name and password.
    pub fn password(
        url: impl Into<String>,
        org: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(
            url,
            org,
            AuthMethod::Password {
                user: user.into(),
                password: password.into(),
            },
        )
    }

    /// Requested API version; the server's maximum caps it at login.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Skip TLS verification.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn method(&self) -> &AuthMethod {
        &self.method
    }

    pub fn is_provider(&self) -> bool {
        self.org.eq_ignore_ascii_case(SYSTEM_ORG)
    }

    /// Client configuration matching these credentials.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .with_insecure_tls(self.insecure)
            .build()
    }

    /// Build a client and log in.
    pub async fn connect(&self) -> Result<VcdClient> {
        let mut client = VcdClient::with_config(&self.url, self.client_config())?;
        crate::login::authenticate(&mut client, self).await?;
        Ok(client)
    }

    /// Load credentials from environment variables.
    ///
    /// Required:
    /// - `VCD_URL`
    /// - one of `VCD_TOKEN`, `VCD_API_TOKEN`, `VCD_API_TOKEN_FILE` or
    ///   `VCD_USER` + `VCD_PASSWORD`
    ///
    /// Optional:
    /// - `VCD_ORG` (default: `System`)
    /// - `VCD_API_VERSION` (default: [`DEFAULT_API_VERSION`])
    /// - `VCD_INSECURE`, `VCD_USE_SAML_ADFS` (`true`/`1`)
    /// - `VCD_CUSTOM_ADFS_RPT_ID`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let flag = |name: &str| {
            var(name)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let url = var("VCD_URL")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("VCD_URL".to_string())))?;
        let org = var("VCD_ORG").unwrap_or_else(|| SYSTEM_ORG.to_string());

        let method = if let Some(token) = var("VCD_TOKEN") {
            AuthMethod::Token {
                token,
                header: AuthHeader::Bearer,
            }
        } else if let Some(refresh_token) = var("VCD_API_TOKEN") {
            AuthMethod::ApiToken { refresh_token }
        } else if let Some(path) = var("VCD_API_TOKEN_FILE") {
            AuthMethod::ApiTokenFile {
                path: PathBuf::from(path),
            }
        } else {
            let user = var("VCD_USER").ok_or_else(|| {
                Error::new(ErrorKind::EnvVar(
                    "VCD_USER (or VCD_TOKEN / VCD_API_TOKEN / VCD_API_TOKEN_FILE)".to_string(),
                ))
            })?;
            let password = var("VCD_PASSWORD")
                .ok_or_else(|| Error::new(ErrorKind::EnvVar("VCD_PASSWORD".to_string())))?;

            if flag("VCD_USE_SAML_ADFS") {
                AuthMethod::Saml {
                    user,
                    password,
                    custom_rpt_id: var("VCD_CUSTOM_ADFS_RPT_ID"),
                }
            } else {
                AuthMethod::Password { user, password }
            }
        };

        let mut creds = Self::new(url, org, method).with_insecure(flag("VCD_INSECURE"));
        if let Some(version) = var("VCD_API_VERSION") {
            creds = creds.with_api_version(version);
        }

        Ok(creds)
    }
}
