//! # busbar-vcd-auth
//!
//! VMware Cloud Director authentication.
//!
//! ## Security
//!
//! - Sensitive data (passwords, tokens) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Token files are written with owner-only permissions on Unix
//!
//! ## Supported Authentication Methods
//!
//! - **Basic** - `user@org` and password, through the OpenAPI sessions
//!   endpoint or the legacy `/api/sessions`
//! - **Token** - an existing bearer or legacy session token
//! - **API token** - a refresh token exchanged at the OAuth endpoint
//! - **Service account** - a token file whose refresh token is rotated on
//!   every login
//! - **SAML** - user name and password exchanged at an ADFS server
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_vcd_auth::{logout, VcdCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_vcd_auth::Error> {
//!     let creds = VcdCredentials::from_env()?;
//!     let mut client = creds.connect().await?;
//!
//!     println!("API version {}", client.api_version());
//!
//!     logout(&mut client).await?;
//!     Ok(())
//! }
//! ```

mod api_token;
mod credentials;
mod error;
mod login;
mod saml;
mod storage;

pub use api_token::{exchange_refresh_token, login_api_token, login_token_file, token_url, TokenResponse};
pub use credentials::{AuthMethod, VcdCredentials, SYSTEM_ORG};
pub use error::{Error, ErrorKind, Result};
pub use login::{
    authenticate, login_basic, login_token, logout, validate_session, ACCESS_TOKEN_HEADER,
    LEGACY_TOKEN_HEADER,
};
pub use saml::{adfs_endpoint, login_saml, saml_entity_id, ADFS_USERNAME_MIXED_PATH};
pub use storage::{default_token_dir, default_token_path, ApiTokenFile};
