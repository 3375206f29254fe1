//! # busbar-vcd-api
//!
//! A VMware Cloud Director API client library for Rust.
//!
//! This library provides typed access to the vCD legacy XML API and the
//! OpenAPI (`/cloudapi`) surface, with API version negotiation, endpoint
//! compatibility checks, task tracking and paging built in.
//!
//! ## Security
//!
//! - Sensitive data (passwords, tokens) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **busbar-vcd-client** - Core HTTP client: request building, response
//!   classification, body codecs, tasks, paging, version gate
//! - **busbar-vcd-auth** - Authentication: basic, token, API token, service
//!   account token files, SAML/ADFS
//! - **busbar-vcd-openapi** - OpenAPI: generic CRUD, FIQL filters, roles,
//!   global roles, rights, audit trail
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_vcd_api::{OpenApiClient, VcdCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // VCD_URL, VCD_ORG, VCD_USER, VCD_PASSWORD ...
//!     let client = VcdCredentials::from_env()?.connect().await?;
//!     println!("negotiated API version {}", client.api_version());
//!
//!     let openapi = OpenApiClient::from_client(client);
//!     for role in openapi.get_all_roles(Default::default()).await? {
//!         println!("{}", role.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use busbar_vcd_auth as auth;
#[cfg(feature = "client")]
pub use busbar_vcd_client as client;
#[cfg(feature = "openapi")]
pub use busbar_vcd_openapi as openapi;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use busbar_vcd_auth::{AuthMethod, VcdCredentials};
#[cfg(feature = "client")]
pub use busbar_vcd_client::{ClientConfig, Session, VcdClient};
#[cfg(feature = "openapi")]
pub use busbar_vcd_openapi::{FilterBuilder, OpenApiClient};
