//! # vcd-client
//!
//! Core HTTP client infrastructure for VMware Cloud Director (vCD) APIs.
//!
//! This crate provides the plumbing every vCD API surface shares:
//! - Request building with auth and version-qualified `Accept` headers
//! - Response classification into success, structured API errors and
//!   generic "unhandled response" errors
//! - JSON (OpenAPI) and XML (legacy `/api`) body codecs
//! - Task tracking for asynchronous (HTTP 202) operations
//! - `nextPage` link pagination for OpenAPI collections
//! - Endpoint compatibility gating against the server's API versions
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (vcd-auth, vcd-openapi)                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       VcdClient                             │
//! │  - Holds the versioned session + HTTP client                │
//! │  - Endpoint compatibility gate                              │
//! │  - Typed JSON/XML methods, pager, task tracker              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     VcdHttpClient                           │
//! │  - Raw HTTP with compression and tracing, no redirects      │
//! │  - Response classification                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_vcd_client::{AuthHeader, Session, VcdClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_vcd_client::Error> {
//!     let mut client = VcdClient::new("https://vcd.example.com")?;
//!     let versions = client.discover_versions().await?;
//!     let session = Session::negotiate("37.0", &versions)?
//!         .with_token("eyJhbGciOi...", AuthHeader::Bearer);
//!     client.set_session(session);
//!
//!     client.check_endpoint_compatibility("1.0.0/roles/")?;
//!     let url = client.openapi_url("1.0.0/roles/");
//!     let roles: Vec<serde_json::Value> = client
//!         .openapi_get_all(&url, "31.0", Default::default())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod codec;
mod config;
mod endpoints;
mod error;
mod pager;
mod poll;
mod request;
mod response;
pub mod security;
mod session;
mod task;
pub mod types;
mod vcd_client;
mod version;

pub use client::VcdHttpClient;
pub use codec::{
    decode, decode_json, decode_values, decode_xml, encode_json, encode_xml, BodyFormat,
    PageEnvelope,
};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoints::{
    elevated_versions_for, min_version_for, EndpointDescriptor, ENDPOINT_AUDIT_TRAIL,
    ENDPOINT_ELEVATED_VERSIONS, ENDPOINT_GLOBAL_ROLES, ENDPOINT_MIN_VERSIONS, ENDPOINT_RIGHTS,
    ENDPOINT_ROLES, ENDPOINT_SESSIONS, ENDPOINT_SESSIONS_CURRENT, ENDPOINT_SESSIONS_PROVIDER,
};
pub use error::{Error, ErrorKind, Result};
pub use pager::{parse_link_header, Link, Pager, REL_NEXT_PAGE};
pub use poll::{BackoffStrategy, PollConfig};
pub use request::{Authorization, QueryParams, RequestBody, RequestBuilder, RequestMethod};
pub use response::{classify, Response, ResponseExt, STRUCTURED_ERROR_STATUSES, SUCCESS_STATUSES};
pub use session::{AuthHeader, Session};
pub use task::{TaskHandle, TaskTracker};
pub use types::{Reference, SupportedVersions, Task, TaskStatus, VcdError, VersionInfo, XmlError};
pub use vcd_client::VcdClient;
pub use version::ApiVersion;

/// Default API version requested when none is configured.
pub const DEFAULT_API_VERSION: &str = "37.0";

/// Path prefix of the JSON OpenAPI surface.
pub const OPENAPI_PREFIX: &str = "cloudapi";

/// Path prefix of the legacy XML API surface.
pub const LEGACY_API_PREFIX: &str = "api";

/// Default `pageSize` for OpenAPI collection requests.
pub const DEFAULT_PAGE_SIZE: u32 = 128;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-vcd-api/", env!("CARGO_PKG_VERSION"));
