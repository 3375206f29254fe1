//! # vcd-openapi
//!
//! VMware Cloud Director OpenAPI (`/cloudapi`) client.
//!
//! ## Features
//!
//! - **Generic items** - get, list, create, update and delete any OpenAPI
//!   entity, synchronously or through a task
//! - **Filters** - FIQL filter builder with automatic value escaping
//! - **Roles** - tenant roles and their rights
//! - **Global roles** - provider role templates, publishing to tenants
//! - **Rights** - the rights catalogue
//! - **Audit trail** - audit events, optionally since a point in time
//! - **Sessions** - details of the current session
//!
//! Every operation checks the server's maximum API version against the
//! endpoint's minimum before sending anything.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_vcd_auth::VcdCredentials;
//! use busbar_vcd_openapi::{FilterBuilder, OpenApiClient, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenApiClient::from_client(VcdCredentials::from_env()?.connect().await?);
//!
//!     let filter = FilterBuilder::all().like("name", "vApp")?;
//!     for role in client.get_all_roles(filter.into_params()).await? {
//!         println!("{}", role.name);
//!     }
//!
//!     let role = client.create_role(&Role::new("Auditor", "read only")).await?;
//!     client.delete_role(role.id.as_deref().unwrap_or_default()).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod filter;
mod types;

pub use client::{OpenApiClient, TenantContext, AUTH_CONTEXT_HEADER, TENANT_CONTEXT_HEADER};
pub use error::{Error, ErrorKind, Result};
pub use filter::{Combinator, FilterBuilder};
pub use types::*;

// Re-export busbar-vcd-client types that users might need
pub use busbar_vcd_client::{
    QueryParams, Task, TaskStatus, VcdClient, ENDPOINT_AUDIT_TRAIL, ENDPOINT_GLOBAL_ROLES,
    ENDPOINT_RIGHTS, ENDPOINT_ROLES, ENDPOINT_SESSIONS_CURRENT,
};
