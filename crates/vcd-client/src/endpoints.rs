//! OpenAPI endpoint table.
//!
//! Every gated OpenAPI call is keyed by its versioned path (e.g.
//! `1.0.0/roles/`). The minimum version is checked against the server's
//! maximum supported API version before any request goes out.

/// A versioned OpenAPI path and the lowest API version that serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub path: &'static str,
    pub min_version: &'static str,
}

pub const OPENAPI_PATH_VERSION_1_0_0: &str = "1.0.0/";

pub const ENDPOINT_ROLES: &str = "1.0.0/roles/";
pub const ENDPOINT_GLOBAL_ROLES: &str = "1.0.0/globalRoles/";
pub const ENDPOINT_RIGHTS: &str = "1.0.0/rights/";
pub const ENDPOINT_AUDIT_TRAIL: &str = "1.0.0/auditTrail/";
pub const ENDPOINT_SESSIONS: &str = "1.0.0/sessions";
pub const ENDPOINT_SESSIONS_PROVIDER: &str = "1.0.0/sessions/provider";
pub const ENDPOINT_SESSIONS_CURRENT: &str = "1.0.0/sessions/current";

/// Minimum API versions per endpoint.
pub static ENDPOINT_MIN_VERSIONS: &[EndpointDescriptor] = &[
    EndpointDescriptor {
        path: ENDPOINT_ROLES,
        min_version: "31.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_GLOBAL_ROLES,
        min_version: "31.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_RIGHTS,
        min_version: "31.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_AUDIT_TRAIL,
        min_version: "33.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_SESSIONS,
        min_version: "33.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_SESSIONS_PROVIDER,
        min_version: "33.0",
    },
    EndpointDescriptor {
        path: ENDPOINT_SESSIONS_CURRENT,
        min_version: "33.0",
    },
];

/// Newer API versions an endpoint can be called with, lowest first.
///
/// Endpoints missing here are always called with their minimum version.
pub static ENDPOINT_ELEVATED_VERSIONS: &[(&str, &[&str])] = &[
    (ENDPOINT_AUDIT_TRAIL, &["33.0", "36.0"]),
    (ENDPOINT_GLOBAL_ROLES, &["31.0", "35.0"]),
];

/// Look up the minimum API version of an endpoint.
pub fn min_version_for(endpoint: &str) -> Option<&'static str> {
    ENDPOINT_MIN_VERSIONS
        .iter()
        .find(|d| d.path == endpoint)
        .map(|d| d.min_version)
}

/// Look up the elevated versions of an endpoint (empty when none are declared).
pub fn elevated_versions_for(endpoint: &str) -> &'static [&'static str] {
    ENDPOINT_ELEVATED_VERSIONS
        .iter()
        .find(|(path, _)| *path == endpoint)
        .map(|(_, versions)| *versions)
        .unwrap_or(&[])
}
