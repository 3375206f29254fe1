//! OpenAPI resource types.
//!
//! Every type serializes with camelCase field names, matching the
//! `application/json` bodies of `/cloudapi`.

use serde::{Deserialize, Serialize};

/// `{ "name": ..., "id": ... }` pointer to another entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl OpenApiReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            name: None,
            id: Some(id.into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// `{ "values": [...] }` body used by reference-list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiItems<T> {
    #[serde(default)]
    pub values: Vec<T>,
}

impl<T> OpenApiItems<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

/// A tenant role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_key: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// A provider-defined role template that can be published to tenants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_key: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub publish_all: bool,
}

impl GlobalRole {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// A single right (permission).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Right {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_namespace: Option<String>,
    /// `VIEW` or `MODIFY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implied_rights: Vec<OpenApiReference>,
}

impl Right {
    /// Reference suitable for role right lists.
    pub fn reference(&self) -> OpenApiReference {
        OpenApiReference {
            name: Some(self.name.clone()),
            id: self.id.clone(),
        }
    }
}

/// One audit trail event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrailEvent {
    pub event_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub operating_org: Option<OpenApiReference>,
    #[serde(default)]
    pub user: Option<OpenApiReference>,
    #[serde(default)]
    pub event_entity: Option<OpenApiReference>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_cell_id: Option<String>,
    #[serde(default)]
    pub cell_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub service_namespace: Option<String>,
    /// `SUCCESS` or `FAILURE`.
    #[serde(default)]
    pub event_status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub additional_properties: serde_json::Map<String, serde_json::Value>,
}

/// The session behind the current token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub id: String,
    #[serde(default)]
    pub site: Option<OpenApiReference>,
    #[serde(default)]
    pub user: Option<OpenApiReference>,
    #[serde(default)]
    pub org: Option<OpenApiReference>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role_refs: Vec<OpenApiReference>,
    #[serde(default)]
    pub session_idle_timeout_minutes: Option<u32>,
}
