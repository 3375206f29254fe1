//! Wire types shared by every vCD API surface.
//!
//! The legacy `/api` surface speaks XML; attributes are mapped with the
//! `@name` convention of `quick-xml`'s serde support. OpenAPI errors are
//! JSON and deserialize straight into [`VcdError`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::version::ApiVersion;

/// Structured error body returned by vCD.
///
/// OpenAPI endpoints return it as JSON; the legacy API as an `<Error>`
/// element, see [`XmlError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcdError {
    /// HTTP-like major code. OpenAPI bodies usually omit it.
    #[serde(default)]
    pub major_error_code: Option<u16>,
    /// Symbolic code such as `BAD_REQUEST` or `ACCESS_TO_RESOURCE_IS_FORBIDDEN`.
    #[serde(default)]
    pub minor_error_code: String,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for VcdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.minor_error_code.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} - {}", self.minor_error_code, self.message)
        }
    }
}

/// Legacy `<Error>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XmlError {
    #[serde(rename = "@majorErrorCode", default)]
    pub major_error_code: Option<u16>,
    #[serde(rename = "@minorErrorCode", default)]
    pub minor_error_code: String,
    #[serde(rename = "@message", default)]
    pub message: String,
    #[serde(rename = "@stackTrace", default)]
    pub stack_trace: Option<String>,
}

impl From<XmlError> for VcdError {
    fn from(err: XmlError) -> Self {
        Self {
            major_error_code: err.major_error_code,
            minor_error_code: err.minor_error_code,
            message: err.message,
        }
    }
}

/// Reference to another entity (`<Owner href="..." .../>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@type", default)]
    pub media_type: Option<String>,
}

/// Status of a server-side task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Queued,
    PreRunning,
    Running,
    Success,
    Error,
    Canceled,
    Aborted,
}

impl TaskStatus {
    /// Returns true once the task will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Error | TaskStatus::Canceled | TaskStatus::Aborted
        )
    }

    /// Returns true for a successful terminal state.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Queued => "queued",
            TaskStatus::PreRunning => "preRunning",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Error => "error",
            TaskStatus::Canceled => "canceled",
            TaskStatus::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// A `<Task>` resource describing an asynchronous operation.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@status")]
    pub status: TaskStatus,
    #[serde(rename = "@operation", default)]
    pub operation: Option<String>,
    #[serde(rename = "@operationName", default)]
    pub operation_name: Option<String>,
    #[serde(rename = "@startTime", default)]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "@endTime", default)]
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Entity the task operates on. For create operations this is the new item.
    #[serde(rename = "Owner", default)]
    pub owner: Option<Reference>,
    #[serde(rename = "Error", default)]
    pub error: Option<XmlError>,
    #[serde(rename = "Progress", default)]
    pub progress: Option<u32>,
    #[serde(rename = "Details", default)]
    pub details: Option<String>,
}

impl Task {
    /// Message describing why the task failed, falling back to the status.
    pub fn failure_message(&self) -> String {
        let op = self
            .operation
            .as_deref()
            .or(self.operation_name.as_deref())
            .unwrap_or("task");

        match &self.error {
            Some(err) if !err.message.is_empty() => format!("{}: {}", op, err.message),
            _ => match self.details.as_deref() {
                Some(details) if !details.is_empty() => {
                    format!("{} {}: {}", op, self.status, details)
                }
                _ => format!("{} {}", op, self.status),
            },
        }
    }
}

/// `<SupportedVersions>` document served at `/api/versions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportedVersions {
    #[serde(rename = "VersionInfo", default)]
    pub version_info: Vec<VersionInfo>,
}

/// One `<VersionInfo>` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "@deprecated", default)]
    pub deprecated: Option<bool>,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "LoginUrl", default)]
    pub login_url: Option<String>,
}

impl SupportedVersions {
    /// Highest advertised version, deprecated entries included.
    pub fn max_version(&self) -> Option<ApiVersion> {
        self.version_info
            .iter()
            .filter_map(|v| v.version.parse::<ApiVersion>().ok())
            .max()
    }

    /// Returns true if the server advertises exactly this version.
    pub fn supports(&self, version: &str) -> bool {
        let Ok(wanted) = version.parse::<ApiVersion>() else {
            return false;
        };
        self.version_info
            .iter()
            .filter_map(|v| v.version.parse::<ApiVersion>().ok())
            .any(|v| v == wanted)
    }
}
