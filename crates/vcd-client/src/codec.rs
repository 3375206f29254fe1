//! Body codecs for the two vCD surfaces.
//!
//! `/cloudapi` speaks JSON and `/api` speaks XML. Collections from
//! `/cloudapi` come wrapped in a [`PageEnvelope`] whose `values` are kept
//! untyped until every page has arrived, then converted with
//! [`decode_values`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Payload format, detected from a `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Xml,
}

impl BodyFormat {
    /// `application/json;version=37.0` → Json,
    /// `application/vnd.vmware.vcloud.task+xml` → Xml.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime.ends_with("json") {
            Some(BodyFormat::Json)
        } else if mime.ends_with("xml") {
            Some(BodyFormat::Xml)
        } else {
            None
        }
    }

    /// Version-qualified `Accept` header value.
    pub fn accept(&self, api_version: &str) -> String {
        match self {
            BodyFormat::Json => format!("application/json;version={}", api_version),
            BodyFormat::Xml => format!("application/*+xml;version={}", api_version),
        }
    }

    /// Guess from the first non-whitespace byte.
    fn sniff(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => BodyFormat::Json,
            _ => BodyFormat::Xml,
        }
    }
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

/// Serialize to XML; the root element is named after the type.
pub fn encode_xml<T: Serialize>(value: &T) -> Result<String> {
    quick_xml::se::to_string(value)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(Into::into)
}

pub fn decode_xml<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    quick_xml::de::from_reader(bytes).map_err(Into::into)
}

/// Decode according to the content type, sniffing the body when the
/// header is missing or unrecognized.
pub fn decode<T: DeserializeOwned>(content_type: Option<&str>, bytes: &[u8]) -> Result<T> {
    let format = content_type
        .and_then(BodyFormat::from_content_type)
        .unwrap_or_else(|| BodyFormat::sniff(bytes));

    match format {
        BodyFormat::Json => decode_json(bytes),
        BodyFormat::Xml => decode_xml(bytes),
    }
}

/// One page of an OpenAPI collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    #[serde(default)]
    pub result_total: u64,
    #[serde(default)]
    pub page_count: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// Convert accumulated page values into typed items, keeping their order.
///
/// The error names the index of the first value that failed.
pub fn decode_values<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .map_err(|e| Error::from(e).context(format!("value #{}", i)))
        })
        .collect()
}
