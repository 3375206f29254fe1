//! HTTP request building with vCD-specific headers.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::error::{Error, ErrorKind, Result};
use crate::session::AuthHeader;

/// Longest request body preview written to the log.
const BODY_PREVIEW_LIMIT: usize = 1024;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
    Head,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
            RequestMethod::Head => reqwest::Method::HEAD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials attached to a single request.
#[derive(Clone)]
pub enum Authorization {
    /// Session token in the header chosen by the session.
    Token { header: AuthHeader, token: String },
    /// HTTP Basic, used only to open a session.
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Token { header, .. } => f
                .debug_struct("Token")
                .field("header", header)
                .field("token", &"[REDACTED]")
                .finish(),
            Authorization::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Query parameters of a request.
///
/// `encoded` pairs are percent-encoded when the URL is built. `raw`
/// fragments are appended verbatim and must already be encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    encoded: Vec<(String, String)>,
    raw: Vec<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter that is encoded when the URL is built.
    pub fn add(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.encoded.push((name.into(), value.into()));
    }

    /// Add a pre-encoded `name=value` fragment.
    pub fn add_raw(mut self, fragment: impl Into<String>) -> Self {
        self.raw.push(fragment.into());
        self
    }

    /// Add a FIQL `filter` parameter.
    pub fn filter(self, fiql: impl Into<String>) -> Self {
        self.add("filter", fiql)
    }

    /// Add a `pageSize` parameter.
    pub fn page_size(self, size: u32) -> Self {
        self.add("pageSize", size.to_string())
    }

    /// Returns true if a parameter with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
            || self
                .raw
                .iter()
                .any(|r| r.split('=').next() == Some(name))
    }

    /// First encoded value for a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.encoded
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty() && self.raw.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.encoded.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append both parameter sets of `other`.
    pub fn extend(&mut self, other: QueryParams) {
        self.encoded.extend(other.encoded);
        self.raw.extend(other.raw);
    }

    /// Apply the parameters to a parsed URL, keeping its existing query.
    pub fn apply(&self, url: &mut Url) {
        if !self.encoded.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &self.encoded {
                pairs.append_pair(k, v);
            }
        }

        if !self.raw.is_empty() {
            let mut query = url.query().unwrap_or_default().to_string();
            for fragment in &self.raw {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(fragment);
            }
            url.set_query(Some(&query));
        }
    }
}

/// Builder for HTTP requests with vCD-specific options.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query: QueryParams,
    pub(crate) body: Option<RequestBody>,
    pub(crate) auth: Option<Authorization>,
}

/// Request body content.
#[derive(Debug)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Bounded, loggable view of the body.
    ///
    /// Form values are never shown since they carry refresh tokens.
    pub fn preview(&self) -> String {
        match self {
            RequestBody::Json(value) => truncate(&value.to_string()),
            RequestBody::Text(text) => truncate(text),
            RequestBody::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            RequestBody::Form(pairs) => {
                let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
                format!("<form: {}>", keys.join(", "))
            }
        }
    }
}

fn truncate(s: &str) -> String {
    if s.len() <= BODY_PREVIEW_LIMIT {
        return s.to_string();
    }
    let mut end = BODY_PREVIEW_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[{} bytes]", &s[..end], s.len())
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query: QueryParams::default(),
            body: None,
            auth: None,
        }
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Attach a session token.
    pub fn auth(mut self, header: AuthHeader, token: impl Into<String>) -> Self {
        self.auth = Some(Authorization::Token {
            header,
            token: token.into(),
        });
        self
    }

    /// Attach HTTP Basic credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Authorization::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the `Accept` header.
    pub fn accept(self, value: impl Into<String>) -> Self {
        self.header("Accept", value)
    }

    /// Override the `Content-Type` header.
    pub fn content_type(self, value: impl Into<String>) -> Self {
        self.header("Content-Type", value)
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name, value);
        self
    }

    /// Add a pre-encoded query fragment.
    pub fn raw_query(mut self, fragment: impl Into<String>) -> Self {
        self.query.raw.push(fragment.into());
        self
    }

    /// Merge a parameter set.
    pub fn query_params(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        self.body = Some(RequestBody::Json(value));
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());
        Ok(self)
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());
        self
    }

    /// Set XML body. Use [`content_type`](Self::content_type) for a
    /// specific vCD media type.
    pub fn xml(mut self, data: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(data.into()));
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/*+xml;charset=UTF-8".to_string());
        self
    }

    /// Set text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "text/plain".to_string());
        self
    }

    /// Set bytes body.
    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    /// Set form body.
    pub fn form(mut self, data: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(data));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        self
    }

    /// Parse the target URL and apply the query parameters.
    ///
    /// Fails with [`ErrorKind::InvalidUrl`] before any I/O.
    pub fn build_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url).map_err(|e| {
            Error::with_source(ErrorKind::InvalidUrl(format!("'{}': {}", self.url, e)), e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "'{}': unsupported scheme '{}'",
                self.url,
                url.scheme()
            ))));
        }

        self.query.apply(&mut url);
        Ok(url)
    }

    /// Loggable preview of the body, if any.
    pub fn body_preview(&self) -> Option<String> {
        self.body.as_ref().map(RequestBody::preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = RequestBuilder::new(RequestMethod::Get, "https://vcd.example.com/api/org")
            .auth(AuthHeader::Bearer, "token123")
            .header("X-Custom", "value")
            .query("page", "1");

        assert_eq!(req.method, RequestMethod::Get);
        assert_eq!(req.url, "https://vcd.example.com/api/org");
        assert!(matches!(
            req.auth,
            Some(Authorization::Token { header: AuthHeader::Bearer, ref token }) if token == "token123"
        ));
        assert_eq!(req.headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(req.query.get("page"), Some("1"));
    }

    #[test]
    fn test_build_url_encodes_params() {
        let req = RequestBuilder::new(
            RequestMethod::Get,
            "https://vcd.example.com/cloudapi/1.0.0/roles/",
        )
        .query("filter", "name==Org Admin")
        .query("pageSize", "128");

        let url = req.build_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://vcd.example.com/cloudapi/1.0.0/roles/?filter=name%3D%3DOrg+Admin&pageSize=128"
        );
    }

    #[test]
    fn test_build_url_keeps_existing_query_and_raw() {
        let req = RequestBuilder::new(
            RequestMethod::Get,
            "https://vcd.example.com/cloudapi/1.0.0/rights/?page=2",
        )
        .raw_query("filter=name%3D%3DView%2520Roles")
        .query("pageSize", "10");

        let url = req.build_url().unwrap();
        assert_eq!(
            url.query(),
            Some("page=2&pageSize=10&filter=name%3D%3DView%2520Roles")
        );
    }

    #[test]
    fn test_build_url_rejects_malformed() {
        for bad in ["not a url", "vcd.example.com/api", "ftp://vcd.example.com/api", ""] {
            let err = RequestBuilder::new(RequestMethod::Get, bad)
                .build_url()
                .unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::InvalidUrl(_)),
                "expected InvalidUrl for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_json_body_keeps_explicit_content_type() {
        let req = RequestBuilder::new(RequestMethod::Post, "https://vcd.example.com")
            .content_type("application/json;version=37.0")
            .json(&serde_json::json!({"name": "r1"}))
            .unwrap();

        assert!(matches!(req.body, Some(RequestBody::Json(_))));
        assert_eq!(
            req.headers.get("Content-Type"),
            Some(&"application/json;version=37.0".to_string())
        );
    }

    #[test]
    fn test_query_params_contains() {
        let params = QueryParams::new()
            .filter("name==r1")
            .add_raw("sortAsc=name");
        assert!(params.contains("filter"));
        assert!(params.contains("sortAsc"));
        assert!(!params.contains("pageSize"));
        assert!(!params.is_empty());
        assert!(QueryParams::new().is_empty());
    }

    #[test]
    fn test_body_preview_is_bounded() {
        let req = RequestBuilder::new(RequestMethod::Post, "https://vcd.example.com")
            .text("é".repeat(2000));
        let preview = req.body_preview().unwrap();
        assert!(preview.len() < 1100);
        assert!(preview.ends_with("[4000 bytes]"));

        // The body itself is untouched.
        match req.body {
            Some(RequestBody::Text(ref t)) => assert_eq!(t.len(), 4000),
            _ => panic!("expected text body"),
        }
    }

    #[test]
    fn test_form_preview_hides_values() {
        let req = RequestBuilder::new(RequestMethod::Post, "https://vcd.example.com")
            .form(vec![
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("refresh_token".to_string(), "secret-value".to_string()),
            ]);
        let preview = req.body_preview().unwrap();
        assert!(!preview.contains("secret-value"));
        assert!(preview.contains("refresh_token"));
    }

    #[test]
    fn test_authorization_debug_redacts() {
        let auth = Authorization::Basic {
            username: "admin@System".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin@System"));
    }
}
