//! High-level vCD client holding the negotiated session.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::client::VcdHttpClient;
use crate::codec::{decode_values, BodyFormat};
use crate::config::ClientConfig;
use crate::endpoints::{elevated_versions_for, min_version_for};
use crate::error::{Error, ErrorKind, Result};
use crate::pager::Pager;
use crate::request::{QueryParams, RequestBuilder, RequestMethod};
use crate::response::Response;
use crate::session::Session;
use crate::task::{TaskHandle, TaskTracker};
use crate::types::{SupportedVersions, Task};
use crate::version::ApiVersion;
use crate::{DEFAULT_API_VERSION, LEGACY_API_PREFIX, OPENAPI_PREFIX};

/// Client for one vCD instance.
///
/// Holds the HTTP client and the current [`Session`]. The session only
/// changes through [`set_session`](Self::set_session) and
/// [`clear_session`](Self::clear_session); callers that log in from
/// several tasks must serialize those calls themselves.
#[derive(Clone)]
pub struct VcdClient {
    http: VcdHttpClient,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for VcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcdClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl VcdClient {
    /// Create a client for `https://vcd.example.com` (a trailing `/api` is
    /// accepted and dropped).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            http: VcdHttpClient::new(config)?,
            base_url,
            session: Session::new(DEFAULT_API_VERSION),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &VcdHttpClient {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the session (after a login).
    pub fn set_session(&mut self, session: Session) {
        debug!(
            api_version = %session.api_version,
            org = ?session.org,
            "Session replaced"
        );
        self.session = session;
    }

    /// Drop the token, keeping the negotiated versions.
    pub fn clear_session(&mut self) {
        let mut session = Session::new(self.session.api_version.clone());
        session.max_supported_version = self.session.max_supported_version.take();
        self.session = session;
    }

    pub fn api_version(&self) -> &str {
        &self.session.api_version
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // URLs
    // =========================================================================

    /// `<base>/<path>`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `<base>/api/<path>`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            LEGACY_API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// `<base>/cloudapi/<endpoint>`
    pub fn openapi_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            OPENAPI_PREFIX,
            endpoint.trim_start_matches('/')
        )
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Request carrying the session token, if any.
    pub fn request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        let request = RequestBuilder::new(method, url);
        match self.session.token() {
            Some(token) => request.auth(self.session.auth_header(), token),
            None => request,
        }
    }

    /// Authenticated JSON request pinned to `api_version`.
    pub fn openapi_request(
        &self,
        method: RequestMethod,
        url: impl Into<String>,
        api_version: &str,
    ) -> RequestBuilder {
        self.request(method, url)
            .accept(BodyFormat::Json.accept(api_version))
    }

    /// Authenticated XML request at the session version.
    pub fn xml_request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        self.request(method, url)
            .accept(BodyFormat::Xml.accept(&self.session.api_version))
    }

    /// Execute and classify.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// Execute without classification.
    pub async fn execute_raw(&self, request: RequestBuilder) -> Result<Response> {
        self.http.send_raw(&request).await
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// GET a legacy XML resource.
    pub async fn get_xml<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.execute(self.xml_request(RequestMethod::Get, url))
            .await?
            .xml()
            .await
    }

    /// POST an XML document with a specific vCD media type.
    pub async fn post_xml(&self, url: &str, media_type: &str, body: String) -> Result<Response> {
        let request = self
            .xml_request(RequestMethod::Post, url)
            .content_type(media_type)
            .xml(body);
        self.execute(request).await
    }

    /// GET one OpenAPI resource.
    pub async fn openapi_get<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
        params: QueryParams,
    ) -> Result<T> {
        let request = self
            .openapi_request(RequestMethod::Get, url, api_version)
            .query_params(params);
        self.execute(request).await?.json().await
    }

    /// Send a JSON body to an OpenAPI URL.
    pub async fn openapi_send<B: Serialize>(
        &self,
        method: RequestMethod,
        url: &str,
        api_version: &str,
        body: &B,
    ) -> Result<Response> {
        let request = self
            .openapi_request(method, url, api_version)
            .content_type("application/json")
            .json(body)?;
        self.execute(request).await
    }

    /// Pager over an OpenAPI collection.
    pub fn pager(&self, url: impl Into<String>, api_version: &str, params: QueryParams) -> Pager<'_> {
        Pager::new(self, url, api_version, params)
    }

    /// Every item of an OpenAPI collection, decoded after the last page.
    pub async fn openapi_get_all<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
        params: QueryParams,
    ) -> Result<Vec<T>> {
        let values = self.pager(url, api_version, params).collect_values().await?;
        decode_values(values)
    }

    // =========================================================================
    // Versions
    // =========================================================================

    /// Fetch `/api/versions`. Needs no authentication.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn discover_versions(&self) -> Result<SupportedVersions> {
        let request = RequestBuilder::new(RequestMethod::Get, self.api_url("versions"))
            .accept("application/*+xml");
        self.execute(request)
            .await?
            .xml()
            .await
            .map_err(|e| e.context("discover versions"))
    }

    /// Discover the server's versions and pin `min(requested, max)`,
    /// keeping the current token.
    pub async fn negotiate_version(&mut self, requested: &str) -> Result<()> {
        let versions = self.discover_versions().await?;
        let negotiated = Session::negotiate(requested, &versions)?;

        self.session.api_version = negotiated.api_version;
        self.session.max_supported_version = negotiated.max_supported_version;
        Ok(())
    }

    /// Check that the server can serve `endpoint`.
    ///
    /// Returns the endpoint's minimum version. Performs no I/O.
    pub fn check_endpoint_compatibility(&self, endpoint: &str) -> Result<String> {
        let required = min_version_for(endpoint).ok_or_else(|| {
            Error::new(ErrorKind::Config(format!(
                "endpoint '{}' has no minimum API version defined",
                endpoint
            )))
        })?;
        let required_version: ApiVersion = required.parse()?;
        let max = self.session.max_version()?;

        if max < required_version {
            return Err(Error::new(ErrorKind::UnsupportedVersion {
                endpoint: endpoint.to_string(),
                required: required.to_string(),
                max_supported: max.to_string(),
            }));
        }

        Ok(required.to_string())
    }

    /// Highest declared elevated version the server supports, falling back
    /// to the endpoint minimum.
    pub fn highest_elevated_version(&self, endpoint: &str) -> Result<String> {
        let minimum = self.check_endpoint_compatibility(endpoint)?;
        let max = self.session.max_version()?;

        let best = elevated_versions_for(endpoint)
            .iter()
            .filter_map(|v| v.parse::<ApiVersion>().ok().map(|parsed| (*v, parsed)))
            .filter(|(_, parsed)| *parsed <= max)
            .max_by(|a, b| a.1.cmp(&b.1))
            .map(|(v, _)| v.to_string());

        Ok(best.unwrap_or(minimum))
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn task_tracker(&self) -> TaskTracker<'_> {
        TaskTracker::new(self)
    }

    /// Wait on the task behind a `202 Accepted` response.
    pub async fn wait_for_task(&self, response: &Response) -> Result<Task> {
        let handle = TaskHandle::from_response(response)?;
        self.task_tracker().wait(&handle).await
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let trimmed = trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let parsed = url::Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::new(ErrorKind::InvalidUrl(format!(
            "'{}' is not an http(s) URL",
            raw
        ))));
    }

    Ok(trimmed.to_string())
}
