//! Core HTTP client with compression, tracing and response classification.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{Authorization, RequestBody, RequestBuilder, RequestMethod};
use crate::response::{classify, redact_secrets, Response};

/// HTTP client for vCD APIs.
///
/// Redirects are not followed: vCD never redirects API calls, so a 3xx
/// surfaces as an unhandled response. There is no retry layer.
#[derive(Debug, Clone)]
pub struct VcdHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl VcdHttpClient {
    /// Create a new HTTP client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Put, url)
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Delete, url)
    }

    /// Execute a request and classify the response.
    ///
    /// Errors carry the method and URL as context.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let result = self.send_raw(&request).await;
        classify(result)
            .await
            .map_err(|e| e.context(format!("{} {}", request.method, request.url)))
    }

    /// Send a request without classifying the response.
    ///
    /// Used by flows that must inspect redirects or non-vCD services.
    pub async fn send_raw(&self, request: &RequestBuilder) -> Result<Response> {
        let url = request.build_url()?;
        let mut req = self.inner.request(request.method.to_reqwest(), url.clone());

        match &request.auth {
            Some(Authorization::Token { header, token }) => {
                req = req.header(header.header_name(), header.header_value(token));
            }
            Some(Authorization::Basic { username, password }) => {
                req = req.basic_auth(username, Some(password));
            }
            None => {}
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.body(serde_json::to_vec(value)?),
                RequestBody::Text(text) => req.body(text.clone()),
                RequestBody::Bytes(bytes) => req.body(bytes.clone()),
                RequestBody::Form(data) => req.body(serde_urlencoded::to_string(data)?),
            };
        }

        if self.config.enable_tracing {
            debug!(method = %request.method, url = %url, "Sending request");
            if self.config.log_request_bodies {
                if let Some(preview) = request.body_preview() {
                    debug!(body = %redact_secrets(&preview), "Request body");
                }
            }
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }

    /// Execute a request and deserialize the JSON response.
    pub async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(request).await?;
        response.json().await
    }
}
