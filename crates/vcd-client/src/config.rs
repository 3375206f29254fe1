//! Transport and polling settings for a [`VcdClient`](crate::VcdClient).

use crate::poll::PollConfig;
use std::time::Duration;

/// Settings shared by every request a client sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request deadline.
    pub timeout: Duration,
    /// TCP + TLS handshake deadline.
    pub connect_timeout: Duration,
    /// How long an unused keep-alive connection stays open.
    pub pool_idle_timeout: Duration,
    /// Keep-alive connections retained for the vCD host.
    pub pool_max_idle_per_host: usize,
    /// Sent as `User-Agent`.
    pub user_agent: String,
    /// Emit a debug event per request and response.
    pub enable_tracing: bool,
    /// Whether to log a preview of outbound request bodies.
    pub log_request_bodies: bool,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Upper bound for waiting on a single task.
    pub max_retry_timeout: Duration,
    /// Delay schedule between task polls.
    pub task_poll: PollConfig,
    /// `pageSize` sent with collection requests that do not set one.
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
            log_request_bodies: false,
            accept_invalid_certs: false,
            max_retry_timeout: Duration::from_secs(60),
            task_poll: PollConfig::default(),
            page_size: crate::DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`], starting from the defaults.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Per-request debug events (on by default).
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Log a truncated preview of every request body.
    pub fn with_request_body_logging(mut self, enabled: bool) -> Self {
        self.config.log_request_bodies = enabled;
        self
    }

    /// Skip TLS certificate verification.
    pub fn with_insecure_tls(mut self, insecure: bool) -> Self {
        self.config.accept_invalid_certs = insecure;
        self
    }

    /// Set the bound on task polling.
    pub fn with_max_retry_timeout(mut self, timeout: Duration) -> Self {
        self.config.max_retry_timeout = timeout;
        self
    }

    /// Set the task poll schedule.
    pub fn with_task_poll(mut self, poll: PollConfig) -> Self {
        self.config.task_poll = poll;
        self
    }

    /// Set the default collection page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
