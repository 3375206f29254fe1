//! Tracking of asynchronous (HTTP 202) operations.
//!
//! vCD answers long-running requests with `202 Accepted` and a `Location`
//! header pointing at a `<Task>` resource. [`TaskTracker::wait`] polls that
//! resource until it reaches a terminal status or the configured bound
//! elapses.

use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::poll::PollConfig;
use crate::request::RequestMethod;
use crate::response::Response;
use crate::types::{Task, TaskStatus};
use crate::vcd_client::VcdClient;

/// URL of a server-side task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    url: String,
}

impl TaskHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Extract the task URL from a `202 Accepted` response.
    pub fn from_response(response: &Response) -> Result<Self> {
        if response.status() != 202 {
            return Err(Error::new(ErrorKind::Task(format!(
                "expected 202 Accepted for an asynchronous operation, got {}",
                response.status_text()
            ))));
        }

        match response.location() {
            Some(location) if !location.trim().is_empty() => Ok(Self::new(location.trim())),
            _ => Err(Error::new(ErrorKind::Task(
                "202 Accepted response carried no Location header".to_string(),
            ))),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trailing id segment of the task URL.
    pub fn id(&self) -> &str {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.url)
    }
}

/// Polls tasks on behalf of a client.
#[derive(Debug, Clone)]
pub struct TaskTracker<'a> {
    client: &'a VcdClient,
    timeout: Duration,
    poll: PollConfig,
}

impl<'a> TaskTracker<'a> {
    /// Tracker using the client's configured bound and poll schedule.
    pub fn new(client: &'a VcdClient) -> Self {
        let config = client.config();
        Self {
            client,
            timeout: config.max_retry_timeout,
            poll: config.task_poll.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Fetch the current task document.
    pub async fn refresh(&self, handle: &TaskHandle) -> Result<Task> {
        let request = self.client.xml_request(RequestMethod::Get, handle.url());
        self.client.execute(request).await?.xml().await
    }

    /// Wait until the task finishes.
    ///
    /// Failed, canceled and aborted tasks become [`ErrorKind::Task`]. A
    /// failing poll request ends the wait immediately.
    #[instrument(skip(self), fields(task = %handle.url()))]
    pub async fn wait(&self, handle: &TaskHandle) -> Result<Task> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            let task = self.refresh(handle).await?;
            debug!(status = %task.status, progress = ?task.progress, "Task status");

            if task.status.is_terminal() {
                return match task.status {
                    TaskStatus::Success => Ok(task),
                    _ => {
                        warn!(status = %task.status, "Task did not succeed");
                        Err(Error::new(ErrorKind::Task(task.failure_message())))
                    }
                };
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                return Err(Error::new(ErrorKind::TaskTimeout {
                    task: handle.url().to_string(),
                    timeout: self.timeout,
                }));
            }

            let delay = self.poll.delay(attempt).min(self.timeout - elapsed);
            attempt = attempt.saturating_add(1);
            tokio::time::sleep(delay).await;
        }
    }

    /// Ask the server to cancel the task.
    #[instrument(skip(self), fields(task = %handle.url()))]
    pub async fn cancel(&self, handle: &TaskHandle) -> Result<()> {
        let url = format!("{}/action/cancel", handle.url().trim_end_matches('/'));
        let request = self.client.xml_request(RequestMethod::Post, url);
        self.client.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::{AuthHeader, Session};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn task_xml(server: &MockServer, status: &str, extra: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Task xmlns="http://www.vmware.com/vcloud/v1.5" status="{status}" operation="Creating Role r1"
    href="{uri}/api/task/42" id="urn:vcloud:task:42">{extra}</Task>"#,
            uri = server.uri()
        )
    }

    fn client(server: &MockServer, timeout: Duration) -> VcdClient {
        let config = ClientConfig::builder()
            .with_max_retry_timeout(timeout)
            .with_task_poll(PollConfig::default().with_interval(Duration::from_millis(10)))
            .build();
        let mut client = VcdClient::with_config(server.uri(), config).unwrap();
        client.set_session(Session::new("37.0").with_token("tok", AuthHeader::Bearer));
        client
    }

    #[tokio::test]
    async fn test_wait_until_success() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let running = task_xml(&server, "running", "");
        let done = task_xml(&server, "success", "<Progress>100</Progress>");

        Mock::given(method("GET"))
            .and(path("/api/task/42"))
            .and(header("Accept", "application/*+xml;version=37.0"))
            .respond_with(move |_: &wiremock::Request| {
                let body = if calls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                    running.clone()
                } else {
                    done.clone()
                };
                ResponseTemplate::new(200)
                    .set_body_raw(body, "application/vnd.vmware.vcloud.task+xml")
            })
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        let handle = TaskHandle::new(format!("{}/api/task/42", server.uri()));
        let task = client.task_tracker().wait(&handle).await.unwrap();

        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_task_is_task_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/42"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                task_xml(
                    &server,
                    "error",
                    r#"<Error majorErrorCode="400" minorErrorCode="BAD_REQUEST" message="duplicate name"/>"#,
                ),
                "application/vnd.vmware.vcloud.task+xml",
            ))
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        let err = client
            .task_tracker()
            .wait(&TaskHandle::new(format!("{}/api/task/42", server.uri())))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Task(ref m) if m.contains("duplicate name")));
    }

    #[tokio::test]
    async fn test_aborted_task_without_error_names_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(task_xml(&server, "aborted", ""), "application/*+xml"),
            )
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        let err = client
            .task_tracker()
            .wait(&TaskHandle::new(format!("{}/api/task/42", server.uri())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("aborted"), "{err}");
    }

    #[tokio::test]
    async fn test_never_ending_task_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(task_xml(&server, "running", ""), "application/*+xml"),
            )
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_millis(200));
        let started = Instant::now();
        let err = client
            .task_tracker()
            .wait(&TaskHandle::new(format!("{}/api/task/42", server.uri())))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::TaskTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_poll_failure_ends_wait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/task/42"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(
                r#"<Error majorErrorCode="404" minorErrorCode="RESOURCE_NOT_FOUND" message="gone"/>"#,
                "application/*+xml",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        let err = client
            .task_tracker()
            .wait(&TaskHandle::new(format!("{}/api/task/42", server.uri())))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transport_failure_ends_wait() {
        let server = MockServer::start().await;
        let client = client(&server, Duration::from_secs(30));
        let started = Instant::now();

        // Nothing listens on port 1.
        let err = client
            .task_tracker()
            .wait(&TaskHandle::new("http://127.0.0.1:1/api/task/42"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Connection(_)), "{err}");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_handle_requires_202_with_location() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accepted"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Location", format!("{}/api/task/7", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bare"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/created"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        let post = |p: &str| client.request(RequestMethod::Post, format!("{}{}", server.uri(), p));

        let resp = client.execute(post("/accepted")).await.unwrap();
        let handle = TaskHandle::from_response(&resp).unwrap();
        assert!(handle.url().ends_with("/api/task/7"));
        assert_eq!(handle.id(), "7");

        let resp = client.execute(post("/bare")).await.unwrap();
        assert!(TaskHandle::from_response(&resp).is_err());

        let resp = client.execute(post("/created")).await.unwrap();
        assert!(TaskHandle::from_response(&resp).is_err());
    }

    #[tokio::test]
    async fn test_cancel_posts_action() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/task/42/action/cancel"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Duration::from_secs(5));
        client
            .task_tracker()
            .cancel(&TaskHandle::new(format!("{}/api/task/42", server.uri())))
            .await
            .unwrap();
    }
}
