//! Generic OpenAPI item operations.
//!
//! `endpoint` is always a key of the endpoint compatibility table such as
//! `1.0.0/roles/`. Item ids are appended to it after validation.

use busbar_vcd_client::security::url::entity_path;
use busbar_vcd_client::{decode_values, QueryParams, RequestMethod, Response, Task};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};

impl super::OpenApiClient {
    /// Gate the endpoint and pick the API version to call it with.
    ///
    /// Fails without any I/O when the server is too old.
    pub fn endpoint_version(&self, endpoint: &str) -> Result<String> {
        Ok(self.client.highest_elevated_version(endpoint)?)
    }

    /// GET one item by id.
    #[instrument(skip(self))]
    pub async fn get_item<T: DeserializeOwned>(&self, endpoint: &str, id: &str) -> Result<T> {
        let version = self.endpoint_version(endpoint)?;
        let path = item_path(endpoint, id)?;

        let response = self
            .client
            .execute(self.request(RequestMethod::Get, &path, &version))
            .await?;
        Ok(response.json().await?)
    }

    /// GET every item of a collection, following `nextPage` links.
    #[instrument(skip(self, params))]
    pub async fn get_all_items<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<Vec<T>> {
        let version = self.endpoint_version(endpoint)?;
        let values = self
            .client
            .pager(self.client.openapi_url(endpoint), &version, params)
            .with_headers(self.tenant_headers())
            .collect_values()
            .await?;

        debug!(count = values.len(), "Fetched items");
        Ok(decode_values(values)?)
    }

    /// POST a new item that the server creates synchronously.
    #[instrument(skip(self, body))]
    pub async fn post_item_sync<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(RequestMethod::Post, endpoint, endpoint, body).await?;
        expect_status(&response, RequestMethod::Post, endpoint, &[200, 201])?;
        Ok(response.json().await?)
    }

    /// POST a new item that the server creates through a task.
    ///
    /// Returns the finished task.
    #[instrument(skip(self, body))]
    pub async fn post_item_async<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Task> {
        let response = self.send(RequestMethod::Post, endpoint, endpoint, body).await?;
        expect_status(&response, RequestMethod::Post, endpoint, &[202])?;
        Ok(self.client.wait_for_task(&response).await?)
    }

    /// POST a new item and return it, whether the server answers directly
    /// or through a task.
    #[instrument(skip(self, body))]
    pub async fn post_item<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(RequestMethod::Post, endpoint, endpoint, body).await?;

        if response.status() == 202 {
            let task = self.client.wait_for_task(&response).await?;
            let id = task
                .owner
                .as_ref()
                .and_then(|owner| owner.id.clone())
                .ok_or_else(|| {
                    Error::new(ErrorKind::Task(format!(
                        "task {} finished without an owner id",
                        task.href
                    )))
                })?;
            return self.get_item(endpoint, &id).await;
        }

        expect_status(&response, RequestMethod::Post, endpoint, &[200, 201])?;
        Ok(response.json().await?)
    }

    /// PUT an updated item that the server applies synchronously.
    #[instrument(skip(self, body))]
    pub async fn put_item_sync<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: &str,
        body: &B,
    ) -> Result<T> {
        let path = item_path(endpoint, id)?;
        let response = self.send(RequestMethod::Put, endpoint, &path, body).await?;
        expect_status(&response, RequestMethod::Put, &path, &[200, 201])?;
        Ok(response.json().await?)
    }

    /// PUT an updated item that the server applies through a task.
    #[instrument(skip(self, body))]
    pub async fn put_item_async<B: Serialize>(
        &self,
        endpoint: &str,
        id: &str,
        body: &B,
    ) -> Result<Task> {
        let path = item_path(endpoint, id)?;
        let response = self.send(RequestMethod::Put, endpoint, &path, body).await?;
        expect_status(&response, RequestMethod::Put, &path, &[202])?;
        Ok(self.client.wait_for_task(&response).await?)
    }

    /// PUT an updated item and return its new state.
    #[instrument(skip(self, body))]
    pub async fn put_item<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: &str,
        body: &B,
    ) -> Result<T> {
        let path = item_path(endpoint, id)?;
        let response = self.send(RequestMethod::Put, endpoint, &path, body).await?;

        if response.status() == 202 {
            self.client.wait_for_task(&response).await?;
            return self.get_item(endpoint, id).await;
        }

        expect_status(&response, RequestMethod::Put, &path, &[200, 201])?;
        Ok(response.json().await?)
    }

    /// DELETE an item, waiting for the task if the server starts one.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, endpoint: &str, id: &str) -> Result<()> {
        let version = self.endpoint_version(endpoint)?;
        let path = item_path(endpoint, id)?;

        let response = self
            .client
            .execute(self.request(RequestMethod::Delete, &path, &version))
            .await?;

        if response.status() == 202 {
            self.client.wait_for_task(&response).await?;
        }
        Ok(())
    }

    /// Send a JSON body to `path`, gated on `endpoint`.
    async fn send<B: Serialize>(
        &self,
        method: RequestMethod,
        endpoint: &str,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let version = self.endpoint_version(endpoint)?;
        let request = self.request(method, path, &version).json(body)?;
        Ok(self.client.execute(request).await?)
    }
}

/// `<endpoint><id>` for a valid entity id.
pub(crate) fn item_path(endpoint: &str, id: &str) -> Result<String> {
    entity_path(endpoint, id)
        .ok_or_else(|| Error::new(ErrorKind::InvalidId(format!("'{}' is not a vCD entity id", id))))
}

fn expect_status(
    response: &Response,
    method: RequestMethod,
    path: &str,
    expected: &[u16],
) -> Result<()> {
    if expected.contains(&response.status()) {
        return Ok(());
    }

    let expected = expected
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    Err(Error::new(ErrorKind::UnexpectedStatus {
        operation: format!("{} {}", method, path),
        expected,
        got: response.status(),
    }))
}
