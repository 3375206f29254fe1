use busbar_vcd_client::{QueryParams, RequestMethod, ENDPOINT_GLOBAL_ROLES};
use tracing::instrument;

use super::items::item_path;
use crate::error::{Error, ErrorKind, Result};
use crate::filter::FilterBuilder;
use crate::types::{GlobalRole, OpenApiItems, OpenApiReference};

impl super::OpenApiClient {
    #[instrument(skip(self, params))]
    pub async fn get_all_global_roles(&self, params: QueryParams) -> Result<Vec<GlobalRole>> {
        self.get_all_items(ENDPOINT_GLOBAL_ROLES, params).await
    }

    #[instrument(skip(self))]
    pub async fn get_global_role_by_id(&self, id: &str) -> Result<GlobalRole> {
        self.get_item(ENDPOINT_GLOBAL_ROLES, id).await
    }

    #[instrument(skip(self))]
    pub async fn get_global_role_by_name(&self, name: &str) -> Result<GlobalRole> {
        let params = FilterBuilder::all().eq("name", name)?.into_params();
        self.get_all_global_roles(params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::new(ErrorKind::NotFound(format!("global role '{}'", name))))
    }

    #[instrument(skip(self, role), fields(name = %role.name))]
    pub async fn create_global_role(&self, role: &GlobalRole) -> Result<GlobalRole> {
        self.post_item(ENDPOINT_GLOBAL_ROLES, role).await
    }

    #[instrument(skip(self, role), fields(name = %role.name))]
    pub async fn update_global_role(&self, role: &GlobalRole) -> Result<GlobalRole> {
        let id = role.id.as_deref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidId("global role has no id".to_string()))
        })?;
        self.put_item(ENDPOINT_GLOBAL_ROLES, id, role).await
    }

    #[instrument(skip(self))]
    pub async fn delete_global_role(&self, id: &str) -> Result<()> {
        self.delete_item(ENDPOINT_GLOBAL_ROLES, id).await
    }

    /// Rights granted by a global role.
    #[instrument(skip(self))]
    pub async fn get_global_role_rights(&self, id: &str) -> Result<Vec<OpenApiReference>> {
        let path = format!("{}/rights/", item_path(ENDPOINT_GLOBAL_ROLES, id)?);
        let version = self.endpoint_version(ENDPOINT_GLOBAL_ROLES)?;

        let values = self
            .client
            .pager(self.client.openapi_url(&path), &version, QueryParams::new())
            .with_headers(self.tenant_headers())
            .collect_values()
            .await?;
        Ok(busbar_vcd_client::decode_values(values)?)
    }

    /// Replace the rights of a global role.
    #[instrument(skip(self, rights), fields(count = rights.len()))]
    pub async fn set_global_role_rights(
        &self,
        id: &str,
        rights: Vec<OpenApiReference>,
    ) -> Result<()> {
        let path = format!("{}/rights/", item_path(ENDPOINT_GLOBAL_ROLES, id)?);
        self.send_references(RequestMethod::Put, &path, rights).await
    }

    /// Publish a global role to the given tenants.
    #[instrument(skip(self, tenants), fields(count = tenants.len()))]
    pub async fn publish_global_role(
        &self,
        id: &str,
        tenants: Vec<OpenApiReference>,
    ) -> Result<()> {
        let path = format!("{}/tenants/publish", item_path(ENDPOINT_GLOBAL_ROLES, id)?);
        self.send_references(RequestMethod::Post, &path, tenants).await
    }

    /// Withdraw a global role from the given tenants.
    #[instrument(skip(self, tenants), fields(count = tenants.len()))]
    pub async fn unpublish_global_role(
        &self,
        id: &str,
        tenants: Vec<OpenApiReference>,
    ) -> Result<()> {
        let path = format!("{}/tenants/unpublish", item_path(ENDPOINT_GLOBAL_ROLES, id)?);
        self.send_references(RequestMethod::Post, &path, tenants).await
    }

    async fn send_references(
        &self,
        method: RequestMethod,
        path: &str,
        references: Vec<OpenApiReference>,
    ) -> Result<()> {
        let version = self.endpoint_version(ENDPOINT_GLOBAL_ROLES)?;
        let request = self
            .request(method, path, &version)
            .json(&OpenApiItems::new(references))?;
        self.client.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client_for;
    use crate::types::OpenApiReference;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROLE_ID: &str = "urn:vcloud:globalRole:4c3e7f8c-4b5d-4a4e-b1a6-0b5b8c3ec9b1";
    const ORG_ID: &str = "urn:vcloud:org:a93c9db9-7471-3192-8d09-a8f7eeda85f9";

    #[tokio::test]
    async fn test_global_roles_use_elevated_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudapi/1.0.0/globalRoles/"))
            .and(header("Accept", "application/json;version=35.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultTotal": 1, "pageCount": 1, "page": 1, "pageSize": 128,
                "values": [{"id": ROLE_ID, "name": "vApp Author", "description": "", "readOnly": true, "publishAll": false}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "36.0");
        let roles = client.get_all_global_roles(Default::default()).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert!(roles[0].read_only);
    }

    #[tokio::test]
    async fn test_publish_global_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/cloudapi/1.0.0/globalRoles/{}/tenants/publish",
                ROLE_ID
            )))
            .and(body_json(serde_json::json!({"values": [{"name": "acme", "id": ORG_ID}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"values": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "37.0");
        client
            .publish_global_role(ROLE_ID, vec![OpenApiReference::new(ORG_ID).with_name("acme")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_global_role_by_name_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultTotal": 0, "pageCount": 0, "page": 1, "pageSize": 128, "values": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "37.0");
        assert!(client
            .get_global_role_by_name("missing")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
