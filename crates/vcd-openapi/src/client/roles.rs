use busbar_vcd_client::{QueryParams, RequestMethod, ENDPOINT_ROLES};
use tracing::instrument;

use super::items::item_path;
use crate::error::{Error, ErrorKind, Result};
use crate::filter::FilterBuilder;
use crate::types::{OpenApiItems, OpenApiReference, Role};

impl super::OpenApiClient {
    /// All roles visible to the session.
    #[instrument(skip(self, params))]
    pub async fn get_all_roles(&self, params: QueryParams) -> Result<Vec<Role>> {
        self.get_all_items(ENDPOINT_ROLES, params).await
    }

    #[instrument(skip(self))]
    pub async fn get_role_by_id(&self, id: &str) -> Result<Role> {
        self.get_item(ENDPOINT_ROLES, id).await
    }

    /// The role with exactly this name.
    #[instrument(skip(self))]
    pub async fn get_role_by_name(&self, name: &str) -> Result<Role> {
        let params = FilterBuilder::all().eq("name", name)?.into_params();
        let mut roles = self.get_all_roles(params).await?;

        match roles.len() {
            0 => Err(Error::new(ErrorKind::NotFound(format!("role '{}'", name)))),
            1 => Ok(roles.remove(0)),
            n => Err(Error::new(ErrorKind::Other(format!(
                "{} roles named '{}'",
                n, name
            )))),
        }
    }

    #[instrument(skip(self, role), fields(name = %role.name))]
    pub async fn create_role(&self, role: &Role) -> Result<Role> {
        self.post_item(ENDPOINT_ROLES, role).await
    }

    #[instrument(skip(self, role), fields(name = %role.name))]
    pub async fn update_role(&self, role: &Role) -> Result<Role> {
        let id = role.id.as_deref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidId("role has no id".to_string()))
        })?;
        self.put_item(ENDPOINT_ROLES, id, role).await
    }

    #[instrument(skip(self))]
    pub async fn delete_role(&self, id: &str) -> Result<()> {
        self.delete_item(ENDPOINT_ROLES, id).await
    }

    /// Rights granted by a role.
    #[instrument(skip(self))]
    pub async fn get_role_rights(&self, id: &str) -> Result<Vec<OpenApiReference>> {
        let path = format!("{}/rights/", item_path(ENDPOINT_ROLES, id)?);
        let version = self.endpoint_version(ENDPOINT_ROLES)?;

        let values = self
            .client
            .pager(self.client.openapi_url(&path), &version, QueryParams::new())
            .with_headers(self.tenant_headers())
            .collect_values()
            .await?;
        Ok(busbar_vcd_client::decode_values(values)?)
    }

    /// Replace the rights of a role.
    #[instrument(skip(self, rights), fields(count = rights.len()))]
    pub async fn set_role_rights(&self, id: &str, rights: Vec<OpenApiReference>) -> Result<()> {
        let path = format!("{}/rights/", item_path(ENDPOINT_ROLES, id)?);
        let version = self.endpoint_version(ENDPOINT_ROLES)?;

        let request = self
            .request(RequestMethod::Put, &path, &version)
            .json(&OpenApiItems::new(rights))?;
        self.client.execute(request).await?;
        Ok(())
    }

    /// Add rights to a role, keeping the ones it already has.
    pub async fn add_role_rights(&self, id: &str, rights: Vec<OpenApiReference>) -> Result<()> {
        let mut current = self.get_role_rights(id).await?;
        for right in rights {
            if !current.iter().any(|r| r.id == right.id) {
                current.push(right);
            }
        }
        self.set_role_rights(id, current).await
    }
}
