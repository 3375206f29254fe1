use busbar_vcd_client::{QueryParams, ENDPOINT_RIGHTS};
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::filter::FilterBuilder;
use crate::types::Right;

impl super::OpenApiClient {
    /// All rights defined in the system.
    #[instrument(skip(self, params))]
    pub async fn get_all_rights(&self, params: QueryParams) -> Result<Vec<Right>> {
        self.get_all_items(ENDPOINT_RIGHTS, params).await
    }

    #[instrument(skip(self))]
    pub async fn get_right_by_id(&self, id: &str) -> Result<Right> {
        self.get_item(ENDPOINT_RIGHTS, id).await
    }

    /// The right with exactly this name, such as `vApp: View`.
    #[instrument(skip(self))]
    pub async fn get_right_by_name(&self, name: &str) -> Result<Right> {
        let params = FilterBuilder::all().eq("name", name)?.into_params();
        self.get_all_rights(params)
            .await?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::new(ErrorKind::NotFound(format!("right '{}'", name))))
    }
}
