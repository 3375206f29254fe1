use busbar_vcd_client::{RequestMethod, ENDPOINT_SESSIONS_CURRENT};
use tracing::instrument;

use crate::error::Result;
use crate::types::CurrentSession;

impl super::OpenApiClient {
    /// The session behind the client's token.
    #[instrument(skip(self))]
    pub async fn get_current_session(&self) -> Result<CurrentSession> {
        let version = self.endpoint_version(ENDPOINT_SESSIONS_CURRENT)?;
        let request = self.request(RequestMethod::Get, ENDPOINT_SESSIONS_CURRENT, &version);
        Ok(self.client.execute(request).await?.json().await?)
    }
}
