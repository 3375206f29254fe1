use busbar_vcd_client::{QueryParams, ENDPOINT_AUDIT_TRAIL};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::instrument;

use crate::error::Result;
use crate::filter::FilterBuilder;
use crate::types::AuditTrailEvent;

impl super::OpenApiClient {
    /// Audit trail events, oldest first as returned by the server.
    ///
    /// Unfiltered queries can return a very large number of events.
    #[instrument(skip(self, params))]
    pub async fn get_audit_trail(&self, params: QueryParams) -> Result<Vec<AuditTrailEvent>> {
        self.get_all_items(ENDPOINT_AUDIT_TRAIL, params).await
    }

    /// Audit trail events newer than `since`.
    #[instrument(skip(self))]
    pub async fn get_audit_trail_since(&self, since: DateTime<Utc>) -> Result<Vec<AuditTrailEvent>> {
        let params = FilterBuilder::all()
            .gt(
                "timestamp",
                since.to_rfc3339_opts(SecondsFormat::Millis, true),
            )?
            .into_params();
        self.get_audit_trail(params).await
    }
}
