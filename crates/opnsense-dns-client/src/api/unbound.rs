//! Unbound host override endpoints.

use crate::client::encode_segment;
use crate::OpnsenseClient;
use opnsense_dns_core::{
    DnsError, HostOverride, HostOverrideEnvelope, HostOverrideRow, MutationResponse, Result,
    SearchRequest, SearchResponse, ServiceStatusResponse,
};
use tracing::debug;

const RESULT_SAVED: &str = "saved";
const RESULT_DELETED: &str = "deleted";

/// Unbound API endpoints
pub struct UnboundApi<'a> {
    client: &'a OpnsenseClient,
}

impl<'a> UnboundApi<'a> {
    pub(crate) const fn new(client: &'a OpnsenseClient) -> Self {
        Self { client }
    }

    /// List every host override
    pub async fn search_host_overrides(&self) -> Result<Vec<HostOverrideRow>> {
        let response: SearchResponse<HostOverrideRow> = self
            .client
            .post("/unbound/settings/search_host_override", Some(&SearchRequest::default()))
            .await?;

        debug!(total = response.total, rows = response.rows.len(), "Listed host overrides");
        Ok(response.rows)
    }

    /// Add a host override, returning its UUID
    pub async fn add_host_override(&self, host: &HostOverride) -> Result<String> {
        let response: MutationResponse = self
            .client
            .post("/unbound/settings/addHostOverride", Some(&HostOverrideEnvelope { host }))
            .await?;

        expect_result(response, RESULT_SAVED).map(|r| r.uuid)
    }

    /// Replace the host override with the given UUID
    pub async fn set_host_override(&self, id: &str, host: &HostOverride) -> Result<()> {
        let path = format!("/unbound/settings/setHostOverride/{}", checked_id(id)?);
        let response: MutationResponse = self
            .client
            .post(&path, Some(&HostOverrideEnvelope { host }))
            .await?;

        expect_result(response, RESULT_SAVED).map(|_| ())
    }

    /// Delete the host override with the given UUID
    pub async fn del_host_override(&self, id: &str) -> Result<()> {
        let path = format!("/unbound/settings/delHostOverride/{}", checked_id(id)?);
        let response: MutationResponse = self.client.post::<_, ()>(&path, None).await?;

        expect_result(response, RESULT_DELETED).map(|_| ())
    }

    /// Apply pending configuration changes to the running service
    pub async fn reconfigure(&self) -> Result<()> {
        let response: ServiceStatusResponse = self
            .client
            .post::<_, ()>("/unbound/service/reconfigure", None)
            .await?;

        if response.is_ok() {
            Ok(())
        } else {
            Err(DnsError::Rejected {
                result: response.outcome().unwrap_or_default(),
                validations: Default::default(),
            })
        }
    }
}

fn checked_id(id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(DnsError::Config("host override UUID must not be empty".into()));
    }
    Ok(encode_segment(id))
}

fn expect_result(response: MutationResponse, expected: &str) -> Result<MutationResponse> {
    if response.result == expected {
        Ok(response)
    } else {
        Err(DnsError::Rejected {
            result: response.result,
            validations: response.validations,
        })
    }
}
