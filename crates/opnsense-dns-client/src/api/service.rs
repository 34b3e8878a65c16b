//! Core service endpoints.

use crate::OpnsenseClient;
use opnsense_dns_core::{DnsError, Result, SearchRequest, SearchResponse, ServiceItem};

/// Core service API endpoints
pub struct ServiceApi<'a> {
    client: &'a OpnsenseClient,
}

impl<'a> ServiceApi<'a> {
    pub(crate) const fn new(client: &'a OpnsenseClient) -> Self {
        Self { client }
    }

    /// Search services by phrase
    pub async fn search(&self, phrase: &str) -> Result<Vec<ServiceItem>> {
        let response: SearchResponse<ServiceItem> = self
            .client
            .post("/core/service/search", Some(&SearchRequest::phrase(phrase)))
            .await?;
        Ok(response.rows)
    }

    /// Verify that the Unbound service is running
    pub async fn check_unbound(&self) -> Result<ServiceItem> {
        self.search("unbound")
            .await?
            .into_iter()
            .find(|s| s.name == "unbound" && s.is_running())
            .ok_or(DnsError::ServiceUnavailable)
    }
}
