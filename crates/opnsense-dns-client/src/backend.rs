//! [`HostOverrideBackend`] implementation over the OPNsense REST API.

use crate::OpnsenseClient;
use async_trait::async_trait;
use opnsense_dns_core::{HostOverride, HostOverrideBackend, HostOverrideRow, Result};

#[async_trait]
impl HostOverrideBackend for OpnsenseClient {
    async fn list(&self) -> Result<Vec<HostOverrideRow>> {
        self.unbound().search_host_overrides().await
    }

    async fn create(&self, host: &HostOverride) -> Result<String> {
        self.unbound().add_host_override(host).await
    }

    async fn update(&self, id: &str, host: &HostOverride) -> Result<()> {
        self.unbound().set_host_override(id, host).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.unbound().del_host_override(id).await
    }

    async fn commit(&self) -> Result<()> {
        self.unbound().reconfigure().await
    }
}
