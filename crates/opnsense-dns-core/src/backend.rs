//! The host override storage capability the engine mutates rows through.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{HostOverride, HostOverrideRow};

/// Storage for single-valued host override rows, addressed by backend UUID
///
/// Implementations own transport concerns (retry, backoff, auth). The engine
/// calls them sequentially and never assumes they are safe to use
/// concurrently for the same zone.
#[async_trait]
pub trait HostOverrideBackend: Send + Sync {
    /// List every host override row
    async fn list(&self) -> Result<Vec<HostOverrideRow>>;

    /// Create a row, returning its backend-assigned UUID
    async fn create(&self, host: &HostOverride) -> Result<String>;

    /// Replace the row with the given UUID
    async fn update(&self, id: &str, host: &HostOverride) -> Result<()>;

    /// Delete the row with the given UUID
    async fn delete(&self, id: &str) -> Result<()>;

    /// Make previous mutations visible to resolvers
    async fn commit(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: HostOverrideBackend + ?Sized> HostOverrideBackend for Arc<T> {
    async fn list(&self) -> Result<Vec<HostOverrideRow>> {
        (**self).list().await
    }

    async fn create(&self, host: &HostOverride) -> Result<String> {
        (**self).create(host).await
    }

    async fn update(&self, id: &str, host: &HostOverride) -> Result<()> {
        (**self).update(id, host).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn commit(&self) -> Result<()> {
        (**self).commit().await
    }
}

#[async_trait]
impl<T: HostOverrideBackend + ?Sized> HostOverrideBackend for &T {
    async fn list(&self) -> Result<Vec<HostOverrideRow>> {
        (**self).list().await
    }

    async fn create(&self, host: &HostOverride) -> Result<String> {
        (**self).create(host).await
    }

    async fn update(&self, id: &str, host: &HostOverride) -> Result<()> {
        (**self).update(id, host).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn commit(&self) -> Result<()> {
        (**self).commit().await
    }
}

/// Backend decorator that reads through and turns every mutation into a no-op
///
/// Mutations are logged and reported as successful; `create` returns an
/// empty UUID.
#[derive(Debug, Clone)]
pub struct DryRun<B> {
    inner: B,
    enabled: bool,
}

impl<B> DryRun<B> {
    /// Wrap a backend; mutations are only suppressed when `enabled`
    pub const fn new(inner: B, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    /// Returns true if mutations are suppressed
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Access the wrapped backend
    pub const fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: HostOverrideBackend> HostOverrideBackend for DryRun<B> {
    async fn list(&self) -> Result<Vec<HostOverrideRow>> {
        self.inner.list().await
    }

    async fn create(&self, host: &HostOverride) -> Result<String> {
        if self.enabled {
            warn!(
                hostname = %host.hostname,
                domain = %host.domain,
                record_type = %host.record_type,
                "Dry run enabled, skipping create"
            );
            return Ok(String::new());
        }
        self.inner.create(host).await
    }

    async fn update(&self, id: &str, host: &HostOverride) -> Result<()> {
        if self.enabled {
            warn!(id = %id, domain = %host.domain, "Dry run enabled, skipping update");
            return Ok(());
        }
        self.inner.update(id, host).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.enabled {
            warn!(id = %id, "Dry run enabled, skipping delete");
            return Ok(());
        }
        self.inner.delete(id).await
    }

    async fn commit(&self) -> Result<()> {
        if self.enabled {
            debug!("Dry run enabled, skipping commit");
            return Ok(());
        }
        self.inner.commit().await
    }
}
