//! The engine entry point.

use opnsense_dns_core::{Endpoint, HostOverrideBackend, Result};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::domain_filter::{DomainFilter, DomainFilterConfig};
use crate::normalize::normalize;
use crate::record::Record;

/// OPNsense Unbound DNS provider
///
/// Holds no state besides its configuration and the backend; every call
/// reads the backend afresh.
#[derive(Debug)]
pub struct Provider<B> {
    pub(crate) backend: B,
    pub(crate) config: ProviderConfig,
    filter: DomainFilter,
}

impl<B: HostOverrideBackend> Provider<B> {
    /// Create a provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the domain filter does not compile.
    pub fn new(backend: B, config: ProviderConfig) -> Result<Self> {
        let filter = DomainFilter::new(&config.domain_filter)?;
        Ok(Self { backend, config, filter })
    }

    /// The backend rows are read from and written to
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The compiled domain filter
    pub const fn domain_filter(&self) -> &DomainFilter {
        &self.filter
    }

    /// Domain filter advertised to external-dns
    #[must_use]
    pub fn negotiate(&self) -> DomainFilterConfig {
        self.filter.config()
    }

    /// Current records, one endpoint per host override, filtered by domain
    pub async fn records(&self) -> Result<Vec<Endpoint>> {
        let rows = self.backend.list().await?;
        let mut endpoints = Vec::with_capacity(rows.len());

        for row in rows {
            let record = Record::from_row(row);
            let fqdn = record.fqdn();

            if !self.filter.accept(&fqdn) {
                debug!(fqdn = %fqdn, "Skipping record due to domain filter");
                continue;
            }
            if !record.host.enabled {
                debug!(fqdn = %fqdn, id = ?record.id, "Listing disabled host override");
            }

            if let Some(ep) = record.to_endpoint() {
                endpoints.push(ep);
            }
        }

        debug!(count = endpoints.len(), "Listed current records");
        Ok(endpoints)
    }

    /// Normalize desired endpoints, see [`normalize`]
    pub fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>> {
        let adjusted = normalize(endpoints)?;
        debug!(count = adjusted.len(), "Adjusted endpoints");
        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use opnsense_dns_core::{DnsError, HostOverride, RecordType};

    fn host(hostname: &str, domain: &str, record_type: &str, value: &str) -> HostOverride {
        let mut host = HostOverride {
            enabled: true,
            hostname: hostname.into(),
            domain: domain.into(),
            record_type: record_type.into(),
            ..HostOverride::default()
        };
        if record_type == "TXT" {
            host.txt_data = value.into();
        } else {
            host.server = value.into();
        }
        host
    }

    fn filtered(include: &[&str]) -> ProviderConfig {
        ProviderConfig {
            domain_filter: DomainFilterConfig {
                include: include.iter().map(ToString::to_string).collect(),
                ..DomainFilterConfig::default()
            },
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_records_applies_domain_filter() {
        let backend = MemoryBackend::with_rows([
            host("app", "example.com", "A", "10.0.0.1"),
            host("app", "other.com", "A", "10.0.0.2"),
            host("", "app.example.com", "TXT", "hello"),
            host("mail", "example.com", "MX", ""),
        ]);
        let provider = Provider::new(&backend, filtered(&["example.com"])).unwrap();

        let records = provider.records().await.unwrap();
        let names: Vec<_> = records.iter().map(|e| (e.dns_name.as_str(), e.record_type.clone())).collect();
        assert_eq!(
            names,
            vec![("app.example.com", RecordType::A), ("app.example.com", RecordType::Txt)]
        );
        assert!(records.iter().all(|e| e.uuid().is_some() && e.set_identifier.len() == 64));
    }

    #[tokio::test]
    async fn test_records_backend_error() {
        let backend = MemoryBackend::default();
        backend.fail_list();
        let provider = Provider::new(&backend, ProviderConfig::default()).unwrap();

        assert!(provider.records().await.is_err());
    }

    #[test]
    fn test_negotiate() {
        let backend = MemoryBackend::default();
        let provider = Provider::new(&backend, filtered(&["example.com"])).unwrap();
        assert_eq!(provider.negotiate().include, vec!["example.com".to_string()]);
    }

    #[test]
    fn test_invalid_filter_fails_construction() {
        let config = ProviderConfig {
            domain_filter: DomainFilterConfig {
                regex_include: "[".into(),
                ..DomainFilterConfig::default()
            },
            ..ProviderConfig::default()
        };
        let err = Provider::new(MemoryBackend::default(), config).unwrap_err();
        assert!(matches!(err, DnsError::Config(_)));
    }

    #[tokio::test]
    async fn test_adjusted_endpoints_match_listing() {
        let backend = MemoryBackend::with_rows([
            host("app", "example.com", "A", "10.0.0.1"),
            host("app", "example.com", "A", "10.0.0.2"),
        ]);
        let provider = Provider::new(&backend, ProviderConfig::default()).unwrap();

        let desired = provider
            .adjust_endpoints(vec![Endpoint::new(
                "app.example.com",
                RecordType::A,
                ["10.0.0.1", "10.0.0.2"],
            )])
            .unwrap();
        let current = provider.records().await.unwrap();

        let desired_ids: Vec<_> = desired.iter().map(|e| &e.set_identifier).collect();
        let current_ids: Vec<_> = current.iter().map(|e| &e.set_identifier).collect();
        assert_eq!(desired_ids, current_ids);
    }
}
