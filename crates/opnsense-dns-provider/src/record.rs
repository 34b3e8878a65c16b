//! Translation between external-dns endpoints and host override rows.

use std::net::{Ipv4Addr, Ipv6Addr};

use opnsense_dns_core::{
    DnsError, Endpoint, HostOverride, HostOverrideRow, Labels, RecordType, Result,
    PROVIDER_SPECIFIC_DESCRIPTION, PROVIDER_SPECIFIC_UUID,
};
use ring::digest::{digest, SHA256};
use tracing::debug;

use crate::ownership::OwnershipRecord;

/// Stable identifier of one (name, type, value) triple
///
/// Lowercase hex SHA-256 of `"{fqdn}:{record_type}:{target}"`.
#[must_use]
pub fn set_identifier(fqdn: &str, record_type: &RecordType, target: &str) -> String {
    let input = format!("{fqdn}:{record_type}:{target}");
    hex::encode(digest(&SHA256, input.as_bytes()).as_ref())
}

/// A single-valued host override, with its UUID once it exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Backend UUID, `None` for rows not yet created
    pub id: Option<String>,

    /// Row contents
    pub host: HostOverride,
}

impl Record {
    /// Translate a single-target endpoint
    ///
    /// # Errors
    ///
    /// Fails with [`DnsError::Validation`] unless the endpoint has exactly one
    /// target, or if it cannot be stored as a host override.
    pub fn from_endpoint(ep: &Endpoint, ownership_description: bool) -> Result<Self> {
        match ep.targets.as_slice() {
            [target] => Self::from_endpoint_target(ep, target, ownership_description),
            [] => Err(DnsError::validation(&ep.dns_name, "endpoint has no targets")),
            _ => Err(DnsError::validation(
                &ep.dns_name,
                format!("expected a single target, got {}", ep.targets.len()),
            )),
        }
    }

    /// Translate an endpoint into one row per target, in target order
    ///
    /// # Errors
    ///
    /// Fails with [`DnsError::Validation`] if the endpoint has no targets or
    /// cannot be stored as host overrides.
    pub fn from_endpoint_targets(ep: &Endpoint, ownership_description: bool) -> Result<Vec<Self>> {
        if ep.targets.is_empty() {
            return Err(DnsError::validation(&ep.dns_name, "endpoint has no targets"));
        }

        ep.targets
            .iter()
            .map(|target| Self::from_endpoint_target(ep, target, ownership_description))
            .collect()
    }

    /// Translate a single-target endpoint that refers to an existing row
    ///
    /// # Errors
    ///
    /// Fails with [`DnsError::MissingUuid`] if the endpoint does not carry the
    /// UUID property, otherwise as [`Record::from_endpoint`].
    pub fn from_existing_endpoint(ep: &Endpoint, ownership_description: bool) -> Result<Self> {
        let id = existing_id(ep)?;
        let mut record = Self::from_endpoint(ep, ownership_description)?;
        record.id = Some(id.to_string());
        Ok(record)
    }

    fn from_endpoint_target(ep: &Endpoint, target: &str, ownership_description: bool) -> Result<Self> {
        validate(ep)?;

        let mut host = HostOverride {
            enabled: true,
            record_type: ep.record_type.to_string(),
            description: ep.description().unwrap_or_default().to_string(),
            ..HostOverride::default()
        };

        match ep.record_type {
            RecordType::A | RecordType::Aaaa => {
                validate_address(ep, target)?;
                let (hostname, domain) = split_fqdn(&ep.dns_name)
                    .ok_or_else(|| DnsError::validation(&ep.dns_name, "name has no domain part"))?;
                host.hostname = hostname.to_string();
                host.domain = domain.to_string();
                host.server = target.to_string();
            }
            _ => {
                host.domain = ep.dns_name.clone();
                host.txt_data = target.to_string();

                if ownership_description && host.description.is_empty() && Labels::is_registry_text(target) {
                    if let Some(ownership) = OwnershipRecord::from_endpoint(ep) {
                        host.description = ownership.to_description()?;
                    }
                }
            }
        }

        Ok(Self { id: None, host })
    }

    /// Wrap a listed row
    #[must_use]
    pub fn from_row(row: HostOverrideRow) -> Self {
        Self {
            id: Some(row.id).filter(|id| !id.is_empty()),
            host: row.host,
        }
    }

    /// Record type of the row
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        RecordType::from(self.host.record_type.as_str())
    }

    /// Fully qualified name the row answers for
    ///
    /// TXT rows keep the full name in `domain`; their hostname is ignored.
    #[must_use]
    pub fn fqdn(&self) -> String {
        if self.record_type() == RecordType::Txt || self.host.hostname.is_empty() {
            self.host.domain.clone()
        } else {
            format!("{}.{}", self.host.hostname, self.host.domain)
        }
    }

    /// The single value the row holds
    #[must_use]
    pub fn target(&self) -> &str {
        match self.record_type() {
            RecordType::Txt => &self.host.txt_data,
            _ => &self.host.server,
        }
    }

    /// Translate back into an endpoint
    ///
    /// Returns `None` for record types host overrides hold but endpoints do
    /// not model (MX and friends).
    #[must_use]
    pub fn to_endpoint(&self) -> Option<Endpoint> {
        let record_type = self.record_type();
        if !record_type.is_supported() {
            debug!(
                fqdn = %self.fqdn(),
                record_type = %record_type,
                "Skipping host override with unsupported record type"
            );
            return None;
        }

        let fqdn = self.fqdn();
        let target = self.target();
        let mut ep = Endpoint::new(fqdn.clone(), record_type.clone(), [target])
            .with_set_identifier(set_identifier(&fqdn, &record_type, target));

        if let Some(id) = &self.id {
            ep.set_provider_specific(PROVIDER_SPECIFIC_UUID, id.clone());
        }

        // Registry linkage in a TXT description is not a user description.
        match OwnershipRecord::from_description(&self.host.description) {
            Some(ownership) if record_type == RecordType::Txt => {
                debug!(fqdn = %fqdn, registry_name = %ownership.name, "Host override carries registry linkage");
            }
            _ if !self.host.description.is_empty() => {
                ep.set_provider_specific(PROVIDER_SPECIFIC_DESCRIPTION, self.host.description.clone());
            }
            _ => {}
        }

        Some(ep)
    }
}

/// UUID property of an endpoint that must refer to an existing row
pub(crate) fn existing_id(ep: &Endpoint) -> Result<&str> {
    ep.uuid()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DnsError::MissingUuid {
            name: ep.dns_name.clone(),
        })
}

/// Checks shared by every forward translation
pub(crate) fn validate(ep: &Endpoint) -> Result<()> {
    if !ep.record_type.is_supported() {
        return Err(DnsError::UnsupportedRecordType {
            name: ep.dns_name.clone(),
            record_type: ep.record_type.to_string(),
        });
    }

    let name = ep.dns_name.trim_end_matches('.');
    if name.is_empty() {
        return Err(DnsError::validation(&ep.dns_name, "empty DNS name"));
    }
    if name.split('.').next() == Some("*") {
        return Err(DnsError::validation(
            &ep.dns_name,
            "wildcard hostnames are not supported by host overrides",
        ));
    }
    if ep.record_type.is_address() && split_fqdn(&ep.dns_name).is_none() {
        return Err(DnsError::validation(&ep.dns_name, "name has no domain part"));
    }

    Ok(())
}

fn validate_address(ep: &Endpoint, target: &str) -> Result<()> {
    let valid = match ep.record_type {
        RecordType::A => target.parse::<Ipv4Addr>().is_ok(),
        RecordType::Aaaa => target.parse::<Ipv6Addr>().is_ok(),
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(DnsError::validation(
            &ep.dns_name,
            format!("{target:?} is not a valid {} address", ep.record_type),
        ))
    }
}

fn split_fqdn(fqdn: &str) -> Option<(&str, &str)> {
    fqdn.split_once('.')
        .filter(|(hostname, domain)| !hostname.is_empty() && !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "heritage=external-dns,external-dns/owner=default";

    #[test]
    fn test_set_identifier_is_sha256_hex() {
        let id = set_identifier("app.example.com", &RecordType::A, "10.0.0.1");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(id, set_identifier("app.example.com", &RecordType::A, "10.0.0.1"));
        assert_ne!(id, set_identifier("app.example.com", &RecordType::A, "10.0.0.2"));
        assert_ne!(id, set_identifier("app.example.com", &RecordType::Aaaa, "10.0.0.1"));
    }

    #[test]
    fn test_set_identifier_known_digest() {
        // sha256("a:A:b")
        assert_eq!(
            set_identifier("a", &RecordType::A, "b"),
            hex::encode(digest(&SHA256, b"a:A:b").as_ref())
        );
    }

    #[test]
    fn test_address_record_splits_at_first_dot() {
        let ep = Endpoint::new("app.eu.example.com", RecordType::A, ["10.0.0.1"]);
        let record = Record::from_endpoint(&ep, false).unwrap();

        assert_eq!(record.id, None);
        assert!(record.host.enabled);
        assert_eq!(record.host.hostname, "app");
        assert_eq!(record.host.domain, "eu.example.com");
        assert_eq!(record.host.server, "10.0.0.1");
        assert_eq!(record.host.record_type, "A");
        assert!(record.host.txt_data.is_empty());
    }

    #[test]
    fn test_txt_record_keeps_full_name() {
        let ep = Endpoint::new("app.example.com", RecordType::Txt, ["hello"])
            .with_provider_specific(PROVIDER_SPECIFIC_DESCRIPTION, "managed");
        let record = Record::from_endpoint(&ep, false).unwrap();

        assert_eq!(record.host.hostname, "");
        assert_eq!(record.host.domain, "app.example.com");
        assert_eq!(record.host.txt_data, "hello");
        assert_eq!(record.host.description, "managed");
    }

    #[test]
    fn test_rejects_wildcards() {
        for record_type in [RecordType::A, RecordType::Txt] {
            let ep = Endpoint::new("*.example.com", record_type, ["10.0.0.1"]);
            let err = Record::from_endpoint(&ep, false).unwrap_err();
            assert!(matches!(err, DnsError::Validation { .. }));
        }
    }

    #[test]
    fn test_rejects_malformed_input() {
        let bare = Endpoint::new("localhost", RecordType::A, ["10.0.0.1"]);
        assert!(matches!(Record::from_endpoint(&bare, false), Err(DnsError::Validation { .. })));

        let wrong_family = Endpoint::new("app.example.com", RecordType::Aaaa, ["10.0.0.1"]);
        assert!(matches!(
            Record::from_endpoint(&wrong_family, false),
            Err(DnsError::Validation { .. })
        ));

        let cname = Endpoint::new("app.example.com", RecordType::from("CNAME"), ["x.example.com"]);
        assert!(matches!(
            Record::from_endpoint(&cname, false),
            Err(DnsError::UnsupportedRecordType { .. })
        ));
    }

    #[test]
    fn test_target_count_checks() {
        let none = Endpoint::new("app.example.com", RecordType::A, Vec::<String>::new());
        assert!(matches!(Record::from_endpoint(&none, false), Err(DnsError::Validation { .. })));
        assert!(matches!(
            Record::from_endpoint_targets(&none, false),
            Err(DnsError::Validation { .. })
        ));

        let two = Endpoint::new("app.example.com", RecordType::A, ["10.0.0.1", "10.0.0.2"]);
        assert!(matches!(Record::from_endpoint(&two, false), Err(DnsError::Validation { .. })));

        let records = Record::from_endpoint_targets(&two, false).unwrap();
        let servers: Vec<_> = records.iter().map(|r| r.host.server.as_str()).collect();
        assert_eq!(servers, ["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_existing_endpoint_requires_uuid() {
        let ep = Endpoint::new("app.example.com", RecordType::A, ["10.0.0.1"]);
        assert!(matches!(
            Record::from_existing_endpoint(&ep, false),
            Err(DnsError::MissingUuid { .. })
        ));

        let ep = ep.with_provider_specific(PROVIDER_SPECIFIC_UUID, "u-1");
        let record = Record::from_existing_endpoint(&ep, false).unwrap();
        assert_eq!(record.id.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_ownership_description_is_opt_in() {
        let ep = Endpoint::new("app.example.com", RecordType::Txt, [MARKER]).with_set_identifier("caller-id");

        let plain = Record::from_endpoint(&ep, false).unwrap();
        assert!(plain.host.description.is_empty());

        let stamped = Record::from_endpoint(&ep, true).unwrap();
        let ownership = OwnershipRecord::from_description(&stamped.host.description).unwrap();
        assert_eq!(ownership.set_identifier, "caller-id");

        let explicit = ep.with_provider_specific(PROVIDER_SPECIFIC_DESCRIPTION, "keep me");
        assert_eq!(Record::from_endpoint(&explicit, true).unwrap().host.description, "keep me");
    }

    #[test]
    fn test_round_trip() {
        for ep in [
            Endpoint::new("app.example.com", RecordType::A, ["10.0.0.1"]),
            Endpoint::new("app.example.com", RecordType::Aaaa, ["2001:db8::1"]),
            Endpoint::new("app.example.com", RecordType::Txt, [MARKER]),
        ] {
            let record = Record::from_endpoint(&ep, false).unwrap();
            let row = HostOverrideRow::new("u-1", record.host);
            let back = Record::from_row(row).to_endpoint().unwrap();

            assert_eq!(back.dns_name, ep.dns_name);
            assert_eq!(back.record_type, ep.record_type);
            assert_eq!(back.targets, ep.targets);
            assert_eq!(back.uuid(), Some("u-1"));
            assert_eq!(
                back.set_identifier,
                set_identifier(&ep.dns_name, &ep.record_type, &ep.targets[0])
            );
        }
    }

    #[test]
    fn test_reverse_skips_unsupported_rows() {
        let row = HostOverrideRow::new(
            "u-1",
            HostOverride {
                hostname: "mail".into(),
                domain: "example.com".into(),
                record_type: "MX".into(),
                ..HostOverride::default()
            },
        );
        assert!(Record::from_row(row).to_endpoint().is_none());
    }

    #[test]
    fn test_reverse_attaches_description() {
        let row = HostOverrideRow::new(
            "u-1",
            HostOverride {
                hostname: String::new(),
                domain: "example.com".into(),
                record_type: "A".into(),
                server: "10.0.0.1".into(),
                description: "apex".into(),
                ..HostOverride::default()
            },
        );
        let ep = Record::from_row(row).to_endpoint().unwrap();
        assert_eq!(ep.dns_name, "example.com");
        assert_eq!(ep.description(), Some("apex"));
    }

    #[test]
    fn test_reverse_txt_name_ignores_hostname() {
        let row = HostOverrideRow::new(
            "u-1",
            HostOverride {
                hostname: "_acme".into(),
                domain: "example.com".into(),
                record_type: "TXT".into(),
                txt_data: "token".into(),
                ..HostOverride::default()
            },
        );
        let record = Record::from_row(row);
        assert_eq!(record.fqdn(), "example.com");

        let ep = record.to_endpoint().unwrap();
        assert_eq!(ep.dns_name, "example.com");
        assert_eq!(ep.set_identifier, set_identifier("example.com", &RecordType::Txt, "token"));
    }

    #[test]
    fn test_reverse_hides_registry_linkage() {
        let ep = Endpoint::new("app.example.com", RecordType::Txt, [MARKER]);
        let record = Record::from_endpoint(&ep, true).unwrap();
        assert!(!record.host.description.is_empty());

        let back = Record::from_row(HostOverrideRow::new("u-1", record.host)).to_endpoint().unwrap();
        assert_eq!(back.description(), None);
        assert_eq!(back.targets, [MARKER]);
    }
}
