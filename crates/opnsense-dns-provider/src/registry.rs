//! Resolution of external-dns registry TXT records to host override rows.
//!
//! external-dns rewrites the identifying properties of its ownership TXT
//! records, so the UUID and set identifier they arrive with cannot be used to
//! address a row. Instead the current listing is searched for the one
//! endpoint that is structurally identical.

use opnsense_dns_core::{DnsError, Endpoint, Labels, RecordType, Result};
use tracing::debug;

use crate::record::set_identifier;

/// Returns true for TXT endpoints whose first target is a heritage label string
#[must_use]
pub fn is_registry_endpoint(ep: &Endpoint) -> bool {
    ep.record_type == RecordType::Txt && ep.targets.first().is_some_and(|t| Labels::is_registry_text(t))
}

/// Find the unique current endpoint matching `probe` by name, type, set
/// identifier and targets
///
/// The probe's set identifier is recomputed from its own name, type and
/// first target before comparing.
///
/// # Errors
///
/// Returns [`DnsError::RegistryMatch`] unless exactly one endpoint matches.
pub fn find_match<'a>(current: &'a [Endpoint], probe: &Endpoint) -> Result<&'a Endpoint> {
    let expected_id = probe
        .targets
        .first()
        .map(|target| set_identifier(&probe.dns_name, &probe.record_type, target))
        .unwrap_or_default();

    let mut matches = current.iter().filter(|ep| {
        ep.dns_name == probe.dns_name
            && ep.record_type == probe.record_type
            && ep.set_identifier == expected_id
            && ep.targets == probe.targets
    });

    match (matches.next(), matches.next()) {
        (Some(found), None) => {
            let labels = found.targets.first().and_then(|t| Labels::parse(t).ok());
            debug!(
                dns_name = %probe.dns_name,
                uuid = ?found.uuid(),
                owner = ?labels.as_ref().and_then(Labels::owner),
                "Matched registry record"
            );
            Ok(found)
        }
        (first, second) => {
            let count = usize::from(first.is_some()) + usize::from(second.is_some()) + matches.count();
            Err(DnsError::RegistryMatch {
                name: probe.dns_name.clone(),
                set_identifier: expected_id,
                matches: count,
            })
        }
    }
}
