use opnsense_dns_core::{Endpoint, Result};
use tracing::debug;

use crate::record::{set_identifier, validate};

/// Split endpoints into single-target endpoints with stable set identifiers
///
/// Input order is kept, and targets expand in their original order. Endpoints
/// without targets are dropped. Caller-supplied set identifiers are replaced.
///
/// # Errors
///
/// Returns a validation error for endpoints host overrides cannot represent
/// (wildcards, bare names, unsupported record types).
pub fn normalize(endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>> {
    let mut adjusted = Vec::with_capacity(endpoints.len());

    for ep in endpoints {
        if ep.targets.is_empty() {
            debug!(dns_name = %ep.dns_name, "Skipping endpoint with no targets");
            continue;
        }

        validate(&ep)?;

        debug!(dns_name = %ep.dns_name, records = ep.targets.len(), "Normalizing endpoint");

        for target in &ep.targets {
            let mut single = ep.clone();
            single.targets = vec![target.clone()];
            single.set_identifier = set_identifier(&ep.dns_name, &ep.record_type, target);
            adjusted.push(single);
        }
    }

    Ok(adjusted)
}
