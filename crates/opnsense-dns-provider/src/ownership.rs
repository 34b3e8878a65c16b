use opnsense_dns_core::{Endpoint, Labels, RecordType, Result};
use serde::{Deserialize, Serialize};

/// Registry linkage stored in the description of an ownership TXT row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRecord {
    /// DNS name of the registry record
    pub name: String,

    /// Registry record values
    #[serde(default)]
    pub targets: Vec<String>,

    /// Set identifier the caller submitted
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,
}

impl OwnershipRecord {
    /// Build from a TXT endpoint whose first target is a heritage label string
    ///
    /// Returns `None` for anything that is not an ownership marker.
    #[must_use]
    pub fn from_endpoint(ep: &Endpoint) -> Option<Self> {
        if ep.record_type != RecordType::Txt {
            return None;
        }
        let first = ep.targets.first()?;
        if !Labels::is_registry_text(first) {
            return None;
        }

        Some(Self {
            name: ep.dns_name.clone(),
            targets: ep.targets.clone(),
            set_identifier: ep.set_identifier.clone(),
        })
    }

    /// Decode from a row description, `None` if it holds anything else
    #[must_use]
    pub fn from_description(description: &str) -> Option<Self> {
        serde_json::from_str(description).ok()
    }

    /// Encode for storage in a row description
    pub fn to_description(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
