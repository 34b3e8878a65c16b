use serde::{Deserialize, Serialize};

use crate::domain_filter::DomainFilterConfig;

/// Engine configuration, passed in explicitly at construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which names are managed
    pub domain_filter: DomainFilterConfig,

    /// Store an [`OwnershipRecord`](crate::OwnershipRecord) in the description
    /// of registry TXT rows that have none
    pub ownership_description: bool,
}
