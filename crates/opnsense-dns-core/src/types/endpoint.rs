use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Provider specific property holding the OPNsense host override UUID
pub const PROVIDER_SPECIFIC_UUID: &str = "external-dns.alpha.kubernetes.io/opnsense-uuid";

/// Provider specific property holding the host override description
pub const PROVIDER_SPECIFIC_DESCRIPTION: &str =
    "external-dns.alpha.kubernetes.io/opnsense-description";

/// DNS record type of an endpoint
///
/// Only A, AAAA and TXT can be stored as host overrides; anything else is
/// carried through as [`RecordType::Other`] so callers can skip it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Text record
    Txt,
    /// Any record type the backend cannot hold
    Other(String),
}

impl RecordType {
    /// Wire representation (`"A"`, `"AAAA"`, `"TXT"`, ...)
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Txt => "TXT",
            Self::Other(other) => other,
        }
    }

    /// Returns true for A and AAAA
    #[must_use]
    pub const fn is_address(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }

    /// Returns true if host overrides can represent this type
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Txt)
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "TXT" => Self::Txt,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "A" | "AAAA" | "TXT" => Self::from(s.as_str()),
            _ => Self::Other(s),
        }
    }
}

impl From<RecordType> for String {
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name/value extension property attached to an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    /// Property name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Property value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// A DNS record as exchanged with external-dns
///
/// Field names and omission rules match the external-dns JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified domain name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_name: String,

    /// Record values, one per address or text string
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,

    /// Record type
    #[serde(default)]
    pub record_type: RecordType,

    /// Disambiguates endpoints sharing name and type
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// TTL in seconds, zero when unset
    #[serde(default, rename = "recordTTL", skip_serializing_if = "is_zero")]
    pub record_ttl: i64,

    /// Free-form labels
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Provider extension properties
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

// Go encodes nil slices and maps as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(ttl: &i64) -> bool {
    *ttl == 0
}

impl Endpoint {
    /// Create an endpoint with the given name, type and targets
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            record_type,
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the set identifier
    #[must_use]
    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = set_identifier.into();
        self
    }

    /// Add or replace a label
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add or replace a provider specific property
    #[must_use]
    pub fn with_provider_specific(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_provider_specific(name, value);
        self
    }

    /// Look up a provider specific property by name
    #[must_use]
    pub fn provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Set a provider specific property, replacing an existing one in place
    pub fn set_provider_specific(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if let Some(existing) = self.provider_specific.iter_mut().find(|p| p.name == name) {
            existing.value = value;
        } else {
            self.provider_specific.push(ProviderSpecificProperty { name, value });
        }
    }

    /// Backend UUID, if the endpoint came from a listing
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.provider_specific(PROVIDER_SPECIFIC_UUID)
    }

    /// Host override description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.provider_specific(PROVIDER_SPECIFIC_DESCRIPTION)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} [{}]", self.dns_name, self.record_type, self.targets.join(", "))?;
        if !self.set_identifier.is_empty() {
            write!(f, " ({})", self.set_identifier)?;
        }
        Ok(())
    }
}

/// A changeset computed by external-dns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    /// Records to create
    #[serde(
        default,
        alias = "Create",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub create: Vec<Endpoint>,

    /// Current state of records to update, index-paired with `update_new`
    #[serde(
        default,
        alias = "UpdateOld",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub update_old: Vec<Endpoint>,

    /// Desired state of records to update, index-paired with `update_old`
    #[serde(
        default,
        alias = "UpdateNew",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub update_new: Vec<Endpoint>,

    /// Records to delete
    #[serde(
        default,
        alias = "Delete",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Returns true if nothing would be changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}
