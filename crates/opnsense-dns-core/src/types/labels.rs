//! external-dns registry labels carried in TXT records.
//!
//! Ownership markers look like
//! `"heritage=external-dns,external-dns/owner=default,external-dns/resource=service/ns/app"`.

use std::collections::BTreeMap;

use thiserror::Error;

/// Heritage value external-dns stamps on the records it owns
pub const HERITAGE: &str = "external-dns";

/// Reasons a TXT value is not a registry label string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelsError {
    /// No `heritage=external-dns` token, or a foreign heritage
    #[error("heritage is unknown or not found")]
    InvalidHeritage,
}

/// Labels decoded from a registry TXT value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    /// Parse a plain (unencrypted) registry label string
    ///
    /// Surrounding double quotes are ignored. Tokens that are not exactly
    /// `key=value` are skipped; keys outside the `external-dns/` namespace
    /// are dropped.
    pub fn parse(text: &str) -> Result<Self, LabelsError> {
        let text = text.trim_matches('"');
        let mut labels = BTreeMap::new();
        let mut found_heritage = false;

        for token in text.split(',') {
            let mut parts = token.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };

            if key == "heritage" {
                if value != HERITAGE {
                    return Err(LabelsError::InvalidHeritage);
                }
                found_heritage = true;
                continue;
            }

            if let Some(label) = key.strip_prefix(HERITAGE).and_then(|k| k.strip_prefix('/')) {
                labels.insert(label.to_string(), value.to_string());
            }
        }

        if found_heritage {
            Ok(Self(labels))
        } else {
            Err(LabelsError::InvalidHeritage)
        }
    }

    /// Returns true if `text` is a registry ownership marker
    #[must_use]
    pub fn is_registry_text(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    /// Get a label value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Owner id label
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.get("owner")
    }
}
