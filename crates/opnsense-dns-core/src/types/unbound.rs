use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Unbound host override as written to the OPNsense API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOverride {
    /// Whether Unbound serves the override
    #[serde(default = "enabled_default", with = "flag")]
    pub enabled: bool,

    /// Left-most label (empty for TXT rows)
    #[serde(default)]
    pub hostname: String,

    /// Remaining labels, or the full FQDN for TXT rows
    #[serde(default)]
    pub domain: String,

    /// Record type
    #[serde(default, rename = "rr")]
    pub record_type: String,

    /// Address value for A/AAAA rows
    #[serde(default)]
    pub server: String,

    /// MX priority (unused here, preserved on the wire)
    #[serde(default, rename = "mxprio")]
    pub mx_priority: String,

    /// MX host (unused here, preserved on the wire)
    #[serde(default, rename = "mx")]
    pub mx_domain: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Text value for TXT rows
    #[serde(default, rename = "txtdata")]
    pub txt_data: String,
}

/// Host override row as returned by `search_host_override`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOverrideRow {
    /// Backend-assigned identifier
    #[serde(rename = "uuid")]
    pub id: String,

    /// Row contents
    #[serde(flatten)]
    pub host: HostOverride,
}

impl HostOverrideRow {
    /// Build a row from an id and its contents
    pub fn new(id: impl Into<String>, host: HostOverride) -> Self {
        Self { id: id.into(), host }
    }
}

/// Paged search request shared by OPNsense grid endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Page to fetch
    pub current: i64,

    /// Rows per page, -1 for everything
    pub row_count: i64,

    /// Free-text filter
    pub search_phrase: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            current: 1,
            row_count: -1,
            search_phrase: String::new(),
        }
    }
}

impl SearchRequest {
    /// Request all rows matching a phrase
    pub fn phrase(phrase: impl Into<String>) -> Self {
        Self {
            search_phrase: phrase.into(),
            ..Self::default()
        }
    }
}

/// Paged search response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    /// Current page
    #[serde(default)]
    pub current: i64,

    /// Rows in this page
    #[serde(default)]
    pub row_count: i64,

    /// Total matching rows
    #[serde(default)]
    pub total: i64,

    /// The rows
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// Write payload wrapper: `{"host": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct HostOverrideEnvelope<'a> {
    /// Wrapped override
    pub host: &'a HostOverride,
}

/// Response of add/set/del host override calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// `saved`, `deleted`, or a failure marker
    #[serde(default)]
    pub result: String,

    /// UUID of a newly added row
    #[serde(default)]
    pub uuid: String,

    /// Field validation messages
    #[serde(default)]
    pub validations: BTreeMap<String, String>,
}

const fn enabled_default() -> bool {
    true
}

/// OPNsense encodes booleans as `"1"` / `"0"`.
mod flag {
    use super::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
        Bool(bool),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.trim() == "1",
            Raw::Num(n) => n == 1,
            Raw::Bool(b) => b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_search_json() {
        let json = r#"{
            "uuid": "4d4c7f5e-7bd0-4c31-a3a4-52b1c7c2f9a1",
            "enabled": "1",
            "hostname": "app",
            "domain": "example.com",
            "rr": "A",
            "server": "10.0.0.1",
            "description": "Production API"
        }"#;

        let row: HostOverrideRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.id, "4d4c7f5e-7bd0-4c31-a3a4-52b1c7c2f9a1");
        assert!(row.host.enabled);
        assert_eq!(row.host.record_type, "A");
        assert_eq!(row.host.txt_data, "");
    }

    #[test]
    fn test_disabled_flag() {
        let row: HostOverrideRow =
            serde_json::from_str(r#"{"uuid": "x", "enabled": "0", "rr": "TXT"}"#).unwrap();
        assert!(!row.host.enabled);
    }

    #[test]
    fn test_envelope_wire_format() {
        let host = HostOverride {
            enabled: true,
            domain: "example.com".into(),
            record_type: "TXT".into(),
            txt_data: "hello".into(),
            ..HostOverride::default()
        };

        let value = serde_json::to_value(HostOverrideEnvelope { host: &host }).unwrap();
        assert_eq!(value["host"]["enabled"], "1");
        assert_eq!(value["host"]["rr"], "TXT");
        assert_eq!(value["host"]["txtdata"], "hello");
        assert_eq!(value["host"]["mxprio"], "");
    }

    #[test]
    fn test_search_request_defaults() {
        let value = serde_json::to_value(SearchRequest::phrase("unbound")).unwrap();
        assert_eq!(value["rowCount"], -1);
        assert_eq!(value["searchPhrase"], "unbound");
    }
}
