use serde::{Deserialize, Serialize};

/// A service entry from `core/service/search`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Service id
    #[serde(default)]
    pub id: String,

    /// Whether the service is locked
    #[serde(default)]
    pub locked: i64,

    /// 1 when the service is running
    #[serde(default)]
    pub running: i64,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// Service name, e.g. `unbound`
    #[serde(default)]
    pub name: String,
}

impl ServiceItem {
    /// Returns true if the service reports itself as running
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running == 1
    }
}

/// Response of service actions such as `unbound/service/reconfigure`
///
/// Depending on the OPNsense version the outcome is in `status` or `result`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatusResponse {
    /// Outcome, newer releases
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// Outcome, older releases
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
}

impl ServiceStatusResponse {
    /// The reported outcome, lowercased, if any was reported
    #[must_use]
    pub fn outcome(&self) -> Option<String> {
        [&self.status, &self.result]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(|s| s.trim().to_lowercase())
    }

    /// Returns true if the action succeeded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome().as_deref() == Some("ok")
    }
}
