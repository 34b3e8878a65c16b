use std::collections::BTreeMap;

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, DnsError>;

/// Broad error classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller sent something the backend cannot represent; nothing was mutated
    Validation,
    /// Identifier resolution failed; acting would risk touching an unrelated row
    Consistency,
    /// The OPNsense API or the transport to it failed
    Backend,
    /// Local configuration is unusable
    Config,
}

/// Errors that can occur while translating or applying DNS records
#[derive(Error, Debug)]
pub enum DnsError {
    /// Endpoint cannot be translated into host overrides
    #[error("invalid endpoint {name}: {reason}")]
    Validation {
        /// DNS name of the offending endpoint
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Record type outside of A, AAAA and TXT
    #[error("unsupported record type {record_type} for {name}")]
    UnsupportedRecordType {
        /// DNS name of the endpoint
        name: String,
        /// The rejected record type
        record_type: String,
    },

    /// Endpoint was expected to carry the backend UUID property
    #[error("provider specific id not found attached to the endpoint {name}")]
    MissingUuid {
        /// DNS name of the endpoint
        name: String,
    },

    /// Registry TXT record could not be resolved to exactly one current row
    #[error("failed to find a unique registry TXT record for {name} with set identifier {set_identifier}: {matches} matches")]
    RegistryMatch {
        /// DNS name of the registry record
        name: String,
        /// Set identifier used for matching
        set_identifier: String,
        /// Number of structural matches found
        matches: usize,
    },

    /// Authentication failed - invalid API key or secret
    #[error("authentication failed: invalid API key or secret")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimited,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error status
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// API accepted the request but refused the mutation
    #[error("resource not changed. result: {result}. errors: {validations:?}")]
    Rejected {
        /// The `result` field returned by OPNsense
        result: String,
        /// Field validation messages
        validations: BTreeMap<String, String>,
    },

    /// The Unbound service is not running
    #[error("unbound service is not running")]
    ServiceUnavailable,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl DnsError {
    /// Build a validation error for the given endpoint name
    pub fn validation(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::UnsupportedRecordType { .. } => ErrorKind::Validation,
            Self::MissingUuid { .. } | Self::RegistryMatch { .. } => ErrorKind::Consistency,
            Self::InvalidUrl(_) | Self::Config(_) => ErrorKind::Config,
            _ => ErrorKind::Backend,
        }
    }

    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::Timeout(_) | Self::Connection(_) => true,
            Self::Api { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// Returns true if the caller is at fault and a retry cannot help
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    /// Returns the HTTP status code a webhook transport should answer with
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::NotFound { .. } => 404,
            Self::RateLimited => 429,
            _ => match self.kind() {
                ErrorKind::Validation => 400,
                ErrorKind::Config => 500,
                ErrorKind::Consistency | ErrorKind::Backend => 422,
            },
        }
    }
}
