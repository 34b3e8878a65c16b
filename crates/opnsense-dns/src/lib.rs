//! external-dns provider for OPNsense Unbound host overrides.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use opnsense_dns::{Changes, DryRun, OpnsenseClient, Provider, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> opnsense_dns::Result<()> {
//!     let client = OpnsenseClient::builder("https://firewall.lan")
//!         .credentials("key", "secret")
//!         .build()?;
//!
//!     let provider = Provider::new(DryRun::new(client, true), ProviderConfig::default())?;
//!
//!     for ep in provider.records().await? {
//!         println!("{ep}");
//!     }
//!
//!     let report = provider.apply_changes(&Changes::default()).await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/opnsense-dns/0.3.0")]

// Re-export core types
pub use opnsense_dns_core::*;

// Re-export client
pub use opnsense_dns_client::{api, OpnsenseClient, OpnsenseClientBuilder, RetryConfig};

// Re-export the engine
pub use opnsense_dns_provider::{
    normalize, registry, set_identifier, ApplyReport, DomainFilter, DomainFilterConfig, OwnershipRecord,
    Provider, ProviderConfig, Record,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
