//! Reconciliation engine for OPNsense Unbound host overrides.
//!
//! external-dns thinks in multi-valued [`Endpoint`]s; Unbound stores one value
//! per host override row, addressed by a UUID it assigns. This crate bridges
//! the two:
//!
//! - [`DomainFilter`] decides which names are managed
//! - [`Record`] translates between endpoints and rows
//! - [`normalize`] splits multi-target endpoints and assigns stable
//!   [`set_identifier`]s
//! - [`registry`] resolves ownership TXT records back to their rows
//! - [`Provider`] lists records and applies [`Changes`]
//!
//! # Example
//!
//! ```rust,ignore
//! use opnsense_dns_provider::{Provider, ProviderConfig};
//!
//! let provider = Provider::new(client, ProviderConfig::default())?;
//! let current = provider.records().await?;
//! ```
//!
//! [`Endpoint`]: opnsense_dns_core::Endpoint
//! [`Changes`]: opnsense_dns_core::Changes

#![doc(html_root_url = "https://docs.rs/opnsense-dns-provider/0.3.0")]

mod apply;
mod config;
mod domain_filter;
mod normalize;
mod ownership;
mod provider;
mod record;
pub mod registry;

#[cfg(test)]
mod testing;

pub use apply::ApplyReport;
pub use config::ProviderConfig;
pub use domain_filter::{DomainFilter, DomainFilterConfig};
pub use normalize::normalize;
pub use ownership::OwnershipRecord;
pub use provider::Provider;
pub use record::{set_identifier, Record};
