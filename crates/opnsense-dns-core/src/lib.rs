//! Core types and traits for the OPNsense DNS provider.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - **Types**: the external-dns record model ([`Endpoint`], [`Changes`]) and
//!   the OPNsense Unbound wire model ([`HostOverride`], [`HostOverrideRow`])
//! - **Backend**: the [`HostOverrideBackend`] capability the engine mutates
//!   rows through, plus the [`DryRun`] decorator
//! - **Errors**: the [`DnsError`] taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use opnsense_dns_core::{Endpoint, RecordType, Result};
//!
//! fn describe(ep: &Endpoint) -> Result<()> {
//!     println!("{} {} -> {:?}", ep.dns_name, ep.record_type, ep.targets);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/opnsense-dns-core/0.3.0")]

pub mod backend;
mod error;
pub mod types;

pub use backend::{DryRun, HostOverrideBackend};
pub use error::{DnsError, ErrorKind, Result};
pub use types::*;
