//! HTTP client for the OPNsense Unbound API.
//!
//! This crate provides [`OpnsenseClient`], which speaks the host override and
//! service endpoints of the OPNsense REST API and implements
//! [`HostOverrideBackend`](opnsense_dns_core::HostOverrideBackend) for the
//! reconciliation engine.

#![doc(html_root_url = "https://docs.rs/opnsense-dns-client/0.3.0")]

mod backend;
mod client;
mod config;
pub mod api;

pub use client::{OpnsenseClient, OpnsenseClientBuilder};
pub use config::*;
pub use opnsense_dns_core::{DnsError, Result};
