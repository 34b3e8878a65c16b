//! # opnsense-dns-cli
//!
//! Command-line interface for the OPNsense external-dns provider.
//!
//! ## Features
//!
//! - **Engine operations**: `negotiate`, `records`, `adjust`, `apply`
//! - **Readiness**: `check` verifies that Unbound is running
//! - **Layered settings**: flags, environment, config file
//! - **Multiple output formats**: Pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
