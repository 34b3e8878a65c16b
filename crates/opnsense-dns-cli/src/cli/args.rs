//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Manage OPNsense Unbound host overrides the way external-dns sees them
///
/// Lists current records, normalizes desired endpoints and applies
/// changesets against the OPNsense API.
#[derive(Parser, Debug)]
#[command(name = "opnsense-dns")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// OPNsense base URL, e.g. https://firewall.lan
    #[arg(long, env = "OPNSENSE_URL", global = true)]
    pub url: Option<String>,

    /// OPNsense API key
    #[arg(long, env = "OPNSENSE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// OPNsense API secret
    #[arg(long, env = "OPNSENSE_API_SECRET", global = true, hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, env = "OPNSENSE_ALLOW_INSECURE", global = true)]
    pub allow_insecure: bool,

    /// Log mutations instead of performing them
    #[arg(long, env = "DRY_RUN", global = true)]
    pub dry_run: bool,

    /// Managed domains (repeatable, comma separated)
    #[arg(long, env = "DOMAIN_FILTER", value_delimiter = ',', global = true)]
    pub domain_filter: Vec<String>,

    /// Excluded domains (repeatable, comma separated)
    #[arg(long, env = "EXCLUDE_DOMAINS", value_delimiter = ',', global = true)]
    pub exclude_domains: Vec<String>,

    /// Managed domain regex; overrides --domain-filter
    #[arg(long, env = "REGEX_DOMAIN_FILTER", global = true)]
    pub regex_domain_filter: Option<String>,

    /// Excluded domain regex, used with --regex-domain-filter
    #[arg(long, env = "REGEX_DOMAIN_EXCLUSION", global = true)]
    pub regex_domain_exclusion: Option<String>,

    /// Store registry linkage in the description of ownership TXT rows
    #[arg(long, global = true)]
    pub ownership_description: bool,

    /// Retries for transient API failures
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Initial retry backoff in seconds
    #[arg(long, global = true)]
    pub min_backoff: Option<u64>,

    /// Maximum retry backoff in seconds
    #[arg(long, global = true)]
    pub max_backoff: Option<u64>,

    /// Maximum API requests per second
    #[arg(long, global = true)]
    pub rate_limit: Option<u32>,

    /// Abort the whole operation after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log line format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Config file to use instead of the default location
    #[arg(long, env = "OPNSENSE_DNS_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the domain filter advertised to external-dns
    Negotiate,

    /// List current records
    Records,

    /// Split desired endpoints into single-target endpoints
    Adjust(InputArgs),

    /// Apply a changeset
    Apply(InputArgs),

    /// Check that the Unbound service is running
    Check,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Adjust / apply input
// ============================================================================

#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON input file, `-` or omitted for stdin
    pub file: Option<PathBuf>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "opnsense-dns",
            "records",
            "--url",
            "https://fw.example.com",
            "--domain-filter",
            "example.com,example.org",
            "--domain-filter",
            "example.net",
            "-o",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Records));
        assert_eq!(cli.global.url.as_deref(), Some("https://fw.example.com"));
        assert_eq!(cli.global.domain_filter, ["example.com", "example.org", "example.net"]);
        assert_eq!(cli.global.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_input_file_is_optional() {
        let cli = Cli::try_parse_from(["opnsense-dns", "apply"]).unwrap();
        assert!(matches!(cli.command, Commands::Apply(InputArgs { file: None })));

        let cli = Cli::try_parse_from(["opnsense-dns", "adjust", "endpoints.json"]).unwrap();
        match cli.command {
            Commands::Adjust(args) => assert_eq!(args.file, Some(PathBuf::from("endpoints.json"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::try_parse_from(["opnsense-dns", "config", "set", "url", "https://fw"]).unwrap();
        match cli.command {
            Commands::Config(ConfigArgs {
                command: ConfigCommands::Set { key, value },
            }) => {
                assert_eq!(key, "url");
                assert_eq!(value, "https://fw");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
