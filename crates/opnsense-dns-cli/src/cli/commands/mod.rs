//! Command implementations.

pub mod adjust;
pub mod apply;
pub mod check;
pub mod config;
pub mod negotiate;
pub mod records;

use anyhow::{Context as _, Result};
use opnsense_dns::{DryRun, OpnsenseClient, Provider};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::settings::Settings;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved settings
    pub settings: Settings,

    /// Config file in use
    pub config_path: PathBuf,
}

impl Context {
    /// Create an OPNsense client from the configured connection settings.
    pub fn client(&self) -> Result<OpnsenseClient> {
        let s = &self.settings;
        let (Some(url), Some(key), Some(secret)) = (&s.url, &s.api_key, &s.api_secret) else {
            anyhow::bail!(
                "OPNsense connection settings required.\n\n\
                 Set them with one of:\n  \
                 1. --url, --api-key and --api-secret\n  \
                 2. OPNSENSE_URL, OPNSENSE_API_KEY and OPNSENSE_API_SECRET\n  \
                 3. opnsense-dns config set url|api_key|api_secret <VALUE>"
            );
        };

        Ok(OpnsenseClient::builder(url)
            .credentials(key, secret)
            .allow_insecure(s.allow_insecure)
            .retry(s.retry.clone())
            .rate_limit(s.rate_limit)
            .build()?)
    }

    /// Create the provider, honoring dry-run.
    pub fn provider(&self) -> Result<Provider<DryRun<OpnsenseClient>>> {
        let backend = DryRun::new(self.client()?, self.settings.dry_run);
        Ok(Provider::new(backend, self.settings.provider.clone())?)
    }
}

/// Read JSON from a file, or from stdin for `None` and `-`.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let (source, content) = match path {
        Some(p) if p != Path::new("-") => (
            p.display().to_string(),
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))?,
        ),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            ("stdin".to_string(), buf)
        }
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::GlobalArgs;
    use crate::config::Config;
    use opnsense_dns::Changes;
    use std::io::Write;

    fn context(args: GlobalArgs) -> Context {
        Context {
            settings: Settings::resolve(&args, &Config::default()).unwrap(),
            config_path: PathBuf::from("config.toml"),
        }
    }

    #[test]
    fn test_client_requires_connection_settings() {
        let err = context(GlobalArgs::default()).client().unwrap_err();
        assert!(err.to_string().contains("OPNSENSE_URL"));
    }

    #[test]
    fn test_provider_from_settings() {
        let ctx = context(GlobalArgs {
            url: Some("https://fw.example.com".into()),
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            dry_run: true,
            domain_filter: vec!["example.com".into()],
            ..GlobalArgs::default()
        });

        let provider = ctx.provider().unwrap();
        assert!(provider.backend().is_enabled());
        assert_eq!(provider.negotiate().include, ["example.com"]);
    }

    #[test]
    fn test_read_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Create": [{{"dnsName": "a.example.com", "recordType": "A", "targets": ["10.0.0.1"]}}]}}"#)
            .unwrap();

        let changes: Changes = read_json(Some(file.path())).unwrap();
        assert_eq!(changes.create.len(), 1);
    }

    #[test]
    fn test_read_json_reports_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_json::<Changes>(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
