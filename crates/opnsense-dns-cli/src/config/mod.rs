//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Keys accepted by `config set`.
pub const KEYS: &[(&str, &str)] = &[
    ("url", "OPNsense base URL"),
    ("api_key", "OPNsense API key"),
    ("api_secret", "OPNsense API secret"),
    ("allow_insecure", "Accept invalid TLS certificates (true/false)"),
    ("dry_run", "Log mutations instead of performing them (true/false)"),
    ("domain_filter", "Managed domains, comma separated"),
    ("exclude_domains", "Excluded domains, comma separated"),
    ("regex_domain_filter", "Managed domain regex"),
    ("regex_domain_exclusion", "Excluded domain regex"),
    ("ownership_description", "Stamp registry linkage into TXT descriptions (true/false)"),
    ("max_retries", "Retries for transient API failures"),
    ("min_backoff", "Initial retry backoff in seconds"),
    ("max_backoff", "Maximum retry backoff in seconds"),
    ("rate_limit", "Maximum API requests per second"),
    ("timeout", "Operation timeout in seconds"),
    ("log_level", "Log level or filter directive"),
    ("log_format", "Log format (pretty/json)"),
    ("output_format", "Default output format (pretty/json/yaml)"),
];

/// CLI configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OPNsense base URL.
    pub url: Option<String>,

    /// OPNsense API key.
    pub api_key: Option<String>,

    /// OPNsense API secret.
    pub api_secret: Option<String>,

    /// Accept invalid TLS certificates.
    pub allow_insecure: Option<bool>,

    /// Log mutations instead of performing them.
    pub dry_run: Option<bool>,

    /// Managed domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_filter: Vec<String>,

    /// Excluded domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,

    /// Managed domain regex.
    pub regex_domain_filter: Option<String>,

    /// Excluded domain regex.
    pub regex_domain_exclusion: Option<String>,

    /// Stamp registry linkage into TXT descriptions.
    pub ownership_description: Option<bool>,

    /// Retries for transient API failures.
    pub max_retries: Option<u32>,

    /// Initial retry backoff in seconds.
    pub min_backoff: Option<u64>,

    /// Maximum retry backoff in seconds.
    pub max_backoff: Option<u64>,

    /// Maximum API requests per second.
    pub rate_limit: Option<u32>,

    /// Operation timeout in seconds.
    pub timeout: Option<u64>,

    /// Log level or filter directive.
    pub log_level: Option<String>,

    /// Log format.
    pub log_format: Option<LogFormat>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "opnsense-dns")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        explicit.map_or_else(Self::path, |p| Ok(p.to_path_buf()))
    }

    /// Load configuration, returning defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set a key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => self.url = Some(value.to_string()),
            "api_key" => self.api_key = Some(value.to_string()),
            "api_secret" => self.api_secret = Some(value.to_string()),
            "allow_insecure" => self.allow_insecure = Some(parse(key, value)?),
            "dry_run" => self.dry_run = Some(parse(key, value)?),
            "domain_filter" => self.domain_filter = split_list(value),
            "exclude_domains" => self.exclude_domains = split_list(value),
            "regex_domain_filter" => self.regex_domain_filter = Some(value.to_string()),
            "regex_domain_exclusion" => self.regex_domain_exclusion = Some(value.to_string()),
            "ownership_description" => self.ownership_description = Some(parse(key, value)?),
            "max_retries" => self.max_retries = Some(parse(key, value)?),
            "min_backoff" => self.min_backoff = Some(parse(key, value)?),
            "max_backoff" => self.max_backoff = Some(parse(key, value)?),
            "rate_limit" => self.rate_limit = Some(parse(key, value)?),
            "timeout" => self.timeout = Some(parse(key, value)?),
            "log_level" => self.log_level = Some(value.to_string()),
            "log_format" => {
                self.log_format = Some(match value.to_lowercase().as_str() {
                    "pretty" => LogFormat::Pretty,
                    "json" => LogFormat::Json,
                    _ => anyhow::bail!("Unknown log format: {value}\nValid formats: pretty, json"),
                });
            }
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            _ => {
                let available: Vec<String> = KEYS
                    .iter()
                    .map(|(name, help)| format!("  {name:<24}- {help}"))
                    .collect();
                anyhow::bail!(
                    "Unknown config key: {}\n\nAvailable keys:\n{}",
                    key,
                    available.join("\n")
                );
            }
        }

        Ok(())
    }

    /// Copy with the API secret and key masked, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            api_key: self.api_key.as_deref().map(mask),
            api_secret: self.api_secret.as_deref().map(|_| "****".to_string()),
            ..self.clone()
        }
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {key}: {value}"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut config = Config::default();
        config.set("url", "https://fw.example.com").unwrap();
        config.set("dry_run", "true").unwrap();
        config.set("domain_filter", "example.com, example.org,").unwrap();
        config.set("max_retries", "5").unwrap();
        config.set("output", "yaml").unwrap();
        config.set("log_format", "JSON").unwrap();

        assert_eq!(config.url.as_deref(), Some("https://fw.example.com"));
        assert_eq!(config.dry_run, Some(true));
        assert_eq!(config.domain_filter, ["example.com", "example.org"]);
        assert_eq!(config.max_retries, Some(5));
        assert_eq!(config.output_format, Some(OutputFormat::Yaml));
        assert_eq!(config.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("max_retries", "many").is_err());
        assert!(config.set("dry_run", "maybe").is_err());
        assert!(config.set("color", "red").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(Config::load(&path).unwrap(), Config::default());

        let mut config = Config::default();
        config.set("url", "https://fw.example.com").unwrap();
        config.set("exclude_domains", "internal.example.com").unwrap();
        config.set("timeout", "60").unwrap();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_masked() {
        let config = Config {
            api_key: Some("abcdefghijklmnop".into()),
            api_secret: Some("secret".into()),
            ..Config::default()
        };
        let masked = config.masked();
        assert_eq!(masked.api_key.as_deref(), Some("abcd...mnop"));
        assert_eq!(masked.api_secret.as_deref(), Some("****"));
    }
}
