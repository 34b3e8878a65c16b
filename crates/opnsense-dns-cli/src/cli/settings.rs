//! Effective settings: flags and environment, then config file, then defaults.

use anyhow::Result;
use opnsense_dns::{DomainFilterConfig, ProviderConfig, RetryConfig};
use std::num::NonZeroU32;
use std::time::Duration;

use super::args::GlobalArgs;
use crate::config::Config;
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub allow_insecure: bool,
    pub dry_run: bool,
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
    pub rate_limit: Option<NonZeroU32>,
    pub timeout: Option<Duration>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub output: OutputFormat,
}

impl Settings {
    /// Merge command-line arguments over the config file.
    pub fn resolve(args: &GlobalArgs, config: &Config) -> Result<Self> {
        let defaults = RetryConfig::default();

        let min_backoff = args
            .min_backoff
            .or(config.min_backoff)
            .map_or(defaults.initial_backoff, Duration::from_secs);
        let max_backoff = args
            .max_backoff
            .or(config.max_backoff)
            .map_or(defaults.max_backoff, Duration::from_secs);
        if max_backoff < min_backoff {
            anyhow::bail!(
                "max_backoff ({}s) must not be smaller than min_backoff ({}s)",
                max_backoff.as_secs(),
                min_backoff.as_secs()
            );
        }

        let retry = RetryConfig::new()
            .max_retries(args.max_retries.or(config.max_retries).unwrap_or(defaults.max_retries))
            .initial_backoff(min_backoff)
            .max_backoff(max_backoff);

        let domain_filter = DomainFilterConfig {
            include: first_non_empty(&args.domain_filter, &config.domain_filter),
            exclude: first_non_empty(&args.exclude_domains, &config.exclude_domains),
            regex_include: args
                .regex_domain_filter
                .clone()
                .or_else(|| config.regex_domain_filter.clone())
                .unwrap_or_default(),
            regex_exclude: args
                .regex_domain_exclusion
                .clone()
                .or_else(|| config.regex_domain_exclusion.clone())
                .unwrap_or_default(),
        };

        Ok(Self {
            url: args.url.clone().or_else(|| config.url.clone()),
            api_key: args.api_key.clone().or_else(|| config.api_key.clone()),
            api_secret: args.api_secret.clone().or_else(|| config.api_secret.clone()),
            allow_insecure: args.allow_insecure || config.allow_insecure.unwrap_or(false),
            dry_run: args.dry_run || config.dry_run.unwrap_or(false),
            provider: ProviderConfig {
                domain_filter,
                ownership_description: args.ownership_description
                    || config.ownership_description.unwrap_or(false),
            },
            retry,
            rate_limit: args.rate_limit.or(config.rate_limit).and_then(NonZeroU32::new),
            timeout: args
                .timeout
                .or(config.timeout)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_level: args
                .log_level
                .clone()
                .or_else(|| config.log_level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: args.log_format.or(config.log_format).unwrap_or_default(),
            output: args.output.or(config.output_format).unwrap_or_default(),
        })
    }
}

fn first_non_empty(primary: &[String], fallback: &[String]) -> Vec<String> {
    if primary.is_empty() {
        fallback.to_vec()
    } else {
        primary.to_vec()
    }
}
