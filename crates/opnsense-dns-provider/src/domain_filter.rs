//! Accept/reject predicate on fully qualified domain names.

use opnsense_dns_core::{DnsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Domain filter settings
///
/// Serializes to the external-dns negotiation document
/// `{include, exclude, regexInclude, regexExclude}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainFilterConfig {
    /// Managed domain suffixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Excluded domain suffixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Managed domain pattern; takes precedence over the suffix lists
    #[serde(skip_serializing_if = "String::is_empty")]
    pub regex_include: String,

    /// Excluded domain pattern, only used with `regex_include`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub regex_exclude: String,
}

impl DomainFilterConfig {
    /// Returns true if the regex mode is selected
    #[must_use]
    pub fn is_regex(&self) -> bool {
        !self.regex_include.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Suffix {
        include: Vec<String>,
        exclude: Vec<String>,
    },
    Regex {
        include: Regex,
        exclude: Option<Regex>,
    },
}

/// Compiled domain filter
#[derive(Debug, Clone)]
pub struct DomainFilter {
    mode: Mode,
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self {
            mode: Mode::Suffix {
                include: Vec::new(),
                exclude: Vec::new(),
            },
        }
    }
}

impl DomainFilter {
    /// Compile a filter
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Config`] if a regular expression does not compile.
    pub fn new(config: &DomainFilterConfig) -> Result<Self> {
        if config.is_regex() {
            let include = compile(&config.regex_include)?;
            let exclude = if config.regex_exclude.is_empty() {
                None
            } else {
                Some(compile(&config.regex_exclude)?)
            };
            return Ok(Self {
                mode: Mode::Regex { include, exclude },
            });
        }

        Ok(Self {
            mode: Mode::Suffix {
                include: prepare(&config.include),
                exclude: prepare(&config.exclude),
            },
        })
    }

    /// Returns true if `domain` is managed
    #[must_use]
    pub fn accept(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);

        match &self.mode {
            Mode::Suffix { include, exclude } => {
                (include.is_empty() || matches_any(include, &domain)) && !matches_any(exclude, &domain)
            }
            Mode::Regex { include, exclude } => {
                include.is_match(&domain) && !exclude.as_ref().is_some_and(|re| re.is_match(&domain))
            }
        }
    }

    /// The effective settings, as advertised during negotiation
    #[must_use]
    pub fn config(&self) -> DomainFilterConfig {
        match &self.mode {
            Mode::Suffix { include, exclude } => DomainFilterConfig {
                include: include.clone(),
                exclude: exclude.clone(),
                ..DomainFilterConfig::default()
            },
            Mode::Regex { include, exclude } => DomainFilterConfig {
                regex_include: include.as_str().to_string(),
                regex_exclude: exclude.as_ref().map(|re| re.as_str().to_string()).unwrap_or_default(),
                ..DomainFilterConfig::default()
            },
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| DnsError::Config(format!("invalid domain filter regex {pattern:?}: {e}")))
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

fn prepare(filters: &[String]) -> Vec<String> {
    filters
        .iter()
        .map(|f| normalize_domain(f))
        .filter(|f| !f.is_empty())
        .collect()
}

fn matches_any(filters: &[String], domain: &str) -> bool {
    filters.iter().any(|filter| {
        if filter.starts_with('.') {
            domain.ends_with(filter.as_str())
        } else {
            domain == filter
                || domain
                    .strip_suffix(filter.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        }
    })
}
