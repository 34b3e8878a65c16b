//! Main OPNsense API client implementation.

use crate::api::{ServiceApi, UnboundApi};
use crate::config::RetryConfig;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use opnsense_dns_core::{DnsError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Main OPNsense API client
#[derive(Clone)]
pub struct OpnsenseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    api_key: String,
    api_secret: String,
    timeout: Duration,
    retry_config: RetryConfig,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for OpnsenseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpnsenseClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl OpnsenseClient {
    /// Create a builder for the OPNsense instance at `base_url`
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> OpnsenseClientBuilder {
        OpnsenseClientBuilder::new(base_url)
    }

    /// Access Unbound host override endpoints
    #[must_use]
    pub fn unbound(&self) -> UnboundApi<'_> {
        UnboundApi::new(self)
    }

    /// Access core service endpoints
    #[must_use]
    pub fn service(&self) -> ServiceApi<'_> {
        ServiceApi::new(self)
    }

    /// Base URL of the OPNsense instance
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform a POST request, retrying transient failures
    pub(crate) async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.build_url(path);
        let retry = &self.inner.retry_config;
        let mut attempt = 0;

        loop {
            match self.post_once(&url, body).await {
                Err(err) if self.should_retry(&err) && attempt < retry.max_retries => {
                    let backoff = retry.backoff_for(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Retrying OPNsense request"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn post_once<T, B>(&self, url: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        if let Some(limiter) = &self.inner.limiter {
            limiter.until_ready().await;
        }

        debug!(url = %url, "POST request");

        let mut request = self
            .inner
            .http
            .post(url)
            .basic_auth(&self.inner.api_key, Some(&self.inner.api_secret));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_transport_error(&e))?;

        Self::handle_response(response).await
    }

    fn should_retry(&self, err: &DnsError) -> bool {
        match err {
            DnsError::RateLimited => self.inner.retry_config.retry_on_rate_limit,
            other => other.is_retryable(),
        }
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> DnsError {
        if err.is_timeout() {
            DnsError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            DnsError::Connection(err.to_string())
        } else {
            DnsError::Http(err.to_string())
        }
    }

    /// Build the URL of an API path (`/unbound/...` becomes `<base>/api/unbound/...`)
    fn build_url(&self, path: &str) -> String {
        format!("{}/api{}", self.inner.base_url, path)
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| DnsError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(DnsError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a `DnsError`
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 | 403 => Err(DnsError::Unauthorized),
            404 => Err(DnsError::NotFound { resource: message }),
            429 => {
                warn!("Rate limited by OPNsense API");
                Err(DnsError::RateLimited)
            }
            _ => Err(DnsError::Api { code: status, message }),
        }
    }
}

/// Builder for configuring an [`OpnsenseClient`]
pub struct OpnsenseClientBuilder {
    base_url: String,
    api_key: String,
    api_secret: String,
    timeout: Duration,
    user_agent: String,
    allow_insecure: bool,
    retry_config: RetryConfig,
    requests_per_second: Option<NonZeroU32>,
}

impl OpnsenseClientBuilder {
    /// Create a new builder for the given base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("opnsense-dns/{}", env!("CARGO_PKG_VERSION")),
            allow_insecure: false,
            retry_config: RetryConfig::default(),
            requests_per_second: None,
        }
    }

    /// Set the API key and secret used for basic auth
    #[must_use]
    pub fn credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.api_secret = api_secret.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Accept invalid TLS certificates (self-signed firewall certs)
    #[must_use]
    pub const fn allow_insecure(mut self, allow: bool) -> Self {
        self.allow_insecure = allow;
        self
    }

    /// Set retry configuration
    #[must_use]
    pub const fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Limit outgoing requests per second
    #[must_use]
    pub const fn rate_limit(mut self, requests_per_second: Option<NonZeroU32>) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<OpnsenseClient> {
        let parsed = Url::parse(&self.base_url).map_err(|e| DnsError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DnsError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }

        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(DnsError::Config("API key and secret are required".into()));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .danger_accept_invalid_certs(self.allow_insecure)
            .build()
            .map_err(|e| DnsError::Config(format!("failed to build HTTP client: {e}")))?;

        if self.allow_insecure {
            warn!(url = %self.base_url, "TLS certificate verification disabled");
        }

        Ok(OpnsenseClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                api_key: self.api_key,
                api_secret: self.api_secret,
                timeout: self.timeout,
                retry_config: self.retry_config,
                limiter: self
                    .requests_per_second
                    .map(|rps| RateLimiter::direct(Quota::per_second(rps))),
            }),
        })
    }
}

/// Percent-encode a value for use as a path segment
pub(crate) fn encode_segment(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
