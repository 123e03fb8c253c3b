use std::fmt;
use std::time::Duration;

use url::Url;

use crate::endpoints::BASE_URL;
use crate::error::{Error, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CAPI_KEY";
/// Optional environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "CLOCKIFY_BASE_URL";

const DEFAULT_USER_AGENT: &str = concat!("clockify-rs/", env!("CARGO_PKG_VERSION"));

/// A Clockify API key, sent as the `X-Api-Key` header.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Reads the key from `CAPI_KEY`.
    pub fn from_env() -> Result<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self)
            .ok_or(Error::MissingApiKey(API_KEY_ENV))
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// Settings used to build a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub base_url: Url,
    /// Per-request timeout handed to the HTTP client. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Config {
    /// Configuration for the public Clockify API with the given key.
    pub fn new(api_key: ApiKey) -> Result<Self> {
        Ok(Self {
            api_key,
            base_url: Url::parse(BASE_URL).map_err(|_| Error::InvalidEndpoint)?,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Reads `CAPI_KEY` and, if set, `CLOCKIFY_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let config = Self::new(ApiKey::from_env()?)?;
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.trim().is_empty() => config.with_base_url(&base_url),
            _ => Ok(config),
        }
    }

    /// Points the client at another server, e.g. a regional endpoint or a mock.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url).map_err(|_| Error::InvalidEndpoint)?;
        if self.base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint);
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
