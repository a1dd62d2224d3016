//! Client configuration.

use std::fmt;

use serde::Deserialize;

use crate::{
    error::{ClientError, Result},
    transport::{DEFAULT_USER_AGENT, HttpConfig},
};

/// Configuration for [`Client`](super::Client).
///
/// Only `host` is required. Without a `pem` a fresh key is generated; without
/// a `token` the client must be paired before calling token-scoped endpoints.
///
/// # Examples
///
/// ```
/// use btcpay_client::client::ClientConfig;
///
/// let config = ClientConfig::from_toml(
///     r#"
///     host = "https://btcpay.example.com"
///     user_agent = "my-shop/1.0"
///
///     [http]
///     timeout_secs = 30
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.user_agent, "my-shop/1.0");
/// assert_eq!(config.http.timeout_secs, 30);
/// assert!(config.pem.is_none());
/// ```
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the server, optionally with a path prefix.
    pub host: String,

    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// SEC1 `EC PRIVATE KEY` PEM of a previously generated key.
    #[serde(default)]
    pub pem: Option<String>,

    /// Pairing token obtained earlier.
    #[serde(default)]
    pub token: Option<String>,

    /// Settings for the built-in HTTP client.
    #[serde(default)]
    pub http: HttpConfig,

    /// Caller-supplied HTTP client; when set, `http` is ignored.
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user_agent: default_user_agent(),
            pem: None,
            token: None,
            http: HttpConfig::default(),
            http_client: None,
        }
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the document is not valid TOML, has
    /// unknown keys, or lacks `host`.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Uses an existing key instead of generating one.
    #[must_use]
    pub fn with_pem(mut self, pem: impl Into<String>) -> Self {
        self.pem = Some(pem.into());
        self
    }

    /// Starts with an already issued pairing token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replaces the built-in HTTP client settings.
    #[must_use]
    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Sends requests through `client` instead of building one.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("user_agent", &self.user_agent)
            .field("pem", &self.pem.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("http", &self.http)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}
