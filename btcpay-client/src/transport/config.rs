//! HTTP transport configuration.
//!
//! Deserializable from the `[http]` table of a client TOML file. Every field
//! is optional; missing fields take the defaults listed on [`HttpConfig`].

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Accepted range for [`HttpConfig::timeout_secs`].
pub const TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=300;

/// Accepted range for [`HttpConfig::connect_timeout_secs`].
pub const CONNECT_TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=60;

/// Settings for the reqwest client the transport builds when the caller does
/// not supply one.
///
/// | Field | Default |
/// |-------|---------|
/// | `timeout_secs` | 20 |
/// | `connect_timeout_secs` | 10 |
/// | `pool_max_idle_per_host` | 10 |
/// | `http1_only` | `false` |
///
/// # Examples
///
/// ```toml
/// [http]
/// timeout_secs = 30
/// pool_max_idle_per_host = 4
/// http1_only = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Deadline for a whole call: connect, send and reading the body.
    pub timeout_secs: u64,

    /// Deadline for establishing the TCP/TLS connection.
    pub connect_timeout_secs: u64,

    /// Idle keep-alive connections kept per host.
    pub pool_max_idle_per_host: usize,

    /// Disables HTTP/2 negotiation. Useful behind proxies that mishandle it.
    pub http1_only: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 20, connect_timeout_secs: 10, pool_max_idle_per_host: 10, http1_only: false }
    }
}

impl HttpConfig {
    /// Checks both deadlines against [`TIMEOUT_RANGE_SECS`] and
    /// [`CONNECT_TIMEOUT_RANGE_SECS`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] naming the first field out of range.
    pub fn validate(&self) -> Result<()> {
        check_range("timeout_secs", self.timeout_secs, &TIMEOUT_RANGE_SECS)?;
        check_range("connect_timeout_secs", self.connect_timeout_secs, &CONNECT_TIMEOUT_RANGE_SECS)
    }

    /// Overall deadline as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect deadline as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn check_range(field: &str, value: u64, range: &RangeInclusive<u64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ClientError::Config(format!(
            "{field} = {value} is outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}
