//! Error types for the BTCPay client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! type is [`ClientError`]. All variants implement [`std::error::Error`] via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Key material** ([`ClientError::KeyGeneration`], [`ClientError::KeyEncoding`],
//!   [`ClientError::KeyFormat`]): the client identity cannot be created or loaded
//! - **Signing** ([`ClientError::Signing`]): the request signature could not be computed
//! - **Pairing** ([`ClientError::Pairing`]): the server accepted the pairing call but
//!   returned no token
//! - **Server rejection** ([`ClientError::ServerRejected`]): HTTP status >= 400 with a
//!   well-formed `{"error": ...}` body
//! - **Decode** ([`ClientError::ResponseFormat`]): a response body was not the expected JSON
//! - **Transport** ([`ClientError::Http`]): the network or the HTTP stack failed
//! - **Configuration and input** ([`ClientError::Config`], [`ClientError::InvalidUrl`],
//!   [`ClientError::InvalidInput`]): rejected before anything was sent
//!
//! # Examples
//!
//! ```
//! use btcpay_client::error::ClientError;
//!
//! let err = ClientError::ServerRejected { status: 401, message: "unauthorized".to_owned() };
//! assert_eq!(err.to_string(), "[401] unauthorized");
//! assert!(err.is_server_rejection());
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to a BTCPay server.
///
/// Nothing is retried internally: every variant reaches the caller, who owns
/// the retry policy.
///
/// # Error Recovery
///
/// - **Key errors**: regenerate or reload the key; retrying the same call will fail again
/// - **Server rejections**: inspect `status` and `message`; usually an expired or
///   missing token (re-pair) or an invalid request
/// - **Transport errors**: retry with backoff
/// - **Decode errors**: the server returned something other than the documented shape
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum ClientError {
    /// A new key pair could not be generated.
    ///
    /// Raised when the operating system RNG fails or the curve rejects the
    /// random scalar. Never retried internally.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The key pair could not be serialized to PEM.
    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    /// A PEM string could not be decoded into a key pair.
    ///
    /// Covers a missing or malformed PEM envelope, an ASN.1 structure of the
    /// wrong shape, a curve other than secp256k1, and a scalar that does not
    /// yield a valid point.
    #[error("invalid key format: {0}")]
    KeyFormat(String),

    /// Signature computation failed.
    #[error("request signing failed: {0}")]
    Signing(String),

    /// Pairing completed at the HTTP level but produced no token.
    ///
    /// Distinct from transport and decode failures: the server answered with a
    /// well-formed but empty token list.
    #[error("{0}")]
    Pairing(String),

    /// The server answered with status >= 400 and an `{"error": ...}` body.
    ///
    /// # Examples
    ///
    /// ```
    /// use btcpay_client::error::ClientError;
    ///
    /// let err = ClientError::ServerRejected { status: 404, message: "not found".to_owned() };
    /// assert_eq!(err.to_string(), "[404] not found");
    /// ```
    #[error("[{status}] {message}")]
    ServerRejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message.
        message: String,
    },

    /// A response body (success or error) was not valid JSON of the expected shape.
    #[error("malformed response body: {0}")]
    ResponseFormat(#[source] serde_json::Error),

    /// The request payload could not be serialized.
    #[error("request encoding failed: {0}")]
    RequestEncoding(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured host or a resolved request URL is not usable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Client or HTTP configuration is out of range or could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A caller-supplied argument was rejected before anything was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Returns `true` if the server rejected the request with an error body.
    #[must_use]
    pub const fn is_server_rejection(&self) -> bool {
        matches!(self, Self::ServerRejected { .. })
    }

    /// Returns `true` if the local key material is at fault.
    #[must_use]
    pub const fn is_key_error(&self) -> bool {
        matches!(
            self,
            Self::KeyGeneration(_) | Self::KeyEncoding(_) | Self::KeyFormat(_) | Self::Signing(_)
        )
    }

    /// Returns `true` if the failure happened in the network layer.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
