//! HTTP transport and response classification.
//!
//! Every request carries the same fixed headers:
//!
//! | Header | Value |
//! |--------|-------|
//! | `Accept` | `application/json` |
//! | `Content-Type` | `application/json` |
//! | `X-Accept-Version` | `2.0.0` |
//! | `User-Agent` | `btcpay-rs` unless overridden |
//!
//! Signed requests add `X-Identity` and `X-Signature`.
//!
//! Responses with status >= 400 are turned into errors: a body of the form
//! `{"error": "<message>"}` becomes [`ClientError::ServerRejected`], anything
//! else becomes [`ClientError::ResponseFormat`].

use serde::{Deserialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::{ClientError, Result};

pub mod config;
pub mod http;

pub use config::{CONNECT_TIMEOUT_RANGE_SECS, HttpConfig, TIMEOUT_RANGE_SECS};
pub use http::{HttpTransport, build_http_client};

/// Protocol version advertised in `X-Accept-Version`.
pub const API_VERSION: &str = "2.0.0";

/// Name of the protocol version header.
pub const ACCEPT_VERSION_HEADER: &str = "X-Accept-Version";

/// `User-Agent` sent when the caller does not override it.
pub const DEFAULT_USER_AGENT: &str = "btcpay-rs";

/// Media type of every request and response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A raw response from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiResponse {
    /// Returns `true` for status codes below 400.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ResponseFormat`] if the body is not valid JSON
    /// of the requested shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(ClientError::ResponseFormat)
    }

    /// Returns the first header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Passes successful responses through and converts failures into errors.
    ///
    /// # Errors
    ///
    /// For status >= 400, returns [`ClientError::ServerRejected`] carrying the
    /// status and the `error` field of the body, or
    /// [`ClientError::ResponseFormat`] if the body has no such field.
    ///
    /// # Examples
    ///
    /// ```
    /// use btcpay_client::{error::ClientError, transport::ApiResponse};
    ///
    /// let response = ApiResponse {
    ///     status: 401,
    ///     body: br#"{"error":"unauthorized"}"#.to_vec(),
    ///     headers: vec![],
    /// };
    /// let err = response.error_for_status().unwrap_err();
    /// assert_eq!(err.to_string(), "[401] unauthorized");
    /// ```
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let ErrorBody { error } = self.json()?;
        warn!(status = self.status, message = %error, "server rejected request");
        Err(ClientError::ServerRejected { status: self.status, message: error })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse { status, body: body.as_bytes().to_vec(), headers: vec![] }
    }

    #[test]
    fn test_success_passes_through() {
        let ok = response(200, r#"{"data":[]}"#).error_for_status().unwrap();
        assert_eq!(ok.status, 200);
        assert_eq!(ok.json::<Value>().unwrap()["data"], Value::Array(vec![]));
    }

    #[test]
    fn test_error_body_becomes_server_rejection() {
        let err = response(401, r#"{"error":"unauthorized123"}"#).error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "[401] unauthorized123");
        assert!(matches!(err, ClientError::ServerRejected { status: 401, .. }));
    }

    #[test]
    fn test_error_body_with_extra_fields() {
        let err = response(404, r#"{"error":"not found","code":7}"#).error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "[404] not found");
    }

    #[test]
    fn test_malformed_error_body_is_decode_error() {
        for body in ["{\"error\":", "<html>oops</html>", "{\"message\":\"x\"}", ""] {
            let err = response(500, body).error_for_status().unwrap_err();
            assert!(matches!(err, ClientError::ResponseFormat(_)), "body {body:?}: {err}");
        }
    }

    #[test]
    fn test_success_body_is_not_inspected() {
        assert!(response(204, "").error_for_status().is_ok());
        assert!(response(302, "not json").error_for_status().is_ok());
    }

    #[test]
    fn test_json_decode_error() {
        let err = response(200, "[1,2").json::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, ClientError::ResponseFormat(_)));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = ApiResponse {
            status: 200,
            body: vec![],
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        };
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Missing"), None);
    }
}
