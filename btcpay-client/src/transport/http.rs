//! HTTP dispatch using reqwest.

use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use tracing::{debug, instrument};

use super::{API_VERSION, ApiResponse, JSON_CONTENT_TYPE, config::HttpConfig};
use crate::{
    error::{ClientError, Result},
    identity::RequestSignature,
    request::PreparedRequest,
};

/// Builds a reqwest client from the transport configuration.
///
/// # Errors
///
/// Returns [`ClientError::Config`] if the configuration is out of range and
/// [`ClientError::Http`] if the client cannot be created.
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    config.validate()?;

    let mut builder = Client::builder()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout());
    if config.http1_only {
        builder = builder.http1_only();
    }

    Ok(builder.build()?)
}

/// Sends prepared requests with the fixed protocol headers attached.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Creates a transport over `client` sending the given `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the user agent contains control
    /// characters or is otherwise not a valid header value.
    pub fn new(client: Client, user_agent: &str) -> Result<Self> {
        validate_header(USER_AGENT.as_str(), user_agent)?;

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(
            HeaderName::from_static("x-accept-version"),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| ClientError::Config(format!("invalid user agent: {e}")))?,
        );

        Ok(Self { client, headers })
    }

    /// Creates a transport with its own reqwest client built from `config`.
    ///
    /// # Errors
    ///
    /// See [`build_http_client`] and [`HttpTransport::new`].
    pub fn with_config(config: &HttpConfig, user_agent: &str) -> Result<Self> {
        Self::new(build_http_client(config)?, user_agent)
    }

    /// Sends `prepared` exactly as built, attaching signature headers when
    /// present, and classifies the response.
    ///
    /// The URL and body go on the wire unchanged so that the bytes the server
    /// verifies are the bytes that were signed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on network failure or timeout, and the
    /// errors of [`ApiResponse::error_for_status`] for status >= 400.
    #[instrument(skip_all, fields(method = %prepared.method, path = prepared.url.path()))]
    pub async fn execute(
        &self,
        prepared: &PreparedRequest,
        signature: Option<&RequestSignature>,
    ) -> Result<ApiResponse> {
        let mut request = self
            .client
            .request(prepared.method.clone(), prepared.url.clone())
            .headers(self.headers.clone());

        if let Some(signature) = signature {
            for (name, value) in signature.headers() {
                request = request.header(name, value);
            }
        }

        if let Some(body) = &prepared.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        let headers = header_pairs(response.headers());
        let body = response.bytes().await?.to_vec();
        debug!(status, body_len = body.len(), "response received");

        ApiResponse { status, body, headers }.error_for_status()
    }
}

/// Flattens response headers. Bytes outside UTF-8 become U+FFFD rather than
/// dropping the value.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
        })
        .collect()
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(ClientError::Config(format!(
            "invalid {name} header: control characters not allowed"
        )));
    }
    Ok(())
}
