//! Request construction: ordered query strings, token injection and frozen
//! canonical bytes.
//!
//! The server verifies a signature over the exact URL and body it receives,
//! so construction is deterministic and order-preserving:
//!
//! - **No payload**: the query is `token=<token>` (when a token is installed)
//!   followed by the caller's parameters in the order given.
//! - **Payload**: the token is merged into the JSON object body and the query
//!   carries only the caller's parameters.
//!
//! Once built, a [`PreparedRequest`] is immutable; its
//! [`canonical_bytes`](PreparedRequest::canonical_bytes) are exactly what is
//! signed and what goes on the wire.
//!
//! # Examples
//!
//! ```
//! use btcpay_client::request::{ApiRequest, QueryParams, RequestBuilder};
//!
//! # fn example() -> btcpay_client::error::Result<()> {
//! let builder = RequestBuilder::new("https://btcpay.example.com")?;
//! let request = ApiRequest::get("/rates")
//!     .with_params(QueryParams::new().with("q1", "v1").with("q2", "v2"));
//!
//! let prepared = builder.build(&request, Some("123"))?;
//! assert_eq!(prepared.query(), Some("token=123&q1=v1&q2=v2"));
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::error::{ClientError, Result};

/// Name of the query parameter and body field carrying the pairing token.
pub const TOKEN_FIELD: &str = "token";

/// Ordered query parameters.
///
/// Order is significant: the query string is part of the signed bytes, so
/// parameters are emitted exactly in insertion order, never sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Appends a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A JSON object request body.
///
/// Bodies are always JSON objects so that the pairing token can be merged in
/// as a sibling `token` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Serializes `value` into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RequestEncoding`] if serialization fails or the
    /// value is not a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(ClientError::RequestEncoding(format!(
                "payload must serialize to a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ClientError::RequestEncoding(e.to_string())),
        }
    }

    /// Adds the `token` field unless the payload already defines one.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.0.entry(TOKEN_FIELD).or_insert_with(|| Value::String(token.to_owned()));
        self
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serializes the payload to the exact bytes sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RequestEncoding`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(|e| ClientError::RequestEncoding(e.to_string()))
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A request against the BTCPay API, before token state is applied.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path relative to the base URL, starting with `/`.
    pub endpoint: String,
    /// Caller-supplied query parameters, in order.
    pub params: QueryParams,
    /// Optional JSON body.
    pub payload: Option<Payload>,
    /// Whether the request carries `X-Identity` / `X-Signature`.
    pub signed: bool,
}

impl ApiRequest {
    /// Creates an unsigned request with no parameters and no body.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: QueryParams::new(),
            payload: None,
            signed: false,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// Creates a `POST` request with a JSON body.
    #[must_use]
    pub fn post(endpoint: impl Into<String>, payload: Payload) -> Self {
        Self { payload: Some(payload), ..Self::new(Method::POST, endpoint) }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Marks the request as requiring a signature.
    #[must_use]
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

/// A fully resolved request: URL and body bytes are frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Resolved URL including the query string.
    pub url: Url,
    /// Serialized body, if any.
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Returns the query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Returns the bytes covered by the request signature: the URL string
    /// immediately followed by the body (nothing when there is no body).
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let url = self.url.as_str().as_bytes();
        let body = self.body.as_deref().unwrap_or_default();

        let mut canonical = Vec::with_capacity(url.len() + body.len());
        canonical.extend_from_slice(url);
        canonical.extend_from_slice(body);
        canonical
    }
}

/// Resolves [`ApiRequest`]s against a base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
}

impl RequestBuilder {
    /// Creates a builder for the given base URL.
    ///
    /// The base may include a path prefix (`https://host/api`); endpoint paths
    /// are appended to it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL does not parse, is not
    /// `http` or `https`, has no host, or carries a query or fragment.
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("invalid host {base_url:?}: {e}")))?;

        validate_base_url(&url)?;

        Ok(Self { base_url: url })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the query string and body for `request` under the given token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] for an unusable endpoint path and
    /// [`ClientError::RequestEncoding`] if the body cannot be serialized.
    pub fn build(&self, request: &ApiRequest, token: Option<&str>) -> Result<PreparedRequest> {
        let path = sanitize_path(&request.endpoint)?;
        let token = token.filter(|t| !t.is_empty());

        let mut query = form_urlencoded::Serializer::new(String::new());
        let body = match &request.payload {
            Some(payload) => {
                let payload = match token {
                    Some(token) => payload.clone().with_token(token),
                    None => payload.clone(),
                };
                Some(payload.to_bytes()?)
            }
            None => {
                if let Some(token) = token {
                    query.append_pair(TOKEN_FIELD, token);
                }
                None
            }
        };
        for (key, value) in request.params.iter() {
            query.append_pair(key, value);
        }
        let query = query.finish();

        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| ClientError::InvalidUrl(format!("cannot resolve {raw:?}: {e}")))?;
        url.set_query((!query.is_empty()).then_some(query.as_str()));

        debug!(
            method = %request.method,
            path = url.path(),
            has_token = token.is_some(),
            body_len = body.as_ref().map_or(0, Vec::len),
            "request prepared"
        );

        Ok(PreparedRequest { method: request.method.clone(), url, body })
    }
}

fn validate_base_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(format!(
            "unsupported scheme {:?}, expected http or https",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidUrl(format!("URL missing host: {url}")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::InvalidUrl(
            "base URL must not carry a query or fragment".to_owned(),
        ));
    }
    Ok(())
}

/// Rejects endpoint paths that would change the resolved URL in surprising
/// ways. Query parameters belong in [`QueryParams`], not in the path.
fn sanitize_path(path: &str) -> Result<&str> {
    if !path.starts_with('/') {
        return Err(ClientError::InvalidInput(format!("endpoint must start with '/': {path:?}")));
    }
    if path.contains("..") || path.contains("//") {
        return Err(ClientError::InvalidInput(
            "invalid endpoint: traversal sequences not allowed".to_owned(),
        ));
    }
    if path.contains(['?', '#']) || path.chars().any(char::is_control) {
        return Err(ClientError::InvalidInput(format!(
            "invalid endpoint {path:?}: query, fragment and control characters not allowed"
        )));
    }
    Ok(path)
}
