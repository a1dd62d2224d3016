//! Pairing: exchanging a one-time code for an API token.

use serde::Serialize;
use tracing::{info, instrument};

use super::Client;
use crate::{
    error::{ClientError, Result},
    identity::Sin,
    models::TokenRecord,
    request::{ApiRequest, Payload},
    transport::ApiResponse,
};

/// Endpoint that issues pairing tokens.
pub const TOKENS_ENDPOINT: &str = "/tokens";

/// Error message for a pairing response with an empty token list.
pub const NO_TOKEN_MESSAGE: &str = "token data not returned";

/// Body of `POST /tokens`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PairingRequest<'a> {
    id: &'a Sin,
    pairing_code: &'a str,
}

/// Extracts the token from a pairing response.
///
/// The body is a JSON array of `{"token": ...}` records; the first one wins.
///
/// # Errors
///
/// Returns [`ClientError::ResponseFormat`] if the body is not such an array
/// and [`ClientError::Pairing`] if the array is empty.
pub fn token_from_response(response: &ApiResponse) -> Result<String> {
    let records: Vec<TokenRecord> = response.json()?;
    records
        .into_iter()
        .next()
        .map(|record| record.token)
        .ok_or_else(|| ClientError::Pairing(NO_TOKEN_MESSAGE.to_owned()))
}

impl Client {
    /// Pairs the client with the server using a one-time pairing code.
    ///
    /// Sends `{"id": <SIN>, "pairingCode": <code>}` to `POST /tokens` and
    /// installs the first returned token. The call goes through the same path
    /// as any other request, so a client that already holds a token carries
    /// it in the body. On any failure the current token is left untouched.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidInput`] if `code` is blank
    /// - [`ClientError::ServerRejected`] if the server refuses the code
    /// - [`ClientError::ResponseFormat`] if the response is not a token list
    /// - [`ClientError::Pairing`] if the token list is empty
    /// - transport errors as for [`Client::send`]
    #[instrument(skip(self, code), fields(sin = %self.sin()))]
    pub async fn pair(&self, code: &str) -> Result<()> {
        if code.trim().is_empty() {
            return Err(ClientError::InvalidInput("pairing code must not be empty".to_owned()));
        }

        let body = PairingRequest { id: self.sin(), pairing_code: code };
        let request = ApiRequest::post(TOKENS_ENDPOINT, Payload::from_serializable(&body)?);

        let response = self.send(&request).await?;
        let token = token_from_response(&response)?;

        self.token.install(token).await;
        info!("client paired");
        Ok(())
    }
}
