//! Typed wrappers over the rates and invoice endpoints.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::Client;
use crate::{
    error::{ClientError, Result},
    models::{CreateInvoiceParams, DataEnvelope, Invoice, Rate},
    request::{ApiRequest, Payload, QueryParams},
};

/// Longest accepted invoice identifier.
pub const MAX_INVOICE_ID_LEN: usize = 128;

impl Client {
    /// Fetches exchange rates for `crypto_code` against every fiat currency
    /// the server knows.
    ///
    /// Sends a signed `GET /rates?cryptoCode=<c>[&storeID=<s>]` and returns a
    /// map of currency code to rate.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] if `crypto_code` is empty, and
    /// the errors of [`Client::send`] otherwise.
    #[instrument(skip(self))]
    pub async fn rates(
        &self,
        crypto_code: &str,
        store_id: Option<&str>,
    ) -> Result<BTreeMap<String, Decimal>> {
        if crypto_code.is_empty() {
            return Err(ClientError::InvalidInput("crypto code must not be empty".to_owned()));
        }

        let mut params = QueryParams::new().with("cryptoCode", crypto_code);
        if let Some(store_id) = store_id.filter(|s| !s.is_empty()) {
            params.push("storeID", store_id);
        }

        let request = ApiRequest::get("/rates").with_params(params).signed();
        let envelope: DataEnvelope<Vec<Rate>> = self.send(&request).await?.json()?;

        debug!(count = envelope.data.len(), "rates received");
        Ok(envelope.data.into_iter().map(|rate| (rate.code, rate.rate)).collect())
    }

    /// Creates an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] if the currency is empty, and the
    /// errors of [`Client::send`] otherwise.
    #[instrument(skip(self, params), fields(currency = %params.currency, price = %params.price))]
    pub async fn create_invoice(&self, params: &CreateInvoiceParams) -> Result<Invoice> {
        if params.currency.is_empty() {
            return Err(ClientError::InvalidInput("invoice currency must not be empty".to_owned()));
        }

        let request = ApiRequest::post("/invoices", Payload::from_serializable(params)?).signed();
        let envelope: DataEnvelope<Invoice> = self.send(&request).await?.json()?;

        debug!(invoice_id = %envelope.data.id, status = %envelope.data.status, "invoice created");
        Ok(envelope.data)
    }

    /// Fetches an invoice by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] if `id` is not 1-128 characters
    /// of `[A-Za-z0-9_-]`, and the errors of [`Client::send`] otherwise.
    #[instrument(skip(self))]
    pub async fn invoice(&self, id: &str) -> Result<Invoice> {
        validate_invoice_id(id)?;

        let request = ApiRequest::get(format!("/invoices/{id}")).signed();
        let envelope: DataEnvelope<Invoice> = self.send(&request).await?.json()?;
        Ok(envelope.data)
    }
}

/// Validates an invoice identifier before it becomes a path segment.
fn validate_invoice_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_INVOICE_ID_LEN {
        return Err(ClientError::InvalidInput(format!(
            "invoice id must be 1-{MAX_INVOICE_ID_LEN} characters, got {}",
            id.len()
        )));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ClientError::InvalidInput(
            "invoice id must contain only alphanumeric characters, hyphens, and underscores"
                .to_owned(),
        ));
    }

    Ok(())
}
