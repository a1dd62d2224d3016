//! Request and response shapes for the wrapped endpoints.
//!
//! Amounts are [`Decimal`]s. They serialize as JSON strings and deserialize
//! from either strings or numbers, so no precision is lost to floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Parameters for `POST /invoices`.
///
/// Only `currency` and `price` are required; every empty field is omitted
/// from the request body.
///
/// # Examples
///
/// ```
/// use btcpay_client::models::CreateInvoiceParams;
/// use rust_decimal::Decimal;
///
/// let params = CreateInvoiceParams::new("USD", Decimal::new(1050, 2)).with_order_id("order-42");
/// let json = serde_json::to_value(&params).unwrap();
/// assert_eq!(json["price"], "10.50");
/// assert_eq!(json["orderId"], "order-42");
/// assert!(json.get("itemDesc").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceParams {
    /// ISO 4217 currency code the price is denominated in.
    pub currency: String,
    /// Invoice price.
    pub price: Decimal,
    /// Merchant order identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_id: String,
    /// Item description shown to the buyer.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_desc: String,
    /// Merchant item code.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_code: String,
    /// Address notified about invoice status changes.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notification_email: String,
    /// Webhook URL for invoice status changes.
    #[serde(rename = "notificationURL", skip_serializing_if = "String::is_empty")]
    pub notification_url: String,
    /// Where the buyer is sent after payment.
    #[serde(rename = "redirectURL", skip_serializing_if = "String::is_empty")]
    pub redirect_url: String,
    /// Opaque merchant data echoed back in notifications.
    #[serde(rename = "posData", skip_serializing_if = "String::is_empty")]
    pub pos_data: String,
    /// `high`, `medium` or `low`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction_speed: String,
    /// Notify on every status change, not only on confirmation.
    #[serde(skip_serializing_if = "is_false")]
    pub full_notifications: bool,
    /// Send extended notification payloads.
    #[serde(skip_serializing_if = "is_false")]
    pub extended_notifications: bool,
    /// Whether the invoice is for physical goods.
    #[serde(skip_serializing_if = "is_false")]
    pub physical: bool,
    /// Buyer details. Always present, possibly as an empty object.
    pub buyer: InvoiceBuyer,
    /// Restricts the cryptocurrencies the buyer may pay with.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payment_currencies: Vec<String>,
}

impl CreateInvoiceParams {
    /// Creates parameters for an invoice of `price` in `currency`.
    #[must_use]
    pub fn new(currency: impl Into<String>, price: Decimal) -> Self {
        Self { currency: currency.into(), price, ..Self::default() }
    }

    /// Sets the merchant order identifier.
    #[must_use]
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = order_id.into();
        self
    }

    /// Sets the item description.
    #[must_use]
    pub fn with_item_desc(mut self, item_desc: impl Into<String>) -> Self {
        self.item_desc = item_desc.into();
        self
    }

    /// Sets the notification webhook URL.
    #[must_use]
    pub fn with_notification_url(mut self, url: impl Into<String>) -> Self {
        self.notification_url = url.into();
        self
    }

    /// Sets the post-payment redirect URL.
    #[must_use]
    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = url.into();
        self
    }

    /// Sets the buyer details.
    #[must_use]
    pub fn with_buyer(mut self, buyer: InvoiceBuyer) -> Self {
        self.buyer = buyer;
        self
    }
}

/// Buyer details attached to an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceBuyer {
    /// Full name.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    /// First address line.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub address1: String,
    /// Second address line.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub address2: String,
    /// City or locality.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub locality: String,
    /// State or region.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub region: String,
    /// Postal code.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub postal_code: String,
    /// Country code.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub country: String,
    /// Contact email.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub email: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub phone: String,
    /// Whether the buyer asked to be notified; free-form on the wire.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub notify: String,
}

/// An invoice as returned by the server.
///
/// Missing or `null` fields decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    /// Invoice identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Checkout page for the buyer.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// `new`, `paid`, `confirmed`, `complete`, `expired` or `invalid`.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Invoice price in `currency`.
    #[serde(deserialize_with = "null_as_default")]
    pub price: Decimal,
    /// Currency the price is denominated in.
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// Item description.
    #[serde(deserialize_with = "null_as_default")]
    pub item_desc: String,
    /// Merchant order identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub order_id: String,
    /// Opaque merchant data.
    #[serde(deserialize_with = "null_as_default")]
    pub pos_data: String,
    /// Milliseconds since the Unix epoch.
    pub invoice_time: i64,
    /// Milliseconds since the Unix epoch.
    pub expiration_time: i64,
    /// Server clock at response time, milliseconds since the Unix epoch.
    pub current_time: i64,
    /// Set when the payment transaction pays a low fee.
    pub low_fee_detected: bool,
    /// Amount paid so far, in the payment cryptocurrency.
    #[serde(deserialize_with = "null_as_default")]
    pub amount_paid: Decimal,
    /// Amount paid, rounded for display.
    #[serde(deserialize_with = "null_as_default")]
    pub display_amount_paid: Decimal,
    /// `false` or a string such as `paidPartial` / `paidOver`.
    pub exception_status: Value,
    /// Confirmations required before the invoice is confirmed.
    pub target_confirmations: i64,
    /// Buyer details.
    #[serde(deserialize_with = "null_as_default")]
    pub buyer: InvoiceBuyer,
    /// Post-payment redirect URL.
    #[serde(rename = "redirectURL", deserialize_with = "null_as_default")]
    pub redirect_url: String,
    /// Cryptocurrency the invoice was paid in.
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_currency: String,
    /// Shortfall for underpaid invoices.
    #[serde(deserialize_with = "null_as_default")]
    pub underpaid_amount: Decimal,
    /// Excess for overpaid invoices.
    #[serde(deserialize_with = "null_as_default")]
    pub overpaid_amount: Decimal,
}

/// One entry of the `GET /rates` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rate {
    /// Currency code, e.g. `USD`.
    pub code: String,
    /// Units of `code` per one unit of the requested cryptocurrency.
    pub rate: Decimal,
}

/// One entry of the `POST /tokens` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRecord {
    /// Opaque pairing token.
    pub token: String,
}

/// The `{"data": ...}` wrapper around invoice and rate responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    /// Wrapped payload.
    pub data: T,
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by skip_serializing_if")]
const fn is_false(value: &bool) -> bool {
    !*value
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
