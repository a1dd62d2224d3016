//! BTCPay Client: signed access to a BTCPay Server merchant API
//!
//! A Rust client for the BitPay-compatible API exposed by BTCPay Server. The
//! client authenticates with its own secp256k1 key instead of a shared secret:
//! it pairs once with a one-time code and then signs every privileged request.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 Client (this crate)              │
//! │  ┌──────────┐   ┌────────────────┐   ┌────────┐  │
//! │  │ KeyPair  │──▶│ RequestSigner  │   │ Token  │  │
//! │  │  + SIN   │   │ (ECDSA/SHA256) │   │  Cell  │  │
//! │  └──────────┘   └───────┬────────┘   └───┬────┘  │
//! │                         │                │       │
//! │                 ┌───────▼────────────────▼────┐  │
//! │                 │  RequestBuilder (ordered    │  │
//! │                 │  query, token-merged body)  │  │
//! │                 └──────────────┬──────────────┘  │
//! └────────────────────────────────┼─────────────────┘
//!                                  │ HTTP + X-Identity / X-Signature
//!                          ┌───────▼────────┐
//!                          │ BTCPay Server  │
//!                          └────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Create a client and pair it
//!
//! ```rust,no_run
//! use btcpay_client::client::{Client, ClientConfig};
//!
//! # async fn example() -> btcpay_client::error::Result<()> {
//! let client = Client::new(ClientConfig::new("https://btcpay.example.com"))?;
//!
//! // Store the key; the token is bound to it.
//! std::fs::write("btcpay.pem", client.pem()?).ok();
//!
//! // Code from the server's "Access Tokens" page.
//! client.pair("abc1234").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Fetch rates and create an invoice
//!
//! ```rust,no_run
//! use btcpay_client::{
//!     client::{Client, ClientConfig},
//!     models::CreateInvoiceParams,
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example(pem: String, token: String) -> btcpay_client::error::Result<()> {
//! let config = ClientConfig::new("https://btcpay.example.com").with_pem(pem).with_token(token);
//! let client = Client::new(config)?;
//!
//! let rates = client.rates("BTC", None).await?;
//! println!("BTC/USD: {:?}", rates.get("USD"));
//!
//! let params = CreateInvoiceParams::new("USD", Decimal::new(1999, 2)).with_order_id("order-42");
//! let invoice = client.create_invoice(&params).await?;
//! println!("invoice {} at {}", invoice.id, invoice.url);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`identity`]: key pairs, SIN derivation, signing and verification
//! - [`request`]: ordered query strings, payloads, canonical bytes
//! - [`transport`]: HTTP configuration, dispatch, response classification
//! - [`client`]: the client, its configuration, pairing and typed endpoints
//! - [`models`]: invoice and rate shapes
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! Every operation returns [`Result<T>`](error::Result). Nothing is retried:
//!
//! ```rust,no_run
//! use btcpay_client::{client::Client, error::ClientError};
//!
//! # async fn example(client: &Client) {
//! match client.invoice("Hq2sWYxPPXDDYfT6RsNXtk").await {
//!     Ok(invoice) => println!("status: {}", invoice.status),
//!     Err(ClientError::ServerRejected { status: 401, .. }) => println!("token revoked, re-pair"),
//!     Err(e) if e.is_transport_error() => println!("network problem, retry later: {e}"),
//!     Err(e) => println!("failed: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions, reason = "transitive dependencies from reqwest and k256")]

pub mod client;
pub mod error;
pub mod identity;
pub mod models;
pub mod request;
pub mod transport;

pub use client::{Client, ClientConfig};
pub use error::{ClientError, Result};
