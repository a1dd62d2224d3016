//! Pairs a client with a BTCPay server and creates an invoice.
//!
//! The key is kept in a PEM file so that the pairing survives restarts. On
//! the first run, pass the pairing code from the server's "Access Tokens"
//! page; later runs reuse the saved key and token.
//!
//! # Running this example
//!
//! ```bash
//! export BTCPAY_HOST=https://btcpay.example.com
//! export BTCPAY_PAIRING_CODE=abc1234   # first run only
//! cargo run --example pair_and_invoice
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::{env, fs, path::Path};

use btcpay_client::{
    client::{Client, ClientConfig},
    error::ClientError,
    models::CreateInvoiceParams,
};
use rust_decimal::Decimal;

const KEY_FILE: &str = "btcpay.pem";
const TOKEN_FILE: &str = "btcpay.token";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = env::var("BTCPAY_HOST").map_err(|_| "BTCPAY_HOST environment variable not set")?;

    let mut config = ClientConfig::new(host);
    if Path::new(KEY_FILE).exists() {
        config = config.with_pem(fs::read_to_string(KEY_FILE)?);
    }
    if let Ok(token) = fs::read_to_string(TOKEN_FILE) {
        config = config.with_token(token.trim());
    }

    let client = Client::new(config)?;
    fs::write(KEY_FILE, client.pem()?)?;
    println!("Client SIN: {}", client.sin());

    if client.token().await.is_none() {
        let code = env::var("BTCPAY_PAIRING_CODE")
            .map_err(|_| "not paired yet: set BTCPAY_PAIRING_CODE")?;
        client.pair(&code).await?;
        if let Some(token) = client.token().await {
            fs::write(TOKEN_FILE, token)?;
        }
        println!("Paired");
    }

    match client.rates("BTC", None).await {
        Ok(rates) => println!("BTC/USD: {}", rates.get("USD").map_or("n/a".to_owned(), ToString::to_string)),
        Err(e) => eprintln!("Could not fetch rates: {e}"),
    }

    let params = CreateInvoiceParams::new("USD", Decimal::new(1000, 2)).with_item_desc("Example item");
    match client.create_invoice(&params).await {
        Ok(invoice) => {
            println!("Invoice {} ({})", invoice.id, invoice.status);
            println!("Pay at {}", invoice.url);
        }
        Err(ClientError::ServerRejected { status: 401 | 403, message }) => {
            eprintln!("Token rejected ({message}); delete {TOKEN_FILE} and pair again");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
