//! Client identity: key material, SIN derivation and request signing.
//!
//! A BTCPay client does not authenticate with a shared secret. It generates its
//! own secp256k1 key pair, derives a public identifier (the SIN) from it, and
//! signs every privileged request with the private key.
//!
//! # Key Components
//!
//! - [`KeyPair`]: secp256k1 key pair with SEC1 PEM (`EC PRIVATE KEY`) encoding
//! - [`Sin`]: Base58Check-style identifier derived from the compressed public key
//! - [`RequestSigner`]: signs canonical request bytes, producing the
//!   `X-Identity` / `X-Signature` header values
//! - [`verify_signature`]: the check a server performs on a signed request
//!
//! # Data Flow
//!
//! ```text
//! KeyPair ──compressed public key──▶ Sin ──▶ pairing (POST /tokens)
//!    │
//!    └──private scalar──▶ RequestSigner ──▶ X-Identity, X-Signature
//! ```
//!
//! # Examples
//!
//! ```rust
//! use btcpay_client::identity::{KeyPair, RequestSigner, verify_signature};
//!
//! # fn example() -> btcpay_client::error::Result<()> {
//! let key = KeyPair::generate()?;
//! let sin = key.sin();
//! assert!(sin.as_str().starts_with('T'));
//!
//! let signer = RequestSigner::new(key);
//! let canonical = b"https://btcpay.example.com/invoices?token=abc";
//! let signature = signer.sign(canonical)?;
//!
//! verify_signature(signer.identity(), canonical, &signature)?;
//! # Ok(())
//! # }
//! ```

mod key;
mod signer;
mod sin;
mod verifier;

#[cfg(test)]
mod tests;

pub use key::{COMPRESSED_PUBLIC_KEY_LEN, KeyPair, PEM_LABEL};
pub use signer::{RequestSignature, RequestSigner};
pub use sin::{SIN_VERSION_PREFIX, Sin};
pub use verifier::verify_signature;

/// Header carrying the hex-encoded compressed public key on signed requests.
pub const IDENTITY_HEADER: &str = "X-Identity";

/// Header carrying the hex-encoded DER signature on signed requests.
pub const SIGNATURE_HEADER: &str = "X-Signature";
