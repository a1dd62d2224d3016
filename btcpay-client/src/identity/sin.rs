//! SIN (Service Identification Number) derivation.

use std::fmt;

use ripemd::Ripemd160;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
    error::{ClientError, Result},
    identity::key::COMPRESSED_PUBLIC_KEY_LEN,
};

/// Version prefix marking a SIN of the "identity" type.
pub const SIN_VERSION_PREFIX: [u8; 2] = [0x0F, 0x02];

const CHECKSUM_LEN: usize = 4;

/// Base58-encoded, checksummed identifier derived from a compressed public key.
///
/// The derivation is byte-exact:
///
/// ```text
/// h1     = SHA256(compressed public key)
/// h2     = RIPEMD160(h1)
/// header = 0x0F 0x02 || h2
/// check  = SHA256(SHA256(header))[..4]
/// SIN    = Base58(header || check)
/// ```
///
/// It is a pure function of the public key and is the identity the client
/// asserts when pairing.
///
/// # Examples
///
/// ```
/// use btcpay_client::identity::Sin;
///
/// let pubkey =
///     hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
///         .unwrap();
/// let sin = Sin::derive(&pubkey);
/// assert_eq!(sin.as_str(), "Tf8DhWM5WDBB1CarpFdonta9YEBJgW1GYAt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sin(String);

impl Sin {
    /// Derives the SIN from raw compressed public key bytes.
    #[must_use]
    pub fn derive(compressed_public_key: &[u8]) -> Self {
        let digest = Ripemd160::digest(Sha256::digest(compressed_public_key));

        let mut payload =
            Vec::with_capacity(SIN_VERSION_PREFIX.len() + digest.len() + CHECKSUM_LEN);
        payload.extend_from_slice(&SIN_VERSION_PREFIX);
        payload.extend_from_slice(&digest);

        let checksum = Sha256::digest(Sha256::digest(&payload));
        payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);

        Self(bs58::encode(payload).into_string())
    }

    /// Derives the SIN from a hex-encoded compressed public key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::KeyFormat`] if the input is not hex or is not
    /// 33 bytes long.
    pub fn from_public_key_hex(compressed_public_key: &str) -> Result<Self> {
        let bytes = hex::decode(compressed_public_key)
            .map_err(|e| ClientError::KeyFormat(format!("public key is not hex: {e}")))?;
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LEN {
            return Err(ClientError::KeyFormat(format!(
                "compressed public key must be {COMPRESSED_PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self::derive(&bytes))
    }

    /// Returns the SIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
