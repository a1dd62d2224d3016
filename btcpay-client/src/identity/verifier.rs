//! Verification of signed requests, as performed by the server.

use k256::ecdsa::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use signature::hazmat::PrehashVerifier;
use tracing::{debug, instrument};

use crate::error::{ClientError, Result};

/// Verifies an `X-Signature` value against an `X-Identity` value.
///
/// Reconstructs `SHA256(canonical)` and checks the DER signature with the
/// compressed public key. Any change to a single byte of `canonical` makes
/// verification fail.
///
/// # Arguments
///
/// * `identity` - compressed public key, hex (`X-Identity`)
/// * `canonical` - resolved URL followed by the body bytes
/// * `signature` - DER signature, hex (`X-Signature`)
///
/// # Errors
///
/// Returns [`ClientError::KeyFormat`] if the identity is not a valid
/// secp256k1 point, and [`ClientError::Signing`] if the signature is
/// malformed or does not verify.
#[instrument(skip(identity, canonical, signature), fields(canonical_len = canonical.len()))]
pub fn verify_signature(identity: &str, canonical: &[u8], signature: &str) -> Result<()> {
    let key_bytes = hex::decode(identity)
        .map_err(|e| ClientError::KeyFormat(format!("identity is not hex: {e}")))?;
    let verifying_key = VerifyingKey::from_sec1_bytes(&key_bytes)
        .map_err(|_| ClientError::KeyFormat("identity is not a secp256k1 point".to_owned()))?;

    let signature_bytes = hex::decode(signature)
        .map_err(|e| ClientError::Signing(format!("signature is not hex: {e}")))?;
    let signature = Signature::from_der(&signature_bytes)
        .map_err(|e| ClientError::Signing(format!("signature is not DER: {e}")))?;

    let digest = Sha256::digest(canonical);
    verifying_key.verify_prehash(&digest, &signature).map_err(|_| {
        debug!("signature rejected");
        ClientError::Signing("signature verification failed".to_owned())
    })
}
