//! ECDSA request signing over the canonical request bytes.

use std::sync::Arc;

use k256::ecdsa::Signature;
use sha2::{Digest, Sha256};
use signature::hazmat::PrehashSigner;
use tracing::instrument;

use crate::{
    error::{ClientError, Result},
    identity::{IDENTITY_HEADER, SIGNATURE_HEADER, key::KeyPair},
};

/// Header values for a signed request.
#[derive(Debug, Clone)]
pub struct RequestSignature {
    /// `X-Identity` header value: compressed public key, hex.
    pub identity: Arc<str>,
    /// `X-Signature` header value: DER signature, hex.
    pub signature: String,
}

impl RequestSignature {
    /// Returns the `(name, value)` header pairs to attach to the request.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [(IDENTITY_HEADER, self.identity.as_ref()), (SIGNATURE_HEADER, self.signature.as_str())]
    }
}

/// Signs canonical request strings with the client's private key.
///
/// The canonical string is the fully resolved request URL, query string
/// included, immediately followed by the exact body bytes (nothing when there
/// is no body). The signer sees only frozen bytes; anything re-encoded after
/// signing invalidates the signature.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    key: Arc<KeyPair>,
    identity: Arc<str>,
}

impl RequestSigner {
    /// Creates a signer for the given key pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use btcpay_client::identity::{KeyPair, RequestSigner};
    ///
    /// let key = KeyPair::generate().unwrap();
    /// let public_key = key.compressed_public_key();
    /// let signer = RequestSigner::new(key);
    /// assert_eq!(signer.identity(), public_key);
    /// ```
    #[must_use]
    pub fn new(key: impl Into<Arc<KeyPair>>) -> Self {
        let key = key.into();
        let identity = Arc::from(key.compressed_public_key());
        Self { key, identity }
    }

    /// Returns the compressed public key (hex) sent as `X-Identity`.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the key pair backing this signer.
    #[must_use]
    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// Signs `SHA256(canonical)` and returns the DER signature as hex.
    ///
    /// Signatures are low-S normalized.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Signing`] if the underlying ECDSA operation fails.
    #[instrument(skip(self, canonical), fields(canonical_len = canonical.len()))]
    pub fn sign(&self, canonical: &[u8]) -> Result<String> {
        let digest = Sha256::digest(canonical);

        let signature: Signature = self
            .key
            .signing_key()
            .sign_prehash(&digest)
            .map_err(|e| ClientError::Signing(e.to_string()))?;

        Ok(hex::encode(signature.to_der().as_bytes()))
    }

    /// Signs the canonical bytes and packages the header values.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Signing`] if signing fails.
    pub fn sign_request(&self, canonical: &[u8]) -> Result<RequestSignature> {
        let signature = self.sign(canonical)?;
        Ok(RequestSignature { identity: Arc::clone(&self.identity), signature })
    }
}

#[cfg(test)]
mod tests {
    use k256::ecdsa::VerifyingKey;
    use signature::hazmat::PrehashVerifier;

    use super::*;

    fn scalar_key(last: u8) -> KeyPair {
        let mut scalar = [0u8; 32];
        scalar[31] = last;
        KeyPair::from_scalar_bytes(&scalar).unwrap()
    }

    #[test]
    fn test_sign_produces_der_hex() {
        let signer = RequestSigner::new(scalar_key(1));
        let signature = signer.sign(b"https://btcpay.example.com/rates").unwrap();

        let bytes = hex::decode(&signature).unwrap();
        // DER SEQUENCE tag
        assert_eq!(bytes[0], 0x30);
        assert!(Signature::from_der(&bytes).is_ok());
    }

    #[test]
    fn test_signature_verifies_against_digest() {
        let key = scalar_key(7);
        let verifying_key: VerifyingKey = *key.signing_key().verifying_key();
        let signer = RequestSigner::new(key);

        let message = b"https://btcpay.example.com/invoices{\"price\":\"1\"}";
        let signature = signer.sign(message).unwrap();
        let signature = Signature::from_der(&hex::decode(signature).unwrap()).unwrap();

        let digest = Sha256::digest(message);
        assert!(verifying_key.verify_prehash(&digest, &signature).is_ok());
    }

    #[test]
    fn test_signature_is_low_s() {
        let signer = RequestSigner::new(scalar_key(3));
        for i in 0..16u8 {
            let signature = signer.sign(&[i; 40]).unwrap();
            let signature = Signature::from_der(&hex::decode(signature).unwrap()).unwrap();
            assert!(signature.normalize_s().is_none(), "signature must already be low-S");
        }
    }

    #[test]
    fn test_sign_request_headers() {
        let key = scalar_key(1);
        let signer = RequestSigner::new(key);
        let signed = signer.sign_request(b"https://example.com/rates").unwrap();

        let headers = signed.headers();
        assert_eq!(headers[0].0, "X-Identity");
        assert_eq!(
            headers[0].1,
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(headers[1].0, "X-Signature");
        assert_eq!(headers[1].1, signed.signature);
    }

    #[test]
    fn test_signer_shares_key() {
        let key = Arc::new(scalar_key(2));
        let signer = RequestSigner::new(Arc::clone(&key));
        assert_eq!(signer.key().compressed_public_key(), key.compressed_public_key());
    }
}
