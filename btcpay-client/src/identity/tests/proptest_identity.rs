use proptest::prelude::*;

use crate::identity::{KeyPair, RequestSigner, Sin, verify_signature};

fn key_from_seed(seed: [u8; 32]) -> Option<KeyPair> {
    KeyPair::from_scalar_bytes(&seed).ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_pem_round_trip_preserves_public_key(seed in any::<[u8; 32]>()) {
        let Some(key) = key_from_seed(seed) else { return Ok(()) };

        let pem = key.to_pem().expect("PEM encoding failed");
        let decoded = KeyPair::from_pem(&pem).expect("PEM decoding failed");

        prop_assert_eq!(decoded.compressed_public_key(), key.compressed_public_key());
        prop_assert_eq!(decoded.sin(), key.sin());
    }

    #[test]
    fn test_sin_is_pure_and_byte_sensitive(
        seed in any::<[u8; 32]>(),
        index in 1usize..33,
        flip in 1u8..=255,
    ) {
        let Some(key) = key_from_seed(seed) else { return Ok(()) };
        let mut bytes = key.compressed_public_key_bytes();

        let sin = Sin::derive(&bytes);
        prop_assert_eq!(&sin, &Sin::derive(&bytes));
        prop_assert_eq!(&sin, &key.sin());

        bytes[index] ^= flip;
        prop_assert_ne!(sin, Sin::derive(&bytes));
    }

    #[test]
    fn test_signature_verification_roundtrip(
        seed in any::<[u8; 32]>(),
        path in "/[a-z0-9/]{0,32}",
        query in "[a-zA-Z0-9=&]{0,48}",
        body in any::<Vec<u8>>(),
    ) {
        let Some(key) = key_from_seed(seed) else { return Ok(()) };
        let signer = RequestSigner::new(key);

        let mut canonical = format!("https://btcpay.example.com{path}?{query}").into_bytes();
        canonical.extend_from_slice(&body);

        let signature = signer.sign(&canonical).expect("signing failed");
        let result = verify_signature(signer.identity(), &canonical, &signature);
        prop_assert!(result.is_ok(), "Verification failed: {:?}", result.err());
    }

    #[test]
    fn test_tampered_canonical_string_fails(
        seed in any::<[u8; 32]>(),
        body in proptest::collection::vec(any::<u8>(), 1..128),
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let Some(key) = key_from_seed(seed) else { return Ok(()) };
        let signer = RequestSigner::new(key);

        let mut canonical = b"https://btcpay.example.com/invoices".to_vec();
        canonical.extend_from_slice(&body);
        let signature = signer.sign(&canonical).expect("signing failed");

        let i = position.index(canonical.len());
        canonical[i] ^= flip;

        prop_assert!(verify_signature(signer.identity(), &canonical, &signature).is_err());
    }
}
