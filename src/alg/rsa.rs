//! RSA-based algorithms: `RS*` (PKCS#1 v1.5 padding) and `PS*` (PSS
//! padding with digest-length salt).

use rand_core::OsRng;
use rsa::{Pkcs1v15Sign, Pss};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::algorithm::DigestSize;
use crate::error::SjwtError;
use crate::key::{PrivateKey, PublicKey};

pub(crate) const RSA_PRIVATE_KEY_INVALID: &str =
    "Invalid RSA private key: The provided private key is not supported.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Padding {
    Pkcs1v15,
    Pss,
}

fn digest(digest_size: DigestSize, message: &[u8]) -> Vec<u8> {
    match digest_size {
        DigestSize::Bits256 => Sha256::digest(message).to_vec(),
        DigestSize::Bits384 => Sha384::digest(message).to_vec(),
        DigestSize::Bits512 => Sha512::digest(message).to_vec(),
    }
}

fn pkcs1v15_scheme(digest_size: DigestSize) -> Pkcs1v15Sign {
    match digest_size {
        DigestSize::Bits256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestSize::Bits384 => Pkcs1v15Sign::new::<Sha384>(),
        DigestSize::Bits512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

// The salt length equals the digest output size, as required for the PS*
// token algorithms.
fn pss_scheme(digest_size: DigestSize) -> Pss {
    match digest_size {
        DigestSize::Bits256 => Pss::new_with_salt::<Sha256>(Sha256::output_size()),
        DigestSize::Bits384 => Pss::new_with_salt::<Sha384>(Sha384::output_size()),
        DigestSize::Bits512 => Pss::new_with_salt::<Sha512>(Sha512::output_size()),
    }
}

/// Signs the digest of `message` with the given padding. Any failure of the
/// underlying primitive, including a key of the wrong family, is reported
/// with a fixed invalid-key error.
pub(crate) fn sign(
    digest_size: DigestSize,
    padding: Padding,
    key: &PrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, SjwtError> {
    let rsa_key = match key {
        PrivateKey::Rsa(key) | PrivateKey::RsaPss(key) => key,
        _ => return Err(SjwtError::validation(RSA_PRIVATE_KEY_INVALID)),
    };
    let hashed = digest(digest_size, message);
    let signature = match padding {
        Padding::Pkcs1v15 => rsa_key.sign_with_rng(&mut OsRng, pkcs1v15_scheme(digest_size), &hashed),
        Padding::Pss => rsa_key.sign_with_rng(&mut OsRng, pss_scheme(digest_size), &hashed),
    };
    signature.map_err(|_| SjwtError::validation(RSA_PRIVATE_KEY_INVALID))
}

pub(crate) fn verify(
    digest_size: DigestSize,
    padding: Padding,
    key: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let rsa_key = match key {
        PublicKey::Rsa(key) | PublicKey::RsaPss(key) => key,
        _ => return false,
    };
    let hashed = digest(digest_size, message);
    match padding {
        Padding::Pkcs1v15 => rsa_key
            .verify(pkcs1v15_scheme(digest_size), &hashed, signature)
            .is_ok(),
        Padding::Pss => rsa_key
            .verify(pss_scheme(digest_size), &hashed, signature)
            .is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> rsa::RsaPrivateKey {
        rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
    }

    #[test]
    fn sign_verify_round_trip() {
        let private = test_key();
        let public = private.to_public_key();
        let private = PrivateKey::Rsa(private);
        let public = PublicKey::Rsa(public);

        for padding in [Padding::Pkcs1v15, Padding::Pss] {
            let signature = sign(DigestSize::Bits256, padding, &private, b"message").unwrap();
            assert!(verify(
                DigestSize::Bits256,
                padding,
                &public,
                b"message",
                &signature,
            ));
            assert!(!verify(
                DigestSize::Bits256,
                padding,
                &public,
                b"other",
                &signature,
            ));
        }
    }

    #[test]
    fn padding_schemes_are_not_interchangeable() {
        let private = test_key();
        let public = PublicKey::Rsa(private.to_public_key());
        let private = PrivateKey::Rsa(private);

        let signature = sign(DigestSize::Bits256, Padding::Pkcs1v15, &private, b"m").unwrap();
        assert!(!verify(
            DigestSize::Bits256,
            Padding::Pss,
            &public,
            b"m",
            &signature,
        ));
    }

    #[test]
    fn ec_key_is_rejected_without_signing() {
        let key = PrivateKey::P256(p256::ecdsa::SigningKey::random(&mut rand_core::OsRng));
        let err = sign(DigestSize::Bits256, Padding::Pkcs1v15, &key, b"m").unwrap_err();
        assert_eq!(err.to_string(), RSA_PRIVATE_KEY_INVALID);
    }
}
