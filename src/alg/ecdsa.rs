//! ECDSA-based algorithms: `ES256` (P-256), `ES384` (P-384) and `ES512`
//! (P-521).
//!
//! Signatures use the fixed-size concatenated `R ‖ S` encoding required by
//! the token wire format; the ASN.1/DER form never appears on the wire.

use p256::ecdsa::signature::{DigestSigner, DigestVerifier};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::algorithm::DigestSize;
use crate::error::SjwtError;
use crate::key::{PrivateKey, PublicKey};

pub(crate) const ECDSA_PRIVATE_KEY_INVALID: &str =
    "Invalid ECDSA private key: The provided private key is not supported.";

/// Signs `message` with the curve matching the digest size. A key on the
/// wrong curve (or of a non-EC family) is reported with a fixed invalid-key
/// error.
pub(crate) fn sign(
    digest_size: DigestSize,
    key: &PrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, SjwtError> {
    match (digest_size, key) {
        (DigestSize::Bits256, PrivateKey::P256(key)) => {
            let mut digest = Sha256::default();
            digest.update(message);
            let signature: p256::ecdsa::Signature = key
                .try_sign_digest(digest)
                .map_err(|_| SjwtError::validation(ECDSA_PRIVATE_KEY_INVALID))?;
            Ok(signature.to_bytes().to_vec())
        }
        (DigestSize::Bits384, PrivateKey::P384(key)) => {
            let mut digest = Sha384::default();
            digest.update(message);
            let signature: p384::ecdsa::Signature = key
                .try_sign_digest(digest)
                .map_err(|_| SjwtError::validation(ECDSA_PRIVATE_KEY_INVALID))?;
            Ok(signature.to_bytes().to_vec())
        }
        (DigestSize::Bits512, PrivateKey::P521(key)) => {
            let mut digest = Sha512::default();
            digest.update(message);
            let signature: p521::ecdsa::Signature = key
                .try_sign_digest(digest)
                .map_err(|_| SjwtError::validation(ECDSA_PRIVATE_KEY_INVALID))?;
            Ok(signature.to_bytes().to_vec())
        }
        _ => Err(SjwtError::validation(ECDSA_PRIVATE_KEY_INVALID)),
    }
}

pub(crate) fn verify(
    digest_size: DigestSize,
    key: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    match (digest_size, key) {
        (DigestSize::Bits256, PublicKey::P256(key)) => {
            let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
                return false;
            };
            let mut digest = Sha256::default();
            digest.update(message);
            key.verify_digest(digest, &signature).is_ok()
        }
        (DigestSize::Bits384, PublicKey::P384(key)) => {
            let Ok(signature) = p384::ecdsa::Signature::from_slice(signature) else {
                return false;
            };
            let mut digest = Sha384::default();
            digest.update(message);
            key.verify_digest(digest, &signature).is_ok()
        }
        (DigestSize::Bits512, PublicKey::P521(key)) => {
            let Ok(signature) = p521::ecdsa::Signature::from_slice(signature) else {
                return false;
            };
            let mut digest = Sha512::default();
            digest.update(message);
            key.verify_digest(digest, &signature).is_ok()
        }
        _ => false,
    }
}
