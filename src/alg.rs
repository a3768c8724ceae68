//! Signature backends for the supported algorithm families.
//!
//! Dispatch is an exhaustive match over [`AlgorithmFamily`]; every family
//! provides a signing function producing raw signature bytes and a
//! verification function returning a boolean. The signing input is always
//! the ASCII bytes of `headerBase64Url + "." + payloadBase64Url`.

mod ecdsa;
mod hmacs;
mod rsa;

use crate::algorithm::{Algorithm, AlgorithmFamily};
use crate::error::SjwtError;
use crate::key::{SecretOrPrivateKey, SecretOrPublicKey};

/// Signs `message` with the given algorithm and key, returning raw
/// signature bytes.
///
/// Key/family pairing is enforced by options validation before this point;
/// a mismatched pairing is reported as an invalid-key error without any
/// cryptographic work.
pub(crate) fn sign(
    algorithm: Algorithm,
    key: &SecretOrPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, SjwtError> {
    let digest_size = algorithm.digest_size();
    match (algorithm.family(), key) {
        (AlgorithmFamily::Hmac, SecretOrPrivateKey::Secret(secret)) => {
            Ok(hmacs::sign(digest_size, secret, message))
        }
        (AlgorithmFamily::Rsa, SecretOrPrivateKey::Private(private)) => {
            rsa::sign(digest_size, rsa::Padding::Pkcs1v15, private, message)
        }
        (AlgorithmFamily::RsaPss, SecretOrPrivateKey::Private(private)) => {
            rsa::sign(digest_size, rsa::Padding::Pss, private, message)
        }
        (AlgorithmFamily::Ecdsa, SecretOrPrivateKey::Private(private)) => {
            ecdsa::sign(digest_size, private, message)
        }
        (AlgorithmFamily::Hmac, SecretOrPrivateKey::Private(_)) => Err(SjwtError::validation(
            "\"privateKey\" cannot be used with an HMAC algorithm",
        )),
        (_, SecretOrPrivateKey::Secret(_)) => Err(SjwtError::validation(
            "\"secretKey\" cannot be used with an asymmetric algorithm",
        )),
    }
}

/// Verifies raw `signature` bytes over `message` with the given algorithm
/// and key. Returns `false` for any mismatch, including a key of the wrong
/// family.
pub(crate) fn verify(
    algorithm: Algorithm,
    key: &SecretOrPublicKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let digest_size = algorithm.digest_size();
    match (algorithm.family(), key) {
        (AlgorithmFamily::Hmac, SecretOrPublicKey::Secret(secret)) => {
            hmacs::verify(digest_size, secret, message, signature)
        }
        (AlgorithmFamily::Rsa, SecretOrPublicKey::Public(public)) => {
            rsa::verify(digest_size, rsa::Padding::Pkcs1v15, public, message, signature)
        }
        (AlgorithmFamily::RsaPss, SecretOrPublicKey::Public(public)) => {
            rsa::verify(digest_size, rsa::Padding::Pss, public, message, signature)
        }
        (AlgorithmFamily::Ecdsa, SecretOrPublicKey::Public(public)) => {
            ecdsa::verify(digest_size, public, message, signature)
        }
        _ => false,
    }
}
