//! HMAC-based algorithms: `HS*`.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::algorithm::DigestSize;
use crate::key::SecretKey;

macro_rules! keyed_digest {
    ($digest:ty, $key:expr, $message:expr) => {{
        let mut mac = <Hmac<$digest>>::new_from_slice($key.as_ref())
            .expect("HMACs work with any key size");
        mac.update($message);
        mac.finalize().into_bytes().to_vec()
    }};
}

pub(crate) fn sign(digest_size: DigestSize, key: &SecretKey, message: &[u8]) -> Vec<u8> {
    match digest_size {
        DigestSize::Bits256 => keyed_digest!(Sha256, key, message),
        DigestSize::Bits384 => keyed_digest!(Sha384, key, message),
        DigestSize::Bits512 => keyed_digest!(Sha512, key, message),
    }
}

/// Recomputes the signature and compares against the provided one in
/// constant time. A length mismatch is an immediate, safe reject; matching
/// lengths are compared without short-circuiting on the first differing
/// byte.
pub(crate) fn verify(
    digest_size: DigestSize,
    key: &SecretKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let computed = sign(digest_size, key, message);
    if computed.len() != signature.len() {
        return false;
    }
    computed.as_slice().ct_eq(signature).into()
}
