//! Base64url codec helpers.
//!
//! Token segments use the URL-safe base64 alphabet without padding, as
//! required by the compact JWT serialization.

use base64ct::{Base64UrlUnpadded, Encoding};

/// Encodes `input` as unpadded base64url.
pub fn encode(input: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(input.as_ref())
}

/// Decodes unpadded base64url `input` into raw bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64UrlUnpadded::decode_vec(input)
}

/// Converts standard base64 text to base64url by substituting the alphabet
/// (`+` → `-`, `/` → `_`) and stripping `=` padding. No other validation is
/// performed.
pub fn from_base64(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Converts base64url text back to the standard base64 alphabet (`-` → `+`,
/// `_` → `/`). Restoring padding is the caller's responsibility if the
/// downstream codec requires it.
pub fn to_base64(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect()
}
