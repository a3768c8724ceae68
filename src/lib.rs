//! Creation and verification of signed compact tokens following the
//! [JSON Web Token (JWT)][JWT] model, with runtime algorithm dispatch and
//! strict validation of caller input.
//!
//! # Design choices
//!
//! - Twelve signature algorithms are supported, crossing four families
//!   ([`AlgorithmFamily`]) with three SHA-2 digest sizes. Dispatch is an
//!   exhaustive match over the [`Algorithm`] enum rather than a string
//!   registry.
//! - Key material may be supplied as raw bytes, PEM/DER text or an
//!   already-parsed handle; every form is normalized to a canonical handle
//!   before any cryptographic work. Options carry their key as a
//!   two-variant sum, so "both keys" and "no key" are unrepresentable.
//! - Verification checks run in a fixed order: structural validation,
//!   decoding, token type, algorithm allow-list, signature, and only then
//!   the claim policies. A forged claim can never produce a different error
//!   path than signature failure while the signature itself is invalid.
//! - HMAC signatures are compared in constant time.
//!
//! ## Supported algorithms
//!
//! | Algorithm(s) | Key | Description |
//! |--------------|-----|-------------|
//! | `HS256`, `HS384`, `HS512` | secret | HMAC via the pure Rust [`sha2`] crate |
//! | `RS256`, `RS384`, `RS512` | RSA | PKCS#1 v1.5 padding via the [`rsa`] crate |
//! | `PS256`, `PS384`, `PS512` | RSA (`rsa-pss`) | PSS padding, digest-length salt |
//! | `ES256`, `ES384`, `ES512` | EC | ECDSA on P-256 / P-384 / P-521 |
//!
//! [JWT]: https://jwt.io/
//! [`sha2`]: https://docs.rs/sha2/
//! [`rsa`]: https://docs.rs/rsa/
//!
//! # Examples
//!
//! ```
//! use sjwt::{Algorithm, GenerateOptions, Payload, VerifyOptions};
//!
//! # fn main() -> Result<(), sjwt::SjwtError> {
//! let payload = Payload::new().with_claim("role", "admin");
//! let options = GenerateOptions::with_secret_key("super_secret_key_donut_steel")
//!     .with_algorithm(Algorithm::Hs384)
//!     .with_expires_in("1h")
//!     .with_issuer("issuer.example.com");
//! let token = sjwt::generate(&payload, &options)?;
//!
//! // The algorithm allow-list is inferred from the key: a secret key
//! // admits exactly the HMAC algorithms.
//! let options = VerifyOptions::with_secret_key("super_secret_key_donut_steel")
//!     .with_issuer("issuer.example.com");
//! let verified = sjwt::verify(&token, &options)?;
//! assert_eq!(verified.custom["role"], "admin");
//! assert_eq!(verified.issuer.as_deref(), Some("issuer.example.com"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

use chrono::Utc;

mod alg;
mod algorithm;
pub mod base64url;
mod claims;
mod error;
mod key;
mod options;
mod timespan;
mod token;

pub use crate::{
    algorithm::{Algorithm, AlgorithmFamily},
    claims::{Audience, Payload},
    error::{MalformedTokenKind, SjwtError, VerificationErrorKind},
    key::{
        AsymmetricKeyType, PrivateKey, PrivateKeyMaterial, PublicKey, PublicKeyMaterial, SecretKey,
    },
    options::{AudienceMatcher, AudienceSelector, GenerateOptions, IssuerSelector, VerifyOptions},
    timespan::Timespan,
};

use crate::token::{DecodedToken, Header};

/// Creates a signed compact token from `payload` and `options`.
///
/// The payload and options are validated first; the configured standard
/// claims (`iat`, `exp`, `aud`, `iss`, `sub`, `jti`) are then stamped onto
/// a copy of the payload, the header and payload are serialized and
/// base64url-encoded, and the signature is computed over
/// `header "." payload` with the selected algorithm.
///
/// The computation is deterministic except for the `iat` claim (current
/// time) and any randomness inside the signature primitive (RSA blinding,
/// PSS salts).
pub fn generate(payload: &Payload, options: &GenerateOptions) -> Result<String, SjwtError> {
    payload.validate()?;
    options.validate()?;

    let algorithm = options.algorithm();
    let signing_key = options.signing_key()?;
    let claims = payload.clone().stamped(options, now_seconds())?;

    let header = serde_json::to_string(&Header::new(algorithm))
        .map_err(|err| SjwtError::validation(format!("cannot serialize token header: {err}")))?;
    let claims = serde_json::to_string(&claims)
        .map_err(|err| SjwtError::validation(format!("cannot serialize payload: {err}")))?;

    let mut buffer = base64url::encode(header);
    buffer.push('.');
    buffer.push_str(&base64url::encode(claims));

    let signature = alg::sign(algorithm, &signing_key, buffer.as_bytes())?;
    buffer.push('.');
    buffer.push_str(&base64url::encode(signature));
    Ok(buffer)
}

/// Verifies a compact token and returns its decoded payload.
///
/// Checks run in a fixed order: options are validated and normalized, the
/// token is structurally validated and decoded, the header (`typ`, then the
/// algorithm allow-list) is checked, the signature is verified, and finally
/// the claim policies (expiration/maxAge, issuer, subject, audience, token
/// id) are applied. The first failure is raised immediately.
pub fn verify(token: &str, options: &VerifyOptions) -> Result<Payload, SjwtError> {
    let context = options.normalize()?;
    token::validate_token(token)?;

    let decoded = DecodedToken::decode(token)?;
    let algorithm = decoded.verify_header(&context)?;
    decoded.verify_signature(algorithm, &context)?;
    decoded.claims.verify_claims(&context)?;
    Ok(decoded.claims)
}

fn now_seconds() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
