//! Error handling.

use core::fmt;

use chrono::{DateTime, Utc};

/// Errors produced by token generation and verification.
///
/// Every failure is reported through this type; no error from an underlying
/// cryptographic or parsing library crosses the public boundary unwrapped.
/// [`SjwtError::name()`] returns a stable identifier for the error kind,
/// which is finer-grained than the enum variant for verification errors
/// (see [`VerificationErrorKind`]).
#[derive(Debug)]
#[non_exhaustive]
pub enum SjwtError {
    /// A value had the wrong primitive type.
    Type {
        /// Expected type.
        expected: String,
        /// Actual type that was supplied.
        actual: String,
    },
    /// Caller-supplied payload or options are malformed or contradictory.
    Validation(String),
    /// Token is not structurally sound, or one of its segments cannot be
    /// decoded.
    MalformedToken(MalformedTokenKind),
    /// Token content violates a verify-time policy.
    Verification {
        /// Specific verification failure.
        kind: VerificationErrorKind,
        /// Human-readable description.
        message: String,
    },
    /// Token has expired, either via the `exp` claim or a `maxAge` policy.
    ExpiredToken {
        /// Human-readable description.
        message: String,
        /// Instant at which the token stopped being valid.
        expired_at: DateTime<Utc>,
    },
}

impl SjwtError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Type {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn verification(kind: VerificationErrorKind, message: impl Into<String>) -> Self {
        Self::Verification {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn expired(message: impl Into<String>, expired_at: DateTime<Utc>) -> Self {
        Self::ExpiredToken {
            message: message.into(),
            expired_at,
        }
    }

    /// Returns a stable name for this error, e.g. `"SjwtValidationError"` or
    /// `"InvalidSignature"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Type { .. } => "SjwtTypeError",
            Self::Validation(_) => "SjwtValidationError",
            Self::MalformedToken(_) => "SjwtMalformedTokenError",
            Self::Verification { kind, .. } => kind.name(),
            Self::ExpiredToken { .. } => "SjwtExpiredTokenError",
        }
    }
}

impl fmt::Display for SjwtError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { expected, actual } => {
                write!(formatter, "Expected type to be {expected}, got {actual}")
            }
            Self::Validation(message) => formatter.write_str(message),
            Self::MalformedToken(kind) => formatter.write_str(kind.message()),
            Self::Verification { message, .. } => formatter.write_str(message),
            Self::ExpiredToken { message, .. } => formatter.write_str(message),
        }
    }
}

impl std::error::Error for SjwtError {}

/// Structural corruption detected while splitting or decoding a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedTokenKind {
    /// Token does not consist of three dot-separated segments.
    Structure,
    /// Header segment cannot be base64url-decoded or JSON-parsed.
    HeaderSegment,
    /// Payload segment cannot be base64url-decoded or JSON-parsed.
    PayloadSegment,
    /// Signature segment cannot be base64url-decoded.
    SignatureSegment,
}

impl MalformedTokenKind {
    fn message(self) -> &'static str {
        match self {
            Self::Structure => {
                "Malformed token: The provided token does not have three dot-separated segments."
            }
            Self::HeaderSegment => {
                "Invalid token header: The provided token header could not be decoded."
            }
            Self::PayloadSegment => {
                "Invalid token payload: The provided token payload could not be decoded."
            }
            Self::SignatureSegment => {
                "Invalid token signature: The provided token signature could not be decoded."
            }
        }
    }
}

/// Specific failure reported by a [`SjwtError::Verification`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerificationErrorKind {
    /// `typ` header field is not `"JWT"`.
    InvalidTokenType,
    /// `alg` header field is not in the allowed algorithm list.
    InvalidAlgorithm,
    /// Signature does not match the token contents and key.
    InvalidSignature,
    /// `iss` claim does not match the expected issuer(s).
    InvalidIssuer,
    /// `sub` claim does not match the expected subject.
    InvalidSubject,
    /// `aud` claim does not match any expected audience.
    InvalidAudience,
    /// `jti` claim does not match the expected token id.
    InvalidJwtId,
    /// A claim is present but its value is unusable.
    InvalidPayload,
    /// `iat` claim is required (by `maxAge`) but missing.
    IatMissing,
    /// `iss` claim is required but missing.
    IssMissing,
    /// `sub` claim is required but missing.
    SubMissing,
    /// `aud` claim is required but missing.
    AudMissing,
    /// `jti` claim is required but missing.
    JwtIdMissing,
}

impl VerificationErrorKind {
    fn name(self) -> &'static str {
        match self {
            Self::InvalidTokenType => "InvalidTokenType",
            Self::InvalidAlgorithm => "InvalidAlgorithm",
            Self::InvalidSignature => "InvalidSignature",
            Self::InvalidIssuer => "InvalidIssuer",
            Self::InvalidSubject => "InvalidSubject",
            Self::InvalidAudience => "InvalidAudience",
            Self::InvalidJwtId => "InvalidJwtId",
            Self::InvalidPayload => "InvalidPayload",
            Self::IatMissing => "IatMissing",
            Self::IssMissing => "IssMissing",
            Self::SubMissing => "SubMissing",
            Self::AudMissing => "AudMissing",
            Self::JwtIdMissing => "JwtIdMissing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_are_stable() {
        let err = SjwtError::type_mismatch("string", "number");
        assert_eq!(err.name(), "SjwtTypeError");
        assert_eq!(err.to_string(), "Expected type to be string, got number");

        let err = SjwtError::validation("\"algorithm\" must be a valid algorithm");
        assert_eq!(err.name(), "SjwtValidationError");

        let err = SjwtError::MalformedToken(MalformedTokenKind::Structure);
        assert_eq!(err.name(), "SjwtMalformedTokenError");

        let err = SjwtError::verification(
            VerificationErrorKind::InvalidSignature,
            "signature verification failed",
        );
        assert_eq!(err.name(), "InvalidSignature");
        assert_eq!(err.to_string(), "signature verification failed");
    }
}
