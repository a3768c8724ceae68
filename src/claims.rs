//! Token payload and claim processing.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SjwtError, VerificationErrorKind};
use crate::options::{GenerateOptions, VerificationContext};

/// Names of the reserved claims carried by the typed [`Payload`] fields.
const RESERVED_CLAIMS: [&str; 6] = ["iss", "sub", "aud", "exp", "iat", "jti"];

/// Token payload: the seven standard claims as typed fields, plus arbitrary
/// custom claims.
///
/// Reserved claims keep their wire names (`iss`, `sub`, `aud`, `exp`,
/// `iat`, `jti`) when serialized; custom claims are flattened alongside
/// them, preserving insertion order. A payload is supplied by the caller to
/// [`generate()`](crate::generate), augmented copy-on-write by the claim
/// setters, and is the value returned by a successful
/// [`verify()`](crate::verify).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// `iss` claim: principal that issued the token.
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// `sub` claim: principal that is the subject of the token.
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// `aud` claim: recipient(s) the token is intended for.
    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,

    /// `exp` claim: expiration time, in seconds since the epoch.
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,

    /// `iat` claim: issuance time, in seconds since the epoch.
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<u64>,

    /// `jti` claim: unique token identifier.
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub jwt_id: Option<String>,

    /// Custom claims, serialized alongside the reserved ones.
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// `aud` claim value: a single audience or an ordered sequence of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience.
    One(String),
    /// Several audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Returns the audience values as a slice.
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => core::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for Audience {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl<const N: usize> From<[&str; N]> for Audience {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|&value| value.to_owned()).collect())
    }
}

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom claim to this payload.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }

    /// Checks the payload supplied to token generation: reserved claims
    /// must use their typed fields, and timestamps must be positive.
    pub(crate) fn validate(&self) -> Result<(), SjwtError> {
        if self.expiration == Some(0) {
            return Err(SjwtError::validation("\"exp\" must be a positive integer"));
        }
        if self.issued_at == Some(0) {
            return Err(SjwtError::validation("\"iat\" must be a positive integer"));
        }
        for name in self.custom.keys() {
            if RESERVED_CLAIMS.contains(&name.as_str()) {
                return Err(SjwtError::validation(format!(
                    "\"{name}\" is a reserved claim and must be set through its payload field",
                )));
            }
        }
        Ok(())
    }

    /// Applies the claim setters for token generation, producing a new
    /// payload. The input payload is never mutated.
    pub(crate) fn stamped(
        self,
        options: &GenerateOptions,
        issued_at_time: u64,
    ) -> Result<Self, SjwtError> {
        Ok(self
            .set_iat(options, issued_at_time)?
            .set_exp(options, issued_at_time)?
            .set_aud(options)
            .set_iss(options)
            .set_sub(options)
            .set_jti(options))
    }

    fn set_iat(self, options: &GenerateOptions, issued_at_time: u64) -> Result<Self, SjwtError> {
        if options.no_timestamp {
            if self.issued_at.is_some() {
                return Err(SjwtError::validation(
                    "You cannot set the \"iat\" claim when the \"noTimestamp\" option is set \
                     to \"true\".",
                ));
            }
            Ok(self)
        } else if self.issued_at.is_none() {
            Ok(Self {
                issued_at: Some(issued_at_time),
                ..self
            })
        } else {
            Ok(self)
        }
    }

    fn set_exp(self, options: &GenerateOptions, issued_at_time: u64) -> Result<Self, SjwtError> {
        let Some(expires_in) = &options.expires_in else {
            return Ok(self);
        };
        let seconds = expires_in.to_seconds().ok_or_else(|| {
            SjwtError::validation(
                "\"expiresIn\" must be a number of seconds or string representing a timespan",
            )
        })?;
        Ok(Self {
            expiration: Some(issued_at_time.saturating_add(seconds)),
            ..self
        })
    }

    fn set_aud(self, options: &GenerateOptions) -> Self {
        match &options.audience {
            None => self,
            Some(Audience::One(value)) => Self {
                audience: Some(Audience::One(value.clone())),
                ..self
            },
            Some(Audience::Many(values)) => Self {
                audience: Some(Audience::One(values.join(" "))),
                ..self
            },
        }
    }

    fn set_iss(self, options: &GenerateOptions) -> Self {
        match &options.issuer {
            None => self,
            Some(issuer) => Self {
                issuer: Some(issuer.clone()),
                ..self
            },
        }
    }

    fn set_sub(self, options: &GenerateOptions) -> Self {
        match &options.subject {
            None => self,
            Some(subject) => Self {
                subject: Some(subject.clone()),
                ..self
            },
        }
    }

    fn set_jti(self, options: &GenerateOptions) -> Self {
        match &options.jwt_id {
            None => self,
            Some(jwt_id) => Self {
                jwt_id: Some(jwt_id.clone()),
                ..self
            },
        }
    }

    /// Runs the verify-time claim checks in their fixed order:
    /// expiration/maxAge, issuer, subject, audience, token id. The first
    /// failure is raised immediately.
    pub(crate) fn verify_claims(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        self.check_expiration(context)?;
        self.check_issuer(context)?;
        self.check_subject(context)?;
        self.check_audience(context)?;
        self.check_jwt_id(context)
    }

    fn check_expiration(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        if let Some(expiration) = self.expiration {
            if !context.ignore_expiration
                && context.clock_timestamp >= expiration.saturating_add(context.clock_tolerance)
            {
                return Err(SjwtError::expired(
                    "Expired token: jwt expired",
                    claim_instant(expiration)?,
                ));
            }
        }

        if let Some(max_age) = context.max_age {
            let Some(issued_at) = self.issued_at else {
                return Err(SjwtError::verification(
                    VerificationErrorKind::IatMissing,
                    "iat required when maxAge is specified",
                ));
            };
            let max_age_timestamp = issued_at.saturating_add(max_age);
            if context.clock_timestamp >= max_age_timestamp.saturating_add(context.clock_tolerance)
            {
                return Err(SjwtError::expired(
                    "Expired token: jwt maxAge exceeded",
                    claim_instant(max_age_timestamp)?,
                ));
            }
        }
        Ok(())
    }

    fn check_issuer(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        use crate::options::IssuerSelector;

        let Some(expected) = &context.issuer else {
            return Ok(());
        };
        let Some(issuer) = &self.issuer else {
            return Err(SjwtError::verification(
                VerificationErrorKind::IssMissing,
                "jwt issuer missing from payload",
            ));
        };
        match expected {
            IssuerSelector::One(value) if issuer == value => Ok(()),
            IssuerSelector::One(value) => Err(SjwtError::verification(
                VerificationErrorKind::InvalidIssuer,
                format!("jwt issuer invalid. expected: {value}"),
            )),
            IssuerSelector::Any(values) if values.iter().any(|value| value == issuer) => Ok(()),
            IssuerSelector::Any(values) => Err(SjwtError::verification(
                VerificationErrorKind::InvalidIssuer,
                format!("jwt issuer invalid. expected one from: [{}]", values.join(", ")),
            )),
        }
    }

    fn check_subject(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        let Some(expected) = &context.subject else {
            return Ok(());
        };
        let Some(subject) = &self.subject else {
            return Err(SjwtError::verification(
                VerificationErrorKind::SubMissing,
                "jwt subject missing from payload",
            ));
        };
        if subject == expected {
            Ok(())
        } else {
            Err(SjwtError::verification(
                VerificationErrorKind::InvalidSubject,
                format!("jwt subject invalid. expected: {expected}"),
            ))
        }
    }

    fn check_audience(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        let Some(selector) = &context.audience else {
            return Ok(());
        };
        let Some(audience) = &self.audience else {
            return Err(SjwtError::verification(
                VerificationErrorKind::AudMissing,
                "jwt audience missing from payload",
            ));
        };
        let matched = audience
            .values()
            .iter()
            .any(|target| selector.matches(target));
        if matched {
            Ok(())
        } else {
            Err(SjwtError::verification(
                VerificationErrorKind::InvalidAudience,
                "jwt audience invalid",
            ))
        }
    }

    fn check_jwt_id(&self, context: &VerificationContext) -> Result<(), SjwtError> {
        let Some(expected) = &context.jwt_id else {
            return Ok(());
        };
        let Some(jwt_id) = &self.jwt_id else {
            return Err(SjwtError::verification(
                VerificationErrorKind::JwtIdMissing,
                "jwt jwtId missing from payload",
            ));
        };
        if jwt_id == expected {
            Ok(())
        } else {
            Err(SjwtError::verification(
                VerificationErrorKind::InvalidJwtId,
                format!("jwt jwtId invalid. expected: {expected}"),
            ))
        }
    }
}

/// Converts a claim timestamp to an instant for error reporting.
fn claim_instant(seconds: u64) -> Result<DateTime<Utc>, SjwtError> {
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
        .ok_or_else(|| {
            SjwtError::verification(
                VerificationErrorKind::InvalidPayload,
                "Invalid payload: claim timestamp is out of range",
            )
        })
}
