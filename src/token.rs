//! Compact token wire format: assembly inputs, structural validation and
//! decoding.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::algorithm::{algorithm_list, Algorithm};
use crate::base64url;
use crate::claims::Payload;
use crate::error::{MalformedTokenKind, SjwtError, VerificationErrorKind};
use crate::options::VerificationContext;

/// Maximum "reasonable" signature size in bytes.
const SIGNATURE_SIZE: usize = 128;

/// Token header. Created fresh for every generated token; on the verify
/// side it is decoded from the first segment and checked before any
/// cryptographic work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Header {
    /// Name of the signature algorithm.
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type; always `"JWT"` for generated tokens.
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Header {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm: algorithm.name().to_owned(),
            token_type: Some("JWT".to_owned()),
        }
    }
}

/// Structural pre-check: the token must consist of exactly three
/// dot-separated segments. An empty third segment is structurally valid;
/// whether it holds a usable signature is decided by signature
/// verification.
pub(crate) fn validate_token(token: &str) -> Result<(), SjwtError> {
    if token.split('.').count() != 3 {
        return Err(SjwtError::MalformedToken(MalformedTokenKind::Structure));
    }
    Ok(())
}

/// Token split into its decoded components. The signature is raw bytes;
/// `signed_data` borrows the first two segments of the original string,
/// which is the exact input the signature was computed over.
#[derive(Debug)]
pub(crate) struct DecodedToken<'a> {
    pub header: Header,
    pub claims: Payload,
    pub signature: SmallVec<[u8; SIGNATURE_SIZE]>,
    pub signed_data: &'a [u8],
}

impl<'a> DecodedToken<'a> {
    pub(crate) fn decode(token: &'a str) -> Result<Self, SjwtError> {
        let parts: Vec<_> = token.splitn(4, '.').collect();
        let (header_segment, claims_segment, signature_segment) = match parts.as_slice() {
            &[header, claims, signature] => (header, claims, signature),
            _ => return Err(SjwtError::MalformedToken(MalformedTokenKind::Structure)),
        };

        let header_bytes = base64url::decode(header_segment)
            .map_err(|_| SjwtError::MalformedToken(MalformedTokenKind::HeaderSegment))?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|_| SjwtError::MalformedToken(MalformedTokenKind::HeaderSegment))?;

        let claims_bytes = base64url::decode(claims_segment)
            .map_err(|_| SjwtError::MalformedToken(MalformedTokenKind::PayloadSegment))?;
        let claims: Payload = serde_json::from_slice(&claims_bytes)
            .map_err(|_| SjwtError::MalformedToken(MalformedTokenKind::PayloadSegment))?;

        let signature = base64url::decode(signature_segment)
            .map_err(|_| SjwtError::MalformedToken(MalformedTokenKind::SignatureSegment))?;

        Ok(Self {
            header,
            claims,
            signature: SmallVec::from_vec(signature),
            signed_data: token.rsplitn(2, '.').nth(1).unwrap().as_bytes(),
        })
    }

    /// Checks the token type and the algorithm allow-list, returning the
    /// algorithm to verify with.
    pub(crate) fn verify_header(
        &self,
        context: &VerificationContext,
    ) -> Result<Algorithm, SjwtError> {
        if self.header.token_type.as_deref() != Some("JWT") {
            return Err(SjwtError::verification(
                VerificationErrorKind::InvalidTokenType,
                "Token type is not JWT",
            ));
        }

        match Algorithm::from_name(&self.header.algorithm) {
            Some(algorithm) if context.algorithms.contains(&algorithm) => Ok(algorithm),
            _ => Err(SjwtError::verification(
                VerificationErrorKind::InvalidAlgorithm,
                format!(
                    "Algorithm {} is not included in the list of allowed \"algorithms\" {}",
                    self.header.algorithm,
                    algorithm_list(&context.algorithms),
                ),
            )),
        }
    }

    /// Recomputes the signature over the first two token segments and
    /// compares it against the decoded signature bytes.
    pub(crate) fn verify_signature(
        &self,
        algorithm: Algorithm,
        context: &VerificationContext,
    ) -> Result<(), SjwtError> {
        if crate::alg::verify(algorithm, &context.key, self.signed_data, &self.signature) {
            Ok(())
        } else {
            Err(SjwtError::verification(
                VerificationErrorKind::InvalidSignature,
                "signature verification failed",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                         eyJpc3MiOiJ0ZXN0IiwiZXhwIjoxMjM0NTY3ODkwLCJpYXQiOjEyMzQ1Njc4OTAsInRlc3QiOiJ0ZXN0In0.\
                         vNi9dRvHYLssx8gJGEHFI_Qxws924N7w6tZNgpBQ6kM";

    #[test]
    fn structural_check_counts_segments() {
        validate_token(TOKEN).unwrap();
        validate_token("a.b.").unwrap();
        assert_matches!(
            validate_token("a.b").unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::Structure)
        );
        assert_matches!(
            validate_token("a.b.c.d").unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::Structure)
        );
        assert_matches!(
            validate_token("").unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::Structure)
        );
    }

    #[test]
    fn decoding_splits_the_token() {
        let decoded = DecodedToken::decode(TOKEN).unwrap();
        assert_eq!(decoded.header.algorithm, "HS256");
        assert_eq!(decoded.header.token_type.as_deref(), Some("JWT"));
        assert_eq!(decoded.claims.issuer.as_deref(), Some("test"));
        assert_eq!(decoded.claims.custom["test"], "test");
        assert_eq!(decoded.signature.len(), 32);
        assert_eq!(
            decoded.signed_data,
            TOKEN[..TOKEN.rfind('.').unwrap()].as_bytes()
        );
    }

    #[test]
    fn corrupted_segments_are_detected() {
        let mut bad_header = TOKEN.to_owned();
        bad_header.replace_range(..2, "!!");
        assert_matches!(
            DecodedToken::decode(&bad_header).unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::HeaderSegment)
        );

        let claims_start = TOKEN.find('.').unwrap() + 1;
        let mut bad_claims = TOKEN.to_owned();
        bad_claims.replace_range(claims_start..claims_start + 2, "!!");
        assert_matches!(
            DecodedToken::decode(&bad_claims).unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::PayloadSegment)
        );

        let signature_start = TOKEN.rfind('.').unwrap() + 1;
        let mut bad_signature = TOKEN.to_owned();
        bad_signature.replace_range(signature_start.., "%%%");
        assert_matches!(
            DecodedToken::decode(&bad_signature).unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::SignatureSegment)
        );
    }

    #[test]
    fn wrong_typed_reserved_claim_is_a_payload_error() {
        let claims = base64url::encode(r#"{"exp":"not-a-number"}"#);
        let token = format!("{}.{claims}.", TOKEN.split('.').next().unwrap());
        assert_matches!(
            DecodedToken::decode(&token).unwrap_err(),
            SjwtError::MalformedToken(MalformedTokenKind::PayloadSegment)
        );
    }

    #[test]
    fn header_serialization_order() {
        let header = Header::new(Algorithm::Hs256);
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"HS256","typ":"JWT"}"#
        );
    }
}
