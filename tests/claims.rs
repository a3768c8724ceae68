//! Tests for verify-time claim policies.

use assert_matches::assert_matches;
use regex::Regex;

use sjwt::{
    AudienceMatcher, GenerateOptions, Payload, SjwtError, VerificationErrorKind, VerifyOptions,
};

const KEY: &str = "test";
const NOW: u64 = 1_700_000_000;

fn token_with(payload: Payload) -> String {
    sjwt::generate(&payload, &GenerateOptions::with_secret_key(KEY)).unwrap()
}

fn verify_options() -> VerifyOptions {
    VerifyOptions::with_secret_key(KEY).with_clock_timestamp(NOW)
}

#[test]
fn expiration_boundary_is_exclusive() {
    let token = token_with(Payload {
        expiration: Some(NOW),
        ..Payload::default()
    });

    // exp == clock is already expired at zero tolerance.
    let err = sjwt::verify(&token, &verify_options()).unwrap_err();
    assert_matches!(
        err,
        SjwtError::ExpiredToken { ref message, expired_at }
            if message == "Expired token: jwt expired"
                && expired_at.timestamp() == NOW as i64
    );

    let options = VerifyOptions::with_secret_key(KEY).with_clock_timestamp(NOW - 1);
    sjwt::verify(&token, &options).unwrap();
}

#[test]
fn clock_tolerance_extends_expiration() {
    let token = token_with(Payload {
        expiration: Some(NOW - 1),
        ..Payload::default()
    });

    assert_matches!(
        sjwt::verify(&token, &verify_options()).unwrap_err(),
        SjwtError::ExpiredToken { .. }
    );
    sjwt::verify(&token, &verify_options().with_clock_tolerance(2)).unwrap();
}

#[test]
fn ignore_expiration_skips_the_check() {
    let token = token_with(Payload {
        expiration: Some(NOW - 1_000),
        ..Payload::default()
    });
    sjwt::verify(&token, &verify_options().with_ignore_expiration(true)).unwrap();
}

#[test]
fn max_age_boundary_is_exclusive() {
    let max_age = 100;
    let at_boundary = token_with(Payload {
        issued_at: Some(NOW - max_age),
        ..Payload::default()
    });
    let err = sjwt::verify(&at_boundary, &verify_options().with_max_age(max_age)).unwrap_err();
    assert_matches!(
        err,
        SjwtError::ExpiredToken { ref message, expired_at }
            if message == "Expired token: jwt maxAge exceeded"
                && expired_at.timestamp() == NOW as i64
    );

    let inside = token_with(Payload {
        issued_at: Some(NOW - max_age + 1),
        ..Payload::default()
    });
    sjwt::verify(&inside, &verify_options().with_max_age(max_age)).unwrap();
}

#[test]
fn max_age_accepts_timespan_strings() {
    let token = token_with(Payload {
        issued_at: Some(NOW - 30),
        ..Payload::default()
    });
    sjwt::verify(&token, &verify_options().with_max_age("1m")).unwrap();
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_max_age("20s")).unwrap_err(),
        SjwtError::ExpiredToken { .. }
    );
}

#[test]
fn max_age_requires_iat() {
    let options = GenerateOptions::with_secret_key(KEY).with_no_timestamp(true);
    let token = sjwt::generate(&Payload::default(), &options).unwrap();
    let err = sjwt::verify(&token, &verify_options().with_max_age(60)).unwrap_err();
    assert_matches!(
        err,
        SjwtError::Verification {
            kind: VerificationErrorKind::IatMissing,
            ref message,
        } if message == "iat required when maxAge is specified"
    );
}

#[test]
fn issuer_must_match() {
    let token = token_with(Payload {
        issuer: Some("good".to_owned()),
        ..Payload::default()
    });

    sjwt::verify(&token, &verify_options().with_issuer("good")).unwrap();
    sjwt::verify(&token, &verify_options().with_issuer(["other", "good"])).unwrap();

    let err = sjwt::verify(&token, &verify_options().with_issuer("bad")).unwrap_err();
    assert_matches!(
        err,
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidIssuer,
            ref message,
        } if message == "jwt issuer invalid. expected: bad"
    );

    let err = sjwt::verify(&token, &verify_options().with_issuer(["a", "b"])).unwrap_err();
    assert_matches!(
        err,
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidIssuer,
            ref message,
        } if message == "jwt issuer invalid. expected one from: [a, b]"
    );
}

#[test]
fn issuer_is_required_when_requested() {
    let token = token_with(Payload::default());
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_issuer("any")).unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::IssMissing,
            ..
        }
    );
}

#[test]
fn subject_must_match_exactly() {
    let token = token_with(Payload {
        subject: Some("alice".to_owned()),
        ..Payload::default()
    });
    sjwt::verify(&token, &verify_options().with_subject("alice")).unwrap();
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_subject("bob")).unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidSubject,
            ..
        }
    );

    let token = token_with(Payload::default());
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_subject("alice")).unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::SubMissing,
            ..
        }
    );
}

#[test]
fn audience_matching_is_a_cross_product() {
    let token = token_with(Payload {
        audience: Some(["a", "b"].into()),
        ..Payload::default()
    });

    // Any token audience matching any configured entry passes.
    sjwt::verify(&token, &verify_options().with_audience("b")).unwrap();

    let err = sjwt::verify(
        &token,
        &verify_options().with_audience(Regex::new("^c").unwrap()),
    )
    .unwrap_err();
    assert_matches!(
        err,
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidAudience,
            ref message,
        } if message == "jwt audience invalid"
    );

    sjwt::verify(
        &token,
        &verify_options().with_audience(vec![
            AudienceMatcher::from(Regex::new("^a").unwrap()),
            AudienceMatcher::from("z"),
        ]),
    )
    .unwrap();
}

#[test]
fn single_string_audience_matches() {
    let token = token_with(Payload {
        audience: Some("service".into()),
        ..Payload::default()
    });
    sjwt::verify(&token, &verify_options().with_audience("service")).unwrap();
    sjwt::verify(
        &token,
        &verify_options().with_audience(Regex::new("^serv").unwrap()),
    )
    .unwrap();

    let token = token_with(Payload::default());
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_audience("service")).unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::AudMissing,
            ..
        }
    );
}

#[test]
fn jwt_id_must_match_exactly() {
    let token = token_with(Payload {
        jwt_id: Some("id-1".to_owned()),
        ..Payload::default()
    });
    sjwt::verify(&token, &verify_options().with_jwt_id("id-1")).unwrap();

    let err = sjwt::verify(&token, &verify_options().with_jwt_id("id-2")).unwrap_err();
    assert_matches!(
        err,
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidJwtId,
            ref message,
        } if message == "jwt jwtId invalid. expected: id-2"
    );

    let token = token_with(Payload::default());
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_jwt_id("id-1")).unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::JwtIdMissing,
            ..
        }
    );
}

#[test]
fn checks_run_in_fixed_order() {
    // Expiration is checked before issuer, so an expired token with a bad
    // issuer reports expiry.
    let token = token_with(Payload {
        expiration: Some(NOW - 10),
        issuer: Some("wrong".to_owned()),
        ..Payload::default()
    });
    assert_matches!(
        sjwt::verify(&token, &verify_options().with_issuer("right")).unwrap_err(),
        SjwtError::ExpiredToken { .. }
    );

    // Issuer is checked before audience.
    let token = token_with(Payload {
        issuer: Some("wrong".to_owned()),
        ..Payload::default()
    });
    assert_matches!(
        sjwt::verify(
            &token,
            &verify_options().with_issuer("right").with_audience("aud"),
        )
        .unwrap_err(),
        SjwtError::Verification {
            kind: VerificationErrorKind::InvalidIssuer,
            ..
        }
    );
}
