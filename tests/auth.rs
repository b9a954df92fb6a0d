//! Token verification through the public API, including the
//! environment-resolved secret.
//!
//! Tests that touch `ACCESS_SECRET` run with `#[serial]` because the process
//! environment is shared.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;
use serial_test::serial;

use analytics_sessions::config::{DEFAULT_SECRET_VAR, TokenConfig};
use analytics_sessions::jwt::TokenIssuer;
use analytics_sessions::{AnalyticsError, TokenVerifier};

const SECRET: &str = "integration-secret-of-at-least-32-bytes";

fn cookies(token: &str) -> HashMap<String, String> {
    HashMap::from([("access_token".to_owned(), token.to_owned())])
}

fn sign(claims: &serde_json::Value, alg: Algorithm, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
#[serial]
fn test_secret_from_environment() {
    std::env::set_var(DEFAULT_SECRET_VAR, SECRET);

    let issued = TokenIssuer::new(TokenConfig::default()).issue("user-1").unwrap();
    let verifier = TokenVerifier::new(TokenConfig::default());
    let details = verifier
        .extract_token_metadata(&cookies(issued.token.expose_secret()))
        .unwrap();

    assert_eq!(details.user_id, "user-1");
    assert_eq!(details, issued.details);

    std::env::remove_var(DEFAULT_SECRET_VAR);
}

#[test]
#[serial]
fn test_secret_is_resolved_per_call() {
    std::env::set_var(DEFAULT_SECRET_VAR, SECRET);
    let verifier = TokenVerifier::new(TokenConfig::default());
    let issued = TokenIssuer::new(TokenConfig::default()).issue("user-1").unwrap();
    let request = cookies(issued.token.expose_secret());
    assert!(verifier.is_valid(&request).is_ok());

    std::env::set_var(DEFAULT_SECRET_VAR, "rotated-secret-that-is-also-32-bytes");
    assert_eq!(
        verifier.is_valid(&request),
        Err(AnalyticsError::MalformedOrExpiredToken)
    );

    std::env::remove_var(DEFAULT_SECRET_VAR);
    assert_eq!(
        verifier.is_valid(&request),
        Err(AnalyticsError::MalformedOrExpiredToken)
    );
}

#[test]
fn test_hmac_family_accepted() {
    let verifier = TokenVerifier::new(TokenConfig::with_secret(SECRET));
    let exp = (Utc::now() + Duration::minutes(5)).timestamp();
    let claims = json!({"access_uuid": "a-1", "user_id": "u-1", "exp": exp});

    for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
        let token = sign(&claims, alg, SECRET);
        let details = verifier.extract_token_metadata(&cookies(&token)).unwrap();
        assert_eq!(details.access_uuid, "a-1");
    }
}

#[test]
fn test_expired_token_rejected() {
    let verifier = TokenVerifier::new(TokenConfig::with_secret(SECRET));
    let exp = (Utc::now() - Duration::seconds(10)).timestamp();
    let token = sign(&json!({"access_uuid": "a-1", "user_id": "u-1", "exp": exp}), Algorithm::HS256, SECRET);

    let err = verifier.extract_token_metadata(&cookies(&token)).unwrap_err();
    assert_eq!(err, AnalyticsError::MalformedOrExpiredToken);
    assert!(err.is_auth_failure());
}

#[test]
fn test_missing_claims() {
    let verifier = TokenVerifier::new(TokenConfig::with_secret(SECRET));

    let token = sign(&json!({"access_uuid": "a-1"}), Algorithm::HS256, SECRET);
    assert_eq!(
        verifier.extract_token_metadata(&cookies(&token)),
        Err(AnalyticsError::MissingClaim("user_id".to_owned()))
    );

    let token = sign(&json!({"access_uuid": 7, "user_id": "u-1"}), Algorithm::HS256, SECRET);
    assert_eq!(
        verifier.extract_token_metadata(&cookies(&token)),
        Err(AnalyticsError::MissingClaim("access_uuid".to_owned()))
    );
}

#[test]
fn test_no_cookie() {
    let verifier = TokenVerifier::new(TokenConfig::with_secret(SECRET));
    let request: HashMap<String, String> = HashMap::new();

    assert_eq!(verifier.extract_token(&request), "");
    assert_eq!(
        verifier.is_valid(&request),
        Err(AnalyticsError::MalformedOrExpiredToken)
    );
}
