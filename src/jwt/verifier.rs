use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;

use super::{CookieSource, TokenDetails, VerifiedToken};
use crate::AnalyticsError;
use crate::config::TokenConfig;

/// Verifies the HMAC-signed access token carried in a request cookie.
///
/// Stateless: the only inputs are the request and the configured secret,
/// which is resolved again on every call.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    config: TokenConfig,
}

impl TokenVerifier {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Returns the raw cookie value, or an empty string when absent.
    pub fn extract_token<R>(&self, request: &R) -> String
    where
        R: CookieSource + ?Sized,
    {
        request.cookie(&self.config.cookie_name).unwrap_or_default()
    }

    /// Parses the request's token and validates its signature and expiry.
    ///
    /// # Returns
    ///
    /// - `Ok(VerifiedToken)` - signature valid and `exp`, when present, in the future
    /// - `Err(InvalidSignatureMethod)` - the header declares a non-HMAC algorithm
    /// - `Err(MalformedOrExpiredToken)` - anything else
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "verify_token", skip_all, err))]
    pub fn verify_token<R>(&self, request: &R) -> Result<VerifiedToken, AnalyticsError>
    where
        R: CookieSource + ?Sized,
    {
        let token = self.extract_token(request);
        self.verify(&token)
    }

    /// Same as [`verify_token`](Self::verify_token) for a token string.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, AnalyticsError> {
        if token.is_empty() {
            return Err(AnalyticsError::MalformedOrExpiredToken);
        }

        let header = jsonwebtoken::decode_header(token).map_err(|_| {
            // jsonwebtoken refuses algorithms it does not know, `none` included
            match declared_alg(token) {
                Some(alg) if !is_hmac_name(&alg) => unexpected_alg(&alg),
                _ => AnalyticsError::MalformedOrExpiredToken,
            }
        })?;

        // Checked before any key is built so an asymmetric token can never be
        // validated against the shared secret.
        if !matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(unexpected_alg(&format!("{:?}", header.alg)));
        }

        let secret = self.config.secret.resolve().ok_or_else(|| {
            log::error!(
                target: "analytics_sessions::jwt",
                "msg=\"token secret unavailable\" source=\"{:?}\"",
                self.config.secret
            );
            AnalyticsError::MalformedOrExpiredToken
        })?;

        let mut validation = Validation::new(header.alg);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Value>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            log::debug!(
                target: "analytics_sessions::jwt",
                "msg=\"token rejected\" reason=\"{:?}\"",
                e.kind()
            );
            AnalyticsError::MalformedOrExpiredToken
        })?;

        Ok(VerifiedToken {
            header: data.header,
            claims: data.claims,
        })
    }

    /// Returns the verification error, if any.
    ///
    /// A token that verifies but whose claim set is not a JSON object is
    /// reported as `InvalidToken`.
    pub fn is_valid<R>(&self, request: &R) -> Result<(), AnalyticsError>
    where
        R: CookieSource + ?Sized,
    {
        let token = self.verify_token(request)?;
        ensure_claim_object(&token)
    }

    /// Verifies the token and extracts `access_uuid` and `user_id`.
    ///
    /// Fails with `MissingClaim` when either claim is absent or not a string.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "extract_token_metadata", skip_all, err)
    )]
    pub fn extract_token_metadata<R>(&self, request: &R) -> Result<TokenDetails, AnalyticsError>
    where
        R: CookieSource + ?Sized,
    {
        let token = self.verify_token(request)?;
        ensure_claim_object(&token)?;
        token.details()
    }
}

/// Reads `alg` straight from the header segment.
fn declared_alg(token: &str) -> Option<String> {
    let (segment, _) = token.split_once('.')?;
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    let header: Value = serde_json::from_slice(&bytes).ok()?;
    header.get("alg")?.as_str().map(ToOwned::to_owned)
}

fn is_hmac_name(alg: &str) -> bool {
    matches!(alg, "HS256" | "HS384" | "HS512")
}

fn unexpected_alg(alg: &str) -> AnalyticsError {
    log::warn!(
        target: "analytics_sessions::jwt",
        "msg=\"unexpected signing method\" alg=\"{alg}\""
    );
    AnalyticsError::InvalidSignatureMethod(alg.to_owned())
}

fn ensure_claim_object(token: &VerifiedToken) -> Result<(), AnalyticsError> {
    if token.claims.is_object() {
        Ok(())
    } else {
        log::warn!(
            target: "analytics_sessions::jwt",
            "msg=\"token claims are not an object\""
        );
        Err(AnalyticsError::InvalidToken)
    }
}
