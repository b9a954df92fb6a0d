use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header};

use super::{AccessClaims, TokenDetails};
use crate::config::TokenConfig;
use crate::crypto::{TOKEN_ID_LENGTH, generate_token};
use crate::{AnalyticsError, SecretString};

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encoded JWT, meant for the `access_token` cookie.
    pub token: SecretString,
    pub details: TokenDetails,
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 access tokens that [`TokenVerifier`](super::TokenVerifier)
/// accepts.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: TokenConfig,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issues a token for `user_id` expiring after the configured lifetime.
    pub fn issue(&self, user_id: &str) -> Result<IssuedToken, AnalyticsError> {
        let secret = self.config.secret.resolve().ok_or_else(|| {
            AnalyticsError::ConfigurationError("token secret is not set".to_owned())
        })?;

        let expires_at = Utc::now() + self.config.access_expiry;
        let claims = AccessClaims {
            authorized: true,
            access_uuid: generate_token(TOKEN_ID_LENGTH),
            user_id: user_id.to_owned(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AnalyticsError::ConfigurationError(format!("JWT encode: {e}")))?;

        log::debug!(
            target: "analytics_sessions::jwt",
            "msg=\"access token issued\" user_id=\"{user_id}\""
        );

        Ok(IssuedToken {
            token: SecretString::new(token),
            details: TokenDetails {
                access_uuid: claims.access_uuid,
                user_id: claims.user_id,
            },
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::config::SecretSource;
    use crate::jwt::TokenVerifier;

    #[test]
    fn test_issue_and_verify() {
        let config = TokenConfig::with_secret("test-secret-32-bytes-long-key-02");
        let issued = TokenIssuer::new(config.clone()).issue("user-9").unwrap();

        let verified = TokenVerifier::new(config).verify(issued.token.expose_secret()).unwrap();
        assert_eq!(verified.details().unwrap(), issued.details);
        assert_eq!(verified.claims()["authorized"], serde_json::json!(true));
    }

    #[test]
    fn test_access_uuid_is_unique() {
        let issuer = TokenIssuer::new(TokenConfig::with_secret("test-secret-32-bytes-long-key-03"));
        let a = issuer.issue("user-9").unwrap();
        let b = issuer.issue("user-9").unwrap();
        assert_ne!(a.details.access_uuid, b.details.access_uuid);
        assert_eq!(a.details.access_uuid.len(), TOKEN_ID_LENGTH);
    }

    #[test]
    fn test_expiry_follows_config() {
        let config = TokenConfig {
            access_expiry: Duration::hours(2),
            ..TokenConfig::with_secret("test-secret-32-bytes-long-key-04")
        };
        let before = Utc::now();
        let issued = TokenIssuer::new(config).issue("user-9").unwrap();
        assert!(issued.expires_at >= before + Duration::hours(2) - Duration::seconds(1));
        assert!(issued.expires_at <= Utc::now() + Duration::hours(2));
    }

    #[test]
    fn test_issue_without_secret() {
        let config = TokenConfig {
            secret: SecretSource::Env("ANALYTICS_SESSIONS_TEST_UNSET_SECRET".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            TokenIssuer::new(config).issue("user-9"),
            Err(AnalyticsError::ConfigurationError(_))
        ));
    }
}
