use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim holding the per-token identifier.
pub const ACCESS_UUID_CLAIM: &str = "access_uuid";

/// Claim holding the owning user.
pub const USER_ID_CLAIM: &str = "user_id";

/// Identity extracted from a verified access token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDetails {
    pub access_uuid: String,
    pub user_id: String,
}

/// Claims written into issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub authorized: bool,
    pub access_uuid: String,
    pub user_id: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl AccessClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A token whose signature and expiry have been checked.
///
/// The claim set is kept as raw JSON so callers decide which claims they
/// require.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub(crate) header: Header,
    pub(crate) claims: Value,
}

impl VerifiedToken {
    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    pub fn claims(&self) -> &Value {
        &self.claims
    }

    /// Returns the named claim if it is present and a string.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// Builds [`TokenDetails`] from the `access_uuid` and `user_id` claims.
    pub fn details(&self) -> Result<TokenDetails, crate::AnalyticsError> {
        let access_uuid = self
            .claim_str(ACCESS_UUID_CLAIM)
            .ok_or_else(|| crate::AnalyticsError::MissingClaim(ACCESS_UUID_CLAIM.to_owned()))?;
        let user_id = self
            .claim_str(USER_ID_CLAIM)
            .ok_or_else(|| crate::AnalyticsError::MissingClaim(USER_ID_CLAIM.to_owned()))?;

        Ok(TokenDetails {
            access_uuid: access_uuid.to_owned(),
            user_id: user_id.to_owned(),
        })
    }
}
