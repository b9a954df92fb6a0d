//! Configuration types for the session data-access layer.
//!
//! # Example
//!
//! ```rust
//! use analytics_sessions::config::{AnalyticsConfig, SecretSource, TokenConfig};
//! use chrono::Duration;
//!
//! // Use defaults: `access_token` cookie, secret read from `ACCESS_SECRET`.
//! let config = AnalyticsConfig::default();
//!
//! // Or customize
//! let config = AnalyticsConfig {
//!     tokens: TokenConfig {
//!         secret: SecretSource::Static("a-very-long-secret-used-only-in-tests".into()),
//!         access_expiry: Duration::minutes(30),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! assert!(config.tokens.validate().is_ok());
//! ```

use chrono::Duration;

use crate::{AnalyticsError, SecretString};

/// Environment variable holding the HMAC key for access tokens.
pub const DEFAULT_SECRET_VAR: &str = "ACCESS_SECRET";

/// Cookie carrying the access token.
pub const DEFAULT_COOKIE_NAME: &str = "access_token";

/// Minimum length accepted for a static secret.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub tokens: TokenConfig,
    pub timestamps: TimestampConfig,
    pub sessions: SessionStoreConfig,
}

/// Where the HMAC key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Read the named environment variable on every verification call.
    Env(String),
    Static(SecretString),
}

impl SecretSource {
    /// Resolves the current key.
    ///
    /// An unset variable resolves to `None`; callers treat that as a
    /// verification failure rather than falling back to an empty key.
    pub fn resolve(&self) -> Option<SecretString> {
        match self {
            SecretSource::Env(var) => SecretString::from_env(var).filter(|s| !s.is_empty()),
            SecretSource::Static(secret) => Some(secret.clone()),
        }
    }
}

impl Default for SecretSource {
    fn default() -> Self {
        SecretSource::Env(DEFAULT_SECRET_VAR.to_owned())
    }
}

/// Access token settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Name of the cookie carrying the token.
    ///
    /// Default: `access_token`
    pub cookie_name: String,

    /// Source of the HMAC key.
    ///
    /// Default: environment variable `ACCESS_SECRET`
    pub secret: SecretSource,

    /// Lifetime of issued tokens.
    ///
    /// Default: 15 minutes
    pub access_expiry: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            secret: SecretSource::default(),
            access_expiry: Duration::minutes(15),
        }
    }
}

impl TokenConfig {
    /// Configuration with a fixed key instead of the environment.
    pub fn with_secret(secret: impl Into<SecretString>) -> Self {
        Self {
            secret: SecretSource::Static(secret.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.cookie_name.is_empty() {
            return Err(AnalyticsError::ConfigurationError(
                "cookie_name must not be empty".to_owned(),
            ));
        }
        if let SecretSource::Static(secret) = &self.secret {
            if secret.len() < MIN_SECRET_LENGTH {
                return Err(AnalyticsError::ConfigurationError(format!(
                    "secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
                    secret.len()
                )));
            }
        }
        if self.access_expiry <= Duration::zero() {
            return Err(AnalyticsError::ConfigurationError(
                "access_expiry must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// First-seen timestamp settings.
#[derive(Debug, Clone)]
pub struct TimestampConfig {
    /// How long a first-seen timestamp survives after it is written.
    ///
    /// Default: 24 hours
    pub ttl: Duration,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(24),
        }
    }
}

/// Session document settings.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Collection holding session documents.
    ///
    /// Default: `sessions`
    pub collection: String,

    /// Upper bound on events returned by one page.
    ///
    /// Default: 100
    pub max_page_size: u64,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            collection: "sessions".to_owned(),
            max_page_size: 100,
        }
    }
}
