//! Session data-access layer for a web analytics backend.
//!
//! The crate stores one document per recorded page-view event, reconstructs
//! session and event history from those documents, remembers the first-seen
//! time of each session in a key-value store, and verifies the HMAC-signed
//! access token that scopes every query to a single user.
//!
//! # Layout
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`jwt`] | Cookie token verification and issuance |
//! | [`session`] | Session model, [`SessionRepository`] and [`TimestampRepository`] |
//! | [`store`] | Document and key-value store collaborators with in-memory backends |
//! | [`actions`] | Use cases composing the repositories |
//! | [`clock`] | Injectable time source and UTC day windows |
//! | `postgres` | `PostgreSQL` store backends (feature `sqlx_postgres`) |
//! | `api` | axum extractor and error mapping (feature `axum`) |
//!
//! # Example
//!
//! ```rust
//! use analytics_sessions::session::DocumentSessionRepository;
//! use analytics_sessions::store::InMemoryDocumentStore;
//! use analytics_sessions::SessionRepository;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = DocumentSessionRepository::new(InMemoryDocumentStore::new());
//! let count = repo.get_session_count("user-1", "visit-1").await.unwrap();
//! assert_eq!(count, 0);
//! # });
//! ```

pub mod actions;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod dedup;
pub mod jwt;
mod secret;
pub mod session;
pub mod store;

#[cfg(feature = "axum")]
pub mod api;

#[cfg(feature = "sqlx_postgres")]
pub mod postgres;

use std::fmt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AnalyticsConfig;
pub use dedup::remove_duplicates;
pub use jwt::{TokenDetails, TokenVerifier};
pub use secret::SecretString;
pub use session::{Event, Metadata, Session, SessionRepository, TimestampRepository};
pub use store::{DocumentStore, KeyValueStore};

/// Errors returned by every operation in this crate.
///
/// No operation retries or swallows errors; each failure is scoped to the
/// request that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The query matched nothing.
    NotFound(String),
    /// Document store read or decode failure.
    StoreError(String),
    /// Document store write failure.
    WriteError(String),
    /// Key-value store connectivity or backend failure.
    StoreUnavailable(String),
    /// A stored timestamp could not be read as an integer.
    ParseError(String),
    /// The token declares a signing algorithm outside the HMAC family.
    InvalidSignatureMethod(String),
    /// Missing, corrupt, expired or badly signed token.
    MalformedOrExpiredToken,
    /// The token verified but its claim set is unusable.
    InvalidToken,
    /// A required claim is absent or not a string.
    MissingClaim(String),
    ConfigurationError(String),
}

impl AnalyticsError {
    /// Returns true for failures that must map to an access-denied outcome.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignatureMethod(_)
                | Self::MalformedOrExpiredToken
                | Self::InvalidToken
                | Self::MissingClaim(_)
        )
    }

    /// Returns true when the query simply matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl std::error::Error for AnalyticsError {}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::NotFound(what) => write!(f, "Not found: {what}"),
            AnalyticsError::StoreError(msg) => write!(f, "Store error: {msg}"),
            AnalyticsError::WriteError(msg) => write!(f, "Write error: {msg}"),
            AnalyticsError::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
            AnalyticsError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            AnalyticsError::InvalidSignatureMethod(alg) => {
                write!(f, "Unexpected signing method: {alg}")
            }
            AnalyticsError::MalformedOrExpiredToken => write!(f, "Token is malformed or expired"),
            AnalyticsError::InvalidToken => write!(f, "Invalid token"),
            AnalyticsError::MissingClaim(claim) => write!(f, "Missing claim: {claim}"),
            AnalyticsError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}
