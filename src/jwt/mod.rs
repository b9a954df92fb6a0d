//! Access token verification for cookie-authenticated requests.
//!
//! Tokens are HMAC-signed JWTs carried in the `access_token` cookie. The
//! verifier rejects any token declaring a non-HMAC algorithm before touching
//! the signature, and every session query downstream is scoped by the
//! `user_id` claim it extracts.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use analytics_sessions::config::TokenConfig;
//! use analytics_sessions::jwt::{TokenIssuer, TokenVerifier};
//!
//! let config = TokenConfig::with_secret("test-secret-32-bytes-long-key-00");
//! let issued = TokenIssuer::new(config.clone()).issue("user-42").unwrap();
//!
//! let mut cookies = HashMap::new();
//! cookies.insert("access_token".to_owned(), issued.token.expose_secret().to_owned());
//!
//! let details = TokenVerifier::new(config).extract_token_metadata(&cookies).unwrap();
//! assert_eq!(details.user_id, "user-42");
//! ```

mod claims;
mod cookies;
mod issuer;
mod verifier;

pub use claims::{AccessClaims, TokenDetails, VerifiedToken};
pub use cookies::{CookieSource, parse_cookie_header};
pub use issuer::{IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
