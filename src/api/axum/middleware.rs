use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use super::error::AppError;
use crate::{TokenDetails, TokenVerifier};

/// Verifies the access-token cookie and yields its claims.
///
/// The [`TokenVerifier`] comes from router state through [`FromRef`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenDetails);

impl AuthenticatedUser {
    pub fn into_inner(self) -> TokenDetails {
        self.0
    }

    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = TokenVerifier::from_ref(state);

        let details = verifier.extract_token_metadata(parts).map_err(|e| {
            log::warn!(
                target: "analytics_sessions::api",
                "msg=\"request rejected\" error=\"{e}\""
            );
            AppError(e)
        })?;

        Ok(AuthenticatedUser(details))
    }
}
