use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AnalyticsError;
use crate::api::ErrorResponse;

/// converts `AnalyticsError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub AnalyticsError);

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AnalyticsError::InvalidSignatureMethod(_)
            | AnalyticsError::MalformedOrExpiredToken
            | AnalyticsError::InvalidToken
            | AnalyticsError::MissingClaim(_) => StatusCode::UNAUTHORIZED,
            AnalyticsError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalyticsError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AnalyticsError::StoreError(_)
            | AnalyticsError::WriteError(_)
            | AnalyticsError::ParseError(_)
            | AnalyticsError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(
                target: "analytics_sessions::api",
                "msg=\"request failed\" status={} error=\"{}\"",
                status.as_u16(),
                self.0
            );
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
