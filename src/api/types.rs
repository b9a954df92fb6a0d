use serde::Serialize;

use crate::AnalyticsError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<AnalyticsError> for ErrorResponse {
    fn from(err: AnalyticsError) -> Self {
        let code = match &err {
            AnalyticsError::NotFound(_) => "NOT_FOUND",
            AnalyticsError::StoreError(_) => "STORE_ERROR",
            AnalyticsError::WriteError(_) => "WRITE_ERROR",
            AnalyticsError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AnalyticsError::ParseError(_) => "PARSE_ERROR",
            AnalyticsError::InvalidSignatureMethod(_) => "INVALID_SIGNATURE_METHOD",
            AnalyticsError::MalformedOrExpiredToken => "TOKEN_INVALID",
            AnalyticsError::InvalidToken => "TOKEN_INVALID",
            AnalyticsError::MissingClaim(_) => "MISSING_CLAIM",
            AnalyticsError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        };

        // store internals stay in the logs
        let error = match &err {
            AnalyticsError::StoreError(_)
            | AnalyticsError::WriteError(_)
            | AnalyticsError::StoreUnavailable(_)
            | AnalyticsError::ParseError(_)
            | AnalyticsError::ConfigurationError(_) => "Internal error".to_owned(),
            _ => err.to_string(),
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let response = ErrorResponse::from(AnalyticsError::MissingClaim("user_id".to_owned()));
        assert_eq!(response.code, "MISSING_CLAIM");
        assert_eq!(response.error, "Missing claim: user_id");

        let response = ErrorResponse::from(AnalyticsError::StoreError("pg: timeout".to_owned()));
        assert_eq!(response.code, "STORE_ERROR");
        assert_eq!(response.error, "Internal error");
    }
}
