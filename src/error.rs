//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate table error: {0}")]
    RateTable(#[from] PricingError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            AppError::RateTable(e) => {
                tracing::error!("Rate table error: {}", e);
                let details = match e {
                    PricingError::InvalidRateTable { errors } => {
                        Some(serde_json::json!({ "errors": errors }))
                    }
                    _ => None,
                };
                (StatusCode::UNPROCESSABLE_ENTITY, "rate_table", details)
            }
        };

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("nope".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateTable(PricingError::UnsupportedVersion {
                found: 2,
                expected: 1
            })
            .into_response()
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
