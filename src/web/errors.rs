//! # Web API Error Responses
//!
//! Converts the [`RegistryError`] taxonomy into HTTP responses. The mapping
//! is fixed: InvalidInput → 400, Forbidden → 403, NotFound → 404,
//! Conflict → 409, Internal → 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::RegistryError;

/// Newtype carrying a classified error across the axum boundary.
#[derive(Debug)]
pub struct ApiError(pub RegistryError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            RegistryError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            RegistryError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            RegistryError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            RegistryError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            RegistryError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.0.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (RegistryError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (RegistryError::Forbidden, StatusCode::FORBIDDEN),
            (RegistryError::not_found("x"), StatusCode::NOT_FOUND),
            (RegistryError::conflict("x"), StatusCode::CONFLICT),
            (
                RegistryError::internal("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).into_response().status(), status);
        }
    }
}
