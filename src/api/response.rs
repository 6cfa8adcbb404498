//! Response types for the Tip Pool Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidAmount { message, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_AMOUNT", message),
            ),
            EngineError::InvalidStaff { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_STAFF",
                    message,
                    format!("Check the '{}' field of the staff record", field),
                ),
            ),
            EngineError::DuplicateStaffName { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_STAFF_NAME", message),
            ),
            EngineError::NoStaffSelected => (
                StatusCode::BAD_REQUEST,
                ApiError::new("NO_STAFF_SELECTED", message),
            ),
            EngineError::DuplicateCalculationId { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_CALCULATION_ID", message),
            ),
            EngineError::StaffNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("STAFF_NOT_FOUND", message),
            ),
            EngineError::CalculationNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("CALCULATION_NOT_FOUND", message),
            ),
            EngineError::StorageError { .. } | EngineError::UnsupportedSchemaVersion { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage error", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_amount_keeps_user_message() {
        let api_error: ApiErrorResponse = EngineError::InvalidAmount {
            input: "-5".to_string(),
            message: "Please enter a valid amount".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_AMOUNT");
        assert_eq!(api_error.error.message, "Please enter a valid amount");
    }

    #[test]
    fn test_engine_error_status_codes() {
        let cases = [
            (
                EngineError::StaffNotFound { id: "x".to_string() },
                StatusCode::NOT_FOUND,
                "STAFF_NOT_FOUND",
            ),
            (
                EngineError::CalculationNotFound { id: "x".to_string() },
                StatusCode::NOT_FOUND,
                "CALCULATION_NOT_FOUND",
            ),
            (
                EngineError::DuplicateStaffName { name: "Ana".to_string() },
                StatusCode::CONFLICT,
                "DUPLICATE_STAFF_NAME",
            ),
            (
                EngineError::NoStaffSelected,
                StatusCode::BAD_REQUEST,
                "NO_STAFF_SELECTED",
            ),
            (
                EngineError::DuplicateCalculationId { id: "1".to_string() },
                StatusCode::CONFLICT,
                "DUPLICATE_CALCULATION_ID",
            ),
            (
                EngineError::InvalidStaff {
                    field: "role".to_string(),
                    message: "unknown role 'x'".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_STAFF",
            ),
            (
                EngineError::StorageError {
                    path: "data.json".to_string(),
                    message: "denied".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
            ),
            (
                EngineError::InvalidConfig { message: "bad".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
            ),
        ];

        for (engine_error, status, code) in cases {
            let api_error: ApiErrorResponse = engine_error.into();
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.error.code, code);
        }
    }
}
