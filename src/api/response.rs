//! Response types for the Budget Engine API.
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
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::MachineNotFound { .. }
            | EngineError::AccessoryNotFound { .. }
            | EngineError::LogisticsLegNotFound { .. }
            | EngineError::TaxNotFound { .. } => (StatusCode::NOT_FOUND, "CATALOG_ENTRY_NOT_FOUND"),
            EngineError::LineNotFound { .. } => (StatusCode::NOT_FOUND, "LINE_NOT_FOUND"),
            EngineError::InvalidAmount { .. } => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            EngineError::EmptyBudget => (StatusCode::BAD_REQUEST, "EMPTY_BUDGET"),
            EngineError::InvalidDateRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE"),
            EngineError::BudgetNotEditable { .. }
            | EngineError::BudgetNotClosed { .. }
            | EngineError::BudgetAlreadyPurchased { .. }
            | EngineError::InvalidUnitTransition { .. }
            | EngineError::NoActiveRental { .. } => (StatusCode::CONFLICT, "CONFLICT"),
        };

        ApiErrorResponse {
            status,
            error: ApiError::new(code, message),
        }
    }
}
