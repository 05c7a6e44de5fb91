//! Application error type and its HTTP representation.
//!
//! Every failure that reaches a handler is an [`AppError`]. Lower layers use
//! their own `thiserror` enums ([`PostalCodeError`], [`LocationError`]) and
//! are converted here, so the status-code policy lives in one place.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::postal_code::PostalCodeError;
use crate::domain::resolvers::LocationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Unprocessable { message: String, details: Value },
    BadGateway { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn unprocessable(message: impl Into<String>, details: Value) -> Self {
        Self::Unprocessable {
            message: message.into(),
            details,
        }
    }
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::Unprocessable { .. } => "unprocessable_entity",
            AppError::BadGateway { .. } => "upstream_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Unprocessable { message, .. }
            | AppError::BadGateway { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    fn into_parts(self) -> (String, Value) {
        match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::Unprocessable { message, details }
            | AppError::BadGateway { message, details }
            | AppError::Internal { message, details } => (message, details),
        }
    }

    pub fn to_error_info(self) -> ErrorInfo {
        let code = self.code();
        let (message, details) = self.into_parts();
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), details = %details_of(&self), "{}", self.message());
        } else {
            tracing::warn!(code = self.code(), details = %details_of(&self), "{}", self.message());
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

fn details_of(err: &AppError) -> &Value {
    match err {
        AppError::Validation { details, .. }
        | AppError::NotFound { details, .. }
        | AppError::Conflict { details, .. }
        | AppError::Unprocessable { details, .. }
        | AppError::BadGateway { details, .. }
        | AppError::Internal { details, .. } => details,
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!(error = %e, "database error");
    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request", details)
    }
}

impl From<PostalCodeError> for AppError {
    fn from(e: PostalCodeError) -> Self {
        AppError::bad_request(
            "Invalid postal code",
            json!({ "reason": e.to_string(), "expected": "8 digits, e.g. 01310100 or 01310-100" }),
        )
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        let reason = e.to_string();
        match e {
            LocationError::InvalidPostalCode { postal_code } => AppError::bad_request(
                "Postal code does not exist",
                json!({ "postal_code": postal_code }),
            ),
            LocationError::NoCoordinatesFound { postal_code } => AppError::unprocessable(
                "No coordinates found for postal code",
                json!({ "postal_code": postal_code }),
            ),
            LocationError::CoordinateResolutionFailed { postal_code } => AppError::unprocessable(
                "Could not resolve coordinates for postal code",
                json!({ "postal_code": postal_code }),
            ),
            LocationError::LookupUnavailable { service, .. } => AppError::bad_gateway(
                "Location lookup unavailable",
                json!({ "service": service, "reason": reason }),
            ),
        }
    }
}
