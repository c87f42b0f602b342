//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Note that date-parse failures are *not* represented here: an unparseable
//! visit date is recovered locally as an unknown date on the record and never
//! aborts a listing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: first_name must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                  |
/// |-----------|-------------------|------------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request              |
/// | 2000–2999 | State/Not Found   | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server            | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A filter or order-by referenced a field name that is not a plain
    /// identifier.
    #[error("invalid field name: {0}")]
    InvalidFieldName(String),

    /// Visitor issuance with the given QR code ID was not found.
    #[error("visitor issuance not found: {0}")]
    IssuanceNotFound(String),

    /// A document was not found in the given collection.
    #[error("document not found: {collection}/{id}")]
    DocumentNotFound {
        /// Collection that was queried.
        collection: String,
        /// Document identifier.
        id: String,
    },

    /// The visitor's QR code was already scanned at the gate.
    #[error("qr code already scanned: {0}")]
    AlreadyScanned(String),

    /// Document store failure (unreachable, rejected query, malformed row).
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidFieldName(_) => 1002,
            Self::IssuanceNotFound(_) => 2001,
            Self::DocumentNotFound { .. } => 2002,
            Self::AlreadyScanned(_) => 2101,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidFieldName(_) => StatusCode::BAD_REQUEST,
            Self::IssuanceNotFound(_) | Self::DocumentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyScanned(_) => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = GatewayError::InvalidRequest("missing first_name".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn missing_issuance_maps_to_not_found() {
        let err = GatewayError::IssuanceNotFound("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn duplicate_scan_maps_to_conflict() {
        let err = GatewayError::AlreadyScanned("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn persistence_maps_to_server_error() {
        let err = GatewayError::Persistence("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }
}
