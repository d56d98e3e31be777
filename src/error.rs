//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{SeatId, ShowingId};
use crate::ledger::LedgerError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2003,
///     "message": "seat 17 is already booked",
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
    /// Numeric error code (see code ranges on [`GatewayError`]).
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
/// | 2000–2999 | Not Found/Conflict| 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server            | 500 Internal Server Error    |
/// | 4290      | Admission         | 429 Too Many Requests        |
///
/// `SeatUnavailable` and `AdmissionRejected` are expected outcomes under
/// contention; callers may retry them.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Showing with the given ID was not found.
    #[error("showing not found: {0}")]
    ShowingNotFound(ShowingId),

    /// Seat does not exist or does not belong to the requested showing.
    #[error("seat not found: {0}")]
    SeatNotFound(SeatId),

    /// Seat was already booked by a competing reservation.
    #[error("seat {0} is already booked")]
    SeatUnavailable(SeatId),

    /// Client already has its full budget of requests in flight.
    #[error("too many requests in flight for this client")]
    AdmissionRejected,

    /// Persistence layer failure. The ledger has already rolled back.
    #[error("persistence error: {0}")]
    PersistenceError(String),

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
            Self::ShowingNotFound(_) => 2001,
            Self::SeatNotFound(_) => 2002,
            Self::SeatUnavailable(_) => 2003,
            Self::AdmissionRejected => 4290,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ShowingNotFound(_) | Self::SeatNotFound(_) => StatusCode::NOT_FOUND,
            Self::SeatUnavailable(_) => StatusCode::CONFLICT,
            Self::AdmissionRejected => StatusCode::TOO_MANY_REQUESTS,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LedgerError> for GatewayError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ShowingNotFound(id) => Self::ShowingNotFound(id),
            LedgerError::SeatNotFound(id) => Self::SeatNotFound(id),
            LedgerError::SeatAlreadyBooked(id) => Self::SeatUnavailable(id),
            LedgerError::DuplicateSeat(id) => {
                Self::InvalidRequest(format!("seat {id} requested more than once"))
            }
            LedgerError::Storage(msg) => Self::PersistenceError(msg),
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
