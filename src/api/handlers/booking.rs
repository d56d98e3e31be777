//! Booking handler: the reservation entry point.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{BookSeatsRequest, BookingDto};
use crate::app_state::AppState;
use crate::domain::BookingRequest;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /bookings`: Book one or more seats of a showing.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed input, unknown showing or seat,
/// a seat that is already booked, or a storage failure.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Book seats",
    description = "Books every listed seat of the showing atomically. Either all seats are booked or none are. Subscribers of `/ws` receive a `seat_update` event after a successful booking.",
    request_body = BookSeatsRequest,
    responses(
        (status = 200, description = "All seats booked", body = Vec<BookingDto>),
        (status = 400, description = "Malformed or invalid request", body = ErrorResponse),
        (status = 404, description = "Showing or seat not found", body = ErrorResponse),
        (status = 409, description = "A seat is already booked", body = ErrorResponse),
        (status = 429, description = "Too many requests in flight", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn book_seats(
    State(state): State<AppState>,
    payload: Result<Json<BookSeatsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let bookings = state
        .booking_service
        .book(BookingRequest::from(req))
        .await?;

    let body: Vec<BookingDto> = bookings.into_iter().map(BookingDto::from).collect();
    Ok(Json(body))
}

/// Booking routes. Mutating: mounted behind admission.
pub fn routes() -> Router<AppState> {
    Router::new().route("/bookings", post(book_seats))
}
