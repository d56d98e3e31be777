//! Showing handlers: catalog CRUD and seat maps.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateShowingRequest, SeatDto, ShowingDto};
use crate::app_state::AppState;
use crate::domain::{NewShowing, ShowingId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /showings`: List the catalog.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/showings",
    tag = "Showings",
    summary = "List showings",
    responses(
        (status = 200, description = "All showings", body = Vec<ShowingDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_showings(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let showings = state.showing_service.list_showings().await?;
    let body: Vec<ShowingDto> = showings.into_iter().map(ShowingDto::from).collect();
    Ok(Json(body))
}

/// `POST /showings`: Create a showing with a fresh seat grid.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on malformed input, or
/// [`GatewayError::PersistenceError`] on storage failure.
#[utoipa::path(
    post,
    path = "/api/v1/showings",
    tag = "Showings",
    summary = "Create a showing",
    description = "Creates the showing and its 5x10 seat grid (A1 to E10) in one transaction.",
    request_body = CreateShowingRequest,
    responses(
        (status = 201, description = "Showing created", body = ShowingDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 429, description = "Too many requests in flight", body = ErrorResponse),
    )
)]
pub async fn create_showing(
    State(state): State<AppState>,
    payload: Result<Json<CreateShowingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let showing = state
        .showing_service
        .create_showing(NewShowing::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(ShowingDto::from(showing))))
}

/// `DELETE /showings/{id}`: Remove a showing with its seats and bookings.
///
/// # Errors
///
/// Returns [`GatewayError::ShowingNotFound`] if the showing does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/showings/{id}",
    tag = "Showings",
    summary = "Delete a showing",
    params(
        ("id" = i64, Path, description = "Showing ID"),
    ),
    responses(
        (status = 204, description = "Showing deleted"),
        (status = 404, description = "Showing not found", body = ErrorResponse),
        (status = 429, description = "Too many requests in flight", body = ErrorResponse),
    )
)]
pub async fn delete_showing(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = showing_id(path)?;
    state
        .showing_service
        .delete_showing(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /showings/{id}/seats`: Seat map ordered by label.
///
/// # Errors
///
/// Returns [`GatewayError::ShowingNotFound`] if the showing does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/showings/{id}/seats",
    tag = "Showings",
    summary = "List seats of a showing",
    params(
        ("id" = i64, Path, description = "Showing ID"),
    ),
    responses(
        (status = 200, description = "Seat map", body = Vec<SeatDto>),
        (status = 404, description = "Showing not found", body = ErrorResponse),
    )
)]
pub async fn list_seats(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = showing_id(path)?;
    let seats = state.showing_service.list_seats(id).await?;
    let body: Vec<SeatDto> = seats.into_iter().map(SeatDto::from).collect();
    Ok(Json(body))
}

fn showing_id(path: Result<Path<i64>, PathRejection>) -> Result<ShowingId, GatewayError> {
    let Path(id) = path.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    Ok(ShowingId::new(id))
}

/// Read-only showing routes.
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/showings", get(list_showings))
        .route("/showings/{id}/seats", get(list_seats))
}

/// Mutating showing routes. Mounted behind admission.
pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/showings", post(create_showing))
        .route("/showings/{id}", delete(delete_showing))
}
