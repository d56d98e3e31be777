//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{BookSeatsRequest, BookingDto, CreateShowingRequest, SeatDto, ShowingDto};
use super::handlers::{booking, showing, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI 3 document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "cinema-gateway",
        description = "Seat booking API with live seat updates over WebSocket at `/ws`."
    ),
    paths(
        system::health_handler,
        showing::list_showings,
        showing::create_showing,
        showing::delete_showing,
        showing::list_seats,
        booking::book_seats,
    ),
    components(schemas(
        BookSeatsRequest,
        BookingDto,
        CreateShowingRequest,
        SeatDto,
        ShowingDto,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Showings", description = "Catalog and seat maps"),
        (name = "Bookings", description = "Seat reservations"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;
