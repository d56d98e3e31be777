//! Showing and seat DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewShowing, Seat, SeatId, Showing, ShowingId};

/// A showing as listed in the catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShowingDto {
    /// Showing identifier.
    pub id: ShowingId,
    /// Film title.
    pub title: String,
    /// Running time in minutes.
    pub duration: i32,
    /// Showtime label.
    pub showtime: String,
    /// Poster URL or path.
    pub poster: String,
}

impl From<Showing> for ShowingDto {
    fn from(showing: Showing) -> Self {
        Self {
            id: showing.id,
            title: showing.title,
            duration: showing.duration_minutes,
            showtime: showing.showtime,
            poster: showing.poster,
        }
    }
}

/// Request body for `POST /showings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShowingRequest {
    /// Film title.
    pub title: String,
    /// Running time in minutes.
    #[serde(default)]
    pub duration: i32,
    /// Showtime label.
    #[serde(default)]
    pub showtime: String,
    /// Poster URL or path.
    #[serde(default)]
    pub poster: String,
}

impl From<CreateShowingRequest> for NewShowing {
    fn from(req: CreateShowingRequest) -> Self {
        Self {
            title: req.title,
            duration_minutes: req.duration,
            showtime: req.showtime,
            poster: req.poster,
        }
    }
}

/// One seat of a showing's map.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeatDto {
    /// Seat identifier, used in booking requests.
    pub id: SeatId,
    /// Owning showing.
    pub showing_id: ShowingId,
    /// Row letter and number, e.g. `"C7"`.
    pub seat_number: String,
    /// Whether the seat is taken.
    pub is_booked: bool,
}

impl From<Seat> for SeatDto {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id,
            showing_id: seat.showing_id,
            seat_number: seat.label,
            is_booked: seat.is_booked,
        }
    }
}
