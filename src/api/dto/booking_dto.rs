//! Booking request and response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Booking, BookingId, BookingRequest, SeatId, ShowingId};

/// Request body for `POST /bookings`.
///
/// `movie_id` is accepted in place of `showing_id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookSeatsRequest {
    /// Name the bookings are recorded under.
    pub user_name: String,
    /// Showing the seats belong to.
    #[serde(alias = "movie_id")]
    pub showing_id: ShowingId,
    /// Seats to book, all or none.
    pub seat_ids: Vec<SeatId>,
}

impl From<BookSeatsRequest> for BookingRequest {
    fn from(req: BookSeatsRequest) -> Self {
        Self::new(req.user_name, req.showing_id, req.seat_ids)
    }
}

/// One committed booking.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    /// Booking identifier.
    pub id: BookingId,
    /// Name the booking was recorded under.
    pub user_name: String,
    /// Showing of the booked seat.
    pub showing_id: ShowingId,
    /// The booked seat.
    pub seat_id: SeatId,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_name: booking.client_name,
            showing_id: booking.showing_id,
            seat_id: booking.seat_id,
            created_at: booking.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_alias_is_accepted() {
        let body = r#"{"user_name":"ann","movie_id":3,"seat_ids":[7,8]}"#;
        let Ok(req) = serde_json::from_str::<BookSeatsRequest>(body) else {
            panic!("alias not accepted");
        };
        let request = BookingRequest::from(req);
        assert_eq!(request.showing_id, ShowingId::new(3));
        assert_eq!(request.seat_ids, vec![SeatId::new(7), SeatId::new(8)]);
        assert_eq!(request.client_name, "ann");
    }

    #[test]
    fn missing_seat_ids_is_rejected() {
        let body = r#"{"user_name":"ann","showing_id":3}"#;
        assert!(serde_json::from_str::<BookSeatsRequest>(body).is_err());
    }
}
