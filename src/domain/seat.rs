//! Showing, seat and booking records plus the seat-grid generator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BookingId, SeatId, ShowingId};

/// A scheduled screening with a fixed, pre-generated seat layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Showing {
    /// Storage identifier.
    pub id: ShowingId,
    /// Film title.
    pub title: String,
    /// Running time in minutes.
    pub duration_minutes: i32,
    /// Free-form showtime label (e.g. `"19:30"`).
    pub showtime: String,
    /// Poster URL or path, empty when none.
    pub poster: String,
}

/// Catalog input for a new showing. The seat grid is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShowing {
    /// Film title.
    pub title: String,
    /// Running time in minutes.
    pub duration_minutes: i32,
    /// Free-form showtime label.
    pub showtime: String,
    /// Poster URL or path.
    pub poster: String,
}

/// A bookable unit belonging to exactly one showing.
///
/// `is_booked` is true iff exactly one [`Booking`] references this seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    /// Storage identifier.
    pub id: SeatId,
    /// Owning showing.
    pub showing_id: ShowingId,
    /// Label unique within the showing (e.g. `"C7"`).
    pub label: String,
    /// Whether a booking holds this seat.
    pub is_booked: bool,
}

/// Immutable record linking a client to one seat of one showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    /// Storage identifier.
    pub id: BookingId,
    /// Client name supplied with the booking request.
    pub client_name: String,
    /// Showing the seat belongs to.
    pub showing_id: ShowingId,
    /// The booked seat.
    pub seat_id: SeatId,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

/// Rectangular seat grid: lettered rows, numbered seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    rows: u8,
    seats_per_row: u8,
}

impl SeatLayout {
    /// Five rows (`A`..`E`) of ten seats.
    pub const STANDARD: Self = Self {
        rows: 5,
        seats_per_row: 10,
    };

    /// Creates a layout, clamping rows to the 26 available letters.
    #[must_use]
    pub fn new(rows: u8, seats_per_row: u8) -> Self {
        Self {
            rows: rows.min(26),
            seats_per_row,
        }
    }

    /// Total number of seats in the grid.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.rows) * usize::from(self.seats_per_row)
    }

    /// Generates labels row by row: `A1, A2, …, A10, B1, …`.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.capacity());
        for row in (b'A'..).take(usize::from(self.rows)) {
            for seat in 1..=self.seats_per_row {
                labels.push(format!("{}{seat}", char::from(row)));
            }
        }
        labels
    }
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_has_fifty_seats() {
        let labels = SeatLayout::STANDARD.labels();
        assert_eq!(labels.len(), 50);
        assert_eq!(labels.first().map(String::as_str), Some("A1"));
        assert_eq!(labels.last().map(String::as_str), Some("E10"));
    }

    #[test]
    fn labels_are_unique() {
        let labels = SeatLayout::new(3, 12).labels();
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn rows_clamped_to_alphabet() {
        let layout = SeatLayout::new(40, 1);
        assert_eq!(layout.capacity(), 26);
        assert!(layout.labels().contains(&"Z1".to_string()));
    }
}
