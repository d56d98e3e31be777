//! PostgreSQL implementation of the seat ledger.
//!
//! Reservations lock the requested seat rows with `SELECT ... FOR UPDATE`
//! and flip them with a conditional `UPDATE ... WHERE is_booked = FALSE`.
//! Any early return drops the [`sqlx::Transaction`], which rolls it back.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{LedgerError, SeatLedger, first_duplicate};
use crate::config::GatewayConfig;
use crate::domain::{
    Booking, BookingId, NewShowing, Seat, SeatId, SeatLayout, Showing, ShowingId,
};

type ShowingRow = (i64, String, i32, String, String);
type SeatRow = (i64, i64, String, bool);
type BookingRow = (i64, String, i64, i64, DateTime<Utc>);

fn storage(err: sqlx::Error) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

fn showing_from_row((id, title, duration_minutes, showtime, poster): ShowingRow) -> Showing {
    Showing {
        id: ShowingId::new(id),
        title,
        duration_minutes,
        showtime,
        poster,
    }
}

fn seat_from_row((id, showing_id, label, is_booked): SeatRow) -> Seat {
    Seat {
        id: SeatId::new(id),
        showing_id: ShowingId::new(showing_id),
        label,
        is_booked,
    }
}

fn booking_from_row((id, client_name, showing_id, seat_id, created_at): BookingRow) -> Booking {
    Booking {
        id: BookingId::new(id),
        client_name,
        showing_id: ShowingId::new(showing_id),
        seat_id: SeatId::new(seat_id),
        created_at,
    }
}

/// PostgreSQL-backed seat ledger using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresSeatLedger {
    pool: PgPool,
}

impl PostgresSeatLedger {
    /// Creates a ledger over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool, retrying up to
    /// `config.database_connect_retries` times.
    ///
    /// # Errors
    ///
    /// Returns the last [`sqlx::Error`] once every attempt has failed.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, sqlx::Error> {
        let attempts = config.database_connect_retries.max(1);
        let delay = Duration::from_secs(config.database_retry_delay_secs);
        let mut attempt = 1;
        loop {
            let result = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .min_connections(config.database_min_connections)
                .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
                .connect(&config.database_url)
                .await;
            match result {
                Ok(pool) => {
                    tracing::info!(attempt, "connected to database");
                    return Ok(Self::new(pool));
                }
                Err(err) if attempt < attempts => {
                    tracing::warn!(attempt, attempts, error = %err, "database connection failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }

    /// Generates a seat grid for every showing that has no seats yet.
    ///
    /// Returns the number of showings that were backfilled.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on database failure.
    pub async fn backfill_seat_grids(&self, layout: SeatLayout) -> Result<usize, LedgerError> {
        let empty: Vec<i64> = sqlx::query_scalar(
            "SELECT s.id FROM showings s \
             WHERE NOT EXISTS (SELECT 1 FROM seats WHERE showing_id = s.id) ORDER BY s.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        for showing_id in &empty {
            let mut tx = self.pool.begin().await.map_err(storage)?;
            insert_seat_grid(&mut tx, *showing_id, layout).await?;
            tx.commit().await.map_err(storage)?;
            tracing::info!(showing_id, seats = layout.capacity(), "seat grid backfilled");
        }
        Ok(empty.len())
    }

    async fn ensure_showing(
        conn: &mut sqlx::PgConnection,
        showing_id: ShowingId,
    ) -> Result<(), LedgerError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM showings WHERE id = $1")
            .bind(showing_id.get())
            .fetch_optional(conn)
            .await
            .map_err(storage)?;
        found
            .map(|_| ())
            .ok_or(LedgerError::ShowingNotFound(showing_id))
    }
}

async fn insert_seat_grid(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    showing_id: i64,
    layout: SeatLayout,
) -> Result<(), LedgerError> {
    let labels = layout.labels();
    sqlx::query(
        "INSERT INTO seats (showing_id, seat_number, is_booked) \
         SELECT $1, label, FALSE FROM UNNEST($2::text[]) AS label",
    )
    .bind(showing_id)
    .bind(&labels)
    .execute(&mut **tx)
    .await
    .map_err(storage)?;
    Ok(())
}

#[async_trait]
impl SeatLedger for PostgresSeatLedger {
    async fn list_showings(&self) -> Result<Vec<Showing>, LedgerError> {
        let rows = sqlx::query_as::<_, ShowingRow>(
            "SELECT id, title, duration_minutes, showtime, poster FROM showings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(rows.into_iter().map(showing_from_row).collect())
    }

    async fn create_showing(
        &self,
        showing: NewShowing,
        layout: SeatLayout,
    ) -> Result<Showing, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let row = sqlx::query_as::<_, ShowingRow>(
            "INSERT INTO showings (title, duration_minutes, showtime, poster) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, duration_minutes, showtime, poster",
        )
        .bind(&showing.title)
        .bind(showing.duration_minutes)
        .bind(&showing.showtime)
        .bind(&showing.poster)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;
        insert_seat_grid(&mut tx, row.0, layout).await?;
        tx.commit().await.map_err(storage)?;
        Ok(showing_from_row(row))
    }

    async fn delete_showing(&self, showing_id: ShowingId) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query("DELETE FROM bookings WHERE showing_id = $1")
            .bind(showing_id.get())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        sqlx::query("DELETE FROM seats WHERE showing_id = $1")
            .bind(showing_id.get())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        let removed = sqlx::query("DELETE FROM showings WHERE id = $1")
            .bind(showing_id.get())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        if removed.rows_affected() == 0 {
            return Err(LedgerError::ShowingNotFound(showing_id));
        }
        tx.commit().await.map_err(storage)
    }

    async fn list_seats(&self, showing_id: ShowingId) -> Result<Vec<Seat>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        Self::ensure_showing(&mut *conn, showing_id).await?;
        let rows = sqlx::query_as::<_, SeatRow>(
            "SELECT id, showing_id, seat_number, is_booked FROM seats \
             WHERE showing_id = $1 ORDER BY seat_number COLLATE \"C\"",
        )
        .bind(showing_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(storage)?;
        Ok(rows.into_iter().map(seat_from_row).collect())
    }

    async fn list_bookings(&self, showing_id: ShowingId) -> Result<Vec<Booking>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        Self::ensure_showing(&mut *conn, showing_id).await?;
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT id, user_name, showing_id, seat_id, created_at FROM bookings \
             WHERE showing_id = $1 ORDER BY id",
        )
        .bind(showing_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(storage)?;
        Ok(rows.into_iter().map(booking_from_row).collect())
    }

    async fn reserve(
        &self,
        showing_id: ShowingId,
        seat_ids: &[SeatId],
        client_name: &str,
    ) -> Result<Vec<Booking>, LedgerError> {
        if let Some(seat_id) = first_duplicate(seat_ids) {
            return Err(LedgerError::DuplicateSeat(seat_id));
        }
        let raw_ids: Vec<i64> = seat_ids.iter().map(|id| id.get()).collect();
        let mut tx = self.pool.begin().await.map_err(storage)?;
        Self::ensure_showing(&mut *tx, showing_id).await?;

        let locked = sqlx::query_as::<_, (i64, bool)>(
            "SELECT id, is_booked FROM seats \
             WHERE showing_id = $1 AND id = ANY($2) ORDER BY id FOR UPDATE",
        )
        .bind(showing_id.get())
        .bind(&raw_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;

        for seat_id in seat_ids {
            match locked.iter().find(|(id, _)| *id == seat_id.get()) {
                None => return Err(LedgerError::SeatNotFound(*seat_id)),
                Some((_, true)) => return Err(LedgerError::SeatAlreadyBooked(*seat_id)),
                Some((_, false)) => {}
            }
        }

        let updated = sqlx::query(
            "UPDATE seats SET is_booked = TRUE \
             WHERE showing_id = $1 AND id = ANY($2) AND is_booked = FALSE",
        )
        .bind(showing_id.get())
        .bind(&raw_ids)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;
        if updated.rows_affected() != raw_ids.len() as u64 {
            let first = seat_ids.first().copied().unwrap_or(SeatId::new(0));
            return Err(LedgerError::SeatAlreadyBooked(first));
        }

        let mut bookings = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            let row = sqlx::query_as::<_, BookingRow>(
                "INSERT INTO bookings (user_name, showing_id, seat_id) VALUES ($1, $2, $3) \
                 RETURNING id, user_name, showing_id, seat_id, created_at",
            )
            .bind(client_name)
            .bind(showing_id.get())
            .bind(seat_id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
            bookings.push(booking_from_row(row));
        }

        tx.commit().await.map_err(storage)?;
        Ok(bookings)
    }
}
