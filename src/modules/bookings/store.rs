use std::sync::Arc;

use devevent_db::{ConnectionError, Database};
use devevent_http::AppError;
use serde_json::json;
use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::guard::check_event_exists;
use super::models::{Booking, BookingCandidate};
use super::normalize::normalize_booking;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum BookingStoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("booking must reference an existing event; '{0}' does not exist")]
    DanglingReference(Uuid),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BookingStoreError> for AppError {
    fn from(err: BookingStoreError) -> Self {
        match err {
            BookingStoreError::Validation(err) => err.into(),
            BookingStoreError::DanglingReference(event_id) => AppError::validation_with_code(
                "dangling_reference",
                vec![json!({ "field": "eventId", "error": "not_found", "value": event_id })],
                "Booking must reference an existing event",
            ),
            BookingStoreError::Connection(err) => AppError::unavailable(err.to_string()),
            BookingStoreError::Database(err) => AppError::Internal(err.into()),
        }
    }
}

/// Booking persistence guarded by the event-existence check.
#[derive(Clone)]
pub struct BookingStore {
    db: Arc<Database>,
}

impl BookingStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn pool(&self) -> Result<SqlitePool, BookingStoreError> {
        Ok(self.db.acquire().await?)
    }

    /// Normalize the payload, confirm the event exists, then insert. The
    /// check and the insert share one transaction; on any failure nothing
    /// is written.
    pub async fn create(&self, candidate: BookingCandidate) -> Result<Booking, BookingStoreError> {
        let candidate = normalize_booking(candidate)?;
        let pool = self.pool().await?;

        let mut tx = pool.begin().await?;
        if !check_event_exists(&mut *tx, candidate.event_id).await? {
            tracing::warn!(event_id = %candidate.event_id, "booking rejected: event does not exist");
            return Err(BookingStoreError::DanglingReference(candidate.event_id));
        }

        let now = OffsetDateTime::now_utc();
        let booking = Booking {
            id: Uuid::now_v7(),
            event_id: candidate.event_id,
            email: candidate.email,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(&booking.email)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            let orphaned = err
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());
            if orphaned {
                BookingStoreError::DanglingReference(booking.event_id)
            } else {
                BookingStoreError::Database(err)
            }
        })?;
        tx.commit().await?;

        tracing::info!(booking_id = %booking.id, event_id = %booking.event_id, "booking created");
        Ok(booking)
    }

    /// Bookings held against one event.
    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64, BookingStoreError> {
        let pool = self.pool().await?;
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = ?1")
            .bind(event_id)
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }

    pub async fn count(&self) -> Result<i64, BookingStoreError> {
        let pool = self.pool().await?;
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }
}
