use std::sync::Arc;

use devevent_db::{ConnectionError, Database};
use devevent_http::AppError;
use serde_json::json;
use sqlx::types::Json;
use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{Event, EventCandidate, EventRow};
use super::normalize::normalize_event;
use crate::validation::ValidationError;

/// Upper bound on similar events returned for one source event.
pub const SIMILAR_EVENTS_LIMIT: i64 = 4;

/// Upper bound on a single listing.
pub const LIST_LIMIT: i64 = 50;

const EVENT_COLUMNS: &str = "id, title, slug, description, overview, image, venue, location, \
     date, time, mode, audience, agenda, organizer, tags, created_at, updated_at";

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an event with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("event '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<EventStoreError> for AppError {
    fn from(err: EventStoreError) -> Self {
        match err {
            EventStoreError::Validation(err) => err.into(),
            EventStoreError::DuplicateSlug(slug) => AppError::conflict(
                vec![json!({ "field": "slug", "error": "duplicate", "value": slug })],
                format!("an event with slug '{slug}' already exists"),
            ),
            EventStoreError::NotFound(slug) => AppError::not_found(format!("event '{slug}' not found")),
            EventStoreError::Connection(err) => AppError::unavailable(err.to_string()),
            EventStoreError::Database(err) => AppError::Internal(err.into()),
        }
    }
}

/// Event persistence. Every write goes through [`normalize_event`] first.
#[derive(Clone)]
pub struct EventStore {
    db: Arc<Database>,
}

impl EventStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn pool(&self) -> Result<SqlitePool, EventStoreError> {
        Ok(self.db.acquire().await?)
    }

    /// Validate, normalize and insert a new event. A slug collision, even
    /// with a concurrent writer, fails with [`EventStoreError::DuplicateSlug`].
    pub async fn create(&self, candidate: EventCandidate) -> Result<Event, EventStoreError> {
        let normalized = normalize_event(candidate, None)?;
        let pool = self.pool().await?;

        let now = OffsetDateTime::now_utc();
        let event = into_event(normalized, Uuid::now_v7(), now, now);

        sqlx::query(
            r#"
            INSERT INTO events (id, title, slug, description, overview, image, venue, location,
                                date, time, mode, audience, agenda, organizer, tags,
                                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.mode)
        .bind(&event.audience)
        .bind(Json(&event.agenda))
        .bind(&event.organizer)
        .bind(Json(&event.tags))
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&pool)
        .await
        .map_err(|err| slug_conflict(err, &event.slug))?;

        tracing::info!(event_id = %event.id, slug = %event.slug, "event created");
        Ok(event)
    }

    /// Re-normalize against the stored record and overwrite it. Slug, date
    /// and time are recomputed only when title, date or time changed.
    pub async fn update(&self, slug: &str, candidate: EventCandidate) -> Result<Event, EventStoreError> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| EventStoreError::NotFound(slug.to_string()))?;

        let normalized = normalize_event(candidate, Some(&existing))?;
        let event = into_event(
            normalized,
            existing.id,
            existing.created_at,
            OffsetDateTime::now_utc(),
        );

        let pool = self.pool().await?;
        sqlx::query(
            r#"
            UPDATE events
               SET title = ?2, slug = ?3, description = ?4, overview = ?5, image = ?6,
                   venue = ?7, location = ?8, date = ?9, time = ?10, mode = ?11,
                   audience = ?12, agenda = ?13, organizer = ?14, tags = ?15, updated_at = ?16
             WHERE id = ?1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.mode)
        .bind(&event.audience)
        .bind(Json(&event.agenda))
        .bind(&event.organizer)
        .bind(Json(&event.tags))
        .bind(event.updated_at)
        .execute(&pool)
        .await
        .map_err(|err| slug_conflict(err, &event.slug))?;

        tracing::info!(event_id = %event.id, slug = %event.slug, "event updated");
        Ok(event)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, EventStoreError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = ?1"
        ))
        .bind(slug)
        .fetch_optional(&pool)
        .await?;

        Ok(row.map(Event::from))
    }

    /// Newest events first, capped at [`LIST_LIMIT`].
    pub async fn list(&self, limit: i64) -> Result<Vec<Event>, EventStoreError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))
        .bind(limit.clamp(0, LIST_LIMIT))
        .fetch_all(&pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Other events sharing at least one tag with the event at `slug`, at
    /// most [`SIMILAR_EVENTS_LIMIT`] of them, oldest first. An unknown slug
    /// yields an empty list.
    pub async fn find_similar(&self, slug: &str) -> Result<Vec<Event>, EventStoreError> {
        let Some(source) = self.find_by_slug(slug).await? else {
            tracing::debug!(slug, "similar events requested for unknown slug");
            return Ok(Vec::new());
        };

        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
              FROM events AS e
             WHERE e.id <> ?1
               AND EXISTS (
                     SELECT 1
                       FROM json_each(e.tags) AS candidate
                       JOIN json_each(?2) AS wanted ON candidate.value = wanted.value
                   )
             ORDER BY e.created_at ASC, e.id ASC
             LIMIT ?3
            "#
        ))
        .bind(source.id)
        .bind(Json(&source.tags))
        .bind(SIMILAR_EVENTS_LIMIT)
        .fetch_all(&pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }
}

fn slug_conflict(err: sqlx::Error, slug: &str) -> EventStoreError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        tracing::warn!(slug, "rejected duplicate event slug");
        EventStoreError::DuplicateSlug(slug.to_string())
    } else {
        EventStoreError::Database(err)
    }
}

fn into_event(
    normalized: EventCandidate,
    id: Uuid,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
) -> Event {
    Event {
        id,
        title: normalized.title,
        slug: normalized.slug.unwrap_or_default(),
        description: normalized.description,
        overview: normalized.overview,
        image: normalized.image,
        venue: normalized.venue,
        location: normalized.location,
        date: normalized.date,
        time: normalized.time,
        mode: normalized.mode,
        audience: normalized.audience,
        agenda: normalized.agenda,
        organizer: normalized.organizer,
        tags: normalized.tags,
        created_at,
        updated_at,
    }
}
