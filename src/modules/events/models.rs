use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// A persisted, canonical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Unique, URL-safe identifier derived from the title
    pub slug: String,
    pub description: String,
    pub overview: String,
    /// Image reference (URL or asset path)
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// 24-hour time, `HH:MM`
    pub time: String,
    /// By convention `online`, `offline` or `hybrid`
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

/// Event payload as submitted by a client. Missing fields deserialize as
/// empty and are reported by the normalizer, not by the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EventCandidate {
    pub title: String,
    /// Ignored on input: derived from the title, or kept from the stored
    /// record when the title is unchanged
    pub slug: Option<String>,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

impl From<&Event> for EventCandidate {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            slug: Some(event.slug.clone()),
            description: event.description.clone(),
            overview: event.overview.clone(),
            image: event.image.clone(),
            venue: event.venue.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            mode: event.mode.clone(),
            audience: event.audience.clone(),
            agenda: event.agenda.clone(),
            organizer: event.organizer.clone(),
            tags: event.tags.clone(),
        }
    }
}

/// Row shape of the `events` table.
#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Json<Vec<String>>,
    pub organizer: String,
    pub tags: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            overview: row.overview,
            image: row.image,
            venue: row.venue,
            location: row.location,
            date: row.date,
            time: row.time,
            mode: row.mode,
            audience: row.audience,
            agenda: row.agenda.0,
            organizer: row.organizer,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
