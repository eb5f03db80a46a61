//! Referential integrity for bookings: a booking may only be written against
//! an event that exists at that moment.

use sqlx::{Executor, Sqlite};
use uuid::Uuid;

/// Whether an event with `event_id` exists. Run it on the same transaction
/// as the booking insert so the two see one snapshot.
pub async fn check_event_exists<'e, E>(executor: E, event_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE id = ?1)")
        .bind(event_id)
        .fetch_one(executor)
        .await
}
