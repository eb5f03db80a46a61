use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devevent_http::AppError;
use serde_json::{json, Value};
use uuid::Uuid;

use super::models::BookingCandidate;
use super::store::BookingStore;

pub fn router(store: BookingStore) -> Router {
    Router::new()
        .route("/", post(create_booking))
        .route("/events/{event_id}/count", get(count_for_event))
        .with_state(store)
}

async fn create_booking(
    State(store): State<BookingStore>,
    payload: Result<Json<BookingCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(candidate) = payload?;
    let booking = store.create(candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Booking created successfully", "booking": booking })),
    ))
}

async fn count_for_event(
    State(store): State<BookingStore>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let bookings = store.count_for_event(event_id).await?;
    Ok(Json(json!({ "eventId": event_id, "bookings": bookings })))
}
