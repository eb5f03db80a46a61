use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use devevent_http::AppError;
use serde::Deserialize;
use serde_json::{json, Value};

use super::models::EventCandidate;
use super::store::{EventStore, LIST_LIMIT};

pub fn router(store: EventStore) -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{slug}", put(update_event))
        .route("/{slug}/similar", get(similar_events))
        .with_state(store)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

async fn create_event(
    State(store): State<EventStore>,
    payload: Result<Json<EventCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(candidate) = payload?;
    let event = store.create(candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Event created successfully", "event": event })),
    ))
}

async fn update_event(
    State(store): State<EventStore>,
    Path(slug): Path<String>,
    payload: Result<Json<EventCandidate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(candidate) = payload?;
    let event = store.update(&slug, candidate).await?;
    Ok(Json(json!({ "message": "Event updated successfully", "event": event })))
}

async fn list_events(
    State(store): State<EventStore>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, AppError> {
    let events = store.list(params.limit.unwrap_or(LIST_LIMIT)).await?;
    Ok(Json(json!({ "events": events })))
}

async fn similar_events(
    State(store): State<EventStore>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let events = store.find_similar(&slug).await?;
    Ok(Json(json!({ "events": events })))
}
