pub mod models;
pub mod normalize;
pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use devevent_db::{Connector, Database};
use devevent_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use super::schema_json;
use models::{Event, EventCandidate};
use store::EventStore;

/// Event listings: creation, updates, listing and similar-event lookup.
pub struct EventsModule {
    store: EventStore,
}

impl EventsModule {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            store: EventStore::new(db),
        }
    }
}

#[async_trait]
impl Module for EventsModule {
    fn name(&self) -> &'static str {
        "events"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            db = %ctx.db.connector().target(),
            "events module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let event_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/EventCandidate" }
                }
            }
        });
        let single_event = json!({
            "description": "The stored event",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "event": { "$ref": "#/components/schemas/Event" }
                        }
                    }
                }
            }
        });
        let event_list = json!({
            "description": "Events",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "events": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Event" }
                            }
                        }
                    }
                }
            }
        });
        let slug_param = json!({
            "name": "slug",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List events, newest first (capped at 50)",
                        "tags": ["Events"],
                        "parameters": [{
                            "name": "limit",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer" }
                        }],
                        "responses": { "200": event_list, "503": error_response }
                    },
                    "post": {
                        "summary": "Create an event",
                        "tags": ["Events"],
                        "requestBody": event_body,
                        "responses": {
                            "201": single_event,
                            "409": error_response,
                            "422": error_response,
                            "503": error_response
                        }
                    }
                },
                "/{slug}": {
                    "put": {
                        "summary": "Update an event",
                        "tags": ["Events"],
                        "parameters": [slug_param],
                        "requestBody": event_body,
                        "responses": {
                            "200": single_event,
                            "404": error_response,
                            "409": error_response,
                            "422": error_response
                        }
                    }
                },
                "/{slug}/similar": {
                    "get": {
                        "summary": "Up to four other events sharing a tag",
                        "tags": ["Events"],
                        "parameters": [slug_param],
                        "responses": { "200": event_list, "503": error_response }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Event": schema_json::<Event>(),
                    "EventCandidate": schema_json::<EventCandidate>()
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS events (
                    id          BLOB PRIMARY KEY NOT NULL,
                    title       TEXT NOT NULL CHECK (title <> ''),
                    slug        TEXT NOT NULL CHECK (slug <> ''),
                    description TEXT NOT NULL,
                    overview    TEXT NOT NULL,
                    image       TEXT NOT NULL,
                    venue       TEXT NOT NULL,
                    location    TEXT NOT NULL,
                    date        TEXT NOT NULL,
                    time        TEXT NOT NULL,
                    mode        TEXT NOT NULL,
                    audience    TEXT NOT NULL,
                    agenda      TEXT NOT NULL,
                    organizer   TEXT NOT NULL,
                    tags        TEXT NOT NULL,
                    created_at  TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS events_slug_unique ON events (slug);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "events module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "events module stopped");
        Ok(())
    }
}

/// Create a new instance of the events module
pub fn create_module(db: Arc<Database>) -> Arc<dyn Module> {
    Arc::new(EventsModule::new(db))
}
