pub mod guard;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use devevent_db::Database;
use devevent_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use super::schema_json;
use models::{Booking, BookingCandidate};
use store::BookingStore;

/// Bookings against existing events.
pub struct BookingsModule {
    store: BookingStore,
}

impl BookingsModule {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            store: BookingStore::new(db),
        }
    }
}

#[async_trait]
impl Module for BookingsModule {
    fn name(&self) -> &'static str {
        "bookings"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookings module initialized"
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

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Book a spot at an event",
                        "tags": ["Bookings"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookingCandidate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "The stored booking",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "message": { "type": "string" },
                                                "booking": { "$ref": "#/components/schemas/Booking" }
                                            }
                                        }
                                    }
                                }
                            },
                            "422": error_response,
                            "503": error_response
                        }
                    }
                },
                "/events/{event_id}/count": {
                    "get": {
                        "summary": "Number of bookings for an event",
                        "tags": ["Bookings"],
                        "parameters": [{
                            "name": "event_id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string", "format": "uuid" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Booking count",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "eventId": { "type": "string", "format": "uuid" },
                                                "bookings": { "type": "integer" }
                                            }
                                        }
                                    }
                                }
                            },
                            "503": error_response
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Booking": schema_json::<Booking>(),
                    "BookingCandidate": schema_json::<BookingCandidate>()
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS bookings (
                    id         BLOB PRIMARY KEY NOT NULL,
                    event_id   BLOB NOT NULL REFERENCES events (id),
                    email      TEXT NOT NULL CHECK (email <> ''),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS bookings_event_id_idx ON bookings (event_id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookings module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookings module stopped");
        Ok(())
    }
}

/// Create a new instance of the bookings module
pub fn create_module(db: Arc<Database>) -> Arc<dyn Module> {
    Arc::new(BookingsModule::new(db))
}
