use async_trait::async_trait;
use axum::Router;
use devevent_db::Database;

pub use devevent_db::Migration;

/// What a module sees at init and start: resolved settings and the shared
/// connection manager. The connection itself is acquired lazily.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Database,
}

/// A feature area of DevEvent (events, bookings) plugged into the kernel.
#[async_trait]
pub trait Module: Sync + Send {
    /// Registry key; also the `/api/{name}` mount point.
    fn name(&self) -> &'static str;

    /// Runs before migrations.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// `paths` and `components.schemas` to merge into `/docs/openapi.json`.
    /// Paths are relative to the module mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema changes owned by this module, applied in ascending id order.
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Runs once every migration has been applied.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
