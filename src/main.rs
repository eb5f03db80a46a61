use std::sync::Arc;

use anyhow::Context;
use devevent_db::{Connector, Database};
use devevent_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load DevEvent settings")?;
    devevent_telemetry::init(&settings.telemetry);

    // A missing database target is fatal here, not on first request.
    let connector = settings
        .database
        .connector()
        .context("database is not configured")?;
    let db = Arc::new(Database::new(connector));

    tracing::info!(
        env = ?settings.environment,
        db = %db.connector().target(),
        "devevent-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    devevent_app::register_all(&mut registry, &db)?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;

    let applied = devevent_db::migrate(&db, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    registry.start_modules(&ctx).await?;
    tracing::info!("devevent-app bootstrap complete");

    let served = devevent_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
