use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use devevent_app::modules::events::seed;
use devevent_app::EventStore;
use devevent_db::Database;
use devevent_kernel::{settings::Settings, ModuleRegistry};

#[derive(Debug, Parser)]
#[command(name = "devevent-cli", version, about = "Operate a DevEvent event store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Insert the sample conference catalogue (existing slugs are skipped)
    Seed,
    /// Print events sharing a tag with the given event as JSON
    Similar {
        /// Slug of the source event
        slug: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load DevEvent settings")?;
    devevent_telemetry::init(&settings.telemetry);

    let connector = settings
        .database
        .connector()
        .context("database is not configured")?;
    let db = Arc::new(Database::new(connector));

    let mut registry = ModuleRegistry::new();
    devevent_app::register_all(&mut registry, &db)?;

    let applied = devevent_db::migrate(&db, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;

    match cli.command {
        Command::Migrate => {
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
        Command::Seed => {
            let inserted = seed::seed(&EventStore::new(Arc::clone(&db)))
                .await
                .context("failed to seed events")?;
            println!("inserted {inserted} sample event(s)");
        }
        Command::Similar { slug } => {
            let events = EventStore::new(Arc::clone(&db))
                .find_similar(&slug)
                .await
                .with_context(|| format!("failed to look up events similar to '{slug}'"))?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }

    Ok(())
}
