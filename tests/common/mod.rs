//! Shared fixtures: a migrated in-memory store per test.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use devevent_app::modules::events::models::EventCandidate;
use devevent_db::{Database, SqliteConnector};
use devevent_kernel::ModuleRegistry;

pub struct TestApp {
    pub db: Arc<Database>,
    pub registry: ModuleRegistry,
}

/// Fresh in-memory database with every module's migrations applied.
pub async fn test_app() -> TestApp {
    migrated(SqliteConnector::in_memory()).await
}

/// Fresh on-disk database under the cargo tmp dir, pooled over several
/// connections so writers really run in parallel.
pub async fn file_app(name: &str) -> TestApp {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("devevent-tests");
    std::fs::create_dir_all(&dir).expect("tmp dir");
    let path = dir.join(format!("{name}-{}.db", std::process::id()));
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }

    let connector = SqliteConnector::new(format!("sqlite://{}", path.display())).max_connections(4);
    migrated(connector).await
}

async fn migrated(connector: SqliteConnector) -> TestApp {
    let db = Arc::new(Database::new(connector));
    let mut registry = ModuleRegistry::new();
    devevent_app::register_all(&mut registry, &db).expect("modules register");
    devevent_db::migrate(&db, &registry.collect_migrations())
        .await
        .expect("migrations apply");
    TestApp { db, registry }
}

pub fn event(title: &str, tags: &[&str]) -> EventCandidate {
    EventCandidate {
        title: title.to_string(),
        slug: None,
        description: format!("{title} description"),
        overview: format!("{title} overview"),
        image: "/images/event1.png".to_string(),
        venue: "Main Hall".to_string(),
        location: "Berlin, Germany".to_string(),
        date: "2026-05-20".to_string(),
        time: "9:30 AM".to_string(),
        mode: "offline".to_string(),
        audience: "Developers".to_string(),
        agenda: vec!["Opening".to_string(), "Talks".to_string()],
        organizer: "DevEvent".to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}
