//! Database crate: one lazily connected SQLite pool per process plus the
//! migration runner.

pub mod error;
pub mod manager;
pub mod migrate;
pub mod sqlite;

pub use error::{ConnectionError, MigrateError};
pub use manager::{ConnectionManager, Connector};
pub use migrate::Migration;
pub use sqlite::SqliteConnector;

/// The shared database service handed to modules.
pub type Database = ConnectionManager<SqliteConnector>;

/// Acquire the shared pool and apply the given migrations.
pub async fn migrate(db: &Database, migrations: &[(String, Migration)]) -> Result<usize, MigrateError> {
    let pool = db.acquire().await?;
    migrate::run(&pool, migrations).await
}
