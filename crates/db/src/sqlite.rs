use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::ConnectionError;
use crate::manager::Connector;

/// Builds a [`SqlitePool`] for a `sqlite:` URL.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
        }
    }

    /// In-memory databases live and die with a single connection, so the pool
    /// is pinned to one that never idles out.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:").max_connections(1)
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Handle = SqlitePool;

    fn target(&self) -> String {
        self.url.clone()
    }

    async fn connect(&self) -> Result<SqlitePool, ConnectionError> {
        let mut options = SqliteConnectOptions::from_str(&self.url)
            .map_err(ConnectionError::connect)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout);

        if self.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        pool_options
            .connect_with(options)
            .await
            .map_err(ConnectionError::connect)
    }
}
