use std::sync::Arc;

use thiserror::Error;

/// Failure to obtain the shared database handle.
///
/// Cloneable so one failed attempt can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    #[error("no database target configured; set {0}")]
    MissingTarget(&'static str),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl ConnectionError {
    pub fn connect<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connect(Arc::new(err))
    }
}

/// Errors raised while applying migrations.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("migration '{module}/{id}' failed: {source}")]
    Apply {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
