use sqlx::SqlitePool;

use crate::error::MigrateError;

/// Migration contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

const LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded in the `_migrations` ledger, in the
/// order given. Returns how many were applied.
pub async fn run(pool: &SqlitePool, migrations: &[(String, Migration)]) -> Result<usize, MigrateError> {
    sqlx::query(LEDGER).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM _migrations WHERE module = ?1 AND id = ?2")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;
        if seen.is_some() {
            tracing::debug!(target: "devevent-db", module = %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|source| MigrateError::Apply {
                module: module.clone(),
                id: migration.id.to_string(),
                source,
            })?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?1, ?2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(target: "devevent-db", module = %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::Connector;
    use crate::sqlite::SqliteConnector;

    fn widgets() -> Vec<(String, Migration)> {
        vec![(
            "widgets".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE widget (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
            },
        )]
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let pool = SqliteConnector::in_memory().connect().await.unwrap();

        assert_eq!(run(&pool, &widgets()).await.unwrap(), 1);
        assert_eq!(run(&pool, &widgets()).await.unwrap(), 0);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'widget'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn broken_migration_names_its_origin() {
        let pool = SqliteConnector::in_memory().connect().await.unwrap();
        let broken = vec![(
            "widgets".to_string(),
            Migration {
                id: "002_broken",
                up: "CREATE TABLEX nope;",
            },
        )];

        let err = run(&pool, &broken).await.unwrap_err();
        assert!(matches!(err, MigrateError::Apply { ref id, .. } if id == "002_broken"));
    }
}
