use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnection, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Opens the connection pool described by `cfg`, creating the database file
/// when allowed. Failure here is fatal for the process.
pub async fn open(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let url = cfg.connection_string();

    if !cfg.is_memory() {
        crate::config::ensure_sqlite_parent_dir(cfg)?;
        if cfg.create_if_missing && !Sqlite::database_exists(&url).await.unwrap_or(false) {
            info!(database = %cfg.name, "creating SQLite database");
            Sqlite::create_database(&url).await?;
        }
    }

    let busy_timeout_ms = cfg.busy_timeout_ms;
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys=ON;").execute(&mut *conn).await?;
                sqlx::query(&format!("PRAGMA busy_timeout={};", busy_timeout_ms))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(&url)
        .await?;

    info!(database = %cfg.name, max_connections = cfg.max_connections, "database pool opened");
    Ok(pool)
}

/// Cheap liveness probe against the pool.
pub async fn ping(pool: &SqlitePool, timeout: Duration) -> anyhow::Result<()> {
    let query = sqlx::query("SELECT 1").execute(pool);
    match tokio::time::timeout(timeout, query).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(anyhow::anyhow!("ping timed out after {:?}", timeout)),
    }
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS mutual_fund_meta (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fund_house TEXT NOT NULL,
            scheme_type TEXT NOT NULL,
            scheme_category TEXT NOT NULL,
            scheme_code TEXT NOT NULL,
            scheme_name TEXT NOT NULL,
            created_on TEXT NOT NULL,
            updated_on TEXT NOT NULL,
            deleted_on TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    // scheme_code is unique among active rows only, so a soft-deleted scheme can be re-created
    let indexes = [
        (
            "idx_mfm_scheme_code_active",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfm_scheme_code_active ON mutual_fund_meta(scheme_code) WHERE deleted_on IS NULL",
        ),
        ("idx_mfm_created_on", "CREATE INDEX IF NOT EXISTS idx_mfm_created_on ON mutual_fund_meta(created_on)"),
        ("idx_mfm_updated_on", "CREATE INDEX IF NOT EXISTS idx_mfm_updated_on ON mutual_fund_meta(updated_on)"),
    ];
    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::error!("Failed to create index {}: {}", name, e);
            return Err(anyhow::anyhow!("creating index {}: {}", name, e));
        }
    }

    Ok(())
}

/// Runs `f` inside a fresh transaction on `pool`: commit when `f` succeeds,
/// roll back when it fails. Callers own any locking around this.
pub async fn within_transaction<T, E, F>(pool: &SqlitePool, f: F) -> Result<T, E>
where
    T: Send,
    E: From<sqlx::Error> + std::fmt::Display + Send,
    F: for<'t> FnOnce(&'t mut SqliteConnection) -> BoxFuture<'t, Result<T, E>> + Send,
{
    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "failed to begin transaction");
        E::from(e)
    })?;

    match f(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                error!(error = %rb, cause = %e, "unable to roll back transaction");
            }
            Err(e)
        }
    }
}
