//! Persistence for `mutual_fund_meta`: all SQL text and the transaction boundary.
//!
//! Reads go straight to the pool. Writes are only reachable through a
//! [`StoreTx`], which exists only inside [`Store::within_transaction`]. That
//! call holds the process-wide write lock for the whole transaction, so at
//! most one write transaction runs at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::{sqlite::SqliteConnection, Executor, Sqlite, SqlitePool};
use tokio::sync::RwLock;
use tracing::debug;

use crate::pagination::Pagination;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("data not found")]
    NotFound,
    #[error("duplicated entry")]
    DuplicateEntry,
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    fn storage(context: impl Into<String>, source: sqlx::Error) -> Self {
        StoreError::Storage { context: context.into(), source }
    }

    /// Unique-constraint failures become `DuplicateEntry`; everything else keeps its context.
    fn classify(context: impl Into<String>, source: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &source {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEntry;
            }
        }
        StoreError::storage(context, source)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::storage("transaction", err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The process-wide lock serializing write transactions.
pub type WriteLock = Arc<RwLock<()>>;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MutualFundMetaRow {
    pub id: i64,
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: String,
    pub scheme_name: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub deleted_on: Option<DateTime<Utc>>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        fund_house,
        scheme_type,
        scheme_category,
        scheme_code,
        scheme_name,
        created_on,
        updated_on,
        deleted_on
    FROM
        mutual_fund_meta"#;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    lock: WriteLock,
}

impl Store {
    pub fn new(pool: SqlitePool, lock: WriteLock) -> Self {
        Self { pool, lock }
    }

    /// Runs `f` in a new transaction while holding the write lock. Commits when
    /// `f` succeeds and rolls back when it fails; the lock is released either way.
    pub async fn within_transaction<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(StoreTx<'t>) -> BoxFuture<'t, StoreResult<T>> + Send,
    {
        let _guard = self.lock.write().await;
        debug!("write lock acquired");
        crate::db::within_transaction(&self.pool, move |conn| f(StoreTx { conn })).await
    }

    pub async fn query(&self, pagi: &Pagination) -> StoreResult<Vec<MutualFundMetaRow>> {
        fetch_page(&self.pool, pagi).await
    }

    pub async fn query_by_id(&self, id: i64) -> StoreResult<MutualFundMetaRow> {
        fetch_by_id(&self.pool, id).await
    }
}

/// A store handle bound to an open transaction.
pub struct StoreTx<'t> {
    conn: &'t mut SqliteConnection,
}

impl StoreTx<'_> {
    /// Already inside a transaction: runs `f` on this handle without
    /// opening a nested transaction or touching the lock.
    pub async fn within_transaction<T, F>(&mut self, f: F) -> StoreResult<T>
    where
        F: for<'t> FnOnce(StoreTx<'t>) -> BoxFuture<'t, StoreResult<T>>,
    {
        f(StoreTx { conn: &mut *self.conn }).await
    }

    /// Inserts `row` (its `id` is ignored) and returns the assigned id.
    pub async fn create(&mut self, row: &MutualFundMetaRow) -> StoreResult<i64> {
        const Q: &str = r#"
            INSERT INTO mutual_fund_meta
                (fund_house, scheme_type, scheme_category, scheme_code, scheme_name, created_on, updated_on)
            VALUES
                (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#;

        let res = sqlx::query(Q)
            .bind(&row.fund_house)
            .bind(&row.scheme_type)
            .bind(&row.scheme_category)
            .bind(&row.scheme_code)
            .bind(&row.scheme_name)
            .bind(row.created_on)
            .bind(row.updated_on)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| StoreError::classify("inserting mutual_fund_meta", e))?;

        Ok(res.last_insert_rowid())
    }

    /// Full-row update keyed by `row.id`.
    pub async fn update(&mut self, row: &MutualFundMetaRow) -> StoreResult<u64> {
        const Q: &str = r#"
            UPDATE
                mutual_fund_meta
            SET
                fund_house = ?1,
                scheme_type = ?2,
                scheme_category = ?3,
                scheme_code = ?4,
                scheme_name = ?5,
                updated_on = ?6
            WHERE
                id = ?7"#;

        let res = sqlx::query(Q)
            .bind(&row.fund_house)
            .bind(&row.scheme_type)
            .bind(&row.scheme_category)
            .bind(&row.scheme_code)
            .bind(&row.scheme_name)
            .bind(row.updated_on)
            .bind(row.id)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| StoreError::classify(format!("updating mutual_fund_meta id[{}]", row.id), e))?;

        Ok(res.rows_affected())
    }

    /// Soft-deletes `id`. Existence is the caller's concern.
    pub async fn delete(&mut self, id: i64, now: DateTime<Utc>) -> StoreResult<u64> {
        const Q: &str = "UPDATE mutual_fund_meta SET deleted_on = ?1 WHERE id = ?2";

        let res = sqlx::query(Q)
            .bind(now)
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| StoreError::storage(format!("deleting mutual_fund_meta id[{}]", id), e))?;

        Ok(res.rows_affected())
    }

    pub async fn query(&mut self, pagi: &Pagination) -> StoreResult<Vec<MutualFundMetaRow>> {
        fetch_page(&mut *self.conn, pagi).await
    }

    pub async fn query_by_id(&mut self, id: i64) -> StoreResult<MutualFundMetaRow> {
        fetch_by_id(&mut *self.conn, id).await
    }
}

/// Builds the list query. Sort column and direction come from allow-listed
/// enums, never from raw input, so interpolating them is safe.
fn page_sql(pagi: &Pagination) -> String {
    let dir = pagi.direction.as_sql();
    format!(
        "{}\n    WHERE deleted_on IS NULL\n    ORDER BY {} {}, id {}\n    LIMIT ?1 OFFSET ?2",
        SELECT_COLUMNS,
        pagi.sort.as_sql(),
        dir,
        dir
    )
}

async fn fetch_page<'e, E>(exec: E, pagi: &Pagination) -> StoreResult<Vec<MutualFundMetaRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let q = page_sql(pagi);
    sqlx::query_as::<_, MutualFundMetaRow>(&q)
        .bind(i64::from(pagi.per_page))
        .bind(pagi.offset())
        .fetch_all(exec)
        .await
        .map_err(|e| StoreError::storage("selecting mutual_fund_meta", e))
}

async fn fetch_by_id<'e, E>(exec: E, id: i64) -> StoreResult<MutualFundMetaRow>
where
    E: Executor<'e, Database = Sqlite>,
{
    let q = format!("{}\n    WHERE id = ?1 AND deleted_on IS NULL", SELECT_COLUMNS);
    sqlx::query_as::<_, MutualFundMetaRow>(&q)
        .bind(id)
        .fetch_optional(exec)
        .await
        .map_err(|e| StoreError::storage(format!("selecting mutual_fund_meta id[{}]", id), e))?
        .ok_or(StoreError::NotFound)
}
