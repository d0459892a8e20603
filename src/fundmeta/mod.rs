//! Business rules for mutual fund metadata, layered over [`store::Store`].

pub mod model;
pub mod store;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::pagination::Pagination;
use crate::validate::{self, FieldErrors};
pub use model::{MutualFundMeta, NewMutualFundMeta, UpdateMutualFundMeta};
use store::{MutualFundMetaRow, Store, StoreError, WriteLock};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("ID is not in its proper form")]
    InvalidId,
    #[error("mutual_fund_meta not found")]
    NotFound,
    #[error("mutual_fund_meta already exists")]
    DuplicateEntry,
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Maps storage failures to domain errors, wrapping anything unclassified with `context`.
fn translate(context: impl Into<String>, err: StoreError) -> CoreError {
    match err {
        StoreError::NotFound => CoreError::NotFound,
        StoreError::DuplicateEntry => CoreError::DuplicateEntry,
        other => CoreError::Store { context: context.into(), source: other },
    }
}

fn parse_id(id: &str) -> CoreResult<i64> {
    validate::check_id(id).map_err(|e| {
        debug!(id, reason = %e, "rejected id");
        CoreError::InvalidId
    })
}

/// Entry point for mutual fund metadata operations.
#[derive(Clone)]
pub struct Core {
    store: Store,
}

impl Core {
    pub fn new(pool: SqlitePool, lock: WriteLock) -> Self {
        Self { store: Store::new(pool, lock) }
    }

    pub async fn create(&self, input: NewMutualFundMeta, now: DateTime<Utc>) -> CoreResult<MutualFundMeta> {
        validate::check(&input).map_err(CoreError::Validation)?;

        let mut row = MutualFundMetaRow {
            id: 0,
            fund_house: input.fund_house.trim().to_string(),
            scheme_type: input.scheme_type.trim().to_string(),
            scheme_category: input.scheme_category.trim().to_string(),
            scheme_code: input.scheme_code.trim().to_string(),
            scheme_name: input.scheme_name.trim().to_string(),
            created_on: now,
            updated_on: now,
            deleted_on: None,
        };

        let insert = row.clone();
        let id = self
            .store
            .within_transaction(move |mut tx| Box::pin(async move { tx.create(&insert).await }))
            .await
            .map_err(|e| translate("create", e))?;

        row.id = id;
        Ok(row.into())
    }

    /// Applies the non-blank fields of `input` to record `id`. When nothing
    /// would change, storage is not written and the stored record is returned.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateMutualFundMeta,
        now: DateTime<Utc>,
    ) -> CoreResult<MutualFundMeta> {
        let id = parse_id(id)?;
        validate::check(&input).map_err(CoreError::Validation)?;

        let row = self
            .store
            .within_transaction(move |mut tx| {
                Box::pin(async move {
                    let mut row = tx.query_by_id(id).await?;
                    if !input.apply_to(&mut row) {
                        return Ok(row);
                    }
                    row.updated_on = now;
                    tx.update(&row).await?;
                    Ok::<_, StoreError>(row)
                })
            })
            .await
            .map_err(|e| translate(format!("update id[{}]", id), e))?;

        Ok(row.into())
    }

    /// Soft-deletes record `id` after confirming it is active.
    pub async fn delete(&self, id: &str, now: DateTime<Utc>) -> CoreResult<()> {
        let id = parse_id(id)?;

        self.store
            .within_transaction(move |mut tx| {
                Box::pin(async move {
                    tx.query_by_id(id).await?;
                    tx.delete(id, now).await?;
                    Ok::<_, StoreError>(())
                })
            })
            .await
            .map_err(|e| translate(format!("delete id[{}]", id), e))
    }

    /// A page of active records. An empty page is not an error.
    pub async fn query(&self, pagi: &Pagination) -> CoreResult<Vec<MutualFundMeta>> {
        let rows = self.store.query(pagi).await.map_err(|e| translate("query", e))?;
        Ok(rows.into_iter().map(MutualFundMeta::from).collect())
    }

    pub async fn query_by_id(&self, id: &str) -> CoreResult<MutualFundMeta> {
        let id = parse_id(id)?;
        let row = self
            .store
            .query_by_id(id)
            .await
            .map_err(|e| translate(format!("query id[{}]", id), e))?;
        Ok(row.into())
    }
}
