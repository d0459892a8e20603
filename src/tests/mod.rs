//! Integration-style tests for mftracker.
//!
//! - **store_tests**: persistence, transactions and the write lock
//! - **core_tests**: domain rules over a real database
//! - **api_tests**: the router end to end
//! - **config_tests**: configuration defaults, layering and validation

pub mod core_tests;
pub mod store_tests;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::fundmeta::store::MutualFundMetaRow;
use crate::fundmeta::NewMutualFundMeta;

/// A single-connection in-memory database with the schema applied.
/// The connection is never recycled, so the database lives as long as the pool.
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub(crate) fn new_input(code: &str) -> NewMutualFundMeta {
    NewMutualFundMeta {
        fund_house: "Aditya Birla Sun Life Mutual Fund".to_string(),
        scheme_type: "Open Ended Schemes".to_string(),
        scheme_category: "Debt Scheme - Banking and PSU Fund".to_string(),
        scheme_code: code.to_string(),
        scheme_name: format!("Scheme {}", code),
    }
}

pub(crate) fn sample_row(code: &str, now: DateTime<Utc>) -> MutualFundMetaRow {
    let input = new_input(code);
    MutualFundMetaRow {
        id: 0,
        fund_house: input.fund_house,
        scheme_type: input.scheme_type,
        scheme_category: input.scheme_category,
        scheme_code: input.scheme_code,
        scheme_name: input.scheme_name,
        created_on: now,
        updated_on: now,
        deleted_on: None,
    }
}
