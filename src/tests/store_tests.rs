#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;
    use tokio::sync::{oneshot, RwLock};

    use crate::fundmeta::store::{Store, StoreError, WriteLock};
    use crate::pagination::{Pagination, SortColumn, SortDirection};
    use crate::tests::{at, memory_pool, sample_row};

    fn new_lock() -> WriteLock {
        Arc::new(RwLock::new(()))
    }

    async fn memory_store() -> Store {
        Store::new(memory_pool().await, new_lock())
    }

    async fn insert(store: &Store, code: &str, secs: i64) -> i64 {
        let row = sample_row(code, at(secs));
        store
            .within_transaction(move |mut tx| Box::pin(async move { tx.create(&row).await }))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_query_by_id() {
        let store = memory_store().await;
        let id = insert(&store, "119551", 0).await;
        assert!(id > 0);

        let row = store.query_by_id(id).await.unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.scheme_code, "119551");
        assert_eq!(row.created_on, at(0));
        assert_eq!(row.updated_on, at(0));
        assert!(row.deleted_on.is_none());
    }

    #[tokio::test]
    async fn test_query_by_id_missing_is_not_found() {
        let store = memory_store().await;
        let err = store.query_by_id(999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_scheme_code_is_classified() {
        let store = memory_store().await;
        insert(&store, "119551", 0).await;

        let row = sample_row("119551", at(1));
        let err = store
            .within_transaction(move |mut tx| Box::pin(async move { tx.create(&row).await }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry));
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_hidden_and_code_reusable() {
        let store = memory_store().await;
        let id = insert(&store, "119551", 0).await;

        let affected = store
            .within_transaction(move |mut tx| Box::pin(async move { tx.delete(id, at(5)).await }))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        assert!(matches!(store.query_by_id(id).await, Err(StoreError::NotFound)));
        assert!(store.query(&Pagination::default()).await.unwrap().is_empty());

        // Uniqueness only covers active rows
        let again = insert(&store, "119551", 10).await;
        assert_ne!(again, id);
    }

    #[tokio::test]
    async fn test_update_rewrites_row() {
        let store = memory_store().await;
        let id = insert(&store, "119551", 0).await;

        let mut row = store.query_by_id(id).await.unwrap();
        row.scheme_name = "Renamed".to_string();
        row.updated_on = at(30);
        let expected = row.clone();
        let affected = store
            .within_transaction(move |mut tx| Box::pin(async move { tx.update(&row).await }))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.query_by_id(id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_query_orders_and_pages() {
        let store = memory_store().await;
        let a = insert(&store, "A", 0).await;
        let b = insert(&store, "B", 10).await;
        let c = insert(&store, "C", 20).await;

        let newest_first = store.query(&Pagination::default()).await.unwrap();
        let ids: Vec<i64> = newest_first.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c, b, a]);

        let pagi = Pagination { page: 1, per_page: 2, sort: SortColumn::Id, direction: SortDirection::Asc };
        let second_page = store.query(&pagi).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, c);

        let pagi = Pagination { page: 5, ..pagi };
        assert!(store.query(&pagi).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_equal_sort_keys_tie_break_on_id() {
        let store = memory_store().await;
        let a = insert(&store, "A", 0).await;
        let b = insert(&store, "B", 0).await;

        let desc = store.query(&Pagination::default()).await.unwrap();
        assert_eq!(desc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b, a]);

        let pagi = Pagination { direction: SortDirection::Asc, ..Pagination::default() };
        let asc = store.query(&pagi).await.unwrap();
        assert_eq!(asc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back() {
        let store = memory_store().await;
        let row = sample_row("119551", at(0));

        let err = store
            .within_transaction(move |mut tx| {
                Box::pin(async move {
                    tx.create(&row).await?;
                    Err::<(), _>(StoreError::NotFound)
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.query(&Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nested_transaction_reuses_handle() {
        let store = memory_store().await;
        let row = sample_row("119551", at(0));

        // A nested call that took the lock again would never finish
        let fut = store.within_transaction(move |mut tx| {
            Box::pin(async move {
                let id = tx.create(&row).await?;
                tx.within_transaction(move |mut inner| Box::pin(async move { inner.query_by_id(id).await }))
                    .await
            })
        });
        let found = tokio::time::timeout(Duration::from_secs(5), fut).await.unwrap().unwrap();
        assert_eq!(found.scheme_code, "119551");
    }

    #[tokio::test]
    async fn test_reads_inside_transaction_see_uncommitted_writes() {
        let store = memory_store().await;
        let row = sample_row("119551", at(0));

        let rows = store
            .within_transaction(move |mut tx| {
                Box::pin(async move {
                    tx.create(&row).await?;
                    tx.query(&Pagination::default()).await
                })
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_do_not_interleave() {
        // File-backed with several connections, so only the write lock serializes
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("lock.db").display());
        let pool = SqlitePoolOptions::new().max_connections(4).connect(&url).await.unwrap();
        crate::db::init_db(&pool).await.unwrap();
        let store = Store::new(pool, new_lock());

        let events: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let (started_tx, started_rx) = oneshot::channel::<()>();

        let first = {
            let store = store.clone();
            let events = events.clone();
            let row = sample_row("A", at(0));
            tokio::spawn(async move {
                store
                    .within_transaction(move |mut tx| {
                        Box::pin(async move {
                            events.lock().unwrap().push("first:start");
                            let _ = started_tx.send(());
                            tokio::time::sleep(Duration::from_millis(150)).await;
                            let id = tx.create(&row).await?;
                            events.lock().unwrap().push("first:end");
                            Ok::<_, StoreError>(id)
                        })
                    })
                    .await
            })
        };

        let second = {
            let store = store.clone();
            let events = events.clone();
            let row = sample_row("B", at(1));
            tokio::spawn(async move {
                started_rx.await.unwrap();
                store
                    .within_transaction(move |mut tx| {
                        Box::pin(async move {
                            events.lock().unwrap().push("second:start");
                            let id = tx.create(&row).await?;
                            events.lock().unwrap().push("second:end");
                            Ok::<_, StoreError>(id)
                        })
                    })
                    .await
            })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let log = events.lock().unwrap().clone();
        assert_eq!(log, vec!["first:start", "first:end", "second:start", "second:end"]);
    }

    #[tokio::test]
    async fn test_plain_reads_skip_the_lock() {
        let lock = new_lock();
        let store = Store::new(memory_pool().await, lock.clone());
        let _held = lock.write().await;
        let rows = tokio::time::timeout(Duration::from_secs(5), store.query(&Pagination::default()))
            .await
            .unwrap()
            .unwrap();
        assert!(rows.is_empty());
    }
}
