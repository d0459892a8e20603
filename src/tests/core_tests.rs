#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::RwLock;

    use crate::fundmeta::{Core, CoreError, UpdateMutualFundMeta};
    use crate::pagination::{Pagination, PaginationParams};
    use crate::tests::{at, memory_pool, new_input};

    async fn core() -> Core {
        Core::new(memory_pool().await, Arc::new(RwLock::new(())))
    }

    #[tokio::test]
    async fn test_create_trims_and_stamps() {
        let core = core().await;
        let mut input = new_input("119551");
        input.scheme_name = "  Padded Name  ".to_string();

        let created = core.create(input, at(0)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.scheme_name, "Padded Name");
        assert_eq!(created.created_on, at(0));
        assert_eq!(created.updated_on, at(0));
        assert!(created.deleted_on.is_none());

        let fetched = core.query_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_reports_every_invalid_field() {
        let core = core().await;
        let mut input = new_input("119551");
        input.fund_house = "   ".to_string();
        input.scheme_code = String::new();

        match core.create(input, at(0)).await {
            Err(CoreError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["fund_house", "scheme_code"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(core.query(&Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_scheme_code() {
        let core = core().await;
        core.create(new_input("119551"), at(0)).await.unwrap();
        let err = core.create(new_input("119551"), at(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateEntry));
    }

    #[tokio::test]
    async fn test_update_without_changes_keeps_record() {
        let core = core().await;
        let created = core.create(new_input("119551"), at(0)).await.unwrap();
        let id = created.id.to_string();

        // Same values, blanks and absent fields are all no-ops
        let input = UpdateMutualFundMeta {
            fund_house: Some(created.fund_house.clone()),
            scheme_type: Some("   ".to_string()),
            scheme_name: Some(format!(" {} ", created.scheme_name)),
            ..Default::default()
        };
        let updated = core.update(&id, input, at(60)).await.unwrap();
        assert_eq!(updated, created);
        assert_eq!(core.query_by_id(&id).await.unwrap().updated_on, at(0));
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_given_field() {
        let core = core().await;
        let created = core.create(new_input("119551"), at(0)).await.unwrap();
        let id = created.id.to_string();

        let input = UpdateMutualFundMeta { scheme_name: Some("Renamed Scheme".to_string()), ..Default::default() };
        let updated = core.update(&id, input, at(60)).await.unwrap();

        assert_eq!(updated.scheme_name, "Renamed Scheme");
        assert_eq!(updated.updated_on, at(60));
        assert_eq!(updated.created_on, created.created_on);
        assert_eq!(updated.fund_house, created.fund_house);
        assert_eq!(updated.scheme_type, created.scheme_type);
        assert_eq!(updated.scheme_category, created.scheme_category);
        assert_eq!(updated.scheme_code, created.scheme_code);

        assert_eq!(core.query_by_id(&id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_to_taken_scheme_code_conflicts() {
        let core = core().await;
        core.create(new_input("A"), at(0)).await.unwrap();
        let b = core.create(new_input("B"), at(1)).await.unwrap();

        let input = UpdateMutualFundMeta { scheme_code: Some("A".to_string()), ..Default::default() };
        let err = core.update(&b.id.to_string(), input, at(2)).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateEntry));
        assert_eq!(core.query_by_id(&b.id.to_string()).await.unwrap().scheme_code, "B");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let core = core().await;
        let input = UpdateMutualFundMeta { scheme_name: Some("x".to_string()), ..Default::default() };
        let err = core.update("42", input, at(0)).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_hides_record() {
        let core = core().await;
        let keep = core.create(new_input("A"), at(0)).await.unwrap();
        let gone = core.create(new_input("B"), at(1)).await.unwrap();
        let gone_id = gone.id.to_string();

        core.delete(&gone_id, at(2)).await.unwrap();

        assert!(matches!(core.query_by_id(&gone_id).await, Err(CoreError::NotFound)));
        let listed = core.query(&Pagination::default()).await.unwrap();
        assert_eq!(listed, vec![keep]);

        // Deleting twice finds nothing to delete
        assert!(matches!(core.delete(&gone_id, at(3)).await, Err(CoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_invalid_ids_are_rejected_before_storage() {
        let core = core().await;
        for id in ["abc", "0", "-1", "4294967296", ""] {
            assert!(matches!(core.query_by_id(id).await, Err(CoreError::InvalidId)), "id {:?}", id);
            assert!(matches!(core.delete(id, at(0)).await, Err(CoreError::InvalidId)), "id {:?}", id);
            assert!(
                matches!(core.update(id, UpdateMutualFundMeta::default(), at(0)).await, Err(CoreError::InvalidId)),
                "id {:?}",
                id
            );
        }
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let core = core().await;
        let params = PaginationParams { page: Some("3".to_string()), ..Default::default() };
        let pagi = Pagination::from_params(&params).unwrap();
        assert!(core.query(&pagi).await.unwrap().is_empty());
    }
}
