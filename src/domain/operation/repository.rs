//! Operation repository trait

use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{Operation, OperationId};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest};

/// Persistence abstraction for operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OperationRepository: Send + Sync + Debug {
    /// Insert or replace an operation.
    ///
    /// An operation without an id gets the next id from the repository's
    /// sequence. An operation with an id is stored under that id whether or
    /// not it existed before.
    async fn save(&self, operation: Operation) -> Result<Operation, DomainError>;

    /// Fetch one page of operations ordered by id
    async fn find_all(&self, request: PageRequest) -> Result<Page<Operation>, DomainError>;

    /// Fetch an operation together with its labels
    async fn find_one_with_eager_relationships(
        &self,
        id: OperationId,
    ) -> Result<Option<Operation>, DomainError>;

    /// Delete an operation by ID, returns false if nothing was removed
    async fn delete(&self, id: OperationId) -> Result<bool, DomainError>;

    /// Total number of stored operations
    async fn count(&self) -> Result<u64, DomainError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::operation::Label;

    /// Helper to create an unsaved operation
    pub fn create_test_operation(amount: f64) -> Operation {
        let date = Utc.with_ymd_and_hms(2015, 8, 5, 9, 30, 0).unwrap();
        Operation::new(date, amount).with_description(format!("Operation of {}", amount))
    }

    /// Test suite for OperationRepository implementations
    pub async fn test_repository_basic_crud<R: OperationRepository>(repo: &R) {
        // Create
        let op = create_test_operation(10.0).with_label(Label::new("salary").with_id(1));
        let created = repo.save(op).await.expect("save should succeed");
        let id = created.id().expect("saved operation should have an id");

        // Get
        let fetched = repo
            .find_one_with_eager_relationships(id)
            .await
            .expect("find should succeed")
            .expect("operation should exist");
        assert_eq!(fetched.id(), Some(id));
        assert_eq!(fetched.labels().len(), 1);
        assert_eq!(fetched.labels()[0].label, "salary");

        // Update
        let updated = repo
            .save(fetched.with_description("Updated"))
            .await
            .expect("save should succeed");
        assert_eq!(updated.id(), Some(id));

        let fetched_updated = repo
            .find_one_with_eager_relationships(id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched_updated.description(), Some("Updated"));
        assert_eq!(repo.count().await.unwrap(), 1);

        // Delete
        let deleted = repo.delete(id).await.expect("delete should succeed");
        assert!(deleted);

        let after_delete = repo
            .find_one_with_eager_relationships(id)
            .await
            .expect("find should succeed");
        assert!(after_delete.is_none());
    }

    /// Saving new operations hands out distinct, increasing ids
    pub async fn test_repository_assigns_ids<R: OperationRepository>(repo: &R) {
        let first = repo.save(create_test_operation(1.0)).await.unwrap();
        let second = repo.save(create_test_operation(2.0)).await.unwrap();

        let first_id = first.id().unwrap();
        let second_id = second.id().unwrap();
        assert!(second_id > first_id);
    }

    /// Saving with an explicit id stores under that id and keeps the sequence ahead of it
    pub async fn test_repository_upsert_with_id<R: OperationRepository>(repo: &R) {
        let id = OperationId::new(500);
        let saved = repo
            .save(create_test_operation(5.0).with_id(id))
            .await
            .expect("upsert should succeed");
        assert_eq!(saved.id(), Some(id));

        let fetched = repo.find_one_with_eager_relationships(id).await.unwrap();
        assert!(fetched.is_some());

        let next = repo.save(create_test_operation(6.0)).await.unwrap();
        assert!(next.id().unwrap() > id);
    }

    /// Paging walks the dataset in id order
    pub async fn test_repository_find_all_pages<R: OperationRepository>(repo: &R) {
        for i in 0..5 {
            repo.save(create_test_operation(i as f64)).await.unwrap();
        }

        let first = repo.find_all(PageRequest::new(0, 2).unwrap()).await.unwrap();
        assert_eq!(first.content().len(), 2);
        assert_eq!(first.total_elements(), 5);
        assert_eq!(first.total_pages(), 3);
        assert!(first.content()[0].id() < first.content()[1].id());

        let last = repo.find_all(PageRequest::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(last.content().len(), 1);

        let beyond = repo.find_all(PageRequest::new(9, 2).unwrap()).await.unwrap();
        assert!(beyond.content().is_empty());
        assert_eq!(beyond.total_elements(), 5);
    }

    /// Deleting an unknown id is not an error
    pub async fn test_repository_delete_missing<R: OperationRepository>(repo: &R) {
        let deleted = repo
            .delete(OperationId::new(987_654))
            .await
            .expect("delete should succeed");
        assert!(!deleted);
    }
}
