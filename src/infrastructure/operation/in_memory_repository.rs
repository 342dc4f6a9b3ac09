//! In-memory operation repository implementation

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::domain::operation::{Operation, OperationId, OperationRepository};
use crate::domain::pagination::{Page, PageRequest};

/// In-memory implementation of OperationRepository
///
/// Ids come from a counter starting at 1. Data is lost when the process
/// terminates.
#[derive(Debug)]
pub struct InMemoryOperationRepository {
    operations: Arc<RwLock<BTreeMap<OperationId, Operation>>>,
    sequence: AtomicI64,
}

impl InMemoryOperationRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            operations: Arc::new(RwLock::new(BTreeMap::new())),
            sequence: AtomicI64::new(0),
        }
    }

    fn next_id(&self) -> OperationId {
        OperationId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for InMemoryOperationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationRepository for InMemoryOperationRepository {
    async fn save(&self, mut operation: Operation) -> Result<Operation, DomainError> {
        let mut operations = self.operations.write().await;

        let id = match operation.id() {
            Some(id) => {
                // Explicit ids must never be handed out again by the sequence
                self.sequence.fetch_max(id.value(), Ordering::SeqCst);
                id
            }
            None => {
                let id = self.next_id();
                operation.assign_id(id);
                id
            }
        };

        operations.insert(id, operation.clone());
        Ok(operation)
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Operation>, DomainError> {
        let operations = self.operations.read().await;
        let total = operations.len() as u64;

        let content: Vec<Operation> = operations
            .values()
            .skip(request.offset() as usize)
            .take(request.size() as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn find_one_with_eager_relationships(
        &self,
        id: OperationId,
    ) -> Result<Option<Operation>, DomainError> {
        let operations = self.operations.read().await;
        Ok(operations.get(&id).cloned())
    }

    async fn delete(&self, id: OperationId) -> Result<bool, DomainError> {
        let mut operations = self.operations.write().await;
        Ok(operations.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let operations = self.operations.read().await;
        Ok(operations.len() as u64)
    }
}
